//! Process-wide classifier cache
//!
//! The artifact is loaded once, on first use, and shared read-only for
//! the life of the process. There is no unload; process exit releases it.

use std::path::Path;

use once_cell::sync::OnceCell;

use super::{Classifier, ClassifierError};

static CLASSIFIER: OnceCell<Classifier> = OnceCell::new();

/// Load the classifier from `path`, or hand back the already-loaded
/// instance. Only the first call reads the disk.
pub fn load(path: &Path) -> Result<&'static Classifier, ClassifierError> {
    CLASSIFIER.get_or_try_init(|| {
        tracing::info!("Loading classifier artifact from {}", path.display());
        let classifier = Classifier::load(path)?;
        tracing::info!(
            model_type = %classifier.metadata().model_type,
            features = classifier.metadata().features,
            "Classifier artifact loaded"
        );
        Ok(classifier)
    })
}

/// The cached classifier, if one has been loaded.
pub fn get() -> Option<&'static Classifier> {
    CLASSIFIER.get()
}
