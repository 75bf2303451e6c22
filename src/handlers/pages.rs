//! Static pages

use axum::response::Html;

/// The screening form. A single static page; all interaction goes
/// through the JSON endpoints.
pub async fn index() -> Html<&'static str> {
    Html(include_str!("../../assets/index.html"))
}
