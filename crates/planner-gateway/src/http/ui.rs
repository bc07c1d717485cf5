use axum::response::{Html, Redirect};

static INDEX_HTML: &str = include_str!("../../static/index.html");

/// GET / — the planning page is the landing page.
pub async fn root_redirect() -> Redirect {
    Redirect::temporary("/static/index.html")
}

/// Serve the embedded planning UI at `GET /static/index.html`.
pub async fn ui_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}
