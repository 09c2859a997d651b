use axum::extract::Path;
use axum::response::Html;

use crate::error::AppError;
use crate::nav::{escape_html, render_sidebar, Page};

const LAYOUT_TEMPLATE: &str = include_str!("../../templates/layout.html");

/// Full HTML document for `page`, sidebar included.
pub fn render_page(page: Page) -> String {
    LAYOUT_TEMPLATE
        .replace("{{title}}", &escape_html(page.title()))
        .replace("{{sidebar}}", &render_sidebar(Some(page)))
}

pub async fn dashboard() -> Html<String> {
    Html(render_page(Page::Dashboard))
}

/// Any sidebar route other than the root.
pub async fn page(Path(route): Path<String>) -> Result<Html<String>, AppError> {
    let route = route.strip_suffix(".php").unwrap_or(&route);
    let page = Page::from_route(route)
        .ok_or_else(|| AppError::NotFound(format!("No page named {}", route)))?;
    Ok(Html(render_page(page)))
}
