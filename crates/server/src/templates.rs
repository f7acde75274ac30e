//! Askama templates for the HTML pages.

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tracing::error;

pub struct LessonLink {
    pub id: i64,
    pub slug: &'static str,
    pub title: &'static str,
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub lessons: Vec<LessonLink>,
}

#[derive(Template)]
#[template(path = "page.html")]
pub struct PageTemplate {
    pub id: i64,
    pub title: &'static str,
    pub markdown: String,
    pub rendered_html: String,
}

/// Editor page. `original_code` fills the editable widget and
/// `converted_code` the read-only one.
#[derive(Template)]
#[template(path = "editor.html")]
pub struct EditorTemplate {
    pub id: i64,
    pub title: &'static str,
    pub original_code: String,
    pub converted_code: String,
    pub error: Option<String>,
    pub csrf_field: &'static str,
    pub csrf_token: String,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub status: u16,
    pub message: String,
}

pub fn render<T: Template>(status: StatusCode, template: &T) -> Response {
    match template.render() {
        Ok(body) => (status, Html(body)).into_response(),
        Err(err) => {
            error!(%err, "failed to render template");
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to render page").into_response()
        }
    }
}

pub fn error_page(status: StatusCode, message: impl Into<String>) -> Response {
    render(
        status,
        &ErrorTemplate {
            status: status.as_u16(),
            message: message.into(),
        },
    )
}
