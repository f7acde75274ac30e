use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::Deserialize;
use shared::{
    domain::{Lesson, LessonId, LESSONS},
    error::{ApiError, ErrorCode},
    protocol::{ConvertRequest, ConvertResponse},
};
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::{info, warn};

mod api;
mod app_state;
mod assets;
mod config;
mod csrf;
mod lessons;
mod templates;

use api::{convert_route, convert_source, ApiContext};
use app_state::AppState;
use config::load_settings;
use lessons::{render_markdown, LessonLibrary};
use templates::{error_page, render, EditorTemplate, IndexTemplate, LessonLink, PageTemplate};

/// Form posted by the editor page. `python_code` is filled from the editable
/// widget just before submission.
#[derive(Debug, Deserialize)]
struct EditorForm {
    #[serde(default)]
    csrfmiddlewaretoken: String,
    #[serde(default)]
    python_code: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings();
    if let Some(dir) = &settings.pages_dir {
        info!(pages_dir = %dir.display(), "serving lesson pages from disk");
    }

    let state = AppState {
        api: ApiContext {
            max_source_bytes: settings.max_source_bytes,
        },
        lessons: LessonLibrary::with_pages_dir(settings.pages_dir.clone()),
        secure_cookies: settings.secure_cookies,
    };
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    // Form encoding can triple the size of the source, plus the token field.
    let body_limit = state.api.max_source_bytes.saturating_mul(3).saturating_add(1024);

    Router::new()
        .route("/healthz", get(healthz))
        .route("/", get(index))
        .route("/page/:page", get(lesson_page))
        .route("/editor/:id", get(editor_page).post(editor_submit))
        .route(convert_route(), post(http_convert))
        .route("/static/editor.js", get(editor_js))
        .route("/static/style.css", get(style_css))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn index() -> Response {
    let lessons = LESSONS
        .iter()
        .map(|lesson| LessonLink {
            id: lesson.id.0,
            slug: lesson.slug,
            title: lesson.title,
        })
        .collect();
    render(StatusCode::OK, &IndexTemplate { lessons })
}

async fn lesson_page(State(state): State<Arc<AppState>>, Path(page): Path<String>) -> Response {
    match state.lessons.markdown(&page).await {
        Ok((lesson, markdown)) => {
            let rendered_html = render_markdown(&markdown);
            render(
                StatusCode::OK,
                &PageTemplate {
                    id: lesson.id.0,
                    title: lesson.title,
                    markdown,
                    rendered_html,
                },
            )
        }
        Err(err) => error_page(StatusCode::NOT_FOUND, err.to_string()),
    }
}

async fn editor_page(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    let Some((lesson, sample)) = state.lessons.sample(LessonId(id)) else {
        return error_page(StatusCode::NOT_FOUND, format!("Editor {id} not found."));
    };

    let existing = csrf::token_from_headers(&headers);
    let issued = existing.is_none();
    let token = existing.unwrap_or_else(csrf::generate_token);

    let mut response = render(
        StatusCode::OK,
        &editor_view(&state, id, lesson, sample.to_string(), token.clone()),
    );
    if issued {
        match csrf::set_cookie_header(&token, state.secure_cookies) {
            Some(cookie) => {
                response.headers_mut().insert(header::SET_COOKIE, cookie);
            }
            None => warn!("could not encode CSRF cookie"),
        }
    }
    response
}

async fn editor_submit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Form(form): Form<EditorForm>,
) -> Response {
    let Some((lesson, _)) = state.lessons.sample(LessonId(id)) else {
        return error_page(StatusCode::NOT_FOUND, format!("Editor {id} not found."));
    };

    let cookie_token = csrf::token_from_headers(&headers);
    if !csrf::verify(cookie_token.as_deref(), &form.csrfmiddlewaretoken) {
        warn!(editor = id, "rejected editor submission with bad CSRF token");
        return error_page(StatusCode::FORBIDDEN, "CSRF verification failed.");
    }

    render(
        StatusCode::OK,
        &editor_view(&state, id, lesson, form.python_code, form.csrfmiddlewaretoken),
    )
}

fn editor_view(
    state: &AppState,
    id: i64,
    lesson: &'static Lesson,
    original_code: String,
    csrf_token: String,
) -> EditorTemplate {
    let (converted_code, error) = match convert_source(&state.api, &original_code) {
        Ok(response) => (response.assembly, None),
        Err(err) => (String::new(), Some(err.message)),
    };
    EditorTemplate {
        id,
        title: lesson.title,
        original_code,
        converted_code,
        error,
        csrf_field: csrf::FORM_FIELD,
        csrf_token,
    }
}

async fn http_convert(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ConvertRequest>,
) -> Result<Json<ConvertResponse>, (StatusCode, Json<ApiError>)> {
    convert_source(&state.api, &req.source)
        .map(Json)
        .map_err(|e| (status_for(e.code), Json(e)))
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        ErrorCode::Conversion => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

async fn editor_js() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        assets::EDITOR_JS,
    )
}

async fn style_css() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        assets::STYLE_CSS,
    )
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
