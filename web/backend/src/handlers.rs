use crate::contact::ContactForm;
use crate::error::SiteError;
use crate::models::{HealthResponse, RequestContext};
use crate::render::{PageContext, Template};
use crate::state::AppState;
use axum::{
    Form, Json,
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, Method, StatusCode, Uri},
    middleware::Next,
    response::{Html, IntoResponse, Response},
};
use site_core::Page;
use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "Site is running".to_string(),
    })
}

/// Front controller: every path that is not an API route lands here.
pub async fn serve_page(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    connect_info: Option<ConnectInfo<SocketAddr>>,
) -> Response {
    let request = RequestContext::new(method, uri.path(), &headers, connect_info.map(|info| info.0));

    match render_page(&state, &request).await {
        Ok(html) => Html(html).into_response(),
        Err(e) => error_response(&state, &request, e),
    }
}

async fn render_page(state: &AppState, request: &RequestContext) -> Result<String, SiteError> {
    let matched = state.routes.match_path(&request.path)?;
    let mut context = PageContext::new(&request.path);

    if matched.page == Page::Homepage {
        context = context.with_lastfm(state.now_playing_view().await);
    }

    Ok(state.renderer.render(Template::Page(matched.page), &context)?)
}

pub async fn submit_contact(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    Form(form): Form<ContactForm>,
) -> Response {
    let request = RequestContext::new(method, uri.path(), &headers, connect_info.map(|info| info.0));

    let (status, message) = match form.validate() {
        Ok(()) => {
            let email = form.to_email(&state.mailer_config.from, &state.mailer_config.to);
            if let Err(e) = state.mailer.send(&email).await {
                tracing::warn!(path = %request.path, "Failed to send contact mail: {}", e);
            }
            (StatusCode::OK, "Thanks, your message is on its way.".to_string())
        }
        Err(reason) => (StatusCode::UNPROCESSABLE_ENTITY, reason),
    };

    let context = PageContext::new(&request.path).with_message(message);
    match state.renderer.render(Template::Contact, &context) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => error_response(&state, &request, e.into()),
    }
}

/// Marks a response produced by `panic_marker` so `render_panics` can swap in
/// the 500 page.
#[derive(Debug, Clone)]
struct HandlerPanic(String);

/// Turns a caught handler panic into a bare 500 carrying the panic message.
pub fn panic_marker(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "handler panicked".to_string()
    };

    let mut response = StatusCode::INTERNAL_SERVER_ERROR.into_response();
    response.extensions_mut().insert(HandlerPanic(message));
    response
}

/// Middleware wrapped around the panic catcher: renders the 500 page for any
/// request whose handler panicked.
pub async fn render_panics(
    State(state): State<Arc<AppState>>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    request: Request,
    next: Next,
) -> Response {
    let context = RequestContext::new(
        request.method().clone(),
        request.uri().path(),
        request.headers(),
        connect_info.map(|info| info.0),
    );

    let response = next.run(request).await;
    let panic = response
        .extensions()
        .get::<HandlerPanic>()
        .map(|panic| panic.0.clone());

    match panic {
        Some(message) => error_response(&state, &context, SiteError::Unhandled(message)),
        None => response,
    }
}

/// The only place that produces 404 and 500 responses.
pub fn error_response(state: &AppState, request: &RequestContext, error: SiteError) -> Response {
    let status = error.status_code();

    tracing::error!(
        path = %request.path,
        code = status.as_u16(),
        method = %request.method,
        user_agent = ?request.user_agent,
        ip = ?request.client_ip,
        "{}",
        error
    );

    let (template, context) = match &error {
        SiteError::NotFound(_) => (Template::NotFound, PageContext::new(&request.path)),
        _ => (
            Template::ServerError,
            PageContext::new(&request.path).with_message(error.to_string()),
        ),
    };

    match state.renderer.render(template, &context) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(render_error) => {
            tracing::error!("Failed to render error page: {}", render_error);
            (status, format!("{} {}", status, request.path)).into_response()
        }
    }
}
