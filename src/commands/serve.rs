use std::any::Any;
use std::time::Duration;

use anyhow::{bail, Context};
use axum::body::{Body, Bytes};
use axum::extract::{DefaultBodyLimit, Request, State};
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::middleware::{self, Next};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use minijinja::context;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tower_http::LatencyUnit;
use tracing::{error, info, info_span, warn, Level};
use urlencoding::{decode, encode};

use crate::controllers::paste;
use crate::storage::Store;
use crate::types::api::{CreatePaste, CreatedPaste};
use crate::types::{MessagePage, PastePage};
use crate::validator::Validator;
use crate::{App, AppError};

/// How long in-flight requests get to finish once shutdown starts.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

pub async fn run(app: App) -> anyhow::Result<()> {
    let addr = app.config.listen_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to listen on {addr}"))?;
    info!("listening on {}", listener.local_addr()?);

    let store = app.store.clone();
    let (started_tx, started_rx) = oneshot::channel();

    let app = router(app);
    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown_signal().await;
                _ = started_tx.send(());
            })
            .await
    });

    let deadline = async {
        match started_rx.await {
            Ok(()) => tokio::time::sleep(SHUTDOWN_GRACE).await,
            // the server stopped on its own
            Err(_) => std::future::pending().await,
        }
    };

    tokio::select! {
        result = &mut server => {
            store.close().await;
            result.context("server task failed")??;
        }
        _ = deadline => {
            server.abort();
            store.close().await;
            bail!("shutdown did not finish within {SHUTDOWN_GRACE:?}");
        }
    }

    info!("shut down");
    Ok(())
}

/// Build the application's routes and middleware.
pub fn router(app: App) -> Router {
    let static_files: Router<App> = Router::new()
        .nest_service(
            "/static",
            ServeDir::new(app.config.static_dir()).append_index_html_on_directories(false),
        )
        .layer(middleware::from_fn(reject_directories));

    Router::new()
        .route("/", get(index))
        .route("/paste", post(create_paste))
        .merge(static_files)
        // addresses carry a free-form language suffix, which may contain `/`
        .fallback(show_paste)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(app.config.max_paste_size))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    info_span!(
                        "request",
                        method = %request.method(),
                        path = %request.uri().path(),
                        version = ?request.version(),
                        host = ?request.headers().get(header::HOST),
                    )
                })
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(LatencyUnit::Micros),
                ),
        )
        .with_state(app)
}

async fn index(State(app): State<App>) -> crate::AppResult<Html<String>> {
    Ok(Html(app.templates.render("index.html", context! {})?))
}

async fn create_paste(
    State(app): State<App>,
    body: Bytes,
) -> crate::AppResult<Json<CreatedPaste>> {
    if body.is_empty() {
        return Err(AppError::EmptyBody);
    }

    let input = serde_json::from_slice::<Option<CreatePaste>>(&body)?.unwrap_or_default();

    let mut validator = Validator::new();
    validator.is_blank("text", &input.text);
    validator.is_blank("lang", &input.lang);
    validator.is_equal("lineCount", input.line_count, 0);
    validator.valid()?;

    let address = paste::create(&app, input.text, input.lang, input.line_count).await?;

    Ok(Json(CreatedPaste { address }))
}

async fn show_paste(
    State(app): State<App>,
    method: Method,
    headers: HeaderMap,
    uri: Uri,
) -> crate::AppResult<Response> {
    if method != Method::GET && method != Method::HEAD {
        return not_found_page(&app);
    }

    let path = uri.path();
    let Ok(address) = decode(path.strip_prefix('/').unwrap_or(path)) else {
        return not_found_page(&app);
    };

    if address.trim().is_empty() {
        return Ok(Redirect::to("/").into_response());
    }

    let Some(paste) = paste::get(&app, &address).await? else {
        return not_found_page(&app);
    };

    let host = headers
        .get(header::HOST)
        .and_then(|host| host.to_str().ok())
        .unwrap_or(&app.config.address);

    let page = PastePage {
        text_highlighted: paste::render(&app, &paste)?,
        address: format!("{host}/{}", encode(&paste.address)),
        line_count: paste.line_count,
        line_numbers: PastePage::line_numbers(&paste.text, paste.line_count),
        lang: paste.lang,
    };

    Ok(Html(app.templates.render("paste.html", &page)?).into_response())
}

fn not_found_page(app: &App) -> crate::AppResult<Response> {
    let page = app.templates.render("message.html", MessagePage::not_found())?;
    Ok((StatusCode::NOT_FOUND, Html(page)).into_response())
}

/// Directory paths under `/static` are never listed.
async fn reject_directories(request: Request, next: Next) -> Response {
    if request.uri().path().ends_with('/') {
        return StatusCode::NOT_FOUND.into_response();
    }
    next.run(request).await
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        *s
    } else {
        "unknown panic payload"
    };
    error!(panic = details, "handler panicked");

    (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!("failed to listen for ctrl-c: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!("failed to listen for SIGTERM: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => warn!("received ctrl-c"),
        _ = terminate => warn!("received SIGTERM"),
    }

    info!("shutting down");
}

#[cfg(test)]
mod tests {
    use axum_test::TestServer;

    use super::*;

    #[tokio::test]
    async fn panicking_handlers_answer_500_and_keep_serving() {
        let app = Router::new()
            .route("/boom", get(|| async { panic!("boom") as () }))
            .route("/fine", get(|| async { "fine" }))
            .layer(CatchPanicLayer::custom(handle_panic));
        let server = TestServer::new(app).unwrap();

        let response = server.get("/boom").await;
        assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.text(), "internal server error");

        let response = server.get("/fine").await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.text(), "fine");
    }

    #[test]
    fn panic_payloads_of_any_type_are_handled() {
        let response = handle_panic(Box::new(42_u32));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = handle_panic(Box::new(String::from("owned message")));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
