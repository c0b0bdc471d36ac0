use std::env;

use axum::{
    extract::Query,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use connectn::{best_move, hint_for, GameConfig, HintRequest, MoveRequest};
use serde::Deserialize;
use tokio::{net::TcpListener, task};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_STATIC_DIR: &str = "web/dist";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let static_dir = env::var("CONNECTN_STATIC_DIR").unwrap_or_else(|_| DEFAULT_STATIC_DIR.into());
    let app = app_router(&static_dir);

    let addr = env::var("CONNECTN_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.into());
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on http://{addr}, serving {static_dir}");
    axum::serve(listener, app).await?;
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn app_router(static_dir: &str) -> Router {
    let api = Router::new()
        .route("/move", get(handle_move))
        .route("/hint", get(handle_hint));
    let spa = Router::new().nest_service(
        "/",
        ServeDir::new(static_dir).append_index_html_on_directories(true),
    );
    Router::new()
        .nest("/api", api)
        .merge(spa)
        .layer(
            CorsLayer::new()
                .allow_methods([axum::http::Method::GET])
                .allow_origin(axum::http::HeaderValue::from_static("*"))
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(TraceLayer::new_for_http())
}

/// Board shape from optional query parameters; omitted fields mean the
/// classic 6x7 connect-4 board.
fn shape(rows: Option<usize>, cols: Option<usize>, connect: Option<usize>) -> GameConfig {
    let default = GameConfig::default();
    GameConfig::new(
        rows.unwrap_or(default.rows),
        cols.unwrap_or(default.cols),
        connect.unwrap_or(default.connect),
    )
}

#[derive(Debug, Deserialize)]
struct MoveQuery {
    #[serde(default)]
    position: String,
    level: String,
    seed: Option<u64>,
    rows: Option<usize>,
    cols: Option<usize>,
    connect: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct HintQuery {
    #[serde(default)]
    position: String,
    rows: Option<usize>,
    cols: Option<usize>,
    connect: Option<usize>,
}

async fn handle_move(Query(query): Query<MoveQuery>) -> Result<impl IntoResponse, ApiError> {
    let req = MoveRequest {
        position: query.position,
        config: shape(query.rows, query.cols, query.connect),
        difficulty: query.level,
        seed: query.seed,
    };
    // The search is CPU-bound; keep it off the async workers.
    let mv = task::spawn_blocking(move || best_move(req)).await??;
    let headers = [(header::CACHE_CONTROL, "no-store")];
    Ok((headers, Json(mv)))
}

async fn handle_hint(Query(query): Query<HintQuery>) -> Result<impl IntoResponse, ApiError> {
    let req = HintRequest {
        position: query.position,
        config: shape(query.rows, query.cols, query.connect),
    };
    let hint = task::spawn_blocking(move || hint_for(req)).await??;
    let headers = [(header::CACHE_CONTROL, "no-store")];
    Ok((headers, Json(hint)))
}

#[derive(Debug)]
struct ApiError(anyhow::Error);

impl<E: Into<anyhow::Error>> From<E> for ApiError {
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::BAD_REQUEST;
        let body = format!("{}", self.0);
        (status, body).into_response()
    }
}
