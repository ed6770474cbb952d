use crate::browser;
use crate::config::AppConfig;
use anyhow::Context;
use autostart::StartupRegistrar;
use serde_json::{Map, Value};
use std::convert::Infallible;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use task_store::{DocumentStore, SaveReport};
use tokio::sync::RwLock;
use warp::hyper::body::Bytes;
use warp::Filter;

/// Shared state for the server
pub type SharedState = Arc<AppState>;

/// Delay between the listener coming up and the browser being pointed at it
const BROWSER_DELAY: Duration = Duration::from_millis(500);

/// Document store and startup registrar, shared by every request.
pub struct AppState {
    // Loads take the read side, saves the write side, so a save never
    // interleaves with another save or a load in this process
    pub store: RwLock<DocumentStore>,
    pub registrar: Box<dyn StartupRegistrar>,
}

impl AppState {
    pub fn new(store: DocumentStore, registrar: Box<dyn StartupRegistrar>) -> Self {
        AppState {
            store: RwLock::new(store),
            registrar,
        }
    }
}

/// JSON response for GET /api/startup-status
#[derive(serde::Serialize)]
pub struct StartupStatus {
    pub enabled: bool,
}

/// JSON response for the enable/disable endpoints
#[derive(serde::Serialize)]
pub struct StartupChange {
    pub success: bool,
    pub enabled: bool,
}

/// JSON response for POST /api/save-data
#[derive(serde::Serialize)]
pub struct SaveResponse {
    pub success: bool,
}

/// Reads a POST body as a JSON object. Anything else, including an empty
/// or malformed body, counts as an empty object.
pub fn parse_body(body: &[u8]) -> Map<String, Value> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

/// Runs blocking file or registry work off the async workers.
/// A panicked task is logged and replaced by `fallback`.
async fn run_blocking<T, F>(fallback: T, work: F) -> T
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(work).await {
        Ok(value) => value,
        Err(e) => {
            log::error!("Blocking task failed: {}", e);
            fallback
        }
    }
}

/// Enables or disables startup, then re-checks what is actually registered.
async fn change_startup(state: SharedState, enable: bool) -> StartupChange {
    let fallback = StartupChange {
        success: false,
        enabled: false,
    };
    run_blocking(fallback, move || {
        let success = if enable {
            state.registrar.enable()
        } else {
            state.registrar.disable()
        };
        // Report what is registered now, not what the attempt claimed
        StartupChange {
            success,
            enabled: state.registrar.is_enabled(),
        }
    })
    .await
}

/// GET /api/startup-status endpoint handler
pub async fn handle_startup_status(state: SharedState) -> Result<impl warp::Reply, warp::Rejection> {
    let enabled = run_blocking(false, move || state.registrar.is_enabled()).await;
    Ok(warp::reply::json(&StartupStatus { enabled }))
}

/// GET /api/data endpoint handler
pub async fn handle_load_data(state: SharedState) -> Result<impl warp::Reply, warp::Rejection> {
    let guard = state.store.read().await;
    let store = guard.clone();
    let data = run_blocking(Map::new(), move || store.load_all()).await;
    drop(guard);

    Ok(warp::reply::json(&data))
}

/// POST /api/enable-startup endpoint handler
pub async fn handle_enable_startup(state: SharedState) -> Result<impl warp::Reply, warp::Rejection> {
    Ok(warp::reply::json(&change_startup(state, true).await))
}

/// POST /api/disable-startup endpoint handler
pub async fn handle_disable_startup(state: SharedState) -> Result<impl warp::Reply, warp::Rejection> {
    Ok(warp::reply::json(&change_startup(state, false).await))
}

/// POST /api/save-data endpoint handler
///
/// Always answers `success: true`; keys that failed to write are only logged.
pub async fn handle_save_data(body: Bytes, state: SharedState) -> Result<impl warp::Reply, warp::Rejection> {
    let data = parse_body(&body);

    let guard = state.store.write().await;
    let store = guard.clone();
    let report = run_blocking(SaveReport::default(), move || store.save_all(&data)).await;
    drop(guard);

    if !report.is_complete() {
        log::warn!(
            "Saved {} of {} documents",
            report.saved.len(),
            report.saved.len() + report.failed.len()
        );
    }

    Ok(warp::reply::json(&SaveResponse { success: true }))
}

/// Creates the server routes
pub fn create_routes(
    state: SharedState,
    app_dir: PathBuf,
) -> impl Filter<Extract = impl warp::Reply, Error = Infallible> + Clone {
    let state_filter = warp::any().map(move || state.clone());

    // OPTIONS on any path
    let preflight = warp::options().map(|| {
        let reply = warp::reply::with_header(
            warp::reply(),
            "Access-Control-Allow-Methods",
            "GET, POST, OPTIONS",
        );
        warp::reply::with_header(reply, "Access-Control-Allow-Headers", "Content-Type")
    });

    // GET /api/startup-status
    let status_route = warp::path!("api" / "startup-status")
        .and(warp::get())
        .and(state_filter.clone())
        .and_then(handle_startup_status);

    // GET /api/data
    let data_route = warp::path!("api" / "data")
        .and(warp::get())
        .and(state_filter.clone())
        .and_then(handle_load_data);

    // POST /api/enable-startup
    let enable_route = warp::path!("api" / "enable-startup")
        .and(warp::post())
        .and(state_filter.clone())
        .and_then(handle_enable_startup);

    // POST /api/disable-startup
    let disable_route = warp::path!("api" / "disable-startup")
        .and(warp::post())
        .and(state_filter.clone())
        .and_then(handle_disable_startup);

    // POST /api/save-data
    let save_route = warp::path!("api" / "save-data")
        .and(warp::post())
        .and(warp::body::bytes())
        .and(state_filter)
        .and_then(handle_save_data);

    // Everything else is a file under the app directory
    let static_files = warp::fs::dir(app_dir);

    // Catches every method and path the filters above reject, so the
    // combined filter never fails
    let not_found = warp::any().map(|| {
        warp::reply::with_status(
            warp::reply::json(&serde_json::json!({"error": "API endpoint not found"})),
            warp::http::StatusCode::NOT_FOUND,
        )
    });

    preflight
        .or(status_route)
        .or(data_route)
        .or(enable_route)
        .or(disable_route)
        .or(save_route)
        .or(static_files)
        .or(not_found)
        .with(warp::reply::with::header("Access-Control-Allow-Origin", "*"))
}

/// Starts the web server and runs until Ctrl+C.
///
/// Failing to bind (port taken, for one) is returned as an error. Requests
/// are not logged.
pub async fn start_server(
    config: &AppConfig,
    state: SharedState,
    open_browser: bool,
) -> anyhow::Result<()> {
    let routes = create_routes(state, config.app_dir.clone());

    let (addr, server) = warp::serve(routes)
        .try_bind_ephemeral(config.addr())
        .with_context(|| format!("Failed to start server on {}", config.addr()))?;

    let url = format!("http://{}", addr);
    println!("Email Task Manager - Local Server");
    println!("  Server running at: {}", url);
    println!("  Data stored in:    {}", config.data_dir.display());
    println!("Endpoints:");
    println!("  GET  {}/api/startup-status", url);
    println!("  GET  {}/api/data", url);
    println!("  POST {}/api/enable-startup", url);
    println!("  POST {}/api/disable-startup", url);
    println!("  POST {}/api/save-data", url);
    println!("Press Ctrl+C to stop the server");

    if open_browser {
        browser::open_after(url, BROWSER_DELAY);
    }

    tokio::select! {
        _ = server => {}
        result = tokio::signal::ctrl_c() => {
            result.context("Failed to listen for Ctrl+C")?;
            println!("\n\nServer stopped.");
        }
    }

    Ok(())
}
