use axum::http::header;
use axum::{
    extract::{DefaultBodyLimit, State},
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{Mutex, OnceCell, RwLock};
use tower::limit::ConcurrencyLimitLayer;
use tower::ServiceBuilder;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;

use crate::catalog::store::{CatalogError, CatalogState, Dataset};
use crate::cli::{load_viewconf, ServeArgs};
use crate::config::Settings;
use crate::engine::export_snapshot;
use crate::engine::session::SessionEngine;
use crate::core::chrom::ChromosomeTable;
use crate::core::region::parse_region;
use crate::navigation::{NavigationController, NavigationError, NavigationOutcome, ValidationFailure};
use crate::parsing::chrom_sizes::{ChromSizesError, ChromosomeSource, RemoteChromosomeSource};
use crate::view::config::ViewConfig;
use crate::view::ids::UuidGenerator;
use crate::view::manager::{SelectionOutcome, ViewConfigManager, ViewError};

/// Request bodies are small JSON documents
pub const MAX_REQUEST_BODY_SIZE: usize = 64 * 1024; // 64KB

/// Shared application state
pub struct AppState {
    pub settings: Settings,
    pub catalog: RwLock<CatalogState>,
    pub engine: SessionEngine,
    pub views: ViewConfigManager<UuidGenerator>,
    pub navigation: Mutex<NavigationController>,
    pub chrom_source: RemoteChromosomeSource,
    /// Assembly chromosome table, loaded on first successful use
    pub chrom_table: OnceCell<Arc<ChromosomeTable>>,
    pub client: reqwest::Client,
}

impl AppState {
    /// Build the state with the catalog still loading
    ///
    /// # Errors
    ///
    /// Returns an error if the settings carry an invalid reference window.
    pub fn new(settings: Settings, viewconf: ViewConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::new();
        let views = ViewConfigManager::new(
            settings.view_id(),
            settings.fixed_prefix_count,
            settings.track_chrom_sizes_url.clone(),
            UuidGenerator,
        );
        let navigation = settings.navigation_controller()?;

        Ok(Self {
            catalog: RwLock::new(CatalogState::Loading),
            engine: SessionEngine::new(viewconf),
            views,
            navigation: Mutex::new(navigation),
            chrom_source: RemoteChromosomeSource::new(client.clone()),
            chrom_table: OnceCell::new(),
            client,
            settings,
        })
    }

    /// The assembly's chromosome table, fetched once and shared across requests.
    ///
    /// A failed load is not cached; the next request retries it.
    ///
    /// # Errors
    ///
    /// Returns `ChromSizesError` if the chrom sizes file cannot be loaded.
    pub async fn chromosome_table(&self) -> Result<Arc<ChromosomeTable>, ChromSizesError> {
        self.chrom_table
            .get_or_try_init(|| async {
                self.chrom_source
                    .load(&self.settings.assembly_chrom_sizes_url)
                    .await
                    .map(Arc::new)
            })
            .await
            .cloned()
    }
}

/// Enhanced error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_type: String,
    pub details: Option<String>,
}

#[derive(Deserialize)]
pub struct SelectionRequest {
    /// Dataset labels in stacking order
    pub labels: Vec<String>,
}

#[derive(Deserialize)]
pub struct NavigateRequest {
    pub region: String,
}

/// Create a safe error response that prevents information disclosure
/// while logging detailed errors server-side for debugging
pub fn create_safe_error_response(
    error_type: &str,
    user_message: &str,
    internal_error: Option<&str>,
) -> ErrorResponse {
    if let Some(internal_msg) = internal_error {
        tracing::error!("Internal error ({}): {}", error_type, internal_msg);
    }

    ErrorResponse {
        error: user_message.to_string(),
        error_type: error_type.to_string(),
        details: None,
    }
}

fn error_response(status: StatusCode, error: ErrorResponse) -> Response {
    (status, Json(error)).into_response()
}

/// Run the web server
///
/// # Errors
///
/// Returns an error if the tokio runtime cannot be created or the server fails to start.
pub fn run(args: ServeArgs, settings: Settings) -> anyhow::Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move { run_server(args, settings).await })
}

/// Create the application router with all routes and middleware configured.
#[allow(clippy::missing_panics_doc)] // Panics only on invalid governor config (constants are valid)
pub fn create_router(state: Arc<AppState>) -> Router {
    // Configure IP-based rate limiting
    let governor_conf = GovernorConfigBuilder::default()
        .per_second(10) // 10 requests per second per IP
        .burst_size(50) // Allow bursts of 50 requests
        .finish()
        .unwrap();

    Router::new()
        .route("/api/datasets", get(datasets_handler))
        .route("/api/selection", post(selection_handler))
        .route("/api/navigate", post(navigate_handler))
        .route("/api/viewconf", get(viewconf_handler))
        .route("/api/export", get(export_handler))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("x-content-type-options"),
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("x-frame-options"),
                    HeaderValue::from_static("DENY"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("referrer-policy"),
                    HeaderValue::from_static("strict-origin-when-cross-origin"),
                ))
                // IP-based rate limiting to prevent abuse
                .layer(GovernorLayer {
                    config: Arc::new(governor_conf),
                })
                // Request timeout to prevent slow client attacks
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    Duration::from_secs(30),
                ))
                // Limit concurrent requests to prevent DOS
                .layer(ConcurrencyLimitLayer::new(100))
                .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_SIZE)),
        )
}

/// Fetch the dataset catalog in the background; the API reports `loading` until it resolves
pub fn spawn_catalog_fetch(state: Arc<AppState>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let loaded = CatalogState::fetch(&state.client, &state.settings.catalog_url).await;
        *state.catalog.write().await = loaded;
    })
}

async fn run_server(args: ServeArgs, settings: Settings) -> anyhow::Result<()> {
    let viewconf = load_viewconf(args.viewconf.as_deref())?;
    let state = Arc::new(AppState::new(settings, viewconf)?);
    spawn_catalog_fetch(Arc::clone(&state));
    let app = create_router(state);

    let addr = format!("{}:{}", args.address, args.port);
    println!("Starting facet-view server at http://{addr}");

    if args.open {
        let _ = open::that(format!("http://{addr}/api/viewconf"));
    }

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Catalog status and the selectable datasets
async fn datasets_handler(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let catalog = state.catalog.read().await;
    let datasets: &[Dataset] = match &*catalog {
        CatalogState::Ready(c) => &c.datasets,
        _ => &[],
    };

    Json(serde_json::json!({
        "status": catalog.status(),
        "count": datasets.len(),
        "datasets": datasets,
    }))
}

/// Rebuild the view from the selected dataset labels
async fn selection_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SelectionRequest>,
) -> Response {
    match apply_selection(&state, &request.labels).await {
        Ok(SelectionOutcome::Applied {
            tracks,
            resized_around,
        }) => Json(serde_json::json!({
            "applied": true,
            "tracks": tracks,
            "resized_around": resized_around,
        }))
        .into_response(),
        Ok(SelectionOutcome::EngineUnavailable) => {
            Json(serde_json::json!({ "applied": false })).into_response()
        }
        Err(SelectionFailure::Catalog(e @ (CatalogError::Loading | CatalogError::Unavailable(_)))) => {
            error_response(
                StatusCode::SERVICE_UNAVAILABLE,
                create_safe_error_response("catalog_unavailable", &e.to_string(), None),
            )
        }
        Err(SelectionFailure::Catalog(e)) => error_response(
            StatusCode::BAD_REQUEST,
            create_safe_error_response("invalid_selection", &e.to_string(), None),
        ),
        Err(SelectionFailure::View(ViewError::TooManyDatasets(msg))) => error_response(
            StatusCode::BAD_REQUEST,
            create_safe_error_response("too_many_datasets", &msg, None),
        ),
        Err(SelectionFailure::View(ViewError::Engine(e))) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            create_safe_error_response(
                "engine_error",
                "The view could not be updated",
                Some(&e.to_string()),
            ),
        ),
    }
}

#[derive(Debug)]
enum SelectionFailure {
    Catalog(CatalogError),
    View(ViewError),
}

async fn apply_selection(
    state: &AppState,
    labels: &[String],
) -> Result<SelectionOutcome, SelectionFailure> {
    let catalog_state = state.catalog.read().await;
    let catalog = catalog_state.catalog().map_err(SelectionFailure::Catalog)?;
    let selected = catalog.select(labels).map_err(SelectionFailure::Catalog)?;

    state
        .views
        .apply_selection(Some(&state.engine), &selected)
        .await
        .map_err(SelectionFailure::View)
}

/// Navigate the view to a region expression
async fn navigate_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<NavigateRequest>,
) -> Response {
    match navigate(&state, &request.region).await {
        Ok(NavigationOutcome::Issued(command)) => Json(serde_json::json!({
            "region_error": false,
            "command": command,
        }))
        .into_response(),
        Ok(NavigationOutcome::Failed(failure)) => {
            let error_type = match failure {
                ValidationFailure::InvalidFormat(_) => "invalid_region_format",
                ValidationFailure::UnknownChromosome(_) => "unknown_chromosome",
            };
            let body = serde_json::json!({
                "region_error": true,
                "error": failure.to_string(),
                "error_type": error_type,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
        }
        Ok(NavigationOutcome::EngineUnavailable) => {
            Json(serde_json::json!({ "region_error": false })).into_response()
        }
        Err(NavigationError::ChromSizes(e)) => error_response(
            StatusCode::BAD_GATEWAY,
            create_safe_error_response(
                "chrom_sizes_unavailable",
                "Chromosome sizes could not be loaded",
                Some(&e.to_string()),
            ),
        ),
        Err(NavigationError::Engine(e)) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            create_safe_error_response(
                "engine_error",
                "The view could not be navigated",
                Some(&e.to_string()),
            ),
        ),
    }
}

async fn navigate(state: &AppState, region: &str) -> Result<NavigationOutcome, NavigationError> {
    // The table is resolved before the controller is locked; malformed input needs none
    let table = match parse_region(region) {
        Ok(_) => state.chromosome_table().await?,
        Err(_) => Arc::default(),
    };

    let mut controller = state.navigation.lock().await;
    Ok(controller
        .navigate(Some(&state.engine), region, &table)
        .await?)
}

/// The live view configuration
async fn viewconf_handler(State(state): State<Arc<AppState>>) -> Json<ViewConfig> {
    Json(state.engine.config())
}

/// SVG snapshot of the current view, offered as a download
async fn export_handler(State(state): State<Arc<AppState>>) -> Response {
    match export_snapshot(Some(&state.engine)) {
        Ok(Some(svg)) => {
            let disposition = format!(
                "attachment; filename=\"{}\"",
                state.settings.export_file_name.replace('"', "")
            );
            (
                [
                    (header::CONTENT_TYPE, "image/svg+xml; charset=utf-8".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                svg,
            )
                .into_response()
        }
        Ok(None) => StatusCode::SERVICE_UNAVAILABLE.into_response(),
        Err(e) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            create_safe_error_response("export_failed", "Export failed", Some(&e.to_string())),
        ),
    }
}
