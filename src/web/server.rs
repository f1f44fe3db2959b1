use axum::extract::rejection::JsonRejection;
use axum::extract::ConnectInfo;
use axum::http::header;
use axum::{
    extract::{DefaultBodyLimit, Query, State},
    http::{HeaderName, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::limit::ConcurrencyLimitLayer;
use tower::ServiceBuilder;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;

use crate::catalog::source::{DataLoader, SourceConfig};
use crate::catalog::view::{CardListView, ViewFilter};
use crate::cli::ServeArgs;
use crate::matching::engine::MatchingConfig;
use crate::render::caption::{image_path, split_title, DEFAULT_ICON_BASE};
use crate::render::results::{render_outcome, RenderOptions};
use crate::session::{CalcError, Calculator};
use crate::core::id::normalize;
use crate::utils::validation::{parse_id_list, InputError};

/// Security configuration constants to prevent `DoS` attacks
pub const MAX_REQUEST_BODY_SIZE: usize = 64 * 1024; // 64KB
pub const MAX_CLIENT_KEY_LENGTH: usize = 128;
pub const MAX_COLOR_LENGTH: usize = 32;

/// Matches returned when the request sets no limit
pub const DEFAULT_RESULT_LIMIT: usize = 100;
pub const MAX_RESULT_LIMIT: usize = 1000;

/// Route a local icon directory is served under
pub const LOCAL_ICON_ROUTE: &str = "/card_icons";

/// Server configuration
#[derive(Debug, Clone)]
pub struct WebConfig {
    pub source: SourceConfig,
    /// Icon URL prefix handed to the browser
    pub icon_base: String,
    /// Local icon directory served under [`LOCAL_ICON_ROUTE`]; replaces `icon_base`
    pub icon_dir: Option<PathBuf>,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            icon_base: DEFAULT_ICON_BASE.to_string(),
            icon_dir: None,
        }
    }
}

impl From<&ServeArgs> for WebConfig {
    fn from(args: &ServeArgs) -> Self {
        Self {
            source: args.source.to_config(),
            icon_base: args.icon_base.clone(),
            icon_dir: args.icon_dir.clone(),
        }
    }
}

/// Shared application state
pub struct AppState {
    pub calculator: Calculator,
    pub icon_base: String,
}

/// Enhanced error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_type: String,
    pub details: Option<String>,
}

/// Body of `POST /api/calculate`
#[derive(Debug, Deserialize)]
pub struct CalculateRequest {
    /// Comma-separated player-facing card IDs
    pub ids: String,
    /// Browser-chosen key; a newer request with the same key supersedes
    /// an older one still loading
    pub client: Option<String>,
    /// Highlight colour for unowned cards in strict results
    pub highlight: Option<String>,
    /// Highlight colour for unowned cards in relaxed results
    pub relaxed_highlight: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Deserialize)]
struct CardsQueryParams {
    high_rarity_only: Option<bool>,
    /// Current selection, comma-separated player-facing IDs
    selected: Option<String>,
    /// Toggle every listed SR card in the selection
    toggle_all_sr: Option<bool>,
}

/// Create a safe error response that prevents information disclosure
/// while logging detailed errors server-side for debugging
pub fn create_safe_error_response(
    error_type: &str,
    user_message: &str,
    internal_error: Option<&str>,
) -> ErrorResponse {
    // Log detailed error server-side for debugging (not exposed to client)
    if let Some(internal_msg) = internal_error {
        tracing::error!("Internal error ({}): {}", error_type, internal_msg);
    }

    ErrorResponse {
        error: user_message.to_string(),
        error_type: error_type.to_string(),
        details: None, // Never expose internal details to prevent information disclosure
    }
}

fn error_response(status: StatusCode, body: ErrorResponse) -> Response {
    (status, Json(body)).into_response()
}

/// Run the web server
///
/// # Errors
///
/// Returns an error if the tokio runtime cannot be created or the server fails to start.
pub fn run(args: ServeArgs) -> anyhow::Result<()> {
    // Build tokio runtime
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move { run_server(args).await })
}

/// Create the application router with all routes and middleware configured.
///
/// # Errors
///
/// Returns an error if the HTTP client or the rate limiter cannot be built,
/// or if the icon directory does not exist.
pub fn create_router(config: WebConfig) -> anyhow::Result<Router> {
    let loader = DataLoader::new(config.source)?;
    let calculator = Calculator::new(loader, MatchingConfig::default());

    let icon_base = match &config.icon_dir {
        Some(dir) if !dir.is_dir() => {
            anyhow::bail!("Icon directory {} does not exist", dir.display())
        }
        Some(_) => LOCAL_ICON_ROUTE.to_string(),
        None => config.icon_base,
    };
    let state = Arc::new(AppState {
        calculator,
        icon_base,
    });

    // Configure IP-based rate limiting
    let governor_conf = GovernorConfigBuilder::default()
        .per_second(10) // 10 requests per second per IP
        .burst_size(50) // Allow bursts of 50 requests
        .finish()
        .ok_or_else(|| anyhow::anyhow!("Invalid rate limiter configuration"))?;

    let mut router = Router::new()
        .route("/", get(index_handler))
        .route("/api/calculate", post(calculate_handler))
        .route("/api/cards", get(cards_handler))
        // Static file routes
        .route("/static/css/styles.css", get(styles_css_handler))
        .route("/static/js/main.js", get(main_js_handler));
    if let Some(dir) = config.icon_dir {
        tracing::info!("Serving card icons from {}", dir.display());
        router = router.nest_service(LOCAL_ICON_ROUTE, ServeDir::new(dir));
    }

    // Build router with comprehensive security layers
    let app = router
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                // Security headers for browser protection
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("x-content-type-options"),
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("x-frame-options"),
                    HeaderValue::from_static("DENY"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("x-xss-protection"),
                    HeaderValue::from_static("1; mode=block"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("strict-transport-security"),
                    HeaderValue::from_static("max-age=31536000; includeSubDomains"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("referrer-policy"),
                    HeaderValue::from_static("strict-origin-when-cross-origin"),
                ))
                // IP-based rate limiting to prevent abuse
                .layer(GovernorLayer {
                    config: Arc::new(governor_conf),
                })
                // Request timeout, longer than the data-load timeout so that
                // load failures are reported as such
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    Duration::from_secs(90),
                ))
                // Limit concurrent requests to prevent DOS
                .layer(ConcurrencyLimitLayer::new(100))
                // Calculation requests are small JSON bodies
                .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_SIZE)),
        );

    Ok(app)
}

async fn run_server(args: ServeArgs) -> anyhow::Result<()> {
    let app = create_router(WebConfig::from(&args))?;

    let addr = format!("{}:{}", args.address, args.port);
    println!("Starting deck-solver web server at http://{addr}");

    if args.open {
        if let Err(e) = open::that(format!("http://{addr}")) {
            tracing::warn!("Could not open browser: {e}");
        }
    }

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Main page handler
async fn index_handler() -> Html<&'static str> {
    Html(include_str!("templates/index.html"))
}

/// Static CSS handler
async fn styles_css_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        include_str!("static/css/styles.css"),
    )
}

async fn main_js_handler() -> impl IntoResponse {
    (
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        include_str!("static/js/main.js"),
    )
}

/// Accept only short colour strings made of characters CSS colours use
fn sanitize_color(color: Option<String>, default: &str) -> String {
    color
        .filter(|c| {
            !c.is_empty()
                && c.len() <= MAX_COLOR_LENGTH
                && c.chars()
                    .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '#' | '(' | ')' | ',' | '.' | ' ' | '%'))
        })
        .unwrap_or_else(|| default.to_string())
}

/// API endpoint for running a calculation
async fn calculate_handler(
    State(state): State<Arc<AppState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    body: Result<Json<CalculateRequest>, JsonRejection>,
) -> Response {
    let start_time = std::time::Instant::now();

    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                create_safe_error_response(
                    "invalid_request",
                    "Request body must be JSON with an \"ids\" field",
                    Some(&rejection.body_text()),
                ),
            );
        }
    };

    // Without a client key, requests from the same address supersede each other
    let client = request
        .client
        .as_deref()
        .filter(|c| !c.is_empty() && c.len() <= MAX_CLIENT_KEY_LENGTH)
        .map_or_else(|| peer.ip().to_string(), |c| format!("{}/{c}", peer.ip()));

    let defaults = RenderOptions::default();
    let options = RenderOptions {
        highlight: sanitize_color(request.highlight, &defaults.highlight),
        relaxed_highlight: sanitize_color(request.relaxed_highlight, &defaults.relaxed_highlight),
        limit: Some(
            request
                .limit
                .unwrap_or(DEFAULT_RESULT_LIMIT)
                .min(MAX_RESULT_LIMIT),
        ),
        icon_base: state.icon_base.clone(),
    };

    let calculation = match state.calculator.calculate(&client, &request.ids).await {
        Ok(calculation) => calculation,
        Err(CalcError::Input(e)) => {
            // Don't echo the submitted text back
            let message = match e {
                InputError::InvalidFormat(_) => {
                    "Input must be a comma-separated list of card IDs".to_string()
                }
                other => other.to_string(),
            };
            return error_response(
                StatusCode::BAD_REQUEST,
                create_safe_error_response("invalid_input", &message, None),
            );
        }
        Err(CalcError::Superseded) => {
            return error_response(
                StatusCode::CONFLICT,
                create_safe_error_response(
                    "superseded",
                    "A newer calculation replaced this one",
                    None,
                ),
            );
        }
        Err(e @ CalcError::Source(_)) => {
            return error_response(
                StatusCode::BAD_GATEWAY,
                create_safe_error_response(
                    "calculation_failed",
                    "Calculation failed. Please try again later.",
                    Some(&e.to_string()),
                ),
            );
        }
    };

    let rendered = render_outcome(
        &calculation.outcome,
        &calculation.owned,
        &calculation.catalog,
        &options,
    );

    #[allow(clippy::cast_possible_truncation)] // Processing time won't exceed u64
    let processing_time = start_time.elapsed().as_millis() as u64;

    Json(serde_json::json!({
        "input_count": calculation.input_ids.len(),
        "owned": rendered.owned,
        "pass": rendered.pass,
        "total": rendered.total,
        "matches": rendered.matches,
        "message": rendered.message,
        "processing_info": {
            "processing_time_ms": processing_time,
            "skipped_solutions": calculation.skipped_solutions,
            "result_limit": options.limit,
        }
    }))
    .into_response()
}

/// API endpoint listing the catalog for the card picker, and applying
/// picker actions to the caller's selection
async fn cards_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CardsQueryParams>,
) -> Response {
    let selection = match params.selected.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(raw) => match parse_id_list(raw) {
            Ok(ids) => ids,
            Err(_) => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    create_safe_error_response(
                        "invalid_input",
                        "Selection must be a comma-separated list of card IDs",
                        None,
                    ),
                );
            }
        },
        None => Vec::new(),
    };

    let catalog = match state.calculator.loader().load_catalog().await {
        Ok(catalog) => catalog,
        Err(e) => {
            return error_response(
                StatusCode::BAD_GATEWAY,
                create_safe_error_response(
                    "catalog_unavailable",
                    "Card catalog could not be loaded. Please try again later.",
                    Some(&e.to_string()),
                ),
            );
        }
    };

    let mut view = CardListView::new();
    if params.high_rarity_only.unwrap_or(false) {
        view.toggle_filter();
    }
    for id in selection {
        view.select(normalize(id));
    }
    if params.toggle_all_sr.unwrap_or(false) {
        view.toggle_all_sr(&catalog);
    }

    let cards: Vec<serde_json::Value> = view
        .visible_cards(&catalog)
        .into_iter()
        .map(|card| {
            let caption = split_title(&card.title);
            serde_json::json!({
                "id": card.external_id(),
                "rarity": card.rarity,
                "title": caption.title,
                "character": caption.character,
                "image": image_path(&state.icon_base, card.id),
                "selected": view.is_selected(card.id),
            })
        })
        .collect();

    Json(serde_json::json!({
        "count": cards.len(),
        "high_rarity_only": view.filter() == ViewFilter::ShowingHighRarityOnly,
        "cards": cards,
        "selected": view.selected_id_string(),
    }))
    .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_error_response_hides_details() {
        let response =
            create_safe_error_response("calculation_failed", "Try again", Some("secret path"));
        assert_eq!(response.error, "Try again");
        assert_eq!(response.error_type, "calculation_failed");
        assert!(response.details.is_none());
    }

    #[test]
    fn test_sanitize_color() {
        assert_eq!(sanitize_color(Some("#ff0000".into()), "pink"), "#ff0000");
        assert_eq!(sanitize_color(Some("rgb(1, 2, 3)".into()), "pink"), "rgb(1, 2, 3)");
        assert_eq!(sanitize_color(Some("red;}</style>".into()), "pink"), "pink");
        assert_eq!(sanitize_color(Some(String::new()), "pink"), "pink");
        assert_eq!(sanitize_color(Some("a".repeat(100)), "pink"), "pink");
        assert_eq!(sanitize_color(None, "pink"), "pink");
    }
}
