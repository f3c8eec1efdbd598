//! Tally Web Server
//!
//! Axum-based JSON API for the Tally personal finance tracker.
//!
//! - Caller identity comes from the `X-User-Id` header (authentication is
//!   handled upstream); requests without a valid id get 401
//! - Restrictive CORS policy
//! - Input validation (pagination limits, trend window bounds)
//! - Sanitized error responses

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use tally_core::{AnalyticsConfig, Database};

mod handlers;

/// Maximum pagination limit
pub const MAX_PAGE_LIMIT: i64 = 1000;

/// Header carrying the authenticated user's numeric id
pub const USER_ID_HEADER: &str = "x-user-id";

/// Environment variable with comma-separated allowed CORS origins
pub const ALLOWED_ORIGINS_ENV: &str = "TALLY_ALLOWED_ORIGINS";

/// Server configuration
#[derive(Clone, Default)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
    /// Analytics tunables (trend bounds, default alert threshold)
    pub analytics: AnalyticsConfig,
}

impl ServerConfig {
    /// Build config from `TALLY_ALLOWED_ORIGINS` and the analytics config file
    pub fn from_env() -> tally_core::Result<Self> {
        let allowed_origins = std::env::var(ALLOWED_ORIGINS_ENV)
            .map(|v| parse_origins(&v))
            .unwrap_or_default();

        Ok(Self {
            allowed_origins,
            analytics: AnalyticsConfig::load()?,
        })
    }
}

/// Parse a comma-separated origin list, skipping blanks
pub fn parse_origins(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Shared application state
pub struct AppState {
    pub db: Database,
    pub config: ServerConfig,
    /// Fixed "today" for date-relative reports (for testing); None = current UTC date
    pub today: Option<NaiveDate>,
}

impl AppState {
    /// The date reports are computed relative to
    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Utc::now().date_naive())
    }
}

/// Identity of the caller, inserted by `user_middleware`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub i64);

/// Resolve the caller from `X-User-Id`; reject the request when it is missing or malformed
async fn user_middleware(mut request: Request, next: Next) -> Response {
    let user_id = request
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|id| *id > 0);

    match user_id {
        Some(id) => {
            request.extensions_mut().insert(CurrentUser(id));
            next.run(request).await
        }
        None => {
            warn!(path = %request.uri().path(), "Unauthorized request - missing or invalid user id");
            (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({
                    "error": "Authentication required"
                })),
            )
                .into_response()
        }
    }
}

/// Success response
#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Create the application router
pub fn create_router(db: Database, config: ServerConfig) -> Router {
    create_router_with_options(db, config, None)
}

/// Create the application router with additional options (for testing)
pub fn create_router_with_options(
    db: Database,
    config: ServerConfig,
    today: Option<NaiveDate>,
) -> Router {
    let state = Arc::new(AppState {
        db,
        config: config.clone(),
        today,
    });

    let api_routes = Router::new()
        // Analytics
        .route("/dashboard/stats", get(handlers::get_dashboard_stats))
        .route("/analytics/categories", get(handlers::get_category_breakdown))
        .route("/analytics/trends", get(handlers::get_spending_trends))
        // Budgets
        .route(
            "/budgets",
            get(handlers::list_budgets).post(handlers::create_budget),
        )
        .route("/budgets/:id", delete(handlers::delete_budget))
        .route("/budgets/:id/progress", get(handlers::get_budget_progress))
        // Transactions
        .route(
            "/transactions",
            get(handlers::list_transactions).post(handlers::create_transaction),
        )
        .route(
            "/transactions/:id",
            patch(handlers::update_transaction).delete(handlers::delete_transaction),
        )
        // Categories
        .route(
            "/categories",
            get(handlers::list_categories).post(handlers::create_category),
        )
        .route("/categories/:id", delete(handlers::delete_category))
        // Goals
        .route("/goals", get(handlers::list_goals).post(handlers::create_goal))
        .route("/goals/:id", delete(handlers::delete_goal))
        .route("/goals/:id/progress", post(handlers::add_goal_progress))
        .layer(middleware::from_fn(user_middleware))
        // Health check stays reachable without a user id
        .route("/health", get(handlers::health));

    // Build CORS layer
    let methods = [
        Method::GET,
        Method::POST,
        Method::PATCH,
        Method::DELETE,
        Method::OPTIONS,
    ];
    let allowed_headers = [
        header::CONTENT_TYPE,
        header::HeaderName::from_static(USER_ID_HEADER),
    ];
    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods(methods)
            .allow_headers(allowed_headers)
    } else {
        // Allow specified origins
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(allowed_headers)
    };

    Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
}

/// Start the server
pub async fn serve(db: Database, host: &str, port: u16) -> anyhow::Result<()> {
    let config = ServerConfig::from_env()?;
    serve_with_config(db, host, port, config).await
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    db: Database,
    host: &str,
    port: u16,
    config: ServerConfig,
) -> anyhow::Result<()> {
    match db.seed_default_categories() {
        Ok(count) if count > 0 => info!("Seeded {} default categories", count),
        Ok(_) => {}
        Err(e) => warn!("Failed to seed default categories: {}", e),
    }

    if config.allowed_origins.is_empty() {
        info!("CORS: same-origin only (set {} to allow others)", ALLOWED_ORIGINS_ENV);
    }

    let app = create_router(db, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn internal(msg: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            internal: None,
        }
    }

    /// Map a core error from a CRUD operation
    ///
    /// Validation and lookup failures keep their message; everything else is
    /// reported generically and logged.
    pub fn from_core(err: tally_core::Error) -> Self {
        match err {
            tally_core::Error::InvalidInput(_) | tally_core::Error::InvalidPeriod(_) => {
                Self::bad_request(&err.to_string())
            }
            tally_core::Error::NotFound(_) => Self::not_found(&err.to_string()),
            other => other.into(),
        }
    }

    /// Map a failure inside an analytics computation
    ///
    /// An unknown period is the caller's fault (400); any other failure yields
    /// a generic 500 with no partial result.
    pub fn analytics(err: tally_core::Error) -> Self {
        match err {
            tally_core::Error::InvalidPeriod(_) => Self::bad_request(&err.to_string()),
            other => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: "Failed to compute analytics".to_string(),
                internal: Some(other.into()),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}
