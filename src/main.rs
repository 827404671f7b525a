pub mod attendance;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod events;
pub mod fees;
pub mod response;
pub mod students;
pub mod validation;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{delete, get, patch, post, put},
    Json, Router,
};
use tower::ServiceBuilder;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use auth::{AuthRepository, AuthService, TokenService};
use config::AppConfig;
use db::DbPool;
use fees::FeeService;
use response::ApiResponse;
use students::models::{
    Belt, CreateStudentRequest, Gender, StudentResponse, StudentStatus, UpdateStudentRequest,
};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        students::handlers::get_students,
        students::handlers::search_students,
        students::handlers::get_student,
        students::handlers::create_student,
        students::handlers::update_student,
        students::handlers::delete_student,
    ),
    components(
        schemas(StudentResponse, CreateStudentRequest, UpdateStudentRequest, Belt, Gender, StudentStatus)
    ),
    tags(
        (name = "students", description = "Student enrollment endpoints")
    ),
    info(
        title = "Dojo API",
        version = "1.0.0",
        description = "RESTful API for martial arts training center management"
    )
)]
struct ApiDoc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Arc<AppConfig>,
    pub tokens: TokenService,
    pub auth: AuthService,
    pub fees: FeeService,
}

impl AppState {
    pub fn new(db: DbPool, config: AppConfig) -> Self {
        let tokens = TokenService::from_config(&config);
        let auth = AuthService::new(AuthRepository::new(db.clone()), tokens.clone());
        let fees = FeeService::new(db.clone());

        Self {
            db,
            config: Arc::new(config),
            tokens,
            auth,
            fees,
        }
    }
}

/// Handler for GET /health
async fn health_handler() -> Json<ApiResponse<()>> {
    Json(ApiResponse::message("Dojo API is running"))
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    if config.allowed_origins.iter().any(|origin| origin == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Creates and configures the application router.
///
/// Three tiers: public routes, token-protected reads, and admin-only writes
/// behind the role-gating route layer.
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    let public = Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/auth/login", post(auth::handlers::login_handler));

    let protected = Router::new()
        .route("/api/auth/me", get(auth::handlers::me_handler))
        .route("/api/auth/logout", post(auth::handlers::logout_handler))
        .route("/api/students", get(students::handlers::get_students))
        .route(
            "/api/students/search",
            get(students::handlers::search_students),
        )
        .route("/api/students/:id", get(students::handlers::get_student))
        .route("/api/fees", get(fees::handlers::get_fees))
        .route(
            "/api/fees/history/:id",
            get(fees::handlers::get_payment_history),
        )
        .route(
            "/api/fees/student/:id",
            get(fees::handlers::get_student_fees),
        )
        .route("/api/fees/:id", get(fees::handlers::get_fee))
        .route(
            "/api/attendance/today",
            get(attendance::handlers::get_today_attendance),
        )
        .route(
            "/api/attendance/student/:id",
            get(attendance::handlers::get_student_attendance),
        )
        .route("/api/events", get(events::handlers::get_events))
        .route("/api/events/:id", get(events::handlers::get_event));

    let admin = Router::new()
        .route("/api/students", post(students::handlers::create_student))
        .route("/api/students/:id", put(students::handlers::update_student))
        .route(
            "/api/students/:id",
            delete(students::handlers::delete_student),
        )
        .route("/api/fees", post(fees::handlers::create_fee))
        .route("/api/fees/pending", get(fees::handlers::get_pending_fees))
        .route("/api/fees/overdue", get(fees::handlers::get_overdue_fees))
        .route("/api/fees/stats", get(fees::handlers::get_fee_stats))
        .route("/api/fees/:id/payment", post(fees::handlers::record_payment))
        .route("/api/fees/:id", patch(fees::handlers::update_fee))
        .route("/api/fees/:id", delete(fees::handlers::delete_fee))
        .route(
            "/api/attendance/mark",
            post(attendance::handlers::mark_by_face),
        )
        .route(
            "/api/attendance/mark-manual",
            post(attendance::handlers::mark_manual),
        )
        .route("/api/events", post(events::handlers::create_event))
        .route("/api/events/:id", put(events::handlers::update_event))
        .route("/api/events/:id", delete(events::handlers::delete_event))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth::require_admin,
        ));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public)
        .merge(protected)
        .merge(admin)
        .layer(ServiceBuilder::new().layer(cors))
        .with_state(state)
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("Dojo API - Starting...");

    let config = AppConfig::from_env().expect("Invalid configuration");

    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Migrations completed successfully");

    let addr = format!("{}:{}", config.host, config.port);
    let state = AppState::new(db_pool, config);

    // Per-client rate limiting, keyed on the peer address
    let governor_config = Box::new(
        GovernorConfigBuilder::default()
            .per_second(2)
            .burst_size(30)
            .finish()
            .expect("Invalid rate limiter configuration"),
    );
    let app = create_router(state).layer(GovernorLayer {
        config: Box::leak(governor_config),
    });

    tracing::info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Dojo API is running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Server error");
}

#[cfg(test)]
mod tests;
