use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware,
    routing::{delete, get, patch, post},
    Router,
};
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::SessionStore;
use crate::config::{AppConfig, SecurityConfig};
use crate::database::{codec_for, InspectionStore};
use crate::handlers::{elevated, protected, public};
use crate::middleware::{require_admin_middleware, session_auth_middleware};
use crate::services::OrganizationLookup;

/// Shared state handed to every handler. Built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub pool: PgPool,
    pub sessions: SessionStore,
    pub inspections: InspectionStore,
    pub organization_lookup: Arc<dyn OrganizationLookup>,
}

impl AppState {
    pub fn new(config: AppConfig, pool: PgPool, organization_lookup: Arc<dyn OrganizationLookup>) -> Self {
        let lists = codec_for(config.database.list_encoding);
        Self {
            inspections: InspectionStore::new(pool.clone(), lists),
            config: Arc::new(config),
            pool,
            sessions: SessionStore::new(),
            organization_lookup,
        }
    }
}

/// Full router: every route is served at the root and again under `/api`
pub fn app(state: AppState) -> Router {
    let routes = Router::new()
        .merge(public_routes())
        .merge(protected_routes(state.clone()))
        .merge(admin_routes(state.clone()))
        .with_state(state.clone());

    Router::new()
        .merge(routes.clone())
        .nest("/api", routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&state.config.security))
                .layer(DefaultBodyLimit::max(state.config.api.max_request_size_bytes)),
        )
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(public::health::health))
        .route("/auth/login", post(public::auth::login))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use protected::{auth, dadata, inspections, verification_areas};

    Router::new()
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .route("/inspections", get(inspections::list).post(inspections::create))
        .route(
            "/inspections/:id",
            get(inspections::get).put(inspections::update).delete(inspections::delete),
        )
        .route("/inspections/:id/export/docx", get(inspections::export_docx))
        .route(
            "/verification-areas",
            get(verification_areas::get).put(verification_areas::put),
        )
        .route("/dadata/organization", post(dadata::organization))
        .route_layer(middleware::from_fn_with_state(state, session_auth_middleware))
}

fn admin_routes(state: AppState) -> Router<AppState> {
    use elevated::{employees, users};

    Router::new()
        .route("/users", get(users::list).post(users::create))
        .route("/users/:id", delete(users::delete))
        .route("/users/:id/role", patch(users::update_role))
        .route("/employees", get(employees::list).post(employees::create))
        .route("/employees/:id", delete(employees::delete))
        // Layers run outermost-last: session first, then the role check
        .route_layer(middleware::from_fn(require_admin_middleware))
        .route_layer(middleware::from_fn_with_state(state, session_auth_middleware))
}

/// Credentialed CORS for the configured origins only
fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}
