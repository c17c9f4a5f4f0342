use axum::{routing::get, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use mpj_api::middleware;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, MPJ_JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Initialize configuration (this loads the config singleton)
    let config = mpj_api::config::config();
    tracing::info!("Starting MPJ API in {:?} mode", config.environment);

    let app = app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("MPJ_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("🚀 MPJ API server listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app() -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Public auth routes
        .merge(auth_public_routes())
        // Edge-function tier (service key auth)
        .merge(edge_routes())
        // Protected API (JWT + live profile)
        .merge(api_routes())
        .merge(admin_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn auth_public_routes() -> Router {
    use axum::routing::post;
    use mpj_api::handlers::public::auth;

    Router::new().route("/auth/login", post(auth::login))
}

/// OTP verification and dev seeding: the Supabase-edge-function
/// equivalents. Callers authenticate with the deployment's service key.
fn edge_routes() -> Router {
    use axum::routing::post;
    use mpj_api::handlers::public::auth;

    Router::new()
        .route("/auth/otp/request", post(auth::otp_request))
        .route("/auth/otp/verify", post(auth::otp_verify))
        .route("/auth/dev/seed", post(auth::dev_seed))
        .layer(axum::middleware::from_fn(middleware::service_key_middleware))
}

fn api_routes() -> Router {
    use axum::routing::post;
    use mpj_api::handlers::protected::{auth, claims, gate};

    Router::new()
        .route("/api/auth/whoami", get(auth::whoami))
        .route("/api/gate/route", post(gate::route_post))
        .route("/api/claims", post(claims::claim_post))
        .route("/api/claims/mine", get(claims::claim_mine_get))
        .layer(axum::middleware::from_fn(middleware::validate_profile_middleware))
        .layer(axum::middleware::from_fn(middleware::jwt_auth_middleware))
}

fn admin_routes() -> Router {
    use axum::routing::post;
    use mpj_api::handlers::elevated::{accounts, claims, payments};

    Router::new()
        .route("/api/admin/claims", get(claims::claims_list_get))
        .route("/api/admin/claims/:id/approve", post(claims::claim_approve_post))
        .route("/api/admin/claims/:id/reject", post(claims::claim_reject_post))
        .route("/api/admin/accounts/:id/activate", post(accounts::account_activate_post))
        .route("/api/admin/accounts/:id/reject", post(accounts::account_reject_post))
        .route("/api/admin/payments", get(payments::payments_list_get))
        .route("/api/admin/payments/:id/settle", post(payments::payment_settle_post))
        .layer(axum::middleware::from_fn(middleware::validate_profile_middleware))
        .layer(axum::middleware::from_fn(middleware::jwt_auth_middleware))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "MPJ API",
            "version": version,
            "description": "Membership and administration backend for the MPJ pesantren media network",
            "endpoints": {
                "home": "/ (public)",
                "login": "/auth/login (public - token acquisition)",
                "otp": "/auth/otp/request, /auth/otp/verify (service key)",
                "seed": "/auth/dev/seed (service key, development only)",
                "auth": "/api/auth/whoami (protected)",
                "gate": "/api/gate/route (protected)",
                "claims": "/api/claims, /api/claims/mine (protected)",
                "admin": "/api/admin/claims[/:id/approve|reject], /api/admin/accounts/:id/[activate|reject], /api/admin/payments[/:id/settle] (admin roles)",
            }
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match mpj_api::database::manager::DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
