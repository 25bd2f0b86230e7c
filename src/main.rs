use axum::{
    http::StatusCode,
    middleware::from_fn,
    routing::{delete, get, patch, post, put},
    Json, Router,
};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use harmony_api::config;
use harmony_api::database::Database;
use harmony_api::handlers;
use harmony_api::middleware::jwt_auth_middleware;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, ACCESS_TOKEN_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("Starting Harmony API in {:?} mode", config.environment);

    // Acquire the shared pool up front. A dead store is logged, /health
    // reports degraded, and data routes answer 503 until a restart.
    if let Err(e) = Database::init().await {
        tracing::error!("database init failed: {}", e);
    }

    let app = app();

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("Harmony server listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server");

    Database::close().await;
}

fn app() -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Token issuance (unguarded)
        .route("/jwt", post(handlers::token::issue))
        // Open data routes
        .merge(class_routes())
        .merge(user_routes())
        .merge(order_routes())
        // Routes behind the bearer-token gate
        .merge(gated_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn class_routes() -> Router {
    use handlers::classes;

    Router::new()
        .route("/classes", get(classes::list_all).post(classes::create))
        .route("/popularAllClass", get(classes::list_popular))
        .route("/updateInsData/:id", put(classes::update_details))
        .route("/approved/:id", patch(classes::approve))
        .route("/deny/:id", patch(classes::deny))
}

fn user_routes() -> Router {
    use handlers::users;

    Router::new()
        .route("/users", post(users::create))
        .route("/makeInstructor/:id", patch(users::make_instructor))
        .route("/makeAdmin/:id", patch(users::make_admin))
        .route("/student/:id", patch(users::make_student))
}

fn order_routes() -> Router {
    use handlers::orders;

    Router::new()
        // Trailing slash is part of the published path
        .route("/selectCurse/", post(orders::create))
        .route("/classDelete/:id", delete(orders::delete))
}

fn gated_routes() -> Router {
    use handlers::{classes, orders, users};

    Router::new()
        .route("/classes/:email", get(classes::list_by_instructor))
        .route("/allClasses", get(classes::list_all_admin))
        .route("/allUsers", get(users::list_all))
        .route("/selectClass/:email", get(orders::list_by_user))
        .route_layer(from_fn(jwt_auth_middleware))
}

async fn root() -> &'static str {
    "Harmony server is running"
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match Database::health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "degraded",
                "timestamp": now,
                "database_error": e.to_string()
            })),
        ),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
