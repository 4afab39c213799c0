use std::time::Duration;

use axum::{
    middleware,
    routing::{get, post, put, MethodRouter},
    Router,
};
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::handlers::{
    self, auth, messages, method_not_allowed, notifications, orders, posts, products, tutorials, users,
};
use crate::middleware::{cors, jwt_auth_middleware};
use crate::state::AppState;

/// Build the full application: every route at the root and again under
/// `/api`, wrapped in the CORS, timeout, body-limit, and trace layers.
pub fn app(state: AppState) -> Router {
    let config = state.config.clone();
    let routes = routes(&state);

    Router::new()
        .merge(routes.clone())
        .nest("/api", routes)
        .fallback(handlers::route_not_found)
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(config.server.max_request_size_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(config.server.request_timeout_secs)))
        .layer(middleware::from_fn(cors::preflight_middleware))
        .layer(cors::allow_headers_header())
        .layer(cors::allow_methods_header())
        .layer(cors::cors_layer(&config.security))
        .layer(TraceLayer::new_for_http())
}

/// Unsupported methods on a known path answer 405 with a JSON body
fn allow(methods: MethodRouter<AppState>) -> MethodRouter<AppState> {
    methods.fallback(method_not_allowed)
}

fn routes(state: &AppState) -> Router<AppState> {
    let session = middleware::from_fn_with_state(state.clone(), jwt_auth_middleware);
    let protect = |methods: MethodRouter<AppState>| methods.route_layer(session.clone());

    Router::new()
        .route("/", allow(get(handlers::root)))
        .route("/health", allow(get(handlers::health)))
        // Token acquisition
        .route("/auth/login", allow(post(auth::login)))
        .route("/auth/register", allow(post(auth::register)))
        .route("/auth-register", allow(post(auth::register)))
        // Posts
        .route("/posts", allow(get(posts::list).merge(protect(post(posts::create)))))
        .route("/posts/user/:user_id", allow(get(posts::list_by_user)))
        .route(
            "/posts/:id",
            allow(get(posts::get).merge(protect(put(posts::update).delete(posts::delete)))),
        )
        .route(
            "/posts/:id/comments",
            allow(get(posts::comments::list).merge(protect(post(posts::comments::create)))),
        )
        .route(
            "/posts/:id/comments/:comment_id",
            allow(protect(put(posts::comments::update).delete(posts::comments::delete))),
        )
        .route(
            "/posts/:id/reactions",
            allow(protect(post(posts::reactions::react).delete(posts::reactions::clear))),
        )
        // Marketplace
        .route("/products", allow(get(products::list).merge(protect(post(products::create)))))
        .route("/products/seller/:seller_id", allow(get(products::list_by_seller)))
        .route(
            "/products/:id",
            allow(get(products::get).merge(protect(put(products::update).delete(products::delete)))),
        )
        .route("/orders", allow(get(orders::list).merge(protect(post(orders::create)))))
        .route("/orders/:id", allow(get(orders::get)))
        // Tutorials
        .route("/tutorials", allow(get(tutorials::list).merge(protect(post(tutorials::create)))))
        .route("/tutorials/user/:user_id", allow(get(tutorials::list_by_user)))
        .route(
            "/tutorials/:id",
            allow(get(tutorials::get).merge(protect(put(tutorials::update).delete(tutorials::delete)))),
        )
        .route(
            "/tutorials/:id/progress",
            allow(protect(get(tutorials::get_progress).post(tutorials::record_progress))),
        )
        // Messages and notifications, always scoped to the caller
        .route("/messages", allow(protect(get(messages::list).post(messages::send))))
        .route("/messages/seller/:id", allow(protect(get(messages::list_for_seller))))
        .route("/messages/buyer/:id", allow(protect(get(messages::list_for_buyer))))
        .route("/messages/unread/:id", allow(protect(get(messages::list_unread))))
        .route("/messages/conversations/:id", allow(protect(get(messages::list_conversations))))
        .route("/messages/:id/read", allow(protect(put(messages::mark_read))))
        .route("/messages/:id/reply", allow(protect(post(messages::reply))))
        .route("/notifications/unread", allow(protect(get(notifications::unread))))
        .route("/notifications/:id/read", allow(protect(put(notifications::mark_read))))
        // Users
        .route("/users", allow(get(users::list).post(users::create)))
        .route("/users/suggestions", allow(get(users::suggestions)))
        .route("/users-suggestions", allow(get(users::suggestions)))
        .route(
            "/users/:id",
            allow(get(users::get).merge(protect(put(users::update_profile)))),
        )
        .route("/users/:id/follow", allow(protect(post(users::follow))))
        .route("/users/:id/unfollow", allow(protect(post(users::unfollow))))
        .route("/users/:id/followers", allow(get(users::followers)))
        .route("/users/:id/following", allow(get(users::following)))
}

/// Bind the configured port and serve until Ctrl-C
pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    let port = config.server.port;
    let state = AppState::new(config);
    let app = app(state);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind {}: {}", bind_addr, e))?;

    tracing::info!("Dry Craft API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
