/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use taskdeck_api::{app::{build_router, AppState}, config::Config};
/// use taskdeck_shared::{notify::LogNotifier, store::PgTaskStore};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let tasks = Arc::new(PgTaskStore::new(pool.clone()));
/// let state = AppState::new(pool, tasks, Arc::new(LogNotifier), config);
/// let app = build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::Next,
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use taskdeck_shared::{auth::middleware::jwt_auth_middleware, notify::Notifier, store::TaskStore};
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state, cloned into every handler
#[derive(Clone)]
pub struct AppState {
    /// Users and settings
    pub db: PgPool,

    /// Task persistence
    pub tasks: Arc<dyn TaskStore>,

    pub notifier: Arc<dyn Notifier>,

    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(
        db: PgPool,
        tasks: Arc<dyn TaskStore>,
        notifier: Arc<dyn Notifier>,
        config: Config,
    ) -> Self {
        Self {
            db,
            tasks,
            notifier,
            config: Arc::new(config),
        }
    }

    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete router
///
/// ```text
/// /
/// ├── GET /health
/// └── /v1/
///     ├── /auth/                    register, login, refresh (public), me
///     ├── /tasks/                   list, create, get, edit, complete
///     ├── /stats/                   dashboard, report, upcoming, recent
///     ├── /calendar/                marks, tasks on a date
///     └── /settings/                get, edit, push token
/// ```
///
/// Layers, outermost first: CORS, compression, tracing, then bearer
/// authentication on every `/v1` route except the public auth endpoints.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let secret = state.config.jwt.secret.clone();
    let require_auth = axum::middleware::from_fn(move |req: Request, next: Next| {
        jwt_auth_middleware(secret.clone(), req, next)
    });

    let public_auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh));

    let task_routes = Router::new()
        .route(
            "/",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route(
            "/:id",
            get(routes::tasks::get_task).patch(routes::tasks::update_task),
        )
        .route("/:id/complete", post(routes::tasks::complete_task));

    let stats_routes = Router::new()
        .route("/dashboard", get(routes::stats::dashboard))
        .route("/report", get(routes::stats::report))
        .route("/upcoming", get(routes::stats::upcoming))
        .route("/recent", get(routes::stats::recent));

    let calendar_routes = Router::new()
        .route("/", get(routes::calendar::calendar_marks))
        .route("/:date", get(routes::calendar::tasks_on_date));

    let settings_routes = Router::new()
        .route(
            "/",
            get(routes::settings::get_settings).patch(routes::settings::update_settings),
        )
        .route("/push-token", put(routes::settings::register_push_token));

    let protected_routes = Router::new()
        .route("/auth/me", get(routes::auth::me))
        .nest("/tasks", task_routes)
        .nest("/stats", stats_routes)
        .nest("/calendar", calendar_routes)
        .nest("/settings", settings_routes)
        .layer(require_auth);

    let v1_routes = Router::new()
        .nest("/auth", public_auth_routes)
        .merge(protected_routes);

    let cors = cors_layer(&state.config);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.allows_any_origin() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}
