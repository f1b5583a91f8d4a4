//! # kitchenctl: Kitchen Admin Service
//!
//! `kitchenctl` is an internal administration service for a restaurant kitchen. Logged-in staff
//! browse, search, create, update and delete the three catalog entities of the kitchen (dish
//! types, cooks and dishes) through a JSON REST API, and a public overview endpoint reports
//! how many of each exist.
//!
//! ## Architecture
//!
//! The application is built on [Axum](https://github.com/tokio-rs/axum) for the HTTP layer. Records
//! live either in PostgreSQL (production, migrations embedded in the binary) or in an in-memory
//! store (tests and local demos); both sit behind the [`db::store::CatalogStore`] trait.
//!
//! ### Request Flow
//!
//! A request to `/admin/api/v1/*` first passes the [`auth::middleware::require_login`] layer, which
//! resolves the session cookie issued by `/authentication/login` to the logged-in cook. The handler
//! then calls one of the two catalog services:
//!
//! - [`catalog::QueryService`]: listing, substring search, per-type dish counts, single-record
//!   fetches and the overview counts. Never mutates.
//! - [`catalog::MutationService`]: validated create, update and delete. Store constraint errors are
//!   translated into field-level validation errors or conflicts.
//!
//! Every service call is a single unit of work: PostgreSQL mutations run in one transaction, the
//! in-memory store takes one write lock.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use kitchenctl::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = kitchenctl::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     kitchenctl::telemetry::init_telemetry(config.enable_otel_export)?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         let _ = tokio::signal::ctrl_c().await;
//!     })
//!     .await
//! }
//! ```
//!
//! ## Configuration
//!
//! See the [`config`] module for configuration options.
pub mod api;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod db;
pub mod errors;
mod openapi;
pub mod telemetry;
pub mod types;

#[cfg(test)]
pub mod test_utils;

use crate::{
    api::models::cooks::{CookCreate, CookUpdate},
    auth::middleware::require_login,
    catalog::{MutationService, QueryService},
    config::{CorsOrigin, DatabaseConfig, PoolSettings},
    db::store::{CatalogStore, InMemoryStore, PostgresStore},
    openapi::AdminApiDoc,
};
use axum::{
    Router,
    http::{self, HeaderName, HeaderValue},
    middleware::from_fn_with_state,
    routing::{get, post},
};
pub use config::Config;
use sqlx::{
    ConnectOptions, PgPool,
    postgres::{PgConnectOptions, PgPoolOptions},
};
use std::{str::FromStr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, debug, info, instrument};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

pub use types::{CookId, DishId, DishTypeId};

/// Application state shared across all request handlers.
///
/// Both services hold the same store, so a handler sees its own writes immediately.
///
/// # Example
///
/// ```ignore
/// let state = AppState::builder()
///     .store(Arc::new(InMemoryStore::new()))
///     .config(config)
///     .build();
/// ```
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub query: QueryService,
    pub mutation: MutationService,
}

#[bon::bon]
impl AppState {
    #[builder]
    pub fn new(store: Arc<dyn CatalogStore>, config: Config) -> Self {
        let mutation = MutationService::new(
            store.clone(),
            config.catalog.dish_type_delete_policy,
            config.auth.password.clone(),
        );
        Self {
            query: QueryService::new(store),
            mutation,
            config,
        }
    }
}

/// Get the kitchenctl database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Make sure the configured initial cook can log in.
///
/// Creates the cook if no cook has `admin_username`; otherwise resets their password to
/// `admin_password` when one is configured. Idempotent, called on every startup.
#[instrument(skip_all, fields(username = %state.config.admin_username))]
pub async fn create_initial_cook(state: &AppState) -> errors::Result<CookId> {
    let username = state.config.admin_username.clone();
    let password = state.config.admin_password.clone();

    if let Some(existing) = state.query.get_cook_by_username(&username).await? {
        if password.is_some() {
            state
                .mutation
                .update_cook(
                    existing.id,
                    CookUpdate {
                        password,
                        ..Default::default()
                    },
                )
                .await?;
            info!(cook_id = existing.id, "Reset password of initial cook");
        }
        return Ok(existing.id);
    }

    let created = state
        .mutation
        .create_cook(CookCreate {
            username,
            first_name: None,
            last_name: None,
            years_of_experience: None,
            password,
        })
        .await?;
    info!(cook_id = created.id, "Created initial cook");
    Ok(created.id)
}

fn pool_options(settings: &PoolSettings) -> PgPoolOptions {
    let optional_secs = |secs: u64| (secs > 0).then(|| Duration::from_secs(secs));
    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs))
        .idle_timeout(optional_secs(settings.idle_timeout_secs))
        .max_lifetime(optional_secs(settings.max_lifetime_secs))
}

/// Open the configured record store. For PostgreSQL this also runs the migrations and
/// returns the pool so it can be closed on shutdown.
async fn setup_store(config: &Config) -> anyhow::Result<(Arc<dyn CatalogStore>, Option<PgPool>)> {
    match &config.database {
        DatabaseConfig::External { url, pool } => {
            info!("Using external database");
            let connect_options = PgConnectOptions::from_str(url)?.log_slow_statements(
                log::LevelFilter::Warn,
                Duration::from_millis(config.slow_statement_threshold_ms),
            );
            let pool = pool_options(pool).connect_with(connect_options).await?;
            migrator().run(&pool).await?;
            let store: Arc<dyn CatalogStore> = Arc::new(PostgresStore::new(pool.clone()));
            Ok((store, Some(pool)))
        }
        DatabaseConfig::Memory => {
            info!("Using in-memory store: data will be lost on shutdown");
            let store: Arc<dyn CatalogStore> = Arc::new(InMemoryStore::new());
            Ok((store, None))
        }
    }
}

/// Create CORS layer from configuration
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let cors_config = &config.auth.security.cors;

    let mut origins = Vec::new();
    for origin in &cors_config.allowed_origins {
        let header_value = match origin {
            CorsOrigin::Wildcard => "*".parse::<HeaderValue>()?,
            CorsOrigin::Url(url) => url.as_str().trim_end_matches('/').parse::<HeaderValue>()?,
        };
        origins.push(header_value);
    }

    let exposed_headers = cors_config
        .exposed_headers
        .iter()
        .map(|name| HeaderName::from_str(name))
        .collect::<Result<Vec<_>, _>>()?;

    let mut cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            http::Method::GET,
            http::Method::POST,
            http::Method::PATCH,
            http::Method::DELETE,
        ])
        .allow_headers([http::header::CONTENT_TYPE])
        .allow_credentials(cors_config.allow_credentials)
        .expose_headers(exposed_headers);

    if let Some(max_age) = cors_config.max_age {
        cors = cors.max_age(Duration::from_secs(max_age));
    }

    Ok(cors)
}

/// Build the application router.
///
/// - `/healthz` and the authentication routes are public
/// - `/admin/api/v1/overview` is public, the rest of `/admin/api/v1` sits behind `require_login`
/// - `/admin/docs` serves the OpenAPI documentation
#[instrument(skip_all)]
pub fn build_router(state: &AppState) -> anyhow::Result<Router> {
    use api::handlers::{auth, cooks, dish_types, dishes, overview};

    let auth_routes = Router::new()
        .route("/authentication/login", post(auth::login))
        .route("/authentication/logout", post(auth::logout));

    let catalog_routes = Router::new()
        .route("/me", get(auth::get_current_user))
        .route("/dish-types", get(dish_types::list_dish_types).post(dish_types::create_dish_type))
        .route(
            "/dish-types/{id}",
            get(dish_types::get_dish_type)
                .patch(dish_types::update_dish_type)
                .delete(dish_types::delete_dish_type),
        )
        .route("/cooks", get(cooks::list_cooks).post(cooks::create_cook))
        .route(
            "/cooks/{id}",
            get(cooks::get_cook).patch(cooks::update_cook).delete(cooks::delete_cook),
        )
        .route("/dishes", get(dishes::list_dishes).post(dishes::create_dish))
        .route(
            "/dishes/{id}",
            get(dishes::get_dish).patch(dishes::update_dish).delete(dishes::delete_dish),
        )
        .route_layer(from_fn_with_state(state.clone(), require_login));

    let api_routes = Router::new()
        .route("/overview", get(overview::get_overview))
        .merge(catalog_routes);

    let router = Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .merge(auth_routes)
        .nest("/admin/api/v1", api_routes)
        .with_state(state.clone())
        .merge(Scalar::with_url("/admin/docs", AdminApiDoc::openapi()))
        .layer(create_cors_layer(&state.config)?)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );

    Ok(router)
}

/// The kitchenctl application.
///
/// 1. **Create**: [`Application::new`] opens the store, runs migrations and ensures the initial
///    cook exists
/// 2. **Serve**: [`Application::serve`] binds to a TCP port and handles requests until the
///    shutdown future resolves
pub struct Application {
    router: Router,
    app_state: AppState,
    config: Config,
    pool: Option<PgPool>,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting kitchenctl with configuration: {:#?}", config);

        let (store, pool) = setup_store(&config).await?;
        let app_state = AppState::builder().store(store).config(config.clone()).build();

        create_initial_cook(&app_state)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to create initial cook: {}", e))?;

        let router = build_router(&app_state)?;

        Ok(Self {
            router,
            app_state,
            config,
            pool,
        })
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> (axum_test::TestServer, AppState) {
        let server = axum_test::TestServer::new(self.router).expect("Failed to create test server");
        (server, self.app_state)
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "kitchenctl listening on http://{}, available at http://localhost:{}",
            bind_addr, self.config.port
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        if let Some(pool) = self.pool {
            info!("Closing database connections...");
            pool.close().await;
        }

        info!("Shutting down telemetry...");
        telemetry::shutdown_telemetry();

        Ok(())
    }
}
