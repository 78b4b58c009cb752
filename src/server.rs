//! Server runtime.
//!
//! [`build_api_state`] wires repositories, services and the device
//! controller into an [`ApiState`]. [`ServerHandle`] owns the whole
//! lifecycle: database, MQTT, session timer, REST API and graceful
//! shutdown.

use std::sync::{Arc, OnceLock};
use std::time::Instant;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use sea_orm::DatabaseConnection;
use tracing::{error, info, warn};

use crate::api::{create_api_router, ApiState};
use crate::application::{
    DashboardService, IdentityService, MenuService, OrderService, PoolTableService, SessionTimer,
    SessionTimerConfig,
};
use crate::auth::{AuthState, JwtConfig};
use crate::config::AppConfig;
use crate::domain::{RepositoryProvider, TableDeviceController};
use crate::infrastructure::database::repositories::SeaOrmRepositoryProvider;
use crate::infrastructure::{
    init_and_migrate, DatabaseConfig, LogOnlyDeviceController, MqttDeviceController,
};
use crate::notifications::create_event_bus;
use crate::support::shutdown::{ShutdownCoordinator, ShutdownSignal};
use crate::support::time::VenueClock;

/// Options for starting the server.
pub struct ServerOptions {
    pub config: AppConfig,
    /// Create the configured admin when no users exist (default: true).
    pub create_default_admin: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            create_default_admin: true,
        }
    }
}

/// Wire services over an open, migrated database.
pub fn build_api_state(
    db: DatabaseConnection,
    config: &AppConfig,
    devices: Arc<dyn TableDeviceController>,
    metrics: PrometheusHandle,
) -> ApiState {
    let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
    let clock = VenueClock::from_offset_minutes(config.venue.utc_offset_minutes);
    let jwt_config = JwtConfig::new(
        config.security.jwt_secret.clone(),
        config.security.jwt_expiration_hours,
    );
    let event_bus = create_event_bus();

    let orders = Arc::new(OrderService::new(
        repos.clone(),
        devices,
        event_bus.clone(),
        clock,
    ));
    let session_timer = Arc::new(SessionTimer::new(orders.clone()).with_config(
        SessionTimerConfig {
            check_interval_secs: config.session_timer.check_interval_secs,
        },
    ));

    ApiState {
        identity: Arc::new(IdentityService::new(repos.clone(), jwt_config.clone())),
        pool_tables: Arc::new(PoolTableService::new(
            repos.clone(),
            chrono::Duration::minutes(config.session_timer.ending_soon_minutes),
        )),
        menu: Arc::new(MenuService::new(repos.clone())),
        orders,
        dashboard: Arc::new(DashboardService::new(repos, clock)),
        session_timer,
        event_bus,
        auth: AuthState { jwt_config },
        db,
        metrics,
        started_at: Arc::new(Instant::now()),
    }
}

/// The global recorder can only be installed once per process
fn prometheus_handle() -> Result<PrometheusHandle, Box<dyn std::error::Error>> {
    static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();
    if let Some(handle) = PROM_HANDLE.get() {
        return Ok(handle.clone());
    }
    let handle = PrometheusBuilder::new().install_recorder()?;
    info!("📊 Prometheus metrics recorder installed");
    Ok(PROM_HANDLE.get_or_init(|| handle).clone())
}

/// Handle to a running server.
pub struct ServerHandle {
    pub state: ApiState,
    pub config: AppConfig,
    pub api_port: u16,

    db: DatabaseConnection,
    shutdown: ShutdownCoordinator,
    api_task: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    /// Start the server:
    /// 1. Install the Prometheus recorder
    /// 2. Connect to the database and run migrations
    /// 3. Create the default admin (if enabled)
    /// 4. Connect the table lamps (MQTT, or log-only when disabled)
    /// 5. Start the session timer and the REST API
    pub async fn start(opts: ServerOptions) -> Result<Self, Box<dyn std::error::Error>> {
        let app_cfg = opts.config;
        info!("Starting billiard POS...");

        let metrics = prometheus_handle()?;

        let db = init_and_migrate(&DatabaseConfig {
            url: app_cfg.database.url.clone(),
        })
        .await?;

        let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
        let shutdown_signal = shutdown.signal();

        let devices: Arc<dyn TableDeviceController> = if app_cfg.mqtt.enabled {
            Arc::new(MqttDeviceController::start(
                &app_cfg.mqtt,
                shutdown_signal.clone(),
            ))
        } else {
            info!("💡 MQTT disabled, table lamps will not be switched");
            Arc::new(LogOnlyDeviceController)
        };

        let state = build_api_state(db.clone(), &app_cfg, devices, metrics);
        info!(
            "JWT configured with {}h token expiration",
            app_cfg.security.jwt_expiration_hours
        );

        if opts.create_default_admin {
            match state.identity.bootstrap_admin(&app_cfg.admin).await {
                Ok(Some(admin)) => {
                    info!("Default admin created: {}", admin.email);
                    warn!("⚠️  Please change the admin password immediately!");
                }
                Ok(None) => {}
                Err(e) => error!("Failed to create admin user: {}", e),
            }
        }

        state.session_timer.start(shutdown_signal.clone());

        let api_port = app_cfg.server.api_port;
        let api_addr = app_cfg.server.address();
        let listener = tokio::net::TcpListener::bind(&api_addr).await?;
        info!("REST API server listening on http://{}", api_addr);
        info!("Swagger UI available at http://{}/docs/", api_addr);

        let router = create_api_router(state.clone());
        let api_shutdown = shutdown_signal.clone();
        let api_server = axum::serve(listener, router).with_graceful_shutdown(async move {
            api_shutdown.wait().await;
            info!("🛑 REST API server received shutdown signal");
        });

        let api_task = tokio::spawn(async move {
            if let Err(e) = api_server.await {
                error!("REST API server error: {}", e);
            }
        });

        info!("🚀 Server started.");

        Ok(Self {
            state,
            config: app_cfg,
            api_port,
            db,
            shutdown,
            api_task,
        })
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Install OS signal listeners (SIGTERM, SIGINT) that trigger shutdown.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    /// Wait for the server to stop after shutdown has been triggered.
    pub async fn wait(self) {
        info!("⏳ Waiting for server tasks to complete...");

        let timeout = std::time::Duration::from_secs(self.shutdown.timeout_secs());
        match tokio::time::timeout(timeout, self.api_task).await {
            Ok(Ok(())) => info!("REST API server stopped"),
            Ok(Err(e)) => error!("REST API server task panicked: {}", e),
            Err(_) => warn!(
                "REST API server did not stop within {}s",
                self.shutdown.timeout_secs()
            ),
        }

        if let Err(e) = self.db.close().await {
            warn!("Error closing database connection: {}", e);
        } else {
            info!("✅ Database connection closed");
        }

        info!("👋 Billiard POS shutdown complete");
    }

    /// Trigger shutdown and wait for completion.
    pub async fn shutdown(self) {
        info!("🛑 Shutting down billiard POS...");
        self.trigger_shutdown();
        self.wait().await;
    }

    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }
}
