//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::FromRef,
    middleware,
    routing::{get, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::dto::*;
use crate::api::handlers::{
    auth, dashboard, health, menu_items, metrics, orders, pool_tables, users,
};
use crate::application::{
    DashboardService, IdentityService, MenuService, OrderService, PoolTableService, SessionTimer,
};
use crate::auth::{admin_middleware, auth_middleware, AuthState};
use crate::notifications::{ws_notifications_handler, NotificationState, SharedEventBus};

/// Everything the routes need. Handlers pull their own slice via `FromRef`.
#[derive(Clone)]
pub struct ApiState {
    pub identity: Arc<IdentityService>,
    pub pool_tables: Arc<PoolTableService>,
    pub menu: Arc<MenuService>,
    pub orders: Arc<OrderService>,
    pub dashboard: Arc<DashboardService>,
    pub session_timer: Arc<SessionTimer>,
    pub event_bus: SharedEventBus,
    pub auth: AuthState,
    pub db: DatabaseConnection,
    pub metrics: PrometheusHandle,
    pub started_at: Arc<Instant>,
}

impl FromRef<ApiState> for AuthState {
    fn from_ref(s: &ApiState) -> Self {
        s.auth.clone()
    }
}

impl FromRef<ApiState> for auth::AuthHandlerState {
    fn from_ref(s: &ApiState) -> Self {
        Self {
            identity: Arc::clone(&s.identity),
        }
    }
}

impl FromRef<ApiState> for users::UserHandlerState {
    fn from_ref(s: &ApiState) -> Self {
        Self {
            identity: Arc::clone(&s.identity),
        }
    }
}

impl FromRef<ApiState> for pool_tables::TableHandlerState {
    fn from_ref(s: &ApiState) -> Self {
        Self {
            tables: Arc::clone(&s.pool_tables),
        }
    }
}

impl FromRef<ApiState> for menu_items::MenuHandlerState {
    fn from_ref(s: &ApiState) -> Self {
        Self {
            menu: Arc::clone(&s.menu),
        }
    }
}

impl FromRef<ApiState> for orders::OrderHandlerState {
    fn from_ref(s: &ApiState) -> Self {
        Self {
            orders: Arc::clone(&s.orders),
        }
    }
}

impl FromRef<ApiState> for dashboard::DashboardHandlerState {
    fn from_ref(s: &ApiState) -> Self {
        Self {
            dashboard: Arc::clone(&s.dashboard),
        }
    }
}

impl FromRef<ApiState> for health::HealthState {
    fn from_ref(s: &ApiState) -> Self {
        Self {
            db: s.db.clone(),
            session_timer: Arc::clone(&s.session_timer),
            started_at: Arc::clone(&s.started_at),
        }
    }
}

impl FromRef<ApiState> for metrics::MetricsState {
    fn from_ref(s: &ApiState) -> Self {
        Self {
            handle: s.metrics.clone(),
        }
    }
}

impl FromRef<ApiState> for NotificationState {
    fn from_ref(s: &ApiState) -> Self {
        Self {
            event_bus: s.event_bus.clone(),
        }
    }
}

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Auth
        auth::login,
        auth::register,
        auth::me,
        auth::change_password,
        // Users
        users::list_users,
        users::change_role,
        // Tables
        pool_tables::list_tables,
        pool_tables::get_table,
        pool_tables::create_table,
        pool_tables::update_table,
        pool_tables::delete_table,
        pool_tables::floor,
        // Menu
        menu_items::list_menu_items,
        menu_items::available_menu_items,
        menu_items::get_menu_item,
        menu_items::create_menu_item,
        menu_items::update_menu_item,
        menu_items::delete_menu_item,
        // Orders
        orders::list_orders,
        orders::get_order,
        orders::create_order,
        orders::stop_order,
        orders::expire_order,
        orders::extend_order,
        orders::replace_order_items,
        orders::pay_order,
        // Dashboard
        dashboard::monthly_summary,
        dashboard::orders_in_range,
    ),
    components(
        schemas(
            EmptyData,
            LoginRequest,
            LoginResponse,
            RegisterRequest,
            ChangePasswordRequest,
            ChangeRoleRequest,
            UserDto,
            PoolTableDto,
            PoolTableRequest,
            FloorSlotDto,
            MenuItemDto,
            MenuItemRequest,
            OrderDto,
            OrderLineDto,
            OrderItemRequest,
            CreateOrderRequest,
            StopOrderRequest,
            ExtendOrderRequest,
            ReplaceItemsRequest,
            PayOrderRequest,
            MonthlySummaryDto,
            RangeTotalsDto,
            RangeReportDto,
            health::HealthResponse,
            health::ComponentHealth,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Server health check"),
        (name = "Authentication", description = "Login (JWT), registration, password change"),
        (name = "Users", description = "Staff accounts and roles (admin)"),
        (name = "Tables", description = "Pool tables and the live floor view"),
        (name = "Menu", description = "Food & beverage catalogue and stock"),
        (name = "Orders", description = "Table rental orders: timer control, F&B lines, payment"),
        (name = "Dashboard", description = "Revenue summaries (admin)"),
    ),
    info(
        title = "Billiard POS API",
        version = "0.1.0",
        description = "Table rental, F&B and billing back-office for a billiard café"
    )
)]
pub struct ApiDoc;

/// Valid bearer token required
fn authenticated(router: Router<ApiState>, auth: &AuthState) -> Router<ApiState> {
    router.route_layer(middleware::from_fn_with_state(auth.clone(), auth_middleware))
}

/// Valid bearer token with role `admin` required
fn admin_only(router: Router<ApiState>, auth: &AuthState) -> Router<ApiState> {
    authenticated(
        router.route_layer(middleware::from_fn(admin_middleware)),
        auth,
    )
}

/// Create the API router with all routes
pub fn create_api_router(state: ApiState) -> Router {
    let auth_state = state.auth.clone();

    // Auth routes (public)
    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register));

    // Auth routes (protected)
    let auth_protected_routes = authenticated(
        Router::new()
            .route("/me", get(auth::me))
            .route("/change-password", put(auth::change_password)),
        &auth_state,
    );

    let user_routes = admin_only(
        Router::new()
            .route("/", get(users::list_users))
            .route("/role", put(users::change_role)),
        &auth_state,
    );

    let table_routes = admin_only(
        Router::new()
            .route(
                "/",
                get(pool_tables::list_tables).post(pool_tables::create_table),
            )
            .route(
                "/{id}",
                get(pool_tables::get_table)
                    .put(pool_tables::update_table)
                    .delete(pool_tables::delete_table),
            ),
        &auth_state,
    );

    let floor_routes = authenticated(
        Router::new().route("/", get(pool_tables::floor)),
        &auth_state,
    );

    let menu_routes = admin_only(
        Router::new()
            .route(
                "/",
                get(menu_items::list_menu_items).post(menu_items::create_menu_item),
            )
            .route(
                "/{id}",
                get(menu_items::get_menu_item)
                    .put(menu_items::update_menu_item)
                    .delete(menu_items::delete_menu_item),
            ),
        &auth_state,
    )
    .merge(authenticated(
        Router::new().route("/available", get(menu_items::available_menu_items)),
        &auth_state,
    ));

    let order_routes = authenticated(
        Router::new()
            .route("/", get(orders::list_orders).post(orders::create_order))
            .route("/{id}", get(orders::get_order))
            .route("/{id}/stop", post(orders::stop_order))
            .route("/{id}/expire", post(orders::expire_order))
            .route("/{id}/extend", post(orders::extend_order))
            .route("/{id}/items", put(orders::replace_order_items))
            .route("/{id}/pay", post(orders::pay_order)),
        &auth_state,
    );

    let dashboard_routes = admin_only(
        Router::new()
            .route("/summary", get(dashboard::monthly_summary))
            .route("/orders", get(dashboard::orders_in_range))
            .route("/users", get(users::list_users)),
        &auth_state,
    );

    // Browsers pass the token as `?token=` on the upgrade request
    let notification_routes = authenticated(
        Router::new().route("/ws", get(ws_notifications_handler)),
        &auth_state,
    );

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    Router::new()
        .route("/health", get(health::health_check))
        .route("/metrics", get(metrics::prometheus_metrics))
        .nest("/api/v1/auth", auth_routes.merge(auth_protected_routes))
        .nest("/api/v1/users", user_routes)
        .nest("/api/v1/tables", table_routes)
        .nest("/api/v1/floor", floor_routes)
        .nest("/api/v1/menu-items", menu_routes)
        .nest("/api/v1/orders", order_routes)
        .nest("/api/v1/dashboard", dashboard_routes)
        .nest("/api/v1/notifications", notification_routes)
        .layer(middleware::from_fn(metrics::http_metrics_middleware))
        .with_state(state)
        .merge(swagger_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
