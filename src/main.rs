use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::{App, HttpServer, middleware::Logger};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cardshop::{
  adapters::http::{
    AdminIdentityMiddleware, PathRewriteMiddleware, RequestIdMiddleware, SessionCookieSettings,
    TemplateEngine, WebRouteDependencies, configure_web_routes, login_submit_resource,
  },
  application::admin::{LoginAdminUseCase, LogoutAdminUseCase},
  application::dashboard::{GetDashboardUseCase, UpdateShopSettingsUseCase},
  application::order::{
    CancelOrderUseCase, DeleteOrderUseCase, DeleteOrdersUseCase, GetOrderDetailsUseCase,
    GetOrderStatusUseCase, ListOrdersUseCase, MarkOrderDeliveredUseCase, MarkOrderPaidUseCase,
    UpdateOrderEmailUseCase,
  },
  domain::admin::{AdminAccessService, AdminGuard},
  domain::catalog::VisitorRepository,
  domain::order::OrderService,
  domain::pages::PageCache,
  infrastructure::{
    cache::RedisPageCache,
    config::Config,
    persistence::postgres::{
      PostgresOrderRepository, PostgresProductRepository, PostgresSettingRepository,
      PostgresStatsRepository, PostgresVisitorRepository,
    },
    persistence::redis::RedisAdminSessionRepository,
    security::{Argon2PasswordVerifier, SecureTokenGenerator},
  },
};

/// `cardshop hash-password <password>` prints a PHC string for the
/// `[[admin.accounts]]` config section
fn hash_password(password: &str) -> std::io::Result<()> {
  let verifier = Argon2PasswordVerifier::new().map_err(std::io::Error::other)?;
  let hash = verifier.hash(password).map_err(std::io::Error::other)?;
  println!("{}", hash);
  Ok(())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  let args: Vec<String> = std::env::args().collect();
  if args.get(1).map(String::as_str) == Some("hash-password") {
    return match args.get(2) {
      Some(password) => hash_password(password),
      None => Err(std::io::Error::new(
        std::io::ErrorKind::InvalidInput,
        "usage: cardshop hash-password <password>",
      )),
    };
  }

  // Initialize environment variables from .env file
  dotenvy::dotenv().ok();

  // Initialize tracing subscriber for logging
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cardshop=debug,actix_web=info".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  tracing::info!("Starting cardshop back office");

  let config = Config::load().map_err(|e| {
    tracing::error!("Failed to load configuration: {}", e);
    std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
  })?;
  tracing::info!("Configuration loaded successfully");

  if config.admin.accounts.is_empty() {
    tracing::warn!("No admin accounts configured; the back office cannot be used");
  }

  // Set up database connection pool with timeout
  tracing::info!("Connecting to database");

  let db_pool = tokio::time::timeout(
    Duration::from_secs(config.database.connect_timeout_seconds),
    PgPoolOptions::new()
      .max_connections(config.database.max_connections)
      .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_seconds))
      .connect(&config.database.url),
  )
  .await
  .map_err(|_| {
    tracing::error!(
      "Database connection timed out after {} seconds. Is PostgreSQL running?",
      config.database.connect_timeout_seconds
    );
    std::io::Error::new(
      std::io::ErrorKind::TimedOut,
      format!(
        "Database connection timed out after {} seconds",
        config.database.connect_timeout_seconds
      ),
    )
  })?
  .map_err(|e| {
    tracing::error!("Failed to connect to database: {}", e);
    match e {
      sqlx::Error::Io(_) => std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        "Could not connect to database. Is PostgreSQL running?",
      ),
      _ => std::io::Error::other(format!("Database error: {}", e)),
    }
  })?;

  tracing::info!("Database connection pool created");

  // Run database migrations
  tracing::info!("Running database migrations");
  sqlx::migrate!("./migrations")
    .run(&db_pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to run database migrations: {}", e);
      std::io::Error::other(format!("Migration error: {}", e))
    })?;
  tracing::info!("Database migrations completed");

  // Set up Redis connection with timeout
  tracing::info!("Connecting to Redis: {}", config.redis.url);

  let redis_client = redis::Client::open(config.redis.url.clone()).map_err(|e| {
    tracing::error!("Failed to create Redis client: {}", e);
    std::io::Error::new(
      std::io::ErrorKind::InvalidInput,
      format!("Invalid Redis URL: {}", e),
    )
  })?;

  let redis_conn = tokio::time::timeout(
    Duration::from_secs(config.redis.connect_timeout_seconds),
    redis_client.get_connection_manager(),
  )
  .await
  .map_err(|_| {
    tracing::error!(
      "Redis connection timed out after {} seconds. Is Redis running?",
      config.redis.connect_timeout_seconds
    );
    std::io::Error::new(
      std::io::ErrorKind::TimedOut,
      format!(
        "Redis connection timed out after {} seconds",
        config.redis.connect_timeout_seconds
      ),
    )
  })?
  .map_err(|e| {
    tracing::error!("Failed to connect to Redis: {}", e);
    std::io::Error::new(
      std::io::ErrorKind::ConnectionRefused,
      format!(
        "Could not connect to Redis. Is Redis running at {}?",
        config.redis.url
      ),
    )
  })?;

  tracing::info!("Redis connection established");

  // Initialize repositories
  let order_repo = Arc::new(PostgresOrderRepository::new(db_pool.clone()));
  let product_repo = Arc::new(PostgresProductRepository::new(db_pool.clone()));
  let stats_repo = Arc::new(PostgresStatsRepository::new(db_pool.clone()));
  let setting_repo = Arc::new(PostgresSettingRepository::new(db_pool.clone()));
  let visitor_repo: Arc<dyn VisitorRepository> =
    Arc::new(PostgresVisitorRepository::new(db_pool.clone()));
  let session_repo = Arc::new(RedisAdminSessionRepository::new(redis_conn.clone()));
  let page_cache: Arc<dyn PageCache> = Arc::new(RedisPageCache::new(
    redis_conn.clone(),
    config.cache.page_ttl_seconds,
  ));

  // Initialize security services
  let password_verifier = Arc::new(Argon2PasswordVerifier::new().map_err(|e| {
    tracing::error!("Failed to create password verifier: {}", e);
    std::io::Error::other(e.to_string())
  })?);
  let token_generator = Arc::new(SecureTokenGenerator::new());

  // Initialize domain services
  let access_service = Arc::new(AdminAccessService::new(
    config.admin.accounts.clone(),
    session_repo,
    password_verifier,
    token_generator,
    config.security.session_ttl_seconds,
  ));
  let admin_guard: Arc<dyn AdminGuard> = access_service.clone();

  let order_service = Arc::new(OrderService::new(
    order_repo.clone(),
    admin_guard.clone(),
    page_cache.clone(),
  ));

  // Initialize use cases
  let login_use_case = Arc::new(LoginAdminUseCase::new(access_service.clone()));
  let logout_use_case = Arc::new(LogoutAdminUseCase::new(access_service.clone()));

  let get_dashboard_use_case = Arc::new(GetDashboardUseCase::new(
    admin_guard.clone(),
    product_repo,
    stats_repo,
    setting_repo.clone(),
    visitor_repo.clone(),
    order_repo,
  ));
  let update_settings_use_case = Arc::new(UpdateShopSettingsUseCase::new(
    admin_guard.clone(),
    setting_repo,
    page_cache.clone(),
  ));

  let list_orders_use_case = Arc::new(ListOrdersUseCase::new(order_service.clone()));
  let get_order_details_use_case = Arc::new(GetOrderDetailsUseCase::new(order_service.clone()));
  let get_order_status_use_case = Arc::new(GetOrderStatusUseCase::new(order_service.clone()));
  let mark_paid_use_case = Arc::new(MarkOrderPaidUseCase::new(order_service.clone()));
  let mark_delivered_use_case = Arc::new(MarkOrderDeliveredUseCase::new(order_service.clone()));
  let cancel_use_case = Arc::new(CancelOrderUseCase::new(order_service.clone()));
  let update_email_use_case = Arc::new(UpdateOrderEmailUseCase::new(order_service.clone()));
  let delete_order_use_case = Arc::new(DeleteOrderUseCase::new(order_service.clone()));
  let delete_orders_use_case = Arc::new(DeleteOrdersUseCase::new(order_service));

  // Initialize template engine
  let templates = TemplateEngine::new().map_err(|e| {
    tracing::error!("Failed to initialize template engine: {}", e);
    std::io::Error::other(e.to_string())
  })?;
  tracing::info!("Template engine initialized");

  let cookie_settings = SessionCookieSettings {
    secure: config.security.cookie_secure,
    ttl_seconds: config.security.session_ttl_seconds,
  };

  // Login throttling, per client IP; one limiter shared by all workers
  let login_governor = GovernorConfigBuilder::default()
    .per_second(config.rate_limit.login_seconds_per_request)
    .burst_size(config.rate_limit.login_burst)
    .finish()
    .ok_or_else(|| {
      std::io::Error::new(
        std::io::ErrorKind::InvalidInput,
        "rate_limit values must be greater than zero",
      )
    })?;
  let rewrites = config.rewrites.clone();

  let server_host = config.server.host.clone();
  let server_port = config.server.port;

  tracing::info!("Starting HTTP server on {}:{}", server_host, server_port);

  // Create and start the HTTP server; the last `wrap` runs first
  HttpServer::new(move || {
    App::new()
      .wrap(AdminIdentityMiddleware::new(access_service.clone()))
      .wrap(RequestIdMiddleware::new())
      .wrap(Logger::default())
      .wrap(PathRewriteMiddleware::new(&rewrites))
      .service(login_submit_resource().wrap(Governor::new(&login_governor)))
      .configure(|cfg| {
        configure_web_routes(
          cfg,
          WebRouteDependencies {
            templates: templates.clone(),
            admin_guard: admin_guard.clone(),
            page_cache: page_cache.clone(),
            visitor_repo: visitor_repo.clone(),
            cookie_settings,
            static_dir: "./static".to_string(),
            login_use_case: login_use_case.clone(),
            logout_use_case: logout_use_case.clone(),
            get_dashboard_use_case: get_dashboard_use_case.clone(),
            update_settings_use_case: update_settings_use_case.clone(),
            list_orders_use_case: list_orders_use_case.clone(),
            get_order_details_use_case: get_order_details_use_case.clone(),
            get_order_status_use_case: get_order_status_use_case.clone(),
            mark_paid_use_case: mark_paid_use_case.clone(),
            mark_delivered_use_case: mark_delivered_use_case.clone(),
            cancel_use_case: cancel_use_case.clone(),
            update_email_use_case: update_email_use_case.clone(),
            delete_order_use_case: delete_order_use_case.clone(),
            delete_orders_use_case: delete_orders_use_case.clone(),
          },
        )
      })
  })
  .bind((server_host, server_port))?
  .run()
  .await
}
