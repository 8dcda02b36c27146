use std::sync::Arc;

use auth::Authenticator;
use auth::PasswordHasher;
use employee_service::config::Config;
use employee_service::config::StorageBackend;
use employee_service::domain::account::models::RegisterCommand;
use employee_service::domain::account::ports::AccountServicePort;
use employee_service::domain::account::service::AccountService;
use employee_service::domain::employee::ports::EmployeeServicePort;
use employee_service::domain::employee::service::EmployeeService;
use employee_service::inbound::http::router::create_router;
use employee_service::outbound::repositories::InMemoryAccountRepository;
use employee_service::outbound::repositories::InMemoryEmployeeRepository;
use employee_service::outbound::repositories::PostgresAccountRepository;
use employee_service::outbound::repositories::PostgresEmployeeRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "employee_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "employee-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        backend = ?config.database.backend,
        http_port = config.server.http_port,
        token_ttl_hours = config.jwt.expiration_hours,
        "Configuration loaded"
    );

    let password_hasher = PasswordHasher::with_params(
        config.hashing.memory_kib,
        config.hashing.iterations,
        config.hashing.parallelism,
    )?;
    let authenticator = Arc::new(
        Authenticator::new(config.jwt.secret_bytes()?)
            .with_password_hasher(password_hasher)
            .with_token_ttl(config.jwt.token_ttl()?),
    );
    authenticator.prepare_decoy_hash()?;

    let (account_service, employee_service) = match config.database.backend {
        StorageBackend::Postgres => {
            let pg_pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .connect(&config.database.url)
                .await?;
            tracing::info!(
                max_connections = config.database.max_connections,
                database = "postgresql",
                "Database connection pool created"
            );

            sqlx::migrate!("./migrations").run(&pg_pool).await?;
            tracing::info!(database = "postgresql", "Database migrations completed");

            let account_service: Arc<dyn AccountServicePort> = Arc::new(AccountService::new(
                Arc::new(PostgresAccountRepository::new(pg_pool.clone())),
                Arc::clone(&authenticator),
            ));
            let employee_service: Arc<dyn EmployeeServicePort> = Arc::new(EmployeeService::new(
                Arc::new(PostgresEmployeeRepository::new(pg_pool)),
            ));
            (account_service, employee_service)
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on shutdown");
            let account_service: Arc<dyn AccountServicePort> = Arc::new(AccountService::new(
                Arc::new(InMemoryAccountRepository::new()),
                Arc::clone(&authenticator),
            ));
            let employee_service: Arc<dyn EmployeeServicePort> = Arc::new(EmployeeService::new(
                Arc::new(InMemoryEmployeeRepository::new()),
            ));
            (account_service, employee_service)
        }
    };

    if let Some(admin) = &config.bootstrap_admin {
        let command = RegisterCommand::new(admin.username.clone(), admin.password.clone())?;
        account_service.ensure_admin(command).await?;
    }

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(account_service, employee_service, authenticator);

    if let Err(e) = axum::serve(http_listener, http_application).await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }

    tracing::info!("Server exited successfully");
    Ok(())
}
