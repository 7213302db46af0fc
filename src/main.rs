//! MentorHub service entry point.
//!
//! Reads configuration from a TOML file
//! (~/.config/mentorhub/config.toml, overridable via MENTORHUB_CONFIG),
//! runs migrations, seeds the first admin account and serves the REST
//! API.

use std::sync::Arc;

use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use mentorhub::application::mappers::{PasswordEncoder, UserResolver};
use mentorhub::auth::jwt::JwtConfig;
use mentorhub::auth::password::BcryptPasswordEncoder;
use mentorhub::config::AppConfig;
use mentorhub::domain::{CreateUserDto, UserRepositoryInterface, UserRole};
use mentorhub::infrastructure::database::migrator::Migrator;
use mentorhub::infrastructure::database::repositories::UserRepository;
use mentorhub::{
    create_api_router, default_config_path, init_app_properties, init_database, DatabaseConfig,
    Properties, SeaOrmUserResolver,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("MENTORHUB_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting MentorHub service...");

    // ── Optional flat properties alongside the main config ─────
    let properties_path = config_path.with_file_name("properties.toml");
    match Properties::load(&properties_path) {
        Ok(props) => {
            init_app_properties(props);
            info!("Properties loaded from {}", properties_path.display());
        }
        Err(e) => {
            warn!("No application properties: {}", e);
        }
    }

    // ── Build sub-configs from AppConfig ───────────────────────
    let db_config = DatabaseConfig {
        url: app_cfg.database.url.clone(),
    };

    let jwt_config = JwtConfig {
        secret: app_cfg.security.jwt_secret.clone(),
        expiration_hours: app_cfg.security.jwt_expiration_hours,
        issuer: "mentorhub".to_string(),
    };
    info!(
        "JWT configured with {}h token expiration",
        jwt_config.expiration_hours
    );

    // ── Database ───────────────────────────────────────────────
    let db = match init_database(&db_config).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    info!("Running database migrations...");
    if let Err(e) = Migrator::up(&db, None).await {
        error!("Failed to run migrations: {}", e);
        return Err(e.into());
    }
    info!("Migrations completed");

    // ── Collaborators and repositories ─────────────────────────
    let encoder: Arc<dyn PasswordEncoder> = Arc::new(BcryptPasswordEncoder);
    let user_repo: Arc<dyn UserRepositoryInterface> =
        Arc::new(UserRepository::new(db.clone(), encoder));
    let resolver: Arc<dyn UserResolver> = Arc::new(SeaOrmUserResolver::new(db.clone()));

    create_default_admin(user_repo.as_ref(), &app_cfg).await;

    // ── REST API server ────────────────────────────────────────
    let api_router = create_api_router(db.clone(), jwt_config, user_repo, resolver);

    let api_addr = app_cfg.server.address();
    let listener = tokio::net::TcpListener::bind(&api_addr).await?;
    info!("REST API server listening on http://{}", api_addr);
    info!("Swagger UI available at http://{}/swagger-ui/", api_addr);

    axum::serve(listener, api_router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
            }
            info!("Shutdown signal received");
        })
        .await?;

    if let Err(e) = db.close().await {
        warn!("Error closing database connection: {}", e);
    } else {
        info!("Database connection closed");
    }

    info!("MentorHub shutdown complete");
    Ok(())
}

/// Seeds the first admin when no account with the configured email
/// exists yet. The write is attributed to the SYSTEM auditor.
async fn create_default_admin(user_repo: &dyn UserRepositoryInterface, app_cfg: &AppConfig) {
    use mentorhub::application::audit::SYSTEM_AUDITOR;

    let admin_email = app_cfg.security.default_admin_email.clone();

    match user_repo.get_user_by_email(&admin_email).await {
        Ok(Some(_)) => return,
        Ok(None) => {}
        Err(e) => {
            error!("Failed to check for admin account: {}", e);
            return;
        }
    }

    info!("Creating default admin user...");

    let dto = CreateUserDto {
        first_name: "System".to_string(),
        last_name: "Administrator".to_string(),
        position: None,
        role: Some(UserRole::Admin),
        email: admin_email.clone(),
        password: app_cfg.security.default_admin_password.clone(),
    };

    match user_repo.create_user(dto, SYSTEM_AUDITOR).await {
        Ok(_) => {
            info!("Default admin created: {}", admin_email);
            info!("Please change the admin password immediately!");
        }
        Err(e) => {
            error!("Failed to create admin user: {}", e);
        }
    }
}
