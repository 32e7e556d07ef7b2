use color_eyre::eyre::Result;
use notifybot_core::{Settings, setup_logging};
use notifybot_db::DatabaseManager;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load configuration, including .env
    let settings = Settings::load()?;

    let logging = setup_logging(settings.log_level, &settings.log_file)?;
    logging.install_global()?;
    let logger = logging.logger("db-init");

    logger.info(format_args!("Initializing database at {}...", settings.database_path));
    let manager = DatabaseManager::new(&settings.database_path);
    manager.initialize().await?;
    manager.close().await;
    logger.info("Database initialized successfully.");

    Ok(())
}
