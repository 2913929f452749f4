//! pushctl: inspect and maintain push message information. Config from env and optional CLI args.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use push_cli::{commands, Cli, Commands};
use push_core::{init_tracing, AppConfig};
use push_storage::{PushMessageInformationRepository, RecordFilter, SortOrder, SqlitePoolManager};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::load().context("Load config from env")?;
    init_tracing(&config.log_file)?;

    let pool_manager =
        SqlitePoolManager::with_max_connections(&config.database_url, config.max_connections)
            .await
            .with_context(|| format!("Open database {}", config.database_url))?;
    let dao = PushMessageInformationRepository::from_pool_manager(pool_manager)
        .await
        .context("Initialize schema")?;

    let output = match cli.command {
        Commands::List {
            by,
            id,
            page,
            page_size,
            desc,
        } => {
            let filter = RecordFilter::new(by, id);
            let order = SortOrder::from_ascending(!desc);
            commands::list(&dao, &filter, order, page, page_size).await?
        }
        Commands::Show { id } => commands::show(&dao, &id).await?,
        Commands::Activity { owner, limit } => {
            commands::activity(&dao, owner.as_deref(), limit).await?
        }
        Commands::Count { owner } => commands::count(&dao, owner.as_deref()).await?,
        Commands::Warnings { owner } => commands::warnings(&dao, owner.as_deref()).await?,
        Commands::Cleanup { days } => {
            let days = days.unwrap_or(config.retention_days);
            commands::cleanup(&dao, Utc::now(), days).await?
        }
    };

    println!("{}", output);
    Ok(())
}
