use clap::Parser;
use dotenvy::dotenv;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tuition_ledger::{
    cli::{self, Cli, Command},
    config::{database, ledger},
    core::seed,
    errors::Result,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // 2. Load .env file before parsing so DATABASE_URL can come from it
    dotenv().ok();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(output) => {
            println!("{}", output.trim_end());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(kind = ?e.kind(), "{e}");
            eprintln!("❌ {}", cli::commands::describe_error(&e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<String> {
    // 3. Load the ledger configuration
    let config = ledger::load_config_or_default(&cli.config)?;

    // 4. Initialize database
    let db = database::create_connection(&cli.database_url).await?;
    database::create_tables(&db).await?;
    info!("Database ready at {}", cli.database_url);

    // 5. Seed sample data on an empty ledger when asked to
    if config.seed_when_empty && !matches!(cli.command, Command::Seed) {
        if let Some(summary) = seed::seed_if_empty(&db, &config).await? {
            info!(
                students = summary.students,
                collections = summary.collections,
                "Seeded empty ledger from {}",
                cli.config.display()
            );
        }
    }

    // 6. Run the command
    cli::commands::run(&db, &config, cli.command).await
}
