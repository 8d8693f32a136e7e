use std::process::ExitCode;

use tracing::{error, info};

use news_indexer::{bootstrap, logging, Dependencies, IndexerConfig, IndexingError};

async fn run() -> Result<(), IndexingError> {
    let config = IndexerConfig::from_env()?;
    let deps = Dependencies::new(config).await?;

    let report = bootstrap::run(&deps).await?;
    info!(
        index = %report.index,
        fields = report.mapped_fields().len(),
        "Bootstrap complete"
    );

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine; the environment may already be set
    dotenv::dotenv().ok();
    logging::init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "News indexer failed");
            ExitCode::FAILURE
        }
    }
}
