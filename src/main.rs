use content_foundry::{Pipeline, PipelineConfig, RunStatus};
use std::env;
use std::path::PathBuf;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let root = env::var("FOUNDRY_ROOT")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."));
    let config = PipelineConfig::from_env()?;

    info!("Starting content pipeline (root: {})", root.display());
    let pipeline = Pipeline::new(&root, config);
    let run = pipeline.run().await?;

    match run.status {
        RunStatus::Failed => {
            // The failure is already recorded in the run history; the
            // external scheduler still sees a clean exit.
            error!("Run {} failed: {}", run.id, run.errors.join("; "));
        }
        _ => {
            info!(
                "Run {} finished: {} topics selected, {} articles drafted, {} published",
                run.id, run.generated_topics, run.generated_articles, run.published_articles
            );
        }
    }
    Ok(())
}
