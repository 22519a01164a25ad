//! Command-line entry point: generate a curriculum for one topic.
//!
//! Every completion goes through a rate-limited, retrying scheduler. Lessons
//! are written under the output directory as `{category}/{subtopic}.txt`.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use prometheus_curriculum::builders::SchedulerBuilder;
use prometheus_curriculum::config::AppConfig;
use prometheus_curriculum::core::AppResult;
use prometheus_curriculum::curriculum::CurriculumGenerator;
use prometheus_curriculum::generation::OpenAiClient;
use prometheus_curriculum::infra::FileLessonStore;
use prometheus_curriculum::util::init_tracing;

/// Generate a topic curriculum through a rate-limited completion API
#[derive(Parser, Debug)]
#[command(name = "curriculum")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Topic to build the curriculum for
    #[arg(short, long, default_value = "Next.js Programming")]
    topic: String,

    /// Optional JSON config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory lessons are written under (overrides the config file)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // `.env` is only read here.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();
    let mut config = AppConfig::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(dir) = cli.output_dir {
        config.output_dir = dir;
    }

    let scheduler = SchedulerBuilder::from_config(config.scheduler.clone())
        .build()
        .context("building call scheduler")?;
    let client = OpenAiClient::from_env(config.generation.api_base_url.clone())?;
    let store = FileLessonStore::new(&config.output_dir);

    tracing::info!(
        topic = %cli.topic,
        output_dir = %config.output_dir.display(),
        "starting curriculum run"
    );

    let generator = CurriculumGenerator::new(
        scheduler.clone(),
        Arc::new(client),
        Arc::new(store),
        config.generation,
    );
    let result = generator.generate(&cli.topic).await;
    scheduler.shutdown();
    let curriculum = result.context("generating curriculum")?;

    println!("{}", serde_json::to_string_pretty(&curriculum)?);
    println!("Curriculum generated successfully!");
    Ok(())
}
