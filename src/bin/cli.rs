//! Post preprocessor CLI
//!
//! Reads post archives, publishes strong-context tokens to the convolutional
//! queue and enriched posts to the expiring queue.

use std::fs::File;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use preprocessor::{
    annotator::HttpAnnotator,
    config,
    error::Result,
    models::Config,
    pipeline::{Distributor, Pipeline, QueueSink, RunReport},
    storage::{MemoryStore, QueueStore, RedisStore},
};

/// Post preprocessor
#[derive(Parser, Debug)]
#[command(
    name = "preprocessor",
    version,
    about = "Derives post context and feeds the convolutional and expiring queues"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Process every archive in the input directory
    Run {
        /// Input directory (default: input.dir from config)
        #[arg(long)]
        input_dir: Option<PathBuf>,

        /// Keep queue output in memory instead of publishing to the store
        #[arg(long)]
        dry_run: bool,

        /// Write the run report as JSON to this path
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Process a single archive
    Process {
        file: PathBuf,

        /// Keep queue output in memory instead of publishing to the store
        #[arg(long)]
        dry_run: bool,
    },

    /// Validate configuration
    Validate,
}

/// Initialize logging from verbosity flag, configured level and target.
fn init_logging(verbose: bool, level: &str, log_file: Option<&Path>) -> Result<()> {
    let level = if verbose { "debug" } else { level };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level));
    builder.format_timestamp_secs();

    if let Some(path) = log_file {
        let file = File::options().create(true).append(true).open(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.init();
    Ok(())
}

enum Target {
    Directory(PathBuf),
    File(PathBuf),
}

/// Run the pipeline against one store, then wait for the in-process queues to drain.
async fn execute<S: QueueStore>(config: &Config, store: S, target: &Target) -> Result<(RunReport, S)> {
    let (sink, receivers) = QueueSink::bounded(config.queues.channel_capacity);
    let consumer = tokio::spawn(receivers.drain());

    let annotator = HttpAnnotator::new(&config.annotator)?;
    let distributor = Distributor::new(store, sink, &config.queues);
    let mut pipeline = Pipeline::new(config, Box::new(annotator), distributor);

    let report = match target {
        Target::Directory(dir) => pipeline.run_directory(dir).await?,
        Target::File(file) => pipeline.run_files(std::slice::from_ref(file)).await?,
    };

    // Dropping the distributor closes the senders so the consumer can finish.
    let store = pipeline.into_distributor().into_store();
    let drained = consumer.await.map_err(std::io::Error::other)?;

    log::info!("{} posts in expiring queue", drained.expiring);
    log::info!("{} tokens in convolutional queue", drained.convolutional);

    Ok((report, store))
}

async fn run(config: &Config, target: Target, dry_run: bool) -> Result<RunReport> {
    let report = if dry_run {
        log::info!("Dry run: queue output stays in memory");
        let (report, store) = execute(config, MemoryStore::new(), &target).await?;
        log::info!(
            "Memory store holds {} list records and {} keys",
            store.list(&config.queues.convolutional_queue).len(),
            store.key_count()
        );
        report
    } else {
        let store = RedisStore::connect(&config.store).await?;
        execute(config, store, &target).await?.0
    };

    report.log_summary();
    Ok(report)
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = config::load_all(&cli.config);
    let (level, configured_log) = match &loaded {
        Ok(config) => (config.logging.level.clone(), config.logging.file.clone()),
        Err(_) => ("info".to_string(), None),
    };
    init_logging(
        cli.verbose,
        &level,
        cli.log_file.as_deref().or(configured_log.as_deref()),
    )?;

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            return Err(e);
        }
    };
    log::info!("Loaded configuration from {}", cli.config.display());

    match cli.command {
        Command::Run {
            input_dir,
            dry_run,
            report,
        } => {
            let dir = input_dir.unwrap_or_else(|| config.input.dir.clone());
            let summary = run(&config, Target::Directory(dir), dry_run).await?;

            if let Some(path) = report {
                std::fs::write(&path, serde_json::to_vec_pretty(&summary)?)?;
                log::info!("Report written to {}", path.display());
            }
        }

        Command::Process { file, dry_run } => {
            run(&config, Target::File(file), dry_run).await?;
        }

        Command::Validate => {
            log::info!("✓ Config OK");
            log::info!("    annotator: {}", config.annotator.url);
            log::info!("    store: {}", config.store.redis_url);
            log::info!("    convolutional queue: {}", config.queues.convolutional_queue);
            log::info!("    expiring ttl: {}s", config.queues.expiring_ttl_secs);
        }
    }

    log::info!("Done!");

    Ok(())
}
