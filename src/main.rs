//! Document Pipeline CLI
//!
//! Single-invocation adapters for the two pipeline stages: `notify` runs the
//! upload notifier against one finalize event, `process` runs the task
//! consumer against one dispatched payload. The hosting runtime invokes one
//! subcommand per event and reads the exit code.

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use document_pipeline::auth::MetadataTokenProvider;
use document_pipeline::dispatch::Disposition;
use document_pipeline::{
    FinalizeEvent, HttpObjectStore, HttpTaskQueue, NotifyOutcome, PipelineConfig, TaskConsumer,
    TextPreviewHandler, UploadNotifier,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "document-pipeline")]
#[command(about = "Dispatch and process document upload tasks via a managed queue")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Handle one finalize notification: enqueue a processing task
    Notify {
        /// Object path of the uploaded document
        #[arg(short, long)]
        name: Option<String>,

        /// Bucket the object was uploaded to (defaults to the configured bucket)
        #[arg(short, long)]
        bucket: Option<String>,

        /// Object generation, when the store versions objects
        #[arg(short, long)]
        generation: Option<u64>,

        /// Read the full notification from a JSON file instead of flags
        #[arg(long)]
        event_file: Option<PathBuf>,

        /// Queue API endpoint override (emulator/testing)
        #[arg(long)]
        queue_endpoint: Option<String>,

        /// Skip bearer authentication on queue API calls
        #[arg(long)]
        anonymous: bool,
    },

    /// Handle one dispatched task payload: fetch and process the document
    Process {
        /// Task payload as a JSON string
        #[arg(short, long)]
        payload: Option<String>,

        /// Read the task payload from a JSON file
        #[arg(long)]
        payload_file: Option<PathBuf>,

        /// Object store endpoint override (emulator/testing)
        #[arg(long)]
        storage_endpoint: Option<String>,

        /// Skip bearer authentication on object store calls
        #[arg(long)]
        anonymous: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Load .env file if present, then populate the config once
    dotenvy::dotenv().ok();
    let config = PipelineConfig::from_env()?;

    match cli.command {
        Commands::Notify {
            name,
            bucket,
            generation,
            event_file,
            queue_endpoint,
            anonymous,
        } => {
            let event = match event_file {
                Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
                None => FinalizeEvent {
                    name: name.unwrap_or_default(),
                    bucket: bucket.unwrap_or_else(|| config.bucket.clone()),
                    generation,
                },
            };

            let mut queue = match &queue_endpoint {
                Some(endpoint) => HttpTaskQueue::with_endpoint(endpoint)?,
                None => HttpTaskQueue::new()?,
            };
            if !anonymous {
                queue = queue.with_token_provider(Arc::new(MetadataTokenProvider::new()?));
            }

            let notifier = UploadNotifier::new(config, Arc::new(queue));

            // Any failure propagates so the trigger runtime records this
            // invocation as failed and applies its own retry.
            match notifier.handle(&event).await? {
                NotifyOutcome::Enqueued(task) => {
                    println!("Task enqueued: {}", task.name);
                }
                NotifyOutcome::Skipped => {
                    println!("Nothing to enqueue (notification carried no object name)");
                }
            }
        }

        Commands::Process {
            payload,
            payload_file,
            storage_endpoint,
            anonymous,
        } => {
            let body = match (payload, payload_file) {
                (Some(inline), _) => inline,
                (None, Some(path)) => std::fs::read_to_string(path)?,
                (None, None) => bail!("either --payload or --payload-file is required"),
            };

            let mut store = match &storage_endpoint {
                Some(endpoint) => HttpObjectStore::with_endpoint(endpoint)?,
                None => HttpObjectStore::new()?,
            };
            if !anonymous {
                store = store.with_token_provider(Arc::new(MetadataTokenProvider::new()?));
            }

            let consumer = TaskConsumer::new(
                config.consumer.clone(),
                Arc::new(store),
                Arc::new(TextPreviewHandler::new()),
            );

            info!(
                "Consumer registered on queue '{}' (max {} attempts, min backoff {:?})",
                consumer.config().queue_name,
                consumer.config().retry.max_attempts,
                consumer.config().retry.min_backoff
            );

            let result = consumer.process_payload(&body).await;
            match &result {
                Ok(response) => {
                    println!("{}", serde_json::to_string(response)?);
                }
                Err(e) => {
                    error!("Error during document processing: {}", e);
                }
            }

            // The exit code tells the harness whether to redeliver.
            let disposition = Disposition::of(&result);
            if disposition != Disposition::Ack {
                std::process::exit(disposition.exit_code());
            }
        }
    }

    Ok(())
}
