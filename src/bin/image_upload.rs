//! `image-upload`: validate image files and upload them to Cloudinary with a
//! bounded number of concurrent transfers.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::Parser;

use upload_scheduler::builders::SchedulerBuilder;
use upload_scheduler::config::{CloudinaryConfig, SchedulerConfig};
use upload_scheduler::core::{AppResult, ObserverSet, TracingObserver, UploadScheduler};
use upload_scheduler::infra::CloudinaryTransfer;
use upload_scheduler::runtime::TokioSpawner;
use upload_scheduler::uploader::{EntryStatus, ImageFile, UploadBoard};
use upload_scheduler::util::init_tracing_with;

#[derive(Parser, Debug)]
#[command(author, version, about = "Upload images to Cloudinary with a bounded upload queue")]
struct Cli {
    /// Image files to upload (jpg, jpeg, png, gif, webp; max 5MB each).
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Maximum concurrent uploads (overrides --config).
    #[arg(short = 'j', long)]
    max_concurrent: Option<usize>,

    /// JSON scheduler configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Rounds of re-enqueuing failed uploads.
    #[arg(short, long, default_value_t = 0)]
    retries: u32,
}

#[tokio::main]
async fn main() -> AppResult<()> {
    init_tracing_with("warn");
    let cli = Cli::parse();

    let mut builder = match &cli.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            SchedulerBuilder::from_json_str(&raw)?
        }
        None => SchedulerBuilder::new(SchedulerConfig::default()),
    };
    if let Some(limit) = cli.max_concurrent {
        builder = builder.max_concurrent(limit);
    }

    let board = Arc::new(UploadBoard::new());
    let scheduler = builder
        .observer(
            ObserverSet::new()
                .with(Arc::clone(&board))
                .with(TracingObserver),
        )
        .build(
            CloudinaryTransfer::new(CloudinaryConfig::from_env()?),
            TokioSpawner::current()?,
        )?;

    let mut files = Vec::with_capacity(cli.files.len());
    for path in &cli.files {
        match ImageFile::from_path(path) {
            Ok(file) => files.push(file),
            Err(err) => eprintln!("{}: {err}", path.display()),
        }
    }
    board.select_files(files);
    for error in board.errors() {
        eprintln!("{error}");
    }
    if board.is_empty() {
        bail!("no valid files to upload");
    }

    board.upload_pending(&scheduler);
    wait_until_idle(&board, &scheduler).await;

    for round in 1..=cli.retries {
        if board.retry_failed(&scheduler) == 0 {
            break;
        }
        println!("retry round {round}");
        wait_until_idle(&board, &scheduler).await;
    }

    for entry in board.entries() {
        match (entry.status, &entry.receipt, &entry.error) {
            (EntryStatus::Success, Some(receipt), _) => {
                println!("ok    {}  {}", entry.handle.name, receipt.url);
            }
            (_, _, Some(error)) => println!("error {}  {error}", entry.handle.name),
            _ => println!("{:?} {}", entry.status, entry.handle.name),
        }
    }

    let failed = board.count(EntryStatus::Error);
    if failed > 0 {
        bail!("{failed} of {} uploads failed", board.len());
    }
    Ok(())
}

async fn wait_until_idle(
    board: &UploadBoard<ImageFile>,
    scheduler: &UploadScheduler<ImageFile, TokioSpawner>,
) {
    let mut ticker = tokio::time::interval(Duration::from_millis(250));
    while scheduler.status().is_processing() {
        ticker.tick().await;
        let status = scheduler.status();
        eprint!(
            "\r{:5.1}%  uploading {}  queued {}   ",
            board.overall_progress(),
            status.active_count,
            status.pending_len
        );
    }
    eprintln!();
}
