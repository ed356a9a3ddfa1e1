//! pixdrop CLI - validate and upload images
//!
//! # Commands
//!
//! ```bash
//! pixdrop upload a.png b.jpg              # Upload with a window of 9
//! pixdrop upload --sequential *.png       # One file at a time
//! pixdrop upload -w 4 -o report.json *.png
//! pixdrop check *.png                      # Validate only, no network
//! ```
//!
//! Endpoint and API key come from `PIXDROP_UPLOAD_URL` and `PIXDROP_API_KEY`
//! (a `.env` file is loaded first); flags override them.

mod console;

use bytes::Bytes;
use clap::{Parser, Subcommand};
use pixdrop::config::{
    ENV_API_KEY, ENV_CONCURRENCY, ENV_PREVIEW_BASE_URL, ENV_UPLOAD_URL,
};
use pixdrop::{
    format_size, mime_from_extension, validate_selection, BatchError, CandidateFile, HttpTransport,
    SchedulePolicy, UploadConfig, UploadSession, MAX_FILE_SIZE,
};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use crate::console::{ConsoleNotifier, ProgressBoard};

#[derive(Parser)]
#[command(name = "pixdrop")]
#[command(about = "Validate and upload image files with per-file progress", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate and upload image files
    Upload {
        /// Files to upload
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Upload one file at a time
        #[arg(long, conflicts_with = "window")]
        sequential: bool,

        /// Maximum uploads in flight (default: 9)
        #[arg(short, long)]
        window: Option<usize>,

        /// Upload endpoint (overrides PIXDROP_UPLOAD_URL)
        #[arg(long)]
        endpoint: Option<String>,

        /// API key (overrides PIXDROP_API_KEY)
        #[arg(long)]
        api_key: Option<String>,

        /// Preview base URL (overrides PIXDROP_PREVIEW_BASE_URL)
        #[arg(long)]
        preview_base: Option<String>,

        /// Declared MIME type for every file instead of guessing from the extension
        #[arg(long)]
        content_type: Option<String>,

        /// Write the JSON batch report to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Don't draw progress bars
        #[arg(long)]
        no_progress: bool,
    },

    /// Report which files would be accepted, without uploading
    Check {
        /// Files to check
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Size limit in bytes (default: 11 MiB)
        #[arg(long)]
        max_size: Option<u64>,

        /// Declared MIME type for every file instead of guessing from the extension
        #[arg(long)]
        content_type: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();
    init_logging();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Upload {
            files,
            sequential,
            window,
            endpoint,
            api_key,
            preview_base,
            content_type,
            output,
            no_progress,
        } => {
            let overrides = Overrides {
                endpoint,
                api_key,
                preview_base,
                window,
            };
            cmd_upload(
                &files,
                overrides,
                sequential,
                content_type.as_deref(),
                output.as_deref(),
                !no_progress,
            )
            .await
        }

        Commands::Check {
            files,
            max_size,
            content_type,
        } => cmd_check(&files, max_size, content_type.as_deref()).await,
    };

    if let Err(e) = result {
        if !already_notified(e.as_ref()) {
            eprintln!("❌ Error: {}", e);
        }
        std::process::exit(1);
    }
}

/// Errors the session has already shown through the notifier.
fn already_notified(err: &(dyn std::error::Error + 'static)) -> bool {
    matches!(
        err.downcast_ref::<BatchError>(),
        Some(BatchError::EmptySelection | BatchError::AlreadyRunning)
    )
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Command-line values that take precedence over the environment.
struct Overrides {
    endpoint: Option<String>,
    api_key: Option<String>,
    preview_base: Option<String>,
    window: Option<usize>,
}

impl Overrides {
    fn lookup(&self, key: &str) -> Option<String> {
        let flag = match key {
            ENV_UPLOAD_URL => self.endpoint.clone(),
            ENV_API_KEY => self.api_key.clone(),
            ENV_PREVIEW_BASE_URL => self.preview_base.clone(),
            ENV_CONCURRENCY => self.window.map(|w| w.to_string()),
            _ => None,
        };
        flag.or_else(|| env::var(key).ok())
    }
}

async fn cmd_upload(
    paths: &[PathBuf],
    overrides: Overrides,
    sequential: bool,
    content_type: Option<&str>,
    output: Option<&Path>,
    show_progress: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = UploadConfig::from_lookup(|key| overrides.lookup(key))?;
    if sequential {
        config = config.with_policy(SchedulePolicy::Sequential);
    }

    let files = load_candidates(paths, content_type).await?;

    let session = UploadSession::new(config.clone(), HttpTransport::new(&config));

    let rejects = session.select(files, &ConsoleNotifier::plain())?;
    if !rejects.is_empty() {
        eprintln!("⚠️  {} file(s) skipped", rejects.len());
    }

    let names = session.selected_names();
    let board = ProgressBoard::new(&names, show_progress && !names.is_empty());
    let notifier = board.notifier();
    {
        let board = board.clone();
        session.tracker().subscribe(move |snapshot| board.render(snapshot));
    }

    eprintln!(
        "📤 {} → {} ({})",
        names.len(),
        session.transport().endpoint(),
        match config.policy {
            SchedulePolicy::Sequential => "sequential".to_string(),
            SchedulePolicy::Windowed(n) => format!("window {}", n),
        }
    );

    let report = session.upload_all(&notifier).await;
    board.finish();
    let report = report?;

    for job in &report.jobs {
        match &job.preview_url {
            Some(url) => println!("{}\t{}", job.name, url),
            None => println!("{}\t{}", job.name, job.status),
        }
    }

    if let Some(path) = output {
        let json = serde_json::to_string_pretty(&report)?;
        fs::write(path, json)?;
        eprintln!("💾 Report written to: {}", path.display());
    }

    eprintln!(
        "\n📊 {}: {} succeeded, {} failed",
        session.headline(),
        report.succeeded,
        report.failed
    );

    if !report.all_succeeded() {
        std::process::exit(2);
    }

    Ok(())
}

async fn cmd_check(
    paths: &[PathBuf],
    max_size: Option<u64>,
    content_type: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let limit = max_size.unwrap_or(MAX_FILE_SIZE);
    eprintln!("✔️  Checking {} file(s), limit {}", paths.len(), format_size(limit));

    let files = load_candidates(paths, content_type).await?;
    let selection = validate_selection(files, limit);

    for file in &selection.accepted {
        println!("  ✅ {} ({}, {})", file.name, file.mime_type, format_size(file.size));
    }
    selection.notify_rejections(&ConsoleNotifier::plain());

    eprintln!(
        "\n📊 Results: {} accepted, {} rejected",
        selection.accepted.len(),
        selection.rejected.len()
    );

    if !selection.rejected.is_empty() {
        std::process::exit(1);
    }

    Ok(())
}

/// Read each path into a candidate file.
async fn load_candidates(
    paths: &[PathBuf],
    content_type: Option<&str>,
) -> Result<Vec<CandidateFile<Bytes>>, Box<dyn std::error::Error>> {
    let mut files = Vec::with_capacity(paths.len());

    for path in paths {
        let content = tokio::fs::read(path)
            .await
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        let mime_type = match content_type {
            Some(ct) => ct.to_string(),
            None => path
                .extension()
                .and_then(|e| e.to_str())
                .map(mime_from_extension)
                .unwrap_or(pixdrop::models::FALLBACK_MIME_TYPE)
                .to_string(),
        };

        files.push(CandidateFile::from_bytes(name, mime_type, Bytes::from(content)));
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_candidates_guesses_mime() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("cat.PNG");
        let txt = dir.path().join("notes.txt");
        let bare = dir.path().join("README");
        fs::write(&png, b"png bytes").unwrap();
        fs::write(&txt, b"hello").unwrap();
        fs::write(&bare, b"x").unwrap();

        let files = load_candidates(&[png, txt, bare], None).await.unwrap();

        assert_eq!(files[0].name, "cat.PNG");
        assert_eq!(files[0].mime_type, "image/png");
        assert_eq!(files[0].size, 9);
        assert_eq!(files[1].mime_type, "application/octet-stream");
        assert_eq!(files[2].mime_type, "application/octet-stream");
    }

    #[tokio::test]
    async fn test_load_candidates_override_and_missing() {
        let dir = tempfile::tempdir().unwrap();
        let blob = dir.path().join("blob.bin");
        fs::write(&blob, b"x").unwrap();

        let files = load_candidates(&[blob], Some("image/webp")).await.unwrap();
        assert_eq!(files[0].mime_type, "image/webp");

        let missing = dir.path().join("nope.png");
        let err = load_candidates(&[missing], None).await.unwrap_err();
        assert!(err.to_string().contains("nope.png"));
    }

    #[test]
    fn test_session_errors_are_not_reported_twice() {
        let empty: Box<dyn std::error::Error> = Box::new(BatchError::EmptySelection);
        assert!(already_notified(empty.as_ref()));

        let io: Box<dyn std::error::Error> = "Failed to read a.png".into();
        assert!(!already_notified(io.as_ref()));
    }

    #[test]
    fn test_flags_override_environment() {
        let overrides = Overrides {
            endpoint: Some("https://flag.example/upload".into()),
            api_key: None,
            preview_base: None,
            window: Some(3),
        };
        assert_eq!(
            overrides.lookup(ENV_UPLOAD_URL).as_deref(),
            Some("https://flag.example/upload")
        );
        assert_eq!(overrides.lookup(ENV_CONCURRENCY).as_deref(), Some("3"));
    }

    #[test]
    fn test_cli_parses_upload() {
        let cli = Cli::try_parse_from(["pixdrop", "upload", "--sequential", "a.png", "b.png"]).unwrap();
        match cli.command {
            Commands::Upload { files, sequential, window, .. } => {
                assert_eq!(files.len(), 2);
                assert!(sequential);
                assert!(window.is_none());
            }
            _ => panic!("expected upload"),
        }

        assert!(Cli::try_parse_from(["pixdrop", "upload", "--sequential", "-w", "2", "a.png"]).is_err());
    }
}
