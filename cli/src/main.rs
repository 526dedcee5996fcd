//! CLI entrypoint for content-forge
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use chrono::Utc;
use clap::Parser;
use forge_application::{
    AuthProvider, ContentHistoryUseCase, ContentRepository, FeedbackNotifier,
    GenerateContentInput, GenerateContentUseCase, HistoryError,
};
use forge_domain::{ConfigIssue, ResponseNormalizer, UserId};
use forge_infrastructure::{
    ConfigLoader, FileConfig, FileStorageConfig, InMemoryContentRepository,
    JsonFileContentRepository, LocalSessionStore, PostgrestContentRepository,
    StorageBackend, WebhookGateway, XmlMarkupParser,
};
use forge_presentation::{Cli, Command, ConsoleFormatter, OutputFormatter, feedback_for, formatter_for};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Keep the guard alive so buffered log lines are flushed on exit
    let _log_guard = init_logging(cli.verbose, cli.log_file.as_deref())?;

    info!("Starting content-forge");

    // Load configuration
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
    }
    .map_err(|e| anyhow!("Failed to load configuration: {e}"))?;

    if cli.show_config {
        for line in ConfigLoader::describe_sources(cli.config.as_deref()) {
            println!("{line}");
        }
        report_issues(&config.validate());
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command.clone() else {
        bail!("No command given. Run `content-forge --help` for usage.");
    };

    ConsoleFormatter::set_color(config.output.color);
    let format = cli
        .output_format()
        .or(config.output.format)
        .unwrap_or_default();
    let formatter = formatter_for(format);
    let feedback = feedback_for(cli.quiet);

    // === Dependency Injection ===
    let session_path = config
        .auth
        .session_path()
        .context("Could not determine the data directory; set auth.session_file")?;
    let session = Arc::new(LocalSessionStore::new(session_path));

    match command {
        Command::Login { user_id } => {
            let user = UserId::new(user_id).map_err(|e| anyhow!("{e}"))?;
            let stored = session.sign_in(user).await?;
            println!("{}", formatter.user(Some(&stored.user_id)));
            Ok(ExitCode::SUCCESS)
        }
        Command::Logout => {
            session.sign_out().await?;
            feedback.success("Signed out");
            Ok(ExitCode::SUCCESS)
        }
        Command::Whoami => {
            let user = session.current_user().await?;
            println!("{}", formatter.user(user.as_ref()));
            Ok(ExitCode::SUCCESS)
        }
        Command::Generate { prompt } => {
            ensure_valid(&config.validate())?;
            let storage = Storage::open(&config.storage).await?;
            let gateway = Arc::new(WebhookGateway::from_config(&config.webhook)?);
            let normalizer = ResponseNormalizer::new(Arc::new(XmlMarkupParser))
                .with_xml_fallback(config.normalizer.xml_fallback);
            info!(url = gateway.url(), "Using generation webhook");

            let use_case =
                GenerateContentUseCase::new(session, gateway, normalizer, storage.repository);
            let input = GenerateContentInput::new(prompt.join(" "));
            match use_case.execute(input, feedback.as_ref()).await {
                Ok(record) => {
                    println!("{}", formatter.record(&record, Utc::now()));
                    Ok(ExitCode::SUCCESS)
                }
                Err(_) => Ok(ExitCode::FAILURE),
            }
        }
        Command::History => {
            let (history, _) = history_use_case(&config, session).await?;
            match history.list(feedback.as_ref()).await {
                Ok(records) => {
                    println!("{}", formatter.history(&records, Utc::now()));
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => Ok(report_history_error(&e, feedback.as_ref())),
            }
        }
        Command::Edit { id, content } => {
            let (history, _) = history_use_case(&config, session).await?;
            match history.update(id, &content, feedback.as_ref()).await {
                Ok(record) => {
                    println!("{}", formatter.record(&record, Utc::now()));
                    Ok(ExitCode::SUCCESS)
                }
                Err(_) => Ok(ExitCode::FAILURE),
            }
        }
        Command::Delete { id } => {
            let (history, _) = history_use_case(&config, session).await?;
            match history.delete(id, feedback.as_ref()).await {
                Ok(()) => Ok(ExitCode::SUCCESS),
                Err(_) => Ok(ExitCode::FAILURE),
            }
        }
        Command::Watch { poll_secs } => {
            let (history, file) = history_use_case(&config, session).await?;
            watch(
                &history,
                file,
                Duration::from_secs(poll_secs.max(1)),
                formatter.as_ref(),
                feedback.as_ref(),
            )
            .await
        }
    }
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let Some(path) = log_file else {
        builder.with_writer(std::io::stderr).init();
        return Ok(None);
    };

    let file_name = path
        .file_name()
        .with_context(|| format!("--log-file must name a file: {}", path.display()))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(
        &dir, file_name,
    ));
    builder.with_writer(writer).with_ansi(false).init();
    Ok(Some(guard))
}

/// The repository chosen by `[storage] backend`, plus the file adapter when
/// there is one (`watch` polls it for changes from other processes).
struct Storage {
    repository: Arc<dyn ContentRepository>,
    file: Option<Arc<JsonFileContentRepository>>,
}

impl Storage {
    async fn open(config: &FileStorageConfig) -> Result<Self> {
        match config.backend {
            StorageBackend::File => {
                let path = config
                    .history_path()
                    .context("Could not determine the data directory; set storage.path")?;
                let file = Arc::new(JsonFileContentRepository::open(path).await?);
                Ok(Self {
                    repository: file.clone(),
                    file: Some(file),
                })
            }
            StorageBackend::Memory => {
                warn!("Using in-memory storage; history is lost on exit");
                Ok(Self {
                    repository: Arc::new(InMemoryContentRepository::new()),
                    file: None,
                })
            }
            StorageBackend::Postgrest => Ok(Self {
                repository: Arc::new(PostgrestContentRepository::from_config(&config.postgrest)?),
                file: None,
            }),
        }
    }
}

async fn history_use_case(
    config: &FileConfig,
    session: Arc<LocalSessionStore>,
) -> Result<(ContentHistoryUseCase, Option<Arc<JsonFileContentRepository>>)> {
    ensure_valid(&config.validate_storage())?;
    let storage = Storage::open(&config.storage).await?;
    Ok((
        ContentHistoryUseCase::new(session, storage.repository),
        storage.file,
    ))
}

async fn watch(
    history: &ContentHistoryUseCase,
    file: Option<Arc<JsonFileContentRepository>>,
    poll_interval: Duration,
    formatter: &dyn OutputFormatter,
    feedback: &dyn FeedbackNotifier,
) -> Result<ExitCode> {
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        });
    }

    let poller = file.as_ref().map(|file| {
        info!(path = %file.path().display(), "Polling history file for changes");
        file.spawn_file_poller(poll_interval)
    });

    let result = history
        .watch(cancel, feedback, |snapshot| {
            println!("{}", formatter.snapshot(&snapshot, Utc::now()));
        })
        .await;

    if let Some(poller) = poller {
        poller.abort();
    }

    match result {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => Ok(report_history_error(&e, feedback)),
    }
}

/// List and watch don't notify on a missing session themselves
fn report_history_error(error: &HistoryError, feedback: &dyn FeedbackNotifier) -> ExitCode {
    if matches!(error, HistoryError::NotAuthenticated | HistoryError::Auth(_)) {
        feedback.error(&error.to_string());
    }
    ExitCode::FAILURE
}

fn report_issues(issues: &[ConfigIssue]) {
    for issue in issues {
        if issue.is_error() {
            eprintln!("error: {}", issue.message);
        } else {
            eprintln!("warning: {}", issue.message);
        }
    }
}

/// Log warnings, fail on errors
fn ensure_valid(issues: &[ConfigIssue]) -> Result<()> {
    for issue in issues.iter().filter(|i| !i.is_error()) {
        warn!("{}", issue.message);
    }
    let errors: Vec<_> = issues.iter().filter(|i| i.is_error()).cloned().collect();
    if errors.is_empty() {
        return Ok(());
    }
    report_issues(&errors);
    bail!(
        "Invalid configuration ({} error{}). Run with --show-config to see the sources in use.",
        errors.len(),
        if errors.len() == 1 { "" } else { "s" }
    )
}
