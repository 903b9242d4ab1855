use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use debo_bots::auth::{ServiceAccountKey, TokenProvider};
use debo_bots::bots::{RegistryBot, RequestsBot};
use debo_bots::config::{Config, RegistryConfig, RequestsConfig};
use debo_bots::drive::{DriveUploader, ObjectUploader};
use debo_bots::flows::{FileIntake, UploadFolders};
use debo_bots::records::{ProfessionalDirectory, RequestLog};
use debo_bots::session::{spawn_expiry_task, SessionStore};
use debo_bots::sheets::{RecordStore, SheetStore, SheetsClient};
use debo_bots::telegram::{FileFetcher, Outbox, TelegramApi};
use debo_bots::{health, monitor};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // The guard flushes the file layer; it must live as long as the process.
    let _log_guard = init_tracing(&config.log_file);

    eprintln!("🤖 Debo Bots v{}", env!("CARGO_PKG_VERSION"));
    eprintln!(
        "   Registry bot: {}",
        if config.registry.is_some() {
            "enabled"
        } else {
            "disabled"
        }
    );
    eprintln!(
        "   Requests bot: {}",
        if config.requests.is_some() {
            "enabled"
        } else {
            "disabled"
        }
    );
    eprintln!("   Health: http://0.0.0.0:{}/health", config.http_port);
    eprintln!("   Log file: {}\n", config.log_file.display());

    // ── Google backends ─────────────────────────────────────────────
    let key = ServiceAccountKey::load(&config.credentials)?;
    let tokens = Arc::new(TokenProvider::new(key));
    let sheets = Arc::new(SheetsClient::new(Arc::clone(&tokens)));

    // ── Bots ────────────────────────────────────────────────────────
    if let Some(registry) = config.registry {
        spawn_registry_bot(
            registry,
            Arc::clone(&sheets),
            Arc::clone(&tokens),
            config.session_idle_timeout,
        )
        .await;
    }
    if let Some(requests) = config.requests {
        spawn_requests_bot(requests, Arc::clone(&sheets), config.session_idle_timeout).await;
    }

    monitor::spawn_monitor(config.monitor_interval);

    // Blocks for the life of the process.
    health::serve(config.http_port).await?;
    Ok(())
}

fn init_tracing(log_file: &Path) -> tracing_appender::non_blocking::WorkerGuard {
    let dir = log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let name = log_file
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "log.txt".into());
    let appender = tracing_appender::rolling::never(dir, name);
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_writer)
                .with_target(false)
                .with_ansi(false),
        )
        .init();

    guard
}

async fn probe(api: &TelegramApi, bot: &str) {
    match tokio::time::timeout(Duration::from_secs(10), api.health_check()).await {
        Ok(Ok(())) => tracing::info!(bot, "bot API reachable"),
        Ok(Err(e)) => tracing::warn!(bot, error = %e, "bot API probe failed"),
        Err(_) => tracing::warn!(bot, "bot API probe timed out"),
    }
}

async fn spawn_registry_bot(
    cfg: RegistryConfig,
    sheets: Arc<SheetsClient>,
    tokens: Arc<TokenProvider>,
    idle_timeout: Duration,
) {
    let api = Arc::new(TelegramApi::new(cfg.bot_token));
    probe(&api, "registry").await;

    let store = Arc::new(SheetStore::new(sheets, cfg.sheet));
    let directory = ProfessionalDirectory::new(store as Arc<dyn RecordStore>);
    let uploader = Arc::new(DriveUploader::new(tokens));
    let intake = Arc::new(FileIntake::new(
        Arc::clone(&api) as Arc<dyn FileFetcher>,
        uploader as Arc<dyn ObjectUploader>,
    ));
    let folders = UploadFolders {
        testimonials: cfg.testimonials_folder,
        education: cfg.education_folder,
    };
    let sessions = Arc::new(SessionStore::new(idle_timeout));
    spawn_expiry_task(Arc::clone(&sessions));

    let bot = RegistryBot::new(
        Arc::clone(&api) as Arc<dyn Outbox>,
        directory,
        intake,
        folders,
        sessions,
    );
    tokio::spawn(async move {
        loop {
            bot.run(api.update_stream()).await;
            tracing::warn!("registry bot stopped, restarting in 5s");
            tokio::time::sleep(Duration::from_secs(5)).await;
        }
    });
}

async fn spawn_requests_bot(
    cfg: RequestsConfig,
    sheets: Arc<SheetsClient>,
    idle_timeout: Duration,
) {
    let api = Arc::new(TelegramApi::new(cfg.bot_token));
    probe(&api, "requests").await;

    let store = Arc::new(SheetStore::new(sheets, cfg.sheet));
    let log = RequestLog::new(store as Arc<dyn RecordStore>);
    let sessions = Arc::new(SessionStore::new(idle_timeout));
    spawn_expiry_task(Arc::clone(&sessions));

    let bot = RequestsBot::new(Arc::clone(&api) as Arc<dyn Outbox>, log, sessions);
    tokio::spawn(async move {
        loop {
            bot.run(api.update_stream()).await;
            tracing::warn!("requests bot stopped, restarting in 5s");
            tokio::time::sleep(Duration::from_secs(5)).await;
        }
    });
}
