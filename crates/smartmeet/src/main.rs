//! # smartmeet
//!
//! Server binary — wires settings, the invite store, delivery transports and
//! the HTTP API together and starts listening.

#![deny(unsafe_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use smartmeet_server::AppState;
use smartmeet_settings::{MessagingSettings, SmartmeetSettings, SmtpSettings};
use smartmeet_store::{seed_demo_data, ConnectionConfig, InviteStore};
use smartmeet_templates::TemplateKind;
use smartmeet_transport::{
    MessagingApi, MessagingConfig, SmtpConfig, SmtpMailer, StubTransport, Transport,
};

/// Smartmeet invitation server.
#[derive(Parser, Debug)]
#[command(name = "smartmeet", about = "Meeting invitation generator and sender")]
struct Cli {
    /// Host to bind (overrides settings).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind (overrides settings).
    #[arg(long)]
    port: Option<u16>,

    /// Path to the SQLite database (overrides settings).
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Seed the demo organization and contacts on startup.
    #[arg(long)]
    seed_demo: bool,
}

/// Expand a leading `~` to the home directory.
fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
        PathBuf::from(home).join(rest)
    } else {
        PathBuf::from(path)
    }
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }
    Ok(())
}

/// Build the email transport: real SMTP when credentials are configured,
/// the recording stub otherwise (demo mode).
fn build_mailer(smtp: &SmtpSettings) -> Result<Arc<dyn Transport>> {
    if smtp.username.is_some() && smtp.password.is_some() {
        let mailer = SmtpMailer::new(&SmtpConfig {
            host: smtp.host.clone(),
            port: smtp.port,
            username: smtp.username.clone(),
            password: smtp.password.clone(),
            from: smtp.from.clone(),
        })
        .context("failed to build SMTP transport")?;
        tracing::info!(host = %smtp.host, "SMTP delivery enabled");
        Ok(Arc::new(mailer))
    } else {
        tracing::info!("no SMTP credentials — email sends are recorded, not delivered");
        Ok(Arc::new(StubTransport::new(
            smartmeet_core::entities::DeliveryMethod::Email,
        )))
    }
}

/// Build the messaging transport: the HTTP API when a key is configured,
/// the recording stub otherwise.
fn build_messenger(messaging: &MessagingSettings) -> Arc<dyn Transport> {
    match &messaging.api_key {
        Some(api_key) if !messaging.api_url.is_empty() => {
            tracing::info!(url = %messaging.api_url, "messaging delivery enabled");
            Arc::new(MessagingApi::new(MessagingConfig {
                api_url: messaging.api_url.clone(),
                api_key: api_key.clone(),
            }))
        }
        _ => {
            tracing::info!("no messaging API key — messaging sends are recorded, not delivered");
            Arc::new(StubTransport::new(
                smartmeet_core::entities::DeliveryMethod::Messaging,
            ))
        }
    }
}

fn default_kind(settings: &SmartmeetSettings) -> TemplateKind {
    TemplateKind::parse(&settings.templates.default_kind).unwrap_or_else(|| {
        tracing::warn!(
            kind = %settings.templates.default_kind,
            "unknown default template kind in settings, using formal_internal"
        );
        TemplateKind::FormalInternal
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Cli::parse();
    let settings = smartmeet_settings::load_settings().unwrap_or_else(|err| {
        tracing::warn!(error = %err, "failed to load settings, using defaults");
        SmartmeetSettings::default()
    });

    let db_path = args
        .db_path
        .unwrap_or_else(|| expand_home(&settings.database.path));
    ensure_parent_dir(&db_path)?;
    let store = InviteStore::open(
        &db_path.to_string_lossy(),
        &ConnectionConfig {
            pool_size: settings.database.pool_size,
            busy_timeout_ms: settings.database.busy_timeout_ms,
            ..ConnectionConfig::default()
        },
    )
    .context("failed to open database")?;
    let store = Arc::new(store);

    if args.seed_demo {
        let inserted = seed_demo_data(&store).context("failed to seed demo data")?;
        tracing::info!(inserted, "demo data seeded");
    }

    let state = AppState::new(
        Arc::clone(&store),
        build_mailer(&settings.smtp)?,
        build_messenger(&settings.messaging),
        default_kind(&settings),
    );

    let host = args.host.unwrap_or(settings.server.host);
    let port = args.port.unwrap_or(settings.server.port);
    let listener = tokio::net::TcpListener::bind((host.as_str(), port))
        .await
        .with_context(|| format!("failed to bind {host}:{port}"))?;
    let addr = listener.local_addr().context("failed to read bound address")?;
    tracing::info!(%addr, db = %db_path.display(), "smartmeet listening");

    axum::serve(listener, smartmeet_server::app(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await
        .context("server error")?;

    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn cli_defaults_to_settings() {
        let cli = Cli::parse_from(["smartmeet"]);
        assert_eq!(cli.host, None);
        assert_eq!(cli.port, None);
        assert!(!cli.seed_demo);
    }

    #[test]
    fn cli_overrides_parse() {
        let cli = Cli::parse_from([
            "smartmeet",
            "--host",
            "0.0.0.0",
            "--port",
            "8080",
            "--db-path",
            "/tmp/test.db",
            "--seed-demo",
        ]);
        assert_eq!(cli.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(cli.port, Some(8080));
        assert_eq!(cli.db_path, Some(PathBuf::from("/tmp/test.db")));
        assert!(cli.seed_demo);
    }

    #[test]
    fn expand_home_replaces_tilde() {
        let path = expand_home("~/.smartmeet/smartmeet.db");
        assert!(!path.to_string_lossy().starts_with('~'));
        assert!(path.to_string_lossy().ends_with(".smartmeet/smartmeet.db"));
    }

    #[test]
    fn expand_home_leaves_absolute_paths() {
        assert_eq!(expand_home("/var/db/x.db"), PathBuf::from("/var/db/x.db"));
    }

    #[test]
    fn ensure_parent_dir_creates_nested() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("test.db");
        ensure_parent_dir(&path).unwrap();
        assert!(path.parent().unwrap().exists());
    }

    #[test]
    fn transports_fall_back_to_stubs_without_credentials() {
        let settings = SmartmeetSettings::default();
        let mailer = build_mailer(&settings.smtp).unwrap();
        assert_eq!(
            mailer.method(),
            smartmeet_core::entities::DeliveryMethod::Email
        );
        let messenger = build_messenger(&settings.messaging);
        assert_eq!(
            messenger.method(),
            smartmeet_core::entities::DeliveryMethod::Messaging
        );
    }

    #[test]
    fn unknown_default_kind_falls_back() {
        let settings = SmartmeetSettings {
            templates: smartmeet_settings::TemplateSettings {
                default_kind: "town_hall".to_string(),
            },
            ..SmartmeetSettings::default()
        };
        assert_eq!(default_kind(&settings), TemplateKind::FormalInternal);
    }
}
