//! Civis daemon — entry point for running the Civis service.

use anyhow::Context;
use civis_rpc::{AppState, RpcServer};
use civis_service::{
    CivicService, Notifier, NotifyError, Principal, ServiceConfig, StaticIdentityProvider,
    SystemClock,
};
use civis_store::UserStore;
use civis_store_mem::MemoryStore;
use civis_types::{PhoneNumber, Role, Timestamp, User};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "civis-daemon", about = "Civis civic-issue reporting service")]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(long, env = "CIVIS_CONFIG")]
    config: Option<PathBuf>,

    /// HTTP API port (overrides the config file).
    #[arg(long, env = "CIVIS_PORT")]
    port: Option<u16>,

    /// Seed an admin user with this phone number at startup.
    #[arg(long, env = "CIVIS_SEED_ADMIN")]
    seed_admin: Option<String>,

    /// Log format: "human" or "json" (overrides the config file).
    #[arg(long, env = "CIVIS_LOG_FORMAT")]
    log_format: Option<String>,
}

/// Notifier that writes alerts to the log. Stands in for an SMS gateway;
/// deployments with a real transport implement `Notifier` against it.
struct LogNotifier {
    recipient: Option<String>,
}

impl Notifier for LogNotifier {
    fn notify(&self, message: &str) -> Result<(), NotifyError> {
        match &self.recipient {
            Some(recipient) => info!(%recipient, message, "alert"),
            None => info!(message, "alert (no recipient configured)"),
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ServiceConfig::from_toml_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => ServiceConfig::default(),
    };
    if let Some(port) = cli.port {
        config.listen_port = port;
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }

    civis_utils::init_tracing(config.log_format == "json");
    info!(
        quorum = config.params.quorum,
        undo_window = %civis_utils::format_duration(config.params.undo_window_secs),
        "verification policy loaded"
    );

    let store = Arc::new(MemoryStore::new());

    if let Some(number) = &cli.seed_admin {
        let phone = PhoneNumber::parse(number).context("parsing --seed-admin")?;
        let mut admin = User::new(phone.clone(), Role::Admin, Timestamp::now());
        admin.is_verified = true;
        store.put_user(&admin)?;
        info!(%phone, "seeded admin user");
    }

    // Each configured credential gets a user record so the service layer
    // recognizes the identity.
    let mut credentials = Vec::with_capacity(config.credentials.len());
    for entry in &config.credentials {
        let phone = PhoneNumber::parse(&entry.phone_number)
            .with_context(|| format!("parsing credential number {:?}", entry.phone_number))?;
        if !store.exists(&phone)? {
            let mut user = User::new(phone.clone(), entry.role, Timestamp::now());
            user.is_verified = true;
            store.put_user(&user)?;
        }
        credentials.push((
            entry.token.clone(),
            Principal {
                phone_number: phone,
                role: entry.role,
            },
        ));
    }
    let identity = Arc::new(StaticIdentityProvider::with_credentials(credentials));

    let notifier = Arc::new(LogNotifier {
        recipient: config.admin_alert_number.clone(),
    });
    let service = Arc::new(CivicService::new(
        store.clone(),
        store,
        notifier,
        Arc::new(SystemClock),
        config.params.clone(),
    ));

    let server = RpcServer::new(config.listen_port);
    server.start(AppState { service, identity }).await?;
    Ok(())
}
