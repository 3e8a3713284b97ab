use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use turnstile::config::Config;
use turnstile::directory::{FlakyLink, InstantLink, Link};
use turnstile::error::ServerError;
use turnstile::{InMemoryDirectory, LoginFlow, ProfileFlow, RegisterFlow};

/// Attempts per operation before giving up on a flaky server.
const MAX_ATTEMPTS: usize = 10;

#[derive(Parser, Debug)]
#[command(name = "turnstile", about = "Drives the simulated sign-in core end to end")]
struct Cli {
    /// Read configuration from a TOML file instead of the environment
    #[arg(long)]
    config: Option<PathBuf>,

    /// Zero-latency, zero-failure link (deterministic run)
    #[arg(long)]
    instant: bool,

    /// Override the transient-failure probability
    #[arg(long)]
    failure_rate: Option<f32>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let mut cfg = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::from_env()?,
    };
    if let Some(rate) = cli.failure_rate {
        cfg.failure_rate = rate;
    }

    let link: Arc<dyn Link> = if cli.instant {
        Arc::new(InstantLink)
    } else {
        Arc::new(FlakyLink::new(cfg.delay_range(), cfg.failure_rate))
    };
    let directory = Arc::new(InMemoryDirectory::new(link, cfg.seed_credentials()));

    // Step 1: sign up a fresh account.
    let register = RegisterFlow::new(directory.clone());
    register.on_login_change("newuser1");
    register.on_password_change("abcd1234");
    register.on_repeat_password_change("abcd1234");

    for attempt in 1..=MAX_ATTEMPTS {
        register.submit().await;
        if register.succeeded().last() {
            tracing::info!(attempt, "signed up as newuser1");
            break;
        }
        let state = register.state();
        tracing::warn!(attempt, error=?state.sign_error, "sign-up attempt failed");
        if state.sign_error != Some(ServerError::NotAvailable) {
            anyhow::bail!("sign-up failed: {:?}", state.sign_error);
        }
    }
    anyhow::ensure!(
        register.succeeded().last(),
        "server unavailable for {MAX_ATTEMPTS} sign-up attempts"
    );

    // Step 2: the profile screen resolves the fresh session and signs out.
    let profile = ProfileFlow::new(directory.clone());
    for attempt in 1..=MAX_ATTEMPTS {
        profile.fetch_user().await;
        if profile.state().fetch_error.is_none() {
            break;
        }
        tracing::warn!(attempt, "profile fetch failed, retrying");
    }
    anyhow::ensure!(profile.state().fetch_error.is_none(), "could not resolve profile");
    tracing::info!(username=%profile.state().username, "profile resolved");

    for attempt in 1..=MAX_ATTEMPTS {
        profile.log_out().await;
        if profile.logged_out().last() {
            break;
        }
        tracing::warn!(attempt, "log-out failed, retrying");
    }
    anyhow::ensure!(profile.logged_out().last(), "could not sign out");

    // Step 3: sign back in with the seeded account, watching state updates.
    let login = LoginFlow::new(directory.clone());
    let mut states = login.subscribe();
    tokio::spawn(async move {
        while states.changed().await.is_ok() {
            let s = states.borrow_and_update().clone();
            tracing::debug!(loading = s.loading, sign_error = ?s.sign_error, "sign-in state");
        }
    });

    login.on_login_change(&cfg.seed_login);
    login.on_password_change(&cfg.seed_password);

    for attempt in 1..=MAX_ATTEMPTS {
        login.submit().await;
        if login.succeeded().last() {
            tracing::info!(attempt, login=%cfg.seed_login, "signed in");
            break;
        }
        let state = login.state();
        tracing::warn!(attempt, error=?state.sign_error, "sign-in attempt failed");
        if state.sign_error != Some(ServerError::NotAvailable) {
            anyhow::bail!("sign-in failed: {:?}", state.sign_error);
        }
    }
    anyhow::ensure!(
        login.succeeded().last(),
        "server unavailable for {MAX_ATTEMPTS} sign-in attempts"
    );

    tracing::info!("demo pass complete");
    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, prelude::*};

    color_eyre::install().unwrap();

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_timer(tracing_subscriber::fmt::time::uptime()),
        )
        .with(tracing_error::ErrorLayer::default())
        .init();
}
