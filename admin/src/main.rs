use std::io::Write;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use showtime_admin::cli::{Command, Console};
use showtime_admin::composer::ShowComposer;
use showtime_admin::config::Config;
use showtime_admin::i18n;
use showtime_admin::services::auth::{AdminUser, StaticTokenProvider};
use showtime_admin::services::notifier::ConsoleNotifier;
use showtime_admin::services::show_api::ShowApiClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env first so RUST_LOG from it reaches the filter below.
    dotenvy::dotenv().ok();

    // Logs go to stderr so they do not interleave with the console output.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "showtime_admin=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env()?;

    tracing::info!(api = %config.api.base_url, "Starting Showtime Admin console");
    if config.auth.token.is_none() {
        tracing::warn!("ADMIN_TOKEN is not set; show API requests will fail");
    }

    let backend = Arc::new(ShowApiClient::new(&config.api)?);
    let tokens = Arc::new(StaticTokenProvider::new(config.auth.token.clone()));
    let composer = ShowComposer::new(
        backend,
        tokens,
        Arc::new(ConsoleNotifier),
        config.display.lang.clone(),
    );

    let initial_user = config
        .auth
        .user_id
        .clone()
        .map(|id| AdminUser::new(id, config.auth.user_name.clone()));
    let (user_tx, mut user_rx) = watch::channel(initial_user);
    let mut console = Console::new(composer, user_tx, config.display.clone());

    println!("{}", i18n::tr(Some(console.lang()), "app.name", None));

    // Run the user effect once for the identity we started with.
    let user = user_rx.borrow_and_update().clone();
    match console.user_changed(user).await {
        Some(listing) => println!("{}", listing),
        None => println!("{}", i18n::tr(Some(console.lang()), "session.required", None)),
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    prompt();
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                tracing::info!("Shutdown signal received");
                break;
            }
            changed = user_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let user = user_rx.borrow_and_update().clone();
                if let Some(listing) = console.user_changed(user).await {
                    println!("{}", listing);
                    prompt();
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match Command::parse(&line) {
                    Ok(Some(Command::Quit)) => break,
                    Ok(Some(command)) => {
                        let output = console.execute(command).await;
                        if !output.is_empty() {
                            println!("{}", output);
                        }
                    }
                    Ok(None) => {}
                    Err(e) => println!("{}", e.user_message(console.lang())),
                }
                prompt();
            }
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

fn prompt() {
    let mut out = std::io::stdout().lock();
    let _ = write!(out, "> ");
    let _ = out.flush();
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = ctrl_c => {},
                    _ = term.recv() => {},
                }
            }
            Err(e) => {
                tracing::warn!("Failed to bind SIGTERM: {}", e);
                let _ = ctrl_c.await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = ctrl_c.await;
    }
}
