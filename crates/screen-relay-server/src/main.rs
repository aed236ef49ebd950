//! Screen relay server binary.
//!
//! Agents POST registrations and base64-encoded frames; a password-holding
//! operator views the latest frame of any session through an auto-refreshing
//! browser page.

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context as _;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use screen_relay_core::SessionRegistry;
use screen_relay_notify::{Notifier, NullNotifier, TelegramNotifier};
use screen_relay_server::{AppState, Config, app};
use screen_relay_store::FrameStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = Config::from_env().context("loading configuration")?;

    let store = FrameStore::new(config.screens_dir.clone(), config.max_image_bytes);
    store
        .ensure_dir()
        .context("creating screens directory")?;

    let notifier: Arc<dyn Notifier> = match &config.telegram {
        Some(telegram) => Arc::new(TelegramNotifier::new(
            telegram.bot_token.clone(),
            telegram.chat_id.clone(),
        )?),
        None => {
            tracing::info!("Telegram credentials not set, notifications disabled");
            Arc::new(NullNotifier)
        }
    };

    let port = config.port;
    let state = AppState {
        registry: Arc::new(SessionRegistry::new()),
        store: Arc::new(store),
        notifier,
        config: Arc::new(config),
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Server listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("binding listener")?;
    axum::serve(listener, app(state)).await.context("serving")?;

    Ok(())
}
