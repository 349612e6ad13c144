use anyhow::Result;
use dotenvy::dotenv;
use log::{info, warn};
use std::sync::Arc;

use remindme::core::{Clock, Config, SystemClock};
use remindme::features::capability::{
    detect_capability, NotificationCapability, SystemOpener, UrlOpener,
};
use remindme::features::permission::{interaction_loop, spawn_stdin_reader, PermissionGate};
use remindme::features::polling::{HttpReminderSource, PollLoop, PollSettings};
use remindme::features::renderer::NotificationRenderer;
use remindme::features::{get_features, get_version};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting remindme notifier v{}...", get_version());
    for feature in get_features() {
        info!("   - {} {}", feature.name, feature.version);
    }
    info!("🌐 Reminders service: {}", config.base_url);
    if config.api_token.is_none() && config.credentials().is_none() {
        warn!("No API token or credentials configured; requests will be anonymous");
    }

    let opener: Arc<dyn UrlOpener> = Arc::new(SystemOpener);
    let Some(capability) = detect_capability(&config, opener) else {
        info!("No native notification capability on this host; nothing to do");
        return Ok(());
    };
    info!(
        "🔔 Using {} notifications (permission: {})",
        capability.name(),
        capability.permission()
    );

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let source = Arc::new(HttpReminderSource::new(&config)?);
    let renderer = Arc::new(NotificationRenderer::new(
        capability.clone(),
        config.title.clone(),
        config.icon_url.clone(),
    ));
    let poll_loop = PollLoop::new(
        source,
        renderer,
        clock.clone(),
        PollSettings::from_config(&config),
    );

    let gate = Arc::new(PermissionGate::new(capability, clock, Arc::new(poll_loop)));

    // Initial check; a consent prompt may take a while to be answered
    let startup_gate = gate.clone();
    tokio::spawn(async move {
        let outcome = startup_gate.check_and_enable().await;
        info!("Startup permission check: {outcome:?}");
    });

    // Hosts may only honour the consent prompt after a user interaction, so
    // every line typed on the terminal re-runs the check
    info!("Press Enter to re-check notification permission, Ctrl-C to quit");
    tokio::spawn(interaction_loop(gate, spawn_stdin_reader()));

    tokio::signal::ctrl_c().await?;
    info!("Shutting down remindme notifier");

    Ok(())
}
