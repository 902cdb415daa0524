use log::{error, info};
use tokio::sync::watch;

use plant_shadow_monitor::config::DashboardConfig;
use plant_shadow_monitor::models::DashboardView;
use plant_shadow_monitor::render::render_dashboard;
use plant_shadow_monitor::shadow::{NetpieShadowClient, Poller};

async fn display_loop(mut views: watch::Receiver<DashboardView>) {
    loop {
        let frame = render_dashboard(&views.borrow_and_update());
        println!("{}\n", frame);

        // Sender is gone once the poller stops
        if views.changed().await.is_err() {
            break;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp_secs()
        .init();

    // Load configuration
    let config = match DashboardConfig::new() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e);
        }
    };

    let client = match NetpieShadowClient::new(&config) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create HTTP client: {}", e);
            return Err(e.into());
        }
    };

    let (poller, views) = Poller::new(client, config.calibration);
    let poller = poller.spawn();

    // Handle Ctrl+C gracefully
    let (tx, mut rx) = tokio::sync::oneshot::channel();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        let _ = tx.send(());
    });

    // Render until the poller ends or the user quits
    tokio::select! {
        _ = display_loop(views) => {
            info!("Poller stopped");
        }
        _ = &mut rx => {
            info!("Program terminated by user. Exiting gracefully.");
        }
    }

    poller.stop().await;

    Ok(())
}
