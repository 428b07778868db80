//! Algoscope Playback Server
//!
//! Load the demo trace and serve the playback API.

use algoscope_vis::{VisConfig, VisServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "algoscope_vis=info,algoscope=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse command line args: [port] [speed_ms]
    let config = VisConfig::from_args(std::env::args().skip(1));

    println!("Algoscope Playback Server");
    println!("=========================");
    println!();
    println!("Auto-play speed: {} ms per step", config.speed_ms);
    println!("Starting server on http://localhost:{}", config.port);
    println!("POST a trace request to /api/trace, then drive it from /api/playback.");
    println!();

    let server = VisServer::new(&config)?;
    server.serve(config.port).await?;

    Ok(())
}
