#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use classroom_booking::{ServiceConfig, http_api};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = ServiceConfig::from_env()?;
    let registry = config.build_registry()?;
    tracing::info!(rooms = config.rooms.len(), "loaded room configuration");

    println!(
        "classroom-booking HTTP API listening on http://{}",
        config.http_addr
    );
    http_api::serve(config.http_addr, registry).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
