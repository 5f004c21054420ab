//! Run an AVDECC entity on a network interface.
//!
//! ```text
//! sudo cargo run --example entity -- entity.json
//! ```
//!
//! Without a config file the entity binds `eth0` with default settings.
//! Set `RUST_LOG=avdecc=debug` to watch controller traffic.

#[cfg(all(target_os = "linux", feature = "raw-socket"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use avdecc::net::{MonotonicClock, RawSocketTransport};
    use avdecc::{EntityConfig, Orchestrator};
    use tokio::sync::watch;
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("avdecc=info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => EntityConfig::from_json_file(path)?,
        None => EntityConfig::default().validated()?,
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let transport = RawSocketTransport::open(&config.interface)?;
        let mut entity = Orchestrator::start(&config, transport, MonotonicClock::new()).await?;
        println!(
            "Entity 0x{:016X} on {}. Press Ctrl+C to stop.",
            entity.entity().entity_id(),
            config.interface
        );

        let (stop, shutdown) = watch::channel(false);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                let _ = stop.send(true);
            }
        });

        entity.run(shutdown).await?;
        let stats = entity.stats();
        println!(
            "Stopped: {} frames received, {} advertisements, {} AECP responses",
            stats.frames_received, stats.advertisements_sent, stats.aecp_responses
        );
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}

#[cfg(not(all(target_os = "linux", feature = "raw-socket")))]
fn main() {
    eprintln!("This example needs Linux and the `raw-socket` feature.");
}
