use clap::Parser;
use orders_pubsub::utils::logger;
use orders_pubsub::{AppConfig, DaprClient, PubSubError, PublishLoop, PublisherArgs};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = PublisherArgs::parse();

    // 初始化日誌
    logger::init(args.verbose, args.json_logs);

    tracing::info!("Starting orders publisher");
    if args.verbose {
        tracing::debug!("CLI args: {:?}", args);
    }

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => exit_with(e),
    };

    let client = match DaprClient::new(config.sidecar.clone()) {
        Ok(client) => client,
        Err(e) => exit_with(e),
    };

    if args.no_wait {
        tracing::debug!("Skipping sidecar readiness check");
    } else if let Err(e) = client.wait_until_ready(config.sidecar.ready_timeout()).await {
        exit_with(e);
    }

    let publish_loop = PublishLoop::new(client, config.publisher);
    match publish_loop.run().await {
        Ok(summary) => {
            tracing::info!(
                "✅ Published {} messages in {:?}",
                summary.published,
                summary.elapsed
            );
        }
        Err(e) => exit_with(e),
    }

    Ok(())
}

fn load_config(args: &PublisherArgs) -> orders_pubsub::Result<AppConfig> {
    let mut config = AppConfig::load(args.config.as_deref())?;
    args.apply(&mut config);
    config.validate_publisher()?;
    Ok(config)
}

fn exit_with(e: PubSubError) -> ! {
    tracing::error!(
        "❌ Publisher failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    std::process::exit(e.exit_code())
}
