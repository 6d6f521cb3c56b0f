use clap::Parser;
use orders_pubsub::utils::logger;
use orders_pubsub::{build_router, server, AppConfig, PubSubError, SubscriberArgs, SubscriberState};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = SubscriberArgs::parse();

    // 初始化日誌
    logger::init(args.verbose, args.json_logs);

    tracing::info!("Starting orders subscriber");

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => exit_with(e),
    };

    let subscription = config.subscriber.subscription();
    tracing::info!(
        "📋 Subscribed to {}/{} on route {}",
        subscription.pubsubname,
        subscription.topic,
        subscription.route
    );

    let listener = match TcpListener::bind(config.subscriber.bind_address()).await {
        Ok(listener) => listener,
        Err(e) => exit_with(PubSubError::IoError(e)),
    };

    let router = build_router(SubscriberState::new(vec![subscription]));
    if let Err(e) = server::serve(listener, router, shutdown_signal()).await {
        exit_with(e);
    }

    tracing::info!("Subscriber stopped");
    Ok(())
}

fn load_config(args: &SubscriberArgs) -> orders_pubsub::Result<AppConfig> {
    let mut config = AppConfig::load(args.config.as_deref())?;
    args.apply(&mut config);
    config.validate_subscriber()?;
    Ok(config)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("🛑 Shutdown requested");
}

fn exit_with(e: PubSubError) -> ! {
    tracing::error!(
        "❌ Subscriber failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    std::process::exit(e.exit_code())
}
