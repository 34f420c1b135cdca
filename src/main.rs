//! Polymarket Insider-Activity Monitor
//!
//! Watches high-volume prediction markets for suspicious wallet activity.

use clap::{Parser, Subcommand};
use insider_monitor::{
    alert::{AlertDecisionEngine, AlertLedger},
    analysis::InsiderScorer,
    client::PolymarketClient,
    config::Config,
    error::MonitorError,
    monitor::Monitor,
    notify::Notifier,
    pipeline::CyclePipeline,
};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "insider-monitor")]
#[command(about = "Insider-activity monitor for Polymarket prediction markets")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the monitor on its polling interval
    Run,
    /// Run exactly one cycle and print the alerts
    Scan,
    /// Show the markets that would be scanned
    Markets {
        /// Number of top markets to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },
    /// Show a wallet's profile snapshot
    Wallet {
        /// Wallet address
        address: String,
    },
    /// Test Telegram notification
    TestNotify,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config)?;

    match cli.command {
        Commands::Run => run_monitor(config).await,
        Commands::Scan => scan_once(config).await,
        Commands::Markets { limit } => show_markets(config, limit).await,
        Commands::Wallet { address } => show_wallet(config, &address).await,
        Commands::TestNotify => test_notify(config).await,
    }
}

fn build_pipeline(config: &Config) -> anyhow::Result<CyclePipeline> {
    let client = PolymarketClient::new(&config.polymarket)?;
    let cooldown = config
        .alerts
        .cooldown_minutes_or(config.scanner.cycle_interval_minutes);

    Ok(CyclePipeline::new(
        Arc::new(client.gamma),
        Arc::new(client.data.clone()),
        Arc::new(client.data),
        InsiderScorer::new(config.scoring.clone()),
        AlertDecisionEngine::new(config.alerts.threshold),
        AlertLedger::new(cooldown),
        config.scanner.clone(),
    ))
}

async fn run_monitor(config: Config) -> anyhow::Result<()> {
    tracing::info!("Starting insider monitor");

    let notifier = if let Some(tg) = &config.telegram {
        Notifier::new(tg.bot_token.clone(), tg.chat_id.clone())
    } else {
        tracing::warn!("Telegram not configured, notifications disabled");
        Notifier::disabled()
    };

    if let Err(e) = notifier.startup().await {
        tracing::warn!("Failed to send startup notification: {}", e);
    }

    let pipeline = build_pipeline(&config)?;
    let monitor = Monitor::new(1000);
    let notify_errors = config
        .telegram
        .as_ref()
        .map(|t| t.notify_errors)
        .unwrap_or(false);

    let mut interval = tokio::time::interval(Duration::from_secs(
        config.scanner.cycle_interval_minutes * 60,
    ));

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutting down");
                monitor.log_stats().await;
                return Ok(());
            }
        }

        let report = tokio::select! {
            result = pipeline.run_cycle() => {
                match result {
                    Ok(report) => report,
                    Err(MonitorError::CycleInProgress) => {
                        tracing::warn!("Previous cycle still running, skipping tick");
                        continue;
                    }
                    Err(e) => {
                        tracing::error!("Cycle aborted: {}", e);
                        if notify_errors {
                            let _ = notifier.error("Cycle aborted", &e.to_string()).await;
                        }
                        continue;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                // Partially aggregated cycle state is dropped with the future
                tracing::info!("Shutting down mid-cycle");
                monitor.log_stats().await;
                return Ok(());
            }
        };

        for event in &report.alerts {
            tracing::info!(
                "ALERT [{}] score {} wallet {} market {}",
                event.severity.label(),
                event.score,
                event.wallet_address,
                event.market.question
            );
            if let Err(e) = notifier.alert(event).await {
                tracing::warn!("Failed to deliver alert: {}", e);
            }
        }

        monitor.record_cycle(&report).await;
        monitor.log_stats().await;
    }
}

async fn scan_once(config: Config) -> anyhow::Result<()> {
    let pipeline = build_pipeline(&config)?;
    let report = pipeline.run_cycle().await?;

    println!(
        "\n🔍 Scanned {} markets, {} wallets active in the window\n",
        report.stats.markets_scanned, report.stats.wallets_seen
    );

    if report.alerts.is_empty() {
        println!("No alerts this cycle.");
    }
    for event in &report.alerts {
        println!(
            "[{}] {:>3} {} — {} (${:.0} on {})",
            event.severity.label(),
            event.score,
            event.wallet_address,
            event.market.question,
            event.size_usd,
            event.recommended_side
        );
        for reason in &event.reasons {
            println!("      • {}", reason);
        }
    }

    println!(
        "\n{} trade-fetch failures, {} profile failures, {} malformed records",
        report.stats.trade_fetch_failures,
        report.stats.profile_failures,
        report.stats.malformed_records
    );

    Ok(())
}

async fn show_markets(config: Config, limit: usize) -> anyhow::Result<()> {
    let client = PolymarketClient::new(&config.polymarket)?;
    let markets = client.gamma.top_markets(limit).await?;

    println!("\n📊 Top {} Polymarket markets by volume:\n", limit);
    println!("{:<60} {:>14}", "Question", "Volume");
    println!("{}", "-".repeat(76));

    for market in markets {
        let question = if market.question.len() > 57 {
            format!("{}...", &market.question[..57])
        } else {
            market.question.clone()
        };
        println!("{:<60} ${:>12.0}", question, market.volume);
    }

    Ok(())
}

async fn show_wallet(config: Config, address: &str) -> anyhow::Result<()> {
    let client = PolymarketClient::new(&config.polymarket)?;
    let profile = client.data.wallet_profile(address).await?;

    println!("\n👤 Wallet {}\n", profile.address);
    println!("First seen:       {}", profile.first_seen.format("%Y-%m-%d"));
    println!("Recorded trades:  {}", profile.total_trade_count);
    println!("Distinct markets: {}", profile.distinct_market_count);

    Ok(())
}

async fn test_notify(config: Config) -> anyhow::Result<()> {
    let tg = config
        .telegram
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("Telegram not configured in config.toml"))?;

    let notifier = Notifier::new(tg.bot_token.clone(), tg.chat_id.clone());
    notifier
        .send("🧪 <b>Test Notification</b>\n\nIf you see this, Telegram integration is working!")
        .await?;

    println!("✅ Test notification sent!");
    Ok(())
}
