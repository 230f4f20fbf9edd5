use clap::Parser;
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;

use strategy_core::{run_pipeline, latest_recommendation, StrategyParams};

use dashboard_server::api::{self, AppState};
use dashboard_server::config::Settings;
use dashboard_server::data;

#[derive(Parser)]
#[command(name = "dashboard-server")]
#[command(about = "Bitcoin sentiment strategy dashboard and backtest runner")]
enum Commands {
    /// Serve the dashboard API.
    Server,
    /// Run one backtest and print the summary metrics.
    Backtest {
        #[arg(long, default_value = "5")]
        short_window: usize,
        #[arg(long, default_value = "50")]
        long_window: usize,
        #[arg(long, default_value = "25")]
        extreme_fear: f64,
        #[arg(long, default_value = "75")]
        extreme_greed: f64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings = Settings::new()?;
    let client = reqwest::Client::new();

    let command = Commands::try_parse().unwrap_or(Commands::Server);

    match command {
        Commands::Server => {
            let frame = data::load_frame(&client, &settings.data).await?;
            info!(rows = frame.len(), "input series loaded");

            let state = AppState::new(frame);
            let app = api::app(state, &settings.api.static_dir);

            let addr = format!("0.0.0.0:{}", settings.api.port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            info!("dashboard API listening on {addr}");
            axum::serve(listener, app).await?;
        }

        Commands::Backtest {
            short_window,
            long_window,
            extreme_fear,
            extreme_greed,
        } => {
            let frame = data::load_frame(&client, &settings.data).await?;
            info!(rows = frame.len(), "input series loaded");

            let params = StrategyParams {
                short_window,
                long_window,
                extreme_fear_threshold: extreme_fear,
                extreme_greed_threshold: extreme_greed,
                ..Default::default()
            };
            let (enriched, metrics) = run_pipeline(frame, &params)?;
            let (signal, explanation) = latest_recommendation(&enriched);

            println!(
                "\nBacktest complete for {} ({} to {})",
                settings.data.coin_id, settings.data.start_date, settings.data.end_date
            );
            println!("Strategy Cumulative Return: {:.4}", metrics.strategy_cumulative_return);
            println!("Benchmark Cumulative Return: {:.4}", metrics.benchmark_cumulative_return);
            println!("Max Drawdown: {:.4}", metrics.strategy_max_drawdown);
            println!("Sharpe Ratio: {:.4}", metrics.strategy_sharpe_ratio);
            println!("Hit Rate: {:.4}", metrics.strategy_hit_rate);
            println!("\nLatest recommendation: {}", signal.as_str());
            println!("{explanation}");
        }
    }

    Ok(())
}
