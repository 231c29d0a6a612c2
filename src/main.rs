use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use skycast::providers::PartialResult;
use skycast::{AggregationRequest, Aggregator, GridPoint, SkycastConfig, geo};

/// One aggregation run for a grid cell, printed as JSON.
///
/// Usage: `skycast [nx ny [area_no [station_id]]]` - defaults to the Seoul
/// city-hall cell.
#[tokio::main]
async fn main() -> Result<()> {
    let config = SkycastConfig::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let grid = match (args.get(1), args.get(2)) {
        (Some(x), Some(y)) => GridPoint::new(x.parse()?, y.parse()?),
        _ => GridPoint::new(60, 127),
    };
    let area_no = args
        .get(3)
        .cloned()
        .unwrap_or_else(|| "1100000000".to_string());
    let station_id = match args.get(4) {
        Some(raw) => raw.parse()?,
        None => 108,
    };

    let request = AggregationRequest {
        grid,
        area_no,
        station_id,
        point: geo::grid_to_geo(&grid),
    };

    let aggregator = Aggregator::new(&config)?;

    let record = aggregator.fetch(&request).await?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    info!("{}", record.weather_summary());

    match aggregator.tomorrow_outlook(&request).await {
        PartialResult::Data(outlook) => {
            println!("{}", serde_json::to_string_pretty(&outlook)?);
        }
        PartialResult::Missing => info!("no forecast data for tomorrow yet"),
        PartialResult::Failed(err) => info!("tomorrow outlook unavailable: {err}"),
    }

    Ok(())
}
