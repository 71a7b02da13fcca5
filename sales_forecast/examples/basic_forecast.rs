use sales_forecast::forecast::{to_csv, to_json};
use sales_forecast::{ForecastSummary, ForecasterService, GeneratorConfig, ModelConfig, ReadyState};
use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let days: usize = env::args().nth(1).map(|d| d.parse()).transpose()?.unwrap_or(7);
    let artifact = env::temp_dir().join("sales_model_example.json");

    // Seeded history so repeated runs train the same model
    let service =
        ForecasterService::with_config(&artifact, ModelConfig::default(), GeneratorConfig::seeded(42))?;

    match service.ensure_ready()? {
        ReadyState::Trained(report) => {
            println!("Trained new model: MAE {:.2}, RMSE {:.2}", report.mae, report.rmse)
        }
        _ => println!("Loaded model from {}", artifact.display()),
    }

    let forecast = service.forecast(days)?;
    let summary = ForecastSummary::from_records(&forecast)?;

    println!("Forecast for the next {} days:", days);
    for day in &forecast {
        println!("{} {:<9} {:>8.2}", day.date, day.day_name(), day.predicted_sales);
    }
    println!(
        "Total {:.2}, mean {:.2}, best {} ({:.2}), worst {} ({:.2})",
        summary.total,
        summary.mean,
        summary.best_day.date,
        summary.best_day.predicted_sales,
        summary.worst_day.date,
        summary.worst_day.predicted_sales
    );

    println!("\nCSV:\n{}", to_csv(&forecast)?);
    println!("JSON:\n{}", to_json(&forecast)?);
    Ok(())
}
