//! Text and HTML rendering of forecasts
//!
//! Bot messages use Telegram's legacy Markdown: `*bold*`, `_italic_` and
//! fenced code blocks.

use sales_forecast::{ForecastRecord, ForecastSummary, ModelSource, ServiceStatus};

/// Width of the longest bar in the text chart
pub const CHART_WIDTH: usize = 20;

/// Format a value with two decimals and thousands separators
pub fn format_money(value: f64) -> String {
    let formatted = format!("{:.2}", value.abs());
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && formatted != "0.00" { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, frac_part)
}

fn short_day(record: &ForecastRecord) -> String {
    format!("{} ({})", record.date.format("%d/%m"), record.date.format("%a"))
}

fn long_day(record: &ForecastRecord) -> String {
    format!("{} ({})", record.date.format("%d/%m/%Y"), record.day_name())
}

/// Horizontal bar chart, one line per day, scaled between the lowest and
/// highest prediction
pub fn bar_chart(records: &[ForecastRecord], width: usize) -> String {
    let min = records
        .iter()
        .map(|r| r.predicted_sales)
        .fold(f64::INFINITY, f64::min);
    let max = records
        .iter()
        .map(|r| r.predicted_sales)
        .fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;

    records
        .iter()
        .map(|r| {
            let len = if span > 0.0 {
                1 + ((r.predicted_sales - min) / span * (width.saturating_sub(1)) as f64).round()
                    as usize
            } else {
                width
            };
            format!(
                "{} {:<width$} {:>10}",
                r.date.format("%d/%m"),
                "█".repeat(len),
                format_money(r.predicted_sales),
                width = width
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn welcome() -> String {
    "🏪 *Welcome to the Sales Forecast Bot!*\n\n\
     I use machine learning to forecast your sales 📊\n\n\
     *Commands:*\n\
     /start - Show this message\n\
     /previsao - 7-day forecast 📈\n\
     /teste - Quick system check ⚡\n\
     /status - Model status 🤖\n\
     /ajuda - Detailed help ❓\n\n\
     _Powered by a random forest regressor_"
        .to_string()
}

pub fn help() -> String {
    "📊 *HOW TO USE*\n\n\
     *Commands:*\n\
     🔹 /previsao (or /forecast) - Sales forecast for the next 7 days, with:\n\
     • A chart\n\
     • Total and daily average\n\
     • Best and worst day\n\
     • Day-by-day details\n\n\
     🔹 /teste (or /test) - Quick 3-day check\n\n\
     🔹 /status - Whether the model is trained and how well it scored\n\n\
     🔹 /start - Restart the conversation\n\n\
     *How it works:*\n\
     A random forest learns weekly and monthly patterns from sales history and projects them forward.\n\n\
     💡 _Tip: run /previsao every Monday to plan your week!_"
        .to_string()
}

/// Reply to the quick 3-day check
pub fn quick_test(records: &[ForecastRecord]) -> String {
    let mut text = String::from("✅ *Bot is working!*\n\n");
    text.push_str(&format!("📊 *Model check ({} days):*\n\n", records.len()));
    for record in records {
        text.push_str(&format!(
            "📅 {}: {}\n",
            short_day(record),
            format_money(record.predicted_sales)
        ));
    }
    text.push_str("\n✨ _System operational!_");
    text
}

/// Full forecast report
pub fn forecast_report(records: &[ForecastRecord], summary: &ForecastSummary) -> String {
    let mut text = format!("📈 *SALES FORECAST - {} DAYS*\n\n", records.len());

    text.push_str("💰 *Summary:*\n");
    text.push_str(&format!("• Total: {}\n", format_money(summary.total)));
    text.push_str(&format!("• Daily average: {}\n\n", format_money(summary.mean)));

    text.push_str("🏆 *Best day:*\n");
    text.push_str(&format!("• {}\n", long_day(&summary.best_day)));
    text.push_str(&format!(
        "• Sales: {}\n\n",
        format_money(summary.best_day.predicted_sales)
    ));

    text.push_str("⚠️ *Needs attention:*\n");
    text.push_str(&format!("• {}\n", long_day(&summary.worst_day)));
    text.push_str(&format!(
        "• Sales: {}\n\n",
        format_money(summary.worst_day.predicted_sales)
    ));

    text.push_str("```\n");
    text.push_str(&bar_chart(records, CHART_WIDTH));
    text.push_str("\n```\n\n");

    text.push_str("📋 *Day by day:*\n");
    for record in records {
        let marker = if record == &summary.best_day {
            "🟢"
        } else if record == &summary.worst_day {
            "🔴"
        } else {
            "🔵"
        };
        text.push_str(&format!(
            "{} {}: {}\n",
            marker,
            short_day(record),
            format_money(record.predicted_sales)
        ));
    }

    text.push_str("\n💡 _Use these numbers to plan stock and staff!_");
    text
}

pub fn status_text(status: &ServiceStatus) -> String {
    if !status.ready {
        return "⏳ *Model not ready yet.*\nIt will be trained on the first forecast request.".to_string();
    }

    let source = match status.source {
        Some(ModelSource::Loaded) => "loaded from disk",
        Some(ModelSource::Trained) => "trained in this session",
        None => "unknown",
    };

    let mut text = format!("🤖 *Model ready* ({})\n", source);
    if let Some(report) = &status.last_report {
        text.push_str(&format!(
            "• MAE: {:.2}\n• RMSE: {:.2}\n• Trained: {}\n",
            report.mae,
            report.rmse,
            report.trained_at.format("%d/%m/%Y %H:%M UTC")
        ));
    }
    text
}

/// Escape user text for a legacy Markdown message.
///
/// Telegram rejects the whole message when an entity is left open.
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '_' | '*' | '`' | '[') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

pub fn unknown_command(command: &str) -> String {
    format!(
        "🤔 I don't know /{}. Send /ajuda to see what I can do.",
        escape_markdown(command)
    )
}

pub fn failure(context: &str) -> String {
    format!(
        "❌ Sorry, something went wrong while {}.\n\nPlease try again in a few moments.",
        context
    )
}

/// Landing page for `GET /`
pub fn status_page(status: &ServiceStatus, bot_enabled: bool) -> String {
    let model = if status.ready {
        match status.source {
            Some(ModelSource::Loaded) => "Ready (loaded)",
            _ => "Ready (trained)",
        }
    } else {
        "Not trained yet"
    };
    let bot = if bot_enabled { "Webhook" } else { "Disabled" };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Sales Forecast Bot</title>
<style>
body {{ font-family: sans-serif; background: #f4f5fb; display: flex; justify-content: center; padding: 20px; }}
.container {{ background: #fff; border-radius: 16px; padding: 32px; max-width: 760px; box-shadow: 0 10px 40px rgba(0,0,0,0.15); }}
h1 {{ color: #667eea; }}
.status {{ background: #11998e; color: #fff; padding: 16px; border-radius: 12px; }}
.command {{ font-family: monospace; background: #667eea; color: #fff; padding: 2px 8px; border-radius: 4px; }}
li {{ padding: 6px 0; }}
</style>
</head>
<body>
<div class="container">
<h1>🤖 Sales Forecast Bot</h1>
<div class="status">
<p><strong>Status:</strong> Online</p>
<p><strong>Bot:</strong> {bot}</p>
<p><strong>Model:</strong> Random Forest, {model}</p>
</div>
<h3>Commands</h3>
<ul>
<li><span class="command">/start</span> Start a conversation</li>
<li><span class="command">/previsao</span> 7-day forecast with chart</li>
<li><span class="command">/teste</span> Quick system check</li>
<li><span class="command">/status</span> Model status</li>
<li><span class="command">/ajuda</span> Detailed help</li>
</ul>
<h3>API</h3>
<ul>
<li><code>GET /health</code></li>
<li><code>GET /forecast?days=7</code></li>
<li><code>GET /forecast.csv?days=7</code></li>
</ul>
<p>Version {version}</p>
</div>
</body>
</html>
"#,
        bot = bot,
        model = model,
        version = env!("CARGO_PKG_VERSION"),
    )
}
