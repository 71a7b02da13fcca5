use chrono::NaiveDate;
use forecast_bot::commands::Command;
use forecast_bot::render::{
    bar_chart, escape_markdown, forecast_report, format_money, quick_test, unknown_command, welcome,
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use sales_forecast::{ForecastRecord, ForecastSummary};

#[rstest]
#[case("/start", Command::Start)]
#[case("/ajuda", Command::Help)]
#[case("/help", Command::Help)]
#[case("/teste", Command::Test)]
#[case("/previsao", Command::Forecast)]
#[case("/previsão", Command::Forecast)]
#[case("/forecast now please", Command::Forecast)]
#[case("/Forecast@SalesForecastBot", Command::Forecast)]
#[case("  /status  ", Command::Status)]
#[case("/weather", Command::Unknown("weather".to_string()))]
fn test_parse_commands(#[case] text: &str, #[case] expected: Command) {
    assert_eq!(Command::parse(text), Some(expected));
}

#[rstest]
#[case("hello bot")]
#[case("")]
#[case("   ")]
fn test_plain_text_is_not_a_command(#[case] text: &str) {
    assert_eq!(Command::parse(text), None);
}

#[rstest]
#[case(0.0, "0.00")]
#[case(12.346, "12.35")]
#[case(999.999, "1,000.00")]
#[case(1234567.8, "1,234,567.80")]
#[case(-4321.0, "-4,321.00")]
fn test_format_money(#[case] value: f64, #[case] expected: &str) {
    assert_eq!(format_money(value), expected);
}

fn sample_forecast() -> Vec<ForecastRecord> {
    [310.0, 420.5, 280.25]
        .iter()
        .enumerate()
        .map(|(i, &v)| ForecastRecord {
            date: NaiveDate::from_ymd_opt(2025, 10, 19 + i as u32).unwrap(),
            predicted_sales: v,
        })
        .collect()
}

#[test]
fn test_bar_chart_scales_between_extremes() {
    let chart = bar_chart(&sample_forecast(), 10);
    let bars: Vec<usize> = chart
        .lines()
        .map(|line| line.chars().filter(|&c| c == '█').count())
        .collect();

    assert_eq!(bars.len(), 3);
    assert_eq!(bars[1], 10);
    assert_eq!(bars[2], 1);
    assert!(bars[0] > 1 && bars[0] < 10);
}

#[test]
fn test_flat_forecast_chart() {
    let mut records = sample_forecast();
    for r in &mut records {
        r.predicted_sales = 100.0;
    }
    let chart = bar_chart(&records, 8);
    assert!(chart.lines().all(|l| l.chars().filter(|&c| c == '█').count() == 8));
}

#[test]
fn test_report_mentions_best_and_worst_days() {
    let records = sample_forecast();
    let summary = ForecastSummary::from_records(&records).unwrap();
    let report = forecast_report(&records, &summary);

    assert!(report.contains("3 DAYS"));
    assert!(report.contains("Total: 1,010.75"));
    assert!(report.contains("20/10/2025 (Monday)"));
    assert!(report.contains("21/10/2025 (Tuesday)"));
    assert!(report.contains("🟢 20/10 (Mon): 420.50"));
    assert!(report.contains("🔴 21/10 (Tue): 280.25"));
    assert!(report.contains("🔵 19/10 (Sun): 310.00"));
}

#[test]
fn test_quick_test_lists_each_day() {
    let text = quick_test(&sample_forecast());
    assert_eq!(text.matches("📅").count(), 3);
    assert!(welcome().contains("/previsao"));
}

/// Count `marker` characters not preceded by a backslash
fn unescaped(text: &str, marker: char) -> usize {
    let mut count = 0;
    let mut escaped = false;
    for c in text.chars() {
        if c == marker && !escaped {
            count += 1;
        }
        escaped = c == '\\' && !escaped;
    }
    count
}

#[rstest]
#[case("foo_bar")]
#[case("set_webhook")]
#[case("bold*")]
#[case("`code")]
#[case("[link")]
fn test_unknown_command_markup_is_balanced(#[case] name: &str) {
    let text = unknown_command(name);
    for marker in ['_', '*', '`', '['] {
        assert_eq!(unescaped(&text, marker) % 2, 0, "open {} in {:?}", marker, text);
    }
    assert_eq!(unescaped(&text, '['), 0);
}

#[test]
fn test_escape_markdown() {
    assert_eq!(escape_markdown("foo_bar"), "foo\\_bar");
    assert_eq!(escape_markdown("*a* [b] `c`"), "\\*a\\* \\[b] \\`c\\`");
    assert_eq!(escape_markdown("previsao"), "previsao");
    assert!(unknown_command("set_webhook").contains("/set\\_webhook"));
}
