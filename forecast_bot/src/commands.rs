//! Bot command parsing and handling

use crate::error::Result;
use crate::render;
use crate::state::AppState;
use crate::telegram::Update;
use sales_forecast::ForecastSummary;
use tracing::{error, info};

/// Horizon of the quick system check
pub const TEST_DAYS: usize = 3;

/// Horizon of the full forecast report
pub const REPORT_DAYS: usize = 7;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Test,
    Forecast,
    Status,
    Unknown(String),
}

impl Command {
    /// Parse the leading `/command` of a message, ignoring any `@botname`
    /// suffix and trailing arguments. Plain text is not a command.
    pub fn parse(text: &str) -> Option<Self> {
        let token = text.trim().split_whitespace().next()?;
        let name = token.strip_prefix('/')?;
        let name = name.split('@').next().unwrap_or(name).to_lowercase();

        let command = match name.as_str() {
            "start" => Command::Start,
            "ajuda" | "help" => Command::Help,
            "teste" | "test" => Command::Test,
            "previsao" | "previsão" | "forecast" => Command::Forecast,
            "status" => Command::Status,
            _ => Command::Unknown(name),
        };
        Some(command)
    }
}

async fn forecast_report(state: &AppState) -> Result<String> {
    let records = state.forecast(REPORT_DAYS).await?;
    let summary = ForecastSummary::from_records(&records)?;
    Ok(render::forecast_report(&records, &summary))
}

/// Produce the reply text for a command. Failures are logged and answered
/// with an apology; they never propagate.
pub async fn handle_command(state: &AppState, command: &Command) -> String {
    match command {
        Command::Start => render::welcome(),
        Command::Help => render::help(),
        Command::Test => match state.forecast(TEST_DAYS).await {
            Ok(records) => render::quick_test(&records),
            Err(e) => {
                error!(error = %e, "quick test failed");
                render::failure("running the system check")
            }
        },
        Command::Forecast => match forecast_report(state).await {
            Ok(text) => text,
            Err(e) => {
                error!(error = %e, "forecast report failed");
                render::failure("generating the forecast")
            }
        },
        Command::Status => match state.status().await {
            Ok(status) => render::status_text(&status),
            Err(e) => {
                error!(error = %e, "status lookup failed");
                render::failure("reading the model status")
            }
        },
        Command::Unknown(name) => render::unknown_command(name),
    }
}

/// Work out the reply to an update: the chat to answer and the text.
/// Updates without a command yield `None`.
pub async fn reply_to(state: &AppState, update: &Update) -> Option<(i64, String)> {
    let message = update.message.as_ref()?;
    let command = Command::parse(message.text.as_deref()?)?;

    info!(
        update_id = update.update_id,
        chat_id = message.chat.id,
        user_id = message.from.as_ref().map(|u| u.id),
        ?command,
        "bot command received"
    );

    let reply = handle_command(state, &command).await;
    Some((message.chat.id, reply))
}

/// Answer an update through the bot API, logging any delivery failure
pub async fn process_update(state: AppState, update: Update) {
    let Some((chat_id, reply)) = reply_to(&state, &update).await else {
        return;
    };

    let Some(client) = state.telegram.as_ref() else {
        error!(chat_id, "received an update but the bot client is not configured");
        return;
    };

    match client.send_message(chat_id, &reply).await {
        Ok(()) => info!(chat_id, "reply sent"),
        Err(e) => error!(chat_id, error = %e, "failed to send reply"),
    }
}
