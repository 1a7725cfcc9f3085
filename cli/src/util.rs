use std::io::Read;

use alertchan_core::{ChannelError, ErrorReport};
use clap::ValueEnum;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Exit codes: 0=success, 1=channel error (bad definition or rejected write),
///             4=usage error (unreadable or unparsable input)
pub const EXIT_CHANNEL_ERROR: i32 = 1;
pub const EXIT_USAGE_ERROR: i32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Json,
    Text,
}

/// Logs go to stderr so stdout only ever carries the command's JSON result.
pub fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "alertchan=info,alertchan_core=info".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

pub fn exit_error(message: &str, docs_hint: Option<&str>) -> i32 {
    let mut err = json!({
        "error": "cli_error",
        "message": message
    });
    if let Some(hint) = docs_hint {
        err["docs_hint"] = json!(hint);
    }
    eprintln!("{}", pretty(&err));
    EXIT_USAGE_ERROR
}

/// Print a structured report for a failed expand/flatten/validate.
pub fn channel_error(err: &ChannelError) -> i32 {
    tracing::debug!(error = %err, "channel operation failed");
    eprintln!("{}", pretty(&ErrorReport::from(err)));
    EXIT_CHANNEL_ERROR
}

pub fn print_json<T: Serialize>(value: &T, compact: bool) -> i32 {
    let formatted = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };
    match formatted {
        Ok(s) => {
            println!("{s}");
            0
        }
        Err(e) => exit_error(&format!("Failed to serialize output: {e}"), None),
    }
}

fn pretty(value: &impl Serialize) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
}

/// Read JSON from a file path or stdin (when path is "-").
pub fn read_json_from_file<T: DeserializeOwned>(path: &str) -> Result<T, String> {
    let raw = if path == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| format!("Failed to read stdin: {e}"))?;
        buf
    } else {
        std::fs::read_to_string(path).map_err(|e| format!("Failed to read file '{path}': {e}"))?
    };
    serde_json::from_str(&raw).map_err(|e| format!("Invalid JSON in '{path}': {e}"))
}
