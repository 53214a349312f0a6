use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

pub const LOG_FORMAT_VAR: &str = "LAYERKIT_LOG_FORMAT";

/// Log output format types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable text format with timestamp, level, target, and message
    Text,
    /// JSON format with structured fields: timestamp, level, target, message
    Json,
}

impl LogFormat {
    /// Parses a format string, case-insensitively.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "json" => Some(LogFormat::Json),
            "text" => Some(LogFormat::Text),
            _ => None,
        }
    }

    /// Reads the format from `LAYERKIT_LOG_FORMAT` or returns the default Text format
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use layerkit::utils::logging::LogFormat;
    ///
    /// assert_eq!(LogFormat::from_env_or_default(), LogFormat::Text); // default
    /// std::env::set_var("LAYERKIT_LOG_FORMAT", "json");
    /// assert_eq!(LogFormat::from_env_or_default(), LogFormat::Json);
    /// ```
    pub fn from_env_or_default() -> Self {
        std::env::var(LOG_FORMAT_VAR)
            .ok()
            .and_then(|s| Self::parse(&s))
            .unwrap_or(LogFormat::Text)
    }
}

/// Formats a single log line.
///
/// Text lines look like `[timestamp] LEVEL [target] message`; JSON lines carry
/// the same data as the fields `timestamp`, `level`, `target` and `message`.
pub fn format_line(
    level: &tracing::Level,
    target: &str,
    message: &str,
    format: LogFormat,
) -> String {
    let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");

    match format {
        LogFormat::Text => format!("[{}] {} [{}] {}", timestamp, level, target, message),
        LogFormat::Json => serde_json::json!({
            "timestamp": timestamp.to_string(),
            "level": level.to_string(),
            "target": target,
            "message": message,
        })
        .to_string(),
    }
}

/// Initializes the tracing subscriber with console output and env filter.
///
/// Sets up:
/// - `fmt::layer()` in text or JSON, chosen by `LAYERKIT_LOG_FORMAT`
/// - Environment filter for log level control (defaults to `info`)
/// - Log-to-tracing bridge for compatibility with `log` crate macros
///
/// Safe to call multiple times: when a global subscriber is already set it
/// returns `Ok(())`.
pub fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    use tracing_log::LogTracer;
    use tracing_subscriber::fmt;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (text_layer, json_layer) = match LogFormat::from_env_or_default() {
        LogFormat::Text => (Some(fmt::layer().with_target(true).with_line_number(true)), None),
        LogFormat::Json => (None, Some(fmt::layer().json().with_target(true))),
    };

    // Bridge first; a second init is a no-op error we can ignore
    let _ = LogTracer::init();

    let result = tracing_subscriber::registry()
        .with(env_filter)
        .with(text_layer)
        .with(json_layer)
        .try_init();

    if let Err(e) = result {
        tracing::debug!("Tracing subscriber already initialized: {:?}", e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_format() {
        assert_eq!(LogFormat::parse("JSON"), Some(LogFormat::Json));
        assert_eq!(LogFormat::parse(" text "), Some(LogFormat::Text));
        assert_eq!(LogFormat::parse("xml"), None);
    }

    #[test]
    fn test_text_line_layout() {
        let line = format_line(&tracing::Level::ERROR, "layerkit", "bad value", LogFormat::Text);
        assert!(line.ends_with("ERROR [layerkit] bad value"));
        assert!(line.starts_with('['));
    }

    #[test]
    fn test_init_logging_is_idempotent() {
        assert!(init_logging().is_ok());
        assert!(init_logging().is_ok());
    }
}
