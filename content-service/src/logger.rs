use serde_json::{Map, Value};
use std::env;
use std::fmt::Display;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

const SERVICE_NAME: &str = "content-service";

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "error" => LogLevel::Error,
            "warn" => LogLevel::Warn,
            "debug" => LogLevel::Debug,
            _ => LogLevel::Info,
        }
    }

    pub fn from_env() -> Self {
        Self::parse(&env::var("LOG_LEVEL").unwrap_or_default())
    }
}

/// One JSON object per line: errors and warnings on stderr, the rest on
/// stdout.
#[derive(Clone, Debug)]
pub struct Logger {
    env: String,
    host: String,
    min_level: LogLevel,
}

impl Logger {
    pub fn new(host: impl Into<String>) -> Self {
        let env = env::var("APP_ENV")
            .or_else(|_| env::var("RUST_ENV"))
            .unwrap_or_else(|_| "development".to_string());
        Self {
            env,
            host: host.into(),
            min_level: LogLevel::from_env(),
        }
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    pub fn debug(&self, event: &str, context: impl Into<Value>) {
        self.emit(LogLevel::Debug, event, context);
    }

    pub fn info(&self, event: &str, context: impl Into<Value>) {
        self.emit(LogLevel::Info, event, context);
    }

    pub fn warn(&self, event: &str, context: impl Into<Value>) {
        self.emit(LogLevel::Warn, event, context);
    }

    pub fn error(&self, event: &str, context: impl Into<Value>) {
        self.emit(LogLevel::Error, event, context);
    }

    pub fn render(&self, level: LogLevel, event: &str, context: impl Into<Value>) -> Option<String> {
        if level > self.min_level {
            return None;
        }
        let timestamp = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_default();
        let mut payload = Map::new();
        payload.insert("timestamp".to_string(), Value::String(timestamp));
        payload.insert("service".to_string(), Value::String(SERVICE_NAME.to_string()));
        payload.insert("env".to_string(), Value::String(self.env.clone()));
        payload.insert("host".to_string(), Value::String(self.host.clone()));
        payload.insert("level".to_string(), Value::String(level.as_str().to_string()));
        payload.insert("event".to_string(), Value::String(event.to_string()));

        match context.into() {
            Value::Object(map) => {
                for (key, value) in map {
                    payload.insert(key, value);
                }
            }
            Value::Null => {}
            other => {
                payload.insert("context".to_string(), other);
            }
        }

        Some(Value::Object(payload).to_string())
    }

    fn emit(&self, level: LogLevel, event: &str, context: impl Into<Value>) {
        let Some(message) = self.render(level, event, context) else {
            return;
        };
        match level {
            LogLevel::Error | LogLevel::Warn => eprintln!("{message}"),
            _ => println!("{message}"),
        }
    }
}

pub fn log_error<E: Display>(logger: &Logger, event: &str, error: E) {
    logger.error(
        event,
        Value::Object(Map::from_iter([(
            "error".to_string(),
            Value::String(error.to_string()),
        )])),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn context_fields_are_merged_into_the_line() {
        let logger = Logger::new("box").with_level(LogLevel::Info);
        let line = logger
            .render(LogLevel::Info, "posts.listed", json!({ "count": 3 }))
            .unwrap();
        let value: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["service"], "content-service");
        assert_eq!(value["host"], "box");
        assert_eq!(value["level"], "info");
        assert_eq!(value["event"], "posts.listed");
        assert_eq!(value["count"], 3);
    }

    #[test]
    fn levels_below_threshold_are_dropped() {
        let logger = Logger::new("box").with_level(LogLevel::Warn);
        assert!(logger.render(LogLevel::Info, "quiet", Value::Null).is_none());
        assert!(logger.render(LogLevel::Error, "loud", Value::Null).is_some());
    }

    #[test]
    fn skipped_post_warnings_pass_the_default_threshold() {
        let logger = Logger::new("box").with_level(LogLevel::Info);
        let line = logger
            .render(LogLevel::Warn, "posts.read_failed", json!({ "slug": "bad" }))
            .unwrap();
        let value: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["level"], "warn");
        assert_eq!(value["slug"], "bad");
    }

    #[test]
    fn unknown_levels_fall_back_to_info() {
        assert_eq!(LogLevel::parse("VERBOSE"), LogLevel::Info);
        assert_eq!(LogLevel::parse(" Debug "), LogLevel::Debug);
    }
}
