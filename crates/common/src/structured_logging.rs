//! Process-wide tracing setup and operation timing

use serde::Serialize;
use serde_json::{Map, Value};
use std::str::FromStr;
use std::time::{Duration, Instant};
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Layer, Registry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines with span close events
    Pretty,
    /// One JSON object per event, span fields flattened in
    Json,
}

/// Structured logging settings
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Default level when `RUST_LOG` is not set
    pub level: Level,
    pub format: LogFormat,
    pub ansi: bool,
    pub line_numbers: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: LogFormat::Pretty,
            ansi: true,
            line_numbers: cfg!(debug_assertions),
        }
    }
}

impl LoggingConfig {
    /// Build from textual settings; unknown levels fall back to INFO
    pub fn from_settings(level: &str, json_output: bool) -> Self {
        let format = if json_output {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        };
        Self {
            level: Level::from_str(level.trim()).unwrap_or(Level::INFO),
            format,
            ansi: !json_output,
            ..Self::default()
        }
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.level.to_string()))
    }
}

/// Install the global subscriber
pub fn init_structured_logging(config: LoggingConfig) -> anyhow::Result<()> {
    let output = match config.format {
        LogFormat::Json => fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .with_span_list(false)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .with_target(true)
            .with_line_number(config.line_numbers)
            .with_ansi(config.ansi)
            .with_span_events(FmtSpan::CLOSE)
            .boxed(),
    };

    let subscriber = Registry::default().with(config.filter()).with(output);
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Times one operation and logs the outcome when finished
pub struct OperationTimer {
    operation: String,
    started: Instant,
    slow_after: Option<Duration>,
    fields: Map<String, Value>,
}

impl OperationTimer {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            started: Instant::now(),
            slow_after: None,
            fields: Map::new(),
        }
    }

    /// Log at WARN when the operation takes longer than `threshold`
    pub fn with_slow_threshold(mut self, threshold: Duration) -> Self {
        self.slow_after = Some(threshold);
        self
    }

    /// Extra context logged with the outcome; values that fail to serialize are skipped
    pub fn add_field(&mut self, key: impl Into<String>, value: impl Serialize) {
        if let Ok(value) = serde_json::to_value(value) {
            self.fields.insert(key.into(), value);
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    fn is_slow(&self, elapsed: Duration) -> bool {
        self.slow_after.is_some_and(|limit| elapsed > limit)
    }

    pub fn finish(self) {
        let elapsed = self.elapsed();
        let duration_ms = elapsed.as_millis() as u64;
        let fields = Value::Object(self.fields.clone());

        if self.is_slow(elapsed) {
            tracing::warn!(operation = %self.operation, duration_ms, %fields, "Slow operation");
        } else {
            tracing::debug!(
                operation = %self.operation,
                duration_ms,
                %fields,
                "Operation finished"
            );
        }
    }

    /// Log how `result` ended and hand it back untouched
    pub fn finish_with_result<T, E: std::fmt::Display>(self, result: Result<T, E>) -> Result<T, E> {
        match &result {
            Ok(_) => self.finish(),
            Err(e) => tracing::warn!(
                operation = %self.operation,
                duration_ms = self.elapsed().as_millis() as u64,
                error = %e,
                "Operation failed"
            ),
        }
        result
    }
}
