use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl LogFormat {
    /// Anything other than `json` falls back to compact output.
    pub fn from_name(name: &str) -> Self {
        match name {
            "json" => LogFormat::Json,
            _ => LogFormat::Compact,
        }
    }
}

/// `--verbose` wins over the configured level.
pub fn resolve_level<'a>(verbose: bool, configured: Option<&'a str>) -> &'a str {
    if verbose {
        "debug"
    } else {
        configured.unwrap_or("info")
    }
}

/// Default filter when `RUST_LOG` is unset: our own events at `level`,
/// everything else at `warn`.
pub fn filter_directive(level: &str) -> String {
    format!("warn,imagelyn={}", level)
}

pub fn init_logger(format: LogFormat, level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(level)));

    let layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Compact => registry.with(layer.compact()).init(),
        LogFormat::Json => registry.with(layer.json()).init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_name() {
        assert_eq!(LogFormat::from_name("json"), LogFormat::Json);
        assert_eq!(LogFormat::from_name("compact"), LogFormat::Compact);
        assert_eq!(LogFormat::from_name("plain"), LogFormat::Compact);
    }

    #[test]
    fn test_configured_level_reaches_filter() {
        assert_eq!(resolve_level(false, Some("warn")), "warn");
        assert_eq!(resolve_level(false, None), "info");
        assert_eq!(resolve_level(true, Some("error")), "debug");
        assert_eq!(filter_directive("trace"), "warn,imagelyn=trace");
        assert!(EnvFilter::try_new(filter_directive("warn")).is_ok());
    }
}
