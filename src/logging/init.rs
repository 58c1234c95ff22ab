use color_eyre::eyre::Result;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};
use super::{LogConfig, LOG_FILENAME};
fn build_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("centy_compact={}", config.log_level)))
}
/// Initialize the logging system with the given configuration.
///
/// Logs go to a rolling file and to stderr; stdout is reserved for the
/// command's own output.
pub fn init_logging(config: LogConfig) -> Result<()> {
    std::fs::create_dir_all(&config.log_dir)?;
    let file_appender =
        RollingFileAppender::new(config.rotation.clone(), &config.log_dir, LOG_FILENAME);
    if config.json_format {
        let json_file_layer = fmt::layer()
            .json().with_writer(file_appender).with_span_events(FmtSpan::CLOSE)
            .with_current_span(true).with_target(true)
            .with_filter(build_filter(&config));
        let json_stderr_layer = fmt::layer()
            .json().with_writer(std::io::stderr).with_span_events(FmtSpan::CLOSE)
            .with_current_span(true).with_target(true).with_filter(build_filter(&config));
        tracing_subscriber::registry()
            .with(json_file_layer).with(json_stderr_layer).with(ErrorLayer::default()).try_init()?;
    } else {
        let file_layer = fmt::layer()
            .with_writer(file_appender).with_span_events(FmtSpan::CLOSE)
            .with_target(true).with_ansi(false)
            .with_filter(build_filter(&config));
        let stderr_layer = fmt::layer()
            .with_writer(std::io::stderr).with_span_events(FmtSpan::CLOSE)
            .with_ansi(true).with_filter(build_filter(&config));
        tracing_subscriber::registry()
            .with(file_layer).with(stderr_layer).with(ErrorLayer::default()).try_init()?;
    }
    Ok(())
}
/// Parse rotation period from string.
#[must_use]
pub fn parse_rotation(s: &str) -> Rotation {
    match s.to_lowercase().as_str() {
        "hourly" => Rotation::HOURLY,
        "never" => Rotation::NEVER,
        _ => Rotation::DAILY,
    }
}
