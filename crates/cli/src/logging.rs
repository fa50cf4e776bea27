use crate::config::LoggingConfig;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Layer};

/// Most verbose level enabled in the config; `RUST_LOG` takes precedence.
pub fn level_from_config(config: &LoggingConfig) -> &'static str {
    let levels = &config.levels;
    let mut level = "off";
    if levels.critical || levels.error {
        level = "error";
    }
    if levels.warning {
        level = "warn";
    }
    if levels.info {
        level = "info";
    }
    if levels.debug {
        level = "debug";
    }
    level
}

pub fn init_logging(config: &LoggingConfig) {
    let level = level_from_config(config);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let show_file = config.format.location.show_file;
    let show_line = config.format.location.show_line;

    // stdout carries results; logs go to stderr.
    let fmt_layer = match (config.format.json, config.format.show_time) {
        (true, _) => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_file(show_file)
            .with_line_number(show_line)
            .boxed(),
        (false, true) => fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(show_file)
            .with_file(show_file)
            .with_line_number(show_line)
            .boxed(),
        (false, false) => fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(show_file)
            .with_file(show_file)
            .with_line_number(show_line)
            .without_time()
            .boxed(),
    };

    // try_init: a second initialisation (tests) is not an error.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
