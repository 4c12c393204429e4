//! Logging setup — env_logger with a compact level-tagged format

/// Initialize the global logger.
///
/// Default level is info; `quiet` drops to warn, `debug` raises to debug.
/// `RUST_LOG` still overrides everything.
pub fn init_logging(quiet: bool, debug: bool) {
    use std::io::Write;

    let default_level = if debug {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format(|buf, record| {
            let label = match record.level() {
                log::Level::Error => "ERROR",
                log::Level::Warn => "WARN ",
                log::Level::Info => "INFO ",
                log::Level::Debug => "DEBUG",
                log::Level::Trace => "TRACE",
            };
            writeln!(
                buf,
                "{} [{label}] {}",
                buf.timestamp_millis(),
                record.args()
            )
        })
        .init();
}
