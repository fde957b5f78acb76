//! Logging setup with indicatif integration

use indicatif::MultiProgress;

/// Logger that prints through indicatif MultiProgress so log lines don't
/// tear through active progress bars.
struct ProgressLogger {
    inner: env_logger::Logger,
    multi: MultiProgress,
}

impl log::Log for ProgressLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.inner.enabled(metadata)
    }

    fn log(&self, record: &log::Record) {
        if self.inner.enabled(record.metadata()) {
            let line = format!("[{:<5}] {}", record.level(), record.args());
            self.multi.suspend(|| eprintln!("{line}"));
        }
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

/// Initialize logging.
///
/// Default level is info, `debug = true` raises it; `RUST_LOG` still wins.
/// When a `MultiProgress` is supplied (TTY runs with progress bars), log
/// output is routed through it.
pub fn init_logging(debug: bool, multi: Option<&MultiProgress>) {
    let default_level = if debug { "debug" } else { "info" };
    let env = env_logger::Env::default().default_filter_or(default_level);

    match multi {
        Some(multi) => {
            let logger = env_logger::Builder::from_env(env).build();
            let max_level = logger.filter();
            let wrapped = ProgressLogger {
                inner: logger,
                multi: multi.clone(),
            };
            if log::set_boxed_logger(Box::new(wrapped)).is_ok() {
                log::set_max_level(max_level);
            }
        }
        None => {
            let _ = env_logger::Builder::from_env(env)
                .format_timestamp_millis()
                .try_init();
        }
    }
}
