//! `log` records printed to the browser console.

use log::{Level, LevelFilter, Log, Metadata, Record};

use crate::core::data::selector_from_query;

/// Query parameter that lowers the level filter to `Debug` when set to `1`.
pub const DEBUG_QUERY_KEY: &str = "debug";

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        match record.level() {
            Level::Error | Level::Warn => {
                zoon::eprintln!("[{}] {}", record.level(), record.args());
            }
            _ => zoon::println!("[{}] {}", record.level(), record.args()),
        }
    }

    fn flush(&self) {}
}

/// Install the console logger. A second call keeps the first logger.
pub fn init(search: &str) {
    let level = match selector_from_query(search, DEBUG_QUERY_KEY).as_deref() {
        Some("1") => LevelFilter::Debug,
        _ => LevelFilter::Info,
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}
