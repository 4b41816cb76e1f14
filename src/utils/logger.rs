// src/utils/logger.rs

use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};
use std::io::Write;

static LOGGER: ConsoleLogger = ConsoleLogger;

struct ConsoleLogger;

/// Install the stderr logger. Can only succeed once per process.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
  log::set_logger(&LOGGER).map(|()| log::set_max_level(level))
}

impl log::Log for ConsoleLogger {
  fn enabled(&self, metadata: &Metadata) -> bool {
    metadata.level() <= log::max_level()
  }

  fn log(&self, record: &Record) {
    if self.enabled(record.metadata()) {
      let icon = match record.level() {
        Level::Error => "🔴",
        Level::Warn => "🟠",
        Level::Info => "🔵",
        Level::Debug => "⚪",
        Level::Trace => "▫️",
      };

      // Format: "🟠 [cview_scene::rendering::radius] No covalent radius ..."
      let stderr = std::io::stderr();
      let mut handle = stderr.lock();
      let _ = writeln!(handle, "{} [{}] {}", icon, record.target(), record.args());
    }
  }

  fn flush(&self) {
    let _ = std::io::stderr().flush();
  }
}
