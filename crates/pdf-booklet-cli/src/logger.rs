use chrono::Local;
use log::{Level, LevelFilter, Metadata, Record};

/// Writes `time - LEVEL - message` lines to stdout
pub struct TerminalLogger {
    level: LevelFilter,
    color: bool,
}

impl TerminalLogger {
    pub fn new(level: LevelFilter) -> Self {
        let color = std::env::var("TERM")
            .map(|term| matches!(term.as_str(), "xterm-256color" | "xterm-16color" | "xterm-color"))
            .unwrap_or(false);
        Self { level, color }
    }

    pub fn init(self) -> Result<(), log::SetLoggerError> {
        let level = self.level;
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(level);
        Ok(())
    }

    fn format(&self, record: &Record) -> String {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let line = format!("{} - {} - {}", timestamp, record.level(), record.args());
        if self.color {
            format!("\x1b[{}m{}\x1b[0m", level_color(record.level()), line)
        } else {
            line
        }
    }
}

fn level_color(level: Level) -> &'static str {
    match level {
        Level::Error => "31",
        Level::Warn => "33",
        Level::Info => "32",
        Level::Debug => "36",
        Level::Trace => "90",
    }
}

impl log::Log for TerminalLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            println!("{}", self.format(record));
        }
    }

    fn flush(&self) {}
}

/// Install the terminal logger at `level`
pub fn init(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    TerminalLogger::new(level).init()
}
