use log::{Level, LevelFilter, Log, Metadata, Record};
use std::io::Write;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

static LOGGER: PedanticLogger = PedanticLogger;

/// A small colored logger. Info and debug messages go to stdout, while warnings and errors
/// go to stderr. How much gets through is decided by `log::max_level`.
pub struct PedanticLogger;

impl PedanticLogger {
    pub fn setup(level: LevelFilter) {
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(level);
        }
    }
}

impl Log for PedanticLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        let md = record.metadata();

        if !self.enabled(md) {
            return;
        }

        let mut spec = ColorSpec::new();

        let mut out = match md.level() {
            Level::Error => {
                spec.set_fg(Some(Color::Red));
                StandardStream::stderr(ColorChoice::Auto)
            }

            Level::Warn => {
                spec.set_fg(Some(Color::Yellow)).set_intense(true);
                StandardStream::stderr(ColorChoice::Auto)
            }

            Level::Info => {
                spec.set_dimmed(true);
                StandardStream::stdout(ColorChoice::Auto)
            }

            _ => StandardStream::stdout(ColorChoice::Auto),
        };

        // There is nowhere left to report a failed write to the terminal.
        let _ = out.set_color(&spec);
        let _ = writeln![out, "{}: {}", record.target(), record.args()];
        let _ = out.reset();
    }

    fn flush(&self) {}
}
