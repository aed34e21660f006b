//! Logger installation for the command-line binary.

use std::io::Write;
use std::str::FromStr;

use env_logger::{fmt::Formatter, Builder, Target};
use log::{Level, LevelFilter};

use crate::error::{TspError, TspResult};

/// Output layout of log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// `LEVEL message`
    #[default]
    Compact,
    /// `LEVEL [target] message`
    Pretty,
}

impl FromStr for LogFormat {
    type Err = TspError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "compact" => Ok(LogFormat::Compact),
            "pretty" => Ok(LogFormat::Pretty),
            other => Err(TspError::InvalidSettings(format!(
                "unknown log format {other:?} (expected compact or pretty)"
            ))),
        }
    }
}

/// Installs an `env_logger` writing to stderr.
///
/// Fails if a logger is already installed.
pub fn init_logger(level: LevelFilter, format: LogFormat, timestamp: bool) -> TspResult<()> {
    let mut builder = Builder::new();
    builder
        .filter_level(level)
        .write_style(env_logger::WriteStyle::Never)
        .target(Target::Stderr)
        .format(move |buf: &mut Formatter, record| {
            if timestamp {
                write!(buf, "{} ", buf.timestamp_millis())?;
            }
            match format {
                LogFormat::Compact => {
                    writeln!(buf, "{} {}", level_tag(record.level()), record.args())
                }
                LogFormat::Pretty => writeln!(
                    buf,
                    "{} [{}] {}",
                    level_tag(record.level()),
                    record.target(),
                    record.args()
                ),
            }
        });

    builder
        .try_init()
        .map_err(|e| TspError::Logger(e.to_string()))
}

fn level_tag(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARN",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_format() {
        assert_eq!("compact".parse::<LogFormat>().ok(), Some(LogFormat::Compact));
        assert_eq!("pretty".parse::<LogFormat>().ok(), Some(LogFormat::Pretty));
        assert!("fancy".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_level_tags() {
        assert_eq!(level_tag(Level::Warn), "WARN");
        assert_eq!(level_tag(Level::Trace), "TRACE");
    }
}
