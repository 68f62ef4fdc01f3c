//! Structured logging for the followgraph CLI.
//!
//! Diagnostics go to `stderr` through a global `tracing` subscriber so the
//! rendered graph on `stdout` stays machine-readable. `log` records from
//! dependencies are bridged into the same pipeline.

use std::{env, sync::OnceLock};

use thiserror::Error;
use tracing_log::LogTracer;
use tracing_subscriber::{
    EnvFilter, Layer, fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Environment variable selecting `human` or `json` output.
pub const LOG_FORMAT_ENV: &str = "FOLLOWGRAPH_LOG_FORMAT";

/// Filter applied when `RUST_LOG` is unset or unparsable.
const DEFAULT_DIRECTIVE: &str = "info";

static INSTALLED: OnceLock<LogFormat> = OnceLock::new();

/// Output encodings for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Human,
    /// One JSON object per event, including the active span list.
    Json,
}

impl LogFormat {
    /// Parses a format name, ignoring case and surrounding whitespace.
    ///
    /// # Errors
    /// Returns [`LoggingError::UnsupportedFormat`] for anything other than
    /// `human` or `json`.
    pub fn parse(raw: &str) -> Result<Self, LoggingError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            other => Err(LoggingError::UnsupportedFormat {
                provided: other.to_owned(),
            }),
        }
    }

    /// Resolves the format from `lookup`, defaulting to [`LogFormat::Human`]
    /// when the variable is absent.
    ///
    /// # Errors
    /// Returns [`LoggingError::InvalidUnicode`] when the value is not UTF-8 and
    /// [`LoggingError::UnsupportedFormat`] when it names an unknown format.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, LoggingError>
    where
        F: FnOnce(&'static str) -> Result<String, env::VarError>,
    {
        match lookup(LOG_FORMAT_ENV) {
            Ok(raw) => Self::parse(&raw),
            Err(env::VarError::NotPresent) => Ok(Self::default()),
            Err(source @ env::VarError::NotUnicode(_)) => Err(LoggingError::InvalidUnicode {
                name: LOG_FORMAT_ENV,
                source,
            }),
        }
    }
}

/// Errors raised while configuring diagnostics.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The format variable held invalid UTF-8.
    #[error("environment variable `{name}` contained invalid UTF-8: {source}")]
    InvalidUnicode {
        /// Name of the offending variable.
        name: &'static str,
        /// Underlying lookup failure.
        #[source]
        source: env::VarError,
    },
    /// The format variable named an unknown format.
    #[error("unsupported log format `{provided}`; expected `human` or `json`")]
    UnsupportedFormat {
        /// Value supplied by the user, normalised to lower case.
        provided: String,
    },
    /// Another subscriber already owns the global slot.
    #[error("failed to install tracing subscriber: {source}")]
    InstallFailed {
        /// Error raised by `tracing_subscriber`.
        #[source]
        source: tracing_subscriber::util::TryInitError,
    },
}

/// Installs the global subscriber once per process.
///
/// Repeated calls return the format chosen by the first one. When some other
/// component already installed a subscriber, that one is kept and a note is
/// written to `stderr`.
///
/// # Errors
/// Returns [`LoggingError`] when [`LOG_FORMAT_ENV`] is malformed.
pub fn init_logging() -> Result<LogFormat, LoggingError> {
    if let Some(format) = INSTALLED.get() {
        return Ok(*format);
    }

    let format = LogFormat::from_lookup(env::var)?;
    if let Err(LoggingError::InstallFailed { source }) = install(format) {
        report_existing_subscriber(&source);
    }
    Ok(*INSTALLED.get_or_init(|| format))
}

fn install(format: LogFormat) -> Result<(), LoggingError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));
    let layer = tracing_subscriber::fmt::layer()
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr);
    let layer = match format {
        LogFormat::Human => layer.boxed(),
        LogFormat::Json => layer
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .boxed(),
    };

    // The bridge is optional; an existing `log` backend keeps its slot.
    let _ = LogTracer::init();

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .map_err(|source| LoggingError::InstallFailed { source })
}

#[expect(
    clippy::print_stderr,
    reason = "the tracing pipeline is owned by someone else at this point"
)]
fn report_existing_subscriber(source: &tracing_subscriber::util::TryInitError) {
    eprintln!("structured logging already configured elsewhere: {source}");
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case("human", LogFormat::Human)]
    #[case("HUMAN", LogFormat::Human)]
    #[case(" json ", LogFormat::Json)]
    fn parse_accepts_known_formats(#[case] raw: &str, #[case] expected: LogFormat) {
        assert_eq!(LogFormat::parse(raw).expect("format must parse"), expected);
    }

    #[test]
    fn parse_rejects_unknown_formats() {
        let err = LogFormat::parse(" XML ").expect_err("xml is not supported");
        match err {
            LoggingError::UnsupportedFormat { provided } => assert_eq!(provided, "xml"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_variable_defaults_to_human() {
        let format = LogFormat::from_lookup(|_| Err(env::VarError::NotPresent))
            .expect("absent variable is fine");
        assert_eq!(format, LogFormat::Human);
    }

    #[test]
    fn lookup_reads_the_followgraph_variable() {
        let format = LogFormat::from_lookup(|name| {
            assert_eq!(name, "FOLLOWGRAPH_LOG_FORMAT");
            Ok("json".to_owned())
        })
        .expect("json must parse");
        assert_eq!(format, LogFormat::Json);
    }

    #[test]
    fn non_unicode_value_is_reported() {
        let err = LogFormat::from_lookup(|_| {
            Err(env::VarError::NotUnicode(std::ffi::OsString::from("bad")))
        })
        .expect_err("non-unicode must fail");
        assert!(matches!(
            err,
            LoggingError::InvalidUnicode {
                name: LOG_FORMAT_ENV,
                ..
            }
        ));
    }

    #[test]
    fn init_logging_is_idempotent() {
        let first = init_logging().expect("logging must initialise");
        let second = init_logging().expect("subsequent calls are no-ops");
        assert_eq!(first, second);
    }
}
