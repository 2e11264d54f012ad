//! Tracing setup shared by the CLI commands and the stand-in server.

use crate::config::TelemetryConfig;
use std::fmt;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

/// HTTP plumbing under the hiring client and server; held at `warn` unless the filter names it.
const TRANSPORT_CRATES: [&str; 3] = ["hyper", "reqwest", "h2"];

#[derive(Debug)]
pub enum TelemetryError {
    EnvFilter { value: String, source: ParseError },
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::EnvFilter { value, .. } => {
                write!(f, "invalid APP_LOG_LEVEL '{value}'")
            }
            TelemetryError::Subscriber(err) => write!(f, "unable to install subscriber: {err}"),
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::EnvFilter { source, .. } => Some(source),
            TelemetryError::Subscriber(err) => Some(&**err),
        }
    }
}

/// `APP_LOG_LEVEL` plus a `warn` cap for each transport crate it does not mention.
pub fn directives(log_level: &str) -> String {
    let level = log_level.trim();
    let mut directives: Vec<String> = Vec::with_capacity(TRANSPORT_CRATES.len() + 1);
    if !level.is_empty() {
        directives.push(level.to_string());
    }
    directives.extend(
        TRANSPORT_CRATES
            .iter()
            .filter(|name| !level.contains(*name))
            .map(|name| format!("{name}=warn")),
    );
    directives.join(",")
}

/// `RUST_LOG` wins verbatim; otherwise the configured level via [`directives`].
pub fn env_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    let value = directives(&config.log_level);
    EnvFilter::try_new(&value).map_err(|source| TelemetryError::EnvFilter {
        value: config.log_level.clone(),
        source,
    })
}

pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(config)?)
        .with_target(false)
        .compact()
        .with_ansi(config.ansi)
        .try_init()
        .map_err(TelemetryError::Subscriber)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_crates_are_capped() {
        assert_eq!(directives("info"), "info,hyper=warn,reqwest=warn,h2=warn");
        assert_eq!(directives(""), "hyper=warn,reqwest=warn,h2=warn");
    }

    #[test]
    fn explicit_transport_directive_is_kept() {
        assert_eq!(
            directives("debug,reqwest=trace"),
            "debug,reqwest=trace,hyper=warn,h2=warn"
        );
    }

    #[test]
    fn bad_level_reports_the_configured_value() {
        let config = TelemetryConfig {
            log_level: "hiring_desk=loud".to_string(),
            ansi: false,
        };
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        let err = env_filter(&config).expect_err("invalid level");
        assert_eq!(err.to_string(), "invalid APP_LOG_LEVEL 'hiring_desk=loud'");
    }
}
