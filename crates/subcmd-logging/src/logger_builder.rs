use std::{io, ops::Deref};

use once_cell::sync::OnceCell;
use time::{
    UtcOffset,
    format_description::well_known::{self, Rfc3339},
};
use tracing::{Level, Subscriber, metadata::LevelFilter};
use tracing_subscriber::{
    EnvFilter,
    filter::{Directive, ParseError},
    fmt::{Layer, time::OffsetTime},
    prelude::*,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

// The local offset can only be determined safely before any other threads are started.
static LOCAL_TIME: OnceCell<Result<OffsetTime<Rfc3339>, time::error::IndeterminateOffset>> =
    OnceCell::new();

#[ctor::ctor]
fn init_time() {
    LOCAL_TIME.set(OffsetTime::local_rfc_3339()).ok();
}

#[derive(thiserror::Error, Debug)]
pub enum LoggerCreationError {
    #[error("Invalid log filter in {var}: {source}")]
    InvalidFilter { var: String, source: ParseError },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Timezone {
    #[default]
    Local,
    Utc,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct LogLevel(pub Level);

impl LogLevel {
    pub(crate) fn to_level_filter(&self) -> LevelFilter {
        LevelFilter::from_level(self.0)
    }
}

impl Default for LogLevel {
    // Command line programs only report problems unless asked for more.
    fn default() -> Self {
        LogLevel(Level::WARN)
    }
}

impl Deref for LogLevel {
    type Target = Level;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Builds the tracing subscriber for a program: a single formatted layer on stderr, filtered by
/// an environment variable (`RUST_LOG` unless overridden) on top of a default level.
#[derive(Debug, Clone)]
pub struct LoggerBuilder {
    name: String,
    timezone: Timezone,
    log_level: LogLevel,
    env_var: String,
    env_filter_directives: Vec<Directive>,
    log_to_stderr: bool,
}

impl LoggerBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            timezone: Timezone::Local,
            log_level: LogLevel::default(),
            env_var: EnvFilter::DEFAULT_ENV.to_owned(),
            env_filter_directives: vec![],
            log_to_stderr: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn with_timezone(mut self, timezone: Timezone) -> Self {
        self.timezone = timezone;
        self
    }

    pub fn with_log_level(mut self, level: Level) -> Self {
        self.log_level = LogLevel(level);
        self
    }

    /// Reads filter directives from `env_var` instead of `RUST_LOG`.
    pub fn with_env_var(mut self, env_var: impl Into<String>) -> Self {
        self.env_var = env_var.into();
        self
    }

    pub fn with_env_filter_directive(mut self, directive: Directive) -> Self {
        self.env_filter_directives.push(directive);
        self
    }

    pub fn with_log_to_stderr(mut self, log_to_stderr: bool) -> Self {
        self.log_to_stderr = log_to_stderr;
        self
    }

    fn env_filter(&self) -> Result<EnvFilter, LoggerCreationError> {
        let builder = EnvFilter::builder()
            .with_default_directive(self.log_level.to_level_filter().into())
            .with_env_var(&self.env_var);

        let mut env_filter = match std::env::var(&self.env_var) {
            Ok(directives) => {
                builder
                    .parse(directives)
                    .map_err(|source| LoggerCreationError::InvalidFilter {
                        var: self.env_var.clone(),
                        source,
                    })?
            }
            Err(_) => builder.from_env_lossy(),
        };
        for directive in &self.env_filter_directives {
            env_filter = env_filter.add_directive(directive.clone());
        }
        Ok(env_filter)
    }

    pub fn build(
        self,
    ) -> Result<impl SubscriberInitExt + Subscriber + for<'a> LookupSpan<'a>, LoggerCreationError>
    {
        let offset = match (&self.timezone, LOCAL_TIME.get()) {
            (Timezone::Local, Some(Ok(offset))) => offset.to_owned(),
            _ => OffsetTime::new(UtcOffset::UTC, well_known::Rfc3339),
        };

        let filter = if self.log_to_stderr {
            self.env_filter()?
        } else {
            EnvFilter::from_default_env().add_directive(LevelFilter::OFF.into())
        };

        let collector = tracing_subscriber::registry().with(
            Layer::new()
                .with_timer(offset)
                .with_writer(io::stderr)
                .with_filter(filter),
        );
        Ok(collector)
    }
}
