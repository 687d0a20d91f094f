//! Solve options.

use std::env;
use std::time::Duration;

use crate::error::{EnclosureError, Result};

const ENV_TIME_LIMIT: &str = "ENCLOSURE_TIME_LIMIT";

/// Knobs for one solve request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolveOptions {
    /// Wall-clock budget for the solver; `None` waits as long as it takes.
    pub time_limit: Option<Duration>,
}

impl SolveOptions {
    /// Read options from the environment.
    ///
    /// `ENCLOSURE_TIME_LIMIT` is a number of seconds; a blank value means no limit.
    pub fn from_env() -> Result<Self> {
        let mut options = Self::default();

        if let Ok(raw) = env::var(ENV_TIME_LIMIT) {
            if !raw.trim().is_empty() {
                options.time_limit = Some(parse_seconds(&raw)?);
            }
        }

        Ok(options)
    }

    /// Replace the time limit.
    pub fn with_time_limit(mut self, time_limit: Option<Duration>) -> Self {
        self.time_limit = time_limit;
        self
    }
}

/// Parse a non-negative, finite number of seconds.
pub fn parse_seconds(raw: &str) -> Result<Duration> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
        .ok_or_else(|| EnclosureError::InvalidConfiguration(format!("time limit {raw:?} is not a number of seconds")))
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::time::Duration;

    use super::*;

    #[test]
    fn default_has_no_limit() {
        assert_eq!(SolveOptions::default().time_limit, None);
    }

    #[test]
    fn seconds() {
        assert_eq!(parse_seconds("2.5").unwrap(), Duration::from_millis(2500));
        assert_eq!(parse_seconds(" 10 ").unwrap(), Duration::from_secs(10));
        assert!(parse_seconds("-1").is_err());
        assert!(parse_seconds("soon").is_err());
        assert!(parse_seconds("inf").is_err());
    }

    #[test]
    fn from_env() {
        // only this test touches the variable
        let previous = env::var(ENV_TIME_LIMIT).ok();

        env::set_var(ENV_TIME_LIMIT, "3");
        assert_eq!(SolveOptions::from_env().unwrap().time_limit, Some(Duration::from_secs(3)));

        env::set_var(ENV_TIME_LIMIT, "  ");
        assert_eq!(SolveOptions::from_env().unwrap().time_limit, None);

        env::set_var(ENV_TIME_LIMIT, "later");
        assert!(matches!(SolveOptions::from_env(), Err(EnclosureError::InvalidConfiguration(_))));

        match previous {
            Some(value) => env::set_var(ENV_TIME_LIMIT, value),
            None => env::remove_var(ENV_TIME_LIMIT),
        }
    }
}
