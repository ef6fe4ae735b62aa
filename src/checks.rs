//! Validation policy applied by every wrapper call

use log::warn;

/// Environment variable read by [`Checks::from_env`]
pub const CHECKS_ENV: &str = "FOGL_CHECKS";

/// Which runtime checks wrapper calls perform before and after forwarding
///
/// A disabled check costs nothing: the call goes straight to the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checks {
    /// Fail with [`Error::NullHandle`](crate::Error::NullHandle) on id 0
    pub null_handles: bool,
    /// Fail with [`Error::NotBound`](crate::Error::NotBound) when another
    /// object occupies the binding slot
    pub bound_state: bool,
    /// Read the driver error flag after each call
    pub driver_errors: bool,
}

impl Checks {
    pub const CHECKED: Self = Self {
        null_handles: true,
        bound_state: true,
        driver_errors: true,
    };

    pub const UNCHECKED: Self = Self {
        null_handles: false,
        bound_state: false,
        driver_errors: false,
    };

    /// Policy selected by the `null-checks`, `state-checks` and
    /// `error-checks` crate features
    pub const fn from_features() -> Self {
        Self {
            null_handles: cfg!(feature = "null-checks"),
            bound_state: cfg!(feature = "state-checks"),
            driver_errors: cfg!(feature = "error-checks"),
        }
    }

    /// Policy from `FOGL_CHECKS`, falling back to [`Checks::from_features`]
    pub fn from_env() -> Self {
        match std::env::var(CHECKS_ENV) {
            Ok(value) => Self::parse(&value),
            Err(_) => Self::from_features(),
        }
    }

    /// Parse `checked`, `unchecked`, or a comma list of `null`, `state` and
    /// `error`
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "checked" | "all" => return Self::CHECKED,
            "unchecked" | "none" | "" => return Self::UNCHECKED,
            _ => {}
        }

        let mut checks = Self::UNCHECKED;
        for item in value.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            match item {
                "null" => checks.null_handles = true,
                "state" | "bound" => checks.bound_state = true,
                "error" | "errors" => checks.driver_errors = true,
                other => warn!("ignoring unknown {} entry `{}`", CHECKS_ENV, other),
            }
        }

        checks
    }
}

impl Default for Checks {
    fn default() -> Self {
        Self::from_features()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_presets() {
        assert_eq!(Checks::parse("checked"), Checks::CHECKED);
        assert_eq!(Checks::parse(" unchecked "), Checks::UNCHECKED);
        assert_eq!(Checks::parse(""), Checks::UNCHECKED);
    }

    #[test]
    fn parses_lists() {
        let checks = Checks::parse("null, error");
        assert!(checks.null_handles);
        assert!(!checks.bound_state);
        assert!(checks.driver_errors);

        let checks = Checks::parse("state,bogus");
        assert_eq!(
            checks,
            Checks {
                null_handles: false,
                bound_state: true,
                driver_errors: false,
            }
        );
    }

    #[test]
    fn default_follows_features() {
        assert_eq!(Checks::default(), Checks::from_features());
        assert_eq!(
            Checks::from_features().null_handles,
            cfg!(feature = "null-checks")
        );
    }
}
