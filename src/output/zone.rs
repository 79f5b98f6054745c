//! Display time zone for rendered timestamps.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, Utc};
use chrono_tz::Tz;

use crate::error::RequestListError;

/// Zone in which timestamps are displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayZone {
    /// The host's local zone.
    #[default]
    Local,
    /// A named IANA zone such as `Europe/Copenhagen`.
    Named(Tz),
}

impl DisplayZone {
    /// Formats `instant` as RFC 3339 in this zone.
    #[must_use]
    pub fn rfc3339(self, instant: DateTime<Utc>) -> String {
        match self {
            Self::Local => instant.with_timezone(&Local).to_rfc3339(),
            Self::Named(tz) => instant.with_timezone(&tz).to_rfc3339(),
        }
    }

    /// Formats `instant` with a `strftime` pattern in this zone.
    #[must_use]
    pub fn format(self, instant: DateTime<Utc>, pattern: &str) -> String {
        match self {
            Self::Local => instant.with_timezone(&Local).format(pattern).to_string(),
            Self::Named(tz) => instant.with_timezone(&tz).format(pattern).to_string(),
        }
    }
}

impl fmt::Display for DisplayZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => f.write_str("local"),
            Self::Named(tz) => write!(f, "{}", tz.name()),
        }
    }
}

impl FromStr for DisplayZone {
    type Err = RequestListError;

    /// Parses an IANA zone name; a blank name selects the local zone.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        if name.is_empty() {
            return Ok(Self::Local);
        }
        name.parse::<Tz>().map(Self::Named).map_err(|error| {
            RequestListError::configuration(format!("unknown timezone `{name}`: {error}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn noon_utc() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[test]
    fn blank_name_selects_local_zone() {
        assert_eq!("".parse::<DisplayZone>(), Ok(DisplayZone::Local));
        assert_eq!("  ".parse::<DisplayZone>(), Ok(DisplayZone::Local));
    }

    #[test]
    fn named_zone_shifts_timestamps() {
        let zone: DisplayZone = "Europe/Copenhagen".parse().expect("zone should parse");

        assert_eq!(zone.rfc3339(noon_utc()), "2024-01-15T13:00:00+01:00");
        assert_eq!(zone.format(noon_utc(), "%H:%M"), "13:00");
        assert_eq!(zone.to_string(), "Europe/Copenhagen");
    }

    #[test]
    fn unknown_zone_is_a_configuration_error() {
        let error = "Mars/Olympus_Mons"
            .parse::<DisplayZone>()
            .expect_err("zone should be rejected");

        assert!(
            matches!(error, RequestListError::Configuration { ref message } if message.contains("Mars/Olympus_Mons"))
        );
    }
}
