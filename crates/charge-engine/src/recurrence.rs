//! Weekly recurrence expansion: converts a rule into concrete occurrence starts.
//!
//! Only the unbounded weekly case is supported. Instants carry a fixed UTC
//! offset, so stepping by seven days keeps both the weekday and the wall-clock
//! time of the anchor.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::error::RuleParseError;

const RULE_START_PREFIX: &str = "DTSTART:";
const RULE_FREQUENCY: &str = "FREQ=WEEKLY";

/// A weekly recurrence anchored at its first occurrence, with no count limit.
///
/// Serialized in its text form, `DTSTART:<rfc3339>;FREQ=WEEKLY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WeeklyRule {
    pub anchor: DateTime<FixedOffset>,
}

impl WeeklyRule {
    pub const fn new(anchor: DateTime<FixedOffset>) -> Self {
        Self { anchor }
    }

    /// All occurrence starts within `[range_start, range_end]`, both bounds inclusive.
    ///
    /// Empty when the range is inverted or ends before the anchor. If stepping
    /// would overflow the representable range, the sequence stops there.
    pub fn expand(
        &self,
        range_start: DateTime<FixedOffset>,
        range_end: DateTime<FixedOffset>,
    ) -> Vec<DateTime<FixedOffset>> {
        let mut starts = Vec::new();
        if range_end < range_start || range_end < self.anchor {
            return starts;
        }

        let period = Duration::weeks(1);

        // Jump straight to the last occurrence at or before range_start.
        let mut cursor = if range_start <= self.anchor {
            Some(self.anchor)
        } else {
            let skipped = (range_start - self.anchor).num_weeks();
            Duration::try_weeks(skipped).and_then(|d| self.anchor.checked_add_signed(d))
        };

        while let Some(t) = cursor {
            if t > range_end {
                break;
            }
            if t >= range_start {
                starts.push(t);
            }
            cursor = t.checked_add_signed(period);
        }

        starts
    }
}

impl fmt::Display for WeeklyRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{};{}",
            RULE_START_PREFIX,
            self.anchor.to_rfc3339(),
            RULE_FREQUENCY
        )
    }
}

impl FromStr for WeeklyRule {
    type Err = RuleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start_part, freq_part) = s
            .split_once(';')
            .ok_or_else(|| RuleParseError::MissingStart(s.to_string()))?;

        let raw_start = start_part
            .strip_prefix(RULE_START_PREFIX)
            .ok_or_else(|| RuleParseError::MissingStart(s.to_string()))?;

        if !freq_part.eq_ignore_ascii_case(RULE_FREQUENCY) {
            return Err(RuleParseError::UnsupportedFrequency(freq_part.to_string()));
        }

        let anchor =
            DateTime::parse_from_rfc3339(raw_start).map_err(|e| RuleParseError::InvalidStart {
                value: raw_start.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self { anchor })
    }
}

impl TryFrom<String> for WeeklyRule {
    type Error = RuleParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WeeklyRule> for String {
    fn from(rule: WeeklyRule) -> Self {
        rule.to_string()
    }
}
