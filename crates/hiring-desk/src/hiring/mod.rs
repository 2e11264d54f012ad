//! Hiring pipeline records mirrored from the backend, plus the small amount of logic the client
//! derives from them (stage gating, filtering, template substitution, form validation).

pub mod applications;
pub mod interviews;
pub mod offers;
pub mod positions;
pub mod users;
pub mod validation;

use chrono::{Duration, NaiveDate};

/// Last day of a `days`-long window from `today`; `None` when it falls outside the calendar.
pub fn window_end(today: NaiveDate, days: i64) -> Option<NaiveDate> {
    Duration::try_days(days).and_then(|span| today.checked_add_signed(span))
}

pub(crate) mod decimal {
    //! The backend serializes decimal columns (salary, FTE) as strings such as `"0.50"`.
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        Text(String),
    }

    pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match NumberOrString::deserialize(deserializer)? {
            NumberOrString::Number(value) => Ok(value),
            NumberOrString::Text(raw) => raw
                .trim()
                .parse::<f64>()
                .map_err(|_| serde::de::Error::custom(format!("'{raw}' is not a decimal"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_end_rejects_spans_past_the_calendar() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 10).expect("valid date");
        assert_eq!(window_end(today, 7), NaiveDate::from_ymd_opt(2025, 6, 17));
        assert_eq!(window_end(today, -1), NaiveDate::from_ymd_opt(2025, 6, 9));
        assert_eq!(window_end(today, 10_000_000_000_000), None);
        assert_eq!(window_end(today, i64::MAX), None);
    }
}
