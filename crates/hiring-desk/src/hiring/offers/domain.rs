use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::templates::fill_template;
use crate::hiring::window_end;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OfferStatus {
    #[default]
    Pending,
    Accepted,
    Declined,
    Expired,
    Withdrawn,
}

impl OfferStatus {
    pub const fn all() -> [Self; 5] {
        [
            Self::Pending,
            Self::Accepted,
            Self::Declined,
            Self::Expired,
            Self::Withdrawn,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Accepted => "Accepted",
            Self::Declined => "Declined",
            Self::Expired => "Expired",
            Self::Withdrawn => "Withdrawn",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::all()
            .into_iter()
            .find(|status| status.label().eq_ignore_ascii_case(raw.trim()))
    }
}

impl fmt::Display for OfferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Employment offer extended for an application. Candidate and position columns are read-only
/// projections filled in by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub id: String,
    pub application: String,
    #[serde(deserialize_with = "crate::hiring::decimal::deserialize")]
    pub salary: f64,
    #[serde(deserialize_with = "crate::hiring::decimal::deserialize")]
    pub fte: f64,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub benefits: Vec<String>,
    pub offer_date: NaiveDate,
    pub expiration_date: NaiveDate,
    #[serde(default)]
    pub status: OfferStatus,
    #[serde(default)]
    pub accepted_date: Option<NaiveDate>,
    #[serde(default)]
    pub declined_reason: Option<String>,
    #[serde(default)]
    pub template_text: String,
    #[serde(default)]
    pub template_data: BTreeMap<String, String>,
    #[serde(default)]
    pub candidate_name: String,
    #[serde(default)]
    pub candidate_email: String,
    #[serde(default)]
    pub position_title: String,
    #[serde(default)]
    pub position_req_id: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub worksite: String,
    #[serde(default)]
    pub employee_category: String,
}

impl Offer {
    /// Letter text with the stored field values substituted.
    pub fn filled_text(&self) -> String {
        if self.template_data.is_empty() {
            return self.template_text.clone();
        }
        fill_template(&self.template_text, &self.template_data)
    }

    /// Whole days from `today` until expiration; negative once expired.
    pub fn days_until_expiration(&self, today: NaiveDate) -> i64 {
        (self.expiration_date - today).num_days()
    }

    /// Pending and expiring between `today` and `end`, inclusive.
    pub fn is_expiring_by(&self, today: NaiveDate, end: NaiveDate) -> bool {
        self.status == OfferStatus::Pending
            && self.expiration_date >= today
            && self.expiration_date <= end
    }
}

/// Payload posted to `/hiring/offers/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateOffer {
    pub application: String,
    pub salary: f64,
    pub fte: f64,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub benefits: Vec<String>,
    pub offer_date: NaiveDate,
    pub expiration_date: NaiveDate,
    #[serde(default)]
    pub template_text: String,
    #[serde(default)]
    pub template_data: BTreeMap<String, String>,
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OfferUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fte: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub benefits: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<OfferStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclineOffer {
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferStats {
    pub total_offers: usize,
    pub pending: usize,
    pub accepted: usize,
    pub declined: usize,
    pub expired: usize,
}

impl OfferStats {
    pub fn from_offers(offers: &[Offer]) -> Self {
        offers.iter().fold(
            Self {
                total_offers: offers.len(),
                ..Self::default()
            },
            |mut stats, offer| {
                match offer.status {
                    OfferStatus::Pending => stats.pending += 1,
                    OfferStatus::Accepted => stats.accepted += 1,
                    OfferStatus::Declined => stats.declined += 1,
                    OfferStatus::Expired => stats.expired += 1,
                    OfferStatus::Withdrawn => {}
                }
                stats
            },
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferDateFilter {
    #[default]
    All,
    /// Offered in the last 7 days.
    ThisWeek,
    ThisMonth,
    Last30Days,
    /// Pending and expiring within 3 days.
    ExpiringSoon,
}

impl OfferDateFilter {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().replace([' ', '-'], "_").as_str() {
            "all" | "all_dates" => Some(Self::All),
            "this_week" => Some(Self::ThisWeek),
            "this_month" => Some(Self::ThisMonth),
            "last_30_days" => Some(Self::Last30Days),
            "expiring_soon" => Some(Self::ExpiringSoon),
            _ => None,
        }
    }

    pub fn matches(self, offer: &Offer, today: NaiveDate) -> bool {
        match self {
            Self::All => true,
            Self::ThisWeek => offer.offer_date >= today - Duration::days(7),
            Self::ThisMonth => offer.offer_date >= today.with_day(1).unwrap_or(today),
            Self::Last30Days => offer.offer_date >= today - Duration::days(30),
            Self::ExpiringSoon => {
                window_end(today, 3).is_some_and(|end| offer.is_expiring_by(today, end))
            }
        }
    }
}

/// Offer list filter; every predicate must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OfferFilter {
    pub search: String,
    pub status: Option<OfferStatus>,
    pub worksite: Option<String>,
    pub position_title: Option<String>,
    pub date: OfferDateFilter,
}

impl OfferFilter {
    pub fn matches(&self, offer: &Offer, today: NaiveDate) -> bool {
        let needle = self.search.trim().to_lowercase();
        let matches_search = needle.is_empty()
            || [
                &offer.candidate_name,
                &offer.position_title,
                &offer.candidate_email,
                &offer.worksite,
            ]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle));

        matches_search
            && self.status.map_or(true, |status| offer.status == status)
            && self
                .worksite
                .as_deref()
                .map_or(true, |site| offer.worksite == site)
            && self
                .position_title
                .as_deref()
                .map_or(true, |title| offer.position_title == title)
            && self.date.matches(offer, today)
    }

    pub fn apply<'a>(&self, offers: &'a [Offer], today: NaiveDate) -> Vec<&'a Offer> {
        offers
            .iter()
            .filter(|offer| self.matches(offer, today))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn offer(id: &str, status: OfferStatus, offered: NaiveDate, expires: NaiveDate) -> Offer {
        Offer {
            id: id.to_string(),
            application: format!("app-{id}"),
            salary: 58000.0,
            fte: 1.0,
            start_date: date(2025, 8, 15),
            benefits: vec!["Health Insurance".to_string()],
            offer_date: offered,
            expiration_date: expires,
            status,
            accepted_date: None,
            declined_reason: None,
            template_text: String::new(),
            template_data: BTreeMap::new(),
            candidate_name: "Maria Lopez".to_string(),
            candidate_email: "maria.lopez@example.org".to_string(),
            position_title: "High School Chemistry Teacher".to_string(),
            position_req_id: "REQ-2025-0193".to_string(),
            department: "Science".to_string(),
            worksite: "Oswego High School".to_string(),
            employee_category: String::new(),
        }
    }

    #[test]
    fn decodes_decimal_strings_from_backend() {
        let payload = json!({
            "id": "o-1",
            "application": "a-1",
            "salary": "58000.00",
            "fte": "1.00",
            "start_date": "2025-08-15",
            "offer_date": "2025-06-01",
            "expiration_date": "2025-06-15",
            "status": "Accepted",
            "accepted_date": "2025-06-03"
        });
        let offer: Offer = serde_json::from_value(payload).expect("decodes");
        assert_eq!(offer.salary, 58000.0);
        assert_eq!(offer.status, OfferStatus::Accepted);
        assert_eq!(offer.accepted_date, Some(date(2025, 6, 3)));
        assert!(offer.benefits.is_empty());
    }

    #[test]
    fn stats_count_each_status() {
        let today = date(2025, 6, 10);
        let offers = vec![
            offer("1", OfferStatus::Pending, today, today),
            offer("2", OfferStatus::Pending, today, today),
            offer("3", OfferStatus::Accepted, today, today),
            offer("4", OfferStatus::Expired, today, today),
            offer("5", OfferStatus::Withdrawn, today, today),
        ];
        let stats = OfferStats::from_offers(&offers);
        assert_eq!(stats.total_offers, 5);
        assert_eq!(stats.pending, 2);
        assert_eq!(stats.accepted, 1);
        assert_eq!(stats.declined, 0);
        assert_eq!(stats.expired, 1);
    }

    #[test]
    fn expiring_soon_only_counts_pending_offers_inside_window() {
        let today = date(2025, 6, 10);
        let soon = offer("1", OfferStatus::Pending, today, date(2025, 6, 12));
        let later = offer("2", OfferStatus::Pending, today, date(2025, 6, 20));
        let accepted = offer("3", OfferStatus::Accepted, today, date(2025, 6, 11));
        let lapsed = offer("4", OfferStatus::Pending, today, date(2025, 6, 9));

        let filter = OfferDateFilter::ExpiringSoon;
        assert!(filter.matches(&soon, today));
        assert!(!filter.matches(&later, today));
        assert!(!filter.matches(&accepted, today));
        assert!(!filter.matches(&lapsed, today));
        assert_eq!(soon.days_until_expiration(today), 2);
        assert_eq!(lapsed.days_until_expiration(today), -1);
    }

    #[test]
    fn offer_filter_combines_search_status_and_dates() {
        let today = date(2025, 6, 10);
        let mut other = offer("2", OfferStatus::Declined, date(2025, 4, 1), today);
        other.candidate_name = "James Carter".to_string();
        other.worksite = "Boulder Hill Elementary".to_string();
        let offers = vec![offer("1", OfferStatus::Pending, date(2025, 6, 5), today), other];

        let filter = OfferFilter {
            search: "boulder".to_string(),
            ..OfferFilter::default()
        };
        assert_eq!(filter.apply(&offers, today).len(), 1);

        let filter = OfferFilter {
            date: OfferDateFilter::ThisMonth,
            ..OfferFilter::default()
        };
        let matched = filter.apply(&offers, today);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id, "1");

        assert_eq!(
            OfferDateFilter::parse("Last 30 Days"),
            Some(OfferDateFilter::Last30Days)
        );
    }

    #[test]
    fn filled_text_substitutes_stored_values() {
        let today = date(2025, 6, 10);
        let mut letter = offer("1", OfferStatus::Pending, today, today);
        letter.template_text = "Dear {{candidateName}}, salary {{salary}}".to_string();
        letter
            .template_data
            .insert("candidateName".to_string(), "Maria Lopez".to_string());
        assert_eq!(letter.filled_text(), "Dear Maria Lopez, salary {{salary}}");
    }
}
