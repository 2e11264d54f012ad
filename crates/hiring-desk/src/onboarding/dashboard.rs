use serde::{Deserialize, Serialize};

use super::domain::{OnboardingCandidate, OnboardingStatus};

/// Admin dashboard filter: status dropdown plus a free-text search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateFilter {
    pub search: String,
    /// `None` shows every status.
    pub status: Option<OnboardingStatus>,
}

impl CandidateFilter {
    /// Search matches name, email or position, case-insensitively.
    pub fn matches(&self, candidate: &OnboardingCandidate) -> bool {
        let needle = self.search.trim().to_lowercase();
        let matches_search = needle.is_empty()
            || candidate.name.to_lowercase().contains(&needle)
            || candidate.email.to_lowercase().contains(&needle)
            || candidate.position.to_lowercase().contains(&needle);
        matches_search && self.status.map_or(true, |status| candidate.status == status)
    }

    pub fn apply<'a>(&self, candidates: &'a [OnboardingCandidate]) -> Vec<&'a OnboardingCandidate> {
        candidates
            .iter()
            .filter(|candidate| self.matches(candidate))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn candidate(name: &str, position: &str, status: OnboardingStatus) -> OnboardingCandidate {
        OnboardingCandidate {
            id: name.to_lowercase(),
            name: name.to_string(),
            email: format!("{}@example.org", name.to_lowercase()),
            position: position.to_string(),
            offer_date: NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid"),
            start_date: None,
            status,
            completed_sections: 0,
            sections: Vec::new(),
            last_updated: None,
            submitted_at: None,
            job_application: None,
            admin_notes: String::new(),
        }
    }

    #[test]
    fn filter_matches_search_and_status() {
        let candidates = vec![
            candidate("Maria", "Chemistry Teacher", OnboardingStatus::InProgress),
            candidate("James", "Special Education Teacher", OnboardingStatus::Submitted),
            candidate("Ana", "Bus Driver", OnboardingStatus::InProgress),
        ];

        let teachers = CandidateFilter {
            search: "teacher".to_string(),
            status: None,
        };
        assert_eq!(teachers.apply(&candidates).len(), 2);

        let in_progress_teachers = CandidateFilter {
            status: Some(OnboardingStatus::InProgress),
            ..teachers
        };
        let matched = in_progress_teachers.apply(&candidates);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].name, "Maria");

        let by_email = CandidateFilter {
            search: "ana@".to_string(),
            status: None,
        };
        assert_eq!(by_email.apply(&candidates).len(), 1);
    }
}
