use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::domain::{Applicant, Application, ApplicationStage, Pagination};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageFilter {
    #[default]
    All,
    Only(ApplicationStage),
}

impl StageFilter {
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.trim().eq_ignore_ascii_case("all") {
            return Some(Self::All);
        }
        ApplicationStage::parse(raw).map(Self::Only)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CertificationFilter {
    #[default]
    All,
    Certified,
    /// Applicants whose certification is not yet on file.
    Pending,
}

impl CertificationFilter {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "all" => Some(Self::All),
            "certified" => Some(Self::Certified),
            "pending" => Some(Self::Pending),
            _ => None,
        }
    }
}

/// Applicant list filter; a row is shown only when every predicate matches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantFilter {
    pub search: String,
    pub stage: StageFilter,
    pub certification: CertificationFilter,
    /// `None` means all positions.
    pub position_req_id: Option<String>,
    /// Req id of the position the list was opened from, if any.
    pub context_req_id: Option<String>,
}

impl ApplicantFilter {
    pub fn matches(&self, applicant: &Applicant) -> bool {
        matches_search(applicant, &self.search)
            && matches_stage(applicant, self.stage)
            && matches_certification(applicant, self.certification)
            && matches_req_id(applicant, self.position_req_id.as_deref())
            && matches_req_id(applicant, self.context_req_id.as_deref())
    }

    pub fn apply<'a>(&self, applicants: &'a [Applicant]) -> Vec<&'a Applicant> {
        applicants
            .iter()
            .filter(|applicant| self.matches(applicant))
            .collect()
    }
}

pub fn matches_search(applicant: &Applicant, search: &str) -> bool {
    let needle = search.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    [
        &applicant.name,
        &applicant.current_role,
        &applicant.position_title,
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(&needle))
}

pub fn matches_stage(applicant: &Applicant, filter: StageFilter) -> bool {
    match filter {
        StageFilter::All => true,
        StageFilter::Only(stage) => applicant.stage == stage,
    }
}

pub fn matches_certification(applicant: &Applicant, filter: CertificationFilter) -> bool {
    match filter {
        CertificationFilter::All => true,
        CertificationFilter::Certified => applicant.certified,
        CertificationFilter::Pending => !applicant.certified,
    }
}

fn matches_req_id(applicant: &Applicant, req_id: Option<&str>) -> bool {
    match req_id {
        None => true,
        Some(req_id) => applicant.position_req_id == req_id,
    }
}

/// Sorted, de-duplicated, non-empty req ids for the position dropdown.
pub fn unique_position_req_ids(applicants: &[Applicant]) -> Vec<String> {
    applicants
        .iter()
        .map(|applicant| applicant.position_req_id.as_str())
        .filter(|req_id| !req_id.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

pub fn filter_by_stage(
    applications: &[Application],
    stage: ApplicationStage,
) -> Vec<&Application> {
    applications
        .iter()
        .filter(|application| application.stage == stage)
        .collect()
}

pub fn filter_by_position<'a>(
    applications: &'a [Application],
    position_id: &str,
) -> Vec<&'a Application> {
    applications
        .iter()
        .filter(|application| application.position == position_id)
        .collect()
}

pub fn filter_by_certification(
    applications: &[Application],
    certified: bool,
) -> Vec<&Application> {
    applications
        .iter()
        .filter(|application| application.certified == certified)
        .collect()
}

/// Case-insensitive match on applicant name, email or current role.
pub fn search_applications<'a>(
    applications: &'a [Application],
    term: &str,
) -> Vec<&'a Application> {
    let needle = term.trim().to_lowercase();
    applications
        .iter()
        .filter(|application| {
            needle.is_empty()
                || application.applicant_name.to_lowercase().contains(&needle)
                || application.applicant_email.to_lowercase().contains(&needle)
                || application
                    .current_role
                    .as_deref()
                    .is_some_and(|role| role.to_lowercase().contains(&needle))
        })
        .collect()
}

pub fn stage_count(applications: &[Application], stage: ApplicationStage) -> usize {
    applications
        .iter()
        .filter(|application| application.stage == stage)
        .count()
}

/// Server-side total when the list was paginated, else the loaded length.
pub fn total_count(pagination: Option<&Pagination>, loaded: usize) -> usize {
    pagination.map_or(loaded, |page| page.count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn applicant(name: &str, role: &str, title: &str, req_id: &str, certified: bool) -> Applicant {
        Applicant {
            id: name.to_lowercase().replace(' ', "-"),
            name: name.to_string(),
            email: format!("{}@example.org", name.to_lowercase().replace(' ', ".")),
            phone: String::new(),
            current_role: role.to_string(),
            experience: 4,
            certified,
            internal: false,
            stage: ApplicationStage::Screening,
            applied_date: None,
            position_id: req_id.to_string(),
            position_title: title.to_string(),
            position_req_id: req_id.to_string(),
            current_interview_stage: 0,
            completed_interview_stages: 0,
            total_interview_stages: 3,
            department: String::new(),
            worksite: String::new(),
            salary: String::new(),
            fte: String::new(),
            start_date: String::new(),
        }
    }

    fn roster() -> Vec<Applicant> {
        vec![
            applicant(
                "Maria Lopez",
                "Chemistry Teacher",
                "High School Chemistry Teacher",
                "REQ-2025-0193",
                true,
            ),
            applicant(
                "James Carter",
                "Paraprofessional",
                "Special Education Teacher",
                "REQ-2025-0194",
                false,
            ),
            applicant(
                "Ana Chen",
                "Lab Technician",
                "High School Chemistry Teacher",
                "REQ-2025-0193",
                false,
            ),
        ]
    }

    #[test]
    fn search_covers_name_role_and_position_title() {
        let rows = roster();
        let filter = ApplicantFilter {
            search: "CHEMISTRY".to_string(),
            ..ApplicantFilter::default()
        };
        let names: Vec<_> = filter.apply(&rows).iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Maria Lopez", "Ana Chen"]);

        let filter = ApplicantFilter {
            search: "para".to_string(),
            ..ApplicantFilter::default()
        };
        assert_eq!(filter.apply(&rows).len(), 1);
    }

    #[test]
    fn predicates_combine_as_conjunction() {
        let rows = roster();
        let filter = ApplicantFilter {
            certification: CertificationFilter::Pending,
            position_req_id: Some("REQ-2025-0193".to_string()),
            ..ApplicantFilter::default()
        };
        let matched = filter.apply(&rows);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].name, "Ana Chen");

        let filter = ApplicantFilter {
            stage: StageFilter::Only(ApplicationStage::Offer),
            ..ApplicantFilter::default()
        };
        assert!(filter.apply(&rows).is_empty());
    }

    #[test]
    fn context_position_narrows_even_when_dropdown_is_all() {
        let rows = roster();
        let filter = ApplicantFilter {
            context_req_id: Some("REQ-2025-0194".to_string()),
            ..ApplicantFilter::default()
        };
        let matched = filter.apply(&rows);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].name, "James Carter");
    }

    #[test]
    fn req_ids_are_sorted_and_unique() {
        let mut rows = roster();
        rows.push(applicant("No Req", "", "", "", true));
        assert_eq!(
            unique_position_req_ids(&rows),
            vec!["REQ-2025-0193".to_string(), "REQ-2025-0194".to_string()]
        );
    }

    #[test]
    fn filter_values_parse_from_cli_input() {
        assert_eq!(StageFilter::parse("all"), Some(StageFilter::All));
        assert_eq!(
            StageFilter::parse("reference check"),
            Some(StageFilter::Only(ApplicationStage::ReferenceCheck))
        );
        assert_eq!(StageFilter::parse("hired"), None);
        assert_eq!(
            CertificationFilter::parse("Pending"),
            Some(CertificationFilter::Pending)
        );
    }

    #[test]
    fn total_count_prefers_pagination() {
        let page = Pagination {
            count: 42,
            next: None,
            previous: None,
        };
        assert_eq!(total_count(Some(&page), 10), 42);
        assert_eq!(total_count(None, 10), 10);
    }

    fn application(
        id: &str,
        position: &str,
        stage: ApplicationStage,
        certified: bool,
    ) -> Application {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "position": position,
            "applicant_name": format!("Applicant {id}"),
            "applicant_email": format!("{id}@district.example.org"),
            "current_role": "Math Teacher",
            "stage": stage,
            "certified": certified,
        }))
        .expect("application json")
    }

    fn applications() -> Vec<Application> {
        vec![
            application("a1", "pos-1", ApplicationStage::Interview, true),
            application("a2", "pos-1", ApplicationStage::Screening, false),
            application("a3", "pos-2", ApplicationStage::Interview, false),
        ]
    }

    fn ids(matched: Vec<&Application>) -> Vec<&str> {
        matched.into_iter().map(|a| a.id.as_str()).collect()
    }

    #[test]
    fn list_helpers_select_by_stage_position_and_certification() {
        let rows = applications();
        assert_eq!(ids(filter_by_stage(&rows, ApplicationStage::Interview)), ["a1", "a3"]);
        assert!(filter_by_stage(&rows, ApplicationStage::Offer).is_empty());
        assert_eq!(ids(filter_by_position(&rows, "pos-1")), ["a1", "a2"]);
        assert_eq!(ids(filter_by_certification(&rows, false)), ["a2", "a3"]);
        assert_eq!(stage_count(&rows, ApplicationStage::Interview), 2);
        assert_eq!(stage_count(&rows, ApplicationStage::Rejected), 0);
    }

    #[test]
    fn application_search_also_matches_email() {
        let rows = applications();
        assert_eq!(ids(search_applications(&rows, "A2@DISTRICT")), ["a2"]);
        assert_eq!(search_applications(&rows, "math teacher").len(), 3);
        assert_eq!(search_applications(&rows, "  ").len(), 3);
        assert!(search_applications(&rows, "biology").is_empty());
    }
}
