use std::fmt;

use chrono::{Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::positions::Interviewer;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InterviewStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
    #[serde(rename = "No Show")]
    NoShow,
}

impl InterviewStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Scheduled => "Scheduled",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
            Self::NoShow => "No Show",
        }
    }
}

impl fmt::Display for InterviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Scheduled interview for one application at one configured stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interview {
    pub id: String,
    pub application: String,
    /// Interview stage id.
    pub stage: String,
    #[serde(default)]
    pub stage_number: u32,
    #[serde(default)]
    pub stage_name: String,
    pub scheduled_date: NaiveDate,
    pub scheduled_time: NaiveTime,
    pub location: String,
    #[serde(default)]
    pub zoom_link: Option<String>,
    #[serde(default)]
    pub status: InterviewStatus,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub applicant_name: String,
    #[serde(default)]
    pub position_title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleInterview {
    pub application: String,
    pub stage: String,
    pub scheduled_date: NaiveDate,
    pub scheduled_time: NaiveTime,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompleteInterview {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_time: Option<NaiveTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<InterviewStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl InterviewUpdate {
    pub fn cancel() -> Self {
        Self {
            status: Some(InterviewStatus::Cancelled),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewStats {
    pub total_interviews: usize,
    pub scheduled: usize,
    pub completed: usize,
    pub upcoming_this_week: usize,
    pub today: usize,
}

impl InterviewStats {
    pub fn from_interviews(interviews: &[Interview], today: NaiveDate) -> Self {
        let week_end = today + Duration::days(7);
        let scheduled = |interview: &&Interview| interview.status == InterviewStatus::Scheduled;
        Self {
            total_interviews: interviews.len(),
            scheduled: interviews.iter().filter(scheduled).count(),
            completed: interviews
                .iter()
                .filter(|interview| interview.status == InterviewStatus::Completed)
                .count(),
            upcoming_this_week: interviews
                .iter()
                .filter(scheduled)
                .filter(|interview| {
                    interview.scheduled_date >= today && interview.scheduled_date <= week_end
                })
                .count(),
            today: interviews
                .iter()
                .filter(scheduled)
                .filter(|interview| interview.scheduled_date == today)
                .count(),
        }
    }
}

/// Scheduled interviews from `today` through `end`, inclusive.
pub fn upcoming(interviews: &[Interview], today: NaiveDate, end: NaiveDate) -> Vec<&Interview> {
    interviews
        .iter()
        .filter(|interview| {
            interview.status == InterviewStatus::Scheduled
                && interview.scheduled_date >= today
                && interview.scheduled_date <= end
        })
        .collect()
}

pub fn in_date_range(
    interviews: &[Interview],
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<&Interview> {
    interviews
        .iter()
        .filter(|interview| interview.scheduled_date >= start && interview.scheduled_date <= end)
        .collect()
}

pub fn filter_by_status(interviews: &[Interview], status: InterviewStatus) -> Vec<&Interview> {
    interviews
        .iter()
        .filter(|interview| interview.status == status)
        .collect()
}

pub fn on_date(interviews: &[Interview], date: NaiveDate) -> Vec<&Interview> {
    interviews
        .iter()
        .filter(|interview| interview.scheduled_date == date)
        .collect()
}

/// Interviewers picked for a stage, keyed by email.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterviewPanel {
    selected: Vec<String>,
}

impl InterviewPanel {
    pub fn add(&mut self, email: &str) {
        if !self.selected.iter().any(|selected| selected == email) {
            self.selected.push(email.to_string());
        }
    }

    pub fn remove(&mut self, email: &str) {
        self.selected.retain(|selected| selected != email);
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    /// Available interviewers whose name or role contains `query`, case-insensitively.
    pub fn search<'a>(query: &str, available: &'a [Interviewer]) -> Vec<&'a Interviewer> {
        let needle = query.to_lowercase();
        available
            .iter()
            .filter(|interviewer| {
                interviewer.name.to_lowercase().contains(&needle)
                    || interviewer.role.to_lowercase().contains(&needle)
            })
            .collect()
    }

    pub fn selected_details<'a>(&self, available: &'a [Interviewer]) -> Vec<&'a Interviewer> {
        available
            .iter()
            .filter(|interviewer| self.selected.contains(&interviewer.email))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).expect("valid date")
    }

    fn interview(id: &str, day: u32, status: InterviewStatus) -> Interview {
        Interview {
            id: id.to_string(),
            application: "app-1".to_string(),
            stage: "stage-1".to_string(),
            stage_number: 1,
            stage_name: "Initial Screening".to_string(),
            scheduled_date: date(day),
            scheduled_time: NaiveTime::from_hms_opt(10, 0, 0).expect("valid time"),
            location: "Room 114".to_string(),
            zoom_link: None,
            status,
            notes: None,
            feedback: None,
            rating: None,
            applicant_name: String::new(),
            position_title: String::new(),
        }
    }

    #[test]
    fn no_show_uses_spaced_label_on_the_wire() {
        let payload = json!({
            "id": "i-1",
            "application": "a-1",
            "stage": "s-1",
            "scheduled_date": "2025-06-10",
            "scheduled_time": "14:30:00",
            "location": "District Office",
            "status": "No Show"
        });
        let decoded: Interview = serde_json::from_value(payload).expect("decodes");
        assert_eq!(decoded.status, InterviewStatus::NoShow);
        assert_eq!(
            serde_json::to_value(decoded.status).expect("encodes"),
            json!("No Show")
        );
    }

    #[test]
    fn stats_only_count_scheduled_for_upcoming_windows() {
        let today = date(10);
        let interviews = vec![
            interview("1", 10, InterviewStatus::Scheduled),
            interview("2", 16, InterviewStatus::Scheduled),
            interview("3", 18, InterviewStatus::Scheduled),
            interview("4", 12, InterviewStatus::Completed),
            interview("5", 10, InterviewStatus::Cancelled),
        ];
        let stats = InterviewStats::from_interviews(&interviews, today);
        assert_eq!(stats.total_interviews, 5);
        assert_eq!(stats.scheduled, 3);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.upcoming_this_week, 2);
        assert_eq!(stats.today, 1);

        assert_eq!(upcoming(&interviews, today, today + Duration::days(30)).len(), 3);
        assert_eq!(in_date_range(&interviews, date(11), date(17)).len(), 2);
        assert_eq!(on_date(&interviews, today).len(), 2);
    }

    #[test]
    fn panel_keeps_unique_emails() {
        let available = vec![
            Interviewer {
                id: None,
                name: "Dr. Sarah Johnson".to_string(),
                email: "sarah.johnson@district.edu".to_string(),
                role: "Principal".to_string(),
            },
            Interviewer {
                id: None,
                name: "Jennifer Davis".to_string(),
                email: "jennifer.davis@district.edu".to_string(),
                role: "HR Director".to_string(),
            },
        ];
        let mut panel = InterviewPanel::default();
        panel.add("sarah.johnson@district.edu");
        panel.add("sarah.johnson@district.edu");
        panel.add("jennifer.davis@district.edu");
        assert_eq!(panel.selected().len(), 2);
        panel.remove("sarah.johnson@district.edu");
        assert_eq!(panel.selected_details(&available)[0].name, "Jennifer Davis");
        assert_eq!(InterviewPanel::search("principal", &available).len(), 1);
    }
}
