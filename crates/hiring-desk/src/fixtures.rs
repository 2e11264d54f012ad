//! Seed records for the in-memory backend and the CLI demo. Dates are laid out relative to the
//! day the seed is built so upcoming interviews and expiring offers stay current.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use serde_json::json;

use crate::hiring::applications::{Application, ApplicationStage};
use crate::hiring::interviews::{Interview, InterviewStatus};
use crate::hiring::offers::templates::DEFAULT_TEMPLATE_NAME;
use crate::hiring::offers::{
    extract_template_fields, Offer, OfferStatus, OfferTemplate, OFFER_LETTER_TEMPLATE,
};
use crate::hiring::positions::{InterviewStage, Interviewer, Position, PositionStatus};
use crate::hiring::users::User;
use crate::onboarding::{
    CreateOnboardingCandidate, OnboardingCandidate, OnboardingSection, SectionUpdate,
};

/// Everything the stand-in backend starts with.
#[derive(Debug, Clone, Default)]
pub struct Seed {
    pub positions: Vec<Position>,
    pub applications: Vec<Application>,
    pub interviews: Vec<Interview>,
    pub offers: Vec<Offer>,
    pub offer_templates: Vec<OfferTemplate>,
    pub onboarding_candidates: Vec<OnboardingCandidate>,
    pub users: Vec<User>,
}

pub fn seed(today: NaiveDate) -> Seed {
    let now = at(today, 9);
    let positions = positions(today, now);
    let applications = applications(today, &positions);
    let interviews = interviews(today, &applications, &positions);
    let offers = offers(today, &applications, &positions);

    Seed {
        positions,
        applications,
        interviews,
        offers,
        offer_templates: vec![default_offer_template(now)],
        onboarding_candidates: onboarding_candidates(today),
        users: directory_users(),
    }
}

/// District staff available to sit on interview panels.
pub fn mock_interviewers() -> Vec<Interviewer> {
    [
        ("Dr. Sarah Johnson", "sarah.johnson@district.edu", "Principal"),
        ("Michael Chen", "michael.chen@district.edu", "Assistant Principal"),
        ("Patricia Williams", "patricia.williams@district.edu", "Department Head - Science"),
        ("Robert Martinez", "robert.martinez@district.edu", "Department Head - Math"),
        ("Jennifer Davis", "jennifer.davis@district.edu", "HR Director"),
        ("David Thompson", "david.thompson@district.edu", "Superintendent"),
        ("Lisa Anderson", "lisa.anderson@district.edu", "Curriculum Director"),
        ("James Taylor", "james.taylor@district.edu", "Department Head - English"),
        ("Maria Garcia", "maria.garcia@district.edu", "Special Education Director"),
        ("William Brown", "william.brown@district.edu", "Lead Teacher - Science"),
    ]
    .into_iter()
    .map(|(name, email, role)| Interviewer {
        id: None,
        name: name.to_string(),
        email: email.to_string(),
        role: role.to_string(),
    })
    .collect()
}

/// Interview rounds configured per requisition. Unknown requisitions have none.
pub fn interview_stages(req_id: &str) -> Vec<InterviewStage> {
    let plan: &[(&str, &[&str])] = match req_id {
        "REQ-2025-0193" => &[
            ("Initial Screening", &["jennifer.davis@district.edu"]),
            (
                "Department Interview",
                &["patricia.williams@district.edu", "william.brown@district.edu"],
            ),
            (
                "Final Interview with Leadership",
                &[
                    "sarah.johnson@district.edu",
                    "michael.chen@district.edu",
                    "david.thompson@district.edu",
                ],
            ),
        ],
        "REQ-2025-0194" => &[
            ("Initial Screening", &["jennifer.davis@district.edu"]),
            (
                "Special Education Department Panel",
                &["maria.garcia@district.edu", "sarah.johnson@district.edu"],
            ),
            (
                "Teaching Demonstration",
                &["maria.garcia@district.edu", "lisa.anderson@district.edu"],
            ),
        ],
        "REQ-2025-0195" => &[
            ("Phone Screening", &["jennifer.davis@district.edu"]),
            (
                "Department Interview",
                &["james.taylor@district.edu", "lisa.anderson@district.edu"],
            ),
        ],
        _ => &[],
    };

    let staff = mock_interviewers();
    plan.iter()
        .enumerate()
        .map(|(index, (name, emails))| InterviewStage {
            id: format!("{}-stage-{}", req_id.to_ascii_lowercase(), index + 1),
            stage_number: index as u32 + 1,
            stage_name: (*name).to_string(),
            interviewers: staff
                .iter()
                .filter(|interviewer| emails.contains(&interviewer.email.as_str()))
                .cloned()
                .collect(),
        })
        .collect()
}

pub fn default_offer_template(created_at: DateTime<Utc>) -> OfferTemplate {
    OfferTemplate {
        id: "tpl-1".to_string(),
        name: DEFAULT_TEMPLATE_NAME.to_string(),
        template_text: OFFER_LETTER_TEMPLATE.to_string(),
        description: Some("Standard certified staff offer letter".to_string()),
        is_active: true,
        extracted_fields: extract_template_fields(OFFER_LETTER_TEMPLATE),
        created_at: Some(created_at),
    }
}

fn at(day: NaiveDate, hour: u32) -> DateTime<Utc> {
    day.and_time(NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or_default())
        .and_utc()
}

fn august_start(today: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(
        if today.month0() >= 7 { today.year() + 1 } else { today.year() },
        8,
        15,
    )
    .unwrap_or(today)
}

fn positions(today: NaiveDate, now: DateTime<Utc>) -> Vec<Position> {
    let start = august_start(today);
    [
        (
            "pos-1",
            "REQ-2025-0193",
            "High School Chemistry Teacher",
            "Science",
            "Central High School",
            "$58,000 - $92,000",
            PositionStatus::Open,
        ),
        (
            "pos-2",
            "REQ-2025-0194",
            "Special Education Teacher",
            "Special Education",
            "Lincoln Elementary",
            "$60,000 - $95,000",
            PositionStatus::Open,
        ),
        (
            "pos-3",
            "REQ-2025-0195",
            "ESL/Bilingual Teacher",
            "English Language Development",
            "Washington Middle School",
            "$55,000 - $88,000",
            PositionStatus::Open,
        ),
        (
            "pos-4",
            "REQ-2025-0201",
            "Middle School Band Director",
            "Fine Arts",
            "Washington Middle School",
            "$52,000 - $80,000",
            PositionStatus::Draft,
        ),
    ]
    .into_iter()
    .map(
        |(id, req_id, title, department, worksite, salary_range, status)| {
            let stages = interview_stages(req_id);
            Position {
                id: id.to_string(),
                req_id: req_id.to_string(),
                title: title.to_string(),
                department: department.to_string(),
                worksite: worksite.to_string(),
                primary_job_title: "Teacher".to_string(),
                fte: 1.0,
                salary_range: salary_range.to_string(),
                start_date: Some(start),
                posting_start_date: Some(today - Duration::days(30)),
                posting_end_date: Some(today + Duration::days(30)),
                status,
                description: format!("{title} at {worksite}."),
                requirements: "Valid state teaching license.".to_string(),
                applicant_count: 0,
                interview_count: 0,
                interview_stages: stages.len() as u32,
                stages,
                created_at: Some(now - Duration::days(45)),
            }
        },
    )
    .collect()
}

struct ApplicantSeed {
    id: &'static str,
    position: &'static str,
    name: &'static str,
    email: &'static str,
    role: &'static str,
    years: u32,
    certified: bool,
    internal: bool,
    stage: ApplicationStage,
    completed: u32,
    days_ago: i64,
}

const APPLICANTS: [ApplicantSeed; 8] = [
    ApplicantSeed {
        id: "app-1",
        position: "pos-1",
        name: "Sarah Johnson",
        email: "sarah.j.applicant@email.com",
        role: "Chemistry Teacher at District 204",
        years: 6,
        certified: true,
        internal: false,
        stage: ApplicationStage::Interview,
        completed: 2,
        days_ago: 10,
    },
    ApplicantSeed {
        id: "app-2",
        position: "pos-1",
        name: "Michael Chen",
        email: "michael.chen.app@email.com",
        role: "Student Teacher - University of Illinois",
        years: 0,
        certified: false,
        internal: false,
        stage: ApplicationStage::Screening,
        completed: 0,
        days_ago: 7,
    },
    ApplicantSeed {
        id: "app-3",
        position: "pos-1",
        name: "Amanda Rodriguez",
        email: "amanda.rodriguez@email.com",
        role: "Biology Teacher at Lincoln HS",
        years: 4,
        certified: true,
        internal: true,
        stage: ApplicationStage::ReferenceCheck,
        completed: 3,
        days_ago: 13,
    },
    ApplicantSeed {
        id: "app-4",
        position: "pos-1",
        name: "David Park",
        email: "david.park@email.com",
        role: "Chemistry Teacher at Private Academy",
        years: 8,
        certified: true,
        internal: false,
        stage: ApplicationStage::ApplicationReview,
        completed: 0,
        days_ago: 5,
    },
    ApplicantSeed {
        id: "app-5",
        position: "pos-2",
        name: "Emily Martinez",
        email: "emily.martinez@email.com",
        role: "Special Ed Teacher at Roosevelt Elementary",
        years: 5,
        certified: true,
        internal: false,
        stage: ApplicationStage::Interview,
        completed: 1,
        days_ago: 15,
    },
    ApplicantSeed {
        id: "app-6",
        position: "pos-3",
        name: "Robert Thompson",
        email: "robert.t@email.com",
        role: "ESL Teacher at Washington MS",
        years: 3,
        certified: true,
        internal: false,
        stage: ApplicationStage::Interview,
        completed: 2,
        days_ago: 11,
    },
    ApplicantSeed {
        id: "app-7",
        position: "pos-1",
        name: "Jennifer Williams",
        email: "jennifer.williams@email.com",
        role: "Chemistry Teacher at Oak Park High School",
        years: 7,
        certified: true,
        internal: false,
        stage: ApplicationStage::Offer,
        completed: 3,
        days_ago: 20,
    },
    ApplicantSeed {
        id: "app-8",
        position: "pos-2",
        name: "Lisa Anderson",
        email: "lisa.anderson@email.com",
        role: "Special Education Teacher at Jefferson Elementary",
        years: 9,
        certified: true,
        internal: false,
        stage: ApplicationStage::Offer,
        completed: 3,
        days_ago: 18,
    },
];

fn applications(today: NaiveDate, positions: &[Position]) -> Vec<Application> {
    APPLICANTS
        .iter()
        .map(|seed| {
            let position = positions.iter().find(|position| position.id == seed.position);
            let total = position.map_or(0, Position::interview_stage_count);
            Application {
                id: seed.id.to_string(),
                position: seed.position.to_string(),
                applicant_name: seed.name.to_string(),
                applicant_email: seed.email.to_string(),
                applicant_phone: Some("(630) 555-0142".to_string()),
                start_date_availability: position.and_then(|position| position.start_date),
                screening_answers: BTreeMap::from([(
                    "Why do you want to join the district?".to_string(),
                    "To teach in a community I care about.".to_string(),
                )]),
                resume: Some(format!("resumes/resume_{}.pdf", seed.name.replace(' ', "_"))),
                cover_letter: None,
                stage: seed.stage,
                current_role: Some(seed.role.to_string()),
                years_experience: seed.years,
                certified: seed.certified,
                internal: seed.internal,
                current_interview_stage: seed.completed,
                completed_interview_stages: seed.completed.min(total),
                total_interview_stages: total,
                position_title: position.map(|position| position.title.clone()),
                position_req_id: position.map(|position| position.req_id.clone()),
                submitted_at: Some(at(today - Duration::days(seed.days_ago), 14)),
                references: Vec::new(),
                interview_availability: Vec::new(),
            }
        })
        .collect()
}

fn interviews(
    today: NaiveDate,
    applications: &[Application],
    positions: &[Position],
) -> Vec<Interview> {
    let plan = [
        ("int-1", "app-1", 1, -6, InterviewStatus::Completed, Some(4)),
        ("int-2", "app-1", 2, -2, InterviewStatus::Completed, Some(5)),
        ("int-3", "app-1", 3, 3, InterviewStatus::Scheduled, None),
        ("int-4", "app-5", 2, 0, InterviewStatus::Scheduled, None),
        ("int-5", "app-6", 2, 12, InterviewStatus::Scheduled, None),
    ];

    plan.into_iter()
        .filter_map(|(id, application_id, stage_number, offset, status, rating)| {
            let application = applications.iter().find(|app| app.id == application_id)?;
            let position = positions.iter().find(|pos| pos.id == application.position)?;
            let stage = position.stage(stage_number)?;
            Some(Interview {
                id: id.to_string(),
                application: application.id.clone(),
                stage: stage.id.clone(),
                stage_number,
                stage_name: stage.stage_name.clone(),
                scheduled_date: today + Duration::days(offset),
                scheduled_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap_or_default(),
                location: position.worksite.clone(),
                zoom_link: None,
                status,
                notes: None,
                feedback: rating.map(|_| "Strong classroom management examples.".to_string()),
                rating,
                applicant_name: application.applicant_name.clone(),
                position_title: position.title.clone(),
            })
        })
        .collect()
}

fn offers(today: NaiveDate, applications: &[Application], positions: &[Position]) -> Vec<Offer> {
    [("offer-1", "app-7", 64_000.0, 5), ("offer-2", "app-8", 66_500.0, 10)]
        .into_iter()
        .filter_map(|(id, application_id, salary, expires_in)| {
            let application = applications.iter().find(|app| app.id == application_id)?;
            let position = positions.iter().find(|pos| pos.id == application.position)?;
            Some(Offer {
                id: id.to_string(),
                application: application.id.clone(),
                salary,
                fte: position.fte,
                start_date: position.start_date.unwrap_or(today),
                benefits: vec![
                    "Health, dental, and vision insurance".to_string(),
                    "State teachers' retirement plan".to_string(),
                ],
                offer_date: today - Duration::days(2),
                expiration_date: today + Duration::days(expires_in),
                status: OfferStatus::Pending,
                accepted_date: None,
                declined_reason: None,
                template_text: OFFER_LETTER_TEMPLATE.to_string(),
                template_data: BTreeMap::from([
                    ("candidateName".to_string(), application.applicant_name.clone()),
                    ("positionTitle".to_string(), position.title.clone()),
                ]),
                candidate_name: application.applicant_name.clone(),
                candidate_email: application.applicant_email.clone(),
                position_title: position.title.clone(),
                position_req_id: position.req_id.clone(),
                department: position.department.clone(),
                worksite: position.worksite.clone(),
                employee_category: "Certified".to_string(),
            })
        })
        .collect()
}

fn onboarding_candidates(today: NaiveDate) -> Vec<OnboardingCandidate> {
    let plan = [
        ("onb-1", "Karen Whitfield", "karen.whitfield@email.com", "Kindergarten Teacher", 0, false),
        ("onb-2", "Marcus Bell", "marcus.bell@email.com", "School Counselor", 3, false),
        ("onb-3", "Priya Natarajan", "priya.natarajan@email.com", "Math Interventionist", 8, true),
    ];

    plan.into_iter()
        .enumerate()
        .map(|(offset, (id, name, email, position, completed, submitted))| {
            let mut candidate = OnboardingCandidate::new(
                id,
                CreateOnboardingCandidate {
                    name: name.to_string(),
                    email: email.to_string(),
                    position: position.to_string(),
                    offer_date: today - Duration::days(14 + offset as i64),
                    start_date: Some(august_start(today)),
                    job_application: None,
                },
            );
            let updated = at(today - Duration::days(1), 16);
            for section in OnboardingSection::all().into_iter().take(completed) {
                let update = SectionUpdate {
                    section_index: section.index(),
                    form_data: json!({ "section": section.key() }),
                    is_completed: true,
                };
                if candidate.record_section(update, updated).is_err() {
                    break;
                }
            }
            if submitted {
                candidate.submit(updated).ok();
            }
            candidate
        })
        .collect()
}

fn directory_users() -> Vec<User> {
    let mut users: Vec<User> = mock_interviewers()
        .into_iter()
        .enumerate()
        .map(|(index, interviewer)| {
            let (first, last) = interviewer
                .name
                .rsplit_once(' ')
                .unwrap_or((interviewer.name.as_str(), ""));
            User {
                id: Some(format!("user-{}", index + 1)),
                email: Some(interviewer.email.clone()),
                first_name: Some(first.to_string()),
                last_name: Some(last.to_string()),
                job_title: Some(interviewer.role.clone()),
                department: None,
            }
        })
        .collect();
    users.push(User {
        id: Some("user-svc".to_string()),
        email: None,
        first_name: Some("Payroll".to_string()),
        last_name: Some("Export".to_string()),
        job_title: None,
        department: Some("Finance".to_string()),
    });
    users
}
