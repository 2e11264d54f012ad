//! Two-step offer wizard: fill the template fields, then review and send.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use chrono::{Duration, NaiveDate};
use regex::Regex;

use super::domain::CreateOffer;
use super::templates::{fill_template, OfferTemplate};
use crate::hiring::applications::Applicant;

pub const DISTRICT_NAME: &str = "School Demo District";
pub const DISTRICT_ADDRESS: &str = "856 West Dundee Avenue, Oswego, IL 60543";
pub const HR_DIRECTOR_NAME: &str = "Dr. Jennifer Davis";
pub const HR_DIRECTOR_TITLE: &str = "Director of Human Resources";
pub const DEFAULT_BENEFITS: &str =
    "Health Insurance\nDental & Vision\nRetirement Plan\nProfessional Development";
pub const OFFER_VALIDITY_DAYS: i64 = 14;

/// Fields that cannot be derived from the applicant and must be confirmed by hand.
pub const REQUIRED_FIELDS: [&str; 3] = ["salary", "startDate", "expirationDate"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OfferFormError {
    #[error("Please fill in all required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),
    #[error("Please enter a valid salary")]
    InvalidSalary,
    #[error("Please enter a valid FTE (Full-Time Equivalent) value between 0.1 and 1.0")]
    InvalidFte,
    #[error("'{0}' is not a valid date (expected YYYY-MM-DD)")]
    InvalidDate(String),
    #[error("offer form must be reviewed before it is sent")]
    NotReviewed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferStep {
    Details,
    Review,
}

/// Editable state of the offer wizard for one applicant.
#[derive(Debug, Clone, PartialEq)]
pub struct OfferForm {
    pub application_id: String,
    pub template_text: String,
    pub fields: BTreeMap<String, String>,
    step: OfferStep,
}

impl OfferForm {
    /// Seeds every template field plus the fields the offer payload always needs.
    pub fn new(applicant: &Applicant, template: &OfferTemplate, today: NaiveDate) -> Self {
        let offer_date = today.to_string();
        let expiration = (today + Duration::days(OFFER_VALIDITY_DAYS)).to_string();
        let fte = if applicant.fte.is_empty() {
            "1.0".to_string()
        } else {
            applicant.fte.clone()
        };
        let salary = salary_from_range(&applicant.salary);

        let mut fields = BTreeMap::new();
        fields.insert("fte".to_string(), fte.clone());
        fields.insert("startDate".to_string(), applicant.start_date.clone());
        fields.insert("salary".to_string(), salary.clone());
        fields.insert("offerDate".to_string(), offer_date.clone());
        fields.insert("expirationDate".to_string(), expiration.clone());

        for field in template.fields() {
            let value = match field.as_str() {
                "candidateName" => applicant.name.clone(),
                "candidateEmail" => applicant.email.clone(),
                "positionTitle" => applicant.position_title.clone(),
                "department" => applicant.department.clone(),
                "worksite" => applicant.worksite.clone(),
                "fte" => fte.clone(),
                "startDate" => applicant.start_date.clone(),
                "offerDate" => offer_date.clone(),
                "expirationDate" => expiration.clone(),
                "districtName" => DISTRICT_NAME.to_string(),
                "districtAddress" => DISTRICT_ADDRESS.to_string(),
                "hrDirectorName" => HR_DIRECTOR_NAME.to_string(),
                "hrDirectorTitle" => HR_DIRECTOR_TITLE.to_string(),
                "benefits" => DEFAULT_BENEFITS.to_string(),
                "salary" => salary.clone(),
                _ => String::new(),
            };
            fields.insert(field, value);
        }

        Self {
            application_id: applicant.id.clone(),
            template_text: template.template_text.clone(),
            fields,
            step: OfferStep::Details,
        }
    }

    pub fn step(&self) -> OfferStep {
        self.step
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> &str {
        self.fields.get(field).map(String::as_str).unwrap_or("")
    }

    pub fn missing_required(&self) -> Vec<String> {
        REQUIRED_FIELDS
            .iter()
            .filter(|field| self.get(field).is_empty())
            .map(|field| field.to_string())
            .collect()
    }

    /// Details to review. Fails when any required field is empty.
    pub fn next(&mut self) -> Result<(), OfferFormError> {
        let missing = self.missing_required();
        if !missing.is_empty() {
            return Err(OfferFormError::MissingFields(missing));
        }
        self.step = OfferStep::Review;
        Ok(())
    }

    pub fn back(&mut self) {
        self.step = OfferStep::Details;
    }

    pub fn preview(&self) -> String {
        fill_template(&self.template_text, &self.fields)
    }

    /// Builds the payload for `/hiring/offers/`. Numeric checks run here, before any request.
    pub fn to_create_offer(&self) -> Result<CreateOffer, OfferFormError> {
        if self.step != OfferStep::Review {
            return Err(OfferFormError::NotReviewed);
        }

        let salary = parse_number(self.get("salary")).ok_or(OfferFormError::InvalidSalary)?;
        let fte = parse_number(self.get("fte"))
            .filter(|fte| *fte > 0.0)
            .ok_or(OfferFormError::InvalidFte)?;

        Ok(CreateOffer {
            application: self.application_id.clone(),
            salary,
            fte,
            start_date: parse_date(self.get("startDate"))?,
            benefits: benefit_lines(self.get("benefits")),
            offer_date: parse_date(self.get("offerDate"))?,
            expiration_date: parse_date(self.get("expirationDate"))?,
            template_text: self.template_text.clone(),
            template_data: self.fields.clone(),
        })
    }
}

fn salary_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$?([\d,]+)").expect("salary pattern compiles"))
}

/// First number in a salary range such as `$52,000 - $78,000`, with grouping commas removed.
pub fn salary_from_range(range: &str) -> String {
    salary_pattern()
        .captures(range)
        .map(|captures| captures[1].replace(',', ""))
        .unwrap_or_default()
}

/// Non-blank lines of the benefits field.
pub fn benefit_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Leading-number parse: `"58000abc"` reads as 58000, `"abc"` does not parse.
fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim_start();
    let end = trimmed
        .char_indices()
        .find(|(index, ch)| {
            !(ch.is_ascii_digit() || *ch == '.' || (*index == 0 && (*ch == '-' || *ch == '+')))
        })
        .map_or(trimmed.len(), |(index, _)| index);
    let mut candidate = &trimmed[..end];
    while !candidate.is_empty() {
        if let Ok(value) = candidate.parse::<f64>() {
            return Some(value);
        }
        candidate = &candidate[..candidate.len() - 1];
    }
    None
}

fn parse_date(raw: &str) -> Result<NaiveDate, OfferFormError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| OfferFormError::InvalidDate(raw.to_string()))
}
