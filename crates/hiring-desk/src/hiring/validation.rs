//! Declarative field rules for the position and job-template forms.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

/// Field name to the message of its first failing rule.
pub type ValidationErrors = BTreeMap<String, String>;

#[derive(Clone)]
pub enum RuleKind {
    Required,
    Email,
    MinLength(usize),
    MaxLength(usize),
    Pattern(Regex),
    Custom(fn(&str) -> bool),
}

impl fmt::Debug for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleKind::Required => f.write_str("Required"),
            RuleKind::Email => f.write_str("Email"),
            RuleKind::MinLength(length) => write!(f, "MinLength({length})"),
            RuleKind::MaxLength(length) => write!(f, "MaxLength({length})"),
            RuleKind::Pattern(pattern) => write!(f, "Pattern({})", pattern.as_str()),
            RuleKind::Custom(_) => f.write_str("Custom"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ValidationRule {
    pub kind: RuleKind,
    pub message: String,
}

impl ValidationRule {
    pub fn required(message: impl Into<String>) -> Self {
        Self::new(RuleKind::Required, message)
    }

    pub fn email(message: impl Into<String>) -> Self {
        Self::new(RuleKind::Email, message)
    }

    pub fn min_length(length: usize, message: impl Into<String>) -> Self {
        Self::new(RuleKind::MinLength(length), message)
    }

    pub fn max_length(length: usize, message: impl Into<String>) -> Self {
        Self::new(RuleKind::MaxLength(length), message)
    }

    pub fn pattern(pattern: &str, message: impl Into<String>) -> Result<Self, regex::Error> {
        Ok(Self::new(RuleKind::Pattern(Regex::new(pattern)?), message))
    }

    pub fn custom(check: fn(&str) -> bool, message: impl Into<String>) -> Self {
        Self::new(RuleKind::Custom(check), message)
    }

    fn new(kind: RuleKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Form-level check: every rule except `Required` and `Custom` passes on an empty value.
    fn passes_lenient(&self, value: &str) -> bool {
        match &self.kind {
            RuleKind::Required => !value.is_empty(),
            RuleKind::Custom(check) => check(value),
            _ if value.is_empty() => true,
            _ => self.passes_strict(value),
        }
    }

    fn passes_strict(&self, value: &str) -> bool {
        match &self.kind {
            RuleKind::Required => !value.is_empty(),
            RuleKind::Email => email_pattern().is_match(value),
            RuleKind::MinLength(length) => !value.is_empty() && value.chars().count() >= *length,
            RuleKind::MaxLength(length) => !value.is_empty() && value.chars().count() <= *length,
            RuleKind::Pattern(pattern) => pattern.is_match(value),
            RuleKind::Custom(check) => check(value),
        }
    }
}

/// Ordered list of fields and their rules.
#[derive(Debug, Clone, Default)]
pub struct ValidationSchema {
    fields: Vec<(String, Vec<ValidationRule>)>,
}

impl ValidationSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>, rules: Vec<ValidationRule>) -> Self {
        self.fields.push((name.into(), rules));
        self
    }

    pub fn rules(&self, name: &str) -> Option<&[ValidationRule]> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, rules)| rules.as_slice())
    }
}

/// Single-field check used while the user edits. Empty values fail every rule here.
pub fn validate_field(value: &str, rules: &[ValidationRule]) -> Result<(), String> {
    match rules.iter().find(|rule| !rule.passes_strict(value)) {
        Some(rule) => Err(rule.message.clone()),
        None => Ok(()),
    }
}

/// Checks every schema field against `data`; a missing key is treated as an empty value.
pub fn validate_form(
    data: &BTreeMap<String, String>,
    schema: &ValidationSchema,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    for (field, rules) in &schema.fields {
        let value = data.get(field).map(String::as_str).unwrap_or("");
        if let Some(rule) = rules.iter().find(|rule| !rule.passes_lenient(value)) {
            errors.insert(field.clone(), rule.message.clone());
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

pub const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern compiles"))
}

fn fte_in_range(value: &str) -> bool {
    value
        .trim()
        .parse::<f64>()
        .map(|fte| (0.0..=1.0).contains(&fte))
        .unwrap_or(false)
}

pub const REQ_ID_PATTERN: &str = r"^REQ-\d{4}-\d{4}$";

/// Rules applied when a position is created or edited.
pub fn position_schema() -> Result<ValidationSchema, regex::Error> {
    Ok(ValidationSchema::new()
        .field(
            "title",
            vec![
                ValidationRule::required("Position title is required"),
                ValidationRule::min_length(3, "Title must be at least 3 characters"),
            ],
        )
        .field(
            "department",
            vec![ValidationRule::required("Department is required")],
        )
        .field(
            "worksite",
            vec![ValidationRule::required("Worksite is required")],
        )
        .field(
            "primary_job_title",
            vec![ValidationRule::required("Primary job title is required")],
        )
        .field(
            "req_id",
            vec![
                ValidationRule::required("Requisition ID is required"),
                ValidationRule::pattern(REQ_ID_PATTERN, "Invalid requisition ID format")?,
            ],
        )
        .field(
            "fte",
            vec![
                ValidationRule::required("FTE is required"),
                ValidationRule::custom(fte_in_range, "FTE must be between 0 and 1"),
            ],
        )
        .field(
            "salary_range",
            vec![ValidationRule::required("Salary range is required")],
        )
        .field(
            "start_date",
            vec![ValidationRule::required("Start date is required")],
        )
        .field(
            "employee_category",
            vec![ValidationRule::required("Employee category is required")],
        )
        .field(
            "eeoc_classification",
            vec![ValidationRule::required("EEOC classification is required")],
        )
        .field(
            "workers_comp_classification",
            vec![ValidationRule::required(
                "Workers' comp classification is required",
            )],
        )
        .field(
            "leave_plan",
            vec![ValidationRule::required("Leave plan is required")],
        )
        .field(
            "deduction_template",
            vec![ValidationRule::required("Deduction template is required")],
        ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_position() -> BTreeMap<String, String> {
        [
            ("title", "High School Chemistry Teacher"),
            ("department", "Science"),
            ("worksite", "Oswego High School"),
            ("primary_job_title", "Teacher"),
            ("req_id", "REQ-2025-0193"),
            ("fte", "1.0"),
            ("salary_range", "$52,000 - $78,000"),
            ("start_date", "2025-08-15"),
            ("employee_category", "Certified"),
            ("eeoc_classification", "Professional"),
            ("workers_comp_classification", "8868"),
            ("leave_plan", "Teacher"),
            ("deduction_template", "Standard"),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
    }

    #[test]
    fn complete_position_passes() {
        let schema = position_schema().expect("schema compiles");
        assert!(validate_form(&complete_position(), &schema).is_ok());
    }

    #[test]
    fn first_failing_rule_wins_per_field() {
        let schema = position_schema().expect("schema compiles");
        let mut data = complete_position();
        data.insert("title".to_string(), "Hi".to_string());
        data.insert("req_id".to_string(), "REQ-25-1".to_string());
        data.insert("fte".to_string(), "1.5".to_string());
        data.remove("leave_plan");

        let errors = validate_form(&data, &schema).expect_err("invalid form");
        assert_eq!(errors.len(), 4);
        assert_eq!(errors["title"], "Title must be at least 3 characters");
        assert_eq!(errors["req_id"], "Invalid requisition ID format");
        assert_eq!(errors["fte"], "FTE must be between 0 and 1");
        assert_eq!(errors["leave_plan"], "Leave plan is required");
    }

    #[test]
    fn empty_required_field_reports_required_message() {
        let schema = position_schema().expect("schema compiles");
        let mut data = complete_position();
        data.insert("req_id".to_string(), String::new());
        let errors = validate_form(&data, &schema).expect_err("invalid form");
        assert_eq!(errors["req_id"], "Requisition ID is required");
    }

    #[test]
    fn optional_rules_skip_empty_values_in_forms() {
        let schema = ValidationSchema::new()
            .field("contact", vec![ValidationRule::email("Invalid email")])
            .field("nickname", vec![ValidationRule::max_length(4, "Too long")]);
        let data = BTreeMap::new();
        assert!(validate_form(&data, &schema).is_ok());

        let data = BTreeMap::from([
            ("contact".to_string(), "not-an-email".to_string()),
            ("nickname".to_string(), "Alexandra".to_string()),
        ]);
        let errors = validate_form(&data, &schema).expect_err("invalid");
        assert_eq!(errors["contact"], "Invalid email");
        assert_eq!(errors["nickname"], "Too long");
    }

    #[test]
    fn single_field_validation_is_strict_about_empty_values() {
        let rules = [ValidationRule::email("Invalid email")];
        assert_eq!(validate_field("", &rules), Err("Invalid email".to_string()));
        assert!(validate_field("sarah.johnson@district.edu", &rules).is_ok());
        assert!(validate_field("sarah johnson@district.edu", &rules).is_err());
    }

    #[test]
    fn email_rule_needs_one_at_sign_and_a_dotted_domain() {
        let rules = [ValidationRule::email("Invalid email")];
        assert!(validate_field("x@a.b.", &rules).is_ok());
        assert!(validate_field("hr@district.k12.il.us", &rules).is_ok());
        assert!(validate_field("hr@district", &rules).is_err());
        assert!(validate_field("hr@@district.edu", &rules).is_err());
        assert!(validate_field("@district.edu", &rules).is_err());
    }
}
