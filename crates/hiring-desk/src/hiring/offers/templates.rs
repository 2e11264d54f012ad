use std::collections::BTreeMap;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// District offer letter used when no custom template has been saved.
pub const OFFER_LETTER_TEMPLATE: &str = "{{districtName}}
{{districtAddress}}

{{offerDate}}

Dear {{candidateName}},

We are pleased to offer you the position of {{positionTitle}} with {{districtName}}. We were impressed by your qualifications and believe you will be an excellent addition to our team.

POSITION DETAILS:
- Position Title: {{positionTitle}}
- Department: {{department}}
- Worksite: {{worksite}}
- FTE (Full-Time Equivalent): {{fte}}
- Salary: {{salary}}
- Start Date: {{startDate}}

BENEFITS PACKAGE:
{{benefits}}

This offer is contingent upon successful completion of a background check and verification of your credentials. This offer will expire on {{expirationDate}}.

We are excited about the possibility of you joining our team and look forward to your response.

Sincerely,

{{hrDirectorName}}
{{hrDirectorTitle}}
{{districtName}}
";

pub const OFFER_TEMPLATE_FIELDS: [&str; 14] = [
    "districtName",
    "districtAddress",
    "offerDate",
    "candidateName",
    "positionTitle",
    "department",
    "worksite",
    "fte",
    "salary",
    "startDate",
    "benefits",
    "expirationDate",
    "hrDirectorName",
    "hrDirectorTitle",
];

pub const DEFAULT_TEMPLATE_NAME: &str = "Default Offer Template";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferTemplate {
    pub id: String,
    pub name: String,
    pub template_text: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
    #[serde(default)]
    pub extracted_fields: Vec<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

fn active_by_default() -> bool {
    true
}

impl OfferTemplate {
    /// Placeholder names, taken from `extracted_fields` when the backend supplied them.
    pub fn fields(&self) -> Vec<String> {
        if self.extracted_fields.is_empty() {
            extract_template_fields(&self.template_text)
        } else {
            self.extracted_fields.clone()
        }
    }

    pub fn fill(&self, data: &BTreeMap<String, String>) -> String {
        fill_template(&self.template_text, data)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOfferTemplate {
    pub name: String,
    pub template_text: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewRequest {
    #[serde(default)]
    pub data: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewResponse {
    pub preview: String,
}

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\{\{(\w+)\}\}").expect("placeholder pattern compiles"))
}

/// Unique `{{identifier}}` names in order of first occurrence.
pub fn extract_template_fields(text: &str) -> Vec<String> {
    let mut fields: Vec<String> = Vec::new();
    for captures in placeholder_pattern().captures_iter(text) {
        let name = &captures[1];
        if !fields.iter().any(|field| field == name) {
            fields.push(name.to_string());
        }
    }
    fields
}

/// Literal substitution of each `{{key}}`. Values are not escaped and unknown placeholders stay.
pub fn fill_template(text: &str, data: &BTreeMap<String, String>) -> String {
    data.iter().fold(text.to_string(), |filled, (key, value)| {
        filled.replace(&format!("{{{{{key}}}}}"), value)
    })
}

/// `districtName` -> `District Name`.
pub fn format_field_label(field: &str) -> String {
    let mut label = String::with_capacity(field.len() + 4);
    for (index, ch) in field.chars().enumerate() {
        if index == 0 {
            label.extend(ch.to_uppercase());
        } else {
            if ch.is_ascii_uppercase() {
                label.push(' ');
            }
            label.push(ch);
        }
    }
    label
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Date,
    Email,
    Number,
    Multiline,
    Text,
}

pub fn field_kind(field: &str) -> FieldKind {
    match field {
        "candidateEmail" => FieldKind::Email,
        "salary" => FieldKind::Number,
        "benefits" => FieldKind::Multiline,
        _ if field.contains("Date") => FieldKind::Date,
        _ => FieldKind::Text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extraction_is_unique_and_ordered() {
        assert_eq!(
            extract_template_fields("Hello {{name}}, {{name}} again"),
            vec!["name".to_string()]
        );
        assert_eq!(
            extract_template_fields("{{b}} {{a}} {{ c }} {{b}} {{snake_case1}}"),
            vec!["b", "a", "snake_case1"]
        );
        assert!(extract_template_fields("no placeholders").is_empty());
    }

    #[test]
    fn letter_template_exposes_fourteen_fields() {
        let fields = extract_template_fields(OFFER_LETTER_TEMPLATE);
        assert_eq!(fields, OFFER_TEMPLATE_FIELDS.to_vec());
    }

    #[test]
    fn fill_replaces_every_occurrence_and_keeps_unknown() {
        let data = BTreeMap::from([
            ("districtName".to_string(), "School Demo District".to_string()),
            ("salary".to_string(), "$58,000".to_string()),
        ]);
        let filled = fill_template(
            "{{districtName}} / {{districtName}} pays {{salary}} to {{candidateName}}",
            &data,
        );
        assert_eq!(
            filled,
            "School Demo District / School Demo District pays $58,000 to {{candidateName}}"
        );
    }

    #[test]
    fn values_are_not_rescanned() {
        let data = BTreeMap::from([("a".to_string(), "{{a}}".to_string())]);
        assert_eq!(fill_template("x {{a}} y", &data), "x {{a}} y");
    }

    #[test]
    fn labels_and_kinds_follow_field_names() {
        assert_eq!(format_field_label("districtName"), "District Name");
        assert_eq!(format_field_label("fte"), "Fte");
        assert_eq!(field_kind("expirationDate"), FieldKind::Date);
        assert_eq!(field_kind("benefits"), FieldKind::Multiline);
        assert_eq!(field_kind("worksite"), FieldKind::Text);
    }
}
