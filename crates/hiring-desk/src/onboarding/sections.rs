//! Typed payloads for each onboarding section and the checks run before a section is marked done.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::domain::{OnboardingSection, SectionUpdate};
use crate::hiring::validation::{validate_form, ValidationErrors, ValidationRule, ValidationSchema};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalInformation {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub date_of_birth: String,
    pub social_security_number: String,
    pub citizenship: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmploymentDetails {
    pub status: String,
    pub hire_date: String,
    pub pay_schedule: String,
    pub work_location: String,
    pub manager: String,
    pub department: String,
    pub job_title: String,
    pub employee_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct I9Form {
    pub citizenship_status: String,
    pub uscis_number: Option<String>,
    pub passport_number: Option<String>,
    pub list_a_document: Option<String>,
    pub list_b_document: Option<String>,
    pub list_c_document: Option<String>,
    pub verification_date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxWithholdings {
    pub w4_version: String,
    pub filing_status: String,
    pub claimed_dependents: String,
    pub other_income: String,
    pub deductions: String,
    pub extra_withholding: String,
    pub il_allowances: String,
    pub il_extra_withholding: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentKind {
    #[default]
    PaperCheck,
    DirectDeposit,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentMethod {
    pub payment_method: PaymentKind,
    pub bank_name: String,
    pub account_type: String,
    pub account_number: String,
    pub routing_number: String,
    pub name_on_account: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeOff {
    pub sick_days_understanding: bool,
    pub vacation_days_understanding: bool,
    pub holidays_understanding: bool,
    pub time_off_contact_name: Option<String>,
    pub time_off_contact_email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Deductions {
    pub health_insurance: bool,
    pub health_amount: String,
    pub dental_vision: bool,
    pub dental_vision_amount: String,
    pub retirement_plan: bool,
    pub retirement_amount: String,
    pub hsa: bool,
    pub hsa_amount: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmergencyContactPerson {
    pub name: String,
    pub relationship: String,
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmergencyContact {
    pub contacts: Vec<EmergencyContactPerson>,
    pub acknowledgment: bool,
}

/// One section's payload, tagged by the section it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionForm {
    PersonalInfo(PersonalInformation),
    EmploymentDetails(EmploymentDetails),
    I9Form(I9Form),
    TaxWithholdings(TaxWithholdings),
    PaymentMethod(PaymentMethod),
    TimeOff(TimeOff),
    Deductions(Deductions),
    EmergencyContact(EmergencyContact),
}

impl SectionForm {
    pub fn from_value(section: OnboardingSection, value: Value) -> Result<Self, serde_json::Error> {
        Ok(match section {
            OnboardingSection::PersonalInfo => Self::PersonalInfo(serde_json::from_value(value)?),
            OnboardingSection::EmploymentDetails => {
                Self::EmploymentDetails(serde_json::from_value(value)?)
            }
            OnboardingSection::I9Form => Self::I9Form(serde_json::from_value(value)?),
            OnboardingSection::TaxWithholdings => {
                Self::TaxWithholdings(serde_json::from_value(value)?)
            }
            OnboardingSection::PaymentMethod => Self::PaymentMethod(serde_json::from_value(value)?),
            OnboardingSection::TimeOff => Self::TimeOff(serde_json::from_value(value)?),
            OnboardingSection::Deductions => Self::Deductions(serde_json::from_value(value)?),
            OnboardingSection::EmergencyContact => {
                Self::EmergencyContact(serde_json::from_value(value)?)
            }
        })
    }

    pub fn section(&self) -> OnboardingSection {
        match self {
            Self::PersonalInfo(_) => OnboardingSection::PersonalInfo,
            Self::EmploymentDetails(_) => OnboardingSection::EmploymentDetails,
            Self::I9Form(_) => OnboardingSection::I9Form,
            Self::TaxWithholdings(_) => OnboardingSection::TaxWithholdings,
            Self::PaymentMethod(_) => OnboardingSection::PaymentMethod,
            Self::TimeOff(_) => OnboardingSection::TimeOff,
            Self::Deductions(_) => OnboardingSection::Deductions,
            Self::EmergencyContact(_) => OnboardingSection::EmergencyContact,
        }
    }

    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        match self {
            Self::PersonalInfo(form) => serde_json::to_value(form),
            Self::EmploymentDetails(form) => serde_json::to_value(form),
            Self::I9Form(form) => serde_json::to_value(form),
            Self::TaxWithholdings(form) => serde_json::to_value(form),
            Self::PaymentMethod(form) => serde_json::to_value(form),
            Self::TimeOff(form) => serde_json::to_value(form),
            Self::Deductions(form) => serde_json::to_value(form),
            Self::EmergencyContact(form) => serde_json::to_value(form),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        match self {
            Self::PersonalInfo(form) => validate_personal_info(form),
            Self::EmploymentDetails(form) => check(
                &[
                    ("hire_date", &form.hire_date),
                    ("department", &form.department),
                    ("job_title", &form.job_title),
                ],
                required_schema(&[
                    ("hire_date", "Hire date is required"),
                    ("department", "Department is required"),
                    ("job_title", "Job title is required"),
                ]),
            ),
            Self::I9Form(form) => check(
                &[
                    ("citizenship_status", &form.citizenship_status),
                    ("verification_date", &form.verification_date),
                ],
                required_schema(&[
                    ("citizenship_status", "Citizenship status is required"),
                    ("verification_date", "Verification date is required"),
                ]),
            ),
            Self::TaxWithholdings(form) => check(
                &[
                    ("w4_version", &form.w4_version),
                    ("filing_status", &form.filing_status),
                ],
                required_schema(&[
                    ("w4_version", "W-4 version is required"),
                    ("filing_status", "Filing status is required"),
                ]),
            ),
            Self::PaymentMethod(form) => validate_payment_method(form),
            Self::TimeOff(form) => {
                let mut errors = ValidationErrors::new();
                for (field, acknowledged) in [
                    ("sick_days_understanding", form.sick_days_understanding),
                    ("vacation_days_understanding", form.vacation_days_understanding),
                    ("holidays_understanding", form.holidays_understanding),
                ] {
                    if !acknowledged {
                        errors.insert(field.to_string(), "Acknowledgment is required".to_string());
                    }
                }
                into_result(errors)
            }
            Self::Deductions(form) => {
                let mut errors = ValidationErrors::new();
                for (field, enrolled, amount) in [
                    ("health_amount", form.health_insurance, &form.health_amount),
                    ("dental_vision_amount", form.dental_vision, &form.dental_vision_amount),
                    ("retirement_amount", form.retirement_plan, &form.retirement_amount),
                    ("hsa_amount", form.hsa, &form.hsa_amount),
                ] {
                    let amount = amount.trim();
                    if enrolled && !amount.is_empty() && amount.parse::<f64>().is_err() {
                        errors.insert(field.to_string(), "Amount must be a number".to_string());
                    }
                }
                into_result(errors)
            }
            Self::EmergencyContact(form) => {
                let mut errors = ValidationErrors::new();
                let has_complete_contact = form.contacts.iter().any(|contact| {
                    !contact.name.trim().is_empty()
                        && !contact.relationship.trim().is_empty()
                        && !contact.phone.trim().is_empty()
                });
                if !has_complete_contact {
                    errors.insert(
                        "contacts".to_string(),
                        "At least one emergency contact with name, relationship and phone is required"
                            .to_string(),
                    );
                }
                if !form.acknowledgment {
                    errors.insert(
                        "acknowledgment".to_string(),
                        "Acknowledgment is required".to_string(),
                    );
                }
                into_result(errors)
            }
        }
    }

    /// Validates before building a completed update; incomplete drafts skip validation.
    pub fn to_update(&self, is_completed: bool) -> Result<SectionUpdate, SectionFormError> {
        if is_completed {
            self.validate().map_err(SectionFormError::Invalid)?;
        }
        Ok(SectionUpdate {
            section_index: self.section().index(),
            form_data: self.to_value().map_err(SectionFormError::Encode)?,
            is_completed,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SectionFormError {
    #[error("section has {} invalid field(s)", .0.len())]
    Invalid(ValidationErrors),
    #[error("unable to encode section: {0}")]
    Encode(#[from] serde_json::Error),
}

fn validate_personal_info(form: &PersonalInformation) -> Result<(), ValidationErrors> {
    let schema = required_schema(&[
        ("first_name", "First name is required"),
        ("last_name", "Last name is required"),
        ("phone", "Phone is required"),
        ("address", "Address is required"),
        ("city", "City is required"),
        ("state", "State is required"),
        ("date_of_birth", "Date of birth is required"),
    ])
    .field(
        "email",
        vec![
            ValidationRule::required("Email is required"),
            ValidationRule::email("Invalid email address"),
        ],
    );
    let schema = match ValidationRule::pattern(r"^\d{5}(-\d{4})?$", "Invalid ZIP code") {
        Ok(zip) => schema.field(
            "zip_code",
            vec![ValidationRule::required("ZIP code is required"), zip],
        ),
        Err(err) => return Err(rule_error("zip_code", err)),
    };

    check(
        &[
            ("first_name", &form.first_name),
            ("last_name", &form.last_name),
            ("email", &form.email),
            ("phone", &form.phone),
            ("address", &form.address),
            ("city", &form.city),
            ("state", &form.state),
            ("zip_code", &form.zip_code),
            ("date_of_birth", &form.date_of_birth),
        ],
        schema,
    )
}

fn validate_payment_method(form: &PaymentMethod) -> Result<(), ValidationErrors> {
    if form.payment_method == PaymentKind::PaperCheck {
        return Ok(());
    }
    let schema = required_schema(&[
        ("bank_name", "Bank name is required"),
        ("account_type", "Account type is required"),
        ("account_number", "Account number is required"),
    ]);
    let schema = match ValidationRule::pattern(r"^\d{9}$", "Routing number must be 9 digits") {
        Ok(routing) => schema.field(
            "routing_number",
            vec![
                ValidationRule::required("Routing number is required"),
                routing,
            ],
        ),
        Err(err) => return Err(rule_error("routing_number", err)),
    };

    check(
        &[
            ("bank_name", &form.bank_name),
            ("account_type", &form.account_type),
            ("account_number", &form.account_number),
            ("routing_number", &form.routing_number),
        ],
        schema,
    )
}

fn required_schema(fields: &[(&str, &str)]) -> ValidationSchema {
    fields
        .iter()
        .fold(ValidationSchema::new(), |schema, (field, message)| {
            schema.field(*field, vec![ValidationRule::required(*message)])
        })
}

fn check(values: &[(&str, &String)], schema: ValidationSchema) -> Result<(), ValidationErrors> {
    let data: BTreeMap<String, String> = values
        .iter()
        .map(|(field, value)| (field.to_string(), value.trim().to_string()))
        .collect();
    validate_form(&data, &schema)
}

fn rule_error(field: &str, err: regex::Error) -> ValidationErrors {
    ValidationErrors::from([(field.to_string(), format!("invalid rule: {err}"))])
}

fn into_result(errors: ValidationErrors) -> Result<(), ValidationErrors> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn paper_check_needs_no_bank_details() {
        let form = SectionForm::PaymentMethod(PaymentMethod::default());
        assert!(form.validate().is_ok());
    }

    #[test]
    fn direct_deposit_requires_nine_digit_routing_number() {
        let value = json!({
            "payment_method": "direct_deposit",
            "bank_name": "Old Second National Bank",
            "account_type": "Checking",
            "account_number": "000123456",
            "routing_number": "07190"
        });
        let form = SectionForm::from_value(OnboardingSection::PaymentMethod, value)
            .expect("decodes");
        let errors = form.validate().expect_err("short routing number");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors["routing_number"], "Routing number must be 9 digits");
    }

    #[test]
    fn personal_info_checks_email_and_zip() {
        let form = SectionForm::PersonalInfo(PersonalInformation {
            first_name: "Maria".to_string(),
            last_name: "Lopez".to_string(),
            email: "maria.lopez".to_string(),
            phone: "630-555-0100".to_string(),
            address: "12 Main St".to_string(),
            city: "Oswego".to_string(),
            state: "IL".to_string(),
            zip_code: "6054".to_string(),
            date_of_birth: "1990-04-12".to_string(),
            ..PersonalInformation::default()
        });
        let errors = form.validate().expect_err("invalid");
        assert_eq!(errors["email"], "Invalid email address");
        assert_eq!(errors["zip_code"], "Invalid ZIP code");
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn draft_updates_skip_validation() {
        let form = SectionForm::EmergencyContact(EmergencyContact::default());
        let draft = form.to_update(false).expect("drafts are accepted");
        assert_eq!(draft.section_index, 7);
        assert!(!draft.is_completed);

        let err = form.to_update(true).expect_err("incomplete contact");
        match err {
            SectionFormError::Invalid(errors) => {
                assert!(errors.contains_key("contacts"));
                assert!(errors.contains_key("acknowledgment"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn time_off_requires_every_acknowledgment() {
        let form = SectionForm::TimeOff(TimeOff {
            sick_days_understanding: true,
            vacation_days_understanding: true,
            ..TimeOff::default()
        });
        let errors = form.validate().expect_err("missing acknowledgment");
        assert_eq!(errors.keys().collect::<Vec<_>>(), vec!["holidays_understanding"]);
    }
}
