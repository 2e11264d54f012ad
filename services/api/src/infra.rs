use chrono::{Local, NaiveDate};
use clap::Args;
use hiring_desk::backend::MemoryBackend;
use hiring_desk::client::HttpBackend;
use hiring_desk::config::AppConfig;
use hiring_desk::error::AppError;
use hiring_desk::hiring::applications::{ApplicationStage, CertificationFilter, StageFilter};
use hiring_desk::hiring::offers::{OfferDateFilter, OfferStatus};
use hiring_desk::onboarding::OnboardingStatus;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Where the read-only CLI commands get their data from.
#[derive(Args, Debug, Default, Clone)]
pub(crate) struct SourceArgs {
    /// Answer from the seeded in-process backend instead of HIRING_API_URL
    #[arg(long)]
    pub(crate) local: bool,
    /// Override the reporting date (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) enum Connected {
    Remote(Arc<HttpBackend>),
    Local(Arc<MemoryBackend>),
}

impl SourceArgs {
    pub(crate) fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    pub(crate) fn connect(&self) -> Result<Connected, AppError> {
        if self.local {
            return Ok(Connected::Local(Arc::new(MemoryBackend::seeded(self.today()))));
        }
        let config = AppConfig::load()?;
        let backend = HttpBackend::new(&config.api)?;
        tracing::debug!(base_url = backend.base_url(), "using remote hiring api");
        Ok(Connected::Remote(Arc::new(backend)))
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_stage(raw: &str) -> Result<ApplicationStage, String> {
    ApplicationStage::parse(raw).ok_or_else(|| {
        let labels: Vec<&str> = ApplicationStage::all()
            .into_iter()
            .map(ApplicationStage::label)
            .collect();
        format!("unknown stage '{raw}' (expected one of: {})", labels.join(", "))
    })
}

pub(crate) fn parse_stage_filter(raw: &str) -> Result<StageFilter, String> {
    StageFilter::parse(raw).ok_or_else(|| format!("unknown stage filter '{raw}'"))
}

pub(crate) fn parse_certification(raw: &str) -> Result<CertificationFilter, String> {
    CertificationFilter::parse(raw)
        .ok_or_else(|| format!("'{raw}' must be one of: all, certified, pending"))
}

pub(crate) fn parse_offer_status(raw: &str) -> Result<OfferStatus, String> {
    OfferStatus::parse(raw).ok_or_else(|| format!("unknown offer status '{raw}'"))
}

pub(crate) fn parse_offer_dates(raw: &str) -> Result<OfferDateFilter, String> {
    OfferDateFilter::parse(raw).ok_or_else(|| {
        format!("'{raw}' must be one of: all, this_week, this_month, last_30_days, expiring_soon")
    })
}

pub(crate) fn parse_onboarding_status(raw: &str) -> Result<OnboardingStatus, String> {
    OnboardingStatus::parse(raw).ok_or_else(|| {
        format!("'{raw}' must be one of: not_started, in_progress, completed, submitted")
    })
}

/// `key=value` pair used to fill template placeholders from the command line.
pub(crate) fn parse_field(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected FIELD=VALUE, got '{raw}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_dates_only() {
        assert_eq!(
            parse_date(" 2025-06-10 "),
            Ok(NaiveDate::from_ymd_opt(2025, 6, 10).expect("valid date"))
        );
        assert!(parse_date("06/10/2025").is_err());
    }

    #[test]
    fn stage_labels_parse_case_insensitively() {
        assert_eq!(parse_stage("reference check"), Ok(ApplicationStage::ReferenceCheck));
        let err = parse_stage("Hired").expect_err("unknown stage");
        assert!(err.contains("Application Review"));
        assert_eq!(parse_stage_filter("all"), Ok(StageFilter::All));
    }

    #[test]
    fn template_fields_split_on_first_equals() {
        assert_eq!(
            parse_field("salary=64,000"),
            Ok(("salary".to_string(), "64,000".to_string()))
        );
        assert_eq!(
            parse_field("note=a=b"),
            Ok(("note".to_string(), "a=b".to_string()))
        );
        assert!(parse_field("=oops").is_err());
        assert!(parse_field("salary").is_err());
    }
}
