use crate::infra::{
    parse_certification, parse_field, parse_offer_dates, parse_offer_status,
    parse_onboarding_status, parse_stage_filter, Connected, SourceArgs,
};
use chrono::NaiveDate;
use clap::Args;
use hiring_desk::client::HiringBackend;
use hiring_desk::error::AppError;
use hiring_desk::hiring::applications::{ApplicantFilter, CertificationFilter, StageFilter};
use hiring_desk::hiring::offers::{Offer, OfferDateFilter, OfferFilter, OfferStats, OfferStatus};
use hiring_desk::hiring::positions::PositionStats;
use hiring_desk::onboarding::{CandidateFilter, OnboardingStatus, SECTION_COUNT};
use hiring_desk::stores::{
    ApplicationsStore, OfferTemplatesStore, OffersStore, OnboardingStore, PositionsStore,
};
use hiring_desk::views::{ApplicantsPage, OnboardingDashboard, PositionsOverview};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Runs a report against whichever backend `source` selects and prints it.
macro_rules! print_report {
    ($source:expr, |$backend:ident| $report:expr) => {{
        let output = match $source.connect()? {
            Connected::Remote($backend) => $report.await?,
            Connected::Local($backend) => $report.await?,
        };
        println!("{output}");
        Ok(())
    }};
}

#[derive(Args, Debug, Default)]
pub(crate) struct ApplicantsArgs {
    /// Only list applications for this position id
    #[arg(long)]
    pub(crate) position: Option<String>,
    /// Match name, current role or position title
    #[arg(long, default_value = "")]
    pub(crate) search: String,
    /// Stage label, or `all`
    #[arg(long, value_parser = parse_stage_filter, default_value = "all")]
    pub(crate) stage: StageFilter,
    /// all, certified or pending
    #[arg(long, value_parser = parse_certification, default_value = "all")]
    pub(crate) certification: CertificationFilter,
    /// Only show applicants for this requisition id
    #[arg(long)]
    pub(crate) req_id: Option<String>,
    #[command(flatten)]
    pub(crate) source: SourceArgs,
}

#[derive(Args, Debug, Default)]
pub(crate) struct PositionsArgs {
    /// Only show positions at this worksite
    #[arg(long)]
    pub(crate) worksite: Option<String>,
    /// Append the district-wide pipeline counters
    #[arg(long)]
    pub(crate) stats: bool,
    #[command(flatten)]
    pub(crate) source: SourceArgs,
}

#[derive(Args, Debug, Default)]
pub(crate) struct OffersArgs {
    /// Match candidate name, email, position title or worksite
    #[arg(long, default_value = "")]
    pub(crate) search: String,
    #[arg(long, value_parser = parse_offer_status)]
    pub(crate) status: Option<OfferStatus>,
    #[arg(long)]
    pub(crate) worksite: Option<String>,
    #[arg(long)]
    pub(crate) position_title: Option<String>,
    /// all, this_week, this_month, last_30_days or expiring_soon
    #[arg(long, value_parser = parse_offer_dates, default_value = "all")]
    pub(crate) dates: OfferDateFilter,
    /// List pending offers expiring within this many days instead
    #[arg(long)]
    pub(crate) expiring: Option<i64>,
    #[command(flatten)]
    pub(crate) source: SourceArgs,
}

#[derive(Args, Debug, Default)]
pub(crate) struct OnboardingArgs {
    /// Match name, email or position
    #[arg(long, default_value = "")]
    pub(crate) search: String,
    #[arg(long, value_parser = parse_onboarding_status)]
    pub(crate) status: Option<OnboardingStatus>,
    #[command(flatten)]
    pub(crate) source: SourceArgs,
}

#[derive(Args, Debug, Default)]
pub(crate) struct TemplatePreviewArgs {
    /// Template id (defaults to the active template)
    #[arg(long)]
    pub(crate) id: Option<String>,
    /// Placeholder value as FIELD=VALUE; repeatable
    #[arg(long = "set", value_parser = parse_field)]
    pub(crate) fields: Vec<(String, String)>,
    #[command(flatten)]
    pub(crate) source: SourceArgs,
}

pub(crate) async fn run_applicants(args: ApplicantsArgs) -> Result<(), AppError> {
    print_report!(args.source, |backend| applicants_report(backend, &args))
}

pub(crate) async fn run_positions(args: PositionsArgs) -> Result<(), AppError> {
    print_report!(args.source, |backend| positions_report(backend, &args))
}

pub(crate) async fn run_offers(args: OffersArgs) -> Result<(), AppError> {
    let today = args.source.today();
    print_report!(args.source, |backend| offers_report(backend, &args, today))
}

pub(crate) async fn run_onboarding(args: OnboardingArgs) -> Result<(), AppError> {
    print_report!(args.source, |backend| onboarding_report(backend, &args))
}

pub(crate) async fn run_template_preview(args: TemplatePreviewArgs) -> Result<(), AppError> {
    print_report!(args.source, |backend| template_preview(backend, &args))
}

pub(crate) async fn applicants_report<B: HiringBackend>(
    backend: Arc<B>,
    args: &ApplicantsArgs,
) -> Result<String, AppError> {
    let mut positions = PositionsStore::new(backend.clone());
    positions.fetch().await?;

    let mut applications = match &args.position {
        Some(position) => ApplicationsStore::for_position(backend, position.clone()),
        None => ApplicationsStore::new(backend),
    };
    applications.fetch().await?;

    let context_req_id = args
        .position
        .as_deref()
        .and_then(|id| positions.state.get(id))
        .map(|position| position.req_id.clone());
    let filter = ApplicantFilter {
        search: args.search.clone(),
        stage: args.stage,
        certification: args.certification,
        position_req_id: args.req_id.clone(),
        context_req_id: context_req_id.clone(),
    };
    let applicants = applications.applicants(positions.items());
    let page = ApplicantsPage::build(&applicants, &filter, context_req_id.as_deref());
    Ok(render_applicants(&page))
}

pub(crate) fn render_applicants(page: &ApplicantsPage) -> String {
    let mut lines = vec![page.summary.clone()];
    for row in &page.rows {
        let applicant = &row.applicant;
        lines.push(format!(
            "- {} <{}> | {} {}",
            applicant.name, applicant.email, applicant.position_req_id, applicant.position_title
        ));
        let mut status = format!(
            "    {} [{:?}] | {} | {} | next: {}",
            applicant.stage,
            row.stage_badge,
            row.certification_label,
            row.interview_progress,
            row.action.label
        );
        if row.can_send_offer {
            status.push_str(" | offer ready");
        }
        lines.push(status);
    }
    if page.rows.is_empty() {
        lines.push("No applicants match the current filters.".to_string());
    }
    lines.join("\n")
}

pub(crate) async fn positions_report<B: HiringBackend>(
    backend: Arc<B>,
    args: &PositionsArgs,
) -> Result<String, AppError> {
    let mut positions = PositionsStore::new(backend);
    positions.fetch().await?;
    let overview = PositionsOverview::build(positions.items(), args.worksite.as_deref());

    let mut output = render_positions(&overview);
    if args.stats {
        let stats = positions.fetch_stats().await?;
        output.push('\n');
        output.push_str(&render_position_stats(&stats));
    }
    Ok(output)
}

pub(crate) fn render_positions(overview: &PositionsOverview) -> String {
    let metrics = overview.metrics;
    let mut lines = vec![
        format!(
            "Open positions: {} | Applicants: {} | Interviews scheduled: {}",
            metrics.open_positions, metrics.total_applicants, metrics.interviews_scheduled
        ),
        format!(
            "Worksite: {} (available: {})",
            overview.worksite.as_deref().unwrap_or("All"),
            overview.worksites.join(", ")
        ),
    ];
    for position in &overview.positions {
        lines.push(format!(
            "- {} {} ({}) | {} | FTE {} | {} applicants | {} interviews | {} stages",
            position.req_id,
            position.title,
            position.worksite,
            position.status,
            position.fte,
            position.applicant_count,
            position.interview_count,
            position.interview_stage_count()
        ));
    }
    lines.join("\n")
}

pub(crate) fn render_position_stats(stats: &PositionStats) -> String {
    format!(
        "Pipeline: {} positions ({} open, {} draft, {} closed) | {} applications ({} this month) | offers: {} pending, {} accepted",
        stats.total_positions,
        stats.open_positions,
        stats.draft_positions,
        stats.closed_positions,
        stats.total_applications,
        stats.applications_this_month,
        stats.pending_offers,
        stats.accepted_offers
    )
}

pub(crate) async fn offers_report<B: HiringBackend>(
    backend: Arc<B>,
    args: &OffersArgs,
    today: NaiveDate,
) -> Result<String, AppError> {
    let mut offers = OffersStore::new(backend);

    if let Some(days) = args.expiring {
        let expiring = offers.fetch_expiring(days).await?;
        let mut lines = vec![format!(
            "{} pending offers expire within {days} days",
            expiring.len()
        )];
        lines.extend(expiring.iter().map(|offer| offer_line(offer, today)));
        return Ok(lines.join("\n"));
    }

    offers.fetch().await?;
    let filter = OfferFilter {
        search: args.search.clone(),
        status: args.status,
        worksite: args.worksite.clone(),
        position_title: args.position_title.clone(),
        date: args.dates,
    };
    let visible = filter.apply(offers.items(), today);
    Ok(render_offers(
        &OfferStats::from_offers(offers.items()),
        &visible,
        today,
    ))
}

pub(crate) fn render_offers(stats: &OfferStats, offers: &[&Offer], today: NaiveDate) -> String {
    let mut lines = vec![format!(
        "Offers: {} total | {} pending | {} accepted | {} declined | {} expired",
        stats.total_offers, stats.pending, stats.accepted, stats.declined, stats.expired
    )];
    lines.extend(offers.iter().map(|offer| offer_line(offer, today)));
    if offers.is_empty() {
        lines.push("No offers match the current filters.".to_string());
    }
    lines.join("\n")
}

fn offer_line(offer: &Offer, today: NaiveDate) -> String {
    let mut line = format!(
        "- {} | {} ({}) | ${:.0} | {}",
        offer.candidate_name, offer.position_title, offer.worksite, offer.salary, offer.status
    );
    match offer.status {
        OfferStatus::Pending => line.push_str(&format!(
            " | expires {} ({} days)",
            offer.expiration_date,
            offer.days_until_expiration(today)
        )),
        OfferStatus::Accepted => {
            if let Some(accepted) = offer.accepted_date {
                line.push_str(&format!(" | accepted {accepted}"));
            }
        }
        OfferStatus::Declined => {
            if let Some(reason) = offer.declined_reason.as_deref().filter(|r| !r.is_empty()) {
                line.push_str(&format!(" | reason: {reason}"));
            }
        }
        OfferStatus::Expired | OfferStatus::Withdrawn => {}
    }
    line
}

pub(crate) async fn onboarding_report<B: HiringBackend>(
    backend: Arc<B>,
    args: &OnboardingArgs,
) -> Result<String, AppError> {
    let mut candidates = OnboardingStore::new(backend);
    candidates.fetch().await?;
    let filter = CandidateFilter {
        search: args.search.clone(),
        status: args.status,
    };
    Ok(render_onboarding(&OnboardingDashboard::build(
        candidates.items(),
        &filter,
    )))
}

pub(crate) fn render_onboarding(dashboard: &OnboardingDashboard) -> String {
    let totals = dashboard.totals;
    let mut lines = vec![format!(
        "Candidates: {} | not started {} | in progress {} | completed {} | submitted {} | completion rate {:.0}%",
        totals.total_candidates,
        totals.not_started,
        totals.in_progress,
        totals.completed,
        totals.submitted,
        totals.completion_rate
    )];
    for row in &dashboard.rows {
        lines.push(format!(
            "- {} <{}> | {} | {} | {}/{} sections ({}%)",
            row.name,
            row.email,
            row.position,
            row.status,
            row.completed_sections,
            SECTION_COUNT,
            row.progress_percentage
        ));
    }
    lines.join("\n")
}

pub(crate) async fn template_preview<B: HiringBackend>(
    backend: Arc<B>,
    args: &TemplatePreviewArgs,
) -> Result<String, AppError> {
    let mut templates = OfferTemplatesStore::new(backend);
    let template = match &args.id {
        Some(id) => {
            templates.fetch().await?;
            templates.state.get(id).cloned()
        }
        None => templates.fetch_active().await?.cloned(),
    };
    let Some(template) = template else {
        return Ok(match &args.id {
            Some(id) => format!("Offer template {id} not found"),
            None => "No active template found".to_string(),
        });
    };

    let data: BTreeMap<String, String> = args.fields.iter().cloned().collect();
    let preview = templates.preview(&template.id, &data).await?;
    let unfilled: Vec<String> = template
        .fields()
        .into_iter()
        .filter(|field| !data.contains_key(field))
        .collect();

    let mut lines = vec![template.name.clone()];
    if !unfilled.is_empty() {
        lines.push(format!("Unfilled fields: {}", unfilled.join(", ")));
    }
    lines.push(String::new());
    lines.push(preview);
    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hiring_desk::backend::MemoryBackend;
    use hiring_desk::hiring::applications::ApplicationStage;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 10).expect("valid date")
    }

    fn backend() -> Arc<MemoryBackend> {
        Arc::new(MemoryBackend::seeded(today()))
    }

    #[tokio::test]
    async fn applicants_for_a_position_carry_its_req_id() {
        let args = ApplicantsArgs {
            position: Some("pos-1".to_string()),
            ..ApplicantsArgs::default()
        };
        let output = applicants_report(backend(), &args).await.expect("report");
        let mut lines = output.lines();
        assert_eq!(lines.next(), Some("REQ-2025-0193 • 5 of 5 applications"));
        assert!(output.contains("Amanda Rodriguez"));
        assert!(output.contains("Interviews: 2/3"));
        assert!(!output.contains("Emily Martinez"));
    }

    #[tokio::test]
    async fn applicant_filters_narrow_the_rows() {
        let args = ApplicantsArgs {
            stage: StageFilter::Only(ApplicationStage::Offer),
            ..ApplicantsArgs::default()
        };
        let output = applicants_report(backend(), &args).await.expect("report");
        assert!(output.starts_with("2 of 8 applications"));
        assert!(output.contains("Jennifer Williams"));
        assert!(output.contains("Lisa Anderson"));

        let args = ApplicantsArgs {
            certification: CertificationFilter::Pending,
            ..ApplicantsArgs::default()
        };
        let output = applicants_report(backend(), &args).await.expect("report");
        assert!(output.starts_with("1 of 8 applications"));
        assert!(output.contains("Pending License"));

        let args = ApplicantsArgs {
            search: "nobody".to_string(),
            ..ApplicantsArgs::default()
        };
        let output = applicants_report(backend(), &args).await.expect("report");
        assert!(output.contains("No applicants match"));
    }

    #[tokio::test]
    async fn positions_report_follows_worksite_filter() {
        let args = PositionsArgs::default();
        let output = positions_report(backend(), &args).await.expect("report");
        assert!(output.starts_with("Open positions: 3 | Applicants: 8 | Interviews scheduled: 3"));

        let args = PositionsArgs {
            worksite: Some("Washington Middle School".to_string()),
            stats: true,
            ..PositionsArgs::default()
        };
        let output = positions_report(backend(), &args).await.expect("report");
        assert!(output.starts_with("Open positions: 1 | Applicants: 1 | Interviews scheduled: 1"));
        assert!(output.contains("REQ-2025-0201 Middle School Band Director"));
        assert!(!output.contains("REQ-2025-0193"));
        assert!(output.contains("Pipeline: 4 positions (3 open, 1 draft, 0 closed)"));
    }

    #[tokio::test]
    async fn oversized_expiring_window_is_an_error_not_a_crash() {
        let backend = backend();
        let args = OffersArgs {
            expiring: Some(10_000_000_000_000),
            ..OffersArgs::default()
        };
        let err = offers_report(backend.clone(), &args, today())
            .await
            .expect_err("window overflows");
        assert!(err.to_string().contains("out of range"));

        let output = offers_report(backend, &OffersArgs::default(), today())
            .await
            .expect("backend still usable");
        assert!(output.starts_with("Offers: 2 total | 2 pending"));
    }

    #[tokio::test]
    async fn offers_report_lists_pending_with_days_left() {
        let args = OffersArgs::default();
        let output = offers_report(backend(), &args, today()).await.expect("report");
        assert!(output.starts_with("Offers: 2 total | 2 pending"));
        assert!(output.contains("Jennifer Williams"));
        assert!(output.contains("(5 days)"));

        let args = OffersArgs {
            expiring: Some(7),
            ..OffersArgs::default()
        };
        let output = offers_report(backend(), &args, today()).await.expect("report");
        assert!(output.starts_with("1 pending offers expire within 7 days"));
        assert!(!output.contains("Lisa Anderson"));

        let args = OffersArgs {
            status: Some(OfferStatus::Declined),
            ..OffersArgs::default()
        };
        let output = offers_report(backend(), &args, today()).await.expect("report");
        assert!(output.contains("No offers match"));
    }

    #[tokio::test]
    async fn onboarding_report_shows_progress() {
        let args = OnboardingArgs::default();
        let output = onboarding_report(backend(), &args).await.expect("report");
        assert!(output.starts_with("Candidates: 3 | not started 1 | in progress 1"));
        assert!(output.contains(
            "Marcus Bell <marcus.bell@email.com> | School Counselor | In Progress | 3/8 sections (37%)"
        ));

        let args = OnboardingArgs {
            status: Some(OnboardingStatus::Submitted),
            ..OnboardingArgs::default()
        };
        let output = onboarding_report(backend(), &args).await.expect("report");
        assert!(output.contains("Priya Natarajan"));
        assert!(!output.contains("Karen Whitfield"));
    }

    #[tokio::test]
    async fn template_preview_fills_given_fields() {
        let args = TemplatePreviewArgs {
            fields: vec![("candidateName".to_string(), "Amanda Rodriguez".to_string())],
            ..TemplatePreviewArgs::default()
        };
        let output = template_preview(backend(), &args).await.expect("preview");
        assert!(output.starts_with("Default Offer Template"));
        assert!(output.contains("Amanda Rodriguez"));
        assert!(output.contains("Unfilled fields:"));
        assert!(!output.contains("{{candidateName}}"));

        let args = TemplatePreviewArgs {
            id: Some("tpl-missing".to_string()),
            ..TemplatePreviewArgs::default()
        };
        let output = template_preview(backend(), &args).await.expect("preview");
        assert_eq!(output, "Offer template tpl-missing not found");
    }
}
