use crate::infra::{in_memory_services, parse_date};
use chrono::{Duration, NaiveDate, Utc};
use clap::Args;
use jobtrail::config::AppConfig;
use jobtrail::error::AppError;
use jobtrail::tracking::{
    AccountId, ApplicationRequest, ApplicationView, InMemoryTrackingStore, InterviewRoundRequest,
    LoginRequest, PageRequest, RegisterRequest, TrackingServices,
};

const DEMO_PASSWORD: &str = "Dem0!Passw0rd";

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Email used for the demo account.
    #[arg(long, default_value = "demo@jobtrail.local")]
    pub(crate) email: String,
    /// Applied date of the first application (YYYY-MM-DD). Defaults to 21 days ago.
    #[arg(long, value_parser = parse_date)]
    pub(crate) applied_date: Option<NaiveDate>,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let services = in_memory_services(&config.auth);

    let today = Utc::now().date_naive();
    let first_applied = args
        .applied_date
        .unwrap_or_else(|| today - Duration::days(21))
        .min(today);

    println!("Job tracking demo");
    let account = services.identity.register(RegisterRequest {
        email: args.email.clone(),
        password: DEMO_PASSWORD.to_string(),
        confirm_password: DEMO_PASSWORD.to_string(),
    })?;
    println!(
        "  Registered {} (account {}, role {})",
        account.email,
        account.id,
        account.role.label()
    );

    let identity = services.identity.login(LoginRequest {
        email: args.email,
        password: DEMO_PASSWORD.to_string(),
    })?;
    let issued = services.tokens.issue(&identity)?;
    let verified = services.tokens.verify(&issued.token)?;
    println!(
        "  Bearer token issued, expires {} (resolves to account {})",
        issued.expires_at, verified.account_id
    );

    let owner = identity.account_id;
    let pipeline = [
        ("Acme", "Backend Engineer", "APPLIED", first_applied),
        ("Globex", "Platform Engineer", "INTERVIEWING", first_applied + Duration::days(2)),
        ("Initech", "Site Reliability Engineer", "REJECTED", first_applied + Duration::days(4)),
    ];
    let mut created = Vec::with_capacity(pipeline.len());
    for (company, role, status, applied) in pipeline {
        created.push(services.applications.create(
            ApplicationRequest {
                company_name: company.to_string(),
                job_role: role.to_string(),
                status: status.to_string(),
                applied_date: applied.min(today),
            },
            owner,
        )?);
    }

    let globex = &created[1];
    for (round_type, offset, result) in [("PHONE", 1, "PASSED"), ("TECHNICAL", 5, "PENDING")] {
        services.interviews.add(
            globex.id,
            InterviewRoundRequest {
                round_type: round_type.to_string(),
                interview_date: globex.applied_date + Duration::days(offset),
                notes: Some(format!("{round_type} round with {}", globex.company_name)),
                result: result.to_string(),
            },
            owner,
        )?;
    }

    match services.interviews.add(
        globex.id,
        InterviewRoundRequest {
            round_type: "HR".to_string(),
            interview_date: globex.applied_date - Duration::days(1),
            notes: None,
            result: "PENDING".to_string(),
        },
        owner,
    ) {
        Ok(_) => println!("  Unexpected: backdated round accepted"),
        Err(err) => println!("  Backdated round rejected: {err}"),
    }

    let acme = &created[0];
    services.applications.update(
        acme.id,
        ApplicationRequest {
            company_name: acme.company_name.clone(),
            job_role: acme.job_role.clone(),
            status: "OFFERED".to_string(),
            applied_date: acme.applied_date,
        },
        owner,
    )?;

    print_applications(&services, owner)?;

    println!("\nInterview rounds for {}", globex.company_name);
    for round in services.interviews.list_by_application(globex.id, owner)? {
        println!(
            "  #{} {} on {} -> {}",
            round.id,
            round.round_type.label(),
            round.interview_date,
            round.result.label()
        );
    }

    let stats = services.dashboard.dashboard(owner)?;
    println!("\nDashboard");
    println!("  Total: {}", stats.total_applications);
    println!(
        "  Applied {} | Interviewing {} | Offered {} | Rejected {}",
        stats.applied_count, stats.interviewing_count, stats.offered_count, stats.rejected_count
    );

    let outsider = services.identity.register(RegisterRequest {
        email: "outsider@jobtrail.local".to_string(),
        password: DEMO_PASSWORD.to_string(),
        confirm_password: DEMO_PASSWORD.to_string(),
    })?;
    match services.applications.get(acme.id, outsider.id) {
        Ok(_) => println!("\nUnexpected: another account read application {}", acme.id),
        Err(err) => println!("\nOther accounts are refused: {err}"),
    }

    Ok(())
}

fn print_applications(
    services: &TrackingServices<InMemoryTrackingStore>,
    owner: AccountId,
) -> Result<(), AppError> {
    let page = services.applications.list(owner, PageRequest::default())?;
    println!(
        "\nApplications (page {} of {}, {} total)",
        page.page + 1,
        page.total_pages.max(1),
        page.total_elements
    );
    for ApplicationView {
        id,
        company_name,
        job_role,
        status,
        applied_date,
        ..
    } in page.content
    {
        println!(
            "  #{id} {company_name} / {job_role} applied {applied_date} [{}]",
            status.label()
        );
    }
    Ok(())
}
