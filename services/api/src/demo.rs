use chrono::{Duration, Utc};
use clap::Args;
use std::sync::Arc;
use talentflow::clock::{Clock, FixedClock, SystemClock};
use talentflow::error::{AppError, TalentError};
use talentflow::seed::{fundamentals_assessment, seed_demo_data, SeedOptions, SeedReport};
use talentflow::session::SessionContext;
use talentflow::simulator::RequestSimulator;
use talentflow::store::{CandidateRepository, MemoryStore};
use talentflow::workflows::applications::{Application, ApplicationFilter, Stage};
use talentflow::workflows::assessments::{Answer, Answers, Assessment, QuestionKind};
use talentflow::workflows::jobs::{Job, JobQuery, NewJob, ReorderRequest};
use talentflow::workflows::TalentServices;

#[derive(Args, Debug)]
pub(crate) struct SeedArgs {
    /// Number of candidates to generate
    #[arg(long, default_value_t = 200)]
    pub(crate) candidates: usize,
    /// Seed for the deterministic generator
    #[arg(long)]
    pub(crate) rng_seed: Option<u64>,
    /// Print the first page of the seeded job board
    #[arg(long)]
    pub(crate) list_jobs: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Skip the job-board reorder portion of the demo
    #[arg(long)]
    pub(crate) skip_reorder: bool,
}

pub(crate) fn run_seed(args: SeedArgs) -> Result<(), AppError> {
    let SeedArgs {
        candidates,
        rng_seed,
        list_jobs,
    } = args;

    let defaults = SeedOptions::default();
    let options = SeedOptions {
        candidates,
        rng_seed: rng_seed.unwrap_or(defaults.rng_seed),
    };
    let store = Arc::new(MemoryStore::new());
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let report = seed_demo_data(store.as_ref(), clock.as_ref(), &options)?;
    render_seed_report(&report, options.rng_seed);

    if list_jobs {
        let services = TalentServices::with_seed(
            store,
            clock,
            Arc::new(RequestSimulator::disabled()),
            options,
        );
        let page = services.jobs.list(&JobQuery::default())?;
        println!("\nJob board (page 1 of {} jobs)", page.total);
        for job in &page.items {
            render_job(job);
        }
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let clock = Arc::new(FixedClock::new(Utc::now()));
    let store = Arc::new(MemoryStore::new());
    let services = TalentServices::new(
        store.clone(),
        clock.clone(),
        Arc::new(RequestSimulator::disabled()),
    );
    let opened = clock.now();

    println!("TalentFlow hiring demo");
    let job = services.jobs.create(NewJob {
        tags: ["rust", "backend"].iter().map(|tag| tag.to_string()).collect(),
        start_date: Some(opened - Duration::hours(1)),
        end_date: Some(opened + Duration::days(7)),
        assessment_date: Some(opened + Duration::days(1)),
        assessment_duration: Some(45),
        ..NewJob::titled("Backend Engineer")
    })?;
    println!("\nPosted job");
    render_job(&job);

    let assessment = services
        .assessments
        .replace(&job.id, fundamentals_assessment(job.id.clone()))?;
    println!(
        "Attached assessment with {} questions across {} sections",
        assessment.questions().count(),
        assessment.sections.len()
    );

    let applicants = [
        SessionContext::candidate("cand-ada", "Ada Byrne", "ada@example.com"),
        SessionContext::candidate("cand-lin", "Lin Osei", "lin@example.com"),
    ];
    println!("\nApplications");
    let mut applications = Vec::new();
    for session in &applicants {
        let application = services.applications.apply(session, &job.id)?;
        render_application(&application);
        applications.push(application);
    }

    println!("\nAssessment window opens");
    clock.set(opened + Duration::days(1) + Duration::minutes(5));
    let ada = &applications[0];
    let submission = services
        .assessments
        .submit(&job.id, &ada.candidate_id, answer_key(&assessment))?;
    println!(
        "  {}: attempted {} correct {} incorrect {} skipped {} marks {:.1}",
        ada.candidate_id,
        submission.score.attempted,
        submission.score.correct,
        submission.score.incorrect,
        submission.score.skipped,
        submission.score.marks
    );
    match services
        .assessments
        .submit(&job.id, &ada.candidate_id, Answers::new())
    {
        Ok(_) => println!("  second submission unexpectedly accepted"),
        Err(err) => println!("  second submission refused: {err}"),
    }

    clock.advance(Duration::hours(2));
    println!("\nAfter the assessment window closes");
    let swept = services
        .applications
        .list(&ApplicationFilter::for_job(job.id.clone()))?;
    for application in &swept {
        render_application(application);
    }

    println!("\nPipeline for {}", ada.candidate_name.as_deref().unwrap_or("candidate"));
    for stage in [Stage::Screen, Stage::Tech, Stage::Offer, Stage::Hired] {
        let moved = services.applications.transition(&ada.id, stage)?;
        println!("  moved to {}", moved.stage);
    }
    if let Err(err) = services.applications.transition(&ada.id, Stage::Screen) {
        println!("  move back to screen refused: {err}");
    }

    let timeline = store
        .timeline(&ada.candidate_id)
        .map_err(TalentError::from)?;
    println!("\nTimeline");
    for event in timeline {
        println!("  {} {}", event.at.format("%Y-%m-%d %H:%M"), event.event);
    }

    if !args.skip_reorder {
        run_reorder(&services)?;
    }
    Ok(())
}

fn run_reorder(services: &TalentServices<MemoryStore>) -> Result<(), AppError> {
    for title in ["Data Engineer", "Platform Engineer", "QA Analyst"] {
        services.jobs.create(NewJob::titled(title))?;
    }
    let board = services.jobs.list(&JobQuery::default())?;
    let Some(last) = board.items.last() else {
        return Ok(());
    };

    services
        .jobs
        .reorder(&last.id, ReorderRequest::new(last.order, 1)?)?;
    println!("\nJob board after moving '{}' to the top", last.title);
    for job in services.jobs.list(&JobQuery::default())?.items {
        render_job(&job);
    }
    Ok(())
}

/// Answers every keyed question correctly; unkeyed ones are left blank.
fn answer_key(assessment: &Assessment) -> Answers {
    assessment
        .questions()
        .filter_map(|question| {
            let answer = match &question.kind {
                QuestionKind::SingleChoice {
                    correct_option: Some(option),
                    ..
                } => Answer::Text(option.clone()),
                QuestionKind::MultiChoice {
                    correct_options: Some(options),
                    ..
                } => Answer::Choices(options.clone()),
                QuestionKind::Numeric {
                    correct_value: Some(value),
                    ..
                } => Answer::Number(*value),
                _ => return None,
            };
            Some((question.id.to_string(), answer))
        })
        .collect()
}

fn render_seed_report(report: &SeedReport, rng_seed: u64) {
    println!("Seeded demo data (rng seed {rng_seed:#x})");
    println!(
        "  jobs: {} ({} archived)",
        report.jobs, report.archived_jobs
    );
    println!("  candidates: {}", report.candidates);
    println!("  assessments: {}", report.assessments);
}

fn render_job(job: &Job) {
    println!(
        "  #{:<3} {:<40} {:<9} /{}",
        job.order,
        job.title,
        job.status.label(),
        job.slug
    );
}

fn render_application(application: &Application) {
    let marks = application
        .score
        .as_ref()
        .map(|score| format!("{:.1}", score.marks))
        .unwrap_or_else(|| "-".to_string());
    println!(
        "  {} {:<9} marks {}",
        application.candidate_id, application.stage, marks
    );
}
