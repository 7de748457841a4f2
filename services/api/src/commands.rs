use crate::infra::{parse_date, parse_policy};
use chrono::{Local, NaiveDate};
use clap::Args;
use std::path::PathBuf;
use survey_insights::config::AppConfig;
use survey_insights::error::AppError;
use survey_insights::surveys::{
    analyze, render, CategoryPolicy, QuestionCategory, ReportMetadata, SurveyAnalysis,
    SurveyResponseImporter,
};
use survey_insights::telemetry;

#[derive(Args, Debug)]
pub(crate) struct SurveyAnalyzeArgs {
    /// Survey response export (CSV with Department / Question N / Answer N columns)
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// How a question's category is settled: first-answer or every-answer
    #[arg(long, value_parser = parse_policy)]
    pub(crate) policy: Option<CategoryPolicy>,
    /// Emit the full analysis as JSON instead of a text summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct SurveyReportArgs {
    /// Survey response export (CSV with Department / Question N / Answer N columns)
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Directory the report is written to (defaults to REPORT_OUTPUT_DIR)
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    /// Title printed on the first page (defaults to REPORT_TITLE)
    #[arg(long)]
    pub(crate) title: Option<String>,
    /// Report date (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) date: Option<NaiveDate>,
    /// How a question's category is settled: first-answer or every-answer
    #[arg(long, value_parser = parse_policy)]
    pub(crate) policy: Option<CategoryPolicy>,
}

pub(crate) fn run_survey_analyze(args: SurveyAnalyzeArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let policy = args.policy.unwrap_or(config.analysis.category_policy);
    let rows = SurveyResponseImporter::from_path(&args.csv)?;
    let analysis = analyze(&rows, policy)?;

    if args.json {
        let body = serde_json::to_string_pretty(&analysis)
            .map_err(|err| AppError::Io(std::io::Error::other(err)))?;
        println!("{body}");
    } else {
        print_summary(&analysis);
    }

    Ok(())
}

pub(crate) fn run_survey_report(args: SurveyReportArgs) -> Result<(), AppError> {
    let SurveyReportArgs {
        csv,
        output,
        title,
        date,
        policy,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let policy = policy.unwrap_or(config.analysis.category_policy);
    let rows = SurveyResponseImporter::from_path(&csv)?;
    let analysis = analyze(&rows, policy)?;

    let metadata = ReportMetadata::new(
        title.unwrap_or(config.report.title),
        date.unwrap_or_else(|| Local::now().date_naive()),
    );
    let destination = output.unwrap_or(config.report.output_dir);
    let path = render(&analysis, &metadata, &destination)?;

    println!("Report written to {}", path.display());
    print_overview(&analysis);
    Ok(())
}

fn print_overview(analysis: &SurveyAnalysis) {
    let overview = &analysis.overview;
    println!(
        "Responses: {} across {} department(s)",
        overview.total_responses, overview.department_count
    );
    println!(
        "Average satisfaction {}%, dissatisfaction {}%",
        overview.average_satisfaction_pct, overview.average_dissatisfaction_pct
    );
    if !analysis.warnings.is_empty() {
        println!("Skipped {} incomplete answer(s)", analysis.warnings.len());
    }
}

fn print_summary(analysis: &SurveyAnalysis) {
    println!("Survey analysis ({} policy)", analysis.category_policy.label());
    print_overview(analysis);

    for department in &analysis.departments {
        println!(
            "\n{}: {} response(s), {}% satisfied, {}% dissatisfied",
            department.department,
            department.response_count,
            department.satisfaction_pct,
            department.dissatisfaction_pct
        );
        for question in department.questions.values() {
            let detail = match question.category {
                QuestionCategory::StarRating => question
                    .average_rating()
                    .map(|rating| format!("average {rating:.1} stars"))
                    .unwrap_or_else(|| "no star ratings".to_string()),
                _ => format!("{} distinct answer(s)", question.answer_counts.len()),
            };
            println!(
                "- Q{} {} [{}]: {}",
                question.question_number,
                question.question,
                question.category.label(),
                detail
            );
        }
    }

    let tally = &analysis.satisfaction_tally;
    if !tally.is_empty() {
        println!("\nSatisfaction distribution");
        for slice in survey_insights::surveys::report::pie_slices(tally) {
            println!(
                "- {}: {} ({:.1}%)",
                slice.label.label(),
                slice.count,
                slice.percentage
            );
        }
    }
}
