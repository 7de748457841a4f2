use super::chart::chart_lines;
use super::ReportMetadata;
use crate::surveys::analysis::{
    DepartmentStats, OverviewStats, QuestionAnalysis, SurveyAnalysis,
};
use crate::surveys::domain::QuestionCategory;

pub(crate) const PAGE_BREAK: &str = "\u{0c}";
const RULE: &str = "================================================================";

const OVERVIEW_HEADING: &str = "OVERVIEW";
const TOTAL_RESPONSES: &str = "Total Responses:";
const DEPARTMENTS: &str = "Departments:";
const AVERAGE_SATISFACTION: &str = "Average Satisfaction:";
const AVERAGE_DISSATISFACTION: &str = "Average Dissatisfaction:";

pub(crate) fn render_pages(analysis: &SurveyAnalysis, metadata: &ReportMetadata) -> String {
    let mut pages = vec![title_page(metadata), overview_page(&analysis.overview)];
    pages.extend(analysis.departments.iter().map(department_page));
    pages.push(distribution_page(analysis));

    let page_count = pages.len();
    pages
        .into_iter()
        .enumerate()
        .map(|(index, body)| format!("{body}\n\n-- Page {} of {} --\n", index + 1, page_count))
        .collect::<Vec<_>>()
        .join(PAGE_BREAK)
}

fn title_page(metadata: &ReportMetadata) -> String {
    [
        RULE.to_string(),
        // Keeps a caller-supplied title on one line of the title page.
        metadata.title.replace(|c: char| c.is_control(), " "),
        "Survey Response Analysis".to_string(),
        format!("Generated on {}", metadata.generated_on.format("%Y-%m-%d")),
        RULE.to_string(),
    ]
    .join("\n")
}

fn overview_page(overview: &OverviewStats) -> String {
    let mut lines = vec![
        OVERVIEW_HEADING.to_string(),
        String::new(),
        format!("{TOTAL_RESPONSES} {}", overview.total_responses),
        format!("{DEPARTMENTS} {}", overview.department_count),
        format!(
            "{AVERAGE_SATISFACTION} {}%",
            overview.average_satisfaction_pct
        ),
        format!(
            "{AVERAGE_DISSATISFACTION} {}%",
            overview.average_dissatisfaction_pct
        ),
    ];
    if overview.total_responses == 0 {
        lines.push(String::new());
        lines.push("No survey responses were available for analysis.".to_string());
    }
    lines.join("\n")
}

fn department_page(department: &DepartmentStats) -> String {
    let mut lines = vec![
        format!("DEPARTMENT: {}", department.department),
        format!("Responses: {}", department.response_count),
        format!(
            "Satisfaction: {}%  Dissatisfaction: {}%",
            department.satisfaction_pct, department.dissatisfaction_pct
        ),
    ];

    for question in department.questions.values() {
        lines.push(String::new());
        lines.push(format!(
            "Q{}. {} [{}]",
            question.question_number,
            question.question,
            question.category.label()
        ));
        lines.extend(question_lines(question));
    }

    lines.join("\n")
}

fn question_lines(question: &QuestionAnalysis) -> Vec<String> {
    match question.category {
        QuestionCategory::Text => question
            .answer_counts
            .keys()
            .enumerate()
            .map(|(index, answer)| format!("  {}. {}", index + 1, answer))
            .collect(),
        QuestionCategory::Mcq | QuestionCategory::Checkbox => question
            .answer_counts
            .iter()
            .map(|(answer, count)| {
                format!(
                    "  - {}: {} ({}%)",
                    answer,
                    count,
                    question.share_pct(*count)
                )
            })
            .collect(),
        QuestionCategory::StarRating => {
            let mut lines: Vec<String> = question
                .star_distribution()
                .iter()
                .zip((1..=5).rev())
                .map(|(count, stars)| {
                    let unit = if stars == 1 { "star" } else { "stars" };
                    format!("  {stars} {unit}: {count}")
                })
                .collect();
            let average = question
                .average_rating()
                .map(|value| format!("{value:.1}"))
                .unwrap_or_else(|| "n/a".to_string());
            lines.push(format!("  Average rating: {average} / 5"));
            lines
        }
    }
}

fn distribution_page(analysis: &SurveyAnalysis) -> String {
    let mut lines = vec!["SATISFACTION DISTRIBUTION".to_string(), String::new()];
    lines.extend(chart_lines(&analysis.satisfaction_tally));
    lines.join("\n")
}

/// Recovers the overview numbers from a rendered document.
pub fn parse_overview(document: &[u8]) -> Option<OverviewStats> {
    let text = std::str::from_utf8(document).ok()?;
    let page = text
        .split(PAGE_BREAK)
        .find(|page| page.starts_with(OVERVIEW_HEADING))?;
    let value = |prefix: &str| -> Option<u64> {
        page.lines()
            .find_map(|line| line.trim().strip_prefix(prefix))
            .map(|rest| rest.trim().trim_end_matches('%'))
            .and_then(|number| number.parse().ok())
    };

    Some(OverviewStats {
        total_responses: value(TOTAL_RESPONSES)? as usize,
        department_count: value(DEPARTMENTS)? as usize,
        average_satisfaction_pct: value(AVERAGE_SATISFACTION)? as u32,
        average_dissatisfaction_pct: value(AVERAGE_DISSATISFACTION)? as u32,
    })
}
