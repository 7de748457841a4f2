//! Folds response rows into per-department, per-question statistics.
//!
//! [`AnalysisBuilder`] owns every accumulator for a single run. Rows are pushed
//! one at a time (so callers may stream them) and [`AnalysisBuilder::finalize`]
//! computes the rounded percentages and the satisfaction tally exactly once.

use super::classifier::{checkbox_options, classify, is_placeholder, star_count};
use super::domain::{
    AnalysisError, CategoryPolicy, PartialDataWarning, QuestionCategory, ResponseRow,
    SatisfactionLabel,
};
use super::scoring::{score, SatisfactionAccumulator};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

#[derive(Debug, Clone, Serialize)]
pub struct QuestionAnalysis {
    pub question_number: usize,
    pub question: String,
    pub category: QuestionCategory,
    pub answer_counts: BTreeMap<String, usize>,
    pub response_count: usize,
    #[serde(skip)]
    category_settled: bool,
    /// Whole answers as submitted; split into options at finalize time once
    /// the category is final.
    #[serde(skip)]
    submitted: BTreeMap<String, usize>,
}

impl QuestionAnalysis {
    fn new(question_number: usize, question: &str, first_answer: &str) -> Self {
        Self {
            question_number,
            question: question.to_string(),
            category: classify(first_answer),
            answer_counts: BTreeMap::new(),
            response_count: 0,
            category_settled: !is_placeholder(first_answer),
            submitted: BTreeMap::new(),
        }
    }

    /// Applies the category policy for one answer and returns the category
    /// the answer is scored under.
    fn observe(&mut self, answer: &str, policy: CategoryPolicy) -> QuestionCategory {
        match policy {
            CategoryPolicy::EveryAnswer => {
                self.category = classify(answer);
            }
            CategoryPolicy::FirstAnswer => {
                if !self.category_settled && !is_placeholder(answer) {
                    self.category = classify(answer);
                    self.category_settled = true;
                } else if self.category == QuestionCategory::Text
                    && classify(answer) == QuestionCategory::Checkbox
                {
                    // A single pick reads as text until a multi-select arrives.
                    self.category = QuestionCategory::Checkbox;
                }
            }
        }
        self.category
    }

    fn tally(&mut self, answer: &str) {
        self.response_count += 1;
        *self
            .submitted
            .entry(answer.trim().to_string())
            .or_default() += 1;
    }

    /// Builds `answer_counts` under the final category: checkbox answers are
    /// split into options, everything else is counted whole.
    fn finish(mut self) -> Self {
        let submitted = std::mem::take(&mut self.submitted);
        self.answer_counts = match self.category {
            QuestionCategory::Checkbox => {
                let mut counts: BTreeMap<String, usize> = BTreeMap::new();
                for (answer, count) in &submitted {
                    for option in checkbox_options(answer) {
                        *counts.entry(option.to_string()).or_default() += *count;
                    }
                }
                counts
            }
            _ => submitted,
        };
        self
    }

    /// Counts for 5, 4, 3, 2 and 1 stars, in that order.
    pub fn star_distribution(&self) -> [usize; 5] {
        let mut distribution = [0; 5];
        for (answer, count) in &self.answer_counts {
            if let Some(stars @ 1..=5) = star_count(answer) {
                distribution[5 - stars as usize] += count;
            }
        }
        distribution
    }

    /// Mean star rating to one decimal over the star-shaped answers only.
    pub fn average_rating(&self) -> Option<f64> {
        let (weighted, total) = self
            .answer_counts
            .iter()
            .filter_map(|(answer, count)| star_count(answer).map(|stars| (stars, *count)))
            .fold((0.0, 0usize), |(weighted, total), (stars, count)| {
                (weighted + f64::from(stars) * count as f64, total + count)
            });

        if total == 0 {
            None
        } else {
            Some((weighted / total as f64 * 10.0).round() / 10.0)
        }
    }

    /// Share of this question's submissions that picked `count`; the
    /// denominator is `response_count`, never the checkbox selection sum.
    pub fn share_pct(&self, count: usize) -> u32 {
        if self.response_count == 0 {
            return 0;
        }
        (count as f64 / self.response_count as f64 * 100.0).round() as u32
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DepartmentStats {
    pub department: String,
    pub response_count: usize,
    pub satisfaction_pct: u32,
    pub dissatisfaction_pct: u32,
    pub questions: BTreeMap<usize, QuestionAnalysis>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OverviewStats {
    pub total_responses: usize,
    pub department_count: usize,
    pub average_satisfaction_pct: u32,
    pub average_dissatisfaction_pct: u32,
}

/// MCQ answer counts by satisfaction label across every department. Labels
/// never observed are absent from `counts`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SatisfactionTally {
    pub counts: BTreeMap<SatisfactionLabel, usize>,
}

impl SatisfactionTally {
    pub fn count(&self, label: SatisfactionLabel) -> usize {
        self.counts.get(&label).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    fn add(&mut self, label: SatisfactionLabel, count: usize) {
        if count > 0 {
            *self.counts.entry(label).or_default() += count;
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SurveyAnalysis {
    pub category_policy: CategoryPolicy,
    pub overview: OverviewStats,
    /// Departments in order of first appearance.
    pub departments: Vec<DepartmentStats>,
    pub satisfaction_tally: SatisfactionTally,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<PartialDataWarning>,
}

impl SurveyAnalysis {
    pub fn department(&self, name: &str) -> Option<&DepartmentStats> {
        self.departments
            .iter()
            .find(|department| department.department == name)
    }

    pub fn is_empty(&self) -> bool {
        self.overview.total_responses == 0
    }
}

#[derive(Debug)]
struct DepartmentAccumulator {
    name: String,
    response_count: usize,
    questions: BTreeMap<usize, QuestionAnalysis>,
    satisfaction: SatisfactionAccumulator,
}

impl DepartmentAccumulator {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            response_count: 0,
            questions: BTreeMap::new(),
            satisfaction: SatisfactionAccumulator::default(),
        }
    }

    fn finalize(self) -> DepartmentStats {
        DepartmentStats {
            department: self.name,
            response_count: self.response_count,
            satisfaction_pct: self.satisfaction.satisfaction_pct(),
            dissatisfaction_pct: self.satisfaction.dissatisfaction_pct(),
            questions: self
                .questions
                .into_iter()
                .map(|(number, question)| (number, question.finish()))
                .collect(),
        }
    }
}

/// Single-run aggregation state. Never shared between runs.
#[derive(Debug)]
pub struct AnalysisBuilder {
    policy: CategoryPolicy,
    rows_seen: usize,
    departments: Vec<DepartmentAccumulator>,
    department_index: HashMap<String, usize>,
    overall: SatisfactionAccumulator,
    warnings: Vec<PartialDataWarning>,
}

impl AnalysisBuilder {
    pub fn new(policy: CategoryPolicy) -> Self {
        Self {
            policy,
            rows_seen: 0,
            departments: Vec::new(),
            department_index: HashMap::new(),
            overall: SatisfactionAccumulator::default(),
            warnings: Vec::new(),
        }
    }

    pub fn rows_seen(&self) -> usize {
        self.rows_seen
    }

    pub fn push(&mut self, row: &ResponseRow) {
        self.rows_seen += 1;
        let row_number = self.rows_seen;
        let policy = self.policy;
        let department_name = row.department_label();

        let slot = match self.department_index.get(department_name) {
            Some(slot) => *slot,
            None => {
                self.departments
                    .push(DepartmentAccumulator::new(department_name));
                let slot = self.departments.len() - 1;
                self.department_index
                    .insert(department_name.to_string(), slot);
                slot
            }
        };
        let department = &mut self.departments[slot];
        department.response_count += 1;

        for (question_number, pair) in row.entries() {
            let Some(pair) = pair else {
                let warning = PartialDataWarning {
                    row: row_number,
                    department: department_name.to_string(),
                    question_number,
                };
                warn!(%warning, "skipping missing answer");
                self.warnings.push(warning);
                continue;
            };

            let question = department
                .questions
                .entry(question_number)
                .or_insert_with(|| {
                    QuestionAnalysis::new(question_number, &pair.question, &pair.answer)
                });
            let category = question.observe(&pair.answer, policy);
            question.tally(&pair.answer);

            let answer_score = score(category, &pair.answer);
            department.satisfaction.record(answer_score);
            self.overall.record(answer_score);
        }
    }

    pub fn extend<'a, I>(&mut self, rows: I)
    where
        I: IntoIterator<Item = &'a ResponseRow>,
    {
        for row in rows {
            self.push(row);
        }
    }

    pub fn finalize(self) -> SurveyAnalysis {
        let departments: Vec<DepartmentStats> = self
            .departments
            .into_iter()
            .map(DepartmentAccumulator::finalize)
            .collect();

        let mut satisfaction_tally = SatisfactionTally::default();
        for question in departments
            .iter()
            .flat_map(|department| department.questions.values())
            .filter(|question| question.category == QuestionCategory::Mcq)
        {
            for (answer, count) in &question.answer_counts {
                if let Some(label) = SatisfactionLabel::parse(answer) {
                    satisfaction_tally.add(label, *count);
                }
            }
        }

        let overview = OverviewStats {
            total_responses: departments
                .iter()
                .map(|department| department.response_count)
                .sum(),
            department_count: departments.len(),
            average_satisfaction_pct: self.overall.satisfaction_pct(),
            average_dissatisfaction_pct: self.overall.dissatisfaction_pct(),
        };

        debug!(
            total_responses = overview.total_responses,
            departments = overview.department_count,
            skipped = self.warnings.len(),
            "survey analysis finalized"
        );

        SurveyAnalysis {
            category_policy: self.policy,
            overview,
            departments,
            satisfaction_tally,
            warnings: self.warnings,
        }
    }
}

impl Default for AnalysisBuilder {
    fn default() -> Self {
        Self::new(CategoryPolicy::default())
    }
}

/// Aggregates with the default category policy. Empty input yields an
/// all-zero analysis.
pub fn aggregate(rows: &[ResponseRow]) -> SurveyAnalysis {
    aggregate_with(rows, CategoryPolicy::default())
}

pub fn aggregate_with(rows: &[ResponseRow], policy: CategoryPolicy) -> SurveyAnalysis {
    let mut builder = AnalysisBuilder::new(policy);
    builder.extend(rows);
    builder.finalize()
}

/// Entry point for callers that must reject an empty dataset.
pub fn analyze(
    rows: &[ResponseRow],
    policy: CategoryPolicy,
) -> Result<SurveyAnalysis, AnalysisError> {
    if rows.is_empty() {
        return Err(AnalysisError::NoResponses);
    }
    Ok(aggregate_with(rows, policy))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_question(department: &str, answers: &[&str]) -> Vec<ResponseRow> {
        answers
            .iter()
            .map(|answer| ResponseRow::new(department).with_answer("How do you feel?", *answer))
            .collect()
    }

    #[test]
    fn empty_input_yields_zero_overview() {
        let analysis = aggregate(&[]);
        assert_eq!(analysis.overview, OverviewStats::default());
        assert!(analysis.departments.is_empty());
        assert!(analysis.satisfaction_tally.counts.is_empty());
        assert!(analysis.is_empty());
    }

    #[test]
    fn analyze_rejects_empty_dataset() {
        assert!(matches!(
            analyze(&[], CategoryPolicy::FirstAnswer),
            Err(AnalysisError::NoResponses)
        ));
    }

    #[test]
    fn one_of_each_label_scores_eighty_eight_both_ways() {
        let answers: Vec<&str> = SatisfactionLabel::ordered()
            .iter()
            .map(|label| label.label())
            .collect();
        let analysis = aggregate(&single_question("Ops", &answers));

        assert_eq!(analysis.overview.average_satisfaction_pct, 88);
        assert_eq!(analysis.overview.average_dissatisfaction_pct, 88);

        let question = &analysis.departments[0].questions[&1];
        assert_eq!(question.category, QuestionCategory::Mcq);
        assert_eq!(question.response_count, 5);
        assert_eq!(question.answer_counts.values().sum::<usize>(), 5);
        assert_eq!(analysis.satisfaction_tally.total(), 5);
    }

    #[test]
    fn star_answers_average_to_one_decimal() {
        let analysis = aggregate(&single_question("Ops", &["5 stars", "5 stars", "1 star"]));
        let question = &analysis.departments[0].questions[&1];

        assert_eq!(question.category, QuestionCategory::StarRating);
        assert_eq!(question.average_rating(), Some(3.7));
        assert_eq!(question.star_distribution(), [2, 0, 0, 0, 1]);
        // (100 + 100) / 2 and 80 / 1
        assert_eq!(analysis.overview.average_satisfaction_pct, 100);
        assert_eq!(analysis.overview.average_dissatisfaction_pct, 80);
    }

    #[test]
    fn checkbox_options_are_counted_against_submissions() {
        let analysis = aggregate(&single_question("Ops", &["Gym, Lunch", "Lunch"]));
        let question = &analysis.departments[0].questions[&1];

        assert_eq!(question.category, QuestionCategory::Checkbox);
        assert_eq!(question.answer_counts.get("Gym"), Some(&1));
        assert_eq!(question.answer_counts.get("Lunch"), Some(&2));
        assert_eq!(question.response_count, 2);
        assert_eq!(question.share_pct(2), 100);
        assert_eq!(question.share_pct(1), 50);
    }

    #[test]
    fn checkbox_labels_do_not_reach_the_tally() {
        let analysis = aggregate(&single_question("Ops", &["Satisfied, Neutral"]));
        assert_eq!(
            analysis.departments[0].questions[&1].category,
            QuestionCategory::Checkbox
        );
        assert!(analysis.satisfaction_tally.is_empty());
        assert_eq!(analysis.overview.average_satisfaction_pct, 0);
    }

    #[test]
    fn first_answer_policy_keeps_the_established_category() {
        let rows = single_question("Ops", &["4 stars", "Satisfied"]);
        let analysis = aggregate_with(&rows, CategoryPolicy::FirstAnswer);
        let question = &analysis.departments[0].questions[&1];

        assert_eq!(question.category, QuestionCategory::StarRating);
        // "Satisfied" is scored as a star answer and contributes nothing.
        assert_eq!(analysis.overview.average_satisfaction_pct, 80);
        assert!(analysis.satisfaction_tally.is_empty());
    }

    #[test]
    fn every_answer_policy_overwrites_with_the_latest_category() {
        let rows = single_question("Ops", &["4 stars", "Satisfied"]);
        let analysis = aggregate_with(&rows, CategoryPolicy::EveryAnswer);
        let question = &analysis.departments[0].questions[&1];

        assert_eq!(question.category, QuestionCategory::Mcq);
        // (80 + 75) / 2 rounded half-up
        assert_eq!(analysis.overview.average_satisfaction_pct, 78);
        assert_eq!(
            analysis.satisfaction_tally.count(SatisfactionLabel::Satisfied),
            1
        );
    }

    #[test]
    fn every_answer_policy_keeps_counts_consistent_with_final_category() {
        let rows = single_question("Ops", &["Gym, Lunch", "Satisfied"]);
        let analysis = aggregate_with(&rows, CategoryPolicy::EveryAnswer);
        let question = &analysis.departments[0].questions[&1];

        assert_eq!(question.category, QuestionCategory::Mcq);
        assert_eq!(question.answer_counts.get("Gym, Lunch"), Some(&1));
        assert_eq!(question.answer_counts.get("Satisfied"), Some(&1));
        assert_eq!(
            question.answer_counts.values().sum::<usize>(),
            question.response_count
        );
        assert_eq!(analysis.satisfaction_tally.total(), 1);
    }

    #[test]
    fn every_answer_policy_splits_options_when_checkbox_comes_last() {
        let rows = single_question("Ops", &["Lunch", "Gym, Lunch"]);
        let analysis = aggregate_with(&rows, CategoryPolicy::EveryAnswer);
        let question = &analysis.departments[0].questions[&1];

        assert_eq!(question.category, QuestionCategory::Checkbox);
        assert_eq!(question.answer_counts.get("Gym"), Some(&1));
        assert_eq!(question.answer_counts.get("Lunch"), Some(&2));
    }

    #[test]
    fn single_pick_first_does_not_hide_checkbox_options() {
        let forward = aggregate(&single_question("Ops", &["Gym, Lunch", "Lunch"]));
        let reversed = aggregate(&single_question("Ops", &["Lunch", "Gym, Lunch"]));

        for analysis in [&forward, &reversed] {
            let question = &analysis.departments[0].questions[&1];
            assert_eq!(question.category, QuestionCategory::Checkbox);
            assert_eq!(question.answer_counts.get("Gym"), Some(&1));
            assert_eq!(question.answer_counts.get("Lunch"), Some(&2));
            assert_eq!(question.share_pct(2), 100);
        }
    }

    #[test]
    fn settled_mcq_is_not_upgraded_by_a_comma_answer() {
        let rows = single_question("Ops", &["Satisfied", "Gym, Lunch"]);
        let analysis = aggregate(&rows);
        let question = &analysis.departments[0].questions[&1];

        assert_eq!(question.category, QuestionCategory::Mcq);
        assert_eq!(question.answer_counts.get("Gym, Lunch"), Some(&1));
        assert_eq!(
            question.answer_counts.values().sum::<usize>(),
            question.response_count
        );
    }

    #[test]
    fn placeholder_does_not_settle_the_category() {
        let rows = single_question("Ops", &["No answer", "2 stars"]);
        let analysis = aggregate(&rows);
        let question = &analysis.departments[0].questions[&1];

        assert_eq!(question.category, QuestionCategory::StarRating);
        assert_eq!(question.answer_counts.get("No answer"), Some(&1));
        assert_eq!(question.average_rating(), Some(2.0));
    }

    #[test]
    fn departments_are_grouped_verbatim_in_first_seen_order() {
        let rows = vec![
            ResponseRow::new("Sales").with_answer("Q1", "Satisfied"),
            ResponseRow::new("sales").with_answer("Q1", "Neutral"),
            ResponseRow::without_department().with_answer("Q1", "Dissatisfied"),
            ResponseRow::new("Sales").with_answer("Q1", "Very Satisfied"),
        ];
        let analysis = aggregate(&rows);

        let names: Vec<&str> = analysis
            .departments
            .iter()
            .map(|department| department.department.as_str())
            .collect();
        assert_eq!(names, vec!["Sales", "sales", "Unknown Department"]);
        assert_eq!(analysis.overview.department_count, 3);
        assert_eq!(analysis.overview.total_responses, 4);
        assert_eq!(
            analysis
                .departments
                .iter()
                .map(|department| department.response_count)
                .sum::<usize>(),
            analysis.overview.total_responses
        );

        let sales = analysis.department("Sales").expect("sales present");
        assert_eq!(sales.response_count, 2);
        // (75 + 100) / 2
        assert_eq!(sales.satisfaction_pct, 88);
        assert_eq!(sales.dissatisfaction_pct, 0);
    }

    #[test]
    fn missing_pairs_are_skipped_for_that_index_only() {
        let rows = vec![ResponseRow::new("Ops")
            .with_answer("Q1", "Satisfied")
            .with_missing_answer()
            .with_answer("Q3", "Free snacks")];
        let analysis = aggregate(&rows);
        let ops = &analysis.departments[0];

        assert_eq!(ops.questions.keys().copied().collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(ops.questions[&3].category, QuestionCategory::Text);
        assert_eq!(
            analysis.warnings,
            vec![PartialDataWarning {
                row: 1,
                department: "Ops".to_string(),
                question_number: 2,
            }]
        );
    }

    #[test]
    fn builder_accepts_rows_incrementally() {
        let rows = single_question("Ops", &["Satisfied", "Very Dissatisfied"]);
        let mut builder = AnalysisBuilder::default();
        for row in &rows {
            builder.push(row);
        }
        assert_eq!(builder.rows_seen(), 2);

        let analysis = builder.finalize();
        assert_eq!(analysis.overview.average_satisfaction_pct, 75);
        assert_eq!(analysis.overview.average_dissatisfaction_pct, 100);
    }
}
