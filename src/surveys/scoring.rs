use super::classifier::star_count;
use super::domain::{QuestionCategory, SatisfactionLabel};
use serde::Serialize;

/// Contribution of a single answer to satisfaction scoring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnswerScore {
    pub contributes_to_satisfaction: bool,
    pub contributes_to_dissatisfaction: bool,
    pub value: f64,
}

impl AnswerScore {
    const fn neither() -> Self {
        Self {
            contributes_to_satisfaction: false,
            contributes_to_dissatisfaction: false,
            value: 0.0,
        }
    }

    const fn satisfied(value: f64) -> Self {
        Self {
            contributes_to_satisfaction: true,
            contributes_to_dissatisfaction: false,
            value,
        }
    }

    const fn dissatisfied(value: f64) -> Self {
        Self {
            contributes_to_satisfaction: false,
            contributes_to_dissatisfaction: true,
            value,
        }
    }
}

pub fn score(category: QuestionCategory, answer: &str) -> AnswerScore {
    match category {
        QuestionCategory::StarRating => score_stars(answer),
        QuestionCategory::Mcq => score_label(answer),
        QuestionCategory::Checkbox | QuestionCategory::Text => AnswerScore::neither(),
    }
}

fn score_stars(answer: &str) -> AnswerScore {
    match star_count(answer) {
        Some(stars @ 3..=5) => AnswerScore::satisfied(f64::from(stars) / 5.0 * 100.0),
        Some(stars @ 1..=2) => AnswerScore::dissatisfied(f64::from(5 - stars) / 5.0 * 100.0),
        _ => AnswerScore::neither(),
    }
}

fn score_label(answer: &str) -> AnswerScore {
    match SatisfactionLabel::parse(answer) {
        Some(label @ (SatisfactionLabel::VerySatisfied | SatisfactionLabel::Satisfied)) => {
            AnswerScore::satisfied(f64::from(label.table_value()))
        }
        Some(
            label @ (SatisfactionLabel::Dissatisfied | SatisfactionLabel::VeryDissatisfied),
        ) => AnswerScore::dissatisfied(100.0 - f64::from(label.table_value())),
        Some(SatisfactionLabel::Neutral) | None => AnswerScore::neither(),
    }
}

/// Running sums for satisfaction and dissatisfaction. Each side keeps its own
/// denominator.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct SatisfactionAccumulator {
    satisfaction_sum: f64,
    satisfaction_count: usize,
    dissatisfaction_sum: f64,
    dissatisfaction_count: usize,
}

impl SatisfactionAccumulator {
    pub fn record(&mut self, score: AnswerScore) {
        if score.contributes_to_satisfaction {
            self.satisfaction_sum += score.value;
            self.satisfaction_count += 1;
        }
        if score.contributes_to_dissatisfaction {
            self.dissatisfaction_sum += score.value;
            self.dissatisfaction_count += 1;
        }
    }

    pub fn satisfaction_pct(&self) -> u32 {
        rounded_mean(self.satisfaction_sum, self.satisfaction_count)
    }

    pub fn dissatisfaction_pct(&self) -> u32 {
        rounded_mean(self.dissatisfaction_sum, self.dissatisfaction_count)
    }
}

/// Mean rounded half-up to a whole percent; 0 for an empty set.
pub fn rounded_mean(sum: f64, count: usize) -> u32 {
    if count == 0 {
        return 0;
    }
    (sum / count as f64).round().clamp(0.0, 100.0) as u32
}
