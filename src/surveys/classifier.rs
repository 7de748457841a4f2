use super::domain::{QuestionCategory, SatisfactionLabel, NO_ANSWER};
use regex::Regex;
use std::sync::OnceLock;

fn star_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)^([0-9]+)\s*stars?$").expect("star pattern compiles"))
}

/// Classifies a single answer. Rules are tried in order and the first match
/// wins: star rating, comma-separated checkbox, satisfaction label, text.
pub fn classify(answer: &str) -> QuestionCategory {
    let trimmed = answer.trim();

    if star_pattern().is_match(trimmed) {
        QuestionCategory::StarRating
    } else if trimmed.contains(',') {
        QuestionCategory::Checkbox
    } else if trimmed == NO_ANSWER || SatisfactionLabel::parse(trimmed).is_some() {
        QuestionCategory::Mcq
    } else {
        QuestionCategory::Text
    }
}

/// Star count for answers shaped like `4 stars`. `None` when the text is not
/// a star answer or the number does not fit.
pub fn star_count(answer: &str) -> Option<u32> {
    star_pattern()
        .captures(answer.trim())
        .and_then(|captures| captures.get(1))
        .and_then(|digits| digits.as_str().parse().ok())
}

/// Whether the answer is the unanswered placeholder.
pub fn is_placeholder(answer: &str) -> bool {
    answer.trim() == NO_ANSWER
}

/// Options picked in a multi-select answer, trimmed, blanks dropped.
pub fn checkbox_options(answer: &str) -> impl Iterator<Item = &str> {
    answer
        .split(',')
        .map(str::trim)
        .filter(|option| !option.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn star_answers_match_regardless_of_case_and_spacing() {
        for answer in ["5 stars", "1 star", "3Stars", "4   STAR", " 2 stars "] {
            assert_eq!(classify(answer), QuestionCategory::StarRating, "{answer}");
        }
        assert_eq!(star_count("4   STAR"), Some(4));
        assert_eq!(star_count("12 stars"), Some(12));
        assert_eq!(star_count("five stars"), None);
    }

    #[test]
    fn star_pattern_accepts_ascii_digits_only() {
        assert_eq!(classify("\u{ff15} stars"), QuestionCategory::Text);
        assert_eq!(star_count("\u{ff15} stars"), None);
        assert_eq!(classify("\u{0665} star"), QuestionCategory::Text);
    }

    #[test]
    fn star_pattern_requires_the_whole_answer() {
        assert_eq!(classify("about 5 stars"), QuestionCategory::Text);
        assert_eq!(classify("5 stars!"), QuestionCategory::Text);
    }

    #[test]
    fn commas_win_over_satisfaction_labels() {
        assert_eq!(
            classify("Satisfied, Very Satisfied"),
            QuestionCategory::Checkbox
        );
        assert_eq!(classify("Gym, Lunch"), QuestionCategory::Checkbox);
    }

    #[test]
    fn satisfaction_labels_and_placeholder_are_mcq() {
        for label in SatisfactionLabel::ordered() {
            assert_eq!(classify(label.label()), QuestionCategory::Mcq);
        }
        assert_eq!(classify("No answer"), QuestionCategory::Mcq);
        assert_eq!(classify(" Neutral "), QuestionCategory::Mcq);
    }

    #[test]
    fn everything_else_is_text() {
        assert_eq!(classify(""), QuestionCategory::Text);
        assert_eq!(classify("satisfied"), QuestionCategory::Text);
        assert_eq!(classify("More parking please"), QuestionCategory::Text);
    }

    #[test]
    fn checkbox_options_are_trimmed_and_non_empty() {
        let options: Vec<&str> = checkbox_options("Gym, Lunch,, Parking ").collect();
        assert_eq!(options, vec!["Gym", "Lunch", "Parking"]);
    }
}
