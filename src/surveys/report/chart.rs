use crate::surveys::analysis::SatisfactionTally;
use crate::surveys::domain::SatisfactionLabel;
use serde::Serialize;

const BAR_WIDTH: usize = 30;

/// One wedge of the satisfaction pie, angles in degrees clockwise from 12
/// o'clock.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub label: SatisfactionLabel,
    pub count: usize,
    pub percentage: f64,
    pub start_degrees: f64,
    pub end_degrees: f64,
}

/// Slices for every label with a non-zero count, in label order.
pub fn pie_slices(tally: &SatisfactionTally) -> Vec<PieSlice> {
    let total = tally.total();
    if total == 0 {
        return Vec::new();
    }

    let mut start = 0.0;
    SatisfactionLabel::ordered()
        .into_iter()
        .filter_map(|label| {
            let count = tally.count(label);
            if count == 0 {
                return None;
            }
            let fraction = count as f64 / total as f64;
            let end = start + fraction * 360.0;
            let slice = PieSlice {
                label,
                count,
                percentage: fraction * 100.0,
                start_degrees: start,
                end_degrees: end,
            };
            start = end;
            Some(slice)
        })
        .collect()
}

pub(crate) fn chart_lines(tally: &SatisfactionTally) -> Vec<String> {
    let slices = pie_slices(tally);
    if slices.is_empty() {
        return vec!["No multiple-choice satisfaction answers were recorded.".to_string()];
    }

    let mut lines: Vec<String> = slices
        .iter()
        .map(|slice| {
            let filled = ((slice.percentage / 100.0) * BAR_WIDTH as f64).round() as usize;
            format!(
                "{:<18} |{:<width$}| {} ({:.1}%) [{:.1}deg - {:.1}deg]",
                slice.label.label(),
                "#".repeat(filled),
                slice.count,
                slice.percentage,
                slice.start_degrees,
                slice.end_degrees,
                width = BAR_WIDTH
            )
        })
        .collect();
    lines.push(String::new());
    lines.push(format!("Total MCQ answers: {}", tally.total()));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tally(entries: &[(SatisfactionLabel, usize)]) -> SatisfactionTally {
        SatisfactionTally {
            counts: entries.iter().copied().collect(),
        }
    }

    #[test]
    fn slices_cover_the_full_circle_in_label_order() {
        let slices = pie_slices(&tally(&[
            (SatisfactionLabel::Neutral, 1),
            (SatisfactionLabel::VerySatisfied, 3),
        ]));

        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].label, SatisfactionLabel::VerySatisfied);
        assert_eq!(slices[0].percentage, 75.0);
        assert_eq!(slices[0].start_degrees, 0.0);
        assert_eq!(slices[0].end_degrees, 270.0);
        assert_eq!(slices[1].start_degrees, 270.0);
        assert_eq!(slices[1].end_degrees, 360.0);
    }

    #[test]
    fn empty_tally_renders_a_notice() {
        let lines = chart_lines(&SatisfactionTally::default());
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("No multiple-choice"));
    }

    #[test]
    fn chart_lines_label_counts_and_percentages() {
        let lines = chart_lines(&tally(&[
            (SatisfactionLabel::Satisfied, 1),
            (SatisfactionLabel::Dissatisfied, 1),
        ]));
        assert!(lines[0].starts_with("Satisfied"));
        assert!(lines[0].contains("| 1 (50.0%)"));
        assert!(lines[0].contains(&"#".repeat(15)));
        assert_eq!(lines.last().map(String::as_str), Some("Total MCQ answers: 2"));
    }
}
