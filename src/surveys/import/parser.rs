use super::normalizer::{header_kind, HeaderKind};
use crate::surveys::domain::{AnswerPair, ResponseRow};
use csv::StringRecord;
use std::collections::BTreeMap;
use std::io::Read;

/// Column positions for one question number.
#[derive(Debug, Default, Clone, Copy)]
struct PairColumns {
    question: Option<usize>,
    answer: Option<usize>,
}

#[derive(Debug)]
struct ExportLayout {
    department: Option<usize>,
    pairs: Vec<PairColumns>,
}

impl ExportLayout {
    fn from_headers(headers: &StringRecord) -> Self {
        let mut department = None;
        let mut numbered: BTreeMap<usize, PairColumns> = BTreeMap::new();

        for (index, header) in headers.iter().enumerate() {
            match header_kind(header) {
                HeaderKind::Department => {
                    department.get_or_insert(index);
                }
                HeaderKind::Question(number) => {
                    numbered.entry(number).or_default().question.get_or_insert(index);
                }
                HeaderKind::Answer(number) => {
                    numbered.entry(number).or_default().answer.get_or_insert(index);
                }
                HeaderKind::Other => {}
            }
        }

        let highest = numbered.keys().next_back().copied().unwrap_or(0);
        let pairs = (1..=highest)
            .map(|number| numbered.get(&number).copied().unwrap_or_default())
            .collect();

        Self { department, pairs }
    }

    fn row(&self, record: &StringRecord) -> ResponseRow {
        let department = self
            .department
            .and_then(|index| record.get(index))
            .filter(|value| !value.trim().is_empty())
            .map(str::to_string);

        let mut answers: Vec<Option<AnswerPair>> = self
            .pairs
            .iter()
            .map(|columns| {
                let question = columns.question.and_then(|index| cell(record, index))?;
                let answer = columns.answer.and_then(|index| cell(record, index))?;
                Some(AnswerPair::new(question, answer))
            })
            .collect();

        while matches!(answers.last(), Some(None)) {
            answers.pop();
        }

        ResponseRow {
            department,
            answers,
        }
    }
}

fn cell(record: &StringRecord, index: usize) -> Option<&str> {
    record
        .get(index)
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<ResponseRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_reader(reader);
    let layout = ExportLayout::from_headers(csv_reader.headers()?);
    let mut rows = Vec::new();

    for record in csv_reader.records() {
        let record = record?;
        if record.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        rows.push(layout.row(&record));
    }

    Ok(rows)
}
