/// Canonical form of an export header: invisible marks stripped, whitespace
/// collapsed, lowercase.
pub(crate) fn normalize_header(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_ascii_lowercase()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HeaderKind {
    Department,
    Question(usize),
    Answer(usize),
    Other,
}

pub(crate) fn header_kind(value: &str) -> HeaderKind {
    let normalized = normalize_header(value);
    if normalized == "department" {
        return HeaderKind::Department;
    }

    let numbered = |prefix: &str| {
        normalized
            .strip_prefix(prefix)
            .map(str::trim)
            .and_then(|digits| digits.parse::<usize>().ok())
            .filter(|number| *number > 0)
    };

    if let Some(number) = numbered("question") {
        HeaderKind::Question(number)
    } else if let Some(number) = numbered("answer") {
        HeaderKind::Answer(number)
    } else {
        HeaderKind::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_header_removes_marks_whitespace_and_case() {
        assert_eq!(
            normalize_header("\u{feff}Survey   Title "),
            "survey title".to_string()
        );
    }

    #[test]
    fn header_kind_recognizes_numbered_columns() {
        assert_eq!(header_kind("\u{feff}Department"), HeaderKind::Department);
        assert_eq!(header_kind("Question 1"), HeaderKind::Question(1));
        assert_eq!(header_kind("answer  12"), HeaderKind::Answer(12));
        assert_eq!(header_kind("Question 0"), HeaderKind::Other);
        assert_eq!(header_kind("Questionnaire"), HeaderKind::Other);
        assert_eq!(header_kind("Employee Name"), HeaderKind::Other);
    }
}
