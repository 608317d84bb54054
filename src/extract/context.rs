use super::normalize::{contains_pagination_marker, has_letter_run, normalize_whitespace};

const NON_NAME_MARKERS: &[&str] = &["Situação:", "CNPJ:", "CPF:"];

const MIN_LETTER_RUN: usize = 3;

pub fn resolve_stacked_name(lines: &[String], anchor: usize, window: usize) -> Option<String> {
    lines
        .iter()
        .skip(anchor + 1)
        .take(window)
        .map(|line| normalize_whitespace(line))
        .filter(|line| !line.is_empty() && !is_non_name_line(line))
        .find(|line| has_letter_run(line, MIN_LETTER_RUN))
}

fn is_non_name_line(line: &str) -> bool {
    NON_NAME_MARKERS.iter().any(|marker| line.contains(marker)) || contains_pagination_marker(line)
}
