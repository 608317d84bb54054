use super::normalize::{char_len, format_name, is_numeric_noise, normalize_whitespace};
use super::patterns::LinePatterns;

const DOCUMENT_MARKER: &str = "CNPJ";
const STACKED_NAME_LABEL: &str = "Nome";
const REGISTRATION_BOILERPLATE: &str = "dados cadastrais";

const MIN_INLINE_LINE_CHARS: usize = 16;
const MIN_ENTITY_CHARS: usize = 4;

pub fn detect_entity_name(patterns: &LinePatterns, first_page: Option<&[String]>) -> Option<String> {
    let lines = first_page?;
    inline_entity_name(patterns, lines).or_else(|| stacked_entity_name(lines))
}

fn inline_entity_name(patterns: &LinePatterns, lines: &[String]) -> Option<String> {
    lines
        .iter()
        .filter(|line| line.contains(DOCUMENT_MARKER) && char_len(line) >= MIN_INLINE_LINE_CHARS)
        .find_map(|line| {
            let number = patterns.find_number(line)?;
            let candidate = normalize_whitespace(
                line[number.end()..].trim_start_matches(|ch: char| {
                    ch.is_whitespace() || matches!(ch, '-' | '–' | '—' | ':')
                }),
            );

            if candidate.to_lowercase().contains(REGISTRATION_BOILERPLATE)
                || char_len(&candidate) < MIN_ENTITY_CHARS
            {
                return None;
            }

            Some(format_name(&candidate))
        })
}

fn stacked_entity_name(lines: &[String]) -> Option<String> {
    let label_index = lines
        .iter()
        .position(|line| line.trim() == STACKED_NAME_LABEL)?;
    let candidate = normalize_whitespace(lines.get(label_index + 1)?);

    if is_numeric_noise(&candidate) || char_len(&candidate) < MIN_ENTITY_CHARS {
        return None;
    }

    Some(format_name(&candidate))
}
