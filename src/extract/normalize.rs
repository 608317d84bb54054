const NAME_CONNECTORS: &[&str] = &["de", "da", "do", "dos", "das", "e", "em", "com", "por", "para"];

const ACRONYM_MAX_CHARS: usize = 3;

pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<&str>>().join(" ")
}

pub fn format_name(text: &str) -> String {
    text.split_whitespace()
        .enumerate()
        .map(|(index, token)| format_name_token(index, token))
        .collect::<Vec<String>>()
        .join(" ")
}

fn format_name_token(index: usize, token: &str) -> String {
    let lowered = token.to_lowercase();
    if index == 0 {
        return capitalize_first(&lowered);
    }

    if NAME_CONNECTORS.contains(&lowered.as_str()) {
        return lowered;
    }

    if is_acronym(token) {
        return token.to_string();
    }

    capitalize_first(&lowered)
}

fn is_acronym(token: &str) -> bool {
    token.chars().count() <= ACRONYM_MAX_CHARS
        && token.chars().all(char::is_alphabetic)
        && token.chars().all(char::is_uppercase)
}

fn capitalize_first(lowered: &str) -> String {
    let mut chars = lowered.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };

    let mut upper = first.to_uppercase();
    // multi-char expansions (e.g. 'ß' -> "SS") would not survive a second pass
    let head = match (upper.next(), upper.next()) {
        (Some(single), None) => single,
        _ => first,
    };

    let mut out = String::with_capacity(lowered.len());
    out.push(head);
    out.push_str(chars.as_str());
    out
}

pub fn is_numeric_noise(text: &str) -> bool {
    let trimmed = text.trim();
    !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|ch| ch.is_ascii_digit() || ch.is_ascii_punctuation() || ch.is_whitespace())
}

pub fn is_date(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.len() == 10 && date_at(trimmed.as_bytes(), 0)
}

pub fn contains_date(text: &str) -> bool {
    let bytes = text.as_bytes();
    if bytes.len() < 10 {
        return false;
    }

    (0..=bytes.len() - 10).any(|start| {
        date_at(bytes, start)
            && (start == 0 || !bytes[start - 1].is_ascii_digit())
            && bytes.get(start + 10).is_none_or(|next| !next.is_ascii_digit())
    })
}

// DD/MM/YYYY starting at `start`
fn date_at(bytes: &[u8], start: usize) -> bool {
    let Some(window) = bytes.get(start..start + 10) else {
        return false;
    };

    window.iter().enumerate().all(|(offset, byte)| match offset {
        2 | 5 => *byte == b'/',
        _ => byte.is_ascii_digit(),
    })
}

pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

const PAGINATION_MARKERS: &[&str] = &["page", "página", "pagina", "pág", "pag"];

// a marker counts when no letter touches either side, so `Page3` and
// `PAGE1OF3` are footers while `Pagels` is a surname
pub fn contains_pagination_marker(text: &str) -> bool {
    let lowered = text.to_lowercase();
    PAGINATION_MARKERS.iter().any(|marker| {
        lowered.match_indices(marker).any(|(start, found)| {
            let before = lowered[..start].chars().next_back();
            let after = lowered[start + found.len()..].chars().next();
            !before.is_some_and(char::is_alphabetic) && !after.is_some_and(char::is_alphabetic)
        })
    })
}

pub fn has_letter_run(text: &str, min_run: usize) -> bool {
    let mut run = 0usize;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            run += 1;
            if run >= min_run {
                return true;
            }
        } else {
            run = 0;
        }
    }
    false
}
