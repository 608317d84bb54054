use anyhow::{Context, Result};
use regex::{Captures, Regex};

use super::config::{MatchMode, NumberShape};

const LABEL_ALTERNATIVES: &str = r"respons[aá]vel|cnpj|cpf|contribuinte";

// digit-led and digit-terminated so punctuation never bleeds into the separator
const LOOSE_NUMBER: &str = r"[0-9][0-9./\-]{12,16}[0-9]";
const STRICT_NUMBER: &str = r"[0-9]{2}\.[0-9]{3}\.[0-9]{3}/[0-9]{4}-[0-9]{2}|[0-9]{3}\.[0-9]{3}\.[0-9]{3}-[0-9]{2}";

// a bare hyphen needs whitespace on one side, otherwise a backtracking
// number match could split `0001-99` into a number and a name
const SEPARATOR_TAIL: &str = r"(?:\s+-\s*|\s*-\s+|\s*[–—]\s*)(?P<name>.+)";

// a CPF has 11 digits
const MIN_NUMBER_DIGITS: usize = 11;

#[derive(Debug)]
pub struct LineMatch<'a> {
    pub label: Option<&'a str>,
    pub number: &'a str,
    pub trailing: Option<&'a str>,
}

#[derive(Debug)]
pub struct LinePatterns {
    line: Regex,
    number: Regex,
}

impl LinePatterns {
    pub fn new(mode: MatchMode, shape: NumberShape) -> Result<Self> {
        let number_body = match shape {
            NumberShape::Loose => LOOSE_NUMBER,
            NumberShape::Strict => STRICT_NUMBER,
        };
        let number = format!(r"\b(?P<number>{number_body})\b");
        let label = format!(r"(?P<label>{LABEL_ALTERNATIVES})\s*:?\s*");

        let line = match mode {
            MatchMode::RequireLabel => format!(r"(?i)^\s*{label}{number}(?:{SEPARATOR_TAIL})?"),
            MatchMode::DocumentNumberOnly => format!(r"(?i)(?:{label})?{number}(?:{SEPARATOR_TAIL})?"),
            MatchMode::FullMatch => format!(r"(?i)^\s*(?:{label})?{number}{SEPARATOR_TAIL}$"),
        };

        Ok(Self {
            line: Regex::new(&line).context("failed to compile document line regex")?,
            number: Regex::new(&number).context("failed to compile document number regex")?,
        })
    }

    pub fn match_line<'a>(&self, line: &'a str) -> Option<LineMatch<'a>> {
        let captures = self.line.captures(line)?;
        let number = captures.name("number")?;
        if !has_enough_digits(number.as_str()) {
            return None;
        }

        Some(LineMatch {
            label: capture_str(&captures, "label"),
            number: number.as_str(),
            trailing: capture_str(&captures, "name"),
        })
    }

    pub fn find_number<'a>(&self, line: &'a str) -> Option<regex::Match<'a>> {
        self.number
            .captures_iter(line)
            .filter_map(|captures| captures.name("number"))
            .find(|number| has_enough_digits(number.as_str()))
    }
}

fn capture_str<'a>(captures: &Captures<'a>, name: &str) -> Option<&'a str> {
    captures.name(name).map(|m| m.as_str())
}

fn has_enough_digits(number: &str) -> bool {
    number.chars().filter(char::is_ascii_digit).count() >= MIN_NUMBER_DIGITS
}
