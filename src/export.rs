use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::extract::CandidateRecord;
use crate::util::ensure_directory;

const UTF8_BOM: &str = "\u{FEFF}";
const DELIMITER: &str = ";";

pub const CSV_HEADER: [&str; 8] = [
    "source_document",
    "page_number",
    "label",
    "document_number",
    "entity_document_number",
    "entity_name",
    "extracted_name",
    "score",
];

pub fn records_to_csv(records: &[CandidateRecord]) -> String {
    let mut out = String::from(UTF8_BOM);
    out.push_str(&CSV_HEADER.join(DELIMITER));
    out.push('\n');

    for record in records {
        let row = [
            record.source_document.clone(),
            record.page_number.to_string(),
            record.label.as_str().to_string(),
            record.document_number.clone(),
            record.entity_document_number.clone().unwrap_or_default(),
            record.entity_name_or_sentinel().to_string(),
            record.extracted_name.clone(),
            record.score.map(|score| score.to_string()).unwrap_or_default(),
        ];

        out.push_str(
            &row.iter()
                .map(|cell| escape_csv_cell(cell))
                .collect::<Vec<String>>()
                .join(DELIMITER),
        );
        out.push('\n');
    }

    out
}

pub fn write_records_csv(path: &Path, records: &[CandidateRecord]) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_directory(parent)?;
    }

    let mut file = File::create(path)
        .with_context(|| format!("failed to create csv file: {}", path.display()))?;
    file.write_all(records_to_csv(records).as_bytes())
        .with_context(|| format!("failed to write csv file: {}", path.display()))?;

    Ok(())
}

fn escape_csv_cell(value: &str) -> String {
    if value.contains(DELIMITER) || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
