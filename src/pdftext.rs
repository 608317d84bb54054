use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result, bail};

use crate::extract::page_lines;

pub fn extract_page_lines(pdf_path: &Path, max_pages: Option<usize>) -> Result<Vec<Vec<String>>> {
    let mut command = Command::new("pdftotext");
    command.arg("-enc").arg("UTF-8").arg("-f").arg("1");
    if let Some(max_pages) = max_pages {
        command.arg("-l").arg(max_pages.to_string());
    }
    command.arg(pdf_path).arg("-");

    let output = command
        .output()
        .with_context(|| format!("failed to execute pdftotext for {}", pdf_path.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!(
            "pdftotext returned non-zero exit status for {}: {}",
            pdf_path.display(),
            stderr.trim()
        );
    }

    Ok(split_pages(&String::from_utf8_lossy(&output.stdout)))
}

fn split_pages(raw: &str) -> Vec<Vec<String>> {
    let mut pages: Vec<&str> = raw.split('\u{000C}').collect();
    while pages.last().is_some_and(|page| page.trim().is_empty()) {
        pages.pop();
    }

    pages
        .into_iter()
        .map(|page| page_lines(&page.replace('\u{0000}', "")))
        .collect()
}

pub fn pdftotext_version() -> Option<String> {
    let output = Command::new("pdftotext").arg("-v").output().ok()?;

    // poppler prints its banner on stderr
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let source = if stdout.trim().is_empty() {
        stderr.trim()
    } else {
        stdout.trim()
    };

    source
        .lines()
        .next()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToOwned::to_owned)
}
