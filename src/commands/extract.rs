use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use chrono::Utc;
use tracing::{info, warn};

use crate::cli::ExtractArgs;
use crate::export::write_records_csv;
use crate::extract::{CandidateRecord, ExtractionConfig, Extractor, ScoreWeights};
use crate::model::{
    DocumentStatus, DocumentSummary, ExtractCounts, ExtractPaths, ExtractRunManifest, ToolVersions,
};
use crate::pdftext::{extract_page_lines, pdftotext_version};
use crate::util::{
    discover_pdfs, is_pdf_path, now_utc_string, sha256_file, source_document_names,
    utc_compact_string, write_json_pretty,
};

const DEFAULT_CSV_NAME: &str = "responsaveis_extraidos.csv";

pub fn run(args: ExtractArgs) -> Result<()> {
    let started_ts = Utc::now();
    let started_at = now_utc_string();
    let run_id = format!("extract-{}", utc_compact_string(started_ts));

    let csv_path = args
        .output_csv
        .clone()
        .unwrap_or_else(|| args.output_dir.join(DEFAULT_CSV_NAME));
    let manifest_path = args.manifest_path.clone().unwrap_or_else(|| {
        args.output_dir.join("manifests").join(format!(
            "extract_run_{}.json",
            utc_compact_string(started_ts)
        ))
    });

    let config = build_config(&args)?;
    let extractor = Extractor::new(config)?;

    let pdf_paths = collect_input_pdfs(&args.inputs)?;
    if pdf_paths.is_empty() {
        bail!("no PDFs found in the given inputs");
    }

    info!(
        run_id = %run_id,
        pdf_count = pdf_paths.len(),
        match_mode = args.match_mode.as_str(),
        retention = args.retention.as_str(),
        dedup = args.dedup.as_str(),
        "starting extraction"
    );

    let max_pages = args.max_pages_per_doc;
    let batch = run_batch(&extractor, &pdf_paths, |path| load_document(path, max_pages));

    let mut warnings = batch.warnings;
    if batch.records.is_empty() {
        warn!(pdf_count = pdf_paths.len(), "no data found in any document");
        warnings.push(
            "no responsible-party records found; check that the reports match the RFB/PGFN layout"
                .to_string(),
        );
    }

    let mut counts = summarize(&batch.documents);
    counts.candidate_record_count = batch.records.len();

    let records = extractor.finalize(batch.records);
    counts.final_record_count = records.len();

    write_records_csv(&csv_path, &records)?;
    info!(path = %csv_path.display(), records = records.len(), "wrote csv export");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    }

    let manifest = ExtractRunManifest {
        manifest_version: 1,
        run_id,
        status: if counts.failed_document_count > 0 {
            "completed_with_failures".to_string()
        } else {
            "completed".to_string()
        },
        started_at,
        updated_at: now_utc_string(),
        command: render_extract_command(&args),
        tool_versions: ToolVersions {
            pdftotext: pdftotext_version(),
        },
        config: extractor.config().clone(),
        paths: ExtractPaths {
            output_dir: args.output_dir.display().to_string(),
            csv_path: csv_path.display().to_string(),
            manifest_path: manifest_path.display().to_string(),
        },
        counts,
        documents: batch.documents,
        warnings,
    };

    write_json_pretty(&manifest_path, &manifest)?;
    info!(path = %manifest_path.display(), "wrote extract run manifest");
    info!(
        documents = manifest.counts.document_count,
        failed = manifest.counts.failed_document_count,
        candidates = manifest.counts.candidate_record_count,
        records = manifest.counts.final_record_count,
        "extraction completed"
    );

    Ok(())
}

fn build_config(args: &ExtractArgs) -> Result<ExtractionConfig> {
    let weights = match &args.weights_path {
        Some(path) => ScoreWeights::load(path)?,
        None => ScoreWeights::default(),
    };

    Ok(ExtractionConfig {
        match_mode: args.match_mode.into(),
        retention: args.retention.into(),
        number_shape: args.number_shape.into(),
        dedup_key: args.dedup.dedup_key(),
        org_penalty: args.org_penalty.into(),
        context_window: args.context_window,
        weights,
    })
}

fn collect_input_pdfs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut pdfs = Vec::new();
    for input in inputs {
        if input.is_dir() {
            pdfs.extend(discover_pdfs(input)?);
        } else if is_pdf_path(input) || !input.exists() {
            // missing files surface as per-document failures
            pdfs.push(input.clone());
        } else {
            warn!(path = %input.display(), "skipping non-PDF input");
        }
    }
    Ok(pdfs)
}

#[derive(Debug)]
struct LoadedDocument {
    sha256: Option<String>,
    pages: Vec<Vec<String>>,
}

fn load_document(path: &Path, max_pages: Option<usize>) -> Result<LoadedDocument> {
    let sha256 = sha256_file(path)?;
    let pages = extract_page_lines(path, max_pages)?;
    Ok(LoadedDocument {
        sha256: Some(sha256),
        pages,
    })
}

#[derive(Debug, Default)]
struct BatchOutcome {
    records: Vec<CandidateRecord>,
    documents: Vec<DocumentSummary>,
    warnings: Vec<String>,
}

fn run_batch<F>(extractor: &Extractor, pdf_paths: &[PathBuf], mut load: F) -> BatchOutcome
where
    F: FnMut(&Path) -> Result<LoadedDocument>,
{
    let mut outcome = BatchOutcome::default();

    for (path, source_document) in pdf_paths.iter().zip(source_document_names(pdf_paths)) {
        let loaded = match load(path) {
            Ok(loaded) => loaded,
            Err(err) => {
                let warning = format!("failed to read {}: {err:#}", path.display());
                warn!(pdf = %path.display(), error = %err, "skipping unreadable document");
                outcome.warnings.push(warning);
                outcome.documents.push(DocumentSummary {
                    source_document,
                    path: path.display().to_string(),
                    status: DocumentStatus::Failed,
                    sha256: None,
                    page_count: 0,
                    record_count: 0,
                    entity_name: None,
                    error: Some(format!("{err:#}")),
                });
                continue;
            }
        };

        let extraction = extractor.extract_document(&source_document, &loaded.pages);
        let status = if extraction.records.is_empty() {
            warn!(pdf = %path.display(), pages = extraction.page_count, "no data found in document");
            DocumentStatus::NoData
        } else {
            info!(
                pdf = %path.display(),
                pages = extraction.page_count,
                records = extraction.records.len(),
                entity = extraction.entity_name.as_deref().unwrap_or_default(),
                "document extracted"
            );
            DocumentStatus::Extracted
        };

        outcome.documents.push(DocumentSummary {
            source_document,
            path: path.display().to_string(),
            status,
            sha256: loaded.sha256,
            page_count: extraction.page_count,
            record_count: extraction.records.len(),
            entity_name: extraction.entity_name,
            error: None,
        });
        outcome.records.extend(extraction.records);
    }

    outcome
}

fn summarize(documents: &[DocumentSummary]) -> ExtractCounts {
    let mut counts = ExtractCounts {
        document_count: documents.len(),
        ..ExtractCounts::default()
    };

    for document in documents {
        counts.page_count += document.page_count;
        match document.status {
            DocumentStatus::Extracted => counts.extracted_document_count += 1,
            DocumentStatus::NoData => counts.no_data_document_count += 1,
            DocumentStatus::Failed => counts.failed_document_count += 1,
        }
    }

    counts
}

fn render_extract_command(args: &ExtractArgs) -> String {
    let mut command = vec!["rfb-extract".to_string(), "extract".to_string()];
    command.extend(args.inputs.iter().map(|input| input.display().to_string()));

    command.push("--output-dir".to_string());
    command.push(args.output_dir.display().to_string());

    if let Some(path) = &args.output_csv {
        command.push("--output-csv".to_string());
        command.push(path.display().to_string());
    }
    if let Some(path) = &args.manifest_path {
        command.push("--manifest-path".to_string());
        command.push(path.display().to_string());
    }

    command.push("--match-mode".to_string());
    command.push(args.match_mode.as_str().to_string());
    command.push("--retention".to_string());
    command.push(args.retention.as_str().to_string());
    command.push("--number-shape".to_string());
    command.push(args.number_shape.as_str().to_string());
    command.push("--dedup".to_string());
    command.push(args.dedup.as_str().to_string());
    command.push("--org-penalty".to_string());
    command.push(args.org_penalty.as_str().to_string());
    command.push("--context-window".to_string());
    command.push(args.context_window.to_string());

    if let Some(path) = &args.weights_path {
        command.push("--weights-path".to_string());
        command.push(path.display().to_string());
    }
    if let Some(max_pages) = args.max_pages_per_doc {
        command.push("--max-pages-per-doc".to_string());
        command.push(max_pages.to_string());
    }
    if args.json {
        command.push("--json".to_string());
    }

    command.join(" ")
}
