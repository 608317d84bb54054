use serde::Serialize;

use crate::extract::ExtractionConfig;

#[derive(Debug, Clone, Serialize)]
pub struct ToolVersions {
    pub pdftotext: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractPaths {
    pub output_dir: String,
    pub csv_path: String,
    pub manifest_path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Extracted,
    NoData,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentSummary {
    pub source_document: String,
    pub path: String,
    pub status: DocumentStatus,
    pub sha256: Option<String>,
    pub page_count: usize,
    pub record_count: usize,
    pub entity_name: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtractCounts {
    pub document_count: usize,
    pub extracted_document_count: usize,
    pub no_data_document_count: usize,
    pub failed_document_count: usize,
    pub page_count: usize,
    pub candidate_record_count: usize,
    pub final_record_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractRunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub status: String,
    pub started_at: String,
    pub updated_at: String,
    pub command: String,
    pub tool_versions: ToolVersions,
    pub config: ExtractionConfig,
    pub paths: ExtractPaths,
    pub counts: ExtractCounts,
    pub documents: Vec<DocumentSummary>,
    pub warnings: Vec<String>,
}
