use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONTEXT_WINDOW: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchMode {
    RequireLabel,
    DocumentNumberOnly,
    FullMatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RetentionPolicy {
    Filtered,
    Raw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NumberShape {
    Loose,
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DedupKey {
    Document,
    DocumentAndNumber,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrgPenaltyPolicy {
    ExemptTaxpayer,
    Always,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub responsible_party_label: i64,
    pub taxpayer_label: i64,
    pub date_or_pagination: i64,
    pub document_marker_in_name: i64,
    pub organization_marker: i64,
    pub entity_name_in_name: i64,
    pub long_name_bonus: i64,
    pub long_name_min_chars: usize,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            responsible_party_label: 100,
            taxpayer_label: 50,
            date_or_pagination: -50,
            document_marker_in_name: -20,
            organization_marker: -20,
            entity_name_in_name: -10,
            long_name_bonus: 5,
            long_name_min_chars: 10,
        }
    }
}

impl ScoreWeights {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read(path)
            .with_context(|| format!("failed to read weights file {}", path.display()))?;
        serde_json::from_slice(&raw)
            .with_context(|| format!("failed to parse weights file {}", path.display()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    pub match_mode: MatchMode,
    pub retention: RetentionPolicy,
    pub number_shape: NumberShape,
    pub dedup_key: Option<DedupKey>,
    pub org_penalty: OrgPenaltyPolicy,
    pub context_window: usize,
    pub weights: ScoreWeights,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            match_mode: MatchMode::RequireLabel,
            retention: RetentionPolicy::Filtered,
            number_shape: NumberShape::Loose,
            dedup_key: Some(DedupKey::DocumentAndNumber),
            org_penalty: OrgPenaltyPolicy::ExemptTaxpayer,
            context_window: DEFAULT_CONTEXT_WINDOW,
            weights: ScoreWeights::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn weights_fill_missing_fields_from_defaults() {
        let weights: ScoreWeights =
            serde_json::from_str(r#"{ "responsible_party_label": 200, "long_name_bonus": 0 }"#)
                .expect("partial weights should deserialize");

        assert_eq!(weights.responsible_party_label, 200);
        assert_eq!(weights.long_name_bonus, 0);
        assert_eq!(weights.taxpayer_label, 50);
        assert_eq!(weights.date_or_pagination, -50);
    }

    #[test]
    fn weights_load_from_json_file() {
        let temp = tempdir().expect("temp dir");
        let path = temp.path().join("pesos.json");
        fs::write(&path, r#"{ "taxpayer_label": 80, "long_name_min_chars": 12 }"#)
            .expect("write weights");

        let weights = ScoreWeights::load(&path).expect("weights load");
        assert_eq!(weights.taxpayer_label, 80);
        assert_eq!(weights.long_name_min_chars, 12);
        assert_eq!(weights.responsible_party_label, 100);
    }

    #[test]
    fn weights_load_reports_malformed_and_missing_files() {
        let temp = tempdir().expect("temp dir");
        let malformed = temp.path().join("quebrado.json");
        fs::write(&malformed, r#"{ "taxpayer_label": "alto" "#).expect("write weights");

        let err = ScoreWeights::load(&malformed).expect_err("malformed json must fail");
        assert!(err.to_string().starts_with("failed to parse weights file"));

        let err = ScoreWeights::load(&temp.path().join("ausente.json"))
            .expect_err("missing file must fail");
        assert!(err.to_string().starts_with("failed to read weights file"));
    }

    #[test]
    fn default_weights_keep_label_bonus_above_every_penalty() {
        let weights = ScoreWeights::default();
        let worst_penalty = weights.date_or_pagination
            + weights.document_marker_in_name
            + weights.organization_marker
            + weights.entity_name_in_name;

        assert!(weights.responsible_party_label > weights.taxpayer_label);
        assert!(weights.responsible_party_label + worst_penalty > weights.date_or_pagination);
        assert!(weights.date_or_pagination < weights.document_marker_in_name);
    }

    #[test]
    fn config_modes_serialize_as_kebab_case() {
        let json = serde_json::to_value(ExtractionConfig::default()).expect("config serializes");
        assert_eq!(json["match_mode"], "require-label");
        assert_eq!(json["dedup_key"], "document-and-number");
        assert_eq!(json["org_penalty"], "exempt-taxpayer");
    }
}
