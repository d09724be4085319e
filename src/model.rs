use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// One page of extracted brief text. `number` is 1-indexed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    #[serde(alias = "page_number")]
    pub number: usize,
    pub text: String,
}

impl Page {
    pub fn new(number: usize, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
        }
    }
}

/// Authority grouping taken from the most recent header line in a table of authorities.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Cases,
    Statutes,
    #[serde(rename = "Constitutional Provisions")]
    ConstitutionalProvisions,
    Rules,
    Regulations,
    Treatises,
    #[serde(rename = "Other Authorities")]
    OtherAuthorities,
    Unknown,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cases => "Cases",
            Self::Statutes => "Statutes",
            Self::ConstitutionalProvisions => "Constitutional Provisions",
            Self::Rules => "Rules",
            Self::Regulations => "Regulations",
            Self::Treatises => "Treatises",
            Self::OtherAuthorities => "Other Authorities",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub text: String,
    pub category: Category,
    /// Raw page reference text, e.g. `12`, `14, 22` or `5, 9, passim`.
    pub pages: String,
}

impl Citation {
    pub fn new(text: impl Into<String>, category: Category, pages: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category,
            pages: pages.into(),
        }
    }
}

/// A brief split into its table of authorities and the remaining body.
///
/// Page fields are 1-indexed. Only built when a table heading was found, so
/// the start and end pages are always present here; the nullable form lives
/// on [`BriefRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub total_pages: usize,
    pub toa_start_page: usize,
    pub toa_end_page: usize,
    pub toa_text: String,
    pub citations: Vec<Citation>,
    pub body_text: String,
    pub body_pages: BTreeMap<usize, String>,
}

/// Serialized per-brief output consumed by citation-matching tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BriefRecord {
    pub source: String,
    pub total_pages: usize,
    pub toa_start_page: Option<usize>,
    pub toa_end_page: Option<usize>,
    pub toa_text: String,
    pub toa_citations: Vec<Citation>,
    pub body_text: String,
    pub body_pages: BTreeMap<usize, String>,
}

impl BriefRecord {
    pub fn new(source: impl Into<String>, document: Document) -> Self {
        Self {
            source: source.into(),
            total_pages: document.total_pages,
            toa_start_page: Some(document.toa_start_page),
            toa_end_page: Some(document.toa_end_page),
            toa_text: document.toa_text,
            toa_citations: document.citations,
            body_text: document.body_text,
            body_pages: document.body_pages,
        }
    }
}

pub fn category_counts(citations: &[Citation]) -> BTreeMap<Category, usize> {
    let mut counts = BTreeMap::new();
    for citation in citations {
        *counts.entry(citation.category).or_insert(0) += 1;
    }
    counts
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BriefStatus {
    Split,
    EndInferred,
    TableNotFound,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BriefRunEntry {
    pub source: String,
    pub status: BriefStatus,
    pub sha256: Option<String>,
    pub total_pages: Option<usize>,
    pub toa_start_page: Option<usize>,
    pub toa_end_page: Option<usize>,
    pub citation_count: usize,
    pub output_path: Option<String>,
    pub error: Option<String>,
}

impl BriefRunEntry {
    pub fn failed(source: impl Into<String>, error: String) -> Self {
        Self {
            source: source.into(),
            status: BriefStatus::Failed,
            sha256: None,
            total_pages: None,
            toa_start_page: None,
            toa_end_page: None,
            citation_count: 0,
            output_path: None,
            error: Some(error),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractCounts {
    pub pdf_count: usize,
    pub split_count: usize,
    pub end_inferred_count: usize,
    pub table_not_found_count: usize,
    pub failed_count: usize,
    pub citation_count: usize,
}

impl ExtractCounts {
    pub fn from_entries(entries: &[BriefRunEntry]) -> Self {
        let mut counts = Self {
            pdf_count: entries.len(),
            ..Self::default()
        };
        for entry in entries {
            match entry.status {
                BriefStatus::Split => counts.split_count += 1,
                BriefStatus::EndInferred => counts.end_inferred_count += 1,
                BriefStatus::TableNotFound => counts.table_not_found_count += 1,
                BriefStatus::Failed => counts.failed_count += 1,
            }
            counts.citation_count += entry.citation_count;
        }
        counts
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmenterSettings {
    pub max_toa_pages: usize,
    pub end_page_policy: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractRunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub started_at: String,
    pub updated_at: String,
    pub input_dir: String,
    pub output_dir: String,
    pub dry_run: bool,
    pub settings: SegmenterSettings,
    pub counts: ExtractCounts,
    pub briefs: Vec<BriefRunEntry>,
    pub warnings: Vec<String>,
}
