use std::fs;
use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result, bail};
use tracing::warn;

use crate::model::Page;

/// Supplies the ordered page texts of one brief.
pub trait PageSource {
    fn pages(&self, path: &Path) -> Result<Vec<Page>>;
}

/// Text-layer extraction through poppler's `pdftotext`.
#[derive(Debug, Clone, Default)]
pub struct PdftotextSource {
    pub max_pages_per_doc: Option<usize>,
}

impl PdftotextSource {
    pub fn new(max_pages_per_doc: Option<usize>) -> Self {
        Self { max_pages_per_doc }
    }
}

impl PageSource for PdftotextSource {
    fn pages(&self, pdf_path: &Path) -> Result<Vec<Page>> {
        let mut command = Command::new("pdftotext");
        command
            .arg("-layout")
            .arg("-enc")
            .arg("UTF-8")
            .arg("-f")
            .arg("1");
        if let Some(max_pages) = self.max_pages_per_doc {
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

        Ok(pages_from_form_feeds(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Pre-extracted pages stored as a JSON array of `{page_number, text}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonPagesSource;

impl PageSource for JsonPagesSource {
    fn pages(&self, path: &Path) -> Result<Vec<Page>> {
        let raw = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        let pages: Vec<Page> = serde_json::from_slice(&raw)
            .with_context(|| format!("failed to parse pages json: {}", path.display()))?;

        for (index, page) in pages.iter().enumerate() {
            if page.number != index + 1 {
                warn!(
                    path = %path.display(),
                    position = index + 1,
                    page_number = page.number,
                    "page numbers are not sequential from 1"
                );
                break;
            }
        }

        Ok(pages)
    }
}

pub fn command_available(program: &str) -> bool {
    Command::new(program).arg("-v").output().is_ok()
}

/// Splits pdftotext output on form feeds into 1-indexed pages, dropping the
/// blank pages it leaves at the end.
pub fn pages_from_form_feeds(raw: &str) -> Vec<Page> {
    let mut chunks: Vec<String> = raw
        .split('\u{000C}')
        .map(|chunk| chunk.replace('\u{0000}', ""))
        .collect();

    while let Some(last_page) = chunks.last() {
        if last_page.trim().is_empty() {
            chunks.pop();
            continue;
        }
        break;
    }

    chunks
        .into_iter()
        .enumerate()
        .map(|(index, text)| Page::new(index + 1, text))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_feeds_separate_pages_and_trailing_blanks_are_dropped() {
        let raw = "COVER\u{000C}TABLE OF AUTHORITIES\u{0000}\u{000C}ARGUMENT\n\u{000C}\n\u{000C}";
        let pages = pages_from_form_feeds(raw);

        assert_eq!(
            pages,
            vec![
                Page::new(1, "COVER"),
                Page::new(2, "TABLE OF AUTHORITIES"),
                Page::new(3, "ARGUMENT\n"),
            ]
        );
    }

    #[test]
    fn blank_pages_inside_the_document_are_kept() {
        let pages = pages_from_form_feeds("COVER\u{000C}\u{000C}ARGUMENT");
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[1], Page::new(2, ""));
    }

    #[test]
    fn json_pages_source_reads_extractor_output() {
        let dir = std::env::temp_dir().join(format!("toa_split_pages_{}", std::process::id()));
        fs::create_dir_all(&dir).expect("temp dir should be created");
        let path = dir.join("brief_pages.json");
        fs::write(
            &path,
            r#"[{"page_number": 1, "text": "COVER"}, {"number": 2, "text": "TABLE OF AUTHORITIES"}]"#,
        )
        .expect("pages json should be written");

        let pages = JsonPagesSource.pages(&path).expect("pages should load");
        assert_eq!(
            pages,
            vec![Page::new(1, "COVER"), Page::new(2, "TABLE OF AUTHORITIES")]
        );

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn json_pages_source_reports_malformed_input() {
        let dir = std::env::temp_dir().join(format!("toa_split_bad_pages_{}", std::process::id()));
        fs::create_dir_all(&dir).expect("temp dir should be created");
        let path = dir.join("broken.json");
        fs::write(&path, "{not json").expect("file should be written");

        let error = JsonPagesSource.pages(&path).expect_err("malformed json should fail");
        assert!(error.to_string().contains("failed to parse pages json"));

        fs::remove_dir_all(&dir).ok();
    }
}
