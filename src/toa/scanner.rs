use anyhow::{Context, Result};
use regex::Regex;

use crate::model::Page;

// Headings that open the section following a table of authorities. Matched
// against the trimmed, upper-cased line.
const END_MARKERS: [(&str, &str); 11] = [
    ("introduction", r"^INTRODUCTION\b"),
    ("preliminary_statement", r"^PRELIMINARY\s+STATEMENT\b"),
    (
        "statement_of_case",
        r"^STATEMENT\s+OF\s+(?:THE\s+)?(?:CASE|FACTS|ISSUES)",
    ),
    ("statement_of_jurisdiction", r"^STATEMENT\s+OF\s+JURISDICTION"),
    ("jurisdictional_statement", r"^JURISDICTIONAL\s+STATEMENT"),
    ("opinions_below", r"^OPINIONS?\s+BELOW"),
    ("questions_presented", r"^QUESTIONS?\s+PRESENTED"),
    ("issues_presented", r"^ISSUES?\s+PRESENTED"),
    ("summary_of_argument", r"^SUMMARY\s+OF\s+(?:THE\s+)?ARGUMENT"),
    ("argument", r"^ARGUMENT\b"),
    ("numbered_section", r"^I\.\s+"),
];

/// 0-based page indices bounding a table of authorities.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ScanBounds {
    pub start: Option<usize>,
    pub end: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct PageScanner {
    heading: Regex,
    end_markers: Vec<(&'static str, Regex)>,
}

impl PageScanner {
    pub fn new() -> Result<Self> {
        let end_markers = END_MARKERS
            .iter()
            .map(|(name, pattern)| {
                Regex::new(pattern)
                    .with_context(|| format!("failed to compile end marker regex: {name}"))
                    .map(|regex| (*name, regex))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            heading: Regex::new(r"\bTABLE\s+OF\s+AUTHORITIES\b")
                .context("failed to compile table heading regex")?,
            end_markers,
        })
    }

    /// Finds the first page carrying the table heading and the first later
    /// page that opens the next section. The heading page itself is never
    /// checked for an end marker.
    pub fn scan(&self, pages: &[Page]) -> ScanBounds {
        let Some(start) = pages
            .iter()
            .position(|page| self.is_table_heading(&page.text))
        else {
            return ScanBounds::default();
        };

        let end = pages
            .iter()
            .enumerate()
            .skip(start + 1)
            .find(|(_, page)| self.end_marker(&page.text).is_some())
            .map(|(index, _)| index);

        ScanBounds {
            start: Some(start),
            end,
        }
    }

    pub fn is_table_heading(&self, text: &str) -> bool {
        self.heading.is_match(&text.to_uppercase())
    }

    /// Name of the first end marker found on the page, if any. Lines that
    /// mention TABLE are continued table headings and never qualify.
    pub fn end_marker(&self, text: &str) -> Option<&'static str> {
        text.lines()
            .map(|line| line.trim().to_uppercase())
            .filter(|line| !line.contains("TABLE"))
            .find_map(|line| {
                self.end_markers
                    .iter()
                    .find(|(_, regex)| regex.is_match(&line))
                    .map(|(name, _)| *name)
            })
    }
}
