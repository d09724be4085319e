use std::collections::BTreeMap;
use std::ops::Range;

use anyhow::Result;
use clap::ValueEnum;
use tracing::debug;

use crate::model::{Category, Citation, Document, Page};
use crate::toa::line_parser::CitationLineParser;
use crate::toa::scanner::PageScanner;

/// Where the page holding the end marker goes.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum EndPagePolicy {
    /// End page text is parsed as part of the table; the body starts after it.
    #[default]
    IncludeInToa,
    /// End page opens the body; the table keeps at least its first page.
    StartsBody,
}

impl EndPagePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::IncludeInToa => "include_in_toa",
            Self::StartsBody => "starts_body",
        }
    }

    /// Page index range of the table and the first body page index.
    fn split(self, start: usize, end: usize) -> (Range<usize>, usize) {
        match self {
            Self::IncludeInToa => (start..end + 1, end + 1),
            Self::StartsBody => {
                let stop = end.max(start + 1);
                (start..stop, stop)
            }
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SegmenterConfig {
    /// Pages assumed after the heading page when no end marker is found.
    pub max_toa_pages: usize,
    pub end_page: EndPagePolicy,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            max_toa_pages: 5,
            end_page: EndPagePolicy::default(),
        }
    }
}

impl SegmenterConfig {
    fn inferred_end(&self, start: usize, page_count: usize) -> usize {
        start
            .saturating_add(self.max_toa_pages)
            .min(page_count.saturating_sub(1))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EndBoundary {
    Detected,
    /// No end marker was found and the end page came from `max_toa_pages`.
    Inferred,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentOutcome {
    Split {
        document: Document,
        end_boundary: EndBoundary,
    },
    TableNotFound,
}

#[derive(Debug, Clone)]
pub struct DocumentSegmenter {
    scanner: PageScanner,
    parser: CitationLineParser,
    config: SegmenterConfig,
}

impl DocumentSegmenter {
    pub fn new(config: SegmenterConfig) -> Result<Self> {
        Ok(Self {
            scanner: PageScanner::new()?,
            parser: CitationLineParser::new()?,
            config,
        })
    }

    pub fn config(&self) -> SegmenterConfig {
        self.config
    }

    pub fn segment(&self, pages: &[Page]) -> SegmentOutcome {
        let bounds = self.scanner.scan(pages);
        let Some(start) = bounds.start else {
            return SegmentOutcome::TableNotFound;
        };

        let (end, end_boundary) = match bounds.end {
            Some(end) => (end, EndBoundary::Detected),
            None => (
                self.config.inferred_end(start, pages.len()),
                EndBoundary::Inferred,
            ),
        };

        let (toa_range, body_start) = self.config.end_page.split(start, end);
        let toa_text = join_page_text(&pages[toa_range]);
        let body = &pages[body_start..];
        let citations = self.parse_citations(&toa_text);

        debug!(
            toa_start_index = start,
            toa_end_index = end,
            body_start_index = body_start,
            citations = citations.len(),
            "segmented brief"
        );

        SegmentOutcome::Split {
            document: Document {
                total_pages: pages.len(),
                toa_start_page: start + 1,
                toa_end_page: end + 1,
                toa_text,
                citations,
                body_text: join_page_text(body),
                body_pages: body
                    .iter()
                    .enumerate()
                    .map(|(offset, page)| (body_start + offset + 1, page.text.clone()))
                    .collect::<BTreeMap<_, _>>(),
            },
            end_boundary,
        }
    }

    /// Reads table lines top to bottom. The current category is threaded
    /// through the fold and only changes on header lines.
    pub fn parse_citations(&self, toa_text: &str) -> Vec<Citation> {
        let (_, citations) = toa_text.lines().fold(
            (None::<Category>, Vec::new()),
            |(category, mut citations), line| {
                if let Some(next) = self.parser.classifier().classify(line) {
                    return (Some(next), citations);
                }
                if let Some(citation) = self.parser.parse(line, category) {
                    citations.push(citation);
                }
                (category, citations)
            },
        );
        citations
    }
}

fn join_page_text(pages: &[Page]) -> String {
    pages
        .iter()
        .map(|page| page.text.as_str())
        .collect::<Vec<&str>>()
        .join("\n")
}
