use anyhow::{Context, Result};
use regex::Regex;

use crate::model::{Category, Citation};
use crate::toa::category::CategoryClassifier;

/// Outcome of reading a single table-of-authorities line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineVerdict {
    Noise,
    Header(Category),
    Entry(Citation),
    /// A leader split was found but the text before it is too short.
    Rejected,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum LineRule {
    Noise,
    CategoryHeader,
    LeaderSplit,
    TrailingPages,
}

// Priority order. A line takes the verdict of the first rule that fires;
// a line no rule claims is dropped.
const LINE_RULES: [LineRule; 4] = [
    LineRule::Noise,
    LineRule::CategoryHeader,
    LineRule::LeaderSplit,
    LineRule::TrailingPages,
];

const NOISE_PATTERNS: [(&str, &str); 3] = [
    (
        "page_label",
        r"(?i)^(?:PAGE\(?S?\)?|TABLE\s+OF\s+AUTHORITIES)(?:\W|$)",
    ),
    ("page_number", r"^\d+$"),
    ("roman_page_number", r"(?i)^[ivxlcdm]+$"),
];

const MIN_CITATION_CHARS: usize = 4;
const MIN_TRAILING_LINE_CHARS: usize = 6;

#[derive(Debug, Clone)]
pub struct CitationLineParser {
    classifier: CategoryClassifier,
    noise: Vec<Regex>,
    leader: Regex,
    trailing_pages: Regex,
}

impl CitationLineParser {
    pub fn new() -> Result<Self> {
        let noise = NOISE_PATTERNS
            .iter()
            .map(|(name, pattern)| {
                Regex::new(pattern)
                    .with_context(|| format!("failed to compile noise regex: {name}"))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            classifier: CategoryClassifier::new()?,
            noise,
            leader: Regex::new(r"\s*(?:\.{2,}|(?:\.\s){2,}\.|…+)\s*|\s{3,}")
                .context("failed to compile dot-leader regex")?,
            trailing_pages: Regex::new(
                r"^(?P<text>.+?)\s+(?P<pages>\d+(?:\s*,\s*\d+)*(?:\s*,?\s*(?i:passim))?)$",
            )
            .context("failed to compile trailing page list regex")?,
        })
    }

    pub fn classifier(&self) -> &CategoryClassifier {
        &self.classifier
    }

    /// Citation carried by `line`, if any. Headers, page furniture and
    /// unparseable lines all yield `None`.
    pub fn parse(&self, line: &str, current: Option<Category>) -> Option<Citation> {
        match self.evaluate(line, current)? {
            LineVerdict::Entry(citation) => Some(citation),
            LineVerdict::Noise | LineVerdict::Header(_) | LineVerdict::Rejected => None,
        }
    }

    pub fn evaluate(&self, line: &str, current: Option<Category>) -> Option<LineVerdict> {
        let line = line.trim();
        LINE_RULES
            .iter()
            .find_map(|rule| self.apply(*rule, line, current))
    }

    fn apply(&self, rule: LineRule, line: &str, current: Option<Category>) -> Option<LineVerdict> {
        match rule {
            LineRule::Noise => self.is_noise(line).then_some(LineVerdict::Noise),
            LineRule::CategoryHeader => self.classifier.classify(line).map(LineVerdict::Header),
            LineRule::LeaderSplit => {
                let (text, pages) = self.split_at_leader(line)?;
                if text.chars().count() < MIN_CITATION_CHARS {
                    return Some(LineVerdict::Rejected);
                }
                Some(LineVerdict::Entry(Citation::new(
                    text,
                    current.unwrap_or(Category::Unknown),
                    pages,
                )))
            }
            LineRule::TrailingPages => {
                let category = current?;
                if line.chars().count() < MIN_TRAILING_LINE_CHARS || line.starts_with("Page") {
                    return None;
                }
                self.split_trailing_pages(line)
                    .map(|(text, pages)| LineVerdict::Entry(Citation::new(text, category, pages)))
            }
        }
    }

    fn is_noise(&self, line: &str) -> bool {
        line.is_empty() || self.noise.iter().any(|regex| regex.is_match(line))
    }

    /// Splits at the last dot leader or wide gap that still leaves page text
    /// after it. A leader opening the line yields empty citation text, which
    /// the caller rejects.
    fn split_at_leader<'a>(&self, line: &'a str) -> Option<(&'a str, &'a str)> {
        let separator = self
            .leader
            .find_iter(line)
            .filter(|found| found.end() < line.len())
            .last()?;

        let text = line[..separator.start()].trim();
        let pages = line[separator.end()..].trim();
        if pages.is_empty() {
            return None;
        }
        Some((text, pages))
    }

    fn split_trailing_pages<'a>(&self, line: &'a str) -> Option<(&'a str, &'a str)> {
        let captures = self.trailing_pages.captures(line)?;
        let text = captures.name("text")?.as_str().trim();
        let pages = captures.name("pages")?.as_str().trim();
        if text.chars().count() < MIN_CITATION_CHARS {
            return None;
        }
        Some((text, pages))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> CitationLineParser {
        CitationLineParser::new().expect("line parser regexes should compile")
    }

    #[test]
    fn dot_leader_splits_text_from_pages() {
        let citation = parser().parse("Smith v. Jones .......... 12", Some(Category::Cases));
        assert_eq!(
            citation,
            Some(Citation::new("Smith v. Jones", Category::Cases, "12"))
        );
    }

    #[test]
    fn abbreviation_periods_are_not_leaders() {
        let citation = parser().parse("28 U.S.C. § 1331 ... 5", Some(Category::Statutes));
        assert_eq!(
            citation,
            Some(Citation::new("28 U.S.C. § 1331", Category::Statutes, "5"))
        );
    }

    #[test]
    fn spaced_leaders_and_wide_gaps_split_the_line() {
        let parser = parser();
        assert_eq!(
            parser.parse("Doe v. Roe, 1 F.3d 2 (1st Cir. 1993) . . . . . . 7, 9", None),
            Some(Citation::new(
                "Doe v. Roe, 1 F.3d 2 (1st Cir. 1993)",
                Category::Unknown,
                "7, 9"
            ))
        );
        assert_eq!(
            parser.parse("Fed. R. Civ. P. 12(b)(6)        3, passim", Some(Category::Rules)),
            Some(Citation::new(
                "Fed. R. Civ. P. 12(b)(6)",
                Category::Rules,
                "3, passim"
            ))
        );
    }

    #[test]
    fn last_separator_wins() {
        let citation = parser().parse(
            "Brown v. Board    347 U.S. 483 (1954) ........ 5",
            Some(Category::Cases),
        );
        assert_eq!(
            citation,
            Some(Citation::new(
                "Brown v. Board    347 U.S. 483 (1954)",
                Category::Cases,
                "5"
            ))
        );
    }

    #[test]
    fn trailing_page_list_is_used_without_leader() {
        let citation = parser().parse(
            "Restatement (Second) of Torts § 46 14, 22",
            Some(Category::Treatises),
        );
        assert_eq!(
            citation,
            Some(Citation::new(
                "Restatement (Second) of Torts § 46",
                Category::Treatises,
                "14, 22"
            ))
        );
    }

    #[test]
    fn trailing_page_list_accepts_passim() {
        let citation = parser().parse("Marbury v. Madison 5, 9, passim", Some(Category::Cases));
        assert_eq!(
            citation,
            Some(Citation::new(
                "Marbury v. Madison",
                Category::Cases,
                "5, 9, passim"
            ))
        );
    }

    #[test]
    fn trailing_page_list_needs_a_category() {
        assert_eq!(
            parser().parse("Restatement (Second) of Torts § 46 14, 22", None),
            None
        );
    }

    #[test]
    fn page_furniture_is_noise() {
        let parser = parser();
        for line in [
            "",
            "   ",
            "Page(s)",
            "Pages",
            "TABLE OF AUTHORITIES (continued)",
            "14",
            "iii",
            "XII",
        ] {
            assert_eq!(
                parser.evaluate(line, Some(Category::Cases)),
                Some(LineVerdict::Noise),
                "line {line:?} should be noise"
            );
        }
    }

    #[test]
    fn names_starting_with_page_are_not_labels() {
        let citation = parser().parse("Pagel v. Kemp .... 3", Some(Category::Cases));
        assert_eq!(
            citation,
            Some(Citation::new("Pagel v. Kemp", Category::Cases, "3"))
        );
    }

    #[test]
    fn headers_are_reported_not_parsed() {
        let parser = parser();
        assert_eq!(
            parser.evaluate("STATUTES", Some(Category::Cases)),
            Some(LineVerdict::Header(Category::Statutes))
        );
        assert_eq!(parser.parse("STATUTES", Some(Category::Cases)), None);
    }

    #[test]
    fn short_citation_text_is_rejected() {
        let parser = parser();
        assert_eq!(
            parser.evaluate("Id. ...... 4", Some(Category::Cases)),
            Some(LineVerdict::Rejected)
        );
        assert_eq!(parser.parse("Ab 12", Some(Category::Cases)), None);
    }

    #[test]
    fn leader_opening_a_wrapped_line_is_rejected() {
        let parser = parser();
        assert_eq!(
            parser.evaluate(".......................... 12", Some(Category::Cases)),
            Some(LineVerdict::Rejected)
        );
        assert_eq!(
            parser.evaluate("… 7", Some(Category::Statutes)),
            Some(LineVerdict::Rejected)
        );
    }

    #[test]
    fn unparseable_lines_are_dropped() {
        let parser = parser();
        assert_eq!(
            parser.evaluate("Smith v. Jones, 100 F.3d 200 (9th Cir.", Some(Category::Cases)),
            None
        );
        assert_eq!(parser.parse("Smith v. Jones ........", Some(Category::Cases)), None);
    }
}
