use anyhow::{Context, Result};
use regex::Regex;

use crate::model::Category;

// Evaluated top to bottom, first match wins. RULES must stay ahead of
// REGULATIONS so "RULES AND REGULATIONS" lands in Rules.
const CATEGORY_RULES: [(&str, Category); 9] = [
    (r"^CASES\b", Category::Cases),
    (r"^STATUTES?\b", Category::Statutes),
    (
        r"^CONSTITUTIONAL\s+PROVISIONS?\b",
        Category::ConstitutionalProvisions,
    ),
    (r"^RULES?\b", Category::Rules),
    (r"^REGULATIONS?\b", Category::Regulations),
    (r"^TREAT(?:IS)?ES?\b", Category::Treatises),
    (r"^OTHER\s+AUTHORITIES\b", Category::OtherAuthorities),
    (r"^SECONDARY\s+(?:SOURCES|AUTHORITIES)\b", Category::Treatises),
    (r"^LEGISLATIVE\s+MATERIALS?\b", Category::OtherAuthorities),
];

/// Recognizes category header lines such as `CASES` or `Other Authorities`.
#[derive(Debug, Clone)]
pub struct CategoryClassifier {
    rules: Vec<(Regex, Category)>,
}

impl CategoryClassifier {
    pub fn new() -> Result<Self> {
        let rules = CATEGORY_RULES
            .iter()
            .map(|(pattern, category)| {
                Regex::new(&format!("(?i){pattern}"))
                    .with_context(|| format!("failed to compile category regex for {category}"))
                    .map(|regex| (regex, *category))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { rules })
    }

    pub fn classify(&self, line: &str) -> Option<Category> {
        let line = line.trim();
        self.rules
            .iter()
            .find(|(regex, _)| regex.is_match(line))
            .map(|(_, category)| *category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> CategoryClassifier {
        CategoryClassifier::new().expect("category rules should compile")
    }

    #[test]
    fn rules_take_priority_over_regulations() {
        assert_eq!(
            classifier().classify("RULES AND REGULATIONS"),
            Some(Category::Rules)
        );
        assert_eq!(
            classifier().classify("Regulations"),
            Some(Category::Regulations)
        );
    }

    #[test]
    fn classify_matches_headers_case_insensitively() {
        let classifier = classifier();
        assert_eq!(classifier.classify("  Cases  "), Some(Category::Cases));
        assert_eq!(classifier.classify("Statute"), Some(Category::Statutes));
        assert_eq!(
            classifier.classify("CONSTITUTIONAL PROVISIONS"),
            Some(Category::ConstitutionalProvisions)
        );
        assert_eq!(classifier.classify("Treatise"), Some(Category::Treatises));
        assert_eq!(classifier.classify("TREATISES"), Some(Category::Treatises));
        assert_eq!(
            classifier.classify("Other Authorities"),
            Some(Category::OtherAuthorities)
        );
    }

    #[test]
    fn secondary_and_legislative_headers_fold_into_broader_groups() {
        let classifier = classifier();
        assert_eq!(
            classifier.classify("SECONDARY SOURCES"),
            Some(Category::Treatises)
        );
        assert_eq!(
            classifier.classify("Secondary Authorities"),
            Some(Category::Treatises)
        );
        assert_eq!(
            classifier.classify("LEGISLATIVE MATERIALS"),
            Some(Category::OtherAuthorities)
        );
    }

    #[test]
    fn citation_lines_are_not_headers() {
        let classifier = classifier();
        assert_eq!(classifier.classify("Smith v. Jones .......... 12"), None);
        assert_eq!(classifier.classify("Casesworth v. Doe, 1 F.3d 2"), None);
        assert_eq!(classifier.classify(""), None);
    }
}
