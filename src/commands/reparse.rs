use anyhow::Result;
use tracing::{info, warn};

use crate::cli::ReparseArgs;
use crate::model::{BriefRecord, Citation};
use crate::toa::{DocumentSegmenter, SegmenterConfig};
use crate::util::{read_json, write_json_pretty};

pub fn run(args: ReparseArgs) -> Result<()> {
    let mut record: BriefRecord = read_json(&args.brief)?;
    let segmenter = DocumentSegmenter::new(SegmenterConfig::default())?;
    let fresh = segmenter.parse_citations(&record.toa_text);

    let Some(index) = first_divergence(&record.toa_citations, &fresh) else {
        info!(
            source = %record.source,
            citations = fresh.len(),
            "stored citations match a fresh parse"
        );
        return Ok(());
    };

    let text_at = |citations: &[Citation]| {
        citations
            .get(index)
            .map(|citation| citation.text.clone())
            .unwrap_or_default()
    };
    warn!(
        source = %record.source,
        stored = record.toa_citations.len(),
        fresh = fresh.len(),
        first_difference = index,
        stored_text = %text_at(&record.toa_citations),
        fresh_text = %text_at(&fresh),
        "stored citations differ from a fresh parse"
    );

    if args.write {
        record.toa_citations = fresh;
        write_json_pretty(&args.brief, &record)?;
        info!(path = %args.brief.display(), "rewrote brief citations");
    }

    Ok(())
}

/// Index of the first position where the two sequences disagree, including
/// a length mismatch.
fn first_divergence(stored: &[Citation], fresh: &[Citation]) -> Option<usize> {
    stored
        .iter()
        .zip(fresh)
        .position(|(left, right)| left != right)
        .or_else(|| (stored.len() != fresh.len()).then(|| stored.len().min(fresh.len())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Category;

    fn citation(text: &str) -> Citation {
        Citation::new(text, Category::Cases, "1")
    }

    #[test]
    fn identical_sequences_have_no_divergence() {
        let citations = vec![citation("Smith v. Jones"), citation("Doe v. Roe")];
        assert_eq!(first_divergence(&citations, &citations.clone()), None);
    }

    #[test]
    fn divergence_reports_first_changed_or_missing_entry() {
        let stored = vec![citation("Smith v. Jones"), citation("Doe v. Roe")];
        let changed = vec![citation("Smith v. Jones"), citation("Doe v. Rowe")];
        assert_eq!(first_divergence(&stored, &changed), Some(1));

        let shorter = vec![citation("Smith v. Jones")];
        assert_eq!(first_divergence(&stored, &shorter), Some(1));
        assert_eq!(first_divergence(&[], &shorter), Some(0));
    }
}
