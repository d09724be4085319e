use std::collections::BTreeMap;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::cli::StatusArgs;
use crate::model::{BriefRecord, Category, category_counts};
use crate::util::{files_with_extension, read_json};

#[derive(Debug, Default, PartialEq, Eq)]
struct BriefSummary {
    brief_count: usize,
    citation_count: usize,
    by_category: BTreeMap<Category, usize>,
    briefs_without_citations: Vec<String>,
}

pub fn run(args: StatusArgs) -> Result<()> {
    info!(brief_dir = %args.brief_dir.display(), "status requested");

    let mut records = Vec::new();
    for path in files_with_extension(&args.brief_dir, "json")? {
        match read_json::<BriefRecord>(&path) {
            Ok(record) => records.push(record),
            Err(err) => debug!(path = %path.display(), error = %err, "skipping non-brief json"),
        }
    }

    if records.is_empty() {
        warn!(brief_dir = %args.brief_dir.display(), "no brief json files found");
        return Ok(());
    }

    let summary = summarize(&records);
    info!(
        briefs = summary.brief_count,
        citations = summary.citation_count,
        "brief summary"
    );
    for (category, count) in &summary.by_category {
        info!(category = %category, count, "citations by category");
    }
    for source in &summary.briefs_without_citations {
        warn!(source = %source, "brief has no parsed citations");
    }

    Ok(())
}

fn summarize(records: &[BriefRecord]) -> BriefSummary {
    let mut summary = BriefSummary {
        brief_count: records.len(),
        ..BriefSummary::default()
    };

    for record in records {
        summary.citation_count += record.toa_citations.len();
        for (category, count) in category_counts(&record.toa_citations) {
            *summary.by_category.entry(category).or_insert(0) += count;
        }
        if record.toa_citations.is_empty() {
            summary.briefs_without_citations.push(record.source.clone());
        }
    }

    summary
}
