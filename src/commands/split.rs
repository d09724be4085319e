use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use crate::cli::SplitArgs;
use crate::commands::log_category_counts;
use crate::model::{BriefRecord, Page};
use crate::pages::{JsonPagesSource, PageSource, PdftotextSource};
use crate::toa::{DocumentSegmenter, EndBoundary, SegmentOutcome};
use crate::util::{file_name_string, write_json_pretty};

pub fn run(args: SplitArgs) -> Result<()> {
    let (input, source): (&Path, Box<dyn PageSource>) = match (&args.pages, &args.pdf) {
        (Some(pages), _) => (pages.as_path(), Box::new(JsonPagesSource) as Box<dyn PageSource>),
        (None, Some(pdf)) => (
            pdf.as_path(),
            Box::new(PdftotextSource::new(args.max_pages_per_doc)) as Box<dyn PageSource>,
        ),
        (None, None) => bail!("either --pages or --pdf is required"),
    };

    let name = match &args.source {
        Some(name) => name.clone(),
        None => file_name_string(input)?,
    };
    let pages = source.pages(input)?;
    info!(source = %name, total_pages = pages.len(), "loaded pages");

    let segmenter = DocumentSegmenter::new(args.segment.config())?;
    let record = split_pages(&segmenter, &name, &pages)?;

    match &args.output {
        Some(path) => {
            write_json_pretty(path, &record)?;
            info!(path = %path.display(), "wrote brief");
        }
        None => {
            let json = serde_json::to_string_pretty(&record)
                .with_context(|| format!("failed to serialize brief for {name}"))?;
            println!("{json}");
        }
    }

    Ok(())
}

fn split_pages(
    segmenter: &DocumentSegmenter,
    name: &str,
    pages: &[Page],
) -> Result<BriefRecord> {
    let (document, end_boundary) = match segmenter.segment(pages) {
        SegmentOutcome::Split {
            document,
            end_boundary,
        } => (document, end_boundary),
        SegmentOutcome::TableNotFound => bail!("no table of authorities found in {name}"),
    };

    if end_boundary == EndBoundary::Inferred {
        warn!(
            source = %name,
            toa_end_page = document.toa_end_page,
            max_toa_pages = segmenter.config().max_toa_pages,
            "table of authorities end not found; assumed end page"
        );
    }
    info!(
        source = %name,
        toa_start_page = document.toa_start_page,
        toa_end_page = document.toa_end_page,
        citations = document.citations.len(),
        "split brief"
    );
    log_category_counts(name, &document.citations);

    Ok(BriefRecord::new(name, document))
}
