use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use chrono::Utc;
use tracing::{info, warn};

use crate::cli::ExtractArgs;
use crate::commands::log_category_counts;
use crate::model::{
    BriefRecord, BriefRunEntry, BriefStatus, ExtractCounts, ExtractRunManifest, SegmenterSettings,
};
use crate::pages::{PageSource, PdftotextSource, command_available};
use crate::toa::{DocumentSegmenter, EndBoundary, SegmentOutcome};
use crate::util::{
    file_name_string, files_with_extension, now_utc_string, sha256_file, utc_compact_string,
    write_json_pretty,
};

pub fn run(args: ExtractArgs) -> Result<()> {
    let started_ts = Utc::now();
    let started_at = now_utc_string();
    let run_id = format!("run-{}", utc_compact_string(started_ts));

    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| args.input_dir.clone());
    let manifest_path = args.manifest_path.clone().unwrap_or_else(|| {
        output_dir.join(format!(
            "toa_split_run_{}.json",
            utc_compact_string(started_ts)
        ))
    });

    let pdf_paths = files_with_extension(&args.input_dir, "pdf")?;
    if pdf_paths.is_empty() {
        bail!("no PDFs found in {}", args.input_dir.display());
    }
    if !command_available("pdftotext") {
        bail!("pdftotext is required for extract but could not be executed");
    }

    info!(
        input_dir = %args.input_dir.display(),
        pdf_count = pdf_paths.len(),
        run_id = %run_id,
        "starting extract"
    );

    let config = args.segment.config();
    let segmenter = DocumentSegmenter::new(config)?;
    let source = PdftotextSource::new(args.max_pages_per_doc);

    let mut briefs = Vec::with_capacity(pdf_paths.len());
    let mut warnings = Vec::new();
    for pdf_path in &pdf_paths {
        let entry = match process_brief(pdf_path, &source, &segmenter, &output_dir, args.dry_run) {
            Ok(entry) => entry,
            Err(err) => failed_entry(pdf_path, &err),
        };

        if let Some(warning) = entry_warning(&entry) {
            warnings.push(warning);
        }
        briefs.push(entry);
    }

    let counts = ExtractCounts::from_entries(&briefs);
    info!(
        pdf_count = counts.pdf_count,
        split = counts.split_count,
        end_inferred = counts.end_inferred_count,
        table_not_found = counts.table_not_found_count,
        failed = counts.failed_count,
        citations = counts.citation_count,
        "extract completed"
    );

    let manifest = ExtractRunManifest {
        manifest_version: 1,
        run_id,
        started_at,
        updated_at: now_utc_string(),
        input_dir: args.input_dir.display().to_string(),
        output_dir: output_dir.display().to_string(),
        dry_run: args.dry_run,
        settings: SegmenterSettings {
            max_toa_pages: config.max_toa_pages,
            end_page_policy: config.end_page.as_str().to_string(),
        },
        counts,
        briefs,
        warnings,
    };

    if args.dry_run {
        info!(path = %manifest_path.display(), "dry-run: skipped writing run manifest");
        return Ok(());
    }

    write_json_pretty(&manifest_path, &manifest)?;
    info!(path = %manifest_path.display(), "wrote run manifest");

    Ok(())
}

fn process_brief(
    pdf_path: &Path,
    source: &dyn PageSource,
    segmenter: &DocumentSegmenter,
    output_dir: &Path,
    dry_run: bool,
) -> Result<BriefRunEntry> {
    let name = file_name_string(pdf_path)?;
    let sha256 = sha256_file(pdf_path)?;
    let pages = source.pages(pdf_path)?;
    info!(source = %name, total_pages = pages.len(), "extracted pages");

    let mut entry = BriefRunEntry {
        source: name.clone(),
        status: BriefStatus::TableNotFound,
        sha256: Some(sha256),
        total_pages: Some(pages.len()),
        toa_start_page: None,
        toa_end_page: None,
        citation_count: 0,
        output_path: None,
        error: None,
    };

    let (document, end_boundary) = match segmenter.segment(&pages) {
        SegmentOutcome::Split {
            document,
            end_boundary,
        } => (document, end_boundary),
        SegmentOutcome::TableNotFound => {
            warn!(source = %name, "could not find table of authorities");
            return Ok(entry);
        }
    };

    if end_boundary == EndBoundary::Inferred {
        warn!(
            source = %name,
            toa_end_page = document.toa_end_page,
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
    log_category_counts(&name, &document.citations);

    entry.status = match end_boundary {
        EndBoundary::Detected => BriefStatus::Split,
        EndBoundary::Inferred => BriefStatus::EndInferred,
    };
    entry.toa_start_page = Some(document.toa_start_page);
    entry.toa_end_page = Some(document.toa_end_page);
    entry.citation_count = document.citations.len();

    let output_path = brief_output_path(output_dir, pdf_path);
    let record = BriefRecord::new(name, document);
    if dry_run {
        info!(path = %output_path.display(), "dry-run: skipped writing brief");
    } else {
        write_json_pretty(&output_path, &record)?;
        info!(path = %output_path.display(), "wrote brief");
        entry.output_path = Some(output_path.display().to_string());
    }

    Ok(entry)
}

fn failed_entry(pdf_path: &Path, err: &anyhow::Error) -> BriefRunEntry {
    let name = file_name_string(pdf_path).unwrap_or_else(|_| pdf_path.display().to_string());
    warn!(source = %name, error = %err, "failed to process brief");
    BriefRunEntry::failed(name, format!("{err:#}"))
}

fn brief_output_path(output_dir: &Path, pdf_path: &Path) -> PathBuf {
    let stem = pdf_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "brief".to_string());
    output_dir.join(format!("{stem}.json"))
}

fn entry_warning(entry: &BriefRunEntry) -> Option<String> {
    match entry.status {
        BriefStatus::Split => None,
        BriefStatus::EndInferred => Some(format!(
            "{}: table of authorities end not found, assumed page {}",
            entry.source,
            entry.toa_end_page.unwrap_or_default()
        )),
        BriefStatus::TableNotFound => Some(format!(
            "{}: table of authorities not found",
            entry.source
        )),
        BriefStatus::Failed => Some(format!(
            "{}: {}",
            entry.source,
            entry.error.as_deref().unwrap_or("unknown error")
        )),
    }
}
