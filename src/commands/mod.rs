pub mod extract;
pub mod reparse;
pub mod split;
pub mod status;

use tracing::info;

use crate::model::{Citation, category_counts};

fn log_category_counts(source: &str, citations: &[Citation]) {
    for (category, count) in category_counts(citations) {
        info!(source = %source, category = %category, count, "citations by category");
    }
}
