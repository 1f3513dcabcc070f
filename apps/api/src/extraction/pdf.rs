//! PDF text extraction via pdf-extract.

use tracing::{debug, warn};

use super::ExtractionError;

const PAGE_SEPARATOR: &str = "\n\n";

/// Extracts the text layer of a PDF, page by page.
///
/// Each page's fragments are joined with single spaces in text-layer order
/// (no reading-order correction) and pages are joined with a blank line.
pub fn extract_text(data: &[u8]) -> Result<String, ExtractionError> {
    // pdf-extract can panic on malformed fonts/glyphs instead of returning Err.
    let pages = match std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(data))
    {
        Ok(Ok(pages)) => pages,
        Ok(Err(e)) => {
            warn!("PDF extraction failed: {e}");
            return Err(ExtractionError::PdfUnreadable(e.to_string()));
        }
        Err(_) => {
            warn!("PDF extraction panicked, likely a malformed font or glyph table");
            return Err(ExtractionError::PdfUnreadable(
                "parser panicked on malformed content".to_string(),
            ));
        }
    };

    debug!("PDF opened with {} pages", pages.len());
    let text = join_pages(&pages);
    if text.is_empty() {
        return Err(ExtractionError::PdfUnreadable(
            "document has no text layer".to_string(),
        ));
    }
    Ok(text)
}

/// Flattens each page's fragments onto one line and stitches pages together.
fn join_pages(pages: &[String]) -> String {
    pages
        .iter()
        .map(|page| join_fragments(page))
        .collect::<Vec<_>>()
        .join(PAGE_SEPARATOR)
        .trim()
        .to_string()
}

fn join_fragments(page: &str) -> String {
    page.lines()
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
