//! Word document (.docx) raw text extraction via docx-rs.
//!
//! Formatting is discarded. Every paragraph, including those nested in table
//! cells, becomes one block of text; blocks are separated by a blank line.

use docx_rs::{DocumentChild, Paragraph, ParagraphChild, RunChild, TableCellContent};
use tracing::warn;

use super::ExtractionError;

const BLOCK_SEPARATOR: &str = "\n\n";

pub fn extract_text(data: &[u8]) -> Result<String, ExtractionError> {
    let doc = docx_rs::read_docx(data).map_err(|e| {
        warn!("DOCX parsing failed: {e}");
        ExtractionError::DocxUnreadable(e.to_string())
    })?;

    let mut blocks = Vec::new();
    for child in &doc.document.children {
        match child {
            DocumentChild::Paragraph(para) => blocks.push(paragraph_text(para)),
            DocumentChild::Table(table) => {
                for row in &table.rows {
                    let docx_rs::TableChild::TableRow(tr) = row;
                    for cell in &tr.cells {
                        let docx_rs::TableRowChild::TableCell(tc) = cell;
                        for content in &tc.children {
                            if let TableCellContent::Paragraph(para) = content {
                                blocks.push(paragraph_text(para));
                            }
                        }
                    }
                }
            }
            _ => {}
        }
    }

    Ok(blocks.join(BLOCK_SEPARATOR).trim().to_string())
}

fn paragraph_text(para: &Paragraph) -> String {
    let mut out = String::new();
    push_children(&para.children, &mut out);
    out
}

fn push_children(children: &[ParagraphChild], out: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for run_child in &run.children {
                    match run_child {
                        RunChild::Text(text) => out.push_str(&text.text),
                        RunChild::Tab(_) => out.push('\t'),
                        RunChild::Break(_) => out.push('\n'),
                        _ => {}
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => push_children(&link.children, out),
            _ => {}
        }
    }
}
