//! Rendering collaborator seam.
//!
//! The viewer only talks to these traits; the PDFium backend lives in
//! [`crate::pdf`] and tests substitute in-memory documents.

use crate::pdf::PdfResult;
use doc_model::OutlineNode;
use image::RgbaImage;
use std::path::Path;

/// An opened document the viewer can rasterize and query.
pub trait Document {
    /// Total number of pages
    fn page_count(&self) -> u32;

    /// Rasterize a page at the given horizontal and vertical DPI
    fn render_page(&self, index: u32, dpi: f32) -> PdfResult<RgbaImage>;

    /// Hierarchical table of contents, empty when the document has none
    fn outline(&self) -> Vec<OutlineNode>;

    /// Case-insensitive native text search on one page
    fn find_text(&self, index: u32, query: &str) -> PdfResult<bool>;

    /// Plain text of one page
    fn page_text(&self, index: u32) -> PdfResult<String>;

    /// Native search first; substring match on extracted text when the
    /// native search misses or is unavailable.
    fn page_matches(&self, index: u32, query: &str) -> bool {
        match self.find_text(index, query) {
            Ok(true) => return true,
            Ok(false) => {}
            Err(err) => log::debug!("native search failed on page {index}: {err}"),
        }

        match self.page_text(index) {
            Ok(text) => text_contains(&text, query),
            Err(err) => {
                log::warn!("text extraction failed on page {index}: {err}");
                false
            }
        }
    }
}

/// Opens documents by path.
pub trait DocumentLoader {
    fn load(&self, path: &Path) -> PdfResult<Box<dyn Document>>;
}

pub fn text_contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
