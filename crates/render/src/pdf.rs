//! PDFium-backed documents
//!
//! Implements [`Document`] and [`DocumentLoader`] on top of `pdfium-render`.

use crate::document::{Document, DocumentLoader};
use doc_model::{OutlineNode, POINTS_PER_INCH};
use image::RgbaImage;
use pdfium_render::prelude::*;
use std::path::Path;

/// Upper bound on outline nodes read from one document; guards against
/// bookmark trees that loop back on themselves.
const MAX_OUTLINE_NODES: usize = 10_000;

/// Errors that can occur during PDF operations
#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    /// Failed to bind the PDFium library
    #[error("PDFium initialization error: {0}")]
    InitializationError(String),

    /// Failed to load PDF document
    #[error("PDF load error: {0}")]
    LoadError(String),

    /// Invalid page index
    #[error("Invalid page index: {0}")]
    InvalidPageIndex(u32),

    /// Rendering error
    #[error("PDF render error: {0}")]
    RenderError(String),

    /// Text extraction or search error
    #[error("PDF text error: {0}")]
    TextError(String),
}

/// Result type for PDF operations
pub type PdfResult<T> = Result<T, PdfError>;

/// Opens documents through a single PDFium binding shared for the whole
/// process lifetime.
pub struct PdfiumLoader {
    pdfium: Result<&'static Pdfium, String>,
}

impl PdfiumLoader {
    /// Binds PDFium. A failed bind is kept and reported on every load so the
    /// application can still start and show the error inline.
    pub fn new() -> Self {
        let pdfium = init_pdfium().map(|pdfium| &*Box::leak(Box::new(pdfium)));
        match &pdfium {
            Ok(_) => log::info!("PDFium bound"),
            Err(err) => log::warn!("PDFium unavailable: {err}"),
        }

        Self { pdfium }
    }
}

impl Default for PdfiumLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentLoader for PdfiumLoader {
    fn load(&self, path: &Path) -> PdfResult<Box<dyn Document>> {
        let pdfium = self.pdfium.as_ref().map_err(|e| PdfError::InitializationError(e.clone()))?;
        Ok(Box::new(PdfDocument::open(pdfium, path)?))
    }
}

/// Initialize PDFium library
///
/// Search order:
/// 1. Executable's directory (for app bundles: .app/Contents/MacOS/)
/// 2. Current working directory
/// 3. System library paths
fn init_pdfium() -> Result<Pdfium, String> {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()));

    if let Some(ref dir) = exe_dir {
        if let Ok(bindings) =
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir))
        {
            return Ok(Pdfium::new(bindings));
        }
    }

    Ok(Pdfium::new(
        Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library())
            .map_err(|e| e.to_string())?,
    ))
}

/// PDF document handle
pub struct PdfDocument {
    document: pdfium_render::prelude::PdfDocument<'static>,
}

impl PdfDocument {
    pub fn open(pdfium: &'static Pdfium, path: &Path) -> PdfResult<Self> {
        let document = pdfium
            .load_pdf_from_file(path, None)
            .map_err(|e| PdfError::LoadError(e.to_string()))?;

        Ok(Self { document })
    }

    fn get_page(&self, index: u32) -> PdfResult<PdfPage<'_>> {
        let native = u16::try_from(index).map_err(|_| PdfError::InvalidPageIndex(index))?;
        self.document.pages().get(native).map_err(|_| PdfError::InvalidPageIndex(index))
    }
}

impl Document for PdfDocument {
    fn page_count(&self) -> u32 {
        u32::from(self.document.pages().len())
    }

    fn render_page(&self, index: u32, dpi: f32) -> PdfResult<RgbaImage> {
        let page = self.get_page(index)?;
        let scale = dpi / POINTS_PER_INCH;
        let width = (page.width().value * scale).round().max(1.0);
        let height = (page.height().value * scale).round().max(1.0);

        let config = PdfRenderConfig::new()
            .set_target_width(width as i32)
            .set_target_height(height as i32);

        let bitmap = page
            .render_with_config(&config)
            .map_err(|e| PdfError::RenderError(e.to_string()))?;

        let (width, height) = (bitmap.width() as u32, bitmap.height() as u32);
        RgbaImage::from_raw(width, height, bitmap.as_rgba_bytes().to_vec()).ok_or_else(|| {
            PdfError::RenderError(format!("bitmap of page {index} does not match {width}x{height}"))
        })
    }

    fn outline(&self) -> Vec<OutlineNode> {
        let mut budget = MAX_OUTLINE_NODES;
        collect_bookmarks(self.document.bookmarks().root(), &mut budget)
    }

    fn find_text(&self, index: u32, query: &str) -> PdfResult<bool> {
        let page = self.get_page(index)?;
        let text = page.text().map_err(|e| PdfError::TextError(e.to_string()))?;

        // PdfSearchOptions defaults to case-insensitive matching
        let search = text
            .search(query, &PdfSearchOptions::new())
            .map_err(|e| PdfError::TextError(e.to_string()))?;
        let found = search.find_next().is_some();

        Ok(found)
    }

    fn page_text(&self, index: u32) -> PdfResult<String> {
        let page = self.get_page(index)?;

        let text = page
            .text()
            .map_err(|e| PdfError::TextError(format!("Failed to extract text: {}", e)))?
            .all();

        Ok(text)
    }
}

fn collect_bookmarks(first: Option<PdfBookmark<'_>>, budget: &mut usize) -> Vec<OutlineNode> {
    let mut nodes = Vec::new();
    let mut cursor = first;

    while let Some(bookmark) = cursor {
        if *budget == 0 {
            log::warn!("outline truncated after {MAX_OUTLINE_NODES} entries");
            break;
        }
        *budget -= 1;

        let page = bookmark
            .destination()
            .and_then(|destination| destination.page_index().ok())
            .map(u32::from);
        let children = collect_bookmarks(bookmark.first_child(), budget);

        nodes.push(OutlineNode { label: bookmark.title().unwrap_or_default(), page, children });
        cursor = bookmark.next_sibling();
    }

    nodes
}
