//! Robby Reader render library
//!
//! Rendering collaborator for the viewer: page rasterization, outline
//! extraction and text search, backed by PDFium.

pub mod document;
pub mod pdf;

pub use document::{text_contains, Document, DocumentLoader};
pub use pdf::{PdfDocument, PdfError, PdfResult, PdfiumLoader};
