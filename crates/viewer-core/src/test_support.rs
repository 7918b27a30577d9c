//! In-memory stand-ins for the renderer and the persistence layer.

use doc_model::{OutlineNode, RecentFiles, SessionEntry, POINTS_PER_INCH};
use image::RgbaImage;
use robby_render::{Document, DocumentLoader, PdfError, PdfResult};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use storage::{Persistence, StorageError};

#[derive(Debug, Clone)]
pub struct FakePage {
    pub width_pt: f32,
    pub height_pt: f32,
    pub text: String,
}

#[derive(Debug, Clone, Default)]
pub struct FakeDocument {
    pub pages: Vec<FakePage>,
    pub outline: Vec<OutlineNode>,
}

impl FakeDocument {
    /// Letter-sized pages with the given text.
    pub fn with_texts(texts: &[&str]) -> Self {
        let pages = texts
            .iter()
            .map(|text| FakePage { width_pt: 612.0, height_pt: 792.0, text: text.to_string() })
            .collect();
        Self { pages, outline: Vec::new() }
    }

    pub fn blank(page_count: usize) -> Self {
        Self::with_texts(&vec![""; page_count])
    }

    pub fn with_outline(mut self, outline: Vec<OutlineNode>) -> Self {
        self.outline = outline;
        self
    }
}

impl Document for FakeDocument {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn render_page(&self, index: u32, dpi: f32) -> PdfResult<RgbaImage> {
        let page = self.pages.get(index as usize).ok_or(PdfError::InvalidPageIndex(index))?;
        let scale = dpi / POINTS_PER_INCH;
        let width = (page.width_pt * scale).round() as u32;
        let height = (page.height_pt * scale).round() as u32;
        Ok(RgbaImage::new(width.max(1), height.max(1)))
    }

    fn outline(&self) -> Vec<OutlineNode> {
        self.outline.clone()
    }

    fn find_text(&self, _index: u32, _query: &str) -> PdfResult<bool> {
        Err(PdfError::TextError("native search not available".to_string()))
    }

    fn page_text(&self, index: u32) -> PdfResult<String> {
        self.pages
            .get(index as usize)
            .map(|page| page.text.clone())
            .ok_or(PdfError::InvalidPageIndex(index))
    }
}

#[derive(Debug, Default)]
pub struct FakeLoader {
    documents: HashMap<PathBuf, FakeDocument>,
    loads: Cell<usize>,
}

impl FakeLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: impl Into<PathBuf>, document: FakeDocument) -> Self {
        self.documents.insert(path.into(), document);
        self
    }

    pub fn loads(&self) -> usize {
        self.loads.get()
    }
}

impl DocumentLoader for FakeLoader {
    fn load(&self, path: &Path) -> PdfResult<Box<dyn Document>> {
        self.loads.set(self.loads.get() + 1);
        self.documents
            .get(path)
            .cloned()
            .map(|document| Box::new(document) as Box<dyn Document>)
            .ok_or_else(|| PdfError::LoadError(format!("{} is not a PDF", path.display())))
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    pub session: RefCell<Option<Vec<SessionEntry>>>,
    pub recent: RefCell<RecentFiles>,
    pub session_writes: Cell<usize>,
    pub corrupt_session: Cell<bool>,
    pub corrupt_recent: Cell<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(entries: Vec<SessionEntry>) -> Self {
        let store = Self::default();
        store.session.replace(Some(entries));
        store
    }

    pub fn saved_session(&self) -> Option<Vec<SessionEntry>> {
        self.session.borrow().clone()
    }
}

impl Persistence for MemoryStore {
    fn load_session(&self) -> Result<Vec<SessionEntry>, StorageError> {
        if self.corrupt_session.get() {
            return Err(parse_error());
        }
        Ok(self.session.borrow().clone().unwrap_or_default())
    }

    fn save_session(&self, entries: &[SessionEntry]) -> Result<(), StorageError> {
        self.session_writes.set(self.session_writes.get() + 1);
        self.session.replace(Some(entries.to_vec()));
        Ok(())
    }

    fn clear_session(&self) -> Result<(), StorageError> {
        self.session.replace(None);
        Ok(())
    }

    fn load_recent(&self) -> Result<RecentFiles, StorageError> {
        if self.corrupt_recent.get() {
            return Err(parse_error());
        }
        Ok(self.recent.borrow().clone())
    }

    fn save_recent(&self, recent: &RecentFiles) -> Result<(), StorageError> {
        self.recent.replace(recent.clone());
        Ok(())
    }
}

fn parse_error() -> StorageError {
    let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    StorageError::Serde(err)
}
