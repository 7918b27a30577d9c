use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod outline;
mod recent;
mod search;

pub use outline::{flatten_outline, OutlineEntry, OutlineNode};
pub use recent::{RecentFiles, MAX_RECENT_FILES};
pub use search::{search_order, SearchDirection};

pub const DEFAULT_ZOOM: f32 = 1.5;
pub const MIN_ZOOM: f32 = 0.25;
pub const ZOOM_STEP: f32 = 0.25;
pub const POINTS_PER_INCH: f32 = 72.0;

pub fn clamp_zoom(zoom: f32) -> f32 {
    if zoom.is_finite() {
        zoom.max(MIN_ZOOM)
    } else {
        DEFAULT_ZOOM
    }
}

pub fn zoom_to_dpi(zoom: f32) -> f32 {
    POINTS_PER_INCH * clamp_zoom(zoom)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TabId(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub struct OpenDocument {
    pub path: PathBuf,
    pub zoom: f32,
    pub scroll: u32,
}

impl OpenDocument {
    pub fn new(path: impl Into<PathBuf>, scroll: u32) -> Self {
        Self { path: path.into(), zoom: DEFAULT_ZOOM, scroll }
    }

    pub fn title(&self) -> String {
        document_title(&self.path)
    }

    pub fn dpi(&self) -> f32 {
        zoom_to_dpi(self.zoom)
    }

    pub fn snapshot(&self) -> SessionEntry {
        SessionEntry { path: self.path.clone(), scroll: self.scroll }
    }
}

pub fn document_title(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// One persisted tab: absolute path plus last scroll offset in pixels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEntry {
    pub path: PathBuf,
    pub scroll: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Idle,
    Restoring,
    Ready,
}

impl SessionPhase {
    pub fn allows_persist(self) -> bool {
        !matches!(self, Self::Restoring)
    }

    pub fn is_restoring(self) -> bool {
        matches!(self, Self::Restoring)
    }
}
