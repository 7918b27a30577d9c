//! One open document and its rendered pages.

use crate::layout::{PageLayout, PAGE_SPACING_PX};
use doc_model::{clamp_zoom, flatten_outline, OpenDocument, OutlineEntry, TabId, POINTS_PER_INCH};
use image::RgbaImage;
use robby_render::{Document, DocumentLoader};
use std::path::{Path, PathBuf};

/// Size used for pages the renderer could not rasterize (US Letter).
const PLACEHOLDER_PAGE_PT: (f32, f32) = (612.0, 792.0);

#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub index: u32,
    pub width_px: u32,
    pub height_px: u32,
    /// `None` when rendering failed; the slot keeps its size in the layout.
    pub image: Option<RgbaImage>,
}

impl RenderedPage {
    fn placeholder(index: u32, dpi: f32) -> Self {
        let scale = dpi / POINTS_PER_INCH;
        Self {
            index,
            width_px: (PLACEHOLDER_PAGE_PT.0 * scale).round() as u32,
            height_px: (PLACEHOLDER_PAGE_PT.1 * scale).round() as u32,
            image: None,
        }
    }
}

struct LoadedDocument {
    document: Box<dyn Document>,
    pages: Vec<RenderedPage>,
    layout: PageLayout,
    outline: Vec<OutlineEntry>,
}

enum TabContent {
    Loaded(LoadedDocument),
    Failed(String),
}

/// Page picked by the last navigation, with the offset it asked for.
#[derive(Debug, Clone, Copy)]
struct PageTarget {
    page: u32,
    offset: u32,
}

pub struct DocumentTab {
    id: TabId,
    state: OpenDocument,
    content: TabContent,
    generation: u64,
    viewport_height_px: f32,
    observed_scroll: Option<u32>,
    pending_scroll: Option<u32>,
    target: Option<PageTarget>,
}

impl DocumentTab {
    /// Loads `path` through the renderer. Failures are kept inside the tab.
    pub fn open(
        id: TabId,
        loader: &dyn DocumentLoader,
        path: impl Into<PathBuf>,
        start_scroll: u32,
    ) -> Self {
        let state = OpenDocument::new(path, start_scroll);

        let content = match loader.load(&state.path) {
            Ok(document) => {
                let pages = render_pages(document.as_ref(), state.dpi());
                let layout = layout_for(&pages);
                let outline = flatten_outline(&document.outline());
                log::info!("opened {} ({} pages)", state.path.display(), pages.len());
                TabContent::Loaded(LoadedDocument { document, pages, layout, outline })
            }
            Err(err) => {
                log::warn!("failed to open {}: {err}", state.path.display());
                TabContent::Failed(format!("Error: {err}"))
            }
        };

        Self {
            id,
            state,
            content,
            generation: 0,
            viewport_height_px: 0.0,
            observed_scroll: None,
            pending_scroll: None,
            target: None,
        }
    }

    pub fn id(&self) -> TabId {
        self.id
    }

    pub fn path(&self) -> &Path {
        &self.state.path
    }

    pub fn title(&self) -> String {
        self.state.title()
    }

    pub fn state(&self) -> &OpenDocument {
        &self.state
    }

    pub fn zoom(&self) -> f32 {
        self.state.zoom
    }

    pub fn scroll(&self) -> u32 {
        self.state.scroll
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.content, TabContent::Loaded(_))
    }

    pub fn error(&self) -> Option<&str> {
        match &self.content {
            TabContent::Failed(message) => Some(message),
            TabContent::Loaded(_) => None,
        }
    }

    pub fn document(&self) -> Option<&dyn Document> {
        match &self.content {
            TabContent::Loaded(loaded) => Some(loaded.document.as_ref()),
            TabContent::Failed(_) => None,
        }
    }

    pub fn pages(&self) -> &[RenderedPage] {
        match &self.content {
            TabContent::Loaded(loaded) => &loaded.pages,
            TabContent::Failed(_) => &[],
        }
    }

    pub fn page_count(&self) -> u32 {
        self.pages().len() as u32
    }

    pub fn outline(&self) -> &[OutlineEntry] {
        match &self.content {
            TabContent::Loaded(loaded) => &loaded.outline,
            TabContent::Failed(_) => &[],
        }
    }

    /// Bumped on every re-render so cached textures can be dropped.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn layout(&self) -> Option<&PageLayout> {
        match &self.content {
            TabContent::Loaded(loaded) => Some(&loaded.layout),
            TabContent::Failed(_) => None,
        }
    }

    pub fn viewport_height(&self) -> f32 {
        self.viewport_height_px
    }

    pub fn set_viewport_height(&mut self, height_px: f32) {
        self.viewport_height_px = height_px.max(0.0);
    }

    /// The page the last navigation went to while the view still rests
    /// there, otherwise the page under the viewport top. A page near the end
    /// may not reach the viewport top once the offset is clamped.
    pub fn current_page(&self) -> u32 {
        if let Some(target) = self.target {
            return target.page;
        }
        self.layout().map_or(0, |layout| layout.page_at_offset(self.state.scroll as f32))
    }

    pub fn scroll_fraction(&self) -> f32 {
        self.layout().map_or(0.0, |layout| {
            layout.scroll_fraction(self.state.scroll as f32, self.viewport_height_px)
        })
    }

    /// Feeds the offset the scroll region currently shows. Returns the new
    /// offset only when it differs from the previous observation; the first
    /// observation just primes the tracker.
    pub fn observe_scroll(&mut self, offset_px: f32) -> Option<u32> {
        let offset = offset_px.max(0.0).round() as u32;

        match self.observed_scroll.replace(offset) {
            None => None,
            Some(previous) if previous == offset => None,
            Some(_) => Some(offset),
        }
    }

    pub fn record_scroll(&mut self, offset: u32) {
        if let Some(target) = self.target {
            if offset.abs_diff(self.clamp_scroll(target.offset)) > 1 {
                self.target = None;
            }
        }
        self.state.scroll = offset;
    }

    /// Asks the scroll region to move; consumed by the UI on its next frame.
    pub fn request_scroll(&mut self, offset: u32) {
        let offset = self.clamp_scroll(offset);

        self.target = None;
        self.state.scroll = offset;
        self.pending_scroll = Some(offset);
    }

    /// Clamps to the scrollable range once the viewport height is known.
    fn clamp_scroll(&self, offset: u32) -> u32 {
        match self.layout() {
            Some(layout) if self.viewport_height_px > 0.0 => {
                offset.min(layout.max_scroll(self.viewport_height_px).round() as u32)
            }
            _ => offset,
        }
    }

    pub fn take_pending_scroll(&mut self) -> Option<u32> {
        self.pending_scroll.take()
    }

    pub fn pending_scroll(&self) -> Option<u32> {
        self.pending_scroll
    }

    /// Scrolls so the top of `page_index` meets the viewport top.
    pub fn go_to_page(&mut self, page_index: u32) -> bool {
        let Some(offset) = self.layout().and_then(|layout| layout.page_start_offset(page_index))
        else {
            return false;
        };

        let offset = self.clamp_scroll(offset.round() as u32);
        self.target = Some(PageTarget { page: page_index, offset });
        self.state.scroll = offset;
        self.pending_scroll = Some(offset);
        true
    }

    /// Re-renders at `zoom` and returns the scroll fraction captured before
    /// the re-render, or `None` when nothing was re-rendered.
    pub fn set_zoom(&mut self, zoom: f32) -> Option<f32> {
        let zoom = clamp_zoom(zoom);
        if (zoom - self.state.zoom).abs() < f32::EPSILON {
            return None;
        }

        let fraction = self.scroll_fraction();
        self.state.zoom = zoom;
        self.target = None;

        let TabContent::Loaded(loaded) = &mut self.content else {
            return None;
        };

        loaded.pages = render_pages(loaded.document.as_ref(), self.state.dpi());
        loaded.layout = layout_for(&loaded.pages);
        self.generation += 1;
        log::debug!("re-rendered {} at zoom {zoom}", self.state.path.display());

        Some(fraction)
    }

    pub fn restore_scroll_fraction(&mut self, fraction: f32) {
        let Some(offset) =
            self.layout().map(|layout| layout.offset_for_fraction(fraction, self.viewport_height_px))
        else {
            return;
        };

        self.target = None;
        self.state.scroll = offset.round() as u32;
        self.pending_scroll = Some(self.state.scroll);
    }
}

fn render_pages(document: &dyn Document, dpi: f32) -> Vec<RenderedPage> {
    (0..document.page_count())
        .map(|index| match document.render_page(index, dpi) {
            Ok(image) => RenderedPage {
                index,
                width_px: image.width(),
                height_px: image.height(),
                image: Some(image),
            },
            Err(err) => {
                log::warn!("page {index} failed to render: {err}");
                RenderedPage::placeholder(index, dpi)
            }
        })
        .collect()
}

fn layout_for(pages: &[RenderedPage]) -> PageLayout {
    PageLayout::new(pages.iter().map(|page| page.height_px as f32).collect(), PAGE_SPACING_PX)
}
