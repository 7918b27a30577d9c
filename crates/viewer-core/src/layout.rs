/// Vertical gap between stacked pages, in pixels.
pub const PAGE_SPACING_PX: f32 = 15.0;

/// Vertical stack of rendered pages inside a tab's scroll region.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageLayout {
    page_heights_px: Vec<f32>,
    page_spacing_px: f32,
}

impl PageLayout {
    pub fn new(page_heights_px: Vec<f32>, page_spacing_px: f32) -> Self {
        Self { page_heights_px, page_spacing_px: page_spacing_px.max(0.0) }
    }

    pub fn page_count(&self) -> u32 {
        self.page_heights_px.len() as u32
    }

    pub fn content_height(&self) -> f32 {
        if self.page_heights_px.is_empty() {
            return 0.0;
        }

        let gaps = (self.page_heights_px.len() - 1) as f32 * self.page_spacing_px;
        self.page_heights_px.iter().sum::<f32>() + gaps
    }

    pub fn max_scroll(&self, viewport_height_px: f32) -> f32 {
        (self.content_height() - viewport_height_px.max(0.0)).max(0.0)
    }

    pub fn page_start_offset(&self, page_index: u32) -> Option<f32> {
        let mut cursor = 0.0;

        for (index, page_height) in self.page_heights_px.iter().enumerate() {
            if index as u32 == page_index {
                return Some(cursor);
            }
            cursor += page_height + self.page_spacing_px;
        }

        None
    }

    /// Page under `offset`; the gap below a page counts as part of it.
    pub fn page_at_offset(&self, offset: f32) -> u32 {
        let mut cursor = 0.0;

        for (index, page_height) in self.page_heights_px.iter().enumerate() {
            let next_start = cursor + page_height + self.page_spacing_px;
            if offset < next_start {
                return index as u32;
            }
            cursor = next_start;
        }

        self.page_heights_px.len().saturating_sub(1) as u32
    }

    pub fn scroll_fraction(&self, offset: f32, viewport_height_px: f32) -> f32 {
        let max = self.max_scroll(viewport_height_px);
        if max <= 0.0 {
            return 0.0;
        }

        (offset / max).clamp(0.0, 1.0)
    }

    pub fn offset_for_fraction(&self, fraction: f32, viewport_height_px: f32) -> f32 {
        self.max_scroll(viewport_height_px) * fraction.clamp(0.0, 1.0)
    }
}
