use doc_model::TabId;
use eframe::egui;
use std::collections::HashMap;
use viewer_core::DocumentTab;

struct TabTextures {
    generation: u64,
    pages: Vec<Option<egui::TextureHandle>>,
}

/// GPU textures for rendered pages, one set per tab, replaced whenever the
/// tab re-renders.
#[derive(Default)]
pub struct TextureCache {
    tabs: HashMap<TabId, TabTextures>,
}

impl TextureCache {
    pub fn sync(&mut self, ctx: &egui::Context, tab: &DocumentTab) {
        let current =
            self.tabs.get(&tab.id()).is_some_and(|cached| cached.generation == tab.generation());
        if current {
            return;
        }

        let pages = tab
            .pages()
            .iter()
            .map(|page| {
                let image = page.image.as_ref()?;
                let size = [image.width() as usize, image.height() as usize];
                let pixels = egui::ColorImage::from_rgba_unmultiplied(size, image.as_raw());
                Some(ctx.load_texture(
                    format!("page_{}_{}_{}", tab.id().0, tab.generation(), page.index),
                    pixels,
                    egui::TextureOptions::LINEAR,
                ))
            })
            .collect();

        self.tabs.insert(tab.id(), TabTextures { generation: tab.generation(), pages });
    }

    pub fn page(&self, tab: TabId, index: u32) -> Option<&egui::TextureHandle> {
        self.tabs.get(&tab)?.pages.get(index as usize)?.as_ref()
    }

    /// Drops textures of tabs that are no longer open.
    pub fn retain(&mut self, is_open: impl Fn(TabId) -> bool) {
        self.tabs.retain(|id, _| is_open(*id));
    }
}
