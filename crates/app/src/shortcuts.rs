//! Keyboard shortcuts
//!
//! All bindings use the platform command modifier (Cmd on macOS, Ctrl
//! elsewhere). Search navigation with Enter lives in the toolbar because it
//! only applies while the search field has focus.

use eframe::egui::{self, Event, Key, Modifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    Open,
    CloseTab,
    FocusSearch,
    ZoomIn,
    ZoomOut,
    ResetZoom,
}

const BINDINGS: &[(Key, Shortcut)] = &[
    (Key::O, Shortcut::Open),
    (Key::W, Shortcut::CloseTab),
    (Key::F, Shortcut::FocusSearch),
    (Key::Equals, Shortcut::ZoomIn),
    (Key::Plus, Shortcut::ZoomIn),
    (Key::Minus, Shortcut::ZoomOut),
    (Key::Num0, Shortcut::ResetZoom),
];

/// Zoom keys scale the document only; egui's own keyboard UI zoom is off.
pub fn install(ctx: &egui::Context) {
    ctx.options_mut(|options| options.zoom_with_keyboard = false);
}

pub fn shortcut_for(key: Key, modifiers: Modifiers) -> Option<Shortcut> {
    if !modifiers.command || modifiers.alt {
        return None;
    }

    BINDINGS.iter().find(|(bound, _)| *bound == key).map(|(_, shortcut)| *shortcut)
}

/// Shortcuts pressed since the previous frame, in event order.
pub fn pressed(ctx: &egui::Context) -> Vec<Shortcut> {
    ctx.input(|input| {
        input
            .events
            .iter()
            .filter_map(|event| match event {
                Event::Key { key, pressed: true, modifiers, .. } => shortcut_for(*key, *modifiers),
                _ => None,
            })
            .collect()
    })
}
