//! Robby PDF Reader - egui shell
//!
//! Translates UI events into workspace commands and draws workspace state.
//! Commands raised while drawing are queued and dispatched once the frame's
//! panels are laid out.

use crate::shortcuts::{self, Shortcut};
use crate::textures::TextureCache;
use doc_model::{SearchDirection, DEFAULT_ZOOM};
use eframe::egui;
use robby_render::PdfiumLoader;
use std::path::PathBuf;
use std::time::Instant;
use storage::Storage;
use viewer_core::{Command, Workspace, PAGE_SPACING_PX};

const OUTLINE_INDENT: f32 = 14.0;
const SEARCH_FIELD_ID: &str = "search_field";

pub struct ReaderApp {
    workspace: Workspace<PdfiumLoader, Storage>,
    textures: TextureCache,
    commands: Vec<Command>,
    search_query: String,
    focus_search: bool,
}

impl ReaderApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        storage: Storage,
        launch_file: Option<PathBuf>,
    ) -> Self {
        shortcuts::install(&cc.egui_ctx);

        let mut workspace = Workspace::new(PdfiumLoader::new(), storage, Instant::now());
        workspace.start(launch_file);

        Self {
            workspace,
            textures: TextureCache::default(),
            commands: Vec::new(),
            search_query: String::new(),
            focus_search: false,
        }
    }

    /// Show the native file dialog and queue the chosen file for opening
    fn open_file_dialog(&mut self) {
        if let Some(path) = rfd::FileDialog::new().add_filter("PDF", &["pdf"]).pick_file() {
            self.commands.push(Command::Open(path));
        }
    }

    fn search(&mut self, direction: SearchDirection) {
        self.commands.push(Command::Search { query: self.search_query.clone(), direction });
    }
}

impl eframe::App for ReaderApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.workspace.dispatch(Command::Tick(Instant::now()));

        self.handle_keyboard_shortcuts(ctx);
        self.draw_menu_bar(ctx);
        self.draw_toolbar(ctx);
        self.draw_tab_strip(ctx);
        self.draw_status_bar(ctx);
        self.draw_outline(ctx);
        self.draw_document(ctx);

        for command in std::mem::take(&mut self.commands) {
            self.workspace.dispatch(command);
        }

        let workspace = &self.workspace;
        self.textures.retain(|id| workspace.tab(id).is_some());

        if let Some(deadline) = self.workspace.next_deadline() {
            ctx.request_repaint_after(deadline.saturating_duration_since(Instant::now()));
        }
    }
}

impl ReaderApp {
    fn handle_keyboard_shortcuts(&mut self, ctx: &egui::Context) {
        for shortcut in shortcuts::pressed(ctx) {
            match shortcut {
                Shortcut::Open => self.open_file_dialog(),
                Shortcut::CloseTab => self.commands.push(Command::CloseActive),
                Shortcut::FocusSearch => self.focus_search = true,
                Shortcut::ZoomIn => self.commands.push(Command::ZoomIn),
                Shortcut::ZoomOut => self.commands.push(Command::ZoomOut),
                Shortcut::ResetZoom => self.commands.push(Command::ResetZoom),
            }
        }
    }

    fn draw_menu_bar(&mut self, ctx: &egui::Context) {
        let recent: Vec<PathBuf> = self.workspace.recent().files().to_vec();

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open...").clicked() {
                        ui.close_menu();
                        self.open_file_dialog();
                    }

                    ui.add_enabled_ui(!recent.is_empty(), |ui| {
                        ui.menu_button("Open Recent", |ui| {
                            for (index, path) in recent.iter().enumerate() {
                                if ui.button(path.display().to_string()).clicked() {
                                    ui.close_menu();
                                    self.commands.push(Command::OpenRecent(index));
                                }
                            }
                            ui.separator();
                            if ui.button("Clear Recent").clicked() {
                                ui.close_menu();
                                self.commands.push(Command::ClearRecent);
                            }
                        });
                    });

                    ui.separator();

                    let has_tab = self.workspace.active_tab_id().is_some();
                    if ui.add_enabled(has_tab, egui::Button::new("Close Tab")).clicked() {
                        ui.close_menu();
                        self.commands.push(Command::CloseActive);
                    }
                    if ui.button("Clear Session").clicked() {
                        ui.close_menu();
                        self.commands.push(Command::ClearSession);
                    }

                    ui.separator();

                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
            });
        });
    }

    fn draw_toolbar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.add_space(8.0);

                if ui.button("📂 Open").clicked() {
                    self.open_file_dialog();
                }

                ui.separator();

                let zoom = self.workspace.active_tab().map(|tab| tab.zoom());
                ui.add_enabled_ui(zoom.is_some(), |ui| {
                    if ui.button("−").clicked() {
                        self.commands.push(Command::ZoomOut);
                    }
                    ui.label(format!("{:.0}%", zoom.unwrap_or(DEFAULT_ZOOM) * 100.0));
                    if ui.button("+").clicked() {
                        self.commands.push(Command::ZoomIn);
                    }
                    if ui.button("Reset").clicked() {
                        self.commands.push(Command::ResetZoom);
                    }
                });

                ui.separator();

                let response = ui.add(
                    egui::TextEdit::singleline(&mut self.search_query)
                        .id_salt(SEARCH_FIELD_ID)
                        .hint_text("Search...")
                        .desired_width(200.0),
                );

                if self.focus_search {
                    response.request_focus();
                    self.focus_search = false;
                }

                // Enter submits and drops focus; keep it so repeated Enter walks matches
                if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    let backward = ui.input(|i| i.modifiers.shift);
                    self.search(if backward {
                        SearchDirection::Backward
                    } else {
                        SearchDirection::Forward
                    });
                    response.request_focus();
                }

                if ui.button("▲").on_hover_text("Previous match").clicked() {
                    self.search(SearchDirection::Backward);
                }
                if ui.button("▼").on_hover_text("Next match").clicked() {
                    self.search(SearchDirection::Forward);
                }
            });
        });
    }

    fn draw_tab_strip(&mut self, ctx: &egui::Context) {
        if self.workspace.tabs().is_empty() {
            return;
        }

        let active = self.workspace.active_tab_id();
        egui::TopBottomPanel::top("tabs").show(ctx, |ui| {
            egui::ScrollArea::horizontal().show(ui, |ui| {
                ui.horizontal(|ui| {
                    for tab in self.workspace.tabs() {
                        let selected = active == Some(tab.id());
                        let label = ui
                            .selectable_label(selected, tab.title())
                            .on_hover_text(tab.path().display().to_string());
                        if label.clicked() {
                            self.commands.push(Command::Activate(tab.id()));
                        }
                        if ui.small_button("✕").clicked() {
                            self.commands.push(Command::Close(tab.id()));
                        }
                        ui.separator();
                    }
                });
            });
        });
    }

    fn draw_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some(status) = self.workspace.status() {
                    ui.label(status.text.as_str());
                }

                if let Some(tab) = self.workspace.active_tab().filter(|tab| tab.is_loaded()) {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(format!("Page {} / {}", tab.current_page() + 1, tab.page_count()));
                    });
                }
            });
        });
    }

    fn draw_outline(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("outline").default_width(220.0).resizable(true).show(ctx, |ui| {
            ui.heading("Outline");
            ui.separator();

            let outline = self.workspace.outline();
            if outline.is_empty() {
                ui.weak("No outline");
                return;
            }

            egui::ScrollArea::vertical().show(ui, |ui| {
                for (index, entry) in outline.iter().enumerate() {
                    ui.horizontal(|ui| {
                        ui.add_space(entry.depth as f32 * OUTLINE_INDENT);
                        if entry.is_navigable() {
                            if ui.link(entry.label.as_str()).clicked() {
                                self.commands.push(Command::GoToOutlineEntry(index));
                            }
                        } else {
                            ui.label(entry.label.as_str());
                        }
                    });
                }
            });
        });
    }

    fn draw_document(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(id) = self.workspace.active_tab_id() else {
                ui.centered_and_justified(|ui| {
                    ui.heading("Open a PDF to get started");
                });
                return;
            };

            let pending = self.workspace.tab_mut(id).and_then(|tab| tab.take_pending_scroll());
            let Some(tab) = self.workspace.tab(id) else {
                return;
            };

            if let Some(message) = tab.error() {
                let color = ui.visuals().error_fg_color;
                ui.centered_and_justified(|ui| {
                    ui.colored_label(color, message);
                });
                return;
            }

            self.textures.sync(ctx, tab);

            let mut area = egui::ScrollArea::vertical()
                .id_salt(("document", id.0))
                .auto_shrink([false, false]);
            if let Some(offset) = pending {
                area = area.vertical_scroll_offset(offset as f32);
            }

            let textures = &self.textures;
            let output = area.show(ui, |ui| {
                ui.spacing_mut().item_spacing.y = PAGE_SPACING_PX;
                ui.vertical_centered(|ui| {
                    for page in tab.pages() {
                        let size = egui::vec2(page.width_px as f32, page.height_px as f32);
                        match textures.page(id, page.index) {
                            Some(texture) => {
                                ui.add(egui::Image::new((texture.id(), size)));
                            }
                            None => {
                                let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
                                ui.painter().rect_filled(rect, 0.0, egui::Color32::WHITE);
                            }
                        }
                    }
                });
            });

            self.commands.push(Command::ViewportResized {
                tab: id,
                height_px: output.inner_rect.height(),
            });
            self.commands.push(Command::Scrolled { tab: id, offset_px: output.state.offset.y });
        });
    }
}
