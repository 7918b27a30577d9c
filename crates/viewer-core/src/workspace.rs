//! Main window state, independent of any UI toolkit.
//!
//! The UI layer turns user input into [`Command`]s and feeds them to
//! [`Workspace::dispatch`]; everything else (tabs, outline, search, zoom,
//! session and recent-file persistence) happens here.

use crate::deferred::DeferredQueue;
use crate::status::StatusMessage;
use crate::tab::DocumentTab;
use doc_model::{
    search_order, OutlineEntry, RecentFiles, SearchDirection, SessionEntry, SessionPhase, TabId,
    DEFAULT_ZOOM, ZOOM_STEP,
};
use robby_render::DocumentLoader;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use storage::Persistence;

/// Delays for the single-shot deferred actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub session_restore: Duration,
    pub scroll_restore: Duration,
    pub zoom_restore: Duration,
    pub status_ttl: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            session_restore: Duration::from_millis(500),
            scroll_restore: Duration::from_millis(1000),
            zoom_restore: Duration::from_millis(100),
            status_ttl: Duration::from_millis(3000),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Open(PathBuf),
    OpenRecent(usize),
    ClearRecent,
    Close(TabId),
    CloseActive,
    Activate(TabId),
    Scrolled { tab: TabId, offset_px: f32 },
    ViewportResized { tab: TabId, height_px: f32 },
    SetZoom(f32),
    ZoomIn,
    ZoomOut,
    ResetZoom,
    Search { query: String, direction: SearchDirection },
    GoToPage(u32),
    GoToOutlineEntry(usize),
    RestoreSession,
    ClearSession,
    Tick(Instant),
}

#[derive(Debug, Clone, PartialEq)]
enum DeferredAction {
    RestoreSession,
    OpenFile(PathBuf),
    ApplyScroll { tab: TabId, offset: u32 },
    RestoreScrollFraction { tab: TabId, fraction: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpenOrigin {
    User,
    Restore,
}

pub struct Workspace<L, P> {
    loader: L,
    persistence: P,
    tabs: Vec<DocumentTab>,
    active: Option<TabId>,
    outline: Vec<OutlineEntry>,
    recent: RecentFiles,
    phase: SessionPhase,
    status: Option<StatusMessage>,
    deferred: DeferredQueue<DeferredAction>,
    timing: Timing,
    now: Instant,
    next_tab_id: u64,
}

impl<L: DocumentLoader, P: Persistence> Workspace<L, P> {
    pub fn new(loader: L, persistence: P, now: Instant) -> Self {
        let recent = persistence.load_recent().unwrap_or_else(|err| {
            log::warn!("ignoring unreadable recent files: {err}");
            RecentFiles::new()
        });

        Self {
            loader,
            persistence,
            tabs: Vec::new(),
            active: None,
            outline: Vec::new(),
            recent,
            phase: SessionPhase::Idle,
            status: Some(StatusMessage::persistent("System Ready")),
            deferred: DeferredQueue::new(),
            timing: Timing::default(),
            now,
            next_tab_id: 0,
        }
    }

    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    /// Schedules the session restore, then the files given at launch.
    pub fn start(&mut self, launch_files: impl IntoIterator<Item = PathBuf>) {
        let delay = self.timing.session_restore;
        self.deferred.schedule(self.now, delay, DeferredAction::RestoreSession);
        for path in launch_files {
            self.deferred.schedule(self.now, delay, DeferredAction::OpenFile(path));
        }
    }

    pub fn dispatch(&mut self, command: Command) {
        match command {
            Command::Open(path) => {
                self.open(path);
            }
            Command::OpenRecent(index) => {
                self.open_recent(index);
            }
            Command::ClearRecent => self.clear_recent(),
            Command::Close(tab) => {
                self.close(tab);
            }
            Command::CloseActive => {
                if let Some(tab) = self.active {
                    self.close(tab);
                }
            }
            Command::Activate(tab) => self.activate(tab),
            Command::Scrolled { tab, offset_px } => self.on_scrolled(tab, offset_px),
            Command::ViewportResized { tab, height_px } => {
                if let Some(tab) = self.tab_mut(tab) {
                    tab.set_viewport_height(height_px);
                }
            }
            Command::SetZoom(zoom) => self.set_zoom(zoom),
            Command::ZoomIn => self.set_zoom(self.active_zoom() + ZOOM_STEP),
            Command::ZoomOut => self.set_zoom(self.active_zoom() - ZOOM_STEP),
            Command::ResetZoom => self.set_zoom(DEFAULT_ZOOM),
            Command::Search { query, direction } => {
                self.search(&query, direction);
            }
            Command::GoToPage(page) => {
                self.go_to_page(page);
            }
            Command::GoToOutlineEntry(index) => {
                self.go_to_outline_entry(index);
            }
            Command::RestoreSession => {
                self.restore_session();
            }
            Command::ClearSession => self.clear_session(),
            Command::Tick(now) => self.tick(now),
        }
    }

    /// Opens `path`, or focuses the tab that already shows it.
    pub fn open(&mut self, path: impl AsRef<Path>) -> TabId {
        self.open_with(path.as_ref(), 0, OpenOrigin::User)
    }

    fn open_with(&mut self, path: &Path, scroll: u32, origin: OpenOrigin) -> TabId {
        let path = absolute(path);

        if let Some(existing) = self.find_tab(&path) {
            if origin == OpenOrigin::User {
                self.activate(existing);
            }
            return existing;
        }

        self.next_tab_id += 1;
        let id = TabId(self.next_tab_id);
        let tab = DocumentTab::open(id, &self.loader, path.clone(), scroll);

        if scroll > 0 && tab.is_loaded() {
            self.deferred.schedule(
                self.now,
                self.timing.scroll_restore,
                DeferredAction::ApplyScroll { tab: id, offset: scroll },
            );
        }
        self.tabs.push(tab);

        if origin == OpenOrigin::User {
            self.activate(id);
            self.record_recent(&path);
            self.persist_session();
        }

        id
    }

    pub fn open_recent(&mut self, index: usize) -> Option<TabId> {
        let path = self.recent.get(index)?.to_path_buf();
        Some(self.open(path))
    }

    pub fn clear_recent(&mut self) {
        self.recent.clear();
        self.save_recent();
    }

    pub fn close(&mut self, id: TabId) -> bool {
        let Some(index) = self.tabs.iter().position(|tab| tab.id() == id) else {
            return false;
        };

        let tab = self.tabs.remove(index);
        log::info!("closed {}", tab.path().display());

        if self.active == Some(id) {
            let fallback = (!self.tabs.is_empty())
                .then(|| self.tabs[index.saturating_sub(1).min(self.tabs.len() - 1)].id());
            self.set_active(fallback);
        }

        self.persist_session();
        true
    }

    pub fn activate(&mut self, id: TabId) {
        if self.tabs.iter().any(|tab| tab.id() == id) {
            self.set_active(Some(id));
        }
    }

    fn set_active(&mut self, id: Option<TabId>) {
        self.active = id;
        self.outline = self.active_tab().map(|tab| tab.outline().to_vec()).unwrap_or_default();
    }

    fn on_scrolled(&mut self, id: TabId, offset_px: f32) {
        let restoring = self.phase.is_restoring();
        let Some(tab) = self.tab_mut(id) else {
            return;
        };
        let Some(offset) = tab.observe_scroll(offset_px) else {
            return;
        };
        if restoring {
            return;
        }

        tab.record_scroll(offset);
        self.persist_session();
    }

    fn active_zoom(&self) -> f32 {
        self.active_tab().map_or(DEFAULT_ZOOM, DocumentTab::zoom)
    }

    /// Re-renders the active tab; its relative scroll position comes back
    /// through a deferred action once the new pages are laid out.
    pub fn set_zoom(&mut self, zoom: f32) {
        let Some(id) = self.active else {
            return;
        };
        let Some(fraction) = self.tab_mut(id).and_then(|tab| tab.set_zoom(zoom)) else {
            return;
        };

        self.deferred.schedule(
            self.now,
            self.timing.zoom_restore,
            DeferredAction::RestoreScrollFraction { tab: id, fraction },
        );
    }

    /// Scans the active document for `query` and navigates to the first
    /// matching page in `direction`, wrapping once around the document.
    pub fn search(&mut self, query: &str, direction: SearchDirection) -> Option<u32> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }

        let id = self.active?;
        let found = {
            let tab = self.tab(id)?;
            let document = tab.document()?;
            search_order(tab.current_page(), document.page_count(), direction)
                .into_iter()
                .find(|&page| document.page_matches(page, query))
        };

        let message = match found {
            Some(page) => {
                if let Some(tab) = self.tab_mut(id) {
                    tab.go_to_page(page);
                }
                format!("Found on page {}", page + 1)
            }
            None => format!("No results for \"{query}\""),
        };
        self.show_status(message);

        found
    }

    pub fn go_to_page(&mut self, page: u32) -> bool {
        self.active_tab_mut().is_some_and(|tab| tab.go_to_page(page))
    }

    pub fn go_to_outline_entry(&mut self, index: usize) -> bool {
        match self.outline.get(index).and_then(|entry| entry.page) {
            Some(page) => self.go_to_page(page),
            None => false,
        }
    }

    /// Reopens the persisted tabs whose files still exist. Nothing is
    /// written back while this runs.
    pub fn restore_session(&mut self) -> usize {
        if self.phase.is_restoring() {
            return 0;
        }
        self.phase = SessionPhase::Restoring;

        let entries = self.persistence.load_session().unwrap_or_else(|err| {
            log::warn!("ignoring unreadable session: {err}");
            Vec::new()
        });
        let total = entries.len();

        let mut restored = Vec::new();
        for SessionEntry { path, scroll } in entries {
            if !path.exists() {
                log::info!("skipping missing session file {}", path.display());
                continue;
            }
            if self.find_tab(&absolute(&path)).is_some() {
                continue;
            }
            restored.push(self.open_with(&path, scroll, OpenOrigin::Restore));
        }

        if self.active.is_none() {
            if let Some(&first) = restored.first() {
                self.set_active(Some(first));
            }
        }

        self.phase = SessionPhase::Ready;
        log::info!("restored {} of {total} session entries", restored.len());
        restored.len()
    }

    /// Closes every tab and deletes the session file; recent files stay.
    pub fn clear_session(&mut self) {
        self.tabs.clear();
        self.set_active(None);

        if let Err(err) = self.persistence.clear_session() {
            log::warn!("failed to delete session: {err}");
        }
        self.show_status("Session cleared");
    }

    fn tick(&mut self, now: Instant) {
        self.now = now;

        if self.status.as_ref().is_some_and(|status| status.is_expired(now)) {
            self.status = None;
        }

        for action in self.deferred.take_due(now) {
            self.run_deferred(action);
        }
    }

    fn run_deferred(&mut self, action: DeferredAction) {
        match action {
            DeferredAction::RestoreSession => {
                self.restore_session();
            }
            DeferredAction::OpenFile(path) => {
                self.open(path);
            }
            DeferredAction::ApplyScroll { tab, offset } => {
                if let Some(tab) = self.tab_mut(tab) {
                    tab.request_scroll(offset);
                }
            }
            DeferredAction::RestoreScrollFraction { tab, fraction } => {
                if let Some(tab) = self.tab_mut(tab) {
                    tab.restore_scroll_fraction(fraction);
                }
            }
        }
    }

    fn show_status(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage::transient(text, self.now, self.timing.status_ttl));
    }

    fn record_recent(&mut self, path: &Path) {
        self.recent.add(path);
        self.save_recent();
    }

    fn save_recent(&self) {
        if let Err(err) = self.persistence.save_recent(&self.recent) {
            log::warn!("failed to save recent files: {err}");
        }
    }

    fn persist_session(&self) {
        if !self.phase.allows_persist() {
            log::debug!("session write suppressed while restoring");
            return;
        }

        let entries: Vec<SessionEntry> =
            self.tabs.iter().map(|tab| tab.state().snapshot()).collect();
        if let Err(err) = self.persistence.save_session(&entries) {
            log::warn!("failed to save session: {err}");
        }
    }

    fn find_tab(&self, path: &Path) -> Option<TabId> {
        self.tabs.iter().find(|tab| tab.path() == path).map(DocumentTab::id)
    }

    pub fn tabs(&self) -> &[DocumentTab] {
        &self.tabs
    }

    pub fn tab(&self, id: TabId) -> Option<&DocumentTab> {
        self.tabs.iter().find(|tab| tab.id() == id)
    }

    pub fn tab_mut(&mut self, id: TabId) -> Option<&mut DocumentTab> {
        self.tabs.iter_mut().find(|tab| tab.id() == id)
    }

    pub fn active_tab_id(&self) -> Option<TabId> {
        self.active
    }

    pub fn active_tab(&self) -> Option<&DocumentTab> {
        self.tab(self.active?)
    }

    pub fn active_tab_mut(&mut self) -> Option<&mut DocumentTab> {
        let active = self.active?;
        self.tab_mut(active)
    }

    pub fn outline(&self) -> &[OutlineEntry] {
        &self.outline
    }

    pub fn recent(&self) -> &RecentFiles {
        &self.recent
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Earliest instant at which a tick has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        let status = self.status.as_ref().and_then(|status| status.expires_at);
        match (self.deferred.next_deadline(), status) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
