use doc_model::{OutlineNode, SessionEntry, SessionPhase};
use image::RgbaImage;
use robby_render::{Document, DocumentLoader, PdfError, PdfResult};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use storage::{Persistence, Storage};
use tempfile::TempDir;
use viewer_core::{Command, Workspace};

struct Pages(u32);

impl Document for Pages {
    fn page_count(&self) -> u32 {
        self.0
    }

    fn render_page(&self, index: u32, _dpi: f32) -> PdfResult<RgbaImage> {
        if index >= self.0 {
            return Err(PdfError::InvalidPageIndex(index));
        }
        Ok(RgbaImage::new(400, 500))
    }

    fn outline(&self) -> Vec<OutlineNode> {
        Vec::new()
    }

    fn find_text(&self, _index: u32, _query: &str) -> PdfResult<bool> {
        Ok(false)
    }

    fn page_text(&self, _index: u32) -> PdfResult<String> {
        Ok(String::new())
    }
}

/// Accepts any existing file ending in `.pdf`.
struct ExtensionLoader;

impl DocumentLoader for ExtensionLoader {
    fn load(&self, path: &Path) -> PdfResult<Box<dyn Document>> {
        let is_pdf = path.extension().is_some_and(|ext| ext == "pdf");
        if is_pdf && path.exists() {
            Ok(Box::new(Pages(5)))
        } else {
            Err(PdfError::LoadError(format!("cannot open {}", path.display())))
        }
    }
}

fn fixture(dir: &TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, b"%PDF-1.7").expect("fixture should be written");
    path
}

fn restored(storage: Storage) -> (Workspace<ExtensionLoader, Storage>, Instant) {
    let start = Instant::now();
    let mut workspace = Workspace::new(ExtensionLoader, storage, start);
    workspace.start(Vec::new());
    workspace.dispatch(Command::Tick(start + Duration::from_millis(500)));
    (workspace, start)
}

#[test]
fn tabs_and_scroll_positions_survive_restart() {
    let docs = tempfile::tempdir().expect("temp dir should be created");
    let config = tempfile::tempdir().expect("temp dir should be created");
    let first = fixture(&docs, "first.pdf");
    let second = fixture(&docs, "second.pdf");

    {
        let mut workspace =
            Workspace::new(ExtensionLoader, Storage::with_root(config.path()), Instant::now());
        let id = workspace.open(&first);
        workspace.open(&second);
        workspace.dispatch(Command::Activate(id));
        workspace.dispatch(Command::Scrolled { tab: id, offset_px: 0.0 });
        workspace.dispatch(Command::Scrolled { tab: id, offset_px: 733.0 });
    }

    let (workspace, start) = restored(Storage::with_root(config.path()));

    assert_eq!(workspace.phase(), SessionPhase::Ready);
    let tabs: Vec<_> =
        workspace.tabs().iter().map(|tab| (tab.path().to_path_buf(), tab.scroll())).collect();
    assert_eq!(tabs, vec![(first.clone(), 733), (second.clone(), 0)]);
    assert_eq!(workspace.recent().files(), &[second, first]);
    assert!(workspace.next_deadline().is_some_and(|at| at > start));
}

#[test]
fn deleted_files_are_dropped_on_next_restore() {
    let docs = tempfile::tempdir().expect("temp dir should be created");
    let config = tempfile::tempdir().expect("temp dir should be created");
    let kept = fixture(&docs, "kept.pdf");
    let gone = fixture(&docs, "gone.pdf");

    let storage = Storage::with_root(config.path());
    storage
        .save_session(&[
            SessionEntry { path: gone.clone(), scroll: 10 },
            SessionEntry { path: kept.clone(), scroll: 20 },
        ])
        .expect("session should be saved");
    fs::remove_file(&gone).expect("fixture should be removed");

    let (mut workspace, _) = restored(storage);
    assert_eq!(workspace.tabs().len(), 1);

    // the restore itself writes nothing; the next change rewrites the file
    let on_disk = Storage::with_root(config.path()).load_session().expect("session should load");
    assert_eq!(on_disk.len(), 2);

    let id = workspace.tabs()[0].id();
    workspace.dispatch(Command::Scrolled { tab: id, offset_px: 20.0 });
    workspace.dispatch(Command::Scrolled { tab: id, offset_px: 40.0 });

    let on_disk = Storage::with_root(config.path()).load_session().expect("session should load");
    assert_eq!(on_disk, vec![SessionEntry { path: kept, scroll: 40 }]);
}

#[test]
fn clear_session_removes_file_but_keeps_recent() {
    let docs = tempfile::tempdir().expect("temp dir should be created");
    let config = tempfile::tempdir().expect("temp dir should be created");
    let path = fixture(&docs, "notes.pdf");
    let storage = Storage::with_root(config.path());
    let session_path = storage.session_path();
    let recent_path = storage.recent_path();

    let mut workspace = Workspace::new(ExtensionLoader, storage, Instant::now());
    workspace.open(&path);
    assert!(session_path.exists());

    workspace.dispatch(Command::ClearSession);

    assert!(workspace.tabs().is_empty());
    assert!(!session_path.exists());
    assert!(recent_path.exists());

    let (workspace, _) = restored(Storage::with_root(config.path()));
    assert!(workspace.tabs().is_empty());
    assert_eq!(workspace.recent().files(), &[path]);
}

#[test]
fn unreadable_session_file_starts_empty() {
    let config = tempfile::tempdir().expect("temp dir should be created");
    let storage = Storage::with_root(config.path());
    fs::write(storage.session_path(), b"{ not json").expect("corrupt file should be written");

    let (workspace, _) = restored(storage);

    assert!(workspace.tabs().is_empty());
    assert_eq!(workspace.phase(), SessionPhase::Ready);
}

#[test]
fn unreadable_recent_file_does_not_block_startup() {
    let docs = tempfile::tempdir().expect("temp dir should be created");
    let config = tempfile::tempdir().expect("temp dir should be created");
    let kept = fixture(&docs, "kept.pdf");
    let fresh = fixture(&docs, "fresh.pdf");

    let storage = Storage::with_root(config.path());
    storage
        .save_session(&[SessionEntry { path: kept, scroll: 0 }])
        .expect("session should be saved");
    fs::write(storage.recent_path(), b"[not json").expect("corrupt file should be written");

    let (mut workspace, _) = restored(storage);
    assert!(workspace.recent().is_empty());
    assert_eq!(workspace.tabs().len(), 1);

    workspace.open(&fresh);

    let on_disk = Storage::with_root(config.path()).load_recent().expect("recent should load");
    assert_eq!(on_disk.files(), &[fresh]);
}
