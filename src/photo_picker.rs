use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::meal::Photo;

static SUPPORTED_IMAGE_EXTS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "webp", "tiff", "tif"];

/// Returns `true` if the path has a supported image extension.
pub fn is_supported_image(path: &Path) -> bool {
    let Some(ext) = path.extension().map(|e| e.to_string_lossy()) else {
        return false;
    };
    SUPPORTED_IMAGE_EXTS
        .iter()
        .any(|known| ext.eq_ignore_ascii_case(known))
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}

/// List image files directly inside `dir`, sorted by file name.
pub fn scan_dir(dir: &Path, show_hidden: bool) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read photos directory: {}", dir.display()))?;

    let mut images = Vec::new();
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if !show_hidden && is_hidden(&path) {
            continue;
        }
        if is_supported_image(&path) {
            images.push(path);
        }
    }
    images.sort_by_key(|p| p.file_name().map(|n| n.to_ascii_lowercase()));
    Ok(images)
}

/// Decode just enough of the file to learn its dimensions.
pub fn load_photo(path: &Path) -> Result<Photo> {
    let (width, height) = image::image_dimensions(path)
        .with_context(|| format!("Not a readable image: {}", path.display()))?;
    Ok(Photo {
        path: path.to_path_buf(),
        width,
        height,
    })
}

pub async fn scan_dir_async(dir: PathBuf, show_hidden: bool) -> Result<Vec<PathBuf>> {
    tokio::task::spawn_blocking(move || scan_dir(&dir, show_hidden)).await?
}

pub async fn load_photo_async(path: PathBuf) -> Result<Photo> {
    tokio::task::spawn_blocking(move || load_photo(&path)).await?
}

/// State of the photo picker overlay.
#[derive(Debug, Clone)]
pub struct PhotoPicker {
    pub dir: PathBuf,
    pub entries: Vec<PathBuf>,
    pub selected: usize,
    /// True while the directory listing is in flight.
    pub scanning: bool,
    /// Path currently being decoded, if any.
    pub decoding: Option<PathBuf>,
    /// Error from the last scan or decode.
    pub flash: Option<String>,
}

impl PhotoPicker {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            entries: Vec::new(),
            selected: 0,
            scanning: true,
            decoding: None,
            flash: None,
        }
    }

    pub fn set_entries(&mut self, result: std::result::Result<Vec<PathBuf>, String>) {
        self.scanning = false;
        match result {
            Ok(entries) => {
                self.entries = entries;
                self.selected = 0;
                if self.entries.is_empty() {
                    self.flash = Some(format!("No images in {}", self.dir.display()));
                }
            }
            Err(e) => self.flash = Some(e),
        }
    }

    pub fn move_down(&mut self) {
        if self.selected + 1 < self.entries.len() {
            self.selected += 1;
        }
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn selected_path(&self) -> Option<&PathBuf> {
        self.entries.get(self.selected)
    }

    /// Mark the selected entry as being decoded. Returns the path to decode,
    /// or `None` if nothing is selectable or a decode is already running.
    pub fn begin_decode(&mut self) -> Option<PathBuf> {
        if self.decoding.is_some() {
            return None;
        }
        let path = self.selected_path()?.clone();
        self.decoding = Some(path.clone());
        self.flash = None;
        Some(path)
    }

    /// Accept a finished decode. Results for a path other than the one in
    /// flight are stale and ignored.
    pub fn finish_decode(
        &mut self,
        path: &Path,
        result: std::result::Result<Photo, String>,
    ) -> Option<Photo> {
        if self.decoding.as_deref() != Some(path) {
            return None;
        }
        self.decoding = None;
        match result {
            Ok(photo) => Some(photo),
            Err(e) => {
                self.flash = Some(e);
                None
            }
        }
    }
}
