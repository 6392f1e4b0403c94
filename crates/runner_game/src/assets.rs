//! Sprite images for the five drawable roles, decoded off the main thread.
//!
//! Every role has one PNG under `assets/images/`. A role reads as not ready
//! until its file has been decoded and uploaded; missing or broken files
//! just leave it that way and the renderer draws a primitive instead.
//!
//! Files are polled by modification time once per frame, so dropping an
//! image in (or replacing one) while the game runs picks it up.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::SystemTime;

use runner_render::TextureData;

pub const IMAGE_DIR: &str = "assets/images";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageRole {
    Player,
    Enemy,
    Obstacle,
    Coin,
    Background,
}

impl ImageRole {
    pub const ALL: [ImageRole; 5] = [
        ImageRole::Player,
        ImageRole::Enemy,
        ImageRole::Obstacle,
        ImageRole::Coin,
        ImageRole::Background,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Player => "player",
            Self::Enemy => "enemy",
            Self::Obstacle => "obstacle",
            Self::Coin => "coin",
            Self::Background => "background",
        }
    }

    /// Key the decoded image is stored under in the renderer.
    pub fn texture_key(self) -> &'static str {
        match self {
            Self::Player => "image/player",
            Self::Enemy => "image/enemy",
            Self::Obstacle => "image/obstacle",
            Self::Coin => "image/coin",
            Self::Background => "image/background",
        }
    }

    pub fn default_path(self, dir: &Path) -> PathBuf {
        dir.join(format!("{}.png", self.name()))
    }
}

/// A ready image, named by the renderer texture key it was uploaded under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageHandle {
    pub texture_key: Arc<str>,
}

pub trait AssetProvider {
    /// `None` until the role's image is ready to draw.
    fn image(&self, role: ImageRole) -> Option<ImageHandle>;
}

/// Modification-time poller for a single file.
pub struct FileWatcher {
    path: PathBuf,
    last_seen_modified: Option<SystemTime>,
}

impl FileWatcher {
    /// Starts out having seen nothing, so a file that already exists is
    /// reported on the first poll.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            last_seen_modified: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn changed(&mut self) -> bool {
        let current = modified_time(&self.path);
        match (self.last_seen_modified, current) {
            (Some(old), Some(now)) if now > old => {
                self.last_seen_modified = Some(now);
                true
            }
            (None, Some(now)) => {
                self.last_seen_modified = Some(now);
                true
            }
            _ => false,
        }
    }
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).ok()?.modified().ok()
}

type DecodeResult = Result<TextureData, String>;

fn spawn_decode(path: PathBuf) -> Receiver<DecodeResult> {
    let (sender, receiver) = channel();
    thread::spawn(move || {
        let result = fs::read(&path)
            .map_err(|e| format!("failed to read {}: {e}", path.display()))
            .and_then(|bytes| {
                TextureData::decode(&bytes)
                    .map_err(|e| format!("failed to decode {}: {e}", path.display()))
            });
        // The store may have been dropped; nobody is left to tell.
        let _ = sender.send(result);
    });
    receiver
}

struct AssetSlot {
    role: ImageRole,
    watcher: FileWatcher,
    pending: Option<Receiver<DecodeResult>>,
    ready: Option<ImageHandle>,
}

pub struct AssetStore {
    slots: Vec<AssetSlot>,
}

impl AssetStore {
    pub fn new(dir: &Path) -> Self {
        let slots = ImageRole::ALL
            .iter()
            .map(|&role| AssetSlot {
                role,
                watcher: FileWatcher::new(role.default_path(dir)),
                pending: None,
                ready: None,
            })
            .collect();
        Self { slots }
    }

    pub fn ready_count(&self) -> usize {
        self.slots.iter().filter(|s| s.ready.is_some()).count()
    }

    pub fn total(&self) -> usize {
        self.slots.len()
    }

    pub fn is_pending(&self) -> bool {
        self.slots.iter().any(|s| s.pending.is_some())
    }

    /// Start decodes for changed files and hand finished images to `upload`
    /// (texture key, pixels). A role becomes ready once its upload returns.
    pub fn poll(&mut self, mut upload: impl FnMut(&str, &TextureData)) {
        for slot in &mut self.slots {
            if slot.pending.is_none() && slot.watcher.changed() {
                log::debug!(
                    "Decoding {} image from {}",
                    slot.role.name(),
                    slot.watcher.path().display()
                );
                slot.pending = Some(spawn_decode(slot.watcher.path().to_path_buf()));
            }

            let Some(receiver) = &slot.pending else {
                continue;
            };
            let result = match receiver.try_recv() {
                Ok(result) => result,
                Err(TryRecvError::Empty) => continue,
                Err(TryRecvError::Disconnected) => {
                    Err(format!("decoder for {} image stopped", slot.role.name()))
                }
            };
            slot.pending = None;

            match result {
                Ok(data) => {
                    let key = slot.role.texture_key();
                    upload(key, &data);
                    slot.ready = Some(ImageHandle {
                        texture_key: Arc::from(key),
                    });
                    log::info!(
                        "Image ready: {} ({}x{})",
                        slot.role.name(),
                        data.width,
                        data.height
                    );
                }
                Err(message) => {
                    // A previously ready image stays in use.
                    log::warn!("{} image not loaded: {}", slot.role.name(), message);
                }
            }
        }
    }
}

impl AssetProvider for AssetStore {
    fn image(&self, role: ImageRole) -> Option<ImageHandle> {
        self.slots
            .iter()
            .find(|s| s.role == role)
            .and_then(|s| s.ready.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant, UNIX_EPOCH};

    fn temp_dir(name_hint: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!(
            "lane_runner_assets_{}_{}_{}",
            name_hint,
            std::process::id(),
            nanos
        ));
        fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([255, 0, 0, 255]));
        let mut bytes = std::io::Cursor::new(Vec::new());
        img.write_to(&mut bytes, image::ImageFormat::Png)
            .expect("encode png");
        bytes.into_inner()
    }

    /// Poll until nothing is decoding, or give up after a few seconds.
    fn poll_until_settled(store: &mut AssetStore, uploads: &mut Vec<String>) {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            store.poll(|key, _| uploads.push(key.to_string()));
            if !store.is_pending() || Instant::now() > deadline {
                break;
            }
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn nothing_is_ready_without_files() {
        let dir = temp_dir("empty");
        let mut store = AssetStore::new(&dir);
        let mut uploads = Vec::new();
        poll_until_settled(&mut store, &mut uploads);
        assert!(uploads.is_empty());
        for role in ImageRole::ALL {
            assert!(store.image(role).is_none());
        }
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn valid_png_becomes_ready_after_upload() {
        let dir = temp_dir("valid");
        fs::write(ImageRole::Coin.default_path(&dir), png_bytes(4, 2)).expect("write png");
        let mut store = AssetStore::new(&dir);
        let mut uploads = Vec::new();
        poll_until_settled(&mut store, &mut uploads);

        assert_eq!(uploads, vec!["image/coin".to_string()]);
        let handle = store.image(ImageRole::Coin).expect("coin ready");
        assert_eq!(&*handle.texture_key, "image/coin");
        assert!(store.image(ImageRole::Player).is_none());
        assert_eq!(store.ready_count(), 1);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn malformed_file_stays_not_ready() {
        let dir = temp_dir("broken");
        fs::write(ImageRole::Enemy.default_path(&dir), b"not a png").expect("write file");
        let mut store = AssetStore::new(&dir);
        let mut uploads = Vec::new();
        poll_until_settled(&mut store, &mut uploads);
        assert!(uploads.is_empty());
        assert!(store.image(ImageRole::Enemy).is_none());
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn watcher_reports_creation_once() {
        let dir = temp_dir("watcher");
        let path = dir.join("late.png");
        let mut watcher = FileWatcher::new(path.clone());
        assert!(!watcher.changed(), "missing file is not a change");
        fs::write(&path, b"x").expect("write file");
        assert!(watcher.changed(), "creation is reported");
        assert!(!watcher.changed(), "unchanged file is quiet");
        let _ = fs::remove_dir_all(dir);
    }
}
