use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};

use image::ImageReader;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::asset_keys::{validate_asset_key, validate_asset_path, AssetKeyError};
use super::registry::{AssetRegistry, Texture};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadKind {
    Image,
    Spritesheet { frame_width: u32, frame_height: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub key: String,
    pub path: String,
    pub kind: LoadKind,
}

#[derive(Debug, Error)]
pub enum AssetLoadError {
    #[error("invalid asset key '{key}': {source}")]
    InvalidKey {
        key: String,
        #[source]
        source: AssetKeyError,
    },
    #[error("invalid asset path '{path}': {source}")]
    InvalidPath {
        path: String,
        #[source]
        source: AssetKeyError,
    },
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("decoded image {path} has an unexpected pixel buffer size")]
    PixelBuffer { path: PathBuf },
    #[error("frame {frame_width}x{frame_height} does not fit in {path} ({width}x{height})")]
    FrameDoesNotFit {
        path: PathBuf,
        width: u32,
        height: u32,
        frame_width: u32,
        frame_height: u32,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadEvent {
    Progress(f32),
    Complete(LoadReport),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub requested: usize,
    pub loaded: usize,
    pub failed_keys: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BatchState {
    Idle,
    Running,
}

#[derive(Debug)]
pub struct Loader {
    asset_root: PathBuf,
    queue: VecDeque<LoadRequest>,
    state: BatchState,
    total: usize,
    report: LoadReport,
    warned_failed_keys: HashSet<String>,
}

impl Loader {
    pub fn new(asset_root: PathBuf) -> Self {
        Self {
            asset_root,
            queue: VecDeque::new(),
            state: BatchState::Idle,
            total: 0,
            report: LoadReport::default(),
            warned_failed_keys: HashSet::new(),
        }
    }

    pub fn asset_root(&self) -> &Path {
        &self.asset_root
    }

    pub fn image(&mut self, key: &str, path: &str) {
        self.enqueue(key, path, LoadKind::Image);
    }

    pub fn spritesheet(&mut self, key: &str, path: &str, frame_width: u32, frame_height: u32) {
        self.enqueue(
            key,
            path,
            LoadKind::Spritesheet {
                frame_width,
                frame_height,
            },
        );
    }

    fn enqueue(&mut self, key: &str, path: &str, kind: LoadKind) {
        self.queue.push_back(LoadRequest {
            key: key.to_string(),
            path: path.to_string(),
            kind,
        });
        if self.state == BatchState::Running {
            self.total += 1;
        }
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_running(&self) -> bool {
        self.state == BatchState::Running
    }

    pub fn start(&mut self) -> usize {
        self.state = BatchState::Running;
        self.total = self.queue.len();
        self.report = LoadReport {
            requested: self.total,
            ..LoadReport::default()
        };
        info!(requested = self.total, "load_batch_started");
        self.total
    }

    pub fn poll(&mut self, registry: &mut AssetRegistry) -> Vec<LoadEvent> {
        if self.state != BatchState::Running {
            return Vec::new();
        }

        let mut events = Vec::with_capacity(2);
        if let Some(request) = self.queue.pop_front() {
            self.process(&request, registry);
            let done = self.report.loaded + self.report.failed_keys.len();
            events.push(LoadEvent::Progress(done as f32 / self.total.max(1) as f32));
        }

        if self.queue.is_empty() {
            self.state = BatchState::Idle;
            self.report.requested = self.total;
            let report = std::mem::take(&mut self.report);
            info!(
                requested = report.requested,
                loaded = report.loaded,
                failed = report.failed_keys.len(),
                "load_batch_complete"
            );
            events.push(LoadEvent::Complete(report));
        }
        events
    }

    fn process(&mut self, request: &LoadRequest, registry: &mut AssetRegistry) {
        match load_texture(&self.asset_root, request) {
            Ok(texture) => {
                let (width, height) = (texture.width(), texture.height());
                if registry.insert(&request.key, texture).is_some() {
                    warn!(key = %request.key, path = %request.path, "texture_key_replaced");
                }
                debug!(key = %request.key, width, height, "asset_loaded");
                self.report.loaded += 1;
            }
            Err(error) => {
                if self.warned_failed_keys.insert(request.key.clone()) {
                    warn!(
                        key = %request.key,
                        error = %error,
                        "asset_load_failed_using_placeholder"
                    );
                }
                self.report.failed_keys.push(request.key.clone());
            }
        }
    }
}

fn load_texture(asset_root: &Path, request: &LoadRequest) -> Result<Texture, AssetLoadError> {
    validate_asset_key(&request.key).map_err(|source| AssetLoadError::InvalidKey {
        key: request.key.clone(),
        source,
    })?;
    validate_asset_path(&request.path).map_err(|source| AssetLoadError::InvalidPath {
        path: request.path.clone(),
        source,
    })?;

    let path = asset_root.join(&request.path);
    let decoded = ImageReader::open(&path)
        .map_err(|source| AssetLoadError::Open {
            path: path.clone(),
            source,
        })?
        .decode()
        .map_err(|source| AssetLoadError::Decode {
            path: path.clone(),
            source,
        })?
        .to_rgba8();

    let (width, height) = decoded.dimensions();
    let texture = Texture::from_rgba(width, height, decoded.into_raw())
        .ok_or_else(|| AssetLoadError::PixelBuffer { path: path.clone() })?;

    match request.kind {
        LoadKind::Image => Ok(texture),
        LoadKind::Spritesheet {
            frame_width,
            frame_height,
        } => texture
            .with_frame_grid(frame_width, frame_height)
            .ok_or(AssetLoadError::FrameDoesNotFit {
                path,
                width,
                height,
                frame_width,
                frame_height,
            }),
    }
}
