mod asset_keys;
mod loader;
mod registry;

pub use asset_keys::AssetKeyError;
pub use loader::{AssetLoadError, LoadEvent, LoadKind, LoadReport, LoadRequest, Loader};
pub use registry::{AssetRegistry, FrameLayout, FrameRect, Texture, PLACEHOLDER_TEXTURE_SIZE_PX};
