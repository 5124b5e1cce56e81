use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetKeyError {
    #[error("asset key must not be empty")]
    Empty,
    #[error("asset key contains invalid character '{character}'")]
    InvalidCharacter { character: char },
    #[error("asset path must not be empty")]
    EmptyPath,
    #[error("asset path must be relative")]
    AbsolutePath,
    #[error("asset path must not contain '\\\\'")]
    Backslash,
    #[error("asset path must not contain '..'")]
    ParentTraversal,
}

pub(crate) fn validate_asset_key(key: &str) -> Result<(), AssetKeyError> {
    if key.is_empty() {
        return Err(AssetKeyError::Empty);
    }
    for ch in key.chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() || matches!(ch, '_' | '-') {
            continue;
        }
        return Err(AssetKeyError::InvalidCharacter { character: ch });
    }
    Ok(())
}

pub(crate) fn validate_asset_path(path: &str) -> Result<(), AssetKeyError> {
    if path.is_empty() {
        return Err(AssetKeyError::EmptyPath);
    }
    if path.starts_with('/') {
        return Err(AssetKeyError::AbsolutePath);
    }
    if path.contains('\\') {
        return Err(AssetKeyError::Backslash);
    }
    if path.split('/').any(|segment| segment == "..") {
        return Err(AssetKeyError::ParentTraversal);
    }
    Ok(())
}
