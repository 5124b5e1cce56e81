use std::collections::HashMap;

use tracing::{info, warn};

use crate::assets::AssetRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    Forever,
    Times(u32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnimationConfig {
    pub key: String,
    pub texture_key: String,
    pub frames: Vec<u32>,
    pub frame_rate: f32,
    pub repeat: Repeat,
}

pub fn generate_frame_numbers(start: u32, end: u32) -> Vec<u32> {
    if start <= end {
        (start..=end).collect()
    } else {
        (end..=start).rev().collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    config: AnimationConfig,
}

impl Animation {
    pub fn key(&self) -> &str {
        &self.config.key
    }

    pub fn texture_key(&self) -> &str {
        &self.config.texture_key
    }

    pub fn frames(&self) -> &[u32] {
        &self.config.frames
    }

    pub fn frame_rate(&self) -> f32 {
        self.config.frame_rate
    }

    pub fn repeat(&self) -> Repeat {
        self.config.repeat
    }

    pub fn frame_at(&self, elapsed_seconds: f32) -> Option<u32> {
        let frames = &self.config.frames;
        let last = frames.len().checked_sub(1)?;
        if self.config.frame_rate <= 0.0 || elapsed_seconds <= 0.0 {
            return frames.first().copied();
        }

        let step = (elapsed_seconds * self.config.frame_rate).floor() as u64;
        let cycle = frames.len() as u64;
        let index = match self.config.repeat {
            Repeat::Forever => (step % cycle) as usize,
            Repeat::Times(extra) => {
                let total = cycle.saturating_mul(u64::from(extra) + 1);
                if step >= total {
                    last
                } else {
                    (step % cycle) as usize
                }
            }
        };
        frames.get(index).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingFrames {
    pub animation_key: String,
    pub texture_key: String,
    pub frames: Vec<u32>,
    pub available: u32,
}

#[derive(Debug, Default)]
pub struct AnimationRegistry {
    animations: HashMap<String, Animation>,
}

impl AnimationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, config: AnimationConfig) -> bool {
        if self.animations.contains_key(&config.key) {
            warn!(key = %config.key, "animation_key_already_registered");
            return false;
        }
        info!(
            key = %config.key,
            texture = %config.texture_key,
            frame_count = config.frames.len(),
            frame_rate = config.frame_rate,
            "animation_registered"
        );
        self.animations
            .insert(config.key.clone(), Animation { config });
        true
    }

    pub fn get(&self, key: &str) -> Option<&Animation> {
        self.animations.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.animations.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.animations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }

    pub fn missing_frames(&self, assets: &AssetRegistry) -> Vec<MissingFrames> {
        let mut missing: Vec<MissingFrames> = self
            .animations
            .values()
            .filter_map(|animation| {
                let available = assets
                    .get(animation.texture_key())
                    .map(|texture| texture.frame_count())
                    .unwrap_or(1);
                let frames: Vec<u32> = animation
                    .frames()
                    .iter()
                    .copied()
                    .filter(|frame| *frame >= available)
                    .collect();
                (!frames.is_empty()).then(|| MissingFrames {
                    animation_key: animation.key().to_string(),
                    texture_key: animation.texture_key().to_string(),
                    frames,
                    available,
                })
            })
            .collect();
        missing.sort_by(|a, b| a.animation_key.cmp(&b.animation_key));
        missing
    }
}
