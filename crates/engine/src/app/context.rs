use std::path::PathBuf;

use tracing::{debug, warn};

use super::Vec2;
use crate::anims::AnimationRegistry;
use crate::assets::{AssetRegistry, LoadEvent, Loader};
use crate::display::{DisplayList, DisplayObjectId, Image, Rect};
use crate::physics::{
    ArcadeWorld, BodyHandle, DynamicBody, StaticBody, StaticBodyHandle, StaticGroupId,
};

#[derive(Debug, Clone)]
pub struct GameConfig {
    pub width: u32,
    pub height: u32,
    pub gravity: Vec2,
    pub physics_debug: bool,
    pub background_color: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            gravity: Vec2::new(0.0, 300.0),
            physics_debug: false,
            background_color: 0x000000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    viewport: Rect,
}

impl Camera {
    pub fn width(&self) -> f32 {
        self.viewport.width
    }

    pub fn height(&self) -> f32 {
        self.viewport.height
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhysicsSprite {
    pub image: DisplayObjectId,
    pub body: BodyHandle,
}

/// Display image owning a static body. The body follows the image only when
/// [`SceneContext::refresh_static_body`] is called.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticSprite {
    pub image: DisplayObjectId,
    pub body: StaticBodyHandle,
}

#[derive(Debug, Clone)]
struct AnimationPlayback {
    image: DisplayObjectId,
    key: String,
    elapsed_seconds: f32,
}

#[derive(Debug)]
pub struct SceneContext {
    config: GameConfig,
    camera: Camera,
    assets: AssetRegistry,
    anims: AnimationRegistry,
    loader: Loader,
    display: DisplayList,
    physics: ArcadeWorld,
    sprite_links: Vec<PhysicsSprite>,
    playbacks: Vec<AnimationPlayback>,
}

impl SceneContext {
    pub fn new(config: GameConfig, asset_root: PathBuf) -> Self {
        let viewport = Rect::new(0.0, 0.0, config.width as f32, config.height as f32);
        let mut physics = ArcadeWorld::new(config.gravity, viewport);
        physics.set_debug(config.physics_debug);
        Self {
            camera: Camera { viewport },
            assets: AssetRegistry::new(),
            anims: AnimationRegistry::new(),
            loader: Loader::new(asset_root),
            display: DisplayList::new(),
            physics,
            sprite_links: Vec::new(),
            playbacks: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn main_camera(&self) -> Camera {
        self.camera
    }

    pub fn assets(&self) -> &AssetRegistry {
        &self.assets
    }

    pub fn anims(&self) -> &AnimationRegistry {
        &self.anims
    }

    pub fn anims_mut(&mut self) -> &mut AnimationRegistry {
        &mut self.anims
    }

    pub fn load(&mut self) -> &mut Loader {
        &mut self.loader
    }

    pub fn loader(&self) -> &Loader {
        &self.loader
    }

    pub fn display(&self) -> &DisplayList {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut DisplayList {
        &mut self.display
    }

    pub fn physics(&self) -> &ArcadeWorld {
        &self.physics
    }

    pub fn physics_mut(&mut self) -> &mut ArcadeWorld {
        &mut self.physics
    }

    pub fn add_image(&mut self, texture_key: &str, x: f32, y: f32) -> DisplayObjectId {
        self.display
            .add_image(Image::new(texture_key, Vec2::new(x, y)))
    }

    pub fn add_physics_sprite(&mut self, texture_key: &str, x: f32, y: f32) -> PhysicsSprite {
        let (width, height) = self.assets.frame_size_or_placeholder(texture_key);
        let image = self.add_image(texture_key, x, y);
        let body = self.physics.add_dynamic(DynamicBody::new(
            Vec2::new(x, y),
            Vec2::new(width as f32, height as f32),
        ));
        let sprite = PhysicsSprite { image, body };
        self.sprite_links.push(sprite);
        sprite
    }

    pub fn add_static_group(&mut self) -> StaticGroupId {
        self.physics.add_static_group()
    }

    pub fn create_static(
        &mut self,
        group: StaticGroupId,
        x: f32,
        y: f32,
        texture_key: &str,
    ) -> Option<StaticSprite> {
        let (width, height) = self.assets.frame_size_or_placeholder(texture_key);
        let body = self.physics.add_static(
            group,
            StaticBody::new(Vec2::new(x, y), Vec2::new(width as f32, height as f32)),
        )?;
        let image = self.add_image(texture_key, x, y);
        Some(StaticSprite { image, body })
    }

    pub fn set_static_scale(&mut self, sprite: StaticSprite, scale: f32) {
        if let Some(image) = self.display.image_mut(sprite.image) {
            image.scale = Vec2::new(scale, scale);
        }
    }

    pub fn refresh_static_body(&mut self, sprite: StaticSprite) -> bool {
        let Some(image) = self.display.image(sprite.image) else {
            return false;
        };
        let (width, height) = self.assets.frame_size_or_placeholder(&image.texture_key);
        let size = Vec2::new(width as f32 * image.scale.x, height as f32 * image.scale.y);
        let center = image.position;
        match self.physics.static_body_mut(sprite.body) {
            Some(body) => {
                body.refresh(center, size);
                true
            }
            None => false,
        }
    }

    pub fn body(&self, sprite: PhysicsSprite) -> Option<&DynamicBody> {
        self.physics.body(sprite.body)
    }

    pub fn body_mut(&mut self, sprite: PhysicsSprite) -> Option<&mut DynamicBody> {
        self.physics.body_mut(sprite.body)
    }

    pub fn image(&self, id: DisplayObjectId) -> Option<&Image> {
        self.display.image(id)
    }

    pub fn image_mut(&mut self, id: DisplayObjectId) -> Option<&mut Image> {
        self.display.image_mut(id)
    }

    pub fn play_animation(&mut self, image: DisplayObjectId, key: &str) -> bool {
        if !self.anims.contains(key) || self.display.image(image).is_none() {
            warn!(animation = key, "animation_play_rejected");
            return false;
        }
        self.playbacks.retain(|playback| playback.image != image);
        self.playbacks.push(AnimationPlayback {
            image,
            key: key.to_string(),
            elapsed_seconds: 0.0,
        });
        self.advance_animations(0.0);
        true
    }

    pub(crate) fn poll_loader(&mut self) -> Vec<LoadEvent> {
        self.loader.poll(&mut self.assets)
    }

    pub(crate) fn warn_missing_animation_frames(&self) {
        for missing in self.anims.missing_frames(&self.assets) {
            warn!(
                animation = %missing.animation_key,
                texture = %missing.texture_key,
                frames = ?missing.frames,
                available = missing.available,
                "animation_frames_missing"
            );
        }
    }

    pub(crate) fn step(&mut self, fixed_dt_seconds: f32) {
        self.physics.step(fixed_dt_seconds);
        self.sync_sprites();
        self.advance_animations(fixed_dt_seconds);
    }

    pub(crate) fn sync_sprites(&mut self) {
        for sprite in &self.sprite_links {
            let Some(position) = self.physics.body(sprite.body).map(DynamicBody::position)
            else {
                continue;
            };
            if let Some(image) = self.display.image_mut(sprite.image) {
                image.position = position;
            }
        }
    }

    fn advance_animations(&mut self, dt_seconds: f32) {
        for playback in &mut self.playbacks {
            playback.elapsed_seconds += dt_seconds;
            let Some(animation) = self.anims.get(&playback.key) else {
                continue;
            };
            let Some(frame) = animation.frame_at(playback.elapsed_seconds) else {
                continue;
            };
            if let Some(image) = self.display.image_mut(playback.image) {
                image.frame = frame;
                if image.texture_key != animation.texture_key() {
                    image.texture_key = animation.texture_key().to_string();
                }
            }
        }
    }

    pub(crate) fn reset_scene_state(&mut self) {
        debug!(
            display_objects = self.display.len(),
            bodies = self.physics.body_count(),
            "scene_state_cleared"
        );
        self.display.clear();
        self.physics.clear();
        self.sprite_links.clear();
        self.playbacks.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anims::{generate_frame_numbers, AnimationConfig, Repeat};
    use crate::assets::Texture;

    fn context_with(textures: &[(&str, u32, u32, Option<(u32, u32)>)]) -> SceneContext {
        let mut ctx = SceneContext::new(GameConfig::default(), PathBuf::from("unused"));
        for (key, width, height, grid) in textures {
            let mut texture =
                Texture::from_rgba(*width, *height, vec![255; (*width * *height * 4) as usize])
                    .expect("texture");
            if let Some((frame_width, frame_height)) = grid {
                texture = texture
                    .with_frame_grid(*frame_width, *frame_height)
                    .expect("grid");
            }
            ctx.assets.insert(key, texture);
        }
        ctx
    }

    #[test]
    fn static_body_keeps_unscaled_size_until_refreshed() {
        let mut ctx = context_with(&[("ground", 400, 32, None)]);
        let group = ctx.add_static_group();
        let ground = ctx
            .create_static(group, 400.0, 568.0, "ground")
            .expect("ground");

        ctx.set_static_scale(ground, 2.0);
        let body = ctx.physics().static_body(ground.body).expect("body");
        assert_eq!(body.aabb().size(), Vec2::new(400.0, 32.0));

        assert!(ctx.refresh_static_body(ground));
        let body = ctx.physics().static_body(ground.body).expect("body");
        assert_eq!(body.aabb().size(), Vec2::new(800.0, 64.0));
        assert_eq!(body.aabb().center, Vec2::new(400.0, 568.0));
        assert_eq!(body.aabb().top(), 536.0);
    }

    #[test]
    fn physics_sprite_uses_frame_size_and_follows_body() {
        let mut ctx = context_with(&[("player", 128, 48, Some((32, 48)))]);
        let player = ctx.add_physics_sprite("player", 100.0, 450.0);
        let size = ctx.body(player).expect("body").aabb().size();
        assert_eq!(size, Vec2::new(32.0, 48.0));

        ctx.step(1.0 / 60.0);
        let body_y = ctx.body(player).expect("body").position().y;
        let image_y = ctx.image(player.image).expect("image").position.y;
        assert!(body_y > 450.0);
        assert_eq!(body_y, image_y);
    }

    #[test]
    fn missing_texture_sprite_gets_placeholder_sized_body() {
        let mut ctx = context_with(&[]);
        let player = ctx.add_physics_sprite("player", 100.0, 450.0);
        let size = ctx.body(player).expect("body").aabb().size();
        assert_eq!(size, Vec2::new(32.0, 32.0));
    }

    #[test]
    fn reset_clears_scene_state_only() {
        let mut ctx = context_with(&[("sky", 8, 8, None)]);
        ctx.add_image("sky", 400.0, 300.0);
        ctx.add_physics_sprite("sky", 0.0, 0.0);
        ctx.anims_mut().create(AnimationConfig {
            key: "left".to_string(),
            texture_key: "sky".to_string(),
            frames: vec![0],
            frame_rate: 10.0,
            repeat: Repeat::Forever,
        });

        ctx.reset_scene_state();
        assert!(ctx.display().is_empty());
        assert_eq!(ctx.physics().body_count(), 0);
        assert!(ctx.assets().contains("sky"));
        assert_eq!(ctx.anims().len(), 1);
    }

    #[test]
    fn playing_animation_advances_image_frame() {
        let mut ctx = context_with(&[("player", 128, 48, Some((32, 48)))]);
        ctx.anims_mut().create(AnimationConfig {
            key: "left".to_string(),
            texture_key: "player".to_string(),
            frames: generate_frame_numbers(0, 3),
            frame_rate: 10.0,
            repeat: Repeat::Forever,
        });
        let image = ctx.add_image("player", 0.0, 0.0);
        assert!(ctx.play_animation(image, "left"));
        assert!(!ctx.play_animation(image, "right"));

        for _ in 0..13 {
            ctx.step(1.0 / 60.0);
        }
        assert_eq!(ctx.image(image).expect("image").frame, 2);
    }

    #[test]
    fn camera_matches_canvas() {
        let ctx = context_with(&[]);
        assert_eq!(ctx.main_camera().width(), 800.0);
        assert_eq!(ctx.main_camera().height(), 600.0);
        assert!(!ctx.physics().is_debug());
    }
}
