use engine::{
    CursorKeys, InputSnapshot, PhysicsSprite, Scene, SceneCommand, SceneContext, SceneKey,
    StaticGroupId,
};
use tracing::warn;

use crate::movement::{horizontal_velocity, resolve_flip_x, should_jump, JUMP_SPEED};

use super::GAME_SCENE;

const PLAYER_SPAWN: (f32, f32) = (100.0, 450.0);
const PLAYER_BOUNCE: f32 = 0.2;
const GROUND_SCALE: f32 = 2.0;
const LEDGES: [(f32, f32); 3] = [(600.0, 400.0), (50.0, 250.0), (750.0, 220.0)];

pub(crate) struct GameScene {
    pub(super) player: Option<PhysicsSprite>,
    cursors: CursorKeys,
}

impl GameScene {
    pub(crate) fn new() -> Self {
        Self {
            player: None,
            cursors: CursorKeys::new(),
        }
    }

    fn build_platforms(ctx: &mut SceneContext) -> StaticGroupId {
        let group = ctx.add_static_group();

        if let Some(ground) = ctx.create_static(group, 400.0, 568.0, "ground") {
            ctx.set_static_scale(ground, GROUND_SCALE);
            ctx.refresh_static_body(ground);
        }
        for (x, y) in LEDGES {
            ctx.create_static(group, x, y, "ground");
        }
        group
    }
}

impl Scene for GameScene {
    fn key(&self) -> SceneKey {
        GAME_SCENE
    }

    fn create(&mut self, ctx: &mut SceneContext) -> SceneCommand {
        ctx.add_image("sky", 400.0, 300.0);
        let platforms = Self::build_platforms(ctx);

        let player = ctx.add_physics_sprite("player", PLAYER_SPAWN.0, PLAYER_SPAWN.1);
        if let Some(body) = ctx.body_mut(player) {
            body.set_bounce(PLAYER_BOUNCE);
            body.set_collide_world_bounds(true);
        }
        if !ctx.physics_mut().add_collider(player.body, platforms) {
            warn!("player_collider_not_added");
        }
        self.player = Some(player);
        SceneCommand::None
    }

    fn update(
        &mut self,
        _fixed_dt_seconds: f32,
        input: &InputSnapshot,
        ctx: &mut SceneContext,
    ) -> SceneCommand {
        let Some(player) = self.player else {
            return SceneCommand::None;
        };
        let keys = self.cursors.read(input);
        let velocity_x = horizontal_velocity(keys.left, keys.right);

        if let Some(body) = ctx.body_mut(player) {
            body.set_velocity_x(velocity_x);
            if should_jump(keys.up, body.touching.down) {
                body.set_velocity_y(-JUMP_SPEED);
            }
        }
        if let Some(image) = ctx.image_mut(player.image) {
            image.flip_x = resolve_flip_x(velocity_x, image.flip_x);
        }
        SceneCommand::None
    }

    fn shutdown(&mut self, _ctx: &mut SceneContext) {
        self.player = None;
    }
}
