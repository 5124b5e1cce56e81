use engine::{
    generate_frame_numbers, AnimationConfig, DisplayObjectId, LoadReport, Repeat, Scene,
    SceneCommand, SceneContext, SceneKey, Text, Vec2,
};
use tracing::debug;

use crate::movement::progress_bar_width;

use super::{GAME_SCENE, PRELOAD_SCENE};

const BOX_COLOR: u32 = 0x222222;
const BOX_ALPHA: f32 = 0.8;
const BAR_COLOR: u32 = 0xffffff;
const LABEL_SIZE_PX: u32 = 20;
const PLAYER_FRAME_WIDTH: u32 = 32;
const PLAYER_FRAME_HEIGHT: u32 = 48;

pub(crate) struct PreloadScene {
    pub(super) progress_box: Option<DisplayObjectId>,
    pub(super) progress_bar: Option<DisplayObjectId>,
    pub(super) loading_text: Option<DisplayObjectId>,
    canvas: (f32, f32),
}

impl PreloadScene {
    pub(crate) fn new() -> Self {
        Self {
            progress_box: None,
            progress_bar: None,
            loading_text: None,
            canvas: (0.0, 0.0),
        }
    }

    fn build_progress_ui(&mut self, ctx: &mut SceneContext) {
        let camera = ctx.main_camera();
        let (width, height) = (camera.width(), camera.height());
        self.canvas = (width, height);

        let display = ctx.display_mut();
        let progress_bar = display.add_graphics();
        let progress_box = display.add_graphics();
        if let Some(graphics) = display.graphics_mut(progress_box) {
            graphics.fill_style(BOX_COLOR, BOX_ALPHA).fill_rect(
                width / 2.0 - 160.0,
                height / 2.0 - 25.0,
                320.0,
                50.0,
            );
        }
        let loading_text = display.add_text(
            Text::new(
                "Loading...",
                Vec2::new(width / 2.0, height / 2.0 - 50.0),
                LABEL_SIZE_PX,
            )
            .with_origin(0.5, 0.5)
            .with_color(0xffffff),
        );

        self.progress_bar = Some(progress_bar);
        self.progress_box = Some(progress_box);
        self.loading_text = Some(loading_text);
    }

    fn queue_assets(ctx: &mut SceneContext) {
        let load = ctx.load();
        load.image("sky", "assets/sky.png");
        load.image("ground", "assets/platform.png");
        load.image("player", "assets/player.png");
        load.spritesheet(
            "player",
            "assets/player-spritesheet.png",
            PLAYER_FRAME_WIDTH,
            PLAYER_FRAME_HEIGHT,
        );
    }

    fn register_animations(ctx: &mut SceneContext) {
        ctx.anims_mut().create(AnimationConfig {
            key: "left".to_string(),
            texture_key: "player".to_string(),
            frames: generate_frame_numbers(0, 3),
            frame_rate: 10.0,
            repeat: Repeat::Forever,
        });
    }
}

impl Scene for PreloadScene {
    fn key(&self) -> SceneKey {
        PRELOAD_SCENE
    }

    fn preload(&mut self, ctx: &mut SceneContext) {
        self.build_progress_ui(ctx);
        Self::queue_assets(ctx);
        Self::register_animations(ctx);
    }

    fn load_progress(&mut self, fraction: f32, ctx: &mut SceneContext) {
        let Some(bar) = self.progress_bar else {
            return;
        };
        let (width, height) = self.canvas;
        if let Some(graphics) = ctx.display_mut().graphics_mut(bar) {
            graphics.clear().fill_style(BAR_COLOR, 1.0).fill_rect(
                width / 2.0 - 150.0,
                height / 2.0 - 15.0,
                progress_bar_width(fraction),
                30.0,
            );
        }
        debug!(fraction, "preload_progress");
    }

    fn load_complete(&mut self, _report: &LoadReport, ctx: &mut SceneContext) {
        let display = ctx.display_mut();
        for id in [
            self.progress_bar.take(),
            self.progress_box.take(),
            self.loading_text.take(),
        ]
        .into_iter()
        .flatten()
        {
            display.destroy(id);
        }
    }

    fn create(&mut self, _ctx: &mut SceneContext) -> SceneCommand {
        SceneCommand::Start(GAME_SCENE)
    }
}
