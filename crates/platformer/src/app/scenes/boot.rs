use engine::{Scene, SceneCommand, SceneContext, SceneKey};

use super::{BOOT_SCENE, PRELOAD_SCENE};

pub(crate) struct BootScene;

impl Scene for BootScene {
    fn key(&self) -> SceneKey {
        BOOT_SCENE
    }

    fn preload(&mut self, ctx: &mut SceneContext) {
        ctx.load()
            .image("loading-background", "assets/loading-background.png");
    }

    fn create(&mut self, _ctx: &mut SceneContext) -> SceneCommand {
        SceneCommand::Start(PRELOAD_SCENE)
    }
}
