use engine::{Scene, SceneKey};

mod boot;
mod game;
mod preload;

pub(crate) use boot::BootScene;
pub(crate) use game::GameScene;
pub(crate) use preload::PreloadScene;

pub(crate) const BOOT_SCENE: SceneKey = SceneKey("BootScene");
pub(crate) const PRELOAD_SCENE: SceneKey = SceneKey("PreloadScene");
pub(crate) const GAME_SCENE: SceneKey = SceneKey("GameScene");

pub(crate) fn build_scenes() -> Vec<Box<dyn Scene>> {
    vec![
        Box::new(BootScene),
        Box::new(PreloadScene::new()),
        Box::new(GameScene::new()),
    ]
}
