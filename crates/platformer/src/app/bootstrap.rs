use engine::{GameConfig, LoopConfig, Scene};
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::scenes;

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) game: GameConfig,
    pub(crate) scenes: Vec<Box<dyn Scene>>,
}

pub(crate) fn build_app() -> AppWiring {
    init_tracing();
    info!("=== Platformer Startup ===");

    let game = GameConfig::default();
    let config = window_config_for(&game);

    AppWiring {
        config,
        game,
        scenes: scenes::build_scenes(),
    }
}

fn window_config_for(game: &GameConfig) -> LoopConfig {
    LoopConfig {
        window_width: game.width,
        window_height: game.height,
        ..LoopConfig::default()
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}
