mod context;
mod input;
mod loop_runner;
mod metrics;
mod rendering;
mod scene;

pub use context::{Camera, GameConfig, PhysicsSprite, SceneContext, StaticSprite};
pub use input::{CursorKeys, CursorState, InputAction};
pub use loop_runner::{run_app, AppError, LoopConfig};
pub use metrics::LoopMetricsSnapshot;
pub use rendering::{RenderError, Renderer};
pub use scene::{
    InputSnapshot, Scene, SceneCommand, SceneKey, SceneManager, ScenePhase, SceneRegistryError,
    Vec2,
};
