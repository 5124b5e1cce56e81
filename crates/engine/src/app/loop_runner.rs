use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{info, warn};
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{ElementState, Event, KeyEvent, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowBuilder;

use crate::{resolve_app_paths, StartupError};

use super::input::ActionStates;
use super::metrics::{LoopMetricsSnapshot, MetricsAccumulator};
use super::rendering::RenderError;
use super::{
    GameConfig, InputAction, InputSnapshot, Renderer, Scene, SceneContext, SceneManager,
    SceneRegistryError,
};

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub target_tps: u32,
    pub max_frame_delta: Duration,
    pub max_ticks_per_frame: u32,
    pub metrics_log_interval: Duration,
    pub max_render_fps: Option<u32>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            window_title: "Platformer".to_string(),
            window_width: 800,
            window_height: 600,
            target_tps: 60,
            max_frame_delta: Duration::from_millis(250),
            max_ticks_per_frame: 5,
            metrics_log_interval: Duration::from_secs(1),
            max_render_fps: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error("invalid scene setup: {0}")]
    SceneRegistry(#[from] SceneRegistryError),
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize renderer: {0}")]
    CreateRenderer(#[source] RenderError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

pub fn run_app(
    config: LoopConfig,
    game: GameConfig,
    scenes: Vec<Box<dyn Scene>>,
) -> Result<(), AppError> {
    let app_paths = resolve_app_paths()?;
    info!(
        root = %app_paths.root.display(),
        asset_root = %app_paths.asset_root.display(),
        "startup"
    );

    let context = SceneContext::new(game.clone(), app_paths.asset_root.clone());
    let mut scenes = SceneManager::with_scenes(context, scenes)?;

    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(
                config.window_width as f64,
                config.window_height as f64,
            ))
            .build(&event_loop)
            .map_err(AppError::CreateWindow)?,
    );
    let mut renderer = Renderer::new(Arc::clone(&window), game.width, game.height)
        .map_err(AppError::CreateRenderer)?;

    event_loop.set_control_flow(ControlFlow::Poll);

    let timing = LoopTiming::from_config(&config);
    info!(
        target_tps = timing.target_tps,
        max_frame_delta_ms = timing.max_frame_delta.as_millis() as u64,
        max_ticks_per_frame = timing.max_ticks_per_frame,
        metrics_log_interval_ms = timing.metrics_log_interval.as_millis() as u64,
        render_fps_cap = %format_render_cap(timing.render_fps_cap),
        canvas_width = game.width,
        canvas_height = game.height,
        physics_debug = game.physics_debug,
        "loop_config"
    );

    scenes.start_first()?;

    let mut clock = FrameClock::new(timing, Instant::now());
    let mut input_collector = InputCollector::default();

    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => {
                    info!(reason = "window_close", "shutdown_requested");
                    window_target.exit();
                }
                WindowEvent::Resized(new_size) => {
                    if let Err(error) = renderer.resize(new_size.width, new_size.height) {
                        warn!(error = %error, "renderer_resize_failed");
                        window_target.exit();
                    }
                }
                WindowEvent::ScaleFactorChanged { .. } => {
                    let size = window.inner_size();
                    if let Err(error) = renderer.resize(size.width, size.height) {
                        warn!(error = %error, "renderer_resize_failed");
                        window_target.exit();
                    }
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    input_collector.handle_keyboard_input(&event);
                    if input_collector.quit_requested {
                        info!(reason = "escape_key", "shutdown_requested");
                        window_target.exit();
                    }
                }
                WindowEvent::RedrawRequested => {
                    let now = Instant::now();
                    for _ in 0..clock.begin_frame(now) {
                        let input = input_collector.snapshot_for_tick();
                        scenes.tick(clock.fixed_dt_seconds(), &input);
                    }

                    clock.wait_for_render_cap();
                    if let Err(error) = renderer.render(scenes.context()) {
                        warn!(error = %error, "renderer_draw_failed");
                        window_target.exit();
                    }

                    if let Some(snapshot) = clock.end_frame(now) {
                        let scene = scenes.active_key().map_or("none", |key| key.as_str());
                        info!(
                            fps = snapshot.fps,
                            tps = snapshot.tps,
                            frame_time_ms = snapshot.frame_time_ms,
                            max_frame_time_ms = snapshot.max_frame_time_ms,
                            clamped_frames = snapshot.clamped_frames,
                            scene,
                            display_objects = scenes.context().display().len(),
                            "loop_metrics"
                        );
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                window.request_redraw();
            }
            Event::LoopExiting => {
                scenes.shutdown_all();
                info!("shutdown");
            }
            _ => {}
        })
        .map_err(AppError::EventLoopRun)
}

#[derive(Debug, Clone, Copy)]
struct LoopTiming {
    target_tps: u32,
    fixed_dt: Duration,
    max_frame_delta: Duration,
    max_ticks_per_frame: u32,
    metrics_log_interval: Duration,
    render_fps_cap: Option<u32>,
}

impl LoopTiming {
    fn from_config(config: &LoopConfig) -> Self {
        let target_tps = config.target_tps.max(1);
        Self {
            target_tps,
            fixed_dt: Duration::from_secs_f64(1.0 / target_tps as f64),
            max_frame_delta: normalize_non_zero_duration(
                config.max_frame_delta,
                Duration::from_millis(250),
            ),
            max_ticks_per_frame: config.max_ticks_per_frame.max(1),
            metrics_log_interval: normalize_non_zero_duration(
                config.metrics_log_interval,
                Duration::from_secs(1),
            ),
            render_fps_cap: normalize_render_fps_cap(config.max_render_fps),
        }
    }
}

#[derive(Debug)]
struct FrameClock {
    timing: LoopTiming,
    accumulator: Duration,
    last_frame: Instant,
    last_present: Instant,
    frame_dt: Duration,
    metrics: MetricsAccumulator,
}

impl FrameClock {
    fn new(timing: LoopTiming, now: Instant) -> Self {
        Self {
            timing,
            accumulator: Duration::ZERO,
            last_frame: now,
            last_present: now,
            frame_dt: Duration::ZERO,
            metrics: MetricsAccumulator::new(timing.metrics_log_interval, now),
        }
    }

    fn fixed_dt_seconds(&self) -> f32 {
        self.timing.fixed_dt.as_secs_f32()
    }

    fn begin_frame(&mut self, now: Instant) -> u32 {
        self.frame_dt = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;

        let banked = self
            .accumulator
            .saturating_add(clamp_frame_delta(self.frame_dt, self.timing.max_frame_delta));
        let plan = plan_sim_steps(banked, self.timing.fixed_dt, self.timing.max_ticks_per_frame);
        self.accumulator = plan.remaining_accumulator;
        self.metrics.record_ticks(plan.ticks_to_run);

        if plan.dropped_backlog > Duration::ZERO {
            self.metrics.record_clamp();
            warn!(
                dropped_backlog_ms = plan.dropped_backlog.as_millis() as u64,
                max_ticks_per_frame = self.timing.max_ticks_per_frame,
                "sim_clamp_triggered"
            );
        }
        plan.ticks_to_run
    }

    fn wait_for_render_cap(&self) {
        let sleep = compute_cap_sleep(
            Instant::now().saturating_duration_since(self.last_present),
            target_frame_duration(self.timing.render_fps_cap),
        );
        if sleep > Duration::ZERO {
            thread::sleep(sleep);
        }
    }

    fn end_frame(&mut self, frame_start: Instant) -> Option<LoopMetricsSnapshot> {
        self.last_present = Instant::now();
        self.metrics.record_frame(self.frame_dt);
        self.metrics.maybe_snapshot(frame_start)
    }
}

#[derive(Debug, Default)]
struct InputCollector {
    quit_requested: bool,
    action_states: ActionStates,
}

impl InputCollector {
    fn handle_keyboard_input(&mut self, key_event: &KeyEvent) {
        let is_pressed = key_event.state == ElementState::Pressed;
        self.update_action_state_from_physical_key(key_event.physical_key, is_pressed);
    }

    fn update_action_state_from_physical_key(&mut self, key: PhysicalKey, is_pressed: bool) {
        let action = match key {
            PhysicalKey::Code(KeyCode::ArrowUp | KeyCode::KeyW) => InputAction::MoveUp,
            PhysicalKey::Code(KeyCode::ArrowDown | KeyCode::KeyS) => InputAction::MoveDown,
            PhysicalKey::Code(KeyCode::ArrowLeft | KeyCode::KeyA) => InputAction::MoveLeft,
            PhysicalKey::Code(KeyCode::ArrowRight | KeyCode::KeyD) => InputAction::MoveRight,
            PhysicalKey::Code(KeyCode::Escape) => {
                if is_pressed {
                    self.quit_requested = true;
                }
                InputAction::Quit
            }
            _ => return,
        };
        self.action_states.set(action, is_pressed);
    }

    fn snapshot_for_tick(&self) -> InputSnapshot {
        InputSnapshot::new(self.quit_requested, self.action_states)
    }
}

#[derive(Debug, Clone, Copy)]
struct StepPlan {
    ticks_to_run: u32,
    remaining_accumulator: Duration,
    dropped_backlog: Duration,
}

fn plan_sim_steps(
    mut accumulator: Duration,
    fixed_dt: Duration,
    max_ticks_per_frame: u32,
) -> StepPlan {
    let mut ticks_to_run = 0u32;
    while accumulator >= fixed_dt && ticks_to_run < max_ticks_per_frame {
        accumulator -= fixed_dt;
        ticks_to_run += 1;
    }

    let dropped_backlog = if accumulator >= fixed_dt {
        std::mem::take(&mut accumulator)
    } else {
        Duration::ZERO
    };
    StepPlan {
        ticks_to_run,
        remaining_accumulator: accumulator,
        dropped_backlog,
    }
}

fn clamp_frame_delta(frame_dt: Duration, max_frame_delta: Duration) -> Duration {
    frame_dt.min(max_frame_delta)
}

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}

fn normalize_render_fps_cap(cap: Option<u32>) -> Option<u32> {
    cap.filter(|value| *value > 0)
}

fn target_frame_duration(max_render_fps: Option<u32>) -> Option<Duration> {
    max_render_fps.map(|fps| Duration::from_secs_f64(1.0 / fps as f64))
}

fn compute_cap_sleep(elapsed: Duration, target: Option<Duration>) -> Duration {
    match target {
        Some(frame_target) if elapsed < frame_target => frame_target - elapsed,
        _ => Duration::ZERO,
    }
}

fn format_render_cap(cap: Option<u32>) -> String {
    match cap {
        Some(value) => value.to_string(),
        None => "off".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_canvas_and_tick_rate() {
        let config = LoopConfig::default();
        assert_eq!(config.window_title, "Platformer");
        assert_eq!((config.window_width, config.window_height), (800, 600));
        assert_eq!(config.target_tps, 60);
        assert_eq!(config.max_render_fps, None);
    }

    #[test]
    fn zero_settings_fall_back_to_defaults() {
        let timing = LoopTiming::from_config(&LoopConfig {
            target_tps: 0,
            max_frame_delta: Duration::ZERO,
            max_ticks_per_frame: 0,
            metrics_log_interval: Duration::ZERO,
            max_render_fps: Some(0),
            ..LoopConfig::default()
        });
        assert_eq!(timing.target_tps, 1);
        assert_eq!(timing.max_frame_delta, Duration::from_millis(250));
        assert_eq!(timing.max_ticks_per_frame, 1);
        assert_eq!(timing.metrics_log_interval, Duration::from_secs(1));
        assert_eq!(timing.render_fps_cap, None);
    }

    #[test]
    fn frame_clock_runs_whole_ticks_and_carries_remainder() {
        let base = Instant::now();
        let mut clock = FrameClock::new(LoopTiming::from_config(&LoopConfig::default()), base);
        let fixed_dt = clock.timing.fixed_dt;
        let first = base + Duration::from_millis(40);

        assert_eq!(clock.begin_frame(first), 2);
        assert!(clock.accumulator < fixed_dt);
        assert_eq!(clock.begin_frame(first + fixed_dt), 1);
        assert!(clock.accumulator < fixed_dt);
    }

    #[test]
    fn frame_clock_drops_backlog_after_long_stall() {
        let base = Instant::now();
        let mut clock = FrameClock::new(LoopTiming::from_config(&LoopConfig::default()), base);

        assert_eq!(clock.begin_frame(base + Duration::from_secs(2)), 5);
        assert_eq!(clock.accumulator, Duration::ZERO);
        let snapshot = clock
            .end_frame(base + Duration::from_secs(2))
            .expect("interval elapsed");
        assert_eq!(snapshot.clamped_frames, 1);
        assert!(snapshot.tps > 0.0);
    }

    #[test]
    fn clamp_frame_delta_caps_large_frame() {
        let max = Duration::from_millis(250);
        assert_eq!(clamp_frame_delta(Duration::from_millis(600), max), max);
        assert_eq!(
            clamp_frame_delta(Duration::from_millis(16), max),
            Duration::from_millis(16)
        );
    }

    #[test]
    fn plan_sim_steps_keeps_sub_tick_remainder() {
        let plan = plan_sim_steps(Duration::from_millis(40), Duration::from_millis(16), 5);
        assert_eq!(plan.ticks_to_run, 2);
        assert_eq!(plan.remaining_accumulator, Duration::from_millis(8));
        assert_eq!(plan.dropped_backlog, Duration::ZERO);
    }

    #[test]
    fn plan_sim_steps_drops_backlog_when_tick_cap_hit() {
        let plan = plan_sim_steps(Duration::from_millis(120), Duration::from_millis(16), 3);
        assert_eq!(plan.ticks_to_run, 3);
        assert_eq!(plan.remaining_accumulator, Duration::ZERO);
        assert_eq!(plan.dropped_backlog, Duration::from_millis(72));
    }

    #[test]
    fn arrows_and_wasd_map_to_directions() {
        let mut input = InputCollector::default();
        input.update_action_state_from_physical_key(PhysicalKey::Code(KeyCode::ArrowLeft), true);
        input.update_action_state_from_physical_key(PhysicalKey::Code(KeyCode::KeyW), true);

        let snapshot = input.snapshot_for_tick();
        assert!(snapshot.is_down(InputAction::MoveLeft));
        assert!(snapshot.is_down(InputAction::MoveUp));
        assert!(!snapshot.is_down(InputAction::MoveRight));
    }

    #[test]
    fn held_keys_persist_across_ticks_until_released() {
        let mut input = InputCollector::default();
        input.update_action_state_from_physical_key(PhysicalKey::Code(KeyCode::ArrowRight), true);
        assert!(input.snapshot_for_tick().is_down(InputAction::MoveRight));
        assert!(input.snapshot_for_tick().is_down(InputAction::MoveRight));

        input.update_action_state_from_physical_key(PhysicalKey::Code(KeyCode::ArrowRight), false);
        assert!(!input.snapshot_for_tick().is_down(InputAction::MoveRight));
    }

    #[test]
    fn escape_requests_quit() {
        let mut input = InputCollector::default();
        input.update_action_state_from_physical_key(PhysicalKey::Code(KeyCode::Escape), true);
        input.update_action_state_from_physical_key(PhysicalKey::Code(KeyCode::Escape), false);
        assert!(input.quit_requested);
        assert!(input.snapshot_for_tick().quit_requested());
    }

    #[test]
    fn unbound_keys_are_ignored() {
        let mut input = InputCollector::default();
        input.update_action_state_from_physical_key(PhysicalKey::Code(KeyCode::Space), true);
        let snapshot = input.snapshot_for_tick();
        for action in [
            InputAction::MoveUp,
            InputAction::MoveDown,
            InputAction::MoveLeft,
            InputAction::MoveRight,
            InputAction::Quit,
        ] {
            assert!(!snapshot.is_down(action));
        }
    }

    #[test]
    fn render_cap_helpers() {
        assert_eq!(normalize_render_fps_cap(Some(0)), None);
        assert_eq!(format_render_cap(None), "off");
        assert_eq!(format_render_cap(Some(60)), "60");
        let target = target_frame_duration(Some(60));
        assert_eq!(compute_cap_sleep(Duration::from_millis(20), target), Duration::ZERO);
        assert!(compute_cap_sleep(Duration::from_millis(5), target) > Duration::ZERO);
    }
}
