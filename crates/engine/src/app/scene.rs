use std::fmt;

use thiserror::Error;
use tracing::{info, warn};

use super::context::SceneContext;
use super::input::{ActionStates, InputAction};
use crate::assets::{LoadEvent, LoadReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SceneKey(pub &'static str);

impl SceneKey {
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for SceneKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCommand {
    None,
    Start(SceneKey),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SceneRegistryError {
    #[error("scene key '{key}' is already registered")]
    DuplicateKey { key: SceneKey },
    #[error("no scene is registered under '{key}'")]
    UnknownKey { key: SceneKey },
    #[error("no scenes registered")]
    Empty,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    quit_requested: bool,
    actions: ActionStates,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn new(quit_requested: bool, actions: ActionStates) -> Self {
        Self {
            quit_requested,
            actions,
        }
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.actions.is_down(action)
    }

    pub fn with_action_down(mut self, action: InputAction, is_down: bool) -> Self {
        self.actions.set(action, is_down);
        self
    }

    pub fn with_quit_requested(mut self, quit_requested: bool) -> Self {
        self.quit_requested = quit_requested;
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A game stage. Hooks run in this order for each start of the scene:
/// `preload`, any number of `load_progress`, `load_complete`, `create`, then
/// `update` once per fixed tick until `shutdown`.
pub trait Scene {
    fn key(&self) -> SceneKey;

    fn preload(&mut self, _ctx: &mut SceneContext) {}

    fn load_progress(&mut self, _fraction: f32, _ctx: &mut SceneContext) {}

    fn load_complete(&mut self, _report: &LoadReport, _ctx: &mut SceneContext) {}

    fn create(&mut self, ctx: &mut SceneContext) -> SceneCommand;

    fn update(
        &mut self,
        _fixed_dt_seconds: f32,
        _input: &InputSnapshot,
        _ctx: &mut SceneContext,
    ) -> SceneCommand {
        SceneCommand::None
    }

    fn shutdown(&mut self, _ctx: &mut SceneContext) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenePhase {
    Loading,
    Running,
}

pub struct SceneManager {
    scenes: Vec<Box<dyn Scene>>,
    active: Option<usize>,
    phase: ScenePhase,
    context: SceneContext,
    history: Vec<SceneKey>,
    load_reports: Vec<(SceneKey, LoadReport)>,
}

impl SceneManager {
    pub fn new(context: SceneContext) -> Self {
        Self {
            scenes: Vec::new(),
            active: None,
            phase: ScenePhase::Loading,
            context,
            history: Vec::new(),
            load_reports: Vec::new(),
        }
    }

    pub fn with_scenes(
        context: SceneContext,
        scenes: Vec<Box<dyn Scene>>,
    ) -> Result<Self, SceneRegistryError> {
        let mut manager = Self::new(context);
        for scene in scenes {
            manager.register(scene)?;
        }
        Ok(manager)
    }

    pub fn register(&mut self, scene: Box<dyn Scene>) -> Result<(), SceneRegistryError> {
        let key = scene.key();
        if self.index_of(key).is_some() {
            return Err(SceneRegistryError::DuplicateKey { key });
        }
        self.scenes.push(scene);
        Ok(())
    }

    pub fn start_first(&mut self) -> Result<(), SceneRegistryError> {
        let key = self
            .scenes
            .first()
            .map(|scene| scene.key())
            .ok_or(SceneRegistryError::Empty)?;
        self.start(key)
    }

    pub fn start(&mut self, key: SceneKey) -> Result<(), SceneRegistryError> {
        let next = self
            .index_of(key)
            .ok_or(SceneRegistryError::UnknownKey { key })?;

        if let Some(current) = self.active.take() {
            let scene = &mut self.scenes[current];
            scene.shutdown(&mut self.context);
            self.context.reset_scene_state();
            info!(scene = %scene.key(), "scene_shutdown");
        }

        self.active = Some(next);
        self.phase = ScenePhase::Loading;
        self.history.push(key);
        info!(scene = %key, "scene_started");

        self.scenes[next].preload(&mut self.context);
        self.context.load().start();
        Ok(())
    }

    pub fn tick(&mut self, fixed_dt_seconds: f32, input: &InputSnapshot) {
        let Some(index) = self.active else {
            return;
        };
        let command = match self.phase {
            ScenePhase::Loading => self.tick_loading(index),
            ScenePhase::Running => {
                let command =
                    self.scenes[index].update(fixed_dt_seconds, input, &mut self.context);
                self.context.step(fixed_dt_seconds);
                command
            }
        };
        self.apply(command);
    }

    fn tick_loading(&mut self, index: usize) -> SceneCommand {
        let scene = &mut self.scenes[index];
        let events = self.context.poll_loader();
        let mut command = SceneCommand::None;
        for event in events {
            match event {
                LoadEvent::Progress(fraction) => scene.load_progress(fraction, &mut self.context),
                LoadEvent::Complete(report) => {
                    self.context.warn_missing_animation_frames();
                    scene.load_complete(&report, &mut self.context);
                    self.load_reports.push((scene.key(), report));
                    self.phase = ScenePhase::Running;
                    command = scene.create(&mut self.context);
                    self.context.sync_sprites();
                    info!(
                        scene = %scene.key(),
                        display_objects = self.context.display().len(),
                        bodies = self.context.physics().body_count(),
                        "scene_created"
                    );
                }
            }
        }
        command
    }

    fn apply(&mut self, command: SceneCommand) {
        match command {
            SceneCommand::None => {}
            SceneCommand::Start(key) => {
                if let Err(error) = self.start(key) {
                    warn!(error = %error, "scene_start_failed");
                }
            }
        }
    }

    pub fn shutdown_all(&mut self) {
        if let Some(current) = self.active.take() {
            let scene = &mut self.scenes[current];
            scene.shutdown(&mut self.context);
            self.context.reset_scene_state();
            info!(scene = %scene.key(), "scene_shutdown");
        }
    }

    pub fn active_key(&self) -> Option<SceneKey> {
        self.active.map(|index| self.scenes[index].key())
    }

    pub fn phase(&self) -> ScenePhase {
        self.phase
    }

    pub fn history(&self) -> &[SceneKey] {
        &self.history
    }

    pub fn load_reports(&self) -> &[(SceneKey, LoadReport)] {
        &self.load_reports
    }

    pub fn context(&self) -> &SceneContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut SceneContext {
        &mut self.context
    }

    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    fn index_of(&self, key: SceneKey) -> Option<usize> {
        self.scenes.iter().position(|scene| scene.key() == key)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::path::PathBuf;
    use std::rc::Rc;

    use super::*;
    use crate::app::GameConfig;
    use crate::display::Image;

    type Journal = Rc<RefCell<Vec<String>>>;

    struct RecordingScene {
        key: SceneKey,
        next: Option<SceneKey>,
        images: Vec<(&'static str, &'static str)>,
        journal: Journal,
    }

    impl RecordingScene {
        fn boxed(
            key: &'static str,
            next: Option<&'static str>,
            images: Vec<(&'static str, &'static str)>,
            journal: &Journal,
        ) -> Box<dyn Scene> {
            Box::new(Self {
                key: SceneKey(key),
                next: next.map(SceneKey),
                images,
                journal: Rc::clone(journal),
            })
        }

        fn log(&self, entry: String) {
            self.journal.borrow_mut().push(entry);
        }
    }

    impl Scene for RecordingScene {
        fn key(&self) -> SceneKey {
            self.key
        }

        fn preload(&mut self, ctx: &mut SceneContext) {
            self.log(format!("{}:preload", self.key));
            for (key, path) in &self.images {
                ctx.load().image(key, path);
            }
        }

        fn load_progress(&mut self, fraction: f32, _ctx: &mut SceneContext) {
            self.log(format!("{}:progress:{fraction:.2}", self.key));
        }

        fn load_complete(&mut self, report: &LoadReport, _ctx: &mut SceneContext) {
            self.log(format!("{}:complete:{}", self.key, report.requested));
        }

        fn create(&mut self, ctx: &mut SceneContext) -> SceneCommand {
            self.log(format!("{}:create", self.key));
            ctx.display_mut()
                .add_image(Image::new("sky", Vec2::new(0.0, 0.0)));
            match self.next {
                Some(next) => SceneCommand::Start(next),
                None => SceneCommand::None,
            }
        }

        fn update(
            &mut self,
            _fixed_dt_seconds: f32,
            _input: &InputSnapshot,
            _ctx: &mut SceneContext,
        ) -> SceneCommand {
            self.log(format!("{}:update", self.key));
            SceneCommand::None
        }

        fn shutdown(&mut self, ctx: &mut SceneContext) {
            self.log(format!("{}:shutdown:{}", self.key, ctx.display().len()));
        }
    }

    fn context() -> SceneContext {
        SceneContext::new(GameConfig::default(), PathBuf::from("missing-assets"))
    }

    fn journal() -> Journal {
        Rc::new(RefCell::new(Vec::new()))
    }

    #[test]
    fn duplicate_scene_key_is_rejected() {
        let journal = journal();
        let result = SceneManager::with_scenes(
            context(),
            vec![
                RecordingScene::boxed("BootScene", None, Vec::new(), &journal),
                RecordingScene::boxed("BootScene", None, Vec::new(), &journal),
            ],
        );
        assert_eq!(
            result.err(),
            Some(SceneRegistryError::DuplicateKey {
                key: SceneKey("BootScene")
            })
        );
    }

    #[test]
    fn unknown_key_is_an_error_and_keeps_active_scene() {
        let journal = journal();
        let mut manager = SceneManager::with_scenes(
            context(),
            vec![RecordingScene::boxed("BootScene", None, Vec::new(), &journal)],
        )
        .expect("manager");
        manager.start_first().expect("start");

        assert_eq!(
            manager.start(SceneKey("Nope")),
            Err(SceneRegistryError::UnknownKey {
                key: SceneKey("Nope")
            })
        );
        assert_eq!(manager.active_key(), Some(SceneKey("BootScene")));
    }

    #[test]
    fn empty_manager_cannot_start() {
        let mut manager = SceneManager::new(context());
        assert_eq!(manager.start_first(), Err(SceneRegistryError::Empty));
    }

    #[test]
    fn chain_runs_each_scene_once_in_order() {
        let journal = journal();
        let mut manager = SceneManager::with_scenes(
            context(),
            vec![
                RecordingScene::boxed("A", Some("B"), Vec::new(), &journal),
                RecordingScene::boxed("B", Some("C"), Vec::new(), &journal),
                RecordingScene::boxed("C", None, Vec::new(), &journal),
            ],
        )
        .expect("manager");
        manager.start_first().expect("start");
        for _ in 0..5 {
            manager.tick(1.0 / 60.0, &InputSnapshot::empty());
        }

        assert_eq!(
            manager.history(),
            &[SceneKey("A"), SceneKey("B"), SceneKey("C")]
        );
        assert_eq!(manager.phase(), ScenePhase::Running);

        let entries = journal.borrow();
        let position = |needle: &str| {
            entries
                .iter()
                .position(|entry| entry == needle)
                .unwrap_or_else(|| panic!("missing {needle} in {entries:?}"))
        };
        assert!(position("A:create") < position("A:shutdown:1"));
        assert!(position("A:shutdown:1") < position("B:preload"));
        assert!(position("B:create") < position("C:preload"));
        assert!(position("C:create") < position("C:update"));
        assert_eq!(
            entries.iter().filter(|entry| entry.ends_with(":create")).count(),
            3
        );
    }

    #[test]
    fn load_events_precede_create() {
        let journal = journal();
        let mut manager = SceneManager::with_scenes(
            context(),
            vec![RecordingScene::boxed(
                "Preload",
                None,
                vec![("sky", "assets/sky.png"), ("ground", "assets/platform.png")],
                &journal,
            )],
        )
        .expect("manager");
        manager.start_first().expect("start");

        manager.tick(1.0 / 60.0, &InputSnapshot::empty());
        assert_eq!(manager.phase(), ScenePhase::Loading);
        manager.tick(1.0 / 60.0, &InputSnapshot::empty());
        assert_eq!(manager.phase(), ScenePhase::Running);

        assert_eq!(
            journal.borrow().as_slice(),
            &[
                "Preload:preload".to_string(),
                "Preload:progress:0.50".to_string(),
                "Preload:progress:1.00".to_string(),
                "Preload:complete:2".to_string(),
                "Preload:create".to_string(),
            ]
        );
        let (_, report) = &manager.load_reports()[0];
        assert_eq!(report.failed_keys.len(), 2);
    }

    #[test]
    fn scene_switch_clears_display_list_but_keeps_assets() {
        let journal = journal();
        let mut manager = SceneManager::with_scenes(
            context(),
            vec![
                RecordingScene::boxed("A", Some("B"), Vec::new(), &journal),
                RecordingScene::boxed("B", None, Vec::new(), &journal),
            ],
        )
        .expect("manager");
        manager.start_first().expect("start");
        manager.tick(1.0 / 60.0, &InputSnapshot::empty());

        assert_eq!(manager.active_key(), Some(SceneKey("B")));
        assert_eq!(manager.phase(), ScenePhase::Loading);
        assert!(manager.context().display().is_empty());

        manager.tick(1.0 / 60.0, &InputSnapshot::empty());
        assert_eq!(manager.context().display().len(), 1);
    }

    #[test]
    fn shutdown_all_runs_active_shutdown_hook() {
        let journal = journal();
        let mut manager = SceneManager::with_scenes(
            context(),
            vec![RecordingScene::boxed("A", None, Vec::new(), &journal)],
        )
        .expect("manager");
        manager.start_first().expect("start");
        manager.tick(1.0 / 60.0, &InputSnapshot::empty());
        manager.shutdown_all();

        assert_eq!(manager.active_key(), None);
        assert!(journal.borrow().contains(&"A:shutdown:1".to_string()));
        manager.tick(1.0 / 60.0, &InputSnapshot::empty());
    }
}
