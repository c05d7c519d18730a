//=========================================================================
// Scene Manager
//=========================================================================
//
// Manages scene registration, switching, transitions, and updates.
//
// Scenes are stored in a HashMap by name. The current and previous
// scenes are referenced by name, so the current scene is always either
// registered or None.
//
// Switching:
//   switch_to(name)
//     ├─ unknown name      → Err(NotFound), nothing touched
//     ├─ transition busy   → queued behind earlier requests (FIFO)
//     ├─ already current   → resolved handle, no hooks
//     ├─ transition path   → exit old + enter new, start timer
//     └─ direct path       → exit old → inactive, enter new → active
//
// The transition path settles scene states only in update(), when the
// timer reaches full progress. Hooks that defer their completion are
// awaited by the direct path and polled by update() everywhere else.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossbeam_channel::Receiver;
use log::{debug, error, warn};

//=== Internal Dependencies ===============================================

use super::deferred::PendingHook;
use super::event::{EventChannel, SceneEvent};
use super::switch::{SwitchHandle, SwitchResponder};
use super::transition_queue::{PendingSwitch, TransitionQueue};
use super::{
    Scene, SceneState, Transition, TransitionSettings, DEFAULT_TRANSITION_DURATION,
};
use crate::core::clock::{Clock, SystemClock};
use crate::core::config::{ConfigError, SceneManagerConfig};
use crate::core::error::SceneError;

//=== Active Transition ===================================================

/// The single in-flight transition and the scene it leads to.
struct ActiveTransition {
    transition: Transition,
    target: String,
}

//=== SceneManagerBuilder =================================================

/// Builder for configuring and constructing a [`SceneManager`].
///
/// # Default Values
///
/// - **Transitions**: enabled
/// - **Default transition duration**: 1000 ms
/// - **Event capacity**: 128 events
/// - **Clock**: [`SystemClock`]
///
/// # Examples
///
/// ```rust
/// # use aetheric_scene::prelude::*;
/// # use std::time::Duration;
/// let manager = SceneManagerBuilder::new()
///     .with_default_duration(Duration::from_millis(300))
///     .with_clock(ManualClock::new())
///     .build();
/// assert!(manager.transitions_enabled());
/// ```
pub struct SceneManagerBuilder {
    enable_transitions: bool,
    default_duration: Duration,
    event_capacity: usize,
    clock: Option<Box<dyn Clock>>,
}

impl SceneManagerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            enable_transitions: true,
            default_duration: DEFAULT_TRANSITION_DURATION,
            event_capacity: 128,
            clock: None,
        }
    }

    /// Creates a builder seeded from `config`, after validating it.
    pub fn from_config(config: &SceneManagerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new()
            .with_transitions(config.enable_transitions)
            .with_default_duration(config.default_transition_duration())
            .with_event_capacity(config.event_capacity))
    }

    /// Enables or disables timed transitions.
    ///
    /// Default: true
    pub fn with_transitions(mut self, enabled: bool) -> Self {
        self.enable_transitions = enabled;
        self
    }

    /// Sets the duration used when a switch does not specify one.
    ///
    /// Default: 1000 ms
    pub fn with_default_duration(mut self, duration: Duration) -> Self {
        self.default_duration = duration;
        self
    }

    /// Sets how many undelivered events are buffered.
    ///
    /// Default: 128
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Event capacity must be positive");
        self.event_capacity = capacity;
        self
    }

    /// Sets the time source for transitions and `tick` deltas.
    pub fn with_clock<C>(mut self, clock: C) -> Self
    where
        C: Clock + 'static,
    {
        self.clock = Some(Box::new(clock));
        self
    }

    /// Builds the scene manager.
    pub fn build(self) -> SceneManager {
        debug!(
            "Building scene manager (transitions: {}, default duration: {:?})",
            self.enable_transitions, self.default_duration
        );

        SceneManager {
            scenes: HashMap::new(),
            current: None,
            previous: None,
            active_transition: None,
            pending: TransitionQueue::new(),
            in_flight: Vec::new(),
            events: EventChannel::new(self.event_capacity),
            clock: self.clock.unwrap_or_else(|| Box::new(SystemClock)),
            last_update: None,
            enable_transitions: self.enable_transitions,
            default_duration: self.default_duration,
        }
    }
}

impl Default for SceneManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Scene Manager =======================================================

/// Owns the scenes and coordinates switching between them.
///
/// At most one transition runs at a time. Switches requested while it
/// runs are queued and started, in order, once it completes.
///
/// # Examples
///
/// ```rust
/// # use aetheric_scene::prelude::*;
/// # use std::time::Duration;
/// let mut manager = SceneManagerBuilder::new().with_transitions(false).build();
/// manager.add_scene(Scene::new("menu")).unwrap();
/// manager.add_scene(Scene::new("game")).unwrap();
///
/// let _ = manager.switch_to("menu").unwrap();
/// let _ = manager.switch_to("game").unwrap();
///
/// assert_eq!(manager.current_scene().map(Scene::name), Some("game"));
/// assert_eq!(manager.previous_scene().map(Scene::name), Some("menu"));
/// manager.update(Duration::from_millis(16)).unwrap();
/// ```
pub struct SceneManager {
    scenes: HashMap<String, Scene>,
    current: Option<String>,
    previous: Option<String>,
    active_transition: Option<ActiveTransition>,
    pending: TransitionQueue,
    in_flight: Vec<PendingHook>,
    events: EventChannel,
    clock: Box<dyn Clock>,
    last_update: Option<Instant>,
    enable_transitions: bool,
    default_duration: Duration,
}

impl SceneManager {
    //--- Construction -----------------------------------------------------

    /// Creates a manager with default settings.
    pub fn new() -> Self {
        SceneManagerBuilder::new().build()
    }

    /// Creates a manager from configuration.
    ///
    /// Out-of-range values are reported as [`ConfigError::Invalid`].
    pub fn from_config(config: &SceneManagerConfig) -> Result<Self, ConfigError> {
        Ok(SceneManagerBuilder::from_config(config)?.build())
    }

    //--- Registration -----------------------------------------------------

    /// Adds a scene, keyed by its name.
    ///
    /// A registered scene of the same name is replaced and returned.
    /// Replacing the current scene is refused, since the running
    /// instance would be orphaned.
    pub fn add_scene(&mut self, scene: Scene) -> Result<Option<Scene>, SceneError> {
        let name = scene.name().to_string();
        if self.current.as_deref() == Some(name.as_str()) {
            warn!("Refusing to replace current scene {:?}", name);
            return Err(SceneError::SceneActive(name));
        }

        let replaced = self.scenes.insert(name.clone(), scene);
        if replaced.is_some() {
            warn!("Scene {:?} was already registered and has been replaced", name);
        } else {
            debug!("Registered scene {:?}", name);
        }
        Ok(replaced)
    }

    /// Removes a scene and hands it back.
    ///
    /// Removing the current scene clears it without calling `on_exit`.
    pub fn remove_scene(&mut self, name: &str) -> Option<Scene> {
        let removed = self.scenes.remove(name)?;

        if self.current.as_deref() == Some(name) {
            debug!("Removed current scene {:?}; no scene is current", name);
            self.current = None;
        }
        if self.previous.as_deref() == Some(name) {
            self.previous = None;
        }

        self.events.publish(SceneEvent::SceneRemoved {
            name: name.to_string(),
        });
        Some(removed)
    }

    //--- Query API --------------------------------------------------------

    pub fn has_scene(&self, name: &str) -> bool {
        self.scenes.contains_key(name)
    }

    /// Names of all registered scenes, in no particular order.
    pub fn scene_names(&self) -> Vec<&str> {
        self.scenes.keys().map(String::as_str).collect()
    }

    pub fn scene(&self, name: &str) -> Option<&Scene> {
        self.scenes.get(name)
    }

    pub fn scene_mut(&mut self, name: &str) -> Option<&mut Scene> {
        self.scenes.get_mut(name)
    }

    pub fn current_scene(&self) -> Option<&Scene> {
        self.current.as_deref().and_then(|name| self.scenes.get(name))
    }

    pub fn current_scene_mut(&mut self) -> Option<&mut Scene> {
        self.current.as_deref().and_then(|name| self.scenes.get_mut(name))
    }

    /// The scene that was current before the latest switch, if still registered.
    pub fn previous_scene(&self) -> Option<&Scene> {
        self.previous.as_deref().and_then(|name| self.scenes.get(name))
    }

    /// Returns true while a transition is running.
    pub fn is_transitioning(&self) -> bool {
        self.active_transition.is_some()
    }

    /// Eased progress of the running transition, as of the last update.
    pub fn transition_progress(&self) -> Option<f32> {
        self.active_transition
            .as_ref()
            .map(|active| active.transition.progress())
    }

    /// Number of deferred hooks that have not reported back yet.
    pub fn deferred_hooks(&self) -> usize {
        self.in_flight.len()
    }

    /// Targets of switches waiting for the running transition, oldest first.
    pub fn pending_switches(&self) -> Vec<&str> {
        self.pending.targets().collect()
    }

    /// Returns a receiver for lifecycle events.
    ///
    /// This is a work queue, not a broadcast: every receiver returned here
    /// drains the same buffer, so each event reaches exactly one of them.
    /// Use a single receiver and fan out from it when several listeners
    /// need every event. Undelivered events are buffered up to the event
    /// capacity, after which the oldest are evicted.
    pub fn events(&self) -> Receiver<SceneEvent> {
        self.events.subscribe()
    }

    //--- Settings ---------------------------------------------------------

    pub fn transitions_enabled(&self) -> bool {
        self.enable_transitions
    }

    pub fn set_transitions_enabled(&mut self, enabled: bool) {
        self.enable_transitions = enabled;
    }

    pub fn default_transition_duration(&self) -> Duration {
        self.default_duration
    }

    pub fn set_default_transition_duration(&mut self, duration: Duration) {
        self.default_duration = duration;
    }

    //--- Switching --------------------------------------------------------

    /// Switches to `name`, using a transition if one already runs a scene.
    ///
    /// With transitions enabled and a current scene, the switch runs a
    /// transition of the default duration; otherwise it is direct.
    pub fn switch_to(&mut self, name: &str) -> Result<SwitchHandle, SceneError> {
        self.request_switch(name, None)
    }

    /// Switches to `name` with explicit transition settings.
    ///
    /// When transitions are enabled this always uses the transition
    /// path, even with no current scene.
    pub fn switch_to_with(
        &mut self,
        name: &str,
        settings: TransitionSettings,
    ) -> Result<SwitchHandle, SceneError> {
        self.request_switch(name, Some(settings))
    }

    fn request_switch(
        &mut self,
        name: &str,
        settings: Option<TransitionSettings>,
    ) -> Result<SwitchHandle, SceneError> {
        if !self.scenes.contains_key(name) {
            return Err(SceneError::NotFound(name.to_string()));
        }

        // While anything is in flight, every request keeps its place in line.
        let busy = self.active_transition.is_some() || !self.pending.is_empty();

        if !busy && self.current.as_deref() == Some(name) {
            debug!("Scene {:?} is already current, skipping switch", name);
            return Ok(SwitchHandle::completed());
        }

        let (handle, responder) = SwitchHandle::pending();

        if busy {
            self.pending.push(PendingSwitch {
                target: name.to_string(),
                settings,
                responder,
            });
            debug!(
                "Transition in progress, queued switch to {:?} ({} waiting)",
                name,
                self.pending.len()
            );
            self.events.publish(SceneEvent::SwitchQueued {
                to: name.to_string(),
            });
            return Ok(handle);
        }

        self.begin_switch(name.to_string(), settings, responder)?;
        Ok(handle)
    }

    fn begin_switch(
        &mut self,
        target: String,
        settings: Option<TransitionSettings>,
        responder: SwitchResponder,
    ) -> Result<(), SceneError> {
        self.previous = self.current.clone();

        if self.enable_transitions && (self.current.is_some() || settings.is_some()) {
            self.start_transition(target, settings.unwrap_or_default(), responder);
            Ok(())
        } else {
            self.switch_direct(target)?;
            responder.resolve(Ok(()));
            Ok(())
        }
    }

    fn start_transition(
        &mut self,
        target: String,
        settings: TransitionSettings,
        responder: SwitchResponder,
    ) {
        let options = settings
            .into_options(self.default_duration)
            .on_complete(move || responder.resolve(Ok(())));
        let duration = options.duration;
        let from = self.current.clone();

        debug!(
            "Starting transition {:?} -> {:?} ({:?})",
            from, target, duration
        );

        // Hook results are reported, not returned: the switch completes
        // on the timer alone, and deferred hooks are polled by update().
        if let Some(old) = from.as_deref() {
            let result = self.with_scene(old, |scene| {
                scene.set_state(SceneState::Exiting);
                scene.exit()
            });
            self.track(result);
        }

        let result = self.with_scene(&target, |scene| {
            scene.set_state(SceneState::Entering);
            scene.enter()
        });
        self.track(result);

        self.current = Some(target.clone());

        let mut transition = Transition::new(options);
        transition.start_at(self.clock.now());

        self.events.publish(SceneEvent::TransitionStarted {
            from,
            to: target.clone(),
            duration,
        });
        self.active_transition = Some(ActiveTransition { transition, target });
    }

    fn switch_direct(&mut self, target: String) -> Result<(), SceneError> {
        if let Some(old) = self.current.clone() {
            let exiting = self.with_scene(&old, |scene| {
                scene.set_state(SceneState::Exiting);
                scene.exit()
            })?;
            Self::settle(exiting)?;
            self.set_scene_state(&old, SceneState::Inactive);
        }

        self.current = Some(target.clone());
        let entering = self.with_scene(&target, |scene| {
            scene.set_state(SceneState::Entering);
            scene.enter()
        })?;
        Self::settle(entering)?;
        self.set_scene_state(&target, SceneState::Active);

        debug!("Switched scene {:?} -> {:?}", self.previous, target);
        self.events.publish(SceneEvent::SceneSwitched {
            from: self.previous.clone(),
            to: target,
        });
        Ok(())
    }

    //--- Pause / Resume ---------------------------------------------------

    /// Pauses the current scene if it is active.
    pub fn pause_current_scene(&mut self) -> Result<(), SceneError> {
        let deferred = match self.current_scene_mut() {
            Some(scene) if scene.is_active() => {
                scene.set_state(SceneState::Paused);
                scene.pause()?
            }
            _ => None,
        };
        self.in_flight.extend(deferred);
        Ok(())
    }

    /// Resumes the current scene if it is paused.
    pub fn resume_current_scene(&mut self) -> Result<(), SceneError> {
        let deferred = match self.current_scene_mut() {
            Some(scene) if scene.is_paused() => {
                scene.set_state(SceneState::Active);
                scene.resume()?
            }
            _ => None,
        };
        self.in_flight.extend(deferred);
        Ok(())
    }

    //--- Update Loop ------------------------------------------------------

    /// Collects finished deferred hooks, advances the running transition,
    /// then updates the current scene.
    ///
    /// `dt` is passed unchanged to `on_update`, which only runs while the
    /// current scene is active. An `on_update` error is returned; deferred
    /// hook failures are published as [`SceneEvent::HookFailed`].
    pub fn update(&mut self, dt: Duration) -> Result<(), SceneError> {
        let now = self.clock.now();
        self.update_at(now, dt)
    }

    /// Like [`SceneManager::update`], with `dt` measured by the clock since
    /// the previous update. The first call uses a zero delta.
    pub fn tick(&mut self) -> Result<(), SceneError> {
        let now = self.clock.now();
        let dt = self
            .last_update
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or_default();
        self.update_at(now, dt)
    }

    fn update_at(&mut self, now: Instant, dt: Duration) -> Result<(), SceneError> {
        self.last_update = Some(now);
        self.poll_in_flight();
        self.advance_transition(now);

        let deferred = match self.current_scene_mut() {
            Some(scene) if scene.is_active() => scene.update(dt)?,
            _ => None,
        };
        self.in_flight.extend(deferred);
        Ok(())
    }

    fn poll_in_flight(&mut self) {
        let mut finished = Vec::new();
        self.in_flight.retain(|hook| match hook.poll() {
            Some(result) => {
                finished.push(result);
                false
            }
            None => true,
        });

        for err in finished.into_iter().filter_map(Result::err) {
            self.report_error(&err);
        }
    }

    fn advance_transition(&mut self, now: Instant) {
        let Some(active) = self.active_transition.as_mut() else {
            return;
        };

        active.transition.update_at(now);
        if active.transition.is_active() {
            return;
        }

        let Some(finished) = self.active_transition.take() else {
            return;
        };
        self.finish_transition(finished.target);
        self.run_pending();
    }

    fn finish_transition(&mut self, target: String) {
        if let Some(current) = self.current.clone() {
            self.set_scene_state(&current, SceneState::Active);
        }
        if let Some(previous) = self.previous.clone() {
            if self.current.as_deref() != Some(previous.as_str()) {
                self.set_scene_state(&previous, SceneState::Inactive);
            }
        }

        if !self.scenes.contains_key(&target) {
            debug!("Transition target {:?} was removed, nothing to complete", target);
            return;
        }

        debug!("Transition to {:?} complete", target);
        self.events.publish(SceneEvent::TransitionCompleted { scene: target });
    }

    /// Starts queued switches until one begins a new transition.
    fn run_pending(&mut self) {
        while self.active_transition.is_none() && !self.pending.is_empty() {
            let Some(PendingSwitch {
                target,
                settings,
                responder,
            }) = self.pending.pop()
            else {
                break;
            };

            if !self.scenes.contains_key(&target) {
                warn!("Queued switch target {:?} is no longer registered", target);
                responder.resolve(Err(SceneError::NotFound(target)));
                continue;
            }
            if self.current.as_deref() == Some(target.as_str()) {
                responder.resolve(Ok(()));
                continue;
            }

            debug!("Running queued switch to {:?}", target);
            if let Err(err) = self.begin_switch(target, settings, responder.clone()) {
                self.report_error(&err);
                responder.resolve(Err(err));
            }
        }
    }

    //--- Internal Helpers -------------------------------------------------

    fn with_scene<F>(&mut self, name: &str, call: F) -> Result<Option<PendingHook>, SceneError>
    where
        F: FnOnce(&mut Scene) -> Result<Option<PendingHook>, SceneError>,
    {
        match self.scenes.get_mut(name) {
            Some(scene) => call(scene),
            None => Ok(None),
        }
    }

    /// Blocks on a deferred hook, if there is one.
    fn settle(deferred: Option<PendingHook>) -> Result<(), SceneError> {
        deferred.map_or(Ok(()), PendingHook::wait)
    }

    fn set_scene_state(&mut self, name: &str, state: SceneState) {
        if let Some(scene) = self.scenes.get_mut(name) {
            scene.set_state(state);
        }
    }

    /// Keeps a deferred hook for polling; reports an immediate failure.
    fn track(&mut self, result: Result<Option<PendingHook>, SceneError>) {
        match result {
            Ok(deferred) => self.in_flight.extend(deferred),
            Err(err) => self.report_error(&err),
        }
    }

    fn report_error(&self, err: &SceneError) {
        error!("{}", err);
        if let SceneError::Hook { scene, hook, source } = err {
            self.events.publish(SceneEvent::HookFailed {
                scene: scene.clone(),
                hook: *hook,
                message: source.to_string(),
            });
        }
    }
}

impl Default for SceneManager {
    fn default() -> Self {
        Self::new()
    }
}

//=== Tests ===============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::ManualClock;
    use crate::core::error::HookResult;
    use crate::core::scene::{Easing, Hook, HookCompleter, SceneContext, SceneHooks};
    use std::sync::{Arc, Mutex};
    use std::thread;

    //--- Fixtures ---------------------------------------------------------

    type Log = Arc<Mutex<Vec<String>>>;

    /// Records every hook call as "<scene>:<hook>".
    struct Recorder {
        log: Log,
        fail_on: Option<Hook>,
    }

    impl Recorder {
        fn record(&self, ctx: &SceneContext<'_>, hook: Hook) -> HookResult {
            self.log.lock().unwrap().push(format!("{}:{}", ctx.name, hook));
            if self.fail_on == Some(hook) {
                return Err(format!("{} failed", hook).into());
            }
            Ok(())
        }
    }

    impl SceneHooks for Recorder {
        fn on_enter(&mut self, ctx: &mut SceneContext<'_>) -> HookResult {
            self.record(ctx, Hook::Enter)
        }

        fn on_exit(&mut self, ctx: &mut SceneContext<'_>) -> HookResult {
            self.record(ctx, Hook::Exit)
        }

        fn on_update(&mut self, ctx: &mut SceneContext<'_>, dt: Duration) -> HookResult {
            self.log
                .lock()
                .unwrap()
                .push(format!("{}:on_update:{}", ctx.name, dt.as_millis()));
            Ok(())
        }

        fn on_pause(&mut self, ctx: &mut SceneContext<'_>) -> HookResult {
            self.record(ctx, Hook::Pause)
        }

        fn on_resume(&mut self, ctx: &mut SceneContext<'_>) -> HookResult {
            self.record(ctx, Hook::Resume)
        }
    }

    /// Defers `on_enter` and parks the completer for the test to finish.
    struct ParkedEnter {
        slot: Arc<Mutex<Option<HookCompleter>>>,
    }

    impl SceneHooks for ParkedEnter {
        fn on_enter(&mut self, ctx: &mut SceneContext<'_>) -> HookResult {
            *self.slot.lock().unwrap() = Some(ctx.defer());
            Ok(())
        }
    }

    /// Defers `on_enter` to a worker thread that reports after a delay.
    struct BackgroundEnter {
        fail: bool,
    }

    impl SceneHooks for BackgroundEnter {
        fn on_enter(&mut self, ctx: &mut SceneContext<'_>) -> HookResult {
            let completer = ctx.defer();
            let fail = self.fail;
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(10));
                if fail {
                    completer.complete(Err("load failed".into()));
                } else {
                    completer.complete(Ok(()));
                }
            });
            Ok(())
        }
    }

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn recorded(log: &Log, name: &str) -> Scene {
        failing(log, name, None)
    }

    fn failing(log: &Log, name: &str, fail_on: Option<Hook>) -> Scene {
        Scene::with_hooks(
            name,
            Recorder {
                log: Arc::clone(log),
                fail_on,
            },
        )
    }

    fn entries(log: &Log) -> Vec<String> {
        log.lock().unwrap().clone()
    }

    fn direct_manager(log: &Log) -> SceneManager {
        let mut manager = SceneManagerBuilder::new().with_transitions(false).build();
        manager.add_scene(recorded(log, "a")).unwrap();
        manager.add_scene(recorded(log, "b")).unwrap();
        manager
    }

    fn transition_manager(log: &Log, clock: &ManualClock) -> SceneManager {
        let mut manager = SceneManagerBuilder::new()
            .with_clock(clock.clone())
            .build();
        manager.add_scene(recorded(log, "a")).unwrap();
        manager.add_scene(recorded(log, "b")).unwrap();
        manager.add_scene(recorded(log, "c")).unwrap();
        // No current scene and no settings: the first switch is direct.
        let _ = manager.switch_to("a").unwrap();
        log.lock().unwrap().clear();
        manager
    }

    fn state_of(manager: &SceneManager, name: &str) -> SceneState {
        manager.scene(name).unwrap().state()
    }

    //--- Builder Tests ----------------------------------------------------

    #[test]
    fn builder_defaults() {
        let builder = SceneManagerBuilder::new();
        assert!(builder.enable_transitions);
        assert_eq!(builder.default_duration, ms(1000));
        assert_eq!(builder.event_capacity, 128);
    }

    #[test]
    #[should_panic(expected = "Event capacity must be positive")]
    fn builder_with_event_capacity_panics_on_zero() {
        SceneManagerBuilder::new().with_event_capacity(0);
    }

    #[test]
    fn from_config_applies_settings() {
        let config = SceneManagerConfig {
            enable_transitions: false,
            default_transition_duration_ms: 250,
            ..SceneManagerConfig::default()
        };
        let manager = SceneManager::from_config(&config).unwrap();
        assert!(!manager.transitions_enabled());
        assert_eq!(manager.default_transition_duration(), ms(250));
    }

    #[test]
    fn from_config_rejects_zero_event_capacity() {
        let config = SceneManagerConfig {
            event_capacity: 0,
            ..SceneManagerConfig::default()
        };
        let err = SceneManager::from_config(&config).err().unwrap();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    //--- Registration Tests -----------------------------------------------

    #[test]
    fn has_scene_tracks_membership() {
        let mut manager = SceneManager::new();
        assert!(!manager.has_scene("a"));

        manager.add_scene(Scene::new("a")).unwrap();
        manager.add_scene(Scene::new("b")).unwrap();
        assert!(manager.has_scene("a"));

        let mut names = manager.scene_names();
        names.sort_unstable();
        assert_eq!(names, vec!["a", "b"]);

        assert!(manager.remove_scene("a").is_some());
        assert!(!manager.has_scene("a"));
        assert_eq!(manager.scene_names(), vec!["b"]);
    }

    #[test]
    fn re_adding_inactive_scene_replaces_it() {
        let mut manager = SceneManager::new();
        let mut first = Scene::new("a");
        first.set_data("version", 1_u8);
        manager.add_scene(first).unwrap();

        let mut second = Scene::new("a");
        second.set_data("version", 2_u8);
        let replaced = manager.add_scene(second).unwrap();

        assert_eq!(replaced.unwrap().get_data::<u8>("version"), Some(&1));
        assert_eq!(manager.scene("a").unwrap().get_data::<u8>("version"), Some(&2));
    }

    #[test]
    fn re_adding_current_scene_is_refused() {
        let log = Log::default();
        let mut manager = direct_manager(&log);
        let _ = manager.switch_to("a").unwrap();

        let err = manager.add_scene(Scene::new("a")).unwrap_err();
        assert!(matches!(err, SceneError::SceneActive(name) if name == "a"));
        assert!(manager.current_scene().unwrap().is_active());
    }

    #[test]
    fn removing_current_scene_skips_exit() {
        let log = Log::default();
        let mut manager = direct_manager(&log);
        let _ = manager.switch_to("a").unwrap();
        log.lock().unwrap().clear();

        let removed = manager.remove_scene("a").unwrap();
        assert_eq!(removed.name(), "a");
        assert!(manager.current_scene().is_none());
        assert!(entries(&log).is_empty());
    }

    #[test]
    fn remove_unknown_scene_is_none() {
        let mut manager = SceneManager::new();
        assert!(manager.remove_scene("ghost").is_none());
    }

    //--- Switch Tests -----------------------------------------------------

    #[test]
    fn switch_to_unknown_scene_fails_without_mutation() {
        let log = Log::default();
        let mut manager = direct_manager(&log);
        let _ = manager.switch_to("a").unwrap();
        let _ = manager.switch_to("b").unwrap();

        let err = manager.switch_to("ghost").unwrap_err();
        assert_eq!(err.to_string(), "Scene \"ghost\" not found");
        assert_eq!(manager.current_scene().unwrap().name(), "b");
        assert_eq!(manager.previous_scene().unwrap().name(), "a");
    }

    #[test]
    fn switch_to_current_scene_is_noop() {
        let log = Log::default();
        let mut manager = direct_manager(&log);
        let _ = manager.switch_to("a").unwrap();
        log.lock().unwrap().clear();

        let mut handle = manager.switch_to("a").unwrap();
        assert!(handle.is_complete());
        assert!(entries(&log).is_empty());
        assert!(manager.previous_scene().is_none());
    }

    #[test]
    fn direct_switch_sequences_exit_before_enter() {
        let log = Log::default();
        let mut manager = direct_manager(&log);
        let _ = manager.switch_to("a").unwrap();
        log.lock().unwrap().clear();

        let mut handle = manager.switch_to("b").unwrap();

        assert!(matches!(handle.try_result(), Some(Ok(()))));
        assert_eq!(entries(&log), vec!["a:on_exit", "b:on_enter"]);
        assert_eq!(state_of(&manager, "a"), SceneState::Inactive);
        assert_eq!(state_of(&manager, "b"), SceneState::Active);
        assert_eq!(manager.current_scene().unwrap().name(), "b");
        assert_eq!(manager.previous_scene().unwrap().name(), "a");
    }

    #[test]
    fn first_switch_without_settings_is_direct() {
        let log = Log::default();
        let mut manager = SceneManager::new();
        manager.add_scene(recorded(&log, "a")).unwrap();

        let mut handle = manager.switch_to("a").unwrap();
        assert!(handle.is_complete());
        assert!(!manager.is_transitioning());
        assert_eq!(state_of(&manager, "a"), SceneState::Active);
    }

    #[test]
    fn direct_enter_failure_leaves_scene_entering() {
        let log = Log::default();
        let mut manager = SceneManagerBuilder::new().with_transitions(false).build();
        manager.add_scene(recorded(&log, "a")).unwrap();
        manager.add_scene(failing(&log, "b", Some(Hook::Enter))).unwrap();
        let _ = manager.switch_to("a").unwrap();

        let err = manager.switch_to("b").unwrap_err();
        assert!(matches!(err, SceneError::Hook { hook: Hook::Enter, .. }));
        assert_eq!(manager.current_scene().unwrap().name(), "b");
        assert_eq!(state_of(&manager, "b"), SceneState::Entering);
        assert_eq!(state_of(&manager, "a"), SceneState::Inactive);
    }

    #[test]
    fn direct_exit_failure_keeps_old_scene_current() {
        let log = Log::default();
        let mut manager = SceneManagerBuilder::new().with_transitions(false).build();
        manager.add_scene(failing(&log, "a", Some(Hook::Exit))).unwrap();
        manager.add_scene(recorded(&log, "b")).unwrap();
        let _ = manager.switch_to("a").unwrap();

        let err = manager.switch_to("b").unwrap_err();
        assert!(matches!(err, SceneError::Hook { hook: Hook::Exit, .. }));
        assert_eq!(manager.current_scene().unwrap().name(), "a");
        assert_eq!(state_of(&manager, "a"), SceneState::Exiting);
        assert_eq!(state_of(&manager, "b"), SceneState::Inactive);
    }

    //--- Transition Tests -------------------------------------------------

    #[test]
    fn transition_switch_settles_on_completion() {
        let log = Log::default();
        let clock = ManualClock::new();
        let mut manager = transition_manager(&log, &clock);

        let mut handle = manager.switch_to("b").unwrap();

        assert!(manager.is_transitioning());
        assert!(!handle.is_complete());
        assert_eq!(entries(&log), vec!["a:on_exit", "b:on_enter"]);
        assert_eq!(manager.current_scene().unwrap().name(), "b");
        assert_eq!(state_of(&manager, "a"), SceneState::Exiting);
        assert_eq!(state_of(&manager, "b"), SceneState::Entering);

        clock.advance(ms(500));
        manager.update(ms(500)).unwrap();
        assert!(manager.is_transitioning());
        assert!(!handle.is_complete());
        assert_eq!(state_of(&manager, "b"), SceneState::Entering);

        clock.advance(ms(500));
        manager.update(ms(500)).unwrap();
        assert!(!manager.is_transitioning());
        assert!(matches!(handle.try_result(), Some(Ok(()))));
        assert_eq!(state_of(&manager, "a"), SceneState::Inactive);
        assert_eq!(state_of(&manager, "b"), SceneState::Active);
    }

    #[test]
    fn completing_update_also_ticks_new_scene() {
        let log = Log::default();
        let clock = ManualClock::new();
        let mut manager = transition_manager(&log, &clock);
        let _ = manager.switch_to("b").unwrap();
        log.lock().unwrap().clear();

        clock.advance(ms(1000));
        manager.update(ms(16)).unwrap();
        assert_eq!(entries(&log), vec!["b:on_update:16"]);
    }

    #[test]
    fn transition_progress_is_reported() {
        let log = Log::default();
        let clock = ManualClock::new();
        let mut manager = transition_manager(&log, &clock);
        let _ = manager
            .switch_to_with("b", TransitionSettings::new().easing(Easing::EaseIn))
            .unwrap();

        clock.advance(ms(500));
        manager.update(ms(500)).unwrap();
        let progress = manager.transition_progress().unwrap();
        assert!((progress - 0.25).abs() < 1e-4);
    }

    #[test]
    fn explicit_settings_force_transition_without_current_scene() {
        let log = Log::default();
        let clock = ManualClock::new();
        let mut manager = SceneManagerBuilder::new().with_clock(clock.clone()).build();
        manager.add_scene(recorded(&log, "a")).unwrap();

        let mut handle = manager
            .switch_to_with("a", TransitionSettings::new().duration(ms(200)))
            .unwrap();
        assert!(manager.is_transitioning());
        assert_eq!(state_of(&manager, "a"), SceneState::Entering);

        clock.advance(ms(200));
        manager.update(ms(200)).unwrap();
        assert!(handle.is_complete());
        assert_eq!(state_of(&manager, "a"), SceneState::Active);
    }

    #[test]
    fn per_switch_duration_overrides_default() {
        let log = Log::default();
        let clock = ManualClock::new();
        let mut manager = transition_manager(&log, &clock);
        let mut handle = manager
            .switch_to_with("b", TransitionSettings::new().duration(ms(100)))
            .unwrap();

        clock.advance(ms(100));
        manager.update(ms(100)).unwrap();
        assert!(handle.is_complete());
    }

    #[test]
    fn transition_hook_failure_is_published_not_returned() {
        let log = Log::default();
        let clock = ManualClock::new();
        let mut manager = SceneManagerBuilder::new().with_clock(clock.clone()).build();
        manager.add_scene(recorded(&log, "a")).unwrap();
        manager.add_scene(failing(&log, "b", Some(Hook::Enter))).unwrap();
        let _ = manager.switch_to("a").unwrap();
        let events = manager.events();
        while events.try_recv().is_ok() {}

        let mut handle = manager.switch_to("b").unwrap();
        assert!(manager.is_transitioning());

        let failures: Vec<_> = events
            .try_iter()
            .filter(|event| matches!(event, SceneEvent::HookFailed { .. }))
            .collect();
        assert_eq!(
            failures,
            vec![SceneEvent::HookFailed {
                scene: "b".into(),
                hook: Hook::Enter,
                message: "on_enter failed".into(),
            }]
        );

        clock.advance(ms(1000));
        manager.update(ms(16)).unwrap();
        assert!(matches!(handle.try_result(), Some(Ok(()))));
        assert_eq!(state_of(&manager, "b"), SceneState::Active);
    }

    #[test]
    fn transition_exit_failure_settles_old_scene() {
        let log = Log::default();
        let clock = ManualClock::new();
        let mut manager = SceneManagerBuilder::new().with_clock(clock.clone()).build();
        manager.add_scene(failing(&log, "a", Some(Hook::Exit))).unwrap();
        manager.add_scene(recorded(&log, "b")).unwrap();
        let _ = manager.switch_to("a").unwrap();
        let events = manager.events();
        while events.try_recv().is_ok() {}

        let mut handle = manager.switch_to("b").unwrap();
        assert!(manager.is_transitioning());
        assert_eq!(state_of(&manager, "a"), SceneState::Exiting);
        assert_eq!(state_of(&manager, "b"), SceneState::Entering);
        assert!(events.try_iter().any(|event| event
            == SceneEvent::HookFailed {
                scene: "a".into(),
                hook: Hook::Exit,
                message: "on_exit failed".into(),
            }));

        clock.advance(ms(1000));
        manager.update(ms(16)).unwrap();
        assert!(matches!(handle.try_result(), Some(Ok(()))));
        assert_eq!(state_of(&manager, "a"), SceneState::Inactive);
        assert_eq!(state_of(&manager, "b"), SceneState::Active);
    }

    #[test]
    fn deferred_enter_finishes_after_transition_settles() {
        let log = Log::default();
        let clock = ManualClock::new();
        let slot = Arc::new(Mutex::new(None));
        let mut manager = SceneManagerBuilder::new().with_clock(clock.clone()).build();
        manager.add_scene(recorded(&log, "a")).unwrap();
        manager
            .add_scene(Scene::with_hooks(
                "level",
                ParkedEnter {
                    slot: Arc::clone(&slot),
                },
            ))
            .unwrap();
        let _ = manager.switch_to("a").unwrap();

        let mut handle = manager.switch_to("level").unwrap();
        assert!(manager.is_transitioning());
        assert_eq!(manager.deferred_hooks(), 1);

        clock.advance(ms(1000));
        manager.update(ms(16)).unwrap();
        assert!(matches!(handle.try_result(), Some(Ok(()))));
        assert_eq!(state_of(&manager, "level"), SceneState::Active);
        assert_eq!(manager.deferred_hooks(), 1);

        let events = manager.events();
        while events.try_recv().is_ok() {}

        let completer = slot.lock().unwrap().take().unwrap();
        completer.complete(Err("assets missing".into()));
        manager.update(ms(16)).unwrap();

        assert_eq!(manager.deferred_hooks(), 0);
        assert_eq!(
            events.try_iter().collect::<Vec<_>>(),
            vec![SceneEvent::HookFailed {
                scene: "level".into(),
                hook: Hook::Enter,
                message: "assets missing".into(),
            }]
        );
    }

    #[test]
    fn direct_switch_waits_for_deferred_enter() {
        let mut manager = SceneManagerBuilder::new().with_transitions(false).build();
        manager
            .add_scene(Scene::with_hooks("level", BackgroundEnter { fail: false }))
            .unwrap();

        let mut handle = manager.switch_to("level").unwrap();
        assert!(handle.is_complete());
        assert_eq!(state_of(&manager, "level"), SceneState::Active);
        assert_eq!(manager.deferred_hooks(), 0);
    }

    #[test]
    fn direct_switch_returns_deferred_enter_failure() {
        let mut manager = SceneManagerBuilder::new().with_transitions(false).build();
        manager
            .add_scene(Scene::with_hooks("level", BackgroundEnter { fail: true }))
            .unwrap();

        let err = manager.switch_to("level").err().unwrap();
        assert_eq!(
            err.to_string(),
            "on_enter hook of scene \"level\" failed: load failed"
        );
        assert_eq!(state_of(&manager, "level"), SceneState::Entering);
    }

    #[test]
    fn switch_during_transition_is_queued() {
        let log = Log::default();
        let clock = ManualClock::new();
        let mut manager = transition_manager(&log, &clock);

        let mut first = manager.switch_to("b").unwrap();
        let mut second = manager.switch_to("c").unwrap();
        assert_eq!(manager.pending_switches(), vec!["c"]);
        assert_eq!(entries(&log), vec!["a:on_exit", "b:on_enter"]);

        clock.advance(ms(1000));
        manager.update(ms(16)).unwrap();
        assert!(first.is_complete());
        assert!(!second.is_complete());
        assert!(manager.is_transitioning());
        assert!(manager.pending_switches().is_empty());
        assert_eq!(manager.current_scene().unwrap().name(), "c");
        assert_eq!(state_of(&manager, "b"), SceneState::Exiting);

        clock.advance(ms(1000));
        manager.update(ms(16)).unwrap();
        assert!(matches!(second.try_result(), Some(Ok(()))));
        assert_eq!(state_of(&manager, "b"), SceneState::Inactive);
        assert_eq!(state_of(&manager, "c"), SceneState::Active);
        assert_eq!(state_of(&manager, "a"), SceneState::Inactive);
    }

    #[test]
    fn queued_switch_to_removed_scene_resolves_not_found() {
        let log = Log::default();
        let clock = ManualClock::new();
        let mut manager = transition_manager(&log, &clock);
        let _ = manager.switch_to("b").unwrap();
        let queued = manager.switch_to("c").unwrap();
        manager.remove_scene("c");

        clock.advance(ms(1000));
        manager.update(ms(16)).unwrap();
        assert!(matches!(queued.wait(), Err(SceneError::NotFound(name)) if name == "c"));
        assert_eq!(manager.current_scene().unwrap().name(), "b");
    }

    #[test]
    fn switch_to_transition_target_resolves_when_it_settles() {
        let log = Log::default();
        let clock = ManualClock::new();
        let mut manager = transition_manager(&log, &clock);
        let _ = manager.switch_to("b").unwrap();
        log.lock().unwrap().clear();

        let mut again = manager.switch_to("b").unwrap();
        assert!(!again.is_complete());
        assert_eq!(manager.pending_switches(), vec!["b"]);

        clock.advance(ms(1000));
        manager.update(ms(16)).unwrap();
        assert!(matches!(again.try_result(), Some(Ok(()))));
        assert!(!manager.is_transitioning());
        assert_eq!(entries(&log), vec!["b:on_update:16"]);
    }

    #[test]
    fn switching_back_during_transition_keeps_request_order() {
        let log = Log::default();
        let clock = ManualClock::new();
        let mut manager = transition_manager(&log, &clock);

        let _ = manager.switch_to("b").unwrap();
        let _ = manager.switch_to("c").unwrap();
        let mut back = manager.switch_to("b").unwrap();
        assert!(!back.is_complete());
        assert_eq!(manager.pending_switches(), vec!["c", "b"]);

        for _ in 0..3 {
            clock.advance(ms(1000));
            manager.update(ms(16)).unwrap();
        }

        assert!(matches!(back.try_result(), Some(Ok(()))));
        assert_eq!(manager.current_scene().unwrap().name(), "b");
        assert_eq!(manager.previous_scene().unwrap().name(), "c");
        assert_eq!(state_of(&manager, "b"), SceneState::Active);
        assert_eq!(state_of(&manager, "c"), SceneState::Inactive);
    }

    #[test]
    fn removed_transition_target_does_not_complete() {
        let log = Log::default();
        let clock = ManualClock::new();
        let mut manager = transition_manager(&log, &clock);
        let events = manager.events();

        let mut handle = manager.switch_to("b").unwrap();
        manager.remove_scene("b");
        while events.try_recv().is_ok() {}

        clock.advance(ms(1000));
        manager.update(ms(16)).unwrap();

        assert!(handle.is_complete());
        assert!(!manager.is_transitioning());
        assert!(manager.current_scene().is_none());
        assert_eq!(state_of(&manager, "a"), SceneState::Inactive);
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn dropping_manager_abandons_pending_switch() {
        let log = Log::default();
        let clock = ManualClock::new();
        let mut manager = transition_manager(&log, &clock);
        let handle = manager.switch_to("b").unwrap();

        drop(manager);
        assert!(matches!(handle.wait(), Err(SceneError::SwitchAbandoned)));
    }

    //--- Update Tests -----------------------------------------------------

    #[test]
    fn update_forwards_exact_dt_to_active_scene() {
        let log = Log::default();
        let mut manager = direct_manager(&log);
        let _ = manager.switch_to("a").unwrap();
        log.lock().unwrap().clear();

        manager.update(ms(16)).unwrap();
        manager.update(ms(33)).unwrap();
        assert_eq!(entries(&log), vec!["a:on_update:16", "a:on_update:33"]);
    }

    #[test]
    fn update_skips_entering_and_paused_scenes() {
        let log = Log::default();
        let clock = ManualClock::new();
        let mut manager = transition_manager(&log, &clock);
        let _ = manager.switch_to("b").unwrap();
        log.lock().unwrap().clear();

        manager.update(ms(16)).unwrap();
        assert!(entries(&log).is_empty());

        clock.advance(ms(1000));
        manager.update(ms(16)).unwrap();
        manager.pause_current_scene().unwrap();
        log.lock().unwrap().clear();

        manager.update(ms(16)).unwrap();
        assert!(entries(&log).is_empty());
    }

    #[test]
    fn update_without_scene_is_ok() {
        let mut manager = SceneManager::new();
        assert!(manager.update(ms(16)).is_ok());
        assert!(manager.tick().is_ok());
    }

    #[test]
    fn tick_measures_clock_delta() {
        let log = Log::default();
        let clock = ManualClock::new();
        let mut manager = transition_manager(&log, &clock);

        manager.tick().unwrap();
        clock.advance(ms(20));
        manager.tick().unwrap();
        assert_eq!(entries(&log), vec!["a:on_update:0", "a:on_update:20"]);
    }

    //--- Pause / Resume Tests ---------------------------------------------

    #[test]
    fn pause_and_resume_cycle() {
        let log = Log::default();
        let mut manager = direct_manager(&log);
        let _ = manager.switch_to("a").unwrap();
        log.lock().unwrap().clear();

        manager.resume_current_scene().unwrap();
        assert!(entries(&log).is_empty());

        manager.pause_current_scene().unwrap();
        manager.pause_current_scene().unwrap();
        assert!(manager.current_scene().unwrap().is_paused());
        assert_eq!(entries(&log), vec!["a:on_pause"]);

        manager.resume_current_scene().unwrap();
        manager.resume_current_scene().unwrap();
        assert!(manager.current_scene().unwrap().is_active());
        assert_eq!(entries(&log), vec!["a:on_pause", "a:on_resume"]);
    }

    #[test]
    fn pause_without_current_scene_is_noop() {
        let mut manager = SceneManager::new();
        assert!(manager.pause_current_scene().is_ok());
        assert!(manager.resume_current_scene().is_ok());
    }

    #[test]
    fn pause_does_not_touch_transition() {
        let log = Log::default();
        let clock = ManualClock::new();
        let mut manager = transition_manager(&log, &clock);
        let _ = manager.switch_to("b").unwrap();

        manager.pause_current_scene().unwrap();
        assert!(manager.is_transitioning());
        assert_eq!(state_of(&manager, "b"), SceneState::Entering);
    }

    //--- Data Tests -------------------------------------------------------

    #[test]
    fn scene_data_survives_switch_cycles() {
        let log = Log::default();
        let mut manager = direct_manager(&log);
        manager.scene_mut("a").unwrap().set_data("score", 1200_u32);

        for _ in 0..3 {
            let _ = manager.switch_to("a").unwrap();
            let _ = manager.switch_to("b").unwrap();
        }

        assert_eq!(manager.scene("a").unwrap().get_data::<u32>("score"), Some(&1200));
    }

    //--- Event Tests ------------------------------------------------------

    #[test]
    fn events_follow_switch_lifecycle() {
        let log = Log::default();
        let clock = ManualClock::new();
        let mut manager = transition_manager(&log, &clock);
        let events = manager.events();
        while events.try_recv().is_ok() {}

        let _ = manager.switch_to("b").unwrap();
        let _ = manager.switch_to("c").unwrap();
        clock.advance(ms(1000));
        manager.update(ms(16)).unwrap();

        let received: Vec<_> = events.try_iter().collect();
        assert_eq!(
            received,
            vec![
                SceneEvent::TransitionStarted {
                    from: Some("a".into()),
                    to: "b".into(),
                    duration: ms(1000),
                },
                SceneEvent::SwitchQueued { to: "c".into() },
                SceneEvent::TransitionCompleted { scene: "b".into() },
                SceneEvent::TransitionStarted {
                    from: Some("b".into()),
                    to: "c".into(),
                    duration: ms(1000),
                },
            ]
        );
    }
}
