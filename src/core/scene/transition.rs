//=========================================================================
// Transition
//=========================================================================
//
// Time-bounded progress calculator used to mask a scene handoff.
//
// Flow:
//   start_at(t0) → update_at(t) → eased progress in [0, 1]
//                        ↓ raw progress reaches 1
//                   complete() → on_complete callback
//
// Progress is computed from timestamps, not accumulated deltas, so a
// transition reports the same value no matter how often it is polled.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::time::{Duration, Instant};

//=== Easing Presets ======================================================

/// Identity easing.
pub fn linear(t: f32) -> f32 {
    t
}

/// Starts slow and accelerates: `t²`.
pub fn ease_in(t: f32) -> f32 {
    t * t
}

/// Starts fast and decelerates: `t(2 − t)`.
pub fn ease_out(t: f32) -> f32 {
    t * (2.0 - t)
}

/// Slow at both ends: `2t²` below one half, `−1 + (4 − 2t)t` above.
pub fn ease_in_out(t: f32) -> f32 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        -1.0 + (4.0 - 2.0 * t) * t
    }
}

//=== Easing ==============================================================

/// Maps linear progress to perceived progress.
#[derive(Clone, Copy, Default)]
pub enum Easing {
    /// Constant speed throughout.
    #[default]
    Linear,
    /// Start slow, accelerate.
    EaseIn,
    /// Start fast, decelerate.
    EaseOut,
    /// Start slow, speed up, then slow down.
    EaseInOut,
    /// Caller-supplied curve. Should satisfy `f(0) = 0` and `f(1) = 1`.
    Custom(fn(f32) -> f32),
}

impl Easing {
    /// Applies the curve to `t`, clamped to `[0, 1]` first.
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => linear(t),
            Self::EaseIn => ease_in(t),
            Self::EaseOut => ease_out(t),
            Self::EaseInOut => ease_in_out(t),
            Self::Custom(curve) => curve(t),
        }
    }
}

impl fmt::Debug for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => f.write_str("Linear"),
            Self::EaseIn => f.write_str("EaseIn"),
            Self::EaseOut => f.write_str("EaseOut"),
            Self::EaseInOut => f.write_str("EaseInOut"),
            Self::Custom(_) => f.write_str("Custom"),
        }
    }
}

//=== TransitionOptions ===================================================

/// Duration used when none is configured.
pub const DEFAULT_TRANSITION_DURATION: Duration = Duration::from_millis(1000);

/// Completion callback invoked by [`Transition::complete`].
pub type CompletionCallback = Box<dyn FnMut() + Send>;

/// Configuration for a [`Transition`].
///
/// # Default Values
///
/// - **duration**: 1000 ms
/// - **easing**: [`Easing::Linear`]
/// - **on_complete**: none
pub struct TransitionOptions {
    pub duration: Duration,
    pub easing: Easing,
    pub on_complete: Option<CompletionCallback>,
}

impl TransitionOptions {
    pub fn new() -> Self {
        Self {
            duration: DEFAULT_TRANSITION_DURATION,
            easing: Easing::Linear,
            on_complete: None,
        }
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Sets the callback run each time the transition completes.
    pub fn on_complete<F>(mut self, callback: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        self.on_complete = Some(Box::new(callback));
        self
    }
}

impl Default for TransitionOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TransitionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionOptions")
            .field("duration", &self.duration)
            .field("easing", &self.easing)
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

//=== TransitionSettings ==================================================

/// Per-switch transition overrides passed to
/// [`super::SceneManager::switch_to_with`].
///
/// A `None` duration falls back to the manager's default.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransitionSettings {
    pub duration: Option<Duration>,
    pub easing: Easing,
}

impl TransitionSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Resolves into transition options using `default_duration` when
    /// no override was given.
    pub(crate) fn into_options(self, default_duration: Duration) -> TransitionOptions {
        TransitionOptions::new()
            .duration(self.duration.unwrap_or(default_duration))
            .easing(self.easing)
    }
}

//=== Transition ==========================================================

/// A timed progress animation with easing and a completion callback.
///
/// A transition is inert until started. Once raw progress reaches 1 it
/// completes itself on the same `update` call. Calling [`complete`]
/// again runs the callback again; owners discard the transition after
/// the first completion.
///
/// [`complete`]: Transition::complete
pub struct Transition {
    options: TransitionOptions,
    start_time: Option<Instant>,
    running: bool,
    progress: f32,
}

impl Transition {
    //--- Construction -----------------------------------------------------

    pub fn new(options: TransitionOptions) -> Self {
        Self {
            options,
            start_time: None,
            running: false,
            progress: 0.0,
        }
    }

    //--- Control ----------------------------------------------------------

    /// Starts the transition at the current wall-clock time.
    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    /// Starts the transition at `now`. Calling again restarts it.
    pub fn start_at(&mut self, now: Instant) {
        self.start_time = Some(now);
        self.running = true;
        self.progress = 0.0;
    }

    /// Advances against the current wall-clock time.
    pub fn update(&mut self) -> f32 {
        self.update_at(Instant::now())
    }

    /// Computes eased progress at `now`.
    ///
    /// Returns 1.0 when not running. Completes the transition when raw
    /// progress reaches 1 and still returns the eased value.
    pub fn update_at(&mut self, now: Instant) -> f32 {
        let Some(start) = self.start_time.filter(|_| self.running) else {
            return 1.0;
        };

        let raw = if self.options.duration.is_zero() {
            1.0
        } else {
            let elapsed = now.saturating_duration_since(start);
            (elapsed.as_secs_f32() / self.options.duration.as_secs_f32()).min(1.0)
        };

        self.progress = self.options.easing.apply(raw);

        if raw >= 1.0 {
            self.complete();
        }

        self.progress
    }

    /// Stops the transition and runs the completion callback.
    pub fn complete(&mut self) {
        self.running = false;
        if let Some(callback) = self.options.on_complete.as_mut() {
            callback();
        }
    }

    //--- Query API --------------------------------------------------------

    pub fn is_active(&self) -> bool {
        self.running
    }

    /// Eased progress reported by the most recent update.
    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn duration(&self) -> Duration {
        self.options.duration
    }

    pub fn easing(&self) -> Easing {
        self.options.easing
    }
}

impl fmt::Debug for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("options", &self.options)
            .field("running", &self.running)
            .field("progress", &self.progress)
            .finish()
    }
}

//=== Tests ===============================================================
