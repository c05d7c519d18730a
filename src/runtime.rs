//=========================================================================
// Scene Runtime
//=========================================================================
//
// Optional self-driving update loop around a shared SceneManager.
//
// Architecture:
// ```text
//     SceneRuntime ──start()──> UpdateLoop (thread @ tick rate)
//         │                         │
//         ├─ lock() / shared()      ├─ manager.lock().tick()
//         └─ stop() / Drop          └─ waits on stop channel between ticks
// ```
//
// Callers lock the manager to add scenes or request switches; the loop
// takes the same lock once per tick. A SwitchHandle does not hold the
// lock, so waiting on one while the loop runs is safe.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use log::{error, info};

//=== Internal Dependencies ===============================================

use crate::core::config::{self, ConfigError, SceneManagerConfig};
use crate::core::scene::SceneManager;

//=== TickControl =========================================================
//
// Each step of the loop signals whether to keep going or stop.
//
enum TickControl {
    Continue,
    Exit,
}

//=== UpdateLoop ==========================================================

/// A background thread that calls [`SceneManager::tick`] at a fixed rate.
///
/// The loop runs until [`UpdateLoop::stop`] is called or the handle is
/// dropped. An error from a scene's `on_update` is logged and the loop
/// carries on; a poisoned manager lock ends it.
pub struct UpdateLoop {
    stop_tx: Option<Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl UpdateLoop {
    /// Spawns the loop at `tick_rate` updates per second.
    ///
    /// # Panics
    ///
    /// Panics if `tick_rate` is not positive and finite, or so small that
    /// the tick period overflows a `Duration`.
    pub fn spawn(manager: Arc<Mutex<SceneManager>>, tick_rate: f64) -> Self {
        let frame_duration = config::frame_duration(tick_rate)
            .unwrap_or_else(|| panic!("Tick rate must be positive and finite, got {}", tick_rate));
        let (stop_tx, stop_rx) = bounded(1);

        info!("Starting scene update loop ({} ticks/s)", tick_rate);

        let handle = thread::spawn(move || {
            loop {
                let frame_start = Instant::now();

                //--- Step 1: Advance the manager ---------------------------
                if let TickControl::Exit = Self::tick_manager(&manager) {
                    break;
                }

                //--- Step 2: Wait out the frame, watching for stop ---------
                let remaining = frame_duration.saturating_sub(frame_start.elapsed());
                if let TickControl::Exit = Self::wait_for_stop(&stop_rx, remaining) {
                    break;
                }
            }

            info!("Scene update loop exiting.");
        });

        Self {
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        }
    }

    /// Returns true while the loop thread is alive.
    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .map_or(false, |handle| !handle.is_finished())
    }

    /// Signals the loop to stop and waits for the thread to finish.
    pub fn stop(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.try_send(());
        }

        if let Some(handle) = self.handle.take() {
            match handle.join() {
                Ok(()) => info!("Scene update loop stopped"),
                Err(e) => error!("Scene update loop panicked: {:?}", e),
            }
        }
    }

    fn tick_manager(manager: &Mutex<SceneManager>) -> TickControl {
        match manager.lock() {
            Ok(mut manager) => {
                if let Err(e) = manager.tick() {
                    error!("Scene update failed: {}", e);
                }
                TickControl::Continue
            }
            Err(_) => {
                error!("Scene manager lock poisoned, stopping update loop");
                TickControl::Exit
            }
        }
    }

    fn wait_for_stop(stop_rx: &Receiver<()>, timeout: Duration) -> TickControl {
        match stop_rx.recv_timeout(timeout) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => TickControl::Exit,
            Err(RecvTimeoutError::Timeout) => TickControl::Continue,
        }
    }
}

impl Drop for UpdateLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

//=== SceneRuntime ========================================================

/// A [`SceneManager`] shared behind a mutex, with an optional update loop.
///
/// # Examples
///
/// ```no_run
/// # use aetheric_scene::prelude::*;
/// # use std::time::Duration;
/// let config = SceneManagerConfig::default();
/// let runtime = SceneRuntime::new(SceneManager::from_config(&config)?, &config)?;
///
/// let handle = {
///     let mut manager = runtime.lock();
///     manager.add_scene(Scene::new("menu")).unwrap();
///     manager.add_scene(Scene::new("game")).unwrap();
///     let _ = manager.switch_to("menu").unwrap();
///     manager.switch_to("game").unwrap()
/// };
///
/// // The update loop completes the transition.
/// handle.wait().unwrap();
/// # Ok::<(), ConfigError>(())
/// ```
pub struct SceneRuntime {
    manager: Arc<Mutex<SceneManager>>,
    tick_rate: f64,
    update_loop: Option<UpdateLoop>,
}

impl SceneRuntime {
    /// Wraps `manager`, starting the update loop when `config.auto_update` is set.
    ///
    /// Fails with [`ConfigError::Invalid`] if `config` is out of range.
    pub fn new(manager: SceneManager, config: &SceneManagerConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut runtime = Self {
            manager: Arc::new(Mutex::new(manager)),
            tick_rate: config.tick_rate,
            update_loop: None,
        };

        if config.auto_update {
            runtime.start();
        }
        Ok(runtime)
    }

    /// Locks the manager.
    ///
    /// A lock poisoned by a panicking caller is recovered; the update
    /// loop stops on its own when it sees the poison.
    pub fn lock(&self) -> MutexGuard<'_, SceneManager> {
        self.manager.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns a new shared reference to the manager.
    pub fn shared(&self) -> Arc<Mutex<SceneManager>> {
        Arc::clone(&self.manager)
    }

    pub fn tick_rate(&self) -> f64 {
        self.tick_rate
    }

    pub fn is_running(&self) -> bool {
        self.update_loop
            .as_ref()
            .map_or(false, UpdateLoop::is_running)
    }

    /// Starts the update loop if it is not already running.
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }
        self.update_loop = Some(UpdateLoop::spawn(self.shared(), self.tick_rate));
    }

    /// Stops the update loop, if any. The manager stays usable.
    pub fn stop(&mut self) {
        if let Some(mut update_loop) = self.update_loop.take() {
            update_loop.stop();
        }
    }
}

impl Drop for SceneRuntime {
    fn drop(&mut self) {
        self.stop();
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
