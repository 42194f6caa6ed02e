//! Periodic scheduler driving display updates.
//!
//! The scheduler owns the run loop: on every tick it asks the
//! [`ScheduleModel`] for the current target, interpolates inside an active
//! transition window, and pushes the resulting gains through the
//! [`DisplayAdapter`]. All mutable tick state lives inside the single tick
//! thread, so ticks never overlap and the pure model/engine calls need no
//! locking.
//!
//! ## Lifecycle
//!
//! `Idle → Running → Stopped`, with restart permitted from `Stopped`.
//! [`Scheduler::stop`] joins the tick thread, which guarantees no adapter
//! call happens after it returns.
//!
//! ## Failure policy
//!
//! Adapter failures are logged and retried on the next tick. Three
//! consecutive failures flip the scheduler into a reported, non-fatal
//! degraded state ([`Scheduler::is_degraded`]); the first subsequent
//! success clears it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use chrono_tz::Tz;

use crate::backend::{AdapterError, DisplayAdapter};
use crate::color::kelvin_to_rgb;
use crate::config::{Config, parse_clock_time};
use crate::constants::{
    DEFAULT_COUNTRY, DEFAULT_DAY_START, DEFAULT_DAY_TEMP, DEFAULT_NIGHT_START,
    DEFAULT_NIGHT_TEMP, DEFAULT_TRANSITION_MINUTES, DEFAULT_UPDATE_INTERVAL_SECS,
    FALLBACK_DAY_START, FALLBACK_NIGHT_START, MAX_CONSECUTIVE_ADAPTER_FAILURES, NEUTRAL_TEMP,
    STOP_POLL_INTERVAL_MS,
};
use crate::geo::{Location, LocationResolver};
use crate::logger::Log;
use crate::schedule::{ScheduleModel, TransitionWindow};

/// Lifecycle state of a scheduler instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
    Stopped,
}

/// Observer invoked whenever the applied temperature changes.
pub type ChangeCallback = Box<dyn Fn(u32) + Send>;

/// State shared between the scheduler handle and its tick thread.
struct TickContext {
    model: ScheduleModel,
    adapter: Mutex<Box<dyn DisplayAdapter>>,
    running: AtomicBool,
    update_interval: Duration,
    current_temp: Mutex<Option<u32>>,
    degraded: AtomicBool,
    on_change: Mutex<Option<ChangeCallback>>,
}

/// Periodic color temperature scheduler.
///
/// Each instance is independent: it owns its schedule model, its adapter,
/// and the single active transition state. There is no process-wide
/// scheduler singleton.
pub struct Scheduler {
    ctx: Arc<TickContext>,
    handle: Option<thread::JoinHandle<()>>,
    state: SchedulerState,
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("state", &self.state)
            .field("running", &self.handle.is_some())
            .finish()
    }
}

impl Scheduler {
    /// Build a scheduler from its parts.
    pub fn new(
        model: ScheduleModel,
        adapter: Box<dyn DisplayAdapter>,
        update_interval: Duration,
    ) -> Self {
        Self {
            ctx: Arc::new(TickContext {
                model,
                adapter: Mutex::new(adapter),
                running: AtomicBool::new(false),
                update_interval,
                current_temp: Mutex::new(None),
                degraded: AtomicBool::new(false),
                on_change: Mutex::new(None),
            }),
            handle: None,
            state: SchedulerState::Idle,
        }
    }

    /// Build a scheduler from a validated configuration.
    ///
    /// The schedule basis is chosen in priority order: postal code lookup
    /// (requires an external [`LocationResolver`]), explicit coordinates,
    /// then fixed clock times. A timezone override applies to whichever
    /// basis is chosen; without one, fixed mode falls back to the `TZ`
    /// environment variable and finally UTC. Resolver failures surface
    /// here — the scheduler cannot start without a resolved schedule
    /// basis.
    pub fn from_config(
        config: &Config,
        resolver: Option<&dyn LocationResolver>,
        adapter: Box<dyn DisplayAdapter>,
    ) -> Result<Self> {
        let day_temp = config.day_temp.unwrap_or(DEFAULT_DAY_TEMP);
        let night_temp = config.night_temp.unwrap_or(DEFAULT_NIGHT_TEMP);
        let transition_minutes = config
            .transition_minutes
            .unwrap_or(DEFAULT_TRANSITION_MINUTES);
        let update_interval = Duration::from_secs(
            config
                .update_interval
                .unwrap_or(DEFAULT_UPDATE_INTERVAL_SECS),
        );

        let timezone_override = match &config.timezone {
            Some(name) => Some(
                name.parse::<Tz>()
                    .map_err(|_| anyhow::anyhow!("invalid timezone identifier: {:?}", name))?,
            ),
            None => None,
        };

        let model = if let Some(postal_code) = &config.zipcode {
            let resolver = resolver.ok_or_else(|| {
                anyhow::anyhow!(
                    "postal code lookup requires an external location resolver; \
                    configure latitude/longitude instead"
                )
            })?;
            let country = config.country.as_deref().unwrap_or(DEFAULT_COUNTRY);
            let mut location = resolver
                .resolve(postal_code, country)
                .with_context(|| format!("failed to resolve postal code {:?}", postal_code))?;
            if let Some(timezone) = timezone_override {
                location = Location::new(location.coordinates(), location.name(), timezone);
            }
            Log::log_decorated(&format!("Location: {}", location.name()));
            ScheduleModel::solar(day_temp, night_temp, transition_minutes, &location)
        } else if let (Some(latitude), Some(longitude)) = (config.latitude, config.longitude) {
            let location = match timezone_override {
                Some(timezone) => Location::with_timezone(latitude, longitude, timezone)?,
                None => Location::from_coordinates(latitude, longitude)?,
            };
            ScheduleModel::solar(day_temp, night_temp, transition_minutes, &location)
        } else {
            let day_start = parse_clock_time(
                config.day_start.as_deref().unwrap_or(DEFAULT_DAY_START),
                "day_start",
            )?;
            let night_start = parse_clock_time(
                config.night_start.as_deref().unwrap_or(DEFAULT_NIGHT_START),
                "night_start",
            )?;
            let timezone = timezone_override
                .or_else(|| std::env::var("TZ").ok().and_then(|name| name.parse().ok()))
                .unwrap_or(Tz::UTC);
            ScheduleModel::fixed(
                day_temp,
                night_temp,
                transition_minutes,
                day_start,
                night_start,
                timezone,
            )
        };

        Ok(Self::new(model, adapter, update_interval))
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Register an observer for applied temperature changes.
    pub fn on_change(&self, callback: impl Fn(u32) + Send + 'static) {
        *self.ctx.on_change.lock().unwrap() = Some(Box::new(callback));
    }

    /// Begin periodic ticking. The first tick applies immediately.
    ///
    /// Starting an already-running scheduler is a no-op; restarting after
    /// [`Scheduler::stop`] is permitted.
    pub fn start(&mut self) -> Result<()> {
        if self.state == SchedulerState::Running {
            return Ok(());
        }
        self.ctx.running.store(true, Ordering::SeqCst);
        let ctx = Arc::clone(&self.ctx);
        let handle = thread::Builder::new()
            .name("sundown-tick".into())
            .spawn(move || run_loop(&ctx))
            .context("failed to spawn scheduler tick thread")?;
        self.handle = Some(handle);
        self.state = SchedulerState::Running;
        Ok(())
    }

    /// Stop ticking, blocking until any in-flight tick completes.
    ///
    /// No adapter call happens after this returns. The display is left as
    /// it was — callers decide whether to reset it.
    pub fn stop(&mut self) {
        if self.state != SchedulerState::Running {
            return;
        }
        self.ctx.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        self.state = SchedulerState::Stopped;
    }

    /// Apply a temperature immediately, outside the schedule.
    ///
    /// The next tick may move the display back toward the scheduled
    /// target; this is a manual override, not a schedule change.
    pub fn set_temperature_now(&self, kelvin: u32) -> std::result::Result<(), AdapterError> {
        self.ctx
            .adapter
            .lock()
            .unwrap()
            .apply(kelvin_to_rgb(kelvin))?;
        *self.ctx.current_temp.lock().unwrap() = Some(kelvin);
        if let Some(callback) = self.ctx.on_change.lock().unwrap().as_ref() {
            callback(kelvin);
        }
        Ok(())
    }

    /// Restore the display to neutral.
    pub fn reset_display(&self) -> std::result::Result<(), AdapterError> {
        self.set_temperature_now(NEUTRAL_TEMP)
    }

    /// The most recently applied temperature, if any.
    pub fn current_temperature(&self) -> Option<u32> {
        *self.ctx.current_temp.lock().unwrap()
    }

    /// Whether repeated adapter failures have put the scheduler into its
    /// degraded (but still running) state.
    pub fn is_degraded(&self) -> bool {
        self.ctx.degraded.load(Ordering::SeqCst)
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

/// The tick loop. Owns the active transition window and failure counter
/// exclusively; at most one tick executes at a time by construction.
fn run_loop(ctx: &TickContext) {
    let mut active_window: Option<TransitionWindow> = None;
    let mut consecutive_failures: u32 = 0;
    let mut fallback_logged = false;

    while ctx.running.load(Ordering::SeqCst) {
        let now = Utc::now();
        let target = ctx.model.target_at(now);

        if target.degraded && !fallback_logged {
            Log::log_warning(&format!(
                "sun times unavailable; falling back to fixed {}-{} schedule",
                FALLBACK_DAY_START, FALLBACK_NIGHT_START
            ));
            fallback_logged = true;
        }

        // A changed target opens a new transition window, replacing any
        // prior one; leaving a window means the boundary was reached.
        match (&active_window, &target.window) {
            (None, Some(window)) => {
                Log::log_block_start(&format!(
                    "Commencing {} transition ({}K -> {}K)",
                    transition_name(window),
                    window.from_temp,
                    window.to_temp
                ));
            }
            (Some(previous), None) => {
                Log::log_block_start(&format!(
                    "Completed {} transition, holding at {}K",
                    transition_name(previous),
                    target.temperature
                ));
            }
            _ => {}
        }
        active_window = target.window;

        let current = match target.window {
            Some(window) => window.current_temperature(now),
            None => target.temperature,
        };

        let already_applied = *ctx.current_temp.lock().unwrap() == Some(current);
        if !already_applied {
            let result = ctx.adapter.lock().unwrap().apply(kelvin_to_rgb(current));
            match result {
                Ok(()) => {
                    consecutive_failures = 0;
                    ctx.degraded.store(false, Ordering::SeqCst);
                    *ctx.current_temp.lock().unwrap() = Some(current);
                    if let Some(callback) = ctx.on_change.lock().unwrap().as_ref() {
                        callback(current);
                    }
                }
                Err(err) => {
                    consecutive_failures += 1;
                    Log::log_warning(&format!("Failed to apply {}K: {}", current, err));
                    if consecutive_failures == MAX_CONSECUTIVE_ADAPTER_FAILURES {
                        ctx.degraded.store(true, Ordering::SeqCst);
                        Log::log_error(&format!(
                            "{} consecutive display adapter failures; \
                            continuing in degraded state",
                            consecutive_failures
                        ));
                    }
                }
            }
        }

        // Chunked sleep keeps stop() responsive; the next tick can only
        // begin after this one finished, so ticks never overlap.
        let chunk_limit = Duration::from_millis(STOP_POLL_INTERVAL_MS);
        let mut slept = Duration::ZERO;
        while slept < ctx.update_interval && ctx.running.load(Ordering::SeqCst) {
            let chunk = chunk_limit.min(ctx.update_interval - slept);
            thread::sleep(chunk);
            slept += chunk;
        }
    }
}

fn transition_name(window: &TransitionWindow) -> &'static str {
    if window.to_temp < window.from_temp {
        "sunset"
    } else {
        "sunrise"
    }
}
