use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use crate::codec::Snapshot;
use crate::error::{LifeError, Result};
use crate::grid::Grid;
use crate::rules::presets::SpeedPreset;
use crate::state::LifeState;

/// Whether the background clock is advancing generations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
}

struct ClockState {
    running: bool,
    interval: Duration,
}

/// Shared between the simulator and its worker. The condvar is only used to
/// cut a sleep short when the clock is stopped.
struct Clock {
    state: Mutex<ClockState>,
    wake: Condvar,
}

/// Drives one [`LifeState`] either a step at a time or on a background clock.
///
/// The grid and generation sit behind a single lock shared with the clock
/// worker, so edits, saves and steps are serialised no matter which thread
/// issues them. All methods take `&self`; wrap the simulator in an `Arc` to
/// drive it from several threads.
pub struct Simulator {
    life: Arc<Mutex<LifeState>>,
    clock: Arc<Clock>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Simulator {
    /// Idle simulator on an empty `width` x `height` grid at the default speed.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        Ok(Self::with_state(LifeState::new(width, height)?))
    }

    pub fn with_state(state: LifeState) -> Self {
        Self {
            life: Arc::new(Mutex::new(state)),
            clock: Arc::new(Clock {
                state: Mutex::new(ClockState {
                    running: false,
                    interval: SpeedPreset::default().interval(),
                }),
                wake: Condvar::new(),
            }),
            worker: Mutex::new(None),
        }
    }

    /// `Running` while a clock worker is alive. A worker that has exited on
    /// its own counts as `Idle`.
    pub fn state(&self) -> RunState {
        match self.worker.lock().as_ref() {
            Some(handle) if !handle.is_finished() => RunState::Running,
            _ => RunState::Idle,
        }
    }

    pub fn is_running(&self) -> bool {
        self.state() == RunState::Running
    }

    // --- Clock ---

    /// Start stepping on the background clock. No-op if already running.
    ///
    /// The first step happens immediately; after that the worker sleeps for
    /// the current interval between steps.
    pub fn start(&self) {
        let mut worker = self.worker.lock();
        match worker.take() {
            Some(handle) if !handle.is_finished() => {
                log::debug!("Simulator already running");
                *worker = Some(handle);
                return;
            }
            Some(handle) => {
                if handle.join().is_err() {
                    log::error!("Simulator clock worker panicked");
                }
            }
            None => {}
        }
        self.clock.state.lock().running = true;

        let life = Arc::clone(&self.life);
        let clock = Arc::clone(&self.clock);
        *worker = Some(thread::spawn(move || run_clock(&life, &clock)));
        log::info!("Simulator started");
    }

    /// Stop the background clock. No-op if idle.
    ///
    /// Interrupts the worker's sleep and waits for a step already in progress
    /// to finish; once this returns no further step will run.
    pub fn stop(&self) {
        // Hold the worker slot until the thread is joined so a concurrent
        // `start` cannot revive the old worker.
        let mut worker = self.worker.lock();
        let Some(handle) = worker.take() else {
            return;
        };
        self.clock.state.lock().running = false;
        self.clock.wake.notify_all();
        if handle.join().is_err() {
            log::error!("Simulator clock worker panicked");
        }
        log::info!("Simulator stopped at generation {}", self.generation());
    }

    /// Run exactly one generation, whether or not the clock is running.
    pub fn step_once(&self) -> u64 {
        self.life.lock().step()
    }

    pub fn interval(&self) -> Duration {
        self.clock.state.lock().interval
    }

    /// Change the pause between clock steps.
    ///
    /// A sleep already in progress keeps its old deadline; the new interval
    /// applies from the next one.
    pub fn set_interval(&self, interval: Duration) -> Result<()> {
        if interval.is_zero() {
            return Err(LifeError::InvalidInterval);
        }
        self.clock.state.lock().interval = interval;
        log::debug!("Clock interval set to {:?}", interval);
        Ok(())
    }

    pub fn set_speed(&self, speed: SpeedPreset) {
        self.clock.state.lock().interval = speed.interval();
    }

    // --- Grid access ---

    pub fn generation(&self) -> u64 {
        self.life.lock().generation()
    }

    pub fn dimensions(&self) -> (usize, usize) {
        self.life.lock().grid().dimensions()
    }

    pub fn live_count(&self) -> usize {
        self.life.lock().grid().live_count()
    }

    /// Read the grid under the lock, e.g. to render it.
    pub fn with_grid<R>(&self, f: impl FnOnce(&Grid) -> R) -> R {
        f(self.life.lock().grid())
    }

    pub fn snapshot(&self) -> Snapshot {
        let life = self.life.lock();
        Snapshot::capture(life.generation(), life.grid())
    }

    pub fn is_alive(&self, col: usize, row: usize) -> Result<bool> {
        self.life.lock().is_alive(col, row)
    }

    pub fn set_alive(&self, col: usize, row: usize, alive: bool) -> Result<()> {
        self.life.lock().set_alive(col, row, alive)
    }

    pub fn toggle(&self, col: usize, row: usize) -> Result<bool> {
        self.life.lock().toggle(col, row)
    }

    pub fn stamp(&self, name: &str) -> Result<()> {
        self.life.lock().stamp(name)
    }

    pub fn clear(&self) {
        self.life.lock().clear();
    }

    pub fn resize(&self, width: usize, height: usize) -> Result<()> {
        self.life.lock().resize(width, height)
    }

    pub fn save(&self) -> String {
        self.life.lock().save()
    }

    pub fn load(&self, text: &str) -> Result<u64> {
        self.life.lock().load(text)
    }
}

impl Drop for Simulator {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_clock(life: &Mutex<LifeState>, clock: &Clock) {
    loop {
        if !clock.state.lock().running {
            break;
        }
        let generation = life.lock().step();
        log::trace!("Clock tick: generation {}", generation);

        let mut state = clock.state.lock();
        let deadline = Instant::now() + state.interval;
        while state.running {
            if clock.wake.wait_until(&mut state, deadline).timed_out() {
                break;
            }
        }
        if !state.running {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wait_for(sim: &Simulator, generation: u64) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while sim.generation() < generation {
            assert!(Instant::now() < deadline, "clock never reached {}", generation);
            thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn starts_idle_and_stop_is_noop() {
        let sim = Simulator::new(5, 5).unwrap();
        assert_eq!(sim.state(), RunState::Idle);
        sim.stop();
        assert_eq!(sim.state(), RunState::Idle);
        assert_eq!(sim.generation(), 0);
    }

    #[test]
    fn step_once_does_not_change_run_state() {
        let sim = Simulator::new(5, 5).unwrap();
        assert_eq!(sim.step_once(), 1);
        assert_eq!(sim.step_once(), 2);
        assert_eq!(sim.state(), RunState::Idle);
    }

    #[test]
    fn clock_advances_until_stopped() {
        let sim = Simulator::new(8, 8).unwrap();
        sim.set_interval(Duration::from_millis(1)).unwrap();
        sim.start();
        sim.start();
        assert!(sim.is_running());
        wait_for(&sim, 3);
        sim.stop();
        assert_eq!(sim.state(), RunState::Idle);

        let frozen = sim.generation();
        thread::sleep(Duration::from_millis(20));
        assert_eq!(sim.generation(), frozen);
    }

    #[test]
    fn stop_interrupts_long_sleep() {
        let sim = Simulator::new(4, 4).unwrap();
        sim.set_interval(Duration::from_secs(3600)).unwrap();
        sim.start();
        wait_for(&sim, 1);

        let begun = Instant::now();
        sim.stop();
        assert!(begun.elapsed() < Duration::from_secs(5));
        assert_eq!(sim.generation(), 1);
    }

    #[test]
    fn restart_after_stop() {
        let sim = Simulator::new(4, 4).unwrap();
        sim.set_interval(Duration::from_secs(3600)).unwrap();
        sim.start();
        wait_for(&sim, 1);
        sim.stop();
        sim.start();
        wait_for(&sim, 2);
        sim.stop();
        assert_eq!(sim.generation(), 2);
    }

    #[test]
    fn shorter_interval_applies_without_restart() {
        let sim = Simulator::new(6, 6).unwrap();
        sim.set_interval(Duration::from_millis(300)).unwrap();
        sim.start();
        wait_for(&sim, 1);

        sim.set_interval(Duration::from_millis(1)).unwrap();
        // one 300ms sleep is left at most, then 1ms ticks
        wait_for(&sim, 20);
        assert!(sim.is_running());
        sim.stop();
        assert!(sim.generation() >= 20);
    }

    #[test]
    fn clock_keeps_running_at_max_generation() {
        let sim = Simulator::new(5, 5).unwrap();
        sim.load("18446744073709551615\n1,2\n2,2\n3,2\n").unwrap();
        sim.set_interval(Duration::from_millis(1)).unwrap();
        sim.start();
        thread::sleep(Duration::from_millis(30));
        assert_eq!(sim.state(), RunState::Running);
        assert_eq!(sim.generation(), u64::MAX);
        sim.stop();
        assert_eq!(sim.live_count(), 3);
    }

    #[test]
    fn zero_interval_rejected() {
        let sim = Simulator::new(4, 4).unwrap();
        assert_eq!(sim.set_interval(Duration::ZERO), Err(LifeError::InvalidInterval));
        assert_eq!(sim.interval(), SpeedPreset::Normal.interval());
        sim.set_speed(SpeedPreset::Fast);
        assert_eq!(sim.interval(), Duration::from_millis(50));
    }

    #[test]
    fn edits_while_running() {
        let sim = Simulator::new(10, 10).unwrap();
        sim.set_interval(Duration::from_millis(1)).unwrap();
        sim.start();
        for _ in 0..20 {
            sim.toggle(4, 4).unwrap();
            sim.stamp("Block").unwrap();
        }
        sim.stop();
        assert!(sim.set_alive(10, 0, true).is_err());
    }

    #[test]
    fn dropping_running_simulator_stops_worker() {
        let sim = Simulator::new(4, 4).unwrap();
        sim.set_interval(Duration::from_secs(3600)).unwrap();
        sim.start();
        drop(sim);
    }
}
