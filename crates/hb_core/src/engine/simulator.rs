//! Match simulator: the fixed-timestep loop
//!
//! One tick runs the stages below to completion, in this order:
//!
//! ```text
//! clock → check_clock → update_phase → timers → ai
//!       → resolve ready actions → ball → players
//!       → reactive detection → passive detection
//! ```
//!
//! Each stage runs under `catch_unwind`. A failing stage abandons the tick, the
//! match is force-finished as `Aborted`, and the finalizer still produces a result
//! from whatever had accumulated. Cancellation and the safety step bound are
//! checked between ticks only.

use super::actions::{is_ready, resolve_action};
use super::ai::update_decisions;
use super::config::EngineConfig;
use super::event_detector::{detect_passive, detect_reactive};
use super::event_handler::handle;
use super::finalizer::finalize;
use super::game_phase::GamePhase;
use super::match_state::MatchState;
use super::phase_manager::{check_clock, force_finish, update_phase};
use super::physics::{step_ball, step_players};
use super::timer::update_timers;
use crate::error::{Result, SimulationError};
use crate::models::{MatchEvent, MatchResult, MatchStatus, Tactic, TeamData};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation flag, checked once per tick boundary.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Periodic progress notification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchProgress {
    pub step: u64,
    pub time_secs: f32,
    /// Elapsed match clock over full duration, 0..=1
    pub fraction: f32,
    pub home_score: u16,
    pub away_score: u16,
    pub phase: GamePhase,
}

/// Result plus the full event log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchOutput {
    pub result: MatchResult,
    pub events: Vec<MatchEvent>,
}

pub struct MatchSimulator<'a> {
    state: MatchState,
    match_date: Option<NaiveDate>,
    progress: Option<Box<dyn FnMut(&MatchProgress) + 'a>>,
    cancel: Option<CancellationToken>,
}

impl<'a> MatchSimulator<'a> {
    /// Validates both rosters; fails fast on bad inputs.
    pub fn new(
        home: &TeamData,
        home_tactic: Tactic,
        away: &TeamData,
        away_tactic: Tactic,
        config: EngineConfig,
        seed: u64,
    ) -> Result<Self> {
        let state = MatchState::new(home, home_tactic, away, away_tactic, config, seed)?;
        Ok(Self { state, match_date: None, progress: None, cancel: None })
    }

    pub fn with_progress(mut self, callback: impl FnMut(&MatchProgress) + 'a) -> Self {
        self.progress = Some(Box::new(callback));
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn with_match_date(mut self, date: Option<NaiveDate>) -> Self {
        self.match_date = date;
        self
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    fn progress_snapshot(&self) -> MatchProgress {
        let s = &self.state;
        let duration = s.config.flow.match_duration_secs();
        MatchProgress {
            step: s.step,
            time_secs: s.time,
            fraction: if duration > 0.0 { (s.time / duration).clamp(0.0, 1.0) } else { 1.0 },
            home_score: s.score[0],
            away_score: s.score[1],
            phase: s.phase,
        }
    }

    fn report(&mut self) {
        let snapshot = self.progress_snapshot();
        if let Some(cb) = self.progress.as_mut() {
            cb(&snapshot);
        }
    }

    /// Run to full time (or cancellation / abort / step bound).
    pub fn run(mut self) -> MatchOutput {
        let max_steps = self.state.config.flow.max_steps();
        let interval = self.state.config.flow.progress_interval_steps.max(1);
        log::debug!(
            "simulating {} vs {} (seed {}, max {} steps)",
            self.state.teams[0].name,
            self.state.teams[1].name,
            self.state.seed,
            max_steps
        );

        while !self.state.phase.is_finished() {
            if self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled) {
                log::info!("simulation cancelled at {:.1}s", self.state.time);
                force_finish(&mut self.state, MatchStatus::Cancelled);
                break;
            }
            if self.state.step >= max_steps {
                log::warn!("step bound {} reached at {:.1}s", max_steps, self.state.time);
                force_finish(&mut self.state, MatchStatus::StepLimitReached);
                break;
            }
            if let Err(e) = tick(&mut self.state) {
                log::error!("simulation aborted: {e}");
                force_finish(&mut self.state, MatchStatus::Aborted);
                break;
            }
            if self.state.step % interval == 0 {
                self.report();
            }
        }
        self.report();

        let result = finalize(&self.state, self.match_date);
        MatchOutput { result, events: self.state.events }
    }
}

/// Convenience wrapper: build, run, finalize.
pub fn simulate_match(
    home: &TeamData,
    home_tactic: Tactic,
    away: &TeamData,
    away_tactic: Tactic,
    config: EngineConfig,
    seed: u64,
) -> Result<MatchResult> {
    Ok(MatchSimulator::new(home, home_tactic, away, away_tactic, config, seed)?.run().result)
}

// ============================================================================
// Tick
// ============================================================================

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

fn run_stage<F>(state: &mut MatchState, stage: &'static str, f: F) -> std::result::Result<(), SimulationError>
where
    F: FnOnce(&mut MatchState),
{
    let time = state.time;
    panic::catch_unwind(AssertUnwindSafe(|| f(state)))
        .map_err(|payload| SimulationError::Panicked { stage, time, message: panic_message(&*payload) })
}

fn advance_clock(state: &mut MatchState) {
    let dt = state.dt();
    if !state.phase.clock_paused() {
        state.clock_ticks += 1;
        state.time = state.clock_ticks as f32 * dt;
    }
    state.step += 1;
    state.phase_time += dt;
}

fn resolve_ready_actions(state: &mut MatchState) {
    let ready: Vec<_> = state.all_active().into_iter().filter(|id| is_ready(state, *id)).collect();
    for id in ready {
        // an earlier result this tick may have invalidated it
        if !is_ready(state, id) {
            continue;
        }
        if let Some(result) = resolve_action(state, id) {
            handle(state, result);
        }
    }
}

fn reactive_detection(state: &mut MatchState) {
    if let Some(result) = detect_reactive(state) {
        handle(state, result);
    }
}

fn passive_detection(state: &mut MatchState) {
    if let Some(result) = detect_passive(state) {
        handle(state, result);
    }
}

/// One fixed step of the pipeline.
pub fn tick(state: &mut MatchState) -> std::result::Result<(), SimulationError> {
    run_stage(state, "clock", advance_clock)?;
    run_stage(state, "check_clock", check_clock)?;
    if state.phase.is_finished() {
        return Ok(());
    }
    run_stage(state, "phase", update_phase)?;
    run_stage(state, "timers", update_timers)?;
    run_stage(state, "ai", update_decisions)?;
    run_stage(state, "actions", resolve_ready_actions)?;
    run_stage(state, "ball", step_ball)?;
    run_stage(state, "players", step_players)?;
    run_stage(state, "reactive", reactive_detection)?;
    run_stage(state, "passive", passive_detection)?;

    #[cfg(feature = "strict_contracts")]
    state.check_invariants()?;

    Ok(())
}
