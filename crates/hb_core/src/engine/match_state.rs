//! MatchState: the single mutable aggregate for one match
//!
//! Built once from two validated rosters, mutated by the pipeline stages in the
//! order the simulator runs them, and handed to the finalizer at the end.

use super::config::EngineConfig;
use super::game_phase::GamePhase;
use super::geometry::PitchGeometry;
use super::sim_ball::SimBall;
use super::sim_player::SimPlayer;
use super::types::{PlayerId, Vec2, Vec3};
use crate::error::{MatchError, Result, SimulationError};
use crate::models::{
    EventType, MatchEvent, MatchStatus, Tactic, TeamData, TeamMatchStats, TeamSide,
    PLAYERS_ON_COURT,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;
use validator::Validate;

// ============================================================================
// Teams
// ============================================================================

#[derive(Debug, Clone)]
pub struct SimTeam {
    pub side: TeamSide,
    pub team_id: u32,
    pub name: String,
    pub tactic: Tactic,
    /// At most seven; fewer while teammates are suspended
    pub on_court: Vec<PlayerId>,
    pub bench: Vec<PlayerId>,
    /// Serving a two-minute suspension, waiting to come back
    pub suspended: Vec<PlayerId>,
    /// Red card or third suspension; never return
    pub disqualified: Vec<PlayerId>,
    /// Countdown (s) until a disqualified player's replacement may enter
    pub replacement_timers: Vec<f32>,
    pub timeouts_used: u8,
    pub timeouts_this_half: u8,
}

// ============================================================================
// Restarts / timeouts
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartKind {
    ThrowOff,
    FreeThrow,
    ThrowIn,
    GoalThrow,
    SevenMetre,
}

impl RestartKind {
    pub fn event_type(&self) -> EventType {
        match self {
            RestartKind::ThrowOff => EventType::ThrowOff,
            RestartKind::FreeThrow => EventType::FreeThrow,
            RestartKind::ThrowIn => EventType::ThrowIn,
            RestartKind::GoalThrow => EventType::GoalThrow,
            RestartKind::SevenMetre => EventType::SevenMetreThrow,
        }
    }
}

/// A dead-ball restart awaiting (or just past) its release.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Restart {
    pub kind: RestartKind,
    pub team: TeamSide,
    pub position: Vec2,
    /// Chosen by phase setup
    pub taker: Option<PlayerId>,
    pub taken: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveTimeout {
    pub team: TeamSide,
    pub remaining: f32,
    /// Phase to go back to when the timeout ends
    pub resume: GamePhase,
}

// ============================================================================
// MatchState
// ============================================================================

#[derive(Debug, Clone)]
pub struct MatchState {
    pub config: EngineConfig,
    pub geometry: PitchGeometry,
    pub seed: u64,
    pub rng: ChaCha8Rng,

    /// Running clock in whole steps; `time` is derived from it to avoid drift
    pub clock_ticks: u64,
    /// Match clock (s)
    pub time: f32,
    /// Pipeline iterations, including paused ones
    pub step: u64,

    pub phase: GamePhase,
    /// Seconds spent in the current phase (counts while the clock is paused)
    pub phase_time: f32,
    pub setup_pending: bool,
    pub second_half: bool,
    pub first_half_kickoff: TeamSide,
    pub next_kickoff: TeamSide,

    pub score: [u16; 2],
    /// `None` = contested
    pub possession: Option<TeamSide>,
    pub players: Vec<SimPlayer>,
    pub teams: [SimTeam; 2],
    pub ball: SimBall,
    pub stats: [TeamMatchStats; 2],
    pub events: Vec<MatchEvent>,

    pub restart: Option<Restart>,
    pub timeout: Option<ActiveTimeout>,
    /// Coach asked for a timeout; taken once the throw-off is set up
    pub pending_timeout: Option<TeamSide>,
    pub status: MatchStatus,
}

impl MatchState {
    /// Validate both rosters and build the initial state (phase `PreKickOff`).
    pub fn new(
        home: &TeamData,
        home_tactic: Tactic,
        away: &TeamData,
        away_tactic: Tactic,
        config: EngineConfig,
        seed: u64,
    ) -> Result<Self> {
        config.validate()?;
        if home.id == away.id {
            return Err(MatchError::SameTeam(home.id));
        }

        let mut players = Vec::with_capacity(home.players.len() + away.players.len());
        let home_team = build_team(TeamSide::Home, home, home_tactic, &mut players)?;
        let away_team = build_team(TeamSide::Away, away, away_tactic, &mut players)?;

        let geometry = PitchGeometry::STANDARD;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let first_half_kickoff =
            if rand::Rng::gen_bool(&mut rng, 0.5) { TeamSide::Home } else { TeamSide::Away };

        let mut state = Self {
            geometry,
            seed,
            rng,
            clock_ticks: 0,
            time: 0.0,
            step: 0,
            phase: GamePhase::PreKickOff,
            phase_time: 0.0,
            setup_pending: true,
            second_half: false,
            first_half_kickoff,
            next_kickoff: first_half_kickoff,
            score: [0, 0],
            possession: None,
            players,
            teams: [home_team, away_team],
            ball: SimBall::new(Vec3::new(geometry.length * 0.5, geometry.width * 0.5, 0.0)),
            stats: [TeamMatchStats::new(), TeamMatchStats::new()],
            events: Vec::new(),
            restart: None,
            timeout: None,
            pending_timeout: None,
            status: MatchStatus::Completed,
            config,
        };
        state.refresh_effective_speeds();
        log::debug!(
            "match state built: {} vs {} (seed {}, {} throws off)",
            state.teams[0].name,
            state.teams[1].name,
            seed,
            first_half_kickoff.label()
        );
        Ok(state)
    }

    fn refresh_effective_speeds(&mut self) {
        let movement = self.config.movement.clone();
        for p in &mut self.players {
            p.effective_speed = super::physics::player_movement::effective_speed(p, &movement);
        }
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    #[inline]
    pub fn player(&self, id: PlayerId) -> &SimPlayer {
        &self.players[id.index()]
    }

    #[inline]
    pub fn player_mut(&mut self, id: PlayerId) -> &mut SimPlayer {
        &mut self.players[id.index()]
    }

    #[inline]
    pub fn team(&self, side: TeamSide) -> &SimTeam {
        &self.teams[side.index()]
    }

    #[inline]
    pub fn team_mut(&mut self, side: TeamSide) -> &mut SimTeam {
        &mut self.teams[side.index()]
    }

    #[inline]
    pub fn stats_mut(&mut self, side: TeamSide) -> &mut TeamMatchStats {
        &mut self.stats[side.index()]
    }

    pub fn score_of(&self, side: TeamSide) -> u16 {
        self.score[side.index()]
    }

    pub fn dt(&self) -> f32 {
        self.config.flow.time_step
    }

    /// Active (not suspended) on-court players of `side`, in lineup order.
    pub fn active_players(&self, side: TeamSide) -> impl Iterator<Item = PlayerId> + '_ {
        self.team(side).on_court.iter().copied().filter(move |id| self.player(*id).is_active())
    }

    /// Active players of both teams, home first.
    pub fn all_active(&self) -> Vec<PlayerId> {
        TeamSide::BOTH.iter().flat_map(|s| self.active_players(*s)).collect()
    }

    pub fn goalkeeper(&self, side: TeamSide) -> Option<PlayerId> {
        self.active_players(side).find(|id| self.player(*id).is_goalkeeper())
    }

    pub fn holder(&self) -> Option<PlayerId> {
        self.ball.holder()
    }

    pub fn holder_side(&self) -> Option<TeamSide> {
        self.holder().map(|id| self.player(id).side)
    }

    /// Roster id (as supplied by the caller) for event logging.
    pub fn roster_id(&self, id: PlayerId) -> u32 {
        self.player(id).data.id
    }

    // ------------------------------------------------------------------------
    // Mutators shared by handler / phase manager / timer
    // ------------------------------------------------------------------------

    /// Hand the ball to `id` and make their team the possession side.
    pub fn give_ball(&mut self, id: PlayerId) {
        let side = self.player(id).side;
        self.ball.attach(id, side);
        self.possession = Some(side);
        let p = self.player_mut(id);
        p.hold_time = 0.0;
        p.action = super::sim_player::PlayerAction::HoldingBall;
        p.action_timer = 0.0;
    }

    /// Event stamped with the current clock.
    pub fn event(&self, event_type: EventType) -> MatchEvent {
        MatchEvent::new(self.time, event_type)
    }

    pub fn log_event(&mut self, event: MatchEvent) {
        self.events.push(event);
    }

    /// Convenience: team + actor + position.
    pub fn log_player_event(&mut self, event_type: EventType, id: PlayerId) {
        let p = self.player(id);
        let event = self
            .event(event_type)
            .with_team(p.side)
            .with_player(p.data.id)
            .with_position(p.position.x, p.position.y);
        self.events.push(event);
    }

    // ------------------------------------------------------------------------
    // Invariants
    // ------------------------------------------------------------------------

    /// Lineup, possession/ball and score/stat invariants.
    pub fn check_invariants(&self) -> std::result::Result<(), SimulationError> {
        let fail = |reason: String| Err(SimulationError::invalid_state("invariants", self.time, reason));

        for side in TeamSide::BOTH {
            let team = self.team(side);
            if team.on_court.len() > PLAYERS_ON_COURT {
                return fail(format!("{} has {} on court", side.label(), team.on_court.len()));
            }
            let mut seen = HashSet::new();
            for id in &team.on_court {
                if !seen.insert(*id) {
                    return fail(format!("{} lists {id} twice", side.label()));
                }
                let p = self.player(*id);
                if !p.is_on_court || p.side != side {
                    return fail(format!("{id} listed on court but flagged off court"));
                }
            }
            let keepers = team.on_court.iter().filter(|id| self.player(**id).is_goalkeeper()).count();
            if keepers > 1 {
                return fail(format!("{} has {keepers} goalkeepers on court", side.label()));
            }
        }

        for p in &self.players {
            let listed = self.team(p.side).on_court.contains(&p.id);
            if p.is_on_court != listed {
                return fail(format!("{} on-court flag disagrees with lineup", p.id));
            }
            if p.is_suspended() && (p.velocity.norm() > 0.0 || self.holder() == Some(p.id)) {
                return fail(format!("suspended {} is moving or holds the ball", p.id));
            }
        }

        if let Some(holder) = self.holder() {
            let p = self.player(holder);
            if self.possession != Some(p.side) {
                return fail(format!("{holder} holds the ball without possession"));
            }
            if !p.is_active() {
                return fail(format!("inactive {holder} holds the ball"));
            }
        }

        for side in TeamSide::BOTH {
            let i = side.index();
            let o = side.opponent().index();
            if self.score[i] != self.stats[i].goals_scored || self.stats[i].goals_conceded != self.score[o] {
                return fail(format!("{} score/stat mismatch", side.label()));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Construction helpers
// ============================================================================

fn build_team(
    side: TeamSide,
    data: &TeamData,
    tactic: Tactic,
    players: &mut Vec<SimPlayer>,
) -> Result<SimTeam> {
    if data.players.is_empty() {
        return Err(MatchError::EmptyRoster(data.name.clone()));
    }

    let mut ids = HashSet::new();
    for p in &data.players {
        if !ids.insert(p.id) {
            return Err(MatchError::DuplicatePlayer { team: data.name.clone(), player_id: p.id });
        }
        p.attributes.validate().map_err(|e| MatchError::InvalidAttributes {
            player: p.name.clone(),
            reason: e.to_string(),
        })?;
    }

    let lineup = if data.lineup.is_empty() {
        data.default_lineup().ok_or_else(|| MatchError::InvalidLineupSize {
            team: data.name.clone(),
            expected: PLAYERS_ON_COURT,
            found: data.players.len().min(PLAYERS_ON_COURT.saturating_sub(1)),
        })?
    } else {
        data.lineup.clone()
    };
    if lineup.len() != PLAYERS_ON_COURT {
        return Err(MatchError::InvalidLineupSize {
            team: data.name.clone(),
            expected: PLAYERS_ON_COURT,
            found: lineup.len(),
        });
    }

    let mut starters = Vec::with_capacity(PLAYERS_ON_COURT);
    let mut lineup_ids = HashSet::new();
    for roster_id in &lineup {
        if !lineup_ids.insert(*roster_id) {
            return Err(MatchError::DuplicatePlayer { team: data.name.clone(), player_id: *roster_id });
        }
        let player = data.player(*roster_id).ok_or_else(|| MatchError::UnknownPlayer {
            team: data.name.clone(),
            player_id: *roster_id,
        })?;
        starters.push(player);
    }
    let keepers = starters.iter().filter(|p| p.is_goalkeeper()).count();
    if keepers != 1 {
        return Err(MatchError::GoalkeeperCount { team: data.name.clone(), found: keepers });
    }

    // 필드 플레이어 슬롯: LW, LB, CB, PV, RB, RW 순
    let mut field: Vec<_> = starters.iter().filter(|p| !p.is_goalkeeper()).collect();
    field.sort_by_key(|p| p.position.slot_rank());

    let mut on_court = Vec::with_capacity(PLAYERS_ON_COURT);
    for p in starters.iter().filter(|p| p.is_goalkeeper()) {
        let id = PlayerId(players.len());
        let mut sim = SimPlayer::new(id, side, (*p).clone(), None);
        sim.is_on_court = true;
        players.push(sim);
        on_court.push(id);
    }
    for (slot, p) in field.into_iter().enumerate() {
        let id = PlayerId(players.len());
        let mut sim = SimPlayer::new(id, side, (*p).clone(), Some(slot));
        sim.is_on_court = true;
        players.push(sim);
        on_court.push(id);
    }

    let mut bench = Vec::new();
    for p in data.players.iter().filter(|p| !lineup_ids.contains(&p.id)) {
        let id = PlayerId(players.len());
        let slot = if p.is_goalkeeper() { None } else { Some(p.position.slot_rank().min(5)) };
        players.push(SimPlayer::new(id, side, p.clone(), slot));
        bench.push(id);
    }

    Ok(SimTeam {
        side,
        team_id: data.id,
        name: data.name.clone(),
        tactic,
        on_court,
        bench,
        suspended: Vec::new(),
        disqualified: Vec::new(),
        replacement_timers: Vec::new(),
        timeouts_used: 0,
        timeouts_this_half: 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_fixtures::{basic_team, basic_state};
    use crate::models::{PlayerData, PlayerPosition};

    #[test]
    fn test_new_state_is_consistent() {
        let state = basic_state(1);
        assert_eq!(state.phase, GamePhase::PreKickOff);
        assert_eq!(state.team(TeamSide::Home).on_court.len(), 7);
        assert_eq!(state.team(TeamSide::Away).on_court.len(), 7);
        assert_eq!(state.team(TeamSide::Home).bench.len(), 3);
        assert!(state.goalkeeper(TeamSide::Home).is_some());
        assert!(state.check_invariants().is_ok());
    }

    #[test]
    fn test_field_slots_follow_role_order() {
        let state = basic_state(1);
        for id in &state.team(TeamSide::Away).on_court {
            let p = state.player(*id);
            match p.slot {
                None => assert!(p.is_goalkeeper()),
                Some(slot) => assert_eq!(p.position_role().slot_rank(), slot),
            }
        }
    }

    #[test]
    fn test_rejects_short_lineup() {
        let mut home = basic_team(1, "Home");
        home.lineup.truncate(6);
        let away = basic_team(2, "Away");
        let err = MatchState::new(&home, Tactic::default(), &away, Tactic::default(), EngineConfig::default(), 1)
            .unwrap_err();
        assert!(matches!(err, MatchError::InvalidLineupSize { found: 6, .. }));
    }

    #[test]
    fn test_rejects_two_goalkeepers() {
        let mut home = basic_team(1, "Home");
        let extra_gk = PlayerData::new(999, "Second Keeper", PlayerPosition::Goalkeeper);
        home.players.push(extra_gk);
        home.lineup[1] = 999;
        let away = basic_team(2, "Away");
        let err = MatchState::new(&home, Tactic::default(), &away, Tactic::default(), EngineConfig::default(), 1)
            .unwrap_err();
        assert!(matches!(err, MatchError::GoalkeeperCount { found: 2, .. }));
    }

    #[test]
    fn test_rejects_unknown_and_same_team() {
        let mut home = basic_team(1, "Home");
        home.lineup[3] = 4242;
        let away = basic_team(2, "Away");
        let err = MatchState::new(&home, Tactic::default(), &away, Tactic::default(), EngineConfig::default(), 1)
            .unwrap_err();
        assert!(matches!(err, MatchError::UnknownPlayer { player_id: 4242, .. }));

        let same = basic_team(1, "Away");
        let err = MatchState::new(&basic_team(1, "Home"), Tactic::default(), &same, Tactic::default(), EngineConfig::default(), 1)
            .unwrap_err();
        assert!(matches!(err, MatchError::SameTeam(1)));
    }

    #[test]
    fn test_rejects_out_of_range_attributes() {
        let mut home = basic_team(1, "Home");
        home.players[2].attributes.pace = 25;
        let err = MatchState::new(&home, Tactic::default(), &basic_team(2, "Away"), Tactic::default(), EngineConfig::default(), 1)
            .unwrap_err();
        assert!(matches!(err, MatchError::InvalidAttributes { .. }));
        assert!(err.is_validation());
    }

    #[test]
    fn test_invariant_checker_catches_duplicate_lineup_entry() {
        let mut state = basic_state(3);
        let dup = state.team(TeamSide::Home).on_court[2];
        state.team_mut(TeamSide::Home).on_court[3] = dup;
        assert!(state.check_invariants().is_err());
    }

    #[test]
    fn test_invariant_checker_catches_holder_without_possession() {
        let mut state = basic_state(3);
        let id = state.team(TeamSide::Home).on_court[1];
        state.give_ball(id);
        assert!(state.check_invariants().is_ok());
        state.possession = Some(TeamSide::Away);
        assert!(state.check_invariants().is_err());
    }
}
