//! Whole-pipeline scenarios: hand-built positions driven through `tick`.

use super::event_handler::apply_suspension;
use super::game_phase::GamePhase;
use super::match_state::{MatchState, RestartKind};
use super::sim_ball::FlightKind;
use super::sim_player::PlayerAction;
use super::simulator::{tick, MatchSimulator};
use super::test_fixtures::{basic_state, basic_team};
use super::timer::update_timers;
use super::types::{Vec2, Vec3};
use crate::engine::config::EngineConfig;
use crate::models::{EventType, MatchStatus, PlayerAttributes, Tactic, TeamSide};

fn park_everyone(state: &mut MatchState) {
    for (i, id) in state.all_active().into_iter().enumerate() {
        state.player_mut(id).teleport(Vec2::new(10.0 + (i % 7) as f32, if i < 7 { 1.0 } else { 19.0 }));
    }
}

fn live_attack(seed: u64, side: TeamSide) -> MatchState {
    let mut state = basic_state(seed);
    state.phase = GamePhase::attack(side);
    state.setup_pending = false;
    park_everyone(&mut state);
    state
}

#[test]
fn test_unopposed_shot_scores_and_resets_to_throw_off() {
    let mut state = live_attack(11, TeamSide::Home);
    state.config.actions.shot.max_aim_error = 0.0;
    state.config.actions.shot.max_spin = 0.0;

    let keeper = state.goalkeeper(TeamSide::Away).unwrap();
    apply_suspension(&mut state, keeper);
    assert!(state.goalkeeper(TeamSide::Away).is_none());

    let shooter = state.team(TeamSide::Home).on_court[3];
    state.player_mut(shooter).data.attributes = PlayerAttributes::uniform(20);
    state.player_mut(shooter).teleport(Vec2::new(33.0, 10.0));
    state.give_ball(shooter);
    state.player_mut(shooter).begin_action(PlayerAction::PreparingShot, 0.0);

    for _ in 0..20 {
        tick(&mut state).unwrap();
        if state.score[0] > 0 {
            break;
        }
    }
    assert_eq!(state.score, [1, 0]);
    assert_eq!(state.stats[0].goals_scored, 1);
    assert_eq!(state.stats[1].goals_conceded, 1);
    assert_eq!(state.stats[0].shots, 1);
    assert_eq!(state.phase, GamePhase::PreKickOff);
    assert_eq!(state.next_kickoff, TeamSide::Away);
    assert_eq!(state.ball.xy(), state.geometry.centre());
    assert!(state.events.iter().any(|e| e.event_type == EventType::Goal));
    assert!(state.check_invariants().is_ok());
}

#[test]
fn test_hopeless_pass_turns_the_ball_over() {
    let mut state = live_attack(12, TeamSide::Home);
    state.config.actions.pass.base_accuracy = 0.0;
    state.config.actions.pass.skill_floor = 0.0;

    let passer = state.team(TeamSide::Home).on_court[3];
    let receiver = state.team(TeamSide::Home).on_court[4];
    state.player_mut(passer).teleport(Vec2::new(25.0, 10.0));
    state.player_mut(receiver).teleport(Vec2::new(30.0, 14.0));
    state.give_ball(passer);
    let p = state.player_mut(passer);
    p.begin_action(PlayerAction::PreparingPass, 0.0);
    p.target_player = Some(receiver);

    tick(&mut state).unwrap();
    assert_eq!(state.stats[0].turnovers, 1);
    assert_eq!(state.stats[0].passes_completed, 0);
    assert!(state.holder().is_none());
    assert_eq!(state.possession, None);
    assert_eq!(state.phase, GamePhase::ContestedBall);
}

#[test]
fn test_ball_over_sideline_gives_throw_in_to_the_other_team() {
    let mut state = basic_state(13);
    state.phase = GamePhase::ContestedBall;
    state.setup_pending = false;
    state.possession = None;
    park_everyone(&mut state);

    let toucher = state.team(TeamSide::Home).on_court[2];
    state.ball.place(Vec2::new(30.0, 0.5));
    state.ball.touch(toucher, TeamSide::Home);
    let from = Vec3::new(30.0, 0.5, 1.0);
    state.ball.launch(from, Vec3::new(0.0, -10.0, 0.0), Vec3::zeros(), FlightKind::Loose, Vec3::new(30.0, -1.0, 0.0));

    tick(&mut state).unwrap();
    assert_eq!(state.phase, GamePhase::AwaySetPiece);
    assert_eq!(state.possession, Some(TeamSide::Away));

    tick(&mut state).unwrap();
    assert_eq!(state.events.last().unwrap().event_type, EventType::ThrowIn);
    let restart = state.restart.unwrap();
    assert_eq!(restart.kind, RestartKind::ThrowIn);
    assert_eq!(restart.team, TeamSide::Away);
    let taker = state.holder().unwrap();
    assert_eq!(restart.taker, Some(taker));
    assert_eq!(state.player(taker).side, TeamSide::Away);
    assert!(!state.player(taker).is_goalkeeper());
    assert!((restart.position.x - 30.0).abs() < 0.5);
}

#[test]
fn test_same_seed_same_match() {
    let home = basic_team(1, "Home");
    let away = basic_team(2, "Away");
    let run = |seed| {
        let out = MatchSimulator::new(&home, Tactic::default(), &away, Tactic::default(), EngineConfig::quick(120.0), seed)
            .unwrap()
            .run();
        serde_json::to_string(&out).unwrap()
    };
    assert_eq!(run(42), run(42));
    assert_ne!(run(42), run(43));
}

#[test]
fn test_full_match_keeps_invariants_every_tick() {
    let home = basic_team(1, "Home");
    let away = basic_team(2, "Away");
    let mut state =
        MatchState::new(&home, Tactic::default(), &away, Tactic::default(), EngineConfig::quick(90.0), 77).unwrap();
    let max_steps = state.config.flow.max_steps();

    while !state.phase.is_finished() {
        assert!(state.step < max_steps, "match did not finish within the step bound");
        tick(&mut state).unwrap();
        if let Err(e) = state.check_invariants() {
            panic!("step {} ({:?}): {e}", state.step, state.phase);
        }
    }
    assert_eq!(state.status, MatchStatus::Completed);
    assert!((state.time - 180.0).abs() < 0.05);
    assert!(state.events.iter().any(|e| e.event_type == EventType::HalfTime));
    assert_eq!(state.events.last().unwrap().event_type, EventType::FullTime);
}

#[test]
fn test_many_seeds_produce_consistent_results() {
    let home = basic_team(1, "Home");
    let away = basic_team(2, "Away");
    for seed in 0..6 {
        let out = MatchSimulator::new(&home, Tactic::default(), &away, Tactic::default(), EngineConfig::quick(150.0), seed)
            .unwrap()
            .run();
        let r = &out.result;
        assert_eq!(r.status, MatchStatus::Completed, "seed {seed}");
        assert!(r.is_consistent(), "seed {seed}");
        let goals = out.events.iter().filter(|e| e.event_type == EventType::Goal).count();
        assert_eq!(goals, (r.home_score + r.away_score) as usize, "seed {seed}");
        assert!(r.home_stats.goals_scored <= r.home_stats.shots, "seed {seed}");
        assert!(out.events.windows(2).all(|w| w[0].time_secs <= w[1].time_secs), "seed {seed}");
    }
}

#[test]
fn test_suspended_player_back_after_1200_ticks() {
    let mut state = live_attack(14, TeamSide::Away);
    let id = state.team(TeamSide::Away).on_court[2];
    apply_suspension(&mut state, id);
    assert!(!state.player(id).is_on_court);
    assert!(!state.team(TeamSide::Away).on_court.contains(&id));

    for _ in 0..1199 {
        update_timers(&mut state);
    }
    assert!(state.player(id).is_suspended());
    update_timers(&mut state);

    let p = state.player(id);
    assert!(p.is_on_court);
    assert_eq!(p.action, PlayerAction::Idle);
    assert_eq!(state.team(TeamSide::Away).on_court.len(), 7);
}
