//! Player-player separation, goal-area rule and court clamping.
//!
//! O(n²) over the (at most 14) active players each tick.

use crate::engine::config::MovementConfig;
use crate::engine::match_state::MatchState;
use crate::engine::sim_player::SimPlayer;
use crate::engine::types::{PlayerId, Vec2};
use crate::models::AttributeId;

/// Approximate body mass, heavier for stronger players.
pub fn player_mass(p: &SimPlayer, cfg: &MovementConfig) -> f32 {
    cfg.base_mass + cfg.strength_mass_bonus * p.attrs().normalized(AttributeId::Strength)
}

/// Push overlapping players apart, lighter players moving further.
pub fn separate_players(state: &mut MatchState) {
    let cfg = &state.config.movement;
    let ids: Vec<PlayerId> = state.all_active();
    let min_dist = cfg.player_radius * 2.0;

    for i in 0..ids.len() {
        for j in (i + 1)..ids.len() {
            let (a, b) = (ids[i], ids[j]);
            let pa = state.players[a.index()].position;
            let pb = state.players[b.index()].position;
            let delta = pb - pa;
            let dist = delta.norm();
            if dist >= min_dist {
                continue;
            }
            // 같은 위치: 인덱스 순서로 x축 분리
            let normal = if dist > 1e-4 { delta / dist } else { Vec2::new(1.0, 0.0) };
            let overlap = min_dist - dist;
            let ma = player_mass(&state.players[a.index()], cfg);
            let mb = player_mass(&state.players[b.index()], cfg);
            let total = ma + mb;
            state.players[a.index()].position -= normal * (overlap * mb / total);
            state.players[b.index()].position += normal * (overlap * ma / total);
        }
    }
}

/// Field players may not stand in either goal area; goalkeepers stay inside their own
/// court half. Everybody is clamped inside the court with the sideline buffer.
pub fn enforce_court_bounds(state: &mut MatchState) {
    let geometry = state.geometry;
    let buffer = state.config.movement.sideline_buffer;
    for id in state.all_active() {
        let p = &mut state.players[id.index()];
        let mut pos = geometry.clamp_to_court(&p.position, buffer);
        if !p.is_goalkeeper() {
            if let Some(area) = geometry.goal_area_at(&pos) {
                pos = geometry.push_out_of_goal_area(area, &pos);
                pos = geometry.clamp_to_court(&pos, buffer);
            }
        } else if geometry.depth_from_goal(p.side, &pos) > geometry.length * 0.5 {
            pos = geometry.from_goal(p.side, geometry.length * 0.5, pos.y);
        }
        if pos != p.position {
            p.position = pos;
        }
    }
}
