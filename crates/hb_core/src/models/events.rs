use super::TeamSide;
use serde::{Deserialize, Serialize};

/// One entry of the append-only match log.
///
/// The log is diagnostics/commentary input only; no engine decision reads it back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchEvent {
    /// Simulated seconds since throw-off.
    pub time_secs: f32,
    pub minute: u8,
    #[serde(rename = "type")]
    pub event_type: EventType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<TeamSide>,
    /// Roster id of the primary actor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_id: Option<u32>,
    /// Roster id of the secondary actor (pass receiver, fouled player, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_id: Option<u32>,
    /// Court position in metres.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<(f32, f32)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl MatchEvent {
    pub fn new(time_secs: f32, event_type: EventType) -> Self {
        Self {
            time_secs,
            minute: (time_secs / 60.0).floor().clamp(0.0, u8::MAX as f32) as u8,
            event_type,
            team: None,
            player_id: None,
            target_id: None,
            position: None,
            detail: None,
        }
    }

    pub fn with_team(mut self, team: TeamSide) -> Self {
        self.team = Some(team);
        self
    }

    pub fn with_player(mut self, player_id: u32) -> Self {
        self.player_id = Some(player_id);
        self
    }

    pub fn with_target(mut self, target_id: Option<u32>) -> Self {
        self.target_id = target_id;
        self
    }

    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = Some((x, y));
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    ThrowOff,
    Pass,
    PassCompleted,
    Turnover,
    Shot,
    Goal,
    Miss,
    Save,
    Parry,
    Block,
    Interception,
    TackleWon,
    Foul,
    FreeThrow,
    /// 7-metre throw (handball penalty)
    SevenMetreThrow,
    ThrowIn,
    GoalThrow,
    TwoMinuteSuspension,
    RedCard,
    ReEntry,
    Substitution,
    Timeout,
    HalfTime,
    FullTime,
    /// Step failed; the match was force-finished.
    Aborted,
    Cancelled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minute_from_time() {
        assert_eq!(MatchEvent::new(0.0, EventType::ThrowOff).minute, 0);
        assert_eq!(MatchEvent::new(59.9, EventType::Goal).minute, 0);
        assert_eq!(MatchEvent::new(61.0, EventType::Goal).minute, 1);
    }

    #[test]
    fn test_serialization_skips_empty_fields() {
        let event = MatchEvent::new(12.5, EventType::Goal).with_team(TeamSide::Home).with_player(7);
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"goal\""));
        assert!(json.contains("\"team\":\"home\""));
        assert!(!json.contains("target_id"));
    }
}
