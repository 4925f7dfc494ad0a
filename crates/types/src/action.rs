//! Action events and their description vocabulary.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{GamePoster, Minute};

// =============================================================================
// Action
// =============================================================================

/// One observed event for a game.
///
/// Field names on the wire match the recorded game files
/// (`gameposter`, `playername`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// Game identifier, e.g. `"Boston_Knicks"`.
    #[serde(rename = "gameposter")]
    pub game_poster: GamePoster,
    /// Team the acting player belongs to.
    pub team: String,
    /// Acting player.
    #[serde(rename = "playername")]
    pub player_name: String,
    /// Free-form description, normally one of the [`ActionKind`] labels.
    pub description: String,
    /// Game clock offset.
    pub minute: Minute,
}

impl Action {
    /// Create a new action.
    pub fn new(
        game_poster: impl Into<String>,
        team: impl Into<String>,
        player_name: impl Into<String>,
        description: impl Into<String>,
        minute: Minute,
    ) -> Self {
        Self {
            game_poster: game_poster.into(),
            team: team.into(),
            player_name: player_name.into(),
            description: description.into(),
            minute,
        }
    }

    /// Parsed description.
    pub fn kind(&self) -> ActionKind {
        ActionKind::parse(&self.description)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{} @{}'] {} ({}): {}",
            self.game_poster, self.minute, self.player_name, self.team, self.description
        )
    }
}

// =============================================================================
// ActionKind
// =============================================================================

/// The closed vocabulary of action descriptions.
///
/// Labels keep the upstream spelling ("succes").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    FreeThrowTry,
    FreeThrowSuccess,
    TwoPointTry,
    TwoPointSuccess,
    ThreePointTry,
    ThreePointSuccess,
    Foul,
    /// Anything outside the vocabulary.
    Other,
}

impl ActionKind {
    /// Every known kind, in label order.
    pub const ALL: [ActionKind; 7] = [
        ActionKind::FreeThrowTry,
        ActionKind::TwoPointTry,
        ActionKind::ThreePointTry,
        ActionKind::FreeThrowSuccess,
        ActionKind::TwoPointSuccess,
        ActionKind::ThreePointSuccess,
        ActionKind::Foul,
    ];

    /// Parse a description. Total: unknown text maps to [`ActionKind::Other`].
    pub fn parse(description: &str) -> Self {
        match description {
            "free throw try" => ActionKind::FreeThrowTry,
            "free throw succes" => ActionKind::FreeThrowSuccess,
            "2pts try" => ActionKind::TwoPointTry,
            "2pts succes" => ActionKind::TwoPointSuccess,
            "3pts try" => ActionKind::ThreePointTry,
            "3pts succes" => ActionKind::ThreePointSuccess,
            "foul" => ActionKind::Foul,
            _ => ActionKind::Other,
        }
    }

    /// Wire label, or `None` for [`ActionKind::Other`].
    pub fn label(self) -> Option<&'static str> {
        match self {
            ActionKind::FreeThrowTry => Some("free throw try"),
            ActionKind::FreeThrowSuccess => Some("free throw succes"),
            ActionKind::TwoPointTry => Some("2pts try"),
            ActionKind::TwoPointSuccess => Some("2pts succes"),
            ActionKind::ThreePointTry => Some("3pts try"),
            ActionKind::ThreePointSuccess => Some("3pts succes"),
            ActionKind::Foul => Some("foul"),
            ActionKind::Other => None,
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label().unwrap_or("other"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrips_labels() {
        for kind in ActionKind::ALL {
            let label = kind.label().unwrap();
            assert_eq!(ActionKind::parse(label), kind);
        }
    }

    #[test]
    fn test_parse_unknown_is_other() {
        assert_eq!(ActionKind::parse("dunk"), ActionKind::Other);
        assert_eq!(ActionKind::parse("2pts success"), ActionKind::Other);
        assert_eq!(ActionKind::parse(""), ActionKind::Other);
        assert_eq!(ActionKind::Other.label(), None);
    }

    #[test]
    fn test_action_wire_format() {
        let json = r#"{"gameposter":"Boston_Knicks","team":"Boston","playername":"Jaylen Brown","description":"3pts succes","minute":12}"#;
        let action: Action = serde_json::from_str(json).unwrap();

        assert_eq!(action.game_poster, "Boston_Knicks");
        assert_eq!(action.player_name, "Jaylen Brown");
        assert_eq!(action.kind(), ActionKind::ThreePointSuccess);

        let back = serde_json::to_string(&action).unwrap();
        assert!(back.contains("\"gameposter\":\"Boston_Knicks\""));
        assert!(back.contains("\"minute\":12"));
    }

    #[test]
    fn test_action_display() {
        let action = Action::new("Boston_Knicks", "Knicks", "Tyler Kolek", "foul", 7);
        assert_eq!(
            action.to_string(),
            "[Boston_Knicks @7'] Tyler Kolek (Knicks): foul"
        );
    }
}
