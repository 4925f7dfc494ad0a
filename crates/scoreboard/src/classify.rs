//! Score classification.
//!
//! The only place that decides how many points an action is worth.

use types::ActionKind;

/// Points scored by an action with this description. Unknown text scores 0.
pub fn classify(description: &str) -> u32 {
    points(ActionKind::parse(description))
}

/// Points scored by an action of this kind.
pub fn points(kind: ActionKind) -> u32 {
    match kind {
        ActionKind::FreeThrowSuccess => 1,
        ActionKind::TwoPointSuccess => 2,
        ActionKind::ThreePointSuccess => 3,
        ActionKind::FreeThrowTry
        | ActionKind::TwoPointTry
        | ActionKind::ThreePointTry
        | ActionKind::Foul
        | ActionKind::Other => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoring_table() {
        assert_eq!(classify("free throw succes"), 1);
        assert_eq!(classify("2pts succes"), 2);
        assert_eq!(classify("3pts succes"), 3);
    }

    #[test]
    fn test_non_scoring_descriptions() {
        for description in ["free throw try", "2pts try", "3pts try", "foul"] {
            assert_eq!(classify(description), 0, "{description}");
        }
    }

    #[test]
    fn test_unknown_descriptions_score_zero() {
        assert_eq!(classify(""), 0);
        assert_eq!(classify("3PTS SUCCES"), 0);
        assert_eq!(classify("3pts success"), 0);
        assert_eq!(classify(" 2pts succes"), 0);
    }
}
