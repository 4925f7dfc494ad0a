//! Player statistics rows.

use rusqlite::Row;
use serde::Serialize;
use types::ActionKind;

/// Per-player counters accumulated across every game.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PlayerStatistics {
    pub player_name: String,
    pub two_point_try: u32,
    pub two_point_success: u32,
    pub three_point_try: u32,
    pub three_point_success: u32,
    pub free_throw_try: u32,
    pub free_throw_success: u32,
    pub foul: u32,
}

impl PlayerStatistics {
    pub(crate) const COLUMNS: &'static str = "player_name, two_point_try, two_point_success, \
         three_point_try, three_point_success, free_throw_try, free_throw_success, foul";

    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            player_name: row.get(0)?,
            two_point_try: row.get(1)?,
            two_point_success: row.get(2)?,
            three_point_try: row.get(3)?,
            three_point_success: row.get(4)?,
            free_throw_try: row.get(5)?,
            free_throw_success: row.get(6)?,
            foul: row.get(7)?,
        })
    }

    /// Points scored from made shots.
    pub fn points(&self) -> u32 {
        self.free_throw_success + 2 * self.two_point_success + 3 * self.three_point_success
    }
}

/// Counter update for an action kind. A made shot also counts as an attempt.
pub(crate) fn counter_update(kind: ActionKind) -> Option<&'static str> {
    let sql = match kind {
        ActionKind::TwoPointTry => {
            "UPDATE player_statistics SET two_point_try = two_point_try + 1 WHERE player_name = ?1"
        }
        ActionKind::TwoPointSuccess => {
            "UPDATE player_statistics SET two_point_try = two_point_try + 1, \
             two_point_success = two_point_success + 1 WHERE player_name = ?1"
        }
        ActionKind::ThreePointTry => {
            "UPDATE player_statistics SET three_point_try = three_point_try + 1 WHERE player_name = ?1"
        }
        ActionKind::ThreePointSuccess => {
            "UPDATE player_statistics SET three_point_try = three_point_try + 1, \
             three_point_success = three_point_success + 1 WHERE player_name = ?1"
        }
        ActionKind::FreeThrowTry => {
            "UPDATE player_statistics SET free_throw_try = free_throw_try + 1 WHERE player_name = ?1"
        }
        ActionKind::FreeThrowSuccess => {
            "UPDATE player_statistics SET free_throw_try = free_throw_try + 1, \
             free_throw_success = free_throw_success + 1 WHERE player_name = ?1"
        }
        ActionKind::Foul => {
            "UPDATE player_statistics SET foul = foul + 1 WHERE player_name = ?1"
        }
        ActionKind::Other => return None,
    };
    Some(sql)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_known_kind_updates_counters() {
        for kind in ActionKind::ALL {
            assert!(counter_update(kind).is_some(), "{kind} has no counter");
        }
        assert!(counter_update(ActionKind::Other).is_none());
    }

    #[test]
    fn test_points() {
        let stats = PlayerStatistics {
            two_point_success: 2,
            three_point_success: 1,
            free_throw_success: 3,
            ..Default::default()
        };
        assert_eq!(stats.points(), 10);
    }
}
