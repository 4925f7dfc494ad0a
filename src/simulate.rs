//! Synthetic game generation.
//!
//! Produces plausible action streams for demos and load tests: the clock
//! advances 0-2 minutes per action, each action goes to either side with
//! equal probability, and descriptions are drawn uniformly from the full
//! vocabulary.

use rand::Rng;
use rand::prelude::SliceRandom;
use types::{Action, ActionKind, Minute};

/// Default game length in minutes.
pub const DEFAULT_MAX_MINUTE: Minute = 60;

/// A team and its roster.
#[derive(Debug, Clone)]
pub struct Team {
    pub name: String,
    pub roster: Vec<String>,
}

impl Team {
    pub fn new(name: impl Into<String>, roster: &[&str]) -> Self {
        Self {
            name: name.into(),
            roster: roster.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Built-in fixtures: three games' worth of teams.
pub fn default_matchups() -> Vec<(Team, Team)> {
    vec![
        (
            Team::new(
                "Boston",
                &["Jaylen Brown", "JD Davison", "Tristan Enaruna", "Ron Harper", "Sam Hauser"],
            ),
            Team::new(
                "Knicks",
                &["Pacome Dadiet", "Tyler Kolek", "Ariel Hukporti", "Kevin McCullar", "Donte DiVincenzo"],
            ),
        ),
        (
            Team::new(
                "Sixers",
                &["Tyrese Maxey", "Reggie Jackson", "KJ Martin", "Andre Drummond", "Kyle Lowry"],
            ),
            Team::new(
                "Raptors",
                &["Ja'Kobe Walter", "Jonathan Mogbo", "Jamal Shead", "Malik Williams", "Brandon Carlson"],
            ),
        ),
        (
            Team::new(
                "Bulls",
                &["Marcus Domask", "Coby White", "Lonzo Ball", "Josh Giddey", "Chris Duarte"],
            ),
            Team::new(
                "Cavaliers",
                &["Jaylon Tyson", "Max Strus", "Ty Jerome", "Caris LeVert", "Evan Mobley"],
            ),
        ),
    ]
}

/// Game poster for a matchup.
pub fn poster(team_a: &Team, team_b: &Team, separator: char) -> String {
    format!("{}{}{}", team_a.name, separator, team_b.name)
}

/// Generate one game, minutes non-decreasing from 0 up to (excluding) `max_minute`.
pub fn play_game<R: Rng>(
    team_a: &Team,
    team_b: &Team,
    separator: char,
    max_minute: Minute,
    rng: &mut R,
) -> Vec<Action> {
    let game = poster(team_a, team_b, separator);
    let mut actions = Vec::new();
    let mut minute: Minute = 0;

    while minute < max_minute {
        let team = if rng.gen_bool(0.5) { team_a } else { team_b };
        let player = team.roster.choose(rng).map(String::as_str).unwrap_or("Unknown");
        let kind = ActionKind::ALL.choose(rng).copied().unwrap_or(ActionKind::Foul);
        let description = kind.label().unwrap_or_default();

        actions.push(Action::new(game.as_str(), team.name.as_str(), player, description, minute));
        minute += rng.gen_range(0..3);
    }

    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn teams() -> (Team, Team) {
        (
            Team::new("Boston", &["Jaylen Brown", "Sam Hauser"]),
            Team::new("Knicks", &["Tyler Kolek"]),
        )
    }

    #[test]
    fn test_game_shape() {
        let (a, b) = teams();
        let mut rng = StdRng::seed_from_u64(42);
        let actions = play_game(&a, &b, '_', DEFAULT_MAX_MINUTE, &mut rng);

        assert!(!actions.is_empty());
        assert!(actions.iter().all(|x| x.game_poster == "Boston_Knicks"));
        assert!(actions.windows(2).all(|w| w[0].minute <= w[1].minute));
        assert!(actions.iter().all(|x| (0..DEFAULT_MAX_MINUTE).contains(&x.minute)));
        assert!(actions.iter().all(|x| x.kind() != ActionKind::Other));
    }

    #[test]
    fn test_players_belong_to_their_team() {
        let (a, b) = teams();
        let mut rng = StdRng::seed_from_u64(7);
        for action in play_game(&a, &b, '_', DEFAULT_MAX_MINUTE, &mut rng) {
            let roster = if action.team == "Boston" { &a.roster } else { &b.roster };
            assert!(roster.contains(&action.player_name), "{action}");
        }
    }

    #[test]
    fn test_same_seed_same_game() {
        let (a, b) = teams();
        let first = play_game(&a, &b, '_', 30, &mut StdRng::seed_from_u64(1));
        let second = play_game(&a, &b, '_', 30, &mut StdRng::seed_from_u64(1));
        assert_eq!(first, second);
    }

    #[test]
    fn test_custom_separator() {
        let (a, b) = teams();
        let actions = play_game(&a, &b, '-', 5, &mut StdRng::seed_from_u64(3));
        assert_eq!(actions[0].game_poster, "Boston-Knicks");
    }

    #[test]
    fn test_zero_length_game() {
        let (a, b) = teams();
        assert!(play_game(&a, &b, '_', 0, &mut StdRng::seed_from_u64(3)).is_empty());
    }
}
