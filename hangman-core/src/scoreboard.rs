use hangman_types::{GameResult, Player, PlayerId, ScoreboardEntry};
use std::collections::HashMap;

use crate::collaborators::CompletedGame;

/// Aggregate the ledger per player, ranked by total score (ties by name).
///
/// Every known player gets an entry, even without finished games. Players
/// that only appear in the ledger keep the name recorded with their games.
pub fn build_scoreboard(players: &[Player], games: &[CompletedGame]) -> Vec<ScoreboardEntry> {
    let mut entries: HashMap<PlayerId, ScoreboardEntry> = players
        .iter()
        .map(|player| (player.id, empty_entry(player.id, &player.name)))
        .collect();

    for game in games {
        let entry = entries
            .entry(game.player_id)
            .or_insert_with(|| empty_entry(game.player_id, &game.player_name));

        entry.total_score += game.score;
        entry.games_played += 1;
        match game.result {
            GameResult::Won => entry.games_won += 1,
            GameResult::Lost => entry.games_lost += 1,
        }
    }

    let mut scoreboard: Vec<ScoreboardEntry> = entries.into_values().collect();
    scoreboard.sort_by(|a, b| {
        b.total_score
            .cmp(&a.total_score)
            .then_with(|| a.player_name.cmp(&b.player_name))
    });
    scoreboard
}

fn empty_entry(player_id: PlayerId, player_name: &str) -> ScoreboardEntry {
    ScoreboardEntry {
        player_id,
        player_name: player_name.to_string(),
        total_score: 0,
        games_played: 0,
        games_won: 0,
        games_lost: 0,
    }
}
