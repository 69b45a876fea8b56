//! Leaderboard ranking and aggregate statistics.
//!
//! A pure function over the participant score records of one test. Ranking
//! is stable: equal scores keep their input order, which is whatever order
//! the upstream source returned. Ranks are 1-based and consecutive.

use serde::{Deserialize, Serialize};

/// One participant's result for a test, as returned by the leaderboard
/// source after boundary normalization (a missing score is already 0 here).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantScore {
    pub user: String,
    pub score: f64,
    #[serde(default)]
    pub correct_answers: Option<u32>,
    #[serde(default)]
    pub time_spent: Option<u64>,
}

/// A ranked leaderboard row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub user: String,
    pub score: f64,
    /// 1-based position in the ranked order.
    pub rank: u32,
    pub is_current_user: bool,
}

/// The current user's position, when one was requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Standing {
    Ranked { entry: LeaderboardEntry },
    NotParticipated,
}

/// Ranked entries plus aggregate statistics for one test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
    pub participant_count: usize,
    /// Highest score, 0 for an empty board.
    pub highest_score: f64,
    /// Arithmetic mean of all scores, rounded to the nearest integer.
    pub average_score: f64,
    pub standing: Standing,
}

/// Rank participant records by descending score.
///
/// Ties keep their input order (stable sort, no secondary key). An absent
/// `current_user` or one that did not participate yields
/// [`Standing::NotParticipated`], never an error.
pub fn rank_participants(
    records: &[ParticipantScore],
    current_user: Option<&str>,
) -> Leaderboard {
    let mut ordered: Vec<&ParticipantScore> = records.iter().collect();
    ordered.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let entries: Vec<LeaderboardEntry> = ordered
        .iter()
        .enumerate()
        .map(|(i, record)| LeaderboardEntry {
            user: record.user.clone(),
            score: record.score,
            rank: (i + 1) as u32,
            is_current_user: current_user == Some(record.user.as_str()),
        })
        .collect();

    let participant_count = entries.len();
    let highest_score = entries.first().map(|e| e.score).unwrap_or(0.0);
    let average_score = if participant_count > 0 {
        (entries.iter().map(|e| e.score).sum::<f64>() / participant_count as f64).round()
    } else {
        0.0
    };

    let standing = entries
        .iter()
        .find(|e| e.is_current_user)
        .cloned()
        .map(|entry| Standing::Ranked { entry })
        .unwrap_or(Standing::NotParticipated);

    Leaderboard {
        entries,
        participant_count,
        highest_score,
        average_score,
        standing,
    }
}
