use crate::{MatchResult, Scoreboard, WinReason};
use std::cmp::Ordering;

/// Decide the outcome of a scoreboard.
///
/// Rules, first match wins:
///   1. different scores: the higher score wins (`score`)
///   2. equal scores, different fouls: the team with fewer fouls wins (`fouls`)
///   3. everything equal: no winner (`draw`)
///
/// Pure; the live clock, forced ends and the result editor all call this.
pub fn determine_winner(board: &Scoreboard, team1_id: &str, team2_id: &str) -> MatchResult {
    let pick = |team1_ahead: bool| {
        if team1_ahead { team1_id } else { team2_id }.to_string()
    };

    match board.team1_score.cmp(&board.team2_score) {
        Ordering::Greater => MatchResult {
            winner_id: Some(pick(true)),
            reason: WinReason::Score,
        },
        Ordering::Less => MatchResult {
            winner_id: Some(pick(false)),
            reason: WinReason::Score,
        },
        Ordering::Equal => match board.team1_fouls.cmp(&board.team2_fouls) {
            Ordering::Less => MatchResult {
                winner_id: Some(pick(true)),
                reason: WinReason::Fouls,
            },
            Ordering::Greater => MatchResult {
                winner_id: Some(pick(false)),
                reason: WinReason::Fouls,
            },
            Ordering::Equal => MatchResult::draw(),
        },
    }
}

/// True iff scores and fouls are both level.
pub fn needs_overtime(board: &Scoreboard) -> bool {
    board.team1_score == board.team2_score && board.team1_fouls == board.team2_fouls
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(s1: u32, s2: u32, f1: u32, f2: u32) -> Scoreboard {
        Scoreboard {
            team1_score: s1,
            team2_score: s2,
            team1_fouls: f1,
            team2_fouls: f2,
        }
    }

    #[test]
    fn higher_score_wins_regardless_of_fouls() {
        let result = determine_winner(&board(3, 1, 2, 5), "A", "B");
        assert_eq!(result.winner_id.as_deref(), Some("A"));
        assert_eq!(result.reason, WinReason::Score);

        let result = determine_winner(&board(0, 4, 0, 9), "A", "B");
        assert_eq!(result.winner_id.as_deref(), Some("B"));
        assert_eq!(result.reason, WinReason::Score);
    }

    #[test]
    fn fewer_fouls_break_a_level_score() {
        let result = determine_winner(&board(2, 2, 1, 3), "A", "B");
        assert_eq!(result.winner_id.as_deref(), Some("A"));
        assert_eq!(result.reason, WinReason::Fouls);

        let result = determine_winner(&board(0, 0, 4, 2), "A", "B");
        assert_eq!(result.winner_id.as_deref(), Some("B"));
        assert_eq!(result.reason, WinReason::Fouls);
    }

    #[test]
    fn full_tie_is_a_draw() {
        let result = determine_winner(&board(2, 2, 2, 2), "A", "B");
        assert_eq!(result, MatchResult::draw());
        assert!(needs_overtime(&board(2, 2, 2, 2)));
    }

    #[test]
    fn reason_matches_rule_order_over_a_grid() {
        for s1 in 0..4 {
            for s2 in 0..4 {
                for f1 in 0..4 {
                    for f2 in 0..4 {
                        let b = board(s1, s2, f1, f2);
                        let result = determine_winner(&b, "A", "B");
                        let expected = if s1 != s2 {
                            WinReason::Score
                        } else if f1 != f2 {
                            WinReason::Fouls
                        } else {
                            WinReason::Draw
                        };
                        assert_eq!(result.reason, expected, "{b:?}");
                        assert_eq!(needs_overtime(&b), expected == WinReason::Draw, "{b:?}");
                        if expected == WinReason::Score {
                            let winner = if s1 > s2 { "A" } else { "B" };
                            assert_eq!(result.winner_id.as_deref(), Some(winner));
                        }
                        if expected == WinReason::Fouls {
                            let winner = if f1 < f2 { "A" } else { "B" };
                            assert_eq!(result.winner_id.as_deref(), Some(winner));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn repeated_calls_agree() {
        let b = board(7, 7, 3, 1);
        assert_eq!(determine_winner(&b, "A", "B"), determine_winner(&b, "A", "B"));
    }
}
