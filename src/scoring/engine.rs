use std::collections::{BTreeMap, HashSet};
use tracing::debug;

use super::{
    table_size::{MAX_ACTIVE, MIN_ACTIVE, MIN_ROSTER_FOR_SITTING_OUT},
    Player, RoundKind, RoundOutcome, ScoredRound, ScoringError,
};

/// Validates a declared outcome against the roster and computes every
/// player's signed delta.
///
/// The round kind is inferred from the winner count: one winner is a won
/// solo, all-but-one winners is a lost solo, anything in between is a team
/// split. A caller-supplied `is_solo`/`solo_player` never overrides it.
///
/// Team-split deltas use floor division, so rounds with uneven teams (five or
/// six active players) are not zero-sum.
pub fn score_round(roster: &[Player], outcome: &RoundOutcome) -> Result<ScoredRound, ScoringError> {
    let sitting_out = validate_sitting_out(roster, outcome.sitting_out.as_deref())?;

    let active: Vec<&Player> = roster
        .iter()
        .filter(|p| Some(p.id.as_str()) != sitting_out)
        .collect();
    let n_active = active.len();

    if !(MIN_ACTIVE..=MAX_ACTIVE).contains(&n_active) {
        return Err(ScoringError::invalid(format!(
            "{n_active} active players, expected {MIN_ACTIVE} to {MAX_ACTIVE}"
        )));
    }

    validate_winners(&active, sitting_out, &outcome.winners)?;

    let kind = classify(n_active, outcome.winners.len())?;
    let solo_player = match kind {
        RoundKind::SoloWon => Some(outcome.winners[0].clone()),
        RoundKind::SoloLost => active
            .iter()
            .find(|p| !outcome.winners.contains(&p.id))
            .map(|p| p.id.clone()),
        RoundKind::TeamSplit => None,
    };

    if outcome.is_solo != kind.is_solo()
        || (outcome.solo_player.is_some() && outcome.solo_player != solo_player)
    {
        debug!(
            declared_solo = outcome.is_solo,
            declared_solo_player = ?outcome.solo_player,
            inferred = ?kind,
            inferred_solo_player = ?solo_player,
            "Declared solo flag disagrees with winner count, using inferred kind"
        );
    }

    let (winner_delta, loser_delta, solo_delta) =
        deltas(kind, outcome.points, outcome.winners.len(), n_active)?;

    let mut scores = BTreeMap::new();
    for player in roster {
        let delta = if Some(player.id.as_str()) == sitting_out {
            0
        } else if solo_player.as_deref() == Some(player.id.as_str()) {
            solo_delta
        } else if outcome.winners.contains(&player.id) {
            winner_delta
        } else {
            loser_delta
        };
        scores.insert(player.id.clone(), delta);
    }

    Ok(ScoredRound {
        kind,
        solo_player,
        scores,
    })
}

fn validate_sitting_out<'a>(
    roster: &[Player],
    sitting_out: Option<&'a str>,
) -> Result<Option<&'a str>, ScoringError> {
    let Some(player_id) = sitting_out else {
        return Ok(None);
    };

    if roster.len() < MIN_ROSTER_FOR_SITTING_OUT {
        return Err(ScoringError::invalid(format!(
            "nobody sits out with {} players",
            roster.len()
        )));
    }
    if !roster.iter().any(|p| p.id == player_id) {
        return Err(ScoringError::invalid(format!(
            "sitting-out player {player_id} is not on the roster"
        )));
    }

    Ok(Some(player_id))
}

fn validate_winners(
    active: &[&Player],
    sitting_out: Option<&str>,
    winners: &[String],
) -> Result<(), ScoringError> {
    if winners.is_empty() {
        return Err(ScoringError::invalid("at least one winner is required"));
    }

    let mut seen = HashSet::new();
    for winner in winners {
        if Some(winner.as_str()) == sitting_out {
            return Err(ScoringError::invalid(format!(
                "{winner} sits out and cannot win"
            )));
        }
        if !active.iter().any(|p| &p.id == winner) {
            return Err(ScoringError::invalid(format!(
                "winner {winner} is not an active player"
            )));
        }
        if !seen.insert(winner.as_str()) {
            return Err(ScoringError::invalid(format!("winner {winner} listed twice")));
        }
    }

    Ok(())
}

fn classify(n_active: usize, winner_count: usize) -> Result<RoundKind, ScoringError> {
    if winner_count == 1 {
        return Ok(RoundKind::SoloWon);
    }
    if winner_count == n_active - 1 {
        return Ok(RoundKind::SoloLost);
    }
    if (2..=n_active - 2).contains(&winner_count) {
        return Ok(RoundKind::TeamSplit);
    }

    Err(ScoringError::invalid(format!(
        "{winner_count} winners is not valid with {n_active} active players"
    )))
}

/// Returns `(winner, loser, solo)` deltas for the round kind.
fn deltas(
    kind: RoundKind,
    points: i32,
    winner_count: usize,
    n_active: usize,
) -> Result<(i32, i32, i32), ScoringError> {
    let opponents = n_active - 1;

    match kind {
        RoundKind::SoloWon => {
            let solo = multiply(points, opponents)?;
            Ok((0, negate(points)?, solo))
        }
        RoundKind::SoloLost => {
            let solo = negate(multiply(points, opponents)?)?;
            Ok((points, 0, solo))
        }
        RoundKind::TeamSplit => {
            let loser_count = n_active - winner_count;
            let winner = multiply(points, loser_count)?.div_euclid(winner_count as i32);
            let loser = negate(multiply(points, winner_count)?)?.div_euclid(loser_count as i32);
            Ok((winner, loser, 0))
        }
    }
}

fn multiply(points: i32, factor: usize) -> Result<i32, ScoringError> {
    i32::try_from(factor)
        .ok()
        .and_then(|factor| points.checked_mul(factor))
        .ok_or_else(|| ScoringError::invalid(format!("points {points} out of range")))
}

fn negate(value: i32) -> Result<i32, ScoringError> {
    value
        .checked_neg()
        .ok_or_else(|| ScoringError::invalid(format!("points {value} out of range")))
}
