// Retention status classification.

use std::collections::HashMap;

use crate::roster::player::{is_senior, Player, Status};

/// Values below this are cut candidates.
pub const CUT_THRESHOLD: f64 = 100.0;
/// Values up to and including this are at risk.
pub const AT_RISK_CEILING: f64 = 125.0;

/// Classify a player's retention status. First match wins:
///
/// 1. Senior class (`SR`, `SR (RS)`) -> `Graduating`
/// 2. Best at their position -> `Safe`, regardless of value
/// 3. value < 100 -> `Cut`
/// 4. 100 <= value <= 125 -> `AtRisk`
/// 5. otherwise -> `Safe`
pub fn classify_status(value: f64, year: &str, is_best_at_position: bool) -> Status {
    if is_senior(year) {
        Status::Graduating
    } else if is_best_at_position {
        Status::Safe
    } else if value < CUT_THRESHOLD {
        Status::Cut
    } else if value <= AT_RISK_CEILING {
        Status::AtRisk
    } else {
        Status::Safe
    }
}

/// Flag every player whose rating equals the maximum rating at their
/// position. Ties all count as best. Output is aligned with `players`.
pub fn best_at_position(players: &[Player]) -> Vec<bool> {
    let mut top: HashMap<&str, u32> = HashMap::new();
    for p in players {
        let entry = top.entry(p.position.as_str()).or_insert(p.rating);
        *entry = (*entry).max(p.rating);
    }

    players
        .iter()
        .map(|p| top.get(p.position.as_str()) == Some(&p.rating))
        .collect()
}
