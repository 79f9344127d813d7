// Dynasty value: current base rating scaled by development ceiling and
// remaining eligibility, discounted for players who already redshirted.

use crate::config::ValuationTables;
use crate::roster::player::{is_redshirt_year, Player};

/// Round to two decimal places, half away from zero.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Compute a player's dynasty value.
///
/// `value = base_rating * dev_multiplier * (1 + remaining_years / 4) * (1 - discount)`,
/// rounded to two decimals, where `discount` is the redshirt discount when the
/// year string carries `(RS)` and 0 otherwise. Unknown dev traits are neutral,
/// unknown years have no remaining eligibility, and a zero base rating values
/// the player at 0.
pub fn compute_value(player: &Player, tables: &ValuationTables) -> f64 {
    let discount = if is_redshirt_year(&player.year) {
        tables.redshirt_discount
    } else {
        0.0
    };
    let dev_multiplier = tables.dev_multiplier(&player.dev_trait);
    let remaining = f64::from(tables.remaining_years(&player.year));

    round2(player.base_rating * dev_multiplier * (1.0 + remaining / 4.0) * (1.0 - discount))
}
