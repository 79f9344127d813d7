// Player record and the small vocabularies around it (years, positions, status).

use serde::Serialize;
use std::fmt;

/// Marker appended to a year string once a player has used their redshirt season.
pub const REDSHIRT_MARKER: &str = "(RS)";

/// Canonical depth-chart order used when sorting rosters.
pub const POSITION_ORDER: &[&str] = &[
    "QB", "HB", "FB", "WR", "TE", "LT", "LG", "C", "RG", "RT", "LEDG", "REDG", "DT", "WILL",
    "MIKE", "SAM", "CB", "FS", "SS", "K", "P", "ATH",
];

/// Sort key for a position. Positions outside the canonical list sort last.
pub fn position_sort_order(position: &str) -> usize {
    POSITION_ORDER
        .iter()
        .position(|p| *p == position)
        .unwrap_or(POSITION_ORDER.len())
}

/// Whether a year string carries the redshirt marker, e.g. `"JR (RS)"`.
///
/// This is the only trigger for the redshirt valuation discount; the
/// `redshirt` flag on `Player` means something else.
pub fn is_redshirt_year(year: &str) -> bool {
    year.contains(REDSHIRT_MARKER)
}

/// Whether a year string is a senior class (`SR` or `SR (RS)`).
pub fn is_senior(year: &str) -> bool {
    matches!(year, "SR" | "SR (RS)")
}

/// Whether a `DRAFTED` cell marks the player as drafted. Empty cells and
/// negative flag words (`FALSE`, `no`, `n`, `0`) do not.
pub fn is_draft_marker(text: &str) -> bool {
    let text = text.trim();
    !text.is_empty()
        && !matches!(text.to_ascii_lowercase().as_str(), "false" | "no" | "n" | "0")
}

/// One row of a roster or recruiting table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Player {
    pub first_name: String,
    pub last_name: String,
    pub position: String,
    /// Eligibility class: `HS`, `FR`, `SO`, `JR`, `SR`, optionally suffixed ` (RS)`.
    pub year: String,
    /// Current overall.
    pub rating: u32,
    /// Overall at time of evaluation; drives the dynasty value.
    pub base_rating: f64,
    pub dev_trait: String,
    pub archetype: String,
    /// Sitting out the current season. Turns into the `(RS)` year suffix at rollover.
    pub redshirt: bool,
    pub cut: bool,
    /// Draft marker; any non-empty text means the player left for the draft.
    pub drafted: Option<String>,
    pub transfer_out: bool,
    pub city: String,
    pub state: String,
    /// School a recruit committed to. Only meaningful in recruiting tables.
    pub committed_to: Option<String>,
    /// Raw cells as read, aligned with the source table's headers. Empty for
    /// players built in code.
    pub raw: Vec<String>,
}

impl Player {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Whether the player was marked as leaving the program this season.
    pub fn is_departing(&self) -> bool {
        self.cut || self.transfer_out || self.drafted.as_deref().is_some_and(is_draft_marker)
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} - {} ({})",
            self.first_name, self.last_name, self.position, self.year
        )
    }
}

/// Retention status for the coming season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Status {
    #[serde(rename = "GRADUATING")]
    Graduating,
    #[serde(rename = "SAFE")]
    Safe,
    #[serde(rename = "AT RISK")]
    AtRisk,
    #[serde(rename = "CUT")]
    Cut,
}

impl Status {
    pub fn label(&self) -> &'static str {
        match self {
            Status::Graduating => "GRADUATING",
            Status::Safe => "SAFE",
            Status::AtRisk => "AT RISK",
            Status::Cut => "CUT",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redshirt_marker_detection() {
        assert!(is_redshirt_year("JR (RS)"));
        assert!(is_redshirt_year("FR (RS)"));
        assert!(!is_redshirt_year("JR"));
        assert!(!is_redshirt_year("RS"));
        assert!(!is_redshirt_year(""));
    }

    #[test]
    fn senior_classes() {
        assert!(is_senior("SR"));
        assert!(is_senior("SR (RS)"));
        assert!(!is_senior("JR (RS)"));
        assert!(!is_senior("GRADUATED"));
    }

    #[test]
    fn position_order_puts_unknown_last() {
        assert_eq!(position_sort_order("QB"), 0);
        assert!(position_sort_order("ATH") > position_sort_order("P"));
        assert_eq!(position_sort_order("LOLB"), POSITION_ORDER.len());
    }

    #[test]
    fn departure_markers() {
        let mut p = Player::default();
        assert!(!p.is_departing());

        p.drafted = Some(String::new());
        assert!(!p.is_departing());

        p.drafted = Some("FALSE".into());
        assert!(!p.is_departing());

        p.drafted = Some("R1".into());
        assert!(p.is_departing());

        let transfer = Player {
            transfer_out: true,
            ..Player::default()
        };
        assert!(transfer.is_departing());
    }

    #[test]
    fn draft_marker_words() {
        for drafted in ["R1", "Round 3", "TRUE", "yes", "2026"] {
            assert!(is_draft_marker(drafted), "{drafted} should count as drafted");
        }
        for undrafted in ["", "  ", "FALSE", "False", "no", "N", "0"] {
            assert!(!is_draft_marker(undrafted), "{undrafted:?} should not count as drafted");
        }
    }

    #[test]
    fn display_matches_roster_listing() {
        let p = Player {
            first_name: "John".into(),
            last_name: "Smith".into(),
            position: "QB".into(),
            year: "FR".into(),
            ..Player::default()
        };
        assert_eq!(p.to_string(), "John Smith - QB (FR)");
        assert_eq!(p.full_name(), "John Smith");
    }

    #[test]
    fn status_labels() {
        assert_eq!(Status::AtRisk.to_string(), "AT RISK");
        assert_eq!(Status::Graduating.label(), "GRADUATING");
    }
}
