// Configuration loading and parsing (dynasty.toml).

use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Built-in defaults, written to `config/dynasty.toml` on first run.
pub const DEFAULT_CONFIG: &str = include_str!("../defaults/dynasty.toml");

/// File name of the configuration file inside the `config/` directory.
pub const CONFIG_FILE: &str = "dynasty.toml";

/// Upper bound for an archetype's scheme-fit weight.
pub const MAX_ARCHETYPE_WEIGHT: f64 = 1.5;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled config
// ---------------------------------------------------------------------------

/// Everything an analysis pass needs besides the roster itself.
#[derive(Debug, Clone, Deserialize)]
pub struct DynastyConfig {
    pub valuation: ValuationTables,
    /// Position requirements in report order.
    pub positions: Vec<PositionRequirement>,
}

/// Lookup tables for the dynasty value formula.
#[derive(Debug, Clone, Deserialize)]
pub struct ValuationTables {
    /// Fractional discount applied to players whose year carries the `(RS)` marker.
    pub redshirt_discount: f64,
    pub dev_trait_multipliers: HashMap<String, f64>,
    /// Eligibility year (e.g. `"SO (RS)"`) to seasons of eligibility left.
    pub remaining_years: HashMap<String, u32>,
}

impl Default for ValuationTables {
    fn default() -> Self {
        let dev_trait_multipliers = [
            ("NORMAL", 1.00),
            ("IMPACT", 1.10),
            ("STAR", 1.25),
            ("ELITE", 1.50),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        let remaining_years = [("FR", 3), ("SO", 2), ("JR", 1), ("SR", 0)]
            .into_iter()
            .flat_map(|(year, left)| [(year.to_string(), left), (format!("{year} (RS)"), left)])
            .collect();

        ValuationTables {
            redshirt_discount: 0.05,
            dev_trait_multipliers,
            remaining_years,
        }
    }
}

impl ValuationTables {
    /// Multiplier for a development trait. Unknown or empty traits are neutral (1.0).
    pub fn dev_multiplier(&self, dev_trait: &str) -> f64 {
        self.dev_trait_multipliers
            .get(dev_trait)
            .copied()
            .unwrap_or(1.0)
    }

    /// Remaining eligibility for a year string. Unknown years (HS, GRADUATED, typos) give 0.
    pub fn remaining_years(&self, year: &str) -> u32 {
        self.remaining_years.get(year).copied().unwrap_or(0)
    }
}

/// Roster requirements and archetype weights for one position.
#[derive(Debug, Clone, Deserialize)]
pub struct PositionRequirement {
    pub name: String,
    pub min: usize,
    pub ideal: usize,
    /// Depth-chart starters, used to split starters from backups when grading.
    #[serde(default = "default_starters")]
    pub starters: usize,
    #[serde(default)]
    pub archetypes: HashMap<String, f64>,
}

fn default_starters() -> usize {
    1
}

impl PositionRequirement {
    /// Scheme-fit weight of an archetype at this position; 0.0 when the
    /// archetype is not part of the position's vocabulary.
    pub fn archetype_weight(&self, archetype: &str) -> f64 {
        self.archetypes.get(archetype).copied().unwrap_or(0.0)
    }
}

impl DynastyConfig {
    /// Parse the embedded default configuration.
    pub fn builtin() -> Result<Self, ConfigError> {
        parse_config(DEFAULT_CONFIG, Path::new("<builtin>/dynasty.toml"))
    }

    /// Requirement entry for a position, if the position is configured.
    pub fn requirement(&self, position: &str) -> Option<&PositionRequirement> {
        self.positions.iter().find(|p| p.name == position)
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Parse and validate configuration text. `path` is only used for error reporting.
pub fn parse_config(text: &str, path: &Path) -> Result<DynastyConfig, ConfigError> {
    let config: DynastyConfig = toml::from_str(text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    validate(&config)?;
    Ok(config)
}

/// Load and validate a configuration file at an explicit path.
pub fn load_config_file(path: &Path) -> Result<DynastyConfig, ConfigError> {
    let text = read_file(path)?;
    parse_config(&text, path)
}

/// Load and validate `config/dynasty.toml` relative to `base_dir`.
///
/// Does not write defaults; prefer `load_config()` which does.
pub fn load_config_from(base_dir: &Path) -> Result<DynastyConfig, ConfigError> {
    load_config_file(&base_dir.join("config").join(CONFIG_FILE))
}

/// Write the built-in defaults to `config/dynasty.toml` if that file does not
/// exist yet. Returns the path written, or `None` when a config was already there.
pub fn ensure_config_files(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let config_dir = base_dir.join("config");
    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let target = config_dir.join(CONFIG_FILE);
    match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&target)
    {
        Ok(mut dest) => {
            std::io::Write::write_all(&mut dest, DEFAULT_CONFIG.as_bytes()).map_err(|e| {
                ConfigError::DefaultsCopyError {
                    message: format!("failed to write {}: {e}", target.display()),
                }
            })?;
            Ok(Some(target))
        }
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(None),
        Err(e) => Err(ConfigError::DefaultsCopyError {
            message: format!("failed to create {}: {e}", target.display()),
        }),
    }
}

/// Convenience wrapper: loads config relative to the current working directory,
/// writing the defaults first if needed.
pub fn load_config() -> Result<DynastyConfig, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn invalid(field: impl Into<String>, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.into(),
        message: message.into(),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &DynastyConfig) -> Result<(), ConfigError> {
    let discount = config.valuation.redshirt_discount;
    if !(0.0..1.0).contains(&discount) {
        return Err(invalid(
            "valuation.redshirt_discount",
            format!("must be in [0.0, 1.0), got {discount}"),
        ));
    }

    for (dev_trait, multiplier) in &config.valuation.dev_trait_multipliers {
        if !(multiplier.is_finite() && *multiplier > 0.0) {
            return Err(invalid(
                format!("valuation.dev_trait_multipliers.{dev_trait}"),
                format!("must be > 0, got {multiplier}"),
            ));
        }
    }

    if config.positions.is_empty() {
        return Err(invalid("positions", "at least one position is required"));
    }

    let mut seen = HashSet::new();
    for pos in &config.positions {
        if pos.name.trim().is_empty() {
            return Err(invalid("positions.name", "must not be empty"));
        }
        if !seen.insert(pos.name.as_str()) {
            return Err(invalid(
                format!("positions.{}", pos.name),
                "duplicate position entry",
            ));
        }
        if pos.min > pos.ideal {
            return Err(invalid(
                format!("positions.{}.min", pos.name),
                format!("must be <= ideal ({}), got {}", pos.ideal, pos.min),
            ));
        }
        if pos.starters == 0 {
            return Err(invalid(
                format!("positions.{}.starters", pos.name),
                "must be > 0",
            ));
        }
        for (archetype, weight) in &pos.archetypes {
            if !(0.0..=MAX_ARCHETYPE_WEIGHT).contains(weight) {
                return Err(invalid(
                    format!("positions.{}.archetypes.{archetype}", pos.name),
                    format!("must be between 0.0 and {MAX_ARCHETYPE_WEIGHT}, got {weight}"),
                ));
            }
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn fresh_dir(name: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();
        tmp
    }

    #[test]
    fn builtin_config_has_canonical_positions_in_order() {
        let config = DynastyConfig::builtin().expect("builtin config should parse");
        let names: Vec<&str> = config.positions.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "QB", "HB", "FB", "WR", "TE", "LT", "LG", "C", "RG", "RT", "LEDG", "REDG", "DT",
                "WILL", "MIKE", "SAM", "CB", "FS", "SS", "K", "P"
            ]
        );

        let qb = config.requirement("QB").unwrap();
        assert_eq!(qb.min, 3);
        assert_eq!(qb.ideal, 4);
        assert!(approx_eq(qb.archetype_weight("POCKET PASSER"), 1.15));
        assert_eq!(config.requirement("WR").unwrap().starters, 3);
        assert_eq!(config.requirement("DT").unwrap().starters, 2);
    }

    #[test]
    fn builtin_valuation_matches_default_tables() {
        let config = DynastyConfig::builtin().unwrap();
        let defaults = ValuationTables::default();

        assert!(approx_eq(
            config.valuation.redshirt_discount,
            defaults.redshirt_discount
        ));
        assert_eq!(
            config.valuation.remaining_years,
            defaults.remaining_years
        );
        for (dev_trait, mult) in &defaults.dev_trait_multipliers {
            assert!(approx_eq(config.valuation.dev_multiplier(dev_trait), *mult));
        }
    }

    #[test]
    fn unknown_lookups_fall_back_to_neutral_values() {
        let tables = ValuationTables::default();
        assert!(approx_eq(tables.dev_multiplier("LEGENDARY"), 1.0));
        assert!(approx_eq(tables.dev_multiplier(""), 1.0));
        assert_eq!(tables.remaining_years("HS"), 0);
        assert_eq!(tables.remaining_years("GRADUATED"), 0);
        assert_eq!(tables.remaining_years("SO (RS)"), 2);

        let config = DynastyConfig::builtin().unwrap();
        assert!(config.requirement("ATH").is_none());
        assert!(approx_eq(
            config.requirement("QB").unwrap().archetype_weight("SPEEDSTER"),
            0.0
        ));
    }

    #[test]
    fn ensure_config_files_writes_defaults_once() {
        let tmp = fresh_dir("dynasty_config_ensure");

        let written = ensure_config_files(&tmp).expect("should write defaults");
        assert_eq!(written, Some(tmp.join("config").join(CONFIG_FILE)));

        let again = ensure_config_files(&tmp).expect("should succeed");
        assert!(again.is_none());

        let config = load_config_from(&tmp).expect("written defaults should load");
        assert_eq!(config.positions.len(), 21);

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_keeps_existing_file() {
        let tmp = fresh_dir("dynasty_config_keep");
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::write(tmp.join("config").join(CONFIG_FILE), "# custom\n").unwrap();

        assert!(ensure_config_files(&tmp).unwrap().is_none());
        let content = fs::read_to_string(tmp.join("config").join(CONFIG_FILE)).unwrap();
        assert_eq!(content, "# custom\n");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn file_not_found_for_missing_config() {
        let tmp = fresh_dir("dynasty_config_missing");

        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::FileNotFound { path } => assert!(path.ends_with(CONFIG_FILE)),
            other => panic!("expected FileNotFound, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn parse_error_for_invalid_toml() {
        let err = parse_config("this is not valid [[[ toml", Path::new("bad.toml")).unwrap_err();
        match &err {
            ConfigError::ParseError { path, .. } => assert!(path.ends_with("bad.toml")),
            other => panic!("expected ParseError, got: {other}"),
        }
    }

    fn expect_validation_field(text: &str, expected: &str) {
        let err = parse_config(text, Path::new("test.toml")).unwrap_err();
        match &err {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, expected),
            other => panic!("expected ValidationError, got: {other}"),
        }
    }

    #[test]
    fn rejects_redshirt_discount_out_of_range() {
        let modified = DEFAULT_CONFIG.replace("redshirt_discount = 0.05", "redshirt_discount = 1.5");
        expect_validation_field(&modified, "valuation.redshirt_discount");
    }

    #[test]
    fn rejects_non_positive_multiplier() {
        let modified = DEFAULT_CONFIG.replace("STAR   = 1.25", "STAR   = 0.0");
        expect_validation_field(&modified, "valuation.dev_trait_multipliers.STAR");
    }

    #[test]
    fn rejects_archetype_weight_above_cap() {
        let modified = DEFAULT_CONFIG.replace("\"POCKET PASSER\" = 1.15", "\"POCKET PASSER\" = 2.0");
        expect_validation_field(&modified, "positions.QB.archetypes.POCKET PASSER");
    }

    #[test]
    fn rejects_min_above_ideal() {
        let text = r#"
[valuation]
redshirt_discount = 0.05
dev_trait_multipliers = { NORMAL = 1.0 }
remaining_years = { FR = 3 }

[[positions]]
name = "QB"
min = 5
ideal = 4
"#;
        expect_validation_field(text, "positions.QB.min");
    }

    #[test]
    fn rejects_duplicate_positions() {
        let text = r#"
[valuation]
redshirt_discount = 0.05
dev_trait_multipliers = { NORMAL = 1.0 }
remaining_years = { FR = 3 }

[[positions]]
name = "QB"
min = 1
ideal = 2

[[positions]]
name = "QB"
min = 1
ideal = 2
"#;
        expect_validation_field(text, "positions.QB");
    }

    #[test]
    fn starters_default_to_one_when_omitted() {
        let text = r#"
[valuation]
redshirt_discount = 0.0
dev_trait_multipliers = {}
remaining_years = {}

[[positions]]
name = "K"
min = 1
ideal = 1
"#;
        let config = parse_config(text, Path::new("test.toml")).unwrap();
        assert_eq!(config.positions[0].starters, 1);
        assert!(config.positions[0].archetypes.is_empty());
    }
}
