// Roster and recruiting CSV loading, plus writers for every report table.
//
// Rows are read as raw byte records, decoded, and resolved column-by-column through
// `RowAccessor`, so an absent column or an empty cell always maps to a
// documented default instead of failing the whole table. The only hard
// failure is a table missing one of its required columns.

use std::collections::HashMap;
use std::fmt;
use std::io::{Read, Write};
use std::path::Path;

use csv::{ByteRecord, StringRecord};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::player::{is_draft_marker, Player};
use crate::analysis::AnnotatedPlayer;

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

pub const FIRST_NAME: &str = "FIRST NAME";
pub const LAST_NAME: &str = "LAST NAME";
pub const POSITION: &str = "POSITION";
pub const YEAR: &str = "YEAR";
pub const RATING: &str = "RATING";
pub const OVERALL: &str = "OVERALL";
pub const BASE_RATING: &str = "BASE RATING";
pub const BASE_OVERALL: &str = "BASE OVERALL";
pub const DEV_TRAIT: &str = "DEV TRAIT";
pub const ARCHETYPE: &str = "ARCHETYPE";
pub const REDSHIRT: &str = "REDSHIRT";
pub const CUT: &str = "CUT";
pub const DRAFTED: &str = "DRAFTED";
pub const TRANSFER_OUT: &str = "TRANSFER OUT";
pub const CITY: &str = "CITY";
pub const STATE: &str = "STATE";
pub const COMMITTED_TO: &str = "COMMITTED TO";
pub const VALUE: &str = "VALUE";
pub const STATUS: &str = "STATUS";
pub const SCHEME_FIT: &str = "SCHEME FIT";

/// Required roster columns. Each entry lists accepted spellings; the first
/// one is reported when none is present.
const ROSTER_REQUIRED: &[&[&str]] = &[
    &[POSITION],
    &[FIRST_NAME],
    &[LAST_NAME],
    &[YEAR],
    &[RATING, OVERALL],
    &[ARCHETYPE],
    &[DEV_TRAIT],
    &[CUT],
    &[REDSHIRT],
    &[DRAFTED],
    &[BASE_RATING, BASE_OVERALL],
];

const RECRUITS_REQUIRED: &[&[&str]] = &[
    &[FIRST_NAME],
    &[LAST_NAME],
    &[POSITION],
    &[COMMITTED_TO],
    &[YEAR],
];

/// Column layout of a generated next-season roster.
pub const NEXT_ROSTER_COLUMNS: &[&str] = &[
    REDSHIRT,
    FIRST_NAME,
    LAST_NAME,
    YEAR,
    POSITION,
    OVERALL,
    BASE_OVERALL,
    CITY,
    STATE,
    ARCHETYPE,
    DEV_TRAIT,
    CUT,
    TRANSFER_OUT,
    DRAFTED,
    VALUE,
    STATUS,
];

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Which kind of table is being read; decides the required columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Roster,
    Recruits,
}

impl TableKind {
    fn required(&self) -> &'static [&'static [&'static str]] {
        match self {
            TableKind::Roster => ROSTER_REQUIRED,
            TableKind::Recruits => RECRUITS_REQUIRED,
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableKind::Roster => f.write_str("roster"),
            TableKind::Recruits => f.write_str("recruits"),
        }
    }
}

/// A loaded table: the source headers (for pass-through output) and its players.
#[derive(Debug, Clone, Default)]
pub struct RosterTable {
    pub headers: Vec<String>,
    pub players: Vec<Player>,
}

#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("{table} table is missing required columns: {}", columns.join(", "))]
    MissingColumns {
        table: TableKind,
        columns: Vec<String>,
    },
}

// ---------------------------------------------------------------------------
// Row access
// ---------------------------------------------------------------------------

/// Column-name lookup over the header row. The first occurrence of a
/// duplicated header wins.
struct HeaderIndex {
    positions: HashMap<String, usize>,
}

impl HeaderIndex {
    fn new(headers: &[String]) -> Self {
        let mut positions = HashMap::new();
        for (i, h) in headers.iter().enumerate() {
            positions.entry(h.clone()).or_insert(i);
        }
        HeaderIndex { positions }
    }

    fn contains(&self, column: &str) -> bool {
        self.positions.contains_key(column)
    }

    fn row<'a>(&'a self, record: &'a StringRecord) -> RowAccessor<'a> {
        RowAccessor {
            index: self,
            record,
        }
    }
}

/// Optional-field accessor over one record. Every getter is total:
/// an absent column or empty cell yields the getter's documented default.
struct RowAccessor<'a> {
    index: &'a HeaderIndex,
    record: &'a StringRecord,
}

impl RowAccessor<'_> {
    /// Trimmed cell text; `""` when the column or cell is absent.
    fn text(&self, column: &str) -> &str {
        self.index
            .positions
            .get(column)
            .and_then(|&i| self.record.get(i))
            .map(str::trim)
            .unwrap_or("")
    }

    /// Cell text from the first of `columns` present in the header.
    fn text_any(&self, columns: &[&str]) -> &str {
        columns
            .iter()
            .find(|c| self.index.contains(c))
            .map(|c| self.text(c))
            .unwrap_or("")
    }

    fn upper(&self, column: &str) -> String {
        self.text(column).to_uppercase()
    }

    /// Non-negative number; 0.0 for empty or unparseable cells.
    fn number(&self, columns: &[&str]) -> f64 {
        let raw = self.text_any(columns);
        if raw.is_empty() {
            return 0.0;
        }
        match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => v.max(0.0),
            _ => {
                warn!(
                    "unparseable {} '{}' for {} {}, defaulting to 0",
                    columns[0],
                    raw,
                    self.text(FIRST_NAME),
                    self.text(LAST_NAME)
                );
                0.0
            }
        }
    }

    /// Boolean marker: `true`, `yes`, `y`, `1` or `x` (any case); false otherwise.
    fn flag(&self, column: &str) -> bool {
        parse_flag(self.text(column))
    }

    /// `None` when the cell is empty.
    fn optional(&self, column: &str) -> Option<String> {
        let raw = self.text(column);
        (!raw.is_empty()).then(|| raw.to_string())
    }

    fn to_player(&self) -> Player {
        Player {
            first_name: self.text(FIRST_NAME).to_string(),
            last_name: self.text(LAST_NAME).to_string(),
            position: self.upper(POSITION),
            year: self.upper(YEAR),
            rating: self.number(&[RATING, OVERALL]).round() as u32,
            base_rating: self.number(&[BASE_RATING, BASE_OVERALL]),
            dev_trait: self.upper(DEV_TRAIT),
            archetype: self.text(ARCHETYPE).to_string(),
            redshirt: self.flag(REDSHIRT),
            cut: self.flag(CUT),
            drafted: self.optional(DRAFTED).filter(|d| is_draft_marker(d)),
            transfer_out: self.flag(TRANSFER_OUT),
            city: self.text(CITY).to_string(),
            state: self.text(STATE).to_string(),
            committed_to: self.optional(COMMITTED_TO),
            raw: self.record.iter().map(str::to_string).collect(),
        }
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.to_ascii_lowercase().as_str(),
        "true" | "yes" | "y" | "1" | "x"
    )
}

/// Decode a raw record field by field. Invalid UTF-8 (Latin-1 exports, for
/// instance) is replaced rather than failing the row.
fn decode_record(record: &ByteRecord, origin: &str, row: usize) -> StringRecord {
    record
        .iter()
        .enumerate()
        .map(|(field, bytes)| match std::str::from_utf8(bytes) {
            Ok(text) => text.to_string(),
            Err(_) => {
                let text = String::from_utf8_lossy(bytes).into_owned();
                warn!(
                    "{} row {} field {}: invalid UTF-8, read as '{}'",
                    origin, row, field, text
                );
                text
            }
        })
        .collect()
}

/// Required column groups with no accepted spelling present, reported by
/// their primary name.
fn missing_columns(index: &HeaderIndex, required: &[&[&str]]) -> Vec<String> {
    required
        .iter()
        .filter(|names| !names.iter().any(|n| index.contains(n)))
        .map(|names| names[0].to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Reader-based loaders
// ---------------------------------------------------------------------------

/// Read a table of the given kind. `origin` names the source in errors and logs.
pub fn read_table<R: Read>(
    rdr: R,
    kind: TableKind,
    origin: &str,
) -> Result<RosterTable, RosterError> {
    let csv_err = |source| RosterError::Csv {
        path: origin.to_string(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(rdr);

    let headers: Vec<String> = decode_record(reader.byte_headers().map_err(csv_err)?, origin, 0)
        .iter()
        .map(str::to_string)
        .collect();
    let index = HeaderIndex::new(&headers);

    let missing = missing_columns(&index, kind.required());
    if !missing.is_empty() {
        warn!("{} table {} is missing columns: {:?}", kind, origin, missing);
        return Err(RosterError::MissingColumns {
            table: kind,
            columns: missing,
        });
    }

    let mut players = Vec::new();
    for (i, result) in reader.byte_records().enumerate() {
        let record = decode_record(&result.map_err(csv_err)?, origin, i + 1);
        players.push(index.row(&record).to_player());
    }

    info!("Loaded {} {} rows from {}", players.len(), kind, origin);
    debug!("{} columns: {:?}", origin, headers);
    Ok(RosterTable { headers, players })
}

/// Read a roster table from any reader.
pub fn read_roster<R: Read>(rdr: R, origin: &str) -> Result<RosterTable, RosterError> {
    read_table(rdr, TableKind::Roster, origin)
}

/// Read a recruiting table from any reader.
pub fn read_recruits<R: Read>(rdr: R, origin: &str) -> Result<RosterTable, RosterError> {
    read_table(rdr, TableKind::Recruits, origin)
}

// ---------------------------------------------------------------------------
// Public path-based loaders
// ---------------------------------------------------------------------------

fn open(path: &Path) -> Result<std::fs::File, RosterError> {
    std::fs::File::open(path).map_err(|e| RosterError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

/// Load a roster CSV file.
pub fn load_roster(path: &Path) -> Result<RosterTable, RosterError> {
    read_roster(open(path)?, &path.display().to_string())
}

/// Load a recruiting CSV file.
pub fn load_recruits(path: &Path) -> Result<RosterTable, RosterError> {
    read_recruits(open(path)?, &path.display().to_string())
}

// ---------------------------------------------------------------------------
// Writers
// ---------------------------------------------------------------------------

fn format_number(v: f64) -> String {
    format!("{v}")
}

fn format_flag(v: bool) -> String {
    let text = if v { "TRUE" } else { "FALSE" };
    text.to_string()
}

/// Render a typed field under its column name. Used for players with no raw
/// cells and for generated tables. Zero ratings render empty (unrated).
fn typed_cell(player: &Player, column: &str) -> String {
    match column {
        FIRST_NAME => player.first_name.clone(),
        LAST_NAME => player.last_name.clone(),
        POSITION => player.position.clone(),
        YEAR => player.year.clone(),
        RATING | OVERALL if player.rating > 0 => player.rating.to_string(),
        BASE_RATING | BASE_OVERALL if player.base_rating > 0.0 => format_number(player.base_rating),
        DEV_TRAIT => player.dev_trait.clone(),
        ARCHETYPE => player.archetype.clone(),
        REDSHIRT => format_flag(player.redshirt),
        CUT => format_flag(player.cut),
        TRANSFER_OUT => format_flag(player.transfer_out),
        DRAFTED => player.drafted.clone().unwrap_or_default(),
        CITY => player.city.clone(),
        STATE => player.state.clone(),
        COMMITTED_TO => player.committed_to.clone().unwrap_or_default(),
        _ => String::new(),
    }
}

/// Write the annotated roster: every source column passed through unchanged,
/// with `VALUE`, `STATUS` and `SCHEME FIT` replaced in place or appended.
pub fn write_annotated_roster<W: Write>(
    wtr: W,
    headers: &[String],
    players: &[AnnotatedPlayer],
) -> Result<(), csv::Error> {
    let mut out_headers = headers.to_vec();
    for column in [VALUE, STATUS, SCHEME_FIT] {
        if !out_headers.iter().any(|h| h == column) {
            out_headers.push(column.to_string());
        }
    }

    let mut writer = csv::Writer::from_writer(wtr);
    writer.write_record(&out_headers)?;
    for p in players {
        let row: Vec<String> = out_headers
            .iter()
            .enumerate()
            .map(|(i, column)| match column.as_str() {
                VALUE => format_number(p.value),
                STATUS => p.status.label().to_string(),
                SCHEME_FIT => p.scheme_fit.map(format_number).unwrap_or_default(),
                _ => p
                    .player
                    .raw
                    .get(i)
                    .cloned()
                    .unwrap_or_else(|| typed_cell(&p.player, column)),
            })
            .collect();
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write a next-season roster in the fixed `NEXT_ROSTER_COLUMNS` layout.
/// `VALUE` and `STATUS` are left blank for the next analysis pass.
pub fn write_next_roster<W: Write>(wtr: W, players: &[Player]) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(wtr);
    writer.write_record(NEXT_ROSTER_COLUMNS)?;
    for p in players {
        writer.write_record(NEXT_ROSTER_COLUMNS.iter().map(|c| typed_cell(p, c)))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write any serializable report rows (recruiting plan, scheme-fit summary)
/// with headers taken from the row type's field names.
pub fn write_rows<W: Write, T: Serialize>(wtr: W, rows: &[T]) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(wtr);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::player::Status;

    const HEADER: &str = "FIRST NAME,LAST NAME,POSITION,YEAR,RATING,BASE RATING,DEV TRAIT,ARCHETYPE,REDSHIRT,CUT,DRAFTED";

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn roster_csv_roundtrip_fields() {
        let csv_data = format!(
            "{HEADER}\n\
             Riley,Childers,TE,SO (RS),85,82,NORMAL,VERTICAL THREAT,FALSE,FALSE,\n\
             Chase,Thomas,wr,fr,80,82,star,SPEEDSTER,TRUE,,"
        );

        let table = read_roster(csv_data.as_bytes(), "test").unwrap();
        assert_eq!(table.players.len(), 2);
        assert_eq!(table.headers.len(), 11);

        let riley = &table.players[0];
        assert_eq!(riley.full_name(), "Riley Childers");
        assert_eq!(riley.year, "SO (RS)");
        assert_eq!(riley.rating, 85);
        assert!(approx_eq(riley.base_rating, 82.0));
        assert!(!riley.redshirt);
        assert!(riley.drafted.is_none());

        let chase = &table.players[1];
        assert_eq!(chase.position, "WR");
        assert_eq!(chase.year, "FR");
        assert_eq!(chase.dev_trait, "STAR");
        assert!(chase.redshirt);
        assert!(!chase.cut);
    }

    #[test]
    fn base_overall_alias_accepted() {
        let csv_data = "\
FIRST NAME,LAST NAME,POSITION,YEAR,OVERALL,BASE OVERALL,DEV TRAIT,ARCHETYPE,REDSHIRT,CUT,DRAFTED
Darian,Childers,LEDG,JR (RS),94,92,ELITE,SPEED RUSHER,FALSE,FALSE,";

        let table = read_roster(csv_data.as_bytes(), "test").unwrap();
        assert_eq!(table.players[0].rating, 94);
        assert!(approx_eq(table.players[0].base_rating, 92.0));
    }

    #[test]
    fn missing_columns_reported_together() {
        let csv_data = "FIRST NAME,LAST NAME,POSITION,YEAR\nA,B,QB,FR";

        let err = read_roster(csv_data.as_bytes(), "test").unwrap_err();
        match err {
            RosterError::MissingColumns { table, columns } => {
                assert_eq!(table, TableKind::Roster);
                assert_eq!(
                    columns,
                    vec![
                        "RATING",
                        "ARCHETYPE",
                        "DEV TRAIT",
                        "CUT",
                        "REDSHIRT",
                        "DRAFTED",
                        "BASE RATING"
                    ]
                );
            }
            other => panic!("expected MissingColumns, got: {other}"),
        }
    }

    #[test]
    fn missing_base_rating_reported_by_primary_name() {
        let csv_data = "\
FIRST NAME,LAST NAME,POSITION,YEAR,RATING,DEV TRAIT,ARCHETYPE,REDSHIRT,CUT,DRAFTED
A,B,QB,FR,80,NORMAL,,FALSE,FALSE,";

        let err = read_roster(csv_data.as_bytes(), "test").unwrap_err();
        assert!(err.to_string().contains("BASE RATING"));
        assert!(err.to_string().starts_with("roster table"));
    }

    #[test]
    fn empty_and_malformed_cells_default() {
        let csv_data = format!(
            "{HEADER}\n\
             Empty,Cells,QB,FR,,,,,,,\n\
             Bad,Numbers,QB,FR,abc,NaN,NORMAL,,no,0,\n\
             Short,Row,QB"
        );

        let table = read_roster(csv_data.as_bytes(), "test").unwrap();
        assert_eq!(table.players.len(), 3);
        for p in &table.players {
            assert!(approx_eq(p.base_rating, 0.0));
            assert!(!p.cut);
            assert!(!p.redshirt);
        }
        assert_eq!(table.players[0].rating, 0);
        assert_eq!(table.players[1].rating, 0);
        assert_eq!(table.players[2].year, "");
        assert_eq!(table.players[0].archetype, "");
    }

    #[test]
    fn recruits_require_commitment_column() {
        let csv_data = "FIRST NAME,LAST NAME,POSITION,YEAR\nA,B,QB,HS";
        let err = read_recruits(csv_data.as_bytes(), "test").unwrap_err();
        match err {
            RosterError::MissingColumns { table, columns } => {
                assert_eq!(table, TableKind::Recruits);
                assert_eq!(columns, vec!["COMMITTED TO"]);
            }
            other => panic!("expected MissingColumns, got: {other}"),
        }

        let csv_data = "FIRST NAME,LAST NAME,POSITION,YEAR,COMMITTED TO\nA,B,QB,HS,RICE";
        let table = read_recruits(csv_data.as_bytes(), "test").unwrap();
        assert_eq!(table.players[0].committed_to.as_deref(), Some("RICE"));
    }

    #[test]
    fn latin1_cells_do_not_fail_the_table() {
        let mut csv_data = format!("{HEADER}\n").into_bytes();
        csv_data.extend_from_slice(b"Jos\xe9,Ruiz,QB,FR,80,80,NORMAL,POCKET PASSER,FALSE,FALSE,\n");
        csv_data.extend_from_slice(b"Cole,Ward,QB,JR,90,92,ELITE,DUAL THREAT,FALSE,FALSE,\n");

        let table = read_roster(csv_data.as_slice(), "test").unwrap();
        assert_eq!(table.players.len(), 2);

        let jose = &table.players[0];
        assert_eq!(jose.first_name, "Jos\u{FFFD}");
        assert_eq!(jose.last_name, "Ruiz");
        assert_eq!(jose.rating, 80);
        assert_eq!(table.players[1].last_name, "Ward");
    }

    #[test]
    fn negative_drafted_words_are_not_drafted() {
        let csv_data = format!(
            "{HEADER}\n\
             Stay,Home,QB,JR,80,80,NORMAL,,FALSE,FALSE,FALSE\n\
             Also,Home,QB,JR,80,80,NORMAL,,FALSE,FALSE,no\n\
             Gone,Pro,QB,JR,80,80,NORMAL,,FALSE,FALSE,R2"
        );
        let table = read_roster(csv_data.as_bytes(), "test").unwrap();
        assert_eq!(table.players[0].drafted, None);
        assert_eq!(table.players[1].drafted, None);
        assert_eq!(table.players[2].drafted.as_deref(), Some("R2"));
        assert!(!table.players[0].is_departing());
        assert!(table.players[2].is_departing());
    }

    #[test]
    fn flag_spellings() {
        for truthy in ["TRUE", "True", "yes", "Y", "1", "x"] {
            assert!(parse_flag(truthy), "{truthy} should be true");
        }
        for falsy in ["FALSE", "", "no", "0", "maybe"] {
            assert!(!parse_flag(falsy), "{falsy} should be false");
        }
    }

    #[test]
    fn annotated_roster_keeps_source_columns() {
        let csv_data = "\
FIRST NAME,LAST NAME,POSITION,YEAR,RATING,BASE RATING,DEV TRAIT,ARCHETYPE,REDSHIRT,CUT,DRAFTED,VALUE,HOMETOWN
Riley,Childers,TE,SO (RS),85,82,NORMAL,VERTICAL THREAT,False,False,,999,Lubbock";
        let table = read_roster(csv_data.as_bytes(), "test").unwrap();
        let annotated = vec![AnnotatedPlayer {
            player: table.players[0].clone(),
            value: 116.85,
            status: Status::AtRisk,
            scheme_fit: Some(1.1),
        }];

        let mut out = Vec::new();
        write_annotated_roster(&mut out, &table.headers, &annotated).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "FIRST NAME,LAST NAME,POSITION,YEAR,RATING,BASE RATING,DEV TRAIT,ARCHETYPE,REDSHIRT,CUT,DRAFTED,VALUE,HOMETOWN,STATUS,SCHEME FIT"
        );
        assert_eq!(
            lines[1],
            "Riley,Childers,TE,SO (RS),85,82,NORMAL,VERTICAL THREAT,False,False,,116.85,Lubbock,AT RISK,1.1"
        );
    }

    #[test]
    fn next_roster_layout() {
        let player = Player {
            first_name: "Chase".into(),
            last_name: "Thomas".into(),
            position: "WR".into(),
            year: "SO".into(),
            archetype: "SPEEDSTER".into(),
            dev_trait: "STAR".into(),
            city: "Austin".into(),
            state: "TX".into(),
            ..Player::default()
        };

        let mut out = Vec::new();
        write_next_roster(&mut out, &[player]).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], NEXT_ROSTER_COLUMNS.join(","));
        assert_eq!(
            lines[1],
            "FALSE,Chase,Thomas,SO,WR,,,Austin,TX,SPEEDSTER,STAR,FALSE,FALSE,,,"
        );
    }
}
