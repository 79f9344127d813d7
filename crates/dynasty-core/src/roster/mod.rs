// Roster data: the player record and CSV table I/O.

pub mod io;
pub mod player;

pub use io::{RosterError, RosterTable, TableKind};
pub use player::{Player, Status};
