//! Append-only flat-file persistence for price snapshots.
//!
//! Writes one wide CSV row per cycle plus, for every token present, a
//! narrow CSV row and a JSON Lines record holding the raw upstream data.

pub mod csv_table;
pub mod error;
pub mod store;
pub mod writer;

pub use csv_table::CsvTable;
pub use error::{PersistenceError, PersistenceResult};
pub use store::{
    aggregate_row, token_full_info_path, token_prices_path, AggregateCsvWriter, CyclePersister,
    CycleWriteSummary, TokenStore, AGGREGATE_FILE, DATETIME_COLUMN,
};
pub use writer::{read_json_lines, FullInfoRecord, JsonLinesWriter};
