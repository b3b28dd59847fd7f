//! Per-cycle persistence of price snapshots.
//!
//! Layout under the data directory:
//!
//! ```text
//! all_tokens_prices.csv            datetime,<id1>,<id2>,...
//! <id>/<id>_prices.csv             datetime,price
//! <id>/<id>_full_info.json         {"datetime": ..., "data": {...}} per line
//! ```

use crate::csv_table::CsvTable;
use crate::error::PersistenceResult;
use crate::writer::{FullInfoRecord, JsonLinesWriter};
use pricelog_core::{CycleTimestamp, PriceRecord, PriceSnapshot, TokenId, TokenList};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Aggregate table file name.
pub const AGGREGATE_FILE: &str = "all_tokens_prices.csv";

/// Timestamp column name shared by every table.
pub const DATETIME_COLUMN: &str = "datetime";

/// Per-token price table path.
pub fn token_prices_path(data_dir: &Path, token: &TokenId) -> PathBuf {
    data_dir.join(token.as_str()).join(format!("{token}_prices.csv"))
}

/// Per-token full-info log path.
pub fn token_full_info_path(data_dir: &Path, token: &TokenId) -> PathBuf {
    data_dir.join(token.as_str()).join(format!("{token}_full_info.json"))
}

/// Build one aggregate row: timestamp, then one cell per configured token.
///
/// Tokens missing from the snapshot, or present without a price, get an
/// empty cell.
pub fn aggregate_row(
    tokens: &TokenList,
    timestamp: &CycleTimestamp,
    snapshot: &PriceSnapshot,
) -> Vec<String> {
    let mut row = Vec::with_capacity(tokens.len() + 1);
    row.push(timestamp.to_iso_string());
    for token in tokens {
        row.push(
            snapshot
                .price_of(token)
                .map(|p| p.to_string())
                .unwrap_or_default(),
        );
    }
    row
}

/// Writer for the wide all-tokens table.
pub struct AggregateCsvWriter {
    data_dir: PathBuf,
    table: CsvTable,
    tokens: TokenList,
    header_checked: bool,
}

impl AggregateCsvWriter {
    pub fn new(data_dir: impl Into<PathBuf>, tokens: TokenList) -> Self {
        let data_dir = data_dir.into();
        let mut header = Vec::with_capacity(tokens.len() + 1);
        header.push(DATETIME_COLUMN.to_string());
        header.extend(tokens.iter().map(|t| t.to_string()));

        Self {
            table: CsvTable::new(data_dir.join(AGGREGATE_FILE), header),
            data_dir,
            tokens,
            header_checked: false,
        }
    }

    pub fn path(&self) -> &Path {
        self.table.path()
    }

    /// Warn once if the header on disk was written for a different token list.
    ///
    /// Rows keep following the configured order; the file is not migrated.
    fn check_existing_header(&mut self) -> PersistenceResult<()> {
        if self.header_checked {
            return Ok(());
        }
        self.header_checked = true;

        if let Some(existing) = self.table.existing_header()? {
            if existing.as_slice() != self.table.header() {
                warn!(
                    path = %self.table.path().display(),
                    existing = ?existing,
                    configured = ?self.table.header(),
                    "Aggregate header does not match configured tokens; appending in configured order"
                );
            }
        }
        Ok(())
    }

    /// Append one row for this cycle.
    pub fn append(
        &mut self,
        timestamp: &CycleTimestamp,
        snapshot: &PriceSnapshot,
    ) -> PersistenceResult<()> {
        fs::create_dir_all(&self.data_dir)?;
        self.check_existing_header()?;

        let row = aggregate_row(&self.tokens, timestamp, snapshot);
        if self.table.append(&row)? {
            info!(path = %self.table.path().display(), "Created aggregate price table");
        }
        Ok(())
    }
}

/// Writer for the per-token subdirectories.
pub struct TokenStore {
    data_dir: PathBuf,
}

impl TokenStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Append the price row and full-info line for one token.
    pub fn append(
        &self,
        token: &TokenId,
        timestamp: &CycleTimestamp,
        record: &PriceRecord,
    ) -> PersistenceResult<()> {
        let token_dir = self.data_dir.join(token.as_str());
        fs::create_dir_all(&token_dir)?;

        let ts = timestamp.to_iso_string();
        let price = record.price.map(|p| p.to_string()).unwrap_or_default();

        let table = CsvTable::new(
            token_prices_path(&self.data_dir, token),
            vec![DATETIME_COLUMN.to_string(), "price".to_string()],
        );
        if table.append([ts.as_str(), price.as_str()])? {
            debug!(token = %token, "Created token price table");
        }

        JsonLinesWriter::new(token_full_info_path(&self.data_dir, token)).append(
            &FullInfoRecord {
                datetime: ts,
                data: record.raw.clone(),
            },
        )?;

        Ok(())
    }
}

/// What one cycle wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleWriteSummary {
    /// Rows appended to the aggregate table (0 or 1).
    pub aggregate_rows: usize,
    /// Tokens that received a price row and a full-info line, in write order.
    pub tokens_written: Vec<TokenId>,
}

/// Runs both write paths for a cycle.
pub struct CyclePersister {
    tokens: TokenList,
    aggregate: AggregateCsvWriter,
    store: TokenStore,
}

impl CyclePersister {
    pub fn new(data_dir: impl Into<PathBuf>, tokens: TokenList) -> Self {
        let data_dir = data_dir.into();
        Self {
            aggregate: AggregateCsvWriter::new(&data_dir, tokens.clone()),
            store: TokenStore::new(&data_dir),
            tokens,
        }
    }

    /// Persist a snapshot under a single timestamp.
    ///
    /// An empty snapshot writes nothing. Per-token writes follow the
    /// configured token order.
    pub fn persist(
        &mut self,
        timestamp: &CycleTimestamp,
        snapshot: &PriceSnapshot,
    ) -> PersistenceResult<CycleWriteSummary> {
        let mut summary = CycleWriteSummary::default();
        if snapshot.is_empty() {
            return Ok(summary);
        }

        self.aggregate.append(timestamp, snapshot)?;
        summary.aggregate_rows = 1;

        for token in &self.tokens {
            if let Some(record) = snapshot.get(token) {
                self.store.append(token, timestamp, record)?;
                summary.tokens_written.push(token.clone());
            }
        }

        Ok(summary)
    }
}
