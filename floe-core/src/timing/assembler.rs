//! Row-by-row timing table replacement
//!
//! The diagnostic link delivers one room row per frame. Rows accumulate
//! in a private staging table; only when every row has arrived is the
//! finished table returned for publication, so the engine can never see a
//! half-written table.

use super::table::{TableError, TimingTable, TABLE_DIM};

const ALL_ROWS: u64 = (1 << TABLE_DIM) - 1;

/// Collects timing table rows until a full table is available
#[derive(Debug, Clone)]
pub struct TableAssembler {
    staging: TimingTable,
    received: u64,
}

impl Default for TableAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl TableAssembler {
    pub const fn new() -> Self {
        Self {
            staging: TimingTable::uniform(0),
            received: 0,
        }
    }

    /// Store one row
    ///
    /// Returns the completed table once the last missing row arrives; the
    /// assembler then starts over. Re-sending a row overwrites it.
    pub fn insert_row(
        &mut self,
        room: usize,
        secs: &[u16; TABLE_DIM],
    ) -> Result<Option<TimingTable>, TableError> {
        self.staging.set_row(room, secs)?;
        self.received |= 1 << room;

        if self.received == ALL_ROWS {
            let table = self.staging.clone();
            self.reset();
            return Ok(Some(table));
        }
        Ok(None)
    }

    /// Number of distinct rows collected so far
    pub fn rows_received(&self) -> u32 {
        self.received.count_ones()
    }

    /// Drop any partially collected table
    pub fn reset(&mut self) {
        self.received = 0;
    }
}
