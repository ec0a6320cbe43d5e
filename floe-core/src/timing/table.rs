//! Ice-make timing table

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Rows (room temperature) and columns (ambient temperature) in the table
pub const TABLE_DIM: usize = 46;

/// Highest temperature with its own row/column; warmer readings clamp here
pub const MAX_INDEX: i16 = (TABLE_DIM - 1) as i16;

/// Timing table errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TableError {
    /// Row index beyond [`MAX_INDEX`]
    RowOutOfRange,
}

/// Ice size selected by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum IceSize {
    #[default]
    Large,
    /// Shorter freeze for thinner cubes
    Small,
}

/// Base freeze durations in seconds, indexed `[room][ambient]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimingTable {
    cells: [[u16; TABLE_DIM]; TABLE_DIM],
}

impl Default for TimingTable {
    fn default() -> Self {
        Self::factory()
    }
}

impl TimingTable {
    /// Factory table
    ///
    /// Warmer inlet water and warmer air both lengthen the freeze:
    /// 600 s at 0/0 rising to 1050 s at 45/45.
    pub const fn factory() -> Self {
        let mut cells = [[0u16; TABLE_DIM]; TABLE_DIM];
        let mut room = 0;
        while room < TABLE_DIM {
            let mut ambient = 0;
            while ambient < TABLE_DIM {
                cells[room][ambient] = (600 + room * 6 + ambient * 4) as u16;
                ambient += 1;
            }
            room += 1;
        }
        Self { cells }
    }

    /// Table with every cell set to `secs`
    pub const fn uniform(secs: u16) -> Self {
        Self {
            cells: [[secs; TABLE_DIM]; TABLE_DIM],
        }
    }

    /// Base freeze time in seconds, with both indices clamped to the table
    pub fn lookup_secs(&self, room: i16, ambient: i16) -> u16 {
        self.cells[clamp_index(room)][clamp_index(ambient)]
    }

    /// Freeze time in ticks of `tick_ms`, adjusted for ice size
    ///
    /// Small ice is scaled by `small_percent` (rounded toward zero).
    pub fn make_time_ticks(
        &self,
        room: i16,
        ambient: i16,
        size: IceSize,
        small_percent: u8,
        tick_ms: u32,
    ) -> u32 {
        let ticks = u32::from(self.lookup_secs(room, ambient)) * 1000 / tick_ms.max(1);
        match size {
            IceSize::Large => ticks,
            IceSize::Small => ticks * u32::from(small_percent) / 100,
        }
    }

    /// One room-temperature row
    pub fn row(&self, room: usize) -> Option<&[u16; TABLE_DIM]> {
        self.cells.get(room)
    }

    /// Replace one room-temperature row
    pub fn set_row(&mut self, room: usize, secs: &[u16; TABLE_DIM]) -> Result<(), TableError> {
        let row = self.cells.get_mut(room).ok_or(TableError::RowOutOfRange)?;
        *row = *secs;
        Ok(())
    }
}

fn clamp_index(temp: i16) -> usize {
    temp.clamp(0, MAX_INDEX) as usize
}
