//! Board identifiers, command codes and request decoding
//!
//! Requests flow PC → main board. The main board answers polls with a
//! report frame of the same command code; the heartbeat is echoed empty.

use heapless::Vec;

use crate::frame::{Frame, FrameError, MAX_DATA_LEN};

// Board identifiers
pub const ID_PC: u8 = 0x01;
pub const ID_MAIN: u8 = 0x02;
pub const ID_FRONT: u8 = 0x03;

// Command codes
pub const CMD_HEARTBEAT: u8 = 0x0F;
pub const CMD_POLL_COMMON: u8 = 0xF0;
pub const CMD_POLL_COLD: u8 = 0xF1;
pub const CMD_POLL_HEATING: u8 = 0xF2;
pub const CMD_VALVE_CHANGE: u8 = 0xA0;
pub const CMD_DRAIN_PUMP_CHANGE: u8 = 0xA1;
pub const CMD_COOLING_SYSTEM_CHANGE: u8 = 0xB0;
pub const CMD_COOLING_RUN_CHANGE: u8 = 0xB1;
pub const CMD_FREEZING_RUN_CHANGE: u8 = 0xB2;
pub const CMD_FREEZING_TABLE_CHANGE: u8 = 0xB3;
pub const CMD_COOLING_TABLE_CHANGE: u8 = 0xB4;
pub const CMD_SENSOR_CHANGE: u8 = 0xC0;

/// Ambient columns per freezing-table row (and rows per table)
pub const FREEZING_TABLE_COLUMNS: usize = 46;

/// Length of a freezing-table row payload: room index + big-endian seconds
pub const FREEZING_ROW_LEN: usize = 1 + FREEZING_TABLE_COLUMNS * 2;

/// Errors decoding a request frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// Known to the protocol but not serviced by this board, or unknown
    UnsupportedCommand(u8),
    /// DATA length does not match the command
    InvalidLength,
    /// Freezing-table room index beyond the last row
    RowOutOfRange,
}

/// Requests serviced by the main board
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Request {
    /// Liveness check, answered with an empty echo
    Heartbeat,
    /// Common-system (temperatures and valves) poll
    PollCommon,
    /// Cold-system (refrigeration and ice making) poll
    PollCold,
    /// One room row of a replacement freezing table
    FreezingTableRow {
        room: u8,
        secs: [u16; FREEZING_TABLE_COLUMNS],
    },
}

impl Request {
    /// Decode a request from a received frame
    pub fn from_frame(frame: &Frame) -> Result<Self, CommandError> {
        match frame.cmd {
            CMD_HEARTBEAT => Ok(Request::Heartbeat),
            CMD_POLL_COMMON => Ok(Request::PollCommon),
            CMD_POLL_COLD => Ok(Request::PollCold),
            CMD_FREEZING_TABLE_CHANGE => {
                if frame.data.len() != FREEZING_ROW_LEN {
                    return Err(CommandError::InvalidLength);
                }
                let room = frame.data[0];
                if usize::from(room) >= FREEZING_TABLE_COLUMNS {
                    return Err(CommandError::RowOutOfRange);
                }
                let mut secs = [0u16; FREEZING_TABLE_COLUMNS];
                for (slot, pair) in secs.iter_mut().zip(frame.data[1..].chunks_exact(2)) {
                    *slot = u16::from_be_bytes([pair[0], pair[1]]);
                }
                Ok(Request::FreezingTableRow { room, secs })
            }
            other => Err(CommandError::UnsupportedCommand(other)),
        }
    }

    /// Encode this request as the PC would send it
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        match self {
            Request::Heartbeat => Ok(Frame::empty(ID_PC, CMD_HEARTBEAT)),
            Request::PollCommon => Ok(Frame::empty(ID_PC, CMD_POLL_COMMON)),
            Request::PollCold => Ok(Frame::empty(ID_PC, CMD_POLL_COLD)),
            Request::FreezingTableRow { room, secs } => {
                let mut data = Vec::<u8, MAX_DATA_LEN>::new();
                data.push(*room).map_err(|_| FrameError::PayloadTooLarge)?;
                for s in secs {
                    data.extend_from_slice(&s.to_be_bytes())
                        .map_err(|_| FrameError::PayloadTooLarge)?;
                }
                Frame::new(ID_PC, CMD_FREEZING_TABLE_CHANGE, &data)
            }
        }
    }
}

/// Empty heartbeat echo from the main board
pub fn heartbeat_reply() -> Frame {
    Frame::empty(ID_MAIN, CMD_HEARTBEAT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_frame(room: u8, secs: &[u16]) -> Frame {
        let mut data = std::vec![room];
        for s in secs {
            data.extend_from_slice(&s.to_be_bytes());
        }
        Frame::new(ID_PC, CMD_FREEZING_TABLE_CHANGE, &data).unwrap()
    }

    #[test]
    fn test_row_payload_fits_one_frame() {
        assert_eq!(FREEZING_ROW_LEN, 93);
        assert!(FREEZING_ROW_LEN <= MAX_DATA_LEN);
    }

    #[test]
    fn test_polls_decode() {
        let frame = Frame::empty(ID_PC, CMD_POLL_COLD);
        assert_eq!(Request::from_frame(&frame), Ok(Request::PollCold));
        let frame = Frame::empty(ID_PC, CMD_POLL_COMMON);
        assert_eq!(Request::from_frame(&frame), Ok(Request::PollCommon));
        let frame = Frame::empty(ID_PC, CMD_HEARTBEAT);
        assert_eq!(Request::from_frame(&frame), Ok(Request::Heartbeat));
    }

    #[test]
    fn test_freezing_row_decode() {
        let secs: std::vec::Vec<u16> = (0..46).map(|i| 600 + i * 4).collect();
        let req = Request::from_frame(&row_frame(7, &secs)).unwrap();
        match req {
            Request::FreezingTableRow { room, secs: decoded } => {
                assert_eq!(room, 7);
                assert_eq!(decoded[0], 600);
                assert_eq!(decoded[45], 780);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_freezing_row_wrong_length() {
        let frame = row_frame(0, &[600; 45]);
        assert_eq!(Request::from_frame(&frame), Err(CommandError::InvalidLength));
    }

    #[test]
    fn test_freezing_row_out_of_range() {
        let frame = row_frame(46, &[600; 46]);
        assert_eq!(Request::from_frame(&frame), Err(CommandError::RowOutOfRange));
    }

    #[test]
    fn test_unserviced_commands() {
        for cmd in [
            CMD_POLL_HEATING,
            CMD_VALVE_CHANGE,
            CMD_DRAIN_PUMP_CHANGE,
            CMD_COOLING_SYSTEM_CHANGE,
            CMD_COOLING_RUN_CHANGE,
            CMD_FREEZING_RUN_CHANGE,
            CMD_COOLING_TABLE_CHANGE,
            CMD_SENSOR_CHANGE,
        ] {
            let frame = Frame::empty(ID_PC, cmd);
            assert_eq!(
                Request::from_frame(&frame),
                Err(CommandError::UnsupportedCommand(cmd))
            );
        }
    }

    #[test]
    fn test_request_to_frame_roundtrip() {
        let mut secs = [0u16; FREEZING_TABLE_COLUMNS];
        secs[10] = 0xABCD;
        let original = Request::FreezingTableRow { room: 45, secs };
        let frame = original.to_frame().unwrap();
        assert_eq!(frame.data.len(), FREEZING_ROW_LEN);
        assert_eq!(Request::from_frame(&frame), Ok(original));
    }

    #[test]
    fn test_heartbeat_reply_is_empty() {
        let reply = heartbeat_reply();
        assert_eq!(reply.id, ID_MAIN);
        assert_eq!(reply.cmd, CMD_HEARTBEAT);
        assert!(reply.data.is_empty());
    }
}
