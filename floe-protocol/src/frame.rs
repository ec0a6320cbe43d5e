//! Frame encoding and decoding for the diagnostic protocol.
//!
//! Frame format:
//! - STX (1 byte): 0x02
//! - ID (1 byte): sender/target board identifier
//! - CMD (1 byte): command code
//! - LEN (1 byte): data length (0-128)
//! - DATA (0-128 bytes): command-specific data
//! - CRC_H, CRC_L (2 bytes): CRC-CCITT over STX..DATA, big-endian
//! - ETX (1 byte): 0x03

use heapless::Vec;

use crate::crc::Crc16;

/// Frame start byte
pub const FRAME_START: u8 = 0x02;

/// Frame end byte
pub const FRAME_END: u8 = 0x03;

/// Maximum data length in bytes
pub const MAX_DATA_LEN: usize = 128;

/// Header bytes before DATA (STX + ID + CMD + LEN)
const HEADER_LEN: usize = 4;

/// Trailer bytes after DATA (CRC_H + CRC_L + ETX)
const TRAILER_LEN: usize = 3;

/// Maximum complete frame size
pub const MAX_FRAME_SIZE: usize = HEADER_LEN + MAX_DATA_LEN + TRAILER_LEN;

/// Errors that can occur during frame parsing or encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Data exceeds maximum allowed size
    PayloadTooLarge,
    /// CRC mismatch
    InvalidCrc,
    /// Byte after the CRC was not ETX
    MissingEtx,
    /// Invalid frame structure
    InvalidFrame,
    /// Buffer too small for encoding
    BufferTooSmall,
}

/// A parsed or constructed frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Board identifier
    pub id: u8,
    /// Command code
    pub cmd: u8,
    /// Command data
    pub data: Vec<u8, MAX_DATA_LEN>,
}

impl Frame {
    /// Create a new frame with the given id, command and data
    pub fn new(id: u8, cmd: u8, data: &[u8]) -> Result<Self, FrameError> {
        let data = Vec::from_slice(data).map_err(|_| FrameError::PayloadTooLarge)?;
        Ok(Self { id, cmd, data })
    }

    /// Create a frame with no data
    pub fn empty(id: u8, cmd: u8) -> Self {
        Self {
            id,
            cmd,
            data: Vec::new(),
        }
    }

    fn crc(id: u8, cmd: u8, data: &[u8]) -> u16 {
        let mut crc = Crc16::new();
        crc.update(&[FRAME_START, id, cmd, data.len() as u8]);
        crc.update(data);
        crc.finish()
    }

    /// Total encoded length of this frame
    pub fn encoded_len(&self) -> usize {
        HEADER_LEN + self.data.len() + TRAILER_LEN
    }

    /// Encode this frame into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        let frame_len = self.encoded_len();
        if buffer.len() < frame_len {
            return Err(FrameError::BufferTooSmall);
        }

        let data_end = HEADER_LEN + self.data.len();
        let crc = Self::crc(self.id, self.cmd, &self.data).to_be_bytes();

        buffer[0] = FRAME_START;
        buffer[1] = self.id;
        buffer[2] = self.cmd;
        buffer[3] = self.data.len() as u8;
        buffer[HEADER_LEN..data_end].copy_from_slice(&self.data);
        buffer[data_end] = crc[0];
        buffer[data_end + 1] = crc[1];
        buffer[data_end + 2] = FRAME_END;

        Ok(frame_len)
    }

    /// Encode this frame into a heapless Vec
    pub fn encode_to_vec(&self) -> Result<Vec<u8, MAX_FRAME_SIZE>, FrameError> {
        let mut buffer = [0u8; MAX_FRAME_SIZE];
        let len = self.encode(&mut buffer)?;
        Vec::from_slice(&buffer[..len]).map_err(|_| FrameError::BufferTooSmall)
    }
}

/// State machine for parsing incoming frames
#[derive(Debug, Clone)]
pub struct FrameParser {
    state: ParseState,
    data: Vec<u8, MAX_DATA_LEN>,
    id: u8,
    cmd: u8,
    expected_len: u8,
    crc_high: u8,
    received_crc: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    WaitingForStart,
    WaitingForId,
    WaitingForCmd,
    WaitingForLength,
    ReadingData,
    WaitingForCrcHigh,
    WaitingForCrcLow,
    WaitingForEnd,
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameParser {
    /// Create a new frame parser
    pub fn new() -> Self {
        Self {
            state: ParseState::WaitingForStart,
            data: Vec::new(),
            id: 0,
            cmd: 0,
            expected_len: 0,
            crc_high: 0,
            received_crc: 0,
        }
    }

    /// Reset the parser state
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Feed a single byte to the parser
    ///
    /// Returns `Ok(Some(frame))` when a complete valid frame is parsed,
    /// `Ok(None)` when more bytes are needed, or `Err` on parse error.
    /// Any error resets the parser to hunt for the next STX.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Frame>, FrameError> {
        match self.state {
            ParseState::WaitingForStart => {
                if byte == FRAME_START {
                    self.state = ParseState::WaitingForId;
                }
                Ok(None)
            }
            ParseState::WaitingForId => {
                self.id = byte;
                self.state = ParseState::WaitingForCmd;
                Ok(None)
            }
            ParseState::WaitingForCmd => {
                self.cmd = byte;
                self.state = ParseState::WaitingForLength;
                Ok(None)
            }
            ParseState::WaitingForLength => {
                if usize::from(byte) > MAX_DATA_LEN {
                    self.reset();
                    return Err(FrameError::PayloadTooLarge);
                }
                self.expected_len = byte;
                self.data.clear();
                self.state = if byte == 0 {
                    ParseState::WaitingForCrcHigh
                } else {
                    ParseState::ReadingData
                };
                Ok(None)
            }
            ParseState::ReadingData => {
                if self.data.push(byte).is_err() {
                    self.reset();
                    return Err(FrameError::InvalidFrame);
                }
                if self.data.len() == usize::from(self.expected_len) {
                    self.state = ParseState::WaitingForCrcHigh;
                }
                Ok(None)
            }
            ParseState::WaitingForCrcHigh => {
                self.crc_high = byte;
                self.state = ParseState::WaitingForCrcLow;
                Ok(None)
            }
            ParseState::WaitingForCrcLow => {
                self.received_crc = u16::from_be_bytes([self.crc_high, byte]);
                self.state = ParseState::WaitingForEnd;
                Ok(None)
            }
            ParseState::WaitingForEnd => {
                if byte != FRAME_END {
                    self.reset();
                    return Err(FrameError::MissingEtx);
                }
                if self.received_crc != Frame::crc(self.id, self.cmd, &self.data) {
                    self.reset();
                    return Err(FrameError::InvalidCrc);
                }

                let frame = Frame {
                    id: self.id,
                    cmd: self.cmd,
                    data: self.data.clone(),
                };
                self.reset();
                Ok(Some(frame))
            }
        }
    }

    /// Feed multiple bytes to the parser
    ///
    /// Returns the first complete frame found, if any.
    /// Remaining bytes after a complete frame are not consumed.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Result<Option<Frame>, FrameError> {
        for &byte in bytes {
            if let Some(frame) = self.feed(byte)? {
                return Ok(Some(frame));
            }
        }
        Ok(None)
    }
}
