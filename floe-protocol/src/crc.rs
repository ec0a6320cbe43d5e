//! CRC-CCITT (XMODEM variant)
//!
//! Polynomial 0x1021, initial value 0x0000, no reflection, no final XOR.

const POLY: u16 = 0x1021;

/// Incremental CRC-CCITT calculator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Crc16 {
    value: u16,
}

impl Crc16 {
    pub const fn new() -> Self {
        Self { value: 0 }
    }

    /// Feed one byte
    pub fn push(&mut self, byte: u8) {
        self.value ^= u16::from(byte) << 8;
        for _ in 0..8 {
            if self.value & 0x8000 != 0 {
                self.value = (self.value << 1) ^ POLY;
            } else {
                self.value <<= 1;
            }
        }
    }

    /// Feed a slice
    pub fn update(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.push(byte);
        }
    }

    pub fn finish(self) -> u16 {
        self.value
    }
}

/// CRC-CCITT of `data`
pub fn crc16_ccitt(data: &[u8]) -> u16 {
    let mut crc = Crc16::new();
    crc.update(data);
    crc.finish()
}
