//! Diagnostic UART Protocol
//!
//! This crate defines the framed byte protocol between the main control
//! board and a diagnostic PC (or the front panel). The PC polls system
//! telemetry and can replace the ice-making timing table at runtime.
//!
//! # Protocol Overview
//!
//! ```text
//! ┌─────┬────┬─────┬─────┬──────────┬───────┬───────┬─────┐
//! │ STX │ ID │ CMD │ LEN │ DATA     │ CRC_H │ CRC_L │ ETX │
//! │ 1B  │ 1B │ 1B  │ 1B  │ 0–128B   │ 1B    │ 1B    │ 1B  │
//! └─────┴────┴─────┴─────┴──────────┴───────┴───────┴─────┘
//! ```
//!
//! The CRC is CRC-CCITT (poly 0x1021, init 0x0000) over STX through the
//! last DATA byte.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod crc;
pub mod frame;
pub mod messages;
pub mod reports;

pub use crc::{crc16_ccitt, Crc16};
pub use frame::{
    Frame, FrameError, FrameParser, FRAME_END, FRAME_START, MAX_DATA_LEN, MAX_FRAME_SIZE,
};
pub use messages::{heartbeat_reply, CommandError, Request, FREEZING_TABLE_COLUMNS};
pub use reports::{ColdSystemReport, CommonSystemReport, NOS_ALL_CLOSED, STEP_INITIALIZING};
