//! Inter-task communication channels
//!
//! Commands flow from the engine task to the actuator tasks; sensed state
//! flows back as "latest value" signals that the engine task caches.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::mutex::Mutex;
use embassy_sync::signal::Signal;
use portable_atomic::AtomicU16;

use floe_core::ambient::AmbientReading;
use floe_core::engine::DiagSnapshot;
use floe_core::refrigeration::{CompressorFeedback, GasRoute, GasSwitchStatus};
use floe_core::timing::{IceSize, TimingTable};
use floe_core::traits::TrayMotorError;
use floe_core::tray::{TrayCommand, TraySense};
use floe_protocol::Frame;

/// Reply frames queued for the diagnostic UART
const REPLY_CHANNEL_SIZE: usize = 4;

/// Tray state published by the tray task
#[derive(Debug, Clone, Copy, Default, defmt::Format)]
pub struct TrayStatus {
    pub sense: TraySense,
    pub fault: Option<TrayMotorError>,
}

/// Compressor state published by the compressor task
#[derive(Debug, Clone, Copy, Default, defmt::Format)]
pub struct CompressorStatus {
    pub feedback: CompressorFeedback,
    /// Remaining restart delay (ticks)
    pub off_delay_ticks: u16,
    pub error_code: u8,
}

/// Operator panel and cabinet switches
#[derive(Debug, Clone, Copy, Default, defmt::Format)]
pub struct PanelState {
    pub make_enabled: bool,
    pub ice_size: IceSize,
    pub start_with_preheat: bool,
    pub ice_dispensing: bool,
    pub water_dispensing: bool,
    pub tank_cover_open: bool,
    /// IR beam across the bin is blocked right now
    pub ir_blocked: bool,
}

/// Completed replacement timing table from the diagnostic link
pub static TABLE_UPDATE: Signal<CriticalSectionRawMutex, TimingTable> = Signal::new();

/// Operator abort request
pub static ABORT_REQUEST: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Tray motor command (engine → tray task)
pub static TRAY_CMD: Signal<CriticalSectionRawMutex, TrayCommand> = Signal::new();

/// Gas-switch route request (engine → gas switch task)
pub static GAS_CMD: Signal<CriticalSectionRawMutex, GasRoute> = Signal::new();

/// Compressor target speed in Hz, zero to stop (engine → compressor task)
pub static COMPRESSOR_HZ: Signal<CriticalSectionRawMutex, u8> = Signal::new();

/// Latest tray state
pub static TRAY_STATUS: Signal<CriticalSectionRawMutex, TrayStatus> = Signal::new();

/// Latest gas-switch position
pub static GAS_STATUS: Signal<CriticalSectionRawMutex, GasSwitchStatus> = Signal::new();

/// Latest compressor state
pub static COMPRESSOR_STATUS: Signal<CriticalSectionRawMutex, CompressorStatus> = Signal::new();

/// Latest ambient and inlet water temperatures
pub static AMBIENT_READING: Signal<CriticalSectionRawMutex, AmbientReading> = Signal::new();

/// Latest panel state
pub static PANEL_STATE: Signal<CriticalSectionRawMutex, PanelState> = Signal::new();

/// Flow-meter pulses since the engine last drained the counter
pub static FILL_PULSES: AtomicU16 = AtomicU16::new(0);

/// Report payloads as of the last engine tick
pub static DIAG_SNAPSHOT: Mutex<CriticalSectionRawMutex, DiagSnapshot> =
    Mutex::new(DiagSnapshot::new());

/// Replies waiting for the diagnostic TX task
pub static DIAG_REPLY: Channel<CriticalSectionRawMutex, Frame, REPLY_CHANNEL_SIZE> =
    Channel::new();
