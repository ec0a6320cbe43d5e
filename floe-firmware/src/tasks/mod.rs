//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod compressor;
pub mod diag_rx;
pub mod diag_tx;
pub mod engine;
pub mod flow_meter;
pub mod gas_switch;
pub mod panel;
pub mod sensors;
pub mod tick;
pub mod tray;

pub use compressor::{compressor_task, CompressorPins};
pub use diag_rx::diag_rx_task;
pub use diag_tx::diag_tx_task;
pub use engine::{engine_task, EngineOutputs};
pub use flow_meter::flow_meter_task;
pub use gas_switch::gas_switch_task;
pub use panel::{panel_task, PanelInputs};
pub use sensors::{sensors_task, SensorChannels};
pub use tick::tick_task;
pub use tray::{tray_task, TrayPins};
