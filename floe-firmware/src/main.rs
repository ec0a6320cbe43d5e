//! Floe - Ice/Water Appliance Firmware
//!
//! Main firmware binary for RP2040-based ice maker control boards. The ice
//! engine runs on a fixed 100 ms tick; actuator, sensor and panel tasks run
//! at their own pace around it.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{Adc, Channel, Config as AdcConfig};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::UART0;
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

mod channels;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Floe firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Diagnostic link to the service PC
    let uart_config = UartConfig::default(); // 115200 baud default

    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();
    info!("UART initialized for diagnostic link");

    // Tray lift motor and end switches
    let tray_pins = tasks::TrayPins {
        up: Output::new(p.PIN_2, Level::Low),
        down: Output::new(p.PIN_3, Level::Low),
        making_switch: Input::new(p.PIN_4, Pull::Up),
        throw_switch: Input::new(p.PIN_5, Pull::Up),
    };

    // Gas switch stepper coils
    let coils = [
        Output::new(p.PIN_6, Level::Low),
        Output::new(p.PIN_7, Level::Low),
        Output::new(p.PIN_8, Level::Low),
        Output::new(p.PIN_9, Level::Low),
    ];

    // Compressor inverter, speed PWM at ~2 kHz
    let mut speed_config = PwmConfig::default();
    speed_config.top = 62_500;
    speed_config.compare_a = 0;
    let (speed, _) = Pwm::new_output_a(p.PWM_SLICE4, p.PIN_24, speed_config).split();
    let compressor_pins = tasks::CompressorPins {
        enable: Output::new(p.PIN_10, Level::Low),
        speed: speed.unwrap(),
        fault: Input::new(p.PIN_11, Pull::Up),
    };

    // Relays driven by the engine
    let engine_outputs = tasks::EngineOutputs {
        defrost_heater: Output::new(p.PIN_12, Level::Low),
        feeder_reverse: Output::new(p.PIN_13, Level::Low),
    };

    let flow_meter = Input::new(p.PIN_14, Pull::None);

    let panel = tasks::PanelInputs {
        make_switch: Input::new(p.PIN_15, Pull::Up),
        small_ice: Input::new(p.PIN_16, Pull::Up),
        preheat: Input::new(p.PIN_17, Pull::Up),
        ice_lever: Input::new(p.PIN_18, Pull::Up),
        water_lever: Input::new(p.PIN_19, Pull::Up),
        tank_cover: Input::new(p.PIN_20, Pull::Up),
        bin_full: Input::new(p.PIN_21, Pull::Up),
        abort_button: Input::new(p.PIN_22, Pull::Up),
    };
    info!("GPIO initialized");

    // Thermistors on ADC0-2
    let adc = Adc::new_blocking(p.ADC, AdcConfig::default());
    let sensor_channels = tasks::SensorChannels {
        front: Channel::new_pin(p.PIN_26, Pull::None),
        side: Channel::new_pin(p.PIN_27, Pull::None),
        room: Channel::new_pin(p.PIN_28, Pull::None),
    };
    info!("ADC initialized");

    // Spawn tasks
    spawner.spawn(tasks::tick_task()).unwrap();
    spawner.spawn(tasks::diag_rx_task(rx)).unwrap();
    spawner.spawn(tasks::diag_tx_task(tx)).unwrap();
    spawner.spawn(tasks::sensors_task(adc, sensor_channels)).unwrap();
    spawner.spawn(tasks::panel_task(panel)).unwrap();
    spawner.spawn(tasks::flow_meter_task(flow_meter)).unwrap();
    spawner.spawn(tasks::tray_task(tray_pins)).unwrap();
    spawner.spawn(tasks::gas_switch_task(coils)).unwrap();
    spawner.spawn(tasks::compressor_task(compressor_pins)).unwrap();
    spawner.spawn(tasks::engine_task(engine_outputs)).unwrap();

    info!("All tasks spawned, firmware running");

    // Main task has nothing else to do - all work happens in spawned tasks
    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
