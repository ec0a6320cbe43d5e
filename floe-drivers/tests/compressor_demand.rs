//! Engine driving the real compressor and bin-full drivers over whole cycles

use floe_core::ambient::AmbientReading;
use floe_core::config::TRAY_FILL_200CC_PULSES;
use floe_core::engine::{Engine, TickInputs};
use floe_core::refrigeration::GasSwitchStatus;
use floe_core::safety::Interlocks;
use floe_core::state::IceCycleState;
use floe_core::traits::Compressor;
use floe_core::tray::{TrayCommand, TrayLevel, TrayMotion, TraySense};
use floe_drivers::compressor::{BldcCompressor, BldcConfig};
use floe_drivers::sensor::{IrCheck, IrConfig};

const TICK_MS: u32 = 100;

struct Bench {
    engine: Engine,
    compressor: BldcCompressor,
    ir: IrCheck,
    inputs: TickInputs,
    demand_hz: u8,
    beam_blocked: bool,
    /// (state, compressor outputting) for every tick
    trace: Vec<(IceCycleState, bool)>,
}

impl Bench {
    fn new() -> Self {
        let mut ir = IrCheck::new(IrConfig::default());
        ir.request();
        Self {
            engine: Engine::new(),
            compressor: BldcCompressor::new(BldcConfig {
                off_delay_ms: 3_000,
                confirm_ms: 500,
                max_hz: 120,
            }),
            ir,
            inputs: TickInputs {
                interlocks: Interlocks {
                    make_enabled: true,
                    ..Default::default()
                },
                ambient: AmbientReading {
                    front_temp: 20,
                    side_temp: 20,
                    room_temp: 20,
                    ..Default::default()
                },
                tray: TraySense::new(TrayLevel::AtIceThrow, TrayMotion::Idle),
                gas: GasSwitchStatus::Ice,
                fill_pulses: TRAY_FILL_200CC_PULSES,
                ..Default::default()
            },
            demand_hz: 0,
            beam_blocked: false,
            trace: Vec::new(),
        }
    }

    fn tick(&mut self) -> IceCycleState {
        self.compressor.update_with_delta(TICK_MS);
        self.ir.update_with_delta(TICK_MS, self.beam_blocked);
        self.inputs.compressor = self.compressor.feedback();
        self.inputs.ir_full_pending = self.ir.pending();
        // A full bin holds off the next cycle without cutting one short
        let idle = self.engine.state() == IceCycleState::Standby;
        self.inputs.interlocks.make_enabled = !(idle && self.ir.bin_full());

        let out = self.engine.advance(&self.inputs);

        if let Some(route) = out.commands.gas {
            self.inputs.gas = route.into();
        }
        match out.commands.tray {
            Some(TrayCommand::Up) => {
                self.inputs.tray = TraySense::new(TrayLevel::AtIceMaking, TrayMotion::Idle)
            }
            Some(TrayCommand::Down) => {
                self.inputs.tray = TraySense::new(TrayLevel::AtIceThrow, TrayMotion::Idle)
            }
            None => {}
        }
        if out.compressor_demand != self.demand_hz {
            self.demand_hz = out.compressor_demand;
            self.compressor.set_target_hz(self.demand_hz);
        }
        if out.commands.ir_recheck {
            self.ir.request();
        }

        self.trace
            .push((out.state, self.compressor.feedback().outputting));
        out.state
    }

    /// Run until the next `Finish -> Standby`; returns the states visited
    fn run_cycle(&mut self) -> Vec<IceCycleState> {
        let start = self.trace.len();
        let mut last = self.engine.state();
        for _ in 0..100_000 {
            let state = self.tick();
            if last == IceCycleState::Finish && state == IceCycleState::Standby {
                let mut visited: Vec<IceCycleState> =
                    self.trace[start..].iter().map(|(s, _)| *s).collect();
                visited.dedup();
                return visited;
            }
            last = state;
        }
        panic!("cycle did not complete");
    }
}

#[test]
fn continuous_extraction_from_second_cycle() {
    let mut bench = Bench::new();

    let first = bench.run_cycle();
    assert!(!first.contains(&IceCycleState::ContGasMove));
    assert!(first.contains(&IceCycleState::CheckTrayFillReady));
    assert_eq!(bench.compressor.target_hz(), bench.engine.compressor_demand());

    for _ in 0..2 {
        let start = bench.trace.len();
        let next = bench.run_cycle();
        assert!(next.contains(&IceCycleState::ContGasMove));
        assert!(next.contains(&IceCycleState::ContRpsSet));

        // The compressor never stopped between cycles
        assert!(bench.trace[start..].iter().all(|(_, on)| *on));
        let fill_ticks = bench.trace[start..]
            .iter()
            .filter(|(s, _)| *s == IceCycleState::FillWater)
            .count();
        assert!(fill_ticks > 0);
    }
    assert_eq!(bench.engine.telemetry().cycles_completed, 3);
}

#[test]
fn full_bin_stops_compressor_after_cycle() {
    let mut bench = Bench::new();
    bench.run_cycle();
    assert!(bench.compressor.feedback().outputting);

    // Beam stays blocked through the next re-check
    bench.beam_blocked = true;
    bench.run_cycle();

    for _ in 0..50 {
        bench.tick();
    }
    assert!(bench.ir.bin_full());
    assert_eq!(bench.engine.state(), IceCycleState::Standby);
    assert_eq!(bench.engine.compressor_demand(), 0);
    assert!(!bench.compressor.feedback().outputting);
    assert_eq!(bench.compressor.command_hz(), 0);
}
