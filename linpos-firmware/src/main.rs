//! linpos - Linear Actuator Position Controller
//!
//! Firmware for an RP2040 driving a DC linear actuator with potentiometer
//! feedback. Targets arrive as G-code lines over a UART; a fixed-period
//! control loop moves the actuator until it sits within tolerance.
//!
//! Board wiring:
//! - UART0: TX GPIO0, RX GPIO1
//! - Actuator direction: GPIO2
//! - Actuator PWM: GPIO3 (PWM slice 1, channel B)
//! - Potentiometer wiper: GPIO26 (ADC0)

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{Adc, Channel, Config as AdcConfig};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output, Pull};
use embassy_rp::peripherals::UART0;
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use linpos_core::config::{parse_config, MachineConfig};
use linpos_core::{ControlLoop, PositionController};
use linpos_drivers::actuator::DirPwmActuator;
use linpos_drivers::sensor::Potentiometer;

use crate::io::{BlockingAdc, ChannelSink, ChannelSource};

/// Embedded configuration (compiled into firmware)
/// Edit machine.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../machine.toml");

/// Pins this board is wired to
const UART_TX_PIN: u8 = 0;
const UART_RX_PIN: u8 = 1;
const DIR_PIN: u8 = 2;
const PWM_PIN: u8 = 3;
const ADC_PIN: u8 = 26;

mod channels;
mod io;
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
    info!("linpos firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = load_config();
    check_wiring(&config);

    // Actuator output: direction pin + PWM, off until the first tick
    let dir = Output::new(p.PIN_2, Level::Low);

    let mut pwm_config = PwmConfig::default();
    pwm_config.top = config.actuator.pwm_top;
    pwm_config.compare_b = 0;
    let pwm = Pwm::new_output_b(p.PWM_SLICE1, p.PIN_3, pwm_config);
    let (_, pwm_b) = pwm.split();
    let Some(pwm_b) = pwm_b else {
        defmt::panic!("PWM channel B not configured");
    };

    let actuator = match DirPwmActuator::new(dir, pwm_b, config.actuator.dir_pin.inverted) {
        Ok(actuator) => actuator,
        Err(e) => defmt::panic!("Actuator init failed: {:?}", e),
    };
    info!(
        "Actuator initialized (pwm_top={}, speed={})",
        config.actuator.pwm_top, config.actuator.drive_speed
    );

    // Position feedback
    let adc = Adc::new_blocking(p.ADC, AdcConfig::default());
    let pot_channel = Channel::new_pin(p.PIN_26, Pull::None);
    let mut sensor = Potentiometer::new(
        BlockingAdc::new(adc, pot_channel),
        config.sensor.calibration.clone(),
    );
    if let Some((min, max)) = config.sensor.valid_range {
        sensor = sensor.with_valid_range(min, max);
    }
    info!(
        "Potentiometer initialized (raw {}..{})",
        config.sensor.calibration.raw_min(),
        config.sensor.calibration.raw_max()
    );

    // Command UART
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = config.serial.baudrate;

    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();
    info!("UART initialized at {} baud", config.serial.baudrate);

    let controller = match PositionController::new(config.controller) {
        Ok(controller) => controller,
        Err(e) => {
            // parse_config validated this already; only the fallback can get here
            error!("Invalid controller config: {:?}, using defaults", e);
            match PositionController::new(Default::default()) {
                Ok(controller) => controller,
                Err(e) => defmt::panic!("Default controller config invalid: {:?}", e),
            }
        }
    };
    info!(
        "Controller: target {}%, limits {}..{}%, tolerance {}%",
        controller.target(),
        controller.config().min_percent,
        controller.config().max_percent,
        controller.config().tolerance_percent
    );

    let control = ControlLoop::new(
        controller,
        config.actuator.drive_speed,
        ChannelSource::new(),
        sensor,
        actuator,
        ChannelSink,
    );

    spawner.spawn(tasks::serial_rx_task(rx)).unwrap();
    spawner.spawn(tasks::serial_tx_task(tx)).unwrap();
    spawner
        .spawn(tasks::control_task(control, config.tick_interval_ms))
        .unwrap();

    info!("All tasks spawned, firmware running");
}

/// Parse the embedded configuration
///
/// Falls back to built-in defaults if machine.toml cannot be parsed (build.rs
/// checks it, so this only happens if the two validators disagree).
fn load_config() -> MachineConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Parsed embedded configuration successfully");
            config
        }
        Err(e) => {
            error!("Failed to parse embedded config: {:?}", e);
            error!("Using default configuration");
            MachineConfig::default()
        }
    }
}

/// Warn about configured pins that differ from the board wiring
fn check_wiring(config: &MachineConfig) {
    let pins = [
        ("serial.tx_pin", config.serial.tx_pin, UART_TX_PIN),
        ("serial.rx_pin", config.serial.rx_pin, UART_RX_PIN),
        ("actuator.dir_pin", config.actuator.dir_pin.pin, DIR_PIN),
        ("actuator.pwm_pin", config.actuator.pwm_pin, PWM_PIN),
        ("sensor.adc_pin", config.sensor.adc_pin, ADC_PIN),
    ];

    for (name, configured, wired) in pins {
        if configured != wired {
            warn!(
                "{} is gpio{} but the board uses gpio{}; ignoring",
                name, configured, wired
            );
        }
    }
}
