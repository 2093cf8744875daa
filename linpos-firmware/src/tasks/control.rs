//! Control loop task
//!
//! Sole owner of the controller state. Every tick drains the received
//! command bytes, applies complete lines, then reads the potentiometer and
//! drives the actuator.

use defmt::*;
use embassy_rp::gpio::Output;
use embassy_rp::pwm::PwmOutput;
use embassy_time::{Duration, Ticker};

use linpos_core::ControlLoop;
use linpos_drivers::actuator::DirPwmActuator;
use linpos_drivers::sensor::Potentiometer;

use crate::io::{BlockingAdc, ChannelSink, ChannelSource};

/// The control loop with this board's collaborators
pub type FirmwareLoop = ControlLoop<
    ChannelSource,
    Potentiometer<BlockingAdc>,
    DirPwmActuator<Output<'static>, PwmOutput<'static>>,
    ChannelSink,
>;

/// Control task - runs the position loop at a fixed period
#[embassy_executor::task]
pub async fn control_task(mut control: FirmwareLoop, tick_interval_ms: u32) {
    info!("Control task started, tick every {} ms", tick_interval_ms);

    if let Err(e) = control.halt() {
        error!("Failed to stop actuator at startup: {:?}", e);
    }
    control.announce();

    let mut ticker = Ticker::every(Duration::from_millis(tick_interval_ms as u64));

    loop {
        ticker.next().await;

        match control.tick() {
            Ok(state) => {
                trace!(
                    "Tick: {:?}, target {}",
                    state,
                    control.controller().target()
                );
            }
            Err(e) => {
                error!("Actuator error: {:?}", e);
                if control.halt().is_err() {
                    error!("Actuator unresponsive");
                }
            }
        }
    }
}
