//! Board glue for the core traits
//!
//! - [`ChannelSource`]: command characters from the RX channel
//! - [`ChannelSink`]: reports to the TX channel, mirrored to the defmt log
//! - [`BlockingAdc`]: potentiometer channel on the RP2040 ADC

use defmt::*;
use embassy_rp::adc::{Adc, Blocking, Channel};

use linpos_core::traits::{CharSource, ReportSink};
use linpos_core::Report;
use linpos_drivers::sensor::AdcReader;

use crate::channels::{RxByte, REPORT_CHANNEL, RX_CHANNEL};

/// Reads bytes queued by the serial RX task
pub struct ChannelSource {
    gap: bool,
}

impl ChannelSource {
    pub const fn new() -> Self {
        Self { gap: false }
    }
}

impl CharSource for ChannelSource {
    fn is_available(&mut self) -> bool {
        !RX_CHANNEL.is_empty()
    }

    fn read_char(&mut self) -> Option<char> {
        loop {
            match RX_CHANNEL.try_receive().ok()? {
                RxByte::Data(byte) => return Some(char::from(byte)),
                RxByte::Lost => self.gap = true,
            }
        }
    }

    fn take_gap(&mut self) -> bool {
        core::mem::take(&mut self.gap)
    }
}

/// Queues reports for the serial TX task
pub struct ChannelSink;

impl ReportSink for ChannelSink {
    fn can_accept(&self, count: usize) -> bool {
        REPORT_CHANNEL.free_capacity() >= count
    }

    fn report(&mut self, report: &Report) {
        match report {
            Report::StateChanged { state, measured } => {
                info!("Actuator {:?} at {}%", state, measured)
            }
            Report::SensorFault(e) => warn!("Position sensor fault: {:?}", e),
            Report::OutOfRange { requested, .. } => warn!("Target {} rejected", requested),
            Report::LineOverflow => warn!("Command line overflow"),
            other => debug!("Report: {:?}", other),
        }

        if REPORT_CHANNEL.try_send(report.clone()).is_err() {
            warn!("Report channel full, dropping report");
        }
    }
}

/// One ADC input read in blocking mode
pub struct BlockingAdc {
    adc: Adc<'static, Blocking>,
    channel: Channel<'static>,
}

impl BlockingAdc {
    pub fn new(adc: Adc<'static, Blocking>, channel: Channel<'static>) -> Self {
        Self { adc, channel }
    }
}

impl AdcReader for BlockingAdc {
    fn read(&mut self) -> Result<u16, ()> {
        self.adc.blocking_read(&mut self.channel).map_err(|e| {
            warn!("ADC read error: {:?}", e);
        })
    }
}
