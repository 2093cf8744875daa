//! Inter-task communication channels
//!
//! The UART receive task only moves bytes into [`RX_CHANNEL`]; the control
//! task owns all controller state and drains that channel once per tick.
//! Reports travel the other way through [`REPORT_CHANNEL`].

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use linpos_core::Report;

/// Received bytes buffered between ticks
const RX_CHANNEL_SIZE: usize = 256;

/// Reports waiting to be written out
const REPORT_CHANNEL_SIZE: usize = 32;

/// Item in the RX channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum RxByte {
    /// Received byte
    Data(u8),
    /// Bytes were dropped before the next `Data`
    Lost,
}

/// Bytes from the command UART
pub static RX_CHANNEL: Channel<CriticalSectionRawMutex, RxByte, RX_CHANNEL_SIZE> = Channel::new();

/// Status reports for the serial TX task
pub static REPORT_CHANNEL: Channel<CriticalSectionRawMutex, Report, REPORT_CHANNEL_SIZE> =
    Channel::new();
