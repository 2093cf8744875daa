//! Command UART receive task
//!
//! Forwards received bytes to the control task. Line assembly and parsing
//! happen in the control task, at the start of each tick.
//!
//! When the channel is full, bytes are dropped and a [`RxByte::Lost`] marker
//! is queued ahead of the next byte that fits, so the control task can throw
//! away the damaged line.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use crate::channels::{RxByte, RX_CHANNEL};

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Serial RX task - moves bytes from the UART into the RX channel
#[embassy_executor::task]
pub async fn serial_rx_task(mut rx: BufferedUartRx) {
    info!("Serial RX task started");

    let mut buf = [0u8; RX_BUF_SIZE];
    let mut lost = false;

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);

                for &byte in &buf[..n] {
                    if lost && RX_CHANNEL.try_send(RxByte::Lost).is_ok() {
                        lost = false;
                    }
                    if lost || RX_CHANNEL.try_send(RxByte::Data(byte)).is_err() {
                        if !lost {
                            warn!("RX channel full, dropping bytes");
                        }
                        lost = true;
                    }
                }
            }
            Ok(_) => {
                // No bytes read, continue
            }
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}
