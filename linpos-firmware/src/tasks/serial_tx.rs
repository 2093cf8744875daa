//! Report UART transmit task
//!
//! Formats each report as one CRLF-terminated text line.

use core::fmt::Write as _;

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;
use heapless::String;

use linpos_core::Report;

use crate::channels::REPORT_CHANNEL;

/// Longest rendered report line, terminator included
const LINE_CAPACITY: usize = 160;

/// Serial TX task - writes reports to the UART
#[embassy_executor::task]
pub async fn serial_tx_task(mut tx: BufferedUartTx) {
    info!("Serial TX task started");

    loop {
        let report = REPORT_CHANNEL.receive().await;

        let line = match render(&report) {
            Some(line) => line,
            None => {
                warn!("Report too long to render: {:?}", report);
                continue;
            }
        };

        if let Err(e) = tx.write_all(line.as_bytes()).await {
            warn!("Failed to send report: {:?}", e);
        }
    }
}

/// Render a report followed by CRLF
fn render(report: &Report) -> Option<String<LINE_CAPACITY>> {
    let mut line = String::new();
    core::write!(line, "{}\r\n", report).ok()?;
    Some(line)
}
