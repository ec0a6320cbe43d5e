//! Diagnostic UART receive task
//!
//! Parses PC requests, answers them from the latest engine snapshot and
//! collects freezing-table rows until a full replacement table is ready.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use floe_core::engine::{service, DiagError};
use floe_core::timing::TableAssembler;
use floe_protocol::{CommandError, Frame, FrameParser, Request};

use crate::channels::{DIAG_REPLY, DIAG_SNAPSHOT, TABLE_UPDATE};

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Diagnostic RX task - receives and answers PC frames
#[embassy_executor::task]
pub async fn diag_rx_task(mut rx: BufferedUartRx) {
    info!("Diagnostic RX task started");

    let mut parser = FrameParser::new();
    let mut assembler = TableAssembler::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);

                for &byte in &buf[..n] {
                    match parser.feed(byte) {
                        Ok(Some(frame)) => handle_frame(&frame, &mut assembler).await,
                        Ok(None) => {}
                        Err(e) => {
                            warn!("Frame parse error: {:?}", e);
                        }
                    }
                }
            }
            Ok(_) => {}
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}

/// Answer one parsed frame
async fn handle_frame(frame: &Frame, assembler: &mut TableAssembler) {
    let request = match Request::from_frame(frame) {
        Ok(request) => request,
        Err(CommandError::UnsupportedCommand(cmd)) => {
            debug!("Ignoring command 0x{:02x}", cmd);
            return;
        }
        Err(e) => {
            warn!("Bad request: {:?}", e);
            return;
        }
    };

    let serviced = {
        let snapshot = DIAG_SNAPSHOT.lock().await;
        service(&request, &snapshot, assembler)
    };

    match serviced {
        Ok(serviced) => {
            if let Some(table) = serviced.table {
                info!("Freezing table received");
                TABLE_UPDATE.signal(table);
            }
            DIAG_REPLY.send(serviced.reply).await;
        }
        Err(DiagError::Table(e)) => {
            warn!("Rejected table row: {:?}", e);
        }
        Err(e) => {
            warn!("Failed to build reply: {:?}", e);
        }
    }
}
