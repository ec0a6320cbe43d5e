//! Diagnostic UART transmit task

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;

use floe_protocol::MAX_FRAME_SIZE;

use crate::channels::DIAG_REPLY;

/// Diagnostic TX task - writes queued reply frames
#[embassy_executor::task]
pub async fn diag_tx_task(mut tx: BufferedUartTx) {
    info!("Diagnostic TX task started");

    let mut buf = [0u8; MAX_FRAME_SIZE];

    loop {
        let frame = DIAG_REPLY.receive().await;
        match frame.encode(&mut buf) {
            Ok(len) => {
                if let Err(e) = tx.write_all(&buf[..len]).await {
                    warn!("Failed to send reply 0x{:02x}: {:?}", frame.cmd, e);
                } else {
                    trace!("Reply 0x{:02x} sent ({} bytes)", frame.cmd, len);
                }
            }
            Err(e) => {
                warn!("Failed to encode reply: {:?}", e);
            }
        }
    }
}
