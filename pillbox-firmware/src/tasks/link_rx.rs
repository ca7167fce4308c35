//! Bridge UART receive task
//!
//! Receives frames from the Wi-Fi bridge and queues them for the
//! controller.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use pillbox_protocol::{BridgeMessage, ErrorCode, FrameParser, Reply};

use crate::channels::{LINK_INBOX, LINK_OUTBOX};

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Link RX task - receives and parses frames from the bridge
#[embassy_executor::task]
pub async fn link_rx_task(mut rx: BufferedUartRx) {
    info!("Link RX task started");

    let mut parser = FrameParser::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);

                for &byte in &buf[..n] {
                    match parser.feed(byte) {
                        Ok(Some(frame)) => match BridgeMessage::from_frame(&frame) {
                            Ok(message) => dispatch(frame.seq, message),
                            Err(e) => {
                                warn!("Failed to parse bridge message: {:?}", e);
                                reply_now(frame.seq, Reply::Error(ErrorCode::InvalidValue));
                            }
                        },
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

fn dispatch(seq: u8, message: BridgeMessage) {
    debug!("Bridge message {}: {:?}", seq, message);
    if LINK_INBOX.try_send((seq, message)).is_err() {
        warn!("Link inbox full, rejecting request {}", seq);
        reply_now(seq, Reply::Error(ErrorCode::Internal));
    }
}

/// Answer without involving the controller
fn reply_now(seq: u8, reply: Reply) {
    if LINK_OUTBOX.try_send((seq, reply)).is_err() {
        warn!("Link outbox full, dropping reply {}", seq);
    }
}
