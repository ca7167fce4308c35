//! Bridge UART transmit task
//!
//! Sends replies and link commands to the Wi-Fi bridge.

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;

use pillbox_protocol::frame::MAX_FRAME_SIZE;
use pillbox_protocol::{FrameError, Reply};

use crate::channels::LINK_OUTBOX;

/// Errors while sending to the bridge
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    /// Reply did not fit in a frame
    Frame(FrameError),
    /// UART write failed
    Uart,
}

impl From<FrameError> for LinkError {
    fn from(e: FrameError) -> Self {
        LinkError::Frame(e)
    }
}

/// Link TX task - sends queued frames to the bridge
#[embassy_executor::task]
pub async fn link_tx_task(mut tx: BufferedUartTx) {
    info!("Link TX task started");

    loop {
        let (seq, reply) = LINK_OUTBOX.receive().await;
        match send_reply(&mut tx, seq, &reply).await {
            Ok(()) => trace!("Reply {} sent", seq),
            Err(e) => warn!("Failed to send reply {}: {:?}", seq, e),
        }
    }
}

async fn send_reply(tx: &mut BufferedUartTx, seq: u8, reply: &Reply) -> Result<(), LinkError> {
    let frame = reply.to_frame(seq)?;
    let mut buf = [0u8; MAX_FRAME_SIZE];
    let len = frame.encode(&mut buf)?;
    tx.write_all(&buf[..len]).await.map_err(|_| LinkError::Uart)
}
