//! Main controller task
//!
//! Runs the cooperative loop: sample the panel, step the controller,
//! answer bridge requests, then persist whatever changed.

use defmt::*;
use embassy_time::{Duration, Instant, Ticker};

use pillbox_protocol::Reply;

use crate::board::{BoardController, BoardInputs};
use crate::channels::{LINK_INBOX, LINK_OUTBOX};
use crate::storage::FlashStore;
use pillbox_core::controller::Effect;

/// Loop period in milliseconds
pub const LOOP_INTERVAL_MS: u64 = 10;

/// Controller task - the only owner of application state
#[embassy_executor::task]
pub async fn controller_task(
    mut controller: BoardController,
    mut inputs: BoardInputs,
    mut store: FlashStore<'static>,
) {
    info!("Controller task started");

    let mut ticker = Ticker::every(Duration::from_millis(LOOP_INTERVAL_MS));
    // Sequence numbers for frames the controller starts
    let mut link_seq: u8 = 0;

    loop {
        let now_ms = Instant::now().as_millis() as u32;
        let raw = inputs.read();
        controller.step(now_ms, &raw);

        while let Ok((seq, message)) = LINK_INBOX.try_receive() {
            if let Some(reply) = controller.handle_bridge(message) {
                send(seq, reply);
            }
        }

        while let Some(effect) = controller.take_effect() {
            match store.apply(effect, &controller).await {
                Ok(true) => {}
                Ok(false) => {
                    if let Effect::SetLink(enabled) = effect {
                        link_seq = link_seq.wrapping_add(1);
                        send(link_seq, Reply::LinkEnable(enabled));
                    }
                }
                Err(e) => warn!("Failed to persist {}: {}", effect, e),
            }
        }

        ticker.next().await;
    }
}

fn send(seq: u8, reply: Reply) {
    if LINK_OUTBOX.try_send((seq, reply)).is_err() {
        warn!("Link outbox full, dropping frame {}", seq);
    }
}
