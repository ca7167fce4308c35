//! Inter-task communication channels
//!
//! Defines the static channels used between the controller loop and the
//! bridge UART tasks. Uses embassy-sync primitives for safe async
//! communication.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use pillbox_protocol::{BridgeMessage, Reply};

/// Channel capacity for bridge messages waiting for the controller
const INBOX_SIZE: usize = 4;

/// Channel capacity for frames waiting for the UART
const OUTBOX_SIZE: usize = 4;

/// Requests and link notices from the bridge, with their sequence number
pub static LINK_INBOX: Channel<CriticalSectionRawMutex, (u8, BridgeMessage), INBOX_SIZE> =
    Channel::new();

/// Replies and link commands for the bridge, with their sequence number
pub static LINK_OUTBOX: Channel<CriticalSectionRawMutex, (u8, Reply), OUTBOX_SIZE> =
    Channel::new();
