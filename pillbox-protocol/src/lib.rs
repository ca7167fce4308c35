//! Pillbox bridge protocol
//!
//! The controller has no network stack of its own. A Wi-Fi module serves
//! the configuration API and forwards each API call over UART as a request
//! frame; the controller answers with a reply frame carrying the same
//! sequence number.
//!
//! # Frame Format
//!
//! ```text
//! ┌───────┬────────┬─────┬──────┬─────────────┬──────────┐
//! │ START │ LENGTH │ SEQ │ TYPE │ PAYLOAD     │ CHECKSUM │
//! │ 1B    │ 1B     │ 1B  │ 1B   │ 0–240B      │ 1B       │
//! └───────┴────────┴─────┴──────┴─────────────┴──────────┘
//! ```

#![no_std]
#![deny(unsafe_code)]

pub mod frame;
pub mod messages;
pub mod wire;

pub use frame::{Frame, FrameError, FrameParser, FRAME_START, MAX_PAYLOAD_SIZE};
pub use messages::{BridgeMessage, ErrorCode, Reply, Request, MAX_WIRE_DOSES, MAX_WIRE_LOGS};
pub use wire::{WireDate, WireDose, WireLogEntry, WireStatus, WireTime};
