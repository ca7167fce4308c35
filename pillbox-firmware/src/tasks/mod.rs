//! Embassy async tasks
//!
//! The controller loop owns all application state; the link tasks only
//! move frames between the UART and the channels.

pub mod controller;
pub mod link_rx;
pub mod link_tx;

pub use controller::controller_task;
pub use link_rx::link_rx_task;
pub use link_tx::link_tx_task;
