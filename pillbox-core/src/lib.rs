//! Board-agnostic core logic for the pill box controller
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Debounced button and lid input channels
//! - Alarm pattern engine with snooze
//! - Dose scheduler (validation, spacing, next-dose lookup)
//! - Menu/alert state machine and the controller that drives it
//! - Persisted record formats and the intake log
//! - Hardware abstraction traits (clock, display, buzzer)

#![no_std]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod alarm;
pub mod config;
pub mod controller;
pub mod input;
pub mod scheduler;
pub mod state;
pub mod storage;
pub mod time;
pub mod traits;
pub mod view;
