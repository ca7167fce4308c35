//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in pillbox-core for the pill box hardware:
//!
//! - Text screen layout for every view, drawn on an SSD1306 OLED
//! - DS3231 real-time clock
//! - PWM piezo buzzer
//! - Button and lid switch inputs

#![no_std]
#![deny(unsafe_code)]

pub mod buzzer;
pub mod inputs;
pub mod oled;
pub mod rtc;
pub mod screen;

pub use buzzer::{PwmBuzzer, ToneFrequency};
pub use inputs::PanelInputs;
pub use oled::OledDisplay;
pub use rtc::Ds3231;
pub use screen::{Renderer, Screen};
