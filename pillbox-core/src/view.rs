//! What the screen shows
//!
//! The controller builds one [`View`] per refresh and hands it to the
//! [`Display`](crate::traits::Display).

use heapless::Vec;

use crate::config::MAX_DOSES;
use crate::scheduler::Dose;
use crate::state::{DoseMenuItem, MainItem};
use crate::time::{Date, TimeOfDay};

/// Purpose of a dose list screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ListPurpose {
    Edit,
    Delete,
}

/// Tone of a transient message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MessageKind {
    Info,
    Success,
    Error,
}

/// Everything the home screen needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HomeStatus {
    pub time: TimeOfDay,
    pub minutes_to_next: Option<u16>,
    pub taken: u8,
    pub enabled: u8,
    pub wifi: bool,
    pub mute: bool,
    pub alarm_enabled: bool,
    /// Lid switch has produced a reading
    pub lid_sensor: bool,
}

/// One screen
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum View {
    Home(HomeStatus),
    MainMenu {
        selected: MainItem,
    },
    DoseMenu {
        selected: DoseMenuItem,
    },
    DoseList {
        doses: Vec<Dose, MAX_DOSES>,
        selected: u8,
        purpose: ListPurpose,
    },
    DoseEdit {
        time: TimeOfDay,
        field: u8,
        is_new: bool,
    },
    TimeEdit {
        time: TimeOfDay,
        field: u8,
    },
    DateEdit {
        date: Date,
        field: u8,
    },
    AlarmToggle {
        enabled: bool,
    },
    WifiToggle {
        enabled: bool,
        address: Option<[u8; 4]>,
    },
    /// Dose due; `dose_number` is 1-based
    Alert {
        dose_number: u8,
        time: TimeOfDay,
    },
    Snoozed {
        remaining_secs: u16,
    },
    Message {
        kind: MessageKind,
        text: &'static str,
    },
}
