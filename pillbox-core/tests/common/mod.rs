//! Fake peripherals and a loop driver for controller tests

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use pillbox_core::alarm::Tone;
use pillbox_core::config::Timing;
use pillbox_core::controller::{Controller, Effect, Restored};
use pillbox_core::input::{ButtonId, RawInputs};
use pillbox_core::time::{Date, DateTime, TimeOfDay};
use pillbox_core::traits::{Buzzer, Clock, ClockError, Display, DisplayError};
use pillbox_core::view::View;

/// Loop period used by the driver (ms)
pub const STEP_MS: u32 = 10;

#[derive(Debug)]
pub struct ClockState {
    pub now: DateTime,
    pub fail: bool,
    pub lost_power: bool,
}

/// Shared clock state starting at `now`
pub fn clock_at(now: DateTime) -> Rc<RefCell<ClockState>> {
    Rc::new(RefCell::new(ClockState {
        now,
        fail: false,
        lost_power: false,
    }))
}

#[derive(Clone)]
pub struct FakeClock(pub Rc<RefCell<ClockState>>);

impl Clock for FakeClock {
    fn now(&mut self) -> Result<DateTime, ClockError> {
        let state = self.0.borrow();
        if state.fail {
            return Err(ClockError::NotFound);
        }
        Ok(state.now)
    }

    fn set_time(&mut self, time: TimeOfDay) -> Result<(), ClockError> {
        let mut state = self.0.borrow_mut();
        if state.fail {
            return Err(ClockError::Bus);
        }
        state.now.time = time;
        state.now.second = 0;
        Ok(())
    }

    fn set_date(&mut self, date: Date) -> Result<(), ClockError> {
        let mut state = self.0.borrow_mut();
        if state.fail {
            return Err(ClockError::Bus);
        }
        state.now.date = date;
        Ok(())
    }

    fn lost_power(&mut self) -> Result<bool, ClockError> {
        let state = self.0.borrow();
        if state.fail {
            return Err(ClockError::NotFound);
        }
        Ok(state.lost_power)
    }
}

#[derive(Default)]
pub struct FakeDisplay {
    pub powered: bool,
    pub last: Option<View>,
    pub renders: usize,
    pub fail_power: bool,
}

impl Display for FakeDisplay {
    fn render(&mut self, view: &View) -> Result<(), DisplayError> {
        self.last = Some(view.clone());
        self.renders += 1;
        Ok(())
    }

    fn set_power(&mut self, on: bool) -> Result<(), DisplayError> {
        if self.fail_power {
            return Err(DisplayError::InitFailed);
        }
        self.powered = on;
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeBuzzer {
    pub output: bool,
    pub played: Vec<Tone>,
    pub volume: u8,
}

impl Buzzer for FakeBuzzer {
    fn set_output(&mut self, on: bool) {
        self.output = on;
    }

    fn play(&mut self, tone: Tone, _volume: u8) {
        self.played.push(tone);
    }

    fn set_volume(&mut self, volume: u8) {
        self.volume = volume;
    }
}

pub type TestController = Controller<FakeClock, FakeDisplay, FakeBuzzer>;

/// Drives a controller through simulated time
pub struct Rig {
    pub ctl: TestController,
    pub clock: Rc<RefCell<ClockState>>,
    pub now_ms: u32,
    pub raw: RawInputs,
}

impl Rig {
    /// Booted at 12:00 PM on 1 Jan 2024 with no stored state
    pub fn new() -> Self {
        Self::boot(Restored::default(), DateTime::FALLBACK)
    }

    pub fn boot(restored: Restored, now: DateTime) -> Self {
        let mut rig = Self::unbooted(clock_at(now));
        rig.ctl
            .boot(restored, rig.now_ms)
            .expect("fake display never fails");
        rig.step();
        rig
    }

    pub fn unbooted(clock: Rc<RefCell<ClockState>>) -> Self {
        let ctl = Controller::new(
            FakeClock(clock.clone()),
            FakeDisplay::default(),
            FakeBuzzer::default(),
            Timing::default(),
        );
        Self {
            ctl,
            clock,
            now_ms: 1,
            raw: RawInputs::default(),
        }
    }

    pub fn step(&mut self) {
        self.ctl.step(self.now_ms, &self.raw);
    }

    /// Run the loop for `ms` of simulated time
    pub fn advance(&mut self, ms: u32) {
        let end = self.now_ms.wrapping_add(ms);
        while self.now_ms != end {
            self.now_ms = self.now_ms.wrapping_add(STEP_MS.min(end.wrapping_sub(self.now_ms)));
            self.step();
        }
    }

    fn set_button(&mut self, button: ButtonId, level: bool) {
        match button {
            ButtonId::Ok => self.raw.ok = level,
            ButtonId::Next => self.raw.next = level,
            ButtonId::Back => self.raw.back = level,
        }
    }

    pub fn press(&mut self, button: ButtonId) {
        self.set_button(button, true);
        self.advance(100);
        self.set_button(button, false);
        self.advance(100);
    }

    /// Press and release several buttons in the same iterations
    pub fn press_together(&mut self, buttons: &[ButtonId]) {
        for &button in buttons {
            self.set_button(button, true);
        }
        self.advance(100);
        for &button in buttons {
            self.set_button(button, false);
        }
        self.advance(100);
    }

    pub fn long_press(&mut self, button: ButtonId) {
        self.set_button(button, true);
        self.advance(3100);
        self.set_button(button, false);
        self.advance(100);
    }

    pub fn open_lid(&mut self) {
        self.raw.lid_open = true;
        self.advance(600);
    }

    pub fn close_lid(&mut self) {
        self.raw.lid_open = false;
        self.advance(600);
    }

    pub fn set_time(&mut self, time: TimeOfDay) {
        let mut state = self.clock.borrow_mut();
        state.now.time = time;
        state.now.second = 0;
    }

    pub fn set_date(&mut self, date: Date) {
        self.clock.borrow_mut().now.date = date;
    }

    /// Let at least one poll run
    pub fn poll(&mut self) {
        self.advance(1000);
    }

    pub fn drain_effects(&mut self) -> Vec<Effect> {
        std::iter::from_fn(|| self.ctl.take_effect()).collect()
    }

    pub fn add_doses(&mut self, times: &[TimeOfDay]) {
        for &time in times {
            self.ctl
                .handle_remote(pillbox_protocol::Request::AddDose(time.into()));
        }
        self.drain_effects();
    }
}

pub fn am(hour: u8, minute: u8) -> TimeOfDay {
    TimeOfDay::new(hour, minute, false)
}

pub fn pm(hour: u8, minute: u8) -> TimeOfDay {
    TimeOfDay::new(hour, minute, true)
}
