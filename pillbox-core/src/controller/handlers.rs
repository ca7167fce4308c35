//! Button event handling per mode

use super::{Controller, Effect};
use crate::alarm::Chirp;
use crate::scheduler::{DoseId, ScheduleError};
use crate::state::{DoseMenuItem, EditDoseStage, Event, FieldEdit, MainItem, Mode};
use crate::time::{Date, TimeOfDay};
use crate::traits::{Buzzer, Clock, Display};
use crate::view::MessageKind;

/// Starting value for a new dose
const NEW_DOSE_TIME: TimeOfDay = TimeOfDay::MIDNIGHT;

fn schedule_error_text(error: ScheduleError) -> &'static str {
    match error {
        ScheduleError::Full => "Max doses reached",
        ScheduleError::InvalidTime => "Invalid time",
        ScheduleError::Conflict => "Time conflict!",
        ScheduleError::InvalidId => "Dose not found",
    }
}

/// Following list index, wrapping; 0 for an empty list
fn next_index(cursor: u8, len: usize) -> u8 {
    if len == 0 {
        0
    } else {
        ((cursor as usize + 1) % len) as u8
    }
}

impl<C: Clock, D: Display, B: Buzzer> Controller<C, D, B> {
    pub(super) fn handle_event(&mut self, event: Event, now_ms: u32) {
        let before = self.mode;
        self.message = None;
        self.dirty = true;

        match (self.mode, event) {
            // Shortcuts
            (Mode::Home, Event::OkLong) => self.toggle_link(),
            (Mode::Home | Mode::MainMenu { .. }, Event::NextLong) => self.toggle_mute(),

            // Editors pre-filled from the clock
            (
                Mode::MainMenu {
                    cursor: MainItem::SetTime,
                },
                Event::OkShort,
            ) => self.mode = Mode::EditTime(FieldEdit::new(self.now.time)),
            (
                Mode::MainMenu {
                    cursor: MainItem::SetDate,
                },
                Event::OkShort,
            ) => self.mode = Mode::EditDate(FieldEdit::new(self.now.date)),

            (Mode::DoseMenu { cursor }, Event::OkShort) => self.open_dose_entry(cursor, now_ms),

            // Dose lists
            (Mode::EditDose(EditDoseStage::Pick { cursor }), Event::OkShort) => {
                if let Some(dose) = self.scheduler.get(cursor) {
                    self.mode = Mode::EditDose(EditDoseStage::Fields {
                        id: cursor,
                        edit: FieldEdit::new(dose.time),
                    });
                }
            }
            (Mode::EditDose(EditDoseStage::Pick { cursor }), Event::NextShort) => {
                self.mode = Mode::EditDose(EditDoseStage::Pick {
                    cursor: next_index(cursor, self.scheduler.len()),
                });
            }
            (Mode::DeleteDose { cursor }, Event::OkShort) => self.delete_dose(cursor),
            (Mode::DeleteDose { cursor }, Event::NextShort) => {
                self.mode = Mode::DeleteDose {
                    cursor: next_index(cursor, self.scheduler.len()),
                };
            }

            // Commits past the last field
            (Mode::AddDose(edit), Event::OkShort) if edit.on_last_field() => {
                self.commit_new_dose(edit.value, now_ms)
            }
            (Mode::EditDose(EditDoseStage::Fields { id, edit }), Event::OkShort)
                if edit.on_last_field() =>
            {
                self.commit_dose_update(id, edit.value, now_ms)
            }
            (Mode::EditTime(edit), Event::OkShort) if edit.on_last_field() => {
                self.commit_time(edit.value, now_ms)
            }
            (Mode::EditDate(edit), Event::OkShort) if edit.on_last_field() => {
                self.commit_date(edit.value, now_ms)
            }

            // Toggles
            (Mode::AlarmToggle, Event::OkShort) => self.toggle_alarm(),
            (Mode::WifiToggle, Event::OkShort) => self.toggle_link(),

            // Alert
            (Mode::Alert { .. }, Event::BackShort) => self.snooze(now_ms),
            (Mode::Alert { dose }, Event::OkLong) => {
                info!("Dose {} dismissed without intake", dose);
                self.end_alert();
            }

            (mode, event) => self.mode = mode.transition(event),
        }

        if self.mode != before {
            debug!("Mode {} -> {}", before, self.mode);
        }
    }

    fn open_dose_entry(&mut self, item: DoseMenuItem, now_ms: u32) {
        match item {
            DoseMenuItem::Add if self.scheduler.is_full() => {
                self.reject("Max doses reached", now_ms)
            }
            DoseMenuItem::Add => self.mode = Mode::AddDose(FieldEdit::new(NEW_DOSE_TIME)),
            DoseMenuItem::Edit if self.scheduler.is_empty() => {
                self.reject("No doses to edit", now_ms)
            }
            DoseMenuItem::Edit => self.mode = Mode::EditDose(EditDoseStage::Pick { cursor: 0 }),
            DoseMenuItem::Delete if self.scheduler.is_empty() => {
                self.reject("No doses to delete", now_ms)
            }
            DoseMenuItem::Delete => self.mode = Mode::DeleteDose { cursor: 0 },
            DoseMenuItem::Back => self.mode = self.mode.parent(),
        }
    }

    fn commit_new_dose(&mut self, time: TimeOfDay, now_ms: u32) {
        match self.scheduler.add(time) {
            Ok(id) => {
                info!("Dose {} added at {}", id, time);
                self.effects.push(Effect::SaveDoses);
                self.chirp(Chirp::Confirm);
                self.mode = self.mode.parent();
            }
            Err(e) => self.reject(schedule_error_text(e), now_ms),
        }
    }

    fn commit_dose_update(&mut self, id: DoseId, time: TimeOfDay, now_ms: u32) {
        match self.scheduler.update(id, time) {
            Ok(new_id) => {
                info!("Dose {} moved to {} (now {})", id, time, new_id);
                self.effects.push(Effect::SaveDoses);
                self.chirp(Chirp::Confirm);
                self.mode = self.mode.parent();
            }
            Err(e) => self.reject(schedule_error_text(e), now_ms),
        }
    }

    fn delete_dose(&mut self, cursor: u8) {
        match self.scheduler.remove(cursor) {
            Ok(dose) => {
                info!("Dose {} at {} deleted", cursor, dose.time);
                self.effects.push(Effect::SaveDoses);
                self.chirp(Chirp::Confirm);
            }
            Err(e) => warn!("Delete of dose {} failed: {}", cursor, e),
        }

        let len = self.scheduler.len();
        if len == 0 {
            self.mode = self.mode.parent();
        } else if cursor as usize >= len {
            self.mode = Mode::DeleteDose {
                cursor: (len - 1) as u8,
            };
        }
    }

    fn commit_time(&mut self, time: TimeOfDay, now_ms: u32) {
        if !time.is_valid() {
            return self.reject("Invalid time", now_ms);
        }
        match self.clock.set_time(time) {
            Ok(()) => {
                info!("Clock set to {}", time);
                self.now.time = time;
                self.now.second = 0;
                self.chirp(Chirp::Confirm);
                self.mode = self.mode.parent();
            }
            Err(e) => {
                warn!("Clock set failed: {}", e);
                self.reject("Clock error", now_ms);
            }
        }
    }

    fn commit_date(&mut self, date: Date, now_ms: u32) {
        if !date.is_valid() {
            return self.reject("Invalid date", now_ms);
        }
        match self.clock.set_date(date) {
            Ok(()) => {
                info!("Date set to {}", date);
                self.now.date = date;
                self.chirp(Chirp::Confirm);
                self.mode = self.mode.parent();
            }
            Err(e) => {
                warn!("Date set failed: {}", e);
                self.reject("Clock error", now_ms);
            }
        }
    }

    fn toggle_alarm(&mut self) {
        self.settings.alarm_enabled = !self.settings.alarm_enabled;
        info!("Alarm enabled: {}", self.settings.alarm_enabled);
        self.apply_settings();
        self.effects.push(Effect::SaveSettings);
        self.chirp(Chirp::Confirm);
    }

    fn toggle_mute(&mut self) {
        self.settings.mute = !self.settings.mute;
        info!("Mute: {}", self.settings.mute);
        self.apply_settings();
        self.effects.push(Effect::SaveSettings);
        self.chirp(Chirp::Confirm);
    }

    fn toggle_link(&mut self) {
        self.set_link(!self.link.enabled);
        self.chirp(Chirp::Confirm);
    }

    fn snooze(&mut self, now_ms: u32) {
        if self.alarm.is_snoozed() {
            return;
        }
        if self.alarm.snooze(self.timing.snooze_secs, now_ms) {
            self.buzzer.set_output(false);
            self.chirp(Chirp::Confirm);
        }
    }

    /// Error chirp plus a transient message; the mode is left as it was
    fn reject(&mut self, text: &'static str, now_ms: u32) {
        debug!("Rejected: {}", text);
        self.chirp(Chirp::Error);
        self.show_message(MessageKind::Error, text, now_ms);
    }
}
