//! Requests from the Wi-Fi bridge
//!
//! Every write goes through the scheduler or the clock, exactly as a local
//! edit would. Clock writes need the time-edit unlock.

use core::convert::Infallible;

use heapless::Vec;
use pillbox_protocol::{
    BridgeMessage, ErrorCode, Reply, Request, WireDate, WireDose, WireLogEntry, WireStatus,
    WireTime, MAX_WIRE_DOSES, MAX_WIRE_LOGS,
};

use super::{Controller, Effect};
use crate::scheduler::{DoseId, DoseScheduler, ScheduleError};
use crate::state::Mode;
use crate::storage::LogEntry;
use crate::time::{Date, TimeOfDay};
use crate::traits::{Buzzer, Clock, Display};

impl From<TimeOfDay> for WireTime {
    fn from(time: TimeOfDay) -> Self {
        WireTime {
            hour: time.hour,
            minute: time.minute,
            pm: time.pm,
        }
    }
}

impl From<WireTime> for TimeOfDay {
    fn from(wire: WireTime) -> Self {
        TimeOfDay::new(wire.hour, wire.minute, wire.pm)
    }
}

impl From<Date> for WireDate {
    fn from(date: Date) -> Self {
        WireDate {
            day: date.day,
            month: date.month,
            year: date.year,
        }
    }
}

impl From<WireDate> for Date {
    fn from(wire: WireDate) -> Self {
        Date::new(wire.day, wire.month, wire.year)
    }
}

impl From<&LogEntry> for WireLogEntry {
    fn from(entry: &LogEntry) -> Self {
        WireLogEntry {
            timestamp: entry.timestamp,
            dose: entry.dose,
            on_time: entry.on_time,
        }
    }
}

impl From<ScheduleError> for ErrorCode {
    fn from(error: ScheduleError) -> Self {
        match error {
            ScheduleError::Full => ErrorCode::Full,
            ScheduleError::InvalidTime => ErrorCode::InvalidValue,
            ScheduleError::Conflict => ErrorCode::Conflict,
            ScheduleError::InvalidId => ErrorCode::NotFound,
        }
    }
}

impl<C: Clock, D: Display, B: Buzzer> Controller<C, D, B> {
    /// Handle one message from the bridge; requests get a reply
    pub fn handle_bridge(&mut self, message: BridgeMessage) -> Option<Reply> {
        match message {
            BridgeMessage::Request(request) => Some(self.handle_remote(request)),
            BridgeMessage::LinkUp(address) => {
                info!(
                    "Link up at {}.{}.{}.{}",
                    address[0], address[1], address[2], address[3]
                );
                self.link.address = Some(address);
                self.dirty = true;
                None
            }
            BridgeMessage::LinkDown => {
                info!("Link down");
                self.link.address = None;
                self.dirty = true;
                None
            }
        }
    }

    /// Execute a remote request
    pub fn handle_remote(&mut self, request: Request) -> Reply {
        debug!("Remote request {}", request);
        let result = match request {
            Request::GetStatus => Ok(Reply::Status(self.status())),
            Request::GetDoses => Ok(Reply::Doses(self.wire_doses())),
            Request::SetTime(time) => self.remote_set_time(time.into()),
            Request::SetDate(date) => self.remote_set_date(date.into()),
            Request::ReplaceDoses(times) => Ok(self.remote_replace_doses(&times)),
            Request::AddDose(time) => self
                .edit_schedule(|s| s.add(time.into()))
                .map(|_| Reply::Ack)
                .map_err(ErrorCode::from),
            Request::DeleteDose(id) => self
                .edit_schedule(|s| s.remove(id))
                .map(|_| Reply::Ack)
                .map_err(ErrorCode::from),
            Request::SetAlarm(enabled) => {
                self.settings.alarm_enabled = enabled;
                info!("Alarm enabled remotely: {}", enabled);
                self.apply_settings();
                self.effects.push(Effect::SaveSettings);
                Ok(Reply::Ack)
            }
            Request::UnlockTime(unlock) => {
                info!("Time editing unlocked: {}", unlock);
                self.link.time_unlocked = unlock;
                Ok(Reply::Ack)
            }
            Request::GetLogs => Ok(self.log_summary()),
        };

        result.unwrap_or_else(|code| {
            debug!("Remote request failed: {}", code);
            Reply::Error(code)
        })
    }

    /// Start or stop the bridge; stopping relocks time editing
    pub fn set_link(&mut self, enabled: bool) {
        info!("Link enabled: {}", enabled);
        self.link.enabled = enabled;
        if !enabled {
            self.link.address = None;
            self.link.time_unlocked = false;
        }
        self.effects.push(Effect::SetLink(enabled));
        self.dirty = true;
    }

    /// Snapshot for the status endpoint
    pub fn status(&self) -> WireStatus {
        WireStatus {
            time: self.now.time.into(),
            date: self.now.date.into(),
            dose_count: self.scheduler.len() as u8,
            doses_taken: self.scheduler.taken_count() as u8,
            minutes_to_next: self.scheduler.minutes_until_next(&self.now.time),
            alarm_enabled: self.settings.alarm_enabled,
            alarm_active: self.alarm.is_active(),
            snoozed: self.alarm.is_snoozed(),
            time_edit_unlocked: self.link.time_unlocked,
            lid_sensor: self.lid.sensor_working(),
        }
    }

    fn wire_doses(&self) -> Vec<WireDose, MAX_WIRE_DOSES> {
        self.scheduler
            .doses()
            .iter()
            .enumerate()
            .take(MAX_WIRE_DOSES)
            .map(|(id, dose)| WireDose {
                id: id as u8,
                time: dose.time.into(),
                enabled: dose.enabled,
                taken: dose.taken,
            })
            .collect()
    }

    fn log_summary(&self) -> Reply {
        Reply::Logs {
            total: self.log.total(),
            entries: self
                .log
                .latest(MAX_WIRE_LOGS)
                .take(MAX_WIRE_LOGS)
                .map(WireLogEntry::from)
                .collect(),
        }
    }

    fn remote_set_time(&mut self, time: TimeOfDay) -> Result<Reply, ErrorCode> {
        if !self.link.time_unlocked {
            return Err(ErrorCode::Locked);
        }
        if !time.is_valid() {
            return Err(ErrorCode::InvalidValue);
        }
        self.clock.set_time(time).map_err(|e| {
            warn!("Remote clock set failed: {}", e);
            ErrorCode::Internal
        })?;
        info!("Clock set remotely to {}", time);
        self.now.time = time;
        self.now.second = 0;
        self.dirty = true;
        Ok(Reply::Ack)
    }

    fn remote_set_date(&mut self, date: Date) -> Result<Reply, ErrorCode> {
        if !self.link.time_unlocked {
            return Err(ErrorCode::Locked);
        }
        if !date.is_valid() {
            return Err(ErrorCode::InvalidValue);
        }
        self.clock.set_date(date).map_err(|e| {
            warn!("Remote date set failed: {}", e);
            ErrorCode::Internal
        })?;
        info!("Date set remotely to {}", date);
        self.now.date = date;
        self.dirty = true;
        Ok(Reply::Ack)
    }

    /// Replace the whole schedule; entries the scheduler refuses are skipped
    fn remote_replace_doses(&mut self, times: &[WireTime]) -> Reply {
        let rejected = self
            .edit_schedule(|s| {
                s.clear();
                Ok::<_, Infallible>(times.iter().filter(|&&t| s.add(t.into()).is_err()).count())
            })
            .unwrap_or_else(|never| match never {});
        if rejected > 0 {
            warn!("{} doses skipped in replace", rejected);
        }
        Reply::Ack
    }

    /// Apply a schedule change that did not come from the menus
    ///
    /// Ids shift when the schedule changes, so a live alert is re-pointed at
    /// its dose by time (or ended if the dose is gone) and any dose list or
    /// dose editor on screen falls back to the dose menu. Successful changes
    /// are persisted.
    fn edit_schedule<T, E>(
        &mut self,
        change: impl FnOnce(&mut DoseScheduler) -> Result<T, E>,
    ) -> Result<T, E> {
        let alert_time = self
            .active_dose()
            .and_then(|id| self.scheduler.get(id))
            .map(|d| d.time);

        let result = change(&mut self.scheduler)?;

        if let Some(time) = alert_time {
            match self.scheduler.doses().iter().position(|d| d.time == time) {
                Some(id) => self.mode = Mode::Alert { dose: id as DoseId },
                None => {
                    info!("Alerting dose removed remotely");
                    self.end_alert();
                }
            }
        } else if matches!(self.mode, Mode::EditDose(_) | Mode::DeleteDose { .. }) {
            self.mode = self.mode.parent();
        }

        self.effects.push(Effect::SaveDoses);
        self.dirty = true;
        Ok(result)
    }
}
