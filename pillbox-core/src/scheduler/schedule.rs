//! Dose list with spacing rules

use heapless::Vec;

use super::{Dose, DoseId};
use crate::config::{MAX_DOSES, MIN_DOSE_SPACING_MIN};
use crate::time::TimeOfDay;

/// Reasons a schedule change is rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScheduleError {
    /// Already holding the maximum number of doses
    Full,
    /// Hour or minute out of range
    InvalidTime,
    /// Closer than the minimum spacing to another dose
    Conflict,
    /// No dose with that id
    InvalidId,
}

/// Sorted dose list
#[derive(Debug, Clone, Default)]
pub struct DoseScheduler {
    doses: Vec<Dose, MAX_DOSES>,
}

impl DoseScheduler {
    pub const fn new() -> Self {
        Self { doses: Vec::new() }
    }

    /// Add an enabled dose; returns its id after sorting
    pub fn add(&mut self, time: TimeOfDay) -> Result<DoseId, ScheduleError> {
        if self.doses.is_full() {
            warn!("Dose rejected: schedule full");
            return Err(ScheduleError::Full);
        }
        self.validate(&time, None)?;

        self.doses
            .push(Dose::new(time))
            .map_err(|_| ScheduleError::Full)?;
        self.sort();
        info!("Dose added, {} scheduled", self.doses.len());
        self.id_of(&time).ok_or(ScheduleError::InvalidId)
    }

    /// Move dose `id` to `time`; returns its new id after sorting
    ///
    /// Enabled and taken flags are kept.
    pub fn update(&mut self, id: DoseId, time: TimeOfDay) -> Result<DoseId, ScheduleError> {
        if id as usize >= self.doses.len() {
            return Err(ScheduleError::InvalidId);
        }
        self.validate(&time, Some(id))?;

        self.doses[id as usize].time = time;
        self.sort();
        info!("Dose {} updated", id);
        self.id_of(&time).ok_or(ScheduleError::InvalidId)
    }

    /// Remove dose `id`; later doses shift down
    pub fn remove(&mut self, id: DoseId) -> Result<Dose, ScheduleError> {
        if id as usize >= self.doses.len() {
            return Err(ScheduleError::InvalidId);
        }
        let dose = self.doses.remove(id as usize);
        info!("Dose {} removed, {} left", id, self.doses.len());
        Ok(dose)
    }

    pub fn set_enabled(&mut self, id: DoseId, enabled: bool) -> Result<(), ScheduleError> {
        let dose = self
            .doses
            .get_mut(id as usize)
            .ok_or(ScheduleError::InvalidId)?;
        dose.enabled = enabled;
        Ok(())
    }

    pub fn mark_taken(&mut self, id: DoseId) -> Result<(), ScheduleError> {
        let dose = self
            .doses
            .get_mut(id as usize)
            .ok_or(ScheduleError::InvalidId)?;
        dose.taken = true;
        info!("Dose {} marked taken", id);
        Ok(())
    }

    /// First pending dose due exactly at `now`
    pub fn check_dose_time(&self, now: &TimeOfDay) -> Option<DoseId> {
        self.doses
            .iter()
            .position(|d| d.is_pending() && d.time.minute_of_day() == now.minute_of_day())
            .map(|i| i as DoseId)
    }

    /// Pending dose with the smallest forward distance from `now`
    pub fn next_dose(&self, now: &TimeOfDay) -> Option<DoseId> {
        let mut best: Option<(DoseId, u16)> = None;
        for (i, dose) in self.doses.iter().enumerate() {
            if !dose.is_pending() {
                continue;
            }
            let distance = now.minutes_until(&dose.time);
            if distance == 0 {
                return Some(i as DoseId);
            }
            if best.map_or(true, |(_, d)| distance < d) {
                best = Some((i as DoseId, distance));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Minutes until the next pending dose
    pub fn minutes_until_next(&self, now: &TimeOfDay) -> Option<u16> {
        self.next_dose(now)
            .and_then(|id| self.get(id))
            .map(|dose| now.minutes_until(&dose.time))
    }

    /// Clear every taken flag
    pub fn reset_daily(&mut self) {
        for dose in self.doses.iter_mut() {
            dose.taken = false;
        }
        info!("Daily dose status reset");
    }

    pub fn clear(&mut self) {
        self.doses.clear();
        info!("All doses cleared");
    }

    /// Rebuild from stored `(time, enabled)` pairs
    ///
    /// Entries go through [`add`](Self::add) so stored data that breaks the
    /// rules is dropped. Returns the number of entries rejected.
    pub fn restore<I>(&mut self, entries: I) -> usize
    where
        I: IntoIterator<Item = (TimeOfDay, bool)>,
    {
        self.doses.clear();
        let mut rejected = 0;
        for (time, enabled) in entries {
            match self.add(time) {
                Ok(id) => {
                    let _ = self.set_enabled(id, enabled);
                }
                Err(_) => rejected += 1,
            }
        }
        rejected
    }

    pub fn get(&self, id: DoseId) -> Option<&Dose> {
        self.doses.get(id as usize)
    }

    /// All doses in id order
    pub fn doses(&self) -> &[Dose] {
        &self.doses
    }

    pub fn len(&self) -> usize {
        self.doses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doses.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.doses.is_full()
    }

    pub fn taken_count(&self) -> usize {
        self.doses.iter().filter(|d| d.taken).count()
    }

    pub fn enabled_count(&self) -> usize {
        self.doses.iter().filter(|d| d.enabled).count()
    }

    fn validate(&self, time: &TimeOfDay, exclude: Option<DoseId>) -> Result<(), ScheduleError> {
        if !time.is_valid() {
            warn!("Dose rejected: invalid time");
            return Err(ScheduleError::InvalidTime);
        }
        let conflict = self
            .doses
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i as DoseId) != exclude)
            .any(|(_, d)| d.time.circular_distance(time) < MIN_DOSE_SPACING_MIN);
        if conflict {
            warn!("Dose rejected: within {} min of another dose", MIN_DOSE_SPACING_MIN);
            return Err(ScheduleError::Conflict);
        }
        Ok(())
    }

    fn sort(&mut self) {
        self.doses.sort_unstable_by_key(|d| d.time.minute_of_day());
    }

    fn id_of(&self, time: &TimeOfDay) -> Option<DoseId> {
        self.doses
            .iter()
            .position(|d| d.time == *time)
            .map(|i| i as DoseId)
    }
}
