//! DS3231 real-time clock
//!
//! Battery-backed RTC on I2C. Time registers are BCD; the hour register
//! may be in 12- or 24-hour mode depending on who set it last, so both
//! are accepted on read. Writes always use 24-hour mode.
//!
//! The oscillator-stop flag (OSF) in the status register reports a
//! lost battery; it is cleared when the full date and time are written.

use embedded_hal::i2c::{Error as _, ErrorKind, I2c};
use pillbox_core::time::{Date, DateTime, TimeOfDay, MIN_YEAR};
use pillbox_core::traits::{Clock, ClockError};

/// Fixed I2C address
pub const DS3231_ADDRESS: u8 = 0x68;

const REG_SECONDS: u8 = 0x00;
const REG_DATE: u8 = 0x04;
const REG_STATUS: u8 = 0x0F;

const HOUR_12H_MODE: u8 = 0x40;
const HOUR_PM: u8 = 0x20;
const STATUS_OSF: u8 = 0x80;

fn bcd_to_bin(value: u8) -> u8 {
    (value >> 4) * 10 + (value & 0x0F)
}

fn bin_to_bcd(value: u8) -> u8 {
    ((value / 10) << 4) | (value % 10)
}

/// Decode the hour register in either mode
fn decode_hour(reg: u8, minute: u8) -> TimeOfDay {
    if reg & HOUR_12H_MODE != 0 {
        TimeOfDay::new(bcd_to_bin(reg & 0x1F), minute, reg & HOUR_PM != 0)
    } else {
        TimeOfDay::from_hour24(bcd_to_bin(reg & 0x3F), minute)
    }
}

/// DS3231 over a blocking I2C bus
pub struct Ds3231<I2C> {
    i2c: I2C,
}

impl<I2C: I2c> Ds3231<I2C> {
    pub fn new(i2c: I2C) -> Self {
        Self { i2c }
    }

    /// Release the bus
    pub fn release(self) -> I2C {
        self.i2c
    }

    fn read_registers(&mut self, start: u8, buffer: &mut [u8]) -> Result<(), ClockError> {
        self.i2c
            .write_read(DS3231_ADDRESS, &[start], buffer)
            .map_err(|e| bus_error(e.kind()))
    }

    fn write_registers(&mut self, data: &[u8]) -> Result<(), ClockError> {
        self.i2c
            .write(DS3231_ADDRESS, data)
            .map_err(|e| bus_error(e.kind()))
    }

    fn clear_oscillator_stop(&mut self) -> Result<(), ClockError> {
        let mut status = [0u8; 1];
        self.read_registers(REG_STATUS, &mut status)?;
        self.write_registers(&[REG_STATUS, status[0] & !STATUS_OSF])
    }
}

fn bus_error(kind: ErrorKind) -> ClockError {
    match kind {
        ErrorKind::NoAcknowledge(_) => ClockError::NotFound,
        _ => ClockError::Bus,
    }
}

impl<I2C: I2c> Clock for Ds3231<I2C> {
    fn now(&mut self) -> Result<DateTime, ClockError> {
        let mut regs = [0u8; 7];
        self.read_registers(REG_SECONDS, &mut regs)?;

        let second = bcd_to_bin(regs[0] & 0x7F);
        let minute = bcd_to_bin(regs[1] & 0x7F);
        let time = decode_hour(regs[2], minute);
        let date = Date::new(
            bcd_to_bin(regs[4] & 0x3F),
            bcd_to_bin(regs[5] & 0x1F),
            MIN_YEAR + bcd_to_bin(regs[6]) as u16,
        );

        if second > 59 || !time.is_valid() || !date.is_valid() {
            return Err(ClockError::InvalidReading);
        }
        Ok(DateTime::new(date, time, second))
    }

    fn set_time(&mut self, time: TimeOfDay) -> Result<(), ClockError> {
        if !time.is_valid() {
            return Err(ClockError::InvalidTime);
        }
        self.write_registers(&[
            REG_SECONDS,
            0,
            bin_to_bcd(time.minute),
            bin_to_bcd(time.hour24()),
        ])
    }

    fn set_date(&mut self, date: Date) -> Result<(), ClockError> {
        if !date.is_valid() {
            return Err(ClockError::InvalidDate);
        }
        self.write_registers(&[
            REG_DATE,
            bin_to_bcd(date.day),
            bin_to_bcd(date.month),
            bin_to_bcd((date.year - MIN_YEAR) as u8),
        ])
    }

    fn lost_power(&mut self) -> Result<bool, ClockError> {
        let mut status = [0u8; 1];
        self.read_registers(REG_STATUS, &mut status)?;
        Ok(status[0] & STATUS_OSF != 0)
    }

    fn set_datetime(&mut self, datetime: DateTime) -> Result<(), ClockError> {
        self.set_date(datetime.date)?;
        self.set_time(datetime.time)?;
        self.clear_oscillator_stop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::{ErrorType, NoAcknowledgeSource, Operation};

    /// Register file with an auto-incrementing pointer
    struct MockRtc {
        regs: [u8; 0x13],
        pointer: usize,
        present: bool,
    }

    impl MockRtc {
        fn new() -> Self {
            Self {
                regs: [0; 0x13],
                pointer: 0,
                present: true,
            }
        }
    }

    impl ErrorType for MockRtc {
        type Error = ErrorKind;
    }

    impl I2c for MockRtc {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            if !self.present || address != DS3231_ADDRESS {
                return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
            }
            for op in operations {
                match op {
                    Operation::Write(bytes) => {
                        if let Some((&reg, data)) = bytes.split_first() {
                            self.pointer = reg as usize;
                            for &b in data {
                                self.regs[self.pointer] = b;
                                self.pointer += 1;
                            }
                        }
                    }
                    Operation::Read(buffer) => {
                        for b in buffer.iter_mut() {
                            *b = self.regs[self.pointer];
                            self.pointer += 1;
                        }
                    }
                }
            }
            Ok(())
        }
    }

    #[test]
    fn test_bcd_conversion() {
        assert_eq!(bcd_to_bin(0x59), 59);
        assert_eq!(bin_to_bcd(47), 0x47);
        for v in 0..100 {
            assert_eq!(bcd_to_bin(bin_to_bcd(v)), v);
        }
    }

    #[test]
    fn test_reads_24h_register() {
        let mut mock = MockRtc::new();
        mock.regs[..7].copy_from_slice(&[0x30, 0x05, 0x18, 0x02, 0x15, 0x03, 0x25]);
        let mut rtc = Ds3231::new(mock);

        let now = rtc.now().unwrap();
        assert_eq!(now.time, TimeOfDay::new(6, 5, true));
        assert_eq!(now.second, 30);
        assert_eq!(now.date, Date::new(15, 3, 2025));
    }

    #[test]
    fn test_reads_12h_register() {
        let mut mock = MockRtc::new();
        // 12:45 AM in 12-hour mode, century bit set in month
        mock.regs[..7].copy_from_slice(&[0x00, 0x45, 0x52, 0x01, 0x01, 0x81, 0x24]);
        let mut rtc = Ds3231::new(mock);

        let now = rtc.now().unwrap();
        assert_eq!(now.time, TimeOfDay::new(12, 45, false));
        assert_eq!(now.date, Date::new(1, 1, 2024));
    }

    #[test]
    fn test_rejects_garbage() {
        let mut mock = MockRtc::new();
        mock.regs[..7].copy_from_slice(&[0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00]);
        let mut rtc = Ds3231::new(mock);
        assert_eq!(rtc.now(), Err(ClockError::InvalidReading));
    }

    #[test]
    fn test_set_time_keeps_date() {
        let mut mock = MockRtc::new();
        mock.regs[..7].copy_from_slice(&[0x10, 0x00, 0x09, 0x01, 0x02, 0x02, 0x24]);
        let mut rtc = Ds3231::new(mock);

        rtc.set_time(TimeOfDay::new(11, 30, true)).unwrap();
        let now = rtc.now().unwrap();
        assert_eq!(now.time, TimeOfDay::new(11, 30, true));
        assert_eq!(now.second, 0);
        assert_eq!(now.date, Date::new(2, 2, 2024));
        assert_eq!(rtc.release().regs[2], 0x23);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut rtc = Ds3231::new(MockRtc::new());
        assert_eq!(
            rtc.set_time(TimeOfDay::new(13, 0, false)),
            Err(ClockError::InvalidTime)
        );
        assert_eq!(
            rtc.set_date(Date::new(1, 13, 2024)),
            Err(ClockError::InvalidDate)
        );
    }

    #[test]
    fn test_set_datetime_clears_lost_power() {
        let mut mock = MockRtc::new();
        mock.regs[REG_STATUS as usize] = STATUS_OSF | 0x08;
        let mut rtc = Ds3231::new(mock);

        assert!(rtc.lost_power().unwrap());
        rtc.set_datetime(DateTime::FALLBACK).unwrap();
        assert!(!rtc.lost_power().unwrap());
        assert_eq!(rtc.now().unwrap().date, Date::FALLBACK);

        let mock = rtc.release();
        assert_eq!(mock.regs[REG_STATUS as usize], 0x08);
    }

    #[test]
    fn test_missing_device() {
        let mut mock = MockRtc::new();
        mock.present = false;
        let mut rtc = Ds3231::new(mock);
        assert_eq!(rtc.now(), Err(ClockError::NotFound));
    }
}
