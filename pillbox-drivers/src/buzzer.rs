//! Passive piezo buzzer on a PWM channel
//!
//! Pitch comes from the PWM frequency, loudness from the duty cycle. A
//! piezo is loudest at 50% duty, so volume 255 maps to half duty.

use embedded_hal::delay::DelayNs;
use embedded_hal::pwm::SetDutyCycle;
use pillbox_core::alarm::tone::ALARM_FREQ_HZ;
use pillbox_core::alarm::Tone;
use pillbox_core::config::DEFAULT_VOLUME;
use pillbox_core::traits::Buzzer;

/// PWM slice whose period can be retuned
///
/// `embedded-hal` only covers duty; the frequency is set by the HAL.
pub trait ToneFrequency {
    fn set_frequency(&mut self, hz: u32);
}

/// Buzzer driven by a PWM output
pub struct PwmBuzzer<P, D> {
    pwm: P,
    delay: D,
    volume: u8,
}

impl<P, D> PwmBuzzer<P, D>
where
    P: SetDutyCycle + ToneFrequency,
    D: DelayNs,
{
    pub fn new(pwm: P, delay: D) -> Self {
        let mut buzzer = Self {
            pwm,
            delay,
            volume: DEFAULT_VOLUME,
        };
        buzzer.silence();
        buzzer
    }

    fn sound(&mut self, freq_hz: u32, volume: u8) {
        if freq_hz == 0 || volume == 0 {
            return self.silence();
        }
        self.pwm.set_frequency(freq_hz);
        let _ = self
            .pwm
            .set_duty_cycle_fraction(volume as u16, 2 * u8::MAX as u16);
    }

    fn silence(&mut self) {
        let _ = self.pwm.set_duty_cycle_fully_off();
    }
}

impl<P, D> Buzzer for PwmBuzzer<P, D>
where
    P: SetDutyCycle + ToneFrequency,
    D: DelayNs,
{
    fn set_output(&mut self, on: bool) {
        if on {
            self.sound(ALARM_FREQ_HZ as u32, self.volume);
        } else {
            self.silence();
        }
    }

    fn play(&mut self, tone: Tone, volume: u8) {
        self.sound(tone.freq_hz as u32, volume);
        self.delay.delay_ms(tone.duration_ms as u32);
        self.silence();
    }

    fn set_volume(&mut self, volume: u8) {
        self.volume = volume;
    }
}
