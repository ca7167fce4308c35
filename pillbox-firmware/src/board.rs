//! Board wiring
//!
//! Raspberry Pi Pico on the pill box carrier board:
//!
//! | Function        | Pins                 |
//! |-----------------|----------------------|
//! | Bridge UART0    | GP0 TX, GP1 RX       |
//! | OLED (I2C0)     | GP4 SDA, GP5 SCL     |
//! | DS3231 (I2C1)   | GP6 SDA, GP7 SCL     |
//! | OK / NEXT / BACK| GP10 / GP11 / GP12   |
//! | Lid switch      | GP13                 |
//! | Buzzer (PWM7 B) | GP15                 |

use core::convert::Infallible;

use embassy_rp::gpio::Input;
use embassy_rp::i2c::{Blocking, I2c};
use embassy_rp::peripherals::{I2C0, I2C1};
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_time::Delay;
use embedded_hal::pwm::{ErrorType, SetDutyCycle};

use pillbox_core::controller::Controller;
use pillbox_drivers::{Ds3231, OledDisplay, PanelInputs, PwmBuzzer, ToneFrequency};

/// I2C bus speed for both buses (Hz)
pub const I2C_FREQUENCY_HZ: u32 = 400_000;

/// Bridge UART baud rate
pub const BRIDGE_BAUD: u32 = 115_200;

/// Lid switch reads high when the lid is open (reed switch to ground,
/// magnet in the lid)
pub const LID_OPEN_HIGH: bool = true;

/// System clock feeding the PWM slices (Hz)
const SYS_CLOCK_HZ: u32 = 125_000_000;

/// PWM clock divider; 125 MHz / 64 keeps every tone inside a 16-bit period
const PWM_DIVIDER: u8 = 64;

pub type OledBus = I2c<'static, I2C0, Blocking>;
pub type RtcBus = I2c<'static, I2C1, Blocking>;
pub type BoardClock = Ds3231<RtcBus>;
pub type BoardDisplay = OledDisplay<OledBus>;
pub type BoardBuzzer = PwmBuzzer<BuzzerPwm, Delay>;
pub type BoardInputs = PanelInputs<Input<'static>, Input<'static>, Input<'static>, Input<'static>>;
pub type BoardController = Controller<BoardClock, BoardDisplay, BoardBuzzer>;

/// Buzzer slice (channel B) with a retunable period
pub struct BuzzerPwm {
    pwm: Pwm<'static>,
    config: PwmConfig,
}

impl BuzzerPwm {
    pub fn new(mut pwm: Pwm<'static>) -> Self {
        let mut config = PwmConfig::default();
        config.divider = PWM_DIVIDER.into();
        config.top = 1000;
        config.compare_b = 0;
        pwm.set_config(&config);
        Self { pwm, config }
    }
}

impl ToneFrequency for BuzzerPwm {
    fn set_frequency(&mut self, hz: u32) {
        let ticks = SYS_CLOCK_HZ / PWM_DIVIDER as u32 / hz.max(1);
        self.config.top = ticks.clamp(2, u16::MAX as u32) as u16 - 1;
        self.pwm.set_config(&self.config);
    }
}

impl ErrorType for BuzzerPwm {
    type Error = Infallible;
}

impl SetDutyCycle for BuzzerPwm {
    fn max_duty_cycle(&self) -> u16 {
        self.config.top
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        self.config.compare_b = duty.min(self.config.top);
        self.pwm.set_config(&self.config);
        Ok(())
    }
}
