//! Pillbox - Medication Reminder Firmware
//!
//! Main firmware binary for the RP2040 pill box. One cooperative loop
//! drives the buttons, lid switch, buzzer, OLED and RTC; a Wi-Fi bridge
//! on UART0 exposes the configuration API.
//!
//! Holding OK and BACK while powering on restores factory defaults.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Pull};
use embassy_rp::i2c::{Config as I2cConfig, I2c};
use embassy_rp::peripherals::UART0;
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_time::{Delay, Instant, Timer};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use pillbox_core::config::Timing;
use pillbox_core::controller::{Controller, Restored};
use pillbox_drivers::{Ds3231, OledDisplay, PanelInputs, PwmBuzzer};

use crate::board::{BuzzerPwm, BRIDGE_BAUD, I2C_FREQUENCY_HZ, LID_OPEN_HIGH};
use crate::storage::FlashStore;

mod board;
mod channels;
mod storage;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 512]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Pillbox firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let mut inputs = PanelInputs::new(
        Input::new(p.PIN_10, Pull::Up),
        Input::new(p.PIN_11, Pull::Up),
        Input::new(p.PIN_12, Pull::Up),
        Input::new(p.PIN_13, Pull::Up),
        LID_OPEN_HIGH,
    );

    // Let the pull-ups settle before looking for the reset combination
    Timer::after_millis(20).await;
    let held = inputs.read();
    let factory_reset = held.ok && held.back;

    let mut store = FlashStore::new(p.FLASH, p.DMA_CH0);
    let restored = if factory_reset {
        warn!("OK+BACK held at power-on, erasing stored data");
        if let Err(e) = store.erase_all().await {
            warn!("Flash erase failed: {}", e);
        }
        Restored::default()
    } else {
        store.load().await
    };

    let mut i2c_config = I2cConfig::default();
    i2c_config.frequency = I2C_FREQUENCY_HZ;

    let display = match OledDisplay::new(I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, i2c_config))
    {
        Ok(display) => display,
        Err(e) => {
            error!("Display init failed: {}", e);
            halt();
        }
    };
    info!("Display initialized");

    let mut i2c_config = I2cConfig::default();
    i2c_config.frequency = I2C_FREQUENCY_HZ;
    let clock = Ds3231::new(I2c::new_blocking(p.I2C1, p.PIN_7, p.PIN_6, i2c_config));

    let pwm = Pwm::new_output_b(p.PWM_SLICE7, p.PIN_15, PwmConfig::default());
    let buzzer = PwmBuzzer::new(BuzzerPwm::new(pwm), Delay);

    let mut controller = Controller::new(clock, display, buzzer, Timing::default());
    if let Err(e) = controller.boot(restored, Instant::now().as_millis() as u32) {
        error!("Boot failed: {}", e);
        halt();
    }
    if factory_reset {
        controller.factory_reset();
    }

    // Setup UART for the Wi-Fi bridge
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = BRIDGE_BAUD;

    let tx_buf = TX_BUF.init([0u8; 512]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    info!("UART initialized for bridge communication");

    spawner.spawn(tasks::link_rx_task(rx)).unwrap();
    spawner.spawn(tasks::link_tx_task(tx)).unwrap();
    spawner
        .spawn(tasks::controller_task(controller, inputs, store))
        .unwrap();

    info!("All tasks spawned, firmware running");
}

/// Stop here; the box is unusable without a screen
fn halt() -> ! {
    loop {
        cortex_m::asm::wfi();
    }
}
