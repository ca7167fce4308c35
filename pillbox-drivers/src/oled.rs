//! SSD1306 OLED panel
//!
//! 128x64 over I2C, buffered. Each [`Screen`] row is 8 pixels tall; the
//! selected row is drawn inverted.

use embedded_graphics::mono_font::ascii::FONT_5X8;
use embedded_graphics::mono_font::{MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use pillbox_core::traits::{Display, DisplayError};
use pillbox_core::view::View;
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::I2CDisplayInterface;
use ssd1306::Ssd1306;

use crate::screen::{Renderer, Screen, ROWS};

/// Pixel height of one text row
const ROW_HEIGHT: i32 = 8;

/// Panel width in pixels
const WIDTH: u32 = 128;

type Panel<I2C> =
    Ssd1306<I2CInterface<I2C>, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>;

fn text_style(color: BinaryColor) -> MonoTextStyle<'static, BinaryColor> {
    MonoTextStyleBuilder::new()
        .font(&FONT_5X8)
        .text_color(color)
        .build()
}

/// Text screen on an SSD1306
pub struct OledDisplay<I2C> {
    panel: Panel<I2C>,
    renderer: Renderer,
}

impl<I2C> OledDisplay<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    /// Initialise the controller and blank the panel
    ///
    /// Fails when the panel does not acknowledge; the box cannot run
    /// without a screen.
    pub fn new(i2c: I2C) -> Result<Self, DisplayError> {
        let interface = I2CDisplayInterface::new(i2c);
        let mut panel = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();
        panel.init().map_err(|_| DisplayError::InitFailed)?;
        panel.clear_buffer();
        panel.flush().map_err(|_| DisplayError::InitFailed)?;

        Ok(Self {
            panel,
            renderer: Renderer::new(),
        })
    }

    /// Text currently laid out
    pub fn screen(&self) -> &Screen {
        self.renderer.screen()
    }

    fn draw(&mut self) -> Result<(), DisplayError> {
        self.panel.clear_buffer();

        let screen = self.renderer.screen();
        for row in 0..ROWS as u8 {
            let y = row as i32 * ROW_HEIGHT;
            let selected = screen.selected_row() == Some(row);

            let color = if selected {
                Rectangle::new(Point::new(0, y), Size::new(WIDTH, ROW_HEIGHT as u32))
                    .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
                    .draw(&mut self.panel)
                    .map_err(|_| DisplayError::Bus)?;
                BinaryColor::Off
            } else {
                BinaryColor::On
            };

            let line = screen.get_line(row);
            if !line.is_empty() {
                Text::with_baseline(line, Point::new(0, y), text_style(color), Baseline::Top)
                    .draw(&mut self.panel)
                    .map_err(|_| DisplayError::Bus)?;
            }
        }

        self.panel.flush().map_err(|_| DisplayError::Bus)
    }
}

impl<I2C> Display for OledDisplay<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    fn render(&mut self, view: &View) -> Result<(), DisplayError> {
        self.renderer.render(view);
        self.draw()
    }

    fn set_power(&mut self, on: bool) -> Result<(), DisplayError> {
        self.panel.set_display_on(on).map_err(|_| DisplayError::Bus)
    }
}
