//! Text layout for every view
//!
//! The panel is a 128x64 OLED used as 8 rows of 21 characters. Menus and
//! lists mark the current row with "> " and ask the panel to invert it.

use heapless::String;
use pillbox_core::scheduler::Dose;
use pillbox_core::state::{DoseMenuItem, MainItem};
use pillbox_core::time::{Date, TimeOfDay};
use pillbox_core::view::{HomeStatus, ListPurpose, MessageKind, View};

/// Characters per row
pub const COLS: usize = 21;

/// Rows per screen
pub const ROWS: usize = 8;

/// Dose rows visible on a list screen
const LIST_ROWS: usize = 6;

/// Left margin for the value on edit screens
const EDIT_INDENT: usize = 6;

type Line = String<22>;

/// A screen buffer that can be sent to the display
pub struct Screen {
    lines: [Line; ROWS],
    /// Which row is currently selected (for menu highlighting)
    selected_row: Option<u8>,
}

impl Screen {
    /// Create a new empty screen
    pub const fn new() -> Self {
        Self {
            lines: [
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
            ],
            selected_row: None,
        }
    }

    /// Clear the screen
    pub fn clear(&mut self) {
        for line in &mut self.lines {
            line.clear();
        }
        self.selected_row = None;
    }

    /// Set text at a specific row, cut to the row width
    pub fn set_line(&mut self, row: u8, text: &str) {
        if let Some(line) = self.lines.get_mut(row as usize) {
            line.clear();
            let _ = line.push_str(&text[..text.len().min(COLS)]);
        }
    }

    /// Highlight a row
    pub fn set_selection(&mut self, row: u8) {
        if (row as usize) < ROWS {
            self.selected_row = Some(row);
        }
    }

    /// Get a line of text
    pub fn get_line(&self, row: u8) -> &str {
        self.lines
            .get(row as usize)
            .map(|line| line.as_str())
            .unwrap_or("")
    }

    pub fn selected_row(&self) -> Option<u8> {
        self.selected_row
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

/// Lays out a [`View`] on a [`Screen`]
pub struct Renderer {
    screen: Screen,
}

impl Renderer {
    /// Create a new renderer
    pub const fn new() -> Self {
        Self {
            screen: Screen::new(),
        }
    }

    /// Get the current screen buffer
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Replace the screen contents with `view`
    pub fn render(&mut self, view: &View) {
        self.screen.clear();
        match view {
            View::Home(status) => self.render_home(status),
            View::MainMenu { selected } => self.render_main_menu(*selected),
            View::DoseMenu { selected } => self.render_dose_menu(*selected),
            View::DoseList {
                doses,
                selected,
                purpose,
            } => self.render_dose_list(doses, *selected, *purpose),
            View::DoseEdit {
                time,
                field,
                is_new,
            } => {
                let title = if *is_new {
                    "=== NEW DOSE ==="
                } else {
                    "=== EDIT DOSE ==="
                };
                self.render_time_editor(title, *time, *field);
            }
            View::TimeEdit { time, field } => {
                self.render_time_editor("=== SET TIME ===", *time, *field)
            }
            View::DateEdit { date, field } => self.render_date_editor(*date, *field),
            View::AlarmToggle { enabled } => self.render_alarm_toggle(*enabled),
            View::WifiToggle { enabled, address } => self.render_wifi_toggle(*enabled, *address),
            View::Alert { dose_number, time } => self.render_alert(*dose_number, *time),
            View::Snoozed { remaining_secs } => self.render_snoozed(*remaining_secs),
            View::Message { kind, text } => self.render_message(*kind, text),
        }
    }

    fn render_home(&mut self, status: &HomeStatus) {
        // Indicators
        let mut flags = Line::new();
        if status.wifi {
            let _ = flags.push_str("WiFi ");
        }
        if status.mute {
            let _ = flags.push_str("Mute ");
        }
        if !status.alarm_enabled {
            let _ = flags.push_str("Alarm off");
        }
        self.screen.set_line(0, &flags);

        let mut time_line = Line::new();
        let _ = write_to_string(&mut time_line, format_args!("      {}", status.time));
        self.screen.set_line(2, &time_line);

        let mut next_line = Line::new();
        match status.minutes_to_next {
            Some(0) => {
                let _ = next_line.push_str("Next dose: now");
            }
            Some(minutes) if minutes >= 60 => {
                let _ = write_to_string(
                    &mut next_line,
                    format_args!("Next dose: {}h {:02}m", minutes / 60, minutes % 60),
                );
            }
            Some(minutes) => {
                let _ = write_to_string(&mut next_line, format_args!("Next dose: {}m", minutes));
            }
            None => {
                let _ = next_line.push_str("No doses pending");
            }
        }
        self.screen.set_line(4, &next_line);

        let mut taken_line = Line::new();
        let _ = write_to_string(
            &mut taken_line,
            format_args!("Taken today: {}/{}", status.taken, status.enabled),
        );
        self.screen.set_line(5, &taken_line);

        if !status.lid_sensor {
            self.screen.set_line(6, "No lid sensor reading");
        }
        self.screen.set_line(7, "OK=Menu");
    }

    fn render_main_menu(&mut self, selected: MainItem) {
        self.screen.set_line(0, "=== MAIN MENU ===");
        let labels = MainItem::ALL.map(MainItem::label);
        self.render_items(&labels, selected.index());
    }

    fn render_dose_menu(&mut self, selected: DoseMenuItem) {
        self.screen.set_line(0, "=== DOSES ===");
        let labels = DoseMenuItem::ALL.map(DoseMenuItem::label);
        self.render_items(&labels, selected.index());
    }

    /// Menu items from row 1, with the selection marker
    fn render_items(&mut self, labels: &[&str], selected: usize) {
        for (i, label) in labels.iter().take(ROWS - 1).enumerate() {
            let row = (i + 1) as u8;
            let mut line = Line::new();
            let _ = line.push_str(if i == selected { "> " } else { "  " });
            let _ = line.push_str(label);
            self.screen.set_line(row, &line);
            if i == selected {
                self.screen.set_selection(row);
            }
        }
    }

    fn render_dose_list(&mut self, doses: &[Dose], selected: u8, purpose: ListPurpose) {
        let (title, footer) = match purpose {
            ListPurpose::Edit => ("=== EDIT DOSE ===", "OK=Edit NEXT=Move"),
            ListPurpose::Delete => ("=== DELETE DOSE ===", "OK=Delete NEXT=Move"),
        };
        self.screen.set_line(0, title);

        // Scroll so the selection stays visible
        let selected = selected as usize;
        let first = (selected + 1).saturating_sub(LIST_ROWS);
        for (i, dose) in doses.iter().enumerate().skip(first).take(LIST_ROWS) {
            let row = (i - first + 1) as u8;
            let marker = if i == selected { ">" } else { " " };
            let mut line = Line::new();
            let _ = write_to_string(
                &mut line,
                format_args!("{} {:2}. {}", marker, i + 1, dose.time),
            );
            if !dose.enabled {
                let _ = line.push_str(" off");
            } else if dose.taken {
                let _ = line.push_str(" ok");
            }
            self.screen.set_line(row, &line);
            if i == selected {
                self.screen.set_selection(row);
            }
        }

        self.screen.set_line(7, footer);
    }

    fn render_time_editor(&mut self, title: &str, time: TimeOfDay, field: u8) {
        self.screen.set_line(0, title);

        let mut value = Line::new();
        let _ = write_to_string(&mut value, format_args!("{:indent$}{}", "", time, indent = EDIT_INDENT));
        self.screen.set_line(3, &value);

        // " 8:05 AM": hour, minute, meridiem
        let (offset, width) = match field {
            0 => (0, 2),
            1 => (3, 2),
            _ => (6, 2),
        };
        self.screen.set_line(4, &caret_line(EDIT_INDENT + offset, width));

        self.screen.set_line(7, "NEXT=+1 OK=Next");
    }

    fn render_date_editor(&mut self, date: Date, field: u8) {
        self.screen.set_line(0, "=== SET DATE ===");

        let mut value = Line::new();
        let _ = write_to_string(&mut value, format_args!("{:indent$}{}", "", date, indent = EDIT_INDENT));
        self.screen.set_line(3, &value);

        // "DD/MM/YYYY"
        let (offset, width) = match field {
            0 => (0, 2),
            1 => (3, 2),
            _ => (6, 4),
        };
        self.screen.set_line(4, &caret_line(EDIT_INDENT + offset, width));

        self.screen.set_line(7, "NEXT=+1 OK=Next");
    }

    fn render_alarm_toggle(&mut self, enabled: bool) {
        self.screen.set_line(0, "=== ALARM ===");
        self.screen
            .set_line(3, if enabled { "  Alarm: ON" } else { "  Alarm: OFF" });
        self.screen.set_line(7, "OK=Toggle BACK=Exit");
    }

    fn render_wifi_toggle(&mut self, enabled: bool, address: Option<[u8; 4]>) {
        self.screen.set_line(0, "=== WIFI ===");
        self.screen
            .set_line(3, if enabled { "  WiFi: ON" } else { "  WiFi: OFF" });

        match (enabled, address) {
            (true, Some(ip)) => {
                let mut line = Line::new();
                let _ = write_to_string(
                    &mut line,
                    format_args!("  {}.{}.{}.{}", ip[0], ip[1], ip[2], ip[3]),
                );
                self.screen.set_line(5, &line);
            }
            (true, None) => self.screen.set_line(5, "  Connecting..."),
            (false, _) => {}
        }

        self.screen.set_line(7, "OK=Toggle BACK=Exit");
    }

    fn render_alert(&mut self, dose_number: u8, time: TimeOfDay) {
        self.screen.set_line(0, "!!! DOSE TIME !!!");

        let mut dose_line = Line::new();
        let _ = write_to_string(&mut dose_line, format_args!("  Dose {}: {}", dose_number, time));
        self.screen.set_line(2, &dose_line);

        self.screen.set_line(4, "Open lid to take");
        self.screen.set_line(6, "BACK=Snooze");
        self.screen.set_line(7, "HOLD OK=Dismiss");
    }

    fn render_snoozed(&mut self, remaining_secs: u16) {
        self.screen.set_line(2, "   ** SNOOZED **");

        let mut time_line = Line::new();
        let _ = write_to_string(
            &mut time_line,
            format_args!("  Resumes in {}:{:02}", remaining_secs / 60, remaining_secs % 60),
        );
        self.screen.set_line(4, &time_line);

        self.screen.set_line(6, "Open lid to take");
    }

    fn render_message(&mut self, kind: MessageKind, text: &str) {
        match kind {
            MessageKind::Error => self.screen.set_line(0, "!!! ERROR !!!"),
            MessageKind::Success => self.screen.set_line(0, "** DONE **"),
            MessageKind::Info => {}
        }

        // Split long text across rows
        for (i, chunk) in text.as_bytes().chunks(COLS).enumerate().take(3) {
            if let Ok(s) = core::str::from_utf8(chunk) {
                self.screen.set_line(3 + i as u8, s);
            }
        }
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// `^` under `width` characters starting at `offset`
fn caret_line(offset: usize, width: usize) -> Line {
    let mut line = Line::new();
    for i in 0..(offset + width).min(COLS) {
        let _ = line.push(if i < offset { ' ' } else { '^' });
    }
    line
}

fn write_to_string(s: &mut Line, args: core::fmt::Arguments<'_>) -> core::fmt::Result {
    use core::fmt::Write;
    s.write_fmt(args)
}
