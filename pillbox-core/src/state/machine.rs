//! Mode definition
//!
//! Navigation that depends only on the current mode and a button event is
//! resolved here. Transitions that read the clock, consult the schedule or
//! have side effects are intercepted by the controller first.

use super::edit::{EditStep, FieldEdit};
use super::events::Event;
use super::menu::{DoseMenuItem, MainItem};
use crate::scheduler::DoseId;
use crate::time::{Date, TimeOfDay};

/// Edit-dose sub-flow: pick an entry, then edit its fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EditDoseStage {
    Pick { cursor: u8 },
    Fields { id: DoseId, edit: FieldEdit<TimeOfDay> },
}

/// Controller modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Clock and next-dose summary
    #[default]
    Home,
    MainMenu { cursor: MainItem },
    DoseMenu { cursor: DoseMenuItem },
    AddDose(FieldEdit<TimeOfDay>),
    EditDose(EditDoseStage),
    DeleteDose { cursor: u8 },
    /// Wall-clock time editor
    EditTime(FieldEdit<TimeOfDay>),
    EditDate(FieldEdit<Date>),
    AlarmToggle,
    WifiToggle,
    /// A dose is due; the alarm is sounding or snoozed
    Alert { dose: DoseId },
}

impl Mode {
    pub fn is_alert(&self) -> bool {
        matches!(self, Mode::Alert { .. })
    }

    /// Mode a BACK press returns to, with the cursor on the entry that
    /// opened this one
    pub fn parent(&self) -> Mode {
        use Mode::*;

        match self {
            Home | MainMenu { .. } | Alert { .. } => Home,
            DoseMenu { .. } => MainMenu {
                cursor: MainItem::EditDoses,
            },
            AddDose(_) => DoseMenu {
                cursor: DoseMenuItem::Add,
            },
            EditDose(_) => DoseMenu {
                cursor: DoseMenuItem::Edit,
            },
            DeleteDose { .. } => DoseMenu {
                cursor: DoseMenuItem::Delete,
            },
            EditTime(_) => MainMenu {
                cursor: MainItem::SetTime,
            },
            EditDate(_) => MainMenu {
                cursor: MainItem::SetDate,
            },
            AlarmToggle => MainMenu {
                cursor: MainItem::Alarm,
            },
            WifiToggle => MainMenu {
                cursor: MainItem::Wifi,
            },
        }
    }

    /// Process a button event and return the next mode
    ///
    /// Events with no pure meaning in the current mode leave it unchanged.
    pub fn transition(self, event: Event) -> Self {
        use Event::*;
        use Mode::*;

        match (self, event) {
            // An alert only ends through the controller
            (Alert { .. }, _) => self,

            // Home
            (Home, OkShort) => MainMenu {
                cursor: MainItem::EditDoses,
            },

            // BACK long leaves any screen
            (_, BackLong) => Home,

            // Main menu
            (MainMenu { cursor }, NextShort) => MainMenu {
                cursor: cursor.next(),
            },
            (MainMenu { cursor }, OkShort) => match cursor {
                MainItem::EditDoses => DoseMenu {
                    cursor: DoseMenuItem::Add,
                },
                MainItem::Alarm => AlarmToggle,
                MainItem::Wifi => WifiToggle,
                // Editors open pre-filled from the clock
                MainItem::SetTime | MainItem::SetDate => self,
            },

            // Dose menu
            (DoseMenu { cursor }, NextShort) => DoseMenu {
                cursor: cursor.next(),
            },
            (
                DoseMenu {
                    cursor: DoseMenuItem::Back,
                },
                OkShort,
            ) => self.parent(),

            // Field editors
            (AddDose(mut edit), NextShort) => {
                edit.increment();
                AddDose(edit)
            }
            (EditDose(EditDoseStage::Fields { id, mut edit }), NextShort) => {
                edit.increment();
                EditDose(EditDoseStage::Fields { id, edit })
            }
            (EditTime(mut edit), NextShort) => {
                edit.increment();
                EditTime(edit)
            }
            (EditDate(mut edit), NextShort) => {
                edit.increment();
                EditDate(edit)
            }
            (AddDose(mut edit), OkShort) => match edit.advance() {
                EditStep::Continue => AddDose(edit),
                _ => self,
            },
            (EditDose(EditDoseStage::Fields { id, mut edit }), OkShort) => match edit.advance() {
                EditStep::Continue => EditDose(EditDoseStage::Fields { id, edit }),
                _ => self,
            },
            (EditTime(mut edit), OkShort) => match edit.advance() {
                EditStep::Continue => EditTime(edit),
                _ => self,
            },
            (EditDate(mut edit), OkShort) => match edit.advance() {
                EditStep::Continue => EditDate(edit),
                _ => self,
            },
            (AddDose(mut edit), BackShort) => match edit.retreat() {
                EditStep::Continue => AddDose(edit),
                _ => self.parent(),
            },
            (EditDose(EditDoseStage::Fields { id, mut edit }), BackShort) => match edit.retreat() {
                EditStep::Continue => EditDose(EditDoseStage::Fields { id, edit }),
                _ => self.parent(),
            },
            (EditTime(mut edit), BackShort) => match edit.retreat() {
                EditStep::Continue => EditTime(edit),
                _ => self.parent(),
            },
            (EditDate(mut edit), BackShort) => match edit.retreat() {
                EditStep::Continue => EditDate(edit),
                _ => self.parent(),
            },

            // Everything else steps back one level
            (Home, BackShort) => Home,
            (_, BackShort) => self.parent(),

            // Default: stay in current mode
            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_screens() -> [Mode; 10] {
        let time = FieldEdit::new(TimeOfDay::new(8, 0, false));
        [
            Mode::MainMenu {
                cursor: MainItem::SetDate,
            },
            Mode::DoseMenu {
                cursor: DoseMenuItem::Delete,
            },
            Mode::AddDose(time),
            Mode::EditDose(EditDoseStage::Pick { cursor: 1 }),
            Mode::EditDose(EditDoseStage::Fields { id: 0, edit: time }),
            Mode::DeleteDose { cursor: 0 },
            Mode::EditTime(time),
            Mode::EditDate(FieldEdit::new(Date::FALLBACK)),
            Mode::AlarmToggle,
            Mode::WifiToggle,
        ]
    }

    #[test]
    fn test_home_to_main_menu() {
        let next = Mode::Home.transition(Event::OkShort);
        assert_eq!(
            next,
            Mode::MainMenu {
                cursor: MainItem::EditDoses
            }
        );
    }

    #[test]
    fn test_back_long_returns_home_from_any_screen() {
        for mode in all_screens() {
            assert_eq!(mode.transition(Event::BackLong), Mode::Home);
        }
    }

    #[test]
    fn test_alert_ignores_navigation() {
        let alert = Mode::Alert { dose: 2 };
        for event in [
            Event::OkShort,
            Event::OkLong,
            Event::NextShort,
            Event::BackShort,
            Event::BackLong,
        ] {
            assert_eq!(alert.transition(event), alert);
        }
    }

    #[test]
    fn test_back_restores_menu_cursor() {
        assert_eq!(
            Mode::AlarmToggle.transition(Event::BackShort),
            Mode::MainMenu {
                cursor: MainItem::Alarm
            }
        );
        assert_eq!(
            Mode::DeleteDose { cursor: 3 }.transition(Event::BackShort),
            Mode::DoseMenu {
                cursor: DoseMenuItem::Delete
            }
        );
        assert_eq!(
            Mode::EditDose(EditDoseStage::Pick { cursor: 0 }).transition(Event::BackShort),
            Mode::DoseMenu {
                cursor: DoseMenuItem::Edit
            }
        );
    }

    #[test]
    fn test_main_menu_cycles_and_opens() {
        let mut mode = Mode::MainMenu {
            cursor: MainItem::EditDoses,
        };
        for _ in 0..3 {
            mode = mode.transition(Event::NextShort);
        }
        assert_eq!(
            mode,
            Mode::MainMenu {
                cursor: MainItem::Alarm
            }
        );
        assert_eq!(mode.transition(Event::OkShort), Mode::AlarmToggle);
    }

    #[test]
    fn test_editor_fields_and_abandon() {
        let mode = Mode::EditTime(FieldEdit::new(TimeOfDay::new(8, 0, false)));
        let mode = mode
            .transition(Event::NextShort)
            .transition(Event::OkShort)
            .transition(Event::NextShort);

        let Mode::EditTime(edit) = mode else {
            panic!("left the editor: {:?}", mode);
        };
        assert_eq!(edit.value, TimeOfDay::new(9, 1, false));
        assert_eq!(edit.field, 1);

        let mode = mode.transition(Event::BackShort).transition(Event::BackShort);
        assert_eq!(
            mode,
            Mode::MainMenu {
                cursor: MainItem::SetTime
            }
        );
    }

    #[test]
    fn test_commit_is_left_to_controller() {
        let mut edit = FieldEdit::new(TimeOfDay::new(8, 0, false));
        edit.field = 2;
        let mode = Mode::AddDose(edit);
        assert_eq!(mode.transition(Event::OkShort), mode);
    }
}
