//! Menu/alert state machine
//!
//! [`Mode`] is the closed set of screens the controller can be in; each
//! variant carries only the data that screen edits. Pure navigation lives in
//! [`Mode::transition`]; transitions with side effects are handled by the
//! [`Controller`](crate::controller::Controller).

pub mod edit;
pub mod events;
pub mod machine;
pub mod menu;

pub use edit::{Editable, EditStep, FieldEdit};
pub use events::Event;
pub use machine::{EditDoseStage, Mode};
pub use menu::{DoseMenuItem, MainItem};
