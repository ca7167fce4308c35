//! Dose alerts driven through the full loop

mod common;

use common::{am, pm, Rig};
use pillbox_core::controller::Effect;
use pillbox_core::input::ButtonId;
use pillbox_core::state::Mode;
use pillbox_core::time::Date;
use pillbox_core::view::View;

fn rig_with_three_doses() -> Rig {
    let mut rig = Rig::new();
    rig.set_time(am(7, 0));
    rig.add_doses(&[am(8, 0), pm(12, 0), pm(6, 0)]);
    rig.poll();
    rig
}

#[test]
fn test_dose_time_raises_alert() {
    let mut rig = rig_with_three_doses();
    rig.set_time(am(8, 0));
    rig.poll();

    assert_eq!(rig.ctl.mode(), Mode::Alert { dose: 0 });
    assert!(rig.ctl.alarm().is_active());
    assert!(rig.ctl.buzzer().output);
    assert!(matches!(
        rig.ctl.display().last,
        Some(View::Alert { dose_number: 1, .. })
    ));
}

#[test]
fn test_lid_open_during_alert_marks_taken() {
    let mut rig = rig_with_three_doses();
    rig.set_time(pm(6, 0));
    rig.poll();
    assert_eq!(rig.ctl.active_dose(), Some(2));

    rig.open_lid();

    assert!(rig.ctl.scheduler().get(2).is_some_and(|d| d.taken));
    assert!(!rig.ctl.alarm().is_active());
    assert_eq!(rig.ctl.active_dose(), None);
    assert_eq!(rig.ctl.mode(), Mode::Home);
    assert!(!rig.ctl.buzzer().output);

    let entry = rig.ctl.log().iter().last().copied();
    assert_eq!(entry.map(|e| (e.dose, e.on_time)), Some((Some(2), true)));
    assert!(rig.drain_effects().contains(&Effect::SaveLog));
}

#[test]
fn test_lid_open_while_snoozed_marks_taken() {
    let mut rig = rig_with_three_doses();
    rig.set_time(pm(6, 0));
    rig.poll();

    rig.press(ButtonId::Back);
    assert!(rig.ctl.alarm().is_snoozed());

    rig.open_lid();
    assert!(rig.ctl.scheduler().get(2).is_some_and(|d| d.taken));
    assert_eq!(rig.ctl.mode(), Mode::Home);
    assert!(!rig.ctl.alarm().is_active());
}

#[test]
fn test_noon_dose_alerts_once_per_minute() {
    let mut rig = rig_with_three_doses();
    rig.set_time(pm(12, 0));
    rig.poll();
    assert_eq!(rig.ctl.mode(), Mode::Alert { dose: 1 });

    // Dismiss without taking, then keep polling inside the same minute
    rig.long_press(ButtonId::Ok);
    assert_eq!(rig.ctl.mode(), Mode::Home);
    assert!(!rig.ctl.scheduler().get(1).is_some_and(|d| d.taken));

    rig.poll();
    rig.poll();
    assert_eq!(rig.ctl.mode(), Mode::Home);
    assert!(!rig.ctl.alarm().is_active());
}

#[test]
fn test_snooze_silences_then_resumes() {
    let mut rig = rig_with_three_doses();
    rig.set_time(am(8, 0));
    rig.poll();

    rig.press(ButtonId::Back);
    assert!(rig.ctl.alarm().is_snoozed());
    assert!(!rig.ctl.buzzer().output);
    assert!(matches!(
        rig.ctl.display().last,
        Some(View::Snoozed { remaining_secs }) if remaining_secs > 290
    ));

    // A second BACK while snoozed changes nothing
    rig.press(ButtonId::Back);
    assert!(rig.ctl.alarm().is_snoozed());

    rig.advance(300_000);
    assert!(!rig.ctl.alarm().is_snoozed());
    assert!(rig.ctl.alarm().is_active());
    assert_eq!(rig.ctl.mode(), Mode::Alert { dose: 0 });
}

#[test]
fn test_alert_keeps_display_awake() {
    let mut rig = rig_with_three_doses();
    rig.set_time(am(8, 0));
    rig.poll();

    rig.advance(200_000);
    assert!(rig.ctl.display_on());
    assert!(rig.ctl.mode().is_alert());
}

#[test]
fn test_muted_box_does_not_alert() {
    let mut rig = rig_with_three_doses();
    rig.long_press(ButtonId::Next);
    assert!(rig.ctl.settings().mute);
    assert!(rig.drain_effects().contains(&Effect::SaveSettings));

    rig.set_time(am(8, 0));
    rig.poll();
    assert_eq!(rig.ctl.mode(), Mode::Home);
}

#[test]
fn test_day_rollover_resets_once() {
    let mut rig = rig_with_three_doses();
    rig.set_time(am(8, 0));
    rig.poll();
    rig.open_lid();
    rig.close_lid();
    assert_eq!(rig.ctl.scheduler().taken_count(), 1);
    rig.drain_effects();

    rig.set_time(am(7, 0));
    rig.set_date(Date::new(2, 1, 2024));
    rig.poll();

    assert_eq!(rig.ctl.scheduler().taken_count(), 0);
    assert_eq!(rig.ctl.lid().openings_today(), 0);
    assert_eq!(rig.drain_effects(), vec![Effect::SaveLastDay(2)]);

    rig.poll();
    rig.poll();
    assert!(rig.drain_effects().is_empty());
}

#[test]
fn test_same_dose_alerts_again_next_day() {
    let mut rig = rig_with_three_doses();
    rig.set_time(am(8, 0));
    rig.poll();
    rig.long_press(ButtonId::Ok);
    assert_eq!(rig.ctl.mode(), Mode::Home);

    rig.set_date(Date::new(2, 1, 2024));
    rig.poll();
    assert_eq!(rig.ctl.mode(), Mode::Alert { dose: 0 });
}
