//! Requests arriving from the Wi-Fi bridge

mod common;

use common::{am, clock_at, pm, Rig};
use heapless::Vec;
use pillbox_core::controller::{Effect, Restored};
use pillbox_core::input::ButtonId;
use pillbox_core::state::Mode;
use pillbox_core::time::DateTime;
use pillbox_protocol::{BridgeMessage, ErrorCode, Reply, Request, WireDate, WireTime};

fn wire(hour: u8, minute: u8, pm: bool) -> WireTime {
    WireTime { hour, minute, pm }
}

#[test]
fn test_spacing_rule_over_remote() {
    let mut rig = Rig::new();
    for time in [wire(8, 0, false), wire(12, 0, true), wire(6, 0, true)] {
        assert_eq!(rig.ctl.handle_remote(Request::AddDose(time)), Reply::Ack);
    }
    assert_eq!(
        rig.ctl.handle_remote(Request::AddDose(wire(8, 10, false))),
        Reply::Error(ErrorCode::Conflict)
    );
    assert_eq!(rig.ctl.scheduler().len(), 3);
}

#[test]
fn test_invalid_time_and_missing_id() {
    let mut rig = Rig::new();
    assert_eq!(
        rig.ctl.handle_remote(Request::AddDose(wire(13, 0, false))),
        Reply::Error(ErrorCode::InvalidValue)
    );
    assert_eq!(
        rig.ctl.handle_remote(Request::DeleteDose(0)),
        Reply::Error(ErrorCode::NotFound)
    );
    assert!(rig.drain_effects().is_empty());
}

#[test]
fn test_clock_writes_need_unlock() {
    let mut rig = Rig::new();
    let set_time = Request::SetTime(wire(9, 30, false));
    let set_date = Request::SetDate(WireDate {
        day: 15,
        month: 6,
        year: 2025,
    });

    assert_eq!(
        rig.ctl.handle_remote(set_time.clone()),
        Reply::Error(ErrorCode::Locked)
    );
    assert_eq!(
        rig.ctl.handle_remote(set_date.clone()),
        Reply::Error(ErrorCode::Locked)
    );

    assert_eq!(rig.ctl.handle_remote(Request::UnlockTime(true)), Reply::Ack);
    assert_eq!(rig.ctl.handle_remote(set_time), Reply::Ack);
    assert_eq!(rig.ctl.handle_remote(set_date), Reply::Ack);
    assert_eq!(rig.clock.borrow().now.time, am(9, 30));
    assert_eq!(rig.clock.borrow().now.date.year, 2025);
}

#[test]
fn test_invalid_date_rejected() {
    let mut rig = Rig::new();
    rig.ctl.handle_remote(Request::UnlockTime(true));
    let reply = rig.ctl.handle_remote(Request::SetDate(WireDate {
        day: 1,
        month: 13,
        year: 2024,
    }));
    assert_eq!(reply, Reply::Error(ErrorCode::InvalidValue));
}

#[test]
fn test_stopping_link_relocks_time() {
    let mut rig = Rig::new();
    rig.long_press(ButtonId::Ok);
    assert!(rig.ctl.link_enabled());
    assert_eq!(rig.drain_effects(), vec![Effect::SetLink(true)]);

    rig.ctl.handle_remote(Request::UnlockTime(true));
    assert!(rig.ctl.time_unlocked());

    rig.long_press(ButtonId::Ok);
    assert!(!rig.ctl.link_enabled());
    assert!(!rig.ctl.time_unlocked());
    assert_eq!(rig.drain_effects(), vec![Effect::SetLink(false)]);
    assert_eq!(
        rig.ctl.handle_remote(Request::SetTime(wire(9, 0, false))),
        Reply::Error(ErrorCode::Locked)
    );
}

#[test]
fn test_replace_skips_invalid_entries() {
    let mut rig = Rig::new();
    rig.add_doses(&[am(3, 0)]);

    let mut times = Vec::new();
    for time in [
        wire(8, 0, false),
        wire(8, 5, false),
        wire(0, 0, false),
        wire(9, 0, true),
    ] {
        times.push(time).unwrap();
    }
    assert_eq!(rig.ctl.handle_remote(Request::ReplaceDoses(times)), Reply::Ack);

    let kept: std::vec::Vec<_> = rig.ctl.scheduler().doses().iter().map(|d| d.time).collect();
    assert_eq!(kept, vec![am(8, 0), pm(9, 0)]);
    assert_eq!(rig.drain_effects(), vec![Effect::SaveDoses]);
}

#[test]
fn test_status_reflects_alert() {
    let mut rig = Rig::new();
    rig.add_doses(&[pm(12, 0), pm(6, 0)]);
    rig.poll();
    rig.press(ButtonId::Back);

    let Reply::Status(status) = rig.ctl.handle_remote(Request::GetStatus) else {
        panic!("expected status");
    };
    assert_eq!(status.dose_count, 2);
    assert!(status.alarm_active);
    assert!(status.snoozed);
    assert!(status.alarm_enabled);
    assert!(!status.time_edit_unlocked);
    assert!(status.lid_sensor);
    assert_eq!(status.minutes_to_next, Some(0));
}

#[test]
fn test_status_reports_lid_sensor_before_first_sample() {
    let mut rig = Rig::unbooted(clock_at(DateTime::FALLBACK));
    rig.ctl.boot(Restored::default(), 0).unwrap();

    let Reply::Status(status) = rig.ctl.handle_remote(Request::GetStatus) else {
        panic!("expected status");
    };
    assert!(!status.lid_sensor);

    rig.step();
    let Reply::Status(status) = rig.ctl.handle_remote(Request::GetStatus) else {
        panic!("expected status");
    };
    assert!(status.lid_sensor);
}

#[test]
fn test_remote_delete_repoints_live_alert() {
    let mut rig = Rig::new();
    rig.add_doses(&[am(8, 0), pm(12, 0)]);
    rig.poll();
    assert_eq!(rig.ctl.mode(), Mode::Alert { dose: 1 });

    assert_eq!(rig.ctl.handle_remote(Request::DeleteDose(0)), Reply::Ack);
    assert_eq!(rig.ctl.mode(), Mode::Alert { dose: 0 });

    assert_eq!(rig.ctl.handle_remote(Request::DeleteDose(0)), Reply::Ack);
    assert_eq!(rig.ctl.mode(), Mode::Home);
    assert!(!rig.ctl.alarm().is_active());
}

#[test]
fn test_log_summary_reports_latest() {
    let mut rig = Rig::new();
    for _ in 0..25 {
        rig.open_lid();
        rig.close_lid();
    }

    let Reply::Logs { total, entries } = rig.ctl.handle_remote(Request::GetLogs) else {
        panic!("expected logs");
    };
    assert_eq!(total, 25);
    assert_eq!(entries.len(), 20);
    assert!(entries.iter().all(|e| e.dose.is_none() && !e.on_time));
}

#[test]
fn test_link_address_shown_on_toggle_screen() {
    let mut rig = Rig::new();
    rig.ctl.set_link(true);
    assert_eq!(rig.ctl.handle_bridge(BridgeMessage::LinkUp([192, 168, 4, 1])), None);

    rig.press(ButtonId::Ok);
    for _ in 0..4 {
        rig.press(ButtonId::Next);
    }
    rig.press(ButtonId::Ok);

    assert_eq!(
        rig.ctl.display().last,
        Some(pillbox_core::view::View::WifiToggle {
            enabled: true,
            address: Some([192, 168, 4, 1]),
        })
    );
}
