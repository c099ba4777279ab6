// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

mod common;

use common::{init_logging, Cmd, MockBoard};
use turret::app::{register_tasks, Mode};
use turret::input::Key;
use turret::motors::{Axis, HomeMode};
use turret::protocol::messages::encode_target;
use turret::protocol::ring::RX_CAPACITY;
use turret::protocol::{PixelPoint, Producer, RingBuffer, VisionLink};
use turret::sched::Scheduler;
use turret::motors::servo::PULSE_CENTER_US;
use turret::tracking::{AcqState, StopReason, QUICK_AIM, SERVO_AIM};
use turret::{Clock, TaskKind, Turret};

type Rig<'a> = Turret<'a, MockBoard, RX_CAPACITY>;

/// Drive the whole firmware loop 1 ms at a time until `until`.
///
/// A frame carrying `frame` is queued every 10 ms, and `key` says what the keypad reads.
fn run_until(
    turret: &mut Rig<'_>,
    sched: &mut Scheduler<TaskKind>,
    tx: &mut Producer<'_, RX_CAPACITY>,
    until: u32,
    frame: Option<PixelPoint>,
    key: impl Fn(u32) -> Option<Key>,
) {
    while turret.board().now_ms() < until {
        let now = turret.board().now_ms();
        turret.board_mut().held = key(now);
        if let Some(point) = frame {
            if now % 10 == 0 {
                tx.write(&encode_target(point)).unwrap();
            }
        }
        sched.tick(now, turret);
        turret.board_mut().advance(1);
    }
}

#[test]
fn key_press_runs_quick_aim_to_completion() {
    init_logging();
    let mut ring: RingBuffer<RX_CAPACITY> = RingBuffer::new();
    let (mut tx, rx) = ring.split();
    let mut turret = Turret::new(MockBoard::default(), VisionLink::new(rx));
    let mut sched: Scheduler<TaskKind> = Scheduler::new();
    register_tasks(&mut sched).unwrap();

    // Line noise before the sensor starts talking.
    tx.write(&[0x13, 0xAA, 0xF0, 0x00]).unwrap();

    let aim = QUICK_AIM.tracking.aim;
    let s1_held = |t: u32| if t < 100 { Some(Key::S1) } else { None };

    run_until(&mut turret, &mut sched, &mut tx, 60, Some(aim), s1_held);
    assert_eq!(turret.running_mode(), Some(Mode::QuickAim));
    assert!(!turret.board().indicator);

    run_until(&mut turret, &mut sched, &mut tx, 300, Some(aim), s1_held);
    assert_eq!(turret.running_mode(), None);

    let acq = turret.acquisition().unwrap();
    assert_eq!(acq.state(), AcqState::Complete);
    assert_eq!(acq.last_stop(), Some(StopReason::Completed));
    assert!(turret.board().indicator);
    assert!(turret.board().moves().is_empty());

    assert_eq!(turret.link().target(), aim);
    let stats = turret.link().stats();
    assert!(stats.frames >= 25);
    assert!(stats.skipped > 0);
}

#[test]
fn key_turn_bypasses_filter_until_stopped() {
    init_logging();
    let mut ring: RingBuffer<RX_CAPACITY> = RingBuffer::new();
    let (mut tx, rx) = ring.split();
    let mut turret = Turret::new(MockBoard::default(), VisionLink::new(rx));
    let mut sched: Scheduler<TaskKind> = Scheduler::new();
    register_tasks(&mut sched).unwrap();

    let keys = |t: u32| match t {
        0..=99 => Some(Key::S5),
        500..=599 => Some(Key::K1),
        _ => None,
    };

    run_until(&mut turret, &mut sched, &mut tx, 300, None, keys);
    assert_eq!(turret.running_mode(), Some(Mode::KeyTurn));
    assert!(!turret.link().is_filter_enabled());
    assert!(turret
        .board()
        .cmds
        .contains(&Cmd::Home(Axis::X, HomeMode::Nearest)));
    assert_eq!(turret.link().target(), PixelPoint::NONE);

    run_until(&mut turret, &mut sched, &mut tx, 700, None, keys);
    assert_eq!(turret.running_mode(), None);
    assert!(turret.link().is_filter_enabled());
    assert_eq!(
        turret.acquisition().and_then(|a| a.last_stop()),
        Some(StopReason::Requested)
    );
    // Key-turn leaves the laser on when stopped.
    assert!(turret.board().indicator);
}

#[test]
fn servo_restart_continues_from_last_pulse() {
    init_logging();
    let mut ring: RingBuffer<RX_CAPACITY> = RingBuffer::new();
    let (mut tx, rx) = ring.split();
    let mut turret = Turret::new(MockBoard::default(), VisionLink::new(rx));
    let mut sched: Scheduler<TaskKind> = Scheduler::new();
    register_tasks(&mut sched).unwrap();

    // Aim is (160, 100): 10 px right and down, so X steps down and Y steps up.
    let off = Some(PixelPoint::new(170, 110));
    let no_keys = |_: u32| None;

    turret.start(Mode::ServoAim, SERVO_AIM);
    run_until(&mut turret, &mut sched, &mut tx, 300, off, no_keys);
    let acq = turret.acquisition().unwrap();
    let (x, y) = (acq.servo_pulse(Axis::X), acq.servo_pulse(Axis::Y));
    assert!(x < PULSE_CENTER_US);
    assert!(y > PULSE_CENTER_US);

    turret.stop();
    turret.board_mut().cmds.clear();
    turret.start(Mode::ServoAim, SERVO_AIM);
    assert_eq!(turret.acquisition().unwrap().servo_pulse(Axis::X), x);

    run_until(&mut turret, &mut sched, &mut tx, 600, off, no_keys);
    let first_x = turret
        .board()
        .cmds
        .iter()
        .find_map(|c| match c {
            Cmd::Pulse(Axis::X, p) => Some(*p),
            _ => None,
        })
        .unwrap();
    let first_y = turret
        .board()
        .cmds
        .iter()
        .find_map(|c| match c {
            Cmd::Pulse(Axis::Y, p) => Some(*p),
            _ => None,
        })
        .unwrap();
    assert_eq!(first_x, x - 3);
    assert_eq!(first_y, y + 3);
}
