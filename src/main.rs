// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Turret firmware entry point.
//!
//! - USART1: Emm_V5 stepper bus
//! - USART2: vision sensor, RX interrupt feeds the ring buffer
//! - USART3: debug log
//! - SysTick: 1 kHz millisecond clock

#![no_main]
#![no_std]

use core::cell::RefCell;

use cortex_m::interrupt::{free, Mutex};
use cortex_m::peripheral::NVIC;
use cortex_m_rt::{entry, exception};
use log::{info, warn, LevelFilter};
use panic_halt as _;

use hal::{
    interrupt, pac,
    prelude::*,
    serial::{self, Config, Rx, Serial},
};
use stm32f7xx_hal as hal;

use turret::app::{register_tasks, TaskKind, Turret};
use turret::drivers::EmmV5;
use turret::hw::{self, ActiveLevel, BoardPins, Keypad, Laser, Rig, SysTickClock, Usart};
use turret::motors::Axis;
use turret::protocol::ring::{Producer, RingBuffer, RX_CAPACITY};
use turret::protocol::VisionLink;
use turret::sched::Scheduler;
use turret::time::Clock;

const DEBUG_BAUD: u32 = 115_200;
const STEPPER_BAUD: u32 = 115_200;
const VISION_BAUD: u32 = 115_200;

const LOG_LEVEL: LevelFilter = if cfg!(debug_assertions) {
    LevelFilter::Debug
} else {
    LevelFilter::Info
};

type VisionRx = (Rx<pac::USART2>, Producer<'static, RX_CAPACITY>);

static VISION_RX: Mutex<RefCell<Option<VisionRx>>> = Mutex::new(RefCell::new(None));

#[entry]
fn main() -> ! {
    // Peripherals
    let dp = pac::Peripherals::take().unwrap();
    let cp = cortex_m::Peripherals::take().unwrap();

    // Clocks
    let rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.freeze();

    let pins = BoardPins::new(dp.GPIOA, dp.GPIOB, dp.GPIOD, dp.GPIOE);

    // USART3 (DBG)
    let debug = Serial::new(
        dp.USART3,
        (pins.debug.tx, pins.debug.rx),
        &clocks,
        Config {
            baud_rate: DEBUG_BAUD.bps(),
            ..Default::default()
        },
    );
    match hw::logger::init(Usart::new(debug), LOG_LEVEL) {
        Ok(()) => info!("turret firmware starting"),
        // Fails only if a logger is already installed, and this is the only install site.
        Err(_) => {}
    }

    // USART1 (stepper bus)
    let stepper_bus = Serial::new(
        dp.USART1,
        (pins.stepper_bus.tx, pins.stepper_bus.rx),
        &clocks,
        Config {
            baud_rate: STEPPER_BAUD.bps(),
            ..Default::default()
        },
    );
    let mut drive = EmmV5::new(Usart::new(stepper_bus));
    for axis in [Axis::X, Axis::Y] {
        let _ = drive.enable(axis, true);
    }

    // USART2 (vision, interrupt-driven RX)
    let ring: &'static mut RingBuffer<RX_CAPACITY> =
        cortex_m::singleton!(: RingBuffer<RX_CAPACITY> = RingBuffer::new()).unwrap();
    let (producer, consumer) = ring.split();

    let mut vision = Serial::new(
        dp.USART2,
        (pins.vision.tx, pins.vision.rx),
        &clocks,
        Config {
            baud_rate: VISION_BAUD.bps(),
            ..Default::default()
        },
    );
    vision.listen(serial::Event::Rxne);
    let (_vision_tx, vision_rx) = Usart::with_rx(vision);
    free(|cs| VISION_RX.borrow(cs).replace(Some((vision_rx, producer))));
    unsafe { NVIC::unmask(pac::Interrupt::USART2) };

    let rig = Rig {
        drive,
        laser: Laser::new(pins.laser, ActiveLevel::High),
        keypad: Keypad::new(pins.keys),
        clock: SysTickClock::start(cp.SYST, &clocks),
    };

    let mut turret = Turret::new(rig, VisionLink::new(consumer));
    let mut scheduler: Scheduler<TaskKind> = Scheduler::new();
    if let Err(e) = register_tasks(&mut scheduler) {
        warn!("task registration failed: {}", e);
    }
    scheduler.log_table(turret.board().now_ms());

    loop {
        let now = turret.board().now_ms();
        scheduler.tick(now, &mut turret);
    }
}

#[exception]
fn SysTick() {
    hw::clock::tick();
}

#[interrupt]
fn USART2() {
    free(|cs| {
        let mut slot = VISION_RX.borrow(cs).borrow_mut();
        let Some((rx, producer)) = slot.as_mut() else {
            return;
        };

        let mut buf = [0u8; 16];
        let mut n = 0;
        while n < buf.len() {
            match rx.read() {
                Ok(b) => {
                    buf[n] = b;
                    n += 1;
                }
                Err(_) => break,
            }
        }
        if let Err(e) = producer.write(&buf[..n]) {
            warn!("vision rx dropped: {}", e);
        }
    });
}
