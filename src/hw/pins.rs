// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Pin definitions for the STM32F7 turret controller.

use stm32f7xx_hal::{
    gpio::{gpioa, gpiob, gpiod, gpioe, Alternate, Input, Output, PullUp, PushPull},
    pac,
    prelude::*,
};

/// All board pins. Construct this once at startup using:
///
/// ```rust
/// let pins = BoardPins::new(dp.GPIOA, dp.GPIOB, dp.GPIOD, dp.GPIOE);
/// ```
pub struct BoardPins {
    pub laser: gpiod::PD10<Output<PushPull>>,
    pub stepper_bus: Usart1Pins,
    pub vision: Usart2Pins,
    pub debug: Usart3Pins,
    pub keys: KeypadPins,
}

/// Emm_V5 stepper bus
pub struct Usart1Pins {
    pub tx: gpioa::PA9<Alternate<7>>,
    pub rx: gpioa::PA10<Alternate<7>>,
}

/// Vision sensor link
pub struct Usart2Pins {
    pub tx: gpioa::PA2<Alternate<7>>,
    pub rx: gpioa::PA3<Alternate<7>>,
}

/// Debug terminal
pub struct Usart3Pins {
    pub tx: gpiob::PB10<Alternate<7>>,
    pub rx: gpiob::PB11<Alternate<7>>,
}

/// Operator keys, active low with internal pull-ups.
pub struct KeypadPins {
    pub s1: gpioe::PE0<Input<PullUp>>,
    pub s2: gpioe::PE1<Input<PullUp>>,
    pub s3: gpioe::PE2<Input<PullUp>>,
    pub s4: gpioe::PE3<Input<PullUp>>,
    pub s5: gpioe::PE4<Input<PullUp>>,
    pub s6: gpioe::PE5<Input<PullUp>>,
    pub s7: gpioe::PE6<Input<PullUp>>,
    pub s8: gpioe::PE7<Input<PullUp>>,
    pub k0: gpioe::PE8<Input<PullUp>>,
    pub k1: gpioe::PE9<Input<PullUp>>,
}

impl BoardPins {
    pub fn new(gpioa: pac::GPIOA, gpiob: pac::GPIOB, gpiod: pac::GPIOD, gpioe: pac::GPIOE) -> Self {
        let gpioa = gpioa.split();
        let gpiob = gpiob.split();
        let gpiod = gpiod.split();
        let gpioe = gpioe.split();

        Self {
            laser: gpiod.pd10.into_push_pull_output(),

            stepper_bus: Usart1Pins {
                tx: gpioa.pa9.into_alternate::<7>(),
                rx: gpioa.pa10.into_alternate::<7>(),
            },

            vision: Usart2Pins {
                tx: gpioa.pa2.into_alternate::<7>(),
                rx: gpioa.pa3.into_alternate::<7>(),
            },

            debug: Usart3Pins {
                tx: gpiob.pb10.into_alternate::<7>(),
                rx: gpiob.pb11.into_alternate::<7>(),
            },

            keys: KeypadPins {
                s1: gpioe.pe0.into_pull_up_input(),
                s2: gpioe.pe1.into_pull_up_input(),
                s3: gpioe.pe2.into_pull_up_input(),
                s4: gpioe.pe3.into_pull_up_input(),
                s5: gpioe.pe4.into_pull_up_input(),
                s6: gpioe.pe5.into_pull_up_input(),
                s7: gpioe.pe6.into_pull_up_input(),
                s8: gpioe.pe7.into_pull_up_input(),
                k0: gpioe.pe8.into_pull_up_input(),
                k1: gpioe.pe9.into_pull_up_input(),
            },
        }
    }
}
