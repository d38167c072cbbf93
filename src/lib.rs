#![no_std]
#![allow(async_fn_in_trait)]

#[macro_use]
mod fmt;

pub mod callbacks;
pub mod channel;
pub mod classifier;
pub mod config;
pub mod gpio;
pub mod host;
pub mod runner;

pub use callbacks::{Callbacks, Handler};
pub use classifier::EventClassifier;
pub use config::*;
pub use host::{EventSource, TickScheduler};
pub use runner::GestureRunner;

use embassy_time::{Duration, Instant};

/// 一个trait，抽象了所有可以异步提供带时间戳的按下/释放事件的来源。
pub trait PointerSource {
    async fn next_event(&mut self) -> PointerEvent;
}

/// 两个受支持的按键。
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Primary,
    Secondary,
}

impl Button {
    /// 主键在宿主事件中的编号。
    pub const PRIMARY_CODE: u8 = 0;
    /// 副键在宿主事件中的编号。
    pub const SECONDARY_CODE: u8 = 2;

    /// 从宿主的按键编号转换，无法识别的编号返回 `None`。
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            Self::PRIMARY_CODE => Some(Self::Primary),
            Self::SECONDARY_CODE => Some(Self::Secondary),
            _ => None,
        }
    }

    pub const fn code(self) -> u8 {
        match self {
            Self::Primary => Self::PRIMARY_CODE,
            Self::Secondary => Self::SECONDARY_CODE,
        }
    }

    pub const fn other(self) -> Self {
        match self {
            Self::Primary => Self::Secondary,
            Self::Secondary => Self::Primary,
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            Self::Primary => 0,
            Self::Secondary => 1,
        }
    }
}

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerAction {
    Press,
    Release,
}

/// 宿主投递的一次原始按键事件。
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub code: u8,
    pub action: PointerAction,
    pub timestamp: Instant,
}

impl PointerEvent {
    pub const fn press(button: Button, timestamp: Instant) -> Self {
        Self {
            code: button.code(),
            action: PointerAction::Press,
            timestamp,
        }
    }

    pub const fn release(button: Button, timestamp: Instant) -> Self {
        Self {
            code: button.code(),
            action: PointerAction::Release,
            timestamp,
        }
    }
}

/// 识别出的高层手势。
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    Tap(Button),
    Hold(Button),
    /// 长按之后的释放。
    Release(Button),
    /// `first` 按下后 `elapsed` 时间内 `second` 又被按下。
    Combo {
        first: Button,
        second: Button,
        elapsed: Duration,
    },
    BothHold,
    BothRelease,
}

impl Gesture {
    pub const fn kind(&self) -> GestureKind {
        use Button::*;
        match *self {
            Gesture::Tap(Primary) => GestureKind::PrimaryTap,
            Gesture::Tap(Secondary) => GestureKind::SecondaryTap,
            Gesture::Hold(Primary) => GestureKind::PrimaryHold,
            Gesture::Hold(Secondary) => GestureKind::SecondaryHold,
            Gesture::Release(Primary) => GestureKind::PrimaryRelease,
            Gesture::Release(Secondary) => GestureKind::SecondaryRelease,
            Gesture::Combo { first: Secondary, second: Primary, .. } => {
                GestureKind::SecondaryThenPrimaryCombo
            }
            Gesture::Combo { first: Primary, second: Secondary, .. } => {
                GestureKind::PrimaryThenSecondaryCombo
            }
            Gesture::Combo { first: Primary, second: Primary, .. } => {
                GestureKind::PrimaryThenPrimaryCombo
            }
            Gesture::Combo { first: Secondary, second: Secondary, .. } => {
                GestureKind::SecondaryThenSecondaryCombo
            }
            Gesture::BothHold => GestureKind::BothHold,
            Gesture::BothRelease => GestureKind::BothRelease,
        }
    }
}

/// 回调表的槽位，与 [`Gesture`] 一一对应。
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureKind {
    PrimaryTap,
    SecondaryTap,
    PrimaryHold,
    SecondaryHold,
    PrimaryRelease,
    SecondaryRelease,
    SecondaryThenPrimaryCombo,
    PrimaryThenSecondaryCombo,
    PrimaryThenPrimaryCombo,
    SecondaryThenSecondaryCombo,
    BothHold,
    BothRelease,
}

impl GestureKind {
    pub const COUNT: usize = 12;

    pub const ALL: [GestureKind; Self::COUNT] = [
        Self::PrimaryTap,
        Self::SecondaryTap,
        Self::PrimaryHold,
        Self::SecondaryHold,
        Self::PrimaryRelease,
        Self::SecondaryRelease,
        Self::SecondaryThenPrimaryCombo,
        Self::PrimaryThenSecondaryCombo,
        Self::PrimaryThenPrimaryCombo,
        Self::SecondaryThenSecondaryCombo,
        Self::BothHold,
        Self::BothRelease,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::PrimaryTap => "primary tap",
            Self::SecondaryTap => "secondary tap",
            Self::PrimaryHold => "primary hold",
            Self::SecondaryHold => "secondary hold",
            Self::PrimaryRelease => "primary release after hold",
            Self::SecondaryRelease => "secondary release after hold",
            Self::SecondaryThenPrimaryCombo => "secondary then primary combo",
            Self::PrimaryThenSecondaryCombo => "primary then secondary combo",
            Self::PrimaryThenPrimaryCombo => "primary then primary combo",
            Self::SecondaryThenSecondaryCombo => "secondary then secondary combo",
            Self::BothHold => "both buttons hold",
            Self::BothRelease => "both buttons release after hold",
        }
    }
}
