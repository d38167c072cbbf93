use embassy_futures::select::{select, Either};
use embassy_time::Instant;
use embedded_hal::digital::InputPin;
use embedded_hal_async::digital::Wait;

use crate::{Button, PointerEvent, PointerSource};

/// 定义GPIO按钮的有效电平。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActiveLevel {
    /// 低电平有效（例如，使用上拉电阻，按下时引脚接地）。
    Low,
    /// 高电平有效（例如，使用下拉电阻，按下时引脚接VCC）。
    High,
}

/// 由两个GPIO输入引脚驱动的双键事件源。
///
/// 记录每个引脚上一次报告的状态，并等待任一引脚到达相反电平，
/// 因此一次检测到的变化只会报告一次。
pub struct GpioPointerSource<P, S> {
    primary: P,
    secondary: S,
    active_level: ActiveLevel,
    pressed: [bool; 2],
}

impl<P: InputPin, S: InputPin> GpioPointerSource<P, S> {
    /// 创建一个新的GPIO双键事件源，初始认为两个按键均未按下。
    ///
    /// # 参数
    /// * `primary` / `secondary`: 主键与副键的引脚。
    /// * `active_level`: 按下时的有效电平，两个引脚共用。
    pub fn new(primary: P, secondary: S, active_level: ActiveLevel) -> Self {
        Self {
            primary,
            secondary,
            active_level,
            pressed: [false; 2],
        }
    }
}

async fn wait_for_state<W: Wait>(pin: &mut W, active_level: ActiveLevel, pressed: bool) {
    let want_high = matches!(
        (active_level, pressed),
        (ActiveLevel::High, true) | (ActiveLevel::Low, false)
    );
    if want_high {
        pin.wait_for_high().await.unwrap_or_default()
    } else {
        pin.wait_for_low().await.unwrap_or_default()
    }
}

impl<P, S> PointerSource for GpioPointerSource<P, S>
where
    P: InputPin + Wait,
    S: InputPin + Wait,
{
    async fn next_event(&mut self) -> PointerEvent {
        let [primary_pressed, secondary_pressed] = self.pressed;
        let changed = match select(
            wait_for_state(&mut self.primary, self.active_level, !primary_pressed),
            wait_for_state(&mut self.secondary, self.active_level, !secondary_pressed),
        )
        .await
        {
            Either::First(_) => Button::Primary,
            Either::Second(_) => Button::Secondary,
        };

        let pressed = !self.pressed[changed.index()];
        self.pressed[changed.index()] = pressed;
        let now = Instant::now();
        if pressed {
            PointerEvent::press(changed, now)
        } else {
            PointerEvent::release(changed, now)
        }
    }
}
