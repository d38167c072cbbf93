use core::convert::Infallible;

use embassy_time::Instant;

use crate::{
    callbacks::Callbacks,
    config::{GestureConfig, TAP_WINDOW},
    host::{EventSource, TickScheduler},
    Button, Gesture, PointerAction, PointerEvent,
};

/// 单个按键的状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ButtonState {
    is_down: bool,
    down_at: Instant,
    /// 只在按下期间可能为 `true`，每次按下时清除。
    hold_reported: bool,
    /// 本次按下触发了组合事件。
    completed_combo: bool,
}

impl ButtonState {
    const UP: Self = Self {
        is_down: false,
        down_at: Instant::from_ticks(0),
        hold_reported: false,
        completed_combo: false,
    };

    fn pressed(now: Instant) -> Self {
        Self {
            is_down: true,
            down_at: now,
            ..Self::UP
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ComboTracker {
    last_button: Option<Button>,
    last_press_at: Instant,
    /// 完成跨键组合的那次按下的时间。
    both_down_at: Instant,
    both_hold_reported: bool,
}

impl ComboTracker {
    const EMPTY: Self = Self {
        last_button: None,
        last_press_at: Instant::from_ticks(0),
        both_down_at: Instant::from_ticks(0),
        both_hold_reported: false,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Created,
    Attached,
    Detached,
}

/// 双键手势识别器。
///
/// 持有两个按键的状态、组合追踪状态、配置和回调表。所有状态只由
/// `on_press` / `on_release` / `on_tick` 同步修改，回调在触发它的入口内被调用。
///
/// 生命周期为 构造 → [`attach`](Self::attach) → [`detach`](Self::detach)；
/// `detach` 返回后所有入口都不再产生回调，直到再次 `attach`。
pub struct EventClassifier<'a, E = Infallible> {
    config: GestureConfig,
    callbacks: Callbacks<'a, E>,
    enabled_check: Option<&'a dyn Fn() -> bool>,
    buttons: [ButtonState; 2],
    combo: ComboTracker,
    lifecycle: Lifecycle,
}

impl<'a, E> EventClassifier<'a, E> {
    pub fn new(config: GestureConfig, callbacks: Callbacks<'a, E>) -> Self {
        Self {
            config,
            callbacks,
            enabled_check: None,
            buttons: [ButtonState::UP; 2],
            combo: ComboTracker::EMPTY,
            lifecycle: Lifecycle::Created,
        }
    }

    /// 设置在处理每个事件之前调用的判定函数，返回 `false` 时事件被静默丢弃。
    pub fn with_enabled_check(mut self, check: &'a dyn Fn() -> bool) -> Self {
        self.enabled_check = Some(check);
        self
    }

    pub fn set_enabled_check(&mut self, check: Option<&'a dyn Fn() -> bool>) {
        self.enabled_check = check;
    }

    fn accepts(&self) -> bool {
        self.lifecycle != Lifecycle::Detached && self.enabled_check.map_or(true, |check| check())
    }

    /// 处理一次按下。
    pub fn on_press(&mut self, button: Button, now: Instant) -> Result<(), E> {
        if !self.accepts() {
            return Ok(());
        }

        self.buttons[button.index()] = ButtonState::pressed(now);

        if let Some(last) = self.combo.last_button {
            let elapsed = now.saturating_duration_since(self.combo.last_press_at);
            if elapsed < self.config.combo_window {
                if last == button.other() {
                    self.buttons[button.index()].completed_combo = true;
                    self.combo.both_hold_reported = false;
                    self.callbacks.dispatch(Gesture::Combo {
                        first: last,
                        second: button,
                        elapsed,
                    })?;
                    self.combo.both_down_at = now;
                } else if self.config.same_button_combo_enabled(button) {
                    self.buttons[button.index()].completed_combo = true;
                    self.callbacks.dispatch(Gesture::Combo {
                        first: button,
                        second: button,
                        elapsed,
                    })?;
                }
            }
        }

        self.combo.last_button = Some(button);
        self.combo.last_press_at = now;
        Ok(())
    }

    /// 处理一次释放。
    ///
    /// 在点击窗口内释放报告点击，已报告长按的按键报告长按释放，
    /// 两个窗口之间的释放不产生任何事件。
    pub fn on_release(&mut self, button: Button, now: Instant) -> Result<(), E> {
        if !self.accepts() {
            return Ok(());
        }

        let slot = &mut self.buttons[button.index()];
        let state = *slot;
        slot.is_down = false;
        slot.hold_reported = false;

        let held = now.saturating_duration_since(state.down_at);
        if !state.hold_reported && held < TAP_WINDOW {
            if !(self.config.suppress_tap_after_combo && state.completed_combo) {
                self.callbacks.dispatch(Gesture::Tap(button))?;
            }
        } else if held >= self.config.hold_window && state.hold_reported {
            self.callbacks.dispatch(Gesture::Release(button))?;
        }

        if self.config.enable_combined_hold
            && self.combo.both_hold_reported
            && !self.buttons.iter().any(|b| b.is_down)
        {
            self.combo.both_hold_reported = false;
            if now.saturating_duration_since(self.combo.both_down_at) >= self.config.hold_window {
                self.callbacks.dispatch(Gesture::BothRelease)?;
            }
        }
        Ok(())
    }

    /// 周期性检查长按，由轮询调度器调用。
    pub fn on_tick(&mut self, now: Instant) -> Result<(), E> {
        if !self.accepts() {
            return Ok(());
        }

        for button in [Button::Primary, Button::Secondary] {
            let state = self.buttons[button.index()];
            let other_down = self.buttons[button.other().index()].is_down;
            if state.is_down
                && !other_down
                && !state.hold_reported
                && now.saturating_duration_since(state.down_at) >= self.config.hold_window
            {
                self.callbacks.dispatch(Gesture::Hold(button))?;
                self.buttons[button.index()].hold_reported = true;
            }
        }

        if self.config.enable_combined_hold && !self.combo.both_hold_reported {
            let [primary, secondary] = self.buttons;
            // 只有最近一次按下正是完成跨键组合的那次时，双键才算一起按住。
            let latest_press = primary.down_at.max(secondary.down_at);
            if primary.is_down
                && secondary.is_down
                && latest_press == self.combo.both_down_at
                && now.saturating_duration_since(self.combo.both_down_at)
                    >= self.config.hold_window
            {
                self.callbacks.dispatch(Gesture::BothHold)?;
                self.combo.both_hold_reported = true;
            }
        }
        Ok(())
    }

    /// 处理宿主投递的原始事件，无法识别的按键编号被忽略。
    pub fn handle(&mut self, event: PointerEvent) -> Result<(), E> {
        let Some(button) = Button::from_code(event.code) else {
            return Ok(());
        };
        match event.action {
            PointerAction::Press => self.on_press(button, event.timestamp),
            PointerAction::Release => self.on_release(button, event.timestamp),
        }
    }

    /// 向事件源和轮询调度器注册。已注册时直接返回 `true`，不会重复注册。
    pub fn attach<S, T>(&mut self, source: &mut S, scheduler: &mut T) -> bool
    where
        S: EventSource + ?Sized,
        T: TickScheduler + ?Sized,
    {
        if self.lifecycle == Lifecycle::Attached {
            return true;
        }
        if !source.register() {
            return false;
        }
        if !scheduler.start(self.config.tick_interval) {
            source.unregister();
            return false;
        }
        source.suppress_secondary_default(true);
        self.enter_attached();
        true
    }

    /// 从事件源和轮询调度器注销。返回后不会再有任何回调被触发。
    ///
    /// 注销期间的事件全部丢弃，再次注册时按键与组合状态会被重置。
    pub fn detach<S, T>(&mut self, source: &mut S, scheduler: &mut T) -> bool
    where
        S: EventSource + ?Sized,
        T: TickScheduler + ?Sized,
    {
        let was_attached = self.lifecycle == Lifecycle::Attached;
        self.enter_detached();
        if !was_attached {
            return true;
        }
        let events = source.unregister();
        source.suppress_secondary_default(false);
        let ticks = scheduler.stop();
        events && ticks
    }

    pub(crate) fn enter_attached(&mut self) {
        // 注销期间丢弃的释放事件会让按键停留在按下状态
        if self.lifecycle == Lifecycle::Detached {
            self.reset();
        }
        self.lifecycle = Lifecycle::Attached;
        debug!("gesture classifier attached");
    }

    pub(crate) fn enter_detached(&mut self) {
        self.lifecycle = Lifecycle::Detached;
        debug!("gesture classifier detached");
    }

    pub fn is_attached(&self) -> bool {
        self.lifecycle == Lifecycle::Attached
    }

    pub fn is_down(&self, button: Button) -> bool {
        self.buttons[button.index()].is_down
    }

    pub fn hold_reported(&self, button: Button) -> bool {
        self.buttons[button.index()].hold_reported
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn set_config(&mut self, new_config: GestureConfig) {
        self.config = new_config;
    }

    pub fn callbacks_mut(&mut self) -> &mut Callbacks<'a, E> {
        &mut self.callbacks
    }

    /// 重置按键与组合状态到初始空闲状态，不影响注册状态。
    pub fn reset(&mut self) {
        self.buttons = [ButtonState::UP; 2];
        self.combo = ComboTracker::EMPTY;
    }
}
