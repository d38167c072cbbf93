use core::convert::Infallible;

use crate::{Gesture, GestureKind};

/// 手势处理函数。返回 `Err` 时错误会原样从触发它的入口传出。
pub type Handler<'a, E = Infallible> = &'a dyn Fn(Gesture) -> Result<(), E>;

/// 回调表：每种手势一个可选槽位。
///
/// 未设置的槽位在分发时回退到内置的诊断输出，直接按下标查找。
pub struct Callbacks<'a, E = Infallible> {
    slots: [Option<Handler<'a, E>>; GestureKind::COUNT],
}

impl<E> Default for Callbacks<'_, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, E> Callbacks<'a, E> {
    /// 创建一个所有槽位均为默认诊断输出的回调表。
    pub const fn new() -> Self {
        Self {
            slots: [None; GestureKind::COUNT],
        }
    }

    /// 为某种手势设置处理函数。
    pub fn on(mut self, kind: GestureKind, handler: Handler<'a, E>) -> Self {
        self.slots[kind as usize] = Some(handler);
        self
    }

    /// 替换（或用 `None` 清除）某个槽位。
    pub fn set(&mut self, kind: GestureKind, handler: Option<Handler<'a, E>>) {
        self.slots[kind as usize] = handler;
    }

    pub fn is_set(&self, kind: GestureKind) -> bool {
        self.slots[kind as usize].is_some()
    }

    pub fn on_primary_tap(self, handler: Handler<'a, E>) -> Self {
        self.on(GestureKind::PrimaryTap, handler)
    }

    pub fn on_secondary_tap(self, handler: Handler<'a, E>) -> Self {
        self.on(GestureKind::SecondaryTap, handler)
    }

    pub fn on_primary_hold(self, handler: Handler<'a, E>) -> Self {
        self.on(GestureKind::PrimaryHold, handler)
    }

    pub fn on_secondary_hold(self, handler: Handler<'a, E>) -> Self {
        self.on(GestureKind::SecondaryHold, handler)
    }

    pub fn on_primary_release(self, handler: Handler<'a, E>) -> Self {
        self.on(GestureKind::PrimaryRelease, handler)
    }

    pub fn on_secondary_release(self, handler: Handler<'a, E>) -> Self {
        self.on(GestureKind::SecondaryRelease, handler)
    }

    pub fn on_secondary_then_primary_combo(self, handler: Handler<'a, E>) -> Self {
        self.on(GestureKind::SecondaryThenPrimaryCombo, handler)
    }

    pub fn on_primary_then_secondary_combo(self, handler: Handler<'a, E>) -> Self {
        self.on(GestureKind::PrimaryThenSecondaryCombo, handler)
    }

    pub fn on_primary_then_primary_combo(self, handler: Handler<'a, E>) -> Self {
        self.on(GestureKind::PrimaryThenPrimaryCombo, handler)
    }

    pub fn on_secondary_then_secondary_combo(self, handler: Handler<'a, E>) -> Self {
        self.on(GestureKind::SecondaryThenSecondaryCombo, handler)
    }

    pub fn on_both_hold(self, handler: Handler<'a, E>) -> Self {
        self.on(GestureKind::BothHold, handler)
    }

    pub fn on_both_release(self, handler: Handler<'a, E>) -> Self {
        self.on(GestureKind::BothRelease, handler)
    }

    /// 同步调用手势对应的处理函数，未设置时输出诊断日志。
    pub fn dispatch(&self, gesture: Gesture) -> Result<(), E> {
        match self.slots[gesture.kind() as usize] {
            Some(handler) => handler(gesture),
            None => {
                trace_default(gesture);
                Ok(())
            }
        }
    }
}

fn trace_default(gesture: Gesture) {
    match gesture {
        Gesture::Combo { elapsed, .. } => {
            diag!("{} detected ({} ms)", gesture.kind().name(), elapsed.as_millis())
        }
        _ => diag!("{} detected", gesture.kind().name()),
    }
}
