use embassy_time::Duration;

/// 宿主的原生事件分发器。
///
/// 识别器通过它注册/注销按下与释放通知；事件本身由宿主调用
/// [`EventClassifier::handle`](crate::EventClassifier::handle) 等入口投递。
pub trait EventSource {
    /// 开始投递事件，成功返回 `true`。
    fn register(&mut self) -> bool;

    /// 停止投递事件，成功返回 `true`。
    fn unregister(&mut self) -> bool;

    /// 在注册期间屏蔽宿主对副键的原生处理（例如右键菜单）。
    fn suppress_secondary_default(&mut self, _suppress: bool) {}
}

/// 周期性调用 `on_tick` 的轮询调度器。
pub trait TickScheduler {
    /// 以固定周期开始调度，成功返回 `true`。
    fn start(&mut self, interval: Duration) -> bool;

    /// 停止调度，成功返回 `true`。
    fn stop(&mut self) -> bool;
}
