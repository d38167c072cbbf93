use embassy_time::Duration;

/// 点击判定窗口。按下后在此时间内释放（且未报告长按）才算一次点击，不可配置。
pub const TAP_WINDOW: Duration = Duration::from_millis(150);

/// 定义手势识别逻辑的通用配置参数。
///
/// 所有选项彼此独立，库不会校验它们之间的大小关系
/// （例如 `combo_window` 大于 `hold_window` 也会被原样接受）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GestureConfig {
    /// 组合键时间窗口。
    ///
    /// 两次按下（同一按键或不同按键）的间隔严格小于此值时，
    /// 第二次按下会触发组合事件。
    pub combo_window: Duration,

    /// 触发长按事件所需的持续时间。
    ///
    /// 由周期性 tick 检测，按下时长达到（`>=`）此值即报告长按。
    pub hold_window: Duration,

    /// 是否启用主键连按组合（主键 → 主键）。
    pub enable_same_primary_combo: bool,

    /// 是否启用副键连按组合（副键 → 副键）。
    pub enable_same_secondary_combo: bool,

    /// 完成组合的那次按下在释放时不再报告点击。
    pub suppress_tap_after_combo: bool,

    /// 启用双键长按 / 双键长按释放事件。
    ///
    /// 只有通过跨键组合按下的双键才会参与检测，计时从完成组合的那次按下开始。
    pub enable_combined_hold: bool,

    /// 轮询调度器调用 `on_tick` 的周期。
    pub tick_interval: Duration,
}

impl Default for GestureConfig {
    /// 提供一套合理的默认配置。
    ///
    /// - 组合窗口: 350ms
    /// - 长按阈值: 1000ms
    /// - 同键组合: 主副键均启用
    /// - 组合后抑制点击: 关闭
    /// - 双键长按: 关闭
    /// - 轮询周期: 100ms
    fn default() -> Self {
        Self {
            combo_window: Duration::from_millis(350),
            hold_window: Duration::from_millis(1000),
            enable_same_primary_combo: true,
            enable_same_secondary_combo: true,
            suppress_tap_after_combo: false,
            enable_combined_hold: false,
            tick_interval: Duration::from_millis(100),
        }
    }
}

impl GestureConfig {
    pub const fn with_combo_window(mut self, window: Duration) -> Self {
        self.combo_window = window;
        self
    }

    pub const fn with_hold_window(mut self, time: Duration) -> Self {
        self.hold_window = time;
        self
    }

    pub const fn with_same_primary_combo(mut self, enabled: bool) -> Self {
        self.enable_same_primary_combo = enabled;
        self
    }

    pub const fn with_same_secondary_combo(mut self, enabled: bool) -> Self {
        self.enable_same_secondary_combo = enabled;
        self
    }

    pub const fn with_tap_suppressed_after_combo(mut self, enabled: bool) -> Self {
        self.suppress_tap_after_combo = enabled;
        self
    }

    pub const fn with_combined_hold(mut self, enabled: bool) -> Self {
        self.enable_combined_hold = enabled;
        self
    }

    pub const fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// 指定按键的同键组合是否启用。
    pub const fn same_button_combo_enabled(&self, button: crate::Button) -> bool {
        match button {
            crate::Button::Primary => self.enable_same_primary_combo,
            crate::Button::Secondary => self.enable_same_secondary_combo,
        }
    }
}
