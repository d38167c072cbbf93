use embassy_futures::select::{select3, Either3};
use embassy_sync::{blocking_mutex::raw::RawMutex, signal::Signal};
use embassy_time::{Duration, Instant, Ticker};

use crate::{EventClassifier, PointerSource};

/// 【后台驱动器】把事件源和周期 tick 接到识别器上。
///
/// 运行期间识别器处于已注册状态；`detach` 信号到达后识别器转为已注销，
/// `run` 返回，此后投递的任何事件都不会再产生回调。
pub struct GestureRunner<S: PointerSource> {
    source: S,
    tick_interval: Duration,
}

impl<S: PointerSource> GestureRunner<S> {
    pub fn new(source: S, tick_interval: Duration) -> Self {
        Self {
            source,
            tick_interval,
        }
    }

    /// 运行识别循环，直到收到 `detach` 信号或某个回调返回错误。
    pub async fn run<M: RawMutex, E>(
        &mut self,
        classifier: &mut EventClassifier<'_, E>,
        detach: &Signal<M, ()>,
    ) -> Result<(), E> {
        let mut ticker = Ticker::every(self.tick_interval);
        classifier.enter_attached();
        let result = loop {
            match select3(self.source.next_event(), ticker.next(), detach.wait()).await {
                Either3::First(event) => {
                    if let Err(e) = classifier.handle(event) {
                        break Err(e);
                    }
                }
                Either3::Second(_) => {
                    if let Err(e) = classifier.on_tick(Instant::now()) {
                        break Err(e);
                    }
                }
                Either3::Third(_) => break Ok(()),
            }
        };
        classifier.enter_detached();
        result
    }
}
