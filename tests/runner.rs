use core::cell::RefCell;
use core::convert::Infallible;
use embassy_combo_button::{
    channel::{ChannelPointerSource, PointerEventChannel},
    Button, Callbacks, EventClassifier, Gesture, GestureConfig, GestureKind, GestureRunner,
    PointerEvent,
};
use embassy_sync::{
    blocking_mutex::raw::CriticalSectionRawMutex, pubsub::PubSubChannel, signal::Signal,
};
use embassy_time::{Duration, Instant, Timer};

use Button::{Primary, Secondary};

type Record<'a> = dyn Fn(Gesture) -> Result<(), Infallible> + 'a;

fn recording<'a>(record: &'a Record<'a>) -> Callbacks<'a> {
    GestureKind::ALL
        .iter()
        .fold(Callbacks::new(), |callbacks, &kind| callbacks.on(kind, record))
}

// 缩短时间窗口以加快测试
fn fast_config() -> GestureConfig {
    GestureConfig::default()
        .with_hold_window(Duration::from_millis(200))
        .with_tick_interval(Duration::from_millis(20))
}

#[tokio::test]
async fn test_runner_classifies_channel_events() {
    static CHANNEL: PointerEventChannel<8, 1, 1> = PubSubChannel::new();
    static DETACH: Signal<CriticalSectionRawMutex, ()> = Signal::new();

    let log = RefCell::new(Vec::new());
    let record = |g: Gesture| -> Result<(), Infallible> {
        log.borrow_mut().push(g);
        Ok(())
    };
    let config = fast_config();
    let mut classifier = EventClassifier::new(config, recording(&record));

    let (source, factory) = ChannelPointerSource::new(&CHANNEL);
    let mut runner = GestureRunner::new(source, config.tick_interval);
    let publisher = factory.publisher();

    let host = async {
        Timer::after(Duration::from_millis(20)).await;

        // 单击
        publisher.press(Primary).await;
        Timer::after(Duration::from_millis(50)).await;
        publisher.release(Primary).await;
        Timer::after(config.combo_window + Duration::from_millis(50)).await;

        // 长按后释放
        publisher.press(Secondary).await;
        Timer::after(config.hold_window + Duration::from_millis(100)).await;
        publisher.release(Secondary).await;
        Timer::after(Duration::from_millis(50)).await;

        DETACH.signal(());
    };

    let (result, ()) = tokio::join!(runner.run(&mut classifier, &DETACH), host);
    assert_eq!(result, Ok(()));
    assert_eq!(
        *log.borrow(),
        [
            Gesture::Tap(Primary),
            Gesture::Hold(Secondary),
            Gesture::Release(Secondary),
        ]
    );

    // 注销后投递的事件不再产生回调
    assert!(!classifier.is_attached());
    let now = Instant::now();
    classifier.handle(PointerEvent::press(Primary, now)).unwrap();
    classifier
        .handle(PointerEvent::release(Primary, now + Duration::from_millis(10)))
        .unwrap();
    assert_eq!(log.borrow().len(), 3);
}

#[tokio::test]
async fn test_runner_reports_cross_combo() {
    static CHANNEL: PointerEventChannel<8, 1, 1> = PubSubChannel::new();
    static DETACH: Signal<CriticalSectionRawMutex, ()> = Signal::new();

    let log = RefCell::new(Vec::new());
    let record = |g: Gesture| -> Result<(), Infallible> {
        log.borrow_mut().push(g);
        Ok(())
    };
    let config = fast_config();
    let mut classifier = EventClassifier::new(config, recording(&record));

    let (source, factory) = ChannelPointerSource::new(&CHANNEL);
    let mut runner = GestureRunner::new(source, config.tick_interval);
    let publisher = factory.publisher();

    let host = async {
        Timer::after(Duration::from_millis(20)).await;
        let start = Instant::now();
        publisher.publish(PointerEvent::press(Secondary, start)).await;
        publisher
            .publish(PointerEvent::press(Primary, start + Duration::from_millis(120)))
            .await;
        Timer::after(Duration::from_millis(50)).await;
        DETACH.signal(());
    };

    let (result, ()) = tokio::join!(runner.run(&mut classifier, &DETACH), host);
    assert_eq!(result, Ok(()));
    assert_eq!(
        *log.borrow(),
        [Gesture::Combo {
            first: Secondary,
            second: Primary,
            elapsed: Duration::from_millis(120),
        }]
    );
}

#[tokio::test]
async fn test_runner_stops_on_handler_error() {
    static CHANNEL: PointerEventChannel<8, 1, 1> = PubSubChannel::new();
    static DETACH: Signal<CriticalSectionRawMutex, ()> = Signal::new();

    let fail = |_: Gesture| -> Result<(), &'static str> { Err("hold handler failed") };
    let config = fast_config();
    let callbacks = Callbacks::<&'static str>::new().on_primary_hold(&fail);
    let mut classifier = EventClassifier::new(config, callbacks);

    let (source, factory) = ChannelPointerSource::new(&CHANNEL);
    let mut runner = GestureRunner::new(source, config.tick_interval);
    let publisher = factory.publisher();

    let host = async {
        publisher.press(Primary).await;
    };

    let (result, ()) = tokio::join!(
        embassy_time::with_timeout(
            Duration::from_secs(1),
            runner.run(&mut classifier, &DETACH)
        ),
        host
    );
    assert_eq!(
        result.expect("Test timed out waiting for the hold tick"),
        Err("hold handler failed")
    );
    assert!(!classifier.is_attached());
    assert!(classifier.is_down(Primary));
}
