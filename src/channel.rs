use embassy_sync::{
    blocking_mutex::raw::CriticalSectionRawMutex,
    pubsub::{PubSubChannel, Publisher, Subscriber},
};
use embassy_time::Instant;

use crate::{Button, PointerEvent, PointerSource};

pub type PointerEventChannel<const MSG_CAP: usize, const SUBS: usize, const PUBS: usize> =
    PubSubChannel<CriticalSectionRawMutex, PointerEvent, MSG_CAP, SUBS, PUBS>;
type PointerEventPublisher<'a, const MSG_CAP: usize, const SUBS: usize, const PUBS: usize> =
    Publisher<'a, CriticalSectionRawMutex, PointerEvent, MSG_CAP, SUBS, PUBS>;
type PointerEventSubscriber<'a, const MSG_CAP: usize, const SUBS: usize, const PUBS: usize> =
    Subscriber<'a, CriticalSectionRawMutex, PointerEvent, MSG_CAP, SUBS, PUBS>;

/// 【宿主端】可被克隆并在程序各处使用，用于投递原始按键事件。
#[derive(Clone)]
pub struct PointerPublisherFactory<'a, const MSG_CAP: usize, const SUBS: usize, const PUBS: usize>
{
    channel: &'a PointerEventChannel<MSG_CAP, SUBS, PUBS>,
}

impl<'a, const MSG_CAP: usize, const SUBS: usize, const PUBS: usize>
    PointerPublisherFactory<'a, MSG_CAP, SUBS, PUBS>
{
    /// 创建一个新的发布者。
    ///
    /// 发布者数量超过 `PUBS` 属于配置错误，会直接 panic。
    pub fn publisher(&self) -> PointerPublisher<'a, MSG_CAP, SUBS, PUBS> {
        PointerPublisher {
            publisher: self.channel.publisher().unwrap(),
        }
    }
}

pub struct PointerPublisher<'a, const MSG_CAP: usize, const SUBS: usize, const PUBS: usize> {
    publisher: PointerEventPublisher<'a, MSG_CAP, SUBS, PUBS>,
}

impl<const MSG_CAP: usize, const SUBS: usize, const PUBS: usize>
    PointerPublisher<'_, MSG_CAP, SUBS, PUBS>
{
    pub async fn publish(&self, event: PointerEvent) {
        self.publisher.publish(event).await;
    }

    /// 以当前时间投递一次按下。
    pub async fn press(&self, button: Button) {
        self.publish(PointerEvent::press(button, Instant::now())).await;
    }

    /// 以当前时间投递一次释放。
    pub async fn release(&self, button: Button) {
        self.publish(PointerEvent::release(button, Instant::now())).await;
    }
}

/// 【识别端】从通道中读取事件的 [`PointerSource`]。
pub struct ChannelPointerSource<'a, const MSG_CAP: usize, const SUBS: usize, const PUBS: usize> {
    subscriber: PointerEventSubscriber<'a, MSG_CAP, SUBS, PUBS>,
}

impl<'a, const MSG_CAP: usize, const SUBS: usize, const PUBS: usize>
    ChannelPointerSource<'a, MSG_CAP, SUBS, PUBS>
{
    /// 创建一个通道事件源及其关联的发布者工厂。
    ///
    /// # 返回
    /// 一个元组，包含:
    /// - `ChannelPointerSource`: 交给 [`GestureRunner`](crate::GestureRunner) 使用。
    /// - `PointerPublisherFactory`: 宿主用它投递事件。
    pub fn new(
        channel: &'a PointerEventChannel<MSG_CAP, SUBS, PUBS>,
    ) -> (Self, PointerPublisherFactory<'a, MSG_CAP, SUBS, PUBS>) {
        let source = Self {
            subscriber: channel.subscriber().unwrap(),
        };
        (source, PointerPublisherFactory { channel })
    }
}

impl<const MSG_CAP: usize, const SUBS: usize, const PUBS: usize> PointerSource
    for ChannelPointerSource<'_, MSG_CAP, SUBS, PUBS>
{
    async fn next_event(&mut self) -> PointerEvent {
        self.subscriber.next_message_pure().await
    }
}
