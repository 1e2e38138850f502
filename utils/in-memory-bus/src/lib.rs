/********************************************************************************
 * Copyright (c) 2026 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

//! In-process message bus acting as both transport and topic directory.
//!
//! Publishing never delivers inline: deliveries are queued and handed to
//! subscribers only when the owner pumps the bus with [`InMemoryBus::spin_once`],
//! mirroring a node's spin loop.

use async_trait::async_trait;
use futures::future::join_all;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, trace, warn};

use topic_relay::{
    DirectoryClient, DirectoryError, DynamicMessage, MessageEvent, MessageHandler, Publisher,
    SchemaDescriptor, SubscriptionHandle, TopicDescriptor, Transport, TransportError,
};

const IN_MEMORY_BUS_TAG: &str = "InMemoryBus:";
const IN_MEMORY_BUS_FN_PUBLISH_TAG: &str = "publish():";
const IN_MEMORY_BUS_FN_SPIN_ONCE_TAG: &str = "spin_once():";

struct Subscriber {
    handle: SubscriptionHandle,
    handler: Arc<dyn MessageHandler>,
}

struct TopicEntry {
    name: String,
    type_name: String,
    publishers: usize,
    subscribers: Vec<Subscriber>,
}

struct Delivery {
    event: MessageEvent,
    handlers: Vec<Arc<dyn MessageHandler>>,
}

struct BusInner {
    topics: Mutex<Vec<TopicEntry>>,
    directory_available: AtomicBool,
    queue_tx: UnboundedSender<Delivery>,
    queue_rx: tokio::sync::Mutex<UnboundedReceiver<Delivery>>,
}

impl BusInner {
    fn topics(&self) -> MutexGuard<'_, Vec<TopicEntry>> {
        self.topics
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Shared bus handle. Clones obtained with [`InMemoryBus::for_node`] share the
/// same topics and queue but stamp deliveries with their own caller id.
#[derive(Clone)]
pub struct InMemoryBus {
    caller_id: String,
    inner: Arc<BusInner>,
}

impl InMemoryBus {
    pub fn new(caller_id: impl Into<String>) -> Self {
        let (queue_tx, queue_rx) = mpsc::unbounded_channel();
        Self {
            caller_id: caller_id.into(),
            inner: Arc::new(BusInner {
                topics: Mutex::new(Vec::new()),
                directory_available: AtomicBool::new(true),
                queue_tx,
                queue_rx: tokio::sync::Mutex::new(queue_rx),
            }),
        }
    }

    /// Another participant on the same bus.
    pub fn for_node(&self, caller_id: impl Into<String>) -> Self {
        Self {
            caller_id: caller_id.into(),
            inner: self.inner.clone(),
        }
    }

    pub fn caller_id(&self) -> &str {
        &self.caller_id
    }

    /// Makes directory queries fail while `false`.
    pub fn set_directory_available(&self, available: bool) {
        self.inner
            .directory_available
            .store(available, Ordering::Release);
    }

    /// Handles of every subscription currently attached to `topic`.
    pub fn subscriptions(&self, topic: &str) -> Vec<SubscriptionHandle> {
        self.inner
            .topics()
            .iter()
            .find(|entry| entry.name == topic)
            .map(|entry| {
                entry
                    .subscribers
                    .iter()
                    .map(|subscriber| subscriber.handle.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.subscriptions(topic).len()
    }

    /// Waits up to `timeout` for the first queued delivery, then drains every
    /// delivery already queued without waiting further. Returns how many
    /// deliveries were dispatched.
    pub async fn spin_once(&self, timeout: Duration) -> usize {
        let mut queue = self.inner.queue_rx.lock().await;

        let first = match tokio::time::timeout(timeout, queue.recv()).await {
            Ok(Some(delivery)) => delivery,
            Ok(None) | Err(_) => return 0,
        };

        let mut batch = vec![first];
        while let Ok(delivery) = queue.try_recv() {
            batch.push(delivery);
        }
        drop(queue);

        let dispatched = batch.len();
        for delivery in batch {
            trace!(
                "{}:{} delivering {} to {} handler(s)",
                IN_MEMORY_BUS_TAG,
                IN_MEMORY_BUS_FN_SPIN_ONCE_TAG,
                delivery.event.topic,
                delivery.handlers.len()
            );
            join_all(
                delivery
                    .handlers
                    .iter()
                    .map(|handler| handler.on_message(delivery.event.clone())),
            )
            .await;
        }
        dispatched
    }

    fn check_type(entry: &TopicEntry, type_name: &str) -> Result<(), TransportError> {
        if entry.type_name != type_name {
            return Err(TransportError::TypeMismatch {
                topic: entry.name.clone(),
                expected: entry.type_name.clone(),
                actual: type_name.to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl Transport for InMemoryBus {
    async fn subscribe(
        &self,
        topic: &str,
        schema: Arc<SchemaDescriptor>,
        handler: Arc<dyn MessageHandler>,
    ) -> Result<SubscriptionHandle, TransportError> {
        let mut topics = self.inner.topics();
        let handle = SubscriptionHandle::new(topic);

        match topics.iter_mut().find(|entry| entry.name == topic) {
            Some(entry) => {
                Self::check_type(entry, &schema.type_name)?;
                entry.subscribers.push(Subscriber {
                    handle: handle.clone(),
                    handler,
                });
            }
            None => topics.push(TopicEntry {
                name: topic.to_string(),
                type_name: schema.type_name.clone(),
                publishers: 0,
                subscribers: vec![Subscriber {
                    handle: handle.clone(),
                    handler,
                }],
            }),
        }

        debug!(
            "{}: {} subscribed to {} ({})",
            IN_MEMORY_BUS_TAG, self.caller_id, topic, handle.id
        );
        Ok(handle)
    }

    async fn advertise(
        &self,
        topic: &str,
        schema: Arc<SchemaDescriptor>,
    ) -> Result<Arc<dyn Publisher>, TransportError> {
        let mut topics = self.inner.topics();

        match topics.iter_mut().find(|entry| entry.name == topic) {
            Some(entry) => {
                Self::check_type(entry, &schema.type_name)?;
                entry.publishers += 1;
            }
            None => topics.push(TopicEntry {
                name: topic.to_string(),
                type_name: schema.type_name.clone(),
                publishers: 1,
                subscribers: Vec::new(),
            }),
        }

        debug!(
            "{}: {} advertised {} [{}]",
            IN_MEMORY_BUS_TAG, self.caller_id, topic, schema.type_name
        );
        Ok(Arc::new(BusPublisher {
            topic: topic.to_string(),
            schema,
            caller_id: self.caller_id.clone(),
            inner: self.inner.clone(),
        }))
    }
}

#[async_trait]
impl DirectoryClient for InMemoryBus {
    async fn list_topics(
        &self,
        namespace_filter: &str,
    ) -> Result<Vec<TopicDescriptor>, DirectoryError> {
        if !self.inner.directory_available.load(Ordering::Acquire) {
            return Err(DirectoryError::Unavailable(
                "in-memory directory switched off".to_string(),
            ));
        }

        Ok(self
            .inner
            .topics()
            .iter()
            .filter(|entry| entry.publishers > 0)
            .filter(|entry| in_namespace(&entry.name, namespace_filter))
            .map(|entry| TopicDescriptor::new(entry.name.clone(), entry.type_name.clone()))
            .collect())
    }
}

/// `name` is `namespace` itself or lies below it. An empty namespace holds
/// every topic.
fn in_namespace(name: &str, namespace: &str) -> bool {
    let namespace = namespace.trim_end_matches('/');
    if namespace.is_empty() {
        return true;
    }
    name == namespace
        || name
            .strip_prefix(namespace)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Publisher returned by [`InMemoryBus::advertise`]. Dropping the last
/// publisher of a topic removes it from the directory listing.
pub struct BusPublisher {
    topic: String,
    schema: Arc<SchemaDescriptor>,
    caller_id: String,
    inner: Arc<BusInner>,
}

#[async_trait]
impl Publisher for BusPublisher {
    fn topic(&self) -> &str {
        &self.topic
    }

    async fn publish(&self, payload: DynamicMessage) -> Result<(), TransportError> {
        if payload.type_name() != self.schema.type_name {
            return Err(TransportError::TypeMismatch {
                topic: self.topic.clone(),
                expected: self.schema.type_name.clone(),
                actual: payload.type_name().to_string(),
            });
        }

        let handlers: Vec<Arc<dyn MessageHandler>> = self
            .inner
            .topics()
            .iter()
            .find(|entry| entry.name == self.topic)
            .map(|entry| {
                entry
                    .subscribers
                    .iter()
                    .map(|subscriber| subscriber.handler.clone())
                    .collect()
            })
            .unwrap_or_default();

        if handlers.is_empty() {
            trace!(
                "{}:{} no subscribers on {}",
                IN_MEMORY_BUS_TAG,
                IN_MEMORY_BUS_FN_PUBLISH_TAG,
                self.topic
            );
            return Ok(());
        }

        let event = MessageEvent::new(self.topic.clone(), payload).with_publisher(&self.caller_id);
        self.inner
            .queue_tx
            .send(Delivery { event, handlers })
            .map_err(|_| TransportError::Closed)
    }
}

impl Drop for BusPublisher {
    fn drop(&mut self) {
        let mut topics = self.inner.topics();
        match topics.iter_mut().find(|entry| entry.name == self.topic) {
            Some(entry) => entry.publishers = entry.publishers.saturating_sub(1),
            None => warn!(
                "{}: publisher dropped for unknown topic {}",
                IN_MEMORY_BUS_TAG, self.topic
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::InMemoryBus;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use topic_relay::{
        DirectoryClient, DynamicMessage, MessageEvent, MessageHandler, SchemaDescriptor,
        TopicDescriptor, Transport, TransportError,
    };

    #[derive(Default)]
    struct CollectingHandler {
        events: Mutex<Vec<MessageEvent>>,
    }

    impl CollectingHandler {
        fn topics(&self) -> Vec<String> {
            self.events
                .lock()
                .expect("lock events")
                .iter()
                .map(|event| event.topic.clone())
                .collect()
        }
    }

    #[async_trait]
    impl MessageHandler for CollectingHandler {
        async fn on_message(&self, event: MessageEvent) {
            self.events.lock().expect("lock events").push(event);
        }
    }

    fn schema(type_name: &str) -> Arc<SchemaDescriptor> {
        Arc::new(SchemaDescriptor::new(type_name, Vec::new()))
    }

    #[tokio::test]
    async fn directory_lists_only_published_topics_in_advertise_order() {
        let bus = InMemoryBus::new("/test");
        let handler = Arc::new(CollectingHandler::default());
        let _b = bus.advertise("/b", schema("T")).await.expect("advertise /b");
        bus.subscribe("/only_subscribed", schema("T"), handler)
            .await
            .expect("subscribe");
        let _a = bus.advertise("/a", schema("U")).await.expect("advertise /a");

        let topics = bus.list_topics("").await.expect("directory up");
        assert_eq!(
            topics,
            vec![TopicDescriptor::new("/b", "T"), TopicDescriptor::new("/a", "U")]
        );

        let filtered = bus.list_topics("/a").await.expect("directory up");
        assert_eq!(filtered, vec![TopicDescriptor::new("/a", "U")]);
    }

    #[tokio::test]
    async fn namespace_filter_matches_whole_path_segments() {
        let bus = InMemoryBus::new("/test");
        let _odom = bus.advertise("/robot/odom", schema("T")).await.expect("advertise");
        let _other = bus.advertise("/robot2/odom", schema("T")).await.expect("advertise");
        let _root = bus.advertise("/robot", schema("T")).await.expect("advertise");

        let names = |topics: Vec<TopicDescriptor>| {
            topics.into_iter().map(|topic| topic.name).collect::<Vec<_>>()
        };

        assert_eq!(
            names(bus.list_topics("/robot").await.expect("directory up")),
            vec!["/robot/odom".to_string(), "/robot".to_string()]
        );
        assert_eq!(
            names(bus.list_topics("/robot/").await.expect("directory up")),
            vec!["/robot/odom".to_string(), "/robot".to_string()]
        );
        assert_eq!(bus.list_topics("/").await.expect("directory up").len(), 3);
        assert_eq!(bus.list_topics("").await.expect("directory up").len(), 3);
    }

    #[tokio::test]
    async fn dropped_publisher_disappears_from_directory() {
        let bus = InMemoryBus::new("/test");
        let publisher = bus.advertise("/gone", schema("T")).await.expect("advertise");
        assert_eq!(bus.list_topics("").await.expect("directory up").len(), 1);

        drop(publisher);
        assert!(bus.list_topics("").await.expect("directory up").is_empty());
    }

    #[tokio::test]
    async fn switched_off_directory_fails_queries() {
        let bus = InMemoryBus::new("/test");
        bus.set_directory_available(false);
        assert!(bus.list_topics("").await.is_err());
        bus.set_directory_available(true);
        assert!(bus.list_topics("").await.is_ok());
    }

    #[tokio::test]
    async fn deliveries_wait_for_spin_once() {
        let bus = InMemoryBus::new("/listener");
        let talker = bus.for_node("/talker");
        let handler = Arc::new(CollectingHandler::default());
        bus.subscribe("/chatter", schema("std_msgs/String"), handler.clone())
            .await
            .expect("subscribe");
        let publisher = talker
            .advertise("/chatter", schema("std_msgs/String"))
            .await
            .expect("advertise");

        for n in 0..3 {
            publisher
                .publish(DynamicMessage::new(
                    schema("std_msgs/String"),
                    json!({ "data": format!("hello {n}") }),
                ))
                .await
                .expect("publish");
        }
        assert!(handler.topics().is_empty());

        assert_eq!(bus.spin_once(Duration::from_millis(10)).await, 3);
        assert_eq!(handler.topics(), vec!["/chatter"; 3]);
        let events = handler.events.lock().expect("lock events");
        assert_eq!(events[0].publisher.as_deref(), Some("/talker"));
    }

    #[tokio::test]
    async fn spin_once_returns_zero_after_timeout() {
        let bus = InMemoryBus::new("/listener");
        assert_eq!(bus.spin_once(Duration::from_millis(5)).await, 0);
    }

    #[tokio::test]
    async fn mismatched_types_are_rejected() {
        let bus = InMemoryBus::new("/test");
        let publisher = bus.advertise("/typed", schema("A")).await.expect("advertise");

        let subscribe = bus
            .subscribe("/typed", schema("B"), Arc::new(CollectingHandler::default()))
            .await;
        assert!(matches!(subscribe, Err(TransportError::TypeMismatch { .. })));

        let publish = publisher
            .publish(DynamicMessage::new(schema("B"), json!({})))
            .await;
        assert!(matches!(publish, Err(TransportError::TypeMismatch { .. })));
    }
}
