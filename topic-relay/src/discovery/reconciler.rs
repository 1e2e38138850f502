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

//! Periodic reconciliation of advertised topics against local subscriptions.

use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::context::NodeContext;
use crate::data_plane::transport::MessageHandler;
use crate::discovery::registry::SubscriptionRegistry;
use crate::message::TopicDescriptor;
use crate::observability::events;

const COMPONENT: &str = "reconciler";

/// Outcome counters for one reconciliation pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub advertised: usize,
    pub already_subscribed: usize,
    pub subscribed: usize,
    pub schema_failures: usize,
    pub subscribe_failures: usize,
    pub directory_failed: bool,
}

/// Drives the subscription registry toward one subscription per advertised
/// topic. Owns the registry; nothing else writes to it.
pub struct Reconciler {
    context: NodeContext,
    handler: Arc<dyn MessageHandler>,
    registry: SubscriptionRegistry,
}

impl Reconciler {
    /// `handler` is bound to every subscription this reconciler establishes.
    pub fn new(context: NodeContext, handler: Arc<dyn MessageHandler>) -> Self {
        Self {
            context,
            handler,
            registry: SubscriptionRegistry::new(),
        }
    }

    pub fn registry(&self) -> &SubscriptionRegistry {
        &self.registry
    }

    pub fn into_registry(self) -> SubscriptionRegistry {
        self.registry
    }

    /// Runs one pass. Failures stay inside the pass: a directory failure skips
    /// it, a schema or subscribe failure skips that topic until the next pass.
    pub async fn tick(&mut self) -> TickReport {
        let mut report = TickReport::default();
        let logger = self.context.logger.clone();

        let topics = match self
            .context
            .directory
            .list_topics(&self.context.settings.namespace_filter)
            .await
        {
            Ok(topics) => topics,
            Err(err) => {
                logger.warn(&[&"Unable to fetch published topics: ", &err]);
                warn!(
                    event = events::DIRECTORY_QUERY_FAILED,
                    component = COMPONENT,
                    err = %err,
                    "skipping reconciliation tick"
                );
                report.directory_failed = true;
                return report;
            }
        };

        report.advertised = topics.len();
        for topic in topics {
            if self.registry.has(&topic.name) {
                report.already_subscribed += 1;
                continue;
            }
            self.subscribe_unseen(topic, &mut report).await;
        }

        debug!(
            event = events::TICK_COMPLETE,
            component = COMPONENT,
            advertised = report.advertised,
            already_subscribed = report.already_subscribed,
            subscribed = report.subscribed,
            schema_failures = report.schema_failures,
            subscribe_failures = report.subscribe_failures,
            registered = self.registry.len(),
            "reconciliation tick complete"
        );
        report
    }

    async fn subscribe_unseen(&mut self, topic: TopicDescriptor, report: &mut TickReport) {
        let logger = &self.context.logger;
        logger.info(&[&"Attempting to subscribe to topic: ", &topic.name]);

        let schema = match self.context.resolver.resolve(&topic.type_name).await {
            Ok(schema) => schema,
            Err(err) => {
                logger.info(&[
                    &"Couldn't set message type: ",
                    &topic.type_name,
                    &" : Error: ",
                    &err,
                ]);
                debug!(
                    event = events::SCHEMA_RESOLVE_FAILED,
                    component = COMPONENT,
                    topic = %topic.name,
                    type_name = %topic.type_name,
                    err = %err,
                    "schema resolution failed, retrying next tick"
                );
                report.schema_failures += 1;
                return;
            }
        };

        match self
            .context
            .transport
            .subscribe(&topic.name, schema, self.handler.clone())
            .await
        {
            Ok(handle) => {
                debug!(
                    event = events::SUBSCRIBE_OK,
                    component = COMPONENT,
                    topic = %topic.name,
                    type_name = %topic.type_name,
                    subscription_id = %handle.id,
                    "subscribed"
                );
                if self.registry.put(&topic.name, handle) {
                    report.subscribed += 1;
                }
            }
            Err(err) => {
                logger.warn(&[&"Unable to subscribe to topic: ", &topic.name, &" : ", &err]);
                debug!(
                    event = events::SUBSCRIBE_FAILED,
                    component = COMPONENT,
                    topic = %topic.name,
                    err = %err,
                    "subscribe failed, retrying next tick"
                );
                report.subscribe_failures += 1;
            }
        }
    }

    /// Ticks every `poll_interval` until `shutdown` fires or its sender is
    /// dropped, then hands back the registry. The first tick happens one full
    /// interval after start.
    pub async fn run(mut self, mut shutdown: oneshot::Receiver<()>) -> SubscriptionRegistry {
        let period = self.context.settings.poll_interval;
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        self.context.logger.info(&[&"Starting to poll for topics..."]);
        info!(
            event = events::POLL_LOOP_START,
            component = COMPONENT,
            period_ms = period.as_millis() as u64,
            "topic poll loop started"
        );

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    self.context.logger.info(&[&"Stopping polling for topics..."]);
                    info!(
                        event = events::POLL_LOOP_STOP,
                        component = COMPONENT,
                        registered = self.registry.len(),
                        "topic poll loop stopped"
                    );
                    break;
                }
                _ = ticker.tick() => {
                    self.tick().await;
                }
            }
        }

        self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::{Reconciler, TickReport};
    use crate::config::RelaySettings;
    use crate::context::{Collaborators, NodeContext};
    use crate::data_plane::transport::{MessageHandler, Publisher, Transport};
    use crate::discovery::directory::DirectoryClient;
    use crate::discovery::schema::SchemaResolver;
    use crate::error::{DirectoryError, SchemaError, TransportError};
    use crate::logging::{CaptureSink, SeverityLogger};
    use crate::message::{MessageEvent, SchemaDescriptor, SubscriptionHandle, TopicDescriptor};
    use crate::Severity;
    use async_trait::async_trait;
    use std::collections::{HashMap, HashSet};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tokio::sync::oneshot;

    /// Replays scripted responses; `None` is a failed query. The last entry
    /// repeats once the script is exhausted.
    struct ScriptedDirectory {
        script: Vec<Option<Vec<TopicDescriptor>>>,
        calls: Mutex<usize>,
    }

    impl ScriptedDirectory {
        fn new(script: Vec<Option<Vec<(&str, &str)>>>) -> Self {
            let script = script
                .into_iter()
                .map(|step| {
                    step.map(|topics| {
                        topics
                            .into_iter()
                            .map(|(name, type_name)| TopicDescriptor::new(name, type_name))
                            .collect()
                    })
                })
                .collect();
            Self {
                script,
                calls: Mutex::new(0),
            }
        }
    }

    #[async_trait]
    impl DirectoryClient for ScriptedDirectory {
        async fn list_topics(
            &self,
            _namespace_filter: &str,
        ) -> Result<Vec<TopicDescriptor>, DirectoryError> {
            let mut calls = self.calls.lock().expect("lock calls");
            let step = (*calls).min(self.script.len() - 1);
            *calls += 1;
            self.script[step]
                .clone()
                .ok_or_else(|| DirectoryError::Unavailable("master down".to_string()))
        }
    }

    /// Resolves every type except those with remaining scripted failures.
    #[derive(Default)]
    struct CountingResolver {
        failures_left: Mutex<HashMap<String, usize>>,
        calls: Mutex<HashMap<String, usize>>,
    }

    impl CountingResolver {
        fn failing(type_name: &str, times: usize) -> Self {
            let resolver = Self::default();
            resolver
                .failures_left
                .lock()
                .expect("lock failures")
                .insert(type_name.to_string(), times);
            resolver
        }

        fn calls_for(&self, type_name: &str) -> usize {
            self.calls
                .lock()
                .expect("lock calls")
                .get(type_name)
                .copied()
                .unwrap_or(0)
        }
    }

    #[async_trait]
    impl SchemaResolver for CountingResolver {
        async fn resolve(&self, type_name: &str) -> Result<Arc<SchemaDescriptor>, SchemaError> {
            *self
                .calls
                .lock()
                .expect("lock calls")
                .entry(type_name.to_string())
                .or_insert(0) += 1;

            let mut failures = self.failures_left.lock().expect("lock failures");
            if let Some(left) = failures.get_mut(type_name) {
                if *left > 0 {
                    *left -= 1;
                    return Err(SchemaError::UnknownType(type_name.to_string()));
                }
            }
            Ok(Arc::new(SchemaDescriptor::new(type_name, Vec::new())))
        }
    }

    #[derive(Default)]
    struct RecordingTransport {
        subscribe_calls: Mutex<Vec<String>>,
        rejecting: Mutex<HashSet<String>>,
    }

    impl RecordingTransport {
        fn subscribe_calls(&self) -> Vec<String> {
            self.subscribe_calls.lock().expect("lock calls").clone()
        }

        fn reject(&self, topic: &str) {
            self.rejecting
                .lock()
                .expect("lock rejecting")
                .insert(topic.to_string());
        }

        fn accept(&self, topic: &str) {
            self.rejecting.lock().expect("lock rejecting").remove(topic);
        }
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn subscribe(
            &self,
            topic: &str,
            _schema: Arc<SchemaDescriptor>,
            _handler: Arc<dyn MessageHandler>,
        ) -> Result<SubscriptionHandle, TransportError> {
            self.subscribe_calls
                .lock()
                .expect("lock calls")
                .push(topic.to_string());
            if self.rejecting.lock().expect("lock rejecting").contains(topic) {
                return Err(TransportError::SubscribeRejected {
                    topic: topic.to_string(),
                    reason: "no publisher connection".to_string(),
                });
            }
            Ok(SubscriptionHandle::new(topic))
        }

        async fn advertise(
            &self,
            topic: &str,
            _schema: Arc<SchemaDescriptor>,
        ) -> Result<Arc<dyn Publisher>, TransportError> {
            Err(TransportError::AdvertiseRejected {
                topic: topic.to_string(),
                reason: "not used in tests".to_string(),
            })
        }
    }

    struct NoopHandler;

    #[async_trait]
    impl MessageHandler for NoopHandler {
        async fn on_message(&self, _event: MessageEvent) {}
    }

    struct Fixture {
        reconciler: Reconciler,
        transport: Arc<RecordingTransport>,
        resolver: Arc<CountingResolver>,
        log: CaptureSink,
    }

    fn fixture(directory: ScriptedDirectory, resolver: CountingResolver) -> Fixture {
        let transport = Arc::new(RecordingTransport::default());
        let resolver = Arc::new(resolver);
        let log = CaptureSink::new();
        let logger = Arc::new(SeverityLogger::with_sink(Severity::Info, log.clone()));
        let settings = RelaySettings {
            poll_interval: Duration::from_millis(100),
            ..Default::default()
        };
        let context = NodeContext::new(
            settings,
            logger,
            Collaborators::new(transport.clone(), Arc::new(directory), resolver.clone()),
        );

        Fixture {
            reconciler: Reconciler::new(context, Arc::new(NoopHandler)),
            transport,
            resolver,
            log,
        }
    }

    #[tokio::test]
    async fn second_tick_subscribes_only_the_new_topic() {
        let mut fx = fixture(
            ScriptedDirectory::new(vec![
                Some(vec![("t1", "TypeA")]),
                Some(vec![("t1", "TypeA"), ("t2", "TypeB")]),
            ]),
            CountingResolver::default(),
        );

        fx.reconciler.tick().await;
        let second = fx.reconciler.tick().await;

        assert_eq!(fx.reconciler.registry().topics(), vec!["t1", "t2"]);
        assert_eq!(fx.transport.subscribe_calls(), vec!["t1", "t2"]);
        assert_eq!(
            second,
            TickReport {
                advertised: 2,
                already_subscribed: 1,
                subscribed: 1,
                ..Default::default()
            }
        );
    }

    #[tokio::test]
    async fn registered_topic_is_never_resubscribed() {
        let mut fx = fixture(
            ScriptedDirectory::new(vec![Some(vec![("/chatter", "std_msgs/String")])]),
            CountingResolver::default(),
        );

        for _ in 0..5 {
            fx.reconciler.tick().await;
        }

        assert_eq!(fx.transport.subscribe_calls(), vec!["/chatter"]);
        assert_eq!(fx.resolver.calls_for("std_msgs/String"), 1);
    }

    #[tokio::test]
    async fn directory_failure_skips_tick_and_next_tick_recovers() {
        let mut fx = fixture(
            ScriptedDirectory::new(vec![
                Some(vec![("t1", "TypeA")]),
                None,
                Some(vec![("t1", "TypeA"), ("t2", "TypeB")]),
            ]),
            CountingResolver::default(),
        );

        fx.reconciler.tick().await;
        let failed = fx.reconciler.tick().await;
        assert!(failed.directory_failed);
        assert_eq!(fx.reconciler.registry().topics(), vec!["t1"]);

        let recovered = fx.reconciler.tick().await;
        assert!(!recovered.directory_failed);
        assert_eq!(fx.reconciler.registry().topics(), vec!["t1", "t2"]);
        assert!(fx
            .log
            .lines()
            .iter()
            .any(|line| line.starts_with("[WARN] Unable to fetch published topics: ")));
    }

    #[tokio::test]
    async fn schema_failure_is_isolated_and_retried() {
        let mut fx = fixture(
            ScriptedDirectory::new(vec![Some(vec![
                ("/bad", "custom/Unknown"),
                ("/good", "std_msgs/String"),
            ])]),
            CountingResolver::failing("custom/Unknown", 1),
        );

        let first = fx.reconciler.tick().await;
        assert_eq!(first.schema_failures, 1);
        assert_eq!(first.subscribed, 1);
        assert_eq!(fx.reconciler.registry().topics(), vec!["/good"]);
        assert!(fx.log.lines().contains(
            &"[INFO] Couldn't set message type: custom/Unknown : Error: unknown message type 'custom/Unknown'"
                .to_string()
        ));

        fx.reconciler.tick().await;
        assert_eq!(fx.resolver.calls_for("custom/Unknown"), 2);
        assert_eq!(fx.reconciler.registry().topics(), vec!["/bad", "/good"]);
    }

    #[tokio::test]
    async fn subscribe_failure_leaves_topic_unregistered_until_a_later_tick() {
        let mut fx = fixture(
            ScriptedDirectory::new(vec![Some(vec![("/flaky", "std_msgs/String")])]),
            CountingResolver::default(),
        );
        fx.transport.reject("/flaky");

        let first = fx.reconciler.tick().await;
        assert_eq!(first.subscribe_failures, 1);
        assert!(fx.reconciler.registry().is_empty());

        fx.transport.accept("/flaky");
        fx.reconciler.tick().await;
        assert!(fx.reconciler.registry().has("/flaky"));
        assert_eq!(fx.transport.subscribe_calls(), vec!["/flaky", "/flaky"]);
    }

    #[tokio::test]
    async fn registry_never_shrinks_when_topics_disappear() {
        let mut fx = fixture(
            ScriptedDirectory::new(vec![
                Some(vec![("a", "T"), ("b", "T")]),
                Some(vec![("c", "T")]),
                Some(vec![]),
                None,
                Some(vec![("a", "T"), ("d", "T")]),
            ]),
            CountingResolver::default(),
        );

        let mut sizes = Vec::new();
        for _ in 0..5 {
            fx.reconciler.tick().await;
            sizes.push(fx.reconciler.registry().len());
        }

        assert_eq!(sizes, vec![2, 3, 3, 3, 4]);
    }

    #[tokio::test]
    async fn type_change_under_same_name_is_ignored() {
        let mut fx = fixture(
            ScriptedDirectory::new(vec![
                Some(vec![("/topic", "TypeA")]),
                Some(vec![("/topic", "TypeB")]),
            ]),
            CountingResolver::default(),
        );

        fx.reconciler.tick().await;
        let second = fx.reconciler.tick().await;

        assert_eq!(second.already_subscribed, 1);
        assert_eq!(fx.resolver.calls_for("TypeB"), 0);
        assert_eq!(fx.transport.subscribe_calls(), vec!["/topic"]);
    }

    #[tokio::test]
    async fn topics_are_processed_in_directory_order() {
        let mut fx = fixture(
            ScriptedDirectory::new(vec![Some(vec![("/z", "T"), ("/a", "T"), ("/m", "T")])]),
            CountingResolver::default(),
        );

        fx.reconciler.tick().await;

        assert_eq!(fx.transport.subscribe_calls(), vec!["/z", "/a", "/m"]);
    }

    #[tokio::test(start_paused = true)]
    async fn run_ticks_until_shutdown_and_returns_registry() {
        let fx = fixture(
            ScriptedDirectory::new(vec![
                Some(vec![("t1", "T")]),
                Some(vec![("t1", "T"), ("t2", "T")]),
            ]),
            CountingResolver::default(),
        );
        let transport = fx.transport.clone();
        let log = fx.log.clone();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let task = tokio::spawn(fx.reconciler.run(shutdown_rx));
        tokio::time::sleep(Duration::from_millis(350)).await;
        shutdown_tx.send(()).expect("poller still running");

        let registry = task.await.expect("poller joined");
        assert_eq!(registry.topics(), vec!["t1", "t2"]);
        assert_eq!(transport.subscribe_calls(), vec!["t1", "t2"]);

        let lines = log.lines();
        assert_eq!(
            lines.first().map(String::as_str),
            Some("[INFO] Starting to poll for topics...")
        );
        assert_eq!(
            lines.last().map(String::as_str),
            Some("[INFO] Stopping polling for topics...")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn first_tick_waits_one_full_interval() {
        let fx = fixture(
            ScriptedDirectory::new(vec![Some(vec![("t1", "T")])]),
            CountingResolver::default(),
        );
        let transport = fx.transport.clone();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let task = tokio::spawn(fx.reconciler.run(shutdown_rx));
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(transport.subscribe_calls().is_empty());

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(transport.subscribe_calls(), vec!["t1"]);

        drop(shutdown_tx);
        let registry = task.await.expect("poller joined");
        assert!(registry.has("t1"));
    }
}
