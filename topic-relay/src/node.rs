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

//! Node facade: startup wiring of the outbound publisher, dispatcher and
//! topic poller, and orderly shutdown.

use std::sync::Arc;
use tracing::{debug, error, info};

use crate::config::{RelayConfig, RelaySettings};
use crate::context::{Collaborators, NodeContext};
use crate::data_plane::dispatch::Dispatcher;
use crate::data_plane::transport::Publisher;
use crate::discovery::reconciler::Reconciler;
use crate::discovery::registry::SubscriptionRegistry;
use crate::error::RelayError;
use crate::logging::SeverityLogger;
use crate::observability::events;
use crate::runtime::poll_runtime::{spawn_topic_poller, TopicPoller};

const RELAY_NODE_TAG: &str = "RelayNode:";
const RELAY_NODE_FN_START_TAG: &str = "start():";
const RELAY_NODE_FN_SHUTDOWN_TAG: &str = "shutdown():";

/// A running relay: outbound publisher bound, dispatcher wired, topic poller
/// spawned on the current tokio runtime.
pub struct RelayNode {
    name: String,
    context: NodeContext,
    publisher: Arc<dyn Publisher>,
    poller: Option<TopicPoller>,
}

impl RelayNode {
    /// Validates `config` and starts the node. See [`Self::start_with_settings`].
    pub async fn start(
        config: &RelayConfig,
        logger: Arc<SeverityLogger>,
        collaborators: Collaborators,
    ) -> Result<Self, RelayError> {
        let settings = config.resolve()?;
        Self::start_with_settings(settings, logger, collaborators).await
    }

    /// Applies the configured severity, resolves the outbound schema and
    /// advertises the outbound publisher before spawning the poller. Either
    /// failure aborts startup; nothing has been spawned at that point.
    pub async fn start_with_settings(
        settings: RelaySettings,
        logger: Arc<SeverityLogger>,
        collaborators: Collaborators,
    ) -> Result<Self, RelayError> {
        let name = format!("{RELAY_NODE_TAG}{}:", settings.node_name);
        logger.set_severity(settings.severity);
        let context = NodeContext::new(settings, logger, collaborators);
        let settings = context.settings.clone();

        let outbound_schema = context
            .resolver
            .resolve(&settings.outbound_type)
            .await
            .map_err(|source| {
                error!(
                    "{}:{} outbound schema unavailable: {source}",
                    name, RELAY_NODE_FN_START_TAG
                );
                RelayError::OutboundSchema {
                    type_name: settings.outbound_type.clone(),
                    source,
                }
            })?;

        let publisher = context
            .transport
            .advertise(&settings.outbound_topic, outbound_schema)
            .await
            .map_err(|source| RelayError::OutboundAdvertise {
                topic: settings.outbound_topic.clone(),
                source,
            })?;
        debug!(
            "{}:{} advertised outbound topic {}",
            name,
            RELAY_NODE_FN_START_TAG,
            publisher.topic()
        );

        let dispatcher = Arc::new(Dispatcher::new(
            context.logger.clone(),
            settings.outbound_topic.clone(),
            settings.republish_type.clone(),
            publisher.clone(),
        ));
        let poller = spawn_topic_poller(Reconciler::new(context.clone(), dispatcher));

        info!(
            event = events::NODE_START,
            node = %settings.node_name,
            outbound_topic = %settings.outbound_topic,
            republish_type = %settings.republish_type,
            "relay node started"
        );

        Ok(Self {
            name,
            context,
            publisher,
            poller: Some(poller),
        })
    }

    /// The outbound publisher shared with the dispatch path.
    pub fn publisher(&self) -> Arc<dyn Publisher> {
        self.publisher.clone()
    }

    pub fn is_polling(&self) -> bool {
        self.poller
            .as_ref()
            .map(|poller| !poller.is_finished())
            .unwrap_or(false)
    }

    /// Stops the poller and returns the subscriptions it established.
    /// Subscriptions themselves stay with the transport.
    pub async fn shutdown(mut self) -> Result<SubscriptionRegistry, RelayError> {
        debug!("{}:{} stopping topic poller", self.name, RELAY_NODE_FN_SHUTDOWN_TAG);
        let registry = match self.poller.take() {
            Some(poller) => poller.stop().await?,
            None => SubscriptionRegistry::new(),
        };
        info!(
            event = events::NODE_SHUTDOWN,
            node = %self.context.settings.node_name,
            registered = registry.len(),
            "relay node stopped"
        );
        Ok(registry)
    }
}
