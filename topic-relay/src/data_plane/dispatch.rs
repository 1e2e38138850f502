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

//! Inbound delivery handler: log, loopback guard, republish.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::data_plane::transport::{MessageHandler, Publisher};
use crate::logging::SeverityLogger;
use crate::message::MessageEvent;
use crate::observability::{events, fields};

const COMPONENT: &str = "dispatcher";

/// Handles every delivery of every subscription the reconciler establishes.
///
/// Messages arriving on the outbound topic are dropped after logging so the
/// node never reacts to its own output. Messages of the republishable type
/// are sent unchanged on the outbound topic, at most once per delivery.
pub struct Dispatcher {
    logger: Arc<SeverityLogger>,
    outbound_topic: String,
    republish_type: String,
    publisher: Arc<dyn Publisher>,
}

impl Dispatcher {
    pub fn new(
        logger: Arc<SeverityLogger>,
        outbound_topic: impl Into<String>,
        republish_type: impl Into<String>,
        publisher: Arc<dyn Publisher>,
    ) -> Self {
        Self {
            logger,
            outbound_topic: outbound_topic.into(),
            republish_type: republish_type.into(),
            publisher,
        }
    }

    fn is_loopback(&self, event: &MessageEvent) -> bool {
        event.topic == self.outbound_topic
    }

    fn is_republishable(&self, event: &MessageEvent) -> bool {
        event.type_name == self.republish_type
    }
}

#[async_trait]
impl MessageHandler for Dispatcher {
    async fn on_message(&self, event: MessageEvent) {
        self.logger.info(&[
            &"Received: ",
            &event.topic,
            &" : ",
            &event.type_name,
            &" : ",
            &event.payload,
        ]);

        if self.is_loopback(&event) {
            debug!(
                event = events::DISPATCH_LOOPBACK_DROP,
                component = COMPONENT,
                delivery = %fields::format_delivery(&event),
                "not republishing own output"
            );
            return;
        }

        if !self.is_republishable(&event) {
            return;
        }

        self.logger.info(&[&"Republishing..."]);
        let delivery = fields::format_delivery(&event);
        let publisher_id = fields::format_publisher(&event).to_string();
        match self.publisher.publish(event.payload).await {
            Ok(()) => debug!(
                event = events::DISPATCH_REPUBLISH_OK,
                component = COMPONENT,
                delivery = %delivery,
                publisher = %publisher_id,
                outbound_topic = %self.outbound_topic,
                "republished"
            ),
            Err(err) => {
                self.logger.errorf(format_args!(
                    "Unable to republish {delivery} on {}: {err}",
                    self.outbound_topic
                ));
                warn!(
                    event = events::DISPATCH_REPUBLISH_FAILED,
                    component = COMPONENT,
                    delivery = %delivery,
                    outbound_topic = %self.outbound_topic,
                    err = %err,
                    "republish failed"
                );
            }
        }
    }
}
