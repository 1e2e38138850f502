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

//! Transport-facing interfaces consumed by the core.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::TransportError;
use crate::message::{DynamicMessage, MessageEvent, SchemaDescriptor, SubscriptionHandle};

/// Receives inbound deliveries for one subscription.
///
/// Called from the transport's delivery context, so implementations must
/// return promptly and hand off anything that may block.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    async fn on_message(&self, event: MessageEvent);
}

/// Process-lifetime binding of one topic to one schema.
///
/// Implementations must tolerate concurrent `publish` calls.
#[async_trait]
pub trait Publisher: Send + Sync {
    fn topic(&self) -> &str;

    async fn publish(&self, payload: DynamicMessage) -> Result<(), TransportError>;
}

/// Subscription and publication side of the messaging network.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Subscribes `handler` to `topic`. An `Err` means no subscription was
    /// established and nothing needs releasing.
    async fn subscribe(
        &self,
        topic: &str,
        schema: Arc<SchemaDescriptor>,
        handler: Arc<dyn MessageHandler>,
    ) -> Result<SubscriptionHandle, TransportError>;

    async fn advertise(
        &self,
        topic: &str,
        schema: Arc<SchemaDescriptor>,
    ) -> Result<Arc<dyn Publisher>, TransportError>;
}
