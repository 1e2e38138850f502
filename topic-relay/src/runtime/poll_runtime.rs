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

//! Runtime helper for the background topic poller.

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::discovery::reconciler::Reconciler;
use crate::discovery::registry::SubscriptionRegistry;
use crate::error::RelayError;

/// Handle to a spawned reconciliation loop.
///
/// Dropping the handle closes the cancellation channel, which also stops the
/// loop.
pub(crate) struct TopicPoller {
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<SubscriptionRegistry>,
}

impl TopicPoller {
    /// Signals cancellation and waits for the loop to hand back its registry.
    pub(crate) async fn stop(mut self) -> Result<SubscriptionRegistry, RelayError> {
        if let Some(shutdown) = self.shutdown.take() {
            if shutdown.send(()).is_err() {
                debug!("topic poller already finished before shutdown signal");
            }
        }
        self.task
            .await
            .map_err(|err| RelayError::PollerJoin(err.to_string()))
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Spawns `reconciler.run` on the current tokio runtime.
pub(crate) fn spawn_topic_poller(reconciler: Reconciler) -> TopicPoller {
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let task = tokio::spawn(reconciler.run(shutdown_rx));
    TopicPoller {
        shutdown: Some(shutdown_tx),
        task,
    }
}
