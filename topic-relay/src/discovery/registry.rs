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

//! Topic-name to subscription table owned by the reconciler.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::warn;

use crate::message::SubscriptionHandle;
use crate::observability::events;

const COMPONENT: &str = "subscription_registry";

/// Active subscriptions keyed by topic name.
///
/// Single-writer by construction: the reconciler owns it by value, so there is
/// no internal locking. Entries are never removed.
#[derive(Debug, Default)]
pub struct SubscriptionRegistry {
    subscriptions: HashMap<String, SubscriptionHandle>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, topic: &str) -> bool {
        self.subscriptions.contains_key(topic)
    }

    /// Records `handle` under `topic`. An existing entry is kept and `false`
    /// returned, so one topic never maps to two subscriptions.
    pub fn put(&mut self, topic: &str, handle: SubscriptionHandle) -> bool {
        match self.subscriptions.entry(topic.to_string()) {
            Entry::Occupied(_) => {
                warn!(
                    event = events::REGISTRY_DUPLICATE_PUT,
                    component = COMPONENT,
                    topic,
                    "subscription already registered, keeping existing handle"
                );
                false
            }
            Entry::Vacant(vacant) => {
                vacant.insert(handle);
                true
            }
        }
    }

    pub fn get(&self, topic: &str) -> Option<&SubscriptionHandle> {
        self.subscriptions.get(topic)
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Registered topic names in sorted order.
    pub fn topics(&self) -> Vec<String> {
        let mut topics: Vec<String> = self.subscriptions.keys().cloned().collect();
        topics.sort();
        topics
    }
}
