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

//! Demo publishers that give the relay something to discover.

use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use in_memory_bus::InMemoryBus;
use topic_relay::{DynamicMessage, Publisher, SchemaDescriptor, SchemaResolver, Transport};

use crate::config::DemoPublisherConfig;

/// Replaces `{n}` in top-level string values with `counter`.
pub fn render_payload(template: &Value, counter: u64) -> Value {
    match template {
        Value::Object(fields) => Value::Object(
            fields
                .iter()
                .map(|(name, value)| {
                    let value = match value {
                        Value::String(text) => {
                            Value::String(text.replace("{n}", &counter.to_string()))
                        }
                        other => other.clone(),
                    };
                    (name.clone(), value)
                })
                .collect(),
        ),
        Value::String(text) => Value::String(text.replace("{n}", &counter.to_string())),
        other => other.clone(),
    }
}

/// Advertises every configured demo topic on `bus` and spawns one publishing
/// loop per topic. Types unknown to `resolver` are still published with a
/// field-less schema, so the relay sees them and keeps failing to resolve them.
pub async fn spawn_demo_publishers(
    bus: &InMemoryBus,
    resolver: Arc<dyn SchemaResolver>,
    demos: &[DemoPublisherConfig],
) -> Vec<JoinHandle<()>> {
    let mut tasks = Vec::with_capacity(demos.len());

    for (index, demo) in demos.iter().enumerate() {
        let caller_id = demo
            .node
            .clone()
            .unwrap_or_else(|| format!("/talker_{index}"));
        let schema = match resolver.resolve(&demo.type_name).await {
            Ok(schema) => schema,
            Err(err) => {
                debug!(
                    "demo type {} not resolvable ({err}), publishing without fields",
                    demo.type_name
                );
                Arc::new(SchemaDescriptor::new(demo.type_name.clone(), Vec::new()))
            }
        };

        let publisher = match bus
            .for_node(caller_id.clone())
            .advertise(&demo.topic, schema.clone())
            .await
        {
            Ok(publisher) => publisher,
            Err(err) => {
                warn!("unable to advertise demo topic {}: {err}", demo.topic);
                continue;
            }
        };
        info!(
            "{} publishing {} [{}] every {}ms",
            caller_id, demo.topic, demo.type_name, demo.period_ms
        );

        let template = demo.data.clone();
        let period = Duration::from_millis(demo.period_ms.max(1));
        tasks.push(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            let mut counter = 0_u64;
            loop {
                ticker.tick().await;
                let payload =
                    DynamicMessage::new(schema.clone(), render_payload(&template, counter));
                if let Err(err) = publisher.publish(payload).await {
                    warn!("demo publish on {} failed: {err}", publisher.topic());
                }
                counter += 1;
            }
        }));
    }

    tasks
}

#[cfg(test)]
mod tests {
    use super::render_payload;
    use serde_json::json;

    #[test]
    fn counter_replaces_placeholder_in_top_level_strings() {
        let rendered = render_payload(&json!({ "data": "hello world {n}", "seq": 1 }), 42);
        assert_eq!(rendered, json!({ "data": "hello world 42", "seq": 1 }));
    }

    #[test]
    fn non_string_payloads_are_copied() {
        assert_eq!(render_payload(&json!(7), 3), json!(7));
        assert_eq!(render_payload(&json!("n={n}"), 3), json!("n=3"));
    }
}
