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

use crate::message::MessageEvent;

/// Compact `topic[type]` label for one delivery.
pub fn format_delivery(event: &MessageEvent) -> String {
    format!("{}[{}]", event.topic, event.type_name)
}

pub fn format_publisher(event: &MessageEvent) -> &str {
    event.publisher.as_deref().unwrap_or("unknown")
}

#[cfg(test)]
mod tests {
    use super::{format_delivery, format_publisher};
    use crate::message::{DynamicMessage, MessageEvent, SchemaDescriptor};
    use serde_json::Value;
    use std::sync::Arc;

    #[test]
    fn delivery_label_combines_topic_and_type() {
        let schema = Arc::new(SchemaDescriptor::new("std_msgs/Int32", Vec::new()));
        let event = MessageEvent::new("/count", DynamicMessage::new(schema, Value::Null));

        assert_eq!(format_delivery(&event), "/count[std_msgs/Int32]");
        assert_eq!(format_publisher(&event), "unknown");
    }
}
