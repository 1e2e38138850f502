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

//! Runtime-typed message model shared between the core and its collaborators.

use serde::Deserialize;
use serde_json::Value;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use uuid::Uuid;

/// One advertised topic as reported by the directory. Identity is `name`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TopicDescriptor {
    pub name: String,
    pub type_name: String,
}

impl TopicDescriptor {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

/// One named field of a schema. Read from definition files as
/// `{ "name": ..., "type": ... }`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

/// Schema resolved at runtime for a type name. The core only reads
/// `type_name`; the field layout belongs to the transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchemaDescriptor {
    pub type_name: String,
    pub fields: Vec<FieldDescriptor>,
}

impl SchemaDescriptor {
    pub fn new(type_name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            type_name: type_name.into(),
            fields,
        }
    }
}

/// Payload whose shape is only known through its schema.
#[derive(Clone, Debug, PartialEq)]
pub struct DynamicMessage {
    pub schema: Arc<SchemaDescriptor>,
    pub data: Value,
}

impl DynamicMessage {
    pub fn new(schema: Arc<SchemaDescriptor>, data: Value) -> Self {
        Self { schema, data }
    }

    pub fn type_name(&self) -> &str {
        &self.schema.type_name
    }
}

impl Display for DynamicMessage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.data)
    }
}

/// One inbound delivery handed to a [`crate::MessageHandler`].
#[derive(Clone, Debug)]
pub struct MessageEvent {
    pub payload: DynamicMessage,
    pub topic: String,
    pub type_name: String,
    /// Identity of the sending node when the transport knows it.
    pub publisher: Option<String>,
}

impl MessageEvent {
    pub fn new(topic: impl Into<String>, payload: DynamicMessage) -> Self {
        let type_name = payload.type_name().to_string();
        Self {
            payload,
            topic: topic.into(),
            type_name,
            publisher: None,
        }
    }

    pub fn with_publisher(mut self, publisher: impl Into<String>) -> Self {
        self.publisher = Some(publisher.into());
        self
    }
}

/// Opaque token for an active subscription, issued by the transport.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle {
    pub id: Uuid,
    pub topic: String,
}

impl SubscriptionHandle {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            topic: topic.into(),
        }
    }
}
