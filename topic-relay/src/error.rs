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

//! Error types shared by the collaborator interfaces and the node facade.

use thiserror::Error;

/// Failure to obtain the advertised topic list.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("directory unavailable: {0}")]
    Unavailable(String),
}

/// Failure to turn a type name into a runtime schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("unknown message type '{0}'")]
    UnknownType(String),
    #[error("invalid definition for '{type_name}': {reason}")]
    InvalidDefinition { type_name: String, reason: String },
    #[error("schema source unavailable: {0}")]
    Source(String),
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("subscribe to '{topic}' rejected: {reason}")]
    SubscribeRejected { topic: String, reason: String },
    #[error("advertise of '{topic}' rejected: {reason}")]
    AdvertiseRejected { topic: String, reason: String },
    #[error("publish on '{topic}' failed: {reason}")]
    PublishFailed { topic: String, reason: String },
    #[error("type mismatch on '{topic}': expected '{expected}', got '{actual}'")]
    TypeMismatch {
        topic: String,
        expected: String,
        actual: String,
    },
    #[error("transport closed")]
    Closed,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown severity '{0}'")]
    UnknownSeverity(String),
    #[error("invalid topic name '{0}'")]
    InvalidTopicName(String),
    #[error("'{0}' must not be empty")]
    Empty(&'static str),
    #[error("poll interval must be greater than zero")]
    ZeroPollInterval,
}

/// Startup failures of a [`crate::RelayNode`]. Steady-state failures never
/// surface here.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("unable to resolve outbound message type '{type_name}': {source}")]
    OutboundSchema {
        type_name: String,
        #[source]
        source: SchemaError,
    },
    #[error("unable to advertise outbound topic '{topic}': {source}")]
    OutboundAdvertise {
        topic: String,
        #[source]
        source: TransportError,
    },
    #[error("topic poller terminated abnormally: {0}")]
    PollerJoin(String),
}
