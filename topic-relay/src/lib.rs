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

//! # topic-relay
//!
//! `topic-relay` is a lightweight publish/subscribe node that discovers topics
//! advertised by a directory service, subscribes to each unseen topic with a
//! schema resolved at runtime, and republishes messages of one designated type
//! on a fixed outbound topic.
//!
//! The directory, the schema source and the transport are collaborators
//! reached through [`DirectoryClient`], [`SchemaResolver`] and [`Transport`].
//! [`RelayNode`] wires them together from an explicit [`NodeContext`].
//!
//! ```
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use topic_relay::logging::CaptureSink;
//! use topic_relay::{
//!     Collaborators, DirectoryClient, DirectoryError, DynamicMessage, MessageHandler,
//!     Publisher, RelayConfig, RelayNode, SchemaDescriptor, SchemaError, SchemaResolver,
//!     Severity, SeverityLogger, SubscriptionHandle, TopicDescriptor, Transport,
//!     TransportError,
//! };
//!
//! # struct Directory;
//! # #[async_trait]
//! # impl DirectoryClient for Directory {
//! #     async fn list_topics(
//! #         &self,
//! #         _filter: &str,
//! #     ) -> Result<Vec<TopicDescriptor>, DirectoryError> {
//! #         Ok(vec![TopicDescriptor::new("/chatter", "std_msgs/String")])
//! #     }
//! # }
//! # struct Resolver;
//! # #[async_trait]
//! # impl SchemaResolver for Resolver {
//! #     async fn resolve(&self, type_name: &str) -> Result<Arc<SchemaDescriptor>, SchemaError> {
//! #         Ok(Arc::new(SchemaDescriptor::new(type_name, Vec::new())))
//! #     }
//! # }
//! # struct Outbound;
//! # #[async_trait]
//! # impl Publisher for Outbound {
//! #     fn topic(&self) -> &str { "/more_chatter" }
//! #     async fn publish(&self, _payload: DynamicMessage) -> Result<(), TransportError> { Ok(()) }
//! # }
//! # struct Network;
//! # #[async_trait]
//! # impl Transport for Network {
//! #     async fn subscribe(
//! #         &self,
//! #         topic: &str,
//! #         _schema: Arc<SchemaDescriptor>,
//! #         _handler: Arc<dyn MessageHandler>,
//! #     ) -> Result<SubscriptionHandle, TransportError> {
//! #         Ok(SubscriptionHandle::new(topic))
//! #     }
//! #     async fn advertise(
//! #         &self,
//! #         _topic: &str,
//! #         _schema: Arc<SchemaDescriptor>,
//! #     ) -> Result<Arc<dyn Publisher>, TransportError> {
//! #         Ok(Arc::new(Outbound))
//! #     }
//! # }
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let logger = Arc::new(SeverityLogger::with_sink(Severity::Info, CaptureSink::new()));
//! let collaborators =
//!     Collaborators::new(Arc::new(Network), Arc::new(Directory), Arc::new(Resolver));
//!
//! let node = RelayNode::start(&RelayConfig::default(), logger, collaborators)
//!     .await
//!     .unwrap();
//! let _registry = node.shutdown().await.unwrap();
//! # });
//! ```
//!
//! ## Internal architecture map
//!
//! - Logging: severity-gated node logger and its sinks
//! - Discovery: directory and schema interfaces, subscription registry, reconciler
//! - Data plane: transport interfaces and the dispatch path
//! - Runtime: poller task spawning and cancellation
//!
//! ## Observability model
//!
//! Node-facing records go through [`SeverityLogger`]; internal events use
//! `tracing`. Library code never installs a global subscriber; the node
//! binary initializes `tracing_subscriber` at startup.

mod config;
pub use config::{RelayConfig, RelaySettings};

mod context;
pub use context::{Collaborators, NodeContext};

mod data_plane;
pub use data_plane::dispatch::Dispatcher;
pub use data_plane::transport::{MessageHandler, Publisher, Transport};

mod discovery;
pub use discovery::directory::DirectoryClient;
pub use discovery::reconciler::{Reconciler, TickReport};
pub use discovery::registry::SubscriptionRegistry;
pub use discovery::schema::SchemaResolver;

mod error;
pub use error::{ConfigError, DirectoryError, RelayError, SchemaError, TransportError};

pub mod logging;
pub use logging::{Severity, SeverityLogger};

mod message;
pub use message::{
    DynamicMessage, FieldDescriptor, MessageEvent, SchemaDescriptor, SubscriptionHandle,
    TopicDescriptor,
};

mod naming;
pub use naming::resolve_topic_name;

mod node;
pub use node::RelayNode;

#[doc(hidden)]
pub mod observability;
mod runtime;
