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

//! Directory client interface.

use async_trait::async_trait;

use crate::error::DirectoryError;
use crate::message::TopicDescriptor;

/// Source of the topics currently advertised on the network.
#[async_trait]
pub trait DirectoryClient: Send + Sync {
    /// Lists advertised topics whose names fall under `namespace_filter`.
    /// An empty filter lists everything. Order is preserved by the caller.
    async fn list_topics(&self, namespace_filter: &str)
        -> Result<Vec<TopicDescriptor>, DirectoryError>;
}
