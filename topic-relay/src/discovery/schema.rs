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

//! Schema resolver interface.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::SchemaError;
use crate::message::SchemaDescriptor;

#[async_trait]
pub trait SchemaResolver: Send + Sync {
    async fn resolve(&self, type_name: &str) -> Result<Arc<SchemaDescriptor>, SchemaError>;
}
