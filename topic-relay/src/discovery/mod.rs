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

//! Discovery layer.
//!
//! Owns the directory and schema-resolution interfaces, the subscription
//! registry and the reconciliation loop that keeps it converging toward one
//! subscription per advertised topic.

pub(crate) mod directory;
pub(crate) mod reconciler;
pub(crate) mod registry;
pub(crate) mod schema;
