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

pub const POLL_LOOP_START: &str = "poll_loop_start";
pub const POLL_LOOP_STOP: &str = "poll_loop_stop";
pub const TICK_COMPLETE: &str = "tick_complete";
pub const DIRECTORY_QUERY_FAILED: &str = "directory_query_failed";
pub const SCHEMA_RESOLVE_FAILED: &str = "schema_resolve_failed";
pub const SUBSCRIBE_OK: &str = "subscribe_ok";
pub const SUBSCRIBE_FAILED: &str = "subscribe_failed";
pub const REGISTRY_DUPLICATE_PUT: &str = "registry_duplicate_put";
pub const DISPATCH_LOOPBACK_DROP: &str = "dispatch_loopback_drop";
pub const DISPATCH_REPUBLISH_OK: &str = "dispatch_republish_ok";
pub const DISPATCH_REPUBLISH_FAILED: &str = "dispatch_republish_failed";
pub const NODE_START: &str = "node_start";
pub const NODE_SHUTDOWN: &str = "node_shutdown";
