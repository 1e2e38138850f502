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

//! Explicit node context shared by the reconciler and the dispatcher.

use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use crate::config::RelaySettings;
use crate::data_plane::transport::Transport;
use crate::discovery::directory::DirectoryClient;
use crate::discovery::schema::SchemaResolver;
use crate::logging::SeverityLogger;

/// External collaborators a node is wired to.
#[derive(Clone)]
pub struct Collaborators {
    pub transport: Arc<dyn Transport>,
    pub directory: Arc<dyn DirectoryClient>,
    pub resolver: Arc<dyn SchemaResolver>,
}

impl Collaborators {
    pub fn new(
        transport: Arc<dyn Transport>,
        directory: Arc<dyn DirectoryClient>,
        resolver: Arc<dyn SchemaResolver>,
    ) -> Self {
        Self {
            transport,
            directory,
            resolver,
        }
    }
}

/// Everything the node's background loop and dispatch path need, handed over
/// at construction instead of living in process-wide globals.
#[derive(Clone)]
pub struct NodeContext {
    pub settings: Arc<RelaySettings>,
    pub logger: Arc<SeverityLogger>,
    pub transport: Arc<dyn Transport>,
    pub directory: Arc<dyn DirectoryClient>,
    pub resolver: Arc<dyn SchemaResolver>,
}

impl NodeContext {
    pub fn new(
        settings: RelaySettings,
        logger: Arc<SeverityLogger>,
        collaborators: Collaborators,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            logger,
            transport: collaborators.transport,
            directory: collaborators.directory,
            resolver: collaborators.resolver,
        }
    }
}

impl Debug for NodeContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeContext")
            .field("settings", &self.settings)
            .field("logger", &self.logger)
            .finish_non_exhaustive()
    }
}
