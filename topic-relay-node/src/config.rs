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

use anyhow::Context;
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

use topic_relay::RelayConfig;

const DEFAULT_DEMO_PERIOD_MS: u64 = 1000;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogSinkKind {
    #[default]
    Tracing,
    Stderr,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DemoPublisherConfig {
    /// Caller id the publisher appears under; defaults to `/talker_<index>`.
    #[serde(default)]
    pub node: Option<String>,
    pub topic: String,
    pub type_name: String,
    /// Payload published every period. Top-level string values have `{n}`
    /// replaced with a running counter.
    pub data: Value,
    #[serde(default = "default_demo_period_ms")]
    pub period_ms: u64,
}

fn default_demo_period_ms() -> u64 {
    DEFAULT_DEMO_PERIOD_MS
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NodeFileConfig {
    pub relay: RelayConfig,
    pub log_sink: LogSinkKind,
    pub demo_publishers: Vec<DemoPublisherConfig>,
}

impl NodeFileConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("unable to read config file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        Ok(json5::from_str(text)?)
    }
}
