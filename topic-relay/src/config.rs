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

//! Node configuration.

use serde::Deserialize;
use std::time::Duration;

use crate::error::ConfigError;
use crate::logging::Severity;
use crate::naming::resolve_topic_name;

pub const DEFAULT_NODE_NAME: &str = "listener";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;
pub const DEFAULT_OUTBOUND_TOPIC: &str = "more_chatter";
pub const DEFAULT_STRING_TYPE: &str = "std_msgs/String";

/// Raw configuration as read from a file. Every field has a default.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RelayConfig {
    pub node_name: String,
    pub severity: Severity,
    pub poll_interval_ms: u64,
    /// Passed through to the directory when listing topics.
    pub namespace_filter: String,
    pub outbound_topic: String,
    pub outbound_type: String,
    /// Messages of this type are republished on the outbound topic.
    pub republish_type: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            node_name: DEFAULT_NODE_NAME.to_string(),
            severity: Severity::Info,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            namespace_filter: String::new(),
            outbound_topic: DEFAULT_OUTBOUND_TOPIC.to_string(),
            outbound_type: DEFAULT_STRING_TYPE.to_string(),
            republish_type: DEFAULT_STRING_TYPE.to_string(),
        }
    }
}

impl RelayConfig {
    /// Validates the raw values and resolves names and durations.
    pub fn resolve(&self) -> Result<RelaySettings, ConfigError> {
        if self.node_name.trim().is_empty() {
            return Err(ConfigError::Empty("node_name"));
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }
        if self.outbound_type.trim().is_empty() {
            return Err(ConfigError::Empty("outbound_type"));
        }
        if self.republish_type.trim().is_empty() {
            return Err(ConfigError::Empty("republish_type"));
        }

        Ok(RelaySettings {
            node_name: self.node_name.trim().to_string(),
            severity: self.severity,
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            namespace_filter: self.namespace_filter.clone(),
            outbound_topic: resolve_topic_name(&self.outbound_topic)?,
            outbound_type: self.outbound_type.trim().to_string(),
            republish_type: self.republish_type.trim().to_string(),
        })
    }
}

/// Validated settings carried by [`crate::NodeContext`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelaySettings {
    pub node_name: String,
    pub severity: Severity,
    pub poll_interval: Duration,
    pub namespace_filter: String,
    /// Global (slash-prefixed) name of the republish topic.
    pub outbound_topic: String,
    pub outbound_type: String,
    pub republish_type: String,
}

impl Default for RelaySettings {
    fn default() -> Self {
        RelaySettings {
            node_name: DEFAULT_NODE_NAME.to_string(),
            severity: Severity::Info,
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            namespace_filter: String::new(),
            outbound_topic: format!("/{DEFAULT_OUTBOUND_TOPIC}"),
            outbound_type: DEFAULT_STRING_TYPE.to_string(),
            republish_type: DEFAULT_STRING_TYPE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{RelayConfig, RelaySettings};
    use crate::error::ConfigError;
    use crate::Severity;
    use std::time::Duration;

    #[test]
    fn defaults_resolve_to_default_settings() {
        let settings = RelayConfig::default().resolve().expect("defaults are valid");
        assert_eq!(settings, RelaySettings::default());
        assert_eq!(settings.outbound_topic, "/more_chatter");
        assert_eq!(settings.poll_interval, Duration::from_secs(1));
    }

    #[test]
    fn partial_json_keeps_defaults_for_missing_fields() {
        let config: RelayConfig =
            serde_json::from_str(r#"{ "severity": "debug", "poll_interval_ms": 250 }"#)
                .expect("valid config");

        assert_eq!(config.severity, Severity::Debug);
        assert_eq!(config.poll_interval_ms, 250);
        assert_eq!(config.republish_type, "std_msgs/String");
    }

    #[test]
    fn severity_in_config_parses_like_the_command_line() {
        let config: RelayConfig =
            serde_json::from_str(r#"{ "severity": "WARNING" }"#).expect("valid config");
        assert_eq!(config.severity, Severity::Warn);
        assert_eq!(config.severity, "WARNING".parse::<Severity>().expect("valid level"));

        let parsed = serde_json::from_str::<RelayConfig>(r#"{ "severity": "loud" }"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let parsed = serde_json::from_str::<RelayConfig>(r#"{ "pol_interval_ms": 250 }"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn zero_interval_and_bad_topic_fail_validation() {
        let config = RelayConfig {
            poll_interval_ms: 0,
            ..Default::default()
        };
        assert!(matches!(config.resolve(), Err(ConfigError::ZeroPollInterval)));

        let config = RelayConfig {
            outbound_topic: "  ".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.resolve(),
            Err(ConfigError::InvalidTopicName(_))
        ));
    }
}
