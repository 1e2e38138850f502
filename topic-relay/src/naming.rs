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

//! Topic name resolution.

use crate::error::ConfigError;

/// Resolves a possibly relative topic name into its global form.
///
/// `"more_chatter"` and `"/more_chatter"` both resolve to `"/more_chatter"`,
/// which is the form transports report on inbound deliveries.
pub fn resolve_topic_name(name: &str) -> Result<String, ConfigError> {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed == "/" {
        return Err(ConfigError::InvalidTopicName(name.to_string()));
    }
    if trimmed.chars().any(char::is_whitespace) || trimmed.contains("//") {
        return Err(ConfigError::InvalidTopicName(name.to_string()));
    }

    if trimmed.starts_with('/') {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("/{trimmed}"))
    }
}
