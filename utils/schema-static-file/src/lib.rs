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

//! Schema resolver backed by a static JSON file of message type definitions.
//!
//! The file is a JSON object mapping type names to definitions:
//!
//! ```json
//! {
//!     "std_msgs/String": { "fields": ["string data"] },
//!     "geometry_msgs/Point": {
//!         "fields": [
//!             { "name": "x", "type": "float64" },
//!             { "name": "y", "type": "float64" },
//!             { "name": "z", "type": "float64" }
//!         ]
//!     }
//! }
//! ```
//!
//! Fields are given either as `"<type> <name>"` strings or as objects. The file
//! is re-read on every lookup, so definitions added while a node runs are picked
//! up on its next reconciliation pass.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::fs::{self, canonicalize};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

use topic_relay::{FieldDescriptor, SchemaDescriptor, SchemaError, SchemaResolver};

/// A field given either as `"<type> <name>"` or as `{ "name", "type" }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum FieldEntry {
    Line(String),
    Named(FieldDescriptor),
}

#[derive(Deserialize)]
struct TypeDefinition {
    fields: Option<Vec<FieldEntry>>,
}

pub struct SchemaStaticFile {
    static_file: String,
}

impl SchemaStaticFile {
    pub fn new(static_file: String) -> Self {
        Self { static_file }
    }

    fn canonicalized_static_file_path(&self) -> Result<PathBuf, SchemaError> {
        let schema_json_file = PathBuf::from(self.static_file.clone());
        debug!("schema_json_file: {schema_json_file:?}");

        canonicalize(schema_json_file).map_err(|error| {
            SchemaError::Source(format!("Static schema file not found: {error:?}"))
        })
    }

    fn read_static_config_json(&self) -> Result<Value, SchemaError> {
        let schema_json_file = self.canonicalized_static_file_path()?;
        let data = fs::read_to_string(schema_json_file)
            .map_err(|error| SchemaError::Source(format!("Unable to read file: {error:?}")))?;

        serde_json::from_str(&data)
            .map_err(|error| SchemaError::Source(format!("Unable to parse JSON: {error:?}")))
    }

    /// Type names defined in the file, sorted.
    pub fn type_names(&self) -> Result<Vec<String>, SchemaError> {
        let value = self.read_static_config_json()?;
        let Some(entries) = value.as_object() else {
            return Err(Self::not_an_object());
        };
        Ok(entries.keys().cloned().collect())
    }

    fn not_an_object() -> SchemaError {
        SchemaError::Source(
            "Static schema file must be a JSON object mapping type names to definitions"
                .to_string(),
        )
    }

    fn parse_definition(
        type_name: &str,
        definition: &Value,
    ) -> Result<SchemaDescriptor, SchemaError> {
        let invalid = |reason: String| SchemaError::InvalidDefinition {
            type_name: type_name.to_string(),
            reason,
        };

        let definition = TypeDefinition::deserialize(definition)
            .map_err(|error| invalid(error.to_string()))?;
        let Some(entries) = definition.fields else {
            warn!("Type '{type_name}' declares no fields");
            return Ok(SchemaDescriptor::new(type_name, Vec::new()));
        };

        let fields = entries
            .into_iter()
            .map(|entry| match entry {
                FieldEntry::Named(field) => Ok(field),
                FieldEntry::Line(line) => {
                    let mut parts = line.split_whitespace();
                    match (parts.next(), parts.next(), parts.next()) {
                        (Some(field_type), Some(name), None) => Ok(FieldDescriptor {
                            name: name.to_string(),
                            type_name: field_type.to_string(),
                        }),
                        _ => Err(invalid(format!(
                            "field '{line}' must look like '<type> <name>'"
                        ))),
                    }
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(SchemaDescriptor::new(type_name, fields))
    }
}

#[async_trait]
impl SchemaResolver for SchemaStaticFile {
    async fn resolve(&self, type_name: &str) -> Result<Arc<SchemaDescriptor>, SchemaError> {
        let value = self.read_static_config_json()?;
        let Some(entries) = value.as_object() else {
            return Err(Self::not_an_object());
        };

        let Some(definition) = entries.get(type_name) else {
            return Err(SchemaError::UnknownType(type_name.to_string()));
        };

        let schema = Self::parse_definition(type_name, definition)?;
        debug!("Resolved schema {type_name}: {schema:?}");
        Ok(Arc::new(schema))
    }
}
