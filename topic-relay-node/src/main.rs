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

mod config;
mod demo;
mod signals;

use clap::Parser;
use futures::FutureExt;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use in_memory_bus::InMemoryBus;
use schema_static_file::SchemaStaticFile;
use topic_relay::logging::WriterSink;
use topic_relay::{Collaborators, RelayNode, SchemaResolver, Severity, SeverityLogger};

use crate::config::{LogSinkKind, NodeFileConfig};

const NODE_BINARY: &str = "topic-relay-node";

#[derive(Debug, Parser)]
#[command(name = NODE_BINARY)]
#[command(
    about = "Discovers advertised topics, subscribes to them and republishes string messages"
)]
struct Cli {
    /// JSON5 configuration file.
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Overrides the configured minimum log severity.
    #[arg(long)]
    severity: Option<Severity>,

    /// Static message type definitions used to resolve schemas.
    #[arg(
        long,
        default_value = "utils/schema-static-file/static-configs/std_msgs.json"
    )]
    schemas: String,

    /// Upper bound on how long one pump iteration waits for deliveries.
    #[arg(long, default_value_t = 100)]
    spin_timeout_ms: u64,

    /// Remaining arguments are accepted and ignored.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    passthrough: Vec<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{NODE_BINARY} failed: {error:#}");
            ExitCode::from(2)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut file_config = match &cli.config {
        Some(path) => NodeFileConfig::load(path)?,
        None => NodeFileConfig::default(),
    };
    if let Some(severity) = cli.severity {
        file_config.relay.severity = severity;
    }
    if !cli.passthrough.is_empty() {
        debug!(args = ?cli.passthrough, "ignoring pass-through arguments");
    }

    let severity = file_config.relay.severity;
    let logger = Arc::new(match file_config.log_sink {
        LogSinkKind::Tracing => SeverityLogger::new(severity),
        LogSinkKind::Stderr => SeverityLogger::with_sink(severity, WriterSink::stderr()),
    });

    let bus = InMemoryBus::new(format!("/{}", file_config.relay.node_name.trim_start_matches('/')));
    let resolver: Arc<dyn SchemaResolver> = Arc::new(SchemaStaticFile::new(cli.schemas.clone()));
    let collaborators = Collaborators::new(
        Arc::new(bus.clone()),
        Arc::new(bus.clone()),
        resolver.clone(),
    );

    let node = match RelayNode::start(&file_config.relay, logger.clone(), collaborators).await {
        Ok(node) => node,
        Err(err) => {
            logger.fatalf(format_args!("Unable to start relay node: {err}"));
            return Err(err.into());
        }
    };

    let demos = demo::spawn_demo_publishers(&bus, resolver, &file_config.demo_publishers).await;

    logger.info(&[&"Spinning..."]);
    let spin_timeout = Duration::from_millis(cli.spin_timeout_ms.max(1));
    let shutdown = signals::shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        if let Some(signal) = (&mut shutdown).now_or_never() {
            logger.debug(&[&"Received ", &signal, &"."]);
            break;
        }
        bus.spin_once(spin_timeout).await;
    }

    logger.info(&[&"Shutting down..."]);
    for task in demos {
        task.abort();
    }
    let registry = node.shutdown().await?;
    info!(topics = ?registry.topics(), "subscriptions held at shutdown");

    Ok(())
}
