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

//! Node logging layer.
//!
//! [`SeverityLogger`] is the node's user-facing diagnostic channel: it gates
//! records by a minimum [`Severity`] and serializes tagged lines into one
//! [`LogSink`]. The default sink forwards into `tracing`, so records end up in
//! whatever subscriber the binary installed.
//!
//! ```
//! use topic_relay::logging::CaptureSink;
//! use topic_relay::{Severity, SeverityLogger};
//!
//! let sink = CaptureSink::new();
//! let logger = SeverityLogger::with_sink(Severity::Info, sink.clone());
//! logger.debug(&[&"x"]);
//! logger.info(&[&"y"]);
//! assert_eq!(sink.lines(), vec!["[INFO] y".to_string()]);
//! ```

mod logger;
mod severity;
mod sink;

pub use logger::{SeverityLogger, Terminator, FATAL_EXIT_CODE};
pub use severity::Severity;
pub use sink::{CaptureSink, LogSink, TracingSink, WriterSink};
