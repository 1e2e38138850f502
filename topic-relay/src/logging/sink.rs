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

//! Output sinks that receive tagged log lines from [`crate::SeverityLogger`].

use std::io::Write;
use std::sync::{Arc, Mutex};

use super::Severity;

pub(crate) const NODE_LOG_TARGET: &str = "topic_relay::node_log";

/// Destination for fully formatted, already gated log lines.
///
/// The logger serializes calls into a sink, so implementations only see one
/// line at a time. Write failures stay inside the sink.
pub trait LogSink: Send {
    fn write_line(&mut self, severity: Severity, line: &str);
}

/// Forwards each line as a `tracing` event at the matching level.
///
/// Fatal lines are emitted as `error` events since `tracing` has no higher level.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn write_line(&mut self, severity: Severity, line: &str) {
        match severity {
            Severity::Debug => tracing::debug!(target: NODE_LOG_TARGET, "{line}"),
            Severity::Info => tracing::info!(target: NODE_LOG_TARGET, "{line}"),
            Severity::Warn => tracing::warn!(target: NODE_LOG_TARGET, "{line}"),
            Severity::Error | Severity::Fatal => {
                tracing::error!(target: NODE_LOG_TARGET, "{line}")
            }
        }
    }
}

/// Writes newline-terminated lines to any [`Write`] implementation.
pub struct WriterSink<W: Write + Send> {
    writer: W,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl WriterSink<std::io::Stderr> {
    pub fn stderr() -> Self {
        Self::new(std::io::stderr())
    }
}

impl<W: Write + Send> LogSink for WriterSink<W> {
    fn write_line(&mut self, _severity: Severity, line: &str) {
        let _ = writeln!(self.writer, "{line}");
        let _ = self.writer.flush();
    }
}

/// Keeps emitted lines in memory. Clones share the same buffer.
#[derive(Clone, Debug, Default)]
pub struct CaptureSink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        match self.lines.lock() {
            Ok(lines) => lines.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn clear(&self) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.clear();
        }
    }
}

impl LogSink for CaptureSink {
    fn write_line(&mut self, _severity: Severity, line: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CaptureSink, LogSink, WriterSink};
    use crate::Severity;

    #[test]
    fn writer_sink_terminates_each_line() {
        let mut sink = WriterSink::new(Vec::new());
        sink.write_line(Severity::Info, "[INFO] one");
        sink.write_line(Severity::Warn, "[WARN] two");

        let written = String::from_utf8(sink.writer).expect("utf8 output");
        assert_eq!(written, "[INFO] one\n[WARN] two\n");
    }

    #[test]
    fn capture_sink_clones_share_lines() {
        let sink = CaptureSink::new();
        let mut writer = sink.clone();
        writer.write_line(Severity::Error, "[ERROR] boom");

        assert_eq!(sink.lines(), vec!["[ERROR] boom".to_string()]);
        sink.clear();
        assert!(writer.lines().is_empty());
    }
}
