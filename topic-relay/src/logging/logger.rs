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

//! Severity-gated node logger.

use std::fmt::{self, Display, Write as _};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex};

use super::sink::{LogSink, TracingSink};
use super::Severity;

/// Exit status used when a fatal record terminates the process.
pub const FATAL_EXIT_CODE: i32 = 1;

/// Invoked with [`FATAL_EXIT_CODE`] after a fatal record has been written.
pub type Terminator = Arc<dyn Fn(i32) + Send + Sync>;

/// Filters records by a minimum [`Severity`] and writes survivors, prefixed
/// with their level tag, to one shared sink.
///
/// `fatal`/`fatalf` terminate the process only when the record itself passed
/// the gate. A silenced logger drops fatal records and keeps running.
pub struct SeverityLogger {
    threshold: AtomicU8,
    silenced: AtomicBool,
    sink: Mutex<Box<dyn LogSink>>,
    terminator: Terminator,
}

impl SeverityLogger {
    /// Logger writing to [`TracingSink`].
    pub fn new(threshold: Severity) -> Self {
        Self::with_sink(threshold, TracingSink)
    }

    pub fn with_sink(threshold: Severity, sink: impl LogSink + 'static) -> Self {
        Self {
            threshold: AtomicU8::new(threshold as u8),
            silenced: AtomicBool::new(false),
            sink: Mutex::new(Box::new(sink)),
            terminator: Arc::new(|code| std::process::exit(code)),
        }
    }

    /// Replaces the process-exit hook run by fatal records.
    pub fn with_terminator(mut self, terminator: Terminator) -> Self {
        self.terminator = terminator;
        self
    }

    pub fn severity(&self) -> Severity {
        Severity::from_repr(self.threshold.load(Ordering::Acquire)).unwrap_or_default()
    }

    /// Sets the minimum severity and lifts any previous [`Self::silence`].
    pub fn set_severity(&self, severity: Severity) {
        self.threshold.store(severity as u8, Ordering::Release);
        self.silenced.store(false, Ordering::Release);
    }

    /// Raises the threshold above `Fatal`: nothing is written and fatal
    /// records no longer terminate.
    pub fn silence(&self) {
        self.silenced.store(true, Ordering::Release);
    }

    pub fn is_enabled(&self, severity: Severity) -> bool {
        !self.silenced.load(Ordering::Acquire) && severity >= self.severity()
    }

    /// Emits one formatted record. Returns whether it passed the gate.
    pub fn log(&self, severity: Severity, args: fmt::Arguments<'_>) -> bool {
        if !self.is_enabled(severity) {
            return false;
        }

        let line = format!("{} {}", severity.tag(), args);
        let mut sink = self.sink.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        sink.write_line(severity, &line);
        true
    }

    fn log_values(&self, severity: Severity, values: &[&dyn Display]) -> bool {
        if !self.is_enabled(severity) {
            return false;
        }
        let mut message = String::new();
        for value in values {
            let _ = write!(message, "{value}");
        }
        self.log(severity, format_args!("{message}"))
    }

    pub fn debug(&self, values: &[&dyn Display]) {
        self.log_values(Severity::Debug, values);
    }

    pub fn debugf(&self, args: fmt::Arguments<'_>) {
        self.log(Severity::Debug, args);
    }

    pub fn info(&self, values: &[&dyn Display]) {
        self.log_values(Severity::Info, values);
    }

    pub fn infof(&self, args: fmt::Arguments<'_>) {
        self.log(Severity::Info, args);
    }

    pub fn warn(&self, values: &[&dyn Display]) {
        self.log_values(Severity::Warn, values);
    }

    pub fn warnf(&self, args: fmt::Arguments<'_>) {
        self.log(Severity::Warn, args);
    }

    pub fn error(&self, values: &[&dyn Display]) {
        self.log_values(Severity::Error, values);
    }

    pub fn errorf(&self, args: fmt::Arguments<'_>) {
        self.log(Severity::Error, args);
    }

    pub fn fatal(&self, values: &[&dyn Display]) {
        if self.log_values(Severity::Fatal, values) {
            (self.terminator)(FATAL_EXIT_CODE);
        }
    }

    pub fn fatalf(&self, args: fmt::Arguments<'_>) {
        if self.log(Severity::Fatal, args) {
            (self.terminator)(FATAL_EXIT_CODE);
        }
    }
}

impl Default for SeverityLogger {
    fn default() -> Self {
        Self::new(Severity::default())
    }
}

impl fmt::Debug for SeverityLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeverityLogger")
            .field("threshold", &self.severity())
            .field("silenced", &self.silenced.load(Ordering::Acquire))
            .finish_non_exhaustive()
    }
}
