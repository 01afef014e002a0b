//! Dispatch tracing.
//!
//! Records which route every dispatched operation took, for debugging code
//! that behaves differently under the two backends. Disabled by default;
//! at [`TraceLevel::Ops`] each event carries the operation and route, at
//! [`TraceLevel::Operands`] also a rendering of each operand.

use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};

use crate::{Route, Value};

/// How much each dispatch event records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TraceLevel {
    /// No tracing.
    None = 0,
    /// Operation name and route.
    Ops = 1,
    /// Operation, route, and operand renderings.
    Operands = 2,
}

/// A single dispatched operation.
#[derive(Debug, Clone)]
pub struct DispatchEvent {
    /// Sequential event id.
    pub id: usize,
    /// Time since the tracer was created or cleared.
    pub timestamp: Duration,
    /// Operation name.
    pub op: &'static str,
    /// The route the operation took.
    pub route: Route,
    /// Operand renderings, when the level records them.
    pub operands: Vec<String>,
}

impl fmt::Display for DispatchEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:6}] {} -> {}", self.id, self.op, self.route)?;
        if !self.operands.is_empty() {
            write!(f, " ({})", self.operands.join(", "))?;
        }
        Ok(())
    }
}

/// Collects [`DispatchEvent`]s.
pub struct DispatchTracer {
    level: TraceLevel,
    events: Vec<DispatchEvent>,
    start_time: Instant,
    next_id: usize,
}

impl DispatchTracer {
    pub fn new(level: TraceLevel) -> Self {
        DispatchTracer {
            level,
            events: Vec::new(),
            start_time: Instant::now(),
            next_id: 0,
        }
    }

    pub fn disabled() -> Self {
        Self::new(TraceLevel::None)
    }

    pub fn is_enabled(&self) -> bool {
        self.level != TraceLevel::None
    }

    pub fn level(&self) -> TraceLevel {
        self.level
    }

    pub fn set_level(&mut self, level: TraceLevel) {
        self.level = level;
    }

    pub(crate) fn record_dispatch(&mut self, op: &'static str, route: Route, operands: &[&Value]) {
        if self.level == TraceLevel::None {
            return;
        }
        let operands = if self.level >= TraceLevel::Operands {
            operands.iter().map(|v| v.to_string()).collect()
        } else {
            Vec::new()
        };
        let id = self.next_id;
        self.next_id += 1;
        self.events.push(DispatchEvent {
            id,
            timestamp: self.start_time.elapsed(),
            op,
            route,
            operands,
        });
    }

    pub fn events(&self) -> &[DispatchEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
        self.next_id = 0;
        self.start_time = Instant::now();
    }

    /// Aggregate counts over the collected events.
    pub fn stats(&self) -> DispatchStats {
        let mut per_op: HashMap<&'static str, usize> = HashMap::new();
        let mut eager = 0;
        let mut graph = 0;
        for event in &self.events {
            *per_op.entry(event.op).or_insert(0) += 1;
            match event.route {
                Route::Eager => eager += 1,
                Route::Graph => graph += 1,
            }
        }
        DispatchStats {
            total: self.events.len(),
            eager,
            graph,
            per_op,
        }
    }

    /// The full trace plus statistics as a printable string.
    pub fn format_trace(&self) -> String {
        let mut out = String::from("=== Dispatch Trace ===\n");
        for event in &self.events {
            out.push_str(&format!("{}\n", event));
        }
        out.push_str("\n=== Statistics ===\n");
        out.push_str(&format!("{}", self.stats()));
        out
    }
}

impl Default for DispatchTracer {
    fn default() -> Self {
        Self::disabled()
    }
}

/// Aggregate dispatch counts.
#[derive(Debug, Clone)]
pub struct DispatchStats {
    pub total: usize,
    pub eager: usize,
    pub graph: usize,
    pub per_op: HashMap<&'static str, usize>,
}

impl fmt::Display for DispatchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "dispatched: {} (eager {}, graph {})",
            self.total, self.eager, self.graph
        )?;
        let mut counts: Vec<_> = self.per_op.iter().collect();
        counts.sort_by_key(|(_, count)| std::cmp::Reverse(**count));
        for (op, count) in counts {
            writeln!(f, "  {}: {}", op, count)?;
        }
        Ok(())
    }
}
