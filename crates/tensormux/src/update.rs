//! Scoped update accumulation.
//!
//! A computation that wants to advance shared state builds an
//! [`UpdateBuilder`], records one update expression per target handle, and
//! commits it into a frozen [`UpdateSet`]. The set is keyed by handle
//! identity and preserves insertion order. A target takes exactly one
//! update per set; recording a second is an error, not a silent overwrite.
//!
//! `UpdateSet::apply` realizes every right-hand side and stores it into its
//! target, in insertion order. Right-hand sides are all evaluated against
//! the pre-apply contents: realization happens before any store.

use indexmap::IndexMap;
use ndarray::ArrayD;
use tensormux_expr::{SharedVar, SymExpr};
use tensormux_ndarray_backend::eval;

use crate::MuxError;

/// Accumulates one update expression per shared target.
#[derive(Default)]
pub struct UpdateBuilder {
    updates: IndexMap<SharedVar, SymExpr>,
}

impl UpdateBuilder {
    pub fn new() -> Self {
        UpdateBuilder {
            updates: IndexMap::new(),
        }
    }

    /// Record the update for `target`. Errs if `target` already has one.
    pub fn insert(
        &mut self,
        target: &SharedVar,
        update: impl Into<SymExpr>,
    ) -> Result<(), MuxError> {
        if self.updates.contains_key(target) {
            return Err(MuxError::DuplicateUpdate {
                target: target.display_name(),
            });
        }
        self.updates.insert(target.clone(), update.into());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.updates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    /// Freeze into an [`UpdateSet`].
    pub fn commit(self) -> UpdateSet {
        UpdateSet {
            updates: self.updates,
        }
    }
}

/// A committed, immutable set of updates.
pub struct UpdateSet {
    updates: IndexMap<SharedVar, SymExpr>,
}

impl UpdateSet {
    pub fn len(&self) -> usize {
        self.updates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    /// The update recorded for `target`, if any.
    pub fn get(&self, target: &SharedVar) -> Option<&SymExpr> {
        self.updates.get(target)
    }

    /// Targets and update expressions, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&SharedVar, &SymExpr)> {
        self.updates.iter()
    }

    /// Realize every update, then store the results into their targets in
    /// insertion order. Shape mismatches and missing test values propagate
    /// before any target is written.
    pub fn apply(&self) -> Result<(), MuxError> {
        let mut realized: Vec<(&SharedVar, ArrayD<f64>)> = Vec::with_capacity(self.updates.len());
        for (target, expr) in &self.updates {
            realized.push((target, eval(expr)?));
        }
        for (target, value) in realized {
            target.set_value(value)?;
        }
        Ok(())
    }
}
