//! Shared value handles.
//!
//! A [`SharedVar`] is the persistent, mutable slot a computation updates
//! between evaluations. It is a reference-typed handle: equality and hashing
//! go by handle identity, never by contents, so collections keyed by shared
//! variables behave as reference-keyed maps. Clones alias the same cell.
//!
//! The cell is `Rc<RefCell<_>>`: the dispatch layer is single-threaded by
//! contract and handles are not sendable across threads.

use std::cell::{Ref, RefCell};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use ndarray::ArrayD;
use serde::de::Deserializer;
use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};

use crate::ExprError;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// A mutable, identity-compared, optionally named wrapper around a concrete
/// array.
#[derive(Clone)]
pub struct SharedVar {
    id: u64,
    name: Option<String>,
    cell: Rc<RefCell<ArrayD<f64>>>,
}

impl SharedVar {
    pub fn new(value: ArrayD<f64>) -> Self {
        SharedVar {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            name: None,
            cell: Rc::new(RefCell::new(value)),
        }
    }

    pub fn with_name(value: ArrayD<f64>, name: impl Into<String>) -> Self {
        let mut var = SharedVar::new(value);
        var.name = Some(name.into());
        var
    }

    /// Process-unique handle id.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Diagnostic name, if one was given.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Name for error messages and rendering: the given name, or `shared#id`.
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(n) => n.clone(),
            None => format!("shared#{}", self.id),
        }
    }

    /// Borrow the current contents. This is a view of the live cell, not a
    /// copy; usual `RefCell` borrow rules apply.
    pub fn get_value(&self) -> Ref<'_, ArrayD<f64>> {
        self.cell.borrow()
    }

    /// Overwrite the contents in place. The new value must have the same
    /// shape as the current one.
    pub fn set_value(&self, new_value: ArrayD<f64>) -> Result<(), ExprError> {
        let mut cell = self
            .cell
            .try_borrow_mut()
            .map_err(|_| ExprError::SharedInUse {
                name: self.display_name(),
            })?;
        if cell.shape() != new_value.shape() {
            return Err(ExprError::SharedShapeMismatch {
                name: self.display_name(),
                current: cell.shape().to_vec(),
                new: new_value.shape().to_vec(),
            });
        }
        *cell = new_value;
        Ok(())
    }

    pub fn shape(&self) -> Vec<usize> {
        self.cell.borrow().shape().to_vec()
    }

    pub fn ndim(&self) -> usize {
        self.cell.borrow().ndim()
    }
}

// Identity, not contents: two handles are equal iff they are the same handle.
impl PartialEq for SharedVar {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for SharedVar {}

impl Hash for SharedVar {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for SharedVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedVar")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("shape", &self.shape())
            .finish()
    }
}

// Serialization snapshots name and contents. Deserialization allocates a
// fresh handle: identity does not survive a round trip.
impl Serialize for SharedVar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("SharedVar", 2)?;
        s.serialize_field("name", &self.name)?;
        s.serialize_field("value", &*self.get_value())?;
        s.end()
    }
}

impl<'de> Deserialize<'de> for SharedVar {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Snapshot {
            name: Option<String>,
            value: ArrayD<f64>,
        }
        let snap = Snapshot::deserialize(deserializer)?;
        let mut var = SharedVar::new(snap.value);
        var.name = snap.name;
        Ok(var)
    }
}
