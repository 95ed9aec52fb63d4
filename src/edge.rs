//! Edge callback registry and dispatch.
//!
//! Each [`ChannelHandle`](crate::ChannelHandle) owns one [`EdgeRegistry`]
//! holding three independent callback lists: rising, falling and either.
//! The handle arms a single either-edge interrupt and, for each delivered
//! edge, calls [`EdgeRegistry::dispatch`] with the sampled level:
//!
//! - `High`: every rising callback, then every either callback
//! - `Low`: every falling callback, then every either callback
//!
//! Callbacks within a list run in registration order. A callback that
//! panics is reported as a [`GpioError::CallbackFault`] and the remaining
//! callbacks still run.
//!
//! # Example
//!
//! ```rust
//! use pi_header::edge::{Edge, EdgeRegistry};
//! use pi_header::traits::Level;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! let hits = Arc::new(AtomicUsize::new(0));
//! let mut registry = EdgeRegistry::new();
//!
//! let counter = Arc::clone(&hits);
//! registry.register(Edge::Rising, Box::new(move || {
//!     counter.fetch_add(1, Ordering::SeqCst);
//! }));
//!
//! let report = registry.dispatch(Level::High);
//! assert_eq!(report.invoked, 1);
//! assert_eq!(hits.load(Ordering::SeqCst), 1);
//!
//! // Falling edges do not reach rising callbacks
//! registry.dispatch(Level::Low);
//! assert_eq!(hits.load(Ordering::SeqCst), 1);
//! ```

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::error::GpioError;
use crate::traits::Level;

/// Which transitions a callback is interested in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Edge {
    /// Low to high.
    Rising,
    /// High to low.
    Falling,
    /// Any transition.
    Either,
}

impl Edge {
    /// Returns the edge kind as a lowercase string.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Edge::Rising => "rising",
            Edge::Falling => "falling",
            Edge::Either => "either",
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies one registered callback.
///
/// Sequence numbers are assigned per edge kind, starting at 0, and are
/// not reused until [`EdgeRegistry::clear`] resets the counters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CallbackId {
    /// Registry the callback lives in.
    pub edge: Edge,
    /// Position in registration order within that registry.
    pub seq: u32,
}

impl fmt::Display for CallbackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.edge, self.seq)
    }
}

/// A zero-argument edge callback.
///
/// Callbacks run on the backend's interrupt thread, so they must be `Send`
/// and must guard any state they share with the caller.
pub type EdgeCallback = Box<dyn FnMut() + Send + 'static>;

#[derive(Default)]
struct CallbackList {
    callbacks: BTreeMap<u32, EdgeCallback>,
    next_seq: u32,
}

impl CallbackList {
    fn push(&mut self, callback: EdgeCallback) -> u32 {
        let seq = self.next_seq;
        self.callbacks.insert(seq, callback);
        self.next_seq += 1;
        seq
    }
}

/// Outcome of dispatching one edge.
#[derive(Debug, Default, PartialEq)]
pub struct DispatchReport {
    /// Number of callbacks that were called, including faulted ones.
    pub invoked: usize,
    /// One [`GpioError::CallbackFault`] per callback that panicked.
    pub faults: Vec<GpioError>,
}

/// Per-handle registry of rising, falling and either-edge callbacks.
#[derive(Default)]
pub struct EdgeRegistry {
    rising: CallbackList,
    falling: CallbackList,
    either: CallbackList,
}

impl EdgeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn list(&self, edge: Edge) -> &CallbackList {
        match edge {
            Edge::Rising => &self.rising,
            Edge::Falling => &self.falling,
            Edge::Either => &self.either,
        }
    }

    fn list_mut(&mut self, edge: Edge) -> &mut CallbackList {
        match edge {
            Edge::Rising => &mut self.rising,
            Edge::Falling => &mut self.falling,
            Edge::Either => &mut self.either,
        }
    }

    /// Appends `callback` to the list for `edge`.
    pub fn register(&mut self, edge: Edge, callback: EdgeCallback) -> CallbackId {
        let seq = self.list_mut(edge).push(callback);
        CallbackId { edge, seq }
    }

    /// Removes exactly the callback identified by `id`.
    ///
    /// Fails with [`GpioError::CallbackNotFound`] if it was never
    /// registered or has already been removed.
    pub fn deregister(&mut self, id: CallbackId) -> Result<(), GpioError> {
        self.list_mut(id.edge)
            .callbacks
            .remove(&id.seq)
            .map(drop)
            .ok_or(GpioError::CallbackNotFound(id))
    }

    /// Empties all three lists and resets their sequence counters to 0.
    pub fn clear(&mut self) {
        self.rising = CallbackList::default();
        self.falling = CallbackList::default();
        self.either = CallbackList::default();
    }

    /// Number of callbacks registered for `edge`.
    pub fn len(&self, edge: Edge) -> usize {
        self.list(edge).callbacks.len()
    }

    /// Returns `true` if no callbacks are registered at all.
    pub fn is_empty(&self) -> bool {
        self.rising.callbacks.is_empty()
            && self.falling.callbacks.is_empty()
            && self.either.callbacks.is_empty()
    }

    /// Runs the callbacks for an edge that left the line at `level`.
    pub fn dispatch(&mut self, level: Level) -> DispatchReport {
        let primary = if level.is_high() {
            Edge::Rising
        } else {
            Edge::Falling
        };

        let mut report = DispatchReport::default();
        for edge in [primary, Edge::Either] {
            for (&seq, callback) in self.list_mut(edge).callbacks.iter_mut() {
                report.invoked += 1;
                if let Err(payload) = catch_unwind(AssertUnwindSafe(|| callback())) {
                    let message = panic_message(payload.as_ref());
                    log::warn!("{edge} callback #{seq} panicked: {message}");
                    report.faults.push(GpioError::CallbackFault { edge, seq, message });
                }
            }
        }
        report
    }
}

impl fmt::Debug for EdgeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EdgeRegistry")
            .field("rising", &self.rising.callbacks.len())
            .field("falling", &self.falling.callbacks.len())
            .field("either", &self.either.callbacks.len())
            .finish()
    }
}

fn panic_message(payload: &(dyn core::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        String::from(*s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        String::from("non-string panic payload")
    }
}
