//! Capability Bag
//!
//! A heterogeneous list of typed markers attached to a descriptor. Markers are
//! retrieved by type only; there is no name-based lookup and no removal once
//! the bag has been assembled.

use crate::error::CapabilityError;
use std::any::{type_name, Any};
use std::fmt;
use std::sync::Arc;

/// A capability marker. Implemented for every `Debug + Send + Sync + 'static`
/// type, so rule packages can define their own markers without registration.
pub trait Marker: Any + fmt::Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any + fmt::Debug + Send + Sync> Marker for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Ordered, immutable set of capability markers
#[derive(Debug, Clone, Default)]
pub struct Capabilities {
    markers: Vec<Arc<dyn Marker>>,
}

impl Capabilities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a marker while assembling the bag
    pub fn with<M: Marker>(mut self, marker: M) -> Self {
        self.markers.push(Arc::new(marker));
        self
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    fn iter_of<T: Marker>(&self) -> impl Iterator<Item = &T> {
        // Deref through the Arc: calling `as_any` on the Arc itself would
        // resolve to the blanket impl for `Arc<dyn Marker>`.
        self.markers
            .iter()
            .filter_map(|marker| (**marker).as_any().downcast_ref::<T>())
    }

    /// True iff at least one marker of type `T` is present
    pub fn has<T: Marker>(&self) -> bool {
        self.iter_of::<T>().next().is_some()
    }

    /// The single marker of type `T`, if any.
    ///
    /// Fails when more than one marker of that type is present.
    pub fn get<T: Marker>(&self) -> Result<Option<&T>, CapabilityError> {
        self.get_matching::<T, _>(|_| true)
    }

    /// The single marker of type `T` satisfying `filter`, if any
    pub fn get_matching<T, F>(&self, filter: F) -> Result<Option<&T>, CapabilityError>
    where
        T: Marker,
        F: Fn(&T) -> bool,
    {
        let mut matches = self.iter_of::<T>().filter(|marker| filter(marker));
        let first = matches.next();
        let extra = matches.count();
        if extra > 0 {
            return Err(CapabilityError::Ambiguous {
                marker: type_name::<T>(),
                count: extra + 1,
            });
        }
        Ok(first)
    }

    /// Like [`Capabilities::get`], but absence is an error.
    ///
    /// Rules that assume a marker is present use this so that a missing
    /// capability aborts the run instead of being skipped.
    pub fn require<T: Marker>(&self, context: &str) -> Result<&T, CapabilityError> {
        self.get::<T>()?.ok_or_else(|| CapabilityError::Missing {
            marker: type_name::<T>(),
            context: context.to_string(),
        })
    }

    /// Every marker of type `T`, in bag order
    pub fn get_all<T: Marker>(&self) -> Vec<&T> {
        self.iter_of::<T>().collect()
    }

    /// Every marker of type `T` satisfying `filter`, in bag order
    pub fn get_all_matching<T, F>(&self, filter: F) -> Vec<&T>
    where
        T: Marker,
        F: Fn(&T) -> bool,
    {
        self.iter_of::<T>().filter(|marker| filter(marker)).collect()
    }
}

impl<M: Marker> FromIterator<M> for Capabilities {
    fn from_iter<I: IntoIterator<Item = M>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Capabilities::new(), |bag, marker| bag.with(marker))
    }
}
