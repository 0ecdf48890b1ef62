//! Rule keys and emission tiers.

use super::Descriptor;
use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// The three emission tiers, each with its own rule signature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmissionTier {
    Directory,
    File,
    Fragment,
}

impl fmt::Display for EmissionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EmissionTier::Directory => "directory",
            EmissionTier::File => "file",
            EmissionTier::Fragment => "fragment",
        };
        f.write_str(name)
    }
}

pub(crate) type ErasedPredicate = Arc<dyn Fn(&dyn Any) -> bool + Send + Sync>;

/// Identifies the descriptor type a rule fires for, with an optional
/// applicability predicate (default: always applies).
pub struct Key<D> {
    predicate: Option<Arc<dyn Fn(&D) -> bool + Send + Sync>>,
    _descriptor: PhantomData<fn(&D)>,
}

impl<D: Descriptor> Key<D> {
    pub fn new() -> Self {
        Self {
            predicate: None,
            _descriptor: PhantomData,
        }
    }

    /// A key whose rule only fires when `predicate` holds for the descriptor
    pub fn when<P>(predicate: P) -> Self
    where
        P: Fn(&D) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Some(Arc::new(predicate)),
            _descriptor: PhantomData,
        }
    }

    pub(crate) fn type_id(&self) -> TypeId {
        TypeId::of::<D>()
    }

    pub(crate) fn descriptor_name(&self) -> &'static str {
        type_name::<D>()
    }

    pub(crate) fn into_predicate(self) -> Option<ErasedPredicate> {
        self.predicate.map(|test| {
            let erased: ErasedPredicate = Arc::new(move |any: &dyn Any| {
                any.downcast_ref::<D>().is_some_and(|descriptor| test(descriptor))
            });
            erased
        })
    }
}

impl<D: Descriptor> Default for Key<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> fmt::Debug for Key<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Key")
            .field("descriptor", &type_name::<D>())
            .field("predicate", &self.predicate.is_some())
            .finish()
    }
}
