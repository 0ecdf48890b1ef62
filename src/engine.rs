//! Dispatch/composition engine
//!
//! Rules are registered into [`RuleSet`]s against the concrete type of the
//! descriptor they handle and one of three emission tiers. A [`Registry`]
//! merges rule sets and dispatches descriptors to every matching rule, in
//! registration order:
//!
//! - directory tier: ensure a directory exists, then let rules populate it
//! - file tier: rules share one mutable [`crate::code::SourceFile`]
//! - fragment tier: rules fold over a [`crate::code::Fragment`] accumulator
//!
//! Rule bodies receive the registry, so they can recurse into any tier for
//! sub-descriptors.

mod dispatch;
mod key;
pub mod paths;
mod registry;
mod rules;

pub use key::{EmissionTier, Key};
pub use registry::{Registry, WriteLog};
pub use rules::RuleSet;

use std::any::Any;

/// Something rules generate code for.
///
/// The concrete Rust type is the dispatch identity; values are immutable
/// inputs to the rules.
pub trait Descriptor: Any {
    /// Module name for descriptors written directly to a file path
    fn package(&self) -> Option<&str> {
        None
    }
}
