//! Rule registrations and the append-only [`RuleSet`].

use super::key::{EmissionTier, ErasedPredicate, Key};
use super::{Descriptor, Registry};
use crate::code::{Fragment, SourceFile};
use crate::error::GenError;
use parking_lot::Mutex;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

pub(crate) type DirectoryBody =
    Arc<dyn Fn(&Path, &Registry, &dyn Any) -> Result<(), GenError> + Send + Sync>;
pub(crate) type FileBody =
    Arc<dyn Fn(&mut SourceFile, &Registry, &dyn Any) -> Result<(), GenError> + Send + Sync>;
pub(crate) type FragmentBody =
    Arc<dyn Fn(Fragment, &Registry, &dyn Any) -> Result<Fragment, GenError> + Send + Sync>;

/// One registration: descriptor type, predicate, body
pub(crate) struct Rule<H> {
    pub(crate) descriptor: &'static str,
    predicate: Option<ErasedPredicate>,
    pub(crate) body: H,
}

impl<H: Clone> Clone for Rule<H> {
    fn clone(&self) -> Self {
        Self {
            descriptor: self.descriptor,
            predicate: self.predicate.clone(),
            body: self.body.clone(),
        }
    }
}

impl<H> Rule<H> {
    pub(crate) fn applies(&self, descriptor: &dyn Any) -> bool {
        self.predicate.as_ref().map_or(true, |test| test(descriptor))
    }
}

/// Rules of one tier, keyed by descriptor type.
///
/// Stored lists are immutable and shared; appending always builds a new list,
/// so a cloned table never observes appends made to its source or vice versa.
pub(crate) struct RuleTable<H> {
    by_type: HashMap<TypeId, Arc<[Rule<H>]>>,
}

impl<H> Default for RuleTable<H> {
    fn default() -> Self {
        Self {
            by_type: HashMap::new(),
        }
    }
}

impl<H> Clone for RuleTable<H> {
    fn clone(&self) -> Self {
        Self {
            by_type: self.by_type.clone(),
        }
    }
}

impl<H: Clone> RuleTable<H> {
    fn push(&mut self, type_id: TypeId, rule: Rule<H>) {
        self.extend(type_id, std::iter::once(rule));
    }

    fn extend(&mut self, type_id: TypeId, rules: impl IntoIterator<Item = Rule<H>>) {
        let list: Vec<Rule<H>> = self
            .by_type
            .get(&type_id)
            .map(|existing| existing.to_vec())
            .unwrap_or_default()
            .into_iter()
            .chain(rules)
            .collect();
        self.by_type.insert(type_id, list.into());
    }

    /// Append every list of `other` after this table's list for the same type
    pub(crate) fn append(&mut self, other: &RuleTable<H>) {
        for (type_id, rules) in &other.by_type {
            self.extend(*type_id, rules.iter().cloned());
        }
    }
}

impl<H> RuleTable<H> {
    pub(crate) fn rules_for(&self, type_id: TypeId) -> &[Rule<H>] {
        self.by_type
            .get(&type_id)
            .map(|rules| &**rules)
            .unwrap_or(&[])
    }

    pub(crate) fn len(&self) -> usize {
        self.by_type.values().map(|rules| rules.len()).sum()
    }

    pub(crate) fn shares_list_with(&self, other: &RuleTable<H>, type_id: TypeId) -> bool {
        match (self.by_type.get(&type_id), other.by_type.get(&type_id)) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// All three tiers
#[derive(Clone, Default)]
pub(crate) struct RuleTables {
    pub(crate) directory: RuleTable<DirectoryBody>,
    pub(crate) file: RuleTable<FileBody>,
    pub(crate) fragment: RuleTable<FragmentBody>,
}

impl RuleTables {
    pub(crate) fn append(&mut self, other: &RuleTables) {
        self.directory.append(&other.directory);
        self.file.append(&other.file);
        self.fragment.append(&other.fragment);
    }

    pub(crate) fn len(&self, tier: EmissionTier) -> usize {
        match tier {
            EmissionTier::Directory => self.directory.len(),
            EmissionTier::File => self.file.len(),
            EmissionTier::Fragment => self.fragment.len(),
        }
    }

    pub(crate) fn count_for(&self, type_id: TypeId, tier: EmissionTier) -> usize {
        match tier {
            EmissionTier::Directory => self.directory.rules_for(type_id).len(),
            EmissionTier::File => self.file.rules_for(type_id).len(),
            EmissionTier::Fragment => self.fragment.rules_for(type_id).len(),
        }
    }
}

/// An accumulating collection of rule registrations.
///
/// Built once by a rule-providing package, then merged into registries.
/// Registration takes `&self` behind a mutex, so several initializers may
/// register into a shared set; each caller's own calls keep program order.
#[derive(Default)]
pub struct RuleSet {
    tables: Mutex<RuleTables>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_directory_rule<D, F>(&self, key: Key<D>, body: F) -> &Self
    where
        D: Descriptor,
        F: Fn(&Path, &Registry, &D) -> Result<(), GenError> + Send + Sync + 'static,
    {
        let (type_id, expected) = (key.type_id(), key.descriptor_name());
        let erased: DirectoryBody = Arc::new(
            move |path: &Path, registry: &Registry, any: &dyn Any| match any.downcast_ref::<D>() {
                Some(descriptor) => body(path, registry, descriptor),
                None => Err(GenError::DescriptorMismatch { expected }),
            },
        );
        let rule = Rule {
            descriptor: expected,
            predicate: key.into_predicate(),
            body: erased,
        };
        self.tables.lock().directory.push(type_id, rule);
        self
    }

    pub fn add_file_rule<D, F>(&self, key: Key<D>, body: F) -> &Self
    where
        D: Descriptor,
        F: Fn(&mut SourceFile, &Registry, &D) -> Result<(), GenError> + Send + Sync + 'static,
    {
        let (type_id, expected) = (key.type_id(), key.descriptor_name());
        let erased: FileBody = Arc::new(
            move |file: &mut SourceFile, registry: &Registry, any: &dyn Any| {
                match any.downcast_ref::<D>() {
                    Some(descriptor) => body(file, registry, descriptor),
                    None => Err(GenError::DescriptorMismatch { expected }),
                }
            },
        );
        let rule = Rule {
            descriptor: expected,
            predicate: key.into_predicate(),
            body: erased,
        };
        self.tables.lock().file.push(type_id, rule);
        self
    }

    pub fn add_fragment_rule<D, F>(&self, key: Key<D>, body: F) -> &Self
    where
        D: Descriptor,
        F: Fn(Fragment, &Registry, &D) -> Result<Fragment, GenError> + Send + Sync + 'static,
    {
        let (type_id, expected) = (key.type_id(), key.descriptor_name());
        let erased: FragmentBody = Arc::new(
            move |acc: Fragment, registry: &Registry, any: &dyn Any| match any.downcast_ref::<D>() {
                Some(descriptor) => body(acc, registry, descriptor),
                None => Err(GenError::DescriptorMismatch { expected }),
            },
        );
        let rule = Rule {
            descriptor: expected,
            predicate: key.into_predicate(),
            body: erased,
        };
        self.tables.lock().fragment.push(type_id, rule);
        self
    }

    /// Number of registrations in a tier
    pub fn len(&self, tier: EmissionTier) -> usize {
        self.tables.lock().len(tier)
    }

    pub fn is_empty(&self) -> bool {
        let tables = self.tables.lock();
        [EmissionTier::Directory, EmissionTier::File, EmissionTier::Fragment]
            .iter()
            .all(|tier| tables.len(*tier) == 0)
    }

    pub(crate) fn snapshot(&self) -> RuleTables {
        self.tables.lock().clone()
    }
}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tables = self.tables.lock();
        f.debug_struct("RuleSet")
            .field("directory", &tables.len(EmissionTier::Directory))
            .field("file", &tables.len(EmissionTier::File))
            .field("fragment", &tables.len(EmissionTier::Fragment))
            .finish()
    }
}
