//! Dispatch: locate rules by descriptor type and run them in registration
//! order, skipping those whose predicate does not hold.

use super::key::EmissionTier;
use super::{paths, Descriptor, Registry};
use crate::code::{Fragment, SourceFile};
use crate::error::GenError;
use std::any::{type_name, Any, TypeId};
use std::path::Path;
use tracing::{debug, info, trace};

impl Registry {
    /// Fold every matching fragment rule over `acc` and return the result
    pub fn build_fragment<D: Descriptor>(
        &self,
        acc: Fragment,
        descriptor: &D,
    ) -> Result<Fragment, GenError> {
        let rules = self.tables.fragment.rules_for(TypeId::of::<D>());
        let any: &dyn Any = descriptor;

        let mut acc = acc;
        let mut applied = 0usize;
        for rule in rules {
            if !rule.applies(any) {
                trace!(descriptor = rule.descriptor, "Fragment rule skipped by predicate");
                continue;
            }
            acc = (rule.body)(acc, self, any)?;
            applied += 1;
        }

        debug!(
            descriptor = type_name::<D>(),
            tier = %EmissionTier::Fragment,
            registered = rules.len(),
            applied,
            items = acc.len(),
            "Built fragment"
        );
        Ok(acc)
    }

    /// Run every matching file rule against the shared `file` builder
    pub fn emit_file<D: Descriptor>(
        &self,
        file: &mut SourceFile,
        descriptor: &D,
    ) -> Result<(), GenError> {
        let rules = self.tables.file.rules_for(TypeId::of::<D>());
        let any: &dyn Any = descriptor;

        let mut applied = 0usize;
        for rule in rules {
            if !rule.applies(any) {
                trace!(descriptor = rule.descriptor, "File rule skipped by predicate");
                continue;
            }
            (rule.body)(&mut *file, self, any)?;
            applied += 1;
        }

        debug!(
            descriptor = type_name::<D>(),
            tier = %EmissionTier::File,
            module = file.module(),
            registered = rules.len(),
            applied,
            "Emitted file rules"
        );
        Ok(())
    }

    /// Materialize `path` as a file in the descriptor's module and fill it
    /// through the file tier. The file is truncated and rewritten.
    pub fn emit_file_at<D: Descriptor>(
        &self,
        path: impl AsRef<Path>,
        descriptor: &D,
    ) -> Result<(), GenError> {
        let path = path.as_ref();
        let module = descriptor
            .package()
            .ok_or(GenError::MissingPackage(type_name::<D>()))?;

        paths::prepare_file(path)?;
        let mut file = SourceFile::new(module);
        self.emit_file(&mut file, descriptor)?;
        file.write_to(path)?;
        if let Some(log) = self.write_log() {
            log.record(path);
        }

        info!(path = %path.display(), items = file.items().len(), "Wrote generated file");
        Ok(())
    }

    /// Ensure `path` is a directory, then run every matching directory rule
    pub fn emit_directory_at<D: Descriptor>(
        &self,
        path: impl AsRef<Path>,
        descriptor: &D,
    ) -> Result<(), GenError> {
        let path = path.as_ref();
        paths::ensure_directory(path)?;

        let rules = self.tables.directory.rules_for(TypeId::of::<D>());
        let any: &dyn Any = descriptor;

        let mut applied = 0usize;
        for rule in rules {
            if !rule.applies(any) {
                trace!(descriptor = rule.descriptor, "Directory rule skipped by predicate");
                continue;
            }
            (rule.body)(path, self, any)?;
            applied += 1;
        }

        debug!(
            descriptor = type_name::<D>(),
            tier = %EmissionTier::Directory,
            path = %path.display(),
            registered = rules.len(),
            applied,
            "Emitted directory rules"
        );
        Ok(())
    }
}
