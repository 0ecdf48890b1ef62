//! Rule package: storage-mapping scaffolding.
//!
//! For every entity, writes `{snake}{suffix}` into the mapping directory with
//! an internal representation type, the repository implementation struct, its
//! constructor parameters and a constructor. An optional index file collects
//! the constructors for downstream wiring.
//!
//! Each part of the file is its own descriptor, so capability rule sets and
//! callers can contribute fields, assignments and functions for specific
//! entities. Callers with one-off rules extend a clone of [`registry`]:
//!
//! ```ignore
//! let tenant = RuleSet::new();
//! tenant.add_fragment_rule(
//!     Key::<InternalFields>::when(|d| d.entity.name() == "Theme"),
//!     |acc, _, _| Ok(acc.push("pub tenant_id: String")),
//! );
//! let registry = mapping::registry().with_rules(&tenant);
//! ```

mod capabilities;
mod naming;

pub use capabilities::{
    associate_rules, crud_rules, filter_keys_rules, list_by_associated_key_rules, search_rules,
};
pub use naming::{qualify, Naming};

use crate::code::Fragment;
use crate::data::RUNTIME;
use crate::engine::{Descriptor, Key, Registry, RuleSet};
use crate::error::GenError;
use crate::inflect::Inflector;
use crate::model::Entity;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Slot the constructor binds its mapping template local to
pub const TEMPLATE_SLOT: &str = "template";

/// The mapping directory
#[derive(Debug, Clone)]
pub struct DirectoryMain {
    pub package: String,
    /// Module path of the repository traits
    pub interface_module: String,
    pub generate_index: bool,
    pub index_module: String,
    pub file_suffix: String,
    pub index_file: String,
    pub header: Option<String>,
    pub entities: Vec<Arc<Entity>>,
}

impl DirectoryMain {
    /// File the entity's scaffolding is written to, relative to the directory
    pub fn file_name(&self, entity: &Entity, inflector: &dyn Inflector) -> String {
        format!("{}{}", inflector.snake(entity.name()), self.file_suffix)
    }

    /// Every file the directory rules write, in write order
    pub fn planned_files(&self, inflector: &dyn Inflector) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = self
            .entities
            .iter()
            .map(|entity| PathBuf::from(self.file_name(entity, inflector)))
            .collect();
        if self.generate_index {
            files.push(PathBuf::from(&self.index_file));
        }
        files
    }

    /// Fails when two planned files share a name, since the later write
    /// would replace the earlier one
    pub fn check_files(&self, inflector: &dyn Inflector) -> Result<(), GenError> {
        let mut owners: HashMap<String, String> = HashMap::new();
        if self.generate_index {
            owners.insert(self.index_file.clone(), "the index file".to_string());
        }
        for entity in &self.entities {
            let file = self.file_name(entity, inflector);
            let owner = format!("entity {}", entity.name());
            if let Some(previous) = owners.insert(file.clone(), owner.clone()) {
                return Err(GenError::Model(format!(
                    "{previous} and {owner} would both be written to {file}"
                )));
            }
        }
        Ok(())
    }
}

impl Descriptor for DirectoryMain {}

/// Index file listing every generated constructor
#[derive(Debug, Clone)]
pub struct IndexMain {
    pub package: String,
    pub index_module: String,
    pub header: Option<String>,
    pub entities: Vec<Arc<Entity>>,
}

impl Descriptor for IndexMain {
    fn package(&self) -> Option<&str> {
        Some(&self.package)
    }
}

/// One entity's mapping file
#[derive(Debug, Clone)]
pub struct FileMain {
    pub package: String,
    pub interface_module: String,
    pub header: Option<String>,
    pub entity: Arc<Entity>,
}

impl Descriptor for FileMain {
    fn package(&self) -> Option<&str> {
        Some(&self.package)
    }
}

macro_rules! entity_descriptor {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name {
            pub entity: Arc<Entity>,
        }

        impl Descriptor for $name {}
    };
    ($(#[$meta:meta])* $name:ident, interface) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name {
            pub entity: Arc<Entity>,
            pub interface_module: String,
        }

        impl Descriptor for $name {}
    };
}

entity_descriptor!(
    /// Leading fields of the internal type (the wrapped entity)
    InternalSuperFields
);
entity_descriptor!(
    /// Extra fields of the internal type
    InternalFields
);
entity_descriptor!(
    /// File-tier hook for functions on the internal type
    InternalFunctions
);
entity_descriptor!(
    /// Fields of the repository implementation struct
    ImplFields,
    interface
);
entity_descriptor!(
    /// Field initializers of the implementation struct in the constructor
    ImplFieldAssignments,
    interface
);
entity_descriptor!(
    /// Fields of the constructor parameters struct
    CtorParamsFields,
    interface
);
entity_descriptor!(
    /// Constructor statements before the implementation is built
    Ctor
);
entity_descriptor!(
    /// Extra options passed to the CRUD template
    CrudTemplateParams
);

fn base_directory_rules(rules: &RuleSet) {
    rules.add_directory_rule(Key::<DirectoryMain>::new(), |dir, registry, main| {
        let inflector = registry.inflector();
        main.check_files(inflector)?;
        for entity in &main.entities {
            registry.emit_file_at(
                dir.join(main.file_name(entity, inflector)),
                &FileMain {
                    package: main.package.clone(),
                    interface_module: main.interface_module.clone(),
                    header: main.header.clone(),
                    entity: Arc::clone(entity),
                },
            )?;
        }

        if main.generate_index {
            registry.emit_file_at(
                dir.join(&main.index_file),
                &IndexMain {
                    package: main.package.clone(),
                    index_module: main.index_module.clone(),
                    header: main.header.clone(),
                    entities: main.entities.clone(),
                },
            )?;
        }
        Ok(())
    });
}

fn base_index_rules(rules: &RuleSet) {
    rules.add_file_rule(Key::<IndexMain>::new(), |file, registry, index| {
        if let Some(header) = &index.header {
            file.set_header(header.as_str());
        }
        file.import(RUNTIME);

        let mut provided = vec![
            "data::mapping::new_db".to_string(),
            "data::mapping::new_context_builder".to_string(),
        ];
        for entity in &index.entities {
            provided.push(Naming::of(entity, registry.inflector())?.ctor);
        }
        let chain: Vec<String> = provided
            .iter()
            .map(|ctor| format!("        .provide({ctor})"))
            .collect();

        file.add(format!(
            "/// index collects the repository constructors of this module\n\
             pub fn index() -> data::mapping::Module {{\n    \
             data::mapping::Module::new({:?})\n{}\n}}",
            index.index_module,
            chain.join("\n")
        ));
        Ok(())
    });
}

fn base_file_rules(rules: &RuleSet) {
    rules.add_file_rule(Key::<FileMain>::new(), |file, registry, main| {
        let entity = &main.entity;
        let names = Naming::of(entity, registry.inflector())?;
        let ty = entity.type_path();

        if let Some(header) = &main.header {
            file.set_header(header.as_str());
        }
        file.import(RUNTIME);

        let internal = registry
            .build_fragment(
                Fragment::new(),
                &InternalSuperFields {
                    entity: Arc::clone(entity),
                },
            )?
            .append(registry.build_fragment(
                Fragment::new(),
                &InternalFields {
                    entity: Arc::clone(entity),
                },
            )?);
        file.add(format!(
            "/// {} is the internal representation of {}\n\
             #[derive(Debug, Clone, Default)]\n\
             pub struct {} {{\n{}\n}}",
            names.internal,
            names.struct_name,
            names.internal,
            internal.render(4, ",")
        ));

        registry.emit_file(
            &mut *file,
            &InternalFunctions {
                entity: Arc::clone(entity),
            },
        )?;

        let impl_fields = registry.build_fragment(
            Fragment::new().push(format!(
                "pub template: data::mapping::MappingTemplate<{ty}, {}>",
                names.internal
            )),
            &ImplFields {
                entity: Arc::clone(entity),
                interface_module: main.interface_module.clone(),
            },
        )?;
        file.add(format!(
            "/// {} is the implementation of {}\n\
             pub struct {} {{\n{}\n}}",
            names.implementation,
            entity.interface_name(),
            names.implementation,
            impl_fields.render(4, ",")
        ));

        let params = registry.build_fragment(
            Fragment::new(),
            &CtorParamsFields {
                entity: Arc::clone(entity),
                interface_module: main.interface_module.clone(),
            },
        )?;
        let params_decl = if params.is_empty() {
            format!("pub struct {} {{}}", names.params)
        } else {
            format!("pub struct {} {{\n{}\n}}", names.params, params.render(4, ","))
        };
        file.add(format!(
            "/// {} are the parameters for {}\n{params_decl}",
            names.params,
            entity.interface_name()
        ));

        let ctor = registry.build_fragment(
            Fragment::new(),
            &Ctor {
                entity: Arc::clone(entity),
            },
        )?;
        let assignments = registry.build_fragment(
            Fragment::inheriting(&ctor),
            &ImplFieldAssignments {
                entity: Arc::clone(entity),
                interface_module: main.interface_module.clone(),
            },
        )?;
        let params_id = if params.is_empty() { "_params" } else { "params" };
        file.add(format!(
            "/// {ctor_name} creates a new {iface}\n\
             pub fn {ctor_name}({params_id}: {params_ty}) -> {implementation} {{\n\
             {statements}\n    \
             {implementation} {{\n{assignments}\n    }}\n}}",
            ctor_name = names.ctor,
            iface = entity.interface_name(),
            params_ty = names.params,
            implementation = names.implementation,
            statements = ctor.render(4, ""),
            assignments = assignments.render(8, ","),
        ));

        debug!(entity = entity.name(), table = %names.table_name, "Emitted mapping scaffolding");
        Ok(())
    });
}

fn base_fragment_rules(rules: &RuleSet) {
    rules
        .add_fragment_rule(Key::<InternalSuperFields>::new(), |acc, _, fields| {
            Ok(acc.push(format!("pub inner: {}", fields.entity.type_path())))
        })
        .add_fragment_rule(Key::<Ctor>::new(), |acc, registry, ctor| {
            let entity = &ctor.entity;
            let names = Naming::of(entity, registry.inflector())?;
            let ty = entity.type_path();
            let extra_fields = !registry
                .build_fragment(
                    Fragment::new(),
                    &InternalFields {
                        entity: Arc::clone(entity),
                    },
                )?
                .is_empty();
            let rest = if extra_fields { ", ..Default::default()" } else { "" };

            let mut params = Fragment::new();
            if let Some(scope) = &names.context_scope {
                params = params.push(format!("context_scope: Some({scope})"));
            }
            let params = params
                .push(format!("table: {:?}", names.table_name))
                .push(format!(
                    "to_internal: |m: {ty}| {} {{ inner: m{rest} }}",
                    names.internal
                ))
                .push(format!("from_internal: |m: {}| m.inner", names.internal));

            Ok(acc
                .push(format!(
                    "let {TEMPLATE_SLOT} = data::mapping::MappingTemplate::new(data::mapping::MappingTemplateParams {{\n{}\n}});",
                    params.render(4, ",")
                ))
                .bind(TEMPLATE_SLOT, TEMPLATE_SLOT))
        })
        .add_fragment_rule(Key::<ImplFieldAssignments>::new(), |acc, _, _| {
            let template = acc.binding(TEMPLATE_SLOT)?.to_string();
            Ok(acc.push(format!("template: {template}.clone()")))
        });
}

/// Directory, index, file and constructor rules every entity gets
pub fn base_rules() -> RuleSet {
    let rules = RuleSet::new();
    base_directory_rules(&rules);
    base_index_rules(&rules);
    base_file_rules(&rules);
    base_fragment_rules(&rules);
    rules
}

/// Base rules followed by every capability package, in that order
pub fn registry() -> Registry {
    let sets = [
        base_rules(),
        crud_rules(),
        search_rules(),
        associate_rules(),
        filter_keys_rules(),
        list_by_associated_key_rules(),
    ];
    let mut registry = Registry::new();
    registry.merge(&sets);
    registry
}
