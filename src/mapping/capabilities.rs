//! Capability rule sets for the mapping scaffolding.

use super::naming::{qualify, Naming};
use super::{
    CrudTemplateParams, CtorParamsFields, FileMain, ImplFieldAssignments, ImplFields,
    TEMPLATE_SLOT,
};
use crate::code::Fragment;
use crate::engine::{Key, RuleSet};
use crate::error::GenError;
use crate::inflect::Inflector;
use crate::model::{
    Associate, Crud, Entity, FilterKeys, ListByAssociatedKey, Search, SearchPredicates,
};
use std::sync::Arc;

fn has_crud_operations(entity: &Entity) -> Result<bool, GenError> {
    Ok(entity
        .capabilities()
        .get::<Crud>()?
        .is_some_and(|crud| !crud.operations.is_empty()))
}

fn constructor_call(field: &str, template: &str, options: &str, fields: Fragment) -> String {
    format!(
        "{field}: data::mapping::{template}::new(data::mapping::{options} {{\n{}\n}})",
        fields.render(4, ",")
    )
}

/// CRUD template field and its construction
pub fn crud_rules() -> RuleSet {
    let rules = RuleSet::new();
    rules
        .add_fragment_rule(
            Key::<ImplFields>::when(|d| d.entity.has::<Crud>()),
            |acc, registry, fields| {
                let entity = &fields.entity;
                if !has_crud_operations(entity)? {
                    return Ok(acc);
                }
                let names = Naming::of(entity, registry.inflector())?;
                let key = entity.key_code(Some(&fields.interface_module))?;
                Ok(acc.push(format!(
                    "pub crud_template: data::mapping::CrudTemplate<{}, {}, {key}>",
                    entity.type_path(),
                    names.internal
                )))
            },
        )
        .add_fragment_rule(
            Key::<ImplFieldAssignments>::when(|d| d.entity.has::<Crud>()),
            |acc, registry, assignments| {
                let entity = &assignments.entity;
                if !has_crud_operations(entity)? {
                    return Ok(acc);
                }
                let inflector = registry.inflector();
                let names = Naming::of(entity, inflector)?;
                let template = acc.binding(TEMPLATE_SLOT)?.to_string();

                let extra = registry.build_fragment(
                    Fragment::new(),
                    &CrudTemplateParams {
                        entity: Arc::clone(entity),
                    },
                )?;
                let find_column = match entity.single_key("Crud") {
                    Ok(field) => format!(
                        "Some({:?})",
                        format!("{}.{}", names.table_name, inflector.snake(&field.name))
                    ),
                    Err(_) => "None".to_string(),
                };
                let options = Fragment::new()
                    .push(format!("template: {template}.clone()"))
                    .append(extra)
                    .push(format!("find_column: {find_column}"));

                Ok(acc.push(constructor_call(
                    "crud_template",
                    "CrudTemplate",
                    "CrudTemplateOptions",
                    options,
                )))
            },
        );
    rules
}

fn render_predicates(predicates: Option<&SearchPredicates>) -> String {
    let entries = match predicates {
        Some(SearchPredicates(entries)) if !entries.is_empty() => entries,
        _ => return "Vec::new()".to_string(),
    };
    let lines: Vec<String> = entries
        .iter()
        .map(|entry| {
            let operators: Vec<String> =
                entry.operators.iter().map(|op| format!("{op:?}")).collect();
            format!(
                "    data::SearchPredicateDescriptor::new({:?}, {:?}, &[{}]),",
                entry.name,
                entry.label,
                operators.join(", ")
            )
        })
        .collect();
    format!("vec![\n{}\n]", lines.join("\n"))
}

/// Search template field and its construction
pub fn search_rules() -> RuleSet {
    let rules = RuleSet::new();
    rules
        .add_fragment_rule(
            Key::<ImplFields>::when(|d| d.entity.has::<Search>()),
            |acc, registry, fields| {
                let names = Naming::of(&fields.entity, registry.inflector())?;
                Ok(acc.push(format!(
                    "pub search_template: data::mapping::SearchTemplate<{}, {}>",
                    fields.entity.type_path(),
                    names.internal
                )))
            },
        )
        .add_fragment_rule(
            Key::<ImplFieldAssignments>::when(|d| d.entity.has::<Search>()),
            |acc, _, assignments| {
                let template = acc.binding(TEMPLATE_SLOT)?.to_string();
                let predicates = assignments
                    .entity
                    .capabilities()
                    .get::<SearchPredicates>()?;
                let options = Fragment::new()
                    .push(format!("template: {template}.clone()"))
                    .push(format!("search_predicates: {}", render_predicates(predicates)));
                Ok(acc.push(constructor_call(
                    "search_template",
                    "SearchTemplate",
                    "SearchTemplateParams",
                    options,
                )))
            },
        );
    rules
}

fn child_repository_field(child: &Entity, inflector: &dyn Inflector) -> String {
    format!("{}_repository", inflector.snake(child.name()))
}

/// Child repository dependency plus an `associate_{children}` method
pub fn associate_rules() -> RuleSet {
    let rules = RuleSet::new();
    rules
        .add_fragment_rule(
            Key::<ImplFields>::when(|d| d.entity.has::<Associate>()),
            |acc, registry, fields| {
                let mut acc = acc;
                for associate in fields.entity.capabilities().get_all::<Associate>() {
                    let child = &associate.child;
                    acc = acc.push(format!(
                        "pub {}: std::sync::Arc<dyn {}>",
                        child_repository_field(child, registry.inflector()),
                        qualify(&fields.interface_module, &child.interface_name())
                    ));
                }
                Ok(acc)
            },
        )
        .add_fragment_rule(
            Key::<ImplFieldAssignments>::when(|d| d.entity.has::<Associate>()),
            |acc, registry, assignments| {
                let mut acc = acc;
                for associate in assignments.entity.capabilities().get_all::<Associate>() {
                    let field = child_repository_field(&associate.child, registry.inflector());
                    acc = acc.push(format!("{field}: params.{field}"));
                }
                Ok(acc)
            },
        )
        .add_fragment_rule(
            Key::<CtorParamsFields>::when(|d| d.entity.has::<Associate>()),
            |acc, registry, params| {
                let mut acc = acc;
                for associate in params.entity.capabilities().get_all::<Associate>() {
                    let child = &associate.child;
                    acc = acc.push(format!(
                        "pub {}: std::sync::Arc<dyn {}>",
                        child_repository_field(child, registry.inflector()),
                        qualify(&params.interface_module, &child.interface_name())
                    ));
                }
                Ok(acc)
            },
        )
        .add_file_rule(
            Key::<FileMain>::when(|d| d.entity.has::<Associate>()),
            |file, registry, main| {
                let inflector = registry.inflector();
                let parent = &main.entity;
                let parent_names = Naming::of(parent, inflector)?;
                let parent_key = parent.single_key("Associate")?;
                let key = parent.key_code(Some(&main.interface_module))?;

                for associate in parent.capabilities().get_all::<Associate>() {
                    let child = &associate.child;
                    let child_names = Naming::of(child, inflector)?;
                    let child_key_field = child.single_key("Associate")?;
                    let child_key = child.key_code(Some(&main.interface_module))?;
                    let method = inflector.snake(&inflector.plural(child.name()));

                    let params = Fragment::new()
                        .push(format!(
                            "association_table: {:?}",
                            parent_names.association_table(&child_names)
                        ))
                        .push(format!(
                            "parent_column_name: {:?}",
                            parent_names.association_column(&parent_key.name, inflector)
                        ))
                        .push(format!(
                            "child_column_name: {:?}",
                            child_names.association_column(&child_key_field.name, inflector)
                        ))
                        .push("parent_key: key")
                        .push("add")
                        .push("remove")
                        .push("parent_repository: self")
                        .push(format!(
                            "child_repository: self.{}.as_ref()",
                            child_repository_field(child, inflector)
                        ));

                    file.add(format!(
                        "impl {implementation} {{\n    \
                         pub fn associate_{method}(&self, ctx: &data::Context, key: &{key}, add: &[{child_key}], remove: &[{child_key}]) -> Result<(), data::Error> {{\n        \
                         data::mapping::associate(ctx, data::mapping::AssociateParams {{\n{params}\n        }})\n    }}\n}}",
                        implementation = parent_names.implementation,
                        params = params.render(12, ","),
                    ));
                }
                Ok(())
            },
        );
    rules
}

/// Filter-keys template field and its construction
pub fn filter_keys_rules() -> RuleSet {
    let rules = RuleSet::new();
    rules
        .add_fragment_rule(
            Key::<ImplFields>::when(|d| d.entity.has::<FilterKeys>()),
            |acc, registry, fields| {
                let names = Naming::of(&fields.entity, registry.inflector())?;
                let key = fields.entity.key_code(Some(&fields.interface_module))?;
                Ok(acc.push(format!(
                    "pub filter_keys_template: data::mapping::FilterKeysTemplate<{}, {}, {key}>",
                    fields.entity.type_path(),
                    names.internal
                )))
            },
        )
        .add_fragment_rule(
            Key::<ImplFieldAssignments>::when(|d| d.entity.has::<FilterKeys>()),
            |acc, registry, assignments| {
                let key_field = assignments.entity.single_key("FilterKeys")?;
                let template = acc.binding(TEMPLATE_SLOT)?.to_string();
                let options = Fragment::new()
                    .push(format!("template: {template}.clone()"))
                    .push(format!(
                        "find_column: {:?}",
                        registry.inflector().snake(&key_field.name)
                    ));
                Ok(acc.push(constructor_call(
                    "filter_keys_template",
                    "FilterKeysTemplate",
                    "FilterKeysTemplateOptions",
                    options,
                )))
            },
        );
    rules
}

/// `list_by_{associated}` joining through the association table
pub fn list_by_associated_key_rules() -> RuleSet {
    let rules = RuleSet::new();
    rules.add_file_rule(
        Key::<FileMain>::when(|d| d.entity.has::<ListByAssociatedKey>()),
        |file, registry, main| {
            let inflector = registry.inflector();
            let this = &main.entity;
            let this_names = Naming::of(this, inflector)?;
            let this_key = this.single_key("ListByAssociatedKey")?;
            let this_column = inflector.snake(&this_key.name);

            for list in this.capabilities().get_all::<ListByAssociatedKey>() {
                let other = &list.associated;
                let other_names = Naming::of(other, inflector)?;
                let other_key = other.single_key("ListByAssociatedKey")?;
                let key = other.key_code(Some(&main.interface_module))?;

                let table = if list.reversed {
                    other_names.association_table(&this_names)
                } else {
                    this_names.association_table(&other_names)
                };
                let join = format!(
                    "INNER JOIN {table} ON {table}.{} = {}.{this_column}",
                    this_names.association_column(&this_key.name, inflector),
                    this_names.table_name,
                );
                let filter = format!(
                    "{table}.{} = ?",
                    other_names.association_column(&other_key.name, inflector)
                );

                file.add(format!(
                    "impl {implementation} {{\n    \
                     pub fn list_by_{method}(&self, ctx: &data::Context, key: &{key}, params: data::ListParams) -> Result<data::List<{ty}>, data::Error> {{\n        \
                     self.template.do_list(ctx, |query| query.join({join:?}).filter({filter:?}, key), params)\n    }}\n}}",
                    implementation = this_names.implementation,
                    method = inflector.snake(other.name()),
                    ty = this.type_path(),
                ));
            }
            Ok(())
        },
    );
    rules
}
