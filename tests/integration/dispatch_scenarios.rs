//! Dispatch engine scenarios: merge order, predicate gating, directory
//! materialization and clone isolation.

use datagen::engine::EmissionTier;
use datagen::model::Search;
use datagen::{Capabilities, Descriptor, Fragment, GenError, Key, Registry, RuleSet, SourceFile};
use tempfile::TempDir;

#[derive(Debug)]
struct MethodList {
    capabilities: Capabilities,
}

impl Descriptor for MethodList {}

struct Package;

impl Descriptor for Package {
    fn package(&self) -> Option<&str> {
        Some("generated")
    }
}

struct Layout;

impl Descriptor for Layout {}

fn method_registry() -> Registry {
    let finders = RuleSet::new();
    finders.add_fragment_rule(Key::<MethodList>::new(), |acc, _, _| Ok(acc.push("find")));

    let searchers = RuleSet::new();
    searchers.add_fragment_rule(
        Key::<MethodList>::when(|d| d.capabilities.has::<Search>()),
        |acc, _, _| Ok(acc.push("search")),
    );

    let mut registry = Registry::new();
    registry.merge([&finders, &searchers]);
    registry
}

#[test]
fn test_method_list_without_search_marker() {
    let registry = method_registry();
    let plain = MethodList {
        capabilities: Capabilities::new(),
    };
    let methods = registry.build_fragment(Fragment::new(), &plain).unwrap();
    assert_eq!(methods.items(), ["find"]);
}

#[test]
fn test_method_list_with_search_marker() {
    let registry = method_registry();
    let searchable = MethodList {
        capabilities: Capabilities::new().with(Search),
    };
    let methods = registry.build_fragment(Fragment::new(), &searchable).unwrap();
    assert_eq!(methods.items(), ["find", "search"]);
}

#[test]
fn test_merge_order_is_registration_order() {
    let first = RuleSet::new();
    first.add_fragment_rule(Key::<MethodList>::new(), |acc, _, _| Ok(acc.push("r1")));
    let second = RuleSet::new();
    second.add_fragment_rule(Key::<MethodList>::new(), |acc, _, _| Ok(acc.push("r2")));

    let descriptor = MethodList {
        capabilities: Capabilities::new(),
    };

    let mut forward = Registry::new();
    forward.merge([&first, &second]);
    assert_eq!(
        forward.build_fragment(Fragment::new(), &descriptor).unwrap().items(),
        ["r1", "r2"]
    );

    let mut staged = Registry::new();
    staged.merge([&first]).merge([&second]);
    assert_eq!(
        staged.build_fragment(Fragment::new(), &descriptor).unwrap().items(),
        ["r1", "r2"]
    );
}

#[test]
fn test_false_predicate_leaves_file_untouched() {
    let rules = RuleSet::new();
    rules.add_file_rule(Key::<Package>::when(|_| false), |file, _, _| {
        file.import("never::used");
        file.add("pub struct Never;");
        Ok(())
    });
    let registry = Registry::new().with_rules(&rules);

    let mut file = SourceFile::new("generated");
    registry.emit_file(&mut file, &Package).unwrap();
    assert!(file.items().is_empty());
    assert_eq!(file.imports().count(), 0);
}

#[test]
fn test_unregistered_descriptor_is_a_no_op() {
    let registry = Registry::new();
    let acc = Fragment::new().push("seed");
    let result = registry
        .build_fragment(
            acc,
            &MethodList {
                capabilities: Capabilities::new(),
            },
        )
        .unwrap();
    assert_eq!(result.items(), ["seed"]);
}

#[test]
fn test_directory_emission_is_idempotent() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("out");
    std::fs::create_dir(&target).unwrap();

    let rules = RuleSet::new();
    rules.add_directory_rule(Key::<Layout>::new(), |path, registry, _| {
        registry.emit_file_at(path.join("package.rs"), &Package)
    });
    rules.add_file_rule(Key::<Package>::new(), |file, _, _| {
        file.add("pub struct Generated;");
        Ok(())
    });
    let registry = Registry::new().with_rules(&rules);

    registry.emit_directory_at(&target, &Layout).unwrap();
    let first = std::fs::read_to_string(target.join("package.rs")).unwrap();
    registry.emit_directory_at(&target, &Layout).unwrap();
    let second = std::fs::read_to_string(target.join("package.rs")).unwrap();

    assert_eq!(first, second);
    assert_eq!(first, "// module: generated\n\npub struct Generated;\n");
}

#[test]
fn test_directory_over_existing_file_fails() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("occupied");
    std::fs::write(&target, "not a directory").unwrap();

    let err = Registry::new().emit_directory_at(&target, &Layout).unwrap_err();
    assert!(matches!(err, GenError::NotADirectory(path) if path == target));
}

#[test]
fn test_file_over_existing_directory_fails() {
    let temp = TempDir::new().unwrap();
    let err = Registry::new().emit_file_at(temp.path(), &Package).unwrap_err();
    assert!(matches!(err, GenError::NotAFile(_)));
}

#[test]
fn test_file_without_package_fails() {
    let temp = TempDir::new().unwrap();
    let err = Registry::new()
        .emit_file_at(temp.path().join("layout.rs"), &Layout)
        .unwrap_err();
    assert!(matches!(err, GenError::MissingPackage(_)));
    assert!(!temp.path().join("layout.rs").exists());
}

#[test]
fn test_rule_error_aborts_fold() {
    let rules = RuleSet::new();
    rules
        .add_fragment_rule(Key::<MethodList>::new(), |acc, _, _| {
            acc.binding("template")?;
            Ok(acc.push("unreachable"))
        })
        .add_fragment_rule(Key::<MethodList>::new(), |acc, _, _| Ok(acc.push("after")));
    let registry = Registry::new().with_rules(&rules);

    let err = registry
        .build_fragment(
            Fragment::new(),
            &MethodList {
                capabilities: Capabilities::new(),
            },
        )
        .unwrap_err();
    assert!(matches!(err, GenError::UnboundSlot { slot } if slot == "template"));
}

#[test]
fn test_clone_does_not_see_later_extension_of_source() {
    let base_rules = RuleSet::new();
    base_rules.add_fragment_rule(Key::<MethodList>::new(), |acc, _, _| Ok(acc.push("base")));
    let mut original = Registry::new().with_rules(&base_rules);
    let snapshot = original.clone();
    assert!(original.shares_fragment_rules::<MethodList>(&snapshot));

    let extra = RuleSet::new();
    extra.add_fragment_rule(Key::<MethodList>::new(), |acc, _, _| Ok(acc.push("extra")));
    original.merge([&extra]);

    assert_eq!(original.rule_count::<MethodList>(EmissionTier::Fragment), 2);
    assert_eq!(snapshot.rule_count::<MethodList>(EmissionTier::Fragment), 1);
    assert!(!original.shares_fragment_rules::<MethodList>(&snapshot));
}
