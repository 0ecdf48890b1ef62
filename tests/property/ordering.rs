//! Rules run in registration order across any partition into rule sets, and
//! predicates gate exactly the rules they reject.

use datagen::model::Entity;
use datagen::{Descriptor, Fragment, Key, Registry, RuleSet};
use proptest::prelude::*;

struct Flagged {
    flags: Vec<bool>,
}

impl Descriptor for Flagged {}

/// Register rules `0..total`, split into consecutive rule sets at `cuts`
fn registry_with_partition(total: usize, cuts: &[usize]) -> Registry {
    let mut bounds: Vec<usize> = cuts.iter().map(|c| c % (total + 1)).collect();
    bounds.push(0);
    bounds.push(total);
    bounds.sort_unstable();
    bounds.dedup();

    let sets: Vec<RuleSet> = bounds
        .windows(2)
        .map(|w| {
            let set = RuleSet::new();
            for id in w[0]..w[1] {
                set.add_fragment_rule(Key::<Flagged>::new(), move |acc, _, _| {
                    Ok(acc.push(id.to_string()))
                });
            }
            set
        })
        .collect();

    let mut registry = Registry::new();
    registry.merge(&sets);
    registry
}

proptest! {
    #[test]
    fn merged_rules_run_in_registration_order(
        total in 0usize..24,
        cuts in prop::collection::vec(0usize..32, 0..6),
    ) {
        let registry = registry_with_partition(total, &cuts);
        let out = registry
            .build_fragment(Fragment::new(), &Flagged { flags: Vec::new() })
            .unwrap();
        let expected: Vec<String> = (0..total).map(|i| i.to_string()).collect();
        prop_assert_eq!(out.items(), expected.as_slice());
    }

    #[test]
    fn predicates_skip_exactly_the_rejected_rules(
        flags in prop::collection::vec(any::<bool>(), 0..16),
    ) {
        let set = RuleSet::new();
        for id in 0..flags.len() {
            set.add_fragment_rule(
                Key::<Flagged>::when(move |flagged| flagged.flags[id]),
                move |acc, _, _| Ok(acc.push(id.to_string())),
            );
        }
        let registry = Registry::new().with_rules(&set);

        let out = registry
            .build_fragment(Fragment::new(), &Flagged { flags: flags.clone() })
            .unwrap();
        let expected: Vec<String> = flags
            .iter()
            .enumerate()
            .filter(|(_, on)| **on)
            .map(|(id, _)| id.to_string())
            .collect();
        prop_assert_eq!(out.items(), expected.as_slice());
    }

    #[test]
    fn composite_key_fields_keep_declaration_order(
        mask in prop::collection::vec(any::<bool>(), 1..8),
    ) {
        let builder = mask.iter().enumerate().fold(
            Entity::builder("Record", "crate::model::Record"),
            |builder, (i, key)| {
                let tags = if *key {
                    datagen::model::FieldTags::key()
                } else {
                    datagen::model::FieldTags::default()
                };
                builder.field(format!("f{i}"), "u32", tags)
            },
        );
        let entity = builder.build().unwrap();

        let keys: Vec<String> = entity.key_fields().map(|f| f.name.clone()).collect();
        let expected: Vec<String> = mask
            .iter()
            .enumerate()
            .filter(|(_, key)| **key)
            .map(|(i, _)| format!("f{i}"))
            .collect();
        prop_assert_eq!(&keys, &expected);

        match expected.len() {
            0 => prop_assert!(entity.key_code(None).is_err()),
            1 => prop_assert_eq!(entity.key_code(None).unwrap(), "u32"),
            _ => {
                prop_assert_eq!(entity.key_code(None).unwrap(), "RecordKey");
                let declaration = entity.key_declaration().unwrap();
                let positions: Vec<usize> = expected
                    .iter()
                    .map(|name| declaration.find(&format!("pub {name}: u32,")).unwrap())
                    .collect();
                prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
            }
        }
    }
}
