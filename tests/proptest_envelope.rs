//! Property-based tests for envelope extraction and detail addressing.

use proptest::prelude::*;
use serde_json::{json, Map, Value};

use mladmin::resource::{extract_entries, ListEntries, ResourceKind};

/// Scalar JSON values that can sit where the entry array belongs.
fn arb_non_array() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-zA-Z0-9 _-]{0,12}".prop_map(Value::from),
        Just(json!({ "nameref": "not-a-list" })),
    ]
}

/// List entries with every addressing field independently present or not.
fn arb_entry() -> impl Strategy<Value = Value> {
    (
        proptest::option::of("[a-zA-Z][a-zA-Z0-9-]{0,11}"),
        proptest::option::of("[0-9]{1,9}"),
        proptest::option::of("[a-zA-Z][a-zA-Z0-9-]{0,11}"),
    )
        .prop_map(|(nameref, idref, groupnameref)| {
            let mut obj = Map::new();
            if let Some(n) = nameref {
                obj.insert("nameref".to_string(), n.into());
            }
            if let Some(i) = idref {
                obj.insert("idref".to_string(), i.into());
            }
            if let Some(g) = groupnameref {
                obj.insert("groupnameref".to_string(), g.into());
            }
            Value::Object(obj)
        })
}

fn wrap(kind: ResourceKind, items: Value) -> Value {
    json!({ kind.def().envelope_root: { "list-items": { "list-item": items } } })
}

proptest! {
    /// Anything but an array at the envelope path is "no usable list".
    #[test]
    fn non_array_payload_never_yields_entries(payload in arb_non_array()) {
        for kind in ResourceKind::ALL {
            let data = wrap(kind, payload.clone());
            prop_assert_eq!(extract_entries(kind, &data), ListEntries::Missing);
        }
    }

    /// Extraction keeps every object entry; the display filter keeps
    /// exactly those with a nameref.
    #[test]
    fn display_filter_matches_nameref_presence(
        items in proptest::collection::vec(arb_entry(), 0..16)
    ) {
        let with_name = items
            .iter()
            .filter(|e| e.get("nameref").is_some())
            .count();

        let data = wrap(ResourceKind::Database, Value::Array(items.clone()));
        let extracted = extract_entries(ResourceKind::Database, &data);

        prop_assert_eq!(extracted.as_slice().len(), items.len());
        let shown = extracted
            .as_slice()
            .iter()
            .filter(|e| e.display_name().is_some())
            .count();
        prop_assert_eq!(shown, with_name);
    }

    /// A detail URL exists exactly when a storage key exists, for every
    /// kind and every entry shape.
    #[test]
    fn detail_path_and_store_key_agree(
        items in proptest::collection::vec(arb_entry(), 0..16)
    ) {
        for kind in ResourceKind::ALL {
            let data = wrap(kind, Value::Array(items.clone()));
            for entry in extract_entries(kind, &data).as_slice() {
                prop_assert_eq!(
                    kind.detail_path(entry).is_some(),
                    kind.detail_store_key(entry).is_some()
                );
            }
        }
    }
}
