//! End-to-end engine suites: concrete scenarios plus the universal
//! properties the engine promises.

use docudb_core::{encode_key, BPlusTree, Document, Query, Value};
use docudb_testkit::{document_strategy, finite_float_strategy, names, TestCollection};
use proptest::prelude::*;
use serde_json::json;
use std::collections::BTreeMap;

fn query(conditions: serde_json::Value) -> Query {
    Query::from_json(conditions).unwrap()
}

// ── Concrete scenarios ──────────────────────────────────────────────

#[test]
fn scenario_find_by_age() {
    let people = TestCollection::with_people("people");
    let results = people.find(&query(json!({ "age": 25 })));
    assert_eq!(names(&results), vec!["Alice"]);
}

#[test]
fn scenario_find_with_or() {
    let people = TestCollection::with_people("people");
    let results = people.find(&query(json!({
        "$or": [ { "age": 25 }, { "city": "Paris" } ]
    })));
    assert_eq!(names(&results), vec!["Alice", "Bob", "Eve"]);
}

#[test]
fn scenario_find_age_above_thirty() {
    let people = TestCollection::with_people("people");
    let results = people.find(&query(json!({ "age": { "$gt": 30 } })));
    assert_eq!(names(&results), vec!["David"]);
}

#[test]
fn scenario_find_with_like() {
    let people = TestCollection::with_people("people");
    let results = people.find(&query(json!({ "name": { "$like": "C_rol" } })));
    assert_eq!(names(&results), vec!["Carol"]);
}

#[test]
fn scenario_find_with_in() {
    let people = TestCollection::with_people("people");
    let results = people.find(&query(json!({ "city": { "$in": ["London", "Paris"] } })));
    assert_eq!(names(&results), vec!["Alice", "Bob", "Carol", "Eve"]);
}

#[test]
fn scenario_delete_then_scan() {
    let mut people = TestCollection::with_people("people");
    let deleted = people.delete(&query(json!({ "city": "Paris" }))).unwrap();
    assert_eq!(deleted, 2);

    let results = people.find(&Query::empty());
    assert_eq!(names(&results), vec!["Alice", "Carol", "David"]);
}

#[test]
fn scenario_indexed_find_equals_scan() {
    let mut people = TestCollection::with_people("people");
    let scanned = names(&people.find(&query(json!({ "age": { "$gt": 25 } }))));

    people.create_index("age", 4).unwrap();
    let mut indexed = names(&people.find(&query(json!({ "age": { "$gt": 25 } }))));

    let mut scanned_sorted = scanned;
    scanned_sorted.sort();
    indexed.sort();
    assert_eq!(indexed, scanned_sorted);
    assert_eq!(indexed, vec!["Bob", "David", "Eve"]);
}

// ── Universal properties ────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// After save and reload, the collection holds exactly the inserted
    /// documents, in order, each carrying a unique id.
    #[test]
    fn documents_round_trip(docs in prop::collection::vec(document_strategy(), 0..12)) {
        let mut collection = TestCollection::new("roundtrip");

        let mut ids = Vec::new();
        for doc in &docs {
            ids.push(collection.insert(doc.clone()).unwrap());
        }
        collection.save().unwrap();
        collection.reopen();

        prop_assert_eq!(collection.len(), docs.len());

        let mut unique = ids.clone();
        unique.sort();
        unique.dedup();
        prop_assert_eq!(unique.len(), ids.len(), "ids must not collide");

        for (id, original) in ids.iter().zip(&docs) {
            let stored = collection.get(id).expect("document lost on reload");
            prop_assert_eq!(stored.id(), Some(id.as_str()));
            // Every original field survives untouched.
            for (field, value) in original.fields() {
                prop_assert_eq!(stored.get(field), Some(value));
            }
        }
    }

    /// Serializing and reloading an index preserves every id list.
    #[test]
    fn index_round_trips(entries in prop::collection::vec((any::<i64>(), 0u8..200), 0..100)) {
        let mut tree = BPlusTree::new(2);
        for (n, id) in &entries {
            tree.insert(encode_key(&Value::Int(*n)).unwrap(), format!("doc-{id}"));
        }

        let file = docudb_core::index::persistence::serialize_tree(&tree, "n");
        let text = serde_json::to_string_pretty(&file).unwrap();
        let reloaded = docudb_core::index::persistence::deserialize_tree(
            &serde_json::from_str(&text).unwrap(),
        )
        .unwrap();

        for (n, _) in &entries {
            let key = encode_key(&Value::Int(*n)).unwrap();
            prop_assert_eq!(tree.search(&key), reloaded.search(&key));
        }
        prop_assert_eq!(tree.all_values(), reloaded.all_values());
    }

    /// Any indexable probe answers identically through the index and
    /// through a full scan.
    #[test]
    fn index_and_scan_agree(
        ages in prop::collection::vec(0i64..50, 1..30),
        probe in 0i64..50,
        candidates in prop::collection::vec(0i64..50, 0..5),
    ) {
        let mut collection = TestCollection::new("equiv");
        for age in &ages {
            let doc = Document::from_json(json!({ "age": age })).unwrap();
            collection.insert(doc).unwrap();
        }

        let probes = vec![
            json!({ "age": probe }),
            json!({ "age": { "$eq": probe } }),
            json!({ "age": { "$gt": probe } }),
            json!({ "age": { "$lt": probe } }),
            json!({ "age": { "$in": candidates } }),
        ];

        let scan: Vec<Vec<String>> = probes
            .iter()
            .map(|p| result_ids(&collection, &query(p.clone())))
            .collect();

        collection.create_index("age", 2).unwrap();

        for (p, mut scanned) in probes.iter().zip(scan) {
            let mut indexed = result_ids(&collection, &query(p.clone()));
            scanned.sort();
            indexed.sort();
            prop_assert_eq!(indexed, scanned, "probe {}", p);
        }
    }

    /// Key encoding is monotone within each comparable kind.
    #[test]
    fn integer_encoding_is_monotone(a in any::<i64>(), b in any::<i64>()) {
        let ka = encode_key(&Value::Int(a)).unwrap();
        let kb = encode_key(&Value::Int(b)).unwrap();
        prop_assert_eq!(a.cmp(&b), ka.cmp(&kb));
    }

    #[test]
    fn float_encoding_is_monotone(a in finite_float_strategy(), b in finite_float_strategy()) {
        let ka = encode_key(&Value::Float(a)).unwrap();
        let kb = encode_key(&Value::Float(b)).unwrap();
        prop_assert_eq!(a.partial_cmp(&b).unwrap(), ka.cmp(&kb));
    }

    #[test]
    fn string_encoding_is_monotone(a in "[a-zA-Z0-9]{0,12}", b in "[a-zA-Z0-9]{0,12}") {
        let ka = encode_key(&Value::String(a.clone())).unwrap();
        let kb = encode_key(&Value::String(b.clone())).unwrap();
        prop_assert_eq!(a.as_bytes().cmp(b.as_bytes()), ka.cmp(&kb));
    }

    /// A range scan returns exactly the keys inside the bounds, sorted.
    #[test]
    fn range_scan_is_exact(
        keys in prop::collection::btree_set(0i64..1000, 0..80),
        lo in 0i64..1000,
        hi in 0i64..1000,
        include_lo: bool,
        include_hi: bool,
    ) {
        let mut tree = BPlusTree::new(2);
        for n in &keys {
            tree.insert(encode_key(&Value::Int(*n)).unwrap(), n.to_string());
        }

        let lo_key = encode_key(&Value::Int(lo)).unwrap();
        let hi_key = encode_key(&Value::Int(hi)).unwrap();
        let got = tree.range_search(Some(&lo_key), Some(&hi_key), include_lo, include_hi);

        let expected: Vec<String> = keys
            .iter()
            .filter(|n| (**n > lo || (**n == lo && include_lo)) && (**n < hi || (**n == hi && include_hi)))
            .map(|n| n.to_string())
            .collect();

        prop_assert_eq!(got, expected);
    }

    /// The empty query enumerates documents in insertion order.
    #[test]
    fn full_scan_preserves_insertion_order(
        markers in prop::collection::vec(0i64..1000, 0..20),
    ) {
        let mut collection = TestCollection::new("order");
        for marker in &markers {
            let doc = Document::from_json(json!({ "marker": marker })).unwrap();
            collection.insert(doc).unwrap();
        }

        let scanned: Vec<Value> = collection
            .find(&Query::empty())
            .iter()
            .map(|doc| doc.get("marker").unwrap().clone())
            .collect();
        let expected: Vec<Value> = markers.iter().map(|m| Value::Int(*m)).collect();
        prop_assert_eq!(scanned, expected);
    }

    /// A conjunctive condition matches exactly when each of its parts
    /// matches on its own.
    #[test]
    fn implicit_and_decomposes(
        doc in document_strategy(),
        conditions in prop::collection::btree_map(
            "[a-z][a-z0-9]{0,7}",
            prop_oneof![
                any::<i64>().prop_map(Value::Int),
                "[a-z]{0,6}".prop_map(Value::String),
                Just(Value::Null),
            ],
            1..4,
        ),
    ) {
        let combined = Query::from_json(serde_json::Value::from(Value::Object(conditions.clone()))).unwrap();

        let each: Vec<bool> = conditions
            .iter()
            .map(|(field, predicate)| {
                let mut single = BTreeMap::new();
                single.insert(field.clone(), predicate.clone());
                Query::from_json(serde_json::Value::from(Value::Object(single)))
                    .unwrap()
                    .matches(&doc)
            })
            .collect();

        prop_assert_eq!(combined.matches(&doc), each.iter().all(|m| *m));
    }
}

fn result_ids(collection: &TestCollection, q: &Query) -> Vec<String> {
    collection
        .find(q)
        .iter()
        .map(|doc| doc.id().expect("stored documents carry ids").to_string())
        .collect()
}
