use sovran_metadata::{Kind, MetadataAccess, MetadataError, MetadataStore, StoreOptions, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

#[test]
fn test_basic_operations() {
    let store = MetadataStore::new("test");

    // Store a value
    store.set("key", 42i32);

    // Check if key exists
    assert!(store.exists("key"));
    assert!(!store.exists_not("key"));

    // Get the value
    assert_eq!(store.get("key").unwrap(), Value::Int(42));
    assert_eq!(store.ints().get("key").unwrap(), 42);

    // Replace with entirely new value of different type
    store.set("key", "new value");
    assert_eq!(store.strings().get("key").unwrap(), "new value");

    // Remove the value
    assert_eq!(store.remove("key"), Some(Value::from("new value")));

    // Check that it's gone
    assert!(!store.exists("key"));
    assert!(!store.nullable().exists("key"));
}

#[test]
fn test_scenario() -> Result<(), MetadataError> {
    let store = MetadataStore::new("test");
    store.set("a", 42i32);
    store.set("b", 8i32);
    assert_eq!(store.ints().get("a")? + store.ints().get("b")?, 50);

    store.set("s", "hi");
    assert_eq!(store.strings().get("s")?.to_uppercase(), "HI");

    store.set("s", 3.14f64);
    assert_eq!(store.doubles().get("s")? * 2.0, 6.28);
    Ok(())
}

#[test]
fn test_type_migration() {
    let store = MetadataStore::new("test");
    store.set("k", 1i32);
    store.set("k", "one");

    assert!(!store.ints().exists("k"));
    assert!(store.strings().exists("k"));
    assert_eq!(
        store.ints().get("k"),
        Err(MetadataError::UnknownTypedIdentifier {
            identifier: "k".to_string(),
            kind: Kind::Int,
            nullable: false,
        })
    );
}

#[test]
fn test_single_ownership() {
    let store = MetadataStore::new("test");
    let writes: Vec<Value> = vec![
        Value::from(1i8),
        Value::from(2i16),
        Value::from(3i32),
        Value::from(4i64),
        Value::from(5.0f32),
        Value::from(6.0f64),
        Value::from(false),
        Value::from('7'),
        Value::from("8"),
        Value::other(9u32),
    ];

    for value in writes {
        let kind = value.kind();
        store.set("k", value);
        let owners = [
            store.bytes().exists("k"),
            store.shorts().exists("k"),
            store.ints().exists("k"),
            store.longs().exists("k"),
            store.floats().exists("k"),
            store.doubles().exists("k"),
            store.booleans().exists("k"),
            store.chars().exists("k"),
            store.strings().exists("k"),
        ];
        let expected = usize::from(kind != Kind::Other);
        assert_eq!(owners.iter().filter(|o| **o).count(), expected);
        assert_eq!(store.locate("k"), Some(kind));
        assert_eq!(store.len(), 1);
    }
}

#[test]
fn test_round_trip_every_kind() -> Result<(), MetadataError> {
    let store = MetadataStore::new("test");

    store.bytes().set("byte", -8i8);
    store.shorts().set("short", -16i16);
    store.ints().set("int", -32i32);
    store.longs().set("long", -64i64);
    store.floats().set("float", 0.25f32);
    store.doubles().set("double", 0.125f64);
    store.booleans().set("bool", true);
    store.chars().set("char", 'ß');
    store.strings().set("string", "text");

    assert_eq!(store.bytes().get("byte")?, -8);
    assert_eq!(store.shorts().get("short")?, -16);
    assert_eq!(store.ints().get("int")?, -32);
    assert_eq!(store.longs().get("long")?, -64);
    assert_eq!(store.floats().get("float")?, 0.25);
    assert_eq!(store.doubles().get("double")?, 0.125);
    assert!(store.booleans().get("bool")?);
    assert_eq!(store.chars().get("char")?, 'ß');
    assert_eq!(store.strings().get("string")?, "text");

    assert_eq!(store.get("byte")?, Value::Byte(-8));
    assert_eq!(store.get("short")?, Value::Short(-16));
    assert_eq!(store.get("int")?, Value::Int(-32));
    assert_eq!(store.get("long")?, Value::Long(-64));
    assert_eq!(store.get("float")?, Value::Float(0.25));
    assert_eq!(store.get("double")?, Value::Double(0.125));
    assert_eq!(store.get("bool")?, Value::Boolean(true));
    assert_eq!(store.get("char")?, Value::Char('ß'));
    assert_eq!(store.get("string")?, Value::from("text"));

    assert_eq!(store.all_entries().len(), 9);
    Ok(())
}

#[test]
fn test_null_versus_absent() {
    let store = MetadataStore::new("test");
    store.set("x", "v");
    store.nullable().set_null("x");

    assert!(!store.exists("x"));
    assert!(store.nullable().exists("x"));
    assert_eq!(store.nullable().get("x"), Ok(None));
    assert_eq!(
        store.get("x"),
        Err(MetadataError::UnknownIdentifier("x".to_string()))
    );

    // Ownership stays with the strings submap
    assert_eq!(store.nullable().locate("x"), Some(Kind::String));
    assert_eq!(store.locate("x"), None);
    assert!(store.strings().nullable().exists("x"));
    assert!(!store.strings().exists("x"));
}

#[test]
fn test_removal_clears_both_views() {
    let store = MetadataStore::new("test");
    store.set("k", 'c');
    assert_eq!(store.remove("k"), Some(Value::Char('c')));
    assert!(!store.exists("k"));
    assert!(!store.nullable().exists("k"));
    assert_eq!(store.remove("k"), None);
}

#[test]
fn test_error_handling() {
    let store = MetadataStore::new("test");

    // Try to get a non-existent key
    let result = store.get("nonexistent");
    assert!(matches!(result, Err(MetadataError::UnknownIdentifier(_))));
    assert_eq!(store.get_or_null("nonexistent"), None);

    // Store a value and try to get it with the wrong type
    store.set("key", 42i32);
    let result = store.strings().get("key");
    assert!(matches!(
        result,
        Err(MetadataError::UnknownTypedIdentifier {
            kind: Kind::String,
            nullable: false,
            ..
        })
    ));

    // Try to remove a non-existent key
    assert_eq!(store.remove("nonexistent"), None);
    assert_eq!(store.strings().remove("key"), None);
    assert!(store.ints().exists("key"));
}

#[test]
fn test_error_display() {
    let untyped = MetadataError::UnknownIdentifier("a".to_string());
    let typed = MetadataError::UnknownTypedIdentifier {
        identifier: "b".to_string(),
        kind: Kind::Long,
        nullable: false,
    };
    let nullable = MetadataError::UnknownTypedIdentifier {
        identifier: "c".to_string(),
        kind: Kind::Char,
        nullable: true,
    };

    assert_eq!(format!("{}", untyped), "Unknown metadata identifier: a");
    assert_eq!(
        format!("{}", typed),
        "Unknown metadata identifier 'b' for type i64"
    );
    assert_eq!(
        format!("{}", nullable),
        "Unknown metadata identifier 'c' for type char?"
    );

    // Test Debug implementation
    assert!(format!("{:?}", untyped).contains("UnknownIdentifier"));
}

#[test]
fn test_all_entries_excludes_nulls() {
    let store = MetadataStore::new("test");
    store.set("a", 1i64);
    store.set("b", "two");
    store.nullable().set_null("c");
    store.ints().nullable().set_null("d");

    let entries = store.all_entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries.get("a"), Some(&Value::Long(1)));
    assert_eq!(entries.get("b"), Some(&Value::from("two")));

    let slots = store.nullable().all_entries();
    assert_eq!(slots.len(), 4);
    assert_eq!(slots.get("c"), Some(&None));
    assert_eq!(slots.get("d"), Some(&None));
}

#[test]
fn test_thread_safety() {
    let store = Arc::new(MetadataStore::new("shared"));

    // Each thread writes its own keys, flipping their kind back and forth
    let mut handles = vec![];
    for t in 0..10 {
        let store_clone = Arc::clone(&store);
        handles.push(thread::spawn(move || {
            for i in 0..100 {
                let key = format!("{}-{}", t, i);
                store_clone.set(&key, i as i32);
                store_clone.set(&key, key.clone());
            }
        }));
    }

    // Wait for all threads to complete
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.len(), 1000);
    assert_eq!(store.strings().len(), 1000);
    assert!(store.ints().is_empty());
}

#[test]
fn test_remove_during_concurrent_kind_changes() {
    let store = MetadataStore::new("shared");
    store.set("k", 1i32);
    let stop = Arc::new(AtomicBool::new(false));

    // The writer only ever changes the kind of "k", it never removes it
    let writer = {
        let store = store.clone();
        let stop = Arc::clone(&stop);
        thread::spawn(move || {
            let mut as_text = false;
            while !stop.load(Ordering::Relaxed) {
                if as_text {
                    store.set("k", "one");
                } else {
                    store.set("k", 1i32);
                }
                as_text = !as_text;
            }
        })
    };

    let mut misses = 0;
    for i in 0..20_000 {
        let removed = if i % 2 == 0 {
            store.remove("k").is_some()
        } else {
            store.nullable().remove("k").is_some()
        };
        if !removed {
            misses += 1;
        }
        store.set("k", 1i32);
    }

    stop.store(true, Ordering::Relaxed);
    writer.join().unwrap();
    assert_eq!(misses, 0);
    assert_eq!(store.nullable().len(), 1);
}

#[test]
fn test_combinators() -> Result<(), MetadataError> {
    let store = MetadataStore::new("test");
    store.set("n", 2i32);

    assert_eq!(store.get_or("missing", Value::Int(0)), Value::Int(0));
    assert_eq!(store.get_or_else("n", || Value::Int(0)), Value::Int(2));

    let doubled = store.ints().update("n", |n| n * 2)?;
    assert_eq!(doubled, 4);
    assert_eq!(store.ints().update_if_exists("nope", |n| n + 1), None);
    assert!(store.ints().update("nope", |n| n + 1).is_err());

    assert_eq!(store.ints().if_exists("n", |n| n + 1), Some(5));
    assert_eq!(store.strings().if_exists("n", |s| s.len()), None);

    store.set("m", 9i32);
    let found = store.ints().filter_existent(["n", "m", "zz"]);
    assert_eq!(found.len(), 2);
    let mut values = store.ints().filter_existent_values(vec!["n".to_string(), "m".to_string()]);
    values.sort();
    assert_eq!(values, vec![4, 9]);

    let taken = store.ints().consume("n", |n| n.to_string())?;
    assert_eq!(taken, "4");
    assert!(!store.exists("n"));
    assert!(store.ints().consume("n", |n| n).is_err());
    Ok(())
}

#[test]
fn test_reserved_prefixes() {
    let store = MetadataStore::with_options(
        "opts",
        StoreOptions::default().with_reserved_prefix("internal."),
    );
    assert!(store.is_reserved("__meta"));
    assert!(store.is_reserved("internal.flag"));
    assert!(!store.is_reserved("flag"));

    // Advisory only: writes still succeed
    store.set("__meta", true);
    assert!(store.exists("__meta"));
}

#[test]
fn test_default_implementation() {
    let store: MetadataStore = Default::default();
    assert!(store.is_empty());
    assert_eq!(store.name(), "metadata");
    assert_eq!(format!("{:?}", store), "MetadataStore { name: \"metadata\", entries: 0 }");

    store.set("test", 42i32);
    assert_eq!(store.ints().get("test").unwrap(), 42);
}
