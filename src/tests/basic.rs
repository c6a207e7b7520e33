use crate::PersistentMap;

#[test]
fn empty_map() {
    let map: PersistentMap<String, i32> = PersistentMap::new();
    assert_eq!(map.len(), 0);
    assert!(map.is_empty());
    assert_eq!(map.adhash(), 0);
    assert_eq!(map.iter().count(), 0);
}

#[test]
fn insert_one() {
    let map = PersistentMap::new().insert("hello", 42);
    assert_eq!(map.len(), 1);
    assert!(!map.is_empty());
    assert_ne!(map.adhash(), 0);
}

#[test]
fn insert_and_get() {
    let map = PersistentMap::new().insert("key", 100);
    assert_eq!(map.get(&"key"), Some(&100));
}

#[test]
fn get_missing_key() {
    let map = PersistentMap::new().insert("a", 1);
    assert_eq!(map.get(&"b"), None);
}

#[test]
fn get_on_empty_map() {
    let map: PersistentMap<i32, i32> = PersistentMap::new();
    assert_eq!(map.get(&7), None);
    assert!(!map.contains_key(&7));
}

#[test]
fn insert_multiple() {
    let mut map = PersistentMap::new();
    for i in 0..10 {
        map = map.insert(i, i * 10);
    }
    assert_eq!(map.len(), 10);
    for i in 0..10 {
        assert_eq!(map.get(&i), Some(&(i * 10)));
    }
}

#[test]
fn overwrite_value() {
    let map = PersistentMap::new().insert("k", 1).insert("k", 2);
    assert_eq!(map.len(), 1);
    assert_eq!(map.get(&"k"), Some(&2));
}

#[test]
fn contains_key_true() {
    let map = PersistentMap::new().insert(42, "val");
    assert!(map.contains_key(&42));
}

#[test]
fn contains_key_false() {
    let map = PersistentMap::new().insert(1, "a");
    assert!(!map.contains_key(&2));
}

#[test]
fn contains_value_scans_all_entries() {
    let map: PersistentMap<u64, u64> = (0..100).map(|i| (i, i * 3)).collect();
    assert!(map.contains_value(&297));
    assert!(!map.contains_value(&298));
}

#[test]
fn remove_existing() {
    let map = PersistentMap::new().insert("a", 1).insert("b", 2);
    let removed = map.remove(&"a");
    assert_eq!(removed.len(), 1);
    assert_eq!(removed.get(&"a"), None);
    assert_eq!(removed.get(&"b"), Some(&2));
}

#[test]
fn remove_missing_shares_root() {
    let map = PersistentMap::new().insert("a", 1);
    let same = map.remove(&"z");
    assert_eq!(same.len(), 1);
    assert!(same.ptr_eq(&map));
}

#[test]
fn remove_everything() {
    let map = PersistentMap::new().insert(1, 10).insert(2, 20).insert(3, 30);
    let emptied = map.remove(&1).remove(&2).remove(&3);
    assert!(emptied.is_empty());
    assert_eq!(emptied.adhash(), 0);
    assert_eq!(emptied, PersistentMap::new());
}

#[test]
fn adhash_changes_on_insert() {
    let m0: PersistentMap<i32, i32> = PersistentMap::new();
    let m1 = m0.insert(1, 1);
    let m2 = m1.insert(2, 2);
    assert_ne!(m0.adhash(), m1.adhash());
    assert_ne!(m1.adhash(), m2.adhash());
}

#[test]
fn adhash_changes_on_overwrite() {
    let m1 = PersistentMap::new().insert("k", 1);
    let m2 = m1.insert("k", 2);
    assert_ne!(m1.adhash(), m2.adhash());
}

#[test]
fn keys_and_values_cover_every_entry() {
    let map: PersistentMap<u64, u64> = (0..50).map(|i| (i, i + 1000)).collect();

    let mut keys: Vec<u64> = map.keys().copied().collect();
    keys.sort_unstable();
    assert_eq!(keys, (0..50).collect::<Vec<_>>());

    let mut values: Vec<u64> = map.values().copied().collect();
    values.sort_unstable();
    assert_eq!(values, (1000..1050).collect::<Vec<_>>());
}
