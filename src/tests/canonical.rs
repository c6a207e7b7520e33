use crate::PersistentMap;

/// Insertion order must not affect the resulting structure.
/// Same set of entries → same adhash, equal maps.
#[test]
fn insert_order_abc_cba_bca() {
    let orders: [&[(i32, i32)]; 3] = [
        &[(1, 10), (2, 20), (3, 30)],
        &[(3, 30), (2, 20), (1, 10)],
        &[(2, 20), (3, 30), (1, 10)],
    ];

    let maps: Vec<PersistentMap<i32, i32>> = orders
        .iter()
        .map(|pairs| pairs.iter().copied().collect())
        .collect();

    assert_eq!(maps[0].adhash(), maps[1].adhash());
    assert_eq!(maps[1].adhash(), maps[2].adhash());
    assert_eq!(maps[0], maps[1]);
    assert_eq!(maps[1], maps[2]);
}

/// Larger set — 100 entries, three orderings.
#[test]
fn insert_order_100_entries() {
    let entries: Vec<(u64, u64)> = (0..100).map(|i| (i, i * 7)).collect();

    let forward: PersistentMap<u64, u64> = entries.iter().copied().collect();
    let backward: PersistentMap<u64, u64> = entries.iter().rev().copied().collect();
    let interleaved: PersistentMap<u64, u64> = entries
        .iter()
        .step_by(2)
        .chain(entries.iter().skip(1).step_by(2))
        .copied()
        .collect();

    assert_eq!(forward.adhash(), backward.adhash());
    assert_eq!(forward.adhash(), interleaved.adhash());
    assert_eq!(forward, backward);
    assert_eq!(forward, interleaved);
    assert_eq!(forward.len(), 100);
}

/// After overwrite, order independence still holds.
#[test]
fn overwrite_preserves_canonicity() {
    let map_a = PersistentMap::new().insert(1, 10).insert(2, 20).insert(1, 11);
    let map_b = PersistentMap::new().insert(2, 20).insert(1, 11);

    assert_eq!(map_a.adhash(), map_b.adhash());
    assert_eq!(map_a, map_b);
}

/// After delete, order independence holds.
#[test]
fn delete_preserves_canonicity() {
    let map_a = PersistentMap::new()
        .insert(1, 10)
        .insert(2, 20)
        .insert(3, 30)
        .remove(&2);
    let map_b = PersistentMap::new().insert(3, 30).insert(1, 10);

    assert_eq!(map_a.adhash(), map_b.adhash());
    assert_eq!(map_a, map_b);
}

/// Heavy churn collapses back to the same shape as a direct build.
#[test]
fn churn_then_compare() {
    let mut churned: PersistentMap<u64, u64> = (0..1_000).map(|i| (i, i)).collect();
    for i in (0..1_000).filter(|i| i % 3 != 0) {
        churned = churned.remove(&i);
    }
    let direct: PersistentMap<u64, u64> = (0..1_000).filter(|i| i % 3 == 0).map(|i| (i, i)).collect();

    assert_eq!(churned.len(), direct.len());
    assert_eq!(churned, direct);
}

/// Same keys with one differing value are unequal.
#[test]
fn differing_value_is_unequal() {
    let a: PersistentMap<u64, u64> = (0..50).map(|i| (i, i)).collect();
    let b = a.insert(17, 1_700);
    assert_ne!(a, b);
    assert_ne!(a.adhash(), b.adhash());
}

/// Different key sets of the same size are unequal.
#[test]
fn differing_keys_are_unequal() {
    let a = PersistentMap::new().insert(1, 0).insert(2, 0);
    let b = PersistentMap::new().insert(1, 0).insert(3, 0);
    assert_ne!(a, b);
}
