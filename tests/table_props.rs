use std::collections::HashSet;

use gray_chimera::*;
use num_bigint::BigUint;
use proptest::prelude::*;

proptest! {
    #[test]
    fn sequence_table_agrees_with_hash_set(
        keys in prop::collection::vec(prop::collection::vec(0u8..8, 8), 1..300),
        exponent in 1u32..6,
    ) {
        let mut table = SequenceTable::with_exponent(8, exponent);
        let mut reference = HashSet::new();
        for key in &keys {
            prop_assert_eq!(table.insert_if_absent(key), reference.insert(key.clone()));
        }
        prop_assert_eq!(table.len(), reference.len());
        prop_assert!(table.len() * 3 <= table.capacity() + 3);
        for key in &keys {
            prop_assert!(table.contains(key));
        }
    }

    #[test]
    fn bigint_table_agrees_with_hash_set(
        keys in prop::collection::vec(any::<u128>(), 1..24),
        digits in 4usize..7,
    ) {
        let mut table = BigIntTable::for_digits(digits);
        let mut reference = HashSet::new();
        for &k in &keys {
            let key = BigUint::from(k) << 70u32;
            prop_assert_eq!(table.insert(&key), reference.insert(k));
        }
        for &k in &keys {
            prop_assert!(table.contains(&(BigUint::from(k) << 70u32)));
        }
        prop_assert_eq!(table.len(), reference.len());
    }

    #[test]
    fn rotation_multipliers_rotate_numbers(
        steps in prop::collection::vec(0u8..4, 16),
        k in 1usize..16,
    ) {
        let tables = SharedTables::new(4);
        let seq = Sequence::new(4, steps);
        let mut n = seq.number();
        for i in 0..k {
            tables.rotations.rotate(&mut n, seq.steps()[i]);
        }
        prop_assert_eq!(n, seq.rotated(k).number());
    }

    #[test]
    fn relabeling_keeps_gray_code_property(seed_index in 0usize..11, a in 0u8..4, b in 0u8..4, r in 0usize..16) {
        let tables = SharedTables::new(4);
        let seeds: Vec<Sequence> = search_seeds(&tables, true)
            .into_iter()
            .flat_map(|p| p.seeds)
            .collect();
        let mut seq = seeds[seed_index].rotated(r);
        seq.swap(a, b);
        prop_assert!(seq.is_cyclic_gray_code());
        let mut ex = Extrapolator::new(&tables, true);
        prop_assert_eq!(ex.contribution(&seq), ex.contribution(&seeds[seed_index]));
    }
}
