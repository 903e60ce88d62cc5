use std::collections::HashSet;

use num_bigint::BigUint;
use num_traits::One;

use crate::bigint_table::BigIntTable;
use crate::sequence::{sequence_len, sequence_number_into, swap_steps, Sequence, Step};
use crate::tables::SharedTables;

/// 系列番号の回転を多倍長の乗算1回と減算1回で行うための係数表。
///
/// 先頭ステップ d を末尾へ回すと N' = N * n - d * (n^L - 1)。
#[derive(Debug, Clone)]
pub struct RotationMultipliers {
    digits: u64,
    multipliers: Vec<BigUint>,
}

impl RotationMultipliers {
    pub fn new(digits: usize) -> Self {
        let len = sequence_len(digits) as u32;
        let base = BigUint::from(digits as u64).pow(len) - BigUint::one();
        RotationMultipliers {
            digits: digits as u64,
            multipliers: (0..digits as u64).map(|d| &base * d).collect(),
        }
    }

    /// 先頭が `first` の列の番号を1ステップ左回転した番号に置き換える
    #[inline]
    pub fn rotate(&self, number: &mut BigUint, first: Step) {
        *number *= self.digits;
        *number -= &self.multipliers[first as usize];
    }
}

/// n! を半分ずつ割った値の列（昇順、最後は n!）。
/// ある置換像の個数が n! の約数であることから、数え上げの途中で打ち切る判定に使う。
pub fn halving_milestones(permutations: u64) -> Vec<u64> {
    let halvings = permutations.trailing_zeros() + 1;
    (0..halvings)
        .map(|i| permutations >> (halvings - 1 - i))
        .collect()
}

/// 前半と後半が等しい列は異なる回転が L/2 通り
pub fn distinct_rotations(seed: &Sequence) -> u64 {
    if seed.is_half_symmetric() {
        seed.len() as u64 / 2
    } else {
        seed.len() as u64
    }
}

/// 1つのシードが代表する巡回グレイコードの数を求める。
///
/// 全 n! 通りの桁の付け替えを交換列で順に巡り、各像を回転まで含めて
/// 既出かどうかを系列番号の表で判定して、回転の違いを除いた異なる像の数を数える。
/// ワーカーごとに1つ作り、表と作業領域をシード間で再利用する。
pub struct Extrapolator<'a> {
    tables: &'a SharedTables,
    seen: BigIntTable,
    work: Vec<Step>,
    original: BigUint,
    current: BigUint,
    milestones: Vec<u64>,
    early_exit: bool,
}

impl<'a> Extrapolator<'a> {
    pub fn new(tables: &'a SharedTables, early_exit: bool) -> Self {
        Extrapolator {
            tables,
            seen: BigIntTable::for_digits(tables.digits),
            work: Vec::with_capacity(tables.len()),
            original: BigUint::default(),
            current: BigUint::default(),
            milestones: halving_milestones(tables.permutations()),
            early_exit,
        }
    }

    /// 回転を同一視したときの、桁の付け替えによる異なる像の数
    pub fn distinct_labelings(&mut self, seed: &Sequence) -> u64 {
        let tables = self.tables;
        let permutations = tables.permutations();
        let digits = tables.digits;
        self.seen.clear();
        self.work.clear();
        self.work.extend_from_slice(seed.steps());

        let mut unique = 0u64;
        let mut milestone = 0usize;
        let queue = &tables.queues.full;

        for processed in 1..=permutations as usize {
            if processed > 1 {
                let [a, b] = queue[processed - 2];
                swap_steps(&mut self.work, a, b);
            }
            sequence_number_into(&self.work, digits, &mut self.original);
            self.current.clone_from(&self.original);

            let mut duplicate = false;
            for &first in &self.work {
                if self.seen.contains(&self.current) {
                    duplicate = true;
                    break;
                }
                tables.rotations.rotate(&mut self.current, first);
                if self.current == self.original {
                    break;
                }
            }
            if !duplicate {
                self.seen.insert(&self.original);
                unique += 1;
            }

            if !self.early_exit {
                continue;
            }
            let target = self.milestones[milestone];
            if unique < target {
                continue;
            }
            if unique > target {
                milestone += 1;
                if self.milestones[milestone] == permutations {
                    unique = permutations;
                    break;
                }
            } else if target > permutations - processed as u64 {
                break;
            }
        }
        unique
    }

    /// シードの同値類に含まれる巡回グレイコードの数
    pub fn contribution(&mut self, seed: &Sequence) -> u64 {
        self.distinct_labelings(seed) * distinct_rotations(seed)
    }
}

/// 全置換・全回転の像を集合に入れて数える素朴な同値類の大きさ（検証用）
pub fn orbit_size_naive(seed: &Sequence, tables: &SharedTables) -> u64 {
    let mut images: HashSet<Vec<Step>> = HashSet::new();
    let mut work = seed.steps().to_vec();
    let len = work.len();
    let mut record = |work: &[Step]| {
        for r in 0..len {
            let mut image = Vec::with_capacity(len);
            image.extend_from_slice(&work[r..]);
            image.extend_from_slice(&work[..r]);
            images.insert(image);
        }
    };
    record(&work);
    for &[a, b] in &tables.queues.full {
        swap_steps(&mut work, a, b);
        record(&work);
    }
    images.len() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_milestones() {
        assert_eq!(halving_milestones(24), vec![3, 6, 12, 24]);
        assert_eq!(halving_milestones(120), vec![15, 30, 60, 120]);
        assert_eq!(halving_milestones(5040), vec![315, 630, 1260, 2520, 5040]);
    }

    #[test]
    fn test_rotation_matches_number_of_rotated_sequence() {
        let tables = SharedTables::new(4);
        let seq = Sequence::new(4, vec![0, 1, 0, 2, 0, 1, 0, 3, 0, 2, 1, 2, 0, 2, 1, 3]);
        let mut n = seq.number();
        for k in 1..=seq.len() {
            tables.rotations.rotate(&mut n, seq.steps()[k - 1]);
            assert_eq!(n, seq.rotated(k).number(), "k={}", k);
        }
    }

    #[test]
    fn test_reflected_code_contribution() {
        let tables = SharedTables::new(4);
        let seed = Sequence::new(4, vec![0, 1, 0, 2, 0, 1, 0, 3, 0, 1, 0, 2, 0, 1, 0, 3]);
        let mut ex = Extrapolator::new(&tables, true);
        assert_eq!(ex.distinct_labelings(&seed), 12);
        assert_eq!(ex.contribution(&seed), 96);
        assert_eq!(orbit_size_naive(&seed, &tables), 96);
    }

    #[test]
    fn test_early_exit_agrees_with_full_walk() {
        let tables = SharedTables::new(4);
        let seed = Sequence::new(4, vec![0, 1, 0, 2, 0, 1, 0, 3, 0, 2, 1, 2, 0, 2, 1, 3]);
        let mut fast = Extrapolator::new(&tables, true);
        let mut full = Extrapolator::new(&tables, false);
        assert_eq!(fast.contribution(&seed), 384);
        assert_eq!(full.contribution(&seed), 384);
    }

    #[test]
    fn test_reflected_code_5() {
        let tables = SharedTables::new(5);
        let seed = Sequence::from_masks(5, tables.skeleton.masks());
        let mut ex = Extrapolator::new(&tables, true);
        assert_eq!(ex.contribution(&seed), 960);
        assert_eq!(orbit_size_naive(&seed, &tables), 960);
    }
}
