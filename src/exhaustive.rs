//! 分割・正規形を使わない素朴な数え上げ（小さい n での検証用）

use num_bigint::BigUint;
use rayon::prelude::*;

use crate::enumerator::Backtracker;
use crate::seq_table::SequenceTable;
use crate::sequence::{mask_of, step_of, swap_steps, Sequence, Step, StepMask};
use crate::tables::SharedTables;

/// 2ステップ目ごとの完成数
#[derive(Debug, Clone)]
pub struct ExhaustiveResult {
    /// (2ステップ目の桁, 完成数)
    pub per_second_step: Vec<(Step, u64)>,
    /// 1ステップ目を 0 に固定したときの総数
    pub fixed_first_step: u64,
    /// 全巡回グレイコード数（1ステップ目の n 通りの対称性で n 倍）
    pub total: BigUint,
}

/// 1ステップ目を 0 に固定して全巡回グレイコードを数える。
/// 2ステップ目の各候補を並列に走査する。
pub fn count_exhaustive(tables: &SharedTables, skip_forced_tail: bool) -> ExhaustiveResult {
    let per_second_step: Vec<(Step, u64)> = (1..tables.digits as Step)
        .into_par_iter()
        .map(|second| {
            let prefix: [StepMask; 2] = [mask_of(0), mask_of(second)];
            let stats = Backtracker::new(&tables.skeleton, &prefix, 0, None)
                .with_forced_tail_skip(skip_forced_tail)
                .walk(|_| {});
            tracing::debug!(second, complete = stats.complete, "exhaustive branch finished");
            (second, stats.complete)
        })
        .collect();
    let fixed_first_step: u64 = per_second_step.iter().map(|&(_, c)| c).sum();
    ExhaustiveResult {
        per_second_step,
        fixed_first_step,
        total: BigUint::from(fixed_first_step) * tables.digits as u64,
    }
}

/// 表引きによるシード探索の結果
#[derive(Debug, Clone)]
pub struct MembershipResult {
    /// 各同値類で最初に現れた列（系列番号最小）
    pub seeds: Vec<Sequence>,
    /// シードごとの同値類の大きさ
    pub orbit_sizes: Vec<u64>,
    /// 同値類の大きさの総和
    pub total: BigUint,
}

/// 0 で始まる巡回グレイコードを辞書順に走査し、既出の同値類に属さない列を
/// シードとして記録する。シードを見つけるたびに全置換・全回転の像を表に入れる。
///
/// 全像を保持するので n = 4 程度でのみ現実的。
pub fn membership_seeds(tables: &SharedTables) -> MembershipResult {
    let len = tables.len();
    let mut table = SequenceTable::new(len);
    let mut seeds = Vec::new();
    let mut orbit_sizes = Vec::new();
    let mut digits_buf: Vec<Step> = vec![0; len];
    let mut work: Vec<Step> = Vec::with_capacity(len);
    let mut image: Vec<Step> = Vec::with_capacity(len);

    Backtracker::new(&tables.skeleton, &[mask_of(0)], 0, None).walk(|steps| {
        for (d, &m) in digits_buf.iter_mut().zip(steps) {
            *d = step_of(m);
        }
        if table.contains(&digits_buf) {
            return;
        }
        work.clear();
        work.extend_from_slice(&digits_buf);
        let mut added = 0u64;
        let mut record = |work: &[Step], table: &mut SequenceTable| {
            for r in 0..len {
                image.clear();
                image.extend_from_slice(&work[r..]);
                image.extend_from_slice(&work[..r]);
                if table.insert_if_absent(&image) {
                    added += 1;
                }
            }
        };
        record(&work, &mut table);
        for &[a, b] in &tables.queues.full {
            swap_steps(&mut work, a, b);
            record(&work, &mut table);
        }
        seeds.push(Sequence::new(tables.digits, digits_buf.clone()));
        orbit_sizes.push(added);
    });

    let total = orbit_sizes.iter().fold(BigUint::default(), |acc, &s| acc + s);
    tracing::info!(seeds = seeds.len(), entries = table.len(), "membership seed search finished");
    MembershipResult {
        seeds,
        orbit_sizes,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exhaustive_4() {
        let tables = SharedTables::new(4);
        let result = count_exhaustive(&tables, true);
        assert_eq!(result.per_second_step, vec![(1, 224), (2, 224), (3, 224)]);
        assert_eq!(result.fixed_first_step, 672);
        assert_eq!(result.total, BigUint::from(2688u64));
    }

    #[test]
    fn test_membership_4() {
        let tables = SharedTables::new(4);
        let result = membership_seeds(&tables);
        assert_eq!(result.seeds.len(), 11);
        assert_eq!(
            result.orbit_sizes,
            vec![96, 384, 192, 384, 192, 192, 384, 384, 96, 192, 192]
        );
        assert_eq!(result.total, BigUint::from(2688u64));
    }
}
