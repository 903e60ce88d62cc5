use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};
use rayon::prelude::*;

use crate::config::SearchConfig;
use crate::enumerator::{enumerate_partition, PartitionResult};
use crate::error::ChimeraError;
use crate::extrapolate::Extrapolator;
use crate::partition::Partition;
use crate::sequence::Sequence;
use crate::tables::SharedTables;

/// 分割ごとの集計
#[derive(Debug, Clone)]
pub struct PartitionSummary {
    pub partition: Partition,
    pub seeds: usize,
    /// 走査中に完成した巡回グレイコードの数
    pub complete: u64,
    pub elapsed: Duration,
}

/// 全体の数え上げ結果
#[derive(Debug, Clone)]
pub struct CountResult {
    pub digits: usize,
    /// 分割ごとの集計（`Partition::ALL` の順）
    pub partitions: Vec<PartitionSummary>,
    /// 全シード（分割順、各分割内は辞書順）
    pub seeds: Vec<Sequence>,
    /// 巡回グレイコードの総数
    pub total_codes: BigUint,
    pub search_elapsed: Duration,
    pub extrapolation_elapsed: Duration,
}

impl CountResult {
    pub fn seed_count(&self) -> usize {
        self.seeds.len()
    }

    /// シード数からの概算上限 (シード数 - 3/4) * n! * 2^n
    pub fn upper_bound_estimate(&self) -> f64 {
        let permutations = crate::permutation::factorial(self.digits) as f64;
        let len = (1u64 << self.digits) as f64;
        (self.seeds.len() as f64 - 0.75) * permutations * len
    }

    /// 総数に対する概算上限の比
    pub fn estimate_ratio(&self) -> Option<f64> {
        let total = self.total_codes.to_f64()?;
        if total == 0.0 {
            None
        } else {
            Some(self.upper_bound_estimate() / total)
        }
    }
}

/// 5分割を並列に探索する
pub fn search_seeds(tables: &SharedTables, skip_forced_tail: bool) -> Vec<PartitionResult> {
    Partition::ALL
        .par_iter()
        .map(|&p| enumerate_partition(p, tables, skip_forced_tail))
        .collect()
}

/// シード列をワーカー数で等分し、各ワーカーが専用の表で外挿する。
///
/// progress_callback: (完了シード数, 総シード数) をシードごとに呼ぶ（スレッドセーフ）。
pub fn extrapolate_seeds(
    seeds: &[Sequence],
    tables: &SharedTables,
    workers: usize,
    early_exit: bool,
    progress_callback: &(impl Fn(u64, u64) + Sync),
) -> BigUint {
    if seeds.is_empty() {
        return BigUint::zero();
    }
    let chunk_size = num_integer::div_ceil(seeds.len(), workers.max(1));
    let total_seeds = seeds.len() as u64;
    let global_done = AtomicU64::new(0);
    let total = Mutex::new(BigUint::zero());

    seeds.par_chunks(chunk_size).for_each(|chunk| {
        let mut extrapolator = Extrapolator::new(tables, early_exit);
        let mut local = BigUint::zero();
        for seed in chunk {
            local += extrapolator.contribution(seed);
            let done = global_done.fetch_add(1, Ordering::Relaxed) + 1;
            progress_callback(done, total_seeds);
        }
        tracing::debug!(seeds = chunk.len(), contribution = %local, "extrapolation chunk finished");
        let mut guard = total.lock().unwrap_or_else(|e| e.into_inner());
        *guard += local;
    });

    total.into_inner().unwrap_or_else(|e| e.into_inner())
}

/// 設定に従ってシード探索と外挿を行い、巡回グレイコードの総数を求める
pub fn count_codes(config: &SearchConfig) -> Result<CountResult, ChimeraError> {
    count_codes_with_progress(config, |_, _| {})
}

/// 外挿の進捗コールバック付き版
pub fn count_codes_with_progress(
    config: &SearchConfig,
    progress_callback: impl Fn(u64, u64) + Sync,
) -> Result<CountResult, ChimeraError> {
    config.validate()?;
    match config.threads {
        Some(threads) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()?;
            Ok(pool.install(|| run(config, &progress_callback)))
        }
        None => Ok(run(config, &progress_callback)),
    }
}

fn run(config: &SearchConfig, progress_callback: &(impl Fn(u64, u64) + Sync)) -> CountResult {
    let tables = SharedTables::new(config.digits);
    tracing::info!(digits = config.digits, len = tables.len(), "seed search started");

    let search_start = Instant::now();
    let results = search_seeds(&tables, config.skip_forced_tail);
    let search_elapsed = search_start.elapsed();

    let partitions: Vec<PartitionSummary> = results
        .iter()
        .map(|r| PartitionSummary {
            partition: r.partition,
            seeds: r.seeds.len(),
            complete: r.complete,
            elapsed: r.elapsed,
        })
        .collect();
    let seeds: Vec<Sequence> = results.into_iter().flat_map(|r| r.seeds).collect();
    tracing::info!(
        seeds = seeds.len(),
        elapsed_ms = search_elapsed.as_millis() as u64,
        "seed search finished"
    );

    let extrapolation_start = Instant::now();
    let total_codes = extrapolate_seeds(
        &seeds,
        &tables,
        config.extrapolation_workers,
        config.early_exit,
        progress_callback,
    );
    let extrapolation_elapsed = extrapolation_start.elapsed();
    tracing::info!(
        total = %total_codes,
        elapsed_ms = extrapolation_elapsed.as_millis() as u64,
        "extrapolation finished"
    );

    CountResult {
        digits: config.digits,
        partitions,
        seeds,
        total_codes,
        search_elapsed,
        extrapolation_elapsed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_4() {
        let result = count_codes(&SearchConfig::new(4)).unwrap();
        assert_eq!(result.seed_count(), 11);
        assert_eq!(result.total_codes, BigUint::from(2688u64));
        let per: Vec<usize> = result.partitions.iter().map(|p| p.seeds).collect();
        assert_eq!(per, vec![8, 3, 0, 0, 0]);
    }

    #[test]
    fn test_worker_count_does_not_change_total() {
        let tables = SharedTables::new(4);
        let seeds: Vec<Sequence> = search_seeds(&tables, true)
            .into_iter()
            .flat_map(|r| r.seeds)
            .collect();
        for workers in [1, 2, 3, 11, 50] {
            let total = extrapolate_seeds(&seeds, &tables, workers, true, &|_, _| {});
            assert_eq!(total, BigUint::from(2688u64), "workers={}", workers);
        }
    }

    #[test]
    fn test_progress_reaches_total() {
        let tables = SharedTables::new(4);
        let seeds: Vec<Sequence> = search_seeds(&tables, true)
            .into_iter()
            .flat_map(|r| r.seeds)
            .collect();
        let max_seen = AtomicU64::new(0);
        extrapolate_seeds(&seeds, &tables, 4, true, &|done, total| {
            assert_eq!(total, 11);
            max_seen.fetch_max(done, Ordering::Relaxed);
        });
        assert_eq!(max_seen.load(Ordering::Relaxed), 11);
    }

    #[test]
    fn test_upper_bound_estimate() {
        let result = count_codes(&SearchConfig::new(4)).unwrap();
        // (11 - 0.75) * 24 * 16
        assert!((result.upper_bound_estimate() - 3936.0).abs() < 1e-9);
        assert!(result.estimate_ratio().unwrap() > 1.0);
    }

    #[test]
    fn test_dedicated_pool() {
        let config = SearchConfig::new(4).with_threads(Some(2));
        let result = count_codes(&config).unwrap();
        assert_eq!(result.total_codes, BigUint::from(2688u64));
    }

    #[test]
    fn test_invalid_config() {
        assert!(count_codes(&SearchConfig::new(3)).is_err());
    }
}
