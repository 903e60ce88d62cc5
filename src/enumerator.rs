use std::time::{Duration, Instant};

use crate::canonical::CanonicalCheck;
use crate::filter::StepPredicate;
use crate::partition::Partition;
use crate::sequence::{Sequence, StepMask};
use crate::skeleton::Skeleton;
use crate::tables::SharedTables;

/// 探索の状態遷移
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// 現在位置から先へ値を実現していく
    Descend,
    /// 最後の位置で 0 に戻った（巡回グレイコードが完成した）
    Complete,
    /// 現在位置のステップを次の候補に進める
    Increment,
}

/// 走査の統計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// 完成した巡回グレイコードの数
    pub complete: u64,
}

/// 固定接頭辞から始まる巡回グレイコードを辞書順に列挙するバックトラック探索。
///
/// ステップ列は `2^n + lookback` 個のマスク（末尾に巡回の折り返し窓として
/// 接頭辞の先頭を複製）、実現値は `2^n + 1` 個（0 番は出発点の 0）。
/// 接頭辞の最後のステップが変わった時点で走査を終える。
pub struct Backtracker<'a> {
    skeleton: &'a [StepMask],
    len: usize,
    last: StepMask,
    steps: Vec<StepMask>,
    values: Vec<usize>,
    seen: Vec<bool>,
    cursor: usize,
    limit_index: usize,
    lower: Option<StepPredicate>,
    lookback: usize,
    skip_forced_tail: bool,
}

impl<'a> Backtracker<'a> {
    pub fn new(
        skeleton: &'a Skeleton,
        prefix: &[StepMask],
        lookback: usize,
        lower: Option<StepPredicate>,
    ) -> Self {
        let len = skeleton.len();
        debug_assert!(!prefix.is_empty() && prefix.len() < len);
        debug_assert!(lookback <= prefix.len());

        let mut steps = Vec::with_capacity(len + lookback);
        steps.extend_from_slice(prefix);
        steps.extend_from_slice(&skeleton.masks()[..len - prefix.len()]);
        steps.extend_from_slice(&prefix[..lookback]);

        let mut values = vec![0usize; len + 1];
        let mut seen = vec![false; len];
        for (i, &step) in prefix.iter().enumerate() {
            values[i + 1] = values[i] ^ step as usize;
            seen[values[i + 1]] = true;
        }

        Backtracker {
            skeleton: skeleton.masks(),
            len,
            last: 1 << (skeleton.digits() - 1),
            steps,
            values,
            seen,
            cursor: prefix.len(),
            limit_index: prefix.len() - 1,
            lower,
            lookback,
            skip_forced_tail: true,
        }
    }

    /// 完成後に末尾3ステップを飛ばして戻るか（既定で有効）。
    /// 末尾3ステップは完成列で一意に決まるので、飛ばしても列挙結果は変わらない。
    pub fn with_forced_tail_skip(mut self, skip: bool) -> Self {
        self.skip_forced_tail = skip;
        self
    }

    /// 走査を最後まで進め、折り返し検査を通った完成列ごとに `on_complete` を呼ぶ
    pub fn walk<F: FnMut(&[StepMask])>(mut self, mut on_complete: F) -> WalkStats {
        let mut stats = WalkStats::default();
        let mut state = State::Descend;
        loop {
            state = match state {
                State::Descend => self.descend(),
                State::Complete => {
                    stats.complete += 1;
                    if !self.wraps_into_lower() {
                        on_complete(&self.steps[..self.len]);
                    }
                    if self.skip_forced_tail {
                        self.cursor -= 3;
                        for k in 1..=3 {
                            self.seen[self.values[self.cursor + k]] = false;
                        }
                    }
                    State::Increment
                }
                State::Increment => {
                    if !self.increment() {
                        return stats;
                    }
                    State::Descend
                }
            };
        }
    }

    fn descend(&mut self) -> State {
        loop {
            if let Some(lower) = self.lower {
                if lower(&self.steps, self.cursor) {
                    return State::Increment;
                }
            }
            let value = self.values[self.cursor] ^ self.steps[self.cursor] as usize;
            self.values[self.cursor + 1] = value;
            if value == 0 {
                return if self.cursor + 1 == self.len {
                    State::Complete
                } else {
                    State::Increment
                };
            }
            if self.seen[value] {
                return State::Increment;
            }
            self.seen[value] = true;
            self.cursor += 1;
        }
    }

    /// 最後の位置から折り返し窓までで、より小さい分割の形が現れるか
    fn wraps_into_lower(&self) -> bool {
        match self.lower {
            None => false,
            Some(lower) => (self.len - 1..self.len + self.lookback).any(|i| lower(&self.steps, i)),
        }
    }

    /// 次の候補へ進める。接頭辞の最後のステップに達したら false。
    fn increment(&mut self) -> bool {
        loop {
            if self.cursor <= self.limit_index {
                return false;
            }
            if self.steps[self.cursor] & self.last != 0 {
                self.cursor -= 1;
                self.seen[self.values[self.cursor + 1]] = false;
                continue;
            }
            self.steps[self.cursor] <<= 1;
            if self.steps[self.cursor] != self.steps[self.cursor - 1] {
                break;
            }
        }
        let refill = self.len - 1 - self.cursor;
        self.steps[self.cursor + 1..self.len].copy_from_slice(&self.skeleton[..refill]);
        true
    }
}

/// 1分割の探索結果
#[derive(Debug, Clone)]
pub struct PartitionResult {
    pub partition: Partition,
    /// 正規形と確認されたシード（辞書順）
    pub seeds: Vec<Sequence>,
    /// 走査中に完成した巡回グレイコードの数
    pub complete: u64,
    pub elapsed: Duration,
}

/// 1分割の正規形シードをすべて求める
pub fn enumerate_partition(
    partition: Partition,
    tables: &SharedTables,
    skip_forced_tail: bool,
) -> PartitionResult {
    let start = Instant::now();
    let mut canonical = CanonicalCheck::new(partition, partition.queue(&tables.queues), tables.len());
    let mut seeds = Vec::new();

    let stats = Backtracker::new(
        &tables.skeleton,
        partition.prefix(),
        partition.lookback(),
        partition.lower_ownership(),
    )
    .with_forced_tail_skip(skip_forced_tail)
    .walk(|steps| {
        if canonical.is_canonical(steps) {
            seeds.push(Sequence::from_masks(tables.digits, steps));
            if seeds.len() & 0xFFFF == 0 {
                tracing::debug!(partition = %partition, seeds = seeds.len(), "seed search progress");
            }
        }
    });

    let elapsed = start.elapsed();
    tracing::info!(
        partition = %partition,
        seeds = seeds.len(),
        complete = stats.complete,
        elapsed_ms = elapsed.as_millis() as u64,
        "partition search finished"
    );
    PartitionResult {
        partition,
        seeds,
        complete: stats.complete,
        elapsed,
    }
}
