use std::fmt;

use crate::filter::{self, StepPredicate};
use crate::permutation::PermutationQueues;
use crate::sequence::{step_of, Step, StepMask};

/// 正規形の接頭辞による探索空間の分割。
///
/// 任意の巡回グレイコードは回転と桁の付け替えで 0,1,0,2,... か 0,1,2,... の
/// どちらかで始まる形にでき、その5ステップ目までの形で5つに分かれる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Partition {
    P01020,
    P01021,
    P01023,
    P0120,
    P0123,
}

/// 正規形確認で使う縮小交換列の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReducedQueue {
    /// 桁 3 以上の置換
    MinusThree,
    /// 桁 4 以上の置換
    MinusFour,
}

impl Partition {
    /// 辞書順（正規形の小さい順）
    pub const ALL: [Partition; 5] = [
        Partition::P01020,
        Partition::P01021,
        Partition::P01023,
        Partition::P0120,
        Partition::P0123,
    ];

    /// 接頭辞のマスク列
    pub fn prefix(self) -> &'static [StepMask] {
        match self {
            Partition::P01020 => &[1, 2, 1, 4, 1],
            Partition::P01021 => &[1, 2, 1, 4, 2],
            Partition::P01023 => &[1, 2, 1, 4, 8],
            Partition::P0120 => &[1, 2, 4, 1],
            Partition::P0123 => &[1, 2, 4, 8],
        }
    }

    pub fn prefix_steps(self) -> Vec<Step> {
        self.prefix().iter().map(|&m| step_of(m)).collect()
    }

    pub fn label(self) -> &'static str {
        match self {
            Partition::P01020 => "01020",
            Partition::P01021 => "01021",
            Partition::P01023 => "01023",
            Partition::P0120 => "0120",
            Partition::P0123 => "0123",
        }
    }

    /// 前向き所有述語
    pub fn ownership(self) -> StepPredicate {
        match self {
            Partition::P01020 => filter::owns_01020,
            Partition::P01021 => filter::owns_01021,
            Partition::P01023 => filter::owns_01023,
            Partition::P0120 => filter::owns_0120,
            Partition::P0123 => filter::owns_0123,
        }
    }

    /// より小さい分割に属する窓を検出する後ろ向き述語。最小の分割にはない。
    pub fn lower_ownership(self) -> Option<StepPredicate> {
        match self {
            Partition::P01020 => None,
            Partition::P01021 => Some(filter::lower_owns_01021),
            Partition::P01023 => Some(filter::lower_owns_01023),
            Partition::P0120 => Some(filter::lower_owns_0120),
            Partition::P0123 => Some(filter::lower_owns_0123),
        }
    }

    /// 巡回の折り返し窓として末尾に複製する接頭辞の長さ
    pub fn lookback(self) -> usize {
        match self {
            Partition::P01020 => 0,
            Partition::P01021 | Partition::P01023 => 4,
            Partition::P0120 => 2,
            Partition::P0123 => 3,
        }
    }

    pub fn reduced_queue(self) -> ReducedQueue {
        match self {
            Partition::P01020 | Partition::P01021 | Partition::P0120 => ReducedQueue::MinusThree,
            Partition::P01023 | Partition::P0123 => ReducedQueue::MinusFour,
        }
    }

    /// この分割の正規形確認で使う交換列
    pub fn queue(self, queues: &PermutationQueues) -> &[[StepMask; 2]] {
        match self.reduced_queue() {
            ReducedQueue::MinusThree => &queues.minus_three,
            ReducedQueue::MinusFour => &queues.minus_four,
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
