use crate::extrapolate::RotationMultipliers;
use crate::permutation::{factorial, PermutationQueues};
use crate::sequence::sequence_len;
use crate::skeleton::Skeleton;

/// 桁数ごとに一度だけ作り、全ワーカーが読み取り専用で共有する表
#[derive(Debug, Clone)]
pub struct SharedTables {
    pub digits: usize,
    pub skeleton: Skeleton,
    pub queues: PermutationQueues,
    pub rotations: RotationMultipliers,
}

impl SharedTables {
    pub fn new(digits: usize) -> Self {
        SharedTables {
            digits,
            skeleton: Skeleton::new(digits),
            queues: PermutationQueues::new(digits),
            rotations: RotationMultipliers::new(digits),
        }
    }

    /// 列の長さ 2^n
    pub fn len(&self) -> usize {
        sequence_len(self.digits)
    }

    pub fn is_empty(&self) -> bool {
        self.digits == 0
    }

    /// n!
    pub fn permutations(&self) -> u64 {
        factorial(self.digits)
    }
}
