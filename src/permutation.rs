use crate::sequence::{mask_of, Step, StepMask};

/// k! を返す（k <= 20）
pub fn factorial(k: usize) -> u64 {
    (1..=k as u64).product()
}

/// 要素列の全順列を、1回に1組ずつ入れ替えて巡る交換列を作る。
///
/// 恒等順列から始めて交換を順に適用すると、k! 通りの並べ替えを
/// ちょうど一度ずつ訪れる。交換列の長さは k! - 1。
pub fn swap_queue<T: Copy>(elements: &[T]) -> Vec<[T; 2]> {
    let mut queue = Vec::with_capacity(factorial(elements.len()).saturating_sub(1) as usize);
    push_swaps(elements, &mut queue);
    queue
}

fn push_swaps<T: Copy>(elements: &[T], queue: &mut Vec<[T; 2]>) {
    let k = elements.len();
    match k {
        0 | 1 => return,
        2 => {
            queue.push([elements[0], elements[1]]);
            return;
        }
        _ => {}
    }
    let mut working = elements[..k - 1].to_vec();
    for i in (1..k).rev() {
        push_swaps(&working, queue);
        queue.push([elements[i], elements[i - 1]]);
        working[i - 1] = elements[i];
    }
    push_swaps(&working, queue);
}

/// 探索と外挿が共有する交換列
#[derive(Debug, Clone)]
pub struct PermutationQueues {
    /// 全 n 桁の交換列（桁値）
    pub full: Vec<[Step; 2]>,
    /// 桁 3..n の交換列（マスク）。接頭辞が桁 0..2 を固定する分割用
    pub minus_three: Vec<[StepMask; 2]>,
    /// 桁 4..n の交換列（マスク）。接頭辞が桁 0..3 を固定する分割用
    pub minus_four: Vec<[StepMask; 2]>,
}

impl PermutationQueues {
    pub fn new(digits: usize) -> Self {
        let all: Vec<Step> = (0..digits as Step).collect();
        let upper = |low: usize| -> Vec<StepMask> {
            (low..digits).rev().map(|d| mask_of(d as Step)).collect()
        };
        PermutationQueues {
            full: swap_queue(&all),
            minus_three: swap_queue(&upper(3)),
            minus_four: swap_queue(&upper(4)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_factorial() {
        assert_eq!(factorial(0), 1);
        assert_eq!(factorial(4), 24);
        assert_eq!(factorial(8), 40320);
    }

    #[test]
    fn test_queue_4_literal() {
        let q = swap_queue(&[0u8, 1, 2, 3]);
        let expected: Vec<[u8; 2]> = vec![
            [0, 1], [2, 1], [0, 2], [1, 0], [1, 2], [3, 2], [0, 1], [3, 1], [0, 3], [1, 0],
            [1, 3], [2, 1], [0, 2], [3, 2], [0, 3], [2, 0], [2, 3], [1, 0], [1, 2], [3, 2],
            [1, 3], [2, 1], [2, 3],
        ];
        assert_eq!(q, expected);
    }

    #[test]
    fn test_queue_visits_every_permutation() {
        for k in 1..=6usize {
            let elements: Vec<u8> = (0..k as u8).collect();
            let queue = swap_queue(&elements);
            assert_eq!(queue.len() as u64, factorial(k) - 1);

            // 値の入れ替えとして適用し、到達した並びがすべて異なることを確認
            let mut current = elements.clone();
            let mut seen = HashSet::new();
            seen.insert(current.clone());
            for &[a, b] in &queue {
                for x in current.iter_mut() {
                    if *x == a {
                        *x = b;
                    } else if *x == b {
                        *x = a;
                    }
                }
                assert!(seen.insert(current.clone()), "k={} repeated {:?}", k, current);
            }
            assert_eq!(seen.len() as u64, factorial(k));
        }
    }

    #[test]
    fn test_reduced_queues() {
        let q4 = PermutationQueues::new(4);
        assert_eq!(q4.full.len(), 23);
        assert!(q4.minus_three.is_empty());
        assert!(q4.minus_four.is_empty());

        let q6 = PermutationQueues::new(6);
        assert_eq!(q6.minus_three.len(), 5);
        assert_eq!(q6.minus_four.len(), 1);
        assert_eq!(q6.minus_four[0], [32, 16]);
        for pair in q6.minus_three.iter().chain(&q6.minus_four) {
            assert!(pair.iter().all(|&m| m >= 8));
        }
    }
}
