use crate::partition::Partition;
use crate::permutation::PermutationQueues;
use crate::sequence::{is_lower, swap_steps, Sequence, StepMask};

/// 完全列がその分割での正規形（同値類の最小代表）かを確認する。
///
/// 二周分の作業列を持ち、分割の所有述語が成り立つ各回転位置について、
/// 桁を付け替えて接頭辞に揃えた回転と、さらに縮小交換列で残りの桁を
/// 並べ替えた各回転を元の列と比べる。どれか一つでも小さければ正規形ではない。
#[derive(Debug, Clone)]
pub struct CanonicalCheck<'a> {
    partition: Partition,
    queue: &'a [[StepMask; 2]],
    len: usize,
    scratch: Vec<StepMask>,
}

impl<'a> CanonicalCheck<'a> {
    pub fn new(partition: Partition, queue: &'a [[StepMask; 2]], len: usize) -> Self {
        CanonicalCheck {
            partition,
            queue,
            len,
            scratch: vec![0; 2 * len],
        }
    }

    pub fn is_canonical(&mut self, candidate: &[StepMask]) -> bool {
        debug_assert_eq!(candidate.len(), self.len);
        let len = self.len;
        let prefix = self.partition.prefix();
        let owns = self.partition.ownership();

        self.scratch[..len].copy_from_slice(candidate);
        self.scratch[len..].copy_from_slice(candidate);

        for start in 0..len {
            if !owns(&self.scratch, start) {
                continue;
            }
            for (k, &want) in prefix.iter().enumerate() {
                let found = self.scratch[start + k];
                if found != want {
                    swap_steps(&mut self.scratch, found, want);
                }
            }
            if is_lower(&self.scratch[start..start + len], candidate) {
                return false;
            }
            for &[a, b] in self.queue {
                swap_steps(&mut self.scratch, a, b);
                if is_lower(&self.scratch[start..start + len], candidate) {
                    return false;
                }
            }
        }
        true
    }
}

/// 列がシード（いずれかの分割の正規形）ならその分割を返す。
///
/// 探索が受理する条件と同じく、接頭辞の一致、より小さい分割の窓が
/// 折り返しを含めてどこにも現れないこと、正規形確認の3つを調べる。
pub fn seed_partition(seq: &Sequence, queues: &PermutationQueues) -> Option<Partition> {
    let masks = seq.to_masks();
    let len = masks.len();
    let partition = Partition::ALL
        .into_iter()
        .find(|p| masks.len() > p.prefix().len() && masks.starts_with(p.prefix()))?;

    if let Some(lower) = partition.lower_ownership() {
        let mut wrapped = masks.clone();
        wrapped.extend_from_slice(&partition.prefix()[..partition.lookback()]);
        if (partition.prefix().len()..len + partition.lookback()).any(|i| lower(&wrapped, i)) {
            return None;
        }
    }
    let mut check = CanonicalCheck::new(partition, partition.queue(queues), len);
    check.is_canonical(&masks).then_some(partition)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::mask_of;

    fn masks(steps: &[u8]) -> Vec<StepMask> {
        steps.iter().map(|&s| mask_of(s)).collect()
    }

    #[test]
    fn test_reflected_code_is_canonical() {
        let code = masks(&[0, 1, 0, 2, 0, 1, 0, 3, 0, 1, 0, 2, 0, 1, 0, 3]);
        let mut check = CanonicalCheck::new(Partition::P01020, &[], 16);
        assert!(check.is_canonical(&code));
    }

    #[test]
    fn test_other_labelings_of_seed_rejected() {
        let seed = masks(&[0, 1, 0, 2, 0, 1, 0, 3, 0, 2, 1, 2, 0, 2, 1, 3]);
        let mut check = CanonicalCheck::new(Partition::P01020, &[], 16);
        assert!(check.is_canonical(&seed));

        // 同じ同値類で 0,1,0,2,0 から始まる他の回転・付け替え
        let variants: [[u8; 16]; 3] = [
            [0, 1, 0, 2, 0, 1, 3, 2, 1, 2, 0, 2, 1, 2, 3, 2],
            [0, 1, 0, 2, 0, 3, 0, 1, 2, 1, 0, 1, 2, 3, 0, 2],
            [0, 1, 0, 2, 0, 3, 1, 3, 0, 3, 1, 2, 0, 1, 0, 3],
        ];
        for v in &variants {
            assert!(!check.is_canonical(&masks(v)), "{:?}", v);
        }
    }

    #[test]
    fn test_relabeled_rotation_roundtrip() {
        let seed = Sequence::new(4, vec![0, 1, 0, 2, 0, 1, 0, 3, 0, 2, 1, 2, 0, 2, 1, 3]);
        let mut relabeled = seed.rotated(8);
        relabeled.swap(1, 2);
        assert_eq!(
            relabeled.steps(),
            &[0, 1, 2, 1, 0, 1, 2, 3, 0, 2, 0, 1, 0, 2, 0, 3]
        );
        let mut check = CanonicalCheck::new(Partition::P01020, &[], 16);
        assert!(!check.is_canonical(&relabeled.rotated(8).to_masks()));
    }

    #[test]
    fn test_seed_partition() {
        let queues = PermutationQueues::new(4);
        let seed = Sequence::new(4, vec![0, 1, 0, 2, 0, 1, 0, 3, 0, 2, 1, 2, 0, 2, 1, 3]);
        assert_eq!(seed_partition(&seed, &queues), Some(Partition::P01020));
        let seed = Sequence::new(4, vec![0, 1, 0, 2, 1, 0, 1, 3, 0, 2, 0, 1, 2, 0, 2, 3]);
        assert_eq!(seed_partition(&seed, &queues), Some(Partition::P01021));

        let variant = Sequence::new(4, vec![0, 1, 0, 2, 0, 3, 0, 1, 2, 1, 0, 1, 2, 3, 0, 2]);
        assert_eq!(seed_partition(&variant, &queues), None);
        // 1,... で始まる列はどの分割にも入らない
        let shifted = seed.rotated(1);
        assert_eq!(seed_partition(&shifted, &queues), None);
    }
}
