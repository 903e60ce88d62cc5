use crate::sequence::{sequence_len, StepMask};

/// 最小の巡回グレイコード（反射二進グレイコード）のステップ列。
/// 探索の後退時に、変更位置より後ろを埋め直す最小の補完として使う。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skeleton {
    digits: usize,
    masks: Vec<StepMask>,
}

impl Skeleton {
    /// 長さ 1 から始めて「複製して末尾を 1 ビット上げる」を n 回繰り返し、
    /// 最後に末尾を 1 ビット戻すと長さ 2^n の巡回列になる。
    pub fn new(digits: usize) -> Self {
        let len = sequence_len(digits);
        let mut masks: Vec<StepMask> = vec![0; len + 1];
        masks[0] = 1;
        let mut filled = 1usize;
        for _ in 0..digits {
            masks.copy_within(0..filled, filled);
            filled += filled - 1;
            masks[filled] <<= 1;
            filled += 1;
        }
        masks.truncate(len);
        masks[len - 1] >>= 1;
        Skeleton { digits, masks }
    }

    pub fn digits(&self) -> usize {
        self.digits
    }

    pub fn masks(&self) -> &[StepMask] {
        &self.masks
    }

    pub fn len(&self) -> usize {
        self.masks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::{step_of, Sequence};

    #[test]
    fn test_skeleton_4() {
        let skel = Skeleton::new(4);
        let digits: Vec<u8> = skel.masks().iter().map(|&m| step_of(m)).collect();
        assert_eq!(digits, vec![0, 1, 0, 2, 0, 1, 0, 3, 0, 1, 0, 2, 0, 1, 0, 3]);
    }

    #[test]
    fn test_skeleton_is_gray_code() {
        for n in 4..=8 {
            let skel = Skeleton::new(n);
            assert_eq!(skel.len(), 1 << n);
            let seq = Sequence::from_masks(n, skel.masks());
            assert!(seq.is_cyclic_gray_code(), "n={}", n);
        }
    }

    #[test]
    fn test_skeleton_last_is_top_digit() {
        let skel = Skeleton::new(6);
        assert_eq!(skel.masks()[skel.len() - 1], 1 << 5);
        assert_eq!(skel.masks()[skel.len() / 2 - 1], 1 << 5);
    }
}
