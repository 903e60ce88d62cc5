use std::fmt;

use num_bigint::BigUint;
use num_traits::Zero;

use crate::error::ChimeraError;

/// ステップ（反転するビット位置）。0..n の桁値。
pub type Step = u8;

/// ステップのビットマスク表現（`1 << step`）。探索中の内部表現。
pub type StepMask = u16;

/// n 桁の巡回グレイコードのステップ数 L = 2^n
#[inline]
pub fn sequence_len(digits: usize) -> usize {
    1usize << digits
}

/// 桁値 → マスク
#[inline]
pub fn mask_of(step: Step) -> StepMask {
    1 << step
}

/// マスク → 桁値（末尾ゼロ数）
#[inline]
pub fn step_of(mask: StepMask) -> Step {
    mask.trailing_zeros() as Step
}

/// 列全体で値 a と b を入れ替える（桁の置換を1つ適用する）
#[inline]
pub fn swap_steps<T: Copy + PartialEq>(steps: &mut [T], a: T, b: T) {
    for s in steps.iter_mut() {
        if *s == a {
            *s = b;
        } else if *s == b {
            *s = a;
        }
    }
}

/// candidate が original より辞書順で真に小さいか
#[inline]
pub fn is_lower<T: Ord>(candidate: &[T], original: &[T]) -> bool {
    candidate < original
}

/// 列を n 進数として読んだ値を `out` に書き込む（先頭が最上位桁）
pub fn sequence_number_into(steps: &[Step], digits: usize, out: &mut BigUint) {
    out.set_zero();
    let base = digits as u64;
    for &s in steps {
        *out *= base;
        *out += s as u64;
    }
}

/// 桁値で保持した巡回ステップ列
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Sequence {
    digits: usize,
    steps: Vec<Step>,
}

impl Sequence {
    pub fn new(digits: usize, steps: Vec<Step>) -> Self {
        Sequence { digits, steps }
    }

    /// マスク表現から生成
    pub fn from_masks(digits: usize, masks: &[StepMask]) -> Self {
        Sequence {
            digits,
            steps: masks.iter().map(|&m| step_of(m)).collect(),
        }
    }

    /// "0,1,0,2,..." 形式の文字列を解釈する。区切りはカンマまたは空白。
    pub fn parse(digits: usize, text: &str) -> Result<Self, ChimeraError> {
        let mut steps = Vec::with_capacity(sequence_len(digits));
        for token in text
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
        {
            let step = token
                .parse::<Step>()
                .ok()
                .filter(|&s| (s as usize) < digits)
                .ok_or_else(|| ChimeraError::InvalidStep {
                    token: token.to_string(),
                    digits,
                })?;
            steps.push(step);
        }
        let expected = sequence_len(digits);
        if steps.len() != expected {
            return Err(ChimeraError::SequenceLength {
                found: steps.len(),
                expected,
            });
        }
        Ok(Sequence { digits, steps })
    }

    pub fn digits(&self) -> usize {
        self.digits
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn to_masks(&self) -> Vec<StepMask> {
        self.steps.iter().map(|&s| mask_of(s)).collect()
    }

    /// 系列番号: 列を n 進数として読んだ値
    pub fn number(&self) -> BigUint {
        let mut n = BigUint::zero();
        sequence_number_into(&self.steps, self.digits, &mut n);
        n
    }

    /// 左に k ステップ回転した列
    pub fn rotated(&self, k: usize) -> Sequence {
        let mut steps = self.steps.clone();
        if !steps.is_empty() {
            steps.rotate_left(k % self.steps.len());
        }
        Sequence {
            digits: self.digits,
            steps,
        }
    }

    /// 桁 a と b を入れ替える
    pub fn swap(&mut self, a: Step, b: Step) {
        swap_steps(&mut self.steps, a, b);
    }

    /// 前半と後半が一致するか（このとき異なる回転は L/2 通り）
    pub fn is_half_symmetric(&self) -> bool {
        let half = self.steps.len() / 2;
        self.steps[..half] == self.steps[half..]
    }

    /// 各桁の出現回数
    pub fn signature(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.digits];
        for &s in &self.steps {
            counts[s as usize] += 1;
        }
        counts
    }

    /// 全 2^n 頂点をちょうど一度ずつ通り 0 に戻る巡回グレイコードか
    pub fn is_cyclic_gray_code(&self) -> bool {
        let len = sequence_len(self.digits);
        if self.steps.len() != len {
            return false;
        }
        let mut seen = vec![false; len];
        let mut value = 0usize;
        for &s in &self.steps {
            if (s as usize) >= self.digits || seen[value] {
                return false;
            }
            seen[value] = true;
            value ^= 1 << s;
        }
        value == 0
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, s) in self.steps.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", s)?;
        }
        Ok(())
    }
}
