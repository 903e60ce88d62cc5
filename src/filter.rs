//! 分割ごとの所有述語。
//!
//! 前向き述語 `owns_*(s, i)` は `s[i..=i+4]`（0120 と 0123 は `i+3` まで）を見て、
//! 位置 i から始まる回転がその分割の接頭辞形に正規化できるかを判定する。
//! 後ろ向き述語 `lower_owns_*(s, i)` は `s[i-w..=i]` を見て、
//! 位置 i で終わる窓が辞書順でより小さい分割の接頭辞形になるかを判定する。
//! 添字範囲は呼び出し側が保証する。

use crate::sequence::StepMask;

/// 述語の型
pub type StepPredicate = fn(&[StepMask], usize) -> bool;

#[inline]
pub fn owns_01020(s: &[StepMask], i: usize) -> bool {
    debug_assert!(i + 4 < s.len());
    s[i] == s[i + 2] && s[i + 2] == s[i + 4]
}

#[inline]
pub fn owns_01021(s: &[StepMask], i: usize) -> bool {
    debug_assert!(i + 4 < s.len());
    s[i] == s[i + 2] && s[i + 1] == s[i + 4]
}

#[inline]
pub fn owns_01023(s: &[StepMask], i: usize) -> bool {
    debug_assert!(i + 4 < s.len());
    s[i] == s[i + 2] && s[i + 4] != s[i] && s[i + 4] != s[i + 1]
}

#[inline]
pub fn owns_0120(s: &[StepMask], i: usize) -> bool {
    debug_assert!(i + 3 < s.len());
    s[i] == s[i + 3]
}

#[inline]
pub fn owns_0123(s: &[StepMask], i: usize) -> bool {
    debug_assert!(i + 3 < s.len());
    s[i] != s[i + 2] && s[i + 3] != s[i] && s[i + 3] != s[i + 1]
}

#[inline]
pub fn lower_owns_01021(s: &[StepMask], i: usize) -> bool {
    debug_assert!(i >= 4);
    s[i - 4] == s[i - 2] && s[i - 2] == s[i]
}

#[inline]
pub fn lower_owns_01023(s: &[StepMask], i: usize) -> bool {
    debug_assert!(i >= 4);
    s[i - 4] == s[i - 2] && (s[i] == s[i - 4] || s[i] == s[i - 3])
}

#[inline]
pub fn lower_owns_0120(s: &[StepMask], i: usize) -> bool {
    debug_assert!(i >= 2);
    s[i - 2] == s[i]
}

#[inline]
pub fn lower_owns_0123(s: &[StepMask], i: usize) -> bool {
    debug_assert!(i >= 3);
    s[i - 3] == s[i - 1] || s[i - 3] == s[i]
}

#[cfg(test)]
mod tests {
    use super::*;

    // 0,1,0,2,0 / 0,1,0,2,1 / 0,1,0,2,3 / 0,1,2,0 / 0,1,2,3 のマスク形
    const P01020: [StepMask; 5] = [1, 2, 1, 4, 1];
    const P01021: [StepMask; 5] = [1, 2, 1, 4, 2];
    const P01023: [StepMask; 5] = [1, 2, 1, 4, 8];
    const P0120: [StepMask; 4] = [1, 2, 4, 1];
    const P0123: [StepMask; 4] = [1, 2, 4, 8];

    #[test]
    fn test_each_prefix_owns_itself() {
        assert!(owns_01020(&P01020, 0));
        assert!(owns_01021(&P01021, 0));
        assert!(owns_01023(&P01023, 0));
        assert!(owns_0120(&P0120, 0));
        assert!(owns_0123(&P0123, 0));
    }

    #[test]
    fn test_prefixes_are_exclusive() {
        assert!(!owns_01021(&P01020, 0));
        assert!(!owns_01023(&P01020, 0));
        assert!(!owns_01020(&P01021, 0));
        assert!(!owns_01023(&P01021, 0));
        assert!(!owns_01020(&P01023, 0));
        assert!(!owns_01021(&P01023, 0));
        assert!(!owns_0120(&P0123, 0));
        assert!(!owns_0123(&P0120, 0));
    }

    #[test]
    fn test_ownership_is_relabeling_invariant() {
        // 2,3,2,0,2 は 0,1,0,2,0 の桁の付け替え
        assert!(owns_01020(&[4, 8, 4, 1, 4], 0));
        // 3,0,1,3 は 0,1,2,0 の付け替え
        assert!(owns_0120(&[8, 1, 2, 8], 0));
    }

    #[test]
    fn test_lower_predicates_detect_smaller_windows() {
        // 窓の末尾が 0,1,0,2,0 形: 01021 より小さい
        assert!(lower_owns_01021(&P01020, 4));
        assert!(!lower_owns_01021(&P01021, 4));
        // 0,1,0,2,0 と 0,1,0,2,1 は 01023 より小さい
        assert!(lower_owns_01023(&P01020, 4));
        assert!(lower_owns_01023(&P01021, 4));
        assert!(!lower_owns_01023(&P01023, 4));
        // 0,1,0 形は 0120 より小さい
        assert!(lower_owns_0120(&[1, 2, 1], 2));
        assert!(!lower_owns_0120(&P0120, 3));
        // 0,1,0 または 0,1,2,0 形は 0123 より小さい
        assert!(lower_owns_0123(&[1, 2, 1, 4], 3));
        assert!(lower_owns_0123(&P0120, 3));
        assert!(!lower_owns_0123(&P0123, 3));
    }
}
