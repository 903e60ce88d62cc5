use num_bigint::BigUint;

/// 多倍長整数キーの開番地法ハッシュ集合（固定容量・二重ハッシュ）。
///
/// 外挿で一つのシードの置換像の系列番号を重複排除するために使う。
/// 容量は `2 * n! + 1`、一次ハッシュはキー mod 容量、
/// 二次ハッシュ（刻み幅）はキー mod (n-1) + 1。
/// n 未満の素数はすべて n! を割るので刻み幅は容量と互いに素になり、
/// 探査は必ず空きスロットに到達する。
#[derive(Debug, Clone)]
pub struct BigIntTable {
    slots: Vec<BigUint>,
    occupied: Vec<bool>,
    stride_modulus: u64,
    count: usize,
}

/// key mod m を割り当てなしで計算する
#[inline]
pub fn mod_small(key: &BigUint, m: u64) -> u64 {
    key.iter_u64_digits()
        .rev()
        .fold(0u64, |acc, d| ((((acc as u128) << 64) | d as u128) % m as u128) as u64)
}

impl BigIntTable {
    /// n 桁用: 容量 2 * n! + 1
    pub fn for_digits(digits: usize) -> Self {
        let capacity = 2 * crate::permutation::factorial(digits) as usize + 1;
        Self::with_capacity(capacity, (digits as u64).saturating_sub(1).max(1))
    }

    pub fn with_capacity(capacity: usize, stride_modulus: u64) -> Self {
        let capacity = capacity.max(1);
        BigIntTable {
            slots: vec![BigUint::default(); capacity],
            occupied: vec![false; capacity],
            stride_modulus: stride_modulus.max(1),
            count: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline]
    fn home(&self, key: &BigUint) -> usize {
        mod_small(key, self.slots.len() as u64) as usize
    }

    #[inline]
    fn stride(&self, key: &BigUint) -> usize {
        mod_small(key, self.stride_modulus) as usize + 1
    }

    /// 挿入。既に存在すれば false。
    ///
    /// 容量いっぱいまで挿入すると探査が終わらないため、呼び出し側は
    /// 件数を容量未満に保つこと（外挿では高々 n! 件）。
    pub fn insert(&mut self, key: &BigUint) -> bool {
        debug_assert!(self.count < self.slots.len());
        let cap = self.slots.len();
        let mut idx = self.home(key);
        let mut stride = 0;
        while self.occupied[idx] {
            if self.slots[idx] == *key {
                return false;
            }
            if stride == 0 {
                stride = self.stride(key);
            }
            idx = (idx + stride) % cap;
        }
        self.slots[idx].clone_from(key);
        self.occupied[idx] = true;
        self.count += 1;
        true
    }

    pub fn contains(&self, key: &BigUint) -> bool {
        let cap = self.slots.len();
        let mut idx = self.home(key);
        let mut stride = 0;
        let mut probes = 0;
        while self.occupied[idx] && probes < cap {
            if self.slots[idx] == *key {
                return true;
            }
            if stride == 0 {
                stride = self.stride(key);
            }
            idx = (idx + stride) % cap;
            probes += 1;
        }
        false
    }

    /// 全スロットを空にする（確保した多倍長の領域は再利用する）
    pub fn clear(&mut self) {
        self.occupied.iter_mut().for_each(|o| *o = false);
        self.count = 0;
    }
}
