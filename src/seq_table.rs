use crate::sequence::Step;

/// 既定の初期容量指数（2^16 スロット）
pub const DEFAULT_EXPONENT: u32 = 16;

/// 固定長ステップ列をキーとする開番地法ハッシュ集合。
///
/// 容量は 2 の冪。挿入前に負荷率が 1/3 を超えていれば容量を 8 倍にして
/// 再配置する。刻み幅は常に奇数なので 2 の冪の容量と互いに素。
#[derive(Debug, Clone)]
pub struct SequenceTable {
    key_len: usize,
    mask: usize,
    keys: Vec<Step>,
    occupied: Vec<bool>,
    count: usize,
}

impl SequenceTable {
    /// 容量 2^exponent で作る（exponent は 1 以上に丸める）
    pub fn with_exponent(key_len: usize, exponent: u32) -> Self {
        let capacity = 1usize << exponent.max(1);
        SequenceTable {
            key_len,
            mask: capacity - 1,
            keys: vec![0; capacity * key_len],
            occupied: vec![false; capacity],
            count: 0,
        }
    }

    pub fn new(key_len: usize) -> Self {
        Self::with_exponent(key_len, DEFAULT_EXPONENT)
    }

    pub fn capacity(&self) -> usize {
        self.occupied.len()
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn key_len(&self) -> usize {
        self.key_len
    }

    #[inline]
    fn home(&self, key: &[Step]) -> usize {
        key.iter()
            .fold(0usize, |h, &s| (h.wrapping_mul(5).wrapping_add(s as usize)) & self.mask)
    }

    #[inline]
    fn stride(&self, key: &[Step]) -> usize {
        let half_mask = self.mask >> 1;
        let h = key[key.len() / 2..]
            .iter()
            .fold(0usize, |h, &s| (h.wrapping_mul(7).wrapping_add(s as usize)) & half_mask);
        h + 1 + (h & 1)
    }

    #[inline]
    fn slot(&self, idx: usize) -> &[Step] {
        &self.keys[idx * self.key_len..(idx + 1) * self.key_len]
    }

    /// キーのスロット位置。存在すれば Ok、なければ挿入先の空き位置を Err で返す。
    fn probe(&self, key: &[Step]) -> Result<usize, usize> {
        debug_assert_eq!(key.len(), self.key_len);
        let mut idx = self.home(key);
        let mut stride = 0;
        while self.occupied[idx] {
            if self.slot(idx) == key {
                return Ok(idx);
            }
            if stride == 0 {
                stride = self.stride(key);
            }
            idx = (idx + stride) & self.mask;
        }
        Err(idx)
    }

    pub fn contains(&self, key: &[Step]) -> bool {
        self.probe(key).is_ok()
    }

    /// 重複を確認せずに挿入する（キーが未登録であることは呼び出し側が保証する）
    pub fn insert(&mut self, key: &[Step]) {
        self.grow_if_needed();
        let mut idx = self.home(key);
        let mut stride = 0;
        while self.occupied[idx] {
            if stride == 0 {
                stride = self.stride(key);
            }
            idx = (idx + stride) & self.mask;
        }
        self.place(idx, key);
    }

    /// 未登録なら挿入して true
    pub fn insert_if_absent(&mut self, key: &[Step]) -> bool {
        self.grow_if_needed();
        match self.probe(key) {
            Ok(_) => false,
            Err(idx) => {
                self.place(idx, key);
                true
            }
        }
    }

    fn place(&mut self, idx: usize, key: &[Step]) {
        let start = idx * self.key_len;
        self.keys[start..start + self.key_len].copy_from_slice(key);
        self.occupied[idx] = true;
        self.count += 1;
    }

    fn grow_if_needed(&mut self) {
        if self.count * 3 <= self.capacity() {
            return;
        }
        let new_capacity = self.capacity() * 8;
        tracing::debug!(
            from = self.capacity(),
            to = new_capacity,
            entries = self.count,
            "sequence table resize"
        );
        let old_keys = std::mem::replace(&mut self.keys, vec![0; new_capacity * self.key_len]);
        let old_occupied = std::mem::replace(&mut self.occupied, vec![false; new_capacity]);
        self.mask = new_capacity - 1;
        self.count = 0;
        for (idx, &used) in old_occupied.iter().enumerate() {
            if !used {
                continue;
            }
            let key = &old_keys[idx * self.key_len..(idx + 1) * self.key_len];
            let mut pos = self.home(key);
            let mut stride = 0;
            while self.occupied[pos] {
                if stride == 0 {
                    stride = self.stride(key);
                }
                pos = (pos + stride) & self.mask;
            }
            self.place(pos, key);
        }
    }
}
