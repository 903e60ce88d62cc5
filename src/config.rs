use crate::error::ChimeraError;

/// 対応する最小桁数（分割表が 4 桁の接頭辞を前提とする）
pub const MIN_DIGITS: usize = 4;
/// 対応する最大桁数（値域 2^n のフラグ配列と u16 マスクの範囲）
pub const MAX_DIGITS: usize = 8;
/// 外挿フェーズの既定ワーカー数
pub const DEFAULT_EXTRAPOLATION_WORKERS: usize = 4;

/// 探索・外挿の実行設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// 桁数 n
    pub digits: usize,
    /// 計時を報告するか
    pub timing: bool,
    /// 外挿でシードを分配するワーカー数
    pub extrapolation_workers: usize,
    /// rayon のスレッド数（None ならグローバルプール）
    pub threads: Option<usize>,
    /// 完全列の後に末尾 3 ステップを飛ばして戻る
    pub skip_forced_tail: bool,
    /// 半減マイルストーンによる外挿の早期終了
    pub early_exit: bool,
}

impl SearchConfig {
    pub fn new(digits: usize) -> Self {
        SearchConfig {
            digits,
            timing: false,
            extrapolation_workers: DEFAULT_EXTRAPOLATION_WORKERS,
            threads: None,
            skip_forced_tail: true,
            early_exit: true,
        }
    }

    pub fn with_timing(mut self, timing: bool) -> Self {
        self.timing = timing;
        self
    }

    pub fn with_extrapolation_workers(mut self, workers: usize) -> Self {
        self.extrapolation_workers = workers;
        self
    }

    pub fn with_threads(mut self, threads: Option<usize>) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_forced_tail_skip(mut self, skip: bool) -> Self {
        self.skip_forced_tail = skip;
        self
    }

    pub fn with_early_exit(mut self, early_exit: bool) -> Self {
        self.early_exit = early_exit;
        self
    }

    pub fn validate(&self) -> Result<(), ChimeraError> {
        validate_digits(self.digits)?;
        if self.extrapolation_workers == 0 {
            return Err(ChimeraError::NoWorkers);
        }
        if self.threads == Some(0) {
            return Err(ChimeraError::NoThreads);
        }
        Ok(())
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig::new(MIN_DIGITS)
    }
}

/// 桁数が対応範囲内か
pub fn validate_digits(digits: usize) -> Result<(), ChimeraError> {
    if (MIN_DIGITS..=MAX_DIGITS).contains(&digits) {
        Ok(())
    } else {
        Err(ChimeraError::DigitsOutOfRange {
            digits,
            min: MIN_DIGITS,
            max: MAX_DIGITS,
        })
    }
}
