use thiserror::Error;

/// 設定・入力の検証エラー
#[derive(Debug, Error)]
pub enum ChimeraError {
    #[error("桁数 {digits} は対応範囲 {min}..={max} の外です")]
    DigitsOutOfRange { digits: usize, min: usize, max: usize },

    #[error("外挿ワーカー数は 1 以上が必要です")]
    NoWorkers,

    #[error("スレッド数は 1 以上が必要です")]
    NoThreads,

    #[error("不正なステップ `{token}` ({digits} 桁)")]
    InvalidStep { token: String, digits: usize },

    #[error("ステップ数 {found} は {expected} であるべきです")]
    SequenceLength { found: usize, expected: usize },

    #[error("スレッドプールの構築に失敗: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
