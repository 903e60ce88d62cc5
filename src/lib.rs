//! 巡回グレイコードの数え上げ
//!
//! n 桁の巡回グレイコード（2^n 頂点をちょうど一度ずつ通り出発点に戻る
//! 1ビット反転の列）を、回転と桁の付け替えによる同値類ごとに扱う。
//!
//! 1. 正規形の接頭辞で探索空間を5つに分割し、各分割でバックトラック探索により
//!    同値類の代表（シード）を列挙する。
//! 2. 各シードの全置換像を回転まで含めて多倍長の系列番号で重複排除し、
//!    同値類の大きさを求めて合計する。

pub mod bigint_table;
pub mod canonical;
pub mod config;
pub mod count;
pub mod enumerator;
pub mod error;
pub mod exhaustive;
pub mod extrapolate;
pub mod filter;
pub mod partition;
pub mod permutation;
pub mod seq_table;
pub mod sequence;
pub mod skeleton;
pub mod tables;

pub use bigint_table::BigIntTable;
pub use canonical::{seed_partition, CanonicalCheck};
pub use config::{validate_digits, SearchConfig, DEFAULT_EXTRAPOLATION_WORKERS, MAX_DIGITS, MIN_DIGITS};
pub use count::{count_codes, count_codes_with_progress, extrapolate_seeds, search_seeds, CountResult, PartitionSummary};
pub use enumerator::{enumerate_partition, Backtracker, PartitionResult, WalkStats};
pub use error::ChimeraError;
pub use exhaustive::{count_exhaustive, membership_seeds, ExhaustiveResult, MembershipResult};
pub use extrapolate::{distinct_rotations, halving_milestones, orbit_size_naive, Extrapolator, RotationMultipliers};
pub use partition::{Partition, ReducedQueue};
pub use permutation::{factorial, swap_queue, PermutationQueues};
pub use seq_table::SequenceTable;
pub use sequence::{mask_of, sequence_len, step_of, Sequence, Step, StepMask};
pub use skeleton::Skeleton;
pub use tables::SharedTables;
