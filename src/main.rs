use std::fs::File;
use std::io::Write as IoWrite;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use gray_chimera::*;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "gray-chimera", version, about = "巡回グレイコードの数え上げ（分割シード探索 + 置換外挿）")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// シードを探索し、外挿で巡回グレイコードの総数を求める
    Count {
        /// 桁数 n
        digits: usize,
        /// 探索と外挿の所要時間を表示する
        #[arg(long)]
        timing: bool,
        /// 外挿ワーカー数
        #[arg(long, default_value_t = DEFAULT_EXTRAPOLATION_WORKERS)]
        workers: usize,
        /// rayon のスレッド数（省略時は全コア）
        #[arg(long)]
        threads: Option<usize>,
        /// 完成後の末尾3ステップ飛ばしを無効にする
        #[arg(long)]
        no_tail_skip: bool,
        /// 外挿の早期終了を無効にする（全置換を調べる）
        #[arg(long)]
        no_early_exit: bool,
        /// 結果を output/ に保存する
        #[arg(long)]
        save: bool,
    },
    /// シードを列挙して表示する
    Seeds {
        digits: usize,
        /// 表示するシード数の上限
        #[arg(long)]
        limit: Option<usize>,
        /// 各シードの同値類の大きさも表示する
        #[arg(long)]
        orbits: bool,
    },
    /// 反射二進グレイコード（探索の補完列）を表示する
    Skeleton { digits: usize },
    /// 分割を使わずに全数を数える（検証用）
    Exhaustive {
        digits: usize,
        /// 表引きによるシード探索も行う（n = 4 向け）
        #[arg(long)]
        membership: bool,
    },
    /// 与えた列を検査する
    Check {
        digits: usize,
        /// "0,1,0,2,..." 形式のステップ列
        sequence: String,
    },
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Count {
            digits,
            timing,
            workers,
            threads,
            no_tail_skip,
            no_early_exit,
            save,
        } => {
            let config = SearchConfig::new(digits)
                .with_timing(timing)
                .with_extrapolation_workers(workers)
                .with_threads(threads)
                .with_forced_tail_skip(!no_tail_skip)
                .with_early_exit(!no_early_exit);
            cmd_count(&config, save)
        }
        Command::Seeds { digits, limit, orbits } => cmd_seeds(digits, limit, orbits),
        Command::Skeleton { digits } => cmd_skeleton(digits),
        Command::Exhaustive { digits, membership } => cmd_exhaustive(digits, membership),
        Command::Check { digits, sequence } => cmd_check(digits, &sequence),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("エラー: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn output_dir() -> PathBuf {
    let dir = PathBuf::from("output");
    std::fs::create_dir_all(&dir).ok();
    dir
}

fn timestamp() -> String {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let s = now % 60;
    let m = (now / 60) % 60;
    let h = (now / 3600) % 24;
    let days = now / 86400;
    let y = 1970 + days / 365;
    let d = days % 365;
    format!("{:04}{:03}_{:02}{:02}{:02}", y, d, h, m, s)
}

fn format_eta(seconds: f64) -> String {
    if seconds > 3600.0 {
        format!("{:.1}h", seconds / 3600.0)
    } else if seconds > 60.0 {
        format!("{:.0}m{:.0}s", seconds / 60.0, seconds % 60.0)
    } else {
        format!("{:.0}s", seconds)
    }
}

fn cmd_count(config: &SearchConfig, save: bool) -> Result<(), ChimeraError> {
    config.validate()?;
    let threads = config.threads.unwrap_or_else(rayon::current_num_threads);
    println!("巡回グレイコード数え上げ: n = {}, L = {}", config.digits, sequence_len(config.digits));
    println!(
        "(5分割並列探索、外挿 {} ワーカー、{} スレッド)",
        config.extrapolation_workers, threads
    );
    println!();

    let timer = Instant::now();
    let last_print = Mutex::new(Instant::now());
    let result = count_codes_with_progress(config, |done, total| {
        let now = Instant::now();
        if let Ok(mut lp) = last_print.try_lock() {
            if now.duration_since(*lp).as_millis() >= 500 || done == total {
                let elapsed = timer.elapsed();
                let pct = done as f64 / total as f64 * 100.0;
                let rate = done as f64 / elapsed.as_secs_f64();
                let remaining = if done > 0 && rate > 0.0 {
                    format_eta((total - done) as f64 / rate)
                } else {
                    "---".to_string()
                };
                eprint!(
                    "\x1b[2K\r  外挿 [{:.1}s] {}/{} ({:.1}%) | {:.0} seeds/s | 残り約{}",
                    elapsed.as_secs_f64(),
                    done,
                    total,
                    pct,
                    rate,
                    remaining
                );
                *lp = now;
            }
        }
    })?;
    eprintln!();

    println!("--- 分割ごとのシード ---");
    for p in &result.partitions {
        if config.timing {
            println!(
                "  {:<6} シード {:>10}  完成列 {:>12}  ({})",
                p.partition.label(),
                p.seeds,
                p.complete,
                format_duration(p.elapsed)
            );
        } else {
            println!("  {:<6} シード {:>10}  完成列 {:>12}", p.partition.label(), p.seeds, p.complete);
        }
    }
    println!();
    println!("--- 結果 ---");
    println!("シード総数          = {}", result.seed_count());
    println!("巡回グレイコード数  = {}", result.total_codes);
    println!("概算上限            = {:.6e}", result.upper_bound_estimate());
    if let Some(ratio) = result.estimate_ratio() {
        println!("概算上限 / 総数     = {:.4}", ratio);
    }
    if config.timing {
        println!("探索時間            = {}", format_duration(result.search_elapsed));
        println!("外挿時間            = {}", format_duration(result.extrapolation_elapsed));
        println!("合計時間            = {}", format_duration(timer.elapsed()));
    }

    if save {
        let filename = format!("count_n{}_{}.txt", config.digits, timestamp());
        let path = output_dir().join(&filename);
        if let Ok(mut f) = File::create(&path) {
            writeln!(f, "# gray-chimera count").ok();
            writeln!(f, "digits = {}", config.digits).ok();
            writeln!(f, "workers = {}", config.extrapolation_workers).ok();
            writeln!(f, "threads = {}", threads).ok();
            writeln!(f, "skip_forced_tail = {}", config.skip_forced_tail).ok();
            writeln!(f, "early_exit = {}", config.early_exit).ok();
            for p in &result.partitions {
                writeln!(f, "partition_{} = {}", p.partition.label(), p.seeds).ok();
            }
            writeln!(f, "seeds = {}", result.seed_count()).ok();
            writeln!(f, "total_codes = {}", result.total_codes).ok();
            writeln!(f, "search_elapsed = {:?}", result.search_elapsed).ok();
            writeln!(f, "extrapolation_elapsed = {:?}", result.extrapolation_elapsed).ok();
            writeln!(f).ok();
            writeln!(f, "# seeds").ok();
            for seed in &result.seeds {
                writeln!(f, "{}", seed).ok();
            }
            println!("\n保存: {}", path.display());
        }
    }
    Ok(())
}

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs >= 60.0 {
        format!("{:.0}m{:.1}s", (secs / 60.0).floor(), secs % 60.0)
    } else if secs >= 1.0 {
        format!("{:.3}s", secs)
    } else {
        format!("{:.3}ms", secs * 1000.0)
    }
}

fn format_signature(signature: &[usize]) -> String {
    signature
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn cmd_seeds(digits: usize, limit: Option<usize>, orbits: bool) -> Result<(), ChimeraError> {
    validate_digits(digits)?;
    let tables = SharedTables::new(digits);
    let results = search_seeds(&tables, true);
    let mut extrapolator = Extrapolator::new(&tables, true);
    let limit = limit.unwrap_or(usize::MAX);

    let mut shown = 0usize;
    for r in &results {
        println!("# {} ({} シード)", r.partition.label(), r.seeds.len());
        for seed in &r.seeds {
            if shown >= limit {
                break;
            }
            if orbits {
                println!(
                    "{}  [{}]  {}",
                    seed,
                    format_signature(&seed.signature()),
                    extrapolator.contribution(seed)
                );
            } else {
                println!("{}  [{}]", seed, format_signature(&seed.signature()));
            }
            shown += 1;
        }
    }
    let total: usize = results.iter().map(|r| r.seeds.len()).sum();
    println!("シード総数 = {}", total);
    Ok(())
}

fn cmd_skeleton(digits: usize) -> Result<(), ChimeraError> {
    validate_digits(digits)?;
    let skeleton = Skeleton::new(digits);
    let seq = Sequence::from_masks(digits, skeleton.masks());
    println!("{}", seq);
    println!("系列番号 = {}", seq.number());
    Ok(())
}

fn cmd_exhaustive(digits: usize, membership: bool) -> Result<(), ChimeraError> {
    validate_digits(digits)?;
    let tables = SharedTables::new(digits);
    let timer = Instant::now();

    let result = count_exhaustive(&tables, true);
    println!("--- 全数探索 (1ステップ目 = 0) ---");
    for &(second, count) in &result.per_second_step {
        println!("  0,{} で始まる列 = {}", second, count);
    }
    println!("1ステップ目固定    = {}", result.fixed_first_step);
    println!("巡回グレイコード数 = {}", result.total);
    println!("計算時間           = {}", format_duration(timer.elapsed()));

    if membership {
        if digits > MIN_DIGITS {
            tracing::warn!(digits, "membership search keeps every image in memory");
        }
        let timer = Instant::now();
        let m = membership_seeds(&tables);
        println!();
        println!("--- 表引きシード探索 ---");
        for (seed, size) in m.seeds.iter().zip(&m.orbit_sizes) {
            println!("{}  [{}]  {}", seed, format_signature(&seed.signature()), size);
        }
        println!("シード総数         = {}", m.seeds.len());
        println!("巡回グレイコード数 = {}", m.total);
        println!("計算時間           = {}", format_duration(timer.elapsed()));
    }
    Ok(())
}

fn cmd_check(digits: usize, text: &str) -> Result<(), ChimeraError> {
    validate_digits(digits)?;
    let seq = Sequence::parse(digits, text)?;
    let tables = SharedTables::new(digits);

    println!("列                 = {}", seq);
    println!("巡回グレイコード   = {}", if seq.is_cyclic_gray_code() { "はい" } else { "いいえ" });
    println!("系列番号           = {}", seq.number());
    println!("前後半対称         = {}", if seq.is_half_symmetric() { "はい" } else { "いいえ" });
    println!("桁の出現数         = [{}]", format_signature(&seq.signature()));
    if !seq.is_cyclic_gray_code() {
        return Ok(());
    }
    match seed_partition(&seq, &tables.queues) {
        Some(p) => println!("シード             = はい (分割 {})", p),
        None => println!("シード             = いいえ"),
    }
    let mut extrapolator = Extrapolator::new(&tables, true);
    println!("同値類の大きさ     = {}", extrapolator.contribution(&seq));
    Ok(())
}
