//! # Motion
//!
//! 无界面宿主 - 用 JSON 页面描述和输入脚本驱动动效引擎。
//!
//! ## 用法
//!
//! ```bash
//! # 按输入脚本运行，输出每一步的样式变更
//! motion run --page page.json --events events.json
//! motion run --page page.json --events events.json --config motion.json --json
//!
//! # 降级模式预览：所有一次性效果立即触发，按固定帧推进
//! motion preview --page page.json --until-ms 3000 --frame-ms 16
//!
//! # 检查声明
//! motion check --page page.json --strict
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use motion_cli::{HostMode, Session, Transcript, load_config, load_events, load_page};
use tracing::Level;

#[derive(Parser)]
#[command(name = "motion")]
#[command(about = "无界面宿主 - 驱动动效引擎并输出样式变更")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 日志详细程度（-v info，-vv debug，-vvv trace）
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// 按输入脚本运行
    Run {
        /// 页面描述文件
        #[arg(short, long)]
        page: PathBuf,

        /// 输入脚本（EngineInput 数组）
        #[arg(short, long)]
        events: PathBuf,

        /// 引擎配置文件
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// 以 JSON 输出记录
        #[arg(long)]
        json: bool,

        /// 脚本结束后关闭引擎
        #[arg(long)]
        shutdown: bool,
    },

    /// 降级模式预览
    Preview {
        /// 页面描述文件
        #[arg(short, long)]
        page: PathBuf,

        /// 引擎配置文件
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// 推进到的时间（毫秒）
        #[arg(long, default_value = "3000")]
        until_ms: f64,

        /// 帧间隔（毫秒）
        #[arg(long, default_value = "16")]
        frame_ms: f64,

        /// 以 JSON 输出记录
        #[arg(long)]
        json: bool,
    },

    /// 检查页面声明
    Check {
        /// 页面描述文件
        #[arg(short, long)]
        page: PathBuf,

        /// 引擎配置文件
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// 有警告时以失败退出
        #[arg(long)]
        strict: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Run {
            page,
            events,
            config,
            json,
            shutdown,
        } => run(&page, &events, config.as_deref(), json, shutdown),
        Commands::Preview {
            page,
            config,
            until_ms,
            frame_ms,
            json,
        } => preview(&page, config.as_deref(), until_ms, frame_ms, json),
        Commands::Check {
            page,
            config,
            strict,
        } => check(&page, config.as_deref(), strict),
    };

    if let Err(e) = result {
        eprintln!("❌ {:#}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("日志初始化失败: {}", e);
    }
}

/// 按输入脚本运行
fn run(
    page: &Path,
    events: &Path,
    config: Option<&Path>,
    json: bool,
    shutdown: bool,
) -> anyhow::Result<()> {
    let document = load_page(page)?;
    let inputs = load_events(events)?;
    let config = load_config(config);

    let mut session = Session::start(&document, config, HostMode::Observed);
    session.feed_all(inputs);
    print_transcript(&session.finish(shutdown), json)
}

/// 降级模式预览
fn preview(
    page: &Path,
    config: Option<&Path>,
    until_ms: f64,
    frame_ms: f64,
    json: bool,
) -> anyhow::Result<()> {
    anyhow::ensure!(
        frame_ms.is_finite() && frame_ms > 0.0,
        "帧间隔必须为正数: {}",
        frame_ms
    );
    anyhow::ensure!(
        until_ms.is_finite() && until_ms >= 0.0,
        "结束时间必须为非负数: {}",
        until_ms
    );

    let document = load_page(page)?;
    let config = load_config(config);

    let mut session = Session::start(&document, config, HostMode::Degraded);
    session.play(until_ms, frame_ms);
    print_transcript(&session.finish(false), json)
}

/// 检查页面声明
fn check(page: &Path, config: Option<&Path>, strict: bool) -> anyhow::Result<()> {
    let document = load_page(page)?;
    let config = load_config(config);

    let session = Session::start(&document, config, HostMode::Observed);
    let report = session.report().clone();

    println!("📋 页面: {}", page.display());
    println!("   元素数: {}", document.elements.len());
    println!("   效果数: {}", report.effect_count());
    println!(
        "   入场 {} / 分组 {} / 计数 {} / 打字 {} / 形变 {} / 视差 {} / 价格 {} / 交互 {}",
        report.entrances,
        report.stagger_groups,
        report.counters,
        report.typewriters,
        report.morphs,
        report.parallax,
        report.prices,
        report.hovers
    );
    println!("   观察注册: {}", report.registrations);
    if report.missing > 0 {
        println!("   缺失元素: {}", report.missing);
    }

    if report.warnings.is_empty() {
        println!("✅ 没有警告");
        return Ok(());
    }

    println!("⚠️  警告 {} 条:", report.warnings.len());
    for warning in &report.warnings {
        println!("   - {}", warning);
    }
    if strict {
        report.into_result().context("声明检查未通过")?;
    }
    Ok(())
}

fn print_transcript(transcript: &Transcript, json: bool) -> anyhow::Result<()> {
    if json {
        let output = serde_json::to_string_pretty(transcript).context("记录序列化失败")?;
        println!("{}", output);
    } else {
        print!("{}", transcript);
    }
    Ok(())
}
