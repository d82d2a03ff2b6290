//! # Anim Demo
//!
//! 无界面演示驱动：以固定帧率推进动画调度器，结束后输出精灵状态（JSON）。
//!
//! ## 用法
//!
//! ```bash
//! cargo run -p anim-cli
//! cargo run -p anim-cli -- --scenario chain --fps 30
//! cargo run -p anim-cli -- --config demo.json --frames 120 -v
//! RUST_LOG=anim_runtime=debug cargo run -p anim-cli -- --scenario orbit
//! ```

mod config;
mod scenario;

use std::path::PathBuf;

use anim_runtime::{AnimationScheduler, SpriteData};
use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::DemoConfig;
use scenario::Scenario;

#[derive(Parser)]
#[command(name = "animdemo")]
#[command(about = "无界面动画演示 - 推进调度器并输出精灵最终状态")]
#[command(version)]
struct Cli {
    /// 配置文件路径（JSON）
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 演示场景
    #[arg(short, long, value_enum, default_value_t = Scenario::Slide)]
    scenario: Scenario,

    /// 模拟帧率（覆盖配置文件）
    #[arg(long)]
    fps: Option<f32>,

    /// 最多推进的帧数（覆盖配置文件）
    #[arg(long)]
    frames: Option<u32>,

    /// 输出调试日志
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => DemoConfig::load(path)?,
        None => DemoConfig::default(),
    };
    config.apply_overrides(cli.fps, cli.frames);
    config.validate().context("配置无效")?;

    let mut scheduler = AnimationScheduler::with_config(config.scheduler.clone())?;
    let sprites = cli
        .scenario
        .build(&mut scheduler)
        .with_context(|| format!("构建场景 {:?} 失败", cli.scenario))?;
    info!(scenario = ?cli.scenario, sprites = sprites.len(), fps = config.fps, "场景已就绪");

    let dt = config.frame_dt();
    let mut frames_run = 0;
    for frame in 0..config.frames {
        let events = scheduler
            .advance(dt)
            .with_context(|| format!("第 {} 帧推进失败", frame))?;
        frames_run = frame + 1;

        for event in &events {
            info!(frame, event = %event, "动画事件");
        }
        if !scheduler.has_active_animations() {
            info!(frame, "所有动画已结束");
            break;
        }
    }

    if scheduler.has_active_animations() {
        info!(
            remaining = scheduler.active_count(),
            "达到帧数上限，仍有动画未结束"
        );
    }
    info!(frames = frames_run, "演示结束");

    let snapshots: Vec<SpriteData> = sprites.iter().map(|s| s.snapshot()).collect();
    println!("{}", serde_json::to_string_pretty(&snapshots)?);

    Ok(())
}
