//! # Config 模块
//!
//! 演示驱动的配置。
//!
//! ## 配置优先级
//!
//! 1. 命令行参数（最高）
//! 2. 配置文件 (JSON)
//! 3. 默认值（最低）

use std::fs;
use std::path::Path;

use anim_runtime::SchedulerConfig;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

/// 演示配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemoConfig {
    /// 调度器配置
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// 模拟帧率
    #[serde(default = "default_fps")]
    pub fps: f32,

    /// 最多推进的帧数
    #[serde(default = "default_frames")]
    pub frames: u32,
}

fn default_fps() -> f32 {
    60.0
}

fn default_frames() -> u32 {
    600
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            scheduler: SchedulerConfig::default(),
            fps: default_fps(),
            frames: default_frames(),
        }
    }
}

impl DemoConfig {
    /// 读取配置文件
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).with_context(|| format!("读取配置文件失败: {:?}", path))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("解析配置文件失败: {:?}", path))?;
        Ok(config)
    }

    /// 用命令行参数覆盖
    pub fn apply_overrides(&mut self, fps: Option<f32>, frames: Option<u32>) {
        if let Some(fps) = fps {
            self.fps = fps;
        }
        if let Some(frames) = frames {
            self.frames = frames;
        }
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<()> {
        if !self.fps.is_finite() || self.fps <= 0.0 {
            bail!("fps 必须为有限正数，实际为 {}", self.fps);
        }
        self.scheduler.validate()?;
        Ok(())
    }

    /// 每帧间隔（秒）
    pub fn frame_dt(&self) -> f32 {
        1.0 / self.fps
    }
}
