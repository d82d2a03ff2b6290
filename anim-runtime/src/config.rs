//! # Config 模块
//!
//! 调度器配置。
//!
//! ## 配置优先级
//!
//! 1. 宿主代码显式设置（最高）
//! 2. 配置文件（JSON）
//! 3. 默认值（最低）

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::error::ConfigError;

/// 调度器配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// 全局时间缩放，每帧的 dt 先乘以此值
    #[serde(default = "default_time_scale")]
    pub time_scale: f32,

    /// 单帧最大步长（秒）
    ///
    /// 用于吸收卡顿造成的超长帧；未设置时不限制。
    #[serde(default)]
    pub max_step: Option<f32>,
}

fn default_time_scale() -> f32 {
    1.0
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            time_scale: default_time_scale(),
            max_step: None,
        }
    }
}

impl SchedulerConfig {
    /// 加载配置文件
    ///
    /// 文件不存在、解析失败或验证失败时返回默认配置并记录警告。
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            warn!(path = ?path, "配置文件不存在，使用默认配置");
            return Self::default();
        }

        match Self::load_strict(path) {
            Ok(config) => {
                info!(path = ?path, "配置文件加载成功");
                config
            }
            Err(e) => {
                warn!(path = ?path, error = %e, "配置文件加载失败，使用默认配置");
                Self::default()
            }
        }
    }

    /// 加载并验证配置文件，失败时返回错误
    pub fn load_strict(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// 保存配置到文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.time_scale.is_finite() || self.time_scale <= 0.0 {
            return Err(ConfigError::Validation(format!(
                "time_scale 必须为有限正数，实际为 {}",
                self.time_scale
            )));
        }

        if let Some(max_step) = self.max_step {
            if !max_step.is_finite() || max_step <= 0.0 {
                return Err(ConfigError::Validation(format!(
                    "max_step 必须为有限正数，实际为 {}",
                    max_step
                )));
            }
        }

        Ok(())
    }

    /// 把宿主传入的帧间隔换算为调度器实际推进的时间
    pub fn effective_dt(&self, dt: f32) -> f32 {
        let scaled = dt * self.time_scale;
        match self.max_step {
            Some(max_step) => scaled.min(max_step),
            None => scaled,
        }
    }
}
