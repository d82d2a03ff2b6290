//! # Error 模块
//!
//! 定义 anim-runtime 中使用的错误类型。

use thiserror::Error;

use crate::property::Property;
use crate::traits::SpriteId;
use crate::value::ValueKind;

/// 动画调度错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimError {
    /// 同一精灵的同一属性已有动画在进行
    #[error("{sprite} 的属性 '{property}' 已有动画在进行")]
    DuplicateProperty { sprite: SpriteId, property: Property },

    /// 动画时长无效（必须为有限正数）
    #[error("无效的动画时长 {duration}，必须为有限正数")]
    InvalidDuration { duration: f32 },

    /// 相对模式下值不支持加法合成
    #[error("{sprite} 的属性 '{property}' 不支持相对合成：{lhs} + {rhs}")]
    UnsupportedOperation {
        sprite: SpriteId,
        property: Property,
        lhs: ValueKind,
        rhs: ValueKind,
    },

    /// 精灵未注册
    #[error("{sprite} 未注册")]
    UnknownSprite { sprite: SpriteId },

    /// 精灵不支持该属性
    #[error("{sprite} 不支持属性 '{property}'")]
    UnknownProperty { sprite: SpriteId, property: Property },

    /// 帧间隔无效（负数或 NaN）
    #[error("无效的帧间隔 {dt}")]
    InvalidDelta { dt: f32 },

    /// 在完成回调中重入 advance
    #[error("不允许在完成回调中调用 advance")]
    ReentrantAdvance,
}

/// Result 类型别名
pub type AnimResult<T> = Result<T, AnimError>;

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO 错误
    #[error("配置 IO 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 解析失败
    #[error("配置解析失败: {0}")]
    Parse(#[source] serde_json::Error),

    /// 序列化失败
    #[error("配置序列化失败: {0}")]
    Serialize(#[source] serde_json::Error),

    /// 验证失败
    #[error("配置验证失败: {0}")]
    Validation(String),
}
