//! # Event 模块
//!
//! 调度器产生的动画生命周期事件，在每次 `advance` 返回时一并取出。

use crate::instance::AnimationId;
use crate::property::Property;
use crate::traits::SpriteId;

/// 动画事件
#[derive(Debug, Clone, PartialEq)]
pub enum AnimationEvent {
    /// 动画已注册
    Started {
        id: AnimationId,
        sprite: SpriteId,
        property: Property,
    },
    /// 动画正常完成（最终值已写入）
    Completed {
        id: AnimationId,
        sprite: SpriteId,
        property: Property,
    },
    /// 动画被取消（精灵移除、显式取消或清空），不触发完成回调
    Cancelled {
        id: AnimationId,
        sprite: SpriteId,
        property: Property,
    },
}

impl AnimationEvent {
    /// 事件对应的动画 ID
    pub fn id(&self) -> AnimationId {
        match self {
            Self::Started { id, .. } | Self::Completed { id, .. } | Self::Cancelled { id, .. } => {
                *id
            }
        }
    }

    /// 事件对应的精灵
    pub fn sprite(&self) -> SpriteId {
        match self {
            Self::Started { sprite, .. }
            | Self::Completed { sprite, .. }
            | Self::Cancelled { sprite, .. } => *sprite,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

impl std::fmt::Display for AnimationEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (label, id, sprite, property) = match self {
            Self::Started {
                id,
                sprite,
                property,
            } => ("started", id, sprite, property),
            Self::Completed {
                id,
                sprite,
                property,
            } => ("completed", id, sprite, property),
            Self::Cancelled {
                id,
                sprite,
                property,
            } => ("cancelled", id, sprite, property),
        };
        write!(f, "{} #{} sprite={} {}", label, id.0, sprite.value(), property)
    }
}
