//! # Instance 模块
//!
//! 动画实例：把一份 `AnimationSpec` 绑定到某个精灵上的可变状态。
//!
//! 实例只关注时间轴：累计已过时间、计算当前值、判断是否完成。
//! 写入属性与派发回调由调度器负责。

use std::rc::Rc;

use crate::error::{AnimError, AnimResult};
use crate::property::Property;
use crate::scheduler::AnimationScheduler;
use crate::spec::AnimationSpec;
use crate::traits::SpriteId;
use crate::value::Value;

/// 动画 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimationId(pub u64);

impl AnimationId {
    /// 创建新的动画 ID
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for AnimationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AnimationId({})", self.0)
    }
}

/// 完成回调
///
/// 回调拿到调度器的可变引用，可以在其中注册后续动画。
pub type OnComplete = Box<dyn FnOnce(&mut AnimationScheduler)>;

/// 动画实例
pub struct AnimationInstance {
    /// 动画 ID
    pub id: AnimationId,
    /// 所属精灵
    sprite: SpriteId,
    spec: Rc<AnimationSpec>,
    /// 已经过的时间（未截断）
    elapsed: f32,
    /// 注册时的属性快照（仅相对模式）
    start_value: Option<Value>,
    on_complete: Option<OnComplete>,
}

impl std::fmt::Debug for AnimationInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationInstance")
            .field("id", &self.id)
            .field("sprite", &self.sprite)
            .field("spec", &self.spec)
            .field("elapsed", &self.elapsed)
            .field("start_value", &self.start_value)
            .field("has_callback", &self.on_complete.is_some())
            .finish()
    }
}

impl AnimationInstance {
    /// 创建新的实例
    ///
    /// 相对模式必须传入 `start_value`，绝对模式传入的快照会被忽略。
    pub fn new(
        id: AnimationId,
        sprite: SpriteId,
        spec: Rc<AnimationSpec>,
        start_value: Option<Value>,
        on_complete: Option<OnComplete>,
    ) -> Self {
        let start_value = if spec.is_absolute() { None } else { start_value };
        Self {
            id,
            sprite,
            spec,
            elapsed: 0.0,
            start_value,
            on_complete,
        }
    }

    pub fn sprite(&self) -> SpriteId {
        self.sprite
    }

    pub fn spec(&self) -> &Rc<AnimationSpec> {
        &self.spec
    }

    pub fn property(&self) -> Property {
        self.spec.property()
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn start_value(&self) -> Option<&Value> {
        self.start_value.as_ref()
    }

    pub fn has_callback(&self) -> bool {
        self.on_complete.is_some()
    }

    /// 累计时间
    pub fn advance(&mut self, dt: f32) {
        self.elapsed += dt;
    }

    /// 跳到终点（下一次 advance 时完成）
    pub fn fast_forward(&mut self) {
        self.elapsed = self.elapsed.max(self.spec.duration());
    }

    /// 当前进度（0.0 - 1.0）
    pub fn progress(&self) -> f32 {
        let duration = self.spec.duration();
        self.elapsed.min(duration) / duration
    }

    /// 是否已完成
    ///
    /// 使用未截断的时间判断，恰好到达时长的那一帧即完成。
    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.spec.duration()
    }

    /// 计算当前应写入的值
    ///
    /// 相对模式下把曲线值叠加到注册时的快照上。
    pub fn current_value(&self) -> AnimResult<Value> {
        let value = self.spec.evaluate(self.progress());
        match &self.start_value {
            Some(start) => compose(self.sprite, self.property(), &value, start),
            None => Ok(value),
        }
    }

    /// 取出完成回调（至多一次）
    pub fn take_callback(&mut self) -> Option<OnComplete> {
        self.on_complete.take()
    }
}

/// 相对模式合成：`value + start`
pub(crate) fn compose(
    sprite: SpriteId,
    property: Property,
    value: &Value,
    start: &Value,
) -> AnimResult<Value> {
    value
        .checked_add(start)
        .ok_or(AnimError::UnsupportedOperation {
            sprite,
            property,
            lhs: value.kind(),
            rhs: start.kind(),
        })
}
