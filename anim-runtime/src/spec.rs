//! # Spec 模块
//!
//! 动画描述：目标属性、时长、合成模式与进度曲线。
//!
//! 描述一经创建即不可变，可以通过 `Rc` 在多次注册之间共享。
//! 曲线被视为归一化进度的纯函数，本模块不提供缓动库。

use std::rc::Rc;

use crate::error::{AnimError, AnimResult};
use crate::property::Property;
use crate::value::Value;

/// 进度曲线：`progress ∈ [0, 1]` → 属性值
pub type Curve = dyn Fn(f32) -> Value;

/// 动画描述
#[derive(Clone)]
pub struct AnimationSpec {
    property: Property,
    duration: f32,
    absolute: bool,
    curve: Rc<Curve>,
}

impl std::fmt::Debug for AnimationSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationSpec")
            .field("property", &self.property)
            .field("duration", &self.duration)
            .field("absolute", &self.absolute)
            .finish_non_exhaustive()
    }
}

impl AnimationSpec {
    /// 创建动画描述
    ///
    /// # 参数
    /// - `property`: 目标属性
    /// - `duration`: 动画时长（秒），必须为有限正数
    /// - `absolute`: `true` 时曲线值直接作为属性值；
    ///   `false` 时曲线值叠加到注册时的属性快照上
    /// - `curve`: 进度曲线
    pub fn new(
        property: Property,
        duration: f32,
        absolute: bool,
        curve: impl Fn(f32) -> Value + 'static,
    ) -> AnimResult<Self> {
        if !duration.is_finite() || duration <= 0.0 {
            return Err(AnimError::InvalidDuration { duration });
        }

        Ok(Self {
            property,
            duration,
            absolute,
            curve: Rc::new(curve),
        })
    }

    /// 创建绝对模式动画
    pub fn absolute(
        property: Property,
        duration: f32,
        curve: impl Fn(f32) -> Value + 'static,
    ) -> AnimResult<Self> {
        Self::new(property, duration, true, curve)
    }

    /// 创建相对模式动画
    pub fn relative(
        property: Property,
        duration: f32,
        curve: impl Fn(f32) -> Value + 'static,
    ) -> AnimResult<Self> {
        Self::new(property, duration, false, curve)
    }

    /// 包装为共享引用
    pub fn shared(self) -> Rc<Self> {
        Rc::new(self)
    }

    pub fn property(&self) -> Property {
        self.property
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn is_absolute(&self) -> bool {
        self.absolute
    }

    /// 计算给定进度下的曲线值
    ///
    /// 进度的截断由调度器负责，这里原样传给曲线。
    pub fn evaluate(&self, progress: f32) -> Value {
        (self.curve)(progress)
    }
}
