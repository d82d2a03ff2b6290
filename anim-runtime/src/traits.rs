//! # Traits 模块
//!
//! 实体属性接口定义。
//!
//! ## 核心概念
//!
//! - `SpriteId`: 由 AnimationScheduler 分配的精灵句柄
//! - `Animatable`: 可动画实体接口（按枚举属性读写值）

use crate::property::Property;
use crate::value::Value;

/// 精灵句柄
///
/// 由 `AnimationScheduler` 在精灵加入时分配，使用内部计数器生成，不会重复。
/// 句柄同时决定每帧遍历精灵的顺序（分配顺序）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpriteId(pub(crate) u64);

impl SpriteId {
    /// 创建新的句柄（仅供调度器内部使用）
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    /// 获取内部 ID 值
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SpriteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SpriteId({})", self.0)
    }
}

/// 可动画实体接口
///
/// 调度器只通过此接口读写实体状态，不做其他假设。
/// setter 接收 `&self`，实体使用 `Rc<RefCell<T>>` 之类的内部可变性，
/// 这样调度器与宿主可以同时持有同一实体。
///
/// ## 实现示例
///
/// ```rust,ignore
/// struct Marker {
///     glow: RefCell<f32>,
/// }
///
/// impl Animatable for Marker {
///     fn get_property(&self, property: Property) -> Option<Value> {
///         match property {
///             Property::Custom("glow") => Some(Value::Float(*self.glow.borrow())),
///             _ => None,
///         }
///     }
///
///     fn set_property(&self, property: Property, value: Value) -> bool {
///         match (property, value) {
///             (Property::Custom("glow"), Value::Float(v)) => {
///                 *self.glow.borrow_mut() = v;
///                 true
///             }
///             _ => false,
///         }
///     }
///
///     fn property_list(&self) -> &'static [Property] {
///         &[Property::Custom("glow")]
///     }
/// }
/// ```
pub trait Animatable: 'static {
    /// 获取属性的当前值
    ///
    /// 属性不存在时返回 `None`。
    fn get_property(&self, property: Property) -> Option<Value>;

    /// 写入属性的新值
    ///
    /// # 返回
    /// - `true`: 写入成功
    /// - `false`: 属性不存在或值的种类不匹配
    fn set_property(&self, property: Property, value: Value) -> bool;

    /// 实体声明的全部可动画属性
    fn property_list(&self) -> &'static [Property];

    /// 是否支持某个属性
    fn supports(&self, property: Property) -> bool {
        self.property_list().contains(&property)
    }
}
