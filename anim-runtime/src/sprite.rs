//! # Sprite 模块
//!
//! 可动画精灵的默认实现，使用 `Animatable` trait。
//!
//! ## 设计说明
//!
//! `Sprite` 使用 `Rc<RefCell<T>>` 实现内部可变性：
//! 宿主与调度器各持一份克隆，写入对双方立即可见。

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::property::Property;
use crate::traits::Animatable;
use crate::value::{Value, Vec2};

/// 精灵的内部数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteData {
    /// 名称（仅用于调试）
    pub name: String,
    /// 位置
    pub position: Vec2,
    /// 缩放因子
    pub scale: f32,
    /// 旋转角度（弧度）
    pub rotation: f32,
    /// 透明度 (0.0 - 1.0)
    pub alpha: f32,
    /// 当前显示的图像键
    pub image: Option<String>,
}

impl Default for SpriteData {
    fn default() -> Self {
        Self {
            name: String::new(),
            position: Vec2::zero(),
            scale: 1.0,
            rotation: 0.0,
            alpha: 1.0,
            image: None,
        }
    }
}

impl SpriteData {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// 可动画精灵
///
/// ## 支持的属性
///
/// - `X` / `Y`: 位置分量（`Position` 的别名）
/// - `Position`: 位置
/// - `Scale`: 缩放因子
/// - `Rotation`: 旋转角度（弧度）
/// - `Alpha`: 透明度，写入时截断到 0.0 - 1.0
/// - `Image`: 图像键
#[derive(Debug, Clone)]
pub struct Sprite {
    data: Rc<RefCell<SpriteData>>,
}

impl Sprite {
    /// 支持的属性列表
    pub const PROPERTIES: &'static [Property] = &[
        Property::X,
        Property::Y,
        Property::Position,
        Property::Scale,
        Property::Rotation,
        Property::Alpha,
        Property::Image,
    ];

    /// 创建新的精灵
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_data(SpriteData::new(name))
    }

    /// 从现有数据创建
    pub fn from_data(data: SpriteData) -> Self {
        Self {
            data: Rc::new(RefCell::new(data)),
        }
    }

    /// 在指定位置创建
    pub fn at(name: impl Into<String>, x: f32, y: f32) -> Self {
        let sprite = Self::new(name);
        sprite.set_position(x, y);
        sprite
    }

    pub fn name(&self) -> String {
        self.data.borrow().name.clone()
    }

    pub fn position(&self) -> Vec2 {
        self.data.borrow().position
    }

    pub fn set_position(&self, x: f32, y: f32) {
        self.data.borrow_mut().position = Vec2::new(x, y);
    }

    pub fn x(&self) -> f32 {
        self.data.borrow().position.x
    }

    pub fn y(&self) -> f32 {
        self.data.borrow().position.y
    }

    pub fn scale(&self) -> f32 {
        self.data.borrow().scale
    }

    pub fn rotation(&self) -> f32 {
        self.data.borrow().rotation
    }

    pub fn alpha(&self) -> f32 {
        self.data.borrow().alpha
    }

    /// 设置透明度
    pub fn set_alpha(&self, alpha: f32) {
        self.data.borrow_mut().alpha = alpha.clamp(0.0, 1.0);
    }

    pub fn image(&self) -> Option<String> {
        self.data.borrow().image.clone()
    }

    pub fn set_image(&self, image: impl Into<String>) {
        self.data.borrow_mut().image = Some(image.into());
    }

    /// 获取完整数据副本
    pub fn snapshot(&self) -> SpriteData {
        self.data.borrow().clone()
    }

    /// 读取属性值
    pub fn get(&self, property: Property) -> Option<Value> {
        let data = self.data.borrow();
        match property {
            Property::X => Some(Value::Float(data.position.x)),
            Property::Y => Some(Value::Float(data.position.y)),
            Property::Position => Some(Value::Vec2(data.position)),
            Property::Scale => Some(Value::Float(data.scale)),
            Property::Rotation => Some(Value::Float(data.rotation)),
            Property::Alpha => Some(Value::Float(data.alpha)),
            Property::Image => data.image.clone().map(Value::Image),
            Property::Custom(_) => None,
        }
    }

    /// 写入属性值
    ///
    /// 属性不存在或值的种类不匹配时返回 `false`。
    pub fn set(&self, property: Property, value: Value) -> bool {
        let mut data = self.data.borrow_mut();
        match (property, value) {
            (Property::X, Value::Float(v)) => data.position.x = v,
            (Property::Y, Value::Float(v)) => data.position.y = v,
            (Property::Position, Value::Vec2(v)) => data.position = v,
            (Property::Scale, Value::Float(v)) => data.scale = v,
            (Property::Rotation, Value::Float(v)) => data.rotation = v,
            (Property::Alpha, Value::Float(v)) => data.alpha = v.clamp(0.0, 1.0),
            (Property::Image, Value::Image(key)) => data.image = Some(key),
            _ => return false,
        }
        true
    }
}

impl Animatable for Sprite {
    fn get_property(&self, property: Property) -> Option<Value> {
        self.get(property)
    }

    fn set_property(&self, property: Property, value: Value) -> bool {
        self.set(property, value)
    }

    fn property_list(&self) -> &'static [Property] {
        Self::PROPERTIES
    }
}
