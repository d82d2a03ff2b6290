//! # Value 模块
//!
//! 动画写入属性的值类型。
//!
//! - `Float`：标量属性（缩放、旋转、透明度、位置分量）
//! - `Vec2`：二维向量属性（位置）
//! - `Image`：图像键，调度器只传递，不加载
//!
//! 相对模式需要 `start + curve(p)`，只有 `Float` 与 `Vec2` 支持加法。

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// 二维向量
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    /// 创建新的向量
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// 零向量
    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// 按比例缩放
    pub fn scaled(self, k: f32) -> Self {
        Self {
            x: self.x * k,
            y: self.y * k,
        }
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Self) -> Self::Output {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Self) -> Self::Output {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl From<(f32, f32)> for Vec2 {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

impl From<Vec2> for (f32, f32) {
    fn from(v: Vec2) -> Self {
        (v.x, v.y)
    }
}

/// 值的种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Float,
    Vec2,
    Image,
}

impl ValueKind {
    /// 是否支持相对模式的加法合成
    pub fn is_additive(&self) -> bool {
        matches!(self, Self::Float | Self::Vec2)
    }
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Float => "float",
            Self::Vec2 => "vec2",
            Self::Image => "image",
        };
        write!(f, "{}", name)
    }
}

/// 属性值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Value {
    /// 标量
    Float(f32),
    /// 二维向量
    Vec2(Vec2),
    /// 图像键
    Image(String),
}

impl Value {
    /// 获取值的种类
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Float(_) => ValueKind::Float,
            Self::Vec2(_) => ValueKind::Vec2,
            Self::Image(_) => ValueKind::Image,
        }
    }

    /// 逐分量相加
    ///
    /// 种类不同或不支持加法时返回 `None`。
    pub fn checked_add(&self, other: &Value) -> Option<Value> {
        match (self, other) {
            (Self::Float(a), Self::Float(b)) => Some(Self::Float(a + b)),
            (Self::Vec2(a), Self::Vec2(b)) => Some(Self::Vec2(*a + *b)),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_vec2(&self) -> Option<Vec2> {
        match self {
            Self::Vec2(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&str> {
        match self {
            Self::Image(key) => Some(key),
            _ => None,
        }
    }

    /// 创建图像值
    pub fn image(key: impl Into<String>) -> Self {
        Self::Image(key.into())
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<Vec2> for Value {
    fn from(v: Vec2) -> Self {
        Self::Vec2(v)
    }
}

impl From<(f32, f32)> for Value {
    fn from(v: (f32, f32)) -> Self {
        Self::Vec2(v.into())
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Float(v) => write!(f, "{}", v),
            Self::Vec2(v) => write!(f, "({}, {})", v.x, v.y),
            Self::Image(key) => write!(f, "image:{}", key),
        }
    }
}
