//! # Property 模块
//!
//! 可动画属性的枚举标识。
//!
//! 属性集合是固定的（外加实体自行声明的 `Custom`），
//! 不支持的属性在注册动画时即被拒绝，而不是在写入时才失败。

use crate::value::ValueKind;

/// 属性标识
///
/// `X` / `Y` 是二维位置 `Position` 两个分量的保留别名，
/// 由实体负责把它们映射到位置字段上。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    /// 位置 X 分量
    X,
    /// 位置 Y 分量
    Y,
    /// 二维位置
    Position,
    /// 缩放因子
    Scale,
    /// 旋转角度（弧度）
    Rotation,
    /// 透明度 (0.0 - 1.0)
    Alpha,
    /// 当前显示的图像
    Image,
    /// 实体自定义属性
    Custom(&'static str),
}

impl Property {
    /// 内置属性的值种类
    ///
    /// 自定义属性的种类由实体决定，返回 `None`。
    pub fn value_kind(&self) -> Option<ValueKind> {
        match self {
            Self::X | Self::Y | Self::Scale | Self::Rotation | Self::Alpha => {
                Some(ValueKind::Float)
            }
            Self::Position => Some(ValueKind::Vec2),
            Self::Image => Some(ValueKind::Image),
            Self::Custom(_) => None,
        }
    }

    /// 属性名称
    pub fn name(&self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Position => "position",
            Self::Scale => "scale",
            Self::Rotation => "rotation",
            Self::Alpha => "alpha",
            Self::Image => "image",
            Self::Custom(name) => name,
        }
    }

    /// 按名称解析内置属性
    pub fn from_name(name: &str) -> Option<Self> {
        let property = match name {
            "x" => Self::X,
            "y" => Self::Y,
            "position" => Self::Position,
            "scale" => Self::Scale,
            "rotation" => Self::Rotation,
            "alpha" => Self::Alpha,
            "image" => Self::Image,
            _ => return None,
        };
        Some(property)
    }

    /// 是否为位置分量别名
    pub fn is_position_alias(&self) -> bool {
        matches!(self, Self::X | Self::Y)
    }
}

impl std::fmt::Display for Property {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
