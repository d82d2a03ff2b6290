//! # Anim Runtime
//!
//! 逐帧属性动画调度器。
//!
//! ## 架构概述
//!
//! `anim-runtime` 只负责 **时间轴管理**，不绘制像素、不加载文件、不管理窗口。
//! 宿主每帧调用一次 `advance(dt)`，调度器推进所有动画并把值写回精灵：
//!
//! ```text
//! Host                              AnimationScheduler
//!   │                                      │
//!   │──── advance(dt) ───────────────────►│ 推进 → 写入属性
//!   │                                      │ 移除已完成的实例
//!   │                                      │ 调用完成回调
//!   │◄─── Vec<AnimationEvent> ────────────│
//!   │                                      │
//! ```
//!
//! ## 核心类型
//!
//! - [`AnimationSpec`]：不可变的动画描述（属性、时长、模式、曲线）
//! - [`AnimationScheduler`]：持有精灵表与活跃动画，逐帧推进
//! - [`Animatable`]：实体属性接口
//! - [`Sprite`]：默认的可动画精灵
//! - [`Value`] / [`Property`]：属性值与枚举属性标识
//!
//! ## 使用示例
//!
//! ```ignore
//! use anim_runtime::{AnimationScheduler, AnimationSpec, Property, Sprite, Value};
//!
//! let mut scheduler = AnimationScheduler::new();
//! let sprite = Sprite::at("hero", 0.0, 0.0);
//! let id = scheduler.add_sprite(Rc::new(sprite.clone()));
//!
//! let slide = AnimationSpec::absolute(Property::X, 2.0, |p| Value::Float(100.0 * p))?;
//! scheduler.register(id, slide.shared())?;
//!
//! loop {
//!     let events = scheduler.advance(frame_dt)?;
//!     // 宿主根据 sprite 的状态绘制
//! }
//! ```
//!
//! ## 模块结构
//!
//! - [`value`]：属性值
//! - [`property`]：属性标识
//! - [`spec`]：动画描述
//! - [`instance`]：动画实例
//! - [`scheduler`]：调度器
//! - [`traits`]：实体属性接口
//! - [`sprite`]：默认精灵实现
//! - [`event`]：生命周期事件
//! - [`config`]：配置
//! - [`error`]：错误类型定义

pub mod config;
pub mod error;
pub mod event;
pub mod instance;
pub mod property;
pub mod scheduler;
pub mod spec;
pub mod sprite;
pub mod traits;
pub mod value;

// 重导出核心类型
pub use config::SchedulerConfig;
pub use error::{AnimError, AnimResult, ConfigError};
pub use event::AnimationEvent;
pub use instance::{AnimationId, AnimationInstance, OnComplete};
pub use property::Property;
pub use scheduler::AnimationScheduler;
pub use spec::{AnimationSpec, Curve};
pub use sprite::{Sprite, SpriteData};
pub use traits::{Animatable, SpriteId};
pub use value::{Value, ValueKind, Vec2};
