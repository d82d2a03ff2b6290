//! # Scheduler 模块
//!
//! 逐帧动画调度器（动画组）。
//!
//! 精灵实现 `Animatable` trait，调度器直接写入属性值：
//! ```rust,ignore
//! let sprite_id = scheduler.add_sprite(Rc::new(sprite.clone()));
//! let spec = AnimationSpec::absolute(Property::X, 2.0, |p| Value::Float(100.0 * p))?;
//! scheduler.register_with_callback(sprite_id, spec.shared(), |_| println!("done"))?;
//!
//! // 每帧调用一次
//! let events = scheduler.advance(dt)?;
//! ```
//!
//! ## 单帧流程
//!
//! 1. 按精灵加入顺序、精灵内按注册顺序推进所有实例并写入属性
//! 2. 整轮写入结束后，按发现顺序移除已完成的实例
//! 3. 依次调用完成回调；回调中注册的新动画从下一帧开始计时

use std::collections::BTreeMap;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::config::SchedulerConfig;
use crate::error::{AnimError, AnimResult, ConfigError};
use crate::event::AnimationEvent;
use crate::instance::{AnimationId, AnimationInstance, OnComplete, compose};
use crate::property::Property;
use crate::spec::AnimationSpec;
use crate::traits::{Animatable, SpriteId};
use crate::value::Value;

/// 已加入调度器的精灵
struct RegisteredSprite {
    /// 精灵的 trait object
    object: Rc<dyn Animatable>,
    /// 活跃动画（按注册顺序）
    animations: Vec<AnimationInstance>,
}

impl RegisteredSprite {
    fn find(&self, property: Property) -> Option<usize> {
        self.animations
            .iter()
            .position(|a| a.property() == property)
    }
}

/// 动画调度器
///
/// 独占精灵句柄到活跃动画的映射；精灵本身不持有自己的动画。
/// 同一精灵的同一属性同时至多存在一个动画实例。
pub struct AnimationScheduler {
    /// 精灵表（SpriteId -> 精灵），句柄递增，遍历顺序即加入顺序
    sprites: BTreeMap<SpriteId, RegisteredSprite>,
    config: SchedulerConfig,
    /// 下一个动画 ID
    next_anim_id: u64,
    /// 下一个精灵 ID
    next_sprite_id: u64,
    /// 待取出的事件队列
    events: Vec<AnimationEvent>,
    /// 是否正在派发完成回调
    dispatching: bool,
}

/// 派发期间置位 `dispatching`，离开作用域（包括回调 panic 展开）时复位
struct DispatchGuard<'a> {
    scheduler: &'a mut AnimationScheduler,
}

impl<'a> DispatchGuard<'a> {
    fn enter(scheduler: &'a mut AnimationScheduler) -> Self {
        scheduler.dispatching = true;
        Self { scheduler }
    }
}

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        self.scheduler.dispatching = false;
    }
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AnimationScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationScheduler")
            .field("sprites", &self.sprites.len())
            .field("animations", &self.active_count())
            .field("config", &self.config)
            .finish()
    }
}

impl AnimationScheduler {
    /// 创建新的调度器
    pub fn new() -> Self {
        Self {
            sprites: BTreeMap::new(),
            config: SchedulerConfig::default(),
            next_anim_id: 1,
            next_sprite_id: 1,
            events: Vec::new(),
            dispatching: false,
        }
    }

    /// 使用指定配置创建调度器
    pub fn with_config(config: SchedulerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new()
        })
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// 替换配置（先验证）
    pub fn set_config(&mut self, config: SchedulerConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    fn next_animation_id(&mut self) -> AnimationId {
        let id = AnimationId::new(self.next_anim_id);
        self.next_anim_id += 1;
        id
    }

    fn next_sprite_id(&mut self) -> SpriteId {
        let id = SpriteId::new(self.next_sprite_id);
        self.next_sprite_id += 1;
        id
    }

    // ========== 精灵管理 ==========

    /// 加入可动画精灵
    ///
    /// 分配唯一的 `SpriteId` 并返回，后续通过此句柄引用精灵。
    /// 同一对象多次加入会得到不同的句柄。
    pub fn add_sprite<T: Animatable>(&mut self, object: Rc<T>) -> SpriteId {
        let id = self.next_sprite_id();
        self.sprites.insert(
            id,
            RegisteredSprite {
                object: object as Rc<dyn Animatable>,
                animations: Vec::new(),
            },
        );
        id
    }

    /// 移除精灵
    ///
    /// 同时清除它的所有动画，不触发完成回调（属于异常终止而非完成）。
    ///
    /// # 返回
    /// 精灵是否存在
    pub fn remove_sprite(&mut self, sprite: SpriteId) -> bool {
        let Some(registered) = self.sprites.remove(&sprite) else {
            return false;
        };

        for instance in registered.animations {
            self.push_cancelled(sprite, &instance);
        }
        debug!(sprite = %sprite, "精灵已移除");
        true
    }

    /// 检查精灵是否已加入
    pub fn contains_sprite(&self, sprite: SpriteId) -> bool {
        self.sprites.contains_key(&sprite)
    }

    /// 获取精灵数量
    pub fn sprite_count(&self) -> usize {
        self.sprites.len()
    }

    // ========== 动画注册 ==========

    /// 注册动画
    ///
    /// # 错误
    /// - `UnknownSprite`: 精灵未加入
    /// - `UnknownProperty`: 精灵不支持该属性
    /// - `DuplicateProperty`: 该属性已有动画，现有状态不变
    /// - `UnsupportedOperation`: 相对模式下起始值或曲线值不支持加法
    pub fn register(
        &mut self,
        sprite: SpriteId,
        spec: Rc<AnimationSpec>,
    ) -> AnimResult<AnimationId> {
        self.insert_animation(sprite, spec, None)
    }

    /// 注册动画并附带完成回调
    ///
    /// 回调在动画完成的那一帧、全部属性写入之后调用，且只调用一次。
    pub fn register_with_callback(
        &mut self,
        sprite: SpriteId,
        spec: Rc<AnimationSpec>,
        on_complete: impl FnOnce(&mut AnimationScheduler) + 'static,
    ) -> AnimResult<AnimationId> {
        self.insert_animation(sprite, spec, Some(Box::new(on_complete)))
    }

    fn insert_animation(
        &mut self,
        sprite: SpriteId,
        spec: Rc<AnimationSpec>,
        on_complete: Option<OnComplete>,
    ) -> AnimResult<AnimationId> {
        let property = spec.property();
        let registered = self
            .sprites
            .get(&sprite)
            .ok_or(AnimError::UnknownSprite { sprite })?;

        if !registered.object.supports(property) {
            return Err(AnimError::UnknownProperty { sprite, property });
        }

        if registered.find(property).is_some() {
            return Err(AnimError::DuplicateProperty { sprite, property });
        }

        // 相对模式只在此处读取一次起始值
        let start_value = if spec.is_absolute() {
            None
        } else {
            let initial = spec.evaluate(0.0);
            if let Some(kind) = property.value_kind().filter(|k| !k.is_additive()) {
                return Err(AnimError::UnsupportedOperation {
                    sprite,
                    property,
                    lhs: initial.kind(),
                    rhs: kind,
                });
            }
            let start = registered
                .object
                .get_property(property)
                .ok_or(AnimError::UnknownProperty { sprite, property })?;
            compose(sprite, property, &initial, &start)?;
            Some(start)
        };

        let id = self.next_animation_id();
        debug!(
            sprite = %sprite,
            property = %property,
            id = id.0,
            duration = spec.duration(),
            absolute = spec.is_absolute(),
            "注册动画"
        );

        let instance = AnimationInstance::new(id, sprite, spec, start_value, on_complete);
        if let Some(registered) = self.sprites.get_mut(&sprite) {
            registered.animations.push(instance);
        }
        self.events.push(AnimationEvent::Started {
            id,
            sprite,
            property,
        });

        Ok(id)
    }

    /// 取消精灵某个属性上的动画
    ///
    /// 属性保持当前值，不触发完成回调。
    pub fn cancel(&mut self, sprite: SpriteId, property: Property) -> Option<AnimationId> {
        let registered = self.sprites.get_mut(&sprite)?;
        let index = registered.find(property)?;
        let instance = registered.animations.remove(index);

        self.push_cancelled(sprite, &instance);
        debug!(sprite = %sprite, property = %property, id = instance.id.0, "动画已取消");
        Some(instance.id)
    }

    fn push_cancelled(&mut self, sprite: SpriteId, instance: &AnimationInstance) {
        self.events.push(AnimationEvent::Cancelled {
            id: instance.id,
            sprite,
            property: instance.property(),
        });
    }

    // ========== 逐帧推进 ==========

    /// 推进所有动画
    ///
    /// - `dt < 0` 或 NaN：返回 `InvalidDelta`，不改变任何状态
    /// - `dt == 0`：空操作
    /// - 在完成回调中调用：返回 `ReentrantAdvance`
    /// - 某个相对动画合成失败：该实例本帧不写入也不完成，其余实例照常推进、
    ///   完成并派发回调，最后返回遇到的第一个 `UnsupportedOperation`。
    ///   失败的实例保留在调度器中，由宿主决定是否 `cancel`；
    ///   本帧事件留在队列中，可用 `take_events` 取出。
    ///
    /// # 返回
    /// 自上次调用以来产生的全部事件
    pub fn advance(&mut self, dt: f32) -> AnimResult<Vec<AnimationEvent>> {
        if self.dispatching {
            return Err(AnimError::ReentrantAdvance);
        }
        if dt.is_nan() || dt < 0.0 {
            return Err(AnimError::InvalidDelta { dt });
        }
        if dt == 0.0 {
            return Ok(Vec::new());
        }

        let dt = self.config.effective_dt(dt);
        let (completed, failure) = self.advance_pass(dt);
        let callbacks = self.finalize(completed);
        self.dispatch(callbacks);

        match failure {
            Some(e) => Err(e),
            None => Ok(self.take_events()),
        }
    }

    /// 取出队列中的全部事件
    pub fn take_events(&mut self) -> Vec<AnimationEvent> {
        std::mem::take(&mut self.events)
    }

    /// 第一阶段：推进时间、计算并写入属性、收集已完成的实例
    ///
    /// 合成失败只影响失败的实例，返回第一个错误。
    fn advance_pass(&mut self, dt: f32) -> (Vec<(SpriteId, AnimationId)>, Option<AnimError>) {
        let mut completed = Vec::new();
        let mut failure = None;

        for (sprite, registered) in &mut self.sprites {
            for instance in &mut registered.animations {
                instance.advance(dt);
                let property = instance.property();
                let value = match instance.current_value() {
                    Ok(value) => value,
                    Err(e) => {
                        warn!(
                            sprite = %sprite,
                            id = instance.id.0,
                            error = %e,
                            "动画求值失败，本帧跳过"
                        );
                        if failure.is_none() {
                            failure = Some(e);
                        }
                        continue;
                    }
                };

                if !registered.object.set_property(property, value) {
                    warn!(sprite = %sprite, property = %property, "属性写入被拒绝");
                }

                if instance.is_complete() {
                    completed.push((*sprite, instance.id));
                }
            }
        }

        (completed, failure)
    }

    /// 第二阶段：按发现顺序移除已完成的实例，收集回调
    fn finalize(&mut self, completed: Vec<(SpriteId, AnimationId)>) -> Vec<OnComplete> {
        let mut callbacks = Vec::new();

        for (sprite, id) in completed {
            let Some(registered) = self.sprites.get_mut(&sprite) else {
                continue;
            };
            let Some(index) = registered.animations.iter().position(|a| a.id == id) else {
                continue;
            };

            let mut instance = registered.animations.remove(index);
            let property = instance.property();
            debug!(sprite = %sprite, property = %property, id = id.0, "动画完成");

            self.events.push(AnimationEvent::Completed {
                id,
                sprite,
                property,
            });
            if let Some(callback) = instance.take_callback() {
                callbacks.push(callback);
            }
        }

        callbacks
    }

    /// 第三阶段：依次调用完成回调
    fn dispatch(&mut self, callbacks: Vec<OnComplete>) {
        if callbacks.is_empty() {
            return;
        }

        let mut guard = DispatchGuard::enter(self);
        for callback in callbacks {
            callback(&mut *guard.scheduler);
        }
    }

    // ========== 跳过与清理 ==========

    /// 跳过所有动画
    ///
    /// 立即写入最终值；实例在下一次 `advance` 时完成并触发回调。
    pub fn skip_all(&mut self) {
        for (sprite, registered) in &mut self.sprites {
            for instance in &mut registered.animations {
                instance.fast_forward();
                Self::apply_current(*sprite, registered.object.as_ref(), instance);
            }
        }
    }

    /// 跳过精灵的所有动画
    pub fn skip_sprite_animations(&mut self, sprite: SpriteId) {
        if let Some(registered) = self.sprites.get_mut(&sprite) {
            for instance in &mut registered.animations {
                instance.fast_forward();
                Self::apply_current(sprite, registered.object.as_ref(), instance);
            }
        }
    }

    fn apply_current(sprite: SpriteId, object: &dyn Animatable, instance: &AnimationInstance) {
        let property = instance.property();
        match instance.current_value() {
            Ok(value) => {
                if !object.set_property(property, value) {
                    warn!(sprite = %sprite, property = %property, "属性写入被拒绝");
                }
            }
            Err(e) => warn!(sprite = %sprite, error = %e, "跳过动画时计算最终值失败"),
        }
    }

    /// 清空所有动画（保留已加入的精灵），不触发完成回调
    pub fn clear(&mut self) {
        let mut cancelled = Vec::new();
        for (sprite, registered) in &mut self.sprites {
            for instance in registered.animations.drain(..) {
                cancelled.push((*sprite, instance));
            }
        }
        for (sprite, instance) in &cancelled {
            self.push_cancelled(*sprite, instance);
        }
    }

    // ========== 查询方法 ==========

    /// 检查精灵的某个属性是否正在动画
    pub fn is_animating(&self, sprite: SpriteId, property: Property) -> bool {
        self.sprites
            .get(&sprite)
            .is_some_and(|r| r.find(property).is_some())
    }

    /// 检查是否有活跃的动画
    pub fn has_active_animations(&self) -> bool {
        self.sprites.values().any(|r| !r.animations.is_empty())
    }

    /// 检查精灵是否有活跃的动画
    pub fn has_sprite_animations(&self, sprite: SpriteId) -> bool {
        self.sprites
            .get(&sprite)
            .is_some_and(|r| !r.animations.is_empty())
    }

    /// 获取活跃动画数量
    pub fn active_count(&self) -> usize {
        self.sprites.values().map(|r| r.animations.len()).sum()
    }

    /// 获取动画的当前进度（0.0 - 1.0）
    pub fn progress(&self, id: AnimationId) -> Option<f32> {
        self.sprites
            .values()
            .flat_map(|r| r.animations.iter())
            .find(|a| a.id == id)
            .map(|a| a.progress())
    }

    /// 获取精灵属性的当前值
    pub fn get_sprite_property(&self, sprite: SpriteId, property: Property) -> Option<Value> {
        self.sprites.get(&sprite)?.object.get_property(property)
    }

    /// 直接设置精灵属性值（不经过动画）
    pub fn set_sprite_property(&self, sprite: SpriteId, property: Property, value: Value) -> bool {
        self.sprites
            .get(&sprite)
            .is_some_and(|r| r.object.set_property(property, value))
    }
}
