//! # 调度器集成测试
//!
//! 测试 register → advance → 写入属性 → 完成回调 的完整链路。
//! 使用默认的 `Sprite` 作为实体。

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use anim_runtime::{
    AnimError, AnimationEvent, AnimationScheduler, AnimationSpec, Property, Sprite, SpriteId,
    Value, ValueKind, Vec2,
};

/// 创建调度器并加入一个位于 (x, y) 的精灵
fn setup(x: f32, y: f32) -> (AnimationScheduler, Sprite, SpriteId) {
    let mut scheduler = AnimationScheduler::new();
    let sprite = Sprite::at("hero", x, y);
    let id = scheduler.add_sprite(Rc::new(sprite.clone()));
    (scheduler, sprite, id)
}

/// 记录回调调用顺序
fn recorder(
    log: Rc<RefCell<Vec<String>>>,
    label: &'static str,
) -> impl FnOnce(&mut AnimationScheduler) {
    move |_: &mut AnimationScheduler| log.borrow_mut().push(label.to_string())
}

/// 场景 A：绝对模式，两帧到达终点
#[test]
fn test_absolute_slide() {
    let (mut scheduler, sprite, id) = setup(0.0, 0.0);
    let count = Rc::new(Cell::new(0));
    let counter = count.clone();

    let spec = AnimationSpec::absolute(Property::X, 2.0, |p| Value::Float(100.0 * p)).unwrap();
    scheduler
        .register_with_callback(id, spec.shared(), move |_| counter.set(counter.get() + 1))
        .unwrap();

    scheduler.advance(1.0).unwrap();
    assert_eq!(sprite.x(), 50.0);
    assert_eq!(count.get(), 0);

    scheduler.advance(1.0).unwrap();
    assert_eq!(sprite.x(), 100.0);
    assert!(!scheduler.is_animating(id, Property::X));
    assert_eq!(count.get(), 1);

    // 完成后不会再次触发
    scheduler.advance(1.0).unwrap();
    scheduler.advance(1.0).unwrap();
    assert_eq!(count.get(), 1);
    assert_eq!(sprite.x(), 100.0);
}

/// 场景 B：相对模式，超出时长时进度截断为 1.0
#[test]
fn test_relative_overshoot() {
    let (mut scheduler, sprite, id) = setup(0.0, 5.0);

    let spec = AnimationSpec::relative(Property::Y, 1.0, |p| Value::Float(10.0 * p)).unwrap();
    scheduler.register(id, spec.shared()).unwrap();

    scheduler.advance(0.5).unwrap();
    assert_eq!(sprite.y(), 10.0);

    let events = scheduler.advance(0.6).unwrap();
    assert_eq!(sprite.y(), 15.0);
    assert!(events.iter().any(AnimationEvent::is_completed));
    assert!(!scheduler.has_active_animations());
}

/// 场景 C：同一精灵的 x / y 互不干扰
#[test]
fn test_independent_properties() {
    let (mut scheduler, sprite, id) = setup(0.0, 0.0);

    let x = AnimationSpec::absolute(Property::X, 1.0, |p| Value::Float(10.0 * p)).unwrap();
    let y = AnimationSpec::absolute(Property::Y, 2.0, |p| Value::Float(-20.0 * p)).unwrap();
    scheduler.register(id, x.shared()).unwrap();
    scheduler.register(id, y.shared()).unwrap();
    assert_eq!(scheduler.active_count(), 2);

    scheduler.advance(1.0).unwrap();
    assert_eq!(sprite.position(), Vec2::new(10.0, -10.0));
    assert!(!scheduler.is_animating(id, Property::X));
    assert!(scheduler.is_animating(id, Property::Y));

    scheduler.advance(1.0).unwrap();
    assert_eq!(sprite.position(), Vec2::new(10.0, -20.0));
}

/// 场景 D：移除精灵时清除动画，不触发回调
#[test]
fn test_remove_sprite_mid_animation() {
    let (mut scheduler, sprite, id) = setup(0.0, 0.0);
    let fired = Rc::new(Cell::new(false));
    let flag = fired.clone();

    let spec = AnimationSpec::absolute(Property::X, 1.0, |p| Value::Float(100.0 * p)).unwrap();
    let anim = scheduler
        .register_with_callback(id, spec.shared(), move |_| flag.set(true))
        .unwrap();
    scheduler.advance(0.5).unwrap();

    assert!(scheduler.remove_sprite(id));
    assert!(!scheduler.remove_sprite(id));
    assert!(!scheduler.is_animating(id, Property::X));

    let events = scheduler.advance(1.0).unwrap();
    assert!(!fired.get());
    assert_eq!(sprite.x(), 50.0);
    assert_eq!(
        events,
        vec![AnimationEvent::Cancelled {
            id: anim,
            sprite: id,
            property: Property::X,
        }]
    );
}

#[test]
fn test_duplicate_then_register_after_completion() {
    let (mut scheduler, sprite, id) = setup(0.0, 0.0);
    let spec = AnimationSpec::absolute(Property::Scale, 1.0, |p| Value::Float(1.0 + p))
        .unwrap()
        .shared();

    scheduler.register(id, spec.clone()).unwrap();
    assert!(matches!(
        scheduler.register(id, spec.clone()),
        Err(AnimError::DuplicateProperty { .. })
    ));

    scheduler.advance(1.0).unwrap();
    assert_eq!(sprite.scale(), 2.0);

    // 完成之后可以复用同一份描述重新注册
    assert!(scheduler.register(id, spec).is_ok());
}

/// 时间切分方式不影响写入的值
#[test]
fn test_chunking_independence() {
    let curve = |p: f32| Value::Float(100.0 * p * p);

    let (mut one_step, a, id_a) = setup(0.0, 0.0);
    let spec = AnimationSpec::absolute(Property::X, 1.0, curve).unwrap();
    one_step.register(id_a, spec.shared()).unwrap();
    one_step.advance(0.75).unwrap();

    let (mut two_steps, b, id_b) = setup(0.0, 0.0);
    let spec = AnimationSpec::absolute(Property::X, 1.0, curve).unwrap();
    two_steps.register(id_b, spec.shared()).unwrap();
    two_steps.advance(0.25).unwrap();
    two_steps.advance(0.5).unwrap();

    assert_eq!(a.x(), 56.25);
    assert_eq!(a.x(), b.x());
}

#[test]
fn test_relative_vec2_position() {
    let (mut scheduler, sprite, id) = setup(10.0, 20.0);

    let spec = AnimationSpec::relative(Property::Position, 1.0, |p| {
        Value::Vec2(Vec2::new(4.0, -8.0).scaled(p))
    })
    .unwrap();
    scheduler.register(id, spec.shared()).unwrap();

    scheduler.advance(0.5).unwrap();
    assert_eq!(sprite.position(), Vec2::new(12.0, 16.0));

    scheduler.advance(0.5).unwrap();
    assert_eq!(sprite.position(), Vec2::new(14.0, 12.0));
}

#[test]
fn test_image_frames_absolute() {
    let (mut scheduler, sprite, id) = setup(0.0, 0.0);
    let frames = ["walk_0.png", "walk_1.png", "walk_2.png", "walk_3.png"];

    let spec = AnimationSpec::absolute(Property::Image, 1.0, move |p| {
        let index = ((p * frames.len() as f32) as usize).min(frames.len() - 1);
        Value::image(frames[index])
    })
    .unwrap();
    scheduler.register(id, spec.shared()).unwrap();

    scheduler.advance(0.5).unwrap();
    assert_eq!(sprite.image().as_deref(), Some("walk_2.png"));

    scheduler.advance(0.5).unwrap();
    assert_eq!(sprite.image().as_deref(), Some("walk_3.png"));
}

#[test]
fn test_relative_image_rejected_at_registration() {
    let (mut scheduler, sprite, id) = setup(0.0, 0.0);
    sprite.set_image("idle.png");

    let spec = AnimationSpec::relative(Property::Image, 1.0, |_| Value::image("blink.png")).unwrap();
    let result = scheduler.register(id, spec.shared());

    assert!(matches!(
        result,
        Err(AnimError::UnsupportedOperation {
            property: Property::Image,
            ..
        })
    ));
    assert!(!scheduler.has_active_animations());
    assert_eq!(sprite.image().as_deref(), Some("idle.png"));
}

/// 没有图像的精灵同样报告不支持合成，而不是未知属性
#[test]
fn test_relative_image_rejected_without_current_image() {
    let (mut scheduler, sprite, id) = setup(0.0, 0.0);
    assert_eq!(sprite.image(), None);

    let spec = AnimationSpec::relative(Property::Image, 1.0, |_| Value::image("blink.png")).unwrap();
    let result = scheduler.register(id, spec.shared());

    assert_eq!(
        result,
        Err(AnimError::UnsupportedOperation {
            sprite: id,
            property: Property::Image,
            lhs: ValueKind::Image,
            rhs: ValueKind::Image,
        })
    );
}

/// 曲线中途改变值种类时，在 advance 阶段报告错误且不写入该实例
#[test]
fn test_unsupported_operation_surfaces_at_advance() {
    let (mut scheduler, sprite, id) = setup(0.0, 0.0);

    let spec = AnimationSpec::relative(Property::X, 1.0, |p| {
        if p < 0.5 {
            Value::Float(p)
        } else {
            Value::from((p, p))
        }
    })
    .unwrap();
    scheduler.register(id, spec.shared()).unwrap();

    scheduler.advance(0.25).unwrap();
    assert_eq!(sprite.x(), 0.25);

    let result = scheduler.advance(0.5);
    assert_eq!(
        result,
        Err(AnimError::UnsupportedOperation {
            sprite: id,
            property: Property::X,
            lhs: ValueKind::Vec2,
            rhs: ValueKind::Float,
        })
    );
    assert_eq!(sprite.x(), 0.25);
}

/// 一个实例合成失败不影响其他精灵的推进、完成与回调
#[test]
fn test_failing_instance_does_not_stall_others() {
    let mut scheduler = AnimationScheduler::new();
    let a = Sprite::new("a");
    let b = Sprite::new("b");
    let c = Sprite::new("c");
    let id_a = scheduler.add_sprite(Rc::new(a.clone()));
    let id_b = scheduler.add_sprite(Rc::new(b.clone()));
    let id_c = scheduler.add_sprite(Rc::new(c.clone()));

    let count = Rc::new(Cell::new(0));
    let counter = count.clone();
    let quick = AnimationSpec::absolute(Property::X, 0.5, |p| Value::Float(8.0 * p)).unwrap();
    scheduler
        .register_with_callback(id_a, quick.shared(), move |_| counter.set(counter.get() + 1))
        .unwrap();

    let broken = AnimationSpec::relative(Property::X, 1.0, |p| {
        if p < 0.5 {
            Value::Float(p)
        } else {
            Value::from((p, p))
        }
    })
    .unwrap();
    scheduler.register(id_b, broken.shared()).unwrap();

    let slow = AnimationSpec::absolute(Property::X, 10.0, |p| Value::Float(100.0 * p)).unwrap();
    scheduler.register(id_c, slow.shared()).unwrap();

    for _ in 0..5 {
        let result = scheduler.advance(1.0);
        assert!(matches!(
            result,
            Err(AnimError::UnsupportedOperation { sprite, .. }) if sprite == id_b
        ));
    }

    assert_eq!(a.x(), 8.0);
    assert_eq!(count.get(), 1);
    assert!(!scheduler.is_animating(id_a, Property::X));
    assert_eq!(b.x(), 0.0);
    assert_eq!(c.x(), 50.0);

    // 错误里带有精灵句柄，宿主可以据此取消失败的实例
    assert!(scheduler.cancel(id_b, Property::X).is_some());
    let events = scheduler.advance(1.0).unwrap();
    assert_eq!(c.x(), 60.0);
    assert!(events.iter().any(|e| e.is_completed() && e.sprite() == id_a));
    assert!(
        events
            .iter()
            .any(|e| matches!(e, AnimationEvent::Cancelled { sprite, .. } if *sprite == id_b))
    );
}

#[test]
fn test_events_can_be_taken_after_failed_advance() {
    let (mut scheduler, _sprite, id) = setup(0.0, 0.0);
    let spec = AnimationSpec::relative(Property::X, 1.0, |p| Value::from((p, p))).unwrap();
    // 注册时曲线在进度 0 处已是 Vec2，直接拒绝
    assert!(scheduler.register(id, spec.shared()).is_err());

    let flip = AnimationSpec::relative(Property::Y, 1.0, |p| {
        if p > 0.0 {
            Value::image("oops.png")
        } else {
            Value::Float(0.0)
        }
    })
    .unwrap();
    let anim = scheduler.register(id, flip.shared()).unwrap();

    assert!(scheduler.advance(0.5).is_err());
    let events = scheduler.take_events();
    assert_eq!(
        events,
        vec![AnimationEvent::Started {
            id: anim,
            sprite: id,
            property: Property::Y,
        }]
    );
    assert!(scheduler.take_events().is_empty());
}

#[test]
#[should_panic(expected = "curve exploded")]
fn test_curve_panic_propagates() {
    let (mut scheduler, _sprite, id) = setup(0.0, 0.0);
    let spec = AnimationSpec::absolute(Property::X, 1.0, |p| {
        if p > 0.5 {
            panic!("curve exploded");
        }
        Value::Float(p)
    })
    .unwrap();
    scheduler.register(id, spec.shared()).unwrap();
    let _ = scheduler.advance(1.0);
}

/// 回调按精灵加入顺序、精灵内注册顺序依次调用
#[test]
fn test_callback_order_follows_sprite_then_registration_order() {
    let mut scheduler = AnimationScheduler::new();
    let first = scheduler.add_sprite(Rc::new(Sprite::new("first")));
    let second = scheduler.add_sprite(Rc::new(Sprite::new("second")));
    let log = Rc::new(RefCell::new(Vec::new()));

    let spec = |property| {
        AnimationSpec::absolute(property, 1.0, |p| Value::Float(p))
            .unwrap()
            .shared()
    };

    scheduler
        .register_with_callback(second, spec(Property::X), recorder(log.clone(), "second.x"))
        .unwrap();
    scheduler
        .register_with_callback(first, spec(Property::Y), recorder(log.clone(), "first.y"))
        .unwrap();
    scheduler
        .register_with_callback(first, spec(Property::X), recorder(log.clone(), "first.x"))
        .unwrap();

    scheduler.advance(1.0).unwrap();
    assert_eq!(*log.borrow(), vec!["first.y", "first.x", "second.x"]);
}

/// 回调执行时，本帧所有属性都已写入
#[test]
fn test_callbacks_run_after_all_writes() {
    let mut scheduler = AnimationScheduler::new();
    let a = Sprite::new("a");
    let b = Sprite::new("b");
    let id_a = scheduler.add_sprite(Rc::new(a.clone()));
    let id_b = scheduler.add_sprite(Rc::new(b.clone()));

    let observed = Rc::new(Cell::new(f32::NAN));
    let slot = observed.clone();
    let b_view = b.clone();

    let short = AnimationSpec::absolute(Property::X, 1.0, |p| Value::Float(p)).unwrap();
    let long = AnimationSpec::absolute(Property::X, 2.0, |p| Value::Float(40.0 * p)).unwrap();
    scheduler
        .register_with_callback(id_a, short.shared(), move |_| slot.set(b_view.x()))
        .unwrap();
    scheduler.register(id_b, long.shared()).unwrap();

    scheduler.advance(1.0).unwrap();
    assert_eq!(observed.get(), 20.0);
    assert_eq!(a.x(), 1.0);
}

/// 回调中重新注册同一属性：新实例从下一帧开始计时
#[test]
fn test_chain_same_property_from_callback() {
    let (mut scheduler, sprite, id) = setup(0.0, 0.0);

    let slide = AnimationSpec::absolute(Property::X, 1.0, |p| Value::Float(100.0 * p)).unwrap();
    let nudge = AnimationSpec::relative(Property::X, 1.0, |p| Value::Float(10.0 * p))
        .unwrap()
        .shared();

    let chained = Rc::new(Cell::new(None));
    let slot = chained.clone();
    scheduler
        .register_with_callback(id, slide.shared(), move |s| {
            slot.set(s.register(id, nudge).ok());
        })
        .unwrap();

    let events = scheduler.advance(1.0).unwrap();
    let next = chained.get().expect("chained registration should succeed");
    assert_eq!(sprite.x(), 100.0);
    assert!(scheduler.is_animating(id, Property::X));
    assert_eq!(scheduler.progress(next), Some(0.0));

    let events: Vec<String> = events
        .iter()
        .chain(scheduler.advance(1.0).unwrap().iter())
        .map(ToString::to_string)
        .collect();
    assert_eq!(sprite.x(), 110.0);

    insta::assert_snapshot!(events.join("\n"), @r"
    started #1 sprite=1 x
    completed #1 sprite=1 x
    started #2 sprite=1 x
    completed #2 sprite=1 x
    ");
}

/// 回调中为其他精灵注册的动画不会在本帧推进
#[test]
fn test_chain_other_sprite_not_advanced_same_tick() {
    let mut scheduler = AnimationScheduler::new();
    let a = scheduler.add_sprite(Rc::new(Sprite::new("a")));
    let b_sprite = Sprite::at("b", 0.0, 3.0);
    let b = scheduler.add_sprite(Rc::new(b_sprite.clone()));

    let follow = AnimationSpec::absolute(Property::Y, 1.0, |p| Value::Float(10.0 * p))
        .unwrap()
        .shared();
    let lead = AnimationSpec::absolute(Property::X, 1.0, |p| Value::Float(p)).unwrap();
    scheduler
        .register_with_callback(a, lead.shared(), move |s| {
            s.register(b, follow).unwrap();
        })
        .unwrap();

    scheduler.advance(1.0).unwrap();
    assert!(scheduler.is_animating(b, Property::Y));
    assert_eq!(b_sprite.y(), 3.0);

    scheduler.advance(0.5).unwrap();
    assert_eq!(b_sprite.y(), 5.0);
}

/// 同一帧完成的回调全部触发，即使前面的回调移除了后面回调所属的精灵
#[test]
fn test_same_tick_callbacks_survive_sprite_removal() {
    let mut scheduler = AnimationScheduler::new();
    let a = scheduler.add_sprite(Rc::new(Sprite::new("a")));
    let b = scheduler.add_sprite(Rc::new(Sprite::new("b")));
    let log = Rc::new(RefCell::new(Vec::new()));

    let spec = AnimationSpec::absolute(Property::X, 1.0, |p| Value::Float(p))
        .unwrap()
        .shared();
    let log_a = log.clone();
    scheduler
        .register_with_callback(a, spec.clone(), move |s| {
            s.remove_sprite(b);
            log_a.borrow_mut().push("a".to_string());
        })
        .unwrap();
    scheduler
        .register_with_callback(b, spec, recorder(log.clone(), "b"))
        .unwrap();

    let events = scheduler.advance(1.0).unwrap();
    assert_eq!(*log.borrow(), vec!["a", "b"]);
    assert!(!scheduler.contains_sprite(b));
    // b 的实例在回调前已完成移除，不会再产生取消事件
    assert!(
        !events
            .iter()
            .any(|e| matches!(e, AnimationEvent::Cancelled { .. }))
    );
}
