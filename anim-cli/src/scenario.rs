//! # Scenario 模块
//!
//! 内置演示场景：创建精灵并注册初始动画，返回宿主持有的精灵克隆。

use std::f32::consts::TAU;
use std::rc::Rc;

use anim_runtime::{
    AnimResult, AnimationScheduler, AnimationSpec, Property, Sprite, SpriteId, Value, Vec2,
};
use clap::ValueEnum;
use tracing::warn;

/// 演示场景
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Scenario {
    /// 两个精灵平移，其中一个同时淡出
    Slide,
    /// 通过完成回调串联三段动画
    Chain,
    /// 相对模式绕圈并切换帧图像
    Orbit,
}

impl Scenario {
    /// 构建场景
    pub fn build(self, scheduler: &mut AnimationScheduler) -> AnimResult<Vec<Sprite>> {
        match self {
            Self::Slide => build_slide(scheduler),
            Self::Chain => build_chain(scheduler),
            Self::Orbit => build_orbit(scheduler),
        }
    }
}

fn add(scheduler: &mut AnimationScheduler, sprite: &Sprite) -> SpriteId {
    scheduler.add_sprite(Rc::new(sprite.clone()))
}

fn build_slide(scheduler: &mut AnimationScheduler) -> AnimResult<Vec<Sprite>> {
    let left = Sprite::at("left", 0.0, 100.0);
    let right = Sprite::at("right", 640.0, 200.0);
    let left_id = add(scheduler, &left);
    let right_id = add(scheduler, &right);

    let slide_in = AnimationSpec::absolute(Property::X, 2.0, |p| Value::Float(320.0 * p))?;
    let slide_out = AnimationSpec::relative(Property::X, 1.5, |p| Value::Float(-320.0 * p))?;
    let fade = AnimationSpec::absolute(Property::Alpha, 1.5, |p| Value::Float(1.0 - p))?;

    scheduler.register(left_id, slide_in.shared())?;
    scheduler.register(right_id, slide_out.shared())?;
    scheduler.register(right_id, fade.shared())?;

    Ok(vec![left, right])
}

fn build_chain(scheduler: &mut AnimationScheduler) -> AnimResult<Vec<Sprite>> {
    let runner = Sprite::at("runner", 0.0, 0.0);
    let id = add(scheduler, &runner);

    let right = AnimationSpec::relative(Property::X, 1.0, |p| Value::Float(120.0 * p))?;
    let down = AnimationSpec::relative(Property::Y, 0.5, |p| Value::Float(60.0 * p))?.shared();
    let grow = AnimationSpec::absolute(Property::Scale, 0.5, |p| Value::Float(1.0 + p))?.shared();

    scheduler.register_with_callback(id, right.shared(), move |s| {
        let next = s.register_with_callback(id, down, move |s| {
            if let Err(e) = s.register(id, grow) {
                warn!(error = %e, "串联缩放动画失败");
            }
        });
        if let Err(e) = next {
            warn!(error = %e, "串联下移动画失败");
        }
    })?;

    Ok(vec![runner])
}

fn build_orbit(scheduler: &mut AnimationScheduler) -> AnimResult<Vec<Sprite>> {
    let planet = Sprite::at("planet", 320.0, 240.0);
    planet.set_image("planet_0.png");
    let id = add(scheduler, &planet);

    let radius = 80.0;
    let orbit = AnimationSpec::relative(Property::Position, 3.0, move |p| {
        let angle = TAU * p;
        Value::Vec2(Vec2::new(radius * angle.cos() - radius, radius * angle.sin()))
    })?;

    let frames = ["planet_0.png", "planet_1.png", "planet_2.png"];
    let spin = AnimationSpec::absolute(Property::Image, 3.0, move |p| {
        let index = ((p * frames.len() as f32) as usize).min(frames.len() - 1);
        Value::image(frames[index])
    })?;

    scheduler.register(id, orbit.shared())?;
    scheduler.register(id, spin.shared())?;

    Ok(vec![planet])
}
