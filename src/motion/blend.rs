//! 动作混合组合器
//!
//! 运行时只接受单一活动动画（整体替换，不做多轨并行播放），
//! 因此"混合"在核心侧完成：一个组合器函数把两个动作文档
//! 压平成一个再交给运行时。
//!
//! - Override：逐通道后写覆盖
//! - Additive：通道值逐帧数值叠加（关键帧间线性采样，
//!   贝塞尔整形由运行时负责）

use glam::{Quat, Vec3};

use super::document::{BoneChannel, MorphChannel, MotionDocument};
use super::keyframe::{BoneKeyframe, MorphKeyframe};

/// 混合模式
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendMode {
    /// 叠加层整体替换同名通道
    Override,
    /// 叠加层按权重数值叠加到基础层
    Additive,
}

/// 混合两个动作文档，返回压平后的新文档
///
/// 两个输入都不会被修改。`weight` 只对 Additive 有效，
/// 被钳制到 [0, 1]。相机通道取叠加层（存在时），否则保留基础层。
pub fn blend(
    base: &MotionDocument,
    overlay: &MotionDocument,
    mode: BlendMode,
    weight: f32,
) -> MotionDocument {
    let weight = weight.clamp(0.0, 1.0);
    let mut out = base.clone();

    match mode {
        BlendMode::Override => {
            for channel in &overlay.bone_channels {
                replace_or_push_bone(&mut out, channel.clone());
            }
            for channel in &overlay.morph_channels {
                replace_or_push_morph(&mut out, channel.clone());
            }
        }
        BlendMode::Additive => {
            for channel in &overlay.bone_channels {
                match base.bone_channel(&channel.bone_name) {
                    Some(base_channel) => {
                        let combined = add_bone_channels(base_channel, channel, weight);
                        replace_or_push_bone(&mut out, combined);
                    }
                    None => {
                        // 基础层没有该通道：叠加到静止姿态上
                        let scaled = scale_bone_channel(channel, weight);
                        out.bone_channels.push(scaled);
                    }
                }
            }
            for channel in &overlay.morph_channels {
                match base.morph_channel(&channel.morph_name) {
                    Some(base_channel) => {
                        let combined = add_morph_channels(base_channel, channel, weight);
                        replace_or_push_morph(&mut out, combined);
                    }
                    None => {
                        let scaled = MorphChannel {
                            morph_name: channel.morph_name.clone(),
                            keyframes: channel
                                .keyframes
                                .iter()
                                .map(|k| MorphKeyframe::new(k.frame, k.weight * weight))
                                .collect(),
                        };
                        out.morph_channels.push(scaled);
                    }
                }
            }
        }
    }

    if overlay.camera_channel.is_some() {
        out.camera_channel = overlay.camera_channel.clone();
    }

    out
}

fn replace_or_push_bone(doc: &mut MotionDocument, channel: BoneChannel) {
    match doc
        .bone_channels
        .iter()
        .position(|c| c.bone_name == channel.bone_name)
    {
        Some(i) => doc.bone_channels[i] = channel,
        None => doc.bone_channels.push(channel),
    }
}

fn replace_or_push_morph(doc: &mut MotionDocument, channel: MorphChannel) {
    match doc
        .morph_channels
        .iter()
        .position(|c| c.morph_name == channel.morph_name)
    {
        Some(i) => doc.morph_channels[i] = channel,
        None => doc.morph_channels.push(channel),
    }
}

/// 两条骨骼通道按帧并集叠加
fn add_bone_channels(base: &BoneChannel, overlay: &BoneChannel, weight: f32) -> BoneChannel {
    let mut frames: Vec<u32> = base
        .keyframes
        .iter()
        .chain(overlay.keyframes.iter())
        .map(|k| k.frame)
        .collect();
    frames.sort_unstable();
    frames.dedup();

    let keyframes = frames
        .into_iter()
        .map(|frame| {
            let (bt, br) = sample_bone(base, frame);
            let (ot, or) = sample_bone(overlay, frame);

            let mut kf = BoneKeyframe::new(frame);
            kf.translation = bt + ot * weight;
            kf.rotation = (br * Quat::IDENTITY.slerp(or, weight)).normalize();
            kf
        })
        .collect();

    BoneChannel {
        bone_name: base.bone_name.clone(),
        keyframes,
    }
}

/// 两条 Morph 通道按帧并集叠加
fn add_morph_channels(base: &MorphChannel, overlay: &MorphChannel, weight: f32) -> MorphChannel {
    let mut frames: Vec<u32> = base
        .keyframes
        .iter()
        .chain(overlay.keyframes.iter())
        .map(|k| k.frame)
        .collect();
    frames.sort_unstable();
    frames.dedup();

    let keyframes = frames
        .into_iter()
        .map(|frame| {
            let b = sample_morph(base, frame);
            let o = sample_morph(overlay, frame);
            MorphKeyframe::new(frame, b + o * weight)
        })
        .collect();

    MorphChannel {
        morph_name: base.morph_name.clone(),
        keyframes,
    }
}

/// 按权重缩放通道（相当于与静止姿态叠加）
fn scale_bone_channel(channel: &BoneChannel, weight: f32) -> BoneChannel {
    let keyframes = channel
        .keyframes
        .iter()
        .map(|k| {
            let mut kf = k.clone();
            kf.translation = k.translation * weight;
            kf.rotation = Quat::IDENTITY.slerp(k.rotation, weight).normalize();
            kf
        })
        .collect();
    BoneChannel {
        bone_name: channel.bone_name.clone(),
        keyframes,
    }
}

/// 在通道内线性采样指定帧的变换
///
/// 首帧之前取首帧值，末帧之后取末帧值，空通道取静止姿态。
fn sample_bone(channel: &BoneChannel, frame: u32) -> (Vec3, Quat) {
    let keys = &channel.keyframes;
    if keys.is_empty() {
        return (Vec3::ZERO, Quat::IDENTITY);
    }

    match keys.binary_search_by_key(&frame, |k| k.frame) {
        Ok(i) => (keys[i].translation, keys[i].rotation),
        Err(i) => {
            if i == 0 {
                (keys[0].translation, keys[0].rotation)
            } else if i == keys.len() {
                let last = &keys[keys.len() - 1];
                (last.translation, last.rotation)
            } else {
                let prev = &keys[i - 1];
                let next = &keys[i];
                let span = (next.frame - prev.frame) as f32;
                let t = (frame - prev.frame) as f32 / span;
                (
                    prev.translation.lerp(next.translation, t),
                    prev.rotation.slerp(next.rotation, t),
                )
            }
        }
    }
}

/// 在 Morph 通道内线性采样指定帧的权重
fn sample_morph(channel: &MorphChannel, frame: u32) -> f32 {
    let keys = &channel.keyframes;
    if keys.is_empty() {
        return 0.0;
    }

    match keys.binary_search_by_key(&frame, |k| k.frame) {
        Ok(i) => keys[i].weight,
        Err(i) => {
            if i == 0 {
                keys[0].weight
            } else if i == keys.len() {
                keys[keys.len() - 1].weight
            } else {
                let prev = &keys[i - 1];
                let next = &keys[i];
                let span = (next.frame - prev.frame) as f32;
                let t = (frame - prev.frame) as f32 / span;
                prev.weight + (next.weight - prev.weight) * t
            }
        }
    }
}
