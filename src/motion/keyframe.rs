//! 动作关键帧

use glam::{Quat, Vec3};

/// VMD 线性插值控制点
const LINEAR_INTERPOLATION: [u8; 4] = [20, 20, 107, 107];

/// 骨骼关键帧
///
/// 插值参数为 VMD 原始贝塞尔控制点（x1,y1,x2,y2，0..=127），
/// 本 crate 只搬运不求值，曲线求值属于外部运行时。
#[derive(Clone, Debug, PartialEq)]
pub struct BoneKeyframe {
    pub frame: u32,
    pub translation: Vec3,
    pub rotation: Quat,
    pub interpolation_x: [u8; 4],
    pub interpolation_y: [u8; 4],
    pub interpolation_z: [u8; 4],
    pub interpolation_r: [u8; 4],
}

impl BoneKeyframe {
    pub fn new(frame: u32) -> Self {
        Self {
            frame,
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            interpolation_x: LINEAR_INTERPOLATION,
            interpolation_y: LINEAR_INTERPOLATION,
            interpolation_z: LINEAR_INTERPOLATION,
            interpolation_r: LINEAR_INTERPOLATION,
        }
    }
}

/// Morph 关键帧
#[derive(Clone, Debug, PartialEq)]
pub struct MorphKeyframe {
    pub frame: u32,
    pub weight: f32,
}

impl MorphKeyframe {
    pub fn new(frame: u32, weight: f32) -> Self {
        Self { frame, weight }
    }
}

/// 相机插值参数（6 组贝塞尔控制点）
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CameraInterpolation {
    pub lookat_x: [u8; 4],
    pub lookat_y: [u8; 4],
    pub lookat_z: [u8; 4],
    pub angle: [u8; 4],
    pub distance: [u8; 4],
    pub fov: [u8; 4],
}

/// 相机关键帧
#[derive(Clone, Debug, PartialEq)]
pub struct CameraKeyframe {
    pub frame: u32,
    pub distance: f32,
    pub look_at: Vec3,
    /// 欧拉角，弧度
    pub angle: Vec3,
    pub fov: f32,
    pub is_perspective: bool,
    pub interpolation: CameraInterpolation,
}
