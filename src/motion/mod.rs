//! 类型化动作文档
//!
//! 动作数据以显式标注的文档类型表示：逐骨骼通道、Morph 通道、
//! 可选相机通道。重定向与混合都是文档到文档的纯变换。

mod blend;
mod document;
mod keyframe;
mod vmd;

pub use blend::{blend, BlendMode};
pub use document::{BoneChannel, CameraChannel, MorphChannel, MotionDocument};
pub use keyframe::{BoneKeyframe, CameraInterpolation, CameraKeyframe, MorphKeyframe};
pub use vmd::VmdFile;
