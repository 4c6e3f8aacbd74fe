//! MMD 位姿/动作重定向核心
//!
//! 提供两个纯数据变换组件：
//! - VPD 位姿文件解码（二进制/文本双格式，启发式格式判别）
//! - 骨架重定向（语义角色映射 + 动作通道名称改写）
//!
//! 以及支撑它们的类型化动作文档（VMD 解析、混合组合器）。
//! 渲染、物理、播放调度均由外部运行时负责，本 crate 只做
//! 内存缓冲区到数据结构的单遍同步变换。

pub mod motion;
pub mod pose;
pub mod retarget;

pub use motion::{blend, BlendMode, BoneChannel, MorphChannel, MotionDocument, VmdFile};
pub use pose::{BoneRecord, FormatHint, PoseDocument};
pub use retarget::{BoneMapping, BoneRole, HumanoidSkeleton, RetargetingConfig, SkeletonRetargeter};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RetargetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Pose format error: {0}")]
    Format(String),

    #[error("VMD parse error: {0}")]
    VmdParse(String),
}

pub type Result<T> = std::result::Result<T, RetargetError>;
