//! 骨架重定向
//!
//! 把为一套骨架命名惯例制作的动作数据改写为驱动另一套
//! 同拓扑、异命名骨架。角色表（语义角色 → 骨骼名）两两配对
//! 得到名称映射表，重定向即按映射表改写动作文档的通道名。

mod mapping;
mod retargeter;
mod role;
mod skeleton;

pub use mapping::BoneMapping;
pub use retargeter::{IkChain, RetargetingConfig, SkeletonRetargeter};
pub use role::BoneRole;
pub use skeleton::HumanoidSkeleton;
