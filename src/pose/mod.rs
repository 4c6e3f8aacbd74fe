//! VPD 位姿快照解析与应用

mod apply;
mod decoder;
mod document;

pub use apply::{plan_updates, BoneUpdate};
pub use decoder::{decode, decode_with_hint, FormatHint};
pub use document::{canonicalize, BoneRecord, PoseDocument, PoseMorph};
