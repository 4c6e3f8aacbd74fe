//! 位姿快照数据结构

use glam::{Quat, Vec3};

/// 单个骨骼的位姿记录
///
/// 旋转恒以规范形式存储（w 分量非负），q 与 -q 表示同一旋转。
#[derive(Clone, Debug, PartialEq)]
pub struct BoneRecord {
    pub name: String,
    pub position: Vec3,
    pub rotation: Quat,
}

impl BoneRecord {
    pub fn new(name: impl Into<String>, position: Vec3, rotation: Quat) -> Self {
        Self {
            name: name.into(),
            position,
            rotation: canonicalize(rotation),
        }
    }
}

/// 规范化四元数：w < 0 时四个分量同时取反
pub fn canonicalize(q: Quat) -> Quat {
    if q.w < 0.0 {
        -q
    } else {
        q
    }
}

/// VPD Morph 记录（MMM 扩展，仅文本格式携带）
#[derive(Clone, Debug, PartialEq)]
pub struct PoseMorph {
    pub name: String,
    pub weight: f32,
}

/// 位姿文档
///
/// 记录顺序 = 文件顺序。解析返回后不可变，
/// 由消费方逐条应用到活动骨架的同名骨骼上。
#[derive(Clone, Debug, Default)]
pub struct PoseDocument {
    pub model_name: String,
    pub records: Vec<BoneRecord>,
    pub morphs: Vec<PoseMorph>,
}

impl PoseDocument {
    /// 骨骼记录数量
    pub fn bone_count(&self) -> usize {
        self.records.len()
    }

    /// 按名称查找骨骼记录
    pub fn find(&self, name: &str) -> Option<&BoneRecord> {
        self.records.iter().find(|r| r.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonicalize_negative_w() {
        let q = Quat::from_xyzw(0.1, 0.2, 0.3, -0.9);
        let c = canonicalize(q);
        assert_eq!(c, Quat::from_xyzw(-0.1, -0.2, -0.3, 0.9));
    }

    #[test]
    fn test_canonicalize_positive_w_unchanged() {
        let q = Quat::from_xyzw(0.1, 0.2, 0.3, 0.9);
        assert_eq!(canonicalize(q), q);
    }

    #[test]
    fn test_record_stores_canonical_rotation() {
        let r = BoneRecord::new("頭", Vec3::ZERO, Quat::from_xyzw(0.0, 0.0, 0.8, -0.6));
        assert!(r.rotation.w >= 0.0);
        assert_eq!(r.rotation, Quat::from_xyzw(0.0, 0.0, -0.8, 0.6));
    }

    #[test]
    fn test_find_by_name() {
        let doc = PoseDocument {
            model_name: String::new(),
            records: vec![
                BoneRecord::new("左腕", Vec3::X, Quat::IDENTITY),
                BoneRecord::new("右腕", Vec3::Y, Quat::IDENTITY),
            ],
            morphs: Vec::new(),
        };
        assert_eq!(doc.find("右腕").unwrap().position, Vec3::Y);
        assert!(doc.find("しっぽ").is_none());
    }
}
