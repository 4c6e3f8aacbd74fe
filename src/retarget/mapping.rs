//! 骨骼名称映射表

use std::collections::HashMap;

use super::role::BoneRole;
use super::skeleton::HumanoidSkeleton;

/// 源骨骼名 → 目标骨骼名 的映射表
///
/// 键唯一、区分大小写、仅做精确匹配。保持插入顺序，
/// 便于按确定顺序枚举映射对。
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BoneMapping {
    pairs: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl BoneMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// 由两张角色表配对构造：对每个两边都配置了名称的角色，
    /// 生成一条 源名 → 目标名 映射
    pub fn from_skeletons(source: &HumanoidSkeleton, target: &HumanoidSkeleton) -> Self {
        let mut mapping = Self::new();
        for role in BoneRole::ALL {
            if let (Some(s), Some(t)) = (source.role_name(role), target.role_name(role)) {
                mapping.insert(s, t);
            }
        }
        mapping
    }

    /// 插入映射；键已存在时覆盖原值（覆盖优先）
    pub fn insert(&mut self, source: impl Into<String>, target: impl Into<String>) {
        let source = source.into();
        let target = target.into();
        match self.index.get(&source).copied() {
            Some(i) => self.pairs[i].1 = target,
            None => {
                self.index.insert(source.clone(), self.pairs.len());
                self.pairs.push((source, target));
            }
        }
    }

    /// 合并调用方覆盖表：同键覆盖默认值，其余默认保留
    pub fn merge_overrides<I, K, V>(&mut self, overrides: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (source, target) in overrides {
            self.insert(source, target);
        }
    }

    /// 查询目标骨骼名
    pub fn get(&self, source: &str) -> Option<&str> {
        self.index
            .get(source)
            .map(|&i| self.pairs[i].1.as_str())
    }

    pub fn contains(&self, source: &str) -> bool {
        self.index.contains_key(source)
    }

    /// 全部映射对（插入顺序）
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_skeletons_pairs_common_roles() {
        let mapping = BoneMapping::from_skeletons(
            &HumanoidSkeleton::latin_reference(),
            &HumanoidSkeleton::mmd_standard(),
        );
        // 两张内置角色表都齐全，映射对数量 = 角色总数
        assert_eq!(mapping.len(), BoneRole::ALL.len());
        assert_eq!(mapping.get("leftUpperArm"), Some("左腕"));
        assert_eq!(mapping.get("hips"), Some("センター"));
    }

    #[test]
    fn test_role_missing_on_either_side_skipped() {
        let mut source = HumanoidSkeleton::new("src");
        source.set_role(BoneRole::Hips, "hips");
        source.set_role(BoneRole::Head, "head");

        let mut target = HumanoidSkeleton::new("dst");
        target.set_role(BoneRole::Hips, "センター");

        let mapping = BoneMapping::from_skeletons(&source, &target);
        assert_eq!(mapping.len(), 1);
        assert!(mapping.contains("hips"));
        assert!(!mapping.contains("head"));
    }

    #[test]
    fn test_override_wins_on_collision() {
        let mut mapping = BoneMapping::new();
        mapping.insert("hips", "センター");
        mapping.merge_overrides([("hips", "グルーブ"), ("tail", "しっぽ")]);

        assert_eq!(mapping.get("hips"), Some("グルーブ"));
        assert_eq!(mapping.get("tail"), Some("しっぽ"));
        assert_eq!(mapping.len(), 2);
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let mut mapping = BoneMapping::new();
        mapping.insert("Hips", "センター");
        assert_eq!(mapping.get("hips"), None);
    }

    #[test]
    fn test_pairs_preserve_insertion_order() {
        let mut mapping = BoneMapping::new();
        mapping.insert("b", "2");
        mapping.insert("a", "1");
        mapping.insert("b", "3");

        let keys: Vec<&str> = mapping.pairs().iter().map(|(s, _)| s.as_str()).collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(mapping.get("b"), Some("3"));
    }
}
