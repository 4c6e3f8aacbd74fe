//! 人形骨架角色表

use std::collections::HashMap;

use super::role::BoneRole;

/// 拉丁命名参考骨架的角色表（VRM 人形命名）
const LATIN_ROLES: [(BoneRole, &str); 51] = [
    (BoneRole::Hips, "hips"),
    (BoneRole::Spine, "spine"),
    (BoneRole::Chest, "chest"),
    (BoneRole::Neck, "neck"),
    (BoneRole::Head, "head"),
    (BoneRole::LeftShoulder, "leftShoulder"),
    (BoneRole::LeftUpperArm, "leftUpperArm"),
    (BoneRole::LeftLowerArm, "leftLowerArm"),
    (BoneRole::LeftHand, "leftHand"),
    (BoneRole::RightShoulder, "rightShoulder"),
    (BoneRole::RightUpperArm, "rightUpperArm"),
    (BoneRole::RightLowerArm, "rightLowerArm"),
    (BoneRole::RightHand, "rightHand"),
    (BoneRole::LeftUpperLeg, "leftUpperLeg"),
    (BoneRole::LeftLowerLeg, "leftLowerLeg"),
    (BoneRole::LeftFoot, "leftFoot"),
    (BoneRole::LeftToes, "leftToes"),
    (BoneRole::RightUpperLeg, "rightUpperLeg"),
    (BoneRole::RightLowerLeg, "rightLowerLeg"),
    (BoneRole::RightFoot, "rightFoot"),
    (BoneRole::RightToes, "rightToes"),
    (BoneRole::LeftThumbProximal, "leftThumbProximal"),
    (BoneRole::LeftThumbIntermediate, "leftThumbIntermediate"),
    (BoneRole::LeftThumbDistal, "leftThumbDistal"),
    (BoneRole::LeftIndexProximal, "leftIndexProximal"),
    (BoneRole::LeftIndexIntermediate, "leftIndexIntermediate"),
    (BoneRole::LeftIndexDistal, "leftIndexDistal"),
    (BoneRole::LeftMiddleProximal, "leftMiddleProximal"),
    (BoneRole::LeftMiddleIntermediate, "leftMiddleIntermediate"),
    (BoneRole::LeftMiddleDistal, "leftMiddleDistal"),
    (BoneRole::LeftRingProximal, "leftRingProximal"),
    (BoneRole::LeftRingIntermediate, "leftRingIntermediate"),
    (BoneRole::LeftRingDistal, "leftRingDistal"),
    (BoneRole::LeftLittleProximal, "leftLittleProximal"),
    (BoneRole::LeftLittleIntermediate, "leftLittleIntermediate"),
    (BoneRole::LeftLittleDistal, "leftLittleDistal"),
    (BoneRole::RightThumbProximal, "rightThumbProximal"),
    (BoneRole::RightThumbIntermediate, "rightThumbIntermediate"),
    (BoneRole::RightThumbDistal, "rightThumbDistal"),
    (BoneRole::RightIndexProximal, "rightIndexProximal"),
    (BoneRole::RightIndexIntermediate, "rightIndexIntermediate"),
    (BoneRole::RightIndexDistal, "rightIndexDistal"),
    (BoneRole::RightMiddleProximal, "rightMiddleProximal"),
    (BoneRole::RightMiddleIntermediate, "rightMiddleIntermediate"),
    (BoneRole::RightMiddleDistal, "rightMiddleDistal"),
    (BoneRole::RightRingProximal, "rightRingProximal"),
    (BoneRole::RightRingIntermediate, "rightRingIntermediate"),
    (BoneRole::RightRingDistal, "rightRingDistal"),
    (BoneRole::RightLittleProximal, "rightLittleProximal"),
    (BoneRole::RightLittleIntermediate, "rightLittleIntermediate"),
    (BoneRole::RightLittleDistal, "rightLittleDistal"),
];

/// MMD 标准骨架的角色表（日文命名）
const MMD_ROLES: [(BoneRole, &str); 51] = [
    (BoneRole::Hips, "センター"),
    (BoneRole::Spine, "上半身"),
    (BoneRole::Chest, "上半身2"),
    (BoneRole::Neck, "首"),
    (BoneRole::Head, "頭"),
    (BoneRole::LeftShoulder, "左肩"),
    (BoneRole::LeftUpperArm, "左腕"),
    (BoneRole::LeftLowerArm, "左ひじ"),
    (BoneRole::LeftHand, "左手首"),
    (BoneRole::RightShoulder, "右肩"),
    (BoneRole::RightUpperArm, "右腕"),
    (BoneRole::RightLowerArm, "右ひじ"),
    (BoneRole::RightHand, "右手首"),
    (BoneRole::LeftUpperLeg, "左足"),
    (BoneRole::LeftLowerLeg, "左ひざ"),
    (BoneRole::LeftFoot, "左足首"),
    (BoneRole::LeftToes, "左つま先"),
    (BoneRole::RightUpperLeg, "右足"),
    (BoneRole::RightLowerLeg, "右ひざ"),
    (BoneRole::RightFoot, "右足首"),
    (BoneRole::RightToes, "右つま先"),
    (BoneRole::LeftThumbProximal, "左親指０"),
    (BoneRole::LeftThumbIntermediate, "左親指１"),
    (BoneRole::LeftThumbDistal, "左親指２"),
    (BoneRole::LeftIndexProximal, "左人指１"),
    (BoneRole::LeftIndexIntermediate, "左人指２"),
    (BoneRole::LeftIndexDistal, "左人指３"),
    (BoneRole::LeftMiddleProximal, "左中指１"),
    (BoneRole::LeftMiddleIntermediate, "左中指２"),
    (BoneRole::LeftMiddleDistal, "左中指３"),
    (BoneRole::LeftRingProximal, "左薬指１"),
    (BoneRole::LeftRingIntermediate, "左薬指２"),
    (BoneRole::LeftRingDistal, "左薬指３"),
    (BoneRole::LeftLittleProximal, "左小指１"),
    (BoneRole::LeftLittleIntermediate, "左小指２"),
    (BoneRole::LeftLittleDistal, "左小指３"),
    (BoneRole::RightThumbProximal, "右親指０"),
    (BoneRole::RightThumbIntermediate, "右親指１"),
    (BoneRole::RightThumbDistal, "右親指２"),
    (BoneRole::RightIndexProximal, "右人指１"),
    (BoneRole::RightIndexIntermediate, "右人指２"),
    (BoneRole::RightIndexDistal, "右人指３"),
    (BoneRole::RightMiddleProximal, "右中指１"),
    (BoneRole::RightMiddleIntermediate, "右中指２"),
    (BoneRole::RightMiddleDistal, "右中指３"),
    (BoneRole::RightRingProximal, "右薬指１"),
    (BoneRole::RightRingIntermediate, "右薬指２"),
    (BoneRole::RightRingDistal, "右薬指３"),
    (BoneRole::RightLittleProximal, "右小指１"),
    (BoneRole::RightLittleIntermediate, "右小指２"),
    (BoneRole::RightLittleDistal, "右小指３"),
];

/// 人形骨架角色表
///
/// 只描述"角色 → 该骨架下的骨骼名"，不绑定任何活动骨架实例。
/// 可选角色（肩、胸、脚趾、手指）允许缺席。
#[derive(Clone, Debug, PartialEq)]
pub struct HumanoidSkeleton {
    pub name: String,
    roles: HashMap<BoneRole, String>,
}

impl HumanoidSkeleton {
    /// 创建空角色表
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            roles: HashMap::new(),
        }
    }

    /// 从角色表创建
    pub fn with_roles(name: impl Into<String>, roles: &[(BoneRole, &str)]) -> Self {
        let mut skeleton = Self::new(name);
        for (role, bone_name) in roles {
            skeleton.set_role(*role, *bone_name);
        }
        skeleton
    }

    /// 拉丁命名参考骨架（内置）
    pub fn latin_reference() -> Self {
        Self::with_roles("latin-reference", &LATIN_ROLES)
    }

    /// MMD 标准骨架（内置，日文命名）
    pub fn mmd_standard() -> Self {
        Self::with_roles("mmd-standard", &MMD_ROLES)
    }

    /// 设置角色对应的骨骼名
    pub fn set_role(&mut self, role: BoneRole, bone_name: impl Into<String>) {
        self.roles.insert(role, bone_name.into());
    }

    /// 查询角色对应的骨骼名
    pub fn role_name(&self, role: BoneRole) -> Option<&str> {
        self.roles.get(&role).map(String::as_str)
    }

    /// 已配置的角色数量
    pub fn role_count(&self) -> usize {
        self.roles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_skeletons_cover_all_roles() {
        let latin = HumanoidSkeleton::latin_reference();
        let mmd = HumanoidSkeleton::mmd_standard();
        for role in BoneRole::ALL {
            assert!(latin.role_name(role).is_some(), "{:?} missing in latin", role);
            assert!(mmd.role_name(role).is_some(), "{:?} missing in mmd", role);
        }
    }

    #[test]
    fn test_builtin_mandatory_names_nonempty() {
        let mmd = HumanoidSkeleton::mmd_standard();
        for role in BoneRole::MANDATORY {
            assert!(!mmd.role_name(role).unwrap().is_empty());
        }
    }

    #[test]
    fn test_role_lookup() {
        let mmd = HumanoidSkeleton::mmd_standard();
        assert_eq!(mmd.role_name(BoneRole::LeftUpperArm), Some("左腕"));
        assert_eq!(mmd.role_name(BoneRole::Hips), Some("センター"));
    }

    #[test]
    fn test_partial_skeleton() {
        let mut s = HumanoidSkeleton::new("stub");
        s.set_role(BoneRole::Hips, "root");
        assert_eq!(s.role_name(BoneRole::Hips), Some("root"));
        assert_eq!(s.role_name(BoneRole::Head), None);
        assert_eq!(s.role_count(), 1);
    }

    #[test]
    fn test_builtin_role_counts() {
        assert_eq!(
            HumanoidSkeleton::latin_reference().role_count(),
            BoneRole::ALL.len()
        );
        assert_eq!(
            HumanoidSkeleton::mmd_standard().role_count(),
            BoneRole::ALL.len()
        );
    }
}
