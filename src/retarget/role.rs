//! 语义骨骼角色

/// 语义骨骼角色（与具体骨架的命名惯例无关）
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoneRole {
    Hips,
    Spine,
    Chest,
    Neck,
    Head,

    LeftShoulder,
    LeftUpperArm,
    LeftLowerArm,
    LeftHand,
    RightShoulder,
    RightUpperArm,
    RightLowerArm,
    RightHand,

    LeftUpperLeg,
    LeftLowerLeg,
    LeftFoot,
    LeftToes,
    RightUpperLeg,
    RightLowerLeg,
    RightFoot,
    RightToes,

    LeftThumbProximal,
    LeftThumbIntermediate,
    LeftThumbDistal,
    LeftIndexProximal,
    LeftIndexIntermediate,
    LeftIndexDistal,
    LeftMiddleProximal,
    LeftMiddleIntermediate,
    LeftMiddleDistal,
    LeftRingProximal,
    LeftRingIntermediate,
    LeftRingDistal,
    LeftLittleProximal,
    LeftLittleIntermediate,
    LeftLittleDistal,

    RightThumbProximal,
    RightThumbIntermediate,
    RightThumbDistal,
    RightIndexProximal,
    RightIndexIntermediate,
    RightIndexDistal,
    RightMiddleProximal,
    RightMiddleIntermediate,
    RightMiddleDistal,
    RightRingProximal,
    RightRingIntermediate,
    RightRingDistal,
    RightLittleProximal,
    RightLittleIntermediate,
    RightLittleDistal,
}

impl BoneRole {
    /// 全部角色，枚举顺序 = 映射表构造顺序
    pub const ALL: [BoneRole; 51] = [
        BoneRole::Hips,
        BoneRole::Spine,
        BoneRole::Chest,
        BoneRole::Neck,
        BoneRole::Head,
        BoneRole::LeftShoulder,
        BoneRole::LeftUpperArm,
        BoneRole::LeftLowerArm,
        BoneRole::LeftHand,
        BoneRole::RightShoulder,
        BoneRole::RightUpperArm,
        BoneRole::RightLowerArm,
        BoneRole::RightHand,
        BoneRole::LeftUpperLeg,
        BoneRole::LeftLowerLeg,
        BoneRole::LeftFoot,
        BoneRole::LeftToes,
        BoneRole::RightUpperLeg,
        BoneRole::RightLowerLeg,
        BoneRole::RightFoot,
        BoneRole::RightToes,
        BoneRole::LeftThumbProximal,
        BoneRole::LeftThumbIntermediate,
        BoneRole::LeftThumbDistal,
        BoneRole::LeftIndexProximal,
        BoneRole::LeftIndexIntermediate,
        BoneRole::LeftIndexDistal,
        BoneRole::LeftMiddleProximal,
        BoneRole::LeftMiddleIntermediate,
        BoneRole::LeftMiddleDistal,
        BoneRole::LeftRingProximal,
        BoneRole::LeftRingIntermediate,
        BoneRole::LeftRingDistal,
        BoneRole::LeftLittleProximal,
        BoneRole::LeftLittleIntermediate,
        BoneRole::LeftLittleDistal,
        BoneRole::RightThumbProximal,
        BoneRole::RightThumbIntermediate,
        BoneRole::RightThumbDistal,
        BoneRole::RightIndexProximal,
        BoneRole::RightIndexIntermediate,
        BoneRole::RightIndexDistal,
        BoneRole::RightMiddleProximal,
        BoneRole::RightMiddleIntermediate,
        BoneRole::RightMiddleDistal,
        BoneRole::RightRingProximal,
        BoneRole::RightRingIntermediate,
        BoneRole::RightRingDistal,
        BoneRole::RightLittleProximal,
        BoneRole::RightLittleIntermediate,
        BoneRole::RightLittleDistal,
    ];

    /// 必备角色：任一人形骨架都必须给出非空名称
    pub const MANDATORY: [BoneRole; 16] = [
        BoneRole::Hips,
        BoneRole::Spine,
        BoneRole::Neck,
        BoneRole::Head,
        BoneRole::LeftUpperArm,
        BoneRole::LeftLowerArm,
        BoneRole::LeftHand,
        BoneRole::RightUpperArm,
        BoneRole::RightLowerArm,
        BoneRole::RightHand,
        BoneRole::LeftUpperLeg,
        BoneRole::LeftLowerLeg,
        BoneRole::LeftFoot,
        BoneRole::RightUpperLeg,
        BoneRole::RightLowerLeg,
        BoneRole::RightFoot,
    ];

    /// 是否必备角色
    pub fn is_mandatory(self) -> bool {
        Self::MANDATORY.contains(&self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_contains_mandatory() {
        for role in BoneRole::MANDATORY {
            assert!(BoneRole::ALL.contains(&role));
        }
    }

    #[test]
    fn test_mandatory_classification() {
        assert!(BoneRole::Hips.is_mandatory());
        assert!(!BoneRole::LeftShoulder.is_mandatory());
        assert!(!BoneRole::LeftThumbProximal.is_mandatory());
    }
}
