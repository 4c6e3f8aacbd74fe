//! 骨架重定向器

use crate::motion::MotionDocument;

use super::mapping::BoneMapping;
use super::role::BoneRole;
use super::skeleton::HumanoidSkeleton;

/// IK 链描述（效应器 / 目标 / 中间骨骼）
///
/// 仅作配置透传：IK 求解由外部运行时完成，本 crate 解析并
/// 保存但不消费。
#[derive(Clone, Debug, PartialEq)]
pub struct IkChain {
    pub effector: String,
    pub target: String,
    pub links: Vec<String>,
}

/// 重定向配置
///
/// 构造后不可变，由单个 [`SkeletonRetargeter`] 独占。
#[derive(Clone, Debug)]
pub struct RetargetingConfig {
    /// 源骨架角色表；缺席时比例计算退化为 1.0
    pub source_skeleton: Option<HumanoidSkeleton>,
    pub target_skeleton: HumanoidSkeleton,
    pub bone_mapping: BoneMapping,
    pub preserve_scale: bool,
    pub use_ik: bool,
    pub ik_chains: Vec<IkChain>,
}

/// 骨架重定向器
///
/// 按配置的名称映射表改写动作文档的骨骼通道名：
/// 映射命中的通道改名，未命中的整条丢弃（目标骨架上不存在的
/// 骨骼与其对应通道一起在源头剪除），Morph 与相机通道原样保留。
pub struct SkeletonRetargeter {
    config: RetargetingConfig,
}

/// 比例估算使用的肢段角色：上臂 + 前臂
const SCALE_LIMB_ROLES: [BoneRole; 2] = [BoneRole::LeftUpperArm, BoneRole::LeftLowerArm];

impl SkeletonRetargeter {
    /// 创建重定向器
    ///
    /// 目标骨架的必备角色名为空时告警但不失败：角色名是否真的
    /// 存在于活动骨架由消费方在绑定时检查。
    pub fn new(config: RetargetingConfig) -> Self {
        validate_skeleton(&config.target_skeleton);
        Self { config }
    }

    /// 拉丁命名参考骨架 → MMD 标准骨架 的默认方向
    pub fn latin_to_mmd<I, K, V>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::builtin_direction(
            HumanoidSkeleton::latin_reference(),
            HumanoidSkeleton::mmd_standard(),
            overrides,
        )
    }

    /// MMD 标准骨架 → 拉丁命名参考骨架 的默认方向
    pub fn mmd_to_latin<I, K, V>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::builtin_direction(
            HumanoidSkeleton::mmd_standard(),
            HumanoidSkeleton::latin_reference(),
            overrides,
        )
    }

    fn builtin_direction<I, K, V>(
        source: HumanoidSkeleton,
        target: HumanoidSkeleton,
        overrides: I,
    ) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut bone_mapping = BoneMapping::from_skeletons(&source, &target);
        bone_mapping.merge_overrides(overrides);

        Self::new(RetargetingConfig {
            source_skeleton: Some(source),
            target_skeleton: target,
            bone_mapping,
            preserve_scale: true,
            use_ik: false,
            ik_chains: Vec::new(),
        })
    }

    pub fn config(&self) -> &RetargetingConfig {
        &self.config
    }

    /// 重定向动作文档
    ///
    /// 输入不被修改：调用方可以把同一份源文档交给多个重定向器。
    pub fn retarget_motion(&self, document: &MotionDocument) -> MotionDocument {
        let mut out = document.clone();

        let mut channels = Vec::with_capacity(document.bone_channels.len());
        for channel in &document.bone_channels {
            match self.config.bone_mapping.get(&channel.bone_name) {
                Some(target_name) => {
                    let mut renamed = channel.clone();
                    renamed.bone_name = target_name.to_string();
                    channels.push(renamed);
                }
                None => {
                    // 未映射通道丢弃：目标骨架上没有对应骨骼
                    log::debug!("丢弃未映射的骨骼通道: {}", channel.bone_name);
                }
            }
        }
        out.bone_channels = channels;

        // Morph 与相机通道与骨架命名无关，原样保留
        out
    }

    /// 查询源骨骼名对应的目标骨骼名
    pub fn target_bone_name(&self, source_name: &str) -> Option<&str> {
        self.config.bone_mapping.get(source_name)
    }

    /// 源骨骼名是否在映射表中
    pub fn is_bone_mapped(&self, source_name: &str) -> bool {
        self.config.bone_mapping.contains(source_name)
    }

    /// 全部映射对（确定顺序）
    pub fn mapped_bones(&self) -> &[(String, String)] {
        self.config.bone_mapping.pairs()
    }

    /// 以臂长比估算统一缩放系数
    ///
    /// 对源/目标骨架各求上臂 + 前臂长度之和，返回 目标/源。
    /// 单轴粗略估计而非逐骨骼求解。源骨架缺席、任一侧长度和
    /// 为零时退化为 1.0。
    pub fn calculate_scale_factor<S, T>(&self, source_length: S, target_length: T) -> f32
    where
        S: Fn(&str) -> f32,
        T: Fn(&str) -> f32,
    {
        let source = match &self.config.source_skeleton {
            Some(s) => s,
            None => return 1.0,
        };

        let mut source_sum = 0.0f32;
        let mut target_sum = 0.0f32;
        let mut any_source_limb = false;

        for role in SCALE_LIMB_ROLES {
            if let Some(name) = source.role_name(role) {
                source_sum += source_length(name);
                any_source_limb = true;
            }
            if let Some(name) = self.config.target_skeleton.role_name(role) {
                target_sum += target_length(name);
            }
        }

        if !any_source_limb || source_sum <= 0.0 || target_sum <= 0.0 {
            return 1.0;
        }

        target_sum / source_sum
    }
}

/// 校验骨架必备角色：告警，绝不失败
fn validate_skeleton(skeleton: &HumanoidSkeleton) {
    for role in BoneRole::MANDATORY {
        match skeleton.role_name(role) {
            Some(name) if !name.is_empty() => {}
            _ => {
                log::warn!("骨架 {:?} 的必备角色 {:?} 未配置或为空", skeleton.name, role);
            }
        }
    }
}
