//! 位姿应用计划
//!
//! 消费方契约：旋转总是应用；位置仅对名称带 IK 标记
//! （半角或全角）的骨骼有效，其余骨骼的位置字段不具权威性。
//! 精确名称缺失时尝试 "D" 后缀切换（渲染用复制骨骼的命名惯例）。

use glam::{Quat, Vec3};

use super::document::PoseDocument;

/// 单个骨骼的待应用更新
#[derive(Clone, Debug, PartialEq)]
pub struct BoneUpdate {
    /// 在活动骨架中解析到的骨骼名称
    pub bone_name: String,
    pub rotation: Quat,
    /// 仅 IK 骨骼携带
    pub position: Option<Vec3>,
}

/// 名称是否携带 IK 标记
fn has_ik_marker(name: &str) -> bool {
    name.contains("IK") || name.contains("ＩＫ")
}

/// "D" 后缀切换：有则去掉，无则加上
fn toggle_d_suffix(name: &str) -> String {
    match name.strip_suffix('D') {
        Some(base) => base.to_string(),
        None => format!("{}D", name),
    }
}

/// 将位姿文档规划为逐骨骼更新列表
///
/// `has_bone` 由消费方提供，查询活动骨架中是否存在同名骨骼。
/// 两种名称都不存在的记录被跳过（骨骼缺席不是错误）。
pub fn plan_updates<F>(doc: &PoseDocument, mut has_bone: F) -> Vec<BoneUpdate>
where
    F: FnMut(&str) -> bool,
{
    let mut updates = Vec::with_capacity(doc.records.len());

    for record in &doc.records {
        let resolved = if has_bone(&record.name) {
            Some(record.name.clone())
        } else {
            let alt = toggle_d_suffix(&record.name);
            if has_bone(&alt) {
                Some(alt)
            } else {
                None
            }
        };

        let bone_name = match resolved {
            Some(name) => name,
            None => {
                log::debug!("骨架中不存在骨骼 {:?}，跳过", record.name);
                continue;
            }
        };

        let position = if has_ik_marker(&record.name) {
            Some(record.position)
        } else {
            None
        };

        updates.push(BoneUpdate {
            bone_name,
            rotation: record.rotation,
            position,
        });
    }

    updates
}
