//! 动作文档
//!
//! 动作数据的显式标注形态：逐骨骼通道序列 + Morph 通道序列 +
//! 可选相机通道。通道顺序 = 构造顺序，通道内关键帧按帧索引有序。

use super::keyframe::{BoneKeyframe, CameraKeyframe, MorphKeyframe};

/// 单个骨骼的动画通道
#[derive(Clone, Debug, PartialEq)]
pub struct BoneChannel {
    pub bone_name: String,
    pub keyframes: Vec<BoneKeyframe>,
}

/// 单个 Morph 的动画通道
#[derive(Clone, Debug, PartialEq)]
pub struct MorphChannel {
    pub morph_name: String,
    pub keyframes: Vec<MorphKeyframe>,
}

/// 相机动画通道（至多一条）
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CameraChannel {
    pub keyframes: Vec<CameraKeyframe>,
}

/// 动作文档
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MotionDocument {
    pub model_name: String,
    pub bone_channels: Vec<BoneChannel>,
    pub morph_channels: Vec<MorphChannel>,
    pub camera_channel: Option<CameraChannel>,
}

impl MotionDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// 动画持续时间（所有通道的最大帧索引）
    pub fn duration(&self) -> u32 {
        let bone_max = self
            .bone_channels
            .iter()
            .flat_map(|c| c.keyframes.iter().map(|k| k.frame))
            .max()
            .unwrap_or(0);

        let morph_max = self
            .morph_channels
            .iter()
            .flat_map(|c| c.keyframes.iter().map(|k| k.frame))
            .max()
            .unwrap_or(0);

        let camera_max = self
            .camera_channel
            .iter()
            .flat_map(|c| c.keyframes.iter().map(|k| k.frame))
            .max()
            .unwrap_or(0);

        bone_max.max(morph_max).max(camera_max)
    }

    /// 按名称查找骨骼通道
    pub fn bone_channel(&self, name: &str) -> Option<&BoneChannel> {
        self.bone_channels.iter().find(|c| c.bone_name == name)
    }

    /// 按名称查找 Morph 通道
    pub fn morph_channel(&self, name: &str) -> Option<&MorphChannel> {
        self.morph_channels.iter().find(|c| c.morph_name == name)
    }

    pub fn contains_bone_channel(&self, name: &str) -> bool {
        self.bone_channel(name).is_some()
    }

    /// 骨骼通道名称列表（保持通道顺序）
    pub fn bone_channel_names(&self) -> impl Iterator<Item = &str> {
        self.bone_channels.iter().map(|c| c.bone_name.as_str())
    }

    /// 插入骨骼关键帧：通道不存在则按插入顺序新建，
    /// 通道内按帧索引保持有序（同帧覆盖）
    pub fn push_bone_keyframe(&mut self, name: &str, keyframe: BoneKeyframe) {
        let idx = match self.bone_channels.iter().position(|c| c.bone_name == name) {
            Some(i) => i,
            None => {
                self.bone_channels.push(BoneChannel {
                    bone_name: name.to_string(),
                    keyframes: Vec::new(),
                });
                self.bone_channels.len() - 1
            }
        };
        let channel = &mut self.bone_channels[idx];
        match channel
            .keyframes
            .binary_search_by_key(&keyframe.frame, |k| k.frame)
        {
            Ok(pos) => channel.keyframes[pos] = keyframe,
            Err(pos) => channel.keyframes.insert(pos, keyframe),
        }
    }

    /// 插入 Morph 关键帧
    pub fn push_morph_keyframe(&mut self, name: &str, keyframe: MorphKeyframe) {
        let idx = match self.morph_channels.iter().position(|c| c.morph_name == name) {
            Some(i) => i,
            None => {
                self.morph_channels.push(MorphChannel {
                    morph_name: name.to_string(),
                    keyframes: Vec::new(),
                });
                self.morph_channels.len() - 1
            }
        };
        let channel = &mut self.morph_channels[idx];
        match channel
            .keyframes
            .binary_search_by_key(&keyframe.frame, |k| k.frame)
        {
            Ok(pos) => channel.keyframes[pos] = keyframe,
            Err(pos) => channel.keyframes.insert(pos, keyframe),
        }
    }

    /// 插入相机关键帧
    pub fn push_camera_keyframe(&mut self, keyframe: CameraKeyframe) {
        let channel = self.camera_channel.get_or_insert_with(CameraChannel::default);
        match channel
            .keyframes
            .binary_search_by_key(&keyframe.frame, |k| k.frame)
        {
            Ok(pos) => channel.keyframes[pos] = keyframe,
            Err(pos) => channel.keyframes.insert(pos, keyframe),
        }
    }

    /// 是否携带相机数据
    pub fn has_camera_data(&self) -> bool {
        self.camera_channel
            .as_ref()
            .map(|c| !c.keyframes.is_empty())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_keeps_keyframes_sorted() {
        let mut doc = MotionDocument::new();
        doc.push_bone_keyframe("左腕", BoneKeyframe::new(30));
        doc.push_bone_keyframe("左腕", BoneKeyframe::new(0));
        doc.push_bone_keyframe("左腕", BoneKeyframe::new(15));

        let frames: Vec<u32> = doc.bone_channel("左腕").unwrap()
            .keyframes
            .iter()
            .map(|k| k.frame)
            .collect();
        assert_eq!(frames, vec![0, 15, 30]);
    }

    #[test]
    fn test_push_same_frame_overwrites() {
        let mut doc = MotionDocument::new();
        doc.push_morph_keyframe("笑い", MorphKeyframe::new(10, 0.5));
        doc.push_morph_keyframe("笑い", MorphKeyframe::new(10, 1.0));

        let channel = doc.morph_channel("笑い").unwrap();
        assert_eq!(channel.keyframes.len(), 1);
        assert_eq!(channel.keyframes[0].weight, 1.0);
    }

    #[test]
    fn test_duration_spans_all_channels() {
        let mut doc = MotionDocument::new();
        doc.push_bone_keyframe("左腕", BoneKeyframe::new(10));
        doc.push_morph_keyframe("笑い", MorphKeyframe::new(40, 1.0));
        assert_eq!(doc.duration(), 40);
    }

    #[test]
    fn test_channel_order_is_insertion_order() {
        let mut doc = MotionDocument::new();
        doc.push_bone_keyframe("センター", BoneKeyframe::new(0));
        doc.push_bone_keyframe("左腕", BoneKeyframe::new(0));
        doc.push_bone_keyframe("センター", BoneKeyframe::new(5));

        let names: Vec<&str> = doc.bone_channel_names().collect();
        assert_eq!(names, vec!["センター", "左腕"]);
    }
}
