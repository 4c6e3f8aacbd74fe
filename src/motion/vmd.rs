//! VMD 动作文件解析
//!
//! 将 VMD 二进制流解析为 [`MotionDocument`]。数值原样搬运，
//! 坐标系约定（Z 轴方向等）由消费方运行时负责转换。

use std::io::{Cursor, Read};

use byteorder::{LittleEndian, ReadBytesExt};
use glam::{Quat, Vec3};

use crate::{RetargetError, Result};

use super::document::MotionDocument;
use super::keyframe::{BoneKeyframe, CameraInterpolation, CameraKeyframe, MorphKeyframe};

/// VMD 文件头（两个版本都是 25 字节有效内容）
const VMD_HEADER_V1: &[u8] = b"Vocaloid Motion Data file";
const VMD_HEADER_V2: &[u8] = b"Vocaloid Motion Data 0002";

/// VMD 文件数据
#[derive(Clone, Debug)]
pub struct VmdFile {
    pub model_name: String,
    pub document: MotionDocument,
}

impl VmdFile {
    /// 从字节切片解析 VMD
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = Cursor::new(bytes);
        Self::from_reader(&mut reader)
    }

    fn from_reader<R: Read>(reader: &mut R) -> Result<Self> {
        // 头部（30 字节）
        let mut header = [0u8; 30];
        reader
            .read_exact(&mut header)
            .map_err(|e| RetargetError::VmdParse(format!("Failed to read header: {}", e)))?;

        let is_v1 = header[..25] == VMD_HEADER_V1[..];
        let is_v2 = header[..25] == VMD_HEADER_V2[..];
        if !is_v1 && !is_v2 {
            return Err(RetargetError::VmdParse("Invalid VMD header".to_string()));
        }

        // 模型名称（20 字节）
        let mut model_name_bytes = [0u8; 20];
        reader
            .read_exact(&mut model_name_bytes)
            .map_err(|e| RetargetError::VmdParse(format!("Failed to read model name: {}", e)))?;
        let model_name = decode_shift_jis(&model_name_bytes);

        let mut document = MotionDocument::new();
        document.model_name = model_name.clone();

        // 骨骼关键帧
        let bone_keyframe_count = reader
            .read_u32::<LittleEndian>()
            .map_err(|e| RetargetError::VmdParse(format!("Failed to read bone count: {}", e)))?;

        for _ in 0..bone_keyframe_count {
            let (name, keyframe) = read_bone_keyframe(reader)?;
            document.push_bone_keyframe(&name, keyframe);
        }

        // Morph 关键帧
        let morph_keyframe_count = reader
            .read_u32::<LittleEndian>()
            .map_err(|e| RetargetError::VmdParse(format!("Failed to read morph count: {}", e)))?;

        for _ in 0..morph_keyframe_count {
            let (name, keyframe) = read_morph_keyframe(reader)?;
            document.push_morph_keyframe(&name, keyframe);
        }

        // 相机段可能不存在（较老的 VMD 文件在此结束）
        if let Ok(camera_count) = reader.read_u32::<LittleEndian>() {
            for _ in 0..camera_count {
                match read_camera_keyframe(reader) {
                    Ok(keyframe) => document.push_camera_keyframe(keyframe),
                    Err(_) => break,
                }
            }
            // 光照（28 字节/帧）与阴影（9 字节/帧）段跳过
            if let Ok(light_count) = reader.read_u32::<LittleEndian>() {
                for _ in 0..light_count {
                    let mut buf = [0u8; 28];
                    let _ = reader.read_exact(&mut buf);
                }
                if let Ok(shadow_count) = reader.read_u32::<LittleEndian>() {
                    for _ in 0..shadow_count {
                        let mut buf = [0u8; 9];
                        let _ = reader.read_exact(&mut buf);
                    }
                }
            }
        }

        Ok(Self {
            model_name,
            document,
        })
    }

    /// 获取最大帧数
    pub fn max_frame(&self) -> u32 {
        self.document.duration()
    }
}

/// 读取骨骼关键帧（111 字节/帧）
fn read_bone_keyframe<R: Read>(reader: &mut R) -> Result<(String, BoneKeyframe)> {
    // 骨骼名称（15 字节）
    let mut name_bytes = [0u8; 15];
    reader
        .read_exact(&mut name_bytes)
        .map_err(|e| RetargetError::VmdParse(format!("Failed to read bone name: {}", e)))?;
    let name = decode_shift_jis(&name_bytes);

    let frame = reader
        .read_u32::<LittleEndian>()
        .map_err(|e| RetargetError::VmdParse(format!("Failed to read frame index: {}", e)))?;

    let tx = read_f32(reader)?;
    let ty = read_f32(reader)?;
    let tz = read_f32(reader)?;

    let rx = read_f32(reader)?;
    let ry = read_f32(reader)?;
    let rz = read_f32(reader)?;
    let rw = read_f32(reader)?;

    // 插值参数（64 字节）：每行 16 字节共 4 行，取首行有效值
    let mut interpolation = [0u8; 64];
    reader
        .read_exact(&mut interpolation)
        .map_err(|e| RetargetError::VmdParse(format!("Failed to read interpolation: {}", e)))?;

    let mut keyframe = BoneKeyframe::new(frame);
    keyframe.translation = Vec3::new(tx, ty, tz);
    keyframe.rotation = Quat::from_xyzw(rx, ry, rz, rw);
    keyframe.interpolation_x = [
        interpolation[0],
        interpolation[4],
        interpolation[8],
        interpolation[12],
    ];
    keyframe.interpolation_y = [
        interpolation[1],
        interpolation[5],
        interpolation[9],
        interpolation[13],
    ];
    keyframe.interpolation_z = [
        interpolation[2],
        interpolation[6],
        interpolation[10],
        interpolation[14],
    ];
    keyframe.interpolation_r = [
        interpolation[3],
        interpolation[7],
        interpolation[11],
        interpolation[15],
    ];

    Ok((name, keyframe))
}

/// 读取 Morph 关键帧（23 字节/帧）
fn read_morph_keyframe<R: Read>(reader: &mut R) -> Result<(String, MorphKeyframe)> {
    let mut name_bytes = [0u8; 15];
    reader
        .read_exact(&mut name_bytes)
        .map_err(|e| RetargetError::VmdParse(format!("Failed to read morph name: {}", e)))?;
    let name = decode_shift_jis(&name_bytes);

    let frame = reader
        .read_u32::<LittleEndian>()
        .map_err(|e| RetargetError::VmdParse(format!("Failed to read frame index: {}", e)))?;
    let weight = read_f32(reader)?;

    Ok((name, MorphKeyframe { frame, weight }))
}

/// 读取相机关键帧（61 字节/帧）
fn read_camera_keyframe<R: Read>(reader: &mut R) -> Result<CameraKeyframe> {
    let frame = reader
        .read_u32::<LittleEndian>()
        .map_err(|e| RetargetError::VmdParse(format!("Failed to read camera frame: {}", e)))?;

    let distance = read_f32(reader)?;

    let lx = read_f32(reader)?;
    let ly = read_f32(reader)?;
    let lz = read_f32(reader)?;

    let ax = read_f32(reader)?;
    let ay = read_f32(reader)?;
    let az = read_f32(reader)?;

    // 插值参数（24 字节 = 6 组 × 4 字节）
    let mut interp_raw = [0u8; 24];
    reader
        .read_exact(&mut interp_raw)
        .map_err(|e| RetargetError::VmdParse(format!("Failed to read camera interp: {}", e)))?;

    let interpolation = CameraInterpolation {
        lookat_x: [interp_raw[0], interp_raw[1], interp_raw[2], interp_raw[3]],
        lookat_y: [interp_raw[4], interp_raw[5], interp_raw[6], interp_raw[7]],
        lookat_z: [interp_raw[8], interp_raw[9], interp_raw[10], interp_raw[11]],
        angle: [interp_raw[12], interp_raw[13], interp_raw[14], interp_raw[15]],
        distance: [interp_raw[16], interp_raw[17], interp_raw[18], interp_raw[19]],
        fov: [interp_raw[20], interp_raw[21], interp_raw[22], interp_raw[23]],
    };

    let fov = reader
        .read_u32::<LittleEndian>()
        .map_err(|e| RetargetError::VmdParse(format!("Failed to read camera fov: {}", e)))?
        as f32;

    let is_perspective = reader
        .read_u8()
        .map_err(|e| RetargetError::VmdParse(format!("Failed to read perspective flag: {}", e)))?
        == 0;

    Ok(CameraKeyframe {
        frame,
        distance,
        look_at: Vec3::new(lx, ly, lz),
        angle: Vec3::new(ax, ay, az),
        fov,
        is_perspective,
        interpolation,
    })
}

fn read_f32<R: Read>(reader: &mut R) -> Result<f32> {
    reader
        .read_f32::<LittleEndian>()
        .map_err(|e| RetargetError::VmdParse(format!("Failed to read float: {}", e)))
}

/// 解码 Shift-JIS 定长字段：截断到第一个 null 字节
fn decode_shift_jis(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    let (decoded, _, _) = encoding_rs::SHIFT_JIS.decode(&bytes[..end]);
    decoded.into_owned()
}
