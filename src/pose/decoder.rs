//! VPD 位姿文件解码器
//!
//! 同一逻辑文件类型存在两种磁盘编码：
//! - 紧凑二进制（定长记录流，字段内不会出现换行）
//! - 人工编写的文本（Shift-JIS，行结构松散）
//!
//! 通过前 100 字节中是否出现 CR/LF 进行启发式判别；
//! 持有带外信息（如已知扩展名）的调用方可通过 [`FormatHint`]
//! 显式指定格式，绕过嗅探。

use std::io::{Cursor, Read};

use byteorder::{LittleEndian, ReadBytesExt};
use glam::{Quat, Vec3};

use crate::{RetargetError, Result};

use super::document::{canonicalize, BoneRecord, PoseDocument, PoseMorph};

/// 魔数标记（伪装成文本字段的格式标识）
const MAGIC: &str = "Vocaloid";
/// 骨骼数量上限（防御损坏或错配的文件）
const MAX_BONE_COUNT: u32 = 10_000;
/// 格式嗅探窗口
const SNIFF_WINDOW: usize = 100;
/// 二进制记录大小：20 字节名称 + 3×4 位置 + 4×4 旋转
const BINARY_RECORD_SIZE: usize = 48;

/// 格式提示
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatHint {
    /// 按换行启发式自动判别
    Auto,
    /// 强制按二进制解析
    Binary,
    /// 强制按文本解析
    Text,
}

/// 解码位姿缓冲区（自动判别格式）
pub fn decode(bytes: &[u8]) -> Result<PoseDocument> {
    decode_with_hint(bytes, FormatHint::Auto)
}

/// 解码位姿缓冲区
///
/// 魔数缺失或数量越界返回 [`RetargetError::Format`]，不产生部分文档；
/// 单条记录的异常（截断、数值行损坏）就地恢复，只记日志。
pub fn decode_with_hint(bytes: &[u8], hint: FormatHint) -> Result<PoseDocument> {
    let is_text = match hint {
        FormatHint::Binary => false,
        FormatHint::Text => true,
        FormatHint::Auto => sniff_text(bytes),
    };

    if is_text {
        decode_text(bytes)
    } else {
        decode_binary(bytes)
    }
}

/// 嗅探：窗口内出现 CR/LF 即判定为文本格式
fn sniff_text(bytes: &[u8]) -> bool {
    bytes
        .iter()
        .take(SNIFF_WINDOW)
        .any(|&b| b == b'\n' || b == b'\r')
}

/// 二进制解码路径（定长记录流）
fn decode_binary(bytes: &[u8]) -> Result<PoseDocument> {
    let mut reader = Cursor::new(bytes);

    // 头部字段（20 字节），必须包含魔数
    let mut header = [0u8; 20];
    reader
        .read_exact(&mut header)
        .map_err(|e| RetargetError::Format(format!("Failed to read header: {}", e)))?;
    let header_str = decode_shift_jis(&header);
    if !header_str.contains(MAGIC) {
        return Err(RetargetError::Format(format!(
            "Invalid pose header: {:?}",
            header_str
        )));
    }

    // 模型名称（20 字节），仅信息用途
    let mut model_name_bytes = [0u8; 20];
    reader
        .read_exact(&mut model_name_bytes)
        .map_err(|e| RetargetError::Format(format!("Failed to read model name: {}", e)))?;
    let model_name = decode_shift_jis(&model_name_bytes);

    // 骨骼数量
    let bone_count = reader
        .read_u32::<LittleEndian>()
        .map_err(|e| RetargetError::Format(format!("Failed to read bone count: {}", e)))?;
    if bone_count > MAX_BONE_COUNT {
        return Err(RetargetError::Format(format!(
            "Bone count {} exceeds sanity limit {}",
            bone_count, MAX_BONE_COUNT
        )));
    }

    let mut records = Vec::with_capacity(bone_count as usize);

    for i in 0..bone_count {
        // 剩余长度不足一条完整记录时提前结束（容忍截断文件）
        let remaining = bytes.len().saturating_sub(reader.position() as usize);
        if remaining < BINARY_RECORD_SIZE {
            log::warn!(
                "位姿文件在第 {} 条记录处截断，保留已解码的 {} 条",
                i,
                records.len()
            );
            break;
        }

        let mut name_bytes = [0u8; 20];
        reader.read_exact(&mut name_bytes).map_err(RetargetError::Io)?;
        let name = decode_shift_jis(&name_bytes);
        if name.is_empty() {
            log::warn!("第 {} 条记录骨骼名称为空", i);
        }

        let px = reader.read_f32::<LittleEndian>().map_err(RetargetError::Io)?;
        let py = reader.read_f32::<LittleEndian>().map_err(RetargetError::Io)?;
        let pz = reader.read_f32::<LittleEndian>().map_err(RetargetError::Io)?;

        let rx = reader.read_f32::<LittleEndian>().map_err(RetargetError::Io)?;
        let ry = reader.read_f32::<LittleEndian>().map_err(RetargetError::Io)?;
        let rz = reader.read_f32::<LittleEndian>().map_err(RetargetError::Io)?;
        let rw = reader.read_f32::<LittleEndian>().map_err(RetargetError::Io)?;

        records.push(BoneRecord {
            name,
            position: Vec3::new(px, py, pz),
            rotation: canonicalize(Quat::from_xyzw(rx, ry, rz, rw)),
        });
    }

    Ok(PoseDocument {
        model_name,
        records,
        morphs: Vec::new(),
    })
}

/// 文本解码路径（行结构松散）
fn decode_text(bytes: &[u8]) -> Result<PoseDocument> {
    let content = decode_shift_jis_all(bytes);
    let lines: Vec<&str> = content.lines().map(str::trim).collect();
    let mut i = 0;

    // 可选头部行（含品牌标记）
    if i < lines.len() && lines[i].contains(MAGIC) {
        i += 1;
    }

    skip_blank(&lines, &mut i);

    // 可选模型文件名行
    let mut model_name = String::new();
    if i < lines.len() && is_filename_line(lines[i]) {
        model_name = lines[i].trim_end_matches(';').to_string();
        i += 1;
    }

    skip_blank(&lines, &mut i);

    // 骨骼数量行：提取行首整数，尾随注释/分号忽略
    let declared = if i < lines.len() {
        let n = leading_integer(lines[i]);
        if n.is_none() {
            log::warn!("骨骼数量行无法解析: {:?}", lines[i]);
        }
        i += 1;
        n.unwrap_or(0)
    } else {
        0
    };

    let mut records = Vec::with_capacity(declared);

    for _ in 0..declared {
        skip_blank(&lines, &mut i);
        if i >= lines.len() {
            // 声明数量多于实际记录，优雅停止
            log::warn!(
                "声明 {} 条记录，实际只找到 {} 条",
                declared,
                records.len()
            );
            break;
        }

        // 名称行：优先提取 BoneN{name 记录起始标记，否则整行作为名称
        let name = parse_record_name(&lines, &mut i);
        if name.is_empty() {
            log::warn!("第 {} 条记录骨骼名称为空", records.len());
        }

        // 位置行：三个逗号分隔浮点数，损坏时退回原点
        skip_blank(&lines, &mut i);
        let position = if i < lines.len() {
            let v = parse_vec3(lines[i]);
            if v.is_none() {
                log::warn!("位置行无法解析: {:?}", lines[i]);
            }
            i += 1;
            v.unwrap_or(Vec3::ZERO)
        } else {
            Vec3::ZERO
        };

        // 旋转行：四个逗号分隔浮点数，损坏时退回单位旋转
        skip_blank(&lines, &mut i);
        let rotation = if i < lines.len() {
            let q = parse_quat(lines[i]);
            if q.is_none() {
                log::warn!("旋转行无法解析: {:?}", lines[i]);
            }
            i += 1;
            q.map(canonicalize).unwrap_or(Quat::IDENTITY)
        } else {
            Quat::IDENTITY
        };

        // 可选的闭合大括号行
        skip_blank(&lines, &mut i);
        if i < lines.len() && lines[i].starts_with('}') {
            i += 1;
        }

        records.push(BoneRecord {
            name,
            position,
            rotation,
        });
    }

    // Morph 数据块（MMM 扩展）
    let mut morphs = Vec::new();
    while i < lines.len() {
        let line = lines[i];
        if line.starts_with("Morph") && line.contains('{') {
            if let Some(morph) = parse_morph_block(&lines, &mut i) {
                morphs.push(morph);
            }
        } else {
            i += 1;
        }
    }

    log::info!(
        "VPD 文本解析完成: {} 个骨骼, {} 个表情",
        records.len(),
        morphs.len()
    );

    Ok(PoseDocument {
        model_name,
        records,
        morphs,
    })
}

/// 跳过空行
fn skip_blank(lines: &[&str], i: &mut usize) {
    while *i < lines.len() && lines[*i].is_empty() {
        *i += 1;
    }
}

/// 文件名行判别：含扩展名记号或至少一个点
fn is_filename_line(line: &str) -> bool {
    let lower = line.to_ascii_lowercase();
    lower.contains(".osm")
        || lower.contains(".pmx")
        || lower.contains(".pmd")
        || line.contains('.')
}

/// 提取行首整数
fn leading_integer(line: &str) -> Option<usize> {
    let digits: String = line.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// 解析记录名称
///
/// 格式 `Bone0{左腕` 时取大括号之后的部分；名称落在下一行
/// （`Bone0{` 单独成行）时继续读取；否则整行作为名称。
fn parse_record_name(lines: &[&str], i: &mut usize) -> String {
    let line = lines[*i];
    *i += 1;

    if line.starts_with("Bone") && line.contains('{') {
        let after_brace = line.split('{').nth(1).unwrap_or("").trim();
        if !after_brace.is_empty() {
            return after_brace.to_string();
        }
        // 名称在下一行
        skip_blank(lines, i);
        if *i < lines.len() {
            let name = lines[*i].to_string();
            *i += 1;
            return name;
        }
        return String::new();
    }

    line.trim_end_matches(';').to_string()
}

/// 解析 Morph 数据块：`MorphN{名称` + 权重行 + `}`
fn parse_morph_block(lines: &[&str], i: &mut usize) -> Option<PoseMorph> {
    let start = lines[*i];
    *i += 1;

    let name = {
        let after_brace = start.split('{').nth(1)?.trim();
        if after_brace.is_empty() {
            skip_blank(lines, i);
            if *i >= lines.len() {
                return None;
            }
            let name = lines[*i].to_string();
            *i += 1;
            name
        } else {
            after_brace.to_string()
        }
    };

    let mut weight = 0.0f32;
    while *i < lines.len() {
        let line = lines[*i];
        *i += 1;
        if line.starts_with('}') {
            break;
        }
        if let Some(w) = parse_float(line) {
            weight = w;
        }
    }

    Some(PoseMorph { name, weight })
}

/// 去掉行尾注释与分号，按逗号切分浮点数
fn split_floats(line: &str) -> Vec<f32> {
    let clean = line
        .split("//")
        .next()
        .unwrap_or("")
        .trim()
        .trim_end_matches(';');
    clean
        .split(',')
        .filter_map(|p| p.trim().parse::<f32>().ok())
        .collect()
}

fn parse_vec3(line: &str) -> Option<Vec3> {
    let parts = split_floats(line);
    if parts.len() >= 3 {
        Some(Vec3::new(parts[0], parts[1], parts[2]))
    } else {
        None
    }
}

fn parse_quat(line: &str) -> Option<Quat> {
    let parts = split_floats(line);
    if parts.len() >= 4 {
        Some(Quat::from_xyzw(parts[0], parts[1], parts[2], parts[3]))
    } else {
        None
    }
}

fn parse_float(line: &str) -> Option<f32> {
    let clean = line
        .split("//")
        .next()?
        .trim()
        .trim_end_matches(';');
    clean.parse::<f32>().ok()
}

/// 解码定长 Shift-JIS 字段：截断到第一个 null，去除尾部填充
fn decode_shift_jis(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    let (decoded, _, _) = encoding_rs::SHIFT_JIS.decode(&bytes[..end]);
    decoded.trim_end().to_string()
}

/// 解码整个 Shift-JIS 缓冲区
fn decode_shift_jis_all(bytes: &[u8]) -> String {
    let (decoded, _, _) = encoding_rs::SHIFT_JIS.decode(bytes);
    decoded.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 让恢复路径的告警在测试输出中可见
    fn init_logs() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    /// 构造二进制位姿缓冲区
    fn build_binary(bone_count: u32, records: &[(&str, [f32; 3], [f32; 4])]) -> Vec<u8> {
        let mut buf = Vec::new();

        let mut header = [0u8; 20];
        header[..b"Vocaloid Pose".len()].copy_from_slice(b"Vocaloid Pose");
        buf.extend_from_slice(&header);

        let model = [0u8; 20];
        buf.extend_from_slice(&model);

        buf.extend_from_slice(&bone_count.to_le_bytes());

        for (name, pos, rot) in records {
            let mut name_bytes = [0u8; 20];
            name_bytes[..name.len()].copy_from_slice(name.as_bytes());
            buf.extend_from_slice(&name_bytes);
            for v in pos {
                buf.extend_from_slice(&v.to_le_bytes());
            }
            for v in rot {
                buf.extend_from_slice(&v.to_le_bytes());
            }
        }

        buf
    }

    #[test]
    fn test_binary_decode() {
        let buf = build_binary(
            2,
            &[
                ("Hip", [1.0, 2.0, 3.0], [0.0, 0.0, 0.0, 1.0]),
                ("Head", [0.0, 0.5, 0.0], [0.1, 0.0, 0.0, 0.9]),
            ],
        );
        let doc = decode(&buf).unwrap();
        assert_eq!(doc.bone_count(), 2);
        assert_eq!(doc.records[0].name, "Hip");
        assert_eq!(doc.records[0].position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(doc.records[1].name, "Head");
    }

    #[test]
    fn test_binary_canonicalizes_negative_w() {
        let buf = build_binary(1, &[("Hip", [0.0; 3], [0.1, 0.2, 0.3, -0.9])]);
        let doc = decode(&buf).unwrap();
        let q = doc.records[0].rotation;
        assert!(q.w >= 0.0);
        assert!((q.x + 0.1).abs() < 1e-6);
        assert!((q.y + 0.2).abs() < 1e-6);
        assert!((q.z + 0.3).abs() < 1e-6);
        assert!((q.w - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_binary_truncation_tolerated() {
        init_logs();
        let mut buf = build_binary(
            3,
            &[
                ("A", [0.0; 3], [0.0, 0.0, 0.0, 1.0]),
                ("B", [0.0; 3], [0.0, 0.0, 0.0, 1.0]),
                ("C", [0.0; 3], [0.0, 0.0, 0.0, 1.0]),
            ],
        );
        // 截断到第三条记录中途
        buf.truncate(buf.len() - 30);
        let doc = decode(&buf).unwrap();
        assert_eq!(doc.bone_count(), 2);
    }

    #[test]
    fn test_binary_rejects_missing_magic() {
        let mut buf = build_binary(1, &[("Hip", [0.0; 3], [0.0, 0.0, 0.0, 1.0])]);
        buf[..8].copy_from_slice(b"Overlord");
        let err = decode(&buf).unwrap_err();
        assert!(matches!(err, RetargetError::Format(_)));
    }

    #[test]
    fn test_binary_rejects_insane_bone_count() {
        let buf = build_binary(10_001, &[]);
        let err = decode(&buf).unwrap_err();
        assert!(matches!(err, RetargetError::Format(_)));
    }

    #[test]
    fn test_format_sniffing_dispatch() {
        init_logs();
        // 前 100 字节内有换行 → 文本路径；声明 2 条但只有 1 条完整记录
        let text = b"Vocaloid Pose Data\n2\nBone0{Hip\n0,0,0\n0,0,0,1\n}\n";
        let doc = decode(text).unwrap();
        assert_eq!(doc.bone_count(), 1);
        assert_eq!(doc.records[0].name, "Hip");
    }

    #[test]
    fn test_hint_bypasses_sniffing() {
        // 首行超长、嗅探窗口内无换行的文本文件，靠显式提示解析
        let padding = "x".repeat(120);
        let content = format!(
            "Vocaloid Pose Data {}\nmodel.pmx;\n1\nBone0{{Hip\n0,1,0;\n0,0,0,1;\n}}\n",
            padding
        );
        let doc = decode_with_hint(content.as_bytes(), FormatHint::Text).unwrap();
        assert_eq!(doc.bone_count(), 1);
        assert_eq!(doc.records[0].position, Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_text_full_file() {
        let content = "Vocaloid Pose Data file\n\
                       \n\
                       miku.osm;\n\
                       2;\n\
                       \n\
                       Bone0{\u{5de6}\u{8155}\n\
                       0.000000,0.000000,0.000000;\n\
                       0.100000,0.000000,0.000000,-0.900000;\n\
                       }\n\
                       Bone1{\u{53f3}\u{8155}\n\
                       1.000000,2.000000,3.000000;\n\
                       0.000000,0.000000,0.000000,1.000000;\n\
                       }\n";
        let (encoded, _, _) = encoding_rs::SHIFT_JIS.encode(content);
        let doc = decode(&encoded).unwrap();
        assert_eq!(doc.model_name, "miku.osm");
        assert_eq!(doc.bone_count(), 2);
        assert_eq!(doc.records[0].name, "左腕");
        // 负 w 被规范化
        assert!(doc.records[0].rotation.w >= 0.0);
        assert_eq!(doc.records[1].position, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_text_malformed_lines_default() {
        init_logs();
        let content = "Vocaloid Pose Data file\n\
                       1\n\
                       Bone0{Hip\n\
                       not,a,number\n\
                       garbage\n\
                       }\n";
        let doc = decode(content.as_bytes()).unwrap();
        assert_eq!(doc.bone_count(), 1);
        assert_eq!(doc.records[0].position, Vec3::ZERO);
        assert_eq!(doc.records[0].rotation, Quat::IDENTITY);
    }

    #[test]
    fn test_text_trailing_comment_on_count() {
        let content = "Vocaloid Pose Data file\n\
                       1; // count\n\
                       Hip\n\
                       0,0,0;\n\
                       0,0,0,1;\n";
        let doc = decode(content.as_bytes()).unwrap();
        assert_eq!(doc.bone_count(), 1);
        assert_eq!(doc.records[0].name, "Hip");
    }

    #[test]
    fn test_text_morph_blocks() {
        let content = "Vocaloid Pose Data file\n\
                       1\n\
                       Bone0{Hip\n\
                       0,0,0;\n\
                       0,0,0,1;\n\
                       }\n\
                       Morph0{\u{7b11}\u{3044}\n\
                       0.750000;\n\
                       }\n";
        let (encoded, _, _) = encoding_rs::SHIFT_JIS.encode(content);
        let doc = decode(&encoded).unwrap();
        assert_eq!(doc.morphs.len(), 1);
        assert_eq!(doc.morphs[0].name, "笑い");
        assert!((doc.morphs[0].weight - 0.75).abs() < 1e-6);
    }
}
