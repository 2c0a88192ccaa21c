use std::path::PathBuf;

use clap::Parser;

// 网络输入尺寸(宽, 高)
pub const DEFAULT_INPUT_WIDTH: u32 = 608;
pub const DEFAULT_INPUT_HEIGHT: u32 = 608;

// letterbox填充值(白色)
pub const PAD_VALUE: u8 = 255;

// 缺少置信度时使用的哨兵值，大于1表示"没有置信度"
pub const UNKNOWN_PROBABILITY: f32 = 2.0;

// 绘图参数
pub const BBOX_LINE_WIDTH: f32 = 2.0;
pub const LABEL_FONT_SIZE: f32 = 14.0;
pub const LABEL_MARGIN: i32 = 3;
pub const COLOR_TABLE_SIZE: usize = 256;

// VOC转换参数
pub const ANNOTATION_PATTERN: &str = "*.xml";
pub const COMPANION_IMAGE_EXTENSION: &str = "jpg";

/// 将Pascal VOC标注目录转换为YOLO文本行
#[derive(Parser, Debug, Clone)]
#[command(version, long_about = None)]
pub struct Args {
    /// VOC XML标注文件所在目录
    pub annotations_dir: PathBuf,

    /// 输出目录
    pub output_dir: PathBuf,

    /// 输出文件名
    pub output_filename: String,
}
