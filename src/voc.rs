//! VOC模块 - 将Pascal VOC标注转换为YOLO文本行
//!
//! 每个XML文件对应输出文件中的一行：
//! `<图像文件名> <类别>,<x>,<y>,<w>,<h> <类别>,<x>,<y>,<w>,<h> ...`，
//! 坐标为归一化的中心点和宽高。

pub mod annotation;
pub mod convert;
pub mod labels;
pub mod pyfloat;

pub use annotation::{VocAnnotation, VocObject};
pub use convert::{ConversionSummary, conversion, conversion_with_labels, format_row};
pub use labels::LabelTable;
