use std::fs;
use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern, glob_with};
use log::{debug, error, info, warn};
use rayon::prelude::*;

use crate::config::{ANNOTATION_PATTERN, COMPANION_IMAGE_EXTENSION};
use crate::error::Result;
use crate::voc::annotation::VocAnnotation;
use crate::voc::labels::LabelTable;
use crate::voc::pyfloat::format_float;

/// 一次转换的统计信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionSummary {
    /// 实际写入的输出文件
    pub output: PathBuf,
    /// 处理的标注文件（图像）数量
    pub images: usize,
    /// 转换的对象总数
    pub objects: usize,
    /// 类别名称不在类别表中、被映射为类别0的对象数
    pub unknown_labels: usize,
}

impl ConversionSummary {
    pub fn print_summary(&self) {
        info!("=== 转换统计 ===");
        info!("输出文件: {}", self.output.display());
        info!("图像数量: {}", self.images);
        info!("对象数量: {}", self.objects);
        if self.unknown_labels > 0 {
            warn!("{} 个对象的类别未知，已映射为类别0", self.unknown_labels);
        }
    }
}

/// 使用BCCD类别表将VOC标注目录转换为YOLO文本文件
///
/// # 参数
/// * `dir_path` - XML标注文件所在目录
/// * `out_filepath` - 输出目录
/// * `out_filename` - 输出文件名
///
/// # 返回值
/// 返回转换统计，输出写入 `out_filepath/out_filename`
///
/// # 错误处理
/// 任何一个XML文件无法解析都会中止整批转换，且不写出任何输出
///
/// # 示例
///
/// ```no_run
/// use yolomedia::voc::conversion;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let summary = conversion("BCCD/Annotations", "BCCD", "train.txt")?;
/// println!("写入 {} 行到 {:?}", summary.images, summary.output);
/// # Ok(())
/// # }
/// ```
pub fn conversion(
    dir_path: impl AsRef<Path>,
    out_filepath: impl AsRef<Path>,
    out_filename: &str,
) -> Result<ConversionSummary> {
    conversion_with_labels(dir_path, out_filepath, out_filename, &LabelTable::bccd())
}

/// 使用指定的类别表进行转换，其余行为与 [`conversion`] 相同
pub fn conversion_with_labels(
    dir_path: impl AsRef<Path>,
    out_filepath: impl AsRef<Path>,
    out_filename: &str,
    labels: &LabelTable,
) -> Result<ConversionSummary> {
    let dir_path = dir_path.as_ref();
    let annotations = list_annotations(dir_path)?;
    info!(
        "在 {} 中找到 {} 个标注文件",
        dir_path.display(),
        annotations.len()
    );

    // 并行解析，collect保持排序后的顺序，遇到第一个错误即中止
    let parsed = annotations
        .par_iter()
        .map(|path| {
            VocAnnotation::from_path(path)
                .map(|annotation| (path, annotation))
                .map_err(|e| e.in_annotation(path))
        })
        .collect::<Result<Vec<_>>>()
        .inspect_err(|e| error!("转换中止: {}", e))?;

    let mut summary = ConversionSummary {
        images: parsed.len(),
        ..Default::default()
    };
    let mut rows = Vec::with_capacity(parsed.len());
    for (path, annotation) in &parsed {
        let filename = companion_image_name(path);
        summary.objects += annotation.objects.len();
        summary.unknown_labels += annotation
            .objects
            .iter()
            .filter(|object| labels.get(&object.name).is_none())
            .count();
        rows.push(format_row(&filename, annotation, labels));
    }

    let output = out_filepath.as_ref().join(out_filename);
    fs::write(&output, rows.join("\n"))?;
    summary.output = output;
    summary.print_summary();

    Ok(summary)
}

/// 生成一张图像的输出行
///
/// 没有对象的图像生成空行。
pub fn format_row(filename: &str, annotation: &VocAnnotation, labels: &LabelTable) -> String {
    if annotation.objects.is_empty() {
        debug!("{} 没有标注对象", filename);
        return String::new();
    }

    let mut row = String::from(filename);
    for object in &annotation.objects {
        let class_id = labels.class_id(&object.name);
        let (x, y, w, h) = object.to_yolo(annotation.width, annotation.height);
        row.push_str(&format!(
            " {},{},{},{},{}",
            class_id,
            format_float(x),
            format_float(y),
            format_float(w),
            format_float(h)
        ));
    }
    row
}

/// 列出目录下的XML文件，按完整路径字符串排序
///
/// 以`.`开头的隐藏文件（如macOS的`._*.xml`）不参与匹配。
fn list_annotations(dir_path: &Path) -> Result<Vec<PathBuf>> {
    let escaped = Pattern::escape(&dir_path.to_string_lossy());
    let pattern = format!("{}/{}", escaped, ANNOTATION_PATTERN);
    let options = MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::new()
    };

    let mut paths = glob_with(&pattern, options)?.collect::<std::result::Result<Vec<_>, _>>()?;
    paths.sort_by_cached_key(|path| path.to_string_lossy().into_owned());
    Ok(paths)
}

/// 由标注文件名得到图像文件名：取第一个`.`之前的部分再加上`.jpg`
fn companion_image_name(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_default();
    let stem = file_name.split('.').next().unwrap_or_default();
    format!("{}.{}", stem, COMPANION_IMAGE_EXTENSION)
}
