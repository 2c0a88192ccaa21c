use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::debug;

use crate::error::Result;

/// 类别ID到类别名称的映射，例如 `{0: "person", 1: "bicycle", 2: "car"}`
pub type ClassNames = BTreeMap<usize, String>;

/// 加载类别名称文件
///
/// 每行一个类别名，空行（去掉首尾空白后）会被跳过且不占用ID，
/// 名称中的空格替换为下划线。
///
/// # 错误处理
/// 文件无法读取时返回Err
pub fn read_classes_names(path: impl AsRef<Path>) -> Result<ClassNames> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let classes = parse_classes_names(&content);
    debug!("从 {:?} 读取了 {} 个类别", path, classes.len());
    Ok(classes)
}

fn parse_classes_names(content: &str) -> ClassNames {
    content
        .lines()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .enumerate()
        .map(|(id, name)| (id, name.replace(' ', "_")))
        .collect()
}
