use std::collections::HashMap;

use crate::media::classes::ClassNames;

/// 类别名称到YOLO类别ID的映射
///
/// 查不到的名称映射为类别0，不报错。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelTable {
    ids: HashMap<String, usize>,
}

impl LabelTable {
    pub const DEFAULT_ID: usize = 0;

    /// BCCD血细胞数据集的类别表，顺序与bccd.names一致
    pub fn bccd() -> Self {
        Self::from_names(["RBC", "WBC", "Platelets"])
    }

    /// 按顺序为名称分配ID
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ids = names
            .into_iter()
            .enumerate()
            .map(|(id, name)| {
                let name: String = name.into();
                (normalize(&name), id)
            })
            .collect();
        Self { ids }
    }

    /// 由类别名称文件的内容构建
    pub fn from_class_names(classes: &ClassNames) -> Self {
        let ids = classes
            .iter()
            .map(|(id, name)| (normalize(name), *id))
            .collect();
        Self { ids }
    }

    /// 查询类别ID，未知名称返回None
    ///
    /// 名称中的空格按 `_` 处理，与类别名称文件的规则一致。
    pub fn get(&self, name: &str) -> Option<usize> {
        self.ids.get(&normalize(name)).copied()
    }

    /// 查询类别ID，未知名称返回 [`LabelTable::DEFAULT_ID`]
    pub fn class_id(&self, name: &str) -> usize {
        self.get(name).unwrap_or(Self::DEFAULT_ID)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

fn normalize(name: &str) -> String {
    name.replace(' ', "_")
}

impl Default for LabelTable {
    fn default() -> Self {
        Self::bccd()
    }
}
