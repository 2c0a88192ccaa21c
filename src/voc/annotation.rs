//! Pascal VOC XML标注解析

use std::fs;
use std::path::Path;

use roxmltree::{Document, Node};

use crate::error::{Error, Result};

/// 一个标注对象，坐标为绝对像素角点
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocObject {
    pub name: String,
    pub xmin: i64,
    pub ymin: i64,
    pub xmax: i64,
    pub ymax: i64,
}

/// 一个VOC标注文件的内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocAnnotation {
    pub width: i64,
    pub height: i64,
    pub objects: Vec<VocObject>,
}

impl VocObject {
    /// 转换为YOLO格式 `(x_center, y_center, w, h)`
    ///
    /// 中心点先减1再归一化，与已有训练数据保持一致。
    pub fn to_yolo(&self, image_width: i64, image_height: i64) -> (f64, f64, f64, f64) {
        let dw = 1.0 / image_width as f64;
        let dh = 1.0 / image_height as f64;

        // 在f64中求和，极端坐标值不会溢出
        let (xmin, xmax) = (self.xmin as f64, self.xmax as f64);
        let (ymin, ymax) = (self.ymin as f64, self.ymax as f64);

        let x = ((xmin + xmax) / 2.0 - 1.0) * dw;
        let y = ((ymin + ymax) / 2.0 - 1.0) * dh;
        let w = (xmax - xmin) * dw;
        let h = (ymax - ymin) * dh;

        (x, y, w, h)
    }
}

impl VocAnnotation {
    /// 读取并解析一个XML文件
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let xml = fs::read_to_string(path.as_ref())?;
        Self::parse(&xml)
    }

    /// 解析XML文本
    ///
    /// 需要 `size/width`、`size/height`，以及任意数量的 `object` 节点，
    /// 每个节点包含 `name` 和 `bndbox/{xmin,xmax,ymin,ymax}`。
    ///
    /// # 错误处理
    /// XML格式错误、缺少节点、数值不是整数或图像尺寸不为正时返回Err
    pub fn parse(xml: &str) -> Result<Self> {
        let doc = Document::parse(xml)?;
        let root = doc.root_element();

        let width = int_at(root, "size/width")?;
        let height = int_at(root, "size/height")?;
        if width <= 0 || height <= 0 {
            return Err(Error::InvalidValue {
                node: "size".to_string(),
                value: format!("{}x{}", width, height),
            });
        }

        let objects = root
            .descendants()
            .filter(|node| node.has_tag_name("object"))
            .map(parse_object)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            width,
            height,
            objects,
        })
    }
}

fn parse_object(node: Node<'_, '_>) -> Result<VocObject> {
    Ok(VocObject {
        name: text_at(node, "name")?.to_string(),
        xmin: int_at(node, "bndbox/xmin")?,
        xmax: int_at(node, "bndbox/xmax")?,
        ymin: int_at(node, "bndbox/ymin")?,
        ymax: int_at(node, "bndbox/ymax")?,
    })
}

/// 按 `a/b/c` 形式的路径逐级查找第一个匹配的子元素
fn find<'a, 'input>(node: Node<'a, 'input>, path: &str) -> Option<Node<'a, 'input>> {
    path.split('/').try_fold(node, |current, tag| {
        current.children().find(|child| child.has_tag_name(tag))
    })
}

fn text_at<'a>(node: Node<'a, '_>, path: &str) -> Result<&'a str> {
    let found = find(node, path).ok_or_else(|| Error::MissingNode(path.to_string()))?;
    Ok(found.text().unwrap_or(""))
}

fn int_at(node: Node<'_, '_>, path: &str) -> Result<i64> {
    let text = text_at(node, path)?;
    text.trim().parse().map_err(|_| Error::InvalidValue {
        node: path.to_string(),
        value: text.to_string(),
    })
}
