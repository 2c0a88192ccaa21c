//! 错误类型
//!
//! 整个crate共用一个错误枚举，所有可失败的操作都返回 [`Result`]。

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("图像处理失败: {0}")]
    Image(#[from] image::ImageError),

    #[error("字体文件无效: {0}")]
    Font(#[from] ab_glyph::InvalidFont),

    #[error("XML解析失败: {0}")]
    Xml(#[from] roxmltree::Error),

    /// XML中缺少必需的节点，内容为节点路径，例如 `size/width`
    #[error("缺少节点: {0}")]
    MissingNode(String),

    #[error("节点 {node} 的值无效: {value:?}")]
    InvalidValue { node: String, value: String },

    /// 单个标注文件处理失败，携带文件路径
    #[error("标注文件 {path:?} 处理失败: {source}")]
    Annotation {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },

    #[error("无效的glob模式: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("读取目录项失败: {0}")]
    Glob(#[from] glob::GlobError),

    #[error("尺寸无效: {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    #[error("边界框列数不支持: {found} (至少需要 {expected} 列)")]
    BboxColumns { found: usize, expected: usize },

    #[error("类别ID超出颜色表范围(0-255): {0}")]
    ClassIdOutOfRange(f32),

    #[error("类别ID {0} 没有对应的类别名称")]
    UnknownClass(usize),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// 用文件路径包装单个标注文件的错误
    pub(crate) fn in_annotation(self, path: impl Into<PathBuf>) -> Self {
        Error::Annotation {
            path: path.into(),
            source: Box::new(self),
        }
    }
}
