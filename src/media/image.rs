use std::fs;
use std::path::Path;

use ab_glyph::FontArc;
use image::DynamicImage;
use log::debug;

use crate::error::Result;

/// 加载图像文件
///
/// # 参数
/// * `path` - 图像文件路径
///
/// # 返回值
/// 返回加载的DynamicImage对象
///
/// # 错误处理
/// 文件不存在或无法解码时返回Err
pub fn load_image(path: impl AsRef<Path>) -> Result<DynamicImage> {
    let path = path.as_ref();
    let img = image::open(path)?;
    debug!("已加载图像 {:?}: {}x{}", path, img.width(), img.height());
    Ok(img)
}

/// 加载绘制标签文字用的TrueType/OpenType字体
pub fn load_font(path: impl AsRef<Path>) -> Result<FontArc> {
    let data = fs::read(path.as_ref())?;
    Ok(FontArc::try_from_vec(data)?)
}
