//! letterbox缩放
//!
//! 将图像按统一比例缩放到目标框内，剩余区域用白色对称填充。
//! 同时可将归一化的真值框映射到缩放后的坐标系。

use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgb, RgbImage};
use log::debug;
use ndarray::{Array2, Axis};

use crate::config::PAD_VALUE;
use crate::error::{Error, Result};

/// 一次letterbox变换的缩放信息
///
/// 记录原图尺寸、缩放后内容尺寸以及左/上填充偏移，用于将预测结果还原到原图。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LetterboxInfo {
    /// 原图尺寸(宽, 高)
    pub original: (u32, u32),
    /// 缩放后内容尺寸(宽, 高)
    pub resized: (u32, u32),
    /// 目标尺寸(宽, 高)
    pub target: (u32, u32),
    /// 左侧和上方的填充像素数
    pub offset: (u32, u32),
    /// 统一缩放系数
    pub scale: f64,
}

/// letterbox缩放结果
#[derive(Debug, Clone)]
pub struct Letterboxed {
    /// 填充后的图像，尺寸恰好等于目标尺寸
    pub image: DynamicImage,
    /// 重映射后的真值框，仅当输入提供了真值框时存在
    pub ground_truth: Option<Array2<f32>>,
    pub info: LetterboxInfo,
}

/// 以letterbox方式调整图像大小以适应模型输入
///
/// 按较"宽"的一边计算统一缩放系数，使该边恰好填满目标尺寸，
/// 再将缩放结果居中放入填充值为255的画布。
///
/// # 参数
/// * `img` - 原始图像
/// * `target_size` - 目标尺寸(宽, 高)
/// * `ground_truth` - 可选的真值框，每行 `[center_x, center_y, w, h, ...]`，归一化到[0, 1]
///
/// # 返回值
/// 返回填充后的RGB图像、重映射后的真值框（若有）和缩放信息
///
/// # 错误处理
/// 图像或目标尺寸为0，或真值框少于4列时返回Err
///
/// # 示例
///
/// ```
/// use image::DynamicImage;
/// use yolomedia::resize_image;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let img = DynamicImage::new_rgb8(100, 50);
/// let letterboxed = resize_image(&img, (100, 100), None)?;
/// assert_eq!(letterboxed.info.offset, (0, 25));
/// # Ok(())
/// # }
/// ```
pub fn resize_image(
    img: &DynamicImage,
    target_size: (u32, u32),
    ground_truth: Option<&Array2<f32>>,
) -> Result<Letterboxed> {
    let (target_width, target_height) = target_size;
    let (width, height) = (img.width(), img.height());

    if width == 0 || height == 0 {
        return Err(Error::InvalidSize { width, height });
    }
    if target_width == 0 || target_height == 0 {
        return Err(Error::InvalidSize {
            width: target_width,
            height: target_height,
        });
    }
    if let Some(gt) = ground_truth {
        if gt.ncols() < 4 {
            return Err(Error::BboxColumns {
                found: gt.ncols(),
                expected: 4,
            });
        }
    }

    let scale = if width as f64 / height as f64 >= target_width as f64 / target_height as f64 {
        target_width as f64 / width as f64
    } else {
        target_height as f64 / height as f64
    };

    // 缩放
    let rgb = img.to_rgb8();
    let (new_width, new_height, resized) = if scale != 1.0 {
        let new_width = scaled_length(width, scale);
        let new_height = scaled_length(height, scale);
        let resized = imageops::resize(&rgb, new_width, new_height, FilterType::Triangle);
        (new_width, new_height, resized)
    } else {
        (width, height, rgb)
    };

    // 填充
    let dw = target_width.saturating_sub(new_width);
    let dh = target_height.saturating_sub(new_height);

    let (left, top, padded) = if dw == 0 && dh == 0 {
        (0, 0, resized)
    } else {
        let (left, top) = (dw / 2, dh / 2);
        let mut canvas =
            RgbImage::from_pixel(target_width, target_height, Rgb([PAD_VALUE; 3]));
        imageops::replace(&mut canvas, &resized, left as i64, top as i64);
        (left, top, canvas)
    };

    debug!(
        "letterbox: {}x{} -> {}x{}, 偏移({}, {})",
        width, height, new_width, new_height, left, top
    );

    let info = LetterboxInfo {
        original: (width, height),
        resized: (new_width, new_height),
        target: target_size,
        offset: (left, top),
        scale,
    };

    Ok(Letterboxed {
        image: DynamicImage::ImageRgb8(padded),
        ground_truth: ground_truth.map(|gt| remap_ground_truth(gt, &info)),
        info,
    })
}

// 四舍六入五成双
fn scaled_length(length: u32, scale: f64) -> u32 {
    (length as f64 * scale).round_ties_even() as u32
}

/// 只重映射被填充的那一轴；左右与上下偏移相等时原样返回
fn remap_ground_truth(ground_truth: &Array2<f32>, info: &LetterboxInfo) -> Array2<f32> {
    let mut gt = ground_truth.to_owned();
    let (left, top) = info.offset;

    let (center_col, size_col, scale) = if left > top {
        (0, 2, info.resized.0 as f32 / info.target.0 as f32)
    } else if top > left {
        (1, 3, info.resized.1 as f32 / info.target.1 as f32)
    } else {
        return gt;
    };

    gt.column_mut(center_col)
        .mapv_inplace(|c| scale * (c - 0.5) + 0.5);
    gt.column_mut(size_col).mapv_inplace(|s| scale * s);
    gt
}

impl LetterboxInfo {
    /// 将letterbox坐标系下的归一化框还原到原图坐标系
    ///
    /// 与 `resize_image` 的真值框映射互逆，且对奇数填充也精确。
    /// 前4列之外的列（类别ID、置信度）原样保留。
    pub fn restore_bboxes(&self, bboxes: &Array2<f32>) -> Array2<f32> {
        let mut restored = bboxes.to_owned();
        if restored.ncols() < 4 {
            return restored;
        }

        let (target_w, target_h) = (self.target.0 as f32, self.target.1 as f32);
        let (new_w, new_h) = (self.resized.0 as f32, self.resized.1 as f32);
        let (left, top) = (self.offset.0 as f32, self.offset.1 as f32);

        for mut row in restored.axis_iter_mut(Axis(0)) {
            row[0] = (row[0] * target_w - left) / new_w;
            row[1] = (row[1] * target_h - top) / new_h;
            row[2] *= target_w / new_w;
            row[3] *= target_h / new_h;
        }
        restored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn assert_close(a: &Array2<f32>, b: &Array2<f32>) {
        assert_eq!(a.dim(), b.dim());
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < 1e-5, "{} != {}", x, y);
        }
    }

    #[test]
    fn test_output_has_target_size() {
        let sizes = [(100, 50), (50, 100), (640, 480), (33, 77), (608, 608), (1, 1)];
        for (w, h) in sizes {
            let img = DynamicImage::new_rgb8(w, h);
            let out = resize_image(&img, (608, 416), None).unwrap();
            assert_eq!((out.image.width(), out.image.height()), (608, 416));
        }
    }

    #[test]
    fn test_wide_image_is_padded_top_and_bottom() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(100, 50, Rgb([0, 0, 0])));
        let out = resize_image(&img, (100, 100), None).unwrap();
        let padded = out.image.to_rgb8();

        assert_eq!(out.info.scale, 1.0);
        assert_eq!(out.info.resized, (100, 50));
        assert_eq!(out.info.offset, (0, 25));

        assert_eq!(padded.get_pixel(50, 0), &Rgb([255, 255, 255]));
        assert_eq!(padded.get_pixel(50, 24), &Rgb([255, 255, 255]));
        assert_eq!(padded.get_pixel(50, 25), &Rgb([0, 0, 0]));
        assert_eq!(padded.get_pixel(50, 74), &Rgb([0, 0, 0]));
        assert_eq!(padded.get_pixel(50, 75), &Rgb([255, 255, 255]));
        assert_eq!(padded.get_pixel(50, 99), &Rgb([255, 255, 255]));
    }

    #[test]
    fn test_same_aspect_ratio_is_not_padded() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(200, 100, Rgb([9, 9, 9])));
        let out = resize_image(&img, (100, 50), None).unwrap();

        assert_eq!(out.info.resized, (100, 50));
        assert_eq!(out.info.offset, (0, 0));
        assert!(out.image.to_rgb8().pixels().all(|p| *p == Rgb([9, 9, 9])));
    }

    #[test]
    fn test_unit_scale_is_identical_copy() {
        let mut rgb = RgbImage::new(4, 3);
        for (x, y, p) in rgb.enumerate_pixels_mut() {
            *p = Rgb([x as u8 * 40, y as u8 * 60, 7]);
        }
        let img = DynamicImage::ImageRgb8(rgb.clone());
        let out = resize_image(&img, (4, 3), None).unwrap();

        assert_eq!(out.image.to_rgb8(), rgb);
    }

    #[test]
    fn test_ground_truth_unchanged_when_offsets_equal() {
        let img = DynamicImage::new_rgb8(50, 50);
        let gt = array![[0.3f32, 0.6, 0.2, 0.1, 1.0]];
        let out = resize_image(&img, (100, 100), Some(&gt)).unwrap();

        assert_eq!(out.info.offset, (0, 0));
        assert_eq!(out.ground_truth.unwrap(), gt);
    }

    #[test]
    fn test_ground_truth_height_axis_remap() {
        let img = DynamicImage::new_rgb8(100, 50);
        let gt = array![[0.5f32, 0.5, 0.4, 0.4, 2.0], [0.0, 0.0, 1.0, 1.0, 0.0]];
        let out = resize_image(&img, (100, 100), Some(&gt)).unwrap();

        let expected = array![[0.5f32, 0.5, 0.4, 0.2, 2.0], [0.0, 0.25, 1.0, 0.5, 0.0]];
        assert_close(&out.ground_truth.unwrap(), &expected);
    }

    #[test]
    fn test_ground_truth_width_axis_remap() {
        let img = DynamicImage::new_rgb8(50, 100);
        let gt = array![[1.0f32, 0.3, 0.5, 0.7]];
        let out = resize_image(&img, (200, 200), Some(&gt)).unwrap();

        assert_eq!(out.info.resized, (100, 200));
        assert_eq!(out.info.offset, (50, 0));
        let expected = array![[0.75f32, 0.3, 0.25, 0.7]];
        assert_close(&out.ground_truth.unwrap(), &expected);
    }

    #[test]
    fn test_no_ground_truth_gives_none() {
        let img = DynamicImage::new_rgb8(10, 10);
        assert!(resize_image(&img, (20, 20), None).unwrap().ground_truth.is_none());
    }

    #[test]
    fn test_restore_inverts_remap() {
        let img = DynamicImage::new_rgb8(640, 480);
        let gt = array![[0.25f32, 0.75, 0.1, 0.2, 4.0, 0.9], [0.6, 0.4, 0.3, 0.3, 1.0, 0.5]];
        let out = resize_image(&img, (608, 608), Some(&gt)).unwrap();

        let restored = out.info.restore_bboxes(&out.ground_truth.unwrap());
        assert_close(&restored, &gt);
    }

    #[test]
    fn test_rounding_ties_to_even() {
        assert_eq!(scaled_length(5, 0.5), 2);
        assert_eq!(scaled_length(7, 0.5), 4);
        assert_eq!(scaled_length(3, 0.5), 2);
    }

    #[test]
    fn test_invalid_inputs() {
        let empty = DynamicImage::new_rgb8(0, 10);
        assert!(matches!(
            resize_image(&empty, (10, 10), None),
            Err(Error::InvalidSize { width: 0, height: 10 })
        ));

        let img = DynamicImage::new_rgb8(10, 10);
        assert!(matches!(
            resize_image(&img, (0, 10), None),
            Err(Error::InvalidSize { .. })
        ));

        let narrow = array![[0.5f32, 0.5, 0.1]];
        assert!(matches!(
            resize_image(&img, (10, 10), Some(&narrow)),
            Err(Error::BboxColumns { found: 3, expected: 4 })
        ));
    }
}
