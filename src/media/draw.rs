use ab_glyph::{FontArc, PxScale};
use image::{DynamicImage, ImageBuffer, Rgb, RgbImage};
use imageproc::drawing::{draw_text_mut, text_size};
use log::debug;
use ndarray::{Array2, Axis};
use raqote::{DrawOptions, DrawTarget, LineJoin, PathBuilder, SolidSource, Source, StrokeStyle};

use crate::config::{BBOX_LINE_WIDTH, LABEL_FONT_SIZE, LABEL_MARGIN};
use crate::error::{Error, Result};
use crate::media::bbox::{BoundingBox, Detection};
use crate::media::classes::ClassNames;
use crate::media::palette::bbox_color;

// 等待绘制的标签文字
struct Label {
    text: String,
    x: i32,
    y: i32,
    color: Rgb<u8>,
}

/// 在图像上绘制边界框
///
/// 颜色由类别ID在颜色表中索引得到。每个框绘制2像素宽的边框，
/// 并在框的左上角上方绘制 `"{类别名}: {置信度:.1%}"` 标签，文字颜色为边框颜色的反色。
///
/// # 参数
/// * `image` - 原始图像，不会被修改
/// * `bboxes` - 每行 `[center_x, center_y, w, h, class_id]` 或 `[..., class_id, probability]`，
///   坐标归一化到[0, 1]；缺少置信度时按200%显示
/// * `classes` - 类别名称映射
/// * `font` - 标签字体，为None时只绘制边框
///
/// # 返回值
/// 返回绘制了检测框的新图像
///
/// # 错误处理
/// 列数少于5、类别ID超出0-255或类别ID没有名称时返回Err
pub fn draw_bboxes(
    image: &DynamicImage,
    bboxes: &Array2<f32>,
    classes: &ClassNames,
    font: Option<&FontArc>,
) -> Result<DynamicImage> {
    if bboxes.ncols() < 5 {
        return Err(Error::BboxColumns {
            found: bboxes.ncols(),
            expected: 5,
        });
    }

    let (img_width, img_height) = (image.width(), image.height());
    let mut dt = to_draw_target(&image.to_rgb8());
    let scale = PxScale::from(LABEL_FONT_SIZE);
    let mut labels = Vec::with_capacity(bboxes.nrows());

    for row in bboxes.axis_iter(Axis(0)) {
        let detection = Detection::from_row(row)?;
        let class_name = classes
            .get(&detection.class_id)
            .ok_or(Error::UnknownClass(detection.class_id))?;
        let color = bbox_color(detection.class_id)
            .ok_or(Error::ClassIdOutOfRange(detection.class_id as f32))?;
        let rect = detection.to_pixels(img_width, img_height);

        stroke_rect(&mut dt, &rect, color);

        let Some(font) = font else {
            continue;
        };

        let text = format!("{}: {:.1}%", class_name, detection.probability * 100.0);
        let (text_w, text_h) = text_size(scale, font, &text);
        let (text_w, text_h) = (text_w as i32, text_h as i32);

        // 标签背景在框的左上角上方
        dt.fill_rect(
            rect.x1 as f32,
            (rect.y1 - text_h - LABEL_MARGIN) as f32,
            text_w as f32,
            (text_h + LABEL_MARGIN) as f32,
            &Source::Solid(solid(color)),
            &DrawOptions::new(),
        );

        labels.push(Label {
            text,
            x: rect.x1,
            y: rect.y1 - text_h - (LABEL_MARGIN - 1),
            color: Rgb(color.0.map(|c| 255 - c)),
        });
    }

    let mut canvas = from_draw_target(&dt, img_width, img_height);
    if let Some(font) = font {
        for label in &labels {
            draw_text_mut(&mut canvas, label.color, label.x, label.y, scale, font, &label.text);
        }
    }

    debug!("绘制了 {} 个边界框", bboxes.nrows());
    Ok(DynamicImage::ImageRgb8(canvas))
}

fn solid(color: Rgb<u8>) -> SolidSource {
    let [r, g, b] = color.0;
    SolidSource { r, g, b, a: 0xFF }
}

fn stroke_rect(dt: &mut DrawTarget, rect: &BoundingBox, color: Rgb<u8>) {
    let mut pb = PathBuilder::new();
    pb.rect(
        rect.x1 as f32,
        rect.y1 as f32,
        (rect.x2 - rect.x1) as f32,
        (rect.y2 - rect.y1) as f32,
    );
    let path = pb.finish();

    dt.stroke(
        &path,
        &Source::Solid(solid(color)),
        &StrokeStyle {
            join: LineJoin::Miter,
            width: BBOX_LINE_WIDTH,
            ..StrokeStyle::default()
        },
        &DrawOptions::new(),
    );
}

// RGB -> 预乘ARGB，alpha恒为0xFF
fn to_draw_target(rgb: &RgbImage) -> DrawTarget {
    let (width, height) = rgb.dimensions();
    let data: Vec<u32> = rgb
        .pixels()
        .map(|p| u32::from_le_bytes([p[2], p[1], p[0], 0xFF]))
        .collect();
    DrawTarget::from_vec(width as i32, height as i32, data)
}

fn from_draw_target(dt: &DrawTarget, width: u32, height: u32) -> RgbImage {
    let data = dt.get_data();
    ImageBuffer::from_fn(width, height, |x, y| {
        let [b, g, r, _] = data[(y * width + x) as usize].to_le_bytes();
        Rgb([r, g, b])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn classes() -> ClassNames {
        [(0, "RBC"), (1, "WBC"), (2, "Platelets")]
            .into_iter()
            .map(|(id, name)| (id, name.to_string()))
            .collect()
    }

    fn white(w: u32, h: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(w, h, Rgb([255, 255, 255])))
    }

    fn font() -> FontArc {
        let data: &[u8] = include_bytes!("../../tests/fonts/DejaVuSans.ttf");
        FontArc::try_from_slice(data).unwrap()
    }

    // 统计框左上角上方标签区域内的(背景色, 反色)像素数
    fn label_pixels(image: &RgbImage) -> (usize, usize) {
        let (mut background, mut text) = (0, 0);
        for y in 30..58 {
            for x in 60..200 {
                let p = image.get_pixel(x, y);
                if *p == Rgb([255, 0, 0]) {
                    background += 1;
                }
                if p[0] < 60 && p[1] > 200 && p[2] > 200 {
                    text += 1;
                }
            }
        }
        (background, text)
    }

    #[test]
    fn test_draws_outline_in_class_color() {
        let image = white(100, 100);
        let bboxes = array![[0.5f32, 0.5, 0.4, 0.4, 0.0, 0.9]];

        let drawn = draw_bboxes(&image, &bboxes, &classes(), None).unwrap().to_rgb8();

        // 类别0为红色，左边框位于x=30
        let edge = drawn.get_pixel(30, 50);
        assert!(edge[0] > 200 && edge[1] < 60 && edge[2] < 60, "{:?}", edge);
        // 框内和框外保持原样
        assert_eq!(drawn.get_pixel(50, 50), &Rgb([255, 255, 255]));
        assert_eq!(drawn.get_pixel(5, 5), &Rgb([255, 255, 255]));
    }

    #[test]
    fn test_label_above_top_left_corner() {
        let image = white(200, 200);
        // 框的像素坐标为(60, 60)-(140, 140)
        let bboxes = array![[0.5f32, 0.5, 0.4, 0.4, 0.0, 0.9]];

        let plain = draw_bboxes(&image, &bboxes, &classes(), None).unwrap().to_rgb8();
        assert_eq!(label_pixels(&plain), (0, 0));

        let labeled = draw_bboxes(&image, &bboxes, &classes(), Some(&font()))
            .unwrap()
            .to_rgb8();
        let (background, text) = label_pixels(&labeled);
        assert!(background > 100, "background pixels: {}", background);
        assert!(text > 10, "text pixels: {}", text);

        // 标签之外保持原样
        assert_eq!(labeled.get_pixel(100, 20), &Rgb([255, 255, 255]));
        assert_eq!(labeled.get_pixel(100, 100), &Rgb([255, 255, 255]));
    }

    #[test]
    fn test_label_without_probability_is_drawn() {
        let image = white(200, 200);
        let bboxes = array![[0.5f32, 0.5, 0.4, 0.4, 0.0]];

        let labeled = draw_bboxes(&image, &bboxes, &classes(), Some(&font()))
            .unwrap()
            .to_rgb8();
        let (background, text) = label_pixels(&labeled);
        assert!(background > 100, "background pixels: {}", background);
        assert!(text > 10, "text pixels: {}", text);
    }

    #[test]
    fn test_longer_label_has_wider_background() {
        let image = white(200, 200);
        let with_probability = array![[0.5f32, 0.5, 0.4, 0.4, 0.0, 0.9]];
        let without_probability = array![[0.5f32, 0.5, 0.4, 0.4, 0.0]];
        let font = font();

        // "RBC: 200.0%" 比 "RBC: 90.0%" 多一个字符
        let short = draw_bboxes(&image, &with_probability, &classes(), Some(&font)).unwrap();
        let long = draw_bboxes(&image, &without_probability, &classes(), Some(&font)).unwrap();
        assert!(label_pixels(&long.to_rgb8()).0 > label_pixels(&short.to_rgb8()).0);
    }

    #[test]
    fn test_input_is_not_mutated() {
        let image = white(40, 40);
        let bboxes = array![[0.5f32, 0.5, 0.5, 0.5, 1.0]];

        let drawn = draw_bboxes(&image, &bboxes, &classes(), None).unwrap();

        assert!(image.to_rgb8().pixels().all(|p| *p == Rgb([255, 255, 255])));
        assert_eq!((drawn.width(), drawn.height()), (40, 40));
        assert_ne!(drawn.to_rgb8(), image.to_rgb8());
    }

    #[test]
    fn test_empty_bboxes_keep_image() {
        let image = white(8, 6);
        let bboxes = Array2::<f32>::zeros((0, 6));

        let drawn = draw_bboxes(&image, &bboxes, &classes(), None).unwrap();
        assert_eq!(drawn.to_rgb8(), image.to_rgb8());
    }

    #[test]
    fn test_rejects_bad_rows() {
        let image = white(10, 10);

        let narrow = array![[0.5f32, 0.5, 0.5, 0.5]];
        assert!(matches!(
            draw_bboxes(&image, &narrow, &classes(), None),
            Err(Error::BboxColumns { found: 4, expected: 5 })
        ));

        let out_of_range = array![[0.5f32, 0.5, 0.5, 0.5, 300.0]];
        assert!(matches!(
            draw_bboxes(&image, &out_of_range, &classes(), None),
            Err(Error::ClassIdOutOfRange(_))
        ));

        let unnamed = array![[0.5f32, 0.5, 0.5, 0.5, 5.0]];
        assert!(matches!(
            draw_bboxes(&image, &unnamed, &classes(), None),
            Err(Error::UnknownClass(5))
        ));
    }

    #[test]
    fn test_draw_target_roundtrip() {
        let mut rgb = RgbImage::new(3, 2);
        for (x, y, p) in rgb.enumerate_pixels_mut() {
            *p = Rgb([x as u8 * 80, y as u8 * 100, 42]);
        }

        let dt = to_draw_target(&rgb);
        assert_eq!(from_draw_target(&dt, 3, 2), rgb);
    }
}
