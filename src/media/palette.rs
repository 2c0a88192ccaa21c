//! 边界框颜色表
//!
//! 256种颜色在HSV色环上均匀取色，再用16路偏移表重排，
//! 使相邻的类别ID得到差异明显的颜色。颜色表在首次使用时构建，之后只读。

use std::sync::OnceLock;

use image::Rgb;

use crate::config::COLOR_TABLE_SIZE;

const OFFSET: [usize; 16] = [0, 8, 4, 12, 2, 6, 10, 14, 1, 3, 5, 7, 9, 11, 13, 15];

static BBOX_COLORS: OnceLock<[Rgb<u8>; COLOR_TABLE_SIZE]> = OnceLock::new();

/// 获取完整的颜色表
pub fn bbox_colors() -> &'static [Rgb<u8>; COLOR_TABLE_SIZE] {
    BBOX_COLORS.get_or_init(build_table)
}

/// 获取类别ID对应的颜色，越界时返回None
pub fn bbox_color(class_id: usize) -> Option<Rgb<u8>> {
    bbox_colors().get(class_id).copied()
}

fn build_table() -> [Rgb<u8>; COLOR_TABLE_SIZE] {
    let hues: Vec<Rgb<u8>> = (0..COLOR_TABLE_SIZE)
        .map(|x| {
            let (r, g, b) = hsv_to_rgb(x as f64 / COLOR_TABLE_SIZE as f64, 1.0, 1.0);
            Rgb([to_channel(r), to_channel(g), to_channel(b)])
        })
        .collect();

    std::array::from_fn(|i| {
        let step = i * 16;
        hues[step % COLOR_TABLE_SIZE + OFFSET[step / COLOR_TABLE_SIZE]]
    })
}

// 截断而非四舍五入
fn to_channel(value: f64) -> u8 {
    (value * 255.0) as u8
}

fn hsv_to_rgb(h: f64, s: f64, v: f64) -> (f64, f64, f64) {
    if s == 0.0 {
        return (v, v, v);
    }

    let sector = (h * 6.0).trunc();
    let f = h * 6.0 - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    match sector as i64 % 6 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    }
}
