//! 边界框类型
//!
//! 检测结果和真值框在流水线中以 `ndarray::Array2<f32>` 传递，
//! 每一行为 `[center_x, center_y, w, h, class_id, probability]`（后两列可选）。
//! 这里提供单行的强类型视图以及像素坐标矩形。

use ndarray::ArrayView1;

use crate::config::{COLOR_TABLE_SIZE, UNKNOWN_PROBABILITY};
use crate::error::{Error, Result};

/// 像素坐标下的矩形
///
/// 表示一个矩形边界框，(x1, y1)为左上角，(x2, y2)为右下角。
#[derive(Debug, Clone, Default, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl BoundingBox {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn width(&self) -> i32 {
        (self.x2 - self.x1).abs()
    }

    pub fn height(&self) -> i32 {
        (self.y2 - self.y1).abs()
    }
}

/// 一个归一化的检测结果（或真值框）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    /// 中心点x坐标，相对图像宽度归一化
    pub center_x: f32,
    /// 中心点y坐标，相对图像高度归一化
    pub center_y: f32,
    /// 宽度，相对图像宽度归一化
    pub width: f32,
    /// 高度，相对图像高度归一化
    pub height: f32,
    /// 类别ID，同时也是颜色表索引
    pub class_id: usize,
    /// 置信度，缺失时为 [`UNKNOWN_PROBABILITY`]
    pub probability: f32,
}

impl Detection {
    /// 从一行数据构造检测结果
    ///
    /// 5列表示带类别ID但没有置信度，6列表示两者都有。
    /// 类别ID按截断取整，必须落在颜色表范围0-255内。
    ///
    /// # 错误处理
    /// 列数少于5或类别ID越界时返回Err
    pub fn from_row(row: ArrayView1<'_, f32>) -> Result<Self> {
        if row.len() < 5 {
            return Err(Error::BboxColumns {
                found: row.len(),
                expected: 5,
            });
        }

        let raw_class = row[4];
        let class_id = raw_class.trunc();
        if !(0.0..COLOR_TABLE_SIZE as f32).contains(&class_id) {
            return Err(Error::ClassIdOutOfRange(raw_class));
        }

        let probability = if row.len() > 5 {
            row[5]
        } else {
            UNKNOWN_PROBABILITY
        };

        Ok(Self {
            center_x: row[0],
            center_y: row[1],
            width: row[2],
            height: row[3],
            class_id: class_id as usize,
            probability,
        })
    }

    /// 置信度是否有效（哨兵值大于1表示未知）
    pub fn has_probability(&self) -> bool {
        self.probability <= 1.0
    }

    /// 转换为给定图像尺寸下的像素矩形
    ///
    /// 中心和半宽高均截断取整后再求角点，所以矩形总是关于中心对称。
    pub fn to_pixels(&self, image_width: u32, image_height: u32) -> BoundingBox {
        let (w, h) = (image_width as f32, image_height as f32);

        let c_x = (self.center_x * w) as i32;
        let c_y = (self.center_y * h) as i32;
        let half_w = (self.width * w / 2.0) as i32;
        let half_h = (self.height * h / 2.0) as i32;

        BoundingBox::new(c_x - half_w, c_y - half_h, c_x + half_w, c_y + half_h)
    }
}
