//! Media模块 - YOLO流水线的图像预处理与可视化
//!
//! 该模块提供：
//! - 图像和字体加载
//! - letterbox缩放（保持宽高比并对称填充），以及真值框的坐标重映射
//! - 按类别着色的边界框绘制
//! - 类别名称文件读取
//!
//! # 工作流程
//!
//! 1. 使用load_image加载图像，使用read_classes_names加载类别名称
//! 2. 调用resize_image将图像缩放到网络输入尺寸
//! 3. 使用draw_bboxes绘制检测结果
//!
//! # 示例
//!
//! ```no_run
//! use ndarray::array;
//! use yolomedia::config::{DEFAULT_INPUT_HEIGHT, DEFAULT_INPUT_WIDTH};
//! use yolomedia::{draw_bboxes, load_image, read_classes_names, resize_image};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let image = load_image("path/to/image.jpg")?;
//! let classes = read_classes_names("path/to/coco.names")?;
//!
//! let letterboxed = resize_image(&image, (DEFAULT_INPUT_WIDTH, DEFAULT_INPUT_HEIGHT), None)?;
//! let bboxes = array![[0.5f32, 0.5, 0.2, 0.3, 0.0, 0.87]];
//! let drawn = draw_bboxes(&letterboxed.image, &bboxes, &classes, None)?;
//! drawn.save("result.jpg")?;
//! # Ok(())
//! # }
//! ```

pub mod bbox;
pub mod classes;
pub mod draw;
pub mod image;
pub mod letterbox;
pub mod palette;

// 重新导出常用类型和函数
pub use bbox::{BoundingBox, Detection};
pub use classes::{ClassNames, read_classes_names};
pub use draw::draw_bboxes;
pub use self::image::{load_font, load_image};
pub use letterbox::{Letterboxed, LetterboxInfo, resize_image};
pub use palette::{bbox_color, bbox_colors};
