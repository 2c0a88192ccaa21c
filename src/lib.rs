pub mod config;
pub mod error;
pub mod media;
pub mod voc;

// 重新导出常用类型和函数
pub use error::{Error, Result};
pub use media::{ClassNames, Detection, Letterboxed, LetterboxInfo};
pub use media::{draw_bboxes, load_font, load_image, read_classes_names, resize_image};
pub use voc::{ConversionSummary, LabelTable, conversion};
