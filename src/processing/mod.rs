pub mod document;
pub mod extractors;
pub mod name_cleaner;
pub mod normalize;
pub mod ocr;
pub mod upload;

pub use document::{extract, extract_with_trace};
pub use extractors::{extract_name_block, NameBlock, NameSource};
pub use name_cleaner::clean;
pub use normalize::normalize;
#[cfg(feature = "tesseract")]
pub use ocr::TesseractRecognizer;
pub use ocr::{parse_lines, read_lines_file, TextRecognizer};
pub use upload::check_upload;
