pub mod matcher;
pub mod national_id;

pub use matcher::{token_set_ratio, Matcher};
pub use national_id::{check_id, extract_id, is_valid_id, IdCheck, IdRejection};
