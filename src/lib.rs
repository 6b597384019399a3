pub mod config;
pub mod identity_validator;
pub mod models;
pub mod processing;
pub mod utils;
pub mod validation;

pub use config::Settings;
pub use identity_validator::IdentityValidator;
pub use utils::IdentityError;
