pub mod error;

pub use error::IdentityError;
