mod category;
mod models;

pub use category::{Category, DocType, ParseEnumError};
pub use models::*;
