pub mod document;
pub mod fields;
pub mod vocab;

pub use document::DocumentExtractor;
pub use fields::{ExtractedFields, FieldExtractor};
