pub mod loader;
pub mod serializer;

pub use loader::{check_shape, looks_like_openapi, parse_spec, parse_value};
pub use serializer::{size_in_kb, to_yaml};
