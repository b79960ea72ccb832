/// URL grammar: parsing, serialization and percent-encoding
///
/// `parse` and `serialize` are inverse operations over the canonical form:
/// for any tree built by this crate, `parse(&serialize(&tree))` yields the
/// same tree.
pub mod encoding;
pub mod parser;
pub mod serializer;

pub use parser::{parse, UrlParser};
pub use serializer::{serialize, serialize_path, serialize_paths, DefaultUrlSerializer, UrlSerializer};
