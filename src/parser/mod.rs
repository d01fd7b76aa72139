// Catalog page parsing: node lookups, entity decoding and record extraction

pub mod entities;
pub mod node;
pub mod page;
pub mod record;

pub use entities::decode_entities;
pub use node::{CatalogNode, Lookup};
pub use page::{count_matches, extract_page, PageExtraction};
pub use record::extract_record;
