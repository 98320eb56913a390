pub mod catalog;

pub use catalog::{Catalog, Format, LoadError, load_courses};
