pub mod linkify;
pub mod unicode;
