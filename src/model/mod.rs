pub mod board;
pub mod config;
pub mod ident;
pub mod section;
pub mod todo;

pub use board::*;
pub use config::*;
pub use ident::*;
pub use section::*;
pub use todo::*;
