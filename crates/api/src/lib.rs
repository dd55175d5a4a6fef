pub mod db;
mod projector;
pub mod routes;
mod startup;
pub mod templates;
mod utils;

pub use db::*;
pub use projector::*;
pub use routes::*;
pub use startup::*;
pub use utils::*;
