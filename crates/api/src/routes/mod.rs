pub mod climate;
mod error;
mod health;
pub mod home;

pub use climate::*;
pub use error::*;
pub use health::*;
pub use home::*;
