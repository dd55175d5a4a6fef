pub mod precipitation;
pub mod stations;
pub mod temperature;

pub use precipitation::*;
pub use stations::*;
pub use temperature::*;
