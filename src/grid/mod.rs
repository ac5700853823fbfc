//! Static problem instance: the patrol grid.
//!
//! - [`Coord`] and [`Action`]: cell positions and the nine-way move encoding
//! - [`Grid`]: dimensions, obstacles, urgency rates and home bases
//! - [`load_instance`] / [`parse_instance`]: text instance loader

mod coord;
mod instance;
mod model;

pub use coord::{Action, Coord};
pub use instance::{load_instance, parse_instance, InstanceError};
pub use model::{Grid, GridError};
