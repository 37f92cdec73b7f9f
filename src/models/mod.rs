//! Typed records exchanged with the Autumn API.

mod customers;
mod entities;
mod features;
mod meta;
mod params;
mod products;
mod responses;

pub use customers::*;
pub use entities::*;
pub use features::*;
pub use meta::*;
pub use params::*;
pub use products::*;
pub use responses::*;
