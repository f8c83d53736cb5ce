pub mod alerts;
pub mod classify;
pub mod feed;
pub mod normalize;

pub use alerts::*;
pub use classify::*;
pub use feed::*;
pub use normalize::*;
