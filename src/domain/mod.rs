mod sampling;
mod timelines;
mod tracks;
mod types;

pub use sampling::*;
pub use timelines::*;
pub use tracks::*;
pub use types::*;
