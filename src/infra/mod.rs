mod colors;
mod fetch;
mod layout;
mod scan;
mod tracking;
mod watch;

pub use colors::*;
pub use fetch::*;
pub use layout::*;
pub use scan::*;
pub use tracking::*;
pub use watch::*;
