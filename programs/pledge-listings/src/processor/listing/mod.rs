pub mod cancel;
pub mod close;
pub mod initialize;

pub use cancel::*;
pub use close::*;
pub use initialize::*;
