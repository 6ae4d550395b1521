pub mod fund;
pub mod repay;
pub mod repossess;

pub use fund::*;
pub use repay::*;
pub use repossess::*;
