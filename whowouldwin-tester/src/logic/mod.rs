pub mod faults;
pub mod policy;
pub mod reports;
pub mod runner;
pub mod tester;

pub use policy::PickStrategy;
pub use tester::*;
