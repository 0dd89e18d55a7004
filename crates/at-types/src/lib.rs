pub mod candidate;
pub mod errors;
pub mod options;
pub mod params;
pub mod report;

pub use candidate::*;
pub use errors::*;
pub use options::*;
pub use params::*;
pub use report::*;
