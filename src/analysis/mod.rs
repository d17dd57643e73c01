pub mod correlation;
pub mod metrics;
pub mod mutual_information;
pub mod ssim;

pub use correlation::*;
pub use metrics::*;
pub use mutual_information::*;
pub use ssim::*;
