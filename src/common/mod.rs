pub mod bit_utils;
pub mod eci;
pub mod error;
pub mod galois;
pub mod iter;
pub mod mask;
pub mod matrix;
pub mod metadata;
pub mod mode;
pub mod rs;

pub use bit_utils::*;
pub use eci::*;
pub use error::*;
pub use iter::*;
pub use mask::*;
pub use matrix::*;
pub use metadata::*;
pub use mode::*;
pub use rs::*;
