//! Budget tracker module containing taxonomy management and expense
//! recording

pub mod category;
pub mod core;
pub mod expense;

pub use category::*;
pub use core::*;
pub use expense::*;
