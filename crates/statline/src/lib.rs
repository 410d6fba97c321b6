//! Top-level facade crate for statline.
//!
//! Re-exports the core types and the logger pipeline so users can depend on
//! a single crate.

pub mod core {
    pub use statline_core::*;
}

pub mod logger {
    pub use statline_logger::*;
}
