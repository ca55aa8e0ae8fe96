//! # Timing Analysis
//!
//! Closed-form startup delay of SOME/IP Service Discovery for a client/service
//! pair, and the bottleneck reduction over a [`System`](crate::model::System).
//!
//! ## Key Types
//!
//! - [`DiscoveryCase`] - Which of the three mode combinations applies
//! - [`Analysis`] - A discovery time with its contributing sub-intervals
//!
//! ## Example
//!
//! ```ignore
//! use someip_sd_timing::analysis::timing_analysis;
//! use someip_sd_timing::logging::NullLogger;
//!
//! let time = timing_analysis(&service, &client, 5.0, &NullLogger)?;
//! ```
//!
//! Every function takes the logger explicitly; intermediate quantities are
//! reported at `Debug`, the selected case at `Info`.

pub mod engine;
pub mod quantities;
pub mod ssg15;
pub mod system;

pub use engine::*;
pub use quantities::*;
pub use system::*;
