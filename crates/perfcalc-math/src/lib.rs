//! # Perfcalc Math
//!
//! Numerical utilities for the Perfcalc performance analytics library.
//!
//! This crate provides:
//!
//! - **Solvers**: Newton-Raphson root finding with a per-guess outcome
//! - **Rolling**: Sliding windows over indexed columns with missing values,
//!   and the windowed statistics computed over them
//!
//! ## Design Philosophy
//!
//! - **No panics on bad numbers**: overflow, zero derivatives and NaN are
//!   reported as values the caller can branch on
//! - **Missing is not zero**: absent observations are `None` and are never
//!   silently filled

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::uninlined_format_args)]

pub mod error;
pub mod rolling;
pub mod solvers;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::rolling::{rolling_apply, RollingWindows};
    pub use crate::solvers::{newton_raphson, NewtonOutcome, SolverConfig, SolverResult};
}

pub use error::{MathError, MathResult};
