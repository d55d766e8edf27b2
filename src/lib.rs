//! # doe
//!
//! Classical design-of-experiments matrices and effect screening for
//! unreplicated two-level experiments.
//!
//! ## Overview
//!
//! This library provides:
//! - Design builders: full factorial, two-level full and fractional
//!   factorial, Plackett-Burman, Box-Behnken, central composite and Latin
//!   hypercube
//! - A pluggable Hadamard table source for Plackett-Burman designs, with
//!   caching and retry wrappers
//! - Lenth's method for screening effects without replication, with
//!   p-values from a seeded Monte Carlo null distribution
//!
//! ## Quick Start
//!
//! ```rust
//! use doe::prelude::*;
//!
//! let spec = FactorSpec::new([
//!     ("Temp", vec![50.0, 25.0]),
//!     ("Concentration", vec![0.4, 0.6]),
//!     ("Enzyme", vec![-1.0, 1.0]),
//! ])
//! .unwrap();
//!
//! // 2^3 runs in standard order, first factor varying slowest
//! let design = TwoLevelFullFactorial.build(&spec).unwrap();
//! assert_eq!(design.runs(), 8);
//!
//! let yields = [60.0, 52.0, 54.0, 45.0, 72.0, 83.0, 68.0, 80.0];
//! let result = screen_responses(&design, &yields, &ScreeningConfig::default()).unwrap();
//!
//! for effect in result.significant(0.05) {
//!     println!("{}: p = {:.4}", effect.label(), effect.p_value);
//! }
//! ```
//!
//! Column order always follows the order factors were given in, and every
//! random operation takes an explicit seed, so results are reproducible.
//!
//! ## Features
//!
//! - `serde`: Enable serialization/deserialization of factors, designs and results
//! - `parallel`: Enable parallel Monte Carlo simulation using rayon
//! - `python`: Enable Python bindings via PyO3

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]

pub mod design;
pub mod error;
pub mod factor;
pub mod hadamard;
#[cfg(feature = "python")]
pub mod python;
pub mod screening;
pub mod utils;

#[cfg(feature = "parallel")]
pub mod parallel;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::design::{
        Alpha, BoxBehnken, CentralComposite, Design, DesignMatrix, FractionalFactorial,
        FullFactorial, LatinHypercube, LhsKind, PlackettBurman, TwoLevelFullFactorial,
    };
    pub use crate::error::{Error, Result};
    pub use crate::factor::{Factor, FactorId, FactorSpec};
    pub use crate::hadamard::{BuiltinHadamard, CachedTable, HadamardTable, RetryPolicy, RetryingTable};
    pub use crate::screening::{
        screen, screen_cancellable, screen_responses, CancellationToken, Effect, EffectTerm,
        ScreeningConfig, ScreeningResult,
    };

    #[cfg(feature = "parallel")]
    pub use crate::parallel::{par_screen, par_screen_cancellable, par_simulate_null};
}

// Re-export commonly used items at crate root
pub use design::{Design, DesignMatrix};
pub use error::{Error, Result};
pub use factor::{Factor, FactorId, FactorSpec};
pub use screening::{screen, screen_responses, ScreeningConfig, ScreeningResult};

#[cfg(feature = "parallel")]
pub use parallel::par_screen;
