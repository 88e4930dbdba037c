//! Simulation crate: block execution and run orchestration for the auction gym.
//!
//! This crate provides:
//! - The block simulator that clears one block of opportunities sequentially
//! - The reduction that folds block results into a run result
//! - The session that validates, plans and runs blocks through an executor
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │           SimulationSession::run()           │
//! │                                              │
//! │  1. Validate config, plan BlockSpecs         │
//! │  2. BlockExecutor::execute (fan-out)         │
//! │       simulate(config, seed, offset) × N     │
//! │  3. Barrier: every block must succeed        │
//! │  4. RunAccumulator::absorb in block order    │
//! │  5. finish → RunResult, history concatenated │
//! │                                              │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! # Parallel Execution
//!
//! With the `parallel` feature, [`LocalExecutor`] spreads blocks over the rayon
//! pool through the `parallel` crate. Results are identical to a sequential run
//! because every block derives all of its randomness from its own [`BlockSpec`] seed.
//!
//! # Example
//!
//! ```ignore
//! use simulation::{LocalExecutor, SimulationSession};
//!
//! let session = SimulationSession::new(config)?;
//! let output = session.run(&LocalExecutor::new())?;
//! println!("platform revenue: {:.2}", output.run.metrics.platform_revenue);
//! ```

mod aggregate;
mod block;
mod error;
mod executor;
mod session;

pub use aggregate::{RunAccumulator, combine};
pub use block::{BlockWindow, simulate};
pub use error::{AggregationError, BlockError, ExecutorError, SimulationError};
pub use executor::{BlockExecutor, LocalExecutor};
pub use session::{BlockSpec, SimulationSession};
pub use types::RunOutput;
