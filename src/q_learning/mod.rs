//! Q-learning and SARSA temporal difference control
//!
//! TD methods bootstrap value estimates from successor states. Both agents
//! here write into a dense [`QTable`] that the training loop owns and lends
//! to them per call.
//!
//! ## Key Differences
//!
//! | Aspect | Q-learning | SARSA |
//! |--------|------------|-------|
//! | Policy | Off-policy | On-policy |
//! | Target | r + γ max_a Q(s',a) | r + γ Q(s',a') |
//! | Next action | Ignored | Used |
//!
//! ## Usage Example
//!
//! ```
//! use tdrl::q_learning::{QLearningAgent, SarsaAgent};
//!
//! let q_agent = QLearningAgent::new(
//!     0.5,  // alpha
//!     0.99, // gamma
//!     0.1,  // epsilon
//! )?
//! .with_seed(7);
//!
//! let sarsa_agent = SarsaAgent::new(0.5, 0.99, 0.1)?;
//! # Ok::<(), tdrl::Error>(())
//! ```

pub mod agent;
pub mod q_table;
pub mod serialization;

pub use agent::{QLearningAgent, SarsaAgent, TdParameters};
pub use q_table::{QTable, argmax};
pub use serialization::{SavedQTable, TdAlgorithm};
