//! Phase-driven orchestrator for distributed key generation sessions.
//!
//! The driver coordinates the deal / response / justification exchange
//! between participants: it authenticates every packet arriving from the
//! [`board::Board`], hands the per-phase buffers to the
//! [`dkg_core::domain::DkgEngine`] on each transition announced by the
//! [`phaser::Phaser`], signs and pushes the engine's output back to the
//! board, and delivers exactly one terminal outcome to the caller.

pub mod auth;
pub mod board;
pub mod config;
pub mod phaser;
pub mod protocol;

pub use auth::{Authenticator, EcdsaScheme, SignatureScheme};
pub use board::{Board, Subscription};
pub use config::Config;
pub use phaser::{Phaser, SteppedControl, SteppedPhaser, TimePhaser};
pub use protocol::{Protocol, ProtocolHandle, ProtocolOutcome};
