//! Witness structures bound to the molecule codec.
//!
//! - [`Pubkey`] and its variants,
//! - [`UserInfo`] with [`RecoveryEmail`] and [`PendingState`],
//! - [`AssetLockWitness`], the payload the asset-lock script verifies,
//! - [`WitnessArgs`], the chain's generic witness container that carries it.

pub mod pubkey;
pub mod user_info;
pub mod witness;
pub mod witness_args;

pub use pubkey::{KeyType, Pubkey, RsaPubkey};
pub use user_info::{PendingState, RecoveryEmail, UserInfo};
pub use witness::{AssetLockWitness, AssetLockWitnessReader};
pub use witness_args::{WitnessArgs, WitnessArgsReader};
