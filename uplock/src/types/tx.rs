// uplock/src/types/tx.rs

//! Transaction types in chain JSON-RPC shape.
//!
//! This module defines the transaction the witness protocol patches, along
//! with the cell and script types it references. The protocol only ever
//! touches two parts of a transaction:
//!
//! - `cell_deps`, which receives the proof-service dependencies and the
//!   asset-lock dependency, and
//! - `witnesses[0]`, whose `lock` field receives the asset-lock witness.
//!
//! Everything else is carried through untouched for the external submitter.

use serde::{Deserialize, Serialize};

use super::quantity::{u32_hex, u64_hex};
use super::{Hash256, JsonBytes};

/// How a dependency's out-point is interpreted by the chain.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepType {
    /// The referenced cell holds code directly.
    Code,
    /// The referenced cell holds a list of out-points to expand.
    DepGroup,
}

/// Reference to a specific output of a previous transaction.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct OutPoint {
    /// Hash of the transaction that created the cell.
    pub tx_hash: Hash256,

    /// Output index within that transaction.
    #[serde(with = "u32_hex")]
    pub index: u32,
}

impl OutPoint {
    pub fn new(tx_hash: Hash256, index: u32) -> Self {
        Self { tx_hash, index }
    }
}

/// Cell dependency of a transaction.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct CellDep {
    pub out_point: OutPoint,
    pub dep_type: DepType,
}

impl CellDep {
    pub fn new(out_point: OutPoint, dep_type: DepType) -> Self {
        Self {
            out_point,
            dep_type,
        }
    }
}

/// How a script's `code_hash` is matched against dependency cells.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptHashType {
    Data,
    Type,
    Data1,
}

/// Lock or type script.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Script {
    pub code_hash: Hash256,
    pub hash_type: ScriptHashType,
    pub args: JsonBytes,
}

/// Input cell being consumed.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct CellInput {
    /// Earliest point at which the input may be spent.
    #[serde(with = "u64_hex")]
    pub since: u64,
    pub previous_output: OutPoint,
}

/// Output cell being created.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct CellOutput {
    /// Capacity in shannons.
    #[serde(with = "u64_hex")]
    pub capacity: u64,
    pub lock: Script,
    #[serde(rename = "type", default)]
    pub type_: Option<Script>,
}

/// Full transaction: raw part plus witnesses.
///
/// Witnesses are kept as raw molecule bytes. By convention the first witness
/// is a `WitnessArgs` table whose `lock` field authorizes the inputs guarded
/// by the asset lock.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(with = "u32_hex")]
    pub version: u32,
    pub cell_deps: Vec<CellDep>,
    pub header_deps: Vec<Hash256>,
    pub inputs: Vec<CellInput>,
    pub outputs: Vec<CellOutput>,
    pub outputs_data: Vec<JsonBytes>,
    pub witnesses: Vec<JsonBytes>,
}

impl Transaction {
    /// Raw bytes of the first witness, if there is one.
    pub fn first_witness(&self) -> Option<&[u8]> {
        self.witnesses.first().map(JsonBytes::as_bytes)
    }
}
