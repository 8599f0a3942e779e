//! # Service Contracts
//!
//! The contract is the source of truth both sides of a transaction agree on: a
//! fixed, versioned table of operations keyed by stable transaction codes.
//!
//! ## Philosophy
//!
//! - **Authoring-time data**: Contracts are `static` items built from `const fn`s
//!   and never mutated. Code uniqueness is checked at compile time with
//!   `assert!(CONTRACT.has_unique_codes())` in a `const` block.
//! - **Additive evolution**: A new operation with a never-reused code is
//!   compatible. Changing an existing descriptor's kinds is a breaking change.

use crate::error::Error;
use crate::error::Result;
use crate::failure::FailureKind;
use crate::kind::Kind;

pub type TransactionCode = u32;

/// First code available to contract operations.
pub const FIRST_CALL_TRANSACTION: TransactionCode = 0x0000_0001;
/// Last code available to contract operations.
pub const LAST_CALL_TRANSACTION: TransactionCode = 0x00ff_ffff;
/// Liveness probe answered by every dispatcher with an empty reply.
pub const PING_TRANSACTION: TransactionCode = u32::from_be_bytes(*b"_PNG");
/// Asks the dispatcher for its interface descriptor.
pub const INTERFACE_TRANSACTION: TransactionCode = u32::from_be_bytes(*b"_NTF");

/// A named, typed operation parameter.
#[derive(Debug, PartialEq, Eq)]
pub struct Param {
    pub name: &'static str,
    pub kind: Kind,
}

impl Param {
    pub const fn new(name: &'static str, kind: Kind) -> Self {
        Self { name, kind }
    }
}

/// The wire schema of one remote operation.
#[derive(Debug, PartialEq, Eq)]
pub struct OperationDescriptor {
    pub name: &'static str,
    pub code: TransactionCode,
    pub params: &'static [Param],
    pub ret: Kind,
    pub failures: &'static [FailureKind],
}

impl OperationDescriptor {
    /// Returns true if the operation may signal `kind`.
    pub fn declares(&self, kind: FailureKind) -> bool {
        self.failures.contains(&kind)
    }

    /// Parameter kinds in declared order.
    pub fn param_kinds(&self) -> impl ExactSizeIterator<Item = &'static Kind> + use<> {
        let params: &'static [Param] = self.params;
        params.iter().map(|p| &p.kind)
    }
}

/// A versioned table of operations for one interface.
#[derive(Debug)]
pub struct Contract {
    /// Interface token written at the head of every request.
    pub descriptor: &'static str,
    pub version: u32,
    pub operations: &'static [OperationDescriptor],
}

impl Contract {
    /// Returns true if no two operations share a transaction code.
    pub const fn has_unique_codes(&self) -> bool {
        let ops = self.operations;
        let mut i = 0;
        while i < ops.len() {
            let mut j = i + 1;
            while j < ops.len() {
                if ops[i].code == ops[j].code {
                    return false;
                }
                j += 1;
            }
            i += 1;
        }
        true
    }

    /// Returns true if every code lies in the user call range.
    pub const fn codes_in_range(&self) -> bool {
        let ops = self.operations;
        let mut i = 0;
        while i < ops.len() {
            let code = ops[i].code;
            if code < FIRST_CALL_TRANSACTION || code > LAST_CALL_TRANSACTION {
                return false;
            }
            i += 1;
        }
        true
    }

    /// Runtime counterpart of the const checks, naming the offending operations.
    pub fn validate(&self) -> Result<()> {
        for (i, op) in self.operations.iter().enumerate() {
            if !(FIRST_CALL_TRANSACTION..=LAST_CALL_TRANSACTION).contains(&op.code) {
                return Err(Error::ReservedCode { operation: op.name, code: op.code });
            }
            if let Some(other) = self.operations[i + 1..].iter().find(|o| o.code == op.code) {
                return Err(Error::DuplicateCode { code: op.code, first: op.name, second: other.name });
            }
        }
        Ok(())
    }

    /// Looks up the descriptor for a transaction code.
    pub fn lookup(&self, code: TransactionCode) -> Option<&'static OperationDescriptor> {
        let ops: &'static [OperationDescriptor] = self.operations;
        ops.iter().find(|op| op.code == code)
    }

    /// Like `lookup`, but reports a missing code as `UnknownOperation`.
    pub fn require(&self, code: TransactionCode) -> Result<&'static OperationDescriptor> {
        self.lookup(code).ok_or(Error::UnknownOperation(code))
    }

    /// Looks up the descriptor for an operation name.
    pub fn by_name(&self, name: &str) -> Option<&'static OperationDescriptor> {
        let ops: &'static [OperationDescriptor] = self.operations;
        ops.iter().find(|op| op.name == name)
    }
}
