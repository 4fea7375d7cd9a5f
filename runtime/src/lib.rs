//! Transaction host for tipy.
//!
//! The [`Bank`] owns an [`AccountStore`](tipy_store::AccountStore) and runs
//! signed transactions against it. Each transaction:
//!
//! 1. has every signature verified,
//! 2. locks every account it names (transactions on disjoint accounts run
//!    concurrently, overlapping ones are serialized),
//! 3. executes its instructions against a staged snapshot
//!    ([`InvocationContext`]),
//! 4. commits the staged writes in one store commit, or discards them all.
//!
//! Programs see the host only through [`InvocationContext`]: the trusted
//! clock, native transfers, token transfers, and account allocation.

pub mod bank;
pub mod context;
pub mod error;
pub mod locks;
pub mod program;
pub mod system_program;
pub mod token_program;
pub mod transaction;

pub use bank::Bank;
pub use context::InvocationContext;
pub use error::{ProgramError, SystemError, TransactionError};
pub use locks::{AccountLocks, LockGuard};
pub use program::Program;
pub use system_program::{SystemInstruction, SystemProgram};
pub use token_program::{TokenInstruction, TokenProgram};
pub use transaction::{AccountMeta, Instruction, Message, Transaction};
