//! A real-mode 8086-class CPU simulator: a two-pass textual assembler, a
//! segmented memory bus, an operand resolver, and a fetch-decode-execute
//! interpreter, all driven through the `Engine` facade in [`engine`].

pub mod assembler;
pub mod bus;
pub mod engine;
pub mod error;
pub mod exec;
pub mod opcode;
pub mod operand;
pub mod registers;
pub mod snapshot;

pub use engine::{Engine, SegmentInit, StepOutcome};
pub use error::EngineError;
pub use snapshot::Snapshot;
