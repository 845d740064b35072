// Instruction set
pub mod isa;

// Execution
mod cpu;
pub use cpu::{Intel8008, Processor, Step, INPUT_PORTS, OUTPUT_PORTS};

// Assembly
mod asm;
pub use asm::{assemble, Assembly, LabelMap};

// Outer shell: debugger and configuration
mod debugger;
pub use debugger::{Debugger, DebuggerOptions};
pub mod config;

pub mod error;
