use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// Problems with CLI flags or a JSON configuration file.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("invalid hex address `{text}`")]
    #[diagnostic(
        code(config::bad_addr),
        help("addresses are hex strings like `0x8000` or `8000`")
    )]
    BadAddress { text: String },

    #[error("invalid dump range `{text}`")]
    #[diagnostic(
        code(config::bad_range),
        help("ranges are inclusive and written `start-end`, e.g. `8010-8020`")
    )]
    BadRange { text: String },

    #[error("unsupported CPU type `{text}`")]
    #[diagnostic(code(config::cpu_type), help("available CPU types: 8008"))]
    UnknownCpu { text: String },

    #[error("program of {program} bytes at ${origin:04X} does not fit in {memory} bytes of memory")]
    #[diagnostic(
        code(config::image_too_large),
        help("raise --memory-size or lower --start-addr")
    )]
    ImageTooLarge {
        program: usize,
        origin: u16,
        memory: usize,
    },
}

/// Fatal faults raised by the execution engine. Returned to the caller;
/// the engine never terminates the process itself.
#[derive(Debug, Error, Diagnostic)]
pub enum RuntimeError {
    #[error("unknown opcode ${opcode:02X} at ${addr:04X}")]
    #[diagnostic(
        code(run::decode),
        help("the byte at the program counter does not decode to any instruction")
    )]
    Decode { opcode: u8, addr: u16 },
}

/// Faults that abort an assembly. No partial binary is ever produced.
#[derive(Debug, Error, Diagnostic)]
pub enum AssemblyError {
    #[error("unknown mnemonic `{mnemonic}` on line {line}")]
    #[diagnostic(
        code(asm::unknown_mnemonic),
        help("check the instruction listing for supported mnemonics")
    )]
    UnknownMnemonic {
        mnemonic: String,
        line: usize,
        #[label("not an instruction")]
        span: SourceSpan,
    },

    #[error("unknown label or address `{operand}` on line {line}")]
    #[diagnostic(
        code(asm::unresolved_label),
        help("jump and call targets are `$HHHH` literals or labels defined with `NAME:`")
    )]
    UnresolvedLabel {
        operand: String,
        line: usize,
        #[label("no such label")]
        span: SourceSpan,
    },

    #[error("`{mnemonic}` only loads 8 bits, got #${value:X} on line {line}")]
    #[diagnostic(
        code(asm::oversize_immediate),
        help("the H and L registers each hold one byte; split the value across both")
    )]
    OversizeImmediate {
        mnemonic: String,
        value: u16,
        line: usize,
        #[label("does not fit in one byte")]
        span: SourceSpan,
    },

    #[error("invalid operand for `{mnemonic}` on line {line}")]
    #[diagnostic(
        code(asm::bad_operand),
        help("immediates are written `#$HH`, absolute addresses `$HHHH`")
    )]
    InvalidOperand {
        mnemonic: String,
        line: usize,
        #[label("unexpected operand")]
        span: SourceSpan,
    },
}
