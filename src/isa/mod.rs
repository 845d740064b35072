//! Instruction set descriptor: the static opcode table shared by the
//! assembler's encoder and the engine's decoder.

use std::sync::OnceLock;

use fxhash::FxBuildHasher;
use indexmap::IndexMap;

mod i8008;

pub use i8008::INSTRUCTIONS;

type FxMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// How an instruction's operand bytes are encoded and fetched.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AddressingMode {
    /// Opcode followed by one literal byte.
    Immediate,
    /// Opcode followed by a little-endian 16-bit address.
    Absolute,
    /// Opcode only; operands come from registers or the H:L pair.
    Implied,
    /// Opcode followed by a signed byte offset. Reserved; no 8008
    /// instruction uses it.
    Relative,
}

impl AddressingMode {
    pub const fn size(self) -> u8 {
        match self {
            AddressingMode::Implied => 1,
            AddressingMode::Immediate | AddressingMode::Relative => 2,
            AddressingMode::Absolute => 3,
        }
    }
}

/// The seven general-purpose registers. H:L together form the 16-bit
/// memory pointer for `Target::Mem` operands.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Register {
    A,
    B,
    C,
    D,
    E,
    H,
    L,
}

impl Register {
    pub const ALL: [Register; 7] = [
        Register::A,
        Register::B,
        Register::C,
        Register::D,
        Register::E,
        Register::H,
        Register::L,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Register::A => "A",
            Register::B => "B",
            Register::C => "C",
            Register::D => "D",
            Register::E => "E",
            Register::H => "H",
            Register::L => "L",
        }
    }
}

/// Condition-code flags. Parity is true for an even number of set bits.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Flag {
    Carry,
    Zero,
    Sign,
    Parity,
}

/// Source or destination of a one-byte operand.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Target {
    Reg(Register),
    /// The memory byte addressed by the H:L pair.
    Mem,
}

/// Flag condition gating a jump, call or return.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Cond {
    Always,
    IfSet(Flag),
    IfClear(Flag),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AluOp {
    Add,
    AddCarry,
    Sub,
    SubBorrow,
    And,
    Xor,
    Or,
    Cmp,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Rotate {
    /// Rotate left; bit 7 lands in both bit 0 and carry.
    Rlc,
    /// Rotate right; bit 0 lands in both bit 7 and carry.
    Rrc,
    /// Rotate left through the carry flag.
    Ral,
    /// Rotate right through the carry flag.
    Rar,
}

/// What an instruction does. Every table entry carries one of these so
/// the engine's dispatch is a closed, compiler-checked match instead of
/// string comparisons on mnemonics.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Op {
    /// Register/memory move. Does not touch the flags.
    Load { dst: Target, src: Target },
    /// Load the immediate byte. Does not touch the flags.
    LoadImm { dst: Target },
    /// Accumulator arithmetic/logic against a register or `Mem`.
    Alu { op: AluOp, src: Target },
    /// Accumulator arithmetic/logic against the immediate byte.
    AluImm { op: AluOp },
    /// Wrapping increment; updates Zero/Sign/Parity, never Carry.
    Inc(Register),
    /// Wrapping decrement; updates Zero/Sign/Parity, never Carry.
    Dec(Register),
    /// Accumulator rotate; only Carry is affected.
    Rotate(Rotate),
    Jump(Cond),
    /// Pushes the return address, then jumps.
    Call(Cond),
    Ret(Cond),
    /// One-byte call to a fixed low-memory vector.
    Rst { vector: u16 },
    /// Copy an input port into the accumulator.
    Input { port: u8 },
    /// Copy the accumulator to an output port.
    Output { port: u8 },
    Nop,
    Halt,
}

/// One row of the instruction set descriptor.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct InstrSpec {
    pub opcode: u8,
    pub mnemonic: &'static str,
    pub mode: AddressingMode,
    pub size: u8,
    pub cycles: u32,
    pub op: Op,
}

struct Tables {
    by_opcode: [Option<&'static InstrSpec>; 256],
    by_mnemonic: FxMap<&'static str, &'static InstrSpec>,
}

static TABLES: OnceLock<Tables> = OnceLock::new();

fn tables() -> &'static Tables {
    TABLES.get_or_init(|| {
        let mut by_opcode: [Option<&'static InstrSpec>; 256] = [None; 256];
        for spec in INSTRUCTIONS {
            debug_assert!(
                by_opcode[spec.opcode as usize].is_none(),
                "duplicate opcode ${:02X}",
                spec.opcode
            );
            by_opcode[spec.opcode as usize] = Some(spec);
        }
        // Walk opcodes in ascending order so an aliased mnemonic always
        // resolves to its lowest opcode, keeping assembly deterministic.
        let mut by_mnemonic = IndexMap::with_hasher(FxBuildHasher::default());
        for spec in by_opcode.iter().flatten() {
            by_mnemonic.entry(spec.mnemonic).or_insert(*spec);
        }
        Tables {
            by_opcode,
            by_mnemonic,
        }
    })
}

/// Decode one opcode byte.
pub fn lookup(opcode: u8) -> Option<&'static InstrSpec> {
    tables().by_opcode[opcode as usize]
}

/// Resolve a mnemonic to its canonical spec (lowest opcode among aliases).
pub fn lookup_mnemonic(name: &str) -> Option<&'static InstrSpec> {
    tables().by_mnemonic.get(name).copied()
}
