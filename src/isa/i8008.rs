//! The Intel 8008 instruction table.
//!
//! Opcode values, cycle costs and alias groups follow the original
//! datasheet numbering: many mnemonics (JMP, CAL, RET, NOP, HLT, RST,
//! INP, OUT) appear under several opcodes because the hardware ignores
//! some bits of the instruction byte.

use super::AddressingMode::{self, Absolute, Immediate, Implied};
use super::AluOp::{Add, AddCarry, And, Cmp, Or, Sub, SubBorrow, Xor};
use super::Cond::{self, Always, IfClear, IfSet};
use super::Flag::{Carry, Parity, Sign, Zero};
use super::Register::{A, B, C, D, E, H, L};
use super::Rotate::{Ral, Rar, Rlc, Rrc};
use super::Target::{self, Mem, Reg};
use super::{AluOp, InstrSpec, Op};

const fn spec(
    opcode: u8,
    mnemonic: &'static str,
    mode: AddressingMode,
    cycles: u32,
    op: Op,
) -> InstrSpec {
    InstrSpec {
        opcode,
        mnemonic,
        mode,
        size: mode.size(),
        cycles,
        op,
    }
}

const fn ld(opcode: u8, mnemonic: &'static str, cycles: u32, dst: Target, src: Target) -> InstrSpec {
    spec(opcode, mnemonic, Implied, cycles, Op::Load { dst, src })
}

const fn ldi(opcode: u8, mnemonic: &'static str, cycles: u32, dst: Target) -> InstrSpec {
    spec(opcode, mnemonic, Immediate, cycles, Op::LoadImm { dst })
}

const fn alu(opcode: u8, mnemonic: &'static str, cycles: u32, op: AluOp, src: Target) -> InstrSpec {
    spec(opcode, mnemonic, Implied, cycles, Op::Alu { op, src })
}

const fn alui(opcode: u8, mnemonic: &'static str, op: AluOp) -> InstrSpec {
    spec(opcode, mnemonic, Immediate, 8, Op::AluImm { op })
}

const fn jump(opcode: u8, mnemonic: &'static str, cond: Cond) -> InstrSpec {
    spec(opcode, mnemonic, Absolute, 11, Op::Jump(cond))
}

const fn call(opcode: u8, mnemonic: &'static str, cond: Cond) -> InstrSpec {
    spec(opcode, mnemonic, Absolute, 11, Op::Call(cond))
}

const fn ret(opcode: u8, mnemonic: &'static str, cond: Cond) -> InstrSpec {
    spec(opcode, mnemonic, Implied, 5, Op::Ret(cond))
}

// The restart vector and port numbers are encoded in the opcode itself.

const fn rst(opcode: u8) -> InstrSpec {
    spec(
        opcode,
        "RST",
        Implied,
        5,
        Op::Rst {
            vector: (opcode & 0x38) as u16,
        },
    )
}

const fn inp(opcode: u8) -> InstrSpec {
    spec(
        opcode,
        "INP",
        Implied,
        8,
        Op::Input {
            port: (opcode >> 1) & 0x07,
        },
    )
}

const fn out(opcode: u8) -> InstrSpec {
    spec(
        opcode,
        "OUT",
        Implied,
        6,
        Op::Output {
            port: (opcode >> 1) & 0x1F,
        },
    )
}

const fn nop(opcode: u8) -> InstrSpec {
    spec(opcode, "NOP", Implied, 5, Op::Nop)
}

const fn hlt(opcode: u8) -> InstrSpec {
    spec(opcode, "HLT", Implied, 4, Op::Halt)
}

pub static INSTRUCTIONS: &[InstrSpec] = &[
    // Index register group. Loads leave the flags alone; increments and
    // decrements update everything except carry. Memory operands go
    // through the address held in the H:L pair.
    ld(0xC1, "LAB", 5, Reg(A), Reg(B)),
    ld(0xC2, "LAC", 5, Reg(A), Reg(C)),
    ld(0xC3, "LAD", 5, Reg(A), Reg(D)),
    ld(0xC4, "LAE", 5, Reg(A), Reg(E)),
    ld(0xC5, "LAH", 5, Reg(A), Reg(H)),
    ld(0xC6, "LAL", 5, Reg(A), Reg(L)),
    ld(0xC8, "LBA", 5, Reg(B), Reg(A)),
    ld(0xCA, "LBC", 5, Reg(B), Reg(C)),
    ld(0xCB, "LBD", 5, Reg(B), Reg(D)),
    ld(0xCC, "LBE", 5, Reg(B), Reg(E)),
    ld(0xCD, "LBH", 5, Reg(B), Reg(H)),
    ld(0xCE, "LBL", 5, Reg(B), Reg(L)),
    ld(0xD0, "LCA", 5, Reg(C), Reg(A)),
    ld(0xD1, "LCB", 5, Reg(C), Reg(B)),
    ld(0xD3, "LCD", 5, Reg(C), Reg(D)),
    ld(0xD4, "LCE", 5, Reg(C), Reg(E)),
    ld(0xD5, "LCH", 5, Reg(C), Reg(H)),
    ld(0xD6, "LCL", 5, Reg(C), Reg(L)),
    ld(0xD8, "LDA", 5, Reg(D), Reg(A)),
    ld(0xD9, "LDB", 5, Reg(D), Reg(B)),
    ld(0xDA, "LDC", 5, Reg(D), Reg(C)),
    ld(0xDC, "LDE", 5, Reg(D), Reg(E)),
    ld(0xDD, "LDH", 5, Reg(D), Reg(H)),
    ld(0xDE, "LDL", 5, Reg(D), Reg(L)),
    ld(0xE0, "LEA", 5, Reg(E), Reg(A)),
    ld(0xE1, "LEB", 5, Reg(E), Reg(B)),
    ld(0xE2, "LEC", 5, Reg(E), Reg(C)),
    ld(0xE3, "LED", 5, Reg(E), Reg(D)),
    ld(0xE5, "LEH", 5, Reg(E), Reg(H)),
    ld(0xE6, "LEL", 5, Reg(E), Reg(L)),
    ld(0xE8, "LHA", 5, Reg(H), Reg(A)),
    ld(0xE9, "LHB", 5, Reg(H), Reg(B)),
    ld(0xEA, "LHC", 5, Reg(H), Reg(C)),
    ld(0xEB, "LHD", 5, Reg(H), Reg(D)),
    ld(0xEC, "LHE", 5, Reg(H), Reg(E)),
    ld(0xEE, "LHL", 5, Reg(H), Reg(L)),
    ld(0xF0, "LLA", 5, Reg(L), Reg(A)),
    ld(0xF1, "LLB", 5, Reg(L), Reg(B)),
    ld(0xF2, "LLC", 5, Reg(L), Reg(C)),
    ld(0xF3, "LLD", 5, Reg(L), Reg(D)),
    ld(0xF4, "LLE", 5, Reg(L), Reg(E)),
    ld(0xF5, "LLH", 5, Reg(L), Reg(H)),
    ld(0xC7, "LAM", 8, Reg(A), Mem),
    ld(0xCF, "LBM", 8, Reg(B), Mem),
    ld(0xD7, "LCM", 8, Reg(C), Mem),
    ld(0xDF, "LDM", 8, Reg(D), Mem),
    ld(0xE7, "LEM", 8, Reg(E), Mem),
    ld(0xEF, "LHM", 8, Reg(H), Mem),
    ld(0xF7, "LLM", 8, Reg(L), Mem),
    ld(0xF8, "LMA", 7, Mem, Reg(A)),
    ld(0xF9, "LMB", 7, Mem, Reg(B)),
    ld(0xFA, "LMC", 7, Mem, Reg(C)),
    ld(0xFB, "LMD", 7, Mem, Reg(D)),
    ld(0xFC, "LME", 7, Mem, Reg(E)),
    ld(0xFD, "LMH", 7, Mem, Reg(H)),
    ld(0xFE, "LML", 7, Mem, Reg(L)),
    ldi(0x06, "LAI", 8, Reg(A)),
    ldi(0x0E, "LBI", 8, Reg(B)),
    ldi(0x16, "LCI", 8, Reg(C)),
    ldi(0x1E, "LDI", 8, Reg(D)),
    ldi(0x26, "LEI", 8, Reg(E)),
    ldi(0x2E, "LHI", 8, Reg(H)),
    ldi(0x36, "LLI", 8, Reg(L)),
    ldi(0x3E, "LMI", 9, Mem),
    spec(0x08, "INB", Implied, 5, Op::Inc(B)),
    spec(0x10, "INC", Implied, 5, Op::Inc(C)),
    spec(0x18, "IND", Implied, 5, Op::Inc(D)),
    spec(0x20, "INE", Implied, 5, Op::Inc(E)),
    spec(0x28, "INH", Implied, 5, Op::Inc(H)),
    spec(0x30, "INL", Implied, 5, Op::Inc(L)),
    spec(0x09, "DCB", Implied, 5, Op::Dec(B)),
    spec(0x11, "DCC", Implied, 5, Op::Dec(C)),
    spec(0x19, "DCD", Implied, 5, Op::Dec(D)),
    spec(0x21, "DCE", Implied, 5, Op::Dec(E)),
    spec(0x29, "DCH", Implied, 5, Op::Dec(H)),
    spec(0x31, "DCL", Implied, 5, Op::Dec(L)),
    // Accumulator group. Add and subtract report overflow through carry;
    // rotates touch only carry.
    alu(0x80, "ADA", 5, Add, Reg(A)),
    alu(0x81, "ADB", 5, Add, Reg(B)),
    alu(0x82, "ADC", 5, Add, Reg(C)),
    alu(0x83, "ADD", 5, Add, Reg(D)),
    alu(0x84, "ADE", 5, Add, Reg(E)),
    alu(0x85, "ADH", 5, Add, Reg(H)),
    alu(0x86, "ADL", 5, Add, Reg(L)),
    alu(0x87, "ADM", 8, Add, Mem),
    alui(0x04, "ADI", Add),
    alu(0x88, "ACA", 5, AddCarry, Reg(A)),
    alu(0x89, "ACB", 5, AddCarry, Reg(B)),
    alu(0x8A, "ACC", 5, AddCarry, Reg(C)),
    alu(0x8B, "ACD", 5, AddCarry, Reg(D)),
    alu(0x8C, "ACE", 5, AddCarry, Reg(E)),
    alu(0x8D, "ACH", 5, AddCarry, Reg(H)),
    alu(0x8E, "ACL", 5, AddCarry, Reg(L)),
    alu(0x8F, "ACM", 8, AddCarry, Mem),
    alui(0x0C, "ACI", AddCarry),
    alu(0x90, "SUA", 5, Sub, Reg(A)),
    alu(0x91, "SUB", 5, Sub, Reg(B)),
    alu(0x92, "SUC", 5, Sub, Reg(C)),
    alu(0x93, "SUD", 5, Sub, Reg(D)),
    alu(0x94, "SUE", 5, Sub, Reg(E)),
    alu(0x95, "SUH", 5, Sub, Reg(H)),
    alu(0x96, "SUL", 5, Sub, Reg(L)),
    alu(0x97, "SUM", 8, Sub, Mem),
    alui(0x14, "SUI", Sub),
    alu(0x98, "SBA", 5, SubBorrow, Reg(A)),
    alu(0x99, "SBB", 5, SubBorrow, Reg(B)),
    alu(0x9A, "SBC", 5, SubBorrow, Reg(C)),
    alu(0x9B, "SBD", 5, SubBorrow, Reg(D)),
    alu(0x9C, "SBE", 5, SubBorrow, Reg(E)),
    alu(0x9D, "SBH", 5, SubBorrow, Reg(H)),
    alu(0x9E, "SBL", 5, SubBorrow, Reg(L)),
    alu(0x9F, "SBM", 8, SubBorrow, Mem),
    alui(0x1C, "SBI", SubBorrow),
    alu(0xA0, "NDA", 5, And, Reg(A)),
    alu(0xA1, "NDB", 5, And, Reg(B)),
    alu(0xA2, "NDC", 5, And, Reg(C)),
    alu(0xA3, "NDD", 5, And, Reg(D)),
    alu(0xA4, "NDE", 5, And, Reg(E)),
    alu(0xA5, "NDH", 5, And, Reg(H)),
    alu(0xA6, "NDL", 5, And, Reg(L)),
    alu(0xA7, "NDM", 8, And, Mem),
    alui(0x24, "NDI", And),
    alu(0xA8, "XRA", 5, Xor, Reg(A)),
    alu(0xA9, "XRB", 5, Xor, Reg(B)),
    alu(0xAA, "XRC", 5, Xor, Reg(C)),
    alu(0xAB, "XRD", 5, Xor, Reg(D)),
    alu(0xAC, "XRE", 5, Xor, Reg(E)),
    alu(0xAD, "XRH", 5, Xor, Reg(H)),
    alu(0xAE, "XRL", 5, Xor, Reg(L)),
    alu(0xAF, "XRM", 8, Xor, Mem),
    alui(0x2C, "XRI", Xor),
    alu(0xB0, "ORA", 5, Or, Reg(A)),
    alu(0xB1, "ORB", 5, Or, Reg(B)),
    alu(0xB2, "ORC", 5, Or, Reg(C)),
    alu(0xB3, "ORD", 5, Or, Reg(D)),
    alu(0xB4, "ORE", 5, Or, Reg(E)),
    alu(0xB5, "ORH", 5, Or, Reg(H)),
    alu(0xB6, "ORL", 5, Or, Reg(L)),
    alu(0xB7, "ORM", 8, Or, Mem),
    alui(0x34, "ORI", Or),
    alu(0xB8, "CPA", 5, Cmp, Reg(A)),
    alu(0xB9, "CPB", 5, Cmp, Reg(B)),
    alu(0xBA, "CPC", 5, Cmp, Reg(C)),
    alu(0xBB, "CPD", 5, Cmp, Reg(D)),
    alu(0xBC, "CPE", 5, Cmp, Reg(E)),
    alu(0xBD, "CPH", 5, Cmp, Reg(H)),
    alu(0xBE, "CPL", 5, Cmp, Reg(L)),
    alu(0xBF, "CPM", 8, Cmp, Mem),
    alui(0x3C, "CPI", Cmp),
    spec(0x02, "RLC", Implied, 5, Op::Rotate(Rlc)),
    spec(0x0A, "RRC", Implied, 5, Op::Rotate(Rrc)),
    spec(0x12, "RAL", Implied, 5, Op::Rotate(Ral)),
    spec(0x1A, "RAR", Implied, 5, Op::Rotate(Rar)),
    // Program counter and stack group.
    jump(0x44, "JMP", Always),
    jump(0x4C, "JMP", Always),
    jump(0x54, "JMP", Always),
    jump(0x5C, "JMP", Always),
    jump(0x64, "JMP", Always),
    jump(0x6C, "JMP", Always),
    jump(0x74, "JMP", Always),
    jump(0x7C, "JMP", Always),
    jump(0x40, "JFC", IfClear(Carry)),
    jump(0x48, "JFZ", IfClear(Zero)),
    jump(0x50, "JFS", IfClear(Sign)),
    jump(0x58, "JFP", IfClear(Parity)),
    jump(0x60, "JTC", IfSet(Carry)),
    jump(0x68, "JTZ", IfSet(Zero)),
    jump(0x70, "JTS", IfSet(Sign)),
    jump(0x78, "JTP", IfSet(Parity)),
    call(0x46, "CAL", Always),
    call(0x4E, "CAL", Always),
    call(0x56, "CAL", Always),
    call(0x5E, "CAL", Always),
    call(0x66, "CAL", Always),
    call(0x6E, "CAL", Always),
    call(0x76, "CAL", Always),
    call(0x7E, "CAL", Always),
    call(0x42, "CFC", IfClear(Carry)),
    call(0x4A, "CFZ", IfClear(Zero)),
    call(0x52, "CFS", IfClear(Sign)),
    call(0x5A, "CFP", IfClear(Parity)),
    call(0x62, "CTC", IfSet(Carry)),
    call(0x6A, "CTZ", IfSet(Zero)),
    call(0x72, "CTS", IfSet(Sign)),
    call(0x7A, "CTP", IfSet(Parity)),
    ret(0x07, "RET", Always),
    ret(0x0F, "RET", Always),
    ret(0x17, "RET", Always),
    ret(0x1F, "RET", Always),
    ret(0x27, "RET", Always),
    ret(0x2F, "RET", Always),
    ret(0x37, "RET", Always),
    ret(0x3F, "RET", Always),
    ret(0x03, "RFC", IfClear(Carry)),
    ret(0x0B, "RFZ", IfClear(Zero)),
    ret(0x13, "RFS", IfClear(Sign)),
    ret(0x1B, "RFP", IfClear(Parity)),
    ret(0x23, "RTC", IfSet(Carry)),
    ret(0x2B, "RTZ", IfSet(Zero)),
    ret(0x33, "RTS", IfSet(Sign)),
    ret(0x3B, "RTP", IfSet(Parity)),
    rst(0x05),
    rst(0x0D),
    rst(0x15),
    rst(0x1D),
    rst(0x25),
    rst(0x2D),
    rst(0x35),
    rst(0x3D),
    // Input/output group. The port number lives in the opcode.
    inp(0x41),
    inp(0x43),
    inp(0x45),
    inp(0x47),
    inp(0x49),
    inp(0x4B),
    inp(0x4D),
    inp(0x4F),
    out(0x51),
    out(0x53),
    out(0x55),
    out(0x57),
    out(0x59),
    out(0x5B),
    out(0x5D),
    out(0x5F),
    out(0x61),
    out(0x63),
    out(0x65),
    out(0x67),
    out(0x69),
    out(0x6B),
    out(0x6D),
    out(0x6F),
    out(0x71),
    out(0x73),
    out(0x75),
    out(0x77),
    out(0x79),
    out(0x7B),
    out(0x7D),
    out(0x7F),
    nop(0xC0),
    nop(0xC9),
    nop(0xD2),
    nop(0xDB),
    nop(0xE4),
    nop(0xED),
    nop(0xF6),
    hlt(0x00),
    hlt(0x01),
    hlt(0xFF),
];

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn restart_vectors_follow_opcode_bits() {
        for spec in INSTRUCTIONS.iter().filter(|s| s.mnemonic == "RST") {
            match spec.op {
                Op::Rst { vector } => assert_eq!(vector, (spec.opcode & 0x38) as u16),
                other => panic!("RST carries {other:?}"),
            }
        }
    }

    #[test]
    fn port_numbers_split_input_output() {
        for spec in INSTRUCTIONS {
            match spec.op {
                Op::Input { port } => assert!(port < 8, "INP port {port} out of range"),
                Op::Output { port } => {
                    assert!((8..32).contains(&port), "OUT port {port} out of range")
                }
                _ => {}
            }
        }
    }
}
