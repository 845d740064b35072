//! Interactive line-based debugger.
//!
//! A thin shell over the engine's [`Processor`] surface: everything here
//! goes through named-register, flag, memory and step access, so the
//! REPL has no knowledge of which CPU family it is driving.

use std::io::{self, BufRead, Write};

use colored::Colorize;

use crate::cpu::{Processor, Step};
use crate::error::ConfigError;
use crate::isa::{Flag, Register};

/// Leave this as a struct, in case more options are added in the future.
#[derive(Debug, Default)]
pub struct DebuggerOptions {
    /// Newline-separated commands to run instead of reading stdin.
    pub command: Option<String>,
}

pub struct Debugger<'a> {
    cpu: &'a mut dyn Processor,
    breakpoints: Vec<u16>,
}

impl<'a> Debugger<'a> {
    pub fn new(cpu: &'a mut dyn Processor) -> Self {
        Debugger {
            cpu,
            breakpoints: Vec::new(),
        }
    }

    /// Drive the command loop until `quit` or end of input.
    pub fn run(&mut self, opts: DebuggerOptions) {
        println!("otto debugger - type 'help' for commands");

        match opts.command {
            Some(script) => {
                for line in script.lines() {
                    prompt();
                    println!("{line}");
                    if !self.handle_line(line) {
                        return;
                    }
                }
            }
            None => {
                let stdin = io::stdin();
                loop {
                    prompt();
                    let mut line = String::new();
                    match stdin.lock().read_line(&mut line) {
                        Ok(0) | Err(_) => return,
                        Ok(_) => {}
                    }
                    if !self.handle_line(&line) {
                        return;
                    }
                }
            }
        }
    }

    /// Returns false when the loop should exit.
    fn handle_line(&mut self, line: &str) -> bool {
        let mut words = line.split_whitespace();
        let Some(cmd) = words.next() else {
            return true;
        };
        let args: Vec<&str> = words.collect();

        match cmd.to_lowercase().as_str() {
            "help" | "h" => print_help(),
            "break" | "b" => self.breakpoint(&args),
            "run" | "r" | "continue" | "c" => self.run_to_break(),
            "step" | "s" => self.step(),
            "registers" | "reg" => self.registers(),
            "memory" | "m" => self.memory(&args),
            "disassemble" | "d" => self.disassemble(&args),
            "watch" | "w" => self.watch(&args),
            "quit" | "q" => return false,
            unknown => println!("Unknown command: {unknown}"),
        }
        true
    }

    /// Toggle a breakpoint, or list them when called bare.
    fn breakpoint(&mut self, args: &[&str]) {
        let Some(arg) = args.first() else {
            println!("Breakpoints:");
            for addr in &self.breakpoints {
                println!("  ${addr:04X}");
            }
            return;
        };
        let Some(addr) = self.parse_addr(arg) else {
            return;
        };

        if let Some(idx) = self.breakpoints.iter().position(|&bp| bp == addr) {
            self.breakpoints.swap_remove(idx);
            println!("Removed breakpoint at ${addr:04X}");
        } else {
            self.breakpoints.push(addr);
            println!("Set breakpoint at ${addr:04X}");
        }
    }

    /// Execute until a breakpoint, the halt instruction, or a decode
    /// fault. Halt comes from the engine's step outcome, never from
    /// watching the program counter.
    fn run_to_break(&mut self) {
        loop {
            if self.breakpoints.contains(&self.cpu.pc()) {
                println!("Breakpoint hit at ${:04X}", self.cpu.pc());
                return;
            }
            match self.cpu.step() {
                Ok(Step::Running) => {}
                Ok(Step::Halted) => {
                    println!("Program halted");
                    return;
                }
                Err(e) => {
                    println!("{} {e}", "error:".red());
                    return;
                }
            }
        }
    }

    fn step(&mut self) {
        let pc = self.cpu.pc();
        let opcode = self.cpu.read(pc);
        let mnemonic = self.cpu.mnemonic_at(pc).unwrap_or("???");
        println!(
            "PC: ${:04X} | Opcode: ${:02X} {:<3} | A: ${:02X} B: ${:02X} C: ${:02X} | Flags(CZSP): {}{}{}{}",
            pc,
            opcode,
            mnemonic,
            self.cpu.register(Register::A),
            self.cpu.register(Register::B),
            self.cpu.register(Register::C),
            self.cpu.flag(Flag::Carry) as u8,
            self.cpu.flag(Flag::Zero) as u8,
            self.cpu.flag(Flag::Sign) as u8,
            self.cpu.flag(Flag::Parity) as u8,
        );

        match self.cpu.step() {
            Ok(Step::Running) => {}
            Ok(Step::Halted) => println!("Program halted"),
            Err(e) => println!("{} {e}", "error:".red()),
        }
    }

    fn registers(&self) {
        println!("PC: ${:04X}", self.cpu.pc());
        println!("SP: ${:02X}", self.cpu.sp());
        for reg in Register::ALL {
            println!("{}:  ${:02X}", reg.name(), self.cpu.register(reg));
        }
        println!(
            "Flags: C:{} Z:{} S:{} P:{}",
            self.cpu.flag(Flag::Carry) as u8,
            self.cpu.flag(Flag::Zero) as u8,
            self.cpu.flag(Flag::Sign) as u8,
            self.cpu.flag(Flag::Parity) as u8,
        );
    }

    fn memory(&self, args: &[&str]) {
        let Some(addr) = self.require_addr(args, "memory <address>") else {
            return;
        };
        println!("Memory at ${addr:04X}:");
        for i in 0..16 {
            let addr = addr.wrapping_add(i);
            println!("${:04X}: ${:02X}", addr, self.cpu.read(addr));
        }
    }

    /// Opcode-only linear scan; operand bytes show up as `???` lines.
    fn disassemble(&self, args: &[&str]) {
        let Some(addr) = self.require_addr(args, "disassemble <address>") else {
            return;
        };
        println!("Disassembly at ${addr:04X}:");
        for i in 0..10 {
            let addr = addr.wrapping_add(i);
            let opcode = self.cpu.read(addr);
            let mnemonic = self.cpu.mnemonic_at(addr).unwrap_or("???");
            println!("${addr:04X}: ${opcode:02X} {mnemonic}");
        }
    }

    /// One-shot read, not a live trap.
    fn watch(&self, args: &[&str]) {
        let Some(addr) = self.require_addr(args, "watch <address>") else {
            return;
        };
        println!("Watching memory at ${:04X}: ${:02X}", addr, self.cpu.read(addr));
    }

    fn require_addr(&self, args: &[&str], usage: &str) -> Option<u16> {
        let Some(arg) = args.first() else {
            println!("Usage: {usage}");
            return None;
        };
        self.parse_addr(arg)
    }

    fn parse_addr(&self, text: &str) -> Option<u16> {
        match parse_addr(text) {
            Ok(addr) => Some(addr),
            Err(e) => {
                println!("Invalid address: {e}");
                None
            }
        }
    }
}

/// Hex, with an optional `0x` or `$` prefix.
fn parse_addr(text: &str) -> Result<u16, ConfigError> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix('$'))
        .unwrap_or(text);
    u16::from_str_radix(digits, 16).map_err(|_| ConfigError::BadAddress {
        text: text.to_string(),
    })
}

fn prompt() {
    print!("(debug) ");
    let _ = io::stdout().flush();
}

fn print_help() {
    println!("Available commands:");
    println!("  help, h              - Show this help");
    println!("  break, b [addr]      - Toggle breakpoint at address, or list them");
    println!("  run, r               - Run until breakpoint or halt");
    println!("  step, s              - Execute one instruction");
    println!("  continue, c          - Continue execution");
    println!("  registers, reg       - Show CPU registers");
    println!("  memory, m <addr>     - Show 16 bytes of memory at address");
    println!("  disassemble, d <addr>- Disassemble 10 opcodes at address");
    println!("  watch, w <addr>      - Read memory location once");
    println!("  quit, q              - Exit debugger");
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::cpu::Intel8008;

    fn engine(image: &[u8]) -> Intel8008 {
        let mut cpu = Intel8008::new(0x10000, 0);
        cpu.load(image, 0x8000);
        cpu
    }

    #[test]
    fn addresses_accept_common_prefixes() {
        assert_eq!(parse_addr("8000").unwrap(), 0x8000);
        assert_eq!(parse_addr("0x8000").unwrap(), 0x8000);
        assert_eq!(parse_addr("$8000").unwrap(), 0x8000);
        assert!(parse_addr("nope").is_err());
    }

    #[test]
    fn breakpoints_toggle() {
        let mut cpu = engine(&[0x00]);
        let mut dbg = Debugger::new(&mut cpu);
        dbg.breakpoint(&["8004"]);
        assert_eq!(dbg.breakpoints, [0x8004]);
        dbg.breakpoint(&["8004"]);
        assert!(dbg.breakpoints.is_empty());
    }

    #[test]
    fn run_stops_at_breakpoint_before_executing() {
        // NOP NOP HLT; break on the second NOP.
        let mut cpu = engine(&[0xC0, 0xC0, 0x00]);
        let mut dbg = Debugger::new(&mut cpu);
        dbg.breakpoint(&["8001"]);
        dbg.run_to_break();
        assert_eq!(dbg.cpu.pc(), 0x8001);

        // Clearing it lets the run reach the halt.
        dbg.breakpoint(&["8001"]);
        dbg.run_to_break();
        assert_eq!(dbg.cpu.pc(), 0x8002);
    }

    #[test]
    fn scripted_session_quits_cleanly() {
        let mut cpu = engine(&[0xC0, 0x00]);
        let mut dbg = Debugger::new(&mut cpu);
        dbg.run(DebuggerOptions {
            command: Some("step\nregisters\nrun\nquit".to_string()),
        });
        assert_eq!(cpu.pc(), 0x8001);
    }
}
