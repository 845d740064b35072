use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use miette::{IntoDiagnostic, NamedSource, Report, Result};

use otto::config::{
    self, AsmFileConfig, CpuKind, RunFileConfig, DEFAULT_CLOCK_HZ, DEFAULT_MEMORY_SIZE,
    DEFAULT_START_ADDR,
};
use otto::error::ConfigError;
use otto::{assemble, Debugger, DebuggerOptions, Intel8008, Processor};

/// Otto is an assembler and cycle-paced emulator for the Intel 8008.
#[derive(Parser)]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Assemble `.asm` source into a raw binary image
    Asm {
        /// `.asm` file to assemble
        source: PathBuf,
        /// Destination for the binary image
        dest: PathBuf,
        /// Path to JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Load address for the program (hex string)
        #[arg(short, long)]
        start_addr: Option<String>,
        /// CPU type
        #[arg(long)]
        cpu: Option<String>,
        /// Print a hex dump of the binary after assembly
        #[arg(long)]
        dump: bool,
    },
    /// Execute a raw binary image
    Run {
        /// Binary image to run
        binary: PathBuf,
        /// Path to JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Load address and initial program counter (hex string)
        #[arg(short, long)]
        start_addr: Option<String>,
        /// Memory size in bytes
        #[arg(short, long)]
        memory_size: Option<usize>,
        /// Clock speed in Hz (0 disables pacing)
        #[arg(long)]
        speed: Option<u32>,
        /// CPU type
        #[arg(long)]
        cpu: Option<String>,
        /// Trace every instruction while running
        #[arg(short, long)]
        verbose: bool,
        /// Memory addresses to dump after the run, e.g. `8000,8010-8020`
        #[arg(short, long)]
        dump_addrs: Option<String>,
    },
    /// Execute a raw binary image under the interactive debugger
    Debug {
        /// Binary image to debug
        binary: PathBuf,
        /// Path to JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Load address and initial program counter (hex string)
        #[arg(short, long)]
        start_addr: Option<String>,
        /// Memory size in bytes
        #[arg(short, long)]
        memory_size: Option<usize>,
        /// Clock speed in Hz
        #[arg(long)]
        speed: Option<u32>,
        /// CPU type
        #[arg(long)]
        cpu: Option<String>,
        /// Read debugger commands from argument instead of stdin
        #[arg(long)]
        command: Option<String>,
        /// Memory addresses to dump after the session
        #[arg(short, long)]
        dump_addrs: Option<String>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    match args.command {
        Command::Asm {
            source,
            dest,
            config,
            start_addr,
            cpu,
            dump,
        } => {
            let file: AsmFileConfig = load_config(config.as_deref())?;
            let origin = resolve_addr(start_addr.or(file.start_addr), DEFAULT_START_ADDR)?;
            // The instruction table is per-CPU; validating the selector
            // here keeps `asm` ready for a second family.
            resolve_cpu(cpu.or(file.cpu))?;
            let source = file.source.unwrap_or(source);
            let dest = file.binary.unwrap_or(dest);
            let dump = dump || file.dump.unwrap_or(false);

            cmd_asm(&source, &dest, origin, dump)
        }
        Command::Run {
            binary,
            config,
            start_addr,
            memory_size,
            speed,
            cpu,
            verbose,
            dump_addrs,
        } => {
            let file: RunFileConfig = load_config(config.as_deref())?;
            let origin = resolve_addr(start_addr.or(file.start_addr), DEFAULT_START_ADDR)?;
            let kind = resolve_cpu(cpu.or(file.cpu))?;
            let settings = RunSettings {
                binary: file.binary.unwrap_or(binary),
                kind,
                origin,
                memory_size: memory_size.or(file.memory_size).unwrap_or(DEFAULT_MEMORY_SIZE),
                speed: speed.or(file.speed).unwrap_or(DEFAULT_CLOCK_HZ),
                verbose: verbose || file.verbose.unwrap_or(false),
                dump_addrs: dump_addrs.or(file.dump_addrs),
            };

            cmd_run(settings)
        }
        Command::Debug {
            binary,
            config,
            start_addr,
            memory_size,
            speed,
            cpu,
            command,
            dump_addrs,
        } => {
            let file: RunFileConfig = load_config(config.as_deref())?;
            let origin = resolve_addr(start_addr.or(file.start_addr), DEFAULT_START_ADDR)?;
            let kind = resolve_cpu(cpu.or(file.cpu))?;
            let settings = RunSettings {
                binary: file.binary.unwrap_or(binary),
                kind,
                origin,
                memory_size: memory_size.or(file.memory_size).unwrap_or(DEFAULT_MEMORY_SIZE),
                speed: speed.or(file.speed).unwrap_or(DEFAULT_CLOCK_HZ),
                verbose: false,
                dump_addrs: dump_addrs.or(file.dump_addrs),
            };

            cmd_debug(settings, DebuggerOptions { command })
        }
    }
}

struct RunSettings {
    binary: PathBuf,
    kind: CpuKind,
    origin: u16,
    memory_size: usize,
    speed: u32,
    verbose: bool,
    dump_addrs: Option<String>,
}

fn cmd_asm(source: &Path, dest: &Path, origin: u16, dump: bool) -> Result<()> {
    file_message(MsgColor::Green, "Assembling", source);

    let src = fs::read_to_string(source).into_diagnostic()?;
    let program = assemble(&src, origin).map_err(|e| {
        Report::new(e).with_source_code(
            NamedSource::new(source.to_string_lossy(), src.clone()),
        )
    })?;

    for (label, addr) in &program.labels {
        println!("Label: {label}, address: ${addr:04X}");
    }

    let mut file = File::create(dest).into_diagnostic()?;
    file.write_all(&program.bytes).into_diagnostic()?;

    message(MsgColor::Green, "Finished", "emit binary");
    file_message(MsgColor::Green, "Saved", dest);

    if dump {
        hex_dump(&program.bytes, origin);
    }
    Ok(())
}

fn cmd_run(settings: RunSettings) -> Result<()> {
    let mut cpu = prepare_engine(&settings)?;
    cpu.set_verbose(settings.verbose);

    message(MsgColor::Green, "Running", "loaded binary");
    cpu.run()?;

    let elapsed = cpu.elapsed();
    let achieved = cpu.cycles_per_second();
    message(MsgColor::Green, "Finished", "emulation");
    println!("  Execution completed in {elapsed:?}");
    println!("  Total cycles:  {}", cpu.cycles());
    if cpu.clock_hz() > 0 {
        println!(
            "  Average speed: {:.2} Hz ({:.2}% of target)",
            achieved,
            achieved / cpu.clock_hz() as f64 * 100.0
        );
    }

    dump_memory(&cpu, settings.dump_addrs.as_deref())?;
    Ok(())
}

fn cmd_debug(settings: RunSettings, opts: DebuggerOptions) -> Result<()> {
    let mut cpu = prepare_engine(&settings)?;

    message(MsgColor::Cyan, "Debugging", "loaded binary");
    Debugger::new(&mut cpu).run(opts);

    println!("  Total cycles:  {}", cpu.cycles());
    dump_memory(&cpu, settings.dump_addrs.as_deref())?;
    Ok(())
}

fn prepare_engine(settings: &RunSettings) -> Result<Intel8008> {
    let image = fs::read(&settings.binary).into_diagnostic()?;
    let origin = settings.origin;
    if origin as usize + image.len() > settings.memory_size {
        return Err(ConfigError::ImageTooLarge {
            program: image.len(),
            origin,
            memory: settings.memory_size,
        }
        .into());
    }

    file_message(MsgColor::Green, "Loaded", &settings.binary);
    let mut cpu = match settings.kind {
        CpuKind::I8008 => Intel8008::new(settings.memory_size, settings.speed),
    };
    cpu.load(&image, origin);
    Ok(cpu)
}

fn dump_memory(cpu: &dyn Processor, spec: Option<&str>) -> Result<()> {
    let Some(spec) = spec else {
        return Ok(());
    };
    let addresses = config::parse_dump_spec(spec)?;

    println!("Memory dump:");
    for addr in addresses {
        println!("  ${:04X}: ${:02X}", addr, cpu.read(addr));
    }
    Ok(())
}

fn hex_dump(bytes: &[u8], origin: u16) {
    for (row, chunk) in bytes.chunks(16).enumerate() {
        let addr = origin.wrapping_add((row * 16) as u16);
        let cells: Vec<String> = chunk.iter().map(|b| format!("{b:02x}")).collect();
        println!("{addr:04x}: {}", cells.join(" "));
    }
}

fn load_config<T: Default + serde::de::DeserializeOwned>(path: Option<&Path>) -> Result<T> {
    let Some(path) = path else {
        return Ok(T::default());
    };
    let text = fs::read_to_string(path).into_diagnostic()?;
    serde_json::from_str(&text).into_diagnostic()
}

fn resolve_addr(text: Option<String>, default: u16) -> Result<u16> {
    match text {
        Some(text) => Ok(config::parse_hex_addr(&text)?),
        None => Ok(default),
    }
}

fn resolve_cpu(text: Option<String>) -> Result<CpuKind> {
    match text {
        Some(text) => Ok(text.parse()?),
        None => Ok(CpuKind::default()),
    }
}

#[allow(unused)]
enum MsgColor {
    Green,
    Cyan,
    Red,
}

fn file_message(color: MsgColor, left: &str, right: &Path) {
    let right = format!("target {}", right.display());
    message(color, left, &right);
}

fn message<S>(color: MsgColor, left: S, right: S)
where
    S: Colorize + std::fmt::Display,
{
    let left = match color {
        MsgColor::Green => left.green(),
        MsgColor::Cyan => left.cyan(),
        MsgColor::Red => left.red(),
    };
    println!("{left:>12} {right}");
}
