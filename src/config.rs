//! CLI and JSON configuration surface: file-backed settings, hex address
//! parsing, and the memory-dump address specification.

use std::path::PathBuf;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_START_ADDR: u16 = 0x8000;
pub const DEFAULT_MEMORY_SIZE: usize = 65536;
pub const DEFAULT_CLOCK_HZ: u32 = 1_000_000;

/// The CPU families the toolchain can drive. Only the 8008 exists today;
/// the selector keeps the CLI surface ready for a second one.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum CpuKind {
    #[default]
    I8008,
}

impl FromStr for CpuKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "8008" => Ok(CpuKind::I8008),
            other => Err(ConfigError::UnknownCpu {
                text: other.to_string(),
            }),
        }
    }
}

/// File-backed settings for the `asm` subcommand. Every field is
/// optional; explicit CLI flags win over file values.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AsmFileConfig {
    pub source: Option<PathBuf>,
    pub binary: Option<PathBuf>,
    pub cpu: Option<String>,
    pub start_addr: Option<String>,
    pub dump: Option<bool>,
}

/// File-backed settings for the `run` and `debug` subcommands.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RunFileConfig {
    pub binary: Option<PathBuf>,
    pub start_addr: Option<String>,
    pub memory_size: Option<usize>,
    pub dump_addrs: Option<String>,
    pub cpu: Option<String>,
    pub speed: Option<u32>,
    pub verbose: Option<bool>,
}

/// Parse a hex address string, with or without a `0x` prefix.
pub fn parse_hex_addr(text: &str) -> Result<u16, ConfigError> {
    let digits = text.strip_prefix("0x").unwrap_or(text);
    u16::from_str_radix(digits, 16).map_err(|_| ConfigError::BadAddress {
        text: text.to_string(),
    })
}

/// Expand a dump specification into concrete addresses. Single addresses
/// and inclusive ranges may be joined by commas: `8000,8010-8020`.
pub fn parse_dump_spec(spec: &str) -> Result<Vec<u16>, ConfigError> {
    let mut addresses = Vec::new();

    for part in spec.split(',') {
        match part.split_once('-') {
            Some((start, end)) => {
                let start = parse_hex_addr(start)?;
                let end = parse_hex_addr(end)?;
                if start > end {
                    return Err(ConfigError::BadRange {
                        text: part.to_string(),
                    });
                }
                addresses.extend(start..=end);
            }
            None => addresses.push(parse_hex_addr(part)?),
        }
    }

    Ok(addresses)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn hex_addresses_parse_with_and_without_prefix() {
        assert_eq!(parse_hex_addr("0x8000").unwrap(), 0x8000);
        assert_eq!(parse_hex_addr("8000").unwrap(), 0x8000);
        assert_eq!(parse_hex_addr("ff").unwrap(), 0x00FF);
        assert!(matches!(
            parse_hex_addr("wat"),
            Err(ConfigError::BadAddress { .. })
        ));
        assert!(matches!(
            parse_hex_addr("10000"),
            Err(ConfigError::BadAddress { .. })
        ));
    }

    #[test]
    fn dump_specs_expand_singles_and_ranges() {
        assert_eq!(parse_dump_spec("8000").unwrap(), [0x8000]);
        assert_eq!(
            parse_dump_spec("8000,8010-8012").unwrap(),
            [0x8000, 0x8010, 0x8011, 0x8012]
        );
        assert!(matches!(
            parse_dump_spec("8020-8010"),
            Err(ConfigError::BadRange { .. })
        ));
        assert!(matches!(
            parse_dump_spec("80zz"),
            Err(ConfigError::BadAddress { .. })
        ));
    }

    #[test]
    fn cpu_selector_knows_exactly_one_family() {
        assert_eq!("8008".parse::<CpuKind>().unwrap(), CpuKind::I8008);
        assert!(matches!(
            "6502".parse::<CpuKind>(),
            Err(ConfigError::UnknownCpu { .. })
        ));
    }

    #[test]
    fn file_configs_tolerate_missing_fields() {
        let cfg: RunFileConfig = serde_json::from_str(r#"{"speed": 2000000}"#).unwrap();
        assert_eq!(cfg.speed, Some(2_000_000));
        assert!(cfg.binary.is_none());
        assert!(cfg.verbose.is_none());

        let cfg: AsmFileConfig = serde_json::from_str(r#"{"start_addr": "0x0100"}"#).unwrap();
        assert_eq!(cfg.start_addr.as_deref(), Some("0x0100"));
    }
}
