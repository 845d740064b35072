//! Two-pass assembler for the 8008 source format.
//!
//! Pass one walks the source once to size instructions and bind labels;
//! pass two re-walks it to emit bytes, resolving every mnemonic through
//! the shared instruction table. Both passes count addresses from the
//! same caller-supplied origin, so label arithmetic is self-consistent
//! for any load address.

use fxhash::FxBuildHasher;
use indexmap::IndexMap;
use miette::SourceSpan;

use crate::error::AssemblyError;
use crate::isa;

/// Label table preserved in definition order.
pub type LabelMap = IndexMap<String, u16, FxBuildHasher>;

/// A finished assembly: the raw image (no header, no origin marker) and
/// the labels pass one resolved.
#[derive(Debug)]
pub struct Assembly {
    pub bytes: Vec<u8>,
    pub labels: LabelMap,
}

/// Assemble `src` for loading at `origin`. Any error aborts the whole
/// assembly; no partial image is returned.
pub fn assemble(src: &str, origin: u16) -> Result<Assembly, AssemblyError> {
    let labels = collect_labels(src, origin);
    let bytes = encode(src, &labels)?;
    Ok(Assembly { bytes, labels })
}

/// Pass one: bind each `NAME:` line to the address it precedes. Operands
/// are neither needed nor validated here; unknown mnemonics fall through
/// to pass two where they carry a span for reporting.
fn collect_labels(src: &str, origin: u16) -> LabelMap {
    let mut labels = LabelMap::default();
    let mut addr = origin;

    for line in src.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with(';') {
            continue;
        }
        if let Some(name) = line.strip_suffix(':') {
            labels.insert(name.to_string(), addr);
            continue;
        }
        let Some(mnemonic) = line.split_whitespace().next() else {
            continue;
        };
        if let Some(spec) = isa::lookup_mnemonic(mnemonic) {
            addr = addr.wrapping_add(spec.size as u16);
        }
    }
    labels
}

/// Pass two: emit opcode and operand bytes in program order.
fn encode(src: &str, labels: &LabelMap) -> Result<Vec<u8>, AssemblyError> {
    let mut bytes = Vec::new();
    let mut offs = 0usize;

    for (idx, raw) in src.lines().enumerate() {
        let line_no = idx + 1;
        let line_offs = offs;
        offs += raw.len() + 1;

        // Strip the trailing comment before tokenizing.
        let code = match raw.split_once(';') {
            Some((code, _)) => code,
            None => raw,
        };
        let trimmed = code.trim();
        if trimmed.is_empty() || trimmed.ends_with(':') {
            continue;
        }

        let mut tokens = code.split_whitespace();
        let Some(mnemonic) = tokens.next() else {
            continue;
        };
        let span = |token: &str| token_span(raw, token, line_offs);

        let Some(spec) = isa::lookup_mnemonic(mnemonic) else {
            return Err(AssemblyError::UnknownMnemonic {
                mnemonic: mnemonic.to_string(),
                line: line_no,
                span: span(mnemonic),
            });
        };
        bytes.push(spec.opcode);

        let operand = tokens.next();
        if takes_address(mnemonic) {
            let Some(operand) = operand else {
                return Err(AssemblyError::InvalidOperand {
                    mnemonic: mnemonic.to_string(),
                    line: line_no,
                    span: span(mnemonic),
                });
            };
            let addr = resolve_address(operand, labels).ok_or_else(|| {
                AssemblyError::UnresolvedLabel {
                    operand: operand.to_string(),
                    line: line_no,
                    span: span(operand),
                }
            })?;
            bytes.extend_from_slice(&addr.to_le_bytes());
        } else if mnemonic.ends_with('I') {
            let Some(value) = operand.and_then(parse_immediate) else {
                return Err(AssemblyError::InvalidOperand {
                    mnemonic: mnemonic.to_string(),
                    line: line_no,
                    span: operand.map_or_else(|| span(mnemonic), span),
                });
            };
            // H and L each hold one byte of the memory pointer; refusing
            // an oversize literal beats silently truncating it.
            if matches!(mnemonic, "LHI" | "LLI") && value > 0xFF {
                return Err(AssemblyError::OversizeImmediate {
                    mnemonic: mnemonic.to_string(),
                    value,
                    line: line_no,
                    span: span(operand.unwrap_or(mnemonic)),
                });
            }
            bytes.push(value as u8);
        } else if let Some(operand) = operand {
            return Err(AssemblyError::InvalidOperand {
                mnemonic: mnemonic.to_string(),
                line: line_no,
                span: span(operand),
            });
        }
    }

    Ok(bytes)
}

/// Jump and call mnemonics all start with one of these prefixes and take
/// an absolute operand.
fn takes_address(mnemonic: &str) -> bool {
    ["J", "CA", "CF", "CT"]
        .iter()
        .any(|prefix| mnemonic.starts_with(prefix))
}

/// `$HHHH` literal or a label captured in pass one.
fn resolve_address(operand: &str, labels: &LabelMap) -> Option<u16> {
    if let Some(hex) = operand.strip_prefix('$') {
        return u16::from_str_radix(hex, 16).ok();
    }
    labels.get(operand).copied()
}

/// `#$HH` literal. Parsed at 16-bit width so oversize values can be
/// reported rather than lost in parsing.
fn parse_immediate(operand: &str) -> Option<u16> {
    let hex = operand.strip_prefix("#$")?;
    u16::from_str_radix(hex, 16).ok()
}

/// Span of `token` within the full source, given the line's offset.
/// `token` must be a subslice of `line`.
fn token_span(line: &str, token: &str, line_offs: usize) -> SourceSpan {
    let col = token.as_ptr() as usize - line.as_ptr() as usize;
    (line_offs + col, token.len()).into()
}

#[cfg(test)]
mod test {
    use super::*;

    const ORIGIN: u16 = 0x8000;

    #[test]
    fn assembles_straight_line_program() {
        let out = assemble("LAI #$05\nLBI #$03\nADB\nHLT\n", ORIGIN).unwrap();
        assert_eq!(out.bytes, [0x06, 0x05, 0x0E, 0x03, 0x81, 0x00]);
        assert!(out.labels.is_empty());
    }

    #[test]
    fn assembly_is_deterministic() {
        // JMP, CAL, RET and HLT all have aliased opcodes; encoding must
        // always pick the canonical one.
        let src = "START:\nNOP\nJMP START\nCAL START\nRET\nHLT\n";
        let first = assemble(src, ORIGIN).unwrap();
        let second = assemble(src, ORIGIN).unwrap();
        assert_eq!(first.bytes, second.bytes);
        assert_eq!(
            first.bytes,
            [0xC0, 0x44, 0x00, 0x80, 0x46, 0x00, 0x80, 0x07, 0x00]
        );
    }

    #[test]
    fn passes_agree_on_forward_labels() {
        let src = "JMP DONE\nLAI #$01\nDONE:\nHLT\n";
        let out = assemble(src, ORIGIN).unwrap();
        // JMP is 3 bytes, LAI is 2: DONE binds to origin + 5.
        assert_eq!(out.labels["DONE"], ORIGIN + 5);
        assert_eq!(out.bytes, [0x44, 0x05, 0x80, 0x06, 0x01, 0x00]);
    }

    #[test]
    fn labels_follow_the_configured_origin() {
        let src = "LOOP:\nDCB\nJFZ LOOP\nHLT\n";
        let at_zero = assemble(src, 0x0000).unwrap();
        assert_eq!(at_zero.labels["LOOP"], 0x0000);
        assert_eq!(at_zero.bytes[2..4], [0x00, 0x00]);

        let at_high = assemble(src, 0x4000).unwrap();
        assert_eq!(at_high.labels["LOOP"], 0x4000);
        assert_eq!(at_high.bytes[2..4], [0x00, 0x40]);
    }

    #[test]
    fn absolute_literals_encode_little_endian() {
        let out = assemble("JMP $1234\nHLT\n", ORIGIN).unwrap();
        assert_eq!(out.bytes, [0x44, 0x34, 0x12, 0x00]);
    }

    #[test]
    fn comments_and_blanks_are_ignored() {
        let src = "; full-line comment\n\nLAI #$10 ; trailing comment\n\nHLT\n";
        let out = assemble(src, ORIGIN).unwrap();
        assert_eq!(out.bytes, [0x06, 0x10, 0x00]);
    }

    #[test]
    fn unknown_mnemonic_aborts_with_no_output() {
        let err = assemble("LAI #$01\nZZZ\nHLT\n", ORIGIN).unwrap_err();
        match err {
            AssemblyError::UnknownMnemonic { mnemonic, line, .. } => {
                assert_eq!(mnemonic, "ZZZ");
                assert_eq!(line, 2);
            }
            other => panic!("expected unknown mnemonic, got {other:?}"),
        }
    }

    #[test]
    fn oversize_immediate_is_rejected_not_truncated() {
        for src in ["LHI #$1FF\n", "LLI #$100\n"] {
            let err = assemble(src, ORIGIN).unwrap_err();
            match err {
                AssemblyError::OversizeImmediate { value, .. } => assert!(value > 0xFF),
                other => panic!("expected oversize immediate, got {other:?}"),
            }
        }
        // The limit itself is fine.
        assert!(assemble("LHI #$FF\nHLT\n", ORIGIN).is_ok());
    }

    #[test]
    fn unresolved_label_is_fatal() {
        let err = assemble("JMP NOWHERE\n", ORIGIN).unwrap_err();
        match err {
            AssemblyError::UnresolvedLabel { operand, .. } => assert_eq!(operand, "NOWHERE"),
            other => panic!("expected unresolved label, got {other:?}"),
        }
    }

    #[test]
    fn malformed_operands_are_fatal() {
        // Immediate without the `#$` sigil.
        assert!(matches!(
            assemble("LAI $05\n", ORIGIN),
            Err(AssemblyError::InvalidOperand { .. })
        ));
        // Jump with a bare decimal operand that is not a label.
        assert!(matches!(
            assemble("JMP 8000\n", ORIGIN),
            Err(AssemblyError::UnresolvedLabel { .. })
        ));
        // Jump missing its operand entirely.
        assert!(matches!(
            assemble("JMP\n", ORIGIN),
            Err(AssemblyError::InvalidOperand { .. })
        ));
        // Operand on a no-operand instruction.
        assert!(matches!(
            assemble("NOP #$01\n", ORIGIN),
            Err(AssemblyError::InvalidOperand { .. })
        ));
        // Immediate family with a missing operand.
        assert!(matches!(
            assemble("LAI\n", ORIGIN),
            Err(AssemblyError::InvalidOperand { .. })
        ));
    }

    #[test]
    fn label_table_keeps_definition_order() {
        let src = "FIRST:\nNOP\nSECOND:\nNOP\nTHIRD:\nHLT\n";
        let out = assemble(src, ORIGIN).unwrap();
        let names: Vec<&str> = out.labels.keys().map(String::as_str).collect();
        assert_eq!(names, ["FIRST", "SECOND", "THIRD"]);
    }
}
