use std::collections::HashMap;

use crate::error::EngineError;
use crate::opcode::Opcode;
use crate::operand::{parse_integer_literal, Operand};

// Decoded once at load time. Branch targets (JMP/Jcc/CALL/LOOP) name a
// label rather than a resolver-classified operand, hence the separate variant.
#[derive(Debug, Clone)]
pub enum DecodedInstruction {
    Operands { opcode: Opcode, operands: Vec<Operand> },
    Branch { opcode: Opcode, label: String },
}

impl DecodedInstruction {
    pub fn opcode(&self) -> Opcode {
        match self {
            DecodedInstruction::Operands { opcode, .. } => *opcode,
            DecodedInstruction::Branch { opcode, .. } => *opcode,
        }
    }

    pub fn operands(&self) -> &[Operand] {
        match self {
            DecodedInstruction::Operands { operands, .. } => operands,
            DecodedInstruction::Branch { .. } => &[],
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            DecodedInstruction::Branch { label, .. } => Some(label),
            DecodedInstruction::Operands { .. } => None,
        }
    }
}

// A line whose mnemonic or operands don't resolve keeps its error here and
// only surfaces it if the interpreter ever reaches it.
#[derive(Debug, Clone)]
pub struct ProgramEntry {
    pub decoded: Result<DecodedInstruction, EngineError>,
    pub size: u16,
}

/// Two-pass text-to-program loader. Strips comments, binds `CONST`
/// directives, resolves labels, and emits a program map keyed by physical
/// address.
#[derive(Debug, Default)]
pub struct Loader {
    pub program: HashMap<usize, ProgramEntry>,
    pub labels: HashMap<String, u16>,
    pub constants: HashMap<String, i32>,
}

// Synthetic, non-x86 instruction size; just needs to stay consistent
// between passes so labels and ip advancement agree.
fn instruction_size(operand_count: usize) -> u16 {
    2 + 2 * operand_count as u16
}

struct NormalizedLine {
    text: String,
}

impl Loader {
    pub fn new() -> Self {
        Loader::default()
    }

    // Runs all three passes against `source`, installing entries at
    // `((cs << 4) + offset) mod memory_size`.
    pub fn load(&mut self, source: &str, cs: u16, memory_size: usize) -> Result<(), EngineError> {
        self.program.clear();
        self.labels.clear();
        self.constants.clear();

        let lines = Self::normalize(source, &mut self.constants)?;

        // Pass 1: label offsets.
        let mut offset: u32 = 0;
        for line in &lines {
            if let Some(label) = line.text.strip_suffix(':') {
                self.labels.insert(label.trim().to_ascii_lowercase(), (offset & 0xFFFF) as u16);
                continue;
            }
            let operands = Self::split_operands(&line.text, &self.constants);
            offset += instruction_size(operands.len()) as u32;
        }

        // Pass 2: emit, decoding each instruction once.
        let mut offset: u32 = 0;
        for line in &lines {
            if line.text.ends_with(':') {
                continue;
            }
            let mnemonic = line
                .text
                .splitn(2, char::is_whitespace)
                .next()
                .unwrap_or("")
                .to_string();
            let operand_tokens = Self::split_operands(&line.text, &self.constants);
            let size = instruction_size(operand_tokens.len());

            let decoded = Self::decode(&mnemonic, &operand_tokens);
            let physical = ((cs as u32) << 4).wrapping_add(offset) as usize % memory_size.max(1);
            self.program.insert(physical, ProgramEntry { decoded, size });

            offset += size as u32;
        }

        Ok(())
    }

    fn decode(mnemonic: &str, operand_tokens: &[String]) -> Result<DecodedInstruction, EngineError> {
        let opcode = Opcode::parse(mnemonic)?;

        if opcode.takes_label() {
            let label = operand_tokens
                .first()
                .ok_or_else(|| EngineError::InvalidOperand(mnemonic.to_string()))?;
            return Ok(DecodedInstruction::Branch {
                opcode,
                label: label.trim().to_ascii_lowercase(),
            });
        }

        let mut operands = Vec::with_capacity(operand_tokens.len());
        for token in operand_tokens {
            operands.push(Operand::parse(token)?);
        }
        Ok(DecodedInstruction::Operands { opcode, operands })
    }

    // Splits the operand list of a line on commas, substituting any constant
    // bound by a CONST directive.
    fn split_operands(line: &str, constants: &HashMap<String, i32>) -> Vec<String> {
        let mut parts = line.splitn(2, char::is_whitespace);
        let _mnemonic = parts.next().unwrap_or("");
        let rest = parts.next().unwrap_or("").trim();
        if rest.is_empty() {
            return Vec::new();
        }
        rest.split(',')
            .map(|raw| {
                let token = raw.trim();
                match constants.get(&token.to_ascii_lowercase()) {
                    Some(value) => value.to_string(),
                    None => token.to_string(),
                }
            })
            .collect()
    }

    // Pass 0: strips comments and blank lines, binds CONST directives into
    // `constants` and discards the directive line itself.
    fn normalize(
        source: &str,
        constants: &mut HashMap<String, i32>,
    ) -> Result<Vec<NormalizedLine>, EngineError> {
        let mut lines = Vec::new();
        for raw in source.lines() {
            let without_comment = match raw.find(';') {
                Some(idx) => &raw[..idx],
                None => raw,
            };
            let trimmed = without_comment.trim();
            if trimmed.is_empty() {
                continue;
            }

            if let Some(rest) = strip_const_directive(trimmed) {
                let (name, expr) = rest;
                let value = parse_integer_literal(expr.trim())
                    .ok_or_else(|| EngineError::InvalidOperand(expr.trim().to_string()))?;
                constants.insert(name.to_ascii_lowercase(), value);
                continue;
            }

            lines.push(NormalizedLine {
                text: trimmed.to_string(),
            });
        }
        Ok(lines)
    }
}

// Recognizes `CONST NAME = EXPR`, case-insensitively on the keyword.
fn strip_const_directive(line: &str) -> Option<(&str, &str)> {
    if line.len() < 5 || !line[..5].eq_ignore_ascii_case("const") {
        return None;
    }
    let rest = &line[5..];
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let rest = rest.trim_start();
    let eq = rest.find('=')?;
    let name = rest[..eq].trim();
    let first = name.chars().next()?;
    if !(first.is_alphabetic() || first == '_') {
        return None;
    }
    let expr = &rest[eq + 1..];
    Some((name, expr))
}
