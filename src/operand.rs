use crate::bus::Bus;
use crate::error::EngineError;
use crate::registers::{EaReg, Reg, RegisterFile, Width};

// One signed term inside a `[...]` memory expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EaTerm {
    Reg(EaReg),
    Literal(i32),
}

/// A parsed `[bx+si+10h]`-style memory operand. The live offset is only
/// known once register values are read at execution time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveAddress {
    terms: Vec<(bool, EaTerm)>, // (negated, term)
}

impl EffectiveAddress {
    // Parses the contents of a `[...]` token; brackets already stripped.
    fn parse(inner: &str) -> Result<Self, EngineError> {
        let inner: String = inner.chars().filter(|c| !c.is_whitespace()).collect();
        if inner.is_empty() {
            return Err(EngineError::MalformedAddress(inner));
        }

        let mut terms = Vec::new();
        let mut negate = false;
        let mut start = 0usize;
        let bytes = inner.as_bytes();

        // Split on top-level '+'/'-' while keeping the sign of each term.
        // The leading character may itself be a sign (e.g. "-4+bx").
        let mut chars: Vec<(usize, char)> = inner.char_indices().collect();
        chars.push((inner.len(), '\0'));

        let mut i = 0;
        while i < chars.len() {
            let (idx, ch) = chars[i];
            if ch == '+' || ch == '-' || ch == '\0' {
                if idx > start {
                    let token = &inner[start..idx];
                    terms.push((negate, Self::parse_term(token)?));
                } else if idx == start && i != 0 {
                    return Err(EngineError::MalformedAddress(inner.clone()));
                }
                negate = ch == '-';
                start = idx + ch.len_utf8();
            }
            i += 1;
        }

        if terms.is_empty() {
            return Err(EngineError::MalformedAddress(inner));
        }

        let _ = bytes;
        Ok(EffectiveAddress { terms })
    }

    fn parse_term(token: &str) -> Result<EaTerm, EngineError> {
        if let Some(reg) = EaReg::parse(token) {
            return Ok(EaTerm::Reg(reg));
        }
        parse_integer_literal(token)
            .map(EaTerm::Literal)
            .ok_or_else(|| EngineError::MalformedAddress(token.to_string()))
    }

    pub fn offset(&self, regs: &RegisterFile) -> u16 {
        let mut acc: i32 = 0;
        for (negated, term) in &self.terms {
            let value = match term {
                EaTerm::Reg(r) => regs.get_ea_reg(*r) as i32,
                EaTerm::Literal(v) => *v,
            };
            acc = acc.wrapping_add(if *negated { -value } else { value });
        }
        (acc as u32 & 0xFFFF) as u16
    }
}

// Classified once at load time rather than re-parsed by trial on every access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Register(Reg),
    Immediate(u16),
    Memory(EffectiveAddress),
}

impl Operand {
    // Bracketed -> memory, else register, else `...h` hex, else C-style int.
    pub fn parse(token: &str) -> Result<Operand, EngineError> {
        let token = token.trim();
        if let Some(inner) = token.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
            return Ok(Operand::Memory(EffectiveAddress::parse(inner)?));
        }
        if let Some(reg) = Reg::parse(token) {
            return Ok(Operand::Register(reg));
        }
        if let Some(value) = parse_integer_literal(token) {
            return Ok(Operand::Immediate(value as u32 as u16));
        }
        Err(EngineError::InvalidOperand(token.to_string()))
    }

    pub fn is_8bit_register(&self) -> bool {
        matches!(self, Operand::Register(r) if r.is_8bit())
    }

    pub fn read(&self, regs: &RegisterFile, bus: &mut Bus, width: Width) -> u16 {
        match self {
            Operand::Register(r) => regs.get(*r),
            Operand::Immediate(v) => *v,
            Operand::Memory(ea) => {
                let offset = ea.offset(regs);
                bus.read(regs.ds, offset, width)
            }
        }
    }

    pub fn write(&self, regs: &mut RegisterFile, bus: &mut Bus, value: u16, width: Width) -> Result<(), EngineError> {
        match self {
            Operand::Register(r) => {
                regs.set(*r, value);
                Ok(())
            }
            Operand::Immediate(v) => Err(EngineError::InvalidOperand(format!("{}", v))),
            Operand::Memory(ea) => {
                let offset = ea.offset(regs);
                bus.write(regs.ds, offset, value, width);
                Ok(())
            }
        }
    }
}

// 8-bit iff a register-half operand is present, else 16-bit.
pub fn infer_width(operands: &[Operand]) -> Width {
    if operands.iter().any(Operand::is_8bit_register) {
        Width::Byte
    } else {
        Width::Word
    }
}

/// Parses `0x1A`/`26` or the x86-style `1Ah`/`7FFFh` forms. Returns `None`
/// rather than erroring so callers can try the next operand form.
pub fn parse_integer_literal(token: &str) -> Option<i32> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }

    let (sign, rest) = match token.strip_prefix('-') {
        Some(rest) => (-1i64, rest),
        None => (1i64, token),
    };

    let value = if let Some(hex) = rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16).ok()?
    } else if let Some(hex) = rest.strip_suffix('h').or_else(|| rest.strip_suffix('H')) {
        if hex.is_empty() || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        i64::from_str_radix(hex, 16).ok()?
    } else {
        rest.parse::<i64>().ok()?
    };

    Some((sign * value) as i32)
}
