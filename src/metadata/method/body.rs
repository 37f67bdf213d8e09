//! Method bodies as linear instruction sequences.
//!
//! Only what diagnostics need is kept: each instruction's IL offset, its mnemonic and a
//! printable operand. Bodies are produced by the module loader; this crate never decodes or
//! re-encodes IL.

use crate::metadata::token::Token;

/// Represents an operand in a structured way.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// No operand present
    None,
    /// 32-bit integer immediate
    Int32(i32),
    /// 64-bit integer immediate
    Int64(i64),
    /// 64-bit floating point immediate
    Float64(f64),
    /// Branch target IL offset
    Target(u32),
    /// Metadata token reference
    Token(Token),
    /// Local variable index
    Local(u16),
    /// Method argument index
    Argument(u16),
    /// User string literal
    String(String),
}

impl Operand {
    /// Returns a formatted string representation of the operand.
    ///
    /// - `None` for [`Operand::None`]
    /// - A formatted string for all other operand types
    ///
    /// # Examples
    ///
    /// ```rust
    /// use dotpatch::metadata::method::Operand;
    /// use dotpatch::metadata::token::Token;
    ///
    /// assert_eq!(Operand::None.as_string(), None);
    /// assert_eq!(Operand::Int32(42).as_string(), Some("42".to_string()));
    /// assert_eq!(Operand::Target(0x1a).as_string(), Some("IL_001a".to_string()));
    /// assert_eq!(Operand::Token(Token::new(0x0A000001)).as_string(), Some("0x0a000001".to_string()));
    /// assert_eq!(Operand::Local(5).as_string(), Some("V_5".to_string()));
    /// assert_eq!(Operand::Argument(3).as_string(), Some("A_3".to_string()));
    /// ```
    #[must_use]
    pub fn as_string(&self) -> Option<String> {
        match self {
            Operand::None => None,
            Operand::Int32(value) => Some(value.to_string()),
            Operand::Int64(value) => Some(value.to_string()),
            Operand::Float64(value) => Some(value.to_string()),
            Operand::Target(target) => Some(format!("IL_{target:04x}")),
            Operand::Token(token) => Some(token.to_string()),
            Operand::Local(index) => Some(format!("V_{index}")),
            Operand::Argument(index) => Some(format!("A_{index}")),
            Operand::String(value) => Some(format!("\"{value}\"")),
        }
    }
}

/// A single instruction of a method body.
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    /// Offset of the instruction from the start of the IL stream
    pub offset: u32,
    /// Human-readable instruction mnemonic (e.g., "ldstr", "call", "ret")
    pub mnemonic: &'static str,
    /// The operand data for this instruction
    pub operand: Operand,
}

impl Instruction {
    /// Create an instruction.
    #[must_use]
    pub fn new(offset: u32, mnemonic: &'static str, operand: Operand) -> Self {
        Instruction {
            offset,
            mnemonic,
            operand,
        }
    }
}

/// The instruction sequence of a method, in IL order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MethodBody {
    /// Instructions sorted by ascending offset
    pub instructions: Vec<Instruction>,
}

impl MethodBody {
    /// Create a body from instructions in IL order.
    #[must_use]
    pub fn new(instructions: Vec<Instruction>) -> Self {
        MethodBody { instructions }
    }

    /// Returns the instruction starting at `offset`.
    #[must_use]
    pub fn instruction_at(&self, offset: u32) -> Option<&Instruction> {
        self.instructions
            .binary_search_by_key(&offset, |instruction| instruction.offset)
            .ok()
            .map(|index| &self.instructions[index])
    }

    /// Returns `true` if the body has no instructions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body() -> MethodBody {
        MethodBody::new(vec![
            Instruction::new(0, "nop", Operand::None),
            Instruction::new(1, "ldstr", Operand::String("hi".into())),
            Instruction::new(6, "call", Operand::Token(Token::new(0x0A00_0001))),
            Instruction::new(11, "ret", Operand::None),
        ])
    }

    #[test]
    fn instruction_lookup() {
        let body = body();
        assert_eq!(body.instruction_at(6).unwrap().mnemonic, "call");
        assert!(body.instruction_at(7).is_none());
        assert!(!body.is_empty());
        assert!(MethodBody::default().is_empty());
    }

    #[test]
    fn operand_strings() {
        assert_eq!(
            Operand::String("hi".into()).as_string(),
            Some("\"hi\"".to_string())
        );
        assert_eq!(Operand::Int64(-1).as_string(), Some("-1".to_string()));
    }
}
