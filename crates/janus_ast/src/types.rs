//! Modifier flags and literal values shared by both ASTs.

use std::fmt;

bitflags::bitflags! {
    /// C# declaration modifiers, kept as a set because a modifier run may
    /// carry several of them in any order.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ModifierFlags: u16 {
        const NONE      = 0;
        const PUBLIC    = 1 << 0;
        const PRIVATE   = 1 << 1;
        const PROTECTED = 1 << 2;
        const INTERNAL  = 1 << 3;
        const STATIC    = 1 << 4;
        const READONLY  = 1 << 5;
        const CONST     = 1 << 6;
        const VIRTUAL   = 1 << 7;
        const OVERRIDE  = 1 << 8;
        const ABSTRACT  = 1 << 9;
        const SEALED    = 1 << 10;
        const PARTIAL   = 1 << 11;
        const ASYNC     = 1 << 12;

        const ACCESSIBILITY = Self::PUBLIC.bits()
            | Self::PRIVATE.bits()
            | Self::PROTECTED.bits()
            | Self::INTERNAL.bits();
    }
}

impl ModifierFlags {
    /// The modifiers in canonical emission order.
    pub fn in_emission_order(self) -> impl Iterator<Item = &'static str> {
        const ORDER: [(ModifierFlags, &str); 13] = [
            (ModifierFlags::PUBLIC, "public"),
            (ModifierFlags::PRIVATE, "private"),
            (ModifierFlags::PROTECTED, "protected"),
            (ModifierFlags::INTERNAL, "internal"),
            (ModifierFlags::STATIC, "static"),
            (ModifierFlags::ABSTRACT, "abstract"),
            (ModifierFlags::SEALED, "sealed"),
            (ModifierFlags::PARTIAL, "partial"),
            (ModifierFlags::VIRTUAL, "virtual"),
            (ModifierFlags::OVERRIDE, "override"),
            (ModifierFlags::READONLY, "readonly"),
            (ModifierFlags::CONST, "const"),
            (ModifierFlags::ASYNC, "async"),
        ];
        ORDER
            .into_iter()
            .filter(move |(flag, _)| self.contains(*flag))
            .map(|(_, text)| text)
    }
}

/// A tagged literal value. String contents are stored decoded (no quotes,
/// escapes resolved); numbers keep their lexeme so suffixes and literal
/// form survive round trips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralValue<'a> {
    String(&'a str),
    Number(&'a str),
    Boolean(bool),
    Null,
}

impl fmt::Display for LiteralValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::String(s) => write!(f, "\"{}\"", s),
            LiteralValue::Number(n) => write!(f, "{}", n),
            LiteralValue::Boolean(b) => write!(f, "{}", b),
            LiteralValue::Null => write!(f, "null"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emission_order_is_stable() {
        let flags = ModifierFlags::STATIC | ModifierFlags::PUBLIC;
        let words: Vec<_> = flags.in_emission_order().collect();
        assert_eq!(words, vec!["public", "static"]);
    }

    #[test]
    fn accessibility_mask() {
        assert!(ModifierFlags::ACCESSIBILITY.contains(ModifierFlags::INTERNAL));
        assert!(!ModifierFlags::ACCESSIBILITY.contains(ModifierFlags::STATIC));
    }
}
