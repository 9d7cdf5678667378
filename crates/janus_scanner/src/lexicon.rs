//! Per-language lexical vocabularies: keyword tables and operator tables.
//!
//! Operators are matched longest-first against the three tables in order.

use janus_ast::SyntaxKind;
use janus_core::Language;
use rustc_hash::FxHashMap;
use std::sync::OnceLock;

use SyntaxKind::*;

/// Everything that distinguishes one language's lexer from the other's.
pub struct Lexicon {
    keywords: FxHashMap<&'static str, SyntaxKind>,
    three_char: &'static [(&'static str, SyntaxKind)],
    two_char: &'static [(&'static str, SyntaxKind)],
    one_char: &'static [(char, SyntaxKind)],
    /// `$` allowed in identifiers (JavaScript).
    pub dollar_identifiers: bool,
    /// `@"…"` verbatim strings (C#).
    pub verbatim_strings: bool,
    /// Backtick-quoted strings (JavaScript).
    pub template_strings: bool,
    /// Trailing numeric-literal suffixes `f d m l` (C#).
    pub numeric_suffixes: bool,
}

impl Lexicon {
    pub fn for_language(language: Language) -> &'static Lexicon {
        match language {
            Language::JavaScript => js_lexicon(),
            Language::CSharp => cs_lexicon(),
        }
    }

    pub fn keyword(&self, text: &str) -> Option<SyntaxKind> {
        self.keywords.get(text).copied()
    }

    /// Longest-match operator lookup at the head of `rest`. Returns the
    /// kind and its byte length.
    pub fn match_operator(&self, rest: &str) -> Option<(SyntaxKind, usize)> {
        for &(op, kind) in self.three_char {
            if rest.starts_with(op) {
                return Some((kind, 3));
            }
        }
        for &(op, kind) in self.two_char {
            if rest.starts_with(op) {
                return Some((kind, 2));
            }
        }
        let first = rest.chars().next()?;
        for &(ch, kind) in self.one_char {
            if first == ch {
                return Some((kind, first.len_utf8()));
            }
        }
        None
    }
}

const JS_KEYWORDS: &[(&str, SyntaxKind)] = &[
    ("var", VarKeyword),
    ("let", LetKeyword),
    ("const", ConstKeyword),
    ("function", FunctionKeyword),
    ("class", ClassKeyword),
    ("if", IfKeyword),
    ("else", ElseKeyword),
    ("while", WhileKeyword),
    ("for", ForKeyword),
    ("return", ReturnKeyword),
    ("break", BreakKeyword),
    ("continue", ContinueKeyword),
    ("try", TryKeyword),
    ("catch", CatchKeyword),
    ("finally", FinallyKeyword),
    ("throw", ThrowKeyword),
    ("new", NewKeyword),
    ("this", ThisKeyword),
    ("super", SuperKeyword),
    ("import", ImportKeyword),
    ("export", ExportKeyword),
    ("default", DefaultKeyword),
    ("async", AsyncKeyword),
    ("await", AwaitKeyword),
    ("switch", SwitchKeyword),
    ("case", CaseKeyword),
    ("true", TrueKeyword),
    ("false", FalseKeyword),
    ("null", NullKeyword),
    ("undefined", UndefinedKeyword),
    ("typeof", TypeOfKeyword),
    ("instanceof", InstanceOfKeyword),
    ("in", InKeyword),
    ("of", OfKeyword),
];

const CS_EXTRA_KEYWORDS: &[(&str, SyntaxKind)] = &[
    ("using", UsingKeyword),
    ("namespace", NamespaceKeyword),
    ("struct", StructKeyword),
    ("interface", InterfaceKeyword),
    ("enum", EnumKeyword),
    ("delegate", DelegateKeyword),
    ("public", PublicKeyword),
    ("private", PrivateKeyword),
    ("protected", ProtectedKeyword),
    ("internal", InternalKeyword),
    ("static", StaticKeyword),
    ("readonly", ReadonlyKeyword),
    ("virtual", VirtualKeyword),
    ("override", OverrideKeyword),
    ("abstract", AbstractKeyword),
    ("sealed", SealedKeyword),
    ("partial", PartialKeyword),
    ("int", IntKeyword),
    ("string", StringKeyword),
    ("bool", BoolKeyword),
    ("double", DoubleKeyword),
    ("float", FloatKeyword),
    ("decimal", DecimalKeyword),
    ("char", CharKeyword),
    ("byte", ByteKeyword),
    ("short", ShortKeyword),
    ("long", LongKeyword),
    ("uint", UIntKeyword),
    ("ushort", UShortKeyword),
    ("ulong", ULongKeyword),
    ("sbyte", SByteKeyword),
    ("foreach", ForeachKeyword),
    ("do", DoKeyword),
    ("base", BaseKeyword),
    ("void", VoidKeyword),
    ("out", OutKeyword),
    ("ref", RefKeyword),
    ("params", ParamsKeyword),
    ("where", WhereKeyword),
    ("select", SelectKeyword),
    ("from", FromKeyword),
    ("group", GroupKeyword),
    ("orderby", OrderByKeyword),
    ("get", GetKeyword),
    ("set", SetKeyword),
    ("add", AddKeyword),
    ("remove", RemoveKeyword),
    ("event", EventKeyword),
    ("operator", OperatorKeyword),
    ("implicit", ImplicitKeyword),
    ("explicit", ExplicitKeyword),
];

const JS_THREE_CHAR: &[(&str, SyntaxKind)] = &[
    ("===", EqualsEqualsEqualsToken),
    ("!==", ExclamationEqualsEqualsToken),
];

const JS_TWO_CHAR: &[(&str, SyntaxKind)] = &[
    ("==", EqualsEqualsToken),
    ("!=", ExclamationEqualsToken),
    ("<=", LessThanEqualsToken),
    (">=", GreaterThanEqualsToken),
    ("&&", AmpersandAmpersandToken),
    ("||", BarBarToken),
    ("++", PlusPlusToken),
    ("--", MinusMinusToken),
    ("+=", PlusEqualsToken),
    ("-=", MinusEqualsToken),
    ("*=", AsteriskEqualsToken),
    ("/=", SlashEqualsToken),
    ("%=", PercentEqualsToken),
];

const CS_THREE_CHAR: &[(&str, SyntaxKind)] = &[
    ("<<=", LessThanLessThanEqualsToken),
    (">>=", GreaterThanGreaterThanEqualsToken),
    ("??=", QuestionQuestionEqualsToken),
];

const CS_TWO_CHAR: &[(&str, SyntaxKind)] = &[
    ("==", EqualsEqualsToken),
    ("!=", ExclamationEqualsToken),
    ("<=", LessThanEqualsToken),
    (">=", GreaterThanEqualsToken),
    ("&&", AmpersandAmpersandToken),
    ("||", BarBarToken),
    ("++", PlusPlusToken),
    ("--", MinusMinusToken),
    ("+=", PlusEqualsToken),
    ("-=", MinusEqualsToken),
    ("*=", AsteriskEqualsToken),
    ("/=", SlashEqualsToken),
    ("%=", PercentEqualsToken),
    ("&=", AmpersandEqualsToken),
    ("|=", BarEqualsToken),
    ("^=", CaretEqualsToken),
    ("<<", LessThanLessThanToken),
    (">>", GreaterThanGreaterThanToken),
    ("=>", EqualsGreaterThanToken),
    ("::", ColonColonToken),
    ("??", QuestionQuestionToken),
];

const SHARED_ONE_CHAR: &[(char, SyntaxKind)] = &[
    ('(', OpenParenToken),
    (')', CloseParenToken),
    ('{', OpenBraceToken),
    ('}', CloseBraceToken),
    ('[', OpenBracketToken),
    (']', CloseBracketToken),
    (';', SemicolonToken),
    (',', CommaToken),
    ('.', DotToken),
    (':', ColonToken),
    ('?', QuestionToken),
    ('+', PlusToken),
    ('-', MinusToken),
    ('*', AsteriskToken),
    ('/', SlashToken),
    ('%', PercentToken),
    ('=', EqualsToken),
    ('<', LessThanToken),
    ('>', GreaterThanToken),
    ('!', ExclamationToken),
];

const CS_ONE_CHAR_EXTRA: &[(char, SyntaxKind)] = &[
    ('&', AmpersandToken),
    ('|', BarToken),
    ('^', CaretToken),
    ('~', TildeToken),
];

fn js_lexicon() -> &'static Lexicon {
    static LEXICON: OnceLock<Lexicon> = OnceLock::new();
    LEXICON.get_or_init(|| Lexicon {
        keywords: JS_KEYWORDS.iter().copied().collect(),
        three_char: JS_THREE_CHAR,
        two_char: JS_TWO_CHAR,
        one_char: SHARED_ONE_CHAR,
        dollar_identifiers: true,
        verbatim_strings: false,
        template_strings: true,
        numeric_suffixes: false,
    })
}

fn cs_lexicon() -> &'static Lexicon {
    static LEXICON: OnceLock<Lexicon> = OnceLock::new();
    static CS_ONE_CHAR: OnceLock<Vec<(char, SyntaxKind)>> = OnceLock::new();
    LEXICON.get_or_init(|| {
        // The C# vocabulary is a strict superset of the JavaScript one.
        let keywords = JS_KEYWORDS
            .iter()
            .chain(CS_EXTRA_KEYWORDS.iter())
            .copied()
            .collect();
        let one_char = CS_ONE_CHAR.get_or_init(|| {
            SHARED_ONE_CHAR
                .iter()
                .chain(CS_ONE_CHAR_EXTRA.iter())
                .copied()
                .collect()
        });
        Lexicon {
            keywords,
            three_char: CS_THREE_CHAR,
            two_char: CS_TWO_CHAR,
            one_char,
            dollar_identifiers: false,
            verbatim_strings: true,
            template_strings: false,
            numeric_suffixes: true,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_equality_is_javascript_only() {
        let js = Lexicon::for_language(Language::JavaScript);
        let cs = Lexicon::for_language(Language::CSharp);
        assert_eq!(js.match_operator("=== x"), Some((EqualsEqualsEqualsToken, 3)));
        assert_eq!(cs.match_operator("=== x"), Some((EqualsEqualsToken, 2)));
    }

    #[test]
    fn null_coalescing_is_csharp_only() {
        let js = Lexicon::for_language(Language::JavaScript);
        let cs = Lexicon::for_language(Language::CSharp);
        assert_eq!(cs.match_operator("??= y"), Some((QuestionQuestionEqualsToken, 3)));
        assert_eq!(cs.match_operator("?? y"), Some((QuestionQuestionToken, 2)));
        assert_eq!(js.match_operator("?? y"), Some((QuestionToken, 1)));
    }

    #[test]
    fn keyword_sets_diverge() {
        let js = Lexicon::for_language(Language::JavaScript);
        let cs = Lexicon::for_language(Language::CSharp);
        assert_eq!(js.keyword("let"), Some(LetKeyword));
        assert_eq!(cs.keyword("foreach"), Some(ForeachKeyword));
        assert_eq!(js.keyword("foreach"), None);
        assert_eq!(js.keyword("namespace"), None);
        // The C# vocabulary is a superset of the JavaScript one.
        assert_eq!(cs.keyword("let"), Some(LetKeyword));
        assert_eq!(cs.keyword("default"), Some(DefaultKeyword));
    }

    #[test]
    fn longest_match_wins() {
        let cs = Lexicon::for_language(Language::CSharp);
        assert_eq!(cs.match_operator("<<= 1"), Some((LessThanLessThanEqualsToken, 3)));
        assert_eq!(cs.match_operator("<< 1"), Some((LessThanLessThanToken, 2)));
        assert_eq!(cs.match_operator("< 1"), Some((LessThanToken, 1)));
    }
}
