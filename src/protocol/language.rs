//! Supported source languages
//!
//! The closed set of language tags the MOSS server understands.

use std::fmt;
use std::str::FromStr;

use crate::error::SessionError;

/// A language tag accepted by the MOSS server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    C,
    Cc,
    Java,
    Ml,
    Pascal,
    Ada,
    Lisp,
    Schema,
    Haskell,
    Fortran,
    Ascii,
    Vhdl,
    Perl,
    Matlab,
    Python,
    Mips,
    Prolog,
    Spice,
    Vb,
    Csharp,
    Modula2,
    A8086,
    Javascript,
    Plsql,
}

impl Language {
    pub const ALL: [Language; 24] = [
        Language::C,
        Language::Cc,
        Language::Java,
        Language::Ml,
        Language::Pascal,
        Language::Ada,
        Language::Lisp,
        Language::Schema,
        Language::Haskell,
        Language::Fortran,
        Language::Ascii,
        Language::Vhdl,
        Language::Perl,
        Language::Matlab,
        Language::Python,
        Language::Mips,
        Language::Prolog,
        Language::Spice,
        Language::Vb,
        Language::Csharp,
        Language::Modula2,
        Language::A8086,
        Language::Javascript,
        Language::Plsql,
    ];

    /// Wire tag sent in `language` and `file` commands.
    pub fn tag(self) -> &'static str {
        match self {
            Language::C => "c",
            Language::Cc => "cc",
            Language::Java => "java",
            Language::Ml => "ml",
            Language::Pascal => "pascal",
            Language::Ada => "ada",
            Language::Lisp => "lisp",
            Language::Schema => "schema",
            Language::Haskell => "haskell",
            Language::Fortran => "fortran",
            Language::Ascii => "ascii",
            Language::Vhdl => "vhdl",
            Language::Perl => "perl",
            Language::Matlab => "matlab",
            Language::Python => "python",
            Language::Mips => "mips",
            Language::Prolog => "prolog",
            Language::Spice => "spice",
            Language::Vb => "vb",
            Language::Csharp => "csharp",
            Language::Modula2 => "modula2",
            Language::A8086 => "a8086",
            Language::Javascript => "javascript",
            Language::Plsql => "plsql",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Language {
    type Err = SessionError;

    // Tags are matched exactly; "Java" is not "java".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .iter()
            .copied()
            .find(|language| language.tag() == s)
            .ok_or_else(|| SessionError::UnsupportedLanguage(s.to_string()))
    }
}
