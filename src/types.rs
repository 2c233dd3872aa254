use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Compiler driver used by [`crate::compile::CompileOptions`].
///
/// All supported drivers accept GCC-style flags (`-c`, `-o`, `-I`, `-D`...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Compiler {
    #[serde(rename = "cc")]
    Cc,
    #[serde(rename = "c++")]
    Cxx,
    #[serde(rename = "gcc")]
    Gcc,
    #[serde(rename = "g++")]
    Gxx,
    #[serde(rename = "clang")]
    Clang,
    #[serde(rename = "clang++")]
    ClangXx,
}

impl Compiler {
    /// Program name as found on `PATH`.
    pub fn program(self) -> &'static str {
        match self {
            Compiler::Cc => "cc",
            Compiler::Cxx => "c++",
            Compiler::Gcc => "gcc",
            Compiler::Gxx => "g++",
            Compiler::Clang => "clang",
            Compiler::ClangXx => "clang++",
        }
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Compiler::Cxx
    }
}

impl fmt::Display for Compiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}

impl FromStr for Compiler {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cc" => Ok(Compiler::Cc),
            "c++" | "cxx" => Ok(Compiler::Cxx),
            "gcc" => Ok(Compiler::Gcc),
            "g++" | "gxx" => Ok(Compiler::Gxx),
            "clang" => Ok(Compiler::Clang),
            "clang++" => Ok(Compiler::ClangXx),
            other => Err(format!(
                "unknown compiler: {other} (expected cc, c++, gcc, g++, clang or clang++)"
            )),
        }
    }
}

/// What a `compile = "..."` manifest target produces.
///
/// - `Object`: compile the single dependency with `-c -o <output>`.
/// - `Executable`: link/compile every dependency with `-o <output>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompileKind {
    Object,
    Executable,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiler_names_round_trip_through_from_str() {
        for compiler in [
            Compiler::Cc,
            Compiler::Cxx,
            Compiler::Gcc,
            Compiler::Gxx,
            Compiler::Clang,
            Compiler::ClangXx,
        ] {
            assert_eq!(compiler.program().parse::<Compiler>(), Ok(compiler));
        }
        assert!("msvc".parse::<Compiler>().is_err());
    }
}
