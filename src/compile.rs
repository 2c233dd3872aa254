// src/compile.rs

//! Compiler command lines.
//!
//! [`CompileOptions`] is plain configuration: build one, clone it per
//! variant (debug/release...) and pass it to whatever registers targets.
//! It only formats arguments into a [`Cmd`]; nothing here runs anything.

use serde::Deserialize;

use crate::exec::Cmd;
use crate::types::Compiler;

/// Flags shared by every compiler invocation built from it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CompileOptions {
    pub compiler: Compiler,

    /// Language standard, emitted as `-std=<standard>` when set.
    pub standard: Option<String>,

    pub flags: Vec<String>,

    /// Emitted as `-I<path>`.
    pub include_paths: Vec<String>,

    /// Emitted as `-l<lib>`.
    pub libs: Vec<String>,

    /// Emitted as `-L<path>`.
    pub lib_paths: Vec<String>,

    /// Emitted as `-D<define>`.
    pub defines: Vec<String>,

    pub other_flags: Vec<String>,
}

impl CompileOptions {
    pub fn new(compiler: Compiler) -> Self {
        Self {
            compiler,
            ..Self::default()
        }
    }

    /// Compiler invocation over `sources`, with `extra` placed between the
    /// configured flags and the sources.
    pub fn cmd<S, E>(&self, sources: S, extra: E) -> Cmd
    where
        S: IntoIterator,
        S::Item: Into<String>,
        E: IntoIterator,
        E::Item: Into<String>,
    {
        let mut cmd = Cmd::new(self.compiler.program());
        if let Some(standard) = &self.standard {
            cmd.append(format!("-std={standard}"));
        }
        cmd.append_many(self.flags.iter().cloned())
            .append_many_prefixed("-I", &self.include_paths)
            .append_many_prefixed("-l", &self.libs)
            .append_many_prefixed("-L", &self.lib_paths)
            .append_many_prefixed("-D", &self.defines)
            .append_many(self.other_flags.iter().cloned())
            .append_many(extra)
            .append_many(sources);
        cmd
    }

    /// `<compiler> ... -c -o <output> <source>`
    pub fn object_cmd(&self, output: &str, source: &str) -> Cmd {
        self.cmd([source], ["-c", "-o", output])
    }

    /// `<compiler> ... -o <output> <sources...>`
    pub fn executable_cmd<S>(&self, output: &str, sources: S) -> Cmd
    where
        S: IntoIterator,
        S::Item: Into<String>,
    {
        self.cmd(sources, ["-o".to_string(), output.to_string()])
    }
}

/// Replace everything after the last `.` of the file name with `extension`.
///
/// `change_extension("src/main.cpp", "o") == "src/main.o"`; a name without
/// an extension gets one appended.
pub fn change_extension(file: &str, extension: &str) -> String {
    let name_start = file.rfind(['/', '\\']).map_or(0, |i| i + 1);
    let stem = match file[name_start..].rfind('.') {
        Some(dot) if dot > 0 => &file[..name_start + dot],
        _ => file,
    };
    format!("{stem}.{extension}")
}
