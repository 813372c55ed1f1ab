use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Name of the primary source file inside a workspace
pub const SOURCE_NAME: &str = "main.tex";

/// Name of the artifact the compiler leaves behind on success
pub const ARTIFACT_NAME: &str = "main.pdf";

/// Flag passed to every engine so it never stops to ask for input
pub const INTERACTION_FLAG: &str = "-interaction=nonstopmode";

/// A supported TeX engine
///
/// The set is closed: anything not listed here is rejected before a
/// workspace is ever allocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compiler {
    Tex,
    Latex,
    Pdftex,
    #[default]
    Pdflatex,
    Xetex,
    Xelatex,
    Luatex,
    Lualatex,
}

impl Compiler {
    /// Every supported compiler, in the order they are advertised to clients
    pub const ALL: [Compiler; 8] = [
        Compiler::Tex,
        Compiler::Latex,
        Compiler::Pdftex,
        Compiler::Pdflatex,
        Compiler::Xetex,
        Compiler::Xelatex,
        Compiler::Luatex,
        Compiler::Lualatex,
    ];

    /// Name of the executable for this engine
    pub fn binary_name(self) -> &'static str {
        match self {
            Compiler::Tex => "tex",
            Compiler::Latex => "latex",
            Compiler::Pdftex => "pdftex",
            Compiler::Pdflatex => "pdflatex",
            Compiler::Xetex => "xetex",
            Compiler::Xelatex => "xelatex",
            Compiler::Luatex => "luatex",
            Compiler::Lualatex => "lualatex",
        }
    }

    /// Render the supported set as `['tex', 'latex', ...]`
    ///
    /// Existing clients match on this exact rendering in error messages.
    pub fn valid_list() -> String {
        let names: Vec<String> = Self::ALL
            .iter()
            .map(|c| format!("'{}'", c.binary_name()))
            .collect();
        format!("[{}]", names.join(", "))
    }
}

impl FromStr for Compiler {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.binary_name() == s)
            .ok_or_else(|| ConfigError::CompilerNotFound(s.to_string()))
    }
}

impl std::fmt::Display for Compiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.binary_name())
    }
}
