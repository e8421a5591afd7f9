//! Compile actions and target memory models.

use serde::{Deserialize, Serialize};

/// What a compile request should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum CompileAction {
    /// Check that the program compiles and links; no artifact is returned.
    #[default]
    Compile,
    /// Produce a binary for loading into RAM.
    Bin,
    /// Produce a binary for writing to EEPROM.
    Eeprom,
}

impl CompileAction {
    /// All actions, in declaration order.
    pub const ALL: [CompileAction; 3] = [
        CompileAction::Compile,
        CompileAction::Bin,
        CompileAction::Eeprom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CompileAction::Compile => "COMPILE",
            CompileAction::Bin => "BIN",
            CompileAction::Eeprom => "EEPROM",
        }
    }

    /// Suffix of the artifact produced by the toolchain.
    pub fn extension(&self) -> &'static str {
        match self {
            CompileAction::Compile | CompileAction::Bin | CompileAction::Eeprom => ".elf",
        }
    }

    /// Whether the artifact is read back and returned encoded.
    pub fn returns_binary(&self) -> bool {
        match self {
            CompileAction::Compile => false,
            CompileAction::Bin | CompileAction::Eeprom => true,
        }
    }
}

impl std::str::FromStr for CompileAction {
    type Err = CompileActionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "COMPILE" => Ok(CompileAction::Compile),
            "BIN" => Ok(CompileAction::Bin),
            "EEPROM" => Ok(CompileAction::Eeprom),
            _ => Err(CompileActionParseError(s.to_string())),
        }
    }
}

impl std::fmt::Display for CompileAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown compile action.
#[derive(Debug, Clone)]
pub struct CompileActionParseError(pub String);

impl std::fmt::Display for CompileActionParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid compile action '{}', valid values: COMPILE, BIN, EEPROM",
            self.0
        )
    }
}

impl std::error::Error for CompileActionParseError {}

/// Propeller code/data layout variant.
///
/// Selects both the `-m<model>` compiler flag and the subdirectory holding
/// prebuilt archives inside each library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum MemoryModel {
    /// Large memory model (hub RAM, interpreted by the LMM kernel)
    Lmm,
    /// Compact memory model
    #[default]
    Cmm,
    /// Code in external memory, data in hub RAM
    Xmmc,
    /// Code and data in a single external memory
    XmmSingle,
    /// Code and data in separate external memories
    XmmSplit,
}

impl MemoryModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemoryModel::Lmm => "lmm",
            MemoryModel::Cmm => "cmm",
            MemoryModel::Xmmc => "xmmc",
            MemoryModel::XmmSingle => "xmm-single",
            MemoryModel::XmmSplit => "xmm-split",
        }
    }

    /// Compiler flag selecting this model (e.g. `-mcmm`).
    pub fn as_flag(&self) -> String {
        format!("-m{}", self.as_str())
    }

    /// Name of the archive subdirectory inside a library.
    pub fn lib_dir_name(&self) -> &'static str {
        self.as_str()
    }
}

impl std::str::FromStr for MemoryModel {
    type Err = MemoryModelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lmm" => Ok(MemoryModel::Lmm),
            "cmm" => Ok(MemoryModel::Cmm),
            "xmmc" => Ok(MemoryModel::Xmmc),
            "xmm-single" | "xmm_single" => Ok(MemoryModel::XmmSingle),
            "xmm-split" | "xmm_split" => Ok(MemoryModel::XmmSplit),
            _ => Err(MemoryModelParseError(s.to_string())),
        }
    }
}

impl std::fmt::Display for MemoryModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown memory model.
#[derive(Debug, Clone)]
pub struct MemoryModelParseError(pub String);

impl std::fmt::Display for MemoryModelParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid memory model '{}', valid values: lmm, cmm, xmmc, xmm-single, xmm-split",
            self.0
        )
    }
}

impl std::error::Error for MemoryModelParseError {}
