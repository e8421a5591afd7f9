//! Compiler invocation construction.
//!
//! Static archives are searched once, left to right, by the Propeller GNU
//! linker. Libraries that reference each other therefore need their `-l`
//! flags repeated: with K external libraries the link block is emitted K
//! times, dropping the last library after each pass.

use std::path::{Path, PathBuf};

use crate::builder::toolchain::CommandSpec;
use crate::core::action::MemoryModel;
use crate::core::library::LibraryDescriptor;

/// Flags passed on every compile.
pub const FIXED_FLAGS: [&str; 3] = ["-Os", "-m32bit-doubles", "-std=c99"];

/// The math library, linked after the sources and after every pass.
pub const MATH_LIB: &str = "-lm";

/// A single compile-and-link invocation.
#[derive(Debug, Clone)]
pub struct Invocation {
    compiler: PathBuf,
    memory_model: MemoryModel,
    libraries: Vec<LibraryDescriptor>,
    include_dirs: Vec<PathBuf>,
    cflags: Vec<String>,
    output: PathBuf,
    entry: PathBuf,
    local_sources: Vec<PathBuf>,
}

impl Invocation {
    /// Compile `entry` into `output` with `compiler`.
    pub fn new(
        compiler: impl Into<PathBuf>,
        entry: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
    ) -> Self {
        Invocation {
            compiler: compiler.into(),
            memory_model: MemoryModel::default(),
            libraries: Vec::new(),
            include_dirs: Vec::new(),
            cflags: Vec::new(),
            output: output.into(),
            entry: entry.into(),
            local_sources: Vec::new(),
        }
    }

    pub fn memory_model(mut self, model: MemoryModel) -> Self {
        self.memory_model = model;
        self
    }

    /// External libraries, in link order.
    pub fn libraries(mut self, libraries: impl IntoIterator<Item = LibraryDescriptor>) -> Self {
        self.libraries.extend(libraries);
        self
    }

    /// Extra include directory (e.g. the project working directory).
    pub fn include_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.include_dirs.push(dir.into());
        self
    }

    /// Additional compiler flags placed after the fixed flags.
    pub fn cflags(mut self, flags: impl IntoIterator<Item = String>) -> Self {
        self.cflags.extend(flags);
        self
    }

    /// Project library sources compiled alongside the entry file.
    pub fn local_sources(mut self, sources: impl IntoIterator<Item = PathBuf>) -> Self {
        self.local_sources.extend(sources);
        self
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Build the argument list.
    pub fn to_command(&self) -> CommandSpec {
        let mut cmd = CommandSpec::new(&self.compiler);

        for library in &self.libraries {
            cmd = cmd
                .arg("-I")
                .arg(path_arg(library.include_dir()))
                .arg("-L")
                .arg(path_arg(&library.lib_dir(self.memory_model)));
        }

        for dir in &self.include_dirs {
            cmd = cmd.arg("-I").arg(path_arg(dir));
        }

        cmd = cmd
            .arg(FIXED_FLAGS[0])
            .arg(self.memory_model.as_flag())
            .args(FIXED_FLAGS[1..].iter().copied())
            .args(self.cflags.iter().cloned())
            .arg("-o")
            .arg(path_arg(&self.output))
            .arg(path_arg(&self.entry))
            .args(self.local_sources.iter().map(|p| path_arg(p)))
            .arg(MATH_LIB);

        cmd.args(link_passes(&self.libraries))
    }
}

/// Repeated `-l` blocks for mutually referencing static libraries.
pub fn link_passes(libraries: &[LibraryDescriptor]) -> Vec<String> {
    let mut flags = Vec::new();
    let mut remaining = libraries;

    while !remaining.is_empty() {
        flags.extend(remaining.iter().map(LibraryDescriptor::link_flag));
        flags.push(MATH_LIB.to_string());
        remaining = &remaining[..remaining.len() - 1];
    }

    flags
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::scan::IncludeSet;

    fn lib(name: &str) -> LibraryDescriptor {
        LibraryDescriptor::new(name, format!("/repo/lib{}", name), IncludeSet::new())
    }

    fn count(args: &[String], flag: &str) -> usize {
        args.iter().filter(|a| *a == flag).count()
    }

    #[test]
    fn test_no_libraries_single_math_flag() {
        let cmd = Invocation::new("propeller-elf-gcc", "/work/main.c", "/tmp/out.elf").to_command();

        assert_eq!(
            cmd.args,
            vec![
                "-Os",
                "-mcmm",
                "-m32bit-doubles",
                "-std=c99",
                "-o",
                "/tmp/out.elf",
                "/work/main.c",
                "-lm",
            ]
        );
    }

    #[test]
    fn test_full_argument_layout() {
        let cmd = Invocation::new("/opt/parallax/bin/propeller-elf-gcc", "/work/main.c", "/tmp/out.elf")
            .libraries([lib("a"), lib("b")])
            .to_command();

        assert_eq!(cmd.program, PathBuf::from("/opt/parallax/bin/propeller-elf-gcc"));
        assert_eq!(
            cmd.args,
            vec![
                "-I", "/repo/liba", "-L", "/repo/liba/cmm",
                "-I", "/repo/libb", "-L", "/repo/libb/cmm",
                "-Os", "-mcmm", "-m32bit-doubles", "-std=c99",
                "-o", "/tmp/out.elf",
                "/work/main.c",
                "-lm",
                "-la", "-lb", "-lm",
                "-la", "-lm",
            ]
        );
    }

    #[test]
    fn test_k_libraries_give_k_passes() {
        let libs = vec![lib("a"), lib("b"), lib("c")];
        let flags = link_passes(&libs);

        assert_eq!(
            flags,
            vec!["-la", "-lb", "-lc", "-lm", "-la", "-lb", "-lm", "-la", "-lm"]
        );
        assert_eq!(count(&flags, "-lm"), 3);
        assert_eq!(count(&flags, "-la"), 3);
        assert_eq!(count(&flags, "-lc"), 1);
        assert!(link_passes(&[]).is_empty());
    }

    #[test]
    fn test_memory_model_selects_flag_and_lib_dir() {
        let cmd = Invocation::new("gcc", "main.c", "out.elf")
            .memory_model(MemoryModel::Lmm)
            .libraries([lib("servo")])
            .to_command();

        assert!(cmd.args.contains(&"-mlmm".to_string()));
        assert!(cmd.args.contains(&"/repo/libservo/lmm".to_string()));
        assert!(!cmd.args.contains(&"-mcmm".to_string()));
    }

    #[test]
    fn test_local_sources_and_include_dirs() {
        let cmd = Invocation::new("gcc", "/work/main.c", "/tmp/out.elf")
            .include_dir("/work")
            .local_sources([PathBuf::from("/work/led.c")])
            .cflags(["-Wall".to_string()])
            .to_command();

        assert_eq!(
            cmd.args,
            vec![
                "-I", "/work",
                "-Os", "-mcmm", "-m32bit-doubles", "-std=c99", "-Wall",
                "-o", "/tmp/out.elf",
                "/work/main.c", "/work/led.c",
                "-lm",
            ]
        );
    }
}
