//! The compiler/toolchain abstraction (spec.md §2.3, §4.3, §4.4): turning a
//! target kind into concrete tool invocations and dependency-discovery
//! invocations. GCC and MSVC share the [`CompilerBackend`] interface.

mod dep_parse;
mod gcc;
mod msvc;

use std::path::{Path, PathBuf};

use craft_log::{Kernel, Level};

use crate::core::configuration::Configuration;
use crate::core::error::CraftResult;

pub use gcc::GccBackend;
pub use msvc::MsvcBackend;

/// Which family of compiler command-line conventions to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toolchain {
    Gcc,
    Msvc,
}

impl Toolchain {
    pub fn backend(self) -> Box<dyn CompilerBackend> {
        match self {
            Toolchain::Gcc => Box::new(GccBackend::default()),
            Toolchain::Msvc => Box::new(MsvcBackend::default()),
        }
    }
}

/// What a used target contributes to a link command (spec.md §4.4): a
/// dynamic library contributes `-l`/`-L`-style linking, a static library
/// contributes its literal archive path, and an extern dynamic library
/// contributes an optional search path plus `-l`, with no node dependency.
#[derive(Debug, Clone)]
pub enum LinkInput {
    DynamicLibrary { name: String, output_dir: PathBuf },
    StaticLibraryArchive(PathBuf),
    ExternDynamicLibrary { name: String, library_path: Option<String> },
}

/// GCC and MSVC both implement this; it is the only seam the rest of the
/// planner needs to know about.
pub trait CompilerBackend: Send + Sync {
    /// Invoke the compiler's dependency-listing mode and return the
    /// absolute paths of every header the source transitively includes
    /// (spec.md §4.3).
    fn get_compile_dependencies(
        &self,
        source: &Path,
        include_paths: &[String],
        cwd: &Path,
    ) -> CraftResult<Vec<PathBuf>>;

    /// Compile one source file to one object file. Returns the compiler's
    /// exit status (0 = success).
    fn compile(
        &self,
        source: &Path,
        output: &Path,
        include_paths: &[String],
        configuration: &Configuration,
        kernel: &Kernel,
    ) -> CraftResult<i32>;

    fn link_program(
        &self,
        output: &Path,
        objects: &[PathBuf],
        inputs: &[LinkInput],
        export_library_options: &[String],
        configuration: &Configuration,
        kernel: &Kernel,
    ) -> CraftResult<i32>;

    fn link_static_library(&self, output: &Path, objects: &[PathBuf], kernel: &Kernel) -> CraftResult<i32>;

    fn link_dynamic_library(
        &self,
        output: &Path,
        objects: &[PathBuf],
        inputs: &[LinkInput],
        export_library_options: &[String],
        configuration: &Configuration,
        kernel: &Kernel,
    ) -> CraftResult<i32>;
}

/// Run a process, logging its stdout/stderr through `kernel` at
/// [`Level::Verbose`] and skipping empty streams, inside a scoped section
/// named after `task_name` (spec.md §4.3/§4.4, and the original's
/// `AXE_SCOPED_SECTION` around every compiler invocation).
#[tracing::instrument(skip(kernel, args), fields(argc = args.len()))]
pub(crate) fn run_logged(
    kernel: &Kernel,
    task_name: &str,
    cwd: &Path,
    program: &str,
    args: &[String],
) -> CraftResult<i32> {
    let _span = kernel.span(task_name);
    tracing::debug!(?program, ?cwd, "invoking toolchain command");
    let mut out = String::new();
    let mut err = String::new();
    let outcome = craft_platform::process::run(cwd, program, args, |s| out.push_str(s), |s| err.push_str(s), 0)?;
    kernel.log_lines("stdout", Level::Verbose, &out);
    kernel.log_lines("stderr", Level::Verbose, &err);
    Ok(outcome.status)
}
