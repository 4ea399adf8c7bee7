//! MSVC command-line conventions (spec.md §4.3/§4.4), grounded on the
//! original `msvc_compiler.cpp`'s argument assembly.

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::Context;
use craft_log::Kernel;

use crate::core::compiler::{run_logged, CompilerBackend, LinkInput};
use crate::core::configuration::Configuration;
use crate::core::error::CraftResult;

use super::dep_parse::parse_show_includes;

#[derive(Debug, Default)]
pub struct MsvcBackend;

impl MsvcBackend {
    fn include_args(include_paths: &[String]) -> Vec<String> {
        include_paths.iter().map(|p| format!("/I{p}")).collect()
    }
}

impl CompilerBackend for MsvcBackend {
    fn get_compile_dependencies(
        &self,
        source: &Path,
        include_paths: &[String],
        cwd: &Path,
    ) -> CraftResult<Vec<PathBuf>> {
        let mut args = vec!["/nologo".to_string(), "/showIncludes".to_string(), "/E".to_string()];
        args.extend(Self::include_args(include_paths));
        args.push(format!("/Tp{}", source.display()));

        let output = Command::new("cl")
            .args(&args)
            .current_dir(cwd)
            .output()
            .with_context(|| format!("failed to run `cl /showIncludes /E` on {}", source.display()))?;

        let text = String::from_utf8_lossy(&output.stdout);
        Ok(parse_show_includes(&text))
    }

    fn compile(
        &self,
        source: &Path,
        output: &Path,
        include_paths: &[String],
        configuration: &Configuration,
        kernel: &Kernel,
    ) -> CraftResult<i32> {
        let mut args = vec!["/nologo".to_string(), "/c".to_string(), "/EHsc".to_string()];
        args.extend(configuration.compile_flags.iter().cloned());
        args.extend(Self::include_args(include_paths));
        args.push(format!("/Tp{}", source.display()));
        args.push(format!("/Fo{}", output.display()));

        let cwd = output.parent().unwrap_or_else(|| Path::new("."));
        run_logged(kernel, "compile", cwd, "cl", &args)
    }

    fn link_program(
        &self,
        output: &Path,
        objects: &[PathBuf],
        inputs: &[LinkInput],
        export_library_options: &[String],
        configuration: &Configuration,
        kernel: &Kernel,
    ) -> CraftResult<i32> {
        let mut args = link_common_args(objects, inputs, export_library_options, configuration);
        args.push(format!("/OUT:{}", output.display()));

        let cwd = output.parent().unwrap_or_else(|| Path::new("."));
        run_logged(kernel, "link", cwd, "link", &args)
    }

    fn link_static_library(&self, output: &Path, objects: &[PathBuf], kernel: &Kernel) -> CraftResult<i32> {
        let mut args = vec!["/nologo".to_string()];
        args.extend(objects.iter().map(|o| o.to_string_lossy().into_owned()));
        args.push(format!("/OUT:{}", output.display()));

        let cwd = output.parent().unwrap_or_else(|| Path::new("."));
        run_logged(kernel, "archive", cwd, "lib", &args)
    }

    fn link_dynamic_library(
        &self,
        output: &Path,
        objects: &[PathBuf],
        inputs: &[LinkInput],
        export_library_options: &[String],
        configuration: &Configuration,
        kernel: &Kernel,
    ) -> CraftResult<i32> {
        let mut args = vec!["/DLL".to_string()];
        args.extend(link_common_args(objects, inputs, export_library_options, configuration));
        args.push(format!("/OUT:{}", output.display()));

        let cwd = output.parent().unwrap_or_else(|| Path::new("."));
        run_logged(kernel, "link", cwd, "link", &args)
    }
}

fn link_common_args(
    objects: &[PathBuf],
    inputs: &[LinkInput],
    export_library_options: &[String],
    configuration: &Configuration,
) -> Vec<String> {
    let mut args = vec!["/nologo".to_string()];
    args.extend(objects.iter().map(|o| o.to_string_lossy().into_owned()));

    for input in inputs {
        match input {
            LinkInput::StaticLibraryArchive(path) => args.push(path.to_string_lossy().into_owned()),
            LinkInput::DynamicLibrary { name, output_dir } => {
                args.push(format!("/LIBPATH:{}", output_dir.display()));
                args.push(format!("{name}.lib"));
            }
            LinkInput::ExternDynamicLibrary { name, library_path } => {
                if let Some(path) = library_path {
                    args.push(format!("/LIBPATH:{path}"));
                }
                args.push(format!("{name}.lib"));
            }
        }
    }

    args.extend(export_library_options.iter().cloned());
    args.extend(configuration.link_flags.iter().cloned());
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_common_args_emits_libpath_before_lib_name() {
        let objects = vec![PathBuf::from("a.obj")];
        let inputs = vec![LinkInput::DynamicLibrary { name: "dyn".into(), output_dir: PathBuf::from("C:\\out") }];
        let config = Configuration::new("release");
        let args = link_common_args(&objects, &inputs, &[], &config);
        assert!(args.contains(&"/LIBPATH:C:\\out".to_string()));
        assert!(args.contains(&"dyn.lib".to_string()));
    }
}
