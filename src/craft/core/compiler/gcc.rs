//! GCC/Clang command-line conventions (spec.md §4.3/§4.4), grounded on the
//! original `gcc_compiler.cpp`'s argument assembly.

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::Context;
use craft_log::Kernel;

use crate::core::compiler::{run_logged, CompilerBackend, LinkInput};
use crate::core::configuration::Configuration;
use crate::core::error::CraftResult;

use super::dep_parse::parse_make_rule;

#[derive(Debug, Default)]
pub struct GccBackend;

impl GccBackend {
    fn include_args(include_paths: &[String]) -> Vec<String> {
        include_paths.iter().map(|p| format!("-I{p}")).collect()
    }
}

impl CompilerBackend for GccBackend {
    fn get_compile_dependencies(
        &self,
        source: &Path,
        include_paths: &[String],
        cwd: &Path,
    ) -> CraftResult<Vec<PathBuf>> {
        let mut args = vec!["-std=c++11".to_string(), "-MM".to_string()];
        args.extend(Self::include_args(include_paths));
        args.push(source.to_string_lossy().into_owned());

        let output = Command::new("g++")
            .args(&args)
            .current_dir(cwd)
            .output()
            .with_context(|| format!("failed to run `g++ -MM` on {}", source.display()))?;

        let rule = String::from_utf8_lossy(&output.stdout);
        Ok(parse_make_rule(&rule, cwd))
    }

    fn compile(
        &self,
        source: &Path,
        output: &Path,
        include_paths: &[String],
        configuration: &Configuration,
        kernel: &Kernel,
    ) -> CraftResult<i32> {
        let mut args = vec![
            "-std=c++11".to_string(),
            "-fPIC".to_string(),
            "-c".to_string(),
            "-x".to_string(),
            "c++".to_string(),
        ];
        args.extend(configuration.compile_flags.iter().cloned());
        args.push("-I.".to_string());
        args.extend(Self::include_args(include_paths));
        args.push(source.to_string_lossy().into_owned());
        args.push("-o".to_string());
        args.push(output.to_string_lossy().into_owned());

        let cwd = output.parent().unwrap_or_else(|| Path::new("."));
        run_logged(kernel, "compile", cwd, "g++", &args)
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
        link_executable_like(output, objects, inputs, export_library_options, configuration, kernel)
    }

    fn link_static_library(&self, output: &Path, objects: &[PathBuf], kernel: &Kernel) -> CraftResult<i32> {
        let mut args = vec!["-r".to_string(), "-c".to_string(), "-s".to_string()];
        args.push(output.to_string_lossy().into_owned());
        args.extend(objects.iter().map(|o| o.to_string_lossy().into_owned()));

        let cwd = output.parent().unwrap_or_else(|| Path::new("."));
        run_logged(kernel, "archive", cwd, "ar", &args)
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
        let mut args = vec!["-B".to_string(), "/usr/bin".to_string(), "-shared".to_string()];
        args.extend(link_common_args(objects, inputs, export_library_options, configuration));
        args.push("-o".to_string());
        args.push(output.to_string_lossy().into_owned());

        let cwd = output.parent().unwrap_or_else(|| Path::new("."));
        run_logged(kernel, "link", cwd, "g++", &args)
    }
}

fn link_executable_like(
    output: &Path,
    objects: &[PathBuf],
    inputs: &[LinkInput],
    export_library_options: &[String],
    configuration: &Configuration,
    kernel: &Kernel,
) -> CraftResult<i32> {
    let mut args = vec!["-B".to_string(), "/usr/bin".to_string()];
    args.extend(link_common_args(objects, inputs, export_library_options, configuration));
    args.push("-o".to_string());
    args.push(output.to_string_lossy().into_owned());

    let cwd = output.parent().unwrap_or_else(|| Path::new("."));
    run_logged(kernel, "link", cwd, "g++", &args)
}

fn link_common_args(
    objects: &[PathBuf],
    inputs: &[LinkInput],
    export_library_options: &[String],
    configuration: &Configuration,
) -> Vec<String> {
    let mut args: Vec<String> = objects.iter().map(|o| o.to_string_lossy().into_owned()).collect();

    for input in inputs {
        match input {
            LinkInput::StaticLibraryArchive(path) => args.push(path.to_string_lossy().into_owned()),
            LinkInput::DynamicLibrary { name, output_dir } => {
                args.push(format!("-L{}", output_dir.display()));
                args.push(format!("-l{name}"));
            }
            LinkInput::ExternDynamicLibrary { name, library_path } => {
                if let Some(path) = library_path {
                    args.push(format!("-L{path}"));
                }
                args.push(format!("-l{name}"));
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
    fn link_common_args_orders_objects_then_libraries_then_flags() {
        let objects = vec![PathBuf::from("a.o")];
        let inputs = vec![
            LinkInput::StaticLibraryArchive(PathBuf::from("libstat.a")),
            LinkInput::DynamicLibrary { name: "dyn".into(), output_dir: PathBuf::from("/out") },
            LinkInput::ExternDynamicLibrary { name: "ext".into(), library_path: Some("/ext/lib".into()) },
        ];
        let config = Configuration::new("release").with_link_flags(["-lm"]);
        let args = link_common_args(&objects, &inputs, &["-Wl,-rpath,."].map(String::from), &config);
        assert_eq!(
            args,
            vec![
                "a.o",
                "libstat.a",
                "-L/out",
                "-ldyn",
                "-L/ext/lib",
                "-lext",
                "-Wl,-rpath,.",
                "-lm",
            ]
        );
    }
}
