//! End-to-end scenarios exercising the planner and executor together
//! (spec.md §8): real source files on disk, a [`DefinitionContext`] wired up
//! the way a compiled craftfile's entry point would, planned and run exactly
//! as `craft::ops::entry::run` does internally.

use std::io::Write as _;
use std::sync::Arc;

use craft::core::{DefinitionContext, PlanContext};
use craft_log::Kernel;
use craft_test_support::project;

fn plan_and_run(definitions: DefinitionContext, configuration: &str, targets: &[&str]) -> (i32, usize) {
    let kernel = Kernel::console_only();
    let definitions = Arc::new(definitions);
    let mut plan = PlanContext::new(Arc::clone(&definitions), kernel.clone(), configuration).unwrap();
    for name in targets {
        plan.get_built_target(name).unwrap();
    }
    let mut tasks = plan.into_tasks();
    let task_count = tasks.len();
    let status = craft::core::executor::run(&mut tasks, &kernel);
    (status, task_count)
}

#[test]
fn single_program_build_produces_the_expected_binary() {
    let proj = project()
        .file(
            "main.cpp",
            r#"
            int main() { return 0; }
            "#,
        )
        .build();

    let mut definitions = DefinitionContext::new(proj.root(), Kernel::console_only());
    definitions.program("app").source("main.cpp").is_default(true);

    let (status, task_count) = plan_and_run(definitions, "release", &["app"]);
    assert_eq!(status, 0);
    assert!(task_count >= 2, "expected at least a compile and a link task");

    let binary = proj.join("build/release").join(craft_platform::Platform::host().program_file_name("app"));
    assert!(binary.exists(), "expected {binary:?} to exist after the build");
}

#[test]
fn program_links_against_a_static_library_it_uses() {
    let proj = project()
        .file(
            "util.h",
            r#"
            int answer();
            "#,
        )
        .file(
            "util.cpp",
            r#"
            #include "util.h"
            int answer() { return 42; }
            "#,
        )
        .file(
            "main.cpp",
            r#"
            #include "util.h"
            int main() { return answer() == 42 ? 0 : 1; }
            "#,
        )
        .build();

    let mut definitions = DefinitionContext::new(proj.root(), Kernel::console_only());
    definitions.static_library("util").source("util.cpp").export_include(".");
    definitions.program("app").source("main.cpp").uses("util").is_default(true);

    let (status, _) = plan_and_run(definitions, "release", &["app"]);
    assert_eq!(status, 0);

    assert!(proj.join("build/release/libutil.a").exists());
    let binary = proj.join("build/release").join(craft_platform::Platform::host().program_file_name("app"));
    assert!(binary.exists());
}

#[test]
fn a_second_plan_over_unchanged_sources_has_nothing_to_do() {
    let proj = project()
        .file(
            "main.cpp",
            r#"
            int main() { return 0; }
            "#,
        )
        .build();

    let mut first = DefinitionContext::new(proj.root(), Kernel::console_only());
    first.program("app").source("main.cpp");
    let (status, first_tasks) = plan_and_run(first, "release", &["app"]);
    assert_eq!(status, 0);
    assert!(first_tasks > 0);

    let mut second = DefinitionContext::new(proj.root(), Kernel::console_only());
    second.program("app").source("main.cpp");
    let (status, second_tasks) = plan_and_run(second, "release", &["app"]);
    assert_eq!(status, 0);
    assert_eq!(second_tasks, 0, "nothing changed since the first build, so nothing should be replanned");
}

#[test]
fn touching_a_source_after_a_build_triggers_a_rebuild() {
    let proj = project()
        .file(
            "main.cpp",
            r#"
            int main() { return 0; }
            "#,
        )
        .build();

    let mut first = DefinitionContext::new(proj.root(), Kernel::console_only());
    first.program("app").source("main.cpp");
    let (status, _) = plan_and_run(first, "release", &["app"]);
    assert_eq!(status, 0);

    craft_test_support::move_into_the_past(proj.root()).unwrap();
    craft_test_support::sleep_past_mtime_granularity();
    proj.write_file("main.cpp", "int main() { return 0; }\n");

    let mut second = DefinitionContext::new(proj.root(), Kernel::console_only());
    second.program("app").source("main.cpp");
    let (status, second_tasks) = plan_and_run(second, "release", &["app"]);
    assert_eq!(status, 0);
    assert!(second_tasks > 0, "touching the source should have forced a recompile and relink");
}

#[test]
fn separate_configurations_land_in_separate_output_directories() {
    let proj = project()
        .file(
            "main.cpp",
            r#"
            int main() { return 0; }
            "#,
        )
        .build();

    for configuration in ["debug", "release"] {
        let mut definitions = DefinitionContext::new(proj.root(), Kernel::console_only());
        definitions.program("app").source("main.cpp");
        let (status, _) = plan_and_run(definitions, configuration, &["app"]);
        assert_eq!(status, 0);
    }

    let host = craft_platform::Platform::host();
    assert!(proj.join("build/debug").join(host.program_file_name("app")).exists());
    assert!(proj.join("build/release").join(host.program_file_name("app")).exists());
}

#[test]
fn unknown_target_name_surfaces_as_an_error() {
    let proj = project().build();
    let definitions = DefinitionContext::new(proj.root(), Kernel::console_only());
    let definitions = Arc::new(definitions);
    let mut plan = PlanContext::new(definitions, Kernel::console_only(), "release").unwrap();
    let err = plan.get_built_target("does-not-exist").unwrap_err();
    assert!(err.downcast_ref::<craft::core::CraftError>().is_some());
}

#[test]
fn unarchive_extracts_the_archive_produced_by_another_target() {
    let proj = project().build();
    let archive_path = proj.join("fixture.zip");
    {
        let file = std::fs::File::create(&archive_path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        writer.start_file("hello.txt", zip::write::SimpleFileOptions::default()).unwrap();
        writer.write_all(b"hello from inside the archive").unwrap();
        writer.finish().unwrap();
    }

    let mut definitions = DefinitionContext::new(proj.root(), Kernel::console_only());
    let archive_for_closure = archive_path.clone();
    definitions.target("archive").build_with(move |_plan, id| {
        let mut built = craft::core::BuiltTarget::new(id);
        built.output_node = Some(craft::core::Node::new(archive_for_closure.clone()));
        Ok(built)
    });
    definitions.unarchive("extracted").archive("archive");

    let (status, _) = plan_and_run(definitions, "release", &["extracted"]);
    assert_eq!(status, 0);

    let extracted_file = proj.join("build/unarchived/extracted/hello.txt");
    assert!(extracted_file.exists());
    assert_eq!(std::fs::read_to_string(extracted_file).unwrap(), "hello from inside the archive");
}

#[cfg(unix)]
#[test]
fn exec_target_propagates_a_failing_process_status_unless_told_to_ignore_it() {
    use std::os::unix::fs::PermissionsExt;

    let proj = project()
        .file("fail.sh", "#!/bin/sh\nexit 3\n")
        .build();
    let script = proj.join("fail.sh");
    let mut perms = std::fs::metadata(&script).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&script, perms).unwrap();

    let mut definitions = DefinitionContext::new(proj.root(), Kernel::console_only());
    definitions.exec("check").program(script.to_string_lossy().to_string());
    let (status, _) = plan_and_run(definitions, "release", &["check"]);
    assert_eq!(status, 3);

    let mut forgiving = DefinitionContext::new(proj.root(), Kernel::console_only());
    forgiving.exec("check").program(script.to_string_lossy().to_string()).ignore_fail(true);
    let (status, _) = plan_and_run(forgiving, "release", &["check"]);
    assert_eq!(status, 0);
}
