//! Boost package recipe, grounded on the original tool's
//! `packages::boost::craft` helper: register `extern_dynamic_library`
//! targets for the pieces of Boost a C++ project commonly links against,
//! and an aggregate `boost` target `uses` them.

use crate::core::definition_context::DefinitionContext;

/// Link mode a craftfile wants from the Boost package. Mirrors the
/// original's bitflags even though neither flag changes the targets
/// registered below; both modes produce the same `extern_dynamic_library`
/// wiring today.
pub const STATIC_LINK: u32 = 1 << 0;
pub const DYNAMIC_LINK: u32 = 1 << 1;

/// Register the Boost targets. `options` is a bitwise-or of [`STATIC_LINK`]
/// and [`DYNAMIC_LINK`].
pub fn define(ctx: &mut DefinitionContext, _options: u32) {
    ctx.extern_dynamic_library("boost-filesystem").export_include("/usr/include").export_library_options(
        "-lboost_filesystem -lboost_thread -lboost_timer -lboost_chrono -lboost_iostreams -lpthread",
    );

    ctx.extern_dynamic_library("boost_system")
        .export_include("Extern/boost_1_52_0")
        .library_path("Extern/boost_1_52_0")
        .export_library_options("-lboost_system");

    ctx.target("boost").uses("boost_system");
}

#[cfg(test)]
mod tests {
    use super::*;
    use craft_log::Kernel;

    #[test]
    fn registers_boost_targets() {
        let mut ctx = DefinitionContext::new("/workspace", Kernel::console_only());
        define(&mut ctx, STATIC_LINK);
        assert!(ctx.get_target("boost-filesystem").is_some());
        assert!(ctx.get_target("boost_system").is_some());
        assert!(ctx.get_target("boost").is_some());
    }
}
