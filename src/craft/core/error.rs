use thiserror::Error;

/// The result type used throughout craft's core: most call chains just
/// need `anyhow`'s `.context(...)` ergonomics, matching cargo's own
/// `CargoResult`.
pub type CraftResult<T> = anyhow::Result<T>;

/// Leaf errors that callers match on by kind, rather than just displaying.
/// Everything else flows as an opaque `anyhow::Error` with context.
#[derive(Debug, Error)]
pub enum CraftError {
    #[error("unknown target `{0}`")]
    UnknownTarget(String),

    #[error("unknown configuration `{0}`")]
    UnknownConfiguration(String),

    #[error("dependency cycle detected while resolving `uses`: {0}")]
    UsesCycle(String),

    #[error("no craftfile found at `{0}`")]
    CraftfileNotFound(std::path::PathBuf),

    #[error("no suitable compiler toolchain found for this host")]
    NoToolchain,
}
