/// Event severity, in ascending order of verbosity (spec.md §6).
///
/// `Fatal` is the least verbose (most severe); `All` lets everything
/// through. The derived `Ord` is what a sink's minimum-level filter
/// compares against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Level {
    Fatal = 0,
    Error = 1,
    Warning = 2,
    Info = 3,
    Debug = 4,
    Verbose = 5,
    All = 6,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Fatal => "fatal",
            Level::Error => "error",
            Level::Warning => "warning",
            Level::Info => "info",
            Level::Debug => "debug",
            Level::Verbose => "verbose",
            Level::All => "all",
        }
    }

    pub(crate) fn from_u8(value: u8) -> Option<Level> {
        Some(match value {
            0 => Level::Fatal,
            1 => Level::Error,
            2 => Level::Warning,
            3 => Level::Info,
            4 => Level::Debug,
            5 => Level::Verbose,
            6 => Level::All,
            _ => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_is_less_verbose_than_all() {
        assert!(Level::Fatal < Level::All);
        assert!(Level::Error < Level::Info);
    }

    #[test]
    fn roundtrips_through_u8() {
        for level in [
            Level::Fatal,
            Level::Error,
            Level::Warning,
            Level::Info,
            Level::Debug,
            Level::Verbose,
            Level::All,
        ] {
            assert_eq!(Level::from_u8(level as u8), Some(level));
        }
    }
}
