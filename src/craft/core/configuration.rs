/// A named bundle of compile/link flags (spec.md §3). `debug`, `profile`
/// and `release` ship built in; craftfiles may register their own.
#[derive(Debug, Clone)]
pub struct Configuration {
    pub name: String,
    pub compile_flags: Vec<String>,
    pub link_flags: Vec<String>,
}

impl Configuration {
    pub fn new(name: impl Into<String>) -> Configuration {
        Configuration {
            name: name.into(),
            compile_flags: Vec::new(),
            link_flags: Vec::new(),
        }
    }

    pub fn with_compile_flags(mut self, flags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.compile_flags.extend(flags.into_iter().map(Into::into));
        self
    }

    pub fn with_link_flags(mut self, flags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.link_flags.extend(flags.into_iter().map(Into::into));
        self
    }

    /// The three built-in configurations craft ships with.
    pub fn builtins() -> Vec<Configuration> {
        vec![
            Configuration::new("debug").with_compile_flags(["-g", "-O0"]),
            Configuration::new("profile").with_compile_flags(["-g", "-O2", "-pg"]),
            Configuration::new("release").with_compile_flags(["-O2", "-DNDEBUG"]),
        ]
    }

    pub const DEFAULT: &'static str = "release";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_include_default() {
        let names: Vec<_> = Configuration::builtins().into_iter().map(|c| c.name).collect();
        assert!(names.contains(&Configuration::DEFAULT.to_string()));
        assert_eq!(names, vec!["debug", "profile", "release"]);
    }
}
