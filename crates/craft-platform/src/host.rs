//! Platform identity and the filename conventions that differ per platform.

use std::fmt;

/// Operating system family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
    Linux,
    Windows,
    MacOs,
}

/// CPU architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    X86,
    X64,
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Os::Linux => "linux",
            Os::Windows => "windows",
            Os::MacOs => "macos",
        };
        f.write_str(s)
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Arch::X86 => "x32",
            Arch::X64 => "x64",
        };
        f.write_str(s)
    }
}

/// A named host or target platform, with the filename conventions tied to it.
///
/// `is_host` marks the platform entry that describes the machine craft is
/// actually running on; it is determined once at startup by [`Platform::host`].
#[derive(Debug, Clone)]
pub struct Platform {
    pub os: Os,
    pub arch: Arch,
    pub is_host: bool,
}

impl Platform {
    pub fn new(os: Os, arch: Arch, is_host: bool) -> Self {
        Platform { os, arch, is_host }
    }

    /// The four built-in platforms craft ships with.
    pub fn builtins() -> Vec<Platform> {
        vec![
            Platform::new(Os::Linux, Arch::X86, false),
            Platform::new(Os::Linux, Arch::X64, false),
            Platform::new(Os::Windows, Arch::X64, false),
            Platform::new(Os::MacOs, Arch::X64, false),
        ]
    }

    /// Detect the platform craft itself is running on, matching it against
    /// the built-in list and marking it `is_host`.
    pub fn host() -> Platform {
        let os = if cfg!(target_os = "windows") {
            Os::Windows
        } else if cfg!(target_os = "macos") {
            Os::MacOs
        } else {
            Os::Linux
        };
        let arch = if cfg!(target_pointer_width = "64") {
            Arch::X64
        } else {
            Arch::X86
        };
        Platform::new(os, arch, true)
    }

    /// Name used as a path component, e.g. `linux-x64`.
    pub fn name(&self) -> String {
        format!("{}-{}", self.os, self.arch)
    }

    /// Transform a bare library name (`foo`) into the platform's conventional
    /// dynamic library filename (`libfoo.so`, `libfoo.dylib`, `foo.dll`).
    pub fn dynamic_library_file_name(&self, name: &str) -> String {
        match self.os {
            Os::Linux => format!("lib{name}.so"),
            Os::MacOs => format!("lib{name}.dylib"),
            Os::Windows => format!("{name}.dll"),
        }
    }

    /// Transform a bare program name into the platform's conventional
    /// executable filename (`foo`, `foo.exe`).
    pub fn program_file_name(&self, name: &str) -> String {
        match self.os {
            Os::Windows => format!("{name}.exe"),
            Os::Linux | Os::MacOs => name.to_string(),
        }
    }

    /// Name of a platform-specific helper script, e.g. for package recipes
    /// that need to pick `bootstrap.sh` vs `bootstrap.bat`.
    pub fn tool_script_name(&self, base: &str) -> String {
        match self.os {
            Os::Windows => format!("{base}.bat"),
            Os::Linux | Os::MacOs => format!("{base}.sh"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dynamic_library_names() {
        let linux = Platform::new(Os::Linux, Arch::X64, false);
        assert_eq!(linux.dynamic_library_file_name("foo"), "libfoo.so");
        let mac = Platform::new(Os::MacOs, Arch::X64, false);
        assert_eq!(mac.dynamic_library_file_name("foo"), "libfoo.dylib");
        let win = Platform::new(Os::Windows, Arch::X64, false);
        assert_eq!(win.dynamic_library_file_name("foo"), "foo.dll");
    }

    #[test]
    fn program_file_names() {
        let linux = Platform::new(Os::Linux, Arch::X64, false);
        assert_eq!(linux.program_file_name("app"), "app");
        let win = Platform::new(Os::Windows, Arch::X64, false);
        assert_eq!(win.program_file_name("app"), "app.exe");
    }

    #[test]
    fn builtins_cover_four_platforms() {
        assert_eq!(Platform::builtins().len(), 4);
    }
}
