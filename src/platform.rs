#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    Windows,
    MacOS,
    Linux,
    Other,
}

impl Os {
    pub fn current() -> Self {
        match std::env::consts::OS {
            "windows" => Os::Windows,
            "macos" => Os::MacOS,
            "linux" => Os::Linux,
            _ => Os::Other,
        }
    }
}

/// Command-line dialect of the system `ping` binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PingFlavor {
    Windows,
    Unix,
}

impl PingFlavor {
    pub fn for_os(os: Os) -> Self {
        match os {
            Os::Windows => PingFlavor::Windows,
            Os::MacOS | Os::Linux | Os::Other => PingFlavor::Unix,
        }
    }

    pub fn detect() -> Self {
        Self::for_os(Os::current())
    }

    fn count_flag(&self) -> &'static str {
        match self {
            PingFlavor::Windows => "-n",
            PingFlavor::Unix => "-c",
        }
    }

    /// Arguments for `ping` sending `count` echo requests to `host`.
    pub fn args(&self, host: &str, count: u32) -> Vec<String> {
        vec![
            self.count_flag().to_string(),
            count.to_string(),
            host.to_string(),
        ]
    }
}
