use std::fmt;

/// Build details embedded by `build.rs`.
#[derive(Debug, Clone, Copy)]
pub struct BuildMetadata {
    pub version: &'static str,
    pub git_hash: &'static str,
    pub git_status: &'static str,
    pub timestamp: &'static str,
    pub target: &'static str,
    pub profile: &'static str,
    pub rustc: &'static str,
}

pub fn current() -> BuildMetadata {
    BuildMetadata {
        version: env!("CARGO_PKG_VERSION"),
        git_hash: option_env!("SMOKE_CHECKLIST_BUILD_HASH").unwrap_or("unknown"),
        git_status: option_env!("SMOKE_CHECKLIST_BUILD_STATUS").unwrap_or("unknown"),
        timestamp: option_env!("SMOKE_CHECKLIST_BUILD_TIMESTAMP").unwrap_or("unknown"),
        target: option_env!("SMOKE_CHECKLIST_BUILD_TARGET").unwrap_or("unknown"),
        profile: option_env!("SMOKE_CHECKLIST_BUILD_PROFILE").unwrap_or("unknown"),
        rustc: option_env!("SMOKE_CHECKLIST_BUILD_RUSTC").unwrap_or("unknown"),
    }
}

impl fmt::Display for BuildMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "smoke_checklist {}", self.version)?;
        writeln!(f, "commit: {} ({})", self.git_hash, self.git_status)?;
        writeln!(f, "built: {} [{} {}]", self.timestamp, self.target, self.profile)?;
        write!(f, "rustc: {}", self.rustc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_starts_with_package_version() {
        let text = current().to_string();
        assert!(text.starts_with(&format!("smoke_checklist {}", env!("CARGO_PKG_VERSION"))));
        assert_eq!(text.lines().count(), 4);
    }
}
