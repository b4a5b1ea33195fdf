/// Compile-time build metadata produced by `build.rs`.
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

/// Returns the statically-embedded build metadata.
pub fn current() -> BuildMetadata {
    BuildMetadata {
        version: env!("CARGO_PKG_VERSION"),
        git_hash: option_env!("TRIP_LEDGER_BUILD_HASH").unwrap_or("unknown"),
        git_status: option_env!("TRIP_LEDGER_BUILD_STATUS").unwrap_or("unknown"),
        timestamp: option_env!("TRIP_LEDGER_BUILD_TIMESTAMP").unwrap_or("unknown"),
        target: option_env!("TRIP_LEDGER_BUILD_TARGET").unwrap_or("unknown"),
        profile: option_env!("TRIP_LEDGER_BUILD_PROFILE").unwrap_or("unknown"),
        rustc: option_env!("TRIP_LEDGER_BUILD_RUSTC").unwrap_or("unknown"),
    }
}

/// One-line rendering used by `version`.
pub fn describe(meta: &BuildMetadata) -> String {
    format!(
        "trip_ledger {} ({} {}, {} {}, built {} with {})",
        meta.version,
        meta.git_hash,
        meta.git_status,
        meta.target,
        meta.profile,
        meta.timestamp,
        meta.rustc
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_includes_package_version() {
        let meta = current();
        assert!(describe(&meta).starts_with(&format!("trip_ledger {}", env!("CARGO_PKG_VERSION"))));
    }

    #[test]
    fn describe_mentions_build_time_and_compiler() {
        let meta = BuildMetadata {
            version: "0.0.1",
            git_hash: "abc1234",
            git_status: "clean",
            timestamp: "2025-01-01T00:00:00Z",
            target: "x86_64-unknown-linux-gnu",
            profile: "debug",
            rustc: "rustc 1.80.0",
        };
        assert_eq!(
            describe(&meta),
            "trip_ledger 0.0.1 (abc1234 clean, x86_64-unknown-linux-gnu debug, \
             built 2025-01-01T00:00:00Z with rustc 1.80.0)"
        );
    }
}
