//! Build metadata embedded by `build.rs`.

/// Text shown by `income_core_cli --version`.
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("INCOME_CORE_BUILD_HASH"),
    " ",
    env!("INCOME_CORE_BUILD_STATUS"),
    ", ",
    env!("INCOME_CORE_BUILD_PROFILE"),
    " build for ",
    env!("INCOME_CORE_BUILD_TARGET"),
    ", built ",
    env!("INCOME_CORE_BUILD_TIMESTAMP"),
    ")"
);

pub const GIT_HASH: &str = env!("INCOME_CORE_BUILD_HASH");
