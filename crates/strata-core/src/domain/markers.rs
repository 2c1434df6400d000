//! Marker comments written into generated files and fragments.

/// Top-of-file flag on every generated artifact.
pub const AUTO_GEN_FLAG: &str = "// AUTO-GEN-4-SOLID";

/// Trailing tag on generated lines that still need human attention.
pub const AUTO_GEN_TAG: &str = "// AUTO-GEN: Placeholder";

/// Fallback insertion point inside the repository provider.
pub const BINDINGS_MARKER: &str = "// AUTO-GEN-BINDINGS";

/// Trailing tag on generated policy registrations.
pub const POLICY_MARKER: &str = "// AUTO-GEN-POLICY";

/// Message used by generated tests that are not implemented yet.
pub const TEST_INCOMPLETE: &str = "AUTO-GEN: Placeholder - Incomplete test.";
