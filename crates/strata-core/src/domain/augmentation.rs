//! Augmentation: idempotent insertion of a fragment into a host document.
//!
//! This module is the pure half of the engine. It decides, for an in-memory
//! [`HostDocument`], whether and where a fragment goes. Reading, seeding and
//! writing the host file live in the application layer.
//!
//! ```text
//! token present ───────────────► Skipped          (no write)
//! anchor found ────────────────► Applied(Anchor)
//! relaxed anchor found ────────► Applied(RelaxedAnchor)   [relaxed_retry]
//! marker found ────────────────► Applied(Marker)
//! nothing found, Append ───────► Degraded          (appended at EOF)
//! nothing found, Manual ───────► Unplaced          (no write)
//! ```

use std::fmt;

use crate::domain::entities::host::HostDocument;
use crate::domain::entities::template::Bindings;
use crate::domain::locator::{self, Anchor};
use crate::domain::value_objects::{Fragment, TemplateName, UniquenessToken};

/// What to do when the anchor cannot be found and no marker helps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnMissingAnchor {
    /// Append at end of file and report degraded success.
    #[default]
    Append,
    /// Leave the file alone; a human has to place the fragment.
    Manual,
}

/// What to do when the host file does not exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissingHost {
    /// Create it from a template, then augment the result.
    Seed {
        template: TemplateName,
        bindings: Bindings,
    },
    /// Report `host-missing` and move on.
    Skip,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FallbackPolicy {
    pub marker: Option<String>,
    pub on_missing_anchor: OnMissingAnchor,
    pub relaxed_retry: bool,
}

impl FallbackPolicy {
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = Some(marker.into());
        self
    }

    pub fn manual(mut self) -> Self {
        self.on_missing_anchor = OnMissingAnchor::Manual;
        self
    }

    pub fn relaxed(mut self, relaxed_retry: bool) -> Self {
        self.relaxed_retry = relaxed_retry;
        self
    }
}

/// One augmentation call, minus the host path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Augmentation {
    pub token: UniquenessToken,
    pub fragment: Fragment,
    pub anchor: Anchor,
    pub policy: FallbackPolicy,
}

impl Augmentation {
    pub fn new(token: UniquenessToken, fragment: Fragment, anchor: Anchor) -> Self {
        Self {
            token,
            fragment,
            anchor,
            policy: FallbackPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: FallbackPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// How an applied fragment was placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Anchor,
    RelaxedAnchor,
    Marker,
    /// The host was created from a seed template that already carried the
    /// fragment.
    Seeded,
    /// Edited as structured data (module descriptor).
    Structured,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AugmentOutcome {
    Applied(Placement),
    Skipped,
    Degraded,
    HostMissing,
    Unplaced,
}

impl AugmentOutcome {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Applied(_) => "applied",
            Self::Skipped => "skipped",
            Self::Degraded => "degraded",
            Self::HostMissing => "host-missing",
            Self::Unplaced => "unplaced",
        }
    }

    /// Whether the host file content changed.
    pub const fn wrote(self) -> bool {
        matches!(self, Self::Applied(_) | Self::Degraded)
    }

    /// Outcomes a user has to look at.
    pub const fn needs_attention(self) -> bool {
        matches!(self, Self::Degraded | Self::HostMissing | Self::Unplaced)
    }
}

impl fmt::Display for AugmentOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Apply `aug` to `doc` in place and report what happened.
///
/// `Skipped` and `Unplaced` leave `doc` untouched.
pub fn augment(doc: &mut HostDocument, aug: &Augmentation) -> AugmentOutcome {
    if doc.is_applied(&aug.token) {
        return AugmentOutcome::Skipped;
    }

    let (index, placement) = match resolve(doc, aug) {
        Some(found) => found,
        None => match aug.policy.on_missing_anchor {
            OnMissingAnchor::Append => {
                doc.append(&aug.fragment);
                return AugmentOutcome::Degraded;
            }
            OnMissingAnchor::Manual => return AugmentOutcome::Unplaced,
        },
    };

    doc.insert_at(index, &aug.fragment);
    AugmentOutcome::Applied(placement)
}

fn resolve(doc: &HostDocument, aug: &Augmentation) -> Option<(usize, Placement)> {
    let lines = doc.lines();

    if let Some(i) = locator::locate(lines, &aug.anchor) {
        return Some((i, Placement::Anchor));
    }
    if aug.policy.relaxed_retry {
        if let Some(i) = locator::locate_relaxed(lines, &aug.anchor) {
            return Some((i, Placement::RelaxedAnchor));
        }
    }
    let marker = aug.policy.marker.as_ref()?;
    locator::locate(lines, &Anchor::marker_line(marker.as_str())).map(|i| (i, Placement::Marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROVIDER: &str = "<?php

class RepositoryServiceProvider extends ServiceProvider
{
    public function register(): void
    {
        // AUTO-GEN-BINDINGS
    }
}
";

    fn binding() -> Augmentation {
        Augmentation::new(
            UniquenessToken::new("InvoiceRepositoryInterface::class, InvoiceRepository::class"),
            Fragment::new(
                "        $this->app->bind(InvoiceRepositoryInterface::class, InvoiceRepository::class);",
            ),
            Anchor::method_body_end("function register("),
        )
        .with_policy(FallbackPolicy::default().with_marker("// AUTO-GEN-BINDINGS"))
    }

    #[test]
    fn applies_at_anchor_then_skips() {
        let mut doc = HostDocument::parse(PROVIDER);
        let aug = binding();

        assert_eq!(augment(&mut doc, &aug), AugmentOutcome::Applied(Placement::Anchor));
        let once = doc.render();
        assert_eq!(once.matches("$this->app->bind(").count(), 1);
        assert!(once.contains("        // AUTO-GEN-BINDINGS\n        $this->app->bind("));

        assert_eq!(augment(&mut doc, &aug), AugmentOutcome::Skipped);
        assert_eq!(doc.render(), once);
    }

    #[test]
    fn falls_back_to_marker() {
        let mut doc = HostDocument::parse("<?php\n// AUTO-GEN-BINDINGS\n$x = 1;\n");
        assert_eq!(
            augment(&mut doc, &binding()),
            AugmentOutcome::Applied(Placement::Marker)
        );
        assert_eq!(doc.lines()[2].trim_start(), binding().fragment.as_str().trim_start());
    }

    #[test]
    fn no_anchor_no_marker_appends_degraded() {
        let mut doc = HostDocument::parse("<?php\n$x = 1;\n");
        assert_eq!(augment(&mut doc, &binding()), AugmentOutcome::Degraded);
        let last = doc.lines().last().unwrap();
        assert!(last.contains("$this->app->bind("));
    }

    #[test]
    fn manual_policy_leaves_host_untouched() {
        let original = "<?php\nreturn [\n";
        let mut doc = HostDocument::parse(original);
        let aug = Augmentation::new(
            UniquenessToken::new("RepositoryServiceProvider::class"),
            Fragment::new("    App\\Providers\\RepositoryServiceProvider::class,"),
            Anchor::before_first("];"),
        )
        .with_policy(FallbackPolicy::default().manual());

        assert_eq!(augment(&mut doc, &aug), AugmentOutcome::Unplaced);
        assert_eq!(doc.render(), original);
    }

    #[test]
    fn relaxed_retry_only_when_enabled() {
        let host = "class P\n{\n    public function Register()\n    {\n    }\n}\n";
        let strict = binding().with_policy(FallbackPolicy::default());
        let relaxed = binding().with_policy(FallbackPolicy::default().relaxed(true));

        let mut doc = HostDocument::parse(host);
        assert_eq!(augment(&mut doc, &strict), AugmentOutcome::Degraded);

        let mut doc = HostDocument::parse(host);
        assert_eq!(
            augment(&mut doc, &relaxed),
            AugmentOutcome::Applied(Placement::RelaxedAnchor)
        );
        assert_eq!(doc.lines()[5], "    }");
    }

    #[test]
    fn outcome_labels() {
        assert_eq!(AugmentOutcome::HostMissing.label(), "host-missing");
        assert!(AugmentOutcome::Degraded.wrote());
        assert!(!AugmentOutcome::Unplaced.wrote());
        assert!(AugmentOutcome::Unplaced.needs_attention());
        assert!(!AugmentOutcome::Skipped.needs_attention());
    }
}
