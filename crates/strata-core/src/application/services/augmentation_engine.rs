//! Augmentation engine: the I/O half of host-file augmentation.
//!
//! Reads the host fresh on every call, seeds it from a template when policy
//! allows, hands the text to [`crate::domain::augment`] and writes back only
//! when the outcome changed the document.

use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use crate::{
    application::{ports::Filesystem, services::template_service::TemplateService},
    domain::{
        AugmentOutcome, Augmentation, DescriptorChange, HostDocument, MissingHost, ModuleName,
        Placement, augment, register_provider,
    },
    error::StrataResult,
};

/// One augmentation bound to a project-relative host path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostAugmentation {
    pub path: PathBuf,
    pub augmentation: Augmentation,
    pub missing: MissingHost,
}

impl HostAugmentation {
    pub fn new(path: impl Into<PathBuf>, augmentation: Augmentation, missing: MissingHost) -> Self {
        Self {
            path: path.into(),
            augmentation,
            missing,
        }
    }
}

pub struct AugmentationEngine<'a> {
    fs: &'a dyn Filesystem,
    root: &'a Path,
    templates: &'a TemplateService,
}

impl<'a> AugmentationEngine<'a> {
    pub fn new(fs: &'a dyn Filesystem, root: &'a Path, templates: &'a TemplateService) -> Self {
        Self {
            fs,
            root,
            templates,
        }
    }

    #[instrument(skip_all, fields(host = %request.path.display(), token = %request.augmentation.token))]
    pub fn augment(&self, request: &HostAugmentation) -> StrataResult<AugmentOutcome> {
        let full = self.root.join(&request.path);
        let aug = &request.augmentation;

        let outcome = if self.fs.exists(&full) {
            let mut doc = HostDocument::parse(&self.fs.read_to_string(&full)?);
            let outcome = augment(&mut doc, aug);
            if outcome.wrote() {
                self.fs.write_file(&full, &doc.render())?;
            }
            outcome
        } else {
            match &request.missing {
                MissingHost::Skip => AugmentOutcome::HostMissing,
                MissingHost::Seed { template, bindings } => {
                    let seeded = self.templates.render(template, bindings)?;
                    let mut doc = HostDocument::parse(&seeded);
                    let outcome = match augment(&mut doc, aug) {
                        AugmentOutcome::Skipped => AugmentOutcome::Applied(Placement::Seeded),
                        other => other,
                    };
                    if let Some(parent) = full.parent() {
                        self.fs.create_dir_all(parent)?;
                    }
                    self.fs.write_file(&full, &doc.render())?;
                    info!(path = %request.path.display(), "Created {}", request.path.display());
                    outcome
                }
            }
        };

        report(&request.path, aug.token.as_str(), outcome);
        Ok(outcome)
    }

    /// Register `provider` in a JSON module descriptor.
    #[instrument(skip_all, fields(host = %path.display()))]
    pub fn register_descriptor(
        &self,
        path: &Path,
        module: &ModuleName,
        provider: &str,
    ) -> StrataResult<AugmentOutcome> {
        let full = self.root.join(path);
        let existing = if self.fs.exists(&full) {
            Some(self.fs.read_to_string(&full)?)
        } else {
            None
        };

        let outcome = match register_provider(existing.as_deref(), module, provider)? {
            DescriptorChange::Created(text) => {
                if let Some(parent) = full.parent() {
                    self.fs.create_dir_all(parent)?;
                }
                self.fs.write_file(&full, &text)?;
                AugmentOutcome::Applied(Placement::Seeded)
            }
            DescriptorChange::Updated(text) => {
                self.fs.write_file(&full, &text)?;
                AugmentOutcome::Applied(Placement::Structured)
            }
            DescriptorChange::Unchanged => AugmentOutcome::Skipped,
        };

        report(path, provider, outcome);
        Ok(outcome)
    }
}

fn report(path: &Path, token: &str, outcome: AugmentOutcome) {
    let host = path.display();
    match outcome {
        AugmentOutcome::Applied(placement) => {
            info!(%host, ?placement, "Registered {token} in {host}");
        }
        AugmentOutcome::Skipped => info!(%host, "{token} already registered in {host}"),
        AugmentOutcome::Degraded => warn!(
            %host,
            "Anchor not found in {host}; appended {token} at end of file. Verify manually."
        ),
        AugmentOutcome::Unplaced => warn!(
            %host,
            "Could not find where to register {token} in {host}. Add it manually."
        ),
        AugmentOutcome::HostMissing => warn!(%host, "{host} not found; skipped registering {token}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{MockFilesystem, MockTemplateRenderer, MockTemplateStore};
    use crate::domain::{
        Anchor, Bindings, FallbackPolicy, Fragment, Template, TemplateName, TemplateOrigin,
        UniquenessToken,
    };

    const PROVIDER: &str = "<?php\n\nclass RepositoryServiceProvider\n{\n    public function register(): void\n    {\n    }\n}\n";

    fn binding() -> Augmentation {
        Augmentation::new(
            UniquenessToken::new("InvoiceRepositoryInterface::class"),
            Fragment::new("        bind(InvoiceRepositoryInterface::class);"),
            Anchor::method_body_end("function register("),
        )
    }

    fn templates(source: &'static str) -> TemplateService {
        let mut store = MockTemplateStore::new();
        store.expect_find().returning(move |n| {
            Ok(Some(Template::new(n.clone(), source, TemplateOrigin::Builtin)))
        });
        let mut renderer = MockTemplateRenderer::new();
        renderer
            .expect_render()
            .returning(|t, b| Ok(b.apply(t.source())));
        TemplateService::new(Box::new(store), Box::new(renderer))
    }

    fn no_templates() -> TemplateService {
        TemplateService::new(
            Box::new(MockTemplateStore::new()),
            Box::new(MockTemplateRenderer::new()),
        )
    }

    #[test]
    fn present_token_means_no_write() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| true);
        fs.expect_read_to_string().returning(|_| {
            Ok(PROVIDER.replace("    {\n    }", "    {\n        bind(InvoiceRepositoryInterface::class);\n    }"))
        });
        fs.expect_write_file().never();

        let t = no_templates();
        let engine = AugmentationEngine::new(&fs, Path::new("/p"), &t);
        let request = HostAugmentation::new("app/Providers/X.php", binding(), MissingHost::Skip);
        assert_eq!(engine.augment(&request).unwrap(), AugmentOutcome::Skipped);
    }

    #[test]
    fn anchored_insert_writes_once() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| true);
        fs.expect_read_to_string().returning(|_| Ok(PROVIDER.to_string()));
        fs.expect_write_file()
            .times(1)
            .withf(|_, c| {
                c.contains("    {\n        bind(InvoiceRepositoryInterface::class);\n    }\n}\n")
            })
            .returning(|_, _| Ok(()));

        let t = no_templates();
        let engine = AugmentationEngine::new(&fs, Path::new("/p"), &t);
        let request = HostAugmentation::new("app/Providers/X.php", binding(), MissingHost::Skip);
        assert_eq!(
            engine.augment(&request).unwrap(),
            AugmentOutcome::Applied(Placement::Anchor)
        );
    }

    #[test]
    fn missing_host_with_skip_policy_touches_nothing() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| false);
        fs.expect_read_to_string().never();
        fs.expect_write_file().never();

        let t = no_templates();
        let engine = AugmentationEngine::new(&fs, Path::new("/p"), &t);
        let request = HostAugmentation::new("phpunit.xml", binding(), MissingHost::Skip);
        assert_eq!(engine.augment(&request).unwrap(), AugmentOutcome::HostMissing);
    }

    #[test]
    fn seeded_host_that_already_carries_fragment_is_applied() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| false);
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_write_file()
            .times(1)
            .withf(|_, c| c.matches("InvoiceRepositoryInterface::class").count() == 1)
            .returning(|_, _| Ok(()));

        let t = templates("class P\n{\n    public function register(): void\n    {\n{{CALLS}}\n    }\n}\n");
        let engine = AugmentationEngine::new(&fs, Path::new("/p"), &t);
        let request = HostAugmentation::new(
            "app/Providers/RepositoryServiceProvider.php",
            binding(),
            MissingHost::Seed {
                template: TemplateName::new("providers/repository-provider").unwrap(),
                bindings: Bindings::new()
                    .with("CALLS", "        bind(InvoiceRepositoryInterface::class);"),
            },
        );
        assert_eq!(
            engine.augment(&request).unwrap(),
            AugmentOutcome::Applied(Placement::Seeded)
        );
    }

    #[test]
    fn manual_policy_reports_unplaced_without_writing() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| true);
        fs.expect_read_to_string()
            .returning(|_| Ok("<?php\n\nreturn [\n    App\\Providers\\AppServiceProvider::class,\n".into()));
        fs.expect_write_file().never();

        let t = no_templates();
        let engine = AugmentationEngine::new(&fs, Path::new("/p"), &t);
        let aug = Augmentation::new(
            UniquenessToken::new("RepositoryServiceProvider::class"),
            Fragment::new("    App\\Providers\\RepositoryServiceProvider::class,"),
            Anchor::before_first("];"),
        )
        .with_policy(FallbackPolicy::default().manual());
        let request = HostAugmentation::new("bootstrap/providers.php", aug, MissingHost::Skip);
        assert_eq!(engine.augment(&request).unwrap(), AugmentOutcome::Unplaced);
    }

    #[test]
    fn malformed_descriptor_aborts() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| true);
        fs.expect_read_to_string().returning(|_| Ok("{ not json".into()));
        fs.expect_write_file().never();

        let t = no_templates();
        let engine = AugmentationEngine::new(&fs, Path::new("/p"), &t);
        let err = engine
            .register_descriptor(
                Path::new("Modules/Billing/module.json"),
                &ModuleName::parse("Billing").unwrap(),
                "Modules\\Billing\\Providers\\RepositoryServiceProvider",
            )
            .unwrap_err();
        assert_eq!(err.category(), crate::error::ErrorCategory::Malformed);
    }

    #[test]
    fn missing_descriptor_is_created() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| false);
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_write_file()
            .times(1)
            .withf(|p, c| p.ends_with("module.json") && c.contains("\"alias\": \"billing\""))
            .returning(|_, _| Ok(()));

        let t = no_templates();
        let engine = AugmentationEngine::new(&fs, Path::new("/p"), &t);
        let outcome = engine
            .register_descriptor(
                Path::new("Modules/Billing/module.json"),
                &ModuleName::parse("Billing").unwrap(),
                "Modules\\Billing\\Providers\\RepositoryServiceProvider",
            )
            .unwrap();
        assert_eq!(outcome, AugmentOutcome::Applied(Placement::Seeded));
    }
}
