//! Project context: where an entity's files live and what they are called.
//!
//! Flat mode puts everything under the conventional project directories and
//! the `App` namespace. Grouped mode (`--module Billing`) roots everything at
//! `Modules/Billing` with the `Modules\Billing` namespace.

use crate::domain::entities::template::Bindings;
use crate::domain::markers;
use crate::domain::value_objects::{EntityName, ModuleName};

/// Project-relative directories, forward-slash separated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDirs {
    pub base: String,
    pub app: String,
    pub migrations: String,
    pub factories: String,
    pub seeders: String,
    pub tests: String,
    pub routes: String,
    pub providers: String,
}

impl ProjectDirs {
    fn flat() -> Self {
        Self {
            base: String::new(),
            app: "app".into(),
            migrations: "database/migrations".into(),
            factories: "database/factories".into(),
            seeders: "database/seeders".into(),
            tests: "tests".into(),
            routes: "routes".into(),
            providers: "app/Providers".into(),
        }
    }

    fn grouped(module: &ModuleName) -> Self {
        let base = format!("Modules/{module}");
        Self {
            app: format!("{base}/app"),
            migrations: format!("{base}/Database/Migrations"),
            factories: format!("{base}/Database/Factories"),
            seeders: format!("{base}/Database/Seeders"),
            tests: format!("{base}/Tests"),
            routes: format!("{base}/Routes"),
            providers: format!("{base}/app/Providers"),
            base,
        }
    }

    /// `dir/file`, or just `file` for the empty base directory.
    pub fn join(dir: &str, file: &str) -> String {
        if dir.is_empty() {
            file.to_string()
        } else {
            format!("{dir}/{file}")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectContext {
    entity: EntityName,
    module: Option<ModuleName>,
    dirs: ProjectDirs,
}

impl ProjectContext {
    pub fn new(entity: EntityName, module: Option<ModuleName>) -> Self {
        let dirs = match &module {
            Some(m) => ProjectDirs::grouped(m),
            None => ProjectDirs::flat(),
        };
        Self {
            entity,
            module,
            dirs,
        }
    }

    pub fn entity(&self) -> &EntityName {
        &self.entity
    }

    pub fn module(&self) -> Option<&ModuleName> {
        self.module.as_ref()
    }

    pub fn is_grouped(&self) -> bool {
        self.module.is_some()
    }

    pub fn dirs(&self) -> &ProjectDirs {
        &self.dirs
    }

    /// `App` or `Modules\Billing`.
    pub fn app_namespace(&self) -> String {
        match &self.module {
            Some(m) => format!("Modules\\{m}"),
            None => "App".to_string(),
        }
    }

    /// `` or `Modules\Billing\`. Prefix for the database namespaces, which
    /// sit outside `App` in flat mode.
    pub fn base_namespace_slash(&self) -> String {
        match &self.module {
            Some(m) => format!("Modules\\{m}\\"),
            None => String::new(),
        }
    }

    /// `app_class("Policies\\InvoicePolicy")` -> `App\Policies\InvoicePolicy`.
    pub fn app_class(&self, relative: &str) -> String {
        format!("{}\\{relative}", self.app_namespace())
    }

    /// Fully-qualified class under the database namespace.
    pub fn database_class(&self, relative: &str) -> String {
        format!("{}Database\\{relative}", self.base_namespace_slash())
    }

    /// Bindings shared by every template for this entity.
    pub fn bindings(&self) -> Bindings {
        let e = &self.entity;
        let d = &self.dirs;
        Bindings::new()
            .with("model", e.as_str())
            .with("modelVar", e.variable())
            .with("modelKebab", e.kebab())
            .with("modelPlural", e.plural())
            .with("modelKebabPlural", e.kebab_plural())
            .with("table", e.table())
            .with("appNamespace", self.app_namespace())
            .with("baseNamespaceSlash", self.base_namespace_slash())
            .with(
                "module",
                self.module.as_ref().map(ModuleName::as_str).unwrap_or(""),
            )
            .with("AUTO_GEN_FLAG", markers::AUTO_GEN_FLAG)
            .with("AUTO_GEN_TAG", markers::AUTO_GEN_TAG)
            .with("BINDINGS_MARKER", markers::BINDINGS_MARKER)
            .with("TEST_INCOMPLETE", markers::TEST_INCOMPLETE)
            .with("appDir", d.app.as_str())
            .with("migrationsDir", d.migrations.as_str())
            .with("factoriesDir", d.factories.as_str())
            .with("seedersDir", d.seeders.as_str())
            .with("testsDir", d.tests.as_str())
            .with("routesDir", d.routes.as_str())
            .with("providersDir", d.providers.as_str())
    }
}
