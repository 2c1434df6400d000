//! Built-in stubs, compiled into the binary.
//!
//! Each entry pairs a logical template name with the stub text under
//! `stubs/<name>.stub`. `strata publish` copies exactly this set into the
//! override directory.

/// `(logical name, source)` for every stub that ships with Strata.
pub const BUILTIN: &[(&str, &str)] = &[
    ("controller", include_str!("../stubs/controller.stub")),
    (
        "database/database-seeder",
        include_str!("../stubs/database/database-seeder.stub"),
    ),
    ("database/factory", include_str!("../stubs/database/factory.stub")),
    ("database/migration", include_str!("../stubs/database/migration.stub")),
    ("database/seeder", include_str!("../stubs/database/seeder.stub")),
    ("model", include_str!("../stubs/model.stub")),
    ("policy", include_str!("../stubs/policy.stub")),
    (
        "providers/module-service-provider",
        include_str!("../stubs/providers/module-service-provider.stub"),
    ),
    (
        "providers/repository-provider",
        include_str!("../stubs/providers/repository-provider.stub"),
    ),
    (
        "repositories/repository",
        include_str!("../stubs/repositories/repository.stub"),
    ),
    (
        "repositories/repository-interface",
        include_str!("../stubs/repositories/repository-interface.stub"),
    ),
    ("request", include_str!("../stubs/request.stub")),
    ("resource", include_str!("../stubs/resource.stub")),
    ("routes/routes", include_str!("../stubs/routes/routes.stub")),
    ("service", include_str!("../stubs/service.stub")),
    ("tests/feature-test", include_str!("../stubs/tests/feature-test.stub")),
    ("tests/unit-test", include_str!("../stubs/tests/unit-test.stub")),
];

/// Source of the built-in stub called `name`.
pub fn source(name: &str) -> Option<&'static str> {
    BUILTIN.iter().find(|(n, _)| *n == name).map(|(_, s)| *s)
}
