//! End-to-end scaffolding with the real stores, renderer and stubs.


use std::path::{Path, PathBuf};

use strata_adapters::{LayeredStore, LocalFilesystem, MemoryFilesystem, SimpleRenderer};
use strata_core::application::ArtifactStatus;
use strata_core::domain::{AugmentOutcome, EntityName, ModuleName, RouteStyle};
use strata_core::prelude::{Filesystem, ScaffoldRequest, ScaffoldService};
use tempfile::TempDir;

const ROOT: &str = "/project";

const DATABASE_SEEDER: &str = "<?php

namespace Database\\Seeders;

use Illuminate\\Database\\Seeder;

class DatabaseSeeder extends Seeder
{
    public function run(): void
    {
        // \\App\\Models\\User::factory(10)->create();
    }
}
";

const BOOTSTRAP_PROVIDERS: &str = "<?php

return [
    App\\Providers\\AppServiceProvider::class,
];
";

const APP_SERVICE_PROVIDER: &str = "<?php

namespace App\\Providers;

use Illuminate\\Support\\ServiceProvider;

class AppServiceProvider extends ServiceProvider
{
    public function register(): void
    {
        //
    }

    public function boot(): void
    {
        //
    }
}
";

const API_ROUTES: &str = "<?php

use Illuminate\\Http\\Request;
use Illuminate\\Support\\Facades\\Route;

Route::get('/user', function (Request $request) {
    return $request->user();
})->middleware('auth:sanctum');
";

const PHPUNIT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<phpunit bootstrap="vendor/autoload.php" colors="true">
    <testsuites>
        <testsuite name="Unit">
            <directory>tests/Unit</directory>
        </testsuite>
        <testsuite name="Feature">
            <directory>tests/Feature</directory>
        </testsuite>
    </testsuites>
</phpunit>
"#;

fn path(rel: &str) -> PathBuf {
    Path::new(ROOT).join(rel)
}

fn laravel_app() -> MemoryFilesystem {
    MemoryFilesystem::new()
        .with_file(path("database/seeders/DatabaseSeeder.php"), DATABASE_SEEDER)
        .with_file(path("bootstrap/providers.php"), BOOTSTRAP_PROVIDERS)
        .with_file(path("app/Providers/AppServiceProvider.php"), APP_SERVICE_PROVIDER)
        .with_file(path("routes/api.php"), API_ROUTES)
        .with_file(path("phpunit.xml"), PHPUNIT)
}

fn service(fs: &MemoryFilesystem, overrides: &Path) -> ScaffoldService {
    ScaffoldService::new(
        Box::new(LayeredStore::with_override(overrides)),
        Box::new(SimpleRenderer::new()),
        Box::new(fs.clone()),
    )
}

fn invoice() -> ScaffoldRequest {
    ScaffoldRequest::new(
        EntityName::parse(Some("Invoice")).unwrap(),
        ROOT,
        "2025_03_14_092653",
    )
}

fn read(fs: &MemoryFilesystem, rel: &str) -> String {
    fs.read_file(&path(rel))
        .unwrap_or_else(|| panic!("missing {rel}"))
}

#[test]
fn invoice_flat_api_end_to_end() {
    let fs = laravel_app();
    let none = TempDir::new().unwrap();
    let report = service(&fs, none.path()).scaffold(&invoice()).unwrap();

    for rel in [
        "database/migrations/2025_03_14_092653_create_invoices_table.php",
        "database/factories/InvoiceFactory.php",
        "database/seeders/InvoiceSeeder.php",
        "app/Models/Invoice.php",
        "app/Http/Controllers/InvoiceController.php",
        "app/Http/Requests/StoreInvoiceRequest.php",
        "app/Http/Requests/UpdateInvoiceRequest.php",
        "app/Http/Resources/InvoiceResource.php",
        "app/Policies/InvoicePolicy.php",
        "app/Repositories/Contracts/InvoiceRepositoryInterface.php",
        "app/Repositories/InvoiceRepository.php",
        "app/Services/InvoiceService.php",
        "tests/Feature/InvoiceTest.php",
        "tests/Unit/InvoiceServiceTest.php",
    ] {
        let content = read(&fs, rel);
        assert!(content.contains("// AUTO-GEN-4-SOLID"), "{rel}");
        assert!(!content.contains("{{"), "unresolved placeholder in {rel}");
    }
    assert_eq!(report.created(), 14);
    assert!(fs.exists(&path("app/Services/Contracts")));

    assert!(read(&fs, "app/Http/Requests/StoreInvoiceRequest.php").contains("class StoreInvoiceRequest"));
    assert!(read(&fs, "database/migrations/2025_03_14_092653_create_invoices_table.php")
        .contains("Schema::create('invoices'"));

    let seeder = read(&fs, "database/seeders/DatabaseSeeder.php");
    assert_eq!(seeder.matches("InvoiceSeeder::class").count(), 1);

    let provider = read(&fs, "app/Providers/RepositoryServiceProvider.php");
    assert!(provider.contains(
        "        // AUTO-GEN-BINDINGS\n        $this->app->bind(\n            \\App\\Repositories\\Contracts\\InvoiceRepositoryInterface::class,\n            \\App\\Repositories\\InvoiceRepository::class\n        );\n    }\n"
    ));

    assert!(read(&fs, "bootstrap/providers.php")
        .contains("    App\\Providers\\RepositoryServiceProvider::class,\n];"));

    let api = read(&fs, "routes/api.php");
    assert!(api.contains("Route::apiResource('invoices', InvoiceController::class)->names('invoices');"));
    assert!(api.contains("use App\\Http\\Controllers\\InvoiceController;"));
    assert!(fs.read_file(&path("routes/web.php")).is_none());

    let app = read(&fs, "app/Providers/AppServiceProvider.php");
    assert!(app.contains("use Illuminate\\Support\\Facades\\Gate;"));
    assert!(app.contains(
        "Gate::policy(\\App\\Models\\Invoice::class, \\App\\Policies\\InvoicePolicy::class); // AUTO-GEN-POLICY"
    ));

    // Flat mode leaves the test manifest alone.
    assert_eq!(read(&fs, "phpunit.xml"), PHPUNIT);
    assert_eq!(report.attention().count(), 0);
}

#[test]
fn short_form_registrations_are_recognised() {
    let seeder = DATABASE_SEEDER.replace(
        "        // \\App\\Models\\User::factory(10)->create();\n",
        "        $this->call(InvoiceSeeder::class);\n",
    );
    let app = APP_SERVICE_PROVIDER
        .replace(
            "use Illuminate\\Support\\ServiceProvider;\n",
            "use Illuminate\\Support\\Facades\\Gate;\nuse Illuminate\\Support\\ServiceProvider;\n",
        )
        .replace(
            "    public function boot(): void\n    {\n        //\n",
            "    public function boot(): void\n    {\n        Gate::policy(Invoice::class, InvoicePolicy::class);\n",
        );
    let bindings = "<?php

namespace App\\Providers;

use App\\Repositories\\Contracts\\InvoiceRepositoryInterface;
use App\\Repositories\\InvoiceRepository;
use Illuminate\\Support\\ServiceProvider;

class RepositoryServiceProvider extends ServiceProvider
{
    public function register(): void
    {
        $this->app->bind(InvoiceRepositoryInterface::class, InvoiceRepository::class);
    }
}
";
    let fs = laravel_app()
        .with_file(path("database/seeders/DatabaseSeeder.php"), seeder.as_str())
        .with_file(path("app/Providers/AppServiceProvider.php"), app.as_str())
        .with_file(path("app/Providers/RepositoryServiceProvider.php"), bindings);
    let none = TempDir::new().unwrap();

    service(&fs, none.path()).scaffold(&invoice()).unwrap();

    assert_eq!(read(&fs, "database/seeders/DatabaseSeeder.php"), seeder);
    assert_eq!(read(&fs, "app/Providers/AppServiceProvider.php"), app);
    assert_eq!(read(&fs, "app/Providers/RepositoryServiceProvider.php"), bindings);
}

#[test]
fn second_run_changes_nothing() {
    let fs = laravel_app();
    let none = TempDir::new().unwrap();
    service(&fs, none.path()).scaffold(&invoice()).unwrap();

    let before = fs.snapshot();
    let writes = fs.write_count();
    let report = service(&fs, none.path()).scaffold(&invoice()).unwrap();

    assert_eq!(fs.write_count(), writes);
    assert_eq!(fs.snapshot(), before);
    assert!(report.is_noop());
    assert!(report.artifacts.iter().all(|a| !a.status.is_created()));
    assert!(report
        .registrations
        .iter()
        .all(|r| r.outcome == AugmentOutcome::Skipped));
}

#[test]
fn view_flag_registers_web_resource() {
    let fs = laravel_app();
    let none = TempDir::new().unwrap();
    let request = invoice().route_style(RouteStyle::Web);
    service(&fs, none.path()).scaffold(&request).unwrap();

    let web = read(&fs, "routes/web.php");
    assert!(web.starts_with("<?php\n\nuse Illuminate\\Support\\Facades\\Route;\nuse App\\Http\\Controllers\\InvoiceController;\n"));
    assert!(web.contains("Route::resource('invoices', InvoiceController::class)->names('invoices');"));
    assert_eq!(read(&fs, "routes/api.php"), API_ROUTES);
}

#[test]
fn grouped_module_end_to_end() {
    let fs = laravel_app();
    let none = TempDir::new().unwrap();
    let request = invoice().module(Some(ModuleName::parse("billing").unwrap()));
    let svc = service(&fs, none.path());
    svc.scaffold(&request).unwrap();

    let model = read(&fs, "Modules/Billing/app/Models/Invoice.php");
    assert!(model.contains("namespace Modules\\Billing\\Models;"));
    assert!(model.ends_with(
        "    protected static function newFactory()\n    {\n        return \\Modules\\Billing\\Database\\Factories\\InvoiceFactory::new();\n    }\n}\n"
    ));

    let descriptor = read(&fs, "Modules/Billing/module.json");
    assert!(descriptor.starts_with("{\n    \"name\": \"Billing\""));
    assert!(descriptor.contains("\"alias\": \"billing\""));
    assert!(descriptor.contains("\"Modules\\\\Billing\\\\Providers\\\\RepositoryServiceProvider\""));

    let seeder = read(&fs, "Modules/Billing/Database/Seeders/BillingDatabaseSeeder.php");
    assert!(seeder.contains("class BillingDatabaseSeeder extends Seeder"));
    assert!(seeder.contains("$this->call(\\Modules\\Billing\\Database\\Seeders\\InvoiceSeeder::class);"));

    let policies = read(&fs, "Modules/Billing/app/Providers/BillingServiceProvider.php");
    assert!(policies.contains("class BillingServiceProvider extends ServiceProvider"));
    assert_eq!(policies.matches("use Illuminate\\Support\\Facades\\Gate;").count(), 1);

    assert!(read(&fs, "Modules/Billing/Routes/api.php").contains("Route::apiResource('invoices'"));

    let phpunit = read(&fs, "phpunit.xml");
    assert!(phpunit.contains("<directory>Modules/*/tests/Unit</directory>\n        </testsuite>"));
    assert!(phpunit.contains("<directory>Modules/*/tests/Feature</directory>\n        </testsuite>"));

    // Flat registries are untouched in grouped mode.
    assert_eq!(read(&fs, "bootstrap/providers.php"), BOOTSTRAP_PROVIDERS);

    let writes = fs.write_count();
    assert!(svc.scaffold(&request).unwrap().is_noop());
    assert_eq!(fs.write_count(), writes);
}

#[test]
fn override_stub_is_used_for_rendering() {
    let fs = laravel_app();
    let overrides = TempDir::new().unwrap();
    std::fs::write(
        overrides.path().join("model.stub"),
        "<?php\n\nnamespace {{appNamespace}}\\Models;\n\nuse Illuminate\\Database\\Eloquent\\Factories\\HasFactory;\n\nfinal class {{model}} // custom\n{\n    use HasFactory;\n}\n",
    )
    .unwrap();

    service(&fs, overrides.path()).scaffold(&invoice()).unwrap();
    assert!(read(&fs, "app/Models/Invoice.php").contains("final class Invoice // custom"));
}

#[test]
fn existing_model_gets_factory_wiring() {
    let fs = laravel_app().with_file(
        path("app/Models/Invoice.php"),
        "<?php\n\nnamespace App\\Models;\n\nuse Illuminate\\Database\\Eloquent\\Model;\n\nclass Invoice extends Model\n{\n    protected $fillable = ['number'];\n}\n",
    );
    let none = TempDir::new().unwrap();
    let report = service(&fs, none.path()).scaffold(&invoice()).unwrap();

    let model_record = report
        .artifacts
        .iter()
        .find(|a| a.path == Path::new("app/Models/Invoice.php"))
        .unwrap();
    assert!(matches!(model_record.status, ArtifactStatus::Exists(_)));

    assert_eq!(
        read(&fs, "app/Models/Invoice.php"),
        "<?php\n\nnamespace App\\Models;\n\nuse Illuminate\\Database\\Eloquent\\Factories\\HasFactory;\nuse Illuminate\\Database\\Eloquent\\Model;\n\nclass Invoice extends Model\n{\n    use HasFactory;\n    protected $fillable = ['number'];\n}\n"
    );
}

#[test]
fn local_filesystem_run_is_idempotent() {
    let project = TempDir::new().unwrap();
    let root = project.path();
    std::fs::create_dir_all(root.join("routes")).unwrap();
    std::fs::write(root.join("routes/api.php"), API_ROUTES).unwrap();

    let svc = ScaffoldService::new(
        Box::new(LayeredStore::with_override(root.join("stubs/vendor/strata"))),
        Box::new(SimpleRenderer::new()),
        Box::new(LocalFilesystem::new()),
    );
    let request = ScaffoldRequest::new(
        EntityName::parse(Some("Invoice")).unwrap(),
        root,
        "2025_03_14_092653",
    );

    let first = svc.scaffold(&request).unwrap();
    assert_eq!(first.created(), 14);
    let routes = std::fs::read_to_string(root.join("routes/api.php")).unwrap();

    let second = svc.scaffold(&request).unwrap();
    assert!(second.is_noop());
    assert_eq!(std::fs::read_to_string(root.join("routes/api.php")).unwrap(), routes);
    assert_eq!(routes.matches("Route::apiResource('invoices'").count(), 1);
}
