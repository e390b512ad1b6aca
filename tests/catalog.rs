mod common;

use common::{file_names, portal_url, setup_test_env, StubCatalog};
use modpack_keeper_lib::core::catalog::CatalogResolver;
use modpack_keeper_lib::core::mod_pack::ModPack;
use modpack_keeper_lib::core::registry::ModPackMap;
use modpack_keeper_lib::core::version::ModVersion;
use modpack_keeper_lib::models::catalog::ModRequest;
use modpack_keeper_lib::models::error::SError;

fn new_pack(root: &camino::Utf8Path) -> ModPack {
    let mut map = ModPackMap::build(root).unwrap();
    map.create("p").unwrap();
    ModPack::open("p", &root.join("p")).unwrap()
}

#[test]
fn test_resolve_picks_exact_release() {
    let catalog = StubCatalog::new().with_mod("bobplates", &["1.0.0", "1.2.0", "2.0.0"]);
    let resolver = CatalogResolver::new(&catalog);

    let (name, release) = resolver
        .resolve("bobplates", &ModVersion::new(1, 2, 0))
        .expect("1.2.0 is published");
    assert_eq!(name, "bobplates");
    assert_eq!(release.file_name, "bobplates_1.2.0.zip");
    assert_eq!(release.download_url, portal_url("bobplates", "1.2.0"));

    assert!(matches!(
        resolver.resolve("bobplates", &ModVersion::new(1, 1, 0)),
        Err(SError::NoMatchingVersion { .. })
    ));
    assert!(matches!(
        resolver.resolve("unknown", &ModVersion::new(1, 0, 0)),
        Err(SError::Catalog { status: 404, .. })
    ));
}

#[test]
fn test_batch_installs_in_order() {
    let (_tmp, root) = setup_test_env();
    let mut pack = new_pack(&root);
    let catalog = StubCatalog::new()
        .with_mod("modA", &["1.0.0"])
        .with_mod("modB", &["0.5.0", "2.1.0"]);
    let fetcher = catalog.fetcher();

    let installed = CatalogResolver::new(&catalog)
        .install_batch(
            &mut pack.mods,
            &[
                ModRequest::new("modB", ModVersion::new(2, 1, 0)),
                ModRequest::new("modA", ModVersion::new(1, 0, 0)),
            ],
            &fetcher,
        )
        .expect("batch failed");

    assert_eq!(installed, vec!["modB", "modA"]);
    assert_eq!(
        fetcher.requested(),
        vec![portal_url("modB", "2.1.0"), portal_url("modA", "1.0.0")]
    );
    assert_eq!(
        file_names(&pack.dir),
        vec!["mod-list.json", "modA_1.0.0.zip", "modB_2.1.0.zip"]
    );
    assert!(pack.installed().iter().all(|m| m.enabled));
}

#[test]
fn test_batch_stops_at_first_failure_without_rollback() {
    let (_tmp, root) = setup_test_env();
    let mut pack = new_pack(&root);
    let catalog = StubCatalog::new()
        .with_mod("modA", &["1.0.0"])
        .with_mod("modB", &["1.0.0"])
        .with_mod("modC", &["1.0.0"]);
    let fetcher = catalog.fetcher();

    let err = CatalogResolver::new(&catalog)
        .install_batch(
            &mut pack.mods,
            &[
                ModRequest::new("modA", ModVersion::new(1, 0, 0)),
                ModRequest::new("modB", ModVersion::new(9, 9, 9)),
                ModRequest::new("modC", ModVersion::new(1, 0, 0)),
            ],
            &fetcher,
        )
        .unwrap_err();

    match err {
        SError::BatchInstall {
            name,
            version,
            installed,
            source,
        } => {
            assert_eq!(name, "modB");
            assert_eq!(version, "9.9.9");
            assert_eq!(installed, vec!["modA"]);
            assert!(matches!(*source, SError::NoMatchingVersion { .. }));
        }
        other => panic!("Expected BatchInstall, got {:?}", other),
    }

    // modA stays, modC was never attempted
    let names: Vec<String> = pack.installed().into_iter().map(|m| m.name).collect();
    assert_eq!(names, vec!["modA"]);
    assert_eq!(fetcher.requested(), vec![portal_url("modA", "1.0.0")]);
}

#[test]
fn test_empty_batch_is_a_no_op() {
    let (_tmp, root) = setup_test_env();
    let mut pack = new_pack(&root);
    let catalog = StubCatalog::new();
    let fetcher = catalog.fetcher();

    let installed = CatalogResolver::new(&catalog)
        .install_batch(&mut pack.mods, &[], &fetcher)
        .unwrap();
    assert!(installed.is_empty());
    assert_eq!(file_names(&pack.dir), vec!["mod-list.json"]);
}
