use laraship_build::engine::{ContainerEngine, DependencyInstaller};
use laraship_build::{ComposerInstaller, EngineError, InstallError, Service};
use laraship_core::{Directory, ImageSpec, Op};
use mockall::mock;
use tempfile::TempDir;

mock! {
    Engine {}

    impl ContainerEngine for Engine {
        async fn export_directory(
            &self,
            image: &ImageSpec,
            path: &str,
        ) -> Result<Directory, EngineError>;
        async fn read_file(&self, image: &ImageSpec, path: &str) -> Result<String, EngineError>;
        async fn run(&self, image: &ImageSpec, args: &[String]) -> Result<String, EngineError>;
        async fn materialize(&self, image: &ImageSpec) -> Result<String, EngineError>;
        async fn start_service(&self, image: &ImageSpec) -> Result<Service, EngineError>;
        async fn stop_service(&self, service: &Service) -> Result<(), EngineError>;
    }
}

fn source() -> (TempDir, Directory) {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("composer.json"), "{}").unwrap();
    let dir = Directory::snapshot(tmp.path(), &[]).unwrap();
    (tmp, dir)
}

fn exec_args(image: &ImageSpec) -> Vec<String> {
    image
        .ops()
        .iter()
        .find_map(|op| match op {
            Op::Exec(args) => Some(args.clone()),
            _ => None,
        })
        .unwrap()
}

#[test]
fn cached_install_mounts_cache_volume() {
    let (_tmp, src) = source();
    let installer = ComposerInstaller::new(MockEngine::new(), "composer:2");

    let image = installer.install_image(&src, true);

    assert_eq!(image.base(), "composer:2");
    assert!(image.ops().contains(&Op::MountedCache {
        path: "/tmp/composer-cache".to_owned(),
        volume: "composer-cache".to_owned(),
    }));
    assert!(image.ops().contains(&Op::Env {
        name: "COMPOSER_CACHE_DIR".to_owned(),
        value: "/tmp/composer-cache".to_owned(),
    }));
    assert!(!exec_args(&image).contains(&"--no-cache".to_owned()));
}

#[test]
fn uncached_install_passes_no_cache() {
    let (_tmp, src) = source();
    let installer = ComposerInstaller::new(MockEngine::new(), "composer:2");

    let image = installer.install_image(&src, false);

    assert!(
        !image
            .ops()
            .iter()
            .any(|op| matches!(op, Op::MountedCache { .. }))
    );
    let args = exec_args(&image);
    assert_eq!(&args[..2], ["composer", "install"]);
    assert_eq!(args.last().map(String::as_str), Some("--no-cache"));
}

#[test]
fn source_is_copied_to_workdir() {
    let (_tmp, src) = source();
    let installer = ComposerInstaller::new(MockEngine::new(), "composer:2");

    let image = installer.install_image(&src, true);

    assert_eq!(image.ops()[0], Op::Workdir("/app".to_owned()));
    assert_eq!(
        image.ops()[1],
        Op::Directory {
            path: "/app".to_owned(),
            source: src.clone(),
        }
    );
}

#[tokio::test]
async fn install_exports_vendor_directory() {
    let (_tmp, src) = source();
    let (_vendor_tmp, vendor) = source();
    let exported = vendor.clone();

    let mut engine = MockEngine::new();
    engine
        .expect_export_directory()
        .withf(|image, path| path == "/app/vendor" && image.base() == "composer:2")
        .times(1)
        .returning(move |_, _| Ok(exported.clone()));

    let installer = ComposerInstaller::new(engine, "composer:2");
    let result = installer.install(&src, true).await.unwrap();

    assert_eq!(result, vendor);
}

#[tokio::test]
async fn install_failure_keeps_engine_message() {
    let (_tmp, src) = source();
    let mut engine = MockEngine::new();
    engine.expect_export_directory().returning(|_, _| {
        Err(EngineError::new(
            "Your requirements could not be resolved to an installable set of packages.",
        ))
    });

    let installer = ComposerInstaller::new(engine, "composer:2");
    let err = installer.install(&src, false).await.unwrap_err();

    assert!(matches!(err, InstallError::Engine(_)));
    assert_eq!(
        err.to_string(),
        "Your requirements could not be resolved to an installable set of packages."
    );
}

#[tokio::test]
async fn empty_vendor_is_a_tool_error() {
    let (_tmp, src) = source();
    let empty_tmp = TempDir::new().unwrap();
    let empty = Directory::snapshot(empty_tmp.path(), &[]).unwrap();

    let mut engine = MockEngine::new();
    engine
        .expect_export_directory()
        .returning(move |_, _| Ok(empty.clone()));

    let installer = ComposerInstaller::new(engine, "composer:2");
    let err = installer.install(&src, true).await.unwrap_err();

    assert!(matches!(err, InstallError::Tool { .. }));
    assert_eq!(
        err.to_string(),
        "composer install produced an empty /app/vendor"
    );
}
