use std::path::{Path, PathBuf};

fn manifest() -> toml::Table {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml");
    std::fs::read_to_string(path).unwrap().parse().unwrap()
}

fn table<'a>(manifest: &'a toml::Table, key: &str) -> &'a toml::Table {
    manifest[key].as_table().unwrap()
}

fn rust_sources(dir: &Path, out: &mut Vec<PathBuf>) {
    for entry in std::fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            rust_sources(&path, out);
        } else if path.extension().is_some_and(|e| e == "rs") {
            out.push(path);
        }
    }
}

fn source_text(subdir: &str) -> String {
    let mut files = Vec::new();
    rust_sources(&Path::new(env!("CARGO_MANIFEST_DIR")).join(subdir), &mut files);
    files
        .iter()
        .map(|f| std::fs::read_to_string(f).unwrap())
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_referenced(text: &str, dependency: &str) -> bool {
    let name = dependency.replace('-', "_");
    text.contains(&format!("{name}::")) || text.contains(&format!("use {name}"))
}

#[test]
fn dev_dependencies_do_not_repeat_dependencies() {
    let manifest = manifest();
    let deps = table(&manifest, "dependencies");
    let dev = table(&manifest, "dev-dependencies");

    let repeated: Vec<&String> = dev.keys().filter(|k| deps.contains_key(*k)).collect();
    assert!(repeated.is_empty(), "listed twice: {repeated:?}");
}

#[test]
fn every_dependency_is_used_by_the_binary() {
    let manifest = manifest();
    let src = source_text("src");

    let unused: Vec<&String> = table(&manifest, "dependencies")
        .keys()
        .filter(|dep| !is_referenced(&src, dep))
        .collect();
    assert!(unused.is_empty(), "unused dependencies: {unused:?}");
}

#[test]
fn every_dev_dependency_is_used_by_tests() {
    let manifest = manifest();
    let tests = source_text("tests");

    let unused: Vec<&String> = table(&manifest, "dev-dependencies")
        .keys()
        .filter(|dep| !is_referenced(&tests, dep))
        .collect();
    assert!(unused.is_empty(), "unused dev-dependencies: {unused:?}");
}
