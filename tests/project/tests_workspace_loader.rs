//! End-to-end loading of stdlib, stubs and workspace roots.

use std::fs;
use std::path::Path;

use tempfile::TempDir;
use ton_analyzer::hir::DeclKind;
use ton_analyzer::ide::AnalysisHost;
use ton_analyzer::project::{AnalysisConfig, MemoryVfs, WorkspaceLoader, path_to_uri};

use crate::helpers::cursor::position;

fn write(root: &Path, rel: &str, text: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, text).unwrap();
}

#[test]
fn test_load_config_wires_stdlib_stubs_and_workspace() {
    let stdlib = TempDir::new().unwrap();
    write(stdlib.path(), "common.tolk", "fun beginCell(): int { return 0; }");
    write(stdlib.path(), "gas-payments.tolk", "fun gasFee(): int { return 0; }");
    let stubs = TempDir::new().unwrap();
    write(stubs.path(), "stubs.tolk", "fun __expect_type(): void {}");
    let project = TempDir::new().unwrap();
    write(
        project.path(),
        "contracts/main.tolk",
        "fun main() { beginCell(); __expect_type(); gasFee(); }",
    );
    write(project.path(), "schema/block.tlb", "unit$_ = Unit;");

    let config = AnalysisConfig::new()
        .with_stdlib_path(stdlib.path())
        .with_stubs_path(stubs.path().join("stubs.tolk"))
        .with_workspace_root(project.path());
    let mut host = AnalysisHost::new();
    let report = WorkspaceLoader::new().load_config(&config, &mut host);
    assert!(report.is_ok(), "{:?}", report.errors);
    assert_eq!(report.loaded, 5);

    let main = path_to_uri(&project.path().join("contracts/main.tolk"));
    let analysis = host.analysis();

    let (file, line, col) = position(&host, &main, "beginCell");
    let target = analysis.goto_definition(file, line, col);
    assert_eq!(target.targets.len(), 1);
    assert_eq!(target.targets[0].kind, Some(DeclKind::Function));

    let (file, line, col) = position(&host, &main, "__expect_type");
    assert_eq!(analysis.goto_definition(file, line, col).targets.len(), 1);

    // Only implicit imports are visible without an import.
    let (file, line, col) = position(&host, &main, "gasFee");
    assert!(analysis.goto_definition(file, line, col).is_empty());
}

#[test]
fn test_load_from_vfs_skips_unsupported_files() {
    let mut vfs = MemoryVfs::new();
    vfs.insert("/ws/main.tolk", "import \"lib/util\"\nfun main() { util(); }");
    vfs.insert("/ws/lib/util.tolk", "fun util() {}");
    vfs.insert("/ws/build/out.fif", "PROGRAM{\n}END>c\n");
    vfs.insert("/ws/Cargo.lock", "");

    let mut host = AnalysisHost::new();
    let report = WorkspaceLoader::new().load_from_vfs(&vfs, "/ws/", &mut host);
    assert!(report.is_ok());
    assert_eq!(host.file_count(), 3);

    let (file, line, col) = position(&host, "/ws/main.tolk", "util()");
    let targets = host.analysis().goto_definition(file, line, col).targets;
    assert_eq!(targets.len(), 1);
    assert_eq!(targets[0].uri, "/ws/lib/util.tolk");
}
