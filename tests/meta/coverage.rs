//! Checks that the unit test tree mirrors `src/` and that every test file is compiled

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::fs;
    use std::io;
    use std::path::Path;

    /// Entry points and module organization files need no mirror
    fn is_organization_file(name: &str) -> bool {
        name == "main.rs" || name == "lib.rs" || name == "mod.rs"
    }

    fn file_name(path: &str) -> &str {
        path.rsplit('/').next().unwrap_or(path)
    }

    fn tree_paths(dir: &Path) -> HashSet<String> {
        collect_relative_paths(dir, dir).unwrap_or_else(|error| {
            assert!(!dir.exists(), "Failed to read {}: {error}", dir.display());
            HashSet::new()
        })
    }

    // Tests every source module has a unit test file at the mirrored path
    // Verified by deleting tests/unit/spatial/pool.rs
    #[test]
    fn test_all_src_files_have_unit_tests() {
        let src_paths = tree_paths(Path::new("src"));
        let test_paths = tree_paths(Path::new("tests/unit"));

        let mut missing_tests: Vec<&String> = src_paths
            .iter()
            .filter(|path| !is_organization_file(file_name(path)))
            .filter(|path| !test_paths.contains(*path))
            .collect();
        missing_tests.sort();

        assert!(
            missing_tests.is_empty(),
            "The following src files/directories are missing unit test counterparts:\n{}",
            missing_tests
                .iter()
                .map(|src_path| format!("  - src/{src_path} -> tests/unit/{src_path}"))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    // Tests no unit test file outlives the module it covers
    #[test]
    fn test_all_unit_tests_have_src_counterparts() {
        let src_paths = tree_paths(Path::new("src"));
        let test_paths = tree_paths(Path::new("tests/unit"));

        let mut orphaned_tests: Vec<&String> = test_paths
            .iter()
            .filter(|path| !is_organization_file(file_name(path)))
            .filter(|path| !src_paths.contains(*path))
            .collect();
        orphaned_tests.sort();

        assert!(
            orphaned_tests.is_empty(),
            "The following unit test files/directories have no corresponding src files:\n{}",
            orphaned_tests
                .iter()
                .map(|test_path| format!("  - tests/unit/{test_path} -> src/{test_path} (missing)"))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    // Tests each unit test file is declared in its directory's mod.rs
    // Verified by removing `pub mod layout;` from tests/unit/io/mod.rs
    #[test]
    fn test_unit_test_files_are_declared() {
        let tests_dir = Path::new("tests/unit");
        let mut undeclared = Vec::new();

        for path in tree_paths(tests_dir) {
            let Some(stem) = path.strip_suffix(".rs") else {
                continue;
            };
            if is_organization_file(file_name(&path)) {
                continue;
            }
            let (parent, module) = stem.rsplit_once('/').unwrap_or(("", stem));
            let declaring_file = if parent.is_empty() {
                tests_dir.join("main.rs")
            } else {
                tests_dir.join(parent).join("mod.rs")
            };
            let declared = fs::read_to_string(&declaring_file)
                .map(|content| {
                    content
                        .lines()
                        .map(str::trim)
                        .any(|line| line == format!("pub mod {module};") || line == format!("mod {module};"))
                })
                .unwrap_or(false);
            if !declared {
                undeclared.push(format!("  - tests/unit/{path} (in {})", declaring_file.display()));
            }
        }
        undeclared.sort();

        assert!(
            undeclared.is_empty(),
            "The following unit test files are never compiled:\n{}",
            undeclared.join("\n")
        );
    }

    fn collect_relative_paths(dir: &Path, base: &Path) -> Result<HashSet<String>, io::Error> {
        let mut paths = HashSet::new();

        if dir.is_dir() {
            for entry_result in fs::read_dir(dir)? {
                let path = entry_result?.path();

                let relative_path = match path.strip_prefix(base) {
                    Ok(stripped) => stripped.to_string_lossy().replace('\\', "/"),
                    Err(_original_error) => {
                        return Err(io::Error::other("Failed to strip prefix"));
                    }
                };

                if path.is_dir() {
                    paths.insert(relative_path);
                    paths.extend(collect_relative_paths(&path, base)?);
                } else if path.extension().and_then(|ext| ext.to_str()) == Some("rs") {
                    paths.insert(relative_path);
                }
            }
        }

        Ok(paths)
    }

    // Tests every non-organization file under tests/ defines at least one test
    #[test]
    fn test_all_test_files_contain_tests() {
        let tests_dir = Path::new("tests");
        let mut files_without_tests = Vec::new();

        let result = check_test_files(tests_dir, &mut files_without_tests);
        if let Err(error) = result {
            assert!(
                !tests_dir.exists(),
                "Failed to scan tests directory: {error}"
            );
        }
        files_without_tests.sort();

        assert!(
            files_without_tests.is_empty(),
            "The following test files don't contain any #[test] functions:\n{}",
            files_without_tests.join("\n")
        );
    }

    fn check_test_files(dir: &Path, files_without_tests: &mut Vec<String>) -> Result<(), io::Error> {
        for entry_result in fs::read_dir(dir)? {
            let path = entry_result?.path();

            if path.is_dir() {
                check_test_files(&path, files_without_tests)?;
            } else if path.extension().and_then(|ext| ext.to_str()) == Some("rs") {
                let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
                    continue;
                };
                if is_organization_file(name) {
                    continue;
                }

                if !fs::read_to_string(&path)?.contains("#[test]") {
                    files_without_tests.push(format!("  - {}", path.display()));
                }
            }
        }

        Ok(())
    }
}
