use crate::config::TokensConfig;
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

/// A file selected for scanning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path used to read the file
    pub path: PathBuf,
    /// Path relative to the scan base, with `/` separators
    pub display: String,
}

/// Build a globset from patterns, skipping (and logging) invalid ones
pub fn build_globset(patterns: &[String], pattern_type: &str) -> anyhow::Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        match Glob::new(pattern) {
            Ok(glob) => builder.add(glob),
            Err(e) => {
                warn!("Invalid {} pattern '{}': {}", pattern_type, pattern, e);
                continue;
            }
        };
    }
    Ok(builder.build()?)
}

/// Normalize a path for reporting and glob matching
pub fn display_path(path: &Path, base: &Path) -> String {
    let relative = path.strip_prefix(base).unwrap_or(path);
    let text = relative.to_string_lossy().replace('\\', "/");
    text.strip_prefix("./").map(str::to_string).unwrap_or(text)
}

/// Collect the files to scan under every configured root, in sorted order
pub fn collect_files(config: &TokensConfig, base: &Path) -> anyhow::Result<Vec<SourceFile>> {
    let exclude = build_globset(&config.exclude, "exclude")?;
    let mut files = Vec::new();

    for root in &config.roots {
        let root_path = base.join(root);
        if !root_path.exists() {
            warn!("Scan root {} does not exist, skipping", root_path.display());
            continue;
        }
        debug!("Walking {}", root_path.display());

        let skip_dirs = config.skip_dirs.clone();
        let walker = WalkBuilder::new(&root_path)
            .standard_filters(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(move |entry| {
                let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
                if entry.depth() == 0 || !is_dir {
                    return true;
                }
                let name = entry.file_name().to_string_lossy();
                !skip_dirs.iter().any(|skip| *skip == name)
            })
            .build();

        for result in walker {
            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Failed to walk entry: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }
            let path = entry.path();
            let has_extension = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| config.extensions.iter().any(|e| e == ext));
            if !has_extension {
                continue;
            }
            let shown = display_path(path, base);
            if exclude.is_match(&shown) {
                trace!("Excluded {}", shown);
                continue;
            }
            files.push(SourceFile {
                path: path.to_path_buf(),
                display: shown,
            });
        }
    }

    debug!("Collected {} files", files.len());
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(base: &Path, rel: &str) {
        let path = base.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_collect_files_skips_dirs_and_excludes() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path();
        for rel in [
            "src/components/Card.tsx",
            "src/components/Card.test.tsx",
            "src/components/Card.stories.tsx",
            "src/components/styles.css",
            "src/hooks/useSeason.ts",
            "src/legacy/Grid.jsx",
            "src/node_modules/pkg/index.ts",
            "src/__tests__/Card.tsx",
            "src/stories/Intro.tsx",
            "src/dist/bundle.ts",
        ] {
            touch(base, rel);
        }

        let config = TokensConfig::default();
        let files: Vec<String> = collect_files(&config, base)
            .unwrap()
            .into_iter()
            .map(|f| f.display)
            .collect();
        assert_eq!(
            files,
            vec![
                "src/components/Card.tsx",
                "src/hooks/useSeason.ts",
                "src/legacy/Grid.jsx",
            ]
        );
    }

    #[test]
    fn test_collect_files_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let config = TokensConfig {
            roots: vec!["nope".into()],
            ..TokensConfig::default()
        };
        assert!(collect_files(&config, dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_display_path_strips_base() {
        let base = Path::new("/repo");
        assert_eq!(
            display_path(Path::new("/repo/src/App.tsx"), base),
            "src/App.tsx"
        );
        assert_eq!(
            display_path(Path::new("./src/App.tsx"), Path::new("/other")),
            "src/App.tsx"
        );
    }

    #[test]
    fn test_build_globset_skips_invalid() {
        let set = build_globset(&["[".into(), "**/*.tsx".into()], "test").unwrap();
        assert!(set.is_match("src/App.tsx"));
        assert_eq!(set.len(), 1);
    }
}
