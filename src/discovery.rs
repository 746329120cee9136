use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use log::debug;
use crate::error::{BuilderError, BuilderResult};

/// How a file name is tested against a suffix such as `.cpp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchPolicy {
    /// The suffix may appear anywhere in the name, so `a.cpp.bak` matches `.cpp`.
    #[default]
    SuffixContains,
    /// The name must end with the suffix.
    ExactExtension,
}

impl MatchPolicy {
    pub fn matches(&self, file_name: &str, suffix: &str) -> bool {
        match self {
            MatchPolicy::SuffixContains => file_name.contains(suffix),
            MatchPolicy::ExactExtension => file_name.ends_with(suffix),
        }
    }
}

/// Lists the direct children of `root/dir` whose names match `suffix`.
///
/// Entries come back in directory iteration order as `dir/<name>`, keeping
/// them relative to `root` where the toolchain runs.
pub fn list_dir(
    root: &Path,
    dir: &Path,
    suffix: &str,
    policy: MatchPolicy,
) -> BuilderResult<Vec<PathBuf>> {
    let scan_dir = root.join(dir);
    let mut files = Vec::new();

    for entry in WalkDir::new(&scan_dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| BuilderError::Filesystem {
            path: scan_dir.clone(),
            source: e,
        })?;

        let name = entry.file_name().to_string_lossy();
        if policy.matches(&name, suffix) {
            files.push(dir.join(entry.file_name()));
        }
    }

    debug!("{} matched {} entries for {}", scan_dir.display(), files.len(), suffix);
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), "").unwrap();
    }

    #[test]
    fn lists_only_matching_files() {
        let root = tempfile::tempdir().unwrap();
        let src = root.path().join("src");
        fs::create_dir(&src).unwrap();
        touch(&src, "a.cpp");
        touch(&src, "b.cpp");
        touch(&src, "readme.txt");

        let mut files = list_dir(root.path(), Path::new("src"), ".cpp", MatchPolicy::default()).unwrap();
        files.sort();
        assert_eq!(files, [PathBuf::from("src/a.cpp"), PathBuf::from("src/b.cpp")]);
    }

    #[test]
    fn order_follows_directory_iteration() {
        let root = tempfile::tempdir().unwrap();
        for name in ["z.c", "m.c", "a.c"] {
            touch(root.path(), name);
        }

        let expected: Vec<PathBuf> = fs::read_dir(root.path())
            .unwrap()
            .map(|e| PathBuf::from(".").join(e.unwrap().file_name()))
            .collect();
        let files = list_dir(root.path(), Path::new("."), ".c", MatchPolicy::default()).unwrap();
        assert_eq!(files, expected);
    }

    #[test]
    fn substring_policy_over_matches() {
        let root = tempfile::tempdir().unwrap();
        touch(root.path(), "archive.cpp.bak");

        let loose = list_dir(root.path(), Path::new("."), ".cpp", MatchPolicy::SuffixContains).unwrap();
        assert_eq!(loose.len(), 1);

        let strict = list_dir(root.path(), Path::new("."), ".cpp", MatchPolicy::ExactExtension).unwrap();
        assert!(strict.is_empty());
    }

    #[test]
    fn does_not_descend_into_subdirectories() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir(root.path().join("nested")).unwrap();
        touch(&root.path().join("nested"), "deep.o");
        touch(root.path(), "top.o");

        let files = list_dir(root.path(), Path::new("."), ".o", MatchPolicy::default()).unwrap();
        assert_eq!(files, [PathBuf::from("./top.o")]);
    }

    #[test]
    fn missing_directory_is_a_filesystem_error() {
        let root = tempfile::tempdir().unwrap();
        let err = list_dir(root.path(), Path::new("absent"), ".c", MatchPolicy::default()).unwrap_err();
        match err {
            BuilderError::Filesystem { path, .. } => assert_eq!(path, root.path().join("absent")),
            other => panic!("expected filesystem error, got {:?}", other),
        }
    }
}
