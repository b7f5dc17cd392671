//! Import path resolution.
//!
//! `@stdlib/x` maps into the configured standard-library root; any other path
//! is relative to the importing file. The `.tolk` extension is optional in
//! source and appended when missing.

use smol_str::SmolStr;

use crate::base::constants::{STDLIB_IMPORT_PREFIX, TOLK_EXT};

/// Maps import strings to file uris.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImportResolver<'a> {
    stdlib_root: Option<&'a str>,
}

impl<'a> ImportResolver<'a> {
    pub fn new(stdlib_root: Option<&'a str>) -> Self {
        Self { stdlib_root }
    }

    /// Uri an import string written in a file under `from_dir` points to.
    pub fn resolve(&self, from_dir: &str, path: &str) -> Option<SmolStr> {
        if path.is_empty() {
            return None;
        }
        let joined = if let Some(rest) = path.strip_prefix(STDLIB_IMPORT_PREFIX) {
            let root = self.stdlib_root?;
            format!("{}/{rest}", root.trim_end_matches('/'))
        } else if path.starts_with('/') {
            path.to_string()
        } else {
            format!("{from_dir}/{path}")
        };
        Some(SmolStr::new(with_extension(&normalize(&joined))))
    }
}

/// Whether an import string addresses the standard library.
pub fn is_stdlib_import(path: &str) -> bool {
    path.starts_with(STDLIB_IMPORT_PREFIX)
}

fn with_extension(path: &str) -> String {
    let suffix = format!(".{TOLK_EXT}");
    if path.ends_with(&suffix) {
        path.to_string()
    } else {
        format!("{path}{suffix}")
    }
}

/// Collapse `.` and `..` segments. A `scheme://` prefix is kept as is.
pub fn normalize(path: &str) -> String {
    let (prefix, rest) = match path.find("://") {
        Some(at) => path.split_at(at + 3),
        None => ("", path),
    };
    let absolute = rest.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();
    for segment in rest.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.last().is_some_and(|s| *s != "..") {
                    segments.pop();
                } else if !absolute {
                    segments.push("..");
                }
            }
            other => segments.push(other),
        }
    }
    let body = segments.join("/");
    if absolute {
        format!("{prefix}/{body}")
    } else {
        format!("{prefix}{body}")
    }
}

/// Import string that reaches `target` from a file in `from_dir`.
///
/// The result always starts with `./` or `../`. The extension is dropped
/// when `keep_extension` is false.
pub fn relative_import(from_dir: &str, target: &str, keep_extension: bool) -> String {
    let from: Vec<&str> = from_dir.split('/').filter(|s| !s.is_empty()).collect();
    let to: Vec<&str> = target.split('/').filter(|s| !s.is_empty()).collect();
    let (target_dirs, file) = match to.split_last() {
        Some((file, dirs)) => (dirs, *file),
        None => return String::new(),
    };
    let common = from
        .iter()
        .zip(target_dirs)
        .take_while(|(a, b)| a == b)
        .count();
    let mut parts: Vec<&str> = Vec::new();
    let ups = from.len() - common;
    parts.extend(std::iter::repeat_n("..", ups));
    parts.extend(&target_dirs[common..]);
    let file = if keep_extension {
        file
    } else {
        file.strip_suffix(&format!(".{TOLK_EXT}")).unwrap_or(file)
    };
    parts.push(file);
    let joined = parts.join("/");
    if ups == 0 {
        format!("./{joined}")
    } else {
        joined
    }
}
