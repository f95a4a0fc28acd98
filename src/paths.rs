//! Lexical path helpers.
//!
//! Nothing here touches the filesystem: paths are compared component by
//! component after resolving `.` and `..` lexically. The working directory
//! is consulted only for relative paths that climb above their common base.

use std::path::{Component, Path};

use crate::constants::CURRENT_DIR;

/// Splits `path` into normalized components, keeping the root prefix (if any)
/// as the first element.
fn normalized_components(path: &Path) -> Vec<String> {
    let mut parts: Vec<String> = Vec::new();
    let mut rooted = false;

    for component in path.components() {
        match component {
            Component::Prefix(prefix) => {
                parts.push(prefix.as_os_str().to_string_lossy().into_owned());
                rooted = true;
            }
            Component::RootDir => {
                if parts.is_empty() {
                    parts.push("/".to_string());
                }
                rooted = true;
            }
            Component::CurDir => {}
            Component::ParentDir => {
                let can_pop = match parts.last() {
                    Some(last) => last != ".." && !(rooted && parts.len() == 1),
                    None => false,
                };
                if can_pop {
                    parts.pop();
                } else if !rooted {
                    parts.push("..".to_string());
                }
            }
            Component::Normal(name) => parts.push(name.to_string_lossy().into_owned()),
        }
    }

    parts
}

fn common_prefix_len(a: &[String], b: &[String]) -> usize {
    a.iter().zip(b.iter()).take_while(|(a, b)| a == b).count()
}

/// Computes the path leading from directory `from` to directory `to`.
///
/// The result uses `/` separators and is never empty: when both directories
/// are the same, `"."` is returned. Relative inputs whose `from` side climbs
/// above their common base with `..` are resolved against the working
/// directory first, since the names above that base are not known lexically.
///
/// # Example
/// ```
/// use stencil::paths::relative_path;
///
/// assert_eq!(relative_path("/work/out", "/work/out/a/b"), "a/b");
/// assert_eq!(relative_path("/work/out/a/b", "/work/out"), "../..");
/// assert_eq!(relative_path("/work/out", "/work/out/"), ".");
/// ```
pub fn relative_path<P: AsRef<Path>, Q: AsRef<Path>>(from: P, to: Q) -> String {
    let (from, to) = (from.as_ref(), to.as_ref());
    let mut from_parts = normalized_components(from);
    let mut to_parts = normalized_components(to);

    let mut common = common_prefix_len(&from_parts, &to_parts);
    if from_parts[common..].iter().any(|part| part == "..") {
        if let Ok(working_dir) = std::env::current_dir() {
            from_parts = normalized_components(&working_dir.join(from));
            to_parts = normalized_components(&working_dir.join(to));
            common = common_prefix_len(&from_parts, &to_parts);
        }
    }

    let mut parts: Vec<&str> = Vec::new();
    for _ in common..from_parts.len() {
        parts.push("..");
    }
    for part in &to_parts[common..] {
        parts.push(part.as_str());
    }

    if parts.is_empty() {
        CURRENT_DIR.to_string()
    } else {
        parts.join("/")
    }
}

/// Renders a relative path with `/` separators regardless of platform.
pub fn to_slash<P: AsRef<Path>>(path: P) -> String {
    path.as_ref()
        .components()
        .filter_map(|component| match component {
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
