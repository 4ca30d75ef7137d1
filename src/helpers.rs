//! Shared utility helpers for path handling and trash maintenance.

use crate::errors::CoreError;
use crate::fs::FileSystem;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use std::path::{Component, Path, PathBuf};

/// Timestamp format used in deletion-group container names.
pub const CONTAINER_TIME_FORMAT: &str = "%Y-%m-%dT%H-%M-%S";

/// Timestamp format used when rendering deletion times for people.
pub const DISPLAY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Returns a user-safe, trimmed path string that can be used in logs and messages.
pub fn sanitize_user_path(path: &Path) -> String {
    path.display().to_string().trim().to_string()
}

/// Parses the timestamp prefix of a container name into a UTC datetime.
pub fn parse_container_time(value: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, CONTAINER_TIME_FORMAT)
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Serializes a UTC datetime into the container-name timestamp format.
pub fn format_container_time(time: &DateTime<Utc>) -> String {
    time.format(CONTAINER_TIME_FORMAT).to_string()
}

/// Human readable size rendering.
pub fn print_size(bytes: u64) -> String {
    const SUFFIXES: [&str; 5] = ["B", "K", "M", "G", "T"];
    let mut value = bytes as f64;
    let mut idx = 0usize;

    while value >= 1024.0 && idx < SUFFIXES.len() - 1 {
        value /= 1024.0;
        idx += 1;
    }

    if idx == 0 {
        format!("{:.0} {}", value, SUFFIXES[idx])
    } else {
        format!("{:.1} {}", value, SUFFIXES[idx])
    }
}

/// Expands `$VAR` and `${VAR}` references; unset variables expand to nothing.
pub fn expand_env(raw: &str) -> String {
    expand_with(raw, |name| std::env::var(name).ok())
}

fn expand_with(raw: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '$' {
            out.push(ch);
            continue;
        }
        let name = if chars.peek() == Some(&'{') {
            chars.next();
            let mut name = String::new();
            let mut closed = false;
            for c in chars.by_ref() {
                if c == '}' {
                    closed = true;
                    break;
                }
                name.push(c);
            }
            if !closed {
                out.push_str("${");
                out.push_str(&name);
                continue;
            }
            name
        } else {
            let mut name = String::new();
            while let Some(&c) = chars.peek() {
                if c.is_ascii_alphanumeric() || c == '_' {
                    name.push(c);
                    chars.next();
                } else {
                    break;
                }
            }
            if name.is_empty() {
                out.push('$');
                continue;
            }
            name
        };
        out.push_str(&lookup(&name).unwrap_or_default());
    }
    out
}

/// Makes `path` absolute against `base` and removes `.` and `..` segments
/// without touching the filesystem (symlinks are left unresolved). Only
/// suited to settings; delete arguments are resolved through the filesystem.
pub fn absolutize(path: &Path, base: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `pop` refuses to climb above the root, which is what `/..` means.
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Returns the path of `absolute` mirrored underneath `container`.
pub fn mirror_path(container: &Path, absolute: &Path) -> PathBuf {
    let mut mirrored = container.to_path_buf();
    for component in absolute.components() {
        if let Component::Normal(segment) = component {
            mirrored.push(segment);
        }
    }
    mirrored
}

/// Checks that `dir` is a usable directory, creating it when missing.
///
/// Returns `true` when the directory had to be created.
pub fn ensure_dir_exists(fs: &dyn FileSystem, dir: &Path) -> crate::Result<bool> {
    match fs.metadata(dir) {
        Ok(meta) => {
            if !meta.is_dir() {
                return Err(CoreError::NotADirectory(dir.to_path_buf()));
            }
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if meta.permissions().mode() & 0o700 != 0o700 {
                    return Err(CoreError::PermissionDenied(dir.to_path_buf()));
                }
            }
            Ok(false)
        }
        Err(err) if err.is_not_found() => {
            fs.create_dir_all(dir)?;
            Ok(true)
        }
        Err(err) => Err(err),
    }
}

/// Sums the apparent size of every file below `path`.
pub fn tree_size(fs: &dyn FileSystem, path: &Path) -> crate::Result<u64> {
    let meta = fs.symlink_metadata(path)?;
    if !meta.is_dir() {
        return Ok(meta.len());
    }
    let mut total = 0;
    for child in fs.list_dir(path)? {
        total += tree_size(fs, &child)?;
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::RealFileSystem;

    fn lookup(name: &str) -> Option<String> {
        match name {
            "HOME" => Some("/home/dan".to_string()),
            "XDG" => Some("/xdg".to_string()),
            _ => None,
        }
    }

    #[test]
    fn expands_both_variable_forms() {
        assert_eq!(expand_with("$HOME/.trash", lookup), "/home/dan/.trash");
        assert_eq!(expand_with("${XDG}/softrm", lookup), "/xdg/softrm");
    }

    #[test]
    fn unset_variables_expand_to_nothing() {
        assert_eq!(expand_with("/a/$NOPE/b", lookup), "/a//b");
    }

    #[test]
    fn stray_dollars_are_kept() {
        assert_eq!(expand_with("/cost$/x", lookup), "/cost$/x");
        assert_eq!(expand_with("/a/${HOME", lookup), "/a/${HOME");
    }

    #[test]
    fn absolutize_resolves_relative_segments() {
        let base = Path::new("/work/project");
        assert_eq!(absolutize(Path::new("notes.txt"), base), PathBuf::from("/work/project/notes.txt"));
        assert_eq!(absolutize(Path::new("../other/./x"), base), PathBuf::from("/work/other/x"));
        assert_eq!(absolutize(Path::new("/../../etc"), base), PathBuf::from("/etc"));
    }

    #[test]
    fn mirror_path_strips_root() {
        let mirrored = mirror_path(Path::new("/trash/g"), Path::new("/home/user/notes.txt"));
        assert_eq!(mirrored, PathBuf::from("/trash/g/home/user/notes.txt"));
    }

    #[test]
    fn container_time_round_trips_at_second_precision() {
        let time = parse_container_time("2017-06-01T13-45-09").unwrap();
        assert_eq!(format_container_time(&time), "2017-06-01T13-45-09");
        assert!(parse_container_time("2017-06-01 13:45:09").is_none());
    }

    #[test]
    fn print_size_uses_binary_units() {
        assert_eq!(print_size(512), "512 B");
        assert_eq!(print_size(1536), "1.5 K");
        assert_eq!(print_size(5 * 1024 * 1024), "5.0 M");
    }

    #[test]
    fn ensure_dir_exists_creates_and_validates() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("trash");
        assert!(ensure_dir_exists(&RealFileSystem, &dir).unwrap());
        assert!(!ensure_dir_exists(&RealFileSystem, &dir).unwrap());

        let file = tmp.path().join("file");
        std::fs::write(&file, b"x").unwrap();
        assert!(matches!(
            ensure_dir_exists(&RealFileSystem, &file),
            Err(CoreError::NotADirectory(_))
        ));
    }

    #[test]
    fn tree_size_sums_nested_files() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("a/b")).unwrap();
        std::fs::write(tmp.path().join("a/one"), [0u8; 10]).unwrap();
        std::fs::write(tmp.path().join("a/b/two"), [0u8; 5]).unwrap();
        assert_eq!(tree_size(&RealFileSystem, &tmp.path().join("a")).unwrap(), 15);
    }
}
