use std::path::{Path, PathBuf};

/// Expands a leading `~` to `$HOME`; other paths are returned as given and
/// resolve against the working directory.
pub fn resolve_user_path(raw: &str) -> PathBuf {
    let trimmed = raw.trim();
    if let Some(rest) = trimmed.strip_prefix("~/") {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    if trimmed == "~" {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home);
        }
    }
    PathBuf::from(trimmed)
}

/// Final path component, used as the multipart filename.
pub fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::{base_name, resolve_user_path};
    use std::path::Path;

    #[test]
    fn relative_paths_are_kept() {
        assert_eq!(resolve_user_path(" ./a/b.yaml "), Path::new("./a/b.yaml"));
    }

    #[test]
    fn base_name_drops_directories() {
        assert_eq!(base_name(Path::new("/tmp/uploads/report.pdf")), "report.pdf");
        assert_eq!(base_name(Path::new("report.pdf")), "report.pdf");
    }
}
