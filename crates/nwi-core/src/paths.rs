//! Filesystem path helpers shared by the binaries' configuration loaders.

use std::path::{Path, PathBuf};

/// Expand a leading `~/` to the user's home directory (`$HOME`).
pub fn expand_tilde(path: &Path) -> PathBuf {
  let home = std::env::var_os("HOME").map(PathBuf::from);
  expand_tilde_with(path, home.as_deref())
}

/// Expand a leading `~/` against `home`. Without a home directory, or for
/// paths not starting with `~/`, the path is returned unchanged.
pub fn expand_tilde_with(path: &Path, home: Option<&Path>) -> PathBuf {
  match (path.strip_prefix("~"), home) {
    (Ok(rest), Some(home)) => home.join(rest),
    _ => path.to_path_buf(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn tilde_prefix_is_replaced_by_home() {
    let home = Path::new("/home/nwi");
    assert_eq!(
      expand_tilde_with(Path::new("~/data/scores.db"), Some(home)),
      PathBuf::from("/home/nwi/data/scores.db")
    );
  }

  #[test]
  fn other_paths_are_unchanged() {
    let home = Some(Path::new("/home/nwi"));
    for raw in ["nwi.sqlite3", "/srv/nwi", "data/~/x", "~user/x"] {
      assert_eq!(expand_tilde_with(Path::new(raw), home), PathBuf::from(raw), "{raw}");
    }
  }

  #[test]
  fn missing_home_leaves_tilde() {
    assert_eq!(expand_tilde_with(Path::new("~/x"), None), PathBuf::from("~/x"));
  }
}
