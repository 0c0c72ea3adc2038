use dirs::home_dir;
use std::{
    env, fs,
    path::{Path, PathBuf},
};

const DEFAULT_DIR_NAME: &str = ".smoke_checklist";
const CONFIG_FILE: &str = "config.json";
const LOCAL_STORAGE_FILE: &str = "local_storage.json";

/// Environment variable overriding the application data directory.
pub const HOME_ENV: &str = "SMOKE_CHECKLIST_HOME";

/// Returns the application-specific data directory, defaulting to `~/.smoke_checklist`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

pub fn config_file_in(base: &Path) -> PathBuf {
    base.join(CONFIG_FILE)
}

/// Path to the file backing the local key-value store.
pub fn local_storage_file_in(base: &Path) -> PathBuf {
    base.join(LOCAL_STORAGE_FILE)
}

pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Returns the sibling staging path used for atomic writes (`file.json` -> `file.json.tmp`).
pub fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.tmp", existing),
        None => "tmp".to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tmp_path_appends_suffix_to_existing_extension() {
        let path = Path::new("/data/local_storage.json");
        assert_eq!(tmp_path(path), PathBuf::from("/data/local_storage.json.tmp"));
    }

    #[test]
    fn tmp_path_handles_missing_extension() {
        let path = Path::new("/data/store");
        assert_eq!(tmp_path(path), PathBuf::from("/data/store.tmp"));
    }
}
