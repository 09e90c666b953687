//! Discovers and parses asset lists and IBC path documents in a local registry checkout.
use crate::{
    error::LoaderError,
    registry::{assets::AssetList, paths::IBCPath},
};
use serde::de::DeserializeOwned;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info};
use walkdir::WalkDir;

pub const ASSET_LIST_FILE_NAME: &str = "assetlist.json";
pub const IBC_DIR_NAME: &str = "_IBC";
pub const DEFAULT_EXCLUDE_DIRS: [&str; 3] = [".git", ".github", "_template"];

/// Returns every `assetlist.json` below `root`, sorted by path. Directories named in
/// `exclude_dirs` are not descended into.
pub fn find_asset_files(root: &Path, exclude_dirs: &[String]) -> Result<Vec<PathBuf>, LoaderError> {
    if !root.is_dir() {
        return Err(LoaderError::MissingDirectory(root.to_path_buf()));
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| {
            // the root itself is never excluded
            if entry.depth() == 0 || !entry.file_type().is_dir() {
                return true;
            }
            let name = entry.file_name().to_string_lossy();
            !exclude_dirs.iter().any(|d| d.as_str() == name)
        });

    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_file() && entry.file_name() == ASSET_LIST_FILE_NAME {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}

/// Returns every JSON file directly inside `<root>/_IBC`, sorted by path.
pub fn find_ibc_files(root: &Path) -> Result<Vec<PathBuf>, LoaderError> {
    let ibc_dir = root.join(IBC_DIR_NAME);
    if !ibc_dir.is_dir() {
        return Err(LoaderError::MissingDirectory(ibc_dir));
    }

    let entries = fs::read_dir(&ibc_dir).map_err(|source| LoaderError::FileIO {
        path: ibc_dir.clone(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|source| LoaderError::FileIO {
                path: ibc_dir.clone(),
                source,
            })?
            .path();
        if path.is_file() && path.extension().map_or(false, |ext| ext == "json") {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Loads every asset list below `root`.
pub fn load_asset_lists(root: &Path, exclude_dirs: &[String]) -> Result<Vec<AssetList>, LoaderError> {
    let paths = find_asset_files(root, exclude_dirs)?;
    let lists = load_json_files(&paths)?;

    info!("Found {} asset files", paths.len());
    Ok(lists)
}

/// Loads every IBC path document in `<root>/_IBC`.
pub fn load_ibc_paths(root: &Path) -> Result<Vec<IBCPath>, LoaderError> {
    let paths = find_ibc_files(root)?;
    let ibc_paths = load_json_files(&paths)?;

    info!("Found {} IBC files", paths.len());
    Ok(ibc_paths)
}

pub fn load_json_files<T>(paths: &[PathBuf]) -> Result<Vec<T>, LoaderError>
where
    T: DeserializeOwned,
{
    paths.iter().map(|path| load_json_file(path)).collect()
}

pub fn load_json_file<T>(path: &Path) -> Result<T, LoaderError>
where
    T: DeserializeOwned,
{
    debug!("loading {}", path.display());
    let data = fs::read_to_string(path).map_err(|source| LoaderError::FileIO {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&data).map_err(|source| LoaderError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// The default directory exclusions as owned strings.
pub fn default_exclude_dirs() -> Vec<String> {
    DEFAULT_EXCLUDE_DIRS.iter().map(|d| d.to_string()).collect()
}
