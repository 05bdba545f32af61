//! Hierarchical folder stores.
//!
//! The planner only talks to a [`FolderStore`]. Two implementations live
//! here: a local directory tree and an in-memory tree (tests and previews).

use rustc_hash::{FxHashMap, FxHashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use log::warn;
use walkdir::WalkDir;

use crate::error::StoreError;
use crate::models::{FileId, FolderId};

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// A file as listed by a store, before normalization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredFile {
    pub id: FileId,
    pub name: String,
}

/// Folder tree operations consumed by the planner.
pub trait FolderStore {
    /// Top-level folder all destinations hang from.
    fn root(&self) -> FolderId;

    fn find_child(&self, parent: &FolderId, name: &str) -> StoreResult<Option<FolderId>>;

    fn create_child(&mut self, parent: &FolderId, name: &str) -> StoreResult<FolderId>;

    /// Idempotent: returns the existing child when there is one.
    fn get_or_create_child(&mut self, parent: &FolderId, name: &str) -> StoreResult<FolderId> {
        match self.find_child(parent, name)? {
            Some(existing) => Ok(existing),
            None => self.create_child(parent, name),
        }
    }

    /// Files directly inside `folder`, in a stable order.
    fn list_files(&self, folder: &FolderId) -> StoreResult<Vec<StoredFile>>;

    fn find_file_by_name(&self, folder: &FolderId, name: &str) -> StoreResult<Option<StoredFile>>;

    /// Move a file into `dest`, keeping its name. Never overwrites.
    fn move_file(&mut self, file: &FileId, dest: &FolderId) -> StoreResult<()>;
}

// ============================================================================
// Local directory tree
// ============================================================================

/// Folders are directories under `root`; handles are their UTF-8 paths.
/// A root that is not valid UTF-8 is rejected by [`FsFolderStore::open`].
pub struct FsFolderStore {
    root_id: String,
}

impl FsFolderStore {
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(StoreError::NotFound(format!("{}", root.display())));
        }
        Ok(Self {
            root_id: path_id(&root)?,
        })
    }

    fn folder_path(&self, folder: &FolderId) -> StoreResult<PathBuf> {
        let path = PathBuf::from(&folder.0);
        if path.is_dir() {
            Ok(path)
        } else {
            Err(StoreError::NotFound(folder.0.clone()))
        }
    }
}

/// Make a genre name usable as a single path component.
/// e.g., "R&B/Soul" → "R&B-Soul"
pub fn sanitize_component(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c == '/' || c == '\\' || c == '\0' { '-' } else { c })
        .collect();
    match cleaned.trim() {
        "" | "." | ".." => "_".to_string(),
        other => other.to_string(),
    }
}

fn path_id(path: &Path) -> StoreResult<String> {
    path.to_str()
        .map(str::to_string)
        .ok_or_else(|| StoreError::NonUtf8Path(path.to_path_buf()))
}

/// Rename `src` to `target`, copying across devices.
/// A failed copy fallback leaves no second copy behind.
fn relocate_with<F>(src: &Path, target: &Path, rename: F) -> StoreResult<()>
where
    F: FnOnce(&Path, &Path) -> io::Result<()>,
{
    match rename(src, target) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            fs::copy(src, target).map_err(|e| StoreError::io(target, e))?;
            if let Err(e) = fs::remove_file(src) {
                if let Err(cleanup) = fs::remove_file(target) {
                    warn!("could not remove copied {:?}: {cleanup}", target);
                }
                return Err(StoreError::io(src, e));
            }
            Ok(())
        }
        Err(e) => Err(StoreError::io(src, e)),
    }
}

impl FolderStore for FsFolderStore {
    fn root(&self) -> FolderId {
        FolderId(self.root_id.clone())
    }

    fn find_child(&self, parent: &FolderId, name: &str) -> StoreResult<Option<FolderId>> {
        let child = self.folder_path(parent)?.join(sanitize_component(name));
        if child.is_dir() {
            Ok(Some(FolderId(path_id(&child)?)))
        } else {
            Ok(None)
        }
    }

    fn create_child(&mut self, parent: &FolderId, name: &str) -> StoreResult<FolderId> {
        let child = self.folder_path(parent)?.join(sanitize_component(name));
        match fs::create_dir(&child) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists && child.is_dir() => {}
            Err(e) => return Err(StoreError::io(&child, e)),
        }
        Ok(FolderId(path_id(&child)?))
    }

    /// Names that are not valid UTF-8 are skipped with a warning; they
    /// cannot be matched against sheet titles or addressed by a handle.
    fn list_files(&self, folder: &FolderId) -> StoreResult<Vec<StoredFile>> {
        let dir = self.folder_path(folder)?;
        let mut files = Vec::new();
        for entry in WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| dir.clone());
                StoreError::io(path, io::Error::new(io::ErrorKind::Other, e.to_string()))
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            match (entry.file_name().to_str(), entry.path().to_str()) {
                (Some(name), Some(path)) => files.push(StoredFile {
                    id: FileId(path.to_string()),
                    name: name.to_string(),
                }),
                _ => warn!("skipping file with non-UTF-8 name: {:?}", entry.path()),
            }
        }
        Ok(files)
    }

    fn find_file_by_name(&self, folder: &FolderId, name: &str) -> StoreResult<Option<StoredFile>> {
        let path = self.folder_path(folder)?.join(name);
        if path.is_file() {
            Ok(Some(StoredFile {
                id: FileId(path_id(&path)?),
                name: name.to_string(),
            }))
        } else {
            Ok(None)
        }
    }

    fn move_file(&mut self, file: &FileId, dest: &FolderId) -> StoreResult<()> {
        let src = PathBuf::from(&file.0);
        let name = src
            .file_name()
            .ok_or_else(|| StoreError::NotFound(file.0.clone()))?
            .to_owned();
        if !src.is_file() {
            return Err(StoreError::NotFound(file.0.clone()));
        }
        let target = self.folder_path(dest)?.join(name);
        if target.exists() {
            return Err(StoreError::AlreadyExists(target.display().to_string()));
        }
        relocate_with(&src, &target, |from, to| fs::rename(from, to))
    }
}

// ============================================================================
// In-memory tree
// ============================================================================

#[derive(Debug)]
struct MemFolder {
    name: String,
    parent: Option<usize>,
    files: Vec<usize>,
}

#[derive(Debug)]
struct MemFile {
    name: String,
    folder: usize,
}

/// In-memory folder tree. Counts creations and moves so callers can check
/// idempotence and the duplicate guard.
#[derive(Debug)]
pub struct MemoryFolderStore {
    folders: Vec<MemFolder>,
    files: Vec<MemFile>,
    children: FxHashMap<(usize, String), usize>,
    failing_moves: FxHashSet<String>,
    failing_folders: FxHashSet<String>,
    failing_lookups: FxHashSet<String>,
    folders_created: usize,
    moves: usize,
}

const FOLDER_PREFIX: &str = "folder:";
const FILE_PREFIX: &str = "file:";

impl MemoryFolderStore {
    pub fn new(root_name: &str) -> Self {
        Self {
            folders: vec![MemFolder {
                name: root_name.to_string(),
                parent: None,
                files: Vec::new(),
            }],
            files: Vec::new(),
            children: FxHashMap::default(),
            failing_moves: FxHashSet::default(),
            failing_folders: FxHashSet::default(),
            failing_lookups: FxHashSet::default(),
            folders_created: 0,
            moves: 0,
        }
    }

    /// Build a tree mirroring a directory on disk. File handles stay
    /// in-memory; moving them does not touch the disk.
    pub fn mirror(dir: &Path) -> StoreResult<Self> {
        let root_name = dir
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "root".to_string());
        let mut store = Self::new(&root_name);
        let mut index: FxHashMap<PathBuf, usize> = FxHashMap::default();
        index.insert(dir.to_path_buf(), 0);

        for entry in WalkDir::new(dir).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                StoreError::io(dir, io::Error::new(io::ErrorKind::Other, e.to_string()))
            })?;
            let parent = entry
                .path()
                .parent()
                .and_then(|p| index.get(p).copied())
                .ok_or_else(|| StoreError::NotFound(entry.path().display().to_string()))?;
            let name = entry.file_name().to_string_lossy().to_string();
            if entry.file_type().is_dir() {
                let id = store.insert_folder(parent, &name);
                index.insert(entry.path().to_path_buf(), id);
            } else if entry.file_type().is_file() {
                store.insert_file(parent, &name);
            }
        }
        Ok(store)
    }

    fn insert_folder(&mut self, parent: usize, name: &str) -> usize {
        let id = self.folders.len();
        self.folders.push(MemFolder {
            name: name.to_string(),
            parent: Some(parent),
            files: Vec::new(),
        });
        self.children.insert((parent, name.to_string()), id);
        id
    }

    fn insert_file(&mut self, folder: usize, name: &str) -> usize {
        let id = self.files.len();
        self.files.push(MemFile {
            name: name.to_string(),
            folder,
        });
        self.folders[folder].files.push(id);
        id
    }

    fn folder_index(&self, folder: &FolderId) -> StoreResult<usize> {
        folder
            .0
            .strip_prefix(FOLDER_PREFIX)
            .and_then(|n| n.parse::<usize>().ok())
            .filter(|&n| n < self.folders.len())
            .ok_or_else(|| StoreError::NotFound(folder.0.clone()))
    }

    fn file_index(&self, file: &FileId) -> StoreResult<usize> {
        file.0
            .strip_prefix(FILE_PREFIX)
            .and_then(|n| n.parse::<usize>().ok())
            .filter(|&n| n < self.files.len())
            .ok_or_else(|| StoreError::NotFound(file.0.clone()))
    }

    fn folder_handle(id: usize) -> FolderId {
        FolderId(format!("{FOLDER_PREFIX}{id}"))
    }

    fn file_handle(id: usize) -> FileId {
        FileId(format!("{FILE_PREFIX}{id}"))
    }

    /// Add a file directly (setup helper).
    pub fn add_file(&mut self, folder: &FolderId, name: &str) -> StoreResult<FileId> {
        let folder = self.folder_index(folder)?;
        Ok(Self::file_handle(self.insert_file(folder, name)))
    }

    /// Make every later move of a file with this name fail.
    pub fn fail_moves_for(&mut self, name: &str) {
        self.failing_moves.insert(name.to_string());
    }

    /// Make creating a folder with this name fail.
    pub fn fail_folders_named(&mut self, name: &str) {
        self.failing_folders.insert(name.to_string());
    }

    /// Make looking up a file with this name fail, in any folder.
    pub fn fail_lookups_for(&mut self, name: &str) {
        self.failing_lookups.insert(name.to_string());
    }

    fn rejected(name: &str, reason: &str) -> StoreError {
        StoreError::io(
            PathBuf::from(name),
            io::Error::new(io::ErrorKind::PermissionDenied, reason.to_string()),
        )
    }

    /// Names of the files inside `folder`, in insertion order.
    pub fn file_names(&self, folder: &FolderId) -> StoreResult<Vec<String>> {
        let folder = self.folder_index(folder)?;
        Ok(self.folders[folder]
            .files
            .iter()
            .map(|&f| self.files[f].name.clone())
            .collect())
    }

    /// Slash-joined path of a folder below the root.
    pub fn folder_path(&self, folder: &FolderId) -> StoreResult<String> {
        let mut id = self.folder_index(folder)?;
        let mut parts = Vec::new();
        while let Some(parent) = self.folders[id].parent {
            parts.push(self.folders[id].name.as_str());
            id = parent;
        }
        parts.reverse();
        Ok(parts.join("/"))
    }

    /// Resolve a slash-joined path below the root.
    pub fn resolve(&self, path: &str) -> Option<FolderId> {
        let mut id = 0;
        for part in path.split('/').filter(|p| !p.is_empty()) {
            id = *self.children.get(&(id, part.to_string()))?;
        }
        Some(Self::folder_handle(id))
    }

    pub fn folders_created(&self) -> usize {
        self.folders_created
    }

    pub fn moves(&self) -> usize {
        self.moves
    }
}

impl FolderStore for MemoryFolderStore {
    fn root(&self) -> FolderId {
        Self::folder_handle(0)
    }

    fn find_child(&self, parent: &FolderId, name: &str) -> StoreResult<Option<FolderId>> {
        let parent = self.folder_index(parent)?;
        Ok(self
            .children
            .get(&(parent, name.to_string()))
            .map(|&id| Self::folder_handle(id)))
    }

    fn create_child(&mut self, parent: &FolderId, name: &str) -> StoreResult<FolderId> {
        let parent = self.folder_index(parent)?;
        if let Some(&existing) = self.children.get(&(parent, name.to_string())) {
            return Ok(Self::folder_handle(existing));
        }
        if self.failing_folders.contains(name) {
            return Err(Self::rejected(name, "folder creation rejected"));
        }
        self.folders_created += 1;
        Ok(Self::folder_handle(self.insert_folder(parent, name)))
    }

    fn list_files(&self, folder: &FolderId) -> StoreResult<Vec<StoredFile>> {
        let folder = self.folder_index(folder)?;
        Ok(self.folders[folder]
            .files
            .iter()
            .map(|&f| StoredFile {
                id: Self::file_handle(f),
                name: self.files[f].name.clone(),
            })
            .collect())
    }

    fn find_file_by_name(&self, folder: &FolderId, name: &str) -> StoreResult<Option<StoredFile>> {
        let folder = self.folder_index(folder)?;
        if self.failing_lookups.contains(name) {
            return Err(Self::rejected(name, "lookup rejected"));
        }
        Ok(self.folders[folder]
            .files
            .iter()
            .find(|&&f| self.files[f].name == name)
            .map(|&f| StoredFile {
                id: Self::file_handle(f),
                name: name.to_string(),
            }))
    }

    fn move_file(&mut self, file: &FileId, dest: &FolderId) -> StoreResult<()> {
        let file_idx = self.file_index(file)?;
        let dest_idx = self.folder_index(dest)?;
        let name = self.files[file_idx].name.clone();

        if self.failing_moves.contains(&name) {
            return Err(Self::rejected(&name, "move rejected"));
        }
        if self.find_file_by_name(dest, &name)?.is_some() {
            return Err(StoreError::AlreadyExists(name));
        }

        let src_idx = self.files[file_idx].folder;
        self.folders[src_idx].files.retain(|&f| f != file_idx);
        self.folders[dest_idx].files.push(file_idx);
        self.files[file_idx].folder = dest_idx;
        self.moves += 1;
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
