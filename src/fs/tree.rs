use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::fs::naming::{classify, FileKind};
use crate::storage::{join_path, DirEntry, Storage};

/// One entry in the workspace tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileItem {
    pub name: String,
    pub path: PathBuf,
    pub is_directory: bool,
    /// `None` until the directory has been listed once. `Some(vec![])` is a
    /// listed, empty directory.
    pub children: Option<Vec<FileItem>>,
    pub is_expanded: bool,
}

impl FileItem {
    fn from_entry(dir: &Path, entry: DirEntry) -> Self {
        let path = join_path(dir, &entry.name);
        Self {
            name: entry.name,
            path,
            is_directory: entry.is_directory,
            children: None,
            is_expanded: false,
        }
    }

    /// Number of loaded children. `None` means "not listed yet", never zero.
    pub fn loaded_child_count(&self) -> Option<usize> {
        self.children.as_ref().map(Vec::len)
    }

    pub fn is_loaded(&self) -> bool {
        self.children.is_some()
    }

    /// `FileKind::Ignored` for directories.
    pub fn kind(&self) -> FileKind {
        if self.is_directory {
            FileKind::Ignored
        } else {
            classify(&self.name)
        }
    }
}

/// Directories first, then by name: case-insensitive, lowercase before
/// uppercase on ties.
pub fn compare_items(a: &FileItem, b: &FileItem) -> Ordering {
    b.is_directory
        .cmp(&a.is_directory)
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| b.name.cmp(&a.name))
}

pub fn sort_items(items: &mut [FileItem]) {
    items.sort_by(compare_items);
}

/// List `path` and turn the result into sorted, filtered entries.
///
/// Sub-directories come back unloaded. A listing failure is logged and
/// yields an empty sequence so browsing can continue.
pub async fn load_directory(storage: &dyn Storage, path: &Path) -> Vec<FileItem> {
    let entries = match storage.list_directory(path).await {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(dir = %path.display(), error = %e, "failed to load directory");
            return Vec::new();
        }
    };

    let mut items: Vec<FileItem> = entries
        .into_iter()
        .filter(|entry| entry.is_directory || classify(&entry.name) != FileKind::Ignored)
        .map(|entry| FileItem::from_entry(path, entry))
        .collect();
    sort_items(&mut items);
    tracing::debug!(dir = %path.display(), count = items.len(), "directory loaded");
    items
}

/// Follow `index_path` down the `children` sequences.
pub fn resolve<'a>(items: &'a [FileItem], index_path: &[usize]) -> Option<&'a FileItem> {
    let (first, rest) = index_path.split_first()?;
    let item = items.get(*first)?;
    if rest.is_empty() {
        Some(item)
    } else {
        resolve(item.children.as_deref()?, rest)
    }
}

pub fn resolve_mut<'a>(items: &'a mut [FileItem], index_path: &[usize]) -> Option<&'a mut FileItem> {
    let (first, rest) = index_path.split_first()?;
    let item = items.get_mut(*first)?;
    if rest.is_empty() {
        Some(item)
    } else {
        resolve_mut(item.children.as_deref_mut()?, rest)
    }
}

/// A visible row of the tree, produced by [`TreeState::flatten`].
#[derive(Debug, Clone)]
pub struct FlatItem {
    pub name: String,
    pub path: PathBuf,
    pub is_directory: bool,
    pub is_expanded: bool,
    pub depth: usize,
    pub is_last_sibling: bool,
    pub kind: FileKind,
    /// Children listed so far; `None` when never listed.
    pub child_count: Option<usize>,
    /// Fresh index path into [`TreeState::items`], valid until the next mutation.
    pub index_path: Vec<usize>,
}

/// The workspace tree plus the view state of the tree pane.
#[derive(Debug, Default)]
pub struct TreeState {
    pub root: Option<PathBuf>,
    pub items: Vec<FileItem>,
    pub flat_items: Vec<FlatItem>,
    pub selected_index: usize,
    pub scroll_offset: usize,
}

impl TreeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the workspace root and list it from scratch.
    pub async fn open(&mut self, storage: &dyn Storage, root: PathBuf) {
        let items = load_directory(storage, &root).await;
        tracing::info!(root = %root.display(), entries = items.len(), "workspace opened");
        self.root = Some(root);
        self.items = items;
        self.selected_index = 0;
        self.scroll_offset = 0;
        self.flatten();
    }

    pub fn close(&mut self) {
        *self = Self::default();
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Flip the expansion of the directory at `index_path`.
    ///
    /// The directory is listed only when expanding and its children are
    /// absent, so collapsing and re-expanding costs no I/O. Returns false when
    /// the path does not address a directory.
    pub async fn toggle_expand(&mut self, storage: &dyn Storage, index_path: &[usize]) -> bool {
        let Some(root) = self.root.clone() else {
            return false;
        };
        let (path, needs_load) = match resolve(&self.items, index_path) {
            Some(item) if item.is_directory => {
                (item.path.clone(), !item.is_expanded && !item.is_loaded())
            }
            _ => return false,
        };

        let loaded = if needs_load {
            Some(load_directory(storage, &path).await)
        } else {
            None
        };

        // The workspace may have been swapped while the listing was in flight.
        if self.root.as_deref() != Some(root.as_path()) {
            tracing::debug!(dir = %path.display(), "discarding listing for stale workspace");
            return false;
        }
        // Re-resolve after the await and check the entry is still the same one.
        let Some(item) = resolve_mut(&mut self.items, index_path) else {
            return false;
        };
        if item.path != path {
            tracing::debug!(dir = %path.display(), "index path moved during listing");
            return false;
        }
        if let Some(children) = loaded {
            if item.children.is_none() {
                item.children = Some(children);
            }
        }
        item.is_expanded = !item.is_expanded;
        self.flatten();
        true
    }

    /// Collapse the directory at `index_path` without touching its children.
    pub fn collapse(&mut self, index_path: &[usize]) {
        if let Some(item) = resolve_mut(&mut self.items, index_path) {
            if item.is_directory && item.is_expanded {
                item.is_expanded = false;
                self.flatten();
            }
        }
    }

    /// Re-list the workspace root and reload every directory that was loaded
    /// before, ancestors first, keeping each one's expanded flag.
    pub async fn refresh(&mut self, storage: &dyn Storage) {
        let Some(root) = self.root.clone() else {
            return;
        };
        let loaded = self.collect_loaded_dirs();
        let selected = self.selected_path().map(Path::to_path_buf);

        let mut items = load_directory(storage, &root).await;
        for path in paths_in_restore_order(&loaded) {
            let Some(item) = find_by_path_mut(&mut items, path) else {
                continue;
            };
            if item.is_directory {
                item.children = Some(load_directory(storage, path).await);
                item.is_expanded = loaded[path];
            }
        }

        if self.root.as_deref() != Some(root.as_path()) {
            tracing::debug!(root = %root.display(), "discarding refresh for stale workspace");
            return;
        }
        self.items = items;
        self.flatten();
        if let Some(idx) = selected.and_then(|p| self.find_index_by_path(&p)) {
            self.selected_index = idx;
        }
    }

    /// Every directory whose children are loaded, mapped to its expanded flag.
    pub fn collect_loaded_dirs(&self) -> HashMap<PathBuf, bool> {
        let mut loaded = HashMap::new();
        collect_loaded(&self.items, &mut loaded);
        loaded
    }

    /// Rebuild the visible rows from the tree.
    pub fn flatten(&mut self) {
        self.flat_items.clear();
        let mut index_path = Vec::new();
        flatten_into(&self.items, 0, &mut index_path, &mut self.flat_items);
        if self.flat_items.is_empty() {
            self.selected_index = 0;
        } else if self.selected_index >= self.flat_items.len() {
            self.selected_index = self.flat_items.len() - 1;
        }
    }

    pub fn selected(&self) -> Option<&FlatItem> {
        self.flat_items.get(self.selected_index)
    }

    pub fn selected_path(&self) -> Option<&Path> {
        self.selected().map(|item| item.path.as_path())
    }

    pub fn select_next(&mut self) {
        if self.selected_index + 1 < self.flat_items.len() {
            self.selected_index += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    pub fn select_first(&mut self) {
        self.selected_index = 0;
    }

    pub fn select_last(&mut self) {
        self.selected_index = self.flat_items.len().saturating_sub(1);
    }

    /// Move the selection to the parent row of the selected entry.
    pub fn select_parent(&mut self) {
        let Some(parent) = self.selected().and_then(|item| item.path.parent()) else {
            return;
        };
        if let Some(idx) = self.find_index_by_path(parent) {
            self.selected_index = idx;
        }
    }

    /// Update the scroll offset to ensure the selected item is visible.
    pub fn update_scroll(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        if self.selected_index < self.scroll_offset {
            self.scroll_offset = self.selected_index;
        } else if self.selected_index >= self.scroll_offset + visible_height {
            self.scroll_offset = self.selected_index - visible_height + 1;
        }
    }

    pub fn find_index_by_path(&self, path: &Path) -> Option<usize> {
        self.flat_items.iter().position(|item| item.path == path)
    }

    /// Directory that receives dropped files: the selected directory, the
    /// parent of a selected file, or the workspace root.
    pub fn drop_target_dir(&self) -> Option<PathBuf> {
        let root = self.root.clone()?;
        match self.selected() {
            Some(item) if item.is_directory => Some(item.path.clone()),
            Some(item) => Some(item.path.parent().map(Path::to_path_buf).unwrap_or(root)),
            None => Some(root),
        }
    }
}

fn flatten_into(
    items: &[FileItem],
    depth: usize,
    index_path: &mut Vec<usize>,
    out: &mut Vec<FlatItem>,
) {
    for (i, item) in items.iter().enumerate() {
        index_path.push(i);
        out.push(FlatItem {
            name: item.name.clone(),
            path: item.path.clone(),
            is_directory: item.is_directory,
            is_expanded: item.is_expanded,
            depth,
            is_last_sibling: i + 1 == items.len(),
            kind: item.kind(),
            child_count: item.loaded_child_count(),
            index_path: index_path.clone(),
        });
        if item.is_expanded {
            if let Some(children) = &item.children {
                flatten_into(children, depth + 1, index_path, out);
            }
        }
        index_path.pop();
    }
}

fn collect_loaded(items: &[FileItem], out: &mut HashMap<PathBuf, bool>) {
    for item in items {
        if let (true, Some(children)) = (item.is_directory, &item.children) {
            out.insert(item.path.clone(), item.is_expanded);
            collect_loaded(children, out);
        }
    }
}

fn find_by_path_mut<'a>(items: &'a mut [FileItem], target: &Path) -> Option<&'a mut FileItem> {
    for item in items.iter_mut() {
        if item.path == target {
            return Some(item);
        }
        if target.starts_with(&item.path) {
            if let Some(children) = item.children.as_deref_mut() {
                return find_by_path_mut(children, target);
            }
        }
    }
    None
}

/// Directory paths sorted so ancestors are restored before descendants.
fn paths_in_restore_order(dirs: &HashMap<PathBuf, bool>) -> Vec<&PathBuf> {
    let mut ordered: Vec<&PathBuf> = dirs.keys().collect();
    ordered.sort_by(|a, b| {
        a.components()
            .count()
            .cmp(&b.components().count())
            .then_with(|| a.cmp(b))
    });
    ordered
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::{StorageError, StorageErrorKind, StorageResult};
    use crate::storage::LocalStorage;
    use async_trait::async_trait;
    use std::collections::{HashMap, HashSet};
    use std::fs::{self, File};
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// In-memory storage that counts directory listings.
    #[derive(Default)]
    pub(crate) struct CountingStorage {
        pub dirs: Mutex<HashMap<PathBuf, Vec<DirEntry>>>,
        pub listings: AtomicUsize,
    }

    impl CountingStorage {
        pub fn with_dir(self, path: &str, entries: Vec<DirEntry>) -> Self {
            self.dirs.lock().unwrap().insert(PathBuf::from(path), entries);
            self
        }

        pub fn listing_count(&self) -> usize {
            self.listings.load(AtomicOrdering::SeqCst)
        }
    }

    #[async_trait]
    impl Storage for CountingStorage {
        fn is_available(&self) -> bool {
            true
        }

        async fn list_directory(&self, path: &Path) -> StorageResult<Vec<DirEntry>> {
            self.listings.fetch_add(1, AtomicOrdering::SeqCst);
            self.dirs.lock().unwrap().get(path).cloned().ok_or_else(|| {
                StorageError::new(StorageErrorKind::NotFound, path, "no such directory")
            })
        }

        async fn read_text(&self, path: &Path) -> StorageResult<String> {
            Err(StorageError::new(StorageErrorKind::NotFound, path, "no content"))
        }

        async fn read_bytes(&self, path: &Path) -> StorageResult<Vec<u8>> {
            Err(StorageError::new(StorageErrorKind::NotFound, path, "no content"))
        }

        async fn write_text(&self, _path: &Path, _content: &str) -> StorageResult<()> {
            Ok(())
        }

        async fn write_bytes(&self, _path: &Path, _content: &[u8]) -> StorageResult<()> {
            Ok(())
        }

        async fn exists(&self, _path: &Path) -> StorageResult<bool> {
            Ok(false)
        }

        async fn remove(&self, _path: &Path) -> StorageResult<()> {
            Ok(())
        }

        async fn rename(&self, _from: &Path, _to: &Path) -> StorageResult<()> {
            Ok(())
        }

        async fn copy(&self, _from: &Path, _to: &Path) -> StorageResult<()> {
            Ok(())
        }

        async fn mkdir(&self, _path: &Path) -> StorageResult<()> {
            Ok(())
        }

        async fn reveal_in_system_explorer(&self, _path: &Path) -> StorageResult<()> {
            Ok(())
        }
    }

    fn setup_workspace() -> TempDir {
        let dir = TempDir::new().unwrap();
        File::create(dir.path().join("a.md")).unwrap();
        fs::create_dir(dir.path().join("B")).unwrap();
        File::create(dir.path().join("x.txt")).unwrap();
        dir
    }

    fn names(items: &[FileItem]) -> Vec<&str> {
        items.iter().map(|i| i.name.as_str()).collect()
    }

    #[tokio::test]
    async fn load_directory_filters_and_sorts() {
        let dir = setup_workspace();
        let items = load_directory(&LocalStorage::new(), dir.path()).await;
        assert_eq!(names(&items), vec!["B", "a.md"]);
        assert!(items[0].is_directory);
        assert_eq!(items[1].path, dir.path().join("a.md"));
        assert!(items.iter().all(|i| i.children.is_none()));
    }

    #[tokio::test]
    async fn load_directory_orders_each_group_by_name() {
        let storage = CountingStorage::default().with_dir(
            "/ws",
            vec![
                DirEntry::file("zeta.pdf"),
                DirEntry::dir("beta"),
                DirEntry::file("Alpha.md"),
                DirEntry::dir("Alpha"),
                DirEntry::file("alpha.md"),
                DirEntry::file("notes.txt"),
            ],
        );
        let items = load_directory(&storage, Path::new("/ws")).await;
        assert_eq!(
            names(&items),
            vec!["Alpha", "beta", "alpha.md", "Alpha.md", "zeta.pdf"]
        );
        let paths: HashSet<&PathBuf> = items.iter().map(|i| &i.path).collect();
        assert_eq!(paths.len(), items.len());
    }

    #[tokio::test]
    async fn load_directory_failure_is_empty() {
        let storage = CountingStorage::default();
        let items = load_directory(&storage, Path::new("/missing")).await;
        assert!(items.is_empty());
    }

    #[test]
    fn unloaded_children_are_not_zero() {
        let item = FileItem {
            name: "B".into(),
            path: PathBuf::from("/ws/B"),
            is_directory: true,
            children: None,
            is_expanded: false,
        };
        assert_eq!(item.loaded_child_count(), None);
        assert!(!item.is_loaded());

        let listed = FileItem {
            children: Some(Vec::new()),
            ..item
        };
        assert_eq!(listed.loaded_child_count(), Some(0));
    }

    #[test]
    fn resolve_descends_index_path() {
        let leaf = FileItem::from_entry(Path::new("/ws/B"), DirEntry::file("c.md"));
        let mut dir = FileItem::from_entry(Path::new("/ws"), DirEntry::dir("B"));
        dir.children = Some(vec![leaf]);
        let items = vec![dir, FileItem::from_entry(Path::new("/ws"), DirEntry::file("a.md"))];

        assert_eq!(resolve(&items, &[1]).unwrap().name, "a.md");
        assert_eq!(resolve(&items, &[0, 0]).unwrap().path, PathBuf::from("/ws/B/c.md"));
        assert!(resolve(&items, &[]).is_none());
        assert!(resolve(&items, &[2]).is_none());
        assert!(resolve(&items, &[1, 0]).is_none());
    }

    #[tokio::test]
    async fn toggle_expand_twice_lists_once() {
        let storage = CountingStorage::default()
            .with_dir("/ws", vec![DirEntry::dir("B"), DirEntry::file("a.md")])
            .with_dir("/ws/B", vec![DirEntry::file("c.md")]);
        let mut tree = TreeState::new();
        tree.open(&storage, PathBuf::from("/ws")).await;
        assert_eq!(storage.listing_count(), 1);

        assert!(tree.toggle_expand(&storage, &[0]).await);
        assert!(tree.items[0].is_expanded);
        assert_eq!(storage.listing_count(), 2);

        assert!(tree.toggle_expand(&storage, &[0]).await);
        assert!(!tree.items[0].is_expanded);
        assert_eq!(tree.items[0].loaded_child_count(), Some(1));

        assert!(tree.toggle_expand(&storage, &[0]).await);
        assert!(tree.items[0].is_expanded);
        assert_eq!(storage.listing_count(), 2);
    }

    #[tokio::test]
    async fn toggle_expand_nested_leaves_siblings_alone() {
        let storage = CountingStorage::default()
            .with_dir("/ws", vec![DirEntry::dir("A"), DirEntry::dir("B")])
            .with_dir("/ws/A", vec![DirEntry::dir("inner")])
            .with_dir("/ws/A/inner", vec![DirEntry::file("deep.md")])
            .with_dir("/ws/B", vec![]);
        let mut tree = TreeState::new();
        tree.open(&storage, PathBuf::from("/ws")).await;

        tree.toggle_expand(&storage, &[0]).await;
        tree.toggle_expand(&storage, &[0, 0]).await;

        let inner = resolve(&tree.items, &[0, 0]).unwrap();
        assert!(inner.is_expanded);
        assert_eq!(inner.children.as_ref().unwrap()[0].name, "deep.md");
        assert!(tree.items[1].children.is_none());
        assert!(!tree.items[1].is_expanded);

        let rows: Vec<&str> = tree.flat_items.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(rows, vec!["A", "inner", "deep.md", "B"]);
        assert_eq!(tree.flat_items[2].depth, 2);
        assert_eq!(tree.flat_items[2].index_path, vec![0, 0, 0]);
    }

    #[tokio::test]
    async fn toggle_expand_on_file_is_noop() {
        let storage = CountingStorage::default().with_dir("/ws", vec![DirEntry::file("a.md")]);
        let mut tree = TreeState::new();
        tree.open(&storage, PathBuf::from("/ws")).await;
        assert!(!tree.toggle_expand(&storage, &[0]).await);
        assert!(!tree.toggle_expand(&storage, &[5]).await);
        assert_eq!(storage.listing_count(), 1);
    }

    #[tokio::test]
    async fn toggle_expand_without_workspace_is_noop() {
        let storage = CountingStorage::default();
        let mut tree = TreeState::new();
        assert!(!tree.toggle_expand(&storage, &[0]).await);
        assert_eq!(storage.listing_count(), 0);
    }

    #[tokio::test]
    async fn refresh_restores_expanded_directories() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("alpha").join("nested")).unwrap();
        File::create(dir.path().join("alpha").join("nested").join("deep.md")).unwrap();
        let storage = LocalStorage::new();

        let mut tree = TreeState::new();
        tree.open(&storage, dir.path().to_path_buf()).await;
        tree.toggle_expand(&storage, &[0]).await;
        tree.toggle_expand(&storage, &[0, 0]).await;

        File::create(dir.path().join("alpha").join("nested").join("fresh.md")).unwrap();
        tree.refresh(&storage).await;

        let rows: Vec<&str> = tree.flat_items.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(rows, vec!["alpha", "nested", "deep.md", "fresh.md"]);
        assert!(tree.flat_items.iter().any(|f| f.name == "nested" && f.is_expanded));
    }

    #[tokio::test]
    async fn refresh_keeps_subtree_under_collapsed_parent() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("alpha").join("nested")).unwrap();
        File::create(dir.path().join("alpha").join("nested").join("deep.md")).unwrap();
        let storage = LocalStorage::new();

        let mut tree = TreeState::new();
        tree.open(&storage, dir.path().to_path_buf()).await;
        tree.toggle_expand(&storage, &[0]).await;
        tree.toggle_expand(&storage, &[0, 0]).await;
        tree.collapse(&[0]);

        tree.refresh(&storage).await;
        let rows: Vec<&str> = tree.flat_items.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(rows, vec!["alpha"]);
        assert!(!tree.flat_items[0].is_expanded);

        tree.toggle_expand(&storage, &[0]).await;
        let rows: Vec<&str> = tree.flat_items.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(rows, vec!["alpha", "nested", "deep.md"]);
    }

    #[tokio::test]
    async fn refresh_drops_vanished_expanded_directories() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("gone")).unwrap();
        let storage = LocalStorage::new();

        let mut tree = TreeState::new();
        tree.open(&storage, dir.path().to_path_buf()).await;
        tree.toggle_expand(&storage, &[0]).await;
        fs::remove_dir(dir.path().join("gone")).unwrap();
        tree.refresh(&storage).await;
        assert!(tree.items.is_empty());
        assert!(tree.flat_items.is_empty());
    }

    #[test]
    fn expanded_restore_order_is_parent_first() {
        let root = PathBuf::from("/tmp/root");
        let alpha = root.join("alpha");
        let nested = alpha.join("nested");

        let mut dirs = HashMap::new();
        dirs.insert(nested.clone(), true);
        dirs.insert(root.clone(), true);
        dirs.insert(alpha.clone(), false);

        let ordered: Vec<PathBuf> = paths_in_restore_order(&dirs)
            .into_iter()
            .cloned()
            .collect();
        assert_eq!(ordered, vec![root, alpha, nested]);
    }

    #[tokio::test]
    async fn close_clears_everything() {
        let dir = setup_workspace();
        let mut tree = TreeState::new();
        tree.open(&LocalStorage::new(), dir.path().to_path_buf()).await;
        assert!(!tree.items.is_empty());
        tree.close();
        assert!(tree.root().is_none());
        assert!(tree.items.is_empty());
        assert!(tree.flat_items.is_empty());
    }

    #[tokio::test]
    async fn selection_moves_and_clamps() {
        let storage = CountingStorage::default().with_dir(
            "/ws",
            vec![DirEntry::file("a.md"), DirEntry::file("b.md")],
        );
        let mut tree = TreeState::new();
        tree.open(&storage, PathBuf::from("/ws")).await;
        tree.select_previous();
        assert_eq!(tree.selected_index, 0);
        tree.select_next();
        tree.select_next();
        assert_eq!(tree.selected_index, 1);
        tree.select_first();
        assert_eq!(tree.selected_index, 0);
        tree.select_last();
        assert_eq!(tree.selected_path(), Some(Path::new("/ws/b.md")));
    }

    #[tokio::test]
    async fn drop_target_follows_selection() {
        let storage = CountingStorage::default()
            .with_dir("/ws", vec![DirEntry::dir("B"), DirEntry::file("a.md")])
            .with_dir("/ws/B", vec![]);
        let mut tree = TreeState::new();
        assert!(tree.drop_target_dir().is_none());
        tree.open(&storage, PathBuf::from("/ws")).await;

        assert_eq!(tree.drop_target_dir(), Some(PathBuf::from("/ws/B")));
        tree.select_next();
        assert_eq!(tree.drop_target_dir(), Some(PathBuf::from("/ws")));
    }

    #[test]
    fn update_scroll_keeps_selection_visible() {
        let mut tree = TreeState::new();
        tree.selected_index = 12;
        tree.update_scroll(5);
        assert_eq!(tree.scroll_offset, 8);
        tree.selected_index = 3;
        tree.update_scroll(5);
        assert_eq!(tree.scroll_offset, 3);
    }
}
