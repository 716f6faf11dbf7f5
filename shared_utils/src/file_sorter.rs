//! File Sorting Module
//!
//! 处理顺序策略：
//! - `None`: 保留目录列举顺序（文件系统返回的顺序，可能不稳定）
//! - `NameAscending`: 按文件名排序，结果可复现
//! - `SizeAscending`: 优先处理小文件，更早看到进度反馈

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct FileInfo {
    pub path: PathBuf,
    pub size: u64,
}

impl FileInfo {
    pub fn new(path: PathBuf) -> Self {
        let size = fs::metadata(&path).map(|meta| meta.len()).unwrap_or(0);
        FileInfo { path, size }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortStrategy {
    #[default]
    None,
    NameAscending,
    SizeAscending,
}

pub struct FileSorter {
    strategy: SortStrategy,
}

impl FileSorter {
    pub fn new(strategy: SortStrategy) -> Self {
        Self { strategy }
    }

    pub fn sort(&self, files: Vec<PathBuf>) -> Vec<PathBuf> {
        match self.strategy {
            SortStrategy::None => files,
            SortStrategy::NameAscending => self.sort_by_name(files),
            SortStrategy::SizeAscending => self.sort_by_size_ascending(files),
        }
    }

    // Unreadable files sort as size 0 instead of being dropped from the list.
    fn sort_by_size_ascending(&self, files: Vec<PathBuf>) -> Vec<PathBuf> {
        let mut file_infos: Vec<FileInfo> = files.into_iter().map(FileInfo::new).collect();

        file_infos.sort_by_key(|f| f.size);
        file_infos.into_iter().map(|f| f.path).collect()
    }

    fn sort_by_name(&self, mut files: Vec<PathBuf>) -> Vec<PathBuf> {
        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        files
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    #[test]
    fn test_none_keeps_order() {
        let files = vec![PathBuf::from("b.jpg"), PathBuf::from("a.jpg")];
        let sorted = FileSorter::new(SortStrategy::None).sort(files.clone());
        assert_eq!(sorted, files);
    }

    #[test]
    fn test_name_ascending() {
        let files = vec![
            PathBuf::from("d/c.jpg"),
            PathBuf::from("d/a.jpg"),
            PathBuf::from("d/b.jpeg"),
        ];
        let sorted = FileSorter::new(SortStrategy::NameAscending).sort(files);
        assert_eq!(
            sorted,
            vec![
                PathBuf::from("d/a.jpg"),
                PathBuf::from("d/b.jpeg"),
                PathBuf::from("d/c.jpg"),
            ]
        );
    }

    #[test]
    fn test_size_ascending_keeps_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let big = dir.path().join("big.jpg");
        let small = dir.path().join("small.jpg");
        File::create(&big).unwrap().write_all(&[0u8; 512]).unwrap();
        File::create(&small).unwrap().write_all(&[0u8; 8]).unwrap();
        let missing = dir.path().join("missing.jpg");

        let sorted =
            FileSorter::new(SortStrategy::SizeAscending).sort(vec![big.clone(), small.clone(), missing.clone()]);
        assert_eq!(sorted, vec![missing, small, big]);
    }
}
