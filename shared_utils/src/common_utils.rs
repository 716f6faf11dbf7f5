//! Common Utilities Module
//!
//! 通用工具函数集合：文件名与扩展名的小工具。

use std::ffi::OsStr;
use std::path::Path;

// ═══════════════════════════════════════════════════════════════
// 文件名工具 (File Name Helpers)
// ═══════════════════════════════════════════════════════════════

/// 获取文件名（lossy），没有文件名时返回完整路径的显示形式
///
/// # Examples
/// ```
/// use std::path::Path;
/// use shared_utils::common_utils::file_name_lossy;
///
/// assert_eq!(file_name_lossy(Path::new("/photos/a.jpg")), "a.jpg");
/// ```
pub fn file_name_lossy(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// 检查文件名是否以给定后缀结尾（不区分大小写）
///
/// Matches on the whole file name rather than `Path::extension`, so a bare
/// `.jpg` still counts. Suffixes include the leading dot.
///
/// # Examples
/// ```
/// use std::ffi::OsStr;
/// use shared_utils::common_utils::has_name_suffix;
///
/// let suffixes = &[".jpg", ".jpeg"];
/// assert!(has_name_suffix(OsStr::new("photo.JPG"), suffixes));
/// assert!(has_name_suffix(OsStr::new("b.JPEG"), suffixes));
/// assert!(!has_name_suffix(OsStr::new("c.png"), suffixes));
/// assert!(!has_name_suffix(OsStr::new("jpg"), suffixes));
/// ```
pub fn has_name_suffix(name: &OsStr, suffixes: &[&str]) -> bool {
    let lower = name.to_string_lossy().to_lowercase();
    suffixes
        .iter()
        .any(|suffix| lower.ends_with(&suffix.to_lowercase()))
}

/// 检查路径的文件名是否以给定后缀结尾
pub fn has_extension(path: &Path, suffixes: &[&str]) -> bool {
    path.file_name()
        .map(|name| has_name_suffix(name, suffixes))
        .unwrap_or(false)
}
