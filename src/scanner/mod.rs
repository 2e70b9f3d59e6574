//! 画像フォルダのスキャン
//!
//! 共有フォルダを同期したローカルフォルダから画像一覧を作る。
//! URLは共有フォルダのベースURLにファイル名を連結して組み立てる。

use crate::error::{MatcherError, Result};
use ref_image_common::ImageRef;
use std::path::Path;
use url::Url;
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct ImageEntry {
    pub file_name: String,
    pub size_bytes: u64,
    pub url: String,
}

impl ImageEntry {
    pub fn to_image_ref(&self) -> ImageRef {
        ImageRef::new(&self.file_name, &self.url)
    }
}

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "webp", "tif", "tiff"];

pub fn scan_folder(folder: &Path, base_url: Option<&str>, recursive: bool) -> Result<Vec<ImageEntry>> {
    if !folder.exists() {
        return Err(MatcherError::FolderNotFound(folder.display().to_string()));
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut images = Vec::new();

    for entry in WalkDir::new(folder)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        if !path.is_file() || !is_image_path(path) {
            continue;
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let url = match base_url {
            Some(base) => build_file_url(base, &file_name)?,
            None => path
                .canonicalize()
                .unwrap_or_else(|_| path.to_path_buf())
                .display()
                .to_string(),
        };

        let size_bytes = entry.metadata().map(|m| m.len()).unwrap_or(0);

        images.push(ImageEntry {
            file_name,
            size_bytes,
            url,
        });
    }

    // ファイル名でソート
    images.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    Ok(images)
}

fn is_image_path(path: &Path) -> bool {
    path.extension()
        .map(|ext| is_image_extension(&ext.to_string_lossy()))
        .unwrap_or(false)
}

fn is_image_extension(ext: &str) -> bool {
    let lower = ext.to_lowercase();
    IMAGE_EXTENSIONS.contains(&lower.as_str())
}

/// ベースURL（末尾の `/` は無視）にファイル名を1つのパス要素として連結する
pub fn build_file_url(base_url: &str, file_name: &str) -> Result<String> {
    let trimmed = base_url.trim().trim_end_matches('/');
    let mut url = Url::parse(trimmed)?;
    url.path_segments_mut()
        .map_err(|_| MatcherError::Config(format!("パスを持てないURLです: {}", base_url)))?
        .pop_if_empty()
        .push(file_name);
    Ok(url.to_string())
}

/// バイト数を読みやすい表記に変換
pub fn format_file_size(size_bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;

    if size_bytes == 0 {
        "0 B".to_string()
    } else if size_bytes < KB {
        format!("{} B", size_bytes)
    } else if size_bytes < MB {
        format!("{:.1} KB", size_bytes as f64 / KB as f64)
    } else {
        format!("{:.1} MB", size_bytes as f64 / MB as f64)
    }
}
