//! ファイルシステムヘルパー

use std::fs;
use std::io;
use std::path::Path;

/// ディレクトリを再帰的にコピー（パーミッションを保持）
pub fn copy_dir(source: &Path, dest: &Path) -> io::Result<()> {
    copy_dir_excluding(source, dest, None)
}

/// `exclude`（正規化済みパス）と同じディレクトリを飛ばしてコピーする
///
/// コピー元がワークスペースのルートを含む場合に、自分自身や
/// 他ワーカーの作業中ディレクトリを取り込まないために使う。
pub fn copy_dir_excluding(source: &Path, dest: &Path, exclude: Option<&Path>) -> io::Result<()> {
    let metadata = fs::metadata(source)?;
    if !metadata.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotADirectory,
            format!("{} is not a directory", source.display()),
        ));
    }

    fs::create_dir_all(dest)?;

    for entry in fs::read_dir(source)? {
        let entry = entry?;
        let from = entry.path();
        let to = dest.join(entry.file_name());

        if fs::metadata(&from)?.is_dir() {
            if let Some(exclude) = exclude {
                if fs::canonicalize(&from)? == exclude {
                    continue;
                }
            }
            copy_dir_excluding(&from, &to, exclude)?;
        } else {
            // fs::copy はパーミッションもコピーする
            fs::copy(&from, &to)?;
        }
    }

    // 読み取り専用ディレクトリでも中身を書けるよう、権限は最後に合わせる
    fs::set_permissions(dest, metadata.permissions())?;

    Ok(())
}

/// ファイルの先頭にテキストを挿入する
///
/// ワークスペース内のコピーに対してのみ使う前提なので、
/// 書き戻したファイルのパーミッションは 0o666 に固定する。
pub fn prepend_to_file(path: &Path, text: &str) -> io::Result<()> {
    let contents = fs::read(path)?;

    let mut updated = Vec::with_capacity(text.len() + contents.len());
    updated.extend_from_slice(text.as_bytes());
    updated.extend_from_slice(&contents);
    fs::write(path, updated)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o666))?;
    }

    Ok(())
}
