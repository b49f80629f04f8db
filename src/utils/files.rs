use std::path::Path;

use tokio::{fs, io};

/// Read a whole UTF-8 file into a string
pub async fn read_to_string(path: impl AsRef<Path>) -> io::Result<String> {
    fs::read_to_string(path).await
}

/// Write a string to a file, creating parent directories as needed
pub async fn write_string(path: impl AsRef<Path>, contents: &str) -> io::Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }

    fs::write(path, contents).await
}
