use std::{
    fs::{self, DirBuilder, File},
    io::Write,
    path::{Component, Path, PathBuf, MAIN_SEPARATOR},
};

use color_eyre::{eyre::Context, Result};
use serde::{de::DeserializeOwned, Serialize};

pub fn create_file<'a>(path: &Path, filename: &'a str, buff_write: &'a [u8]) -> Result<()> {
    let file_path = path.join(filename);

    File::create(&file_path)
        .with_context(|| format!("Could not create file {file_path:?}"))?
        .write_all(buff_write)
        .with_context(|| format!("Could not write to file {file_path:?}"))
}

pub fn create_directory(path_create: &Path) -> Result<()> {
    DirBuilder::new()
        .recursive(true)
        .create(path_create)
        .with_context(|| format!("Could not create directory {path_create:?}"))
}

/// Resolves the `.` and `..` components of a path without touching the file system
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(component);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}

/// Joins the components and normalizes the result
pub fn join_and_normalize<I, P>(components: I) -> PathBuf
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let joined = components
        .into_iter()
        .fold(PathBuf::new(), |acc, c| acc.join(c));
    normalize_path(&joined)
}

/// The textual form of a directory path, normalized and ended by a separator
pub fn with_trailing_separator(path: &Path) -> String {
    let mut text = normalize_path(path).to_string_lossy().into_owned();
    if !text.ends_with(MAIN_SEPARATOR) && !text.ends_with('/') {
        text.push(MAIN_SEPARATOR);
    }
    text
}

/// Converts a native path into the portable, forward slashed, form
pub fn to_posix(path: &str) -> String {
    path.replace('\\', "/")
}

pub fn get_absolute_path(path: &Path) -> Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .with_context(|| "Unable to read the current working directory")?
            .join(path)
    };
    Ok(normalize_path(&absolute))
}

pub fn load_and_deserialize<T, P>(path: P) -> Result<T>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let raw = fs::read_to_string(path).with_context(|| format!("Could not read {path:?}"))?;
    toml::from_str(&raw).with_context(|| format!("Could not parse {path:?}"))
}

pub fn serialize_object_to_file<T>(path: &Path, data: &T) -> Result<()>
where
    T: Serialize + ?Sized,
{
    let raw = toml::to_string_pretty(data)
        .with_context(|| format!("Could not serialize the data for {path:?}"))?;
    fs::write(path, raw).with_context(|| format!("Could not write to file {path:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(
            normalize_path(Path::new("/ws/build/./debug/../release/app")),
            PathBuf::from("/ws/build/release/app")
        );
        assert_eq!(
            normalize_path(Path::new("../shared")),
            PathBuf::from("../shared")
        );
    }

    #[test]
    fn test_join_and_normalize() {
        assert_eq!(
            join_and_normalize(["/ws/folder/", "build", "Debug", "app"]),
            PathBuf::from("/ws/folder/build/Debug/app")
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_trailing_separator() {
        assert_eq!(with_trailing_separator(Path::new("/ws/folder")), "/ws/folder/");
        assert_eq!(with_trailing_separator(Path::new("/ws/folder/")), "/ws/folder/");
    }

    #[test]
    fn test_to_posix() {
        assert_eq!(to_posix(r"C:\ws\src\main.cpp"), "C:/ws/src/main.cpp");
    }

    #[test]
    fn test_serialization_round_trip_on_disk() -> Result<()> {
        #[derive(Serialize, serde::Deserialize, PartialEq, Debug)]
        struct Sample {
            name: String,
            values: Vec<String>,
        }

        let temp = tempfile::tempdir()?;
        let path = temp.path().join("sample.toml");
        let sample = Sample {
            name: "debug".to_string(),
            values: vec!["a".to_string()],
        };

        serialize_object_to_file(&path, &sample)?;
        let loaded: Sample = load_and_deserialize(&path)?;
        assert_eq!(loaded, sample);
        Ok(())
    }
}
