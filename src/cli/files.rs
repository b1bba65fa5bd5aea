use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use log::debug;
use walkdir::WalkDir;

use super::RuntimeError;

pub(crate) const SUPPORTED_EXTENSIONS: [&str; 3] = ["cfg", "conf", "ini"];

/// The files to parse for the given command line paths.
///
/// Files are taken as they are. Directories are walked recursively for
/// files with one of the [`SUPPORTED_EXTENSIONS`], in path order.
pub(crate) struct IniFiles {
    inner: Box<dyn Iterator<Item = Result<PathBuf, RuntimeError>>>,
}

impl IniFiles {
    pub(crate) fn new(paths: Vec<PathBuf>) -> Self {
        let iter = paths.into_iter().flat_map(|path| -> Box<dyn Iterator<Item = Result<PathBuf, RuntimeError>>> {
            if path.is_dir() {
                Box::new(walk(path))
            } else {
                Box::new(std::iter::once(Ok(path)))
            }
        });

        IniFiles {
            inner: Box::new(iter),
        }
    }
}

impl Iterator for IniFiles {
    type Item = Result<PathBuf, RuntimeError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

fn walk(dir: PathBuf) -> impl Iterator<Item = Result<PathBuf, RuntimeError>> {
    debug!("Searching {dir:?} for ini files");

    WalkDir::new(&dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(move |entry| {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    return Some(Err(RuntimeError::Walk(dir.clone(), e)));
                }
            };

            if entry.file_type().is_file() && has_supported_extension(entry.path()) {
                Some(Ok(entry.into_path()))
            } else {
                None
            }
        })
}

fn has_supported_extension(path: &Path) -> bool {
    SUPPORTED_EXTENSIONS
        .map(OsStr::new)
        .contains(&path.extension().unwrap_or(OsStr::new("")))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    mod has_supported_extension {
        use super::*;

        #[test]
        fn accepts_ini_files() {
            assert!(has_supported_extension(Path::new("a/b.ini")));
            assert!(has_supported_extension(Path::new("b.cfg")));
            assert!(has_supported_extension(Path::new("/etc/b.conf")));
        }

        #[test]
        fn rejects_other_files() {
            assert!(!has_supported_extension(Path::new("b.toml")));
            assert!(!has_supported_extension(Path::new("ini")));
            assert!(!has_supported_extension(Path::new("b.ini.bak")));
        }
    }

    mod ini_files {
        use super::*;
        use tempfile;

        #[test]
        #[serial_test::parallel]
        fn keeps_files_as_given() {
            let paths = vec![PathBuf::from("missing.txt"), PathBuf::from("b.ini")];

            let files: Vec<PathBuf> = IniFiles::new(paths.clone())
                .collect::<Result<_, _>>()
                .expect("no walking involved");

            assert_eq!(files, paths);
        }

        #[test]
        #[serial_test::parallel]
        fn walks_directories_in_order() {
            let temp_dir = tempfile::tempdir().expect("cannot create temp dir");
            let sub_dir = temp_dir.path().join("sub");
            fs::create_dir(&sub_dir).expect("cannot create sub dir");
            for name in ["b.ini", "a.conf", "notes.txt", "sub/c.cfg"] {
                fs::write(temp_dir.path().join(name), "k = v\n").expect("cannot write file");
            }

            let files: Vec<PathBuf> = IniFiles::new(vec![temp_dir.path().to_path_buf()])
                .collect::<Result<_, _>>()
                .expect("cannot walk temp dir");

            assert_eq!(
                files,
                vec![
                    temp_dir.path().join("a.conf"),
                    temp_dir.path().join("b.ini"),
                    sub_dir.join("c.cfg"),
                ]
            );
        }

        #[test]
        #[serial_test::parallel]
        fn empty_directory_yields_nothing() {
            let temp_dir = tempfile::tempdir().expect("cannot create temp dir");

            assert_eq!(IniFiles::new(vec![temp_dir.path().to_path_buf()]).count(), 0);
        }
    }
}
