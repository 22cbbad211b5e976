use std::path::{Path, PathBuf};

use log::warn;

/// Paths of the artifacts written for one input image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputTargets {
    pub text: PathBuf,
    pub image: PathBuf,
}

impl OutputTargets {
    /// Places `<name>_result.txt` and `<name>_result.jpg` in `output_dir`, or in the current
    /// directory when none is given or the given one does not exist.
    pub fn resolve(input: &Path, output_dir: Option<&Path>) -> Self {
        let dir = match output_dir {
            Some(dir) if dir.is_dir() => dir.to_path_buf(),
            Some(dir) => {
                warn!("output directory {} does not exist, writing to ./", dir.display());
                PathBuf::from(".")
            },
            None => PathBuf::from("."),
        };

        let stem = result_stem(input);
        Self { text: dir.join(format!("{stem}.txt")), image: dir.join(format!("{stem}.jpg")) }
    }
}

/// `photo.final.png` becomes `photo_result`: everything before the first dot of the file name.
pub fn result_stem(input: &Path) -> String {
    let name = input.file_name().map(|name| name.to_string_lossy()).unwrap_or_default();
    let base = name.split('.').next().unwrap_or_default();
    format!("{base}_result")
}
