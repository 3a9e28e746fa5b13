//! Output commit policy for generated artifacts.

use std::fs;
use std::io;
use std::path::Path;

/// Marker prefix that lets generated placeholder files be regenerated
/// without `--force`.
pub const STUB_MARKER: &str = "/* stub */";

/// Flags governing how generated output is written.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    /// Overwrite the destination even if it exists.
    pub force: bool,
    /// Silently skip write refusals instead of failing.
    pub silent: bool,
}

/// Write generated output to `path`, or to stdout when no path is given.
///
/// An existing destination is only overwritten when `force` is set or the
/// file is a stub; otherwise the write is refused, fatally unless `silent`
/// is set. Written files always end with a newline.
pub fn commit_output(src: &str, path: Option<&Path>, options: &OutputOptions) -> io::Result<()> {
    let Some(path) = path else {
        println!("{}", src);
        return Ok(());
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    if path.exists() && !options.force {
        let contents = fs::read_to_string(path)?;
        if !contents.starts_with(STUB_MARKER) {
            if options.silent {
                return Ok(());
            }
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!(
                    "{} exists, pass --force to overwrite it or delete the file",
                    path.display()
                ),
            ));
        }
    }

    let mut contents = src.to_string();
    if !contents.ends_with('\n') {
        contents.push('\n');
    }
    fs::write(path, contents)
}
