//! Unbuffered handles on the standard streams
//!
//! `std::io::stdout()` is line buffered, which would split and merge the
//! writes of the copy loop and defeat output block reshaping. The filter
//! works on duplicates of the underlying descriptors instead.

use std::fs::File;
use std::io;

/// Unbuffered standard input
pub fn stdin() -> io::Result<File> {
    duplicate(&io::stdin())
}

/// Unbuffered standard output
pub fn stdout() -> io::Result<File> {
    duplicate(&io::stdout())
}

#[cfg(unix)]
fn duplicate<T: std::os::fd::AsFd>(stream: &T) -> io::Result<File> {
    Ok(File::from(stream.as_fd().try_clone_to_owned()?))
}

#[cfg(windows)]
fn duplicate<T: std::os::windows::io::AsHandle>(stream: &T) -> io::Result<File> {
    Ok(File::from(stream.as_handle().try_clone_to_owned()?))
}
