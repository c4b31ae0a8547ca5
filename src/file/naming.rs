//! Stored filename generation.

use std::fmt::Write;
use std::path::Path;

use rand::rngs::OsRng;
use rand::TryRngCore;

use crate::{NodekbError, Result};

/// Number of random bytes in a generated filename.
pub const RANDOM_NAME_BYTES: usize = 16;

/// Extract the extension of a client-supplied filename, including the dot.
///
/// Case is preserved. Names without an extension (including dotfiles such as
/// `.hidden`) yield an empty string; a trailing dot yields `"."`.
pub fn extension_of(original_name: &str) -> String {
    match Path::new(original_name).extension().and_then(|s| s.to_str()) {
        Some(ext) => format!(".{ext}"),
        None => String::new(),
    }
}

/// Generate a new stored filename: 16 random bytes, hex-encoded, followed by
/// the original file's extension.
pub fn generate_filename(original_name: &str) -> Result<String> {
    let mut buf = [0u8; RANDOM_NAME_BYTES];
    OsRng
        .try_fill_bytes(&mut buf)
        .map_err(|e| NodekbError::Storage(format!("random source unavailable: {e}")))?;

    let mut name = String::with_capacity(RANDOM_NAME_BYTES * 2 + 8);
    for byte in buf {
        // Writing to a String cannot fail.
        let _ = write!(name, "{byte:02x}");
    }
    name.push_str(&extension_of(original_name));

    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("photo.png"), ".png");
        assert_eq!(extension_of("image.PNG"), ".PNG");
        assert_eq!(extension_of("archive.tar.gz"), ".gz");
        assert_eq!(extension_of("no_extension"), "");
        assert_eq!(extension_of(".hidden"), "");
        assert_eq!(extension_of("dir/sub/file.jpg"), ".jpg");
        assert_eq!(extension_of("日本語ファイル.txt"), ".txt");
        assert_eq!(extension_of(""), "");
    }

    #[test]
    fn test_generate_filename_format() {
        let name = generate_filename("cat.jpeg").unwrap();

        assert!(name.ends_with(".jpeg"));
        let stem = name.trim_end_matches(".jpeg");
        assert_eq!(stem.len(), RANDOM_NAME_BYTES * 2);
        assert!(stem.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_generate_filename_without_extension() {
        let name = generate_filename("README").unwrap();
        assert_eq!(name.len(), RANDOM_NAME_BYTES * 2);
    }

    #[test]
    fn test_generate_filename_unique() {
        let names: std::collections::HashSet<String> = (0..100)
            .map(|_| generate_filename("a.png").unwrap())
            .collect();
        assert_eq!(names.len(), 100);
    }
}
