use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};
use flate2::read::MultiGzDecoder;

/// Boxed reader type shared by every input source.
pub type DynReader = BufReader<Box<dyn Read + Send>>;

///
/// Open a read file, transparently decompressing it when the name ends in `.gz`.
///
/// Concatenated gzip members (as written by `bgzip` or `cat a.gz b.gz`) are read through.
///
pub fn get_dynamic_reader(path: &Path) -> Result<DynReader> {
    let file = File::open(path).with_context(|| format!("Failed to open file: {:?}", path))?;
    let inner: Box<dyn Read + Send> = if path.extension() == Some(OsStr::new("gz")) {
        Box::new(MultiGzDecoder::new(file))
    } else {
        Box::new(file)
    };
    Ok(BufReader::new(inner))
}

///
/// Like [`get_dynamic_reader`], but `-` reads from stdin.
///
pub fn get_dynamic_reader_w_stdin(input: &str) -> Result<DynReader> {
    match input {
        "-" => Ok(BufReader::new(Box::new(std::io::stdin()) as Box<dyn Read + Send>)),
        path => get_dynamic_reader(Path::new(path)),
    }
}

///
/// Strip every extension from a file name, so `sample.bed.gz` becomes `sample`.
///
pub fn remove_all_extensions(path: &Path) -> String {
    let mut stem = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();

    while let Some(idx) = stem.rfind('.') {
        if idx == 0 {
            break;
        }
        stem.truncate(idx);
    }

    stem
}
