//! Zip archive helpers built on the `zip` crate

use commonutil_core::{
    Error, Result, UtilsConfig, ERR_DIR_ZIP, ERR_FILE_UNZIP, ERR_FILE_ZIP, STREAM_ENTRY_EXTENSION,
};
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, error};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Compress a file or a directory tree into `output`
///
/// A file becomes one entry named after the file. A directory contributes
/// every regular file beneath it, named by its path relative to `source`
/// with `/` separators. An existing `output` is overwritten.
pub fn zip(source: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<()> {
    zip_with(source, output, UtilsConfig::global())
}

/// [`zip`] with an explicit configuration
pub fn zip_with(
    source: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &UtilsConfig,
) -> Result<()> {
    let source = source.as_ref();
    let output = output.as_ref();

    let result = if source.is_file() {
        zip_single_file(source, output, config).inspect_err(|e| {
            error!(source = %source.display(), error = %e, "{}", ERR_FILE_ZIP);
        })
    } else {
        zip_directory(source, output, config).inspect_err(|e| {
            error!(source = %source.display(), error = %e, "{}", ERR_DIR_ZIP);
        })
    };

    if result.is_ok() {
        debug!(source = %source.display(), output = %output.display(), "created archive");
    }
    result
}

/// Write each reader as an entry named `0.txt`, `1.txt`, ...
pub fn zip_streams<R, I>(readers: I, output: impl AsRef<Path>) -> Result<()>
where
    R: Read,
    I: IntoIterator<Item = R>,
{
    zip_streams_with(readers, output, UtilsConfig::global())
}

/// [`zip_streams`] with an explicit configuration
pub fn zip_streams_with<R, I>(
    readers: I,
    output: impl AsRef<Path>,
    config: &UtilsConfig,
) -> Result<()>
where
    R: Read,
    I: IntoIterator<Item = R>,
{
    let output = output.as_ref();

    let result = (|| -> Result<()> {
        let mut writer = create_writer(output)?;
        for (index, reader) in readers.into_iter().enumerate() {
            let name = format!("{index}.{STREAM_ENTRY_EXTENSION}");
            let mut reader = BufReader::with_capacity(config.zip_buffer_size, reader);
            write_entry(&mut writer, output, &name, &mut reader)?;
        }
        finish_writer(writer, output)
    })();

    result.inspect_err(|e| {
        error!(output = %output.display(), error = %e, "{}", ERR_DIR_ZIP);
    })
}

/// Extract `archive` into `destination`, creating it when missing
///
/// Entries whose names would land outside `destination` are rejected.
pub fn unzip(archive: impl AsRef<Path>, destination: impl AsRef<Path>) -> Result<()> {
    unzip_with(archive, destination, UtilsConfig::global())
}

/// [`unzip`] with an explicit configuration
pub fn unzip_with(
    archive: impl AsRef<Path>,
    destination: impl AsRef<Path>,
    config: &UtilsConfig,
) -> Result<()> {
    let archive = archive.as_ref();
    let destination = destination.as_ref();

    extract(archive, destination, config).inspect_err(|e| {
        error!(archive = %archive.display(), error = %e, "{}", ERR_FILE_UNZIP);
    })
}

fn zip_single_file(source: &Path, output: &Path, config: &UtilsConfig) -> Result<()> {
    let name = source
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| Error::file_not_found(source))?;

    let file = File::open(source).map_err(|e| Error::file_system(source, "open", e))?;
    let mut reader = BufReader::with_capacity(config.zip_buffer_size, file);

    let mut writer = create_writer(output)?;
    write_entry(&mut writer, output, &name, &mut reader)?;
    finish_writer(writer, output)
}

fn zip_directory(source: &Path, output: &Path, config: &UtilsConfig) -> Result<()> {
    if !source.exists() {
        return Err(Error::file_not_found(source));
    }

    // Collected before the output is created so it never archives itself
    let mut files: Vec<(PathBuf, String)> = Vec::new();
    for entry in WalkDir::new(source).sort_by_file_name() {
        let entry = entry.map_err(|e| Error::file_system(source, "walk directory", e.into()))?;
        if !entry.file_type().is_file() || entry.path() == output {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| Error::archive(entry.path(), "name entry", e.to_string()))?;
        files.push((entry.path().to_path_buf(), entry_name(relative)));
    }

    let mut writer = create_writer(output)?;
    for (path, name) in &files {
        let file = File::open(path).map_err(|e| Error::file_system(path, "open", e))?;
        let mut reader = BufReader::with_capacity(config.zip_buffer_size, file);
        write_entry(&mut writer, output, name, &mut reader)?;
    }
    finish_writer(writer, output)
}

fn extract(archive: &Path, destination: &Path, config: &UtilsConfig) -> Result<()> {
    fs::create_dir_all(destination)
        .map_err(|e| Error::file_system(destination, "create directory", e))?;

    let file = File::open(archive).map_err(|e| Error::file_system(archive, "open", e))?;
    let mut zip = ZipArchive::new(BufReader::with_capacity(config.zip_buffer_size, file))
        .map_err(|e| Error::archive_with_source(archive, "read", e))?;

    for index in 0..zip.len() {
        let mut entry = zip
            .by_index(index)
            .map_err(|e| Error::archive_with_source(archive, "read entry", e))?;

        let Some(relative) = entry.enclosed_name() else {
            return Err(Error::archive(
                archive,
                "extract",
                format!("entry '{}' escapes the destination", entry.name()),
            ));
        };
        let target = destination.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&target)
                .map_err(|e| Error::file_system(&target, "create directory", e))?;
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::file_system(parent, "create directory", e))?;
        }
        let out = File::create(&target).map_err(|e| Error::file_system(&target, "create", e))?;
        let mut out = BufWriter::with_capacity(config.zip_buffer_size, out);
        io::copy(&mut entry, &mut out).map_err(|e| Error::file_system(&target, "write", e))?;
        out.flush()
            .map_err(|e| Error::file_system(&target, "flush", e))?;
    }

    debug!(
        archive = %archive.display(),
        destination = %destination.display(),
        entries = zip.len(),
        "extracted archive"
    );
    Ok(())
}

fn entry_name(relative: &Path) -> String {
    relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn create_writer(output: &Path) -> Result<ZipWriter<File>> {
    let file = File::create(output).map_err(|e| Error::file_system(output, "create", e))?;
    Ok(ZipWriter::new(file))
}

fn write_entry<R: Read>(
    writer: &mut ZipWriter<File>,
    output: &Path,
    name: &str,
    reader: &mut R,
) -> Result<()> {
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    writer
        .start_file(name, options)
        .map_err(|e| Error::archive_with_source(output, "start entry", e))?;
    io::copy(reader, writer).map_err(|e| Error::file_system(output, "write entry", e))?;
    Ok(())
}

fn finish_writer(writer: ZipWriter<File>, output: &Path) -> Result<()> {
    writer
        .finish()
        .map_err(|e| Error::archive_with_source(output, "finish", e))?;
    Ok(())
}
