//! Writes rendered tables out.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use cbgen_opcodes::table::OpcodeRecord;
use log::{debug, info};
use thiserror::Error;

use crate::render::{render_table, OutputFormat};

/// Errors that can result from saving a table to a file. The underlying IO error is kept
/// unchanged as the source.
#[derive(Debug, Error)]
pub enum SaveTableError {
    /// The output file could not be created.
    #[error("Unable to create table file {path:?}: {source}")]
    Create {
        /// The file being created.
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Writing to the output file failed. The file may contain part of the table.
    #[error("Error while writing table to {path:?}: {source}")]
    Write {
        /// The file being written.
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Render the records in the given format and write them to `out`.
pub fn write_table<W: Write>(
    records: &[OpcodeRecord],
    format: OutputFormat,
    mut out: W,
) -> io::Result<()> {
    let text = render_table(records, format);
    debug!("Writing {} records, {} bytes", records.len(), text.len());
    out.write_all(text.as_bytes())?;
    out.flush()
}

/// Render the records in the given format and save them to the file at `path`, replacing
/// anything already there.
pub fn save_table(
    records: &[OpcodeRecord],
    format: OutputFormat,
    path: impl AsRef<Path>,
) -> Result<(), SaveTableError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| SaveTableError::Create {
        path: path.to_owned(),
        source,
    })?;
    write_table(records, format, BufWriter::new(file)).map_err(|source| {
        SaveTableError::Write {
            path: path.to_owned(),
            source,
        }
    })?;
    info!("Saved {} records to {}", records.len(), path.display());
    Ok(())
}
