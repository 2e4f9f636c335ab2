use crate::core::models::graph::MolecularGraph;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Defines the interface for formats a residue graph can be read from.
///
/// Implementors handle format-specific parsing and return the graph together
/// with whatever format metadata the caller may want to keep.
pub trait GraphReader {
    /// The type of metadata associated with the file format.
    type Metadata;

    /// The error type for I/O operations.
    type Error: Error + From<io::Error>;

    /// Reads a residue graph from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or I/O operations encounter issues.
    fn read_from(reader: &mut impl BufRead)
    -> Result<(MolecularGraph, Self::Metadata), Self::Error>;

    /// Reads a residue graph from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<(MolecularGraph, Self::Metadata), Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }
}

/// Defines the interface for formats a residue graph can be saved to.
pub trait GraphWriter: GraphReader {
    /// Writes a residue graph and its metadata to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    fn write_to(
        graph: &MolecularGraph,
        metadata: &Self::Metadata,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error>;

    /// Writes a residue graph to a file path, creating or truncating the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails.
    fn write_to_path<P: AsRef<Path>>(
        graph: &MolecularGraph,
        metadata: &Self::Metadata,
        path: P,
    ) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(graph, metadata, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
