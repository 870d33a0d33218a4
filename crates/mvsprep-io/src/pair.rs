//! The pair file lists, for every reference camera, the source cameras MVSNet
//! matches it against:
//!
//! ```text
//! TOTAL_IMAGE_NUM
//! IMAGE_ID0
//! NUM_NEIGHBOURS ID0 SCORE0 ID1 SCORE1 ...
//! IMAGE_ID1
//! ...
//! ```

use std::{fs, path::Path};

use mvsprep_geometry::proximity::{Neighbour, NeighbourList};

use crate::text::{format_shortest, parse_part, write_lines};

/// Error types for the pair file module.
#[derive(Debug, thiserror::Error)]
pub enum PairFileError {
    /// Error reading or writing file
    #[error("error reading or writing file")]
    IoError(#[from] std::io::Error),

    /// The neighbour lists are not given in camera id order.
    #[error("Neighbour list {index} belongs to camera {camera_id}")]
    UnorderedCamera {
        /// Position of the list.
        index: usize,
        /// Camera id of the list.
        camera_id: usize,
    },

    /// Parse error
    #[error("Parse error {0}")]
    ParseError(String),
}

/// The lines of a pair file.
///
/// # Errors
///
/// The list at index `i` must belong to camera `i`.
fn pair_file_lines(lists: &[NeighbourList]) -> Result<Vec<String>, PairFileError> {
    let mut lines = Vec::with_capacity(2 * lists.len() + 1);
    lines.push(lists.len().to_string());

    for (index, list) in lists.iter().enumerate() {
        if list.camera_id != index {
            return Err(PairFileError::UnorderedCamera {
                index,
                camera_id: list.camera_id,
            });
        }

        lines.push(list.camera_id.to_string());

        let mut parts = vec![list.len().to_string()];
        for neighbour in &list.neighbours {
            parts.push(neighbour.id.to_string());
            parts.push(format_shortest(neighbour.score));
        }
        lines.push(parts.join(" "));
    }

    Ok(lines)
}

/// Format the neighbour lists as a pair file.
pub fn format_pair_file(lists: &[NeighbourList]) -> Result<String, PairFileError> {
    Ok(pair_file_lines(lists)?.join("\n"))
}

/// Write the pair file, creating its parent directory and replacing any
/// existing file.
///
/// # Arguments
///
/// * `path` - The path to the pair file, usually `<cams_dir>/pair.txt`.
/// * `lists` - The neighbour list of every camera, in camera id order.
pub fn write_pair_file(path: impl AsRef<Path>, lists: &[NeighbourList]) -> Result<(), PairFileError> {
    let path = path.as_ref();
    let lines = pair_file_lines(lists)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    write_lines(path, &lines)?;

    log::info!("wrote pair file for {} cameras to {}", lists.len(), path.display());

    Ok(())
}

fn parse_neighbour_line(line_no: usize, line: &str) -> Result<Vec<Neighbour>, PairFileError> {
    let parse_err = |e: String| PairFileError::ParseError(format!("line {line_no}: {e}"));

    let parts = line.split_whitespace().collect::<Vec<_>>();
    let (count, rest) = parts
        .split_first()
        .ok_or_else(|| parse_err("missing neighbour count".to_string()))?;
    let count: usize = parse_part(count).map_err(parse_err)?;

    if rest.len() % 2 != 0 || rest.len() / 2 != count {
        return Err(parse_err(format!(
            "expected {count} neighbours, found {} values",
            rest.len()
        )));
    }

    rest.chunks_exact(2)
        .map(|chunk| -> Result<Neighbour, PairFileError> {
            Ok(Neighbour {
                id: parse_part(chunk[0]).map_err(parse_err)?,
                score: parse_part(chunk[1]).map_err(parse_err)?,
            })
        })
        .collect()
}

/// Parse the text of a pair file.
///
/// Camera blocks must be in ascending camera id order starting at zero.
pub fn parse_pair_file(text: &str) -> Result<Vec<NeighbourList>, PairFileError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty());

    let mut next_line = |what: &str| {
        lines
            .next()
            .ok_or_else(|| PairFileError::ParseError(format!("unexpected end of file, expected {what}")))
    };

    let (line_no, line) = next_line("camera count")?;
    let num_cameras: usize = parse_part(line)
        .map_err(|e| PairFileError::ParseError(format!("line {line_no}: {e}")))?;

    let mut lists = Vec::new();
    for index in 0..num_cameras {
        let (line_no, line) = next_line("camera id")?;
        let camera_id: usize = parse_part(line)
            .map_err(|e| PairFileError::ParseError(format!("line {line_no}: {e}")))?;
        if camera_id != index {
            return Err(PairFileError::UnorderedCamera { index, camera_id });
        }

        let (line_no, line) = next_line("neighbour list")?;
        lists.push(NeighbourList {
            camera_id,
            neighbours: parse_neighbour_line(line_no, line)?,
        });
    }

    if let Some((line_no, _)) = lines.next() {
        return Err(PairFileError::ParseError(format!(
            "line {line_no}: unexpected content after {num_cameras} cameras"
        )));
    }

    Ok(lists)
}

/// Read a pair file.
///
/// # Arguments
///
/// * `path` - The path to the pair file.
pub fn read_pair_file(path: impl AsRef<Path>) -> Result<Vec<NeighbourList>, PairFileError> {
    let text = fs::read_to_string(path)?;
    parse_pair_file(&text)
}
