use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use playground_core::CellCoord;
use playground_world::{Grid, GridError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const LAYOUT_DOMAIN: &str = "maze";
const LAYOUT_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded layout payload.
pub(crate) const LAYOUT_HEADER: &str = "maze:v1";
/// Delimiter used to separate the prefix, grid dimensions and payload.
const FIELD_DELIMITER: char = ':';

/// Maze walls and landmarks in a form that survives a clipboard round trip.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct MazeLayout {
    /// Number of columns in the grid.
    pub(crate) columns: u32,
    /// Number of rows in the grid.
    pub(crate) rows: u32,
    /// Rows of `0` (open) and `1` (wall) values, top to bottom.
    pub(crate) walls: Vec<Vec<u8>>,
    /// Cell the robot starts from.
    pub(crate) start: CellCoord,
    /// Cell the robot must reach.
    pub(crate) goal: CellCoord,
}

impl MazeLayout {
    /// Captures the layout of an existing grid.
    pub(crate) fn capture(grid: &Grid, start: CellCoord, goal: CellCoord) -> Self {
        Self {
            columns: grid.columns(),
            rows: grid.rows(),
            walls: grid.to_rows(),
            start,
            goal,
        }
    }

    /// Builds the grid described by the layout.
    pub(crate) fn grid(&self) -> Result<Grid, LayoutTransferError> {
        let grid = Grid::from_rows(&self.walls)?;
        if (grid.columns(), grid.rows()) != (self.columns, self.rows) {
            return Err(LayoutTransferError::DimensionMismatch {
                declared: (self.columns, self.rows),
                actual: (grid.columns(), grid.rows()),
            });
        }
        Ok(grid)
    }

    /// Encodes the layout into a single-line string suitable for clipboard transfer.
    pub(crate) fn encode(&self) -> Result<String, LayoutTransferError> {
        let payload = SerializableLayout {
            walls: self.walls.clone(),
            start: self.start,
            goal: self.goal,
        };
        let json = serde_json::to_vec(&payload).map_err(LayoutTransferError::InvalidPayload)?;
        let encoded = STANDARD_NO_PAD.encode(json);
        Ok(format!(
            "{LAYOUT_HEADER}:{}x{}:{encoded}",
            self.columns, self.rows
        ))
    }

    /// Decodes a layout from the provided string representation.
    pub(crate) fn decode(value: &str) -> Result<Self, LayoutTransferError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(LayoutTransferError::EmptyPayload);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().ok_or(LayoutTransferError::MissingPrefix)?;
        let version = parts.next().ok_or(LayoutTransferError::MissingVersion)?;
        let dimensions = parts.next().ok_or(LayoutTransferError::MissingDimensions)?;
        let payload = parts.next().ok_or(LayoutTransferError::MissingPayload)?;

        if domain != LAYOUT_DOMAIN {
            return Err(LayoutTransferError::InvalidPrefix(domain.to_owned()));
        }
        if version != LAYOUT_VERSION {
            return Err(LayoutTransferError::UnsupportedVersion(version.to_owned()));
        }

        let (columns, rows) = parse_dimensions(dimensions)?;
        let bytes = STANDARD_NO_PAD
            .decode(payload.as_bytes())
            .map_err(LayoutTransferError::InvalidEncoding)?;
        let decoded: SerializableLayout =
            serde_json::from_slice(&bytes).map_err(LayoutTransferError::InvalidPayload)?;

        Ok(Self {
            columns,
            rows,
            walls: decoded.walls,
            start: decoded.start,
            goal: decoded.goal,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct SerializableLayout {
    walls: Vec<Vec<u8>>,
    start: CellCoord,
    goal: CellCoord,
}

/// Errors that can occur while decoding layout transfer strings.
#[derive(Debug, Error)]
pub(crate) enum LayoutTransferError {
    /// The provided string was empty or contained only whitespace.
    #[error("layout code was empty")]
    EmptyPayload,
    /// The prefix segment was missing from the encoded layout.
    #[error("layout code is missing the prefix")]
    MissingPrefix,
    /// The encoded layout did not contain a version segment.
    #[error("layout code is missing the version")]
    MissingVersion,
    /// The encoded layout did not include grid dimensions.
    #[error("layout code is missing the grid dimensions")]
    MissingDimensions,
    /// The encoded layout did not include the payload segment.
    #[error("layout code is missing the payload")]
    MissingPayload,
    /// The encoded layout used an unexpected prefix segment.
    #[error("layout prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The encoded layout used an unsupported version identifier.
    #[error("layout version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The grid dimensions could not be parsed from the encoded layout.
    #[error("could not parse grid dimensions '{0}'")]
    InvalidDimensions(String),
    /// The declared dimensions disagree with the wall rows.
    #[error("layout declares {declared:?} columns and rows but its walls span {actual:?}")]
    DimensionMismatch {
        /// Dimensions from the header.
        declared: (u32, u32),
        /// Dimensions of the wall rows.
        actual: (u32, u32),
    },
    /// The base64 payload could not be decoded.
    #[error("could not decode layout payload: {0}")]
    InvalidEncoding(#[source] base64::DecodeError),
    /// The payload could not be serialised or deserialised.
    #[error("could not parse layout payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),
    /// The wall rows do not form a valid maze.
    #[error("layout walls are invalid: {0}")]
    InvalidGrid(#[from] GridError),
}

fn parse_dimensions(dimensions: &str) -> Result<(u32, u32), LayoutTransferError> {
    let (columns, rows) = dimensions
        .split_once(['x', 'X'])
        .ok_or_else(|| LayoutTransferError::InvalidDimensions(dimensions.to_owned()))?;

    let columns = columns
        .trim()
        .parse::<u32>()
        .map_err(|_| LayoutTransferError::InvalidDimensions(dimensions.to_owned()))?;
    let rows = rows
        .trim()
        .parse::<u32>()
        .map_err(|_| LayoutTransferError::InvalidDimensions(dimensions.to_owned()))?;

    if columns == 0 || rows == 0 {
        return Err(LayoutTransferError::InvalidDimensions(
            dimensions.to_owned(),
        ));
    }

    Ok((columns, rows))
}
