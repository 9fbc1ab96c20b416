use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::{MapGrid, TileType};

#[derive(Debug, Error)]
pub enum MapParseError {
    #[error("failed to read map file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: missing {field}")]
    MissingField { line: usize, field: &'static str },
    #[error("line {line}: {field} must be a non-negative integer, got '{value}'")]
    InvalidNumber {
        line: usize,
        field: &'static str,
        value: String,
    },
    #[error("line {line}: tileset must declare at least one tile")]
    EmptyTileset { line: usize },
    #[error("line {line}: map dimensions must be non-zero, got {width}x{height}")]
    EmptyGrid { line: usize, width: u32, height: u32 },
    #[error("expected {expected} map rows, found {found}")]
    MissingRows { expected: u32, found: u32 },
    #[error("line {line}: map row {row} has {found} tiles, expected {expected}")]
    ShortRow {
        line: usize,
        row: u32,
        expected: u32,
        found: u32,
    },
    #[error(
        "line {line}: tile index {value} at column {column} of row {row} is outside the tileset (0..{tile_count})"
    )]
    TileOutOfRange {
        line: usize,
        row: u32,
        column: u32,
        value: u32,
        tile_count: u32,
    },
}

impl MapGrid {
    pub fn load_file(path: &Path) -> Result<Self, MapParseError> {
        let raw = fs::read_to_string(path).map_err(|source| MapParseError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::load(&raw)
    }

    /// Parses the text map format:
    ///
    /// ```text
    /// <tileset key> <tile count> <tile width> <tile height>
    /// <width> <height>
    /// <height rows of width tile indices>
    /// ```
    ///
    /// Blank lines are skipped. Tokens past `width` on a row and lines after
    /// the last row are ignored.
    pub fn load(source: &str) -> Result<Self, MapParseError> {
        let mut lines = source
            .lines()
            .enumerate()
            .map(|(index, line)| (index + 1, line))
            .filter(|(_, line)| !line.trim().is_empty());

        let (header_line, header) = lines.next().unwrap_or((1, ""));
        let mut header_tokens = header.split_whitespace();
        let tileset_key = header_tokens
            .next()
            .ok_or(MapParseError::MissingField {
                line: header_line,
                field: "tileset identifier",
            })
            .map(normalize_tileset_key)?;
        let tile_count = next_number(&mut header_tokens, header_line, "tile count")?;
        let tile_width = next_number(&mut header_tokens, header_line, "tile width")?;
        let tile_height = next_number(&mut header_tokens, header_line, "tile height")?;
        if tile_count == 0 {
            return Err(MapParseError::EmptyTileset { line: header_line });
        }

        let (dims_line, dims) = lines.next().unwrap_or((header_line + 1, ""));
        let mut dims_tokens = dims.split_whitespace();
        let width = next_number(&mut dims_tokens, dims_line, "map width")?;
        let height = next_number(&mut dims_tokens, dims_line, "map height")?;
        if width == 0 || height == 0 {
            return Err(MapParseError::EmptyGrid {
                line: dims_line,
                width,
                height,
            });
        }

        let mut cells = Vec::new();
        for row in 0..height {
            let Some((line, text)) = lines.next() else {
                return Err(MapParseError::MissingRows {
                    expected: height,
                    found: row,
                });
            };
            let mut tokens = text.split_whitespace();
            for column in 0..width {
                let Some(token) = tokens.next() else {
                    return Err(MapParseError::ShortRow {
                        line,
                        row,
                        expected: width,
                        found: column,
                    });
                };
                let value = parse_number(token, line, "tile index")?;
                if value >= tile_count {
                    return Err(MapParseError::TileOutOfRange {
                        line,
                        row,
                        column,
                        value,
                        tile_count,
                    });
                }
                cells.push(value);
            }
        }

        let tileset = (0..tile_count)
            .map(|index| TileType {
                index,
                walkable: true,
                atlas_column: index,
            })
            .collect();

        Ok(Self {
            tileset_key,
            tile_width,
            tile_height,
            width,
            height,
            cells,
            tileset,
        })
    }
}

pub fn parse_blocked_tiles(source: &str) -> Vec<i64> {
    source
        .split_whitespace()
        .map_while(|token| token.parse::<i64>().ok())
        .collect()
}

fn normalize_tileset_key(raw: &str) -> String {
    raw.strip_suffix(".png").unwrap_or(raw).to_string()
}

fn next_number<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    line: usize,
    field: &'static str,
) -> Result<u32, MapParseError> {
    let token = tokens
        .next()
        .ok_or(MapParseError::MissingField { line, field })?;
    parse_number(token, line, field)
}

fn parse_number(token: &str, line: usize, field: &'static str) -> Result<u32, MapParseError> {
    token
        .parse::<u32>()
        .map_err(|_| MapParseError::InvalidNumber {
            line,
            field,
            value: token.to_string(),
        })
}
