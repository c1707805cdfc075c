//! Monthly block archives
//!
//! Each block starts with a two-integer header line naming its month and is
//! followed by body rows holding one grid in centi-units. The line classifier
//! and the [`BlockState`] machine are kept separate so the transition table can
//! be tested on its own:
//!
//! | state            | line   | action                           | next             |
//! |------------------|--------|----------------------------------|------------------|
//! | AwaitingHeader   | blank  | ignore                           | AwaitingHeader   |
//! | AwaitingHeader   | header | open block                       | AccumulatingBody |
//! | AwaitingHeader   | body   | error                            |                  |
//! | AwaitingHeader   | other  | error                            |                  |
//! | AccumulatingBody | blank  | ignore                           | AccumulatingBody |
//! | AccumulatingBody | body   | check width, append              | AccumulatingBody |
//! | AccumulatingBody | header | close block, open the next       | AccumulatingBody |
//! | AccumulatingBody | other  | error                            |                  |
//!
//! End of input closes the open block; input without any block is an error.

use std::path::Path;
use tracing::{debug, info};

use super::stats::{ParseResult, ParseStats};
use super::tokens::{all_integers, parse_floats, read_source, split_tokens};
use crate::app::models::calendar::month_start;
use crate::app::models::{Cadence, GridAxes, GridSeries, GridSeriesBuilder, LatitudeOrder};
use crate::app::services::missing_value::{SentinelRule, apply_optional};
use crate::constants::CENTI_UNIT_DIVISOR;
use crate::error::{ClimateError, Result};
use chrono::NaiveDate;
use ndarray::{Array2, Axis};

/// Order of the two integers on a block header line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderOrder {
    YearMonth,
    MonthYear,
}

/// What one source body row runs along
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAxis {
    /// Each row is a latitude band holding one value per longitude
    Latitude,
    /// Each row is a longitude column holding one value per latitude
    Longitude,
}

/// Classification of a single input line
#[derive(Debug, Clone, PartialEq)]
pub enum LineKind<'a> {
    Blank,
    /// Exactly two integer tokens, in file order
    Header(i32, i32),
    /// More than two tokens
    Body(Vec<&'a str>),
    Other,
}

impl<'a> LineKind<'a> {
    pub fn classify(line: &'a str) -> Self {
        let tokens = split_tokens(line);
        match tokens.len() {
            0 => LineKind::Blank,
            2 if all_integers(&tokens) => {
                match (tokens[0].parse::<i32>(), tokens[1].parse::<i32>()) {
                    (Ok(first), Ok(second)) => LineKind::Header(first, second),
                    _ => LineKind::Other,
                }
            }
            n if n > 2 => LineKind::Body(tokens),
            _ => LineKind::Other,
        }
    }
}

/// Block currently being filled
#[derive(Debug, Clone, PartialEq)]
pub struct OpenBlock {
    pub date: NaiveDate,
    pub header_line: usize,
    pub values: Vec<f64>,
}

/// Parser state
#[derive(Debug, Clone, PartialEq)]
pub enum BlockState {
    AwaitingHeader,
    AccumulatingBody(OpenBlock),
}

/// Layout of a monthly block archive
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyBlockConfig {
    /// Name used in errors and log output
    pub label: String,

    /// Output axes; latitudes are stored ascending
    pub axes: GridAxes,

    pub header_order: HeaderOrder,

    pub row_axis: RowAxis,

    /// Latitude order of the rows or columns in the file
    pub source_latitude_order: LatitudeOrder,

    /// Divisor turning stored integers into physical units
    pub divisor: f64,

    /// Missing value rule applied to scaled values
    pub sentinel: Option<SentinelRule>,
}

impl MonthlyBlockConfig {
    pub fn new(label: impl Into<String>, axes: GridAxes) -> Self {
        let axes = match axes.latitude_order() {
            LatitudeOrder::Ascending => axes,
            LatitudeOrder::Descending => axes.reversed_latitudes(),
        };
        Self {
            label: label.into(),
            axes,
            header_order: HeaderOrder::YearMonth,
            row_axis: RowAxis::Latitude,
            source_latitude_order: LatitudeOrder::Descending,
            divisor: CENTI_UNIT_DIVISOR,
            sentinel: None,
        }
    }

    pub fn with_header_order(mut self, header_order: HeaderOrder) -> Self {
        self.header_order = header_order;
        self
    }

    pub fn with_row_axis(mut self, row_axis: RowAxis) -> Self {
        self.row_axis = row_axis;
        self
    }

    pub fn with_source_latitude_order(mut self, order: LatitudeOrder) -> Self {
        self.source_latitude_order = order;
        self
    }

    pub fn with_divisor(mut self, divisor: f64) -> Self {
        self.divisor = divisor;
        self
    }

    pub fn with_sentinel(mut self, sentinel: SentinelRule) -> Self {
        self.sentinel = Some(sentinel);
        self
    }

    /// Values on one source row
    fn row_width(&self) -> usize {
        let (n_lat, n_lon) = self.axes.shape();
        match self.row_axis {
            RowAxis::Latitude => n_lon,
            RowAxis::Longitude => n_lat,
        }
    }

    fn block_size(&self) -> usize {
        let (n_lat, n_lon) = self.axes.shape();
        n_lat * n_lon
    }
}

/// Parser for monthly block archives such as HadSLP2
#[derive(Debug, Clone)]
pub struct MonthlyBlockParser {
    config: MonthlyBlockConfig,
}

impl MonthlyBlockParser {
    pub fn new(config: MonthlyBlockConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MonthlyBlockConfig {
        &self.config
    }

    /// Parse an archive into a monthly grid series
    pub fn parse(&self, raw: &str) -> Result<GridSeries> {
        self.parse_detailed(raw).map(|result| result.output)
    }

    /// Read and parse an archive file
    pub fn parse_file(&self, path: &Path) -> Result<GridSeries> {
        info!("Parsing monthly block file: {}", path.display());
        let raw = read_source(path)?;
        let series = self.parse(&raw)?;
        info!(
            "Parsed {} monthly fields ({})",
            series.len(),
            series.time_units()
        );
        Ok(series)
    }

    /// Parse an archive, also returning parse statistics
    pub fn parse_detailed(&self, raw: &str) -> Result<ParseResult<GridSeries>> {
        let mut builder = GridSeriesBuilder::new(self.config.axes.clone(), Cadence::Monthly);
        let mut stats = ParseStats::new();
        let mut state = BlockState::AwaitingHeader;

        for (index, line) in raw.lines().enumerate() {
            stats.lines_read += 1;
            state = self.step(state, index + 1, LineKind::classify(line), &mut builder, &mut stats)?;
        }

        match state {
            BlockState::AccumulatingBody(block) => {
                self.close_block(block, &mut builder, &mut stats)?
            }
            BlockState::AwaitingHeader => {
                return Err(ClimateError::format_at_end(
                    &self.config.label,
                    "no monthly block found",
                ));
            }
        }

        Ok(ParseResult {
            output: builder.finish()?,
            stats,
        })
    }

    /// Apply one transition of the block state machine
    pub fn step(
        &self,
        state: BlockState,
        line_number: usize,
        kind: LineKind<'_>,
        builder: &mut GridSeriesBuilder,
        stats: &mut ParseStats,
    ) -> Result<BlockState> {
        let label = self.config.label.as_str();
        match (state, kind) {
            (state, LineKind::Blank) => Ok(state),

            (BlockState::AwaitingHeader, LineKind::Header(first, second)) => {
                let date = self.block_date(line_number, first, second, builder.last_date())?;
                Ok(BlockState::AccumulatingBody(OpenBlock {
                    date,
                    header_line: line_number,
                    values: Vec::with_capacity(self.config.block_size()),
                }))
            }

            (BlockState::AccumulatingBody(block), LineKind::Header(first, second)) => {
                let previous = block.date;
                self.close_block(block, builder, stats)?;
                let date = self.block_date(line_number, first, second, Some(previous))?;
                Ok(BlockState::AccumulatingBody(OpenBlock {
                    date,
                    header_line: line_number,
                    values: Vec::with_capacity(self.config.block_size()),
                }))
            }

            (BlockState::AccumulatingBody(mut block), LineKind::Body(tokens)) => {
                let row_width = self.config.row_width();
                let position = block.values.len() % row_width;
                if row_width % tokens.len() != 0 || position + tokens.len() > row_width {
                    return Err(ClimateError::format_at_line(
                        label,
                        line_number,
                        format!(
                            "{} values do not tile a row of {} values",
                            tokens.len(),
                            row_width
                        ),
                    ));
                }
                let divisor = self.config.divisor;
                block.values.extend(
                    parse_floats(label, line_number, &tokens)?
                        .into_iter()
                        .map(|value| value / divisor),
                );
                Ok(BlockState::AccumulatingBody(block))
            }

            (BlockState::AwaitingHeader, LineKind::Body(_)) => Err(ClimateError::format_at_line(
                label,
                line_number,
                "grid values before any block header",
            )),

            (_, LineKind::Other) => Err(ClimateError::format_at_line(
                label,
                line_number,
                "line is neither a block header nor a grid row",
            )),
        }
    }

    /// Validate a header and return its month, which must follow `previous`
    fn block_date(
        &self,
        line_number: usize,
        first: i32,
        second: i32,
        previous: Option<NaiveDate>,
    ) -> Result<NaiveDate> {
        let label = self.config.label.as_str();
        let (year, month) = match self.config.header_order {
            HeaderOrder::YearMonth => (first, second),
            HeaderOrder::MonthYear => (second, first),
        };
        if !(1..=12).contains(&month) {
            return Err(ClimateError::format_at_line(
                label,
                line_number,
                format!("month {} outside 1..=12", month),
            ));
        }
        let date = month_start(year, month as u32).map_err(|_| {
            ClimateError::format_at_line(
                label,
                line_number,
                format!("invalid block date {}-{:02}", year, month),
            )
        })?;
        if let Some(previous) = previous {
            if date <= previous {
                return Err(ClimateError::format_at_line(
                    label,
                    line_number,
                    format!(
                        "block {} does not follow block {}",
                        date.format("%Y-%m"),
                        previous.format("%Y-%m")
                    ),
                ));
            }
        }
        Ok(date)
    }

    /// Convert a finished block into an ascending-latitude grid and append it
    fn close_block(
        &self,
        block: OpenBlock,
        builder: &mut GridSeriesBuilder,
        stats: &mut ParseStats,
    ) -> Result<()> {
        let label = self.config.label.as_str();
        let (n_lat, n_lon) = self.config.axes.shape();
        if block.values.len() != self.config.block_size() {
            return Err(ClimateError::format_at_line(
                label,
                block.header_line,
                format!(
                    "block {} holds {} values, expected {}",
                    block.date.format("%Y-%m"),
                    block.values.len(),
                    self.config.block_size()
                ),
            ));
        }

        let mut grid = match self.config.row_axis {
            RowAxis::Latitude => Array2::from_shape_vec((n_lat, n_lon), block.values),
            RowAxis::Longitude => Array2::from_shape_vec((n_lon, n_lat), block.values)
                .map(|columns| columns.reversed_axes()),
        }
        .map_err(|e| ClimateError::format_at_line(label, block.header_line, e.to_string()))?;

        if self.config.source_latitude_order == LatitudeOrder::Descending {
            grid.invert_axis(Axis(0));
        }
        let grid = grid.as_standard_layout().to_owned();

        let field = apply_optional(grid, self.config.sentinel);
        stats.values_parsed += field.len();
        stats.values_masked += field.count_masked();
        stats.records += 1;
        debug!(
            "{}: closed block {} ({} masked)",
            label,
            block.date.format("%Y-%m"),
            field.count_masked()
        );

        builder.push(block.date, field)
    }
}
