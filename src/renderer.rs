//! # Tide Chart Rendering
//!
//! Draws a [`TideCurve`] with its catch markers as ASCII art for terminal output.
//! One column per sample, rows scaled to the curve's own min/max so the chart
//! always fills its height.

use crate::markers::MarkerGroup;
use crate::{TideCurve, TideSample, TideState};

/// Width of the Y-axis label gutter, including the axis line.
const Y_AXIS_WIDTH: usize = 6;

const MIN_ROWS: usize = 2;

const TICK_HOURS: [u32; 4] = [0, 6, 12, 18];

/// Column in the data area where a time of day lands.
fn minutes_to_column(minutes: u32, columns: usize) -> usize {
    let column = (minutes as usize * columns) / (24 * 60);
    column.min(columns.saturating_sub(1))
}

/// Give each marker group a screen position on a chart `columns` wide and
/// `rows` tall: `x` is the data column, `y` the row of the curve there.
pub fn place_marker_groups(
    curve: &TideCurve,
    groups: Vec<MarkerGroup>,
    rows: usize,
) -> Vec<MarkerGroup> {
    let rows = rows.max(MIN_ROWS);
    let columns = curve.points.len();
    groups
        .into_iter()
        .map(|group| match group.minutes() {
            Some(minutes) if columns > 0 => {
                let column = minutes_to_column(minutes, columns);
                let row = level_to_row(curve, curve.points[column].level, rows);
                group.with_position(column as f64, row as f64)
            }
            _ => group,
        })
        .collect()
}

fn level_to_row(curve: &TideCurve, level: f64, rows: usize) -> usize {
    let range = curve.range();
    let normalized = if range > 0.0 {
        (level - curve.min_level) / range
    } else {
        0.5
    };
    ((1.0 - normalized) * (rows as f64 - 1.0)).round() as usize
}

/// `H`/`L` for an event sample, from the kind of the event it stands for.
fn sample_glyph(curve: &TideCurve, sample: &TideSample) -> char {
    if !sample.is_event {
        return '•';
    }
    match curve.nearest_event(sample).map(|event| TideState::from(event.kind)) {
        Some(TideState::High) => 'H',
        Some(TideState::Low) => 'L',
        _ => '•',
    }
}

/// Render the chart to a string.
///
/// Event samples are drawn as `H`/`L`, other samples as `•`. Marker groups are
/// drawn under the time axis as `^`, or as the group size when a group holds
/// several catches.
pub fn render_ascii(curve: &TideCurve, groups: &[MarkerGroup], rows: usize) -> String {
    let rows = rows.max(MIN_ROWS);
    let sample_count = curve.points.len();
    let mut grid = vec![vec![' '; sample_count + Y_AXIS_WIDTH]; rows];

    // Y-axis labels every 20 cm, or every 10 cm for flat curves
    let step = if curve.range() > 60.0 { 20.0 } else { 10.0 };
    let mut label_level = (curve.min_level / step).ceil() * step;
    while label_level <= curve.max_level {
        let row = level_to_row(curve, label_level, rows);
        let label = format!("{:>width$.0}", label_level, width = Y_AXIS_WIDTH - 1);
        for (i, ch) in label.chars().enumerate().take(Y_AXIS_WIDTH - 1) {
            grid[row][i] = ch;
        }
        label_level += step;
    }
    for row in grid.iter_mut() {
        row[Y_AXIS_WIDTH - 1] = '│';
    }

    for (column, sample) in curve.points.iter().enumerate() {
        let row = level_to_row(curve, sample.level, rows);
        grid[row][column + Y_AXIS_WIDTH] = sample_glyph(curve, sample);
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Tide {}  ({:.0}-{:.0} cm)\n",
        curve.date_range.start.format("%Y-%m-%d"),
        curve.min_level,
        curve.max_level
    ));
    for row in grid {
        out.push_str(row.into_iter().collect::<String>().trim_end());
        out.push('\n');
    }

    let padding = " ".repeat(Y_AXIS_WIDTH);

    // Hour ticks every 6 hours
    let tick_columns: Vec<usize> = TICK_HOURS
        .iter()
        .map(|hour| minutes_to_column(hour * 60, sample_count))
        .collect();
    let ticks: String = (0..sample_count)
        .map(|column| {
            if tick_columns.contains(&column) {
                '|'
            } else {
                '─'
            }
        })
        .collect();
    out.push_str(&format!("{padding}{ticks}\n"));

    let mut labels = String::new();
    for (hour, column) in TICK_HOURS.iter().zip(&tick_columns) {
        let width = column.saturating_sub(labels.chars().count());
        labels.push_str(&" ".repeat(width));
        labels.push_str(&format!("{hour:02}:00"));
    }
    out.push_str(&format!("{padding}{}\n", labels.trim_end()));

    if !groups.is_empty() && sample_count > 0 {
        let mut marker_row = vec![' '; sample_count];
        for group in groups {
            if let Some(minutes) = group.minutes() {
                let column = minutes_to_column(minutes, sample_count);
                marker_row[column] = match group.len() {
                    1 => '^',
                    n @ 2..=9 => char::from_digit(n as u32, 10).unwrap_or('+'),
                    _ => '+',
                };
            }
        }
        out.push_str(&format!(
            "{padding}{}\n",
            marker_row.into_iter().collect::<String>().trim_end()
        ));
    }

    out
}

/// Render tide data to ASCII terminal.
pub fn draw_ascii(curve: &TideCurve, groups: &[MarkerGroup], rows: usize) {
    print!("{}", render_ascii(curve, groups, rows));
}
