use cup_api::position::feeds;
use cup_api::{Bracket, Side, Tie};
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Color, Modifier, Style};
use tui::widgets::Widget;

use crate::components::theme::{Theme, ThemeColor, resolve, short_round_label};

// ---------------------------------------------------------------------------
// Layout constants
// ---------------------------------------------------------------------------

/// Rows per tie cell: left-team line, status line, right-team line.
pub const TIE_HEIGHT: u16 = 3;

/// Rows between the centers of two adjacent grid slots.
pub const SLOT_SPACING: u16 = TIE_HEIGHT + 1;

/// One heading row above the slots.
const HEADER_ROWS: u16 = 1;

/// Total rows used by the grid: heading + 4 slots. Equals 1 + 3 * 4 + 3 = 16.
pub const GRID_HEIGHT: u16 = HEADER_ROWS + 3 * SLOT_SPACING + TIE_HEIGHT;

/// Width of the connector zone drawn between adjacent round columns.
pub const CONNECTOR_WIDTH: u16 = 3;

/// Maximum tie cell width in wider terminals.
const CELL_W_FULL: u16 = 22;

// ---------------------------------------------------------------------------
// TieCell: pre-computed position for one tie
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Half {
    Top,
    Bottom,
}

/// Pre-computed layout position for one tie.
#[derive(Debug, Clone)]
pub struct TieCell {
    /// Row of the status line (center of the 3-row cell), relative to the grid origin.
    pub center_row: u16,
    /// Grid column index, 0 = far left.
    pub grid_col: usize,
    /// Starting x within the grid (origin-relative).
    pub col: u16,
    pub cell_width: u16,
    /// Round index into `Bracket::rounds`.
    pub round: usize,
    pub half: Half,
    /// Index into the round's top-then-bottom tie sequence.
    pub tie_idx: usize,
}

// ---------------------------------------------------------------------------
// BracketGrid: layout engine for a whole bracket
// ---------------------------------------------------------------------------

/// Pre-computed bracket layout.
///
/// Column order left → right: top halves from the earliest round inward, the final in
/// the middle, then the bottom halves mirrored back out:
/// `R16 | QF | SF | F | SF | QF | R16`.
///
/// Without a final (a competition still short of it) the last round keeps both halves
/// and the two sides meet in the middle: `R16 | QF | QF | R16`.
#[derive(Debug, Clone, Default)]
pub struct BracketGrid {
    pub cells: Vec<TieCell>,
    /// Starting x per grid column.
    pub grid_cols: Vec<u16>,
    /// Round shown in each grid column.
    pub col_rounds: Vec<usize>,
    pub cell_width: u16,
    pub total_width: u16,
}

impl BracketGrid {
    /// Compute the layout for `bracket` inside `terminal_width` columns.
    ///
    /// A tie's row comes straight from its slot: `center = 1 + HEADER_ROWS + column * SLOT_SPACING`,
    /// so slot columns [0, 1, 2, 3] land on rows [2, 6, 10, 14].
    pub fn compute(terminal_width: u16, bracket: &Bracket) -> Self {
        let n = bracket.rounds.len();
        if n == 0 {
            return Self::default();
        }

        let columns = if bracket.reaches_final() { 2 * n - 1 } else { 2 * n };
        let connector_total = CONNECTOR_WIDTH * (columns as u16 - 1);
        let per_col = terminal_width.saturating_sub(connector_total) / columns as u16;
        let cell_width = per_col.clamp(1, CELL_W_FULL);
        let stride = cell_width + CONNECTOR_WIDTH;
        let grid_cols: Vec<u16> = (0..columns).map(|g| g as u16 * stride).collect();
        let total_width = stride * (columns as u16 - 1) + cell_width;

        let mut col_rounds = vec![0usize; columns];
        let mut cells = Vec::new();
        for (round_idx, round) in bracket.rounds.iter().enumerate() {
            let top_col = round_idx;
            let bottom_col = columns - 1 - round_idx;
            col_rounds[top_col] = round_idx;
            col_rounds[bottom_col] = round_idx;

            let halves = [(Half::Top, &round.top, top_col), (Half::Bottom, &round.bottom, bottom_col)];
            let mut tie_idx = 0;
            for (half, ties, grid_col) in halves {
                for slotted in ties.iter() {
                    cells.push(TieCell {
                        center_row: slot_center_row(slotted.slot.column),
                        grid_col,
                        col: grid_cols[grid_col],
                        cell_width,
                        round: round_idx,
                        half,
                        tie_idx,
                    });
                    tie_idx += 1;
                }
            }
        }

        Self { cells, grid_cols, col_rounds, cell_width, total_width }
    }

    pub fn cells_for(&self, round: usize, half: Half) -> impl Iterator<Item = &TieCell> {
        self.cells
            .iter()
            .filter(move |c| c.round == round && c.half == half)
    }
}

pub fn slot_center_row(column: u8) -> u16 {
    HEADER_ROWS + 1 + u16::from(column) * SLOT_SPACING
}

// ---------------------------------------------------------------------------
// BracketView widget
// ---------------------------------------------------------------------------

/// Renders the whole positioned bracket.
pub struct BracketView<'a> {
    pub bracket: &'a Bracket,
    /// Pre-computed layout. Rebuild when the bracket or the terminal width changes.
    pub grid: &'a BracketGrid,
    pub selected_round: usize,
    /// Index into the selected round's top-then-bottom tie sequence.
    pub selected_tie: usize,
    pub theme: Theme,
}

impl<'a> Widget for BracketView<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 20 || area.height < TIE_HEIGHT {
            return;
        }

        // Column headings
        let accent = resolve(ThemeColor::Accent, self.theme);
        for (g, &x) in self.grid.grid_cols.iter().enumerate() {
            let Some(round) = self.bracket.rounds.get(self.grid.col_rounds[g]) else {
                continue;
            };
            let label = short_round_label(&round.key);
            let pad = self.grid.cell_width.saturating_sub(label.chars().count() as u16) / 2;
            put_str(buf, area, area.x + x + pad, 0, &label, accent);
        }

        // Pass 1: tie cells
        for cell in &self.grid.cells {
            let tie = self
                .bracket
                .rounds
                .get(cell.round)
                .and_then(|r| r.ties().nth(cell.tie_idx))
                .map(|s| &s.tie);
            let selected = cell.round == self.selected_round && cell.tie_idx == self.selected_tie;
            draw_tie_cell(tie, cell, selected, area, self.theme, buf);
        }

        // Pass 2: connectors from every round-half to the round it feeds
        let last = self.bracket.rounds.len().saturating_sub(1);
        let into_final = self.bracket.reaches_final();
        for round in 0..last {
            for half in [Half::Top, Half::Bottom] {
                let parent_half = if into_final && round + 1 == last { Half::Top } else { half };
                for parent in self.grid.cells_for(round + 1, parent_half) {
                    let Some(parent_tie) = tie_at(self.bracket, parent) else {
                        continue;
                    };
                    let children: Vec<u16> = self
                        .grid
                        .cells_for(round, half)
                        .filter(|c| tie_at(self.bracket, c).is_some_and(|t| feeds(t, parent_tie)))
                        .map(|c| c.center_row)
                        .collect();
                    let Some(child_col) = self.grid.cells_for(round, half).next().map(|c| c.grid_col) else {
                        continue;
                    };
                    if children.is_empty() {
                        continue;
                    }
                    let child_on_left = child_col < parent.grid_col;
                    let lower = child_col.min(parent.grid_col);
                    let zone_x = area.x + self.grid.grid_cols[lower] + self.grid.cell_width;
                    draw_connector(&children, parent.center_row, zone_x, child_on_left, area, self.theme, buf);
                }
            }
        }
    }
}

fn tie_at<'b>(bracket: &'b Bracket, cell: &TieCell) -> Option<&'b Tie> {
    bracket
        .rounds
        .get(cell.round)?
        .ties()
        .nth(cell.tie_idx)
        .map(|s| &s.tie)
}

// ---------------------------------------------------------------------------
// Shared drawing helpers
// ---------------------------------------------------------------------------

/// Convert a grid-relative row to an absolute screen y. `None` when clipped.
fn screen_y(grid_row: u16, area: Rect) -> Option<u16> {
    if grid_row >= area.height {
        return None;
    }
    Some(area.y + grid_row)
}

fn put_str(buf: &mut Buffer, area: Rect, x: u16, row: u16, text: &str, style: Style) {
    let limit_x = area.x + area.width;
    let Some(y) = screen_y(row, area) else {
        return;
    };
    if x >= limit_x {
        return;
    }
    let avail = (limit_x - x) as usize;
    let clipped: String = text.chars().take(avail).collect();
    buf.set_string(x, y, &clipped, style);
}

/// Draw one tie cell (3 rows).
fn draw_tie_cell(
    tie: Option<&Tie>,
    cell: &TieCell,
    selected: bool,
    area: Rect,
    theme: Theme,
    buf: &mut Buffer,
) {
    let dim = resolve(ThemeColor::Dim, theme);
    let leader_style = resolve(ThemeColor::Leader, theme);
    let placeholder_style = resolve(ThemeColor::Placeholder, theme);

    let base_style = if selected {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else {
        Style::default().fg(Color::Gray)
    };

    let x = area.x + cell.col;
    let width = cell.cell_width as usize;
    let rows = [
        (cell.center_row.saturating_sub(1), 0u8),
        (cell.center_row, 1),
        (cell.center_row.saturating_add(1), 2),
    ];

    for (row, line) in rows {
        let content = format_tie_row(tie, line, width);
        let style = match (tie, line) {
            (Some(t), _) if t.is_placeholder() && !selected => placeholder_style,
            (_, 1) => dim,
            (Some(t), 0) if t.leader() == Some(Side::Left) && !selected => leader_style,
            (Some(t), 2) if t.leader() == Some(Side::Right) && !selected => leader_style,
            _ => base_style,
        };
        put_str(buf, area, x, row, &content, style);
    }
}

/// Format a single tie cell row.
/// `line`: 0 = left-team line, 1 = status line, 2 = right-team line.
fn format_tie_row(tie: Option<&Tie>, line: u8, width: usize) -> String {
    match tie {
        None => " ".repeat(width),
        Some(t) => match line {
            0 => format_team_line(&t.team(Side::Left).name, t, Side::Left, width),
            2 => format_team_line(&t.team(Side::Right).name, t, Side::Right, width),
            _ => format_status_line(t, width),
        },
    }
}

/// `"[name        ] [agg]"`, exactly `width` chars.
fn format_team_line(name: &str, tie: &Tie, side: Side, width: usize) -> String {
    let score = if tie.is_placeholder() {
        "   ".to_string()
    } else {
        format!("{:3}", tie.aggregate(side))
    };
    // name_w = width - (sp=1 + score=3 + sp=1)
    let name_w = width.saturating_sub(5);
    let name_trunc: String = name.chars().take(name_w).collect();
    let line = format!("{:<name_w$} {} ", name_trunc, score);
    line.chars().take(width).collect()
}

fn format_status_line(tie: &Tie, width: usize) -> String {
    let raw = match tie.legs.len() {
        0 => " TBD".to_string(),
        1 => " 1 leg".to_string(),
        n => format!(" agg · {n} legs"),
    };
    let padded = format!("{:<width$}", raw, width = width);
    padded.chars().take(width).collect()
}

/// Elbow connector between a set of child rows and one parent row.
///
/// ```text
///  child_top  ─┐          (x0='─'  x1='┐')
///              │
///              ├─ parent  (x1='├'  x2='─')
///              │
///  child_bot  ─┘          (x0='─'  x1='┘')
/// ```
///
/// `child_on_left` = false mirrors it for the right-hand side of the bracket.
fn draw_connector(
    child_rows: &[u16],
    parent_row: u16,
    zone_x: u16,
    child_on_left: bool,
    area: Rect,
    theme: Theme,
    buf: &mut Buffer,
) {
    let style = resolve(ThemeColor::Dim, theme);
    let (x0, x1, x2) = (zone_x, zone_x + 1, zone_x + 2);
    let limit_x = area.x + area.width;

    let min = child_rows.iter().copied().chain([parent_row]).min().unwrap_or(parent_row);
    let max = child_rows.iter().copied().chain([parent_row]).max().unwrap_or(parent_row);

    let mut put = |x: u16, row: u16, ch: char| {
        if x < limit_x
            && let Some(y) = screen_y(row, area)
        {
            put_char(buf, x, y, ch, style);
        }
    };

    let (child_x, parent_x) = if child_on_left { (x0, x2) } else { (x2, x0) };
    for row in min..=max {
        let is_child = child_rows.contains(&row);
        let is_parent = row == parent_row;
        let (left, right) = if child_on_left { (is_child, is_parent) } else { (is_parent, is_child) };
        let ch = box_char(row > min, row < max, left, right);
        if ch != ' ' {
            put(x1, row, ch);
        }
        if is_child {
            put(child_x, row, '─');
        }
        if is_parent {
            put(parent_x, row, '─');
        }
    }
}

/// Box-drawing glyph joining the given directions.
fn box_char(up: bool, down: bool, left: bool, right: bool) -> char {
    match (up, down, left, right) {
        (false, false, false, false) => ' ',
        (false, false, _, _) => '─',
        (true, true, false, false) => '│',
        (false, true, true, false) => '┐',
        (true, false, true, false) => '┘',
        (false, true, false, true) => '┌',
        (true, false, false, true) => '└',
        (true, true, true, false) => '┤',
        (true, true, false, true) => '├',
        (false, true, true, true) => '┬',
        (true, false, true, true) => '┴',
        (true, true, true, true) => '┼',
        (true, false, false, false) | (false, true, false, false) => '│',
    }
}

fn put_char(buf: &mut Buffer, x: u16, y: u16, ch: char, style: Style) {
    if let Some(cell) = buf.cell_mut((x, y)) {
        cell.set_char(ch);
        cell.set_style(style);
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use cup_api::{Fixture, Team, assemble};

    fn leg(id: u64, round: &str, home: u32, away: u32) -> Fixture {
        Fixture {
            id,
            round: round.into(),
            home: Team::new(home, format!("Team {home}")),
            away: Team::new(away, format!("Team {away}")),
            home_goals: Some(1),
            away_goals: Some(0),
            kickoff: None,
        }
    }

    fn sample_bracket() -> Bracket {
        let fixtures = vec![
            leg(1, "Quarter-finals", 1, 8),
            leg(2, "Quarter-finals", 4, 5),
            leg(3, "Quarter-finals", 2, 7),
            leg(4, "Quarter-finals", 3, 6),
            leg(5, "Semi-finals", 1, 4),
            leg(6, "Semi-finals", 2, 3),
            leg(7, "Final", 1, 2),
        ];
        let labels = vec!["Quarter-finals".into(), "Semi-finals".into(), "Final".into()];
        assemble(&fixtures, &labels)
    }

    #[test]
    fn test_grid_height() {
        assert_eq!(GRID_HEIGHT, 16);
    }

    #[test]
    fn test_slot_rows() {
        let rows: Vec<u16> = (0..4).map(slot_center_row).collect();
        assert_eq!(rows, vec![2, 6, 10, 14]);
    }

    #[test]
    fn test_grid_cell_count_matches_bracket() {
        let bracket = sample_bracket();
        let grid = BracketGrid::compute(120, &bracket);
        let expected: usize = bracket.rounds.iter().map(|r| r.ties().count()).sum();
        assert_eq!(grid.cells.len(), expected);
        assert_eq!(grid.grid_cols.len(), 5);
    }

    #[test]
    fn test_terminal_round_is_centered() {
        let bracket = sample_bracket();
        let grid = BracketGrid::compute(120, &bracket);
        let fin: Vec<&TieCell> = grid.cells_for(2, Half::Top).collect();
        assert_eq!(fin.len(), 1);
        assert_eq!(fin[0].grid_col, 2);
        assert_eq!(fin[0].center_row, slot_center_row(2));
    }

    #[test]
    fn test_bottom_halves_are_mirrored() {
        let bracket = sample_bracket();
        let grid = BracketGrid::compute(120, &bracket);
        assert!(grid.cells_for(0, Half::Top).all(|c| c.grid_col == 0));
        assert!(grid.cells_for(0, Half::Bottom).all(|c| c.grid_col == 4));
        assert!(grid.cells_for(1, Half::Bottom).all(|c| c.grid_col == 3));
        assert_eq!(grid.col_rounds, vec![0, 1, 2, 1, 0]);
    }

    #[test]
    fn test_last_round_without_final_keeps_both_sides() {
        let fixtures = vec![
            leg(1, "Quarter-finals", 1, 8),
            leg(2, "Quarter-finals", 4, 5),
            leg(3, "Quarter-finals", 2, 7),
            leg(4, "Quarter-finals", 3, 6),
            leg(5, "Semi-finals", 1, 4),
            leg(6, "Semi-finals", 2, 3),
        ];
        let bracket = assemble(&fixtures, &["Quarter-finals".to_string(), "Semi-finals".to_string()]);
        let grid = BracketGrid::compute(120, &bracket);
        assert_eq!(grid.grid_cols.len(), 4);
        assert_eq!(grid.col_rounds, vec![0, 1, 1, 0]);
        assert!(grid.cells_for(1, Half::Top).all(|c| c.grid_col == 1));
        assert!(grid.cells_for(1, Half::Bottom).all(|c| c.grid_col == 2));
        assert!(grid.cells_for(0, Half::Bottom).all(|c| c.grid_col == 3));
        assert_eq!(grid.cells.len(), 6);
    }

    #[test]
    fn test_cell_width_caps_at_full_width_limit() {
        let grid = BracketGrid::compute(400, &sample_bracket());
        assert_eq!(grid.cell_width, CELL_W_FULL);
    }

    #[test]
    fn test_empty_bracket_has_no_cells() {
        let grid = BracketGrid::compute(120, &Bracket::default());
        assert!(grid.cells.is_empty());
        assert!(grid.grid_cols.is_empty());
    }

    #[test]
    fn test_format_team_line_width() {
        let bracket = sample_bracket();
        let tie = &bracket.rounds[0].top[0].tie;
        let line = format_team_line("Paris Saint-Germain FC", tie, Side::Left, 14);
        assert_eq!(line.chars().count(), 14, "line: {:?}", line);
        assert!(line.trim_end().ends_with('1'));
    }

    #[test]
    fn test_placeholder_status_line() {
        let line = format_status_line(&Tie::placeholder(), 10);
        assert_eq!(line, " TBD      ");
    }

    #[test]
    fn test_box_chars() {
        assert_eq!(box_char(false, true, true, false), '┐');
        assert_eq!(box_char(true, false, true, false), '┘');
        assert_eq!(box_char(true, true, false, true), '├');
        assert_eq!(box_char(true, true, true, false), '┤');
        assert_eq!(box_char(false, false, true, true), '─');
        assert_eq!(box_char(true, true, false, false), '│');
    }

    #[test]
    fn test_feeders_link_to_parent() {
        let bracket = sample_bracket();
        let sf_top = &bracket.rounds[1].top[0].tie;
        let qf_feeders = bracket.rounds[0].top.iter().filter(|s| feeds(&s.tie, sf_top)).count();
        assert_eq!(qf_feeders, 2);
        assert!(!feeds(&Tie::placeholder(), sf_top));
    }

    #[test]
    fn test_render_does_not_panic_on_small_area() {
        let bracket = sample_bracket();
        let grid = BracketGrid::compute(40, &bracket);
        let area = Rect::new(0, 0, 40, 8);
        let mut buf = Buffer::empty(area);
        BracketView { bracket: &bracket, grid: &grid, selected_round: 0, selected_tie: 0, theme: Theme::Dark }
            .render(area, &mut buf);
    }
}
