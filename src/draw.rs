use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Paragraph, Tabs};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::{App, MenuItem};
use crate::components::bracket::{BracketGrid, BracketView, GRID_HEIGHT};
use crate::components::theme::{Theme, ThemeColor, resolve, short_round_label};
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::ui::layout::LayoutAreas;
use cup_api::{Fixture, Side, Tie};

static TABS: &[&str; 2] = &["Bracket", "Rounds"];

const HELP_TEXT: &[(&str, &str)] = &[
    ("1", "Bracket view"),
    ("2", "Rounds list"),
    ("?", "This help (Esc to go back)"),
    ("h / ←", "Previous round"),
    ("l / →", "Next round"),
    ("k / ↑", "Previous tie"),
    ("j / ↓", "Next tie"),
    ("R", "Reload fixtures"),
    ("f", "Toggle full screen"),
    ("\"", "Toggle log pane"),
    ("q", "Quit"),
];

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let result = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_tabs(f, layout.tab_bar, app);
        }

        match app.state.active_tab {
            MenuItem::Bracket => draw_bracket(f, layout.main, app),
            MenuItem::Rounds => draw_rounds(f, layout.main, app),
            MenuItem::Help => draw_help(f, layout.main),
        }

        if let Some(logs) = layout.logs {
            draw_logs(f, logs);
        }

        draw_loading_spinner(f, f.area(), app, loading);
    });

    if let Err(e) = result {
        log::error!("draw failed: {e}");
    }
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_index = match app.state.active_tab {
        MenuItem::Bracket => 0,
        MenuItem::Rounds => 1,
        MenuItem::Help => 0,
    };

    let titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(resolve(ThemeColor::Primary, Theme::Dark).add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let help = Paragraph::new("Help: ? ")
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

/// Message shown instead of a bracket, if any.
fn empty_state_message(app: &App) -> Option<String> {
    let state = &app.state.bracket;
    if let Some(err) = app.state.last_error.as_deref()
        && !state.loaded
    {
        return Some(format!("Fixture load failed:\n{err}"));
    }
    if !state.loaded {
        return Some("Loading fixtures...".to_string());
    }
    if state.bracket.is_empty() {
        return Some(format!(
            "No knockout rounds found for league {} season {}.\nGroup-stage-only competitions have no bracket.",
            app.settings.league,
            app.settings.season()
        ));
    }
    None
}

fn draw_bracket(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Bracket ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    if let Some(msg) = empty_state_message(app) {
        draw_message(f, inner, &msg);
        return;
    }

    let state = &app.state.bracket;
    let [header, grid_area, _gap, detail] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(GRID_HEIGHT),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(inner);

    f.render_widget(Paragraph::new(header_line(app)), header);

    let grid = BracketGrid::compute(grid_area.width, &state.bracket);
    let x_offset = grid_area.width.saturating_sub(grid.total_width) / 2;
    let centered = Rect::new(
        grid_area.x + x_offset,
        grid_area.y,
        grid_area.width.saturating_sub(x_offset),
        grid_area.height,
    );
    f.render_widget(
        BracketView {
            bracket: &state.bracket,
            grid: &grid,
            selected_round: state.view_round,
            selected_tie: state.selected_tie,
            theme: Theme::Dark,
        },
        centered,
    );

    if detail.height > 0 {
        let lines = match state.selected() {
            Some(tie) => tie_detail_lines(tie, &state.legs_of(tie)),
            None => Vec::new(),
        };
        f.render_widget(Paragraph::new(lines), detail);
    }
}

fn header_line(app: &App) -> Line<'static> {
    let state = &app.state.bracket;
    let round = state
        .current_round()
        .map(|r| r.key.label.clone())
        .unwrap_or_default();
    let updated = app
        .state
        .last_updated
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string());

    let mut spans = vec![
        Span::styled(round, resolve(ThemeColor::Accent, Theme::Dark)),
        Span::raw(format!(
            " | league {} season {} | updated {updated}",
            app.settings.league,
            app.settings.season()
        )),
    ];
    if let Some(err) = app.state.last_error.as_deref() {
        spans.push(Span::styled(format!(" | {err}"), Style::default().fg(Color::Red)));
    }
    Line::from(spans)
}

fn tie_detail_lines(tie: &Tie, legs: &[&Fixture]) -> Vec<Line<'static>> {
    let dim = resolve(ThemeColor::Dim, Theme::Dark);
    if tie.is_placeholder() {
        return vec![Line::from(Span::styled("Not drawn yet", dim))];
    }

    let mut lines = vec![Line::from(vec![
        Span::styled(tie.left.name.clone(), leader_style(tie, Side::Left)),
        Span::raw(format!(" {} - {} ", tie.left_aggregate, tie.right_aggregate)),
        Span::styled(tie.right.name.clone(), leader_style(tie, Side::Right)),
        Span::styled(" (aggregate)", dim),
    ])];
    for (i, fixture) in legs.iter().enumerate() {
        lines.push(Line::from(Span::styled(format!("  leg {}: {}", i + 1, format_leg(fixture)), dim)));
    }
    lines
}

fn leader_style(tie: &Tie, side: Side) -> Style {
    if tie.leader() == Some(side) {
        resolve(ThemeColor::Leader, Theme::Dark)
    } else {
        Style::default()
    }
}

fn format_leg(fixture: &Fixture) -> String {
    let score = match (fixture.home_goals, fixture.away_goals) {
        (Some(h), Some(a)) => format!("{h} - {a}"),
        _ => "v".to_string(),
    };
    let kickoff = fixture
        .kickoff
        .map(|k| k.with_timezone(&chrono::Local).format("%a %d %b %H:%M").to_string())
        .unwrap_or_else(|| "date tbc".to_string());
    format!("{} {score} {}  ({kickoff})", fixture.home.name, fixture.away.name)
}

fn draw_rounds(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Rounds ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    if let Some(msg) = empty_state_message(app) {
        draw_message(f, inner, &msg);
        return;
    }

    let state = &app.state.bracket;
    let accent = resolve(ThemeColor::Accent, Theme::Dark);
    let dim = resolve(ThemeColor::Dim, Theme::Dark);
    let mut lines: Vec<Line> = Vec::new();
    let mut selected_line = 0usize;

    for (round_idx, round) in state.bracket.rounds.iter().enumerate() {
        let heading_style = if round_idx == state.view_round {
            accent.add_modifier(Modifier::UNDERLINED)
        } else {
            accent
        };
        lines.push(Line::from(Span::styled(
            format!("{} ({})", round.key.label, short_round_label(&round.key)),
            heading_style,
        )));

        for (tie_idx, slotted) in round.ties().enumerate() {
            let selected = round_idx == state.view_round && tie_idx == state.selected_tie;
            if selected {
                selected_line = lines.len();
            }
            let marker = if selected { "> " } else { "  " };
            let tie = &slotted.tie;
            let text = if tie.is_placeholder() {
                format!("{marker}{} v {}", tie.left.name, tie.right.name)
            } else {
                format!(
                    "{marker}{} {} - {} {}",
                    tie.left.name, tie.left_aggregate, tie.right_aggregate, tie.right.name
                )
            };
            let style = if selected {
                Style::default().add_modifier(Modifier::REVERSED)
            } else if tie.is_placeholder() {
                resolve(ThemeColor::Placeholder, Theme::Dark)
            } else {
                Style::default()
            };
            lines.push(Line::from(Span::styled(text, style)));

            for fixture in state.legs_of(tie) {
                lines.push(Line::from(Span::styled(format!("      {}", format_leg(fixture)), dim)));
            }
        }
        lines.push(Line::from(""));
    }

    // Keep the selection on screen.
    let visible = inner.height as usize;
    let scroll = selected_line.saturating_sub(visible.saturating_sub(2)) as u16;
    f.render_widget(Paragraph::new(lines).scroll((scroll, 0)), inner);
}

fn draw_help(f: &mut Frame, area: Rect) {
    let block = default_border(Color::DarkGray).title(" Help ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let accent = resolve(ThemeColor::Accent, Theme::Dark);
    let lines: Vec<Line> = HELP_TEXT
        .iter()
        .map(|(key, what)| Line::from(vec![Span::styled(format!("{key:>8}  "), accent), Span::raw(*what)]))
        .collect();
    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let logger = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Gray))
        .style_debug(Style::default().fg(Color::DarkGray))
        .output_target(false)
        .output_file(false)
        .output_line(false);
    f.render_widget(logger, area);
}

fn draw_message(f: &mut Frame, area: Rect, msg: &str) {
    f.render_widget(
        Paragraph::new(msg.to_string())
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        area,
    );
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(11), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::app_settings::AppSettings;
    use cup_api::{Snapshot, Team};
    use tui::backend::TestBackend;

    fn fixture(id: u64, round: &str, home: u32, away: u32) -> Fixture {
        Fixture {
            id,
            round: round.into(),
            home: Team::new(home, format!("Club {home}")),
            away: Team::new(away, format!("Club {away}")),
            home_goals: Some(2),
            away_goals: Some(1),
            kickoff: None,
        }
    }

    #[test]
    fn empty_state_messages() {
        let mut app = App::new(AppSettings::default());
        assert_eq!(empty_state_message(&app).as_deref(), Some("Loading fixtures..."));

        app.on_error("boom".into());
        assert!(empty_state_message(&app).is_some_and(|m| m.contains("boom")));

        app.on_snapshot_loaded(Snapshot::from_fixtures(vec![fixture(1, "Group A - 1", 1, 2)]), false);
        assert!(empty_state_message(&app).is_some_and(|m| m.starts_with("No knockout rounds")));
    }

    #[test]
    fn leg_formatting() {
        let leg = fixture(1, "Final", 1, 2);
        assert_eq!(format_leg(&leg), "Club 1 2 - 1 Club 2  (date tbc)");

        let mut upcoming = leg;
        upcoming.home_goals = None;
        assert!(format_leg(&upcoming).contains(" v "));
    }

    #[test]
    fn draws_every_tab_without_panicking() {
        let mut app = App::new(AppSettings::default());
        app.on_snapshot_loaded(
            Snapshot::from_fixtures(vec![
                fixture(1, "Semi-finals", 1, 2),
                fixture(2, "Semi-finals", 3, 4),
                fixture(3, "Final", 1, 3),
            ]),
            false,
        );
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        for tab in [MenuItem::Bracket, MenuItem::Rounds, MenuItem::Help] {
            app.update_tab(tab);
            draw(&mut terminal, &mut app, LoadingState::default());
        }
    }
}
