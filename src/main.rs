use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Row, Table};
use tracing::{error, info};

use sb_terminal::cache::SnapshotCache;
use sb_terminal::config::{self, Config, SourceKind};
use sb_terminal::demo_feed::DemoSource;
use sb_terminal::export::{self, PlayerSheet};
use sb_terminal::feed;
use sb_terminal::logging;
use sb_terminal::pitch::{self, PassLayer};
use sb_terminal::provider::EventSource;
use sb_terminal::spatial;
use sb_terminal::state::{AppState, Delta, Focus, ProviderCommand, View, apply_delta};
use sb_terminal::statsbomb::StatsBombOpenData;
use sb_terminal::stats::StatLine;

const MINUTE_STEP: i32 = 5;

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: Option<mpsc::Sender<ProviderCommand>>,
    cfg: Config,
}

impl App {
    fn new(cfg: Config, cmd_tx: Option<mpsc::Sender<ProviderCommand>>) -> Self {
        Self {
            state: AppState::new(),
            should_quit: false,
            cmd_tx,
            cfg,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        let follow_up = match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                None
            }
            KeyCode::Char('1') => {
                self.state.set_view(View::Match);
                None
            }
            KeyCode::Char('2') => {
                self.state.set_view(View::Players);
                None
            }
            KeyCode::Char('3') => {
                self.state.set_view(View::Charts);
                None
            }
            KeyCode::Tab => {
                self.state.cycle_focus();
                None
            }
            KeyCode::BackTab => {
                self.state.cycle_focus_back();
                None
            }
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::PageDown => self.state.move_selection(10),
            KeyCode::PageUp => self.state.move_selection(-10),
            KeyCode::Char('<') | KeyCode::Char(',') => {
                self.state.shift_minutes_lo(-MINUTE_STEP);
                None
            }
            KeyCode::Char('>') | KeyCode::Char('.') => {
                self.state.shift_minutes_lo(MINUTE_STEP);
                None
            }
            KeyCode::Char('-') => {
                self.state.shift_minutes_hi(-MINUTE_STEP);
                None
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.state.shift_minutes_hi(MINUTE_STEP);
                None
            }
            KeyCode::Char('0') => {
                self.state.reset_minutes();
                None
            }
            KeyCode::Char('e') => {
                self.export_csv();
                None
            }
            KeyCode::Char('x') => {
                self.export_xlsx();
                None
            }
            KeyCode::Char('r') => Some(ProviderCommand::FetchCompetitions),
            KeyCode::Char('?') => {
                self.state.help_overlay = !self.state.help_overlay;
                None
            }
            _ => None,
        };
        if let Some(cmd) = follow_up {
            self.request(cmd);
        }
    }

    fn request(&mut self, cmd: ProviderCommand) {
        let Some(tx) = &self.cmd_tx else {
            self.state.push_log("[INFO] Provider unavailable");
            return;
        };
        if tx.send(cmd).is_err() {
            self.state.push_log("[WARN] Provider request failed");
        }
    }

    fn on_delta(&mut self, delta: Delta) {
        if let Some(cmd) = apply_delta(&mut self.state, delta) {
            self.request(cmd);
        }
    }

    fn selected_players(&self) -> Vec<String> {
        [self.state.player1(), self.state.player2()]
            .into_iter()
            .flatten()
            .map(str::to_string)
            .collect()
    }

    fn export_csv(&mut self) {
        let players = self.selected_players();
        if players.is_empty() {
            self.state.push_log("[INFO] No players to export");
            return;
        }
        for player in players {
            let events = self.state.player_events(&player);
            let result = export::export_player_events_csv(&self.cfg.export_dir, &player, &events);
            match result {
                Ok(report) => self.state.push_log(format!(
                    "[INFO] Exported {} rows to {}",
                    report.rows,
                    report.path.display()
                )),
                Err(err) => {
                    error!(error = %format!("{err:#}"), "csv export failed");
                    self.state.push_log(format!("[WARN] CSV export failed: {err}"));
                }
            }
        }
    }

    fn export_xlsx(&mut self) {
        let Some(match_id) = self.state.selected_match().map(|m| m.match_id) else {
            self.state.push_log("[INFO] No match selected");
            return;
        };
        let players = self.selected_players();
        if players.is_empty() {
            self.state.push_log("[INFO] No players to export");
            return;
        }
        let path = self
            .cfg
            .export_dir
            .join(format!("match_{match_id}_players.xlsx"));
        let sheets = players
            .iter()
            .map(|player| PlayerSheet {
                player,
                events: self.state.player_events(player),
            })
            .collect::<Vec<_>>();
        let result = std::fs::create_dir_all(&self.cfg.export_dir)
            .map_err(anyhow::Error::from)
            .and_then(|_| export::export_player_events_xlsx(&path, &sheets));
        drop(sheets);
        match result {
            Ok(report) => self.state.push_log(format!(
                "[INFO] Exported {} sheets ({} rows) to {}",
                report.sheets,
                report.rows,
                report.path.display()
            )),
            Err(err) => {
                error!(error = %format!("{err:#}"), "xlsx export failed");
                self.state.push_log(format!("[WARN] XLSX export failed: {err}"));
            }
        }
    }
}

fn main() -> Result<()> {
    config::load_dotenv();
    let cfg = Config::from_env();

    let _log_guard = match logging::init_file_logging(&cfg) {
        Ok((path, guard)) => {
            info!(path = %path.display(), "logging to file");
            Some(guard)
        }
        Err(err) => {
            eprintln!("warning: file logging disabled: {err:#}");
            None
        }
    };

    let source: Box<dyn EventSource + Send> = match cfg.source {
        SourceKind::Demo => Box::new(DemoSource),
        SourceKind::StatsBomb => Box::new(StatsBombOpenData::from_config(&cfg)),
    };
    info!(source = source.name(), "starting viewer");

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let worker = feed::spawn_provider(SnapshotCache::new(source), tx, cmd_rx);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut app = App::new(cfg, Some(cmd_tx));
    app.state.loading = Some("competitions".to_string());
    app.request(ProviderCommand::FetchCompetitions);
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // Closing the command channel lets the worker finish its current fetch and exit.
    app.cmd_tx = None;
    drop(app);
    let _ = worker.join();

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            app.on_delta(delta);
        }

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(34), Constraint::Min(40)])
        .split(chunks[1]);

    render_sidebar(frame, body[0], &app.state);
    match app.state.view {
        View::Match => render_match_view(frame, body[1], &app.state),
        View::Players => render_players_view(frame, body[1], &app.state),
        View::Charts => render_charts_view(frame, body[1], &app.state),
    }

    let console = Paragraph::new(console_text(&app.state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(footer_text(&app.state)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[3]);

    if app.state.help_overlay {
        let area = frame.size();
        render_help_overlay(frame, area);
    }
}

fn view_label(view: View) -> &'static str {
    match view {
        View::Match => "Match Stats",
        View::Players => "Player Data",
        View::Charts => "Comparison Charts",
    }
}

fn header_text(state: &AppState) -> String {
    let competition = state.selected_competition().unwrap_or("-");
    let season = state
        .selected_season()
        .map(|s| s.season_name.as_str())
        .unwrap_or("-");
    let loading = state
        .loading
        .as_deref()
        .map(|what| format!(" | loading {what}..."))
        .unwrap_or_default();
    let line1 = format!(
        "  SB TERMINAL | {} | {competition} {season}{loading}",
        view_label(state.view)
    );
    let line2 = match state.selected_match() {
        Some(m) => format!("  {} | {}", m.label(), m.score_label()),
        None => "  No match selected".to_string(),
    };
    format!("{line1}\n{line2}")
}

fn footer_text(state: &AppState) -> String {
    let common = "1/2/3 View | Tab Focus | j/k Move | ? Help | q Quit";
    match state.view {
        View::Match => format!("{common} | r Reload"),
        View::Players => format!("{common} | </> From | -/+ To | 0 Reset | e CSV | x XLSX"),
        View::Charts => common.to_string(),
    }
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    }
}

fn render_sidebar(frame: &mut Frame, area: Rect, state: &AppState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7),
            Constraint::Length(5),
            Constraint::Min(5),
            Constraint::Length(7),
            Constraint::Length(7),
            Constraint::Length(3),
        ])
        .split(area);

    let seasons = state
        .seasons()
        .into_iter()
        .map(|s| s.season_name.clone())
        .collect::<Vec<_>>();
    let matches = state.matches.iter().map(|m| m.label()).collect::<Vec<_>>();
    let player2 = state
        .player2_choices()
        .into_iter()
        .map(str::to_string)
        .collect::<Vec<_>>();

    render_list(
        frame,
        sections[0],
        "Competition",
        &state.competition_names,
        state.competition_selected,
        state.focus == Focus::Competition,
    );
    render_list(
        frame,
        sections[1],
        "Season",
        &seasons,
        state.season_selected,
        state.focus == Focus::Season,
    );
    render_list(
        frame,
        sections[2],
        "Match",
        &matches,
        state.match_selected,
        state.focus == Focus::Match,
    );
    render_list(
        frame,
        sections[3],
        "Player 1",
        &state.players,
        state.player1_selected,
        state.focus == Focus::Player1,
    );
    render_list(
        frame,
        sections[4],
        "Player 2",
        &player2,
        state.player2_selected,
        state.focus == Focus::Player2,
    );

    let minutes = Paragraph::new(format!(" {}", state.minutes.label()))
        .block(Block::default().title("Minutes").borders(Borders::ALL));
    frame.render_widget(minutes, sections[5]);
}

fn render_list(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    items: &[String],
    selected: usize,
    focused: bool,
) {
    let block = Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_style(focus_style(focused));
    let visible = area.height.saturating_sub(2) as usize;
    let (start, end) = visible_range(selected, items.len(), visible);
    let lines = (start..end)
        .map(|idx| {
            let style = if idx == selected {
                Style::default().add_modifier(Modifier::BOLD).fg(Color::White).bg(Color::DarkGray)
            } else {
                Style::default()
            };
            Line::styled(items[idx].clone(), style)
        })
        .collect::<Vec<_>>();
    let text = if lines.is_empty() {
        Text::styled("-", Style::default().fg(Color::DarkGray))
    } else {
        Text::from(lines)
    };
    frame.render_widget(Paragraph::new(text).block(block), area);
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 || visible == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn stat_table<'a>(title: String, line: StatLine) -> Table<'a> {
    let rows = vec![
        Row::new(vec!["Goals".to_string(), line.goals.to_string()]),
        Row::new(vec!["Passes".to_string(), line.passes.to_string()]),
        Row::new(vec!["Shots".to_string(), line.shots.to_string()]),
    ];
    Table::new(rows, [Constraint::Length(10), Constraint::Min(6)])
        .block(Block::default().title(title).borders(Borders::ALL))
}

fn player_stat_table<'a>(player: &str, whole: StatLine, window: StatLine, label: String) -> Table<'a> {
    let row = |name: &str, a: u32, b: u32| Row::new(vec![name.to_string(), a.to_string(), b.to_string()]);
    let rows = vec![
        row("Goals", whole.goals, window.goals),
        row("Passes", whole.passes, window.passes),
        row("Shots", whole.shots, window.shots),
    ];
    let header = Row::new(vec![String::new(), "Match".to_string(), label])
        .style(Style::default().add_modifier(Modifier::BOLD));
    Table::new(
        rows,
        [Constraint::Length(10), Constraint::Length(8), Constraint::Min(8)],
    )
    .header(header)
    .block(Block::default().title(player.to_string()).borders(Borders::ALL))
}

fn waiting_text(state: &AppState) -> &'static str {
    if state.selected_match().is_none() {
        "No match selected"
    } else {
        "Loading match events..."
    }
}

fn render_match_view(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(summary) = state.summary() else {
        let empty = Paragraph::new(waiting_text(state)).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(1)])
        .split(area);
    let teams = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    frame.render_widget(
        stat_table(format!("{} stats", summary.home_team), summary.home_stats),
        teams[0],
    );
    frame.render_widget(
        stat_table(format!("{} stats", summary.away_team), summary.away_stats),
        teams[1],
    );

    let totals = summary.totals();
    let lines = vec![
        format!("Competition: {}", state.selected_competition().unwrap_or("-")),
        format!(
            "Season: {}",
            state
                .selected_season()
                .map(|s| s.season_name.as_str())
                .unwrap_or("-")
        ),
        format!("Match: {} vs {}", summary.home_team, summary.away_team),
        format!("Score: {} - {}", summary.home_score, summary.away_score),
        format!("Winner: {}", summary.winner),
        String::new(),
        format!("Total goals: {}", totals.goals),
        format!("Total passes: {}", totals.passes),
        format!("Total shots: {}", totals.shots),
    ];
    let general = Paragraph::new(lines.join("\n"))
        .block(Block::default().title("Match overview").borders(Borders::ALL));
    frame.render_widget(general, rows[1]);
}

fn render_players_view(frame: &mut Frame, area: Rect, state: &AppState) {
    if state.current_events().is_none() {
        let empty = Paragraph::new(waiting_text(state)).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    for (player, column) in [state.player1(), state.player2()].into_iter().zip(columns.iter()) {
        match player {
            Some(name) => render_player_column(frame, *column, state, name),
            None => frame.render_widget(
                Paragraph::new("No player").block(Block::default().borders(Borders::ALL)),
                *column,
            ),
        }
    }
}

fn render_player_column(frame: &mut Frame, area: Rect, state: &AppState, player: &str) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(3)])
        .split(area);

    frame.render_widget(
        player_stat_table(
            player,
            state.player_match_stats(player),
            state.player_stats(player),
            state.minutes.label(),
        ),
        rows[0],
    );

    let events = state.player_events(player);
    let header = Row::new(vec!["Min", "Type", "Location", "Team"])
        .style(Style::default().add_modifier(Modifier::BOLD));
    let body = events
        .iter()
        .map(|e| {
            Row::new(vec![
                e.minute.to_string(),
                e.kind.label().to_string(),
                e.location.map(|loc| loc.to_string()).unwrap_or_default(),
                e.team.clone(),
            ])
        })
        .collect::<Vec<_>>();
    let table = Table::new(
        body,
        [
            Constraint::Length(4),
            Constraint::Length(14),
            Constraint::Length(14),
            Constraint::Min(8),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .title(format!("Events ({})", events.len()))
            .borders(Borders::ALL),
    );
    frame.render_widget(table, rows[1]);
}

fn render_charts_view(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(events) = state.current_events() else {
        let empty = Paragraph::new(waiting_text(state)).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);
    let shots_row = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);

    let player1 = state.player1();
    let player2 = state.player2();

    let layers = [(player1, pitch::PLAYER1_COLOR), (player2, pitch::PLAYER2_COLOR)]
        .into_iter()
        .filter_map(|(player, color)| {
            player.map(|name| PassLayer {
                vectors: spatial::pass_vectors(events, name),
                color,
            })
        })
        .collect::<Vec<_>>();
    let mut title = vec![Span::raw("Pass map ")];
    for (player, color, tag) in [
        (player1, pitch::PLAYER1_COLOR, "blue"),
        (player2, pitch::PLAYER2_COLOR, "orange"),
    ] {
        if let Some(name) = player {
            title.push(Span::styled(format!(" ■ {name} ({tag})"), Style::default().fg(color)));
        }
    }
    frame.render_widget(pitch::pass_map(Line::from(title), &layers), rows[0]);

    for (player, area) in [player1, player2].into_iter().zip(shots_row.iter()) {
        let Some(name) = player else {
            continue;
        };
        let points = spatial::shot_points(events, name);
        let scored = points.iter().filter(|p| p.scored).count();
        let title = Line::from(vec![
            Span::raw(format!("Shot map - {name} ")),
            Span::styled(format!(" ● goal {scored}"), Style::default().fg(pitch::GOAL_COLOR)),
            Span::styled(
                format!(" ● no goal {}", points.len() - scored),
                Style::default().fg(pitch::MISS_COLOR),
            ),
        ]);
        frame.render_widget(pitch::shot_map(title, &points), *area);
    }
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No messages yet".to_string();
    }
    let skip = state.logs.len().saturating_sub(3);
    state
        .logs
        .iter()
        .skip(skip)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "SB Terminal - Help",
        "",
        "Views:",
        "  1            Match stats",
        "  2            Player data",
        "  3            Comparison charts",
        "",
        "Selection:",
        "  Tab / S-Tab  Cycle focus",
        "  j/k or ↑/↓   Move",
        "  PgUp/PgDn    Move by 10",
        "  r            Reload competitions",
        "",
        "Minute window:",
        "  < / >        Start -/+ 5",
        "  - / +        End -/+ 5",
        "  0            Reset to 0-90",
        "",
        "Export (players 1 and 2):",
        "  e            CSV per player",
        "  x            XLSX workbook",
        "",
        "  ?            Toggle help",
        "  q            Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
