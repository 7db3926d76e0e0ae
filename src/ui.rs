// Console UI - ratatui dashboard over the view engine

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use risk_console::{
    export_date, load_snapshot, ordered_view, render, write_export, GlobalSummary, Record,
    RecordStore, RiskTier, ViewResult, ViewState,
};
use std::io;
use std::path::PathBuf;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
}

pub struct App {
    pub store: RecordStore,
    pub state: ViewState,
    pub table_state: TableState,
    pub input_mode: InputMode,
    pub show_detail: bool,
    pub export_dir: PathBuf,
    /// One-line feedback shown in the status bar (export result, errors)
    pub message: Option<String>,
}

impl App {
    pub fn new(store: RecordStore, state: ViewState, export_dir: PathBuf) -> Self {
        let mut table_state = TableState::default();
        if !store.is_empty() {
            table_state.select(Some(0));
        }

        Self {
            store,
            state,
            table_state,
            input_mode: InputMode::Normal,
            show_detail: false,
            export_dir,
            message: None,
        }
    }

    /// Swap in a new snapshot; selections start over
    pub fn load(&mut self, store: RecordStore) {
        self.store = store;
        self.state = ViewState::default();
        self.table_state.select(if self.store.is_empty() { None } else { Some(0) });
        self.show_detail = false;
        self.message = None;
    }

    fn total_pages(&self) -> usize {
        render(&self.store, &self.state).page.total_pages
    }

    fn rows_on_page(&self) -> usize {
        render(&self.store, &self.state).page.items.len()
    }

    /// Re-read the snapshot file this session was opened from
    pub fn reload(&mut self) {
        let Some(source) = self.store.source().map(PathBuf::from) else {
            self.message = Some("Snapshot has no source file to reload".to_string());
            return;
        };

        match load_snapshot(&source) {
            Ok(store) => {
                self.load(store);
                self.message = Some(format!("Reloaded {} users", self.store.len()));
            }
            Err(err) => {
                warn!(error = %err, "reload failed");
                self.message = Some(format!("Reload failed: {:#}", err));
            }
        }
    }

    /// Re-clamp page and row selection after anything that changes the view
    fn refresh(&mut self) {
        let total_pages = self.total_pages();
        self.state.reconcile(total_pages);

        let rows = self.rows_on_page();
        let selected = match self.table_state.selected() {
            _ if rows == 0 => None,
            Some(i) => Some(i.min(rows - 1)),
            None => Some(0),
        };
        self.table_state.select(selected);

        debug!(
            search = %self.state.search,
            tier = %self.state.tier_filter,
            sort = %self.state.sort_key,
            page = self.state.page,
            "view state changed"
        );
    }

    fn go_to_page(&mut self, page: usize) {
        self.state.page = page;
        self.table_state.select(Some(0));
        self.refresh();
    }

    pub fn next_page(&mut self) {
        let total = self.total_pages();
        self.state.next_page(total);
        self.table_state.select(Some(0));
        self.refresh();
    }

    pub fn previous_page(&mut self) {
        let total = self.total_pages();
        self.state.previous_page(total);
        self.table_state.select(Some(0));
        self.refresh();
    }

    pub fn cycle_tier_filter(&mut self) {
        self.state.tier_filter = self.state.tier_filter.next();
        self.refresh();
    }

    pub fn cycle_sort_key(&mut self) {
        self.state.sort_key = self.state.sort_key.next();
        self.refresh();
    }

    pub fn clear_filters(&mut self) {
        self.state.search.clear();
        self.state.tier_filter = Default::default();
        self.refresh();
    }

    pub fn next(&mut self) {
        let len = self.rows_on_page();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            Some(_) => 0,
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.rows_on_page();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.table_state.select(Some(i));
    }

    pub fn export(&mut self) {
        let ordered = ordered_view(&self.store, &self.state);
        if ordered.is_empty() {
            self.message = Some("Nothing to export".to_string());
            return;
        }

        let today = export_date();
        self.message = Some(match write_export(&self.export_dir, &ordered, today) {
            Ok(path) => format!("Exported {} users to {}", ordered.len(), path.display()),
            Err(err) => {
                warn!(error = %err, "export failed");
                format!("Export failed: {:#}", err)
            }
        });
    }

    /// Returns true when the console should exit
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if self.input_mode == InputMode::Search {
            match key.code {
                KeyCode::Enter | KeyCode::Esc => self.input_mode = InputMode::Normal,
                KeyCode::Backspace => {
                    self.state.search.pop();
                    self.refresh();
                }
                KeyCode::Char(c) => {
                    self.state.search.push(c);
                    self.refresh();
                }
                _ => {}
            }
            return false;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('/') => {
                self.input_mode = InputMode::Search;
                self.message = None;
            }
            KeyCode::Enter => self.show_detail = !self.show_detail,
            KeyCode::Char('t') => self.cycle_tier_filter(),
            KeyCode::Char('s') => self.cycle_sort_key(),
            KeyCode::Char('c') => self.clear_filters(),
            KeyCode::Char('e') => self.export(),
            KeyCode::Char('r') => self.reload(),
            KeyCode::Right | KeyCode::PageDown | KeyCode::Char('n') => self.next_page(),
            KeyCode::Left | KeyCode::PageUp | KeyCode::Char('p') => self.previous_page(),
            KeyCode::Home => self.go_to_page(1),
            KeyCode::End => {
                let last = self.total_pages();
                self.go_to_page(last);
            }
            KeyCode::Down | KeyCode::Char('j') => self.next(),
            KeyCode::Up | KeyCode::Char('k') => self.previous(),
            _ => {}
        }
        false
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res?;
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press && app.handle_key(key) {
                return Ok(());
            }
        }
    }
}

fn tier_color(tier: RiskTier) -> Color {
    match tier {
        RiskTier::Low => Color::Green,
        RiskTier::Medium => Color::Yellow,
        RiskTier::High => Color::Red,
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Overview stats
            Constraint::Length(3), // Search / filter / sort
            Constraint::Min(0),    // Table (+ detail)
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    let result = render(&app.store, &app.state);

    render_overview(f, chunks[0], &result.summary);
    render_controls(f, chunks[1], &result.state, app.input_mode);

    if app.show_detail {
        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(60), // Record table
                Constraint::Percentage(40), // Detail panel
            ])
            .split(chunks[2]);

        let selected = app
            .table_state
            .selected()
            .and_then(|i| result.page.items.get(i).copied());

        render_table(f, content_chunks[0], &result, &mut app.table_state);
        render_detail_panel(f, content_chunks[1], selected);
    } else {
        render_table(f, chunks[2], &result, &mut app.table_state);
    }

    render_status_bar(f, chunks[3], &result, app.message.as_deref());
}

fn overview_spans(summary: &GlobalSummary) -> Vec<Span<'static>> {
    let dist = summary.tier_distribution;

    let mut spans = vec![
        Span::styled(
            format!("Total Users: {}", summary.total),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
        Span::raw(format!("Avg Income: {:.0}", summary.mean_income)),
        Span::raw("  |  "),
        Span::raw(format!("Avg Loan: {:.0}", summary.mean_loan)),
        Span::raw("  |"),
    ];

    for tier in RiskTier::ALL {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("{} {} ({:.0}%)", tier.label(), dist.count(tier), dist.share(tier)),
            Style::default().fg(tier_color(tier)),
        ));
    }

    spans
}

fn render_overview(f: &mut Frame, area: Rect, summary: &GlobalSummary) {
    let header = Paragraph::new(vec![Line::from(overview_spans(summary))]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Overview "),
    );

    f.render_widget(header, area);
}

fn render_controls(f: &mut Frame, area: Rect, state: &ViewState, mode: InputMode) {
    let search_style = if mode == InputMode::Search {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };

    let cursor = if mode == InputMode::Search { "_" } else { "" };
    let search_text = if state.search.is_empty() && mode == InputMode::Normal {
        "Search users... (/)".to_string()
    } else {
        format!("{}{}", state.search, cursor)
    };

    let spans = vec![
        Span::styled("🔍 ", Style::default().fg(Color::DarkGray)),
        Span::styled(search_text, search_style),
        Span::raw("  |  "),
        Span::styled(state.tier_filter.title(), Style::default().fg(Color::Green)),
        Span::styled(" (t)", Style::default().fg(Color::DarkGray)),
        Span::raw("  |  "),
        Span::styled(state.sort_key.title(), Style::default().fg(Color::Green)),
        Span::styled(" (s)", Style::default().fg(Color::DarkGray)),
    ];

    let controls = Paragraph::new(vec![Line::from(spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" User Management "),
    );

    f.render_widget(controls, area);
}

fn render_table(f: &mut Frame, area: Rect, result: &ViewResult<'_>, table_state: &mut TableState) {
    let header_cells = ["User", "Email", "Income", "Credit Hist.", "Loan Amt", "Risk"]
        .iter()
        .map(|h| {
            Cell::from(*h).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = result.page.items.iter().map(|record| {
        let tier = record.tier();

        let cells = vec![
            Cell::from(truncate(&record.name, 24)),
            Cell::from(truncate(&record.email, 30)),
            Cell::from(format!("{:.0}", record.annual_income)),
            Cell::from(format!("{} yrs", record.credit_history_years)),
            Cell::from(format!("{:.0}", record.loan_amount)),
            Cell::from(tier.label()).style(Style::default().fg(tier_color(tier))),
        ];

        Row::new(cells).height(1)
    });

    let title = if result.page.items.is_empty() {
        " No users match your criteria ".to_string()
    } else {
        " Users ".to_string()
    };

    let table = Table::new(
        rows,
        [
            Constraint::Length(26),
            Constraint::Length(32),
            Constraint::Length(12),
            Constraint::Length(13),
            Constraint::Length(12),
            Constraint::Length(8),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(title),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, table_state);
}

fn render_status_bar(f: &mut Frame, area: Rect, result: &ViewResult<'_>, message: Option<&str>) {
    let page = &result.page;

    let mut status_spans = vec![Span::styled(
        format!(
            " Showing {} of {} users (Page {} of {}) ",
            page.items.len(),
            result.filtered_count,
            page.number,
            page.total_pages
        ),
        Style::default().fg(Color::Cyan),
    )];

    if page.total_pages > 1 {
        status_spans.push(Span::raw("["));
        for n in page.window() {
            let style = if n == page.number {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            status_spans.push(Span::styled(format!(" {} ", n), style));
        }
        status_spans.push(Span::raw("]"));
    }

    if let Some(msg) = message {
        status_spans.push(Span::raw(" | "));
        status_spans.push(Span::styled(msg.to_string(), Style::default().fg(Color::Green)));
    }

    status_spans.push(Span::raw(" | "));
    status_spans.push(Span::styled("←/→", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Page | "));
    status_spans.push(Span::styled("Enter", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Details | "));
    status_spans.push(Span::styled("e", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Export | "));
    status_spans.push(Span::styled("c", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Clear | "));
    status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
    status_spans.push(Span::raw(" Quit"));

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

fn render_detail_panel(f: &mut Frame, area: Rect, record: Option<&Record>) {
    let record = match record {
        Some(r) => r,
        None => {
            let no_selection = Paragraph::new("No user selected").block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow))
                    .title(" User Details "),
            );
            f.render_widget(no_selection, area);
            return;
        }
    };

    let label = |text: &'static str| {
        Span::styled(text, Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
    };
    let tier = record.tier();

    let content = vec![
        Line::from(""),
        Line::from(vec![label("  Name: "), Span::raw(record.name.as_str())]),
        Line::from(vec![label("  Email: "), Span::raw(record.email.as_str())]),
        Line::from(""),
        Line::from("  ─────────────────────────────────────"),
        Line::from(""),
        Line::from(vec![label("  Income: "), Span::raw(format!("{:.0}", record.annual_income))]),
        Line::from(vec![label("  Loan Amount: "), Span::raw(format!("{:.0}", record.loan_amount))]),
        Line::from(vec![
            label("  Credit History: "),
            Span::raw(format!("{} years", record.credit_history_years)),
        ]),
        Line::from(vec![
            label("  Debt-to-Income: "),
            Span::raw(format!("{:.1}%", record.debt_to_income.unwrap_or(0.0) * 100.0)),
        ]),
        Line::from(vec![
            label("  Employment: "),
            Span::raw(record.employment_status.map(|e| e.label()).unwrap_or("N/A")),
        ]),
        Line::from(""),
        Line::from("  ─────────────────────────────────────"),
        Line::from(""),
        Line::from(vec![label("  Risk Score: "), Span::raw(format!("{:.1}", record.risk_score))]),
        Line::from(vec![
            label("  Risk Level: "),
            Span::styled(
                tier.label(),
                Style::default().fg(tier_color(tier)).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
        Line::from(vec![Span::styled(
            "  Press Enter to close",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )]),
    ];

    let detail_panel = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" User Details "),
    );

    f.render_widget(detail_panel, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use risk_console::{RawRecord, SortKey, TierFilter};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn create_test_app(n: usize) -> App {
        let rows = (0..n).map(|i| RawRecord {
            name: Some(format!("user{:03}", i)),
            email: Some(format!("user{:03}@example.com", i)),
            annual_income: Some(1000.0 * i as f64),
            risk_score: Some((i * 7 % 100) as f64),
            ..Default::default()
        });
        App::new(
            RecordStore::from_raw(rows),
            ViewState::default(),
            PathBuf::from("."),
        )
    }

    #[test]
    fn test_overview_lists_every_tier_with_share() {
        let app = create_test_app(4);
        let summary = GlobalSummary::of_store(&app.store);
        let text: Vec<String> = overview_spans(&summary)
            .iter()
            .map(|span| span.content.to_string())
            .collect();

        assert_eq!(text[0], "Total Users: 4");
        assert!(text.contains(&"Low 4 (100%)".to_string()));
        assert!(text.contains(&"Medium 0 (0%)".to_string()));
        assert!(text.contains(&"High 0 (0%)".to_string()));
    }

    #[test]
    fn test_typing_search_filters_and_reconciles_page() {
        let mut app = create_test_app(45);
        app.handle_key(key(KeyCode::End));
        assert_eq!(app.state.page, 3);

        app.handle_key(key(KeyCode::Char('/')));
        for c in "user01".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        assert_eq!(app.state.search, "user01");
        assert_eq!(app.state.page, 1);

        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(!app.handle_key(key(KeyCode::Char('t'))));
        assert_eq!(app.state.tier_filter, TierFilter::Low);
    }

    #[test]
    fn test_sort_cycle_and_quit() {
        let mut app = create_test_app(3);
        app.handle_key(key(KeyCode::Char('s')));
        assert_eq!(app.state.sort_key, SortKey::Income);
        assert!(app.handle_key(key(KeyCode::Char('q'))));
    }

    #[test]
    fn test_page_keys_stay_in_range() {
        let mut app = create_test_app(45);
        app.handle_key(key(KeyCode::Left));
        assert_eq!(app.state.page, 1);
        for _ in 0..5 {
            app.handle_key(key(KeyCode::Right));
        }
        assert_eq!(app.state.page, 3);
        assert_eq!(app.rows_on_page(), 5);
    }

    #[test]
    fn test_export_of_empty_view_reports_nothing() {
        let mut app = create_test_app(0);
        app.export();
        assert_eq!(app.message.as_deref(), Some("Nothing to export"));
    }

    #[test]
    fn test_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = create_test_app(3);
        app.export_dir = dir.path().to_path_buf();

        app.handle_key(key(KeyCode::Char('e')));

        let message = app.message.clone().unwrap();
        assert!(message.starts_with("Exported 3 users"), "{}", message);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_load_resets_view_state() {
        let mut app = create_test_app(45);
        app.state = ViewState::new(TierFilter::High, SortKey::Loan).with_search("x").with_page(2);

        app.load(RecordStore::default());

        assert_eq!(app.state, ViewState::default());
        assert_eq!(app.table_state.selected(), None);
        assert_eq!(app.rows_on_page(), 0);
    }

    #[test]
    fn test_reload_from_source_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");
        std::fs::write(&path, r#"[{"name": "Ann", "RiskScore": 30}]"#).unwrap();

        let store = load_snapshot(&path).unwrap();
        let mut app = App::new(store, ViewState::default(), PathBuf::from("."));
        app.state.search = "zzz".to_string();

        std::fs::write(&path, r#"[{"name": "Ann"}, {"name": "Bo"}]"#).unwrap();
        app.handle_key(key(KeyCode::Char('r')));

        assert_eq!(app.store.len(), 2);
        assert_eq!(app.state.search, "");
        assert_eq!(app.message.as_deref(), Some("Reloaded 2 users"));
    }

    #[test]
    fn test_reload_without_source() {
        let mut app = create_test_app(1);
        app.reload();
        assert_eq!(app.store.len(), 1);
        assert!(app.message.unwrap().contains("no source file"));
    }
}
