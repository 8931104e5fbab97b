use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use loshu_numerology::{NumerologyChart, COLUMN_LABELS, ROW_LABELS};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
    Frame, Terminal,
};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Chart,
    Planes,
    Reading,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::Chart => Page::Planes,
            Page::Planes => Page::Reading,
            Page::Reading => Page::Chart,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Page::Chart => Page::Reading,
            Page::Planes => Page::Chart,
            Page::Reading => Page::Planes,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Chart => "Core Numbers & Grid",
            Page::Planes => "Planes",
            Page::Reading => "Reading",
        }
    }
}

/// What the Reading page shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadingState {
    NotRequested,
    Ready(String),
    Failed(String),
}

pub struct App {
    pub chart: NumerologyChart,
    pub placeholder: String,
    pub reading: ReadingState,
    pub current_page: Page,
    pub scroll: u16,
}

impl App {
    pub fn new(chart: NumerologyChart, placeholder: String, reading: ReadingState) -> Self {
        Self {
            chart,
            placeholder,
            reading,
            current_page: Page::Chart,
            scroll: 0,
        }
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
        self.scroll = 0;
    }

    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.previous();
        self.scroll = 0;
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_add(lines);
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_sub(lines);
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

    if let Err(err) = res {
        tracing::error!("TUI error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Tab => {
                    if key.modifiers.contains(KeyModifiers::SHIFT) {
                        app.previous_page();
                    } else {
                        app.next_page();
                    }
                }
                KeyCode::BackTab => app.previous_page(),
                KeyCode::Char('1') => app.current_page = Page::Chart,
                KeyCode::Char('2') => app.current_page = Page::Planes,
                KeyCode::Char('3') => app.current_page = Page::Reading,
                KeyCode::Down | KeyCode::Char('j') => app.scroll_down(1),
                KeyCode::Up | KeyCode::Char('k') => app.scroll_up(1),
                KeyCode::PageDown => app.scroll_down(10),
                KeyCode::PageUp => app.scroll_up(10),
                KeyCode::Home => app.scroll = 0,
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    match app.current_page {
        Page::Chart => {
            let content_chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
                .split(chunks[1]);
            render_core_numbers(f, content_chunks[0], app);
            render_grid(f, content_chunks[1], app);
        }
        Page::Planes => render_planes(f, chunks[1], app),
        Page::Reading => render_reading(f, chunks[1], app),
    }

    render_status_bar(f, chunks[2]);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let pages = [Page::Chart, Page::Planes, Page::Reading];

    let mut tab_spans = vec![];
    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(page.title().to_string(), style));
    }

    let record = &app.chart.record;
    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("{} · {} · {}", record.name(), record.display_date(), record.gender()),
        Style::default().fg(Color::White),
    ));

    let header = Paragraph::new(vec![Line::from(tab_spans)])
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn number_line(label: &str, value: u8, hint: &str) -> Line<'static> {
    Line::from(vec![
        Span::raw(format!("  {:<16}", label)),
        Span::styled(
            value.to_string(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("   {}", hint), Style::default().fg(Color::DarkGray)),
    ])
}

fn render_core_numbers(f: &mut Frame, area: Rect, app: &App) {
    let core = &app.chart.core;

    let mut content = vec![
        Line::from(""),
        number_line("Psychic Number", core.psychic, "inner self"),
        number_line("Destiny Number", core.destiny, "life path"),
        number_line("Name Number", core.name_number, "expression"),
        number_line("Kua Number", core.kua, "personal energy"),
    ];
    if let Some(year_number) = core.current_year_number {
        content.push(number_line(
            "Year Number",
            year_number,
            &app.chart.computed_on.format("%Y").to_string(),
        ));
    }

    content.push(Line::from(""));
    content.push(Line::from(Span::styled(
        format!("  Missing: {}", missing_text(app)),
        Style::default().fg(Color::Red),
    )));

    let panel = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Core Numbers "),
    );

    f.render_widget(panel, area);
}

fn missing_text(app: &App) -> String {
    let missing = app.chart.frequencies.missing();
    if missing.is_empty() {
        "none".to_string()
    } else {
        missing.iter().map(u8::to_string).collect::<Vec<_>>().join(", ")
    }
}

fn render_grid(f: &mut Frame, area: Rect, app: &App) {
    let header_cells = std::iter::once("").chain(COLUMN_LABELS).map(|h| {
        Cell::from(h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    });
    let header = Row::new(header_cells).height(1);

    let grid = app.chart.grid(&app.placeholder);
    let rows = ROW_LABELS.iter().zip(grid.iter()).map(|(label, cells)| {
        let mut row = vec![Cell::from(label.to_string())];
        for cell in cells {
            let style = match cell.count {
                0 => Style::default().fg(Color::DarkGray),
                1 => Style::default().fg(Color::Green),
                _ => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            };
            row.push(Cell::from(cell.text.clone()).style(style));
        }
        Row::new(row).height(2)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(18),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(10),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Lo Shu Grid "),
    );

    f.render_widget(table, area);
}

fn render_planes(f: &mut Frame, area: Rect, app: &App) {
    let planes = &app.chart.planes;

    let mut content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "  Completed Planes",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
    ];
    if planes.complete.is_empty() {
        content.push(Line::from("    No completed planes found."));
    }
    for label in planes.complete_labels() {
        content.push(Line::from(Span::styled(
            format!("    ✓ {}", label),
            Style::default().fg(Color::Green),
        )));
    }

    content.push(Line::from(""));
    content.push(Line::from(Span::styled(
        "  Incomplete Planes",
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )));
    if planes.incomplete.is_empty() {
        content.push(Line::from("    All planes are complete!"));
    }
    for label in planes.incomplete_labels() {
        content.push(Line::from(Span::styled(
            format!("    ✗ {}", label),
            Style::default().fg(Color::Red),
        )));
    }

    let panel = Paragraph::new(content).scroll((app.scroll, 0)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Planes Analysis "),
    );

    f.render_widget(panel, area);
}

fn render_reading(f: &mut Frame, area: Rect, app: &App) {
    let (text, color) = match &app.reading {
        ReadingState::Ready(reading) => (reading.clone(), Color::White),
        ReadingState::Failed(error) => (format!("Reading unavailable: {}", error), Color::Red),
        ReadingState::NotRequested => (
            "No reading requested. Run `loshu tui --reading` to ask the narrative backend.".to_string(),
            Color::DarkGray,
        ),
    };

    let panel = Paragraph::new(text)
        .style(Style::default().fg(color))
        .wrap(Wrap { trim: false })
        .scroll((app.scroll, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(" Numerology Reading "),
        );

    f.render_widget(panel, area);
}

fn render_status_bar(f: &mut Frame, area: Rect) {
    let status_spans = vec![
        Span::styled("Tab", Style::default().fg(Color::Yellow)),
        Span::raw(" Page | "),
        Span::styled("1-3", Style::default().fg(Color::Yellow)),
        Span::raw(" Jump | "),
        Span::styled("↑/↓", Style::default().fg(Color::Yellow)),
        Span::raw(" Scroll | "),
        Span::styled("PgUp/PgDn", Style::default().fg(Color::Yellow)),
        Span::raw(" Fast | "),
        Span::styled("q", Style::default().fg(Color::Red)),
        Span::raw(" Quit"),
    ];

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}
