// Live fleet dashboard: timer-driven read-render loop plus interactive
// input, with the store as the only coupling to the collection side.

pub mod view;

use crate::hosts_repo::HostsRepo;
use crate::models::HostRecord;
use crate::version;
use chrono::{DateTime, Utc};
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use futures_util::StreamExt;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use std::io;
use std::time::Duration;
use view::{Band, DisplayCell, SortColumn, SortOrder, Status, display_row, sort_records};

const COLUMNS: [(SortColumn, u16); 10] = [
    (SortColumn::Hostname, 25),
    (SortColumn::Ip, 15),
    (SortColumn::Status, 6),
    (SortColumn::Os, 28),
    (SortColumn::Kernel, 28),
    (SortColumn::Load, 8),
    (SortColumn::Mem, 6),
    (SortColumn::Disk, 6),
    (SortColumn::Failed, 6),
    (SortColumn::Uptime, 40),
];

pub struct Dashboard {
    repo: HostsRepo,
    refresh_interval: Duration,
    records: Vec<HostRecord>,
    sort: SortOrder,
    dark: bool,
    last_refresh: Option<DateTime<Utc>>,
    read_failures: u64,
}

impl Dashboard {
    pub fn new(repo: HostsRepo, refresh_interval: Duration) -> Self {
        Self {
            repo,
            refresh_interval,
            records: Vec::new(),
            sort: SortOrder::Default,
            dark: true,
            last_refresh: None,
            read_failures: 0,
        }
    }

    /// Run until quit. Terminal state is restored even when the loop errors.
    pub async fn run(mut self) -> anyhow::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.event_loop(&mut terminal).await;

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;
        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        let mut events = EventStream::new();
        // First paint does not wait a full interval.
        self.refresh().await;
        let mut ticker = tokio::time::interval_at(
            tokio::time::Instant::now() + self.refresh_interval,
            self.refresh_interval,
        );
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            sort_records(&mut self.records, self.sort);
            terminal.draw(|frame| self.render(frame))?;

            tokio::select! {
                _ = ticker.tick() => {
                    self.refresh().await;
                }
                maybe_event = events.next() => {
                    match maybe_event {
                        Some(Ok(event)) => {
                            if self.handle_input(&event) {
                                return Ok(());
                            }
                        }
                        Some(Err(e)) => tracing::warn!(error = %e, "terminal event error"),
                        None => return Ok(()),
                    }
                }
            }
        }
    }

    /// A failed read keeps the previous rows and retries on the next tick;
    /// it never terminates the session.
    async fn refresh(&mut self) {
        match self.repo.load_all().await {
            Ok(records) => {
                self.records = records;
                self.last_refresh = Some(Utc::now());
            }
            Err(e) => {
                self.read_failures += 1;
                tracing::warn!(error = %e, "fleet read failed, keeping previous rows");
            }
        }
    }

    /// Returns true on quit.
    fn handle_input(&mut self, event: &Event) -> bool {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return false;
        };
        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return true,
            KeyCode::Char('d') => self.dark = !self.dark,
            KeyCode::Esc => self.sort = SortOrder::Default,
            KeyCode::Char(digit @ ('0'..='9')) => {
                if let Some(column) = SortColumn::from_digit(*digit) {
                    self.sort = match self.sort {
                        // Same column again flips direction.
                        SortOrder::Column { column: c, reverse } if c == column => {
                            SortOrder::Column {
                                column,
                                reverse: !reverse,
                            }
                        }
                        _ => SortOrder::Column {
                            column,
                            reverse: false,
                        },
                    };
                }
            }
            _ => {}
        }
        false
    }

    fn render(&self, frame: &mut ratatui::Frame) {
        let theme = if self.dark {
            Theme::dark()
        } else {
            Theme::light()
        };
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(frame.area());

        frame.render_widget(self.header(theme), layout[0]);
        frame.render_widget(self.table(theme), layout[1]);
        frame.render_widget(self.footer(theme), layout[2]);
    }

    fn header(&self, theme: Theme) -> Paragraph<'_> {
        let refreshed = match self.last_refresh {
            Some(ts) => ts.format("%H:%M:%S UTC").to_string(),
            None => "never".into(),
        };
        let sort = match self.sort {
            SortOrder::Default => "default".to_string(),
            SortOrder::Column { column, reverse } => {
                format!("{}{}", column.label(), if reverse { " desc" } else { "" })
            }
        };
        let mut line = format!(
            "{} {}  |  {} hosts  |  refreshed {}  |  sort: {}",
            version::NAME,
            version::VERSION,
            self.records.len(),
            refreshed,
            sort
        );
        if self.read_failures > 0 {
            line.push_str(&format!("  |  read failures: {}", self.read_failures));
        }
        Paragraph::new(line).style(Style::default().fg(theme.title).bg(theme.bg))
    }

    fn footer(&self, theme: Theme) -> Paragraph<'static> {
        Paragraph::new("q quit  d theme  1-9/0 sort column  Esc default sort")
            .style(Style::default().fg(theme.muted).bg(theme.bg))
    }

    fn table(&self, theme: Theme) -> Table<'_> {
        let header = Row::new(
            COLUMNS
                .iter()
                .map(|(column, _)| Cell::from(column.label()))
                .collect::<Vec<_>>(),
        )
        .style(
            Style::default()
                .fg(theme.title)
                .add_modifier(Modifier::BOLD),
        );

        let rows: Vec<Row> = self
            .records
            .iter()
            .map(|record| {
                let row = display_row(record);
                let status_style = match row.status {
                    Status::Up => Style::default().fg(theme.ok),
                    Status::Down => Style::default()
                        .fg(theme.critical)
                        .add_modifier(Modifier::BOLD),
                };
                Row::new(vec![
                    Cell::from(row.hostname.clone()).style(Style::default().fg(theme.text)),
                    styled_cell(&row.ip, theme),
                    Cell::from(row.status.label()).style(status_style),
                    styled_cell(&row.os, theme),
                    styled_cell(&row.kernel, theme),
                    styled_cell(&row.load, theme),
                    styled_cell(&row.mem, theme),
                    styled_cell(&row.disk, theme),
                    styled_cell(&row.failed, theme),
                    styled_cell(&row.uptime, theme),
                ])
            })
            .collect();

        let widths = COLUMNS.map(|(_, width)| Constraint::Length(width));
        Table::new(rows, widths)
            .header(header)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("fleet")
                    .style(Style::default().bg(theme.bg).fg(theme.border)),
            )
            .column_spacing(1)
    }
}

fn styled_cell(cell: &DisplayCell, theme: Theme) -> Cell<'static> {
    let style = if !cell.known {
        Style::default().fg(theme.muted)
    } else {
        match cell.band {
            Band::Normal => Style::default().fg(theme.text),
            Band::Warning => Style::default().fg(theme.warn),
            Band::Critical => Style::default()
                .fg(theme.critical)
                .add_modifier(Modifier::BOLD),
        }
    };
    Cell::from(cell.text.clone()).style(style)
}

#[derive(Clone, Copy)]
struct Theme {
    bg: Color,
    border: Color,
    title: Color,
    text: Color,
    muted: Color,
    ok: Color,
    warn: Color,
    critical: Color,
}

impl Theme {
    fn dark() -> Self {
        Self {
            bg: Color::Reset,
            border: Color::DarkGray,
            title: Color::Cyan,
            text: Color::Gray,
            muted: Color::DarkGray,
            ok: Color::Green,
            warn: Color::Yellow,
            critical: Color::Red,
        }
    }

    fn light() -> Self {
        Self {
            bg: Color::White,
            border: Color::Gray,
            title: Color::Blue,
            text: Color::Black,
            muted: Color::Gray,
            ok: Color::Green,
            warn: Color::Magenta,
            critical: Color::Red,
        }
    }
}
