// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use mfdesk_app::validation::{format_compact_paise, format_percent};
use mfdesk_app::{
    AppCommand, AppEvent, AppMode, AppState, DataAccessError, FilterFieldSpec, FilterOptions,
    FilterPanel, FilterableTable, Mutation, PanelCommand, PanelEvent, Record, ReportKind,
    SeedOutcome, SortDirection, SortOutcome, SummaryScope,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

const FILTER_MARK_ACTIVE: &str = "▼";
const STATUS_CLEAR_DELAY: Duration = Duration::from_secs(4);

/// Collaborators the UI reaches through. Fetch failures are typed so the
/// table can keep its last good rows; workflow and seed failures are plain
/// status messages.
pub trait AppRuntime {
    fn fetch_records(
        &mut self,
        kind: ReportKind,
        criteria: Option<&FilterOptions>,
    ) -> Result<Vec<Record>, DataAccessError>;
    fn apply_mutation(&mut self, mutation: &Mutation) -> Result<usize>;
    fn seed_reference_data(&mut self) -> Result<SeedOutcome>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TableCommand {
    MoveRow(isize),
    MoveColumn(isize),
    JumpFirstRow,
    JumpLastRow,
    CycleSort,
    ClearSort,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TableStatus {
    SortUnavailable,
    SortAsc(&'static str),
    SortDesc(&'static str),
    SortCleared,
    SortsCleared,
}

impl TableStatus {
    fn message(self) -> String {
        match self {
            Self::SortUnavailable => "sort unavailable".to_owned(),
            Self::SortAsc(column) => format!("sort {column} asc"),
            Self::SortDesc(column) => format!("sort {column} desc"),
            Self::SortCleared => "sort cleared".to_owned(),
            Self::SortsCleared => "all sorts cleared".to_owned(),
        }
    }
}

impl From<SortOutcome> for TableStatus {
    fn from(outcome: SortOutcome) -> Self {
        match outcome {
            SortOutcome::Unavailable => Self::SortUnavailable,
            SortOutcome::Asc(label) => Self::SortAsc(label),
            SortOutcome::Desc(label) => Self::SortDesc(label),
            SortOutcome::Cleared => Self::SortCleared,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TableEvent {
    CursorUpdated,
    Status(TableStatus),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WorkflowAction {
    ToggleRole,
    SubmitWriteOff,
    SettleDeathCase,
    ClearQueue,
}

impl WorkflowAction {
    const fn report(self) -> ReportKind {
        match self {
            Self::ToggleRole => ReportKind::Roles,
            Self::SubmitWriteOff => ReportKind::WriteOff,
            Self::SettleDeathCase => ReportKind::DeathCase,
            Self::ClearQueue => ReportKind::ApplicationVerification,
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::ToggleRole => "role activation",
            Self::SubmitWriteOff => "write-off submission",
            Self::SettleDeathCase => "death case settlement",
            Self::ClearQueue => "queue clearing",
        }
    }
}

pub enum InternalEvent {
    ClearStatus { token: u64 },
}

/// Per-report session state: the record table, its filter inputs, and the
/// cursor. Kept across report switches.
#[derive(Debug, Clone)]
struct ReportPane {
    table: FilterableTable,
    panel: FilterPanel,
    selected_row: usize,
    selected_col: usize,
}

impl ReportPane {
    fn new(kind: ReportKind) -> Self {
        let table = FilterableTable::new(kind);
        let panel = FilterPanel::new(table.schema());
        Self {
            table,
            panel,
            selected_row: 0,
            selected_col: 0,
        }
    }

    fn selected_record(&self) -> Option<&Record> {
        self.table.record_at(self.selected_row)
    }

    fn clamp_cursor(&mut self) {
        self.selected_row = self
            .selected_row
            .min(self.table.visible_len().saturating_sub(1));
        self.selected_col = self
            .selected_col
            .min(self.table.columns().len().saturating_sub(1));
    }
}

#[derive(Debug, Clone)]
struct ViewData {
    panes: Vec<ReportPane>,
    help_visible: bool,
    status_token: u64,
}

impl Default for ViewData {
    fn default() -> Self {
        Self {
            panes: ReportKind::ALL.into_iter().map(ReportPane::new).collect(),
            help_visible: false,
            status_token: 0,
        }
    }
}

impl ViewData {
    fn pane(&self, kind: ReportKind) -> &ReportPane {
        &self.panes[report_index(kind)]
    }

    fn pane_mut(&mut self, kind: ReportKind) -> &mut ReportPane {
        &mut self.panes[report_index(kind)]
    }
}

fn report_index(kind: ReportKind) -> usize {
    ReportKind::ALL
        .iter()
        .position(|candidate| *candidate == kind)
        .unwrap_or(0)
}

pub fn run_app<R: AppRuntime>(state: &mut AppState, runtime: &mut R) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::default();
    let (internal_tx, internal_rx) = mpsc::channel();

    let _ = refresh_active(state, runtime, &mut view_data);

    let mut result = Ok(());
    loop {
        process_internal_events(state, &mut view_data, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = match event::poll(Duration::from_millis(120)).context("poll event") {
            Ok(has_event) => has_event,
            Err(error) => {
                result = Err(error);
                break;
            }
        };
        if has_event {
            match event::read().context("read event") {
                Ok(Event::Key(key)) => {
                    if handle_key_event(state, runtime, &mut view_data, &internal_tx, key) {
                        break;
                    }
                }
                Ok(_) => {}
                Err(error) => {
                    result = Err(error);
                    break;
                }
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn process_internal_events(
    state: &mut AppState,
    view_data: &mut ViewData,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(STATUS_CLEAR_DELAY);
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    state.dispatch(AppCommand::SetStatus(message.into()));
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

fn handle_key_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    if view_data.help_visible {
        if key.code == KeyCode::Esc || key.code == KeyCode::Char('?') {
            view_data.help_visible = false;
        }
        return false;
    }

    if state.mode == AppMode::Filter {
        handle_panel_key(state, view_data, internal_tx, key);
        return false;
    }

    if handle_table_key(state, view_data, internal_tx, key) {
        return false;
    }

    match (key.code, key.modifiers) {
        (KeyCode::Char('f'), KeyModifiers::NONE) | (KeyCode::Tab, _) => {
            dispatch_and_refresh(state, runtime, view_data, AppCommand::NextReport, internal_tx);
        }
        (KeyCode::Char('b'), KeyModifiers::NONE) | (KeyCode::BackTab, _) => {
            dispatch_and_refresh(state, runtime, view_data, AppCommand::PrevReport, internal_tx);
        }
        (KeyCode::Char(digit), KeyModifiers::NONE) if digit.is_ascii_digit() => {
            if let Some(kind) = report_for_digit(digit) {
                dispatch_and_refresh(
                    state,
                    runtime,
                    view_data,
                    AppCommand::SelectReport(kind),
                    internal_tx,
                );
            }
        }
        (KeyCode::Char('/'), _) => {
            let events = view_data
                .pane_mut(state.active_report)
                .panel
                .dispatch(PanelCommand::Open);
            apply_panel_events(state, view_data, internal_tx, events);
        }
        (KeyCode::Char('c'), KeyModifiers::NONE) => {
            let events = view_data
                .pane_mut(state.active_report)
                .panel
                .dispatch(PanelCommand::Clear);
            apply_panel_events(state, view_data, internal_tx, events);
        }
        (KeyCode::Char('t'), KeyModifiers::NONE) => {
            dispatch_and_refresh(
                state,
                runtime,
                view_data,
                AppCommand::ToggleSummaryScope,
                internal_tx,
            );
        }
        (KeyCode::Char('r'), KeyModifiers::NONE) => {
            let message = match refresh_active(state, runtime, view_data) {
                Ok(_) => format!(
                    "reloaded | {}",
                    view_data.pane(state.active_report).table.count_label()
                ),
                Err(error) => format!("reload failed: {error}"),
            };
            emit_status(state, view_data, internal_tx, message);
        }
        (KeyCode::Char('R'), _) => seed_reference_data(state, runtime, view_data, internal_tx),
        (KeyCode::Char('?'), _) => view_data.help_visible = true,
        _ => {
            if let Some(action) = workflow_for_key(key) {
                run_workflow(state, runtime, view_data, internal_tx, action);
            }
        }
    }
    false
}

fn handle_panel_key(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let Some(command) = panel_command_for_key(key) else {
        return;
    };
    let events = view_data
        .pane_mut(state.active_report)
        .panel
        .dispatch(command);
    apply_panel_events(state, view_data, internal_tx, events);
}

/// `1`-`9` jump to the first nine reports, `0` to the tenth.
fn report_for_digit(digit: char) -> Option<ReportKind> {
    let index = match digit.to_digit(10)? {
        0 => 9,
        n => n as usize - 1,
    };
    ReportKind::ALL.get(index).copied()
}

/// Letters are always text while the panel is open; fields move with the
/// arrow and tab keys.
fn panel_command_for_key(key: KeyEvent) -> Option<PanelCommand> {
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => Some(PanelCommand::Cancel),
        (KeyCode::Enter, _) => Some(PanelCommand::Submit),
        (KeyCode::Char('u'), modifiers) if modifiers.contains(KeyModifiers::CONTROL) => {
            Some(PanelCommand::ClearStaged)
        }
        (KeyCode::Delete, _) => Some(PanelCommand::ClearInput),
        (KeyCode::Up, _) | (KeyCode::BackTab, _) => Some(PanelCommand::MoveCursor(-1)),
        (KeyCode::Down, _) | (KeyCode::Tab, _) => Some(PanelCommand::MoveCursor(1)),
        (KeyCode::Left, _) => Some(PanelCommand::CycleChoice(-1)),
        (KeyCode::Right, _) => Some(PanelCommand::CycleChoice(1)),
        (KeyCode::Backspace, _) => Some(PanelCommand::DeleteChar),
        (KeyCode::Char(ch), modifiers)
            if !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            Some(PanelCommand::InsertChar(ch))
        }
        _ => None,
    }
}

fn apply_panel_events(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    events: Vec<PanelEvent>,
) {
    let kind = state.active_report;
    for event in events {
        match event {
            PanelEvent::Opened => {
                state.dispatch(AppCommand::OpenFilters);
            }
            PanelEvent::Closed => {
                state.dispatch(AppCommand::CloseFilters);
            }
            PanelEvent::Staged(_) => {}
            PanelEvent::ValidationFailed(error) => {
                debug!(report = kind.as_str(), %error, "filter submission rejected");
            }
            PanelEvent::Applied(options) => {
                let cleared = options.is_unconstrained();
                let pane = view_data.pane_mut(kind);
                pane.table.apply(options);
                pane.selected_row = 0;
                pane.clamp_cursor();
                let verb = if cleared {
                    "filters cleared"
                } else {
                    "filters applied"
                };
                let message = format!("{verb} | {}", pane.table.count_label());
                emit_status(state, view_data, internal_tx, message);
            }
        }
    }
}

fn handle_table_key(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    let Some(command) = table_command_for_key(key) else {
        return false;
    };

    let event = apply_table_command(view_data.pane_mut(state.active_report), command);
    if let TableEvent::Status(status) = event {
        emit_status(state, view_data, internal_tx, status.message());
    }
    true
}

fn table_command_for_key(key: KeyEvent) -> Option<TableCommand> {
    match (key.code, key.modifiers) {
        (KeyCode::Char('j'), _) | (KeyCode::Down, _) => Some(TableCommand::MoveRow(1)),
        (KeyCode::Char('k'), _) | (KeyCode::Up, _) => Some(TableCommand::MoveRow(-1)),
        (KeyCode::Char('h'), _) | (KeyCode::Left, _) => Some(TableCommand::MoveColumn(-1)),
        (KeyCode::Char('l'), _) | (KeyCode::Right, _) => Some(TableCommand::MoveColumn(1)),
        (KeyCode::Char('g'), _) => Some(TableCommand::JumpFirstRow),
        (KeyCode::Char('G'), _) => Some(TableCommand::JumpLastRow),
        (KeyCode::Char('s'), KeyModifiers::NONE) => Some(TableCommand::CycleSort),
        (KeyCode::Char('S'), _) => Some(TableCommand::ClearSort),
        _ => None,
    }
}

fn apply_table_command(pane: &mut ReportPane, command: TableCommand) -> TableEvent {
    match command {
        TableCommand::MoveRow(delta) => {
            pane.selected_row = step(pane.selected_row, delta, pane.table.visible_len());
            TableEvent::CursorUpdated
        }
        TableCommand::MoveColumn(delta) => {
            pane.selected_col = step(pane.selected_col, delta, pane.table.columns().len());
            TableEvent::CursorUpdated
        }
        TableCommand::JumpFirstRow => {
            pane.selected_row = 0;
            TableEvent::CursorUpdated
        }
        TableCommand::JumpLastRow => {
            pane.selected_row = pane.table.visible_len().saturating_sub(1);
            TableEvent::CursorUpdated
        }
        TableCommand::CycleSort => {
            let outcome = pane.table.cycle_sort(pane.selected_col);
            pane.clamp_cursor();
            TableEvent::Status(outcome.into())
        }
        TableCommand::ClearSort => {
            pane.table.clear_sorts();
            TableEvent::Status(TableStatus::SortsCleared)
        }
    }
}

fn step(current: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let next = if delta.is_negative() {
        current.saturating_sub(delta.unsigned_abs())
    } else {
        current.saturating_add(delta as usize)
    };
    next.min(len - 1)
}

fn workflow_for_key(key: KeyEvent) -> Option<WorkflowAction> {
    match (key.code, key.modifiers) {
        (KeyCode::Char('a'), KeyModifiers::NONE) => Some(WorkflowAction::ToggleRole),
        (KeyCode::Char('w'), KeyModifiers::NONE) => Some(WorkflowAction::SubmitWriteOff),
        (KeyCode::Char('x'), KeyModifiers::NONE) => Some(WorkflowAction::SettleDeathCase),
        (KeyCode::Char('X'), _) => Some(WorkflowAction::ClearQueue),
        _ => None,
    }
}

fn mutation_for(action: WorkflowAction, pane: &ReportPane) -> Option<Mutation> {
    if action == WorkflowAction::ClearQueue {
        return Some(Mutation::ClearQueue {
            kind: ReportKind::ApplicationVerification,
        });
    }
    let record = pane.selected_record()?;
    let id = record.id.clone();
    let mutation = match action {
        WorkflowAction::ToggleRole => Mutation::SetRoleActive {
            role_id: id,
            active: record.get("status").as_str() != Some("active"),
        },
        WorkflowAction::SubmitWriteOff => Mutation::SubmitWriteOff { loan_id: id },
        WorkflowAction::SettleDeathCase => Mutation::SettleDeathCase { case_id: id },
        WorkflowAction::ClearQueue => Mutation::ClearQueue {
            kind: ReportKind::ApplicationVerification,
        },
    };
    Some(mutation)
}

fn run_workflow<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    action: WorkflowAction,
) {
    if state.active_report != action.report() {
        let message = format!(
            "{} is only available on {}",
            action.name(),
            action.report().label()
        );
        emit_status(state, view_data, internal_tx, message);
        return;
    }

    let Some(mutation) = mutation_for(action, view_data.pane(state.active_report)) else {
        emit_status(state, view_data, internal_tx, "no record selected");
        return;
    };

    let message = match runtime.apply_mutation(&mutation) {
        Ok(affected) => {
            let _ = refresh_active(state, runtime, view_data);
            match &mutation {
                Mutation::ClearQueue { .. } => format!("{} ({affected})", mutation.describe()),
                _ => mutation.describe(),
            }
        }
        Err(error) => {
            warn!(
                report = action.report().as_str(),
                error = %format!("{error:#}"),
                "workflow action failed"
            );
            format!("{} failed: {error:#}", action.name())
        }
    };
    emit_status(state, view_data, internal_tx, message);
}

fn seed_reference_data<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let message = match runtime.seed_reference_data() {
        Ok(outcome) => {
            let _ = refresh_active(state, runtime, view_data);
            outcome.message
        }
        Err(error) => format!("seed failed: {error:#}"),
    };
    emit_status(state, view_data, internal_tx, message);
}

fn dispatch_and_refresh<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    command: AppCommand,
    internal_tx: &Sender<InternalEvent>,
) {
    let events = state.dispatch(command);
    if should_refresh_view(&events) {
        let _ = refresh_active(state, runtime, view_data);
    }
    if events
        .iter()
        .any(|event| matches!(event, AppEvent::StatusUpdated(_)))
    {
        view_data.status_token = view_data.status_token.saturating_add(1);
        schedule_status_clear(internal_tx, view_data.status_token);
    }
}

fn should_refresh_view(events: &[AppEvent]) -> bool {
    events
        .iter()
        .any(|event| matches!(event, AppEvent::ReportChanged(_)))
}

/// Refetches the active report. On failure the table keeps what it had and
/// shows the error in its banner.
fn refresh_active<R: AppRuntime>(
    state: &AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
) -> Result<usize, DataAccessError> {
    let kind = state.active_report;
    let fetched = runtime.fetch_records(kind, None);
    let pane = view_data.pane_mut(kind);
    match fetched {
        Ok(records) => {
            pane.table.replace_records(records);
            pane.clamp_cursor();
            Ok(pane.table.total_len())
        }
        Err(error) => {
            warn!(report = kind.as_str(), %error, "fetch failed");
            pane.table.record_load_failure(error.clone());
            Err(error)
        }
    }
}

fn report_tab_title(kind: ReportKind, view_data: &ViewData) -> String {
    if view_data.pane(kind).table.applied().active_count() > 0 {
        format!(" {} {} ", kind.label(), FILTER_MARK_ACTIVE)
    } else {
        format!(" {} ", kind.label())
    }
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let pane = view_data.pane(state.active_report);
    let banner = banner_text(&pane.table);
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(if banner.is_some() { 3 } else { 0 }),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let tab_titles = ReportKind::ALL
        .iter()
        .map(|kind| report_tab_title(*kind, view_data))
        .collect::<Vec<String>>();
    let tabs = Tabs::new(tab_titles)
        .block(Block::default().title("mfdesk").borders(Borders::ALL))
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .select(report_index(state.active_report));
    frame.render_widget(tabs, layout[0]);

    let summary = Paragraph::new(summary_text(&pane.table, state.summary_scope))
        .block(Block::default().title("summary").borders(Borders::ALL));
    frame.render_widget(summary, layout[1]);

    if let Some(banner) = banner {
        let widget = Paragraph::new(banner)
            .style(Style::default().fg(Color::Red))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(widget, layout[2]);
    }

    render_table(frame, layout[3], pane);

    let status = Paragraph::new(status_text(state, view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, layout[4]);

    if pane.panel.is_open() {
        let area = centered_rect(72, 64, frame.area());
        frame.render_widget(Clear, area);
        let panel = Paragraph::new(render_filter_panel_text(&pane.panel)).block(
            Block::default()
                .title(format!("filters: {}", state.active_report.title()))
                .borders(Borders::ALL)
                .style(Style::default().fg(Color::Cyan)),
        );
        frame.render_widget(panel, area);
    }

    if view_data.help_visible {
        let area = centered_rect(80, 60, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

fn render_table(frame: &mut ratatui::Frame<'_>, area: Rect, pane: &ReportPane) {
    let columns = pane.table.columns();
    let widths = vec![Constraint::Min(6); columns.len().max(1)];

    let header = Row::new((0..columns.len()).map(|column| {
        Cell::from(header_label(&pane.table, column)).style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
    }));

    let rows = pane
        .table
        .rows()
        .into_iter()
        .enumerate()
        .map(|(row_index, cells)| {
            let selected_row = row_index == pane.selected_row;
            let cells = cells
                .iter()
                .enumerate()
                .map(|(column_index, cell)| {
                    let mut style = Style::default();
                    if selected_row {
                        style = style.bg(Color::DarkGray);
                    }
                    if selected_row && column_index == pane.selected_col {
                        style = Style::default()
                            .fg(Color::Black)
                            .bg(Color::Cyan)
                            .add_modifier(Modifier::BOLD);
                    }
                    Cell::from(cell.display()).style(style)
                })
                .collect::<Vec<_>>();
            Row::new(cells)
        })
        .collect::<Vec<_>>();

    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(
            Block::default()
                .title(table_title(&pane.table))
                .borders(Borders::ALL),
        );
    frame.render_widget(table, area);
}

fn header_label(table: &FilterableTable, column: usize) -> String {
    let mut label = table
        .header()
        .get(column)
        .map(|label| (*label).to_owned())
        .unwrap_or_default();

    let sorts = table.sorts();
    if let Some((position, sort)) = sorts
        .iter()
        .enumerate()
        .find(|(_, sort)| sort.column == column)
    {
        if sorts.len() == 1 {
            label.push_str(match sort.direction {
                SortDirection::Asc => " ↑",
                SortDirection::Desc => " ↓",
            });
        } else {
            label.push_str(match sort.direction {
                SortDirection::Asc => " ▲",
                SortDirection::Desc => " ▼",
            });
            label.push_str(&(position + 1).to_string());
        }
    }
    label
}

fn table_title(table: &FilterableTable) -> String {
    let applied = table.applied();
    if applied.is_unconstrained() {
        format!(" {} | {} ", table.kind().title(), table.count_label())
    } else {
        format!(
            " {} | {} | {} ",
            table.kind().title(),
            table.count_label(),
            applied.describe()
        )
    }
}

/// `group (scope) total | label count pct [amount] | ...`
fn summary_text(table: &FilterableTable, scope: SummaryScope) -> String {
    let summary = table.summarize(scope);
    let with_amounts = table.definition().summary.amount_field.is_some();
    let mut parts = vec![format!(
        "{} ({}) {}",
        summary.group_field,
        scope.as_str(),
        summary.total
    )];
    for bucket in &summary.buckets {
        let mut part = format!(
            "{} {} {}",
            bucket.label,
            bucket.count,
            format_percent(bucket.proportion)
        );
        if with_amounts {
            part.push(' ');
            part.push_str(&format_compact_paise(bucket.amount));
        }
        parts.push(part);
    }
    parts.join(" | ")
}

fn banner_text(table: &FilterableTable) -> Option<String> {
    let error = table.load_error()?;
    if table.total_len() == 0 {
        Some(error.to_string())
    } else {
        Some(format!("{error}; showing last loaded records"))
    }
}

fn render_filter_panel_text(panel: &FilterPanel) -> String {
    let schema = panel.schema();
    let mut lines = panel
        .rows()
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let cursor = if index == panel.cursor() { ">" } else { " " };
            let required = if schema.is_required(row.spec.field()) {
                "*"
            } else {
                ""
            };
            let hint = match row.spec {
                FilterFieldSpec::Exact { choices, .. } => format!("  (←/→ {})", choices.join("/")),
                FilterFieldSpec::Flag { .. } => "  (←/→ any/yes/no)".to_owned(),
                FilterFieldSpec::DateRange { .. } => "  (YYYY-MM-DD)".to_owned(),
                FilterFieldSpec::Substring { .. } => String::new(),
            };
            format!(
                "{cursor} {}{required}: {}{hint}",
                row.label(),
                panel.row_value(row)
            )
        })
        .collect::<Vec<_>>();

    if let Some(message) = panel.message() {
        lines.push(String::new());
        lines.push(format!("! {message}"));
    }
    lines.push(String::new());
    lines.push(
        "up/down field | type to edit | left/right choose | del clear field | ctrl+u clear inputs | enter apply | esc cancel"
            .to_owned(),
    );
    lines.join("\n")
}

fn help_overlay_text() -> &'static str {
    "global: ctrl+q quit | ? help\n\
nav: j/k/h/l g/G | f/b or tab/shift+tab reports | 1-9/0 jump to report | s/S sort | t summary scope\n\
nav: / filters | c clear filters | r reload | R seed reference data\n\
workflow: a toggle role | w submit write-off | x settle death case | X clear queue\n\
filters: up/down or tab field | type to edit | left/right choose | del clear field | ctrl+u clear inputs | enter apply | esc cancel"
}

fn status_text(state: &AppState, view_data: &ViewData) -> String {
    if view_data.help_visible {
        return String::new();
    }

    let (mode, default) = match state.mode {
        AppMode::Nav => (
            "NAV",
            "j/k/h/l | f/b reports | / filter c clear | s/S sort | t summary | r reload | ? help | ctrl+q",
        ),
        AppMode::Filter => ("FILTER", "enter apply | esc cancel | ctrl+u clear inputs"),
    };
    match &state.status_line {
        Some(status) => format!("{mode} | {status} | {default}"),
        None => format!("{mode} | {default}"),
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
