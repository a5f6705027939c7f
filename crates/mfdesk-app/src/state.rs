// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{AppMode, ReportKind, SummaryScope};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub mode: AppMode,
    pub active_report: ReportKind,
    pub summary_scope: SummaryScope,
    pub status_line: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            mode: AppMode::Nav,
            active_report: ReportKind::Roles,
            summary_scope: SummaryScope::default(),
            status_line: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    NextReport,
    PrevReport,
    SelectReport(ReportKind),
    OpenFilters,
    CloseFilters,
    ToggleSummaryScope,
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    ModeChanged(AppMode),
    ReportChanged(ReportKind),
    SummaryScopeChanged(SummaryScope),
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::NextReport => self.rotate_report(1),
            AppCommand::PrevReport => self.rotate_report(-1),
            AppCommand::SelectReport(kind) => {
                if kind == self.active_report {
                    return Vec::new();
                }
                self.active_report = kind;
                self.mode = AppMode::Nav;
                vec![AppEvent::ReportChanged(kind)]
            }
            AppCommand::OpenFilters => {
                self.mode = AppMode::Filter;
                vec![AppEvent::ModeChanged(self.mode)]
            }
            AppCommand::CloseFilters => {
                self.mode = AppMode::Nav;
                vec![AppEvent::ModeChanged(self.mode)]
            }
            AppCommand::ToggleSummaryScope => {
                self.summary_scope = self.summary_scope.toggled();
                let label = match self.summary_scope {
                    SummaryScope::Filtered => "summary: filtered",
                    SummaryScope::All => "summary: all records",
                };
                vec![
                    AppEvent::SummaryScopeChanged(self.summary_scope),
                    self.set_status(label),
                ]
            }
            AppCommand::SetStatus(message) => vec![self.set_status(&message)],
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    fn rotate_report(&mut self, delta: isize) -> Vec<AppEvent> {
        let reports = ReportKind::ALL;
        let current = reports
            .iter()
            .position(|kind| *kind == self.active_report)
            .unwrap_or(0) as isize;
        let len = reports.len() as isize;
        let next = (current + delta).rem_euclid(len) as usize;
        self.active_report = reports[next];
        self.mode = AppMode::Nav;
        vec![AppEvent::ReportChanged(self.active_report)]
    }

    fn set_status(&mut self, message: &str) -> AppEvent {
        self.status_line = Some(message.to_owned());
        AppEvent::StatusUpdated(message.to_owned())
    }
}
