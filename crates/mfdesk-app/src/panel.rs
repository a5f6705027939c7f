// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::error::ValidationError;
use crate::filters::{FilterFieldSpec, FilterOptions, FilterSchema, FilterValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelVisibility {
    Closed,
    Open,
}

/// Which half of an input a panel row edits. Date ranges take two rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelPart {
    Value,
    From,
    To,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelRow {
    pub spec: &'static FilterFieldSpec,
    pub part: PanelPart,
}

impl PanelRow {
    pub fn label(&self) -> String {
        match self.part {
            PanelPart::Value => self.spec.label().to_owned(),
            PanelPart::From => format!("{} from", self.spec.label()),
            PanelPart::To => format!("{} to", self.spec.label()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelCommand {
    Open,
    Cancel,
    SetText { field: String, value: String },
    SetDateFrom { field: String, value: String },
    SetDateTo { field: String, value: String },
    SetFlag { field: String, value: Option<bool> },
    MoveCursor(isize),
    InsertChar(char),
    DeleteChar,
    ClearInput,
    ClearStaged,
    CycleChoice(isize),
    Submit,
    Clear,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelEvent {
    Opened,
    Closed,
    Staged(String),
    ValidationFailed(ValidationError),
    Applied(FilterOptions),
}

/// Filter inputs for one report. Edits are staged while open and only
/// reach the applied set through a validated submit or an explicit clear.
#[derive(Debug, Clone)]
pub struct FilterPanel {
    schema: FilterSchema,
    visibility: PanelVisibility,
    staged: FilterOptions,
    applied: FilterOptions,
    message: Option<String>,
    cursor: usize,
}

impl FilterPanel {
    pub fn new(schema: FilterSchema) -> Self {
        Self {
            schema,
            visibility: PanelVisibility::Closed,
            staged: blank_staged(schema, &FilterOptions::new()),
            applied: FilterOptions::new(),
            message: None,
            cursor: 0,
        }
    }

    pub fn schema(&self) -> FilterSchema {
        self.schema
    }

    pub fn visibility(&self) -> PanelVisibility {
        self.visibility
    }

    pub fn is_open(&self) -> bool {
        self.visibility == PanelVisibility::Open
    }

    pub fn staged(&self) -> &FilterOptions {
        &self.staged
    }

    pub fn applied(&self) -> &FilterOptions {
        &self.applied
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn rows(&self) -> Vec<PanelRow> {
        let mut rows = Vec::with_capacity(self.schema.fields.len() + 2);
        for spec in self.schema.fields {
            match spec {
                FilterFieldSpec::DateRange { .. } => {
                    rows.push(PanelRow {
                        spec,
                        part: PanelPart::From,
                    });
                    rows.push(PanelRow {
                        spec,
                        part: PanelPart::To,
                    });
                }
                _ => rows.push(PanelRow {
                    spec,
                    part: PanelPart::Value,
                }),
            }
        }
        rows
    }

    /// Text shown for a row's staged value.
    pub fn row_value(&self, row: &PanelRow) -> String {
        match (self.staged.get(row.spec.field()), row.part) {
            (Some(FilterValue::Contains(text) | FilterValue::Equals(text)), _) => text.clone(),
            (Some(FilterValue::Between { from, .. }), PanelPart::From) => from.clone(),
            (Some(FilterValue::Between { to, .. }), PanelPart::To) => to.clone(),
            (Some(FilterValue::Flag(Some(true))), _) => "yes".to_owned(),
            (Some(FilterValue::Flag(Some(false))), _) => "no".to_owned(),
            (Some(FilterValue::Flag(None)), _) => "any".to_owned(),
            _ => String::new(),
        }
    }

    pub fn dispatch(&mut self, command: PanelCommand) -> Vec<PanelEvent> {
        match command {
            PanelCommand::Open => {
                if self.is_open() {
                    return Vec::new();
                }
                self.visibility = PanelVisibility::Open;
                self.staged = blank_staged(self.schema, &self.applied);
                self.message = None;
                self.cursor = 0;
                vec![PanelEvent::Opened]
            }
            PanelCommand::Cancel => {
                if !self.is_open() {
                    return Vec::new();
                }
                self.visibility = PanelVisibility::Closed;
                self.staged = blank_staged(self.schema, &self.applied);
                self.message = None;
                vec![PanelEvent::Closed]
            }
            PanelCommand::Submit => self.submit(),
            PanelCommand::Clear => {
                self.staged = blank_staged(self.schema, &FilterOptions::new());
                self.applied = FilterOptions::new();
                self.message = None;
                vec![PanelEvent::Applied(FilterOptions::new())]
            }
            PanelCommand::ClearStaged => {
                if !self.is_open() {
                    return Vec::new();
                }
                self.staged = blank_staged(self.schema, &FilterOptions::new());
                self.message = None;
                Vec::new()
            }
            PanelCommand::MoveCursor(delta) => {
                let len = self.rows().len();
                if self.is_open() && len > 0 {
                    self.cursor = (self.cursor as isize + delta).clamp(0, len as isize - 1) as usize;
                }
                Vec::new()
            }
            edit => self.edit(edit),
        }
    }

    fn submit(&mut self) -> Vec<PanelEvent> {
        if !self.is_open() {
            return Vec::new();
        }
        match self.schema.validate(&self.staged) {
            Ok(options) => {
                self.applied = options.clone();
                self.visibility = PanelVisibility::Closed;
                self.message = None;
                vec![PanelEvent::Applied(options), PanelEvent::Closed]
            }
            Err(error) => {
                self.message = Some(error.to_string());
                vec![PanelEvent::ValidationFailed(error)]
            }
        }
    }

    fn edit(&mut self, command: PanelCommand) -> Vec<PanelEvent> {
        if !self.is_open() {
            return Vec::new();
        }
        let changed = match command {
            PanelCommand::SetText { field, value } => self.set_text(&field, value),
            PanelCommand::SetDateFrom { field, value } => {
                self.set_date(&field, PanelPart::From, value)
            }
            PanelCommand::SetDateTo { field, value } => self.set_date(&field, PanelPart::To, value),
            PanelCommand::SetFlag { field, value } => self.set_flag(&field, value),
            PanelCommand::InsertChar(ch) => self.edit_row_text(|text| text.push(ch)),
            PanelCommand::DeleteChar => self.edit_row_text(|text| {
                text.pop();
            }),
            PanelCommand::ClearInput => self.clear_row(),
            PanelCommand::CycleChoice(delta) => self.cycle_row(delta),
            _ => None,
        };
        match changed {
            Some(field) => {
                self.message = None;
                vec![PanelEvent::Staged(field)]
            }
            None => Vec::new(),
        }
    }

    fn set_text(&mut self, field: &str, value: String) -> Option<String> {
        let next = match self.schema.spec(field)? {
            FilterFieldSpec::Substring { .. } => FilterValue::Contains(value),
            FilterFieldSpec::Exact { .. } => FilterValue::Equals(value),
            _ => return None,
        };
        self.staged.insert(field, next);
        Some(field.to_owned())
    }

    fn set_date(&mut self, field: &str, part: PanelPart, value: String) -> Option<String> {
        let spec = self.schema.spec(field)?;
        if !matches!(spec, FilterFieldSpec::DateRange { .. }) {
            return None;
        }
        let mut current = match self.staged.get(field) {
            Some(range @ FilterValue::Between { .. }) => range.clone(),
            _ => spec.blank(),
        };
        if let FilterValue::Between { from, to } = &mut current {
            match part {
                PanelPart::From => *from = value,
                PanelPart::To => *to = value,
                PanelPart::Value => return None,
            }
        }
        self.staged.insert(field, current);
        Some(field.to_owned())
    }

    fn set_flag(&mut self, field: &str, value: Option<bool>) -> Option<String> {
        if !matches!(self.schema.spec(field)?, FilterFieldSpec::Flag { .. }) {
            return None;
        }
        self.staged.insert(field, FilterValue::Flag(value));
        Some(field.to_owned())
    }

    fn current_row(&self) -> Option<PanelRow> {
        self.rows().get(self.cursor).copied()
    }

    fn edit_row_text(&mut self, apply: impl FnOnce(&mut String)) -> Option<String> {
        let row = self.current_row()?;
        let field = row.spec.field();
        let mut text = self.row_value(&row);
        match (row.spec, row.part) {
            (FilterFieldSpec::Flag { .. }, _) => None,
            (FilterFieldSpec::DateRange { .. }, part) => {
                apply(&mut text);
                self.set_date(field, part, text)
            }
            _ => {
                apply(&mut text);
                self.set_text(field, text)
            }
        }
    }

    fn clear_row(&mut self) -> Option<String> {
        let row = self.current_row()?;
        let field = row.spec.field();
        match (row.spec, row.part) {
            (FilterFieldSpec::Flag { .. }, _) => self.set_flag(field, None),
            (FilterFieldSpec::DateRange { .. }, part) => self.set_date(field, part, String::new()),
            _ => self.set_text(field, String::new()),
        }
    }

    /// Steps through an exact input's choices (with a leading "any") or a
    /// flag's any/yes/no.
    fn cycle_row(&mut self, delta: isize) -> Option<String> {
        let row = self.current_row()?;
        let field = row.spec.field();
        match row.spec {
            FilterFieldSpec::Exact { choices, .. } if !choices.is_empty() => {
                let current = self.row_value(&row);
                let position = choices
                    .iter()
                    .position(|choice| *choice == current)
                    .map_or(0, |index| index + 1);
                let len = choices.len() as isize + 1;
                let next = (position as isize + delta).rem_euclid(len) as usize;
                let value = match next {
                    0 => String::new(),
                    index => choices[index - 1].to_owned(),
                };
                self.set_text(field, value)
            }
            FilterFieldSpec::Flag { .. } => {
                const STEPS: [Option<bool>; 3] = [None, Some(true), Some(false)];
                let current = match self.staged.get(field) {
                    Some(FilterValue::Flag(value)) => *value,
                    _ => None,
                };
                let position = STEPS.iter().position(|step| *step == current).unwrap_or(0);
                let next = (position as isize + delta).rem_euclid(STEPS.len() as isize) as usize;
                self.set_flag(field, STEPS[next])
            }
            _ => None,
        }
    }
}

/// The applied values for each schema input, blank where nothing applies.
fn blank_staged(schema: FilterSchema, applied: &FilterOptions) -> FilterOptions {
    let mut staged = FilterOptions::new();
    for spec in schema.fields {
        let value = applied
            .get(spec.field())
            .cloned()
            .unwrap_or_else(|| spec.blank());
        staged.insert(spec.field(), value);
    }
    staged
}

#[cfg(test)]
mod tests {
    use super::{FilterPanel, PanelCommand, PanelEvent, PanelVisibility};
    use crate::error::ValidationError;
    use crate::filters::{FilterOptions, FilterValue};
    use crate::model::ReportKind;
    use crate::reports::definition;

    fn collections_panel() -> FilterPanel {
        FilterPanel::new(definition(ReportKind::DueVsCollection).filters)
    }

    fn meetings_panel() -> FilterPanel {
        FilterPanel::new(definition(ReportKind::CenterMeeting).filters)
    }

    fn set_text(field: &str, value: &str) -> PanelCommand {
        PanelCommand::SetText {
            field: field.to_owned(),
            value: value.to_owned(),
        }
    }

    #[test]
    fn open_then_cancel_discards_staged_edits() {
        let mut panel = collections_panel();
        assert_eq!(panel.dispatch(PanelCommand::Open), vec![PanelEvent::Opened]);
        panel.dispatch(set_text("branch", "north"));
        assert_eq!(panel.dispatch(PanelCommand::Cancel), vec![PanelEvent::Closed]);

        assert_eq!(panel.visibility(), PanelVisibility::Closed);
        assert!(panel.applied().is_unconstrained());
        assert_eq!(
            panel.staged().get("branch"),
            Some(&FilterValue::contains(""))
        );
    }

    #[test]
    fn valid_submit_applies_and_closes() {
        let mut panel = collections_panel();
        panel.dispatch(PanelCommand::Open);
        panel.dispatch(set_text("branch", " north "));
        panel.dispatch(PanelCommand::SetDateFrom {
            field: "date".to_owned(),
            value: "2024-02-01".to_owned(),
        });
        panel.dispatch(PanelCommand::SetDateTo {
            field: "date".to_owned(),
            value: "2024-02-29".to_owned(),
        });

        let expected = FilterOptions::new()
            .with("branch", FilterValue::contains("north"))
            .with("date", FilterValue::between("2024-02-01", "2024-02-29"));
        assert_eq!(
            panel.dispatch(PanelCommand::Submit),
            vec![PanelEvent::Applied(expected.clone()), PanelEvent::Closed]
        );
        assert_eq!(panel.applied(), &expected);
        assert!(!panel.is_open());
    }

    #[test]
    fn missing_required_range_keeps_panel_open_and_applied_untouched() {
        let mut panel = meetings_panel();
        panel.dispatch(PanelCommand::Open);
        panel.dispatch(set_text("branch", "north"));

        let events = panel.dispatch(PanelCommand::Submit);
        assert_eq!(
            events,
            vec![PanelEvent::ValidationFailed(ValidationError::MissingRequired {
                label: "Meeting Date"
            })]
        );
        assert!(panel.is_open());
        assert!(panel.applied().is_unconstrained());
        assert!(panel.message().is_some_and(|message| message.contains("required")));
    }

    #[test]
    fn inverted_range_is_rejected() {
        let mut panel = collections_panel();
        panel.dispatch(PanelCommand::Open);
        panel.dispatch(PanelCommand::SetDateFrom {
            field: "date".to_owned(),
            value: "2024-03-01".to_owned(),
        });
        panel.dispatch(PanelCommand::SetDateTo {
            field: "date".to_owned(),
            value: "2024-01-01".to_owned(),
        });
        assert_eq!(
            panel.dispatch(PanelCommand::Submit),
            vec![PanelEvent::ValidationFailed(ValidationError::InvertedRange {
                label: "Date"
            })]
        );
        assert!(panel.is_open());
    }

    #[test]
    fn editing_clears_previous_validation_message() {
        let mut panel = meetings_panel();
        panel.dispatch(PanelCommand::Open);
        panel.dispatch(PanelCommand::Submit);
        assert!(panel.message().is_some());
        panel.dispatch(set_text("officer", "ravi"));
        assert!(panel.message().is_none());
    }

    #[test]
    fn clear_resets_and_emits_empty_options() {
        let mut panel = collections_panel();
        panel.dispatch(PanelCommand::Open);
        panel.dispatch(set_text("collection_type", "cash"));
        panel.dispatch(PanelCommand::Submit);
        assert_eq!(panel.applied().active_count(), 1);

        assert_eq!(
            panel.dispatch(PanelCommand::Clear),
            vec![PanelEvent::Applied(FilterOptions::new())]
        );
        assert!(panel.applied().is_unconstrained());
        assert_eq!(
            panel.staged().get("collection_type"),
            Some(&FilterValue::equals(""))
        );
    }

    #[test]
    fn clear_staged_keeps_applied_options() {
        let mut panel = collections_panel();
        panel.dispatch(PanelCommand::Open);
        panel.dispatch(set_text("branch", "north"));
        panel.dispatch(PanelCommand::Submit);
        let applied = panel.applied().clone();

        panel.dispatch(PanelCommand::Open);
        panel.dispatch(set_text("collection_type", "cash"));
        assert!(panel.dispatch(PanelCommand::ClearStaged).is_empty());
        assert!(panel.is_open());
        assert_eq!(panel.staged().get("branch"), Some(&FilterValue::contains("")));
        assert_eq!(
            panel.staged().get("collection_type"),
            Some(&FilterValue::equals(""))
        );
        assert_eq!(panel.applied(), &applied);
    }

    #[test]
    fn reopening_shows_applied_values() {
        let mut panel = collections_panel();
        panel.dispatch(PanelCommand::Open);
        panel.dispatch(set_text("branch", "south"));
        panel.dispatch(PanelCommand::Submit);
        panel.dispatch(PanelCommand::Open);
        let rows = panel.rows();
        assert_eq!(panel.row_value(&rows[0]), "south");
    }

    #[test]
    fn edits_are_ignored_while_closed() {
        let mut panel = collections_panel();
        assert!(panel.dispatch(set_text("branch", "north")).is_empty());
        assert!(panel.dispatch(PanelCommand::Submit).is_empty());
        assert_eq!(panel.staged().get("branch"), Some(&FilterValue::contains("")));
    }

    #[test]
    fn typing_edits_the_row_under_the_cursor() {
        let mut panel = collections_panel();
        panel.dispatch(PanelCommand::Open);
        for ch in "nort".chars() {
            panel.dispatch(PanelCommand::InsertChar(ch));
        }
        panel.dispatch(PanelCommand::DeleteChar);
        panel.dispatch(PanelCommand::InsertChar('t'));
        assert_eq!(panel.staged().get("branch"), Some(&FilterValue::contains("nort")));

        // rows: branch, bc partner, collection type, date from, date to
        panel.dispatch(PanelCommand::MoveCursor(3));
        for ch in "2024-02-01".chars() {
            panel.dispatch(PanelCommand::InsertChar(ch));
        }
        assert_eq!(
            panel.staged().get("date"),
            Some(&FilterValue::between("2024-02-01", ""))
        );

        panel.dispatch(PanelCommand::MoveCursor(10));
        assert_eq!(panel.cursor(), 4);
        panel.dispatch(PanelCommand::ClearInput);
        panel.dispatch(PanelCommand::MoveCursor(-1));
        panel.dispatch(PanelCommand::ClearInput);
        assert_eq!(panel.staged().get("date"), Some(&FilterValue::between("", "")));
    }

    #[test]
    fn cycle_choice_walks_choices_with_leading_any() {
        let mut panel = collections_panel();
        panel.dispatch(PanelCommand::Open);
        panel.dispatch(PanelCommand::MoveCursor(2));
        panel.dispatch(PanelCommand::CycleChoice(1));
        assert_eq!(
            panel.staged().get("collection_type"),
            Some(&FilterValue::equals("cash"))
        );
        panel.dispatch(PanelCommand::CycleChoice(-1));
        panel.dispatch(PanelCommand::CycleChoice(-1));
        assert_eq!(
            panel.staged().get("collection_type"),
            Some(&FilterValue::equals("bank-transfer"))
        );
    }

    #[test]
    fn cycle_flag_steps_any_yes_no() {
        let mut panel = FilterPanel::new(definition(ReportKind::ApplicationVerification).filters);
        panel.dispatch(PanelCommand::Open);
        panel.dispatch(PanelCommand::MoveCursor(2));
        panel.dispatch(PanelCommand::CycleChoice(1));
        assert_eq!(panel.staged().get("queued"), Some(&FilterValue::Flag(Some(true))));
        panel.dispatch(PanelCommand::CycleChoice(1));
        assert_eq!(panel.staged().get("queued"), Some(&FilterValue::Flag(Some(false))));
        panel.dispatch(PanelCommand::CycleChoice(1));
        assert_eq!(panel.staged().get("queued"), Some(&FilterValue::Flag(None)));
    }
}
