use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::task::{parse_due_date, Priority, Task, DUE_DATE_FORMAT};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKind {
    NewTask,
    EditTask,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorFieldId {
    Title,
    DueDate,
    Priority,
    Category,
    Description,
}

#[derive(Debug, Clone)]
pub struct EditorField {
    pub id: EditorFieldId,
    pub label: &'static str,
    pub value: String,
    pub required: bool,
}

/// What a validated form submission boils down to.
#[derive(Debug, Clone)]
pub struct EditorSubmit {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub category: String,
    pub due_date: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    None,
    Cancel,
    Submit,
    OpenPriorityPicker,
    OpenDescriptionEditor,
}

/// Field-based form state for the create and edit views. Validation is
/// field-scoped and runs before anything leaves the process.
#[derive(Debug, Clone)]
pub struct EditorState {
    kind: EditorKind,
    fields: Vec<EditorField>,
    active: usize,
    confirming: bool,
    error: Option<String>,
    task_id: Option<String>,
}

impl EditorState {
    pub fn new_task(default_priority: Priority) -> Self {
        Self {
            kind: EditorKind::NewTask,
            fields: vec![
                EditorField {
                    id: EditorFieldId::Title,
                    label: "Title",
                    value: String::new(),
                    required: true,
                },
                EditorField {
                    id: EditorFieldId::DueDate,
                    label: "Due date",
                    value: String::new(),
                    required: true,
                },
                EditorField {
                    id: EditorFieldId::Priority,
                    label: "Priority",
                    value: default_priority.as_str().to_string(),
                    required: false,
                },
                EditorField {
                    id: EditorFieldId::Category,
                    label: "Category",
                    value: String::new(),
                    required: false,
                },
                EditorField {
                    id: EditorFieldId::Description,
                    label: "Description",
                    value: String::new(),
                    required: false,
                },
            ],
            active: 0,
            confirming: false,
            error: None,
            task_id: None,
        }
    }

    pub fn edit_task(task: &Task) -> Self {
        Self {
            kind: EditorKind::EditTask,
            fields: vec![
                EditorField {
                    id: EditorFieldId::Title,
                    label: "Title",
                    value: task.title.clone(),
                    required: true,
                },
                EditorField {
                    id: EditorFieldId::DueDate,
                    label: "Due date",
                    value: task.due_date.format(DUE_DATE_FORMAT).to_string(),
                    required: true,
                },
                EditorField {
                    id: EditorFieldId::Priority,
                    label: "Priority",
                    value: task.priority.as_str().to_string(),
                    required: false,
                },
                EditorField {
                    id: EditorFieldId::Category,
                    label: "Category",
                    value: task.category.clone(),
                    required: false,
                },
                EditorField {
                    id: EditorFieldId::Description,
                    label: "Description",
                    value: task.description.clone(),
                    required: false,
                },
            ],
            active: 0,
            confirming: false,
            error: None,
            task_id: Some(task.id.clone()),
        }
    }

    pub fn kind(&self) -> EditorKind {
        self.kind
    }

    pub fn task_id(&self) -> Option<&str> {
        self.task_id.as_deref()
    }

    pub fn fields(&self) -> &[EditorField] {
        &self.fields
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn confirming(&self) -> bool {
        self.confirming
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_error(&mut self, message: String) {
        self.error = Some(message);
        self.confirming = false;
    }

    pub fn field_value(&self, id: EditorFieldId) -> &str {
        self.fields
            .iter()
            .find(|field| field.id == id)
            .map(|field| field.value.as_str())
            .unwrap_or("")
    }

    pub fn set_field_value(&mut self, id: EditorFieldId, value: String) {
        if let Some(field) = self.fields.iter_mut().find(|field| field.id == id) {
            field.value = value;
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> EditorAction {
        if self.confirming {
            return self.handle_confirm_key(key);
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('u') => {
                    if let Some(field) = self.current_field_mut() {
                        field.value.clear();
                    }
                    self.error = None;
                }
                KeyCode::Char('p') => return EditorAction::OpenPriorityPicker,
                KeyCode::Char('e') => return EditorAction::OpenDescriptionEditor,
                _ => {}
            }
            return EditorAction::None;
        }

        match key.code {
            KeyCode::Esc => return EditorAction::Cancel,
            KeyCode::Tab | KeyCode::Down => {
                self.move_active(1);
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.move_active(-1);
            }
            KeyCode::Enter => {
                if self.active + 1 >= self.fields.len() {
                    return self.attempt_confirm();
                }
                self.move_active(1);
            }
            KeyCode::Backspace => {
                if let Some(field) = self.current_field_mut() {
                    field.value.pop();
                }
            }
            KeyCode::Char(ch) => {
                if !ch.is_control() {
                    if let Some(field) = self.current_field_mut() {
                        field.value.push(ch);
                    }
                }
            }
            _ => {}
        }

        self.error = None;
        EditorAction::None
    }

    pub fn build_submit(&self) -> Result<EditorSubmit, String> {
        self.validate()?;
        let title = self.field_value(EditorFieldId::Title).trim().to_string();
        let due_date = parse_due_date(self.field_value(EditorFieldId::DueDate))
            .map_err(|err| err.to_string())?;
        let priority = match non_empty(self.field_value(EditorFieldId::Priority)) {
            Some(raw) => raw.parse::<Priority>().map_err(|err| err.to_string())?,
            None => Priority::Medium,
        };
        let category = self.field_value(EditorFieldId::Category).trim().to_string();
        let description = self
            .field_value(EditorFieldId::Description)
            .trim()
            .to_string();

        Ok(EditorSubmit {
            title,
            description,
            priority,
            category,
            due_date,
        })
    }

    fn attempt_confirm(&mut self) -> EditorAction {
        match self.validate() {
            Ok(()) => {
                self.confirming = true;
                EditorAction::None
            }
            Err(err) => {
                self.error = Some(err);
                self.confirming = false;
                EditorAction::None
            }
        }
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) -> EditorAction {
        match key.code {
            KeyCode::Esc => EditorAction::Cancel,
            KeyCode::Backspace | KeyCode::Char('e') => {
                self.confirming = false;
                self.error = None;
                EditorAction::None
            }
            KeyCode::Char('y') | KeyCode::Enter => EditorAction::Submit,
            _ => EditorAction::None,
        }
    }

    fn validate(&self) -> Result<(), String> {
        if self.field_value(EditorFieldId::Title).trim().is_empty() {
            return Err("title is required".to_string());
        }
        let due = self.field_value(EditorFieldId::DueDate).trim();
        if due.is_empty() {
            return Err("due date is required".to_string());
        }
        if NaiveDate::parse_from_str(due, DUE_DATE_FORMAT).is_err() {
            return Err("due date must be YYYY-MM-DD".to_string());
        }
        if let Some(priority) = non_empty(self.field_value(EditorFieldId::Priority)) {
            if priority.parse::<Priority>().is_err() {
                return Err("priority must be low, medium, or high".to_string());
            }
        }
        Ok(())
    }

    fn move_active(&mut self, delta: isize) {
        let len = self.fields.len() as isize;
        if len == 0 {
            self.active = 0;
            return;
        }
        let next = (self.active as isize + delta).rem_euclid(len);
        self.active = next as usize;
    }

    fn current_field_mut(&mut self) -> Option<&mut EditorField> {
        self.fields.get_mut(self.active)
    }
}

#[derive(Debug, Clone)]
pub struct PriorityPicker {
    options: [Priority; 3],
    selected: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorityAction {
    None,
    Cancel,
    Confirm,
}

impl PriorityPicker {
    pub fn new(current: Priority) -> Self {
        let options = Priority::ALL;
        let selected = options
            .iter()
            .position(|value| *value == current)
            .unwrap_or(1);
        Self { options, selected }
    }

    pub fn options(&self) -> &[Priority] {
        &self.options
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_priority(&self) -> Priority {
        self.options[self.selected]
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> PriorityAction {
        match key.code {
            KeyCode::Esc => return PriorityAction::Cancel,
            KeyCode::Enter => return PriorityAction::Confirm,
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Char(ch) if ch.is_ascii_digit() => {
                if let Some(idx) = ch.to_digit(10) {
                    let idx = idx as usize;
                    if (1..=self.options.len()).contains(&idx) {
                        self.selected = idx - 1;
                    }
                }
            }
            _ => {}
        }
        PriorityAction::None
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.options.len() as isize;
        let next = (self.selected as isize + delta).rem_euclid(len);
        self.selected = next as usize;
    }
}

/// Picker over "all" plus the categories currently in use, for the list
/// filter.
#[derive(Debug, Clone)]
pub struct CategoryPicker {
    options: Vec<Option<String>>,
    selected: usize,
}

impl CategoryPicker {
    pub fn new(categories: Vec<String>, current: Option<&str>) -> Self {
        let mut options: Vec<Option<String>> = vec![None];
        options.extend(categories.into_iter().map(Some));
        let selected = current
            .and_then(|wanted| {
                options
                    .iter()
                    .position(|option| option.as_deref() == Some(wanted))
            })
            .unwrap_or(0);
        Self { options, selected }
    }

    pub fn options(&self) -> &[Option<String>] {
        &self.options
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_category(&self) -> Option<&str> {
        self.options[self.selected].as_deref()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> PriorityAction {
        match key.code {
            KeyCode::Esc => return PriorityAction::Cancel,
            KeyCode::Enter => return PriorityAction::Confirm,
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            _ => {}
        }
        PriorityAction::None
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.options.len() as isize;
        let next = (self.selected as isize + delta).rem_euclid(len);
        self.selected = next as usize;
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press_enter_through(editor: &mut EditorState) {
        for _ in 0..editor.fields().len() {
            let action = editor.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
            assert_eq!(action, EditorAction::None);
        }
    }

    #[test]
    fn editor_requires_title() {
        let mut editor = EditorState::new_task(Priority::Medium);
        press_enter_through(&mut editor);
        assert_eq!(editor.error(), Some("title is required"));
        assert!(!editor.confirming());
    }

    #[test]
    fn editor_requires_due_date() {
        let mut editor = EditorState::new_task(Priority::Medium);
        editor.set_field_value(EditorFieldId::Title, "Buy milk".to_string());
        press_enter_through(&mut editor);
        assert_eq!(editor.error(), Some("due date is required"));
    }

    #[test]
    fn editor_rejects_malformed_due_date() {
        let mut editor = EditorState::new_task(Priority::Medium);
        editor.set_field_value(EditorFieldId::Title, "Buy milk".to_string());
        editor.set_field_value(EditorFieldId::DueDate, "tomorrow".to_string());
        press_enter_through(&mut editor);
        assert_eq!(editor.error(), Some("due date must be YYYY-MM-DD"));
    }

    #[test]
    fn valid_form_confirms_then_submits() {
        let mut editor = EditorState::new_task(Priority::High);
        editor.set_field_value(EditorFieldId::Title, "  Buy milk  ".to_string());
        editor.set_field_value(EditorFieldId::DueDate, "2025-01-01".to_string());
        press_enter_through(&mut editor);
        assert!(editor.confirming());
        let action = editor.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        assert_eq!(action, EditorAction::Submit);
        let submit = editor.build_submit().expect("submit");
        assert_eq!(submit.title, "Buy milk");
        assert_eq!(submit.priority, Priority::High);
        assert_eq!(submit.due_date.to_string(), "2025-01-01");
    }

    #[test]
    fn edit_form_prefills_from_task() {
        let task: crate::task::Task = serde_json::from_str(
            r#"{
                "id": "1",
                "title": "Call plumber",
                "description": "kitchen sink",
                "priority": "high",
                "category": "home",
                "dueDate": "2025-03-04",
                "completed": false,
                "createdAt": "2025-01-01T00:00:00Z"
            }"#,
        )
        .expect("task");
        let editor = EditorState::edit_task(&task);
        assert_eq!(editor.kind(), EditorKind::EditTask);
        assert_eq!(editor.task_id(), Some("1"));
        assert_eq!(editor.field_value(EditorFieldId::DueDate), "2025-03-04");
        assert_eq!(editor.field_value(EditorFieldId::Priority), "high");
    }

    #[test]
    fn priority_picker_selects_current() {
        let picker = PriorityPicker::new(Priority::High);
        assert_eq!(picker.selected_priority(), Priority::High);
    }

    #[test]
    fn category_picker_leads_with_all() {
        let picker = CategoryPicker::new(vec!["work".to_string()], Some("work"));
        assert_eq!(picker.selected_category(), Some("work"));
        let cleared = CategoryPicker::new(vec!["work".to_string()], None);
        assert_eq!(cleared.selected_category(), None);
    }
}
