use std::collections::HashMap;
use std::fs;
use std::io;
use std::io::Write;
use std::process::Command;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tempfile::NamedTempFile;

use crate::config::Config;
use crate::error::Result;
use crate::gateway::TaskGateway;
use crate::task::{Priority, Task, TaskDraft};

use super::actions;
use super::editor::{
    CategoryPicker, EditorAction, EditorFieldId, EditorKind, EditorState, PriorityAction,
    PriorityPicker,
};
use super::model;
use super::view;

const EVENT_POLL_MS: u64 = 120;

/// Requests serviced by the gateway worker. Mutations carry a sequence
/// number so late completions can be told apart from current ones.
enum ApiRequest {
    Load { generation: u64 },
    Create { seq: u64, draft: TaskDraft },
    Update { seq: u64, id: String, draft: TaskDraft },
    Delete { seq: u64, id: String },
    Toggle { seq: u64, id: String },
}

/// Completions delivered back to the event loop. Failures cross the
/// channel as display strings; the collection is only touched on success.
enum UiMsg {
    Loaded {
        generation: u64,
        result: std::result::Result<Vec<Task>, String>,
    },
    Created {
        seq: u64,
        result: std::result::Result<Task, String>,
    },
    Updated {
        seq: u64,
        id: String,
        result: std::result::Result<Task, String>,
    },
    Deleted {
        seq: u64,
        id: String,
        result: std::result::Result<(), String>,
    },
    Toggled {
        seq: u64,
        id: String,
        result: std::result::Result<Task, String>,
    },
}

#[derive(Clone, Copy)]
pub(crate) enum StatusKind {
    Error,
    Info,
}

/// Which screen the dashboard is on. The delete confirmation is an overlay
/// on top of whichever view is active, not a fifth state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ViewMode {
    List,
    Create,
    Detail,
    Edit,
}

pub(crate) struct DeleteConfirmState {
    pub(crate) task_id: String,
    pub(crate) title: String,
    pub(crate) pending: Option<u64>,
}

pub struct AppState {
    pub(crate) tasks: Vec<Task>,
    pub(crate) filtered: Vec<usize>,
    pub(crate) selected: Option<usize>,
    pub(crate) view: ViewMode,
    pub(crate) search: String,
    pub(crate) search_active: bool,
    pub(crate) priority_filter: Option<Priority>,
    pub(crate) category_filter: Option<String>,
    pub(crate) editor: Option<EditorState>,
    pub(crate) editor_priority_picker: Option<PriorityPicker>,
    pub(crate) category_picker: Option<CategoryPicker>,
    pub(crate) delete_confirm: Option<DeleteConfirmState>,
    pub(crate) loading: bool,
    status_message: Option<String>,
    info_message: Option<String>,
    viewport_height: u16,
    config: Config,
    // Request fencing: only the newest response per entity is applied.
    next_seq: u64,
    inflight: HashMap<String, u64>,
    load_generation: u64,
    pending_create: Option<u64>,
    pending_update: Option<u64>,
}

impl AppState {
    fn new(config: Config) -> Self {
        Self {
            tasks: Vec::new(),
            filtered: Vec::new(),
            selected: None,
            view: ViewMode::List,
            search: String::new(),
            search_active: false,
            priority_filter: None,
            category_filter: None,
            editor: None,
            editor_priority_picker: None,
            category_picker: None,
            delete_confirm: None,
            loading: false,
            status_message: None,
            info_message: None,
            viewport_height: 0,
            config,
            next_seq: 0,
            inflight: HashMap::new(),
            load_generation: 0,
            pending_create: None,
            pending_update: None,
        }
    }

    fn update_viewport(&mut self, height: u16) {
        self.viewport_height = height;
    }

    pub(crate) fn selected_task(&self) -> Option<&Task> {
        self.selected.and_then(|idx| self.tasks.get(idx))
    }

    pub(crate) fn categories(&self) -> Vec<String> {
        model::distinct_categories(&self.tasks)
    }

    pub(crate) fn status_line(&self) -> Option<(String, StatusKind)> {
        if let Some(message) = self.status_message.as_ref() {
            return Some((message.clone(), StatusKind::Error));
        }
        if let Some(info) = self.info_message.as_ref() {
            return Some((info.clone(), StatusKind::Info));
        }
        let mut segments = Vec::new();
        if !self.search.is_empty() {
            segments.push(format!("search: {}", self.search));
        }
        if let Some(priority) = self.priority_filter {
            segments.push(format!("priority: {priority}"));
        }
        if let Some(category) = self.category_filter.as_ref() {
            segments.push(format!("category: {category}"));
        }
        if segments.is_empty() {
            None
        } else {
            Some((segments.join("  "), StatusKind::Info))
        }
    }

    pub(crate) fn footer_hint(&self) -> String {
        if self.delete_confirm.is_some() {
            return "y confirm delete  esc cancel".to_string();
        }
        if self.category_picker.is_some() || self.editor_priority_picker.is_some() {
            return "j/k move  enter apply  esc cancel".to_string();
        }
        if let Some(editor) = self.editor.as_ref() {
            if editor.confirming() {
                return "enter/y save  e edit more  esc cancel".to_string();
            }
            return "enter next  tab/shift-tab move  ^p priority  ^e description  esc cancel"
                .to_string();
        }
        if self.search_active {
            return "type to search  backspace delete  enter done  esc clear".to_string();
        }
        match self.view {
            ViewMode::Detail => {
                "e edit  space toggle  d delete  esc/q back".to_string()
            }
            _ => {
                "j/k move  enter details  n new  space toggle  d delete  / search  p priority  c category  r reload  q quit"
                    .to_string()
            }
        }
    }

    pub(crate) fn task_count_summary(&self) -> String {
        let total = self.tasks.len();
        let completed = self.tasks.iter().filter(|task| task.completed).count();
        let pending = total - completed;
        if self.filtered.len() != total {
            format!(
                "showing: {}/{total}  pending: {pending}  completed: {completed}",
                self.filtered.len()
            )
        } else {
            format!("total: {total}  pending: {pending}  completed: {completed}")
        }
    }

    /// Recompute visibility and display order, keeping the selection on the
    /// same task when it is still visible.
    fn apply_filter(&mut self, previous_id: Option<String>) {
        self.filtered = model::filter_task_indices(
            &self.tasks,
            &self.search,
            self.priority_filter,
            self.category_filter.as_deref(),
        );
        model::sort_task_indices(&self.tasks, &mut self.filtered);
        self.selected = model::select_by_id(&self.tasks, &self.filtered, previous_id.as_deref());
        if self.selected.is_none() && matches!(self.view, ViewMode::Detail | ViewMode::Edit) {
            self.view = ViewMode::List;
            self.editor = None;
        }
    }

    fn move_selection(&mut self, delta: isize) {
        if self.filtered.is_empty() {
            self.selected = None;
            return;
        }
        let current_pos = self
            .selected
            .and_then(|idx| self.filtered.iter().position(|candidate| *candidate == idx))
            .unwrap_or(0);
        let max = self.filtered.len().saturating_sub(1);
        let next = (current_pos as isize + delta).clamp(0, max as isize) as usize;
        self.selected = Some(self.filtered[next]);
    }

    fn set_error(&mut self, message: String) {
        self.status_message = Some(message);
        self.info_message = None;
    }

    fn set_info(&mut self, message: String) {
        self.info_message = Some(message);
        self.status_message = None;
    }

    /// Every attempted operation starts with a clean message line.
    fn begin_operation(&mut self) {
        self.status_message = None;
        self.info_message = None;
    }

    fn next_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    fn issue_load(&mut self, req_tx: &Sender<ApiRequest>) {
        self.begin_operation();
        self.loading = true;
        self.load_generation += 1;
        let _ = req_tx.send(ApiRequest::Load {
            generation: self.load_generation,
        });
    }

    fn issue_create(&mut self, req_tx: &Sender<ApiRequest>, draft: TaskDraft) {
        self.begin_operation();
        let seq = self.next_seq();
        self.pending_create = Some(seq);
        let _ = req_tx.send(ApiRequest::Create { seq, draft });
    }

    fn issue_update(&mut self, req_tx: &Sender<ApiRequest>, id: String, draft: TaskDraft) {
        self.begin_operation();
        let seq = self.next_seq();
        self.pending_update = Some(seq);
        self.inflight.insert(id.clone(), seq);
        let _ = req_tx.send(ApiRequest::Update { seq, id, draft });
    }

    fn issue_delete(&mut self, req_tx: &Sender<ApiRequest>, id: String) -> u64 {
        self.begin_operation();
        let seq = self.next_seq();
        self.inflight.insert(id.clone(), seq);
        let _ = req_tx.send(ApiRequest::Delete { seq, id });
        seq
    }

    fn issue_toggle(&mut self, req_tx: &Sender<ApiRequest>, id: String) {
        self.begin_operation();
        let seq = self.next_seq();
        self.inflight.insert(id.clone(), seq);
        let _ = req_tx.send(ApiRequest::Toggle { seq, id });
    }

    /// True when `seq` is still the newest request issued for `id`.
    fn is_current(&self, id: &str, seq: u64) -> bool {
        self.inflight.get(id) == Some(&seq)
    }

    fn list_jump(&self) -> isize {
        let mut height = self.viewport_height.saturating_sub(4);
        if self.search_active || !self.search.is_empty() {
            height = height.saturating_sub(2);
        }
        let jump = (height / 2).max(1);
        jump as isize
    }
}

/// Run the dashboard against the given gateway until the user quits.
pub fn run(gateway: TaskGateway, config: Config) -> Result<()> {
    let (ui_tx, ui_rx) = mpsc::channel();
    let (req_tx, req_rx) = mpsc::channel();

    spawn_worker(gateway, req_rx, ui_tx);

    let mut app = AppState::new(config);
    app.issue_load(&req_tx);
    run_terminal(&mut app, ui_rx, req_tx)
}

fn run_terminal(
    app: &mut AppState,
    ui_rx: Receiver<UiMsg>,
    req_tx: Sender<ApiRequest>,
) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    let size = terminal.size()?;
    app.update_viewport(size.height);

    let result = run_loop(&mut terminal, app, ui_rx, req_tx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
    ui_rx: Receiver<UiMsg>,
    req_tx: Sender<ApiRequest>,
) -> Result<()> {
    let mut dirty = true;
    loop {
        while let Ok(msg) = ui_rx.try_recv() {
            handle_ui_msg(app, msg);
            dirty = true;
        }

        if dirty {
            terminal.draw(|frame| {
                app.update_viewport(frame.size().height);
                view::render(frame, app);
            })?;
            dirty = false;
        }

        if event::poll(Duration::from_millis(EVENT_POLL_MS))? {
            match event::read()? {
                Event::Key(key) => {
                    if handle_key(terminal, app, key, &req_tx) {
                        break;
                    }
                    dirty = true;
                }
                Event::Resize(_, height) => {
                    app.update_viewport(height);
                    dirty = true;
                }
                _ => {}
            }
        }
    }
    Ok(())
}

fn handle_ui_msg(app: &mut AppState, msg: UiMsg) {
    match msg {
        UiMsg::Loaded { generation, result } => {
            if generation != app.load_generation {
                return;
            }
            app.loading = false;
            match result {
                Ok(tasks) => {
                    let previous_id = app.selected_task().map(|task| task.id.clone());
                    app.tasks = tasks;
                    app.inflight.clear();
                    app.apply_filter(previous_id);
                }
                Err(err) => {
                    app.set_error(format!("load failed: {err}"));
                }
            }
        }
        UiMsg::Created { seq, result } => {
            let for_editor = app.pending_create == Some(seq);
            if for_editor {
                app.pending_create = None;
            }
            match result {
                Ok(task) => {
                    let previous_id = Some(task.id.clone());
                    model::prepend_task(&mut app.tasks, task);
                    if for_editor && app.view == ViewMode::Create {
                        app.editor = None;
                        app.view = ViewMode::List;
                    }
                    app.apply_filter(previous_id);
                    app.set_info("task created".to_string());
                }
                Err(err) => {
                    if for_editor {
                        if let Some(editor) = app.editor.as_mut() {
                            editor.set_error(err);
                            return;
                        }
                    }
                    app.set_error(format!("create failed: {err}"));
                }
            }
        }
        UiMsg::Updated { seq, id, result } => {
            if !app.is_current(&id, seq) {
                return;
            }
            app.inflight.remove(&id);
            let for_editor = app.pending_update == Some(seq);
            if for_editor {
                app.pending_update = None;
            }
            match result {
                Ok(task) => {
                    model::replace_task(&mut app.tasks, task);
                    if for_editor && app.view == ViewMode::Edit {
                        app.editor = None;
                        app.view = ViewMode::List;
                        app.selected = None;
                    }
                    app.apply_filter(None);
                    app.set_info("task updated".to_string());
                }
                Err(err) => {
                    if for_editor {
                        if let Some(editor) = app.editor.as_mut() {
                            editor.set_error(err);
                            return;
                        }
                    }
                    app.set_error(format!("update failed: {err}"));
                }
            }
        }
        UiMsg::Deleted { seq, id, result } => {
            if !app.is_current(&id, seq) {
                return;
            }
            app.inflight.remove(&id);
            app.delete_confirm = None;
            match result {
                Ok(()) => {
                    let selected_id = app.selected_task().map(|task| task.id.clone());
                    model::remove_task(&mut app.tasks, &id);
                    let previous_id = if selected_id.as_deref() == Some(id.as_str()) {
                        app.selected = None;
                        app.view = ViewMode::List;
                        app.editor = None;
                        None
                    } else {
                        selected_id
                    };
                    app.apply_filter(previous_id);
                    app.set_info("task deleted".to_string());
                }
                Err(err) => {
                    app.set_error(format!("delete failed: {err}"));
                }
            }
        }
        UiMsg::Toggled { seq, id, result } => {
            if !app.is_current(&id, seq) {
                return;
            }
            app.inflight.remove(&id);
            match result {
                Ok(task) => {
                    let previous_id = app.selected_task().map(|t| t.id.clone());
                    model::replace_task(&mut app.tasks, task);
                    app.apply_filter(previous_id);
                }
                Err(err) => {
                    app.set_error(format!("toggle failed: {err}"));
                }
            }
        }
    }
}

fn handle_key(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
    key: KeyEvent,
    req_tx: &Sender<ApiRequest>,
) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }

    if let Some(confirm) = app.delete_confirm.as_ref() {
        if confirm.pending.is_some() {
            // Waiting on the server; only the response clears the overlay.
            return false;
        }
        let task_id = confirm.task_id.clone();
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => {
                let seq = app.issue_delete(req_tx, task_id);
                if let Some(confirm) = app.delete_confirm.as_mut() {
                    confirm.pending = Some(seq);
                }
            }
            KeyCode::Char('n') | KeyCode::Char('q') | KeyCode::Esc => {
                app.delete_confirm = None;
                app.set_info("cancelled".to_string());
            }
            _ => {}
        }
        return false;
    }

    if app.category_picker.is_some() {
        let mut picker = app.category_picker.take().expect("picker present");
        match picker.handle_key(key) {
            PriorityAction::None => {
                app.category_picker = Some(picker);
            }
            PriorityAction::Cancel => {}
            PriorityAction::Confirm => {
                app.category_filter = picker.selected_category().map(|value| value.to_string());
                let previous = app.selected_task().map(|task| task.id.clone());
                app.apply_filter(previous);
            }
        }
        return false;
    }

    if app.editor_priority_picker.is_some() {
        let mut picker = app.editor_priority_picker.take().expect("picker present");
        match picker.handle_key(key) {
            PriorityAction::None => {
                app.editor_priority_picker = Some(picker);
            }
            PriorityAction::Cancel => {}
            PriorityAction::Confirm => {
                let selected = picker.selected_priority();
                if let Some(editor) = app.editor.as_mut() {
                    editor.set_field_value(
                        EditorFieldId::Priority,
                        selected.as_str().to_string(),
                    );
                }
            }
        }
        return false;
    }

    if app.editor.is_some() {
        handle_editor_key(terminal, app, key, req_tx);
        return false;
    }

    if app.search_active {
        match key.code {
            KeyCode::Esc => {
                app.search.clear();
                app.search_active = false;
            }
            KeyCode::Enter => app.search_active = false,
            KeyCode::Backspace => {
                app.search.pop();
            }
            KeyCode::Char(ch) => {
                if key.modifiers.contains(KeyModifiers::CONTROL) {
                    return false;
                }
                if !ch.is_control() {
                    app.search.push(ch);
                }
            }
            _ => {}
        }
        let previous = app.selected_task().map(|task| task.id.clone());
        app.apply_filter(previous);
        return false;
    }

    match app.view {
        ViewMode::Detail => handle_detail_key(app, key, req_tx),
        _ => handle_list_key(app, key, req_tx),
    }
}

fn handle_list_key(app: &mut AppState, key: KeyEvent, req_tx: &Sender<ApiRequest>) -> bool {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.move_selection(app.list_jump());
            false
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.move_selection(-app.list_jump());
            false
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.move_selection(1);
            false
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.move_selection(-1);
            false
        }
        KeyCode::Char('/') => {
            app.search_active = true;
            false
        }
        KeyCode::Char('p') => {
            // Cycle the priority filter: all -> low -> medium -> high -> all.
            app.priority_filter = match app.priority_filter {
                None => Some(Priority::Low),
                Some(Priority::Low) => Some(Priority::Medium),
                Some(Priority::Medium) => Some(Priority::High),
                Some(Priority::High) => None,
            };
            let previous = app.selected_task().map(|task| task.id.clone());
            app.apply_filter(previous);
            false
        }
        KeyCode::Char('c') => {
            app.category_picker = Some(CategoryPicker::new(
                app.categories(),
                app.category_filter.as_deref(),
            ));
            false
        }
        KeyCode::Char('r') => {
            app.issue_load(req_tx);
            false
        }
        KeyCode::Char('n') => {
            app.begin_operation();
            app.editor = Some(EditorState::new_task(app.config.ui.default_priority));
            app.view = ViewMode::Create;
            false
        }
        KeyCode::Char('d') => {
            let Some(task) = app.selected_task() else {
                app.set_error("no task selected".to_string());
                return false;
            };
            app.delete_confirm = Some(DeleteConfirmState {
                task_id: task.id.clone(),
                title: task.title.clone(),
                pending: None,
            });
            false
        }
        KeyCode::Char(' ') => {
            let Some(task) = app.selected_task() else {
                app.set_error("no task selected".to_string());
                return false;
            };
            let id = task.id.clone();
            app.issue_toggle(req_tx, id);
            false
        }
        KeyCode::Enter => {
            if app.selected_task().is_some() {
                app.view = ViewMode::Detail;
            }
            false
        }
        _ => false,
    }
}

fn handle_detail_key(app: &mut AppState, key: KeyEvent, req_tx: &Sender<ApiRequest>) -> bool {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => {
            app.view = ViewMode::List;
            app.selected = None;
            app.apply_filter(None);
            false
        }
        KeyCode::Char('e') => {
            let Some(task) = app.selected_task().cloned() else {
                app.set_error("no task selected".to_string());
                return false;
            };
            app.begin_operation();
            app.editor = Some(EditorState::edit_task(&task));
            app.view = ViewMode::Edit;
            false
        }
        KeyCode::Char('d') => {
            let Some(task) = app.selected_task() else {
                app.set_error("no task selected".to_string());
                return false;
            };
            app.delete_confirm = Some(DeleteConfirmState {
                task_id: task.id.clone(),
                title: task.title.clone(),
                pending: None,
            });
            false
        }
        KeyCode::Char(' ') => {
            let Some(task) = app.selected_task() else {
                return false;
            };
            let id = task.id.clone();
            app.issue_toggle(req_tx, id);
            false
        }
        _ => false,
    }
}

fn handle_editor_key(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
    key: KeyEvent,
    req_tx: &Sender<ApiRequest>,
) {
    let mut editor = app.editor.take().expect("editor present");
    let kind = editor.kind();
    let task_id = editor.task_id().map(|value| value.to_string());
    let action = editor.handle_key(key);
    match action {
        EditorAction::None => {
            app.editor = Some(editor);
        }
        EditorAction::Cancel => {
            app.editor = None;
            // Create backs out to the list; edit backs out to the detail
            // view of the task being edited.
            app.view = match kind {
                EditorKind::NewTask => ViewMode::List,
                EditorKind::EditTask => ViewMode::Detail,
            };
            app.set_info("cancelled".to_string());
        }
        EditorAction::OpenPriorityPicker => {
            let current = editor
                .field_value(EditorFieldId::Priority)
                .parse::<Priority>()
                .unwrap_or(app.config.ui.default_priority);
            app.editor_priority_picker = Some(PriorityPicker::new(current));
            app.editor = Some(editor);
        }
        EditorAction::OpenDescriptionEditor => {
            let current = editor.field_value(EditorFieldId::Description).to_string();
            match edit_description_external(terminal, &current) {
                Ok(updated) => {
                    editor.set_field_value(
                        EditorFieldId::Description,
                        updated.trim_end().to_string(),
                    );
                }
                Err(err) => {
                    editor.set_error(err);
                }
            }
            app.editor = Some(editor);
        }
        EditorAction::Submit => {
            if app.pending_create.is_some() || app.pending_update.is_some() {
                // A submission is already in flight; ignore the repeat.
                app.editor = Some(editor);
                return;
            }
            match editor.build_submit() {
                Ok(submit) => match kind {
                    EditorKind::NewTask => {
                        let draft = actions::draft_from_submit(submit, false);
                        app.issue_create(req_tx, draft);
                        app.editor = Some(editor);
                    }
                    EditorKind::EditTask => {
                        let Some(task_id) = task_id else {
                            editor.set_error("missing task id for edit".to_string());
                            app.editor = Some(editor);
                            return;
                        };
                        let completed = app
                            .tasks
                            .iter()
                            .find(|task| task.id == task_id)
                            .map(|task| task.completed)
                            .unwrap_or(false);
                        let draft = actions::draft_from_submit(submit, completed);
                        app.issue_update(req_tx, task_id, draft);
                        app.editor = Some(editor);
                    }
                },
                Err(err) => {
                    editor.set_error(err);
                    app.editor = Some(editor);
                }
            }
        }
    }
}

fn edit_description_external(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    body: &str,
) -> std::result::Result<String, String> {
    let mut temp = NamedTempFile::new()
        .map_err(|err| format!("failed to create temp file for editor: {err}"))?;
    temp.write_all(body.as_bytes())
        .map_err(|err| format!("failed to write description to temp file: {err}"))?;
    temp.flush()
        .map_err(|err| format!("failed to flush temp file: {err}"))?;
    let path = temp.path().to_path_buf();

    suspend_terminal(terminal).map_err(|err| format!("failed to suspend terminal: {err}"))?;
    let editor_result = launch_editor(&path);
    let restore_result = resume_terminal(terminal);
    if let Err(err) = restore_result {
        return Err(format!("failed to restore terminal: {err}"));
    }

    let status = editor_result?;
    if !status.success() {
        let detail = status
            .code()
            .map(|code| format!("exit code {code}"))
            .unwrap_or_else(|| "signal".to_string());
        return Err(format!("editor exited with {detail}"));
    }

    fs::read_to_string(&path).map_err(|err| format!("failed to read editor buffer: {err}"))
}

fn suspend_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    Ok(())
}

fn resume_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
    execute!(terminal.backend_mut(), EnterAlternateScreen)?;
    enable_raw_mode()?;
    terminal.clear()?;
    Ok(())
}

fn launch_editor(path: &std::path::Path) -> std::result::Result<std::process::ExitStatus, String> {
    let candidates = editor_candidates();
    let mut attempted: Vec<String> = Vec::new();
    for candidate in candidates {
        let parts = split_editor_command(&candidate);
        if parts.is_empty() {
            continue;
        }
        attempted.push(parts[0].clone());
        let mut command = Command::new(&parts[0]);
        if parts.len() > 1 {
            command.args(&parts[1..]);
        }
        command.arg(path);
        match command.status() {
            Ok(status) => return Ok(status),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                continue;
            }
            Err(err) => {
                return Err(format!("failed to launch editor '{}': {err}", parts[0]));
            }
        }
    }
    let tried = if attempted.is_empty() {
        "no editor candidates".to_string()
    } else {
        attempted.join(", ")
    };
    Err(format!(
        "no editor found (tried {tried}); set $VISUAL or $EDITOR"
    ))
}

fn editor_candidates() -> Vec<String> {
    let mut out = Vec::new();
    if let Ok(value) = std::env::var("VISUAL") {
        if !value.trim().is_empty() {
            out.push(value);
        }
    }
    if let Ok(value) = std::env::var("EDITOR") {
        if !value.trim().is_empty() {
            out.push(value);
        }
    }
    out.push("vi".to_string());
    out
}

fn split_editor_command(value: &str) -> Vec<String> {
    value
        .split_whitespace()
        .map(|part| part.to_string())
        .collect()
}

/// One worker owns the request queue; each request runs on its own thread
/// so a slow call never holds up the next one. Out-of-order completions
/// are expected and fenced by sequence number on the receiving side.
fn spawn_worker(gateway: TaskGateway, req_rx: Receiver<ApiRequest>, ui_tx: Sender<UiMsg>) {
    thread::spawn(move || {
        while let Ok(req) = req_rx.recv() {
            let gateway = gateway.clone();
            let ui_tx = ui_tx.clone();
            thread::spawn(move || {
                let msg = service_request(&gateway, req);
                let _ = ui_tx.send(msg);
            });
        }
    });
}

fn service_request(gateway: &TaskGateway, req: ApiRequest) -> UiMsg {
    match req {
        ApiRequest::Load { generation } => UiMsg::Loaded {
            generation,
            result: gateway.list_tasks().map_err(|err| err.to_string()),
        },
        ApiRequest::Create { seq, draft } => UiMsg::Created {
            seq,
            result: gateway.create_task(&draft).map_err(|err| err.to_string()),
        },
        ApiRequest::Update { seq, id, draft } => {
            let result = gateway
                .update_task(&id, &draft)
                .map_err(|err| err.to_string());
            UiMsg::Updated { seq, id, result }
        }
        ApiRequest::Delete { seq, id } => {
            let result = gateway.delete_task(&id).map_err(|err| err.to_string());
            UiMsg::Deleted { seq, id, result }
        }
        ApiRequest::Toggle { seq, id } => {
            let result = gateway
                .toggle_complete(&id)
                .map_err(|err| err.to_string());
            UiMsg::Toggled { seq, id, result }
        }
    }
}
