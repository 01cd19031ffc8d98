use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use grouptop::config::{Config, KeybindsConfig};
use grouptop::system::group::GroupSummary;
use grouptop::system::info::SystemInfo;
use grouptop::system::instances::InstanceDetail;
use grouptop::system::kill::KillReport;
use grouptop::system::monitor::ProcessMonitor;
use grouptop::system::query::SortKey;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::action::{Action, Direction};
use crate::event::Event;
use crate::ui::theme::Theme;

const STATUS_TTL: Duration = Duration::from_secs(3);
const PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Filter,
    Help,
}

#[derive(Debug, Clone)]
pub struct ResolvedKeybinds {
    pub quit: KeyCode,
    pub filter: KeyCode,
    pub kill: KeyCode,
    pub instances: KeyCode,
    pub cycle_sort: KeyCode,
    pub reverse_sort: KeyCode,
    pub cycle_theme: KeyCode,
    pub help: KeyCode,
    pub refresh: KeyCode,
}

impl ResolvedKeybinds {
    pub fn from_config(kb: &KeybindsConfig) -> Self {
        Self {
            quit: parse_key(&kb.quit).unwrap_or(KeyCode::Char('q')),
            filter: parse_key(&kb.filter).unwrap_or(KeyCode::Char('/')),
            kill: parse_key(&kb.kill).unwrap_or(KeyCode::Char('k')),
            instances: parse_key(&kb.instances).unwrap_or(KeyCode::Enter),
            cycle_sort: parse_key(&kb.cycle_sort).unwrap_or(KeyCode::Char('s')),
            reverse_sort: parse_key(&kb.reverse_sort).unwrap_or(KeyCode::Char('r')),
            cycle_theme: parse_key(&kb.cycle_theme).unwrap_or(KeyCode::Char('t')),
            help: parse_key(&kb.help).unwrap_or(KeyCode::Char('?')),
            refresh: parse_key(&kb.refresh).unwrap_or(KeyCode::F(5)),
        }
    }

    /// (key label, description) pairs for the help overlay.
    pub fn help_entries(&self) -> Vec<(String, &'static str)> {
        vec![
            (key_label(self.quit), "Quit"),
            (key_label(self.filter), "Filter groups"),
            (key_label(self.kill), "Terminate group"),
            (key_label(self.instances), "Show instances"),
            (key_label(self.cycle_sort), "Cycle sort column"),
            (key_label(self.reverse_sort), "Reverse sort order"),
            (key_label(self.cycle_theme), "Cycle theme"),
            (key_label(self.help), "Toggle help"),
            (key_label(self.refresh), "Refresh now"),
            ("1-4".to_string(), "Sort by column"),
            ("\u{2191}\u{2193}".to_string(), "Navigate"),
            ("Ctrl+C".to_string(), "Quit (always)"),
        ]
    }
}

/// Parses a keybind name: a single character, a named key or `F1`..`F12`.
pub fn parse_key(s: &str) -> Option<KeyCode> {
    let mut chars = s.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Some(KeyCode::Char(c));
    }
    match s.to_lowercase().as_str() {
        "enter" | "return" => Some(KeyCode::Enter),
        "esc" | "escape" => Some(KeyCode::Esc),
        "tab" => Some(KeyCode::Tab),
        "backspace" => Some(KeyCode::Backspace),
        "delete" | "del" => Some(KeyCode::Delete),
        "space" => Some(KeyCode::Char(' ')),
        lower => lower
            .strip_prefix('f')
            .and_then(|n| n.parse::<u8>().ok())
            .filter(|n| (1..=12).contains(n))
            .map(KeyCode::F),
    }
}

fn key_label(code: KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Backspace => "Bksp".to_string(),
        KeyCode::Delete => "Del".to_string(),
        KeyCode::F(n) => format!("F{n}"),
        _ => "?".to_string(),
    }
}

/// Instance overlay for one group. `loading` holds until the lookup lands.
#[derive(Debug, Clone)]
pub struct InstancePanel {
    pub name: String,
    pub instances: Vec<InstanceDetail>,
    pub loading: bool,
    /// First instance row shown; the arrow keys move it while the overlay
    /// is open.
    pub scroll: usize,
}

impl InstancePanel {
    fn scroll(&mut self, direction: &Direction) {
        let last = self.instances.len().saturating_sub(1);
        self.scroll = match direction {
            Direction::Up => self.scroll.saturating_sub(1),
            Direction::Down => (self.scroll + 1).min(last),
            Direction::PageUp => self.scroll.saturating_sub(PAGE_SIZE),
            Direction::PageDown => (self.scroll + PAGE_SIZE).min(last),
            Direction::Top => 0,
            Direction::Bottom => last,
        };
    }
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
    pub created: Instant,
}

pub struct App {
    pub running: bool,
    pub ready: bool,
    pub monitor: ProcessMonitor,
    pub rows: Vec<(String, GroupSummary)>,
    pub system: Option<SystemInfo>,
    pub selected_index: usize,
    pub input_mode: InputMode,
    pub filter_text: String,
    pub sort_key: SortKey,
    pub sort_descending: bool,
    pub instances: Option<InstancePanel>,
    pub status_message: Option<StatusMessage>,
    pub theme: Theme,
    pub keybinds: ResolvedKeybinds,
    events: mpsc::UnboundedSender<Event>,
}

impl App {
    pub fn new(
        config: &Config,
        monitor: ProcessMonitor,
        events: mpsc::UnboundedSender<Event>,
    ) -> Self {
        App {
            running: true,
            ready: false,
            monitor,
            rows: Vec::new(),
            system: None,
            selected_index: 0,
            input_mode: InputMode::Normal,
            filter_text: String::new(),
            sort_key: SortKey::from_label(&config.general.default_sort),
            sort_descending: config.general.sort_descending,
            instances: None,
            status_message: None,
            theme: Theme::from_name(&config.colors.theme),
            keybinds: ResolvedKeybinds::from_config(&config.keybinds),
            events,
        }
    }

    /// Pulls the latest snapshot through the current filter and sort.
    pub fn refresh_data(&mut self) {
        if !self.ready && self.monitor.last_updated().is_some() {
            self.ready = true;
        }
        self.rows = self
            .monitor
            .get_filtered(&self.filter_text, self.sort_key, self.sort_descending);
        self.system = Some(self.monitor.system_info());

        if self.rows.is_empty() {
            self.selected_index = 0;
        } else if self.selected_index >= self.rows.len() {
            self.selected_index = self.rows.len() - 1;
        }

        if let Some(status) = &self.status_message
            && status.created.elapsed() >= STATUS_TTL
        {
            self.status_message = None;
        }
    }

    pub fn map_key(&self, key: KeyEvent) -> Action {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Action::Quit;
        }

        match self.input_mode {
            InputMode::Normal => self.map_key_normal(key),
            InputMode::Filter => self.map_key_filter(key),
            InputMode::Help => self.map_key_help(key),
        }
    }

    fn map_key_normal(&self, key: KeyEvent) -> Action {
        let code = key.code;
        let kb = &self.keybinds;

        match code {
            KeyCode::Up => return Action::Navigate(Direction::Up),
            KeyCode::Down => return Action::Navigate(Direction::Down),
            KeyCode::PageUp => return Action::Navigate(Direction::PageUp),
            KeyCode::PageDown => return Action::Navigate(Direction::PageDown),
            KeyCode::Home => return Action::Navigate(Direction::Top),
            KeyCode::End => return Action::Navigate(Direction::Bottom),
            KeyCode::Esc if self.instances.is_some() => return Action::CloseInstances,
            KeyCode::Esc if !self.filter_text.is_empty() => return Action::ClearFilter,
            _ => {}
        }

        if code == kb.quit {
            return Action::Quit;
        }
        if code == kb.filter {
            return Action::EnterFilterMode;
        }
        if code == kb.kill {
            return Action::KillSelected;
        }
        if code == kb.instances {
            return Action::ShowInstances;
        }
        if code == kb.cycle_sort {
            return Action::CycleSortMode;
        }
        if code == kb.reverse_sort {
            return Action::ReverseSort;
        }
        if code == kb.cycle_theme {
            return Action::CycleTheme;
        }
        if code == kb.help {
            return Action::ToggleHelp;
        }
        if code == kb.refresh {
            return Action::Refresh;
        }

        if let KeyCode::Char(c) = code
            && let Some(index) = c.to_digit(10)
            && (1..=SortKey::ALL.len() as u32).contains(&index)
        {
            let key = SortKey::ALL[index as usize - 1];
            return Action::SortBy(key, self.column_sort_direction(key));
        }

        Action::None
    }

    /// Picking the active column flips its direction; a new column starts
    /// descending, except names which start A to Z.
    fn column_sort_direction(&self, key: SortKey) -> bool {
        if key == self.sort_key {
            !self.sort_descending
        } else {
            key != SortKey::Name
        }
    }

    fn map_key_help(&self, key: KeyEvent) -> Action {
        let code = key.code;
        if code == self.keybinds.help || code == KeyCode::Esc {
            return Action::ToggleHelp;
        }
        Action::None
    }

    fn map_key_filter(&self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Esc => Action::ClearFilter,
            KeyCode::Enter => Action::ExitFilterMode,
            KeyCode::Backspace => {
                let mut text = self.filter_text.clone();
                text.pop();
                Action::UpdateFilter(text)
            }
            KeyCode::Char(c) => {
                let mut text = self.filter_text.clone();
                text.push(c);
                Action::UpdateFilter(text)
            }
            _ => Action::None,
        }
    }

    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::Navigate(dir) => self.navigate(dir),
            Action::KillSelected => self.kill_selected(),
            Action::ShowInstances => {
                if let Some(name) = self.selected_name().map(str::to_string) {
                    self.instances = Some(InstancePanel {
                        name: name.clone(),
                        instances: Vec::new(),
                        loading: true,
                        scroll: 0,
                    });
                    self.request_instances(name);
                }
            }
            Action::CloseInstances => self.instances = None,
            Action::EnterFilterMode => {
                self.input_mode = InputMode::Filter;
            }
            Action::ExitFilterMode => {
                self.input_mode = InputMode::Normal;
            }
            Action::ClearFilter => {
                self.filter_text.clear();
                self.input_mode = InputMode::Normal;
                self.refresh_rows();
            }
            Action::UpdateFilter(text) => {
                self.filter_text = text;
                self.selected_index = 0;
                self.refresh_rows();
            }
            Action::CycleSortMode => {
                self.sort_key = self.sort_key.next();
                self.refresh_rows();
            }
            Action::ReverseSort => {
                self.sort_descending = !self.sort_descending;
                self.refresh_rows();
            }
            Action::SortBy(key, descending) => {
                self.sort_key = key;
                self.sort_descending = descending;
                self.refresh_rows();
            }
            Action::CycleTheme => {
                self.theme = self.theme.next();
            }
            Action::ToggleHelp => {
                self.input_mode = if self.input_mode == InputMode::Help {
                    InputMode::Normal
                } else {
                    InputMode::Help
                };
            }
            Action::Refresh => {
                self.refresh_data();
                if let Some(panel) = &self.instances {
                    self.request_instances(panel.name.clone());
                }
            }
            Action::None => {}
        }
    }

    fn refresh_rows(&mut self) {
        self.rows = self
            .monitor
            .get_filtered(&self.filter_text, self.sort_key, self.sort_descending);
        if self.selected_index >= self.rows.len() {
            self.selected_index = self.rows.len().saturating_sub(1);
        }
    }

    fn navigate(&mut self, direction: Direction) {
        if let Some(panel) = &mut self.instances {
            panel.scroll(&direction);
            return;
        }
        if self.rows.is_empty() {
            return;
        }
        let last = self.rows.len() - 1;
        self.selected_index = match direction {
            Direction::Up => self.selected_index.saturating_sub(1),
            Direction::Down => (self.selected_index + 1).min(last),
            Direction::PageUp => self.selected_index.saturating_sub(PAGE_SIZE),
            Direction::PageDown => (self.selected_index + PAGE_SIZE).min(last),
            Direction::Top => 0,
            Direction::Bottom => last,
        };
    }

    pub fn selected_name(&self) -> Option<&str> {
        self.rows
            .get(self.selected_index)
            .map(|(name, _)| name.as_str())
    }

    pub fn selected_row(&self) -> Option<&(String, GroupSummary)> {
        self.rows.get(self.selected_index)
    }

    pub fn show_help(&self) -> bool {
        self.input_mode == InputMode::Help
    }

    pub fn help_entries(&self) -> Vec<(String, &'static str)> {
        self.keybinds.help_entries()
    }

    fn kill_selected(&mut self) {
        let Some(name) = self.selected_name().map(str::to_string) else {
            self.set_status("Select a process group to terminate".to_string(), true);
            return;
        };
        let events = self.events.clone();
        let spawned = self.monitor.kill_by_name(&name, move |report| {
            let _ = events.send(Event::KillFinished(report));
        });
        if let Err(err) = spawned {
            warn!(group = %name, error = %err, "could not start kill worker");
            self.set_status(format!("Could not terminate {name}: {err}"), true);
        }
    }

    fn request_instances(&self, name: String) {
        let monitor = self.monitor.clone();
        let events = self.events.clone();
        tokio::task::spawn_blocking(move || {
            let instances = monitor.get_instances(&name);
            let _ = events.send(Event::InstancesLoaded(name, instances));
        });
    }

    pub fn on_kill_finished(&mut self, report: KillReport) {
        debug!(group = %report.name, killed = report.killed, "kill finished");
        if report.killed > 0 {
            self.set_status(
                format!(
                    "Initiated termination of {} instances of {}",
                    report.killed, report.name
                ),
                false,
            );
        } else {
            self.set_status(
                format!("{}. Try running with elevated privileges.", report.message),
                true,
            );
        }
    }

    /// Results for a group the user has since closed are dropped.
    pub fn on_instances_loaded(&mut self, name: String, instances: Vec<InstanceDetail>) {
        if let Some(panel) = &mut self.instances
            && panel.name == name
        {
            panel.instances = instances;
            panel.loading = false;
            panel.scroll = panel.scroll.min(panel.instances.len().saturating_sub(1));
        }
    }

    fn set_status(&mut self, text: String, is_error: bool) {
        self.status_message = Some(StatusMessage {
            text,
            is_error,
            created: Instant::now(),
        });
    }
}
