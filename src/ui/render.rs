//! Plain line rendering of the manager pane.
//!
//! [`view`] turns the app state into tagged lines and is pure; [`draw`]
//! writes them to the terminal.

use crate::app::{App, Mode, Picker};
use crate::domain::{Project, Session, Status};
use crate::tree::Row;
use crate::ui::settings;
use crossterm::cursor::MoveTo;
use crossterm::style::{Print, PrintStyledContent, Stylize};
use crossterm::terminal::{Clear, ClearType};
use crossterm::QueueableCommand;
use std::io::{self, Write};

/// How a line should be colored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Title,
    Selected,
    Muted,
    Error,
    Prompt,
    Status(Status),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub text: String,
    pub tone: Tone,
}

impl Line {
    fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }
}

/// Build every line of the current screen.
pub fn view(app: &App) -> Vec<Line> {
    let mut lines = vec![Line::new(settings::TITLE, Tone::Title)];
    match app.mode() {
        Mode::Help => {
            lines.extend(
                settings::HELP_LINES
                    .iter()
                    .map(|text| Line::new(format!("{}{text}", settings::INDENT_1), Tone::Plain)),
            );
            return lines;
        }
        Mode::Picker(picker) => {
            picker_lines(picker, &mut lines);
            error_line(app, &mut lines);
            return lines;
        }
        _ => {}
    }

    tree_lines(app, &mut lines);
    match app.mode() {
        Mode::Confirm { prompt, .. } => {
            lines.push(Line::new(format!("{prompt} [y/n]"), Tone::Prompt));
        }
        Mode::NameShed { input } => {
            lines.push(Line::new(format!("New shed name: {input}_"), Tone::Prompt));
        }
        _ => {}
    }
    if !app.has_anchor() {
        lines.push(Line::new(settings::HINT_NO_ANCHOR, Tone::Error));
    }
    error_line(app, &mut lines);
    lines.push(Line::new(settings::HINT_FOOTER, Tone::Muted));
    lines
}

fn tree_lines(app: &App, lines: &mut Vec<Line>) {
    let show_directory = app.config().ui.show_directory;
    let selected = app.tree().selected_index();
    app.with_projects(|projects| {
        for (index, row) in app.tree().rows().iter().enumerate() {
            let is_selected = selected == Some(index);
            let marker = if is_selected {
                settings::GLYPH_SELECTED
            } else {
                settings::GLYPH_UNSELECTED
            };
            let Some(project) = projects.iter().find(|p| p.id == row.project_id()) else {
                continue;
            };
            let line = match row {
                Row::Project { .. } => {
                    let text = format!("{marker}{}", project_label(project, show_directory));
                    Line::new(text, if is_selected { Tone::Selected } else { Tone::Plain })
                }
                Row::Session { session_id, .. } => {
                    let Some(session) = project.session(session_id) else {
                        continue;
                    };
                    let text = format!("{marker}{}{}", settings::INDENT_1, session_label(session));
                    let tone = if is_selected {
                        Tone::Selected
                    } else {
                        Tone::Status(session.status)
                    };
                    Line::new(text, tone)
                }
            };
            lines.push(line);
        }
    });
    if app.tree().is_empty() {
        lines.push(Line::new(
            format!("{}no projects; press n to add one", settings::INDENT_1),
            Tone::Muted,
        ));
    }
}

fn project_label(project: &Project, show_directory: bool) -> String {
    let fold = if project.expanded {
        settings::GLYPH_EXPANDED
    } else {
        settings::GLYPH_COLLAPSED
    };
    let mut label = format!("{fold} {}", project.name);
    if project.is_remote() {
        label = format!("{label} {}", settings::GLYPH_SHED);
    }
    if !project.expanded && !project.sessions.is_empty() {
        label.push_str(&format!(" ({})", project.sessions.len()));
    }
    if show_directory {
        let path = project.display_path();
        if !path.is_empty() {
            label.push_str(&format!("  {path}"));
        }
    }
    label
}

fn session_label(session: &Session) -> String {
    let mut label = format!("{} {}", session.status.icon(), session.command.display_name);
    if session.is_visible() {
        label.push_str(&format!(" {}", settings::GLYPH_VISIBLE));
    }
    if let Some(code) = session.exit_code {
        label.push_str(&format!(" [{code}]"));
    }
    label
}

fn picker_lines(picker: &Picker, lines: &mut Vec<Line>) {
    lines.push(Line::new(picker.title.clone(), Tone::Prompt));
    if picker.is_filtering() || !picker.filter().is_empty() {
        let cursor = if picker.is_filtering() { "_" } else { "" };
        lines.push(Line::new(format!("/{}{cursor}", picker.filter()), Tone::Muted));
    }
    let visible = picker.visible();
    if visible.is_empty() {
        lines.push(Line::new(
            format!("{}(nothing to pick)", settings::INDENT_1),
            Tone::Muted,
        ));
    }
    for (index, item) in visible.iter().enumerate() {
        let is_selected = index == picker.selected();
        let marker = if is_selected {
            settings::GLYPH_SELECTED
        } else {
            settings::GLYPH_UNSELECTED
        };
        let mut text = format!("{marker}{}", item.label);
        if !item.detail.is_empty() {
            text.push_str(&format!("  {}", item.detail));
        }
        lines.push(Line::new(text, if is_selected { Tone::Selected } else { Tone::Plain }));
    }
    let hint = match picker.kind {
        crate::app::PickerKind::Shed => settings::HINT_SHED_PICKER,
        _ => settings::HINT_PICKER,
    };
    lines.push(Line::new(hint, Tone::Muted));
}

fn error_line(app: &App, lines: &mut Vec<Line>) {
    if let Some(error) = app.last_error() {
        lines.push(Line::new(format!("{} {error}", settings::LABEL_ERROR), Tone::Error));
    }
}

/// Clear the screen and write `lines`, clipped to `width` x `height`.
pub fn draw<W: Write>(
    out: &mut W,
    lines: &[Line],
    width: u16,
    height: u16,
    color: bool,
) -> io::Result<()> {
    out.queue(MoveTo(0, 0))?;
    out.queue(Clear(ClearType::All))?;
    for (row, line) in lines.iter().take(height as usize).enumerate() {
        out.queue(MoveTo(0, row as u16))?;
        let text: String = line.text.chars().take(width as usize).collect();
        if !color {
            out.queue(Print(text))?;
            continue;
        }
        let styled = match line.tone {
            Tone::Plain => text.stylize(),
            Tone::Title => text.with(settings::COLOR_TITLE).bold(),
            Tone::Selected => text.with(settings::COLOR_SELECTED).bold(),
            Tone::Muted => text.with(settings::COLOR_MUTED),
            Tone::Error => text.with(settings::COLOR_ERROR),
            Tone::Prompt => text.with(settings::COLOR_PROMPT),
            Tone::Status(status) => text.with(settings::status_color(status)),
        };
        out.queue(PrintStyledContent(styled))?;
    }
    out.flush()
}
