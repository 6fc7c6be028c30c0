//! Input widgets used by the wizard screens

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use tui_textarea::TextArea;

/// A single input on a wizard screen
pub enum FormField {
    /// Single-line text input; `cursor_pos` counts chars, not bytes
    TextInput {
        value: String,
        cursor_pos: usize,
        placeholder: String,
        max_length: Option<usize>,
    },
    /// Multi-line text input using tui-textarea
    TextArea {
        textarea: Box<TextArea<'static>>,
        placeholder: String,
    },
    /// One choice out of `(id, label)` pairs; nothing chosen until the user moves
    Choice {
        options: Vec<(String, String)>,
        selected: Option<usize>,
        list_state: ListState,
    },
}

fn byte_offset(value: &str, char_pos: usize) -> usize {
    value
        .char_indices()
        .nth(char_pos)
        .map(|(i, _)| i)
        .unwrap_or(value.len())
}

impl FormField {
    pub fn text_input(placeholder: impl Into<String>, max_length: Option<usize>) -> Self {
        FormField::TextInput {
            value: String::new(),
            cursor_pos: 0,
            placeholder: placeholder.into(),
            max_length,
        }
    }

    pub fn text_area(placeholder: impl Into<String>) -> Self {
        FormField::TextArea {
            textarea: Box::new(TextArea::default()),
            placeholder: placeholder.into(),
        }
    }

    pub fn choice(options: Vec<(String, String)>) -> Self {
        FormField::Choice {
            options,
            selected: None,
            list_state: ListState::default(),
        }
    }

    /// Current value; for a choice, the id of the chosen option
    pub fn value(&self) -> String {
        match self {
            FormField::TextInput { value, .. } => value.clone(),
            FormField::TextArea { textarea, .. } => textarea.lines().join("\n"),
            FormField::Choice {
                options, selected, ..
            } => selected
                .and_then(|i| options.get(i))
                .map(|(id, _)| id.clone())
                .unwrap_or_default(),
        }
    }

    /// Replace the value; a choice id that is not offered clears the choice
    pub fn set_value(&mut self, new_value: &str) {
        match self {
            FormField::TextInput {
                value, cursor_pos, ..
            } => {
                *value = new_value.to_string();
                *cursor_pos = value.chars().count();
            }
            FormField::TextArea { textarea, .. } => {
                textarea.select_all();
                textarea.cut();
                textarea.insert_str(new_value);
            }
            FormField::Choice {
                options,
                selected,
                list_state,
            } => {
                *selected = options.iter().position(|(id, _)| id == new_value);
                list_state.select(*selected);
            }
        }
    }

    /// Handle a key press, returns true if the value changed
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match self {
            FormField::TextInput {
                value,
                cursor_pos,
                max_length,
                ..
            } => match key.code {
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    if max_length.map_or(true, |m| value.chars().count() < m) {
                        value.insert(byte_offset(value, *cursor_pos), c);
                        *cursor_pos += 1;
                        return true;
                    }
                    false
                }
                KeyCode::Backspace => {
                    if *cursor_pos > 0 {
                        *cursor_pos -= 1;
                        value.remove(byte_offset(value, *cursor_pos));
                        return true;
                    }
                    false
                }
                KeyCode::Delete => {
                    if *cursor_pos < value.chars().count() {
                        value.remove(byte_offset(value, *cursor_pos));
                        return true;
                    }
                    false
                }
                KeyCode::Left => {
                    *cursor_pos = cursor_pos.saturating_sub(1);
                    false
                }
                KeyCode::Right => {
                    *cursor_pos = (*cursor_pos + 1).min(value.chars().count());
                    false
                }
                KeyCode::Home => {
                    *cursor_pos = 0;
                    false
                }
                KeyCode::End => {
                    *cursor_pos = value.chars().count();
                    false
                }
                _ => false,
            },
            FormField::TextArea { textarea, .. } => {
                let before = textarea.lines().to_vec();
                textarea.input(key);
                textarea.lines() != before.as_slice()
            }
            FormField::Choice {
                options,
                selected,
                list_state,
            } => {
                if options.is_empty() {
                    return false;
                }
                let last = options.len() - 1;
                let next = match (key.code, *selected) {
                    (KeyCode::Up | KeyCode::Char('k'), None) => last,
                    (KeyCode::Up | KeyCode::Char('k'), Some(i)) => i.saturating_sub(1),
                    (KeyCode::Down | KeyCode::Char('j'), None) => 0,
                    (KeyCode::Down | KeyCode::Char('j'), Some(i)) => (i + 1).min(last),
                    _ => return false,
                };
                let changed = *selected != Some(next);
                *selected = Some(next);
                list_state.select(Some(next));
                changed
            }
        }
    }

    /// Rows needed to render this field
    pub fn render_height(&self) -> u16 {
        match self {
            FormField::TextInput { .. } => 1,
            FormField::TextArea { .. } => 5,
            FormField::Choice { options, .. } => (options.len() as u16).clamp(1, 5),
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, focused: bool) {
        let border_color = if focused { Color::Cyan } else { Color::Gray };

        match self {
            FormField::TextInput {
                value,
                cursor_pos,
                placeholder,
                max_length,
            } => {
                let content = if value.is_empty() && !focused {
                    Line::from(Span::styled(
                        placeholder.as_str(),
                        Style::default().fg(Color::DarkGray),
                    ))
                } else {
                    let mut text = value.clone();
                    if focused {
                        text.insert(byte_offset(value, *cursor_pos), '|');
                    }
                    let suffix = max_length
                        .map(|m| format!(" ({}/{})", value.chars().count(), m))
                        .unwrap_or_default();
                    Line::from(vec![
                        Span::raw(text),
                        Span::styled(suffix, Style::default().fg(Color::DarkGray)),
                    ])
                };

                let para = Paragraph::new(content).style(Style::default().fg(if focused {
                    Color::White
                } else {
                    Color::Gray
                }));
                frame.render_widget(para, area);
            }
            FormField::TextArea {
                textarea,
                placeholder,
            } => {
                textarea.set_cursor_line_style(Style::default());
                textarea.set_cursor_style(if focused {
                    Style::default().add_modifier(Modifier::REVERSED)
                } else {
                    Style::default()
                });
                textarea.set_block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(border_color)),
                );
                textarea.set_placeholder_text(placeholder.clone());
                textarea.set_placeholder_style(Style::default().fg(Color::DarkGray));

                frame.render_widget(&**textarea, area);
            }
            FormField::Choice {
                options,
                selected,
                list_state,
            } => {
                let items: Vec<ListItem> = options
                    .iter()
                    .enumerate()
                    .map(|(i, (_, label))| {
                        let marker = if *selected == Some(i) { "(*) " } else { "( ) " };
                        ListItem::new(Line::from(vec![
                            Span::styled(marker, Style::default().fg(Color::Green)),
                            Span::raw(label.as_str()),
                        ]))
                    })
                    .collect();

                let highlight = if focused {
                    Style::default()
                        .add_modifier(Modifier::REVERSED)
                        .fg(Color::Cyan)
                } else {
                    Style::default()
                };
                let list = List::new(items).highlight_style(highlight);

                frame.render_stateful_widget(list, area, list_state);
            }
        }
    }
}
