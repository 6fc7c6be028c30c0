//! Render methods for each wizard screen

mod detail;
mod photos;
mod select_type;

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{StatusKind, WizardScreen};
use crate::wizard::Screen;

/// Key hints rendered in the footer, `(key, action)`
pub(crate) fn footer(hints: &[(&str, &str)]) -> Paragraph<'static> {
    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (key, action) in hints {
        spans.push(Span::styled(key.to_string(), Style::default().fg(Color::Yellow)));
        spans.push(Span::raw(format!(" {}  ", action)));
    }
    Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
}

impl WizardScreen {
    /// Outer frame titled with the screen name and step counter
    pub(crate) fn screen_block(&self) -> Block<'static> {
        let screen = self.screen();
        let step = match screen {
            Screen::SelectType => 1,
            Screen::Detail(_) => 2,
            Screen::Photos => 3,
        };
        Block::default()
            .title(Line::from(vec![
                Span::raw(" "),
                Span::styled(
                    "Novo anúncio",
                    Style::default()
                        .fg(Color::LightRed)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!(" - {} ({}/3) ", screen.title(), step)),
            ]))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
    }

    pub(crate) fn render_status(&self, frame: &mut Frame, area: Rect) {
        let Some(status) = &self.status else {
            return;
        };
        let color = match status.kind {
            StatusKind::Info => Color::Gray,
            StatusKind::Success => Color::Green,
            StatusKind::Error => Color::Red,
        };
        let para = Paragraph::new(Line::from(Span::styled(
            status.text.clone(),
            Style::default().fg(color),
        )))
        .alignment(Alignment::Center);
        frame.render_widget(para, area);
    }
}
