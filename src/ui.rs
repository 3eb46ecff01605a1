use ratatui::{prelude::*, widgets::*};

/// Renders a bordered text input field
pub fn render_input<'a>(
    content: &'a str,
    title: &'a str,
    is_focused: bool,
    is_editing: bool,
) -> Paragraph<'a> {
    let style = if is_focused && is_editing {
        Style::default().fg(Color::Yellow)
    } else if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(title);

    Paragraph::new(content).block(block)
}

/// Availability badge for a book
pub fn availability_span(available: bool) -> Span<'static> {
    if available {
        Span::styled("Available", Style::default().fg(Color::Green))
    } else {
        Span::styled("Checked Out", Style::default().fg(Color::Red))
    }
}

/// Mask a password for display
pub fn mask(password: &str) -> String {
    "*".repeat(password.chars().count())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_hides_every_char() {
        assert_eq!(mask("hunter2"), "*******");
        assert_eq!(mask(""), "");
    }
}
