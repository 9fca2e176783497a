use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{greeting_for, App, AppState, LoginFocus};

use super::styles;

/// Fixed width of the login dialog
const LOGIN_BOX_WIDTH: u16 = 64;

/// Visible width of the email and password fields
const FIELD_WIDTH: usize = 32;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_status_bar(frame, app, chunks[2]);

    match app.state {
        AppState::LoggingIn => render_login_form(frame, app, chunks[1]),
        AppState::Home | AppState::MenuOpen | AppState::Quitting => {
            render_greeting(frame, app, chunks[1]);
        }
    }

    if matches!(app.state, AppState::MenuOpen) {
        render_menu_overlay(frame, chunks[0]);
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  Bissoy";
    // The menu only exists once someone is signed in
    let menu_hint = if matches!(app.state, AppState::LoggingIn) {
        ""
    } else {
        "[m] Menu"
    };

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(
            area.width
                .saturating_sub(title.len() as u16 + menu_hint.len() as u16 + 4)
                as usize,
        )),
        Span::styled(menu_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

fn render_login_form(frame: &mut Frame, app: &App, area: Rect) {
    let height = if app.login_error.is_some() { 13 } else { 11 };
    let box_area = centered_rect_fixed(LOGIN_BOX_WIDTH, height, area);

    frame.render_widget(Clear, box_area);

    let mut lines = vec![
        Line::from(Span::styled("   Sign in to Bissoy", styles::title_style())),
        Line::from(""),
    ];

    // Email field
    let email_focused = app.login_focus == LoginFocus::Email;
    let email_style = if email_focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let cursor = if email_focused { "▌" } else { "" };
    lines.push(Line::from(vec![
        Span::raw("   "),
        Span::styled("Email:    [", styles::muted_style()),
        Span::styled(
            format!("{}{}", field_display(&app.login_email), cursor),
            email_style,
        ),
        Span::styled("]", styles::muted_style()),
    ]));
    lines.push(Line::from(""));

    // Password field (masked)
    let password_focused = app.login_focus == LoginFocus::Password;
    let password_style = if password_focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let masked: String = "*".repeat(app.login_password.chars().count().min(FIELD_WIDTH));
    let cursor = if password_focused { "▌" } else { "" };
    lines.push(Line::from(vec![
        Span::raw("   "),
        Span::styled("Password: [", styles::muted_style()),
        Span::styled(format!("{:<w$}{}", masked, cursor, w = FIELD_WIDTH), password_style),
        Span::styled("]", styles::muted_style()),
    ]));
    lines.push(Line::from(""));

    // Submit button: shows progress and stays inert while a request is out
    let button_focused = app.login_focus == LoginFocus::Button;
    let button_style = if button_focused && !app.login_in_flight {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let label = if app.login_in_flight {
        " Logging in... "
    } else if button_focused {
        " ▶ Login ◀ "
    } else {
        "   Login   "
    };
    lines.push(Line::from(vec![
        Span::raw("              ["),
        Span::styled(label, button_style),
        Span::raw("]"),
    ]));

    // Error message
    if let Some(ref error) = app.login_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("   {}", error),
            styles::error_style(),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), box_area);
}

fn render_greeting(frame: &mut Frame, app: &App, area: Rect) {
    let box_area = centered_rect_fixed(LOGIN_BOX_WIDTH, 5, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            greeting_for(app.session.username()),
            styles::title_style(),
        ))
        .alignment(Alignment::Center),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(lines).block(block), box_area);
}

fn render_menu_overlay(frame: &mut Frame, title_area: Rect) {
    // Anchored under the menu hint in the title bar, like a dropdown.
    // Clamped to the frame so a tiny terminal cannot push it out of bounds.
    let width: u16 = 14;
    let x = title_area.right().saturating_sub(width + 1);
    let area = Rect::new(x, title_area.bottom(), width, 3).intersection(frame.area());
    if area.is_empty() {
        return;
    }

    frame.render_widget(Clear, area);

    let lines = vec![Line::from(Span::styled(" Logout", styles::selected_style()))];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let hints = match app.state {
        AppState::LoggingIn => " Tab: next field | Enter: submit | Esc: quit",
        AppState::MenuOpen => " Enter: logout | Esc: close menu",
        AppState::Home | AppState::Quitting => " m: menu | q: quit",
    };

    frame.render_widget(
        Paragraph::new(Line::from(Span::raw(hints))).style(styles::status_bar_style()),
        area,
    );
}

/// Display window for a text field: the tail of the value, padded to the
/// field width so the box renders at a constant size.
fn field_display(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    let start = chars.len().saturating_sub(FIELD_WIDTH);
    let shown: String = chars[start..].iter().collect();
    format!("{:<w$}", shown, w = FIELD_WIDTH)
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_display_pads_short_values() {
        let shown = field_display("a@b.com");
        assert_eq!(shown.chars().count(), FIELD_WIDTH);
        assert!(shown.starts_with("a@b.com"));
    }

    #[test]
    fn test_field_display_windows_long_values() {
        let long = format!("{}@example.com", "x".repeat(40));
        let shown = field_display(&long);
        assert_eq!(shown.chars().count(), FIELD_WIDTH);
        assert!(shown.ends_with("@example.com"));
    }
}
