use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, FormField};
use crate::tui::InputMode;

pub fn draw(frame: &mut Frame, app: &App) {
    // Main horizontal split: 1/3 left, 2/3 right
    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3), // Left pane: resource list
            Constraint::Ratio(2, 3), // Right pane: details
        ])
        .split(frame.area());

    let left_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Title bar + filters
            Constraint::Min(0),    // Resource list
            Constraint::Length(1), // Key hints
        ])
        .split(main_chunks[0]);

    let right_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Resource title
            Constraint::Min(0),    // Category, link, description
            Constraint::Length(1), // Status message
        ])
        .split(main_chunks[1]);

    render_header(frame, app, left_chunks[0]);
    render_resource_list(frame, app, left_chunks[1]);
    render_hints(frame, app, left_chunks[2]);

    render_resource_title(frame, app, right_chunks[0]);
    render_details(frame, app, right_chunks[1]);
    render_status(frame, app, right_chunks[2]);

    if app.mode == InputMode::Form {
        render_form(frame, app);
    }

    if app.show_help {
        render_help(frame);
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let title = format!(" Resource Library [{}] ", app.category_filter.label());

    let search = match app.mode {
        InputMode::Search => format!(" Search: {}_", app.search_input),
        _ if !app.search_input.is_empty() => format!(" Search: {}", app.search_input),
        _ => " Search: (press /)".to_string(),
    };
    let stats = format!(" {} Resources", app.resources.len());

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let paragraph = Paragraph::new(vec![Line::from(stats), Line::from(search)])
        .style(Style::default().fg(Color::White));
    frame.render_widget(paragraph, inner);
}

fn render_resource_list(frame: &mut Frame, app: &App, area: Rect) {
    if app.resources.is_empty() {
        let paragraph = Paragraph::new("No resources found. Press 'a' to add one!")
            .block(Block::default().borders(Borders::ALL))
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = app
        .resources
        .iter()
        .map(|resource| {
            let link = if resource.url.is_some() { "🔗 " } else { "  " };
            let line = Line::from(vec![
                Span::styled(link, Style::default().fg(Color::Yellow)),
                Span::styled(
                    format!("[{}] ", resource.category.label()),
                    Style::default().fg(Color::Blue),
                ),
                Span::styled(&resource.title, Style::default().fg(Color::White)),
            ]);
            ListItem::new(line)
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(app.selected_index));

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_hints(frame: &mut Frame, app: &App, area: Rect) {
    let hints = match app.mode {
        InputMode::Search => "Enter:done  Esc:clear search",
        InputMode::Form => "Tab:next field  Enter:add  Esc:cancel",
        InputMode::Browse => "j/k:nav  f:category  /:search  a:add  d:delete  ?:help  q:quit",
    };

    let paragraph = Paragraph::new(hints).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

fn render_resource_title(frame: &mut Frame, app: &App, area: Rect) {
    let title = app
        .selected_resource()
        .map(|r| r.title.as_str())
        .unwrap_or("No resource selected");

    let block = Block::default()
        .title(" Resource ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let paragraph = Paragraph::new(title)
        .block(block)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

fn render_details(frame: &mut Frame, app: &App, area: Rect) {
    let lines = match app.selected_resource() {
        Some(resource) => {
            let label = Style::default().fg(Color::DarkGray);
            let mut lines = vec![
                Line::from(vec![
                    Span::styled("Category: ", label),
                    Span::raw(resource.category.label()),
                ]),
                Line::from(vec![
                    Span::styled("Added:    ", label),
                    Span::raw(resource.created_at.format("%Y-%m-%d %H:%M").to_string()),
                ]),
            ];
            if let Some(url) = &resource.url {
                lines.push(Line::from(vec![
                    Span::styled("Link:     ", label),
                    Span::styled(url.as_str(), Style::default().fg(Color::Green)),
                    Span::styled("  (o to open)", label),
                ]));
            }
            lines.push(Line::default());
            lines.extend(resource.description.lines().map(Line::from));
            lines
        }
        None => vec![Line::from("Add some resources to get started!")],
    };

    let block = Block::default()
        .title(" Description ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let (text, color) = match &app.status {
        Some(status) if status.is_error => (format!("❌ {}", status.text), Color::Red),
        Some(status) => (format!("✓ {}", status.text), Color::Green),
        None => (String::new(), Color::DarkGray),
    };

    let paragraph = Paragraph::new(text).style(Style::default().fg(color));
    frame.render_widget(paragraph, area);
}

fn render_form(frame: &mut Frame, app: &App) {
    let area = centered_rect(60, 50, frame.area());
    let form = &app.form;

    let field = |name: &str, value: String, which: FormField| {
        let focused = form.focus == which;
        let style = if focused {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        let cursor = if focused && which != FormField::Category { "_" } else { "" };
        Line::from(vec![
            Span::styled(format!("{name:<13}"), style),
            Span::raw(format!("{value}{cursor}")),
        ])
    };

    let lines = vec![
        Line::default(),
        field("Title*", form.title.clone(), FormField::Title),
        field(
            "Category*",
            format!("◀ {} ▶", form.category.label()),
            FormField::Category,
        ),
        field("URL", form.url.clone(), FormField::Url),
        field("Description*", form.description.clone(), FormField::Description),
    ];

    let block = Block::default()
        .title(" Add New Resource ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

fn render_help(frame: &mut Frame) {
    let area = centered_rect(50, 60, frame.area());

    let help_text = [
        "",
        " Navigation:",
        "   j / ↓    Move down",
        "   k / ↑    Move up",
        "   < / >    First / last resource",
        "",
        " Filters:",
        "   f / F    Next / previous category",
        "   /        Search titles and descriptions",
        "   Esc      Clear search",
        "",
        " Actions:",
        "   a        Add resource",
        "   o        Open link in browser",
        "   d        Delete resource",
        "   D        Delete every resource with this title",
        "",
        " General:",
        "   ?        Toggle this help",
        "   q        Quit",
        "",
        " Press any key to close",
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(help_text.join("\n"))
        .block(block)
        .style(Style::default().fg(Color::White));

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
