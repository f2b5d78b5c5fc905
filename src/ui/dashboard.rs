// ============================================================================
// Dashboard - Rendu de l'interface principale
// ============================================================================
// Dessine l'interface TUI à partir de l'état dérivé (ViewState) de App
//
// CONCEPTS RATATUI :
// 1. Frame : surface de dessin
// 2. Layout : découpage de l'espace en zones
// 3. Widgets : Block, Paragraph, List
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::{App, FormFocus, StatusKind};
use crate::models::ExpenseRecord;
use crate::presenter::FormField;

/// Largeur max du nom dans la liste
const NAME_WIDTH: usize = 24;

/// Dessine l'interface complète
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = create_layout(frame.size(), app.is_in_input_mode());

    render_header(frame, app, chunks[0]);
    render_main_content(frame, app, chunks[1]);

    if app.is_in_input_mode() {
        render_form(frame, app, chunks[2]);
        render_footer(frame, app, chunks[3]);
    } else {
        render_footer(frame, app, chunks[2]);
    }
}

/// Crée le layout (header, liste, [formulaire], footer)
fn create_layout(area: Rect, with_form: bool) -> Vec<Rect> {
    let mut constraints = vec![Constraint::Length(4), Constraint::Min(0)];
    if with_form {
        constraints.push(Constraint::Length(5));
    }
    constraints.push(Constraint::Length(3));

    Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area)
        .to_vec()
}

// ============================================================================
// Header : total et nombre de dépenses
// ============================================================================

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" LazySpend ")
        .title_alignment(Alignment::Center);

    let summary = Line::from(vec![
        Span::raw("Total : "),
        Span::styled(
            app.view.formatted_total(),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        Span::raw("    Dépenses : "),
        Span::styled(
            app.view.count.to_string(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
    ]);

    let second = match &app.persistence_warning {
        Some(warning) => Line::from(Span::styled(
            format!("⚠  {warning}"),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        None => Line::from(Span::styled(
            app.store.storage_description(),
            Style::default().fg(Color::DarkGray),
        )),
    };

    let paragraph = Paragraph::new(vec![summary, second])
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Main Content : liste des dépenses
// ============================================================================

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" 💸 Dépenses ");

    if app.view.is_empty {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Aucune dépense pour l'instant",
                Style::default().fg(Color::Gray),
            )),
            Line::from(Span::styled(
                "Appuyez sur [a] pour en ajouter une",
                Style::default().fg(Color::DarkGray),
            )),
        ];

        let paragraph = Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center);

        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = app
        .view
        .records
        .iter()
        .map(|record| {
            let style = if record.category().is_known() {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::Gray)
            };
            ListItem::new(format_row(record)).style(style)
        })
        .collect();

    let list = List::new(items).block(block).highlight_style(
        Style::default()
            .add_modifier(Modifier::BOLD)
            .add_modifier(Modifier::REVERSED),
    );

    // L'offset est recalculé par ratatui pour garder la sélection visible
    let mut state = ListState::default().with_selected(Some(app.selected_index));
    frame.render_stateful_widget(list, area, &mut state);
}

/// Formate une ligne de la liste
///
/// Format : " 🍕 Coffee                   Food & Dining      Oct 19, 2026      $4.50"
pub fn format_row(record: &ExpenseRecord) -> String {
    format!(
        " {} {:<name_width$} {:<18} {:<13} {:>10}",
        record.category().icon(),
        truncate(record.name(), NAME_WIDTH),
        truncate(record.category().label(), 18),
        record.display_date(),
        record.formatted_amount(),
        name_width = NAME_WIDTH,
    )
}

/// Tronque à `max` caractères avec une ellipse si nécessaire
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max - 1).collect();
        format!("{truncated}…")
    }
}

// ============================================================================
// Formulaire d'ajout
// ============================================================================

fn render_form(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green))
        .title(" Nouvelle dépense ");

    let error_field = match app.status.as_ref().map(|s| &s.kind) {
        Some(StatusKind::Error(field)) => *field,
        _ => None,
    };

    let form = &app.form;
    let lines = vec![
        form_line(
            "Nom       : ",
            form.name.clone(),
            form.focus == FormFocus::Name,
            error_field == Some(FormField::Name),
        ),
        form_line(
            "Montant   : ",
            form.amount.clone(),
            form.focus == FormFocus::Amount,
            error_field == Some(FormField::Amount),
        ),
        form_line(
            "Catégorie : ",
            format!("◀ {} ▶", form.category),
            form.focus == FormFocus::Category,
            false,
        ),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn form_line(label: &'static str, value: String, focused: bool, has_error: bool) -> Line<'static> {
    let label_style = if has_error {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else if focused {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };

    let mut spans = vec![
        Span::styled(label, label_style),
        Span::styled(value, Style::default().fg(Color::White)),
    ];
    if focused {
        spans.push(Span::styled(
            "█",
            Style::default().fg(Color::White).add_modifier(Modifier::SLOW_BLINK),
        ));
    }
    Line::from(spans)
}

// ============================================================================
// Footer : confirmations, messages et raccourcis
// ============================================================================

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let line = if app.is_awaiting_delete_confirmation() {
        let name = app.selected_record().map(|r| r.name()).unwrap_or("?");
        confirmation_line("[d]", &format!(" à nouveau pour supprimer « {name} », autre touche pour annuler ⚠"))
    } else if app.is_awaiting_clear_confirmation() {
        confirmation_line(
            "[C]",
            " à nouveau pour TOUT supprimer (irréversible), autre touche pour annuler ⚠",
        )
    } else if app.is_awaiting_quit_confirmation() {
        confirmation_line("[q]", " à nouveau pour quitter, autre touche pour annuler ⚠")
    } else if let Some(status) = &app.status {
        let color = match status.kind {
            StatusKind::Info => Color::Yellow,
            StatusKind::Success => Color::Green,
            StatusKind::Error(_) => Color::Red,
        };
        Line::from(Span::styled(
            status.text.clone(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
    } else if app.is_in_input_mode() {
        shortcuts(&[
            ("[Tab]", " Champ  ", Color::Yellow),
            ("[←→]", " Catégorie  ", Color::Yellow),
            ("[Enter]", " Valider  ", Color::Green),
            ("[ESC]", " Annuler", Color::Red),
        ])
    } else {
        shortcuts(&[
            ("[q]", " Quit  ", Color::Yellow),
            ("[↑↓ / j k]", " Navigate  ", Color::Yellow),
            ("[a]", " Add  ", Color::Green),
            ("[d]", " Delete  ", Color::Red),
            ("[C]", " Clear all", Color::Red),
        ])
    };

    let paragraph = Paragraph::new(vec![line])
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

fn confirmation_line(key: &'static str, rest: &str) -> Line<'static> {
    let warn = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    Line::from(vec![
        Span::styled("⚠  Appuyez sur ", warn),
        Span::styled(
            key,
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD)
                .add_modifier(Modifier::SLOW_BLINK),
        ),
        Span::styled(rest.to_string(), warn),
    ])
}

fn shortcuts(entries: &[(&'static str, &'static str, Color)]) -> Line<'static> {
    let spans: Vec<Span<'static>> = entries
        .iter()
        .flat_map(|&(key, label, color)| {
            [
                Span::styled(key, Style::default().fg(color).add_modifier(Modifier::BOLD)),
                Span::raw(label),
            ]
        })
        .collect();
    Line::from(spans)
}
