// ============================================================================
// Structure : App
// ============================================================================
// Gère l'état de l'application TUI
//
// CONCEPTS RUST :
// 1. State Management : l'état d'écran (sélection, formulaire,
//    confirmations, messages) est centralisé dans App
// 2. L'ExpenseStore reste la seule source de vérité des dépenses ;
//    App n'en garde qu'une projection (ViewState) recalculée après
//    chaque mutation
// 3. Confirmations en deux temps : la deuxième pression de touche vaut
//    confirmation, le presenter reçoit alors un `|_| true`
// ============================================================================

use std::time::{Duration, Instant};

use tracing::{debug, error, info};

use crate::models::{Category, ExpenseRecord};
use crate::presenter::{
    self, ClearOutcome, DeleteOutcome, FormField, SubmitError, ViewState,
};
use crate::store::ExpenseStore;

/// Durée d'affichage d'une erreur de saisie
pub const ERROR_DISPLAY: Duration = Duration::from_secs(3);

/// Durée d'affichage d'un message de succès
pub const SUCCESS_DISPLAY: Duration = Duration::from_millis(1500);

// ============================================================================
// Enum : Screen
// ============================================================================

/// Écrans de l'application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Vue principale : liste des dépenses
    Dashboard,

    /// Mode saisie : formulaire d'ajout d'une dépense
    InputMode,
}

/// Champ actif du formulaire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormFocus {
    Name,
    Amount,
    Category,
}

impl FormFocus {
    fn next(self) -> Self {
        match self {
            FormFocus::Name => FormFocus::Amount,
            FormFocus::Amount => FormFocus::Category,
            FormFocus::Category => FormFocus::Name,
        }
    }

    fn previous(self) -> Self {
        match self {
            FormFocus::Name => FormFocus::Category,
            FormFocus::Amount => FormFocus::Name,
            FormFocus::Category => FormFocus::Amount,
        }
    }
}

impl From<FormField> for FormFocus {
    fn from(field: FormField) -> Self {
        match field {
            FormField::Name => FormFocus::Name,
            FormField::Amount => FormFocus::Amount,
        }
    }
}

/// Formulaire d'ajout (valeurs brutes, validées à la soumission)
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseForm {
    pub name: String,
    pub amount: String,
    pub category: Category,
    pub focus: FormFocus,
}

impl Default for ExpenseForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            amount: String::new(),
            category: Category::Food,
            focus: FormFocus::Name,
        }
    }
}

/// Nature d'un message de statut
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    /// Erreur, éventuellement rattachée à un champ du formulaire
    Error(Option<FormField>),
}

/// Message affiché dans le footer, éventuellement temporaire
#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
    expires_at: Option<Instant>,
}

impl StatusMessage {
    fn transient(text: impl Into<String>, kind: StatusKind, ttl: Duration) -> Self {
        Self {
            text: text.into(),
            kind,
            expires_at: Some(Instant::now() + ttl),
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.map(|at| now >= at).unwrap_or(false)
    }
}

/// État principal de l'application
pub struct App {
    /// Indique si l'application doit continuer à tourner
    pub running: bool,

    /// Source de vérité des dépenses
    pub store: ExpenseStore,

    /// Projection du store pour l'affichage (recalculée après mutation)
    pub view: ViewState,

    /// Index de la dépense sélectionnée dans `view.records`
    pub selected_index: usize,

    /// Écran actuellement affiché
    pub current_screen: Screen,

    /// Quit en deux temps : 'q' puis 'q'
    pub confirm_quit: bool,

    /// Suppression en deux temps : 'd' puis 'd'
    pub confirm_delete: bool,

    /// Remise à zéro en deux temps : 'C' puis 'C'
    pub confirm_clear: bool,

    /// Formulaire d'ajout
    pub form: ExpenseForm,

    /// Message de statut courant (erreur, succès, info)
    pub status: Option<StatusMessage>,

    /// Avertissement permanent si les données ne sont pas persistées
    pub persistence_warning: Option<String>,
}

impl App {
    /// Crée l'application autour d'un store déjà chargé
    pub fn new(store: ExpenseStore) -> Self {
        let view = presenter::derive_view_state(&store);
        Self {
            running: true,
            store,
            view,
            selected_index: 0,
            current_screen: Screen::Dashboard,
            confirm_quit: false,
            confirm_delete: false,
            confirm_clear: false,
            form: ExpenseForm::default(),
            status: None,
            persistence_warning: None,
        }
    }

    /// Signale que la session tourne sans persistance
    pub fn with_persistence_warning(mut self, warning: impl Into<String>) -> Self {
        self.persistence_warning = Some(warning.into());
        self
    }

    /// Recalcule la vue depuis le store et garde une sélection valide
    pub fn refresh(&mut self) {
        self.view = presenter::derive_view_state(&self.store);
        let max_index = self.view.count.saturating_sub(1);
        self.selected_index = self.selected_index.min(max_index);
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Tick : appelé à chaque itération de la boucle, expire les messages
    pub fn tick(&mut self) {
        self.expire_status(Instant::now());
    }

    /// Efface le message de statut s'il a expiré à `now`
    pub fn expire_status(&mut self, now: Instant) {
        if self.status.as_ref().is_some_and(|s| s.is_expired(now)) {
            self.status = None;
        }
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    pub fn navigate_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    pub fn navigate_down(&mut self) {
        let max_index = self.view.count.saturating_sub(1);
        self.selected_index = (self.selected_index + 1).min(max_index);
    }

    /// Dépense sélectionnée (None si la liste est vide)
    pub fn selected_record(&self) -> Option<&ExpenseRecord> {
        self.view.records.get(self.selected_index)
    }

    pub fn is_on_dashboard(&self) -> bool {
        self.current_screen == Screen::Dashboard
    }

    pub fn is_in_input_mode(&self) -> bool {
        self.current_screen == Screen::InputMode
    }

    // ========================================================================
    // Confirmations
    // ========================================================================

    pub fn request_quit(&mut self) {
        self.confirm_quit = true;
    }

    pub fn is_awaiting_quit_confirmation(&self) -> bool {
        self.confirm_quit
    }

    pub fn request_delete(&mut self) {
        if self.selected_record().is_some() {
            self.confirm_delete = true;
        }
    }

    pub fn is_awaiting_delete_confirmation(&self) -> bool {
        self.confirm_delete
    }

    /// Demande la remise à zéro ; une liste vide est signalée sans confirmation
    pub fn request_clear(&mut self) {
        if self.store.is_empty() {
            self.set_status(StatusMessage::transient(
                "There are no expenses to clear!",
                StatusKind::Info,
                ERROR_DISPLAY,
            ));
            return;
        }
        self.confirm_clear = true;
    }

    pub fn is_awaiting_clear_confirmation(&self) -> bool {
        self.confirm_clear
    }

    /// Annule toute confirmation en attente, sans autre changement
    pub fn cancel_confirmations(&mut self) {
        self.confirm_quit = false;
        self.confirm_delete = false;
        self.confirm_clear = false;
    }

    /// Supprime la dépense sélectionnée (confirmation déjà obtenue)
    pub fn delete_selected(&mut self) {
        self.confirm_delete = false;
        let Some(id) = self.selected_record().map(|r| r.id()) else {
            return;
        };

        match presenter::delete_expense(&mut self.store, id, |_| true) {
            Ok(DeleteOutcome::Deleted(record)) => {
                self.set_status(StatusMessage::transient(
                    format!("Deleted {}", record.name()),
                    StatusKind::Success,
                    SUCCESS_DISPLAY,
                ));
            }
            Ok(DeleteOutcome::NotFound) | Ok(DeleteOutcome::Cancelled) => {
                debug!(%id, "Nothing deleted");
            }
            Err(e) => {
                error!(%id, error = %e, "Delete failed");
                self.set_status(StatusMessage::transient(
                    format!("Could not delete: {e}"),
                    StatusKind::Error(None),
                    ERROR_DISPLAY,
                ));
            }
        }
        self.refresh();
    }

    /// Vide toute la liste (confirmation déjà obtenue)
    pub fn clear_all(&mut self) {
        self.confirm_clear = false;

        match presenter::clear_expenses(&mut self.store, |_| true) {
            Ok(ClearOutcome::Cleared(count)) => {
                self.set_status(StatusMessage::transient(
                    format!("Cleared {count} expenses"),
                    StatusKind::Success,
                    SUCCESS_DISPLAY,
                ));
            }
            Ok(ClearOutcome::AlreadyEmpty) | Ok(ClearOutcome::Cancelled) => {}
            Err(e) => {
                error!(error = %e, "Clear failed");
                self.set_status(StatusMessage::transient(
                    format!("Could not clear: {e}"),
                    StatusKind::Error(None),
                    ERROR_DISPLAY,
                ));
            }
        }
        self.refresh();
    }

    // ========================================================================
    // Input Mode Management
    // ========================================================================

    /// Ouvre le formulaire d'ajout, vierge
    pub fn start_input(&mut self) {
        self.cancel_confirmations();
        self.current_screen = Screen::InputMode;
        self.form = ExpenseForm::default();
    }

    /// Ferme le formulaire sans rien ajouter
    pub fn cancel_input(&mut self) {
        self.current_screen = Screen::Dashboard;
        self.form = ExpenseForm::default();
    }

    /// Ajoute un caractère au champ texte actif
    pub fn append_char(&mut self, c: char) {
        match self.form.focus {
            FormFocus::Name => self.form.name.push(c),
            FormFocus::Amount => self.form.amount.push(c),
            FormFocus::Category => {}
        }
    }

    /// Supprime le dernier caractère du champ texte actif
    pub fn backspace(&mut self) {
        match self.form.focus {
            FormFocus::Name => {
                self.form.name.pop();
            }
            FormFocus::Amount => {
                self.form.amount.pop();
            }
            FormFocus::Category => {}
        }
    }

    pub fn next_field(&mut self) {
        self.form.focus = self.form.focus.next();
    }

    pub fn previous_field(&mut self) {
        self.form.focus = self.form.focus.previous();
    }

    pub fn next_category(&mut self) {
        self.form.category = self.form.category.next();
    }

    pub fn previous_category(&mut self) {
        self.form.category = self.form.category.previous();
    }

    /// Entrée dans le formulaire : passe au montant depuis le nom,
    /// soumet depuis le montant ou la catégorie
    pub fn enter(&mut self) {
        match self.form.focus {
            FormFocus::Name => self.form.focus = FormFocus::Amount,
            FormFocus::Amount | FormFocus::Category => self.submit_form(),
        }
    }

    /// Valide et ajoute la dépense saisie
    ///
    /// En cas d'erreur le formulaire reste ouvert, le focus va sur le champ
    /// fautif et le message s'affiche quelques secondes.
    pub fn submit_form(&mut self) {
        let result = presenter::submit_expense(
            &mut self.store,
            &self.form.name,
            &self.form.amount,
            self.form.category.clone(),
        );

        match result {
            Ok(record) => {
                info!(id = %record.id(), "Expense submitted from form");
                self.current_screen = Screen::Dashboard;
                self.form = ExpenseForm::default();
                self.refresh();
                self.selected_index = self
                    .view
                    .records
                    .iter()
                    .position(|r| r.id() == record.id())
                    .unwrap_or(0);
                self.set_status(StatusMessage::transient(
                    format!("Added! {} {}", record.name(), record.formatted_amount()),
                    StatusKind::Success,
                    SUCCESS_DISPLAY,
                ));
            }
            Err(e) => {
                let field = e.field();
                if let Some(field) = field {
                    self.form.focus = field.into();
                }
                if let SubmitError::Store(inner) = &e {
                    error!(error = %inner, "Failed to add expense");
                }
                self.set_status(StatusMessage::transient(
                    e.to_string(),
                    StatusKind::Error(field),
                    ERROR_DISPLAY,
                ));
            }
        }
    }

    fn set_status(&mut self, status: StatusMessage) {
        self.status = Some(status);
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::store::DEFAULT_KEY;

    fn app() -> App {
        App::new(ExpenseStore::load(Box::new(MemoryStorage::new()), DEFAULT_KEY))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.append_char(c);
        }
    }

    fn add_through_form(app: &mut App, name: &str, amount: &str) {
        app.start_input();
        type_text(app, name);
        app.enter();
        type_text(app, amount);
        app.enter();
    }

    #[test]
    fn test_app_creation() {
        let app = app();
        assert!(app.is_running());
        assert!(app.view.is_empty);
        assert!(app.is_on_dashboard());
        assert!(app.selected_record().is_none());
    }

    #[test]
    fn test_form_submit_adds_expense() {
        let mut app = app();
        add_through_form(&mut app, "Coffee", "4.50");

        assert!(app.is_on_dashboard());
        assert_eq!(app.view.count, 1);
        assert_eq!(app.selected_record().unwrap().name(), "Coffee");
        assert_eq!(app.status.as_ref().unwrap().kind, StatusKind::Success);
        assert_eq!(app.form, ExpenseForm::default());
    }

    #[test]
    fn test_form_category_selection() {
        let mut app = app();
        app.start_input();
        type_text(&mut app, "Bus");
        app.next_field();
        type_text(&mut app, "2");
        app.next_field();
        assert_eq!(app.form.focus, FormFocus::Category);

        app.append_char('x');
        app.next_category();
        assert_eq!(app.form.category, Category::Transport);
        app.enter();

        let record = app.selected_record().unwrap();
        assert_eq!(record.name(), "Bus");
        assert_eq!(record.category(), &Category::Transport);
    }

    #[test]
    fn test_form_validation_error_keeps_form_open() {
        let mut app = app();
        app.start_input();
        type_text(&mut app, "Tea");
        app.enter();
        type_text(&mut app, "-5");
        app.enter();

        assert!(app.is_in_input_mode());
        assert!(app.view.is_empty);
        assert_eq!(app.form.focus, FormFocus::Amount);
        let status = app.status.as_ref().unwrap();
        assert_eq!(status.kind, StatusKind::Error(Some(FormField::Amount)));
        assert_eq!(status.text, "Please enter a valid amount");

        app.form.focus = FormFocus::Category;
        app.form.name.clear();
        app.submit_form();
        assert_eq!(app.form.focus, FormFocus::Name);
    }

    #[test]
    fn test_backspace_edits_focused_field() {
        let mut app = app();
        app.start_input();
        type_text(&mut app, "Cofee");
        app.backspace();
        app.backspace();
        type_text(&mut app, "fee");
        assert_eq!(app.form.name, "Coffee");

        app.previous_field();
        assert_eq!(app.form.focus, FormFocus::Category);
        app.backspace();
        assert_eq!(app.form.name, "Coffee");
    }

    #[test]
    fn test_cancel_input_discards_form() {
        let mut app = app();
        app.start_input();
        type_text(&mut app, "Coffee");
        app.cancel_input();

        assert!(app.is_on_dashboard());
        assert!(app.view.is_empty);
        assert!(app.form.name.is_empty());
    }

    #[test]
    fn test_navigation_and_delete_selected() {
        let mut app = app();
        add_through_form(&mut app, "Coffee", "4.5");
        add_through_form(&mut app, "Bus", "2");
        add_through_form(&mut app, "Book", "12");

        app.selected_index = 0;
        app.navigate_down();
        app.navigate_down();
        app.navigate_down();
        assert_eq!(app.selected_index, 2);
        app.navigate_up();
        assert_eq!(app.selected_index, 1);

        let target = app.selected_record().unwrap().id();
        app.request_delete();
        assert!(app.is_awaiting_delete_confirmation());
        app.delete_selected();

        assert!(!app.is_awaiting_delete_confirmation());
        assert_eq!(app.view.count, 2);
        assert!(app.store.get(target).is_none());
    }

    #[test]
    fn test_delete_last_item_keeps_selection_in_range() {
        let mut app = app();
        add_through_form(&mut app, "Coffee", "4.5");
        add_through_form(&mut app, "Bus", "2");
        app.selected_index = 1;

        app.request_delete();
        app.delete_selected();
        assert_eq!(app.selected_index, 0);
        assert_eq!(app.view.count, 1);
    }

    #[test]
    fn test_request_delete_on_empty_list_is_ignored() {
        let mut app = app();
        app.request_delete();
        assert!(!app.is_awaiting_delete_confirmation());
    }

    #[test]
    fn test_clear_flow() {
        let mut app = app();
        app.request_clear();
        assert!(!app.is_awaiting_clear_confirmation());
        assert_eq!(app.status.as_ref().unwrap().text, "There are no expenses to clear!");

        add_through_form(&mut app, "Coffee", "4.5");
        add_through_form(&mut app, "Bus", "2");
        app.request_clear();
        assert!(app.is_awaiting_clear_confirmation());

        app.cancel_confirmations();
        assert_eq!(app.view.count, 2);

        app.request_clear();
        app.clear_all();
        assert!(app.view.is_empty);
        assert_eq!(app.view.total, 0.0);
    }

    #[test]
    fn test_status_expires() {
        let mut app = app();
        app.request_clear();
        assert!(app.status.is_some());

        app.expire_status(Instant::now());
        assert!(app.status.is_some());

        app.expire_status(Instant::now() + ERROR_DISPLAY + Duration::from_millis(1));
        assert!(app.status.is_none());
    }

    #[test]
    fn test_quit_two_steps() {
        let mut app = app();
        app.request_quit();
        assert!(app.is_awaiting_quit_confirmation());
        assert!(app.is_running());
        app.quit();
        assert!(!app.is_running());
    }
}
