use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use crate::config::AppConfig;
use crate::meal::{Meal, Photo};
use crate::meal_form::{
    Dismissal, FormEffect, FormError, FormEvent, FormMode, MealForm, PickedMedia, SaveTarget,
    SavedMeal,
};
use crate::navigation::{Navigator, Screen};
use crate::photo_picker::PhotoPicker;

/// Background work the event loop should start on the app's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    ScanPhotos { dir: PathBuf, show_hidden: bool },
    DecodePhoto(PathBuf),
}

/// Full application state.
pub struct App {
    pub meals: Vec<Meal>,
    /// Index of the selected meal in the list.
    pub selected_index: usize,
    pub nav: Navigator,
    /// The open meal form, if the form screen is on the stack.
    pub form: Option<MealForm>,
    /// Photo picker overlay, presented by the form.
    pub picker: Option<PhotoPicker>,
    pub photos_dir: PathBuf,
    pub show_hidden: bool,
    /// Flash message (error or success), cleared on next keypress.
    pub flash: Option<String>,
    /// Whether the keybindings overlay is visible.
    pub show_keybindings: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            meals: config.initial_meals(),
            selected_index: 0,
            nav: Navigator::new(),
            form: None,
            picker: None,
            photos_dir: config.photos_dir(),
            show_hidden: config.photos.show_hidden,
            flash: None,
            show_keybindings: false,
            should_quit: false,
        }
    }

    pub fn item_count(&self) -> usize {
        self.meals.len()
    }

    pub fn clamp_selection(&mut self) {
        let count = self.item_count();
        if count == 0 {
            self.selected_index = 0;
        } else if self.selected_index >= count {
            self.selected_index = count - 1;
        }
    }

    pub fn move_selection_down(&mut self) {
        let count = self.item_count();
        if count > 0 && self.selected_index < count - 1 {
            self.selected_index += 1;
        }
    }

    pub fn move_selection_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    pub fn selected_meal(&self) -> Option<&Meal> {
        self.meals.get(self.selected_index)
    }

    pub fn is_form_open(&self) -> bool {
        self.form.is_some()
    }

    pub fn toggle_keybindings(&mut self) {
        self.show_keybindings = !self.show_keybindings;
    }

    pub fn close_keybindings(&mut self) {
        self.show_keybindings = false;
    }

    /// Add flow: the form is presented modally over the list.
    pub fn open_add_form(&mut self) {
        let host = self.nav.present_modal(Screen::MealForm);
        self.form = Some(MealForm::new(FormMode::Create, Some(host)));
    }

    /// Edit flow: the form is pushed for the selected meal.
    pub fn open_edit_form(&mut self) {
        let Some(meal) = self.selected_meal().cloned() else {
            return;
        };
        let host = self.nav.push(Screen::MealForm);
        self.form = Some(MealForm::new(
            FormMode::Edit {
                index: self.selected_index,
                meal,
            },
            Some(host),
        ));
    }

    pub fn delete_selected(&mut self) {
        if self.selected_index >= self.meals.len() {
            return;
        }
        let removed = self.meals.remove(self.selected_index);
        info!(name = %removed.name, "meal deleted");
        self.flash = Some(format!("Deleted {}", removed.name));
        self.clamp_selection();
    }

    /// Feed an event to the open form and apply whatever it asks for.
    pub fn dispatch_form(&mut self, event: FormEvent) -> Option<Task> {
        let form = self.form.as_mut()?;
        let result = form.update(event);
        self.handle_form_result(result)
    }

    pub fn form_focus_next(&mut self) {
        if let Some(form) = self.form.as_mut() {
            let result = form.focus_next();
            self.handle_form_result(result);
        }
    }

    pub fn form_focus_prev(&mut self) {
        if let Some(form) = self.form.as_mut() {
            let result = form.focus_prev();
            self.handle_form_result(result);
        }
    }

    fn handle_form_result(&mut self, result: Result<FormEffect, FormError>) -> Option<Task> {
        match result {
            Ok(effect) => self.apply_effect(effect),
            Err(FormError::SaveDisabled) => {
                // Save is simply unavailable until the name is filled in.
                debug!("save requested with an empty meal name");
                None
            }
            Err(e) => {
                error!(error = %e, "meal form wiring error");
                self.flash = Some(format!("Form error: {}", e));
                None
            }
        }
    }

    fn apply_effect(&mut self, effect: FormEffect) -> Option<Task> {
        match effect {
            FormEffect::None => None,
            FormEffect::PresentPicker => {
                self.picker = Some(PhotoPicker::new(self.photos_dir.clone()));
                Some(Task::ScanPhotos {
                    dir: self.photos_dir.clone(),
                    show_hidden: self.show_hidden,
                })
            }
            FormEffect::DismissPicker => {
                self.picker = None;
                None
            }
            FormEffect::Saved { saved, dismissal } => {
                self.flash = Some(format!("Saved {}", saved.meal.name));
                self.apply_saved(saved);
                self.close_form(dismissal);
                None
            }
            FormEffect::Dismiss(dismissal) => {
                self.close_form(dismissal);
                None
            }
        }
    }

    pub fn apply_saved(&mut self, saved: SavedMeal) {
        match saved.target {
            SaveTarget::Replace(index) if index < self.meals.len() => {
                self.meals[index] = saved.meal;
                self.selected_index = index;
            }
            SaveTarget::Replace(index) => {
                warn!(index, "edited meal no longer in list, appending");
                self.meals.push(saved.meal);
                self.selected_index = self.meals.len() - 1;
            }
            SaveTarget::Insert => {
                self.meals.push(saved.meal);
                self.selected_index = self.meals.len() - 1;
            }
        }
    }

    fn close_form(&mut self, dismissal: Dismissal) {
        let result = match dismissal {
            Dismissal::Modal => self.nav.dismiss_modal(),
            Dismissal::Pop => self.nav.pop(),
        };
        if let Err(e) = result {
            error!(error = %e, ?dismissal, "navigation out of sync with form");
            self.flash = Some(format!("Navigation error: {}", e));
        }
        if let Some(form) = self.form.take() {
            debug!(
                lifecycle = ?form.lifecycle(),
                depth = self.nav.depth(),
                "meal form closed"
            );
        }
        self.picker = None;
    }

    pub fn photos_listed(&mut self, dir: &Path, result: std::result::Result<Vec<PathBuf>, String>) {
        let Some(picker) = self.picker.as_mut() else {
            return;
        };
        if picker.dir != dir {
            return;
        }
        if let Err(e) = &result {
            warn!(error = %e, dir = %dir.display(), "photo scan failed");
        }
        picker.set_entries(result);
    }

    /// Start decoding the picker's selected entry.
    pub fn pick_selected_photo(&mut self) -> Option<Task> {
        let path = self.picker.as_mut()?.begin_decode()?;
        Some(Task::DecodePhoto(path))
    }

    pub fn photo_decoded(&mut self, path: &Path, result: std::result::Result<Photo, String>) {
        let Some(picker) = self.picker.as_mut() else {
            return;
        };
        if let Err(e) = &result {
            warn!(error = %e, path = %path.display(), "photo decode failed");
        }
        if let Some(photo) = picker.finish_decode(path, result) {
            self.dispatch_form(FormEvent::PhotoPicked(PickedMedia {
                original: Some(photo),
            }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meal::Rating;
    use crate::navigation::Presentation;

    fn app() -> App {
        App::new(&AppConfig::default())
    }

    fn type_name(app: &mut App, text: &str) {
        app.dispatch_form(FormEvent::NameEditingStarted);
        app.dispatch_form(FormEvent::NameChanged(text.to_string()));
        app.dispatch_form(FormEvent::NameEditingEnded);
    }

    #[test]
    fn starts_with_sample_meals_on_the_list_screen() {
        let app = app();
        assert_eq!(app.item_count(), 3);
        assert_eq!(app.nav.top(), Screen::MealList);
        assert!(!app.is_form_open());
    }

    #[test]
    fn selection_is_clamped_to_list() {
        let mut app = app();
        for _ in 0..10 {
            app.move_selection_down();
        }
        assert_eq!(app.selected_index, 2);
        app.move_selection_up();
        assert_eq!(app.selected_index, 1);
    }

    #[test]
    fn add_flow_is_modal_and_inserts_on_save() {
        let mut app = app();
        app.open_add_form();
        assert_eq!(app.nav.top_presentation(), Some(Presentation::Modal));

        type_name(&mut app, "Ramen");
        app.dispatch_form(FormEvent::RatingChanged(Rating::clamped(5)));
        app.dispatch_form(FormEvent::SaveConfirmed);

        assert!(!app.is_form_open());
        assert_eq!(app.nav.top(), Screen::MealList);
        assert_eq!(app.item_count(), 4);
        assert_eq!(app.selected_index, 3);
        assert_eq!(app.meals[3].name, "Ramen");
        assert_eq!(app.flash.as_deref(), Some("Saved Ramen"));
    }

    #[test]
    fn edit_flow_is_pushed_and_replaces_on_save() {
        let mut app = app();
        app.move_selection_down();
        app.open_edit_form();
        assert_eq!(app.nav.top_presentation(), Some(Presentation::Pushed));
        assert_eq!(app.form.as_ref().unwrap().name, "Chicken and Potatoes");

        type_name(&mut app, "Roast Chicken");
        app.dispatch_form(FormEvent::SaveConfirmed);

        assert_eq!(app.item_count(), 3);
        assert_eq!(app.meals[1].name, "Roast Chicken");
        assert_eq!(app.meals[1].rating.value(), 5);
        assert_eq!(app.nav.depth(), 1);
    }

    #[test]
    fn cancel_leaves_list_untouched() {
        let mut app = app();
        app.open_edit_form();
        type_name(&mut app, "Something else");
        app.dispatch_form(FormEvent::CancelRequested);
        assert!(!app.is_form_open());
        assert_eq!(app.meals[0].name, "Caprese Salad");
        assert_eq!(app.nav.depth(), 1);
        assert!(app.flash.is_none());
    }

    #[test]
    fn empty_name_save_is_unavailable() {
        let mut app = app();
        app.open_add_form();
        app.dispatch_form(FormEvent::SaveConfirmed);
        assert!(app.is_form_open());
        assert_eq!(app.item_count(), 3);
        assert!(app.flash.is_none());
    }

    #[test]
    fn picker_flow_attaches_decoded_photo() {
        let mut app = app();
        app.open_edit_form();
        let task = app.dispatch_form(FormEvent::PhotoPickRequested);
        assert_eq!(
            task,
            Some(Task::ScanPhotos {
                dir: PathBuf::from("."),
                show_hidden: false,
            })
        );
        assert!(app.picker.as_ref().unwrap().scanning);

        let path = PathBuf::from("./salad.png");
        app.photos_listed(Path::new("."), Ok(vec![path.clone()]));
        assert_eq!(app.pick_selected_photo(), Some(Task::DecodePhoto(path.clone())));

        let photo = Photo {
            path: path.clone(),
            width: 10,
            height: 8,
        };
        app.photo_decoded(&path, Ok(photo.clone()));
        assert!(app.picker.is_none());
        assert_eq!(app.form.as_ref().unwrap().photo, Some(photo.clone()));

        app.dispatch_form(FormEvent::SaveConfirmed);
        assert_eq!(app.meals[0].photo, Some(photo));
    }

    #[test]
    fn picker_cancel_keeps_form_open() {
        let mut app = app();
        app.open_add_form();
        app.dispatch_form(FormEvent::PhotoPickRequested);
        app.dispatch_form(FormEvent::PhotoPickCancelled);
        assert!(app.picker.is_none());
        assert!(app.is_form_open());
        assert!(app.form.as_ref().unwrap().photo.is_none());
    }

    #[test]
    fn listing_for_other_dir_is_ignored() {
        let mut app = app();
        app.open_add_form();
        app.dispatch_form(FormEvent::PhotoPickRequested);
        app.photos_listed(Path::new("/elsewhere"), Ok(vec![PathBuf::from("/elsewhere/a.png")]));
        let picker = app.picker.as_ref().unwrap();
        assert!(picker.scanning);
        assert!(picker.entries.is_empty());
    }

    #[test]
    fn delete_removes_selected_and_clamps() {
        let mut app = app();
        app.move_selection_down();
        app.move_selection_down();
        app.delete_selected();
        assert_eq!(app.item_count(), 2);
        assert_eq!(app.selected_index, 1);
        assert_eq!(app.flash.as_deref(), Some("Deleted Pasta with Meatballs"));
    }

    #[test]
    fn edit_with_empty_list_does_nothing() {
        let config = crate::config::parse_config("sample_meals = false").unwrap();
        let mut app = App::new(&config);
        app.open_edit_form();
        assert!(!app.is_form_open());
        assert_eq!(app.nav.depth(), 1);
        app.delete_selected();
        assert_eq!(app.item_count(), 0);
    }

    #[test]
    fn replace_for_vanished_meal_appends() {
        let mut app = app();
        app.apply_saved(SavedMeal {
            meal: Meal::new("Late edit", None, Rating::default()),
            target: SaveTarget::Replace(42),
        });
        assert_eq!(app.item_count(), 4);
        assert_eq!(app.selected_index, 3);
    }

    #[test]
    fn unhosted_form_save_keeps_list_and_stack() {
        let mut app = app();
        app.form = Some(MealForm::new(FormMode::Create, None));
        app.dispatch_form(FormEvent::NameChanged("Soup".to_string()));
        app.dispatch_form(FormEvent::SaveConfirmed);

        assert_eq!(app.item_count(), 3);
        assert_eq!(app.nav.depth(), 1);
        assert!(app.is_form_open());
        assert!(app
            .flash
            .as_deref()
            .is_some_and(|f| f.contains("navigation host")));
    }
}
