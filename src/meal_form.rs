//! The create/edit meal form.
//!
//! The form owns the name text, photo and rating being edited plus the
//! save-enabled flag. Every user action arrives as a [`FormEvent`] and comes
//! back as a [`FormEffect`] the host applies (present or dismiss the picker,
//! hand a saved meal to the list, leave the screen).

use thiserror::Error;
use tracing::{debug, info};

use crate::meal::{Meal, Photo, Rating};
use crate::navigation::Presentation;

/// Whether the form edits an existing meal or creates a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit { index: usize, meal: Meal },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Photo,
    Rating,
}

impl FormField {
    fn next(self) -> Self {
        match self {
            FormField::Name => FormField::Photo,
            FormField::Photo => FormField::Rating,
            FormField::Rating => FormField::Name,
        }
    }

    fn prev(self) -> Self {
        match self {
            FormField::Name => FormField::Rating,
            FormField::Photo => FormField::Name,
            FormField::Rating => FormField::Photo,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Unsaved,
    Dismissed,
}

/// What the picker handed back. `original` is empty only when the picker
/// finished without the image it was asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedMedia {
    pub original: Option<Photo>,
}

/// Where the saved meal goes in the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveTarget {
    Insert,
    Replace(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedMeal {
    pub meal: Meal,
    pub target: SaveTarget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dismissal {
    Modal,
    Pop,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    NameChanged(String),
    NameEditingStarted,
    NameEditingEnded,
    RatingChanged(Rating),
    PhotoPickRequested,
    PhotoPicked(PickedMedia),
    PhotoPickCancelled,
    SaveConfirmed,
    CancelRequested,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEffect {
    /// State changed; nothing for the host to do beyond redrawing.
    None,
    PresentPicker,
    DismissPicker,
    /// The record for the list, plus how the host should close the form.
    Saved {
        saved: SavedMeal,
        dismissal: Dismissal,
    },
    Dismiss(Dismissal),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("save is not available while the meal name is empty")]
    SaveDisabled,
    #[error("photo picker finished without an image")]
    MissingPhotoPayload,
    #[error("meal form is not inside a navigation host")]
    NoNavigationHost,
    #[error("meal form was already dismissed")]
    Dismissed,
}

#[derive(Debug, Clone)]
pub struct MealForm {
    mode: FormMode,
    host: Option<Presentation>,
    pub name: String,
    pub photo: Option<Photo>,
    pub rating: Rating,
    save_enabled: bool,
    title: Option<String>,
    lifecycle: Lifecycle,
    focused: FormField,
    editing_name: bool,
    picker_open: bool,
}

impl MealForm {
    /// Build a form for `mode`, hosted with the given presentation, and load
    /// the initial record.
    pub fn new(mode: FormMode, host: Option<Presentation>) -> Self {
        let mut form = Self {
            mode: FormMode::Create,
            host,
            name: String::new(),
            photo: None,
            rating: Rating::default(),
            save_enabled: false,
            title: None,
            lifecycle: Lifecycle::Unsaved,
            focused: FormField::Name,
            editing_name: false,
            picker_open: false,
        };
        form.load_initial(mode);
        form
    }

    pub fn load_initial(&mut self, mode: FormMode) {
        if let FormMode::Edit { meal, .. } = &mode {
            self.title = Some(meal.name.clone());
            self.name = meal.name.clone();
            self.photo = meal.photo.clone();
            self.rating = meal.rating;
        }
        self.mode = mode;
        self.update_save_state();
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn host(&self) -> Option<Presentation> {
        self.host
    }

    pub fn save_enabled(&self) -> bool {
        self.save_enabled
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn focused(&self) -> FormField {
        self.focused
    }

    pub fn is_editing_name(&self) -> bool {
        self.editing_name
    }

    pub fn is_picker_open(&self) -> bool {
        self.picker_open
    }

    pub fn update(&mut self, event: FormEvent) -> Result<FormEffect, FormError> {
        match event {
            FormEvent::NameChanged(text) => self.on_name_changed(text),
            FormEvent::NameEditingStarted => self.on_name_editing_started(),
            FormEvent::NameEditingEnded => self.on_name_editing_ended(),
            FormEvent::RatingChanged(rating) => self.on_rating_changed(rating),
            FormEvent::PhotoPickRequested => self.on_photo_pick_requested(),
            FormEvent::PhotoPicked(media) => self.on_photo_picked(media),
            FormEvent::PhotoPickCancelled => self.on_photo_pick_cancelled(),
            FormEvent::SaveConfirmed => self.on_save_confirmed(),
            FormEvent::CancelRequested => self.on_cancel_requested(),
        }
    }

    pub fn on_name_changed(&mut self, text: String) -> Result<FormEffect, FormError> {
        self.ensure_unsaved()?;
        self.name = text;
        self.update_save_state();
        Ok(FormEffect::None)
    }

    pub fn on_name_editing_started(&mut self) -> Result<FormEffect, FormError> {
        self.ensure_unsaved()?;
        self.editing_name = true;
        self.save_enabled = false;
        Ok(FormEffect::None)
    }

    pub fn on_name_editing_ended(&mut self) -> Result<FormEffect, FormError> {
        self.ensure_unsaved()?;
        self.editing_name = false;
        self.update_save_state();
        self.title = Some(self.name.clone());
        Ok(FormEffect::None)
    }

    pub fn on_rating_changed(&mut self, rating: Rating) -> Result<FormEffect, FormError> {
        self.ensure_unsaved()?;
        self.rating = rating;
        Ok(FormEffect::None)
    }

    pub fn on_photo_pick_requested(&mut self) -> Result<FormEffect, FormError> {
        self.ensure_unsaved()?;
        if self.editing_name {
            self.on_name_editing_ended()?;
        }
        self.picker_open = true;
        debug!("presenting photo picker");
        Ok(FormEffect::PresentPicker)
    }

    pub fn on_photo_picked(&mut self, media: PickedMedia) -> Result<FormEffect, FormError> {
        self.ensure_unsaved()?;
        let photo = media.original.ok_or(FormError::MissingPhotoPayload)?;
        debug!(path = %photo.path.display(), "photo picked");
        self.photo = Some(photo);
        self.picker_open = false;
        Ok(FormEffect::DismissPicker)
    }

    pub fn on_photo_pick_cancelled(&mut self) -> Result<FormEffect, FormError> {
        self.ensure_unsaved()?;
        self.picker_open = false;
        Ok(FormEffect::DismissPicker)
    }

    pub fn on_save_confirmed(&mut self) -> Result<FormEffect, FormError> {
        self.ensure_unsaved()?;
        if !self.save_enabled {
            return Err(FormError::SaveDisabled);
        }
        let dismissal = self.host_dismissal()?;

        let meal = Meal::new(self.name.clone(), self.photo.clone(), self.rating);
        let target = match &self.mode {
            FormMode::Create => SaveTarget::Insert,
            FormMode::Edit { index, .. } => SaveTarget::Replace(*index),
        };
        self.lifecycle = Lifecycle::Dismissed;
        info!(name = %meal.name, rating = meal.rating.value(), ?target, "meal saved");
        Ok(FormEffect::Saved {
            saved: SavedMeal { meal, target },
            dismissal,
        })
    }

    pub fn on_cancel_requested(&mut self) -> Result<FormEffect, FormError> {
        self.ensure_unsaved()?;
        let dismissal = self.host_dismissal()?;
        self.lifecycle = Lifecycle::Dismissed;
        info!(?dismissal, "meal form cancelled");
        Ok(FormEffect::Dismiss(dismissal))
    }

    /// Move focus forward, ending name editing when focus leaves the name.
    pub fn focus_next(&mut self) -> Result<FormEffect, FormError> {
        let next = self.focused.next();
        self.move_focus(next)
    }

    pub fn focus_prev(&mut self) -> Result<FormEffect, FormError> {
        let prev = self.focused.prev();
        self.move_focus(prev)
    }

    fn move_focus(&mut self, field: FormField) -> Result<FormEffect, FormError> {
        self.ensure_unsaved()?;
        if self.focused == FormField::Name && field != FormField::Name && self.editing_name {
            self.on_name_editing_ended()?;
        }
        self.focused = field;
        Ok(FormEffect::None)
    }

    fn host_dismissal(&self) -> Result<Dismissal, FormError> {
        match self.host {
            Some(Presentation::Modal) => Ok(Dismissal::Modal),
            Some(Presentation::Pushed) => Ok(Dismissal::Pop),
            None => Err(FormError::NoNavigationHost),
        }
    }

    fn ensure_unsaved(&self) -> Result<(), FormError> {
        match self.lifecycle {
            Lifecycle::Unsaved => Ok(()),
            Lifecycle::Dismissed => Err(FormError::Dismissed),
        }
    }

    fn update_save_state(&mut self) {
        self.save_enabled = !self.name.trim().is_empty();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn pasta() -> Meal {
        Meal::new("Pasta", None, Rating::clamped(4))
    }

    fn photo(name: &str) -> Photo {
        Photo {
            path: PathBuf::from(format!("/photos/{}", name)),
            width: 32,
            height: 24,
        }
    }

    fn edit_form() -> MealForm {
        MealForm::new(
            FormMode::Edit {
                index: 2,
                meal: pasta(),
            },
            Some(Presentation::Pushed),
        )
    }

    #[test]
    fn create_mode_starts_empty_with_save_disabled() {
        let form = MealForm::new(FormMode::Create, Some(Presentation::Modal));
        assert_eq!(form.name, "");
        assert!(form.photo.is_none());
        assert_eq!(form.rating.value(), 0);
        assert!(!form.save_enabled());
        assert_eq!(form.title(), None);
        assert_eq!(form.lifecycle(), Lifecycle::Unsaved);
    }

    #[test]
    fn loading_existing_meal_populates_fields() {
        let form = edit_form();
        assert_eq!(form.name, "Pasta");
        assert_eq!(form.rating.value(), 4);
        assert!(form.photo.is_none());
        assert!(form.save_enabled());
        assert_eq!(form.title(), Some("Pasta"));
    }

    #[test]
    fn save_enabled_tracks_trimmed_name() {
        let mut form = MealForm::new(FormMode::Create, Some(Presentation::Modal));
        for (text, expected) in [
            ("", false),
            ("   ", false),
            ("\t\n", false),
            ("Soup", true),
            ("  Soup  ", true),
        ] {
            form.on_name_changed(text.to_string()).unwrap();
            assert_eq!(form.save_enabled(), expected, "text {:?}", text);
        }
    }

    #[test]
    fn repeated_identical_name_change_keeps_flag() {
        let mut form = MealForm::new(FormMode::Create, Some(Presentation::Modal));
        form.on_name_changed("Tacos".to_string()).unwrap();
        let first = form.save_enabled();
        form.on_name_changed("Tacos".to_string()).unwrap();
        assert_eq!(form.save_enabled(), first);
    }

    #[test]
    fn editing_started_forces_save_disabled() {
        let mut form = edit_form();
        assert!(form.save_enabled());
        form.on_name_editing_started().unwrap();
        assert!(!form.save_enabled());
        assert!(form.is_editing_name());
    }

    #[test]
    fn editing_ended_recomputes_flag_and_title() {
        let mut form = edit_form();
        form.on_name_editing_started().unwrap();
        form.on_name_changed("Pasta Carbonara".to_string()).unwrap();
        form.on_name_editing_ended().unwrap();
        assert!(form.save_enabled());
        assert_eq!(form.title(), Some("Pasta Carbonara"));
        assert!(!form.is_editing_name());
    }

    #[test]
    fn picked_photo_is_saved_with_meal() {
        let mut form = edit_form();
        assert_eq!(form.on_photo_pick_requested(), Ok(FormEffect::PresentPicker));
        assert!(form.is_picker_open());
        let img = photo("pasta.png");
        let effect = form
            .on_photo_picked(PickedMedia {
                original: Some(img.clone()),
            })
            .unwrap();
        assert_eq!(effect, FormEffect::DismissPicker);
        assert!(!form.is_picker_open());

        match form.on_save_confirmed().unwrap() {
            FormEffect::Saved { saved, dismissal } => {
                assert_eq!(dismissal, Dismissal::Pop);
                assert_eq!(saved.meal.photo, Some(img));
                assert_eq!(saved.meal.name, "Pasta");
                assert_eq!(saved.meal.rating.value(), 4);
                assert_eq!(saved.target, SaveTarget::Replace(2));
            }
            other => panic!("unexpected effect {:?}", other),
        }
        assert_eq!(form.lifecycle(), Lifecycle::Dismissed);
    }

    #[test]
    fn cancelled_pick_keeps_existing_photo() {
        let existing = photo("old.jpg");
        let meal = Meal::new("Salad", Some(existing.clone()), Rating::default());
        let mut form = MealForm::new(
            FormMode::Edit { index: 0, meal },
            Some(Presentation::Pushed),
        );
        form.on_photo_pick_requested().unwrap();
        assert_eq!(form.on_photo_pick_cancelled(), Ok(FormEffect::DismissPicker));
        assert_eq!(form.photo, Some(existing));
    }

    #[test]
    fn picker_result_without_image_is_rejected() {
        let mut form = edit_form();
        form.on_photo_pick_requested().unwrap();
        assert_eq!(
            form.on_photo_picked(PickedMedia { original: None }),
            Err(FormError::MissingPhotoPayload)
        );
        assert!(form.photo.is_none());
    }

    #[test]
    fn requesting_picker_ends_name_editing() {
        let mut form = MealForm::new(FormMode::Create, Some(Presentation::Modal));
        form.on_name_editing_started().unwrap();
        form.on_name_changed("Curry".to_string()).unwrap();
        form.on_photo_pick_requested().unwrap();
        assert!(!form.is_editing_name());
        assert_eq!(form.title(), Some("Curry"));
    }

    #[test]
    fn create_mode_save_inserts_new_meal() {
        let mut form = MealForm::new(FormMode::Create, Some(Presentation::Modal));
        form.update(FormEvent::NameChanged("Ramen".to_string())).unwrap();
        form.update(FormEvent::RatingChanged(Rating::clamped(5))).unwrap();
        let effect = form.update(FormEvent::SaveConfirmed).unwrap();
        assert_eq!(
            effect,
            FormEffect::Saved {
                saved: SavedMeal {
                    meal: Meal::new("Ramen", None, Rating::clamped(5)),
                    target: SaveTarget::Insert,
                },
                dismissal: Dismissal::Modal,
            }
        );
    }

    #[test]
    fn save_with_empty_name_is_refused() {
        let mut form = MealForm::new(FormMode::Create, Some(Presentation::Modal));
        form.on_name_changed("  ".to_string()).unwrap();
        assert_eq!(form.on_save_confirmed(), Err(FormError::SaveDisabled));
        assert_eq!(form.lifecycle(), Lifecycle::Unsaved);
    }

    #[test]
    fn cancel_signals_dismissal_matching_presentation() {
        let mut modal = MealForm::new(FormMode::Create, Some(Presentation::Modal));
        assert_eq!(
            modal.on_cancel_requested(),
            Ok(FormEffect::Dismiss(Dismissal::Modal))
        );

        let mut pushed = edit_form();
        assert_eq!(
            pushed.on_cancel_requested(),
            Ok(FormEffect::Dismiss(Dismissal::Pop))
        );
    }

    #[test]
    fn cancel_without_host_fails() {
        let mut form = MealForm::new(FormMode::Create, None);
        assert_eq!(form.on_cancel_requested(), Err(FormError::NoNavigationHost));
        assert_eq!(form.lifecycle(), Lifecycle::Unsaved);
    }

    #[test]
    fn save_without_host_fails() {
        let mut form = MealForm::new(FormMode::Create, None);
        form.on_name_changed("Soup".to_string()).unwrap();
        assert!(form.save_enabled());
        assert_eq!(form.on_save_confirmed(), Err(FormError::NoNavigationHost));
        assert_eq!(form.lifecycle(), Lifecycle::Unsaved);
    }

    #[test]
    fn events_after_dismissal_fail() {
        let mut form = edit_form();
        form.on_cancel_requested().unwrap();
        assert_eq!(
            form.update(FormEvent::NameChanged("x".to_string())),
            Err(FormError::Dismissed)
        );
        assert_eq!(form.update(FormEvent::SaveConfirmed), Err(FormError::Dismissed));
        assert_eq!(form.update(FormEvent::CancelRequested), Err(FormError::Dismissed));
    }

    #[test]
    fn leaving_name_field_ends_editing() {
        let mut form = MealForm::new(FormMode::Create, Some(Presentation::Modal));
        form.on_name_editing_started().unwrap();
        form.on_name_changed("Pho".to_string()).unwrap();
        form.focus_next().unwrap();
        assert_eq!(form.focused(), FormField::Photo);
        assert!(!form.is_editing_name());
        assert_eq!(form.title(), Some("Pho"));
        form.focus_prev().unwrap();
        form.focus_prev().unwrap();
        assert_eq!(form.focused(), FormField::Rating);
    }
}
