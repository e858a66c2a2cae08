pub mod form;
pub mod keybindings_help;
pub mod meal_edit;
pub mod photo_picker;
pub mod rating;
