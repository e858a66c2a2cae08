use std::path::PathBuf;

/// Star rating owned by the rating control.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rating(u8);

impl Rating {
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Option<Self> {
        (value <= Self::MAX).then_some(Self(value))
    }

    pub fn clamped(value: u8) -> Self {
        Self(value.min(Self::MAX))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn increment(self) -> Self {
        Self::clamped(self.0.saturating_add(1))
    }

    pub fn decrement(self) -> Self {
        Self(self.0.saturating_sub(1))
    }

    /// Star-button semantics: choosing the star that is already the current
    /// rating clears it back to zero.
    pub fn select_star(self, star: u8) -> Self {
        let star = Self::clamped(star);
        if star == self {
            Self(0)
        } else {
            star
        }
    }
}

/// A picked image: where it lives and its decoded size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

impl Photo {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// File name plus dimensions, when they are known.
    pub fn describe(&self) -> String {
        if self.width == 0 || self.height == 0 {
            return self.file_name();
        }
        format!("{} ({}x{})", self.file_name(), self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Meal {
    pub name: String,
    pub photo: Option<Photo>,
    pub rating: Rating,
}

impl Meal {
    pub fn new(name: impl Into<String>, photo: Option<Photo>, rating: Rating) -> Self {
        Self {
            name: name.into(),
            photo,
            rating,
        }
    }
}

/// Meals shown on first launch when no seed meals are configured.
pub fn sample_meals() -> Vec<Meal> {
    vec![
        Meal::new("Caprese Salad", None, Rating::clamped(4)),
        Meal::new("Chicken and Potatoes", None, Rating::clamped(5)),
        Meal::new("Pasta with Meatballs", None, Rating::clamped(3)),
    ]
}
