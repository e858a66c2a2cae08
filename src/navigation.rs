use thiserror::Error;

/// How a screen was put on the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    /// Presented over the list (the add-meal flow).
    Modal,
    /// Pushed onto the stack (the edit-meal flow).
    Pushed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    MealList,
    MealForm,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NavError {
    #[error("no modal screen to dismiss (top is {0:?})")]
    NotModal(Screen),
    #[error("no pushed screen to pop (top is {0:?})")]
    NotPushed(Screen),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Entry {
    screen: Screen,
    presentation: Option<Presentation>,
}

/// Screen stack rooted at the meal list.
#[derive(Debug)]
pub struct Navigator {
    stack: Vec<Entry>,
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            stack: vec![Entry {
                screen: Screen::MealList,
                presentation: None,
            }],
        }
    }

    pub fn top(&self) -> Screen {
        self.stack
            .last()
            .map(|e| e.screen)
            .unwrap_or(Screen::MealList)
    }

    /// Presentation of the top screen; `None` for the root list.
    pub fn top_presentation(&self) -> Option<Presentation> {
        self.stack.last().and_then(|e| e.presentation)
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn present_modal(&mut self, screen: Screen) -> Presentation {
        self.stack.push(Entry {
            screen,
            presentation: Some(Presentation::Modal),
        });
        Presentation::Modal
    }

    pub fn push(&mut self, screen: Screen) -> Presentation {
        self.stack.push(Entry {
            screen,
            presentation: Some(Presentation::Pushed),
        });
        Presentation::Pushed
    }

    pub fn dismiss_modal(&mut self) -> Result<Screen, NavError> {
        self.remove_top(Presentation::Modal)
    }

    pub fn pop(&mut self) -> Result<Screen, NavError> {
        self.remove_top(Presentation::Pushed)
    }

    fn remove_top(&mut self, expected: Presentation) -> Result<Screen, NavError> {
        let top = self.top();
        if self.top_presentation() != Some(expected) {
            return Err(match expected {
                Presentation::Modal => NavError::NotModal(top),
                Presentation::Pushed => NavError::NotPushed(top),
            });
        }
        self.stack.pop();
        Ok(top)
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}
