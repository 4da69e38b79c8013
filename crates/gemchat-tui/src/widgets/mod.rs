//! Widgets for the chat box.

pub mod loading;
pub mod status_bar;
pub mod text_input;
pub mod transcript;

pub use loading::LoadingDots;
pub use status_bar::{KeyHint, StatusBar};
pub use text_input::{TextInput, TextInputState};
pub use transcript::Transcript;
