//! Theme and styling definitions for the chat box.

use ratatui::style::{Color, Modifier, Style};

/// Color palette for the TUI (Catppuccin Mocha).
pub struct Palette;

impl Palette {
    // Base colors
    pub const BG: Color = Color::Rgb(30, 30, 46);
    pub const FG: Color = Color::Rgb(205, 214, 244);
    pub const DIM: Color = Color::Rgb(108, 112, 134);

    // Accent colors
    pub const ACCENT: Color = Color::Rgb(180, 190, 254);

    // Message bubbles
    pub const USER_BG: Color = Color::Rgb(180, 190, 254);
    pub const USER_FG: Color = Color::Rgb(30, 30, 46);
    pub const ASSISTANT_BG: Color = Color::Rgb(49, 50, 68);

    // Status bar colors (high contrast)
    pub const STATUS_BG: Color = Color::Rgb(49, 50, 68);
    pub const STATUS_KEY_BG: Color = Color::Rgb(69, 71, 90);

    pub const WARNING: Color = Color::Rgb(249, 226, 175);

    // Border colors
    pub const BORDER: Color = Color::Rgb(69, 71, 90);
    pub const BORDER_ACTIVE: Color = Color::Rgb(180, 190, 254);
}

/// Glyphs used by the chat box.
pub struct Symbols;

impl Symbols {
    pub const USER: &'static str = "You";
    pub const BOT: &'static str = "Gemini";
    pub const DOT: &'static str = "•";
}

/// Common styles used throughout the TUI.
pub struct Styles;

impl Styles {
    /// Default text style.
    pub fn default() -> Style {
        Style::default().fg(Palette::FG).bg(Palette::BG)
    }

    /// Dimmed text for secondary information.
    pub fn dim() -> Style {
        Style::default().fg(Palette::DIM).bg(Palette::BG)
    }

    /// Title style.
    pub fn title() -> Style {
        Style::default()
            .fg(Palette::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    /// Author label above a message.
    pub fn label() -> Style {
        Style::default()
            .fg(Palette::DIM)
            .bg(Palette::BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Body of a user message.
    pub fn user_bubble() -> Style {
        Style::default().fg(Palette::USER_FG).bg(Palette::USER_BG)
    }

    /// Body of an assistant message.
    pub fn assistant_bubble() -> Style {
        Style::default().fg(Palette::FG).bg(Palette::ASSISTANT_BG)
    }

    /// Prompt prefix in the input line.
    pub fn prompt() -> Style {
        Style::default().fg(Palette::ACCENT).bg(Palette::BG)
    }

    pub fn warning() -> Style {
        Style::default().fg(Palette::WARNING).bg(Palette::STATUS_BG)
    }

    /// Key hint style (for status bar) - bright on dark for visibility.
    pub fn key_hint() -> Style {
        Style::default()
            .fg(Palette::FG)
            .bg(Palette::STATUS_KEY_BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Key hint for an action that is currently unavailable.
    pub fn key_hint_disabled() -> Style {
        Style::default().fg(Palette::DIM).bg(Palette::STATUS_KEY_BG)
    }

    /// Key hint label style - readable on status bar background.
    pub fn key_label() -> Style {
        Style::default().fg(Palette::FG).bg(Palette::STATUS_BG)
    }

    /// Status bar background style.
    pub fn status_bar() -> Style {
        Style::default().fg(Palette::FG).bg(Palette::STATUS_BG)
    }

    /// Border style for inactive elements.
    pub fn border() -> Style {
        Style::default().fg(Palette::BORDER)
    }

    /// Border style for active/focused elements.
    pub fn border_active() -> Style {
        Style::default().fg(Palette::BORDER_ACTIVE)
    }
}
