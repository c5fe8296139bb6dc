//! Item entry dialogue: conversation state and input validation.

use std::fmt;
use std::str::FromStr;

use crate::db::NewProduct;

/// Represents the conversation state of one chat.
///
/// Each variant carries exactly the draft fields collected so far, so a
/// confirmation can only be reached with a complete product.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ConversationState {
    #[default]
    Idle,
    AwaitingName,
    AwaitingDescription {
        name: String,
    },
    AwaitingCount {
        name: String,
        description: String,
    },
    AwaitingPrice {
        name: String,
        description: String,
        count: i64,
    },
    AwaitingConfirmation {
        product: NewProduct,
    },
}

/// Data-free view of [`ConversationState`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    Idle,
    AwaitingName,
    AwaitingDescription,
    AwaitingCount,
    AwaitingPrice,
    AwaitingConfirmation,
}

impl ConversationState {
    pub fn phase(&self) -> Phase {
        match self {
            ConversationState::Idle => Phase::Idle,
            ConversationState::AwaitingName => Phase::AwaitingName,
            ConversationState::AwaitingDescription { .. } => Phase::AwaitingDescription,
            ConversationState::AwaitingCount { .. } => Phase::AwaitingCount,
            ConversationState::AwaitingPrice { .. } => Phase::AwaitingPrice,
            ConversationState::AwaitingConfirmation { .. } => Phase::AwaitingConfirmation,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::AwaitingName => "awaiting_name",
            Phase::AwaitingDescription => "awaiting_description",
            Phase::AwaitingCount => "awaiting_count",
            Phase::AwaitingPrice => "awaiting_price",
            Phase::AwaitingConfirmation => "awaiting_confirmation",
        };
        f.write_str(name)
    }
}

/// Inline keyboard actions, identified by their callback data
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonAction {
    Add,
    ViewAll,
    Cancel,
    Confirm,
}

impl ButtonAction {
    pub fn callback_data(self) -> &'static str {
        match self {
            ButtonAction::Add => "add",
            ButtonAction::ViewAll => "view_all",
            ButtonAction::Cancel => "cancel",
            ButtonAction::Confirm => "confirm",
        }
    }
}

impl FromStr for ButtonAction {
    type Err = String;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        match data {
            "add" => Ok(ButtonAction::Add),
            "view_all" => Ok(ButtonAction::ViewAll),
            "cancel" => Ok(ButtonAction::Cancel),
            "confirm" => Ok(ButtonAction::Confirm),
            other => Err(format!("unknown callback data: {other}")),
        }
    }
}

/// Longest accepted item name, in characters
pub const MAX_NAME_CHARS: usize = 255;

/// Longest accepted item description, in characters
pub const MAX_DESCRIPTION_CHARS: usize = 1000;

/// Validates an item name input
pub fn validate_name(name: &str) -> Result<String, &'static str> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err("empty");
    }

    if trimmed.chars().count() > MAX_NAME_CHARS {
        return Err("too_long");
    }

    Ok(trimmed.to_string())
}

/// Validates an item description. Descriptions are kept verbatim.
pub fn validate_description(description: &str) -> Result<String, &'static str> {
    if description.chars().count() > MAX_DESCRIPTION_CHARS {
        return Err("too_long");
    }

    Ok(description.to_string())
}

/// Parses a positive item count
pub fn parse_count(input: &str) -> Option<i64> {
    input.trim().parse::<i64>().ok().filter(|count| *count > 0)
}

/// Parses a positive, finite price. Accepts `,` as the decimal separator.
pub fn parse_price(input: &str) -> Option<f64> {
    input
        .trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|price| price.is_finite() && *price > 0.0)
}

/// Render a price with two decimals
pub fn format_price(price: f64) -> String {
    format!("{price:.2}")
}
