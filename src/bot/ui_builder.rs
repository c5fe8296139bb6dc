//! UI Builder module for creating keyboards and formatting messages

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

// Import localization
use crate::localization::{t_args_lang, t_lang};

use crate::db::{NewProduct, Product};
use crate::dialogue::{format_price, ButtonAction};

/// One outbound message: text with an optional inline keyboard
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    pub keyboard: Option<InlineKeyboardMarkup>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
        }
    }

    pub fn with_keyboard(text: impl Into<String>, keyboard: InlineKeyboardMarkup) -> Self {
        Self {
            text: text.into(),
            keyboard: Some(keyboard),
        }
    }

    /// Callback data of every button attached to this reply, row by row
    pub fn callback_data(&self) -> Vec<String> {
        use teloxide::types::InlineKeyboardButtonKind;

        self.keyboard
            .iter()
            .flat_map(|markup| markup.inline_keyboard.iter().flatten())
            .filter_map(|button| match &button.kind {
                InlineKeyboardButtonKind::CallbackData(data) => Some(data.clone()),
                _ => None,
            })
            .collect()
    }
}

fn button(label_key: &str, action: ButtonAction, language: &str) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(t_lang(label_key, language), action.callback_data())
}

/// Keyboard offered to administrators
pub fn create_admin_menu_keyboard(language: &str) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        button("button-add", ButtonAction::Add, language),
        button("button-view-all", ButtonAction::ViewAll, language),
    ]])
}

/// Read-only keyboard offered to everyone else
pub fn create_user_menu_keyboard(language: &str) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![button(
        "button-view-all",
        ButtonAction::ViewAll,
        language,
    )]])
}

/// Confirm / Reject keyboard shown under the item summary
pub fn create_confirmation_keyboard(language: &str) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        button("button-confirm", ButtonAction::Confirm, language),
        button("button-reject", ButtonAction::Cancel, language),
    ]])
}

pub fn admin_menu(language: &str) -> Reply {
    Reply::with_keyboard(
        t_lang("menu-prompt", language),
        create_admin_menu_keyboard(language),
    )
}

pub fn user_menu(language: &str) -> Reply {
    Reply::with_keyboard(
        t_lang("menu-prompt", language),
        create_user_menu_keyboard(language),
    )
}

/// Summary of the collected item with Confirm / Reject buttons
pub fn confirmation_summary(product: &NewProduct, language: &str) -> Reply {
    let count = product.count.to_string();
    let price = format_price(product.price);
    let text = t_args_lang(
        "confirm-summary",
        &[
            ("name", product.name.as_str()),
            ("description", product.description.as_str()),
            ("count", count.as_str()),
            ("price", price.as_str()),
        ],
        language,
    );

    Reply::with_keyboard(text, create_confirmation_keyboard(language))
}

/// Telegram rejects messages over 4096 characters; listings stay below this.
pub const LISTING_CHUNK_CHARS: usize = 3800;

/// Format the whole catalog, or the "no items" notice when it is empty.
///
/// Entries are separated by a blank line and grouped into chunks of at most
/// [`LISTING_CHUNK_CHARS`] characters, each sent as its own message. An entry
/// is never split across chunks.
pub fn format_product_list(products: &[Product], language: &str) -> Vec<String> {
    if products.is_empty() {
        return vec![t_lang("no-items", language)];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0;

    for product in products {
        let count = product.count.to_string();
        let price = format_price(product.price);
        let entry = t_args_lang(
            "product-entry",
            &[
                ("name", product.name.as_str()),
                ("description", product.description.as_str()),
                ("count", count.as_str()),
                ("price", price.as_str()),
            ],
            language,
        );
        let entry_chars = entry.chars().count();

        if !current.is_empty() && current_chars + 2 + entry_chars > LISTING_CHUNK_CHARS {
            chunks.push(std::mem::take(&mut current));
            current_chars = 0;
        }
        if !current.is_empty() {
            current.push_str("\n\n");
            current_chars += 2;
        }
        current.push_str(&entry);
        current_chars += entry_chars;
    }
    chunks.push(current);

    chunks
}
