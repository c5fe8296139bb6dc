//! Dialogue Manager module for handling dialogue state transitions

use sqlx::SqlitePool;
use tracing::{error, info};

// Import localization
use crate::localization::{t_args_lang, t_lang};

// Import dialogue types
use crate::dialogue::{
    parse_count, parse_price, validate_description, validate_name, ButtonAction,
    ConversationState, Phase, MAX_DESCRIPTION_CHARS, MAX_NAME_CHARS,
};

// Import database types
use crate::db::{insert_product, list_products, NewProduct};

// Import UI builder functions
use super::ui_builder::{admin_menu, confirmation_summary, format_product_list, Reply};

/// Outcome of one state machine step
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: ConversationState,
    pub replies: Vec<Reply>,
}

impl Transition {
    fn to(state: ConversationState, reply: Reply) -> Self {
        Self {
            state,
            replies: vec![reply],
        }
    }
}

/// Render the catalog listing as one reply per message-sized chunk, or a
/// generic failure when storage is unavailable
pub async fn catalog_listing(pool: &SqlitePool, language: &str) -> Vec<Reply> {
    match list_products(pool).await {
        Ok(products) => format_product_list(&products, language)
            .into_iter()
            .map(Reply::text)
            .collect(),
        Err(e) => {
            error!(error = %e, "Failed to load catalog");
            vec![Reply::text(t_lang("error-loading", language))]
        }
    }
}

fn too_long(key: &str, max: usize, language: &str) -> Reply {
    let max = max.to_string();
    Reply::text(t_args_lang(key, &[("max", max.as_str())], language))
}

/// The message that asks for whatever the current phase is waiting on
pub fn prompt_for(state: &ConversationState, language: &str) -> Reply {
    match state {
        ConversationState::Idle => admin_menu(language),
        ConversationState::AwaitingName => Reply::text(t_lang("prompt-name", language)),
        ConversationState::AwaitingDescription { .. } => {
            Reply::text(t_lang("prompt-description", language))
        }
        ConversationState::AwaitingCount { .. } => Reply::text(t_lang("prompt-count", language)),
        ConversationState::AwaitingPrice { .. } => Reply::text(t_lang("prompt-price", language)),
        ConversationState::AwaitingConfirmation { product } => {
            confirmation_summary(product, language)
        }
    }
}

/// Handle an inline keyboard press from an administrator
pub async fn handle_button(
    pool: &SqlitePool,
    state: ConversationState,
    action: ButtonAction,
    language: &str,
) -> Transition {
    let mut replies = Vec::new();

    let next = match (action, state) {
        (ButtonAction::Add, _) => ConversationState::AwaitingName,
        (ButtonAction::ViewAll, state) => {
            replies.extend(catalog_listing(pool, language).await);
            state
        }
        (ButtonAction::Cancel, ConversationState::AwaitingConfirmation { .. }) => {
            replies.push(Reply::text(t_lang("operation-cancelled", language)));
            ConversationState::Idle
        }
        (ButtonAction::Confirm, ConversationState::AwaitingConfirmation { product }) => {
            match insert_product(pool, &product).await {
                Ok(product_id) => {
                    info!(product_id, name = %product.name, "Product added to catalog");
                    replies.push(Reply::text(t_lang("product-added", language)));
                }
                Err(e) => {
                    error!(error = %e, "Failed to save product");
                    replies.push(Reply::text(t_lang("error-saving", language)));
                }
            }
            ConversationState::Idle
        }
        (ButtonAction::Cancel | ButtonAction::Confirm, state) => {
            replies.push(Reply::text(t_lang("invalid-operation", language)));
            state
        }
    };

    match next.phase() {
        Phase::Idle => {}
        Phase::AwaitingName => replies.push(Reply::text(t_lang("prompt-name", language))),
        _ => replies.push(admin_menu(language)),
    }

    Transition {
        state: next,
        replies,
    }
}

/// Handle free text from an administrator with an existing session
pub fn handle_text_input(state: ConversationState, text: &str, language: &str) -> Transition {
    match state {
        ConversationState::Idle => Transition::to(ConversationState::Idle, admin_menu(language)),
        ConversationState::AwaitingName => match validate_name(text) {
            Ok(name) => Transition::to(
                ConversationState::AwaitingDescription { name },
                Reply::text(t_lang("prompt-description", language)),
            ),
            Err("too_long") => Transition::to(
                ConversationState::AwaitingName,
                too_long("name-too-long", MAX_NAME_CHARS, language),
            ),
            Err(_) => Transition::to(
                ConversationState::AwaitingName,
                Reply::text(t_lang("invalid-name", language)),
            ),
        },
        ConversationState::AwaitingDescription { name } => match validate_description(text) {
            Ok(description) => Transition::to(
                ConversationState::AwaitingCount { name, description },
                Reply::text(t_lang("prompt-count", language)),
            ),
            Err(_) => Transition::to(
                ConversationState::AwaitingDescription { name },
                too_long("description-too-long", MAX_DESCRIPTION_CHARS, language),
            ),
        },
        ConversationState::AwaitingCount { name, description } => match parse_count(text) {
            Some(count) => Transition::to(
                ConversationState::AwaitingPrice {
                    name,
                    description,
                    count,
                },
                Reply::text(t_lang("prompt-price", language)),
            ),
            None => Transition::to(
                ConversationState::AwaitingCount { name, description },
                Reply::text(t_lang("invalid-count", language)),
            ),
        },
        ConversationState::AwaitingPrice {
            name,
            description,
            count,
        } => match parse_price(text) {
            Some(price) => {
                let product = NewProduct {
                    name,
                    description,
                    count,
                    price,
                };
                let summary = confirmation_summary(&product, language);
                Transition::to(ConversationState::AwaitingConfirmation { product }, summary)
            }
            None => Transition::to(
                ConversationState::AwaitingPrice {
                    name,
                    description,
                    count,
                },
                Reply::text(t_lang("invalid-price", language)),
            ),
        },
        state @ ConversationState::AwaitingConfirmation { .. } => {
            let summary = prompt_for(&state, language);
            Transition::to(state, summary)
        }
    }
}
