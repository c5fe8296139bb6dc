//! Callback Handler module for processing inline keyboard callback queries

use anyhow::Result;
use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, ChatId};
use tracing::{debug, error, warn};

use crate::dialogue::ButtonAction;

use super::context::AppContext;
use super::dialogue_manager::{catalog_listing, handle_button};
use super::message_handler::send_replies;
use super::ui_builder::{admin_menu, user_menu, Reply};

/// Decide the replies to a button press, advancing the chat's session.
pub async fn route_callback(
    ctx: &AppContext,
    chat_id: ChatId,
    data: &str,
    language: &str,
) -> Vec<Reply> {
    let action = data.parse::<ButtonAction>();

    if !ctx.is_admin(chat_id) {
        return match action {
            Ok(ButtonAction::ViewAll) => catalog_listing(&ctx.pool, language).await,
            _ => vec![user_menu(language)],
        };
    }

    let action = match action {
        Ok(action) => action,
        Err(e) => {
            warn!(chat_id = %chat_id, error = %e, "Ignoring callback");
            return Vec::new();
        }
    };

    let state = match ctx.sessions.get(chat_id).await {
        Some(state) => state,
        None => {
            // Stale keyboard from before a restart or eviction
            debug!(chat_id = %chat_id, "Callback without session, showing menu");
            ctx.sessions.reset(chat_id).await;
            return vec![admin_menu(language)];
        }
    };

    let transition = handle_button(&ctx.pool, state, action, language).await;
    debug!(chat_id = %chat_id, action = ?action, to = %transition.state.phase(), "Button handled");

    ctx.sessions.update(chat_id, transition.state).await;
    transition.replies
}

/// Handle callback queries from inline keyboards
pub async fn callback_handler(bot: Bot, q: CallbackQuery, ctx: AppContext) -> Result<()> {
    debug!(user_id = %q.from.id, "Received callback query from user");

    let chat_id = match &q.message {
        Some(msg) => msg.chat().id,
        None => ChatId::from(q.from.id),
    };
    let language = ctx.language(q.from.language_code.as_deref());
    let data = q.data.as_deref().unwrap_or("");

    let replies = route_callback(&ctx, chat_id, data, &language).await;
    send_replies(&bot, chat_id, replies).await;

    // Answer the callback query to remove the loading state
    if let Err(e) = bot.answer_callback_query(q.id).await {
        error!(chat_id = %chat_id, error = %e, "Failed to answer callback query");
    }

    Ok(())
}
