//! Message Handler module for processing incoming Telegram messages

use anyhow::Result;
use teloxide::prelude::*;
use teloxide::types::ChatId;
use tracing::{debug, error};

use super::context::AppContext;
use super::dialogue_manager::{handle_text_input, prompt_for, Transition};
use super::ui_builder::{admin_menu, user_menu, Reply};

/// Send replies in order. Failures are logged and swallowed.
pub async fn send_replies(bot: &Bot, chat_id: ChatId, replies: Vec<Reply>) {
    for reply in replies {
        let mut request = bot.send_message(chat_id, reply.text);
        if let Some(keyboard) = reply.keyboard {
            request = request.reply_markup(keyboard);
        }

        match request.await {
            Ok(_) => (),
            Err(e) => error!(chat_id = %chat_id, error = %e, "Failed to send message"),
        }
    }
}

/// Decide the replies to a message, advancing the chat's session.
///
/// `text` is `None` for messages without text (photos, stickers, ...).
pub async fn route_text(
    ctx: &AppContext,
    chat_id: ChatId,
    text: Option<&str>,
    language: &str,
) -> Vec<Reply> {
    if !ctx.is_admin(chat_id) {
        return vec![user_menu(language)];
    }

    let (state, created) = ctx.sessions.get_or_create(chat_id).await;
    if created {
        debug!(chat_id = %chat_id, "Started admin session");
        return vec![admin_menu(language)];
    }

    let phase = state.phase();
    let transition = match text {
        Some(text) => handle_text_input(state, text, language),
        None => Transition {
            replies: vec![prompt_for(&state, language)],
            state,
        },
    };
    debug!(
        chat_id = %chat_id,
        from = %phase,
        to = %transition.state.phase(),
        "Text input handled"
    );

    ctx.sessions.update(chat_id, transition.state).await;
    transition.replies
}

pub async fn message_handler(bot: Bot, msg: Message, ctx: AppContext) -> Result<()> {
    // Extract user's language code from Telegram
    let user_language = msg
        .from
        .as_ref()
        .and_then(|user| user.language_code.as_deref());
    let language = ctx.language(user_language);

    debug!(chat_id = %msg.chat.id, has_text = msg.text().is_some(), "Received message");

    let replies = route_text(&ctx, msg.chat.id, msg.text(), &language).await;
    send_replies(&bot, msg.chat.id, replies).await;

    Ok(())
}
