//! # Bot Routing Tests
//!
//! End-to-end conversation tests against a real SQLite database. They drive
//! the transport-free routing entry points, so no Telegram connection is needed.

use anyhow::Result;
use storekeeper::bot::ui_builder::{admin_menu, user_menu};
use storekeeper::bot::{route_callback, route_text, AppContext, Reply};
use storekeeper::config::AdminSet;
use storekeeper::db::{connect, init_database_schema, insert_product, list_products, NewProduct};
use storekeeper::dialogue::Phase;
use storekeeper::session::SessionStore;
use teloxide::types::ChatId;
use tempfile::NamedTempFile;

const ADMIN: ChatId = ChatId(329159577);
const GUEST: ChatId = ChatId(555);

async fn setup_context() -> Result<(AppContext, NamedTempFile)> {
    let temp_file = NamedTempFile::new()?;
    let pool = connect(&format!("sqlite://{}", temp_file.path().display())).await?;
    init_database_schema(&pool).await?;

    let ctx = AppContext::new(pool, AdminSet::new([ADMIN.0]), SessionStore::default(), "en");
    Ok((ctx, temp_file))
}

async fn say(ctx: &AppContext, text: &str) -> Vec<Reply> {
    route_text(ctx, ADMIN, Some(text), "en").await
}

async fn press(ctx: &AppContext, data: &str) -> Vec<Reply> {
    route_callback(ctx, ADMIN, data, "en").await
}

async fn phase(ctx: &AppContext) -> Phase {
    ctx.sessions
        .get(ADMIN)
        .await
        .expect("admin session should exist")
        .phase()
}

/// Open a session and walk the item entry up to the confirmation summary
async fn enter_widget(ctx: &AppContext) {
    say(ctx, "/start").await;
    press(ctx, "add").await;
    say(ctx, "Widget").await;
    say(ctx, "A gadget").await;
    say(ctx, "5").await;
    say(ctx, "9.99").await;
}

#[tokio::test]
async fn test_first_admin_message_shows_menu() -> Result<()> {
    let (ctx, _temp_file) = setup_context().await?;

    let replies = say(&ctx, "hello").await;

    assert_eq!(replies, vec![admin_menu("en")]);
    assert_eq!(replies[0].callback_data(), vec!["add", "view_all"]);
    assert_eq!(phase(&ctx).await, Phase::Idle);
    Ok(())
}

#[tokio::test]
async fn test_full_item_entry_persists_product() -> Result<()> {
    let (ctx, _temp_file) = setup_context().await?;

    say(&ctx, "/start").await;

    assert_eq!(
        press(&ctx, "add").await,
        vec![Reply::text("Enter the item name:")]
    );
    assert_eq!(
        say(&ctx, "Widget").await,
        vec![Reply::text("Enter the description:")]
    );
    assert_eq!(
        say(&ctx, "A gadget").await,
        vec![Reply::text("Enter the count:")]
    );
    assert_eq!(say(&ctx, "5").await, vec![Reply::text("Enter the price:")]);

    let summary = say(&ctx, "9.99").await;
    assert_eq!(summary.len(), 1);
    assert!(summary[0].text.contains("Widget"));
    assert_eq!(summary[0].callback_data(), vec!["confirm", "cancel"]);
    assert_eq!(phase(&ctx).await, Phase::AwaitingConfirmation);

    assert_eq!(press(&ctx, "confirm").await, vec![Reply::text("Item added.")]);
    assert_eq!(phase(&ctx).await, Phase::Idle);

    let products = list_products(&ctx.pool).await?;
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].name, "Widget");
    assert_eq!(products[0].description, "A gadget");
    assert_eq!(products[0].count, 5);
    assert!((products[0].price - 9.99).abs() < f64::EPSILON);

    Ok(())
}

#[tokio::test]
async fn test_invalid_count_keeps_phase() -> Result<()> {
    let (ctx, _temp_file) = setup_context().await?;
    say(&ctx, "/start").await;
    press(&ctx, "add").await;
    say(&ctx, "Widget").await;
    say(&ctx, "A gadget").await;

    for input in ["abc", "0", "-3"] {
        assert_eq!(
            say(&ctx, input).await,
            vec![Reply::text("Enter a valid count:")]
        );
        assert_eq!(phase(&ctx).await, Phase::AwaitingCount);
    }

    Ok(())
}

#[tokio::test]
async fn test_invalid_price_keeps_phase() -> Result<()> {
    let (ctx, _temp_file) = setup_context().await?;
    say(&ctx, "/start").await;
    press(&ctx, "add").await;
    say(&ctx, "Widget").await;
    say(&ctx, "A gadget").await;
    say(&ctx, "5").await;

    for input in ["0", "-1"] {
        assert_eq!(
            say(&ctx, input).await,
            vec![Reply::text("Enter a valid price:")]
        );
        assert_eq!(phase(&ctx).await, Phase::AwaitingPrice);
    }

    Ok(())
}

#[tokio::test]
async fn test_cancel_at_confirmation_discards_draft() -> Result<()> {
    let (ctx, _temp_file) = setup_context().await?;
    enter_widget(&ctx).await;

    assert_eq!(
        press(&ctx, "cancel").await,
        vec![Reply::text("Operation cancelled.")]
    );
    assert_eq!(phase(&ctx).await, Phase::Idle);
    assert!(list_products(&ctx.pool).await?.is_empty());

    // The draft is gone, so a late confirm is rejected
    assert_eq!(
        press(&ctx, "confirm").await,
        vec![Reply::text("Invalid operation.")]
    );
    assert!(list_products(&ctx.pool).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_cancel_outside_confirmation_is_invalid() -> Result<()> {
    let (ctx, _temp_file) = setup_context().await?;
    say(&ctx, "/start").await;

    assert_eq!(
        press(&ctx, "cancel").await,
        vec![Reply::text("Invalid operation.")]
    );
    assert_eq!(phase(&ctx).await, Phase::Idle);

    press(&ctx, "add").await;
    say(&ctx, "Widget").await;
    say(&ctx, "A gadget").await;

    // Outside idle and awaiting_name the admin menu is shown again
    assert_eq!(
        press(&ctx, "cancel").await,
        vec![Reply::text("Invalid operation."), admin_menu("en")]
    );
    assert_eq!(phase(&ctx).await, Phase::AwaitingCount);

    Ok(())
}

#[tokio::test]
async fn test_add_restarts_the_draft() -> Result<()> {
    let (ctx, _temp_file) = setup_context().await?;
    say(&ctx, "/start").await;
    press(&ctx, "add").await;
    say(&ctx, "Old name").await;
    say(&ctx, "Old description").await;
    say(&ctx, "7").await;

    assert_eq!(
        press(&ctx, "add").await,
        vec![Reply::text("Enter the item name:")]
    );
    assert_eq!(phase(&ctx).await, Phase::AwaitingName);

    say(&ctx, "Widget").await;
    say(&ctx, "A gadget").await;
    say(&ctx, "5").await;
    say(&ctx, "9.99").await;
    press(&ctx, "confirm").await;

    let products = list_products(&ctx.pool).await?;
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].name, "Widget");
    assert_eq!(products[0].count, 5);

    Ok(())
}

#[tokio::test]
async fn test_view_all_empty_and_filled() -> Result<()> {
    let (ctx, _temp_file) = setup_context().await?;
    say(&ctx, "/start").await;

    let replies = press(&ctx, "view_all").await;
    assert_eq!(replies.len(), 1);
    assert!(replies[0]
        .text
        .to_lowercase()
        .contains("no items in the database"));

    let items = [("Widget", "A gadget", "5", "9.99"), ("Bolt", "M8", "100", "0.5")];
    for (name, description, count, price) in items {
        press(&ctx, "add").await;
        say(&ctx, name).await;
        say(&ctx, description).await;
        say(&ctx, count).await;
        say(&ctx, price).await;
        press(&ctx, "confirm").await;
    }

    let replies = press(&ctx, "view_all").await;
    assert_eq!(replies.len(), 1);
    let listing = &replies[0].text;
    for expected in [
        "Name: Widget",
        "Description: A gadget",
        "Count: 5",
        "Price: 9.99",
        "Name: Bolt",
        "Description: M8",
        "Count: 100",
        "Price: 0.50",
    ] {
        assert!(listing.contains(expected), "missing {expected:?} in {listing:?}");
    }
    assert_eq!(phase(&ctx).await, Phase::Idle);

    Ok(())
}

#[tokio::test]
async fn test_large_catalog_is_sent_in_several_messages() -> Result<()> {
    let (ctx, _temp_file) = setup_context().await?;
    for i in 1..=60 {
        let product = NewProduct {
            name: format!("Item {i}"),
            description: "Spare part for the workshop".to_string(),
            count: i,
            price: 4.25,
        };
        insert_product(&ctx.pool, &product).await?;
    }

    let replies = route_callback(&ctx, GUEST, "view_all", "en").await;

    assert!(replies.len() > 1);
    for reply in &replies {
        assert!(reply.text.chars().count() <= 4096);
    }
    let listed = replies
        .iter()
        .map(|reply| reply.text.matches("Name: Item ").count())
        .sum::<usize>();
    assert_eq!(listed, 60);
    assert!(replies[0].text.starts_with("Name: Item 1\n"));
    assert!(replies[replies.len() - 1].text.contains("Name: Item 60\n"));

    Ok(())
}

#[tokio::test]
async fn test_over_long_fields_are_reprompted() -> Result<()> {
    let (ctx, _temp_file) = setup_context().await?;
    say(&ctx, "/start").await;
    press(&ctx, "add").await;

    let replies = say(&ctx, &"n".repeat(4000)).await;
    assert_eq!(
        replies,
        vec![Reply::text("The name is too long, use at most 255 characters:")]
    );
    assert_eq!(phase(&ctx).await, Phase::AwaitingName);

    say(&ctx, "Widget").await;
    let replies = say(&ctx, &"d".repeat(4000)).await;
    assert_eq!(
        replies,
        vec![Reply::text(
            "The description is too long, use at most 1000 characters:"
        )]
    );
    assert_eq!(phase(&ctx).await, Phase::AwaitingDescription);

    say(&ctx, "A gadget").await;
    say(&ctx, "5").await;
    let replies = say(&ctx, "9.99").await;
    assert_eq!(replies[0].callback_data(), vec!["confirm", "cancel"]);
    assert_eq!(phase(&ctx).await, Phase::AwaitingConfirmation);

    Ok(())
}

#[tokio::test]
async fn test_view_all_mid_entry_keeps_draft() -> Result<()> {
    let (ctx, _temp_file) = setup_context().await?;
    say(&ctx, "/start").await;
    press(&ctx, "add").await;

    let replies = press(&ctx, "view_all").await;
    assert_eq!(replies.len(), 2);
    assert_eq!(replies[1], Reply::text("Enter the item name:"));
    assert_eq!(phase(&ctx).await, Phase::AwaitingName);

    Ok(())
}

#[tokio::test]
async fn test_guest_always_gets_read_only_menu() -> Result<()> {
    let (ctx, _temp_file) = setup_context().await?;

    assert_eq!(
        route_text(&ctx, GUEST, Some("hello"), "en").await,
        vec![user_menu("en")]
    );
    assert_eq!(
        route_text(&ctx, GUEST, None, "en").await,
        vec![user_menu("en")]
    );
    for data in ["add", "cancel", "confirm", "garbage"] {
        assert_eq!(
            route_callback(&ctx, GUEST, data, "en").await,
            vec![user_menu("en")]
        );
    }

    assert_eq!(ctx.sessions.get(GUEST).await, None);
    Ok(())
}

#[tokio::test]
async fn test_guest_can_view_catalog() -> Result<()> {
    let (ctx, _temp_file) = setup_context().await?;
    enter_widget(&ctx).await;
    press(&ctx, "confirm").await;

    let replies = route_callback(&ctx, GUEST, "view_all", "en").await;
    assert_eq!(replies.len(), 1);
    assert!(replies[0].text.contains("Name: Widget"));
    assert_eq!(ctx.sessions.get(GUEST).await, None);

    Ok(())
}

#[tokio::test]
async fn test_callback_without_session_shows_menu() -> Result<()> {
    let (ctx, _temp_file) = setup_context().await?;

    assert_eq!(press(&ctx, "confirm").await, vec![admin_menu("en")]);
    assert_eq!(phase(&ctx).await, Phase::Idle);
    assert!(list_products(&ctx.pool).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_unknown_callback_is_ignored() -> Result<()> {
    let (ctx, _temp_file) = setup_context().await?;
    say(&ctx, "/start").await;
    press(&ctx, "add").await;

    assert!(press(&ctx, "delete_all").await.is_empty());
    assert_eq!(phase(&ctx).await, Phase::AwaitingName);

    Ok(())
}

#[tokio::test]
async fn test_non_text_message_repeats_prompt() -> Result<()> {
    let (ctx, _temp_file) = setup_context().await?;
    say(&ctx, "/start").await;
    press(&ctx, "add").await;
    say(&ctx, "Widget").await;
    say(&ctx, "A gadget").await;

    assert_eq!(
        route_text(&ctx, ADMIN, None, "en").await,
        vec![Reply::text("Enter the count:")]
    );
    assert_eq!(phase(&ctx).await, Phase::AwaitingCount);

    Ok(())
}

#[tokio::test]
async fn test_replies_follow_language() -> Result<()> {
    let (ctx, _temp_file) = setup_context().await?;
    route_text(&ctx, ADMIN, Some("/start"), "ru").await;

    assert_eq!(
        route_callback(&ctx, ADMIN, "add", "ru").await,
        vec![Reply::text("Введите наименование:")]
    );

    Ok(())
}

#[tokio::test]
async fn test_storage_failure_reports_generic_error() -> Result<()> {
    let (ctx, _temp_file) = setup_context().await?;
    enter_widget(&ctx).await;

    ctx.pool.close().await;

    assert_eq!(
        press(&ctx, "confirm").await,
        vec![Reply::text("Error while saving data.")]
    );
    assert_eq!(phase(&ctx).await, Phase::Idle);

    assert_eq!(
        press(&ctx, "view_all").await,
        vec![Reply::text("Error while loading items.")]
    );

    Ok(())
}
