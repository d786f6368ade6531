//! End-to-end dispatch against the in-memory client.

use std::sync::Arc;

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use nitori_core::{
    Channel, ChannelId, Event, EventKind, Guild, GuildDelete, GuildId, GuildMemberUpdate, Member,
    MemoryClient, Message, MessageId, Permissions, Reaction, Ready, User, UserId,
};
use nitori_framework::strings::{COMMAND_NOT_FOUND, ERROR_OCCURRED};
use nitori_framework::{
    CommandOutcome, Context, HandlerError, HandlerResult, Multiplexer, MultiplexerBuilder, Route,
    StaticPrefixes, categories,
};

const BOT: u64 = 900000000000000001;
const GUILD: u64 = 600000000000000001;
const CHANNEL: u64 = 300000000000000001;
const DM: u64 = 300000000000000002;
const REIMU: u64 = 100000000000000001;

fn bot() -> User {
    User::new(BOT, "nitori").automated()
}

fn reimu() -> User {
    User::new(REIMU, "reimu")
}

fn client() -> Arc<MemoryClient> {
    let client = Arc::new(MemoryClient::new(bot()));
    client.cache_guild_state(Guild::new(GUILD, "Kappa"));
    client.cache_channel_state(Channel::text(CHANNEL, GUILD, "general"));
    client.cache_channel_state(Channel::direct(DM));
    client.grant(UserId(BOT), ChannelId(CHANNEL), Permissions::SEND_MESSAGES);
    client
}

fn guild_message(content: &str) -> Message {
    Message::new(1u64, CHANNEL, reimu(), content)
        .in_guild(GUILD)
        .with_member(Member::new(GUILD, reimu()))
}

/// A route handler that forwards its fields.
fn recording(tx: UnboundedSender<Vec<String>>) -> Route {
    Route::new("play", categories::AUDIO, move |ctx: Arc<Context>| {
        let tx = tx.clone();
        async move {
            let _ = tx.send(ctx.fields().to_vec());
            Ok::<(), HandlerError>(())
        }
    })
    .alias("pl")
}

/// A hook that forwards the context it was given.
fn forward(tx: UnboundedSender<Arc<Context>>) -> impl Fn(Arc<Context>) -> futures::future::Ready<()> {
    move |ctx| {
        let _ = tx.send(ctx);
        futures::future::ready(())
    }
}

fn base() -> MultiplexerBuilder {
    Multiplexer::builder("!")
}

fn drain<T>(rx: &mut UnboundedReceiver<T>) -> Vec<T> {
    let mut out = Vec::new();
    while let Ok(item) = rx.try_recv() {
        out.push(item);
    }
    out
}

#[tokio::test]
async fn test_fuzzy_command_receives_all_fields() {
    let (tx, mut rx) = unbounded_channel();
    let mux = base().route(recording(tx)).unwrap().build();
    let client = client();

    let dispatch = mux
        .dispatch(client.clone(), Event::MessageCreate(guild_message("!p never gonna give you up")))
        .await;

    assert_eq!(
        dispatch.outcome(),
        &CommandOutcome::Routed {
            pattern: "play".into(),
            ok: true
        }
    );
    assert_eq!(
        drain(&mut rx),
        [vec!["p", "never", "gonna", "give", "you", "up"]]
    );
    assert!(client.sent().is_empty());
}

#[tokio::test]
async fn test_unknown_command_gets_fallback_reply() {
    let (tx, _rx) = unbounded_channel();
    let mux = base().route(recording(tx)).unwrap().build();
    let client = client();

    let dispatch = mux
        .dispatch(client.clone(), Event::MessageCreate(guild_message("!xyzzy nonsense")))
        .await;

    assert_eq!(dispatch.outcome(), &CommandOutcome::NoMatch);
    assert_eq!(client.sent_texts(), [COMMAND_NOT_FOUND]);
}

#[tokio::test]
async fn test_custom_fallback() {
    let mux = base()
        .no_command_matched(|ctx: Arc<Context>| async move {
            ctx.send_message("Try !help.").await;
        })
        .build();
    let client = client();

    mux.dispatch(client.clone(), Event::MessageCreate(guild_message("!what")))
        .await;
    assert_eq!(client.sent_texts(), ["Try !help."]);
}

#[tokio::test]
async fn test_leading_mention_routes() {
    let (tx, mut rx) = unbounded_channel();
    let mux = base().route(recording(tx)).unwrap().build();

    let message = guild_message("<@900000000000000001> play bad apple").mentioning(bot());
    let dispatch = mux.dispatch(client(), Event::MessageCreate(message)).await;

    assert!(matches!(dispatch.outcome(), CommandOutcome::Routed { ok: true, .. }));
    assert_eq!(drain(&mut rx), [vec!["play", "bad", "apple"]]);
}

#[tokio::test]
async fn test_trailing_mention_goes_to_not_targeted_hooks() {
    let (route_tx, mut route_rx) = unbounded_channel();
    let (hook_tx, mut hook_rx) = unbounded_channel();
    let mux = base()
        .route(recording(route_tx))
        .unwrap()
        .hook(EventKind::NotTargeted, forward(hook_tx))
        .build();
    let client = client();

    let message = guild_message("thanks <@900000000000000001> for the help").mentioning(bot());
    let dispatch = mux.dispatch(client.clone(), Event::MessageCreate(message)).await;
    assert_eq!(dispatch.outcome(), &CommandOutcome::NotTargeted);
    dispatch.join().await;

    let seen = drain(&mut hook_rx);
    assert_eq!(seen.len(), 1);
    assert!(seen[0].has_mention());
    assert!(!seen[0].has_leading_mention());
    assert!(seen[0].is_targeted());
    assert!(drain(&mut route_rx).is_empty());
    assert!(client.sent().is_empty());
}

#[tokio::test]
async fn test_untargeted_message_goes_to_not_targeted_hooks() {
    let (hook_tx, mut hook_rx) = unbounded_channel();
    let mux = base().hook(EventKind::NotTargeted, forward(hook_tx)).build();

    let dispatch = mux
        .dispatch(client(), Event::MessageCreate(guild_message("just chatting")))
        .await;
    assert_eq!(dispatch.outcome(), &CommandOutcome::NotTargeted);
    dispatch.join().await;

    let seen = drain(&mut hook_rx);
    assert_eq!(seen.len(), 1);
    assert!(!seen[0].is_targeted());
    assert_eq!(seen[0].text(), "just chatting");
}

#[tokio::test]
async fn test_bot_authors_skip_commands_but_reach_message_hooks() {
    let (route_tx, mut route_rx) = unbounded_channel();
    let (hook_tx, mut hook_rx) = unbounded_channel();
    let mux = base()
        .route(recording(route_tx))
        .unwrap()
        .hook(EventKind::MessageCreate, forward(hook_tx))
        .build();
    let client = client();

    let other_bot = User::new(700000000000000001u64, "cirno").automated();
    let from_bot = Message::new(1u64, CHANNEL, other_bot, "!play").in_guild(GUILD);
    let from_self = Message::new(2u64, CHANNEL, bot(), "!play").in_guild(GUILD);

    for message in [from_bot, from_self] {
        let dispatch = mux.dispatch(client.clone(), Event::MessageCreate(message)).await;
        assert_eq!(dispatch.outcome(), &CommandOutcome::Ignored);
        dispatch.join().await;
    }

    assert_eq!(drain(&mut hook_rx).len(), 2);
    assert!(drain(&mut route_rx).is_empty());
    assert!(client.sent().is_empty());
}

#[tokio::test]
async fn test_handler_error_is_reported() {
    let mux = base()
        .reveal_errors(true)
        .route(Route::new(
            "fail",
            categories::SYSTEM,
            |_ctx: Arc<Context>| async move { Err::<(), HandlerError>("queue is empty".into()) },
        ))
        .unwrap()
        .build();
    let client = client();

    let dispatch = mux
        .dispatch(client.clone(), Event::MessageCreate(guild_message("!fail")))
        .await;

    assert_eq!(
        dispatch.outcome(),
        &CommandOutcome::Routed {
            pattern: "fail".into(),
            ok: false
        }
    );
    assert_eq!(client.sent_texts(), [ERROR_OCCURRED, "queue is empty"]);
}

#[tokio::test]
async fn test_handler_panic_is_contained() {
    async fn explode(_ctx: Arc<Context>) -> HandlerResult {
        panic!("boom");
    }

    let mux = base()
        .route(Route::new("explode", categories::SYSTEM, explode))
        .unwrap()
        .build();
    let client = client();

    let dispatch = mux
        .dispatch(client.clone(), Event::MessageCreate(guild_message("!explode")))
        .await;

    assert!(matches!(dispatch.outcome(), CommandOutcome::Routed { ok: false, .. }));
    assert_eq!(client.sent_texts(), [ERROR_OCCURRED]);

    // The multiplexer keeps working afterwards.
    let again = mux
        .dispatch(client.clone(), Event::MessageCreate(guild_message("!nothing")))
        .await;
    assert_eq!(again.outcome(), &CommandOutcome::NoMatch);
}

#[tokio::test]
async fn test_private_message_uses_default_prefix() {
    let (tx, mut rx) = unbounded_channel();
    let mux = base()
        .prefix_source(StaticPrefixes::new().with(GUILD, "?"))
        .route(recording(tx))
        .unwrap()
        .build();
    let client = client();

    let private = Message::new(1u64, DM, reimu(), "!pl x");
    let dispatch = mux.dispatch(client.clone(), Event::MessageCreate(private)).await;
    assert!(matches!(dispatch.outcome(), CommandOutcome::Routed { .. }));

    let default_in_guild = mux
        .dispatch(client.clone(), Event::MessageCreate(guild_message("!pl x")))
        .await;
    assert_eq!(default_in_guild.outcome(), &CommandOutcome::NotTargeted);

    let guild_prefix = mux
        .dispatch(client.clone(), Event::MessageCreate(guild_message("?pl y")))
        .await;
    assert!(matches!(guild_prefix.outcome(), CommandOutcome::Routed { .. }));

    assert_eq!(drain(&mut rx), [vec!["pl", "x"], vec!["pl", "y"]]);
}

#[tokio::test]
async fn test_unresolvable_channel_drops_message() {
    let (tx, mut rx) = unbounded_channel();
    let mux = base().route(recording(tx)).unwrap().build();

    let mut message = guild_message("!play");
    message.channel_id = ChannelId(300000000000000099);
    let dispatch = mux.dispatch(client(), Event::MessageCreate(message)).await;

    assert_eq!(dispatch.outcome(), &CommandOutcome::Ignored);
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test]
async fn test_hooks_run_in_registration_order() {
    let (tx, mut rx) = unbounded_channel::<&'static str>();
    let (first, second) = (tx.clone(), tx);
    let mux = base()
        .hook(EventKind::Ready, move |_ctx: Arc<Context>| {
            let tx = first.clone();
            async move {
                tokio::task::yield_now().await;
                let _ = tx.send("first");
            }
        })
        .hook(EventKind::Ready, move |_ctx: Arc<Context>| {
            let tx = second.clone();
            async move {
                let _ = tx.send("second");
            }
        })
        .build();

    let ready = Ready {
        user: bot(),
        guilds: vec![GuildId(GUILD)],
        session_id: "s".into(),
    };
    let dispatch = mux.dispatch(client(), Event::Ready(ready)).await;
    assert_eq!(dispatch.outcome(), &CommandOutcome::Skipped);
    assert_eq!(dispatch.task_count(), 1);
    dispatch.join().await;

    assert_eq!(drain(&mut rx), ["first", "second"]);
}

#[tokio::test]
async fn test_ready_context_carries_bot_user() {
    let (tx, mut rx) = unbounded_channel();
    let mux = base().hook(EventKind::Ready, forward(tx)).build();

    let ready = Ready {
        user: bot(),
        guilds: Vec::new(),
        session_id: "s".into(),
    };
    mux.dispatch(client(), Event::Ready(ready)).await.join().await;

    let seen = drain(&mut rx);
    assert_eq!(seen[0].user().unwrap().id, UserId(BOT));
}

#[tokio::test]
async fn test_panicking_hook_is_isolated() {
    let (tx, mut rx) = unbounded_channel();
    let mux = base()
        .hook(EventKind::GuildDelete, |_ctx: Arc<Context>| async move {
            panic!("hook failure");
        })
        .hook(EventKind::MessageDelete, forward(tx))
        .build();
    let client = client();

    let delete = GuildDelete {
        guild: Guild::placeholder(GuildId(GUILD)),
    };
    mux.dispatch(client.clone(), Event::GuildDelete(delete))
        .await
        .join()
        .await;

    let deleted = nitori_core::MessageDelete {
        id: MessageId(1),
        channel_id: ChannelId(CHANNEL),
        guild_id: Some(GuildId(GUILD)),
        message: None,
    };
    mux.dispatch(client, Event::MessageDelete(deleted))
        .await
        .join()
        .await;

    let seen = drain(&mut rx);
    assert_eq!(seen.len(), 1);
    assert!(seen[0].message().is_none());
    assert!(seen[0].guild().is_none());
}

#[tokio::test]
async fn test_guild_delete_context() {
    let (tx, mut rx) = unbounded_channel();
    let mux = base().hook(EventKind::GuildDelete, forward(tx)).build();

    let delete = GuildDelete {
        guild: Guild::new(GUILD, "Kappa"),
    };
    mux.dispatch(client(), Event::GuildDelete(delete))
        .await
        .join()
        .await;

    let seen = drain(&mut rx);
    assert!(seen[0].user().is_none());
    assert_eq!(seen[0].guild().unwrap().name, "Kappa");
}

#[tokio::test]
async fn test_member_add_uses_placeholder_guild() {
    let (tx, mut rx) = unbounded_channel();
    let mux = base().hook(EventKind::GuildMemberAdd, forward(tx)).build();

    let unknown = GuildId(600000000000000099);
    let update = GuildMemberUpdate {
        guild_id: unknown,
        member: Member::new(unknown, reimu()),
    };
    mux.dispatch(client(), Event::GuildMemberAdd(update))
        .await
        .join()
        .await;

    let seen = drain(&mut rx);
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].guild().unwrap().id, unknown);
    assert_eq!(seen[0].user().unwrap().id, UserId(REIMU));
    assert_eq!(seen[0].member().unwrap().user.username, "reimu");
}

#[tokio::test]
async fn test_reaction_builds_message_context() {
    let (tx, mut rx) = unbounded_channel();
    let mux = base().hook(EventKind::ReactionAdd, forward(tx)).build();
    let client = client();
    client.insert_remote_message(guild_message("!play something"));

    let reaction = Reaction {
        user_id: UserId(REIMU),
        message_id: MessageId(1),
        channel_id: ChannelId(CHANNEL),
        guild_id: Some(GuildId(GUILD)),
        emoji: "👍".into(),
    };
    mux.dispatch(client.clone(), Event::ReactionAdd(reaction.clone()))
        .await
        .join()
        .await;

    let missing = Reaction {
        message_id: MessageId(2),
        ..reaction
    };
    mux.dispatch(client, Event::ReactionAdd(missing))
        .await
        .join()
        .await;

    let seen = drain(&mut rx);
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].user().unwrap().id, UserId(REIMU));
    assert_eq!(seen[0].text(), "play something");
    assert!(seen[0].event().reaction().is_some());
}

#[tokio::test]
async fn test_reacted_message_without_guild_id_uses_channel_guild() {
    let (tx, mut rx) = unbounded_channel();
    let mux = base().hook(EventKind::ReactionAdd, forward(tx)).build();
    let client = client();
    client.insert_remote_message(Message::new(1u64, CHANNEL, reimu(), "nice"));

    let reaction = Reaction {
        user_id: UserId(REIMU),
        message_id: MessageId(1),
        channel_id: ChannelId(CHANNEL),
        guild_id: None,
        emoji: "👍".into(),
    };
    mux.dispatch(client, Event::ReactionAdd(reaction))
        .await
        .join()
        .await;

    let seen = drain(&mut rx);
    assert_eq!(seen.len(), 1);
    assert!(!seen[0].is_private());
    assert_eq!(seen[0].guild().unwrap().id, GuildId(GUILD));
}

#[tokio::test]
async fn test_bounded_hook_tasks_still_complete() {
    let (tx, mut rx) = unbounded_channel();
    let mux = base()
        .max_concurrent_tasks(1)
        .hook(EventKind::MessageUpdate, forward(tx))
        .build();
    let client = client();

    let mut pending = Vec::new();
    for id in 0..4u64 {
        let message = Message::new(id, CHANNEL, reimu(), "edited");
        pending.push(mux.dispatch(client.clone(), Event::MessageUpdate(message)).await);
    }
    for dispatch in pending {
        dispatch.join().await;
    }

    assert_eq!(drain(&mut rx).len(), 4);
}
