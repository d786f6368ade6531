//! Ping Bot Example
//!
//! Registers a handful of routes and hooks, then feeds a scripted
//! conversation through the in-memory client and prints every reply.
//!
//! # Usage
//!
//! ```bash
//! cargo run --package ping-bot
//! cargo run --package ping-bot -- --prefix "?" "?ping" "?hel" "@nitori echo hi"
//! ```
//!
//! `@nitori` at the start of a line is replaced with the bot's mention.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use nitori::core::{MemoryClient, MessageId, Reaction, Ready};
use nitori::framework::BanError;
use nitori::framework::strings::{GUILD_ONLY, KAPPA_COLOR, LACKING_PERMISSION, MISSING_USER};
use nitori::prelude::*;
use nitori::runtime::ConfigLoader;
use tokio::sync::mpsc;
use tracing::{debug, info};

const BOT: u64 = 900000000000000001;
const GUILD: u64 = 600000000000000001;
const CHANNEL: u64 = 300000000000000001;
const REIMU: u64 = 100000000000000001;
const MARISA: u64 = 100000000000000002;

#[derive(Parser)]
#[command(name = "ping-bot")]
#[command(about = "Feeds a scripted conversation through the Nitori multiplexer")]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to nitori.toml in the current directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured command prefix
    #[arg(short, long)]
    prefix: Option<String>,

    /// Messages sent by the demo user, in order
    messages: Vec<String>,
}

// ============================================================================
// Routes
// ============================================================================

async fn ping(ctx: Arc<Context>) -> HandlerResult {
    ctx.send_message("Pong!").await;
    Ok(())
}

async fn echo(ctx: Arc<Context>) -> HandlerResult {
    let text = ctx.stitch_fields(1);
    if text.is_empty() {
        return Err("nothing to echo".into());
    }
    ctx.send_message(&text).await;
    Ok(())
}

/// Lists every category with its routes.
async fn help(ctx: Arc<Context>) -> HandlerResult {
    let mux = ctx.multiplexer();
    let prefix = ctx.prefix().await;
    let mut embed = Embed::new()
        .title("Commands")
        .description(format!("Prefix: `{prefix}`"))
        .color(KAPPA_COLOR);

    let table = mux.routes();
    for (id, category) in table.iter_categories() {
        let routes: Vec<_> = table
            .routes_in(id)
            .map(|route| format!("`{}` {}", route.pattern(), route.get_description()))
            .collect();
        if !routes.is_empty() {
            embed = embed.field(category.title(), routes.join("\n"), false);
        }
    }

    ctx.send_embed("", &embed).await;
    Ok(())
}

async fn ban(ctx: Arc<Context>) -> HandlerResult {
    let Some(query) = ctx.fields().get(1) else {
        ctx.send_message(MISSING_USER).await;
        return Ok(());
    };
    if !ctx.has_permission(Permissions::BAN_MEMBERS) {
        ctx.send_message(LACKING_PERMISSION).await;
        return Ok(());
    }

    match ctx.ban(query).await {
        Ok(user) => {
            ctx.send_message(&format!("Banned <@{user}>.")).await;
        }
        Err(BanError::UserNotFound) => {
            ctx.send_message(MISSING_USER).await;
        }
        Err(BanError::GuildOnly) => {
            ctx.send_message(GUILD_ONLY).await;
        }
        Err(BanError::Unauthorized) => {
            ctx.send_message(LACKING_PERMISSION).await;
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

// ============================================================================
// Hooks
// ============================================================================

async fn on_ready(ctx: Arc<Context>) {
    if let Some(user) = ctx.user() {
        info!("Logged in as {}", user.tag());
    }
}

async fn on_chatter(ctx: Arc<Context>) {
    debug!(text = ctx.text(), "Ignoring chatter");
}

async fn on_reaction(ctx: Arc<Context>) {
    if let Some(message) = ctx.message() {
        info!(message = %message.id, "Reaction on \"{}\"", message.content);
    }
}

fn build_client() -> Arc<MemoryClient> {
    let reimu = User::new(REIMU, "reimu");
    let marisa = User::new(MARISA, "marisa");
    let guild = Guild::new(GUILD, "Kappa")
        .with_member(Member::new(GUILD, reimu))
        .with_member(Member::new(GUILD, marisa).with_nick("witch"));

    let client = Arc::new(MemoryClient::new(User::new(BOT, "nitori").automated()));
    client.cache_guild_state(guild);
    client.cache_channel_state(Channel::text(CHANNEL, GUILD, "general"));
    client.grant(
        UserId(BOT),
        ChannelId(CHANNEL),
        Permissions::SEND_MESSAGES | Permissions::BAN_MEMBERS,
    );
    client.grant(UserId(REIMU), ChannelId(CHANNEL), Permissions::BAN_MEMBERS);
    client
}

fn script(prefix: &str) -> Vec<String> {
    [
        "good morning",
        "{p}ping",
        "{p}pi",
        "{p}help",
        "@nitori echo hello there",
        "{p}ech",
        "{p}dance",
        "{p}ban witch",
    ]
    .iter()
    .map(|line| line.replace("{p}", prefix))
    .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut loader = ConfigLoader::new().with_current_dir();
    if let Some(path) = &cli.config {
        loader = loader.file(path);
    }
    let mut config = loader.load()?;
    if let Some(prefix) = cli.prefix {
        config.router.prefix = prefix;
    }

    let runtime = NitoriRuntime::from_config(&config);
    let mux = runtime
        .multiplexer_builder()
        .route(Route::new("ping", categories::SYSTEM, ping).description("Check that I am awake."))?
        .route(
            Route::new("help", categories::MANUALS, help)
                .alias("h")
                .description("List commands."),
        )?
        .route(
            Route::new("echo", categories::MEDIA, echo)
                .alias("say")
                .description("Repeat after you."),
        )?
        .route(Route::new("ban", categories::MODERATION, ban).description("Ban a member."))?
        .hook(EventKind::Ready, on_ready)
        .hook(EventKind::NotTargeted, on_chatter)
        .hook(EventKind::ReactionAdd, on_reaction)
        .build();

    let client = build_client();
    let bot = client.current_user().clone();
    let lines = if cli.messages.is_empty() {
        script(mux.prefix())
    } else {
        cli.messages
    };

    let (tx, rx) = mpsc::channel(64);
    tx.send(Event::Ready(Ready {
        user: bot.clone(),
        guilds: vec![GuildId(GUILD)],
        session_id: "demo".to_string(),
    }))
    .await?;

    let reimu = User::new(REIMU, "reimu");
    for (id, line) in (1u64..).zip(&lines) {
        let content = match line.strip_prefix("@nitori") {
            Some(rest) => format!("{}{rest}", bot.mention()),
            None => line.clone(),
        };
        let mut message = Message::new(id, CHANNEL, reimu.clone(), content)
            .in_guild(GUILD)
            .with_member(Member::new(GUILD, reimu.clone()));
        if line.starts_with("@nitori") {
            message = message.mentioning(bot.clone());
        }
        client.insert_remote_message(message.clone());
        tx.send(Event::MessageCreate(message)).await?;
    }
    tx.send(Event::ReactionAdd(Reaction {
        user_id: UserId(MARISA),
        channel_id: ChannelId(CHANNEL),
        message_id: MessageId(1),
        guild_id: Some(GuildId(GUILD)),
        emoji: "👍".to_string(),
    }))
    .await?;
    drop(tx);

    let stats = runtime.run(mux, Arc::clone(&client) as BoxedClient, rx).await?;

    for sent in client.sent() {
        match (sent.content, sent.embed) {
            (Some(content), _) => println!("nitori> {content}"),
            (None, Some(embed)) => {
                println!("nitori> [{}]", embed.title.unwrap_or_default());
                for field in embed.fields {
                    println!("  {}:\n    {}", field.name, field.value.replace('\n', "\n    "));
                }
            }
            (None, None) => {}
        }
    }
    for ban in client.bans() {
        println!("banned {} from {}", ban.user_id, ban.guild_id);
    }
    println!(
        "{} events, {} commands ({} failed), {} unmatched",
        stats.events, stats.commands, stats.failed_commands, stats.unmatched
    );

    Ok(())
}
