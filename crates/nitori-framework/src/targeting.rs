//! Targeting detection.
//!
//! Decides whether a message addresses the bot, either by mentioning it or by
//! starting with the active command prefix, and strips the addressing token
//! from the text.
//!
//! A mention only counts as an *invocation* when it leads the message:
//! `"<@bot> play x"` is a command, `"thanks <@bot>"` is not. Both set
//! [`Targeting::has_mention`]; only the first sets
//! [`Targeting::has_leading_mention`].

use nitori_core::{User, UserId};

/// How (and whether) a message addresses the bot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Targeting {
    /// The message text with the addressing token removed.
    pub text: String,
    /// The bot is in the message's mention list.
    pub has_mention: bool,
    /// The bot's mention token starts the text.
    pub has_leading_mention: bool,
    /// The text starts with the active prefix (only checked without a mention).
    pub has_prefix: bool,
}

impl Targeting {
    /// Whether the message addresses the bot at all.
    pub fn is_targeted(&self) -> bool {
        self.has_mention || self.has_prefix
    }

    /// Whether the bot was mentioned somewhere other than the start.
    pub fn is_trailing_mention(&self) -> bool {
        self.has_mention && !self.has_leading_mention
    }
}

/// Resolves targeting for an already-trimmed message text.
pub fn resolve(text: &str, bot: UserId, mentions: &[User], prefix: &str) -> Targeting {
    if mentions.iter().any(|user| user.id == bot) {
        let mut text = text.to_owned();
        // Without a token in the text the mention is the only address form.
        let has_leading_mention = match find_mention(&text, bot) {
            Some((start, len)) => {
                text.replace_range(start..start + len, "");
                start == 0
            }
            None => true,
        };
        return Targeting {
            text,
            has_mention: true,
            has_leading_mention,
            has_prefix: false,
        };
    }

    if !prefix.is_empty()
        && let Some(rest) = text.strip_prefix(prefix)
    {
        return Targeting {
            text: rest.to_owned(),
            has_prefix: true,
            ..Default::default()
        };
    }

    Targeting {
        text: text.to_owned(),
        ..Default::default()
    }
}

/// Finds the first `<@id>` or `<@!id>` token, returning its offset and length.
fn find_mention(text: &str, bot: UserId) -> Option<(usize, usize)> {
    let plain = format!("<@{bot}>");
    let nick = format!("<@!{bot}>");

    let plain_at = text.find(&plain).map(|at| (at, plain.len()));
    let nick_at = text.find(&nick).map(|at| (at, nick.len()));

    match (plain_at, nick_at) {
        (Some(a), Some(b)) => Some(if a.0 <= b.0 { a } else { b }),
        (a, b) => a.or(b),
    }
}
