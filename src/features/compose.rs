//! Courtesy notice texts, one per pattern.

use crate::core::models::{ChannelInfo, PatternKind, UserInfo};

/// Used in place of the member count when Slack did not report one.
pub const UNKNOWN_MEMBER_COUNT: &str = "a lot of";

/// Render the notice for `pattern`, addressed to `author` about `channel`.
#[must_use]
pub fn compose_notice(pattern: PatternKind, author: &UserInfo, channel: &ChannelInfo) -> String {
    let members = channel
        .member_count
        .map_or_else(|| UNKNOWN_MEMBER_COUNT.to_string(), |n| n.to_string());
    let user = &author.name;
    let name = &channel.name;

    match pattern {
        PatternKind::BroadcastMention => format!(
            "Hi <@{user}>. You just posted a `@here` or `@channel` message to #{name} which has {members} members. \
             Hopefully your message was a general announcement to the members of this channel, but if not both \
             `@here` and `@channel` should primarily be used for *announcements*. If you are using these for trying \
             to get help please consider looking at the channel *topic* to see if anyone is \"on call,\" reading the \
             *pinned items* to see if there's any documentation, or just *excluding these alert terms* if it's a \
             general question that the community could answer.\n\
             The alert terms send notifications to people (a lot, in this case) and probably interrupt their current \
             train of thought. Please be considerate when using these alerts in #{name} and other channels."
        ),
        PatternKind::BareUserReference => format!(
            "Hi <@{user}>. You just invited a user to a channel by posting their slack id directly to #{name} which \
             has {members} members. While this does prompt you to invite members to the channel, it also notifies \
             the channel itself. Instead, you can use the `/invite` command to directly invite members to a channel.\n\
             Alternatively, if you click the member count at the top of the channel or in the channel info, there is \
             a link for adding members to a channel. Inviting members by posting their name sends notifications to \
             people (a lot, in this case) and probably interrupt their current train of thought. Please be \
             considerate when inviting new members to #{name} and other channels."
        ),
    }
}
