use crate::core::models::ChannelInfo;

/// Whether a channel is populated enough to warrant a notice.
///
/// An unknown member count never suppresses.
#[must_use]
pub fn meets_population_threshold(channel: &ChannelInfo, min_members: u64) -> bool {
    channel
        .member_count
        .is_none_or(|count| count >= min_members)
}
