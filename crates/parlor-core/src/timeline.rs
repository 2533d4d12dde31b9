//! Date-separator derivation over a message snapshot.

use chrono::NaiveDate;

use crate::message::ChatMessage;

/// One renderable row of the room timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimelineItem<'a> {
    /// Calendar-date separator shown before the first message of a day.
    DateSeparator(NaiveDate),
    /// A chat message.
    Message(&'a ChatMessage),
}

/// Derive the renderable timeline for a message snapshot.
///
/// Pure and side-effect-free: a separator precedes the first message of the
/// snapshot and any message whose calendar date differs from its immediate
/// predecessor's.
pub fn timeline(messages: &[ChatMessage]) -> Vec<TimelineItem<'_>> {
    let mut items = Vec::with_capacity(messages.len() + 1);
    let mut current_date: Option<NaiveDate> = None;
    for message in messages {
        let date = message.created_at.date_naive();
        if current_date != Some(date) {
            items.push(TimelineItem::DateSeparator(date));
            current_date = Some(date);
        }
        items.push(TimelineItem::Message(message));
    }
    items
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{DateTime, Utc};

    use super::*;
    use crate::message::MessageId;

    fn msg(id: u64, iso: &str) -> ChatMessage {
        ChatMessage {
            id: MessageId(id),
            username: "bob".into(),
            content: "hi".into(),
            created_at: iso.parse::<DateTime<Utc>>().unwrap(),
        }
    }

    #[test]
    fn empty_snapshot_has_no_items() {
        assert!(timeline(&[]).is_empty());
    }

    #[test]
    fn separator_precedes_first_message() {
        let messages = vec![msg(1, "2024-03-01T09:00:00Z")];
        let items = timeline(&messages);
        assert_eq!(items.len(), 2);
        assert!(matches!(items[0], TimelineItem::DateSeparator(_)));
    }

    #[test]
    fn separator_marks_each_day_change() {
        let messages = vec![
            msg(1, "2024-03-01T09:00:00Z"),
            msg(2, "2024-03-01T18:00:00Z"),
            msg(3, "2024-03-02T08:00:00Z"),
        ];
        let items = timeline(&messages);

        let separators: Vec<usize> = items
            .iter()
            .enumerate()
            .filter(|(_, item)| matches!(item, TimelineItem::DateSeparator(_)))
            .map(|(i, _)| i)
            .collect();
        // One leading separator, one before the later day's first message.
        assert_eq!(separators, vec![0, 3]);
        assert!(matches!(items[4], TimelineItem::Message(m) if m.id == MessageId(3)));
    }
}
