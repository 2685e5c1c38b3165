//! Eligibility: which inbound events may become requests.
//!
//! The relay acts only inside private, bot-accessible text conversations.
//! A channel the everyone role can view would leak task instructions, so
//! public channels are rejected outright.

use crate::chat::{ChannelKind, InboundMessage};

/// Decide whether an inbound message may become a request.
///
/// Returns `Ok(())` if eligible, or `Err(reason)` if the event should be
/// dropped with no side effect.
pub fn check_eligibility(message: &InboundMessage) -> Result<(), Ineligible> {
    if message.partial {
        return Err(Ineligible::PartialEvent);
    }
    if message.author_is_service {
        return Err(Ineligible::ServiceAuthor);
    }
    if message.channel.kind != ChannelKind::Text {
        return Err(Ineligible::NotTextChannel);
    }
    if !message.channel.bot_can_view {
        return Err(Ineligible::NotViewable);
    }
    if message.channel.visible_to_everyone {
        return Err(Ineligible::PubliclyVisible);
    }
    Ok(())
}

pub fn is_eligible(message: &InboundMessage) -> bool {
    check_eligibility(message).is_ok()
}

/// Reason an inbound message was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ineligible {
    PartialEvent,
    ServiceAuthor,
    NotTextChannel,
    NotViewable,
    PubliclyVisible,
}

impl std::fmt::Display for Ineligible {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PartialEvent => write!(f, "event record is incomplete"),
            Self::ServiceAuthor => write!(f, "author is a service account"),
            Self::NotTextChannel => write!(f, "channel is not a text channel"),
            Self::NotViewable => write!(f, "bot cannot view the channel"),
            Self::PubliclyVisible => write!(f, "channel is visible to everyone"),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use {
        super::*,
        crate::chat::{ChannelContext, ChannelKind},
    };

    fn eligible_message() -> InboundMessage {
        InboundMessage {
            message_id: "m1".into(),
            channel_id: "c1".into(),
            content: "log $12 lunch".into(),
            sender: "alice".into(),
            author_is_service: false,
            partial: false,
            channel: ChannelContext {
                kind: ChannelKind::Text,
                bot_can_view: true,
                visible_to_everyone: false,
                members: vec!["alice".into()],
            },
        }
    }

    #[test]
    fn private_text_message_is_eligible() {
        assert_eq!(check_eligibility(&eligible_message()), Ok(()));
    }

    #[test]
    fn partial_event_is_dropped() {
        let mut message = eligible_message();
        message.partial = true;
        assert_eq!(
            check_eligibility(&message),
            Err(Ineligible::PartialEvent)
        );
    }

    #[test]
    fn service_author_is_dropped() {
        let mut message = eligible_message();
        message.author_is_service = true;
        assert_eq!(
            check_eligibility(&message),
            Err(Ineligible::ServiceAuthor)
        );
    }

    #[rstest]
    #[case(ChannelKind::Voice)]
    #[case(ChannelKind::Other)]
    fn non_text_channel_is_dropped(#[case] kind: ChannelKind) {
        let mut message = eligible_message();
        message.channel.kind = kind;
        assert_eq!(
            check_eligibility(&message),
            Err(Ineligible::NotTextChannel)
        );
    }

    #[test]
    fn unviewable_channel_is_dropped() {
        let mut message = eligible_message();
        message.channel.bot_can_view = false;
        assert_eq!(check_eligibility(&message), Err(Ineligible::NotViewable));
    }

    #[test]
    fn public_channel_is_dropped() {
        let mut message = eligible_message();
        message.channel.visible_to_everyone = true;
        assert_eq!(
            check_eligibility(&message),
            Err(Ineligible::PubliclyVisible)
        );
        assert!(!is_eligible(&message));
    }

    /// A channel that could not be resolved must never pass the gate: its
    /// context reports no kind, no visibility, and no members.
    #[test]
    fn unresolved_channel_is_dropped() {
        let mut message = eligible_message();
        message.channel = ChannelContext::unknown();
        assert!(!is_eligible(&message));
    }
}
