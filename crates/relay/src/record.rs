//! Request and result records in the store's wire format.
//!
//! Field names are fixed: the external worker already speaks this shape.

use courier_streams::{RecordId, StreamRecord};

use crate::chat::InboundMessage;

/// Namespace prefix for ledger ids grouping requests by channel.
pub const LEDGER_NAMESPACE: &str = "discord";

/// A task awaiting processing by the external worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRequest {
    /// Record id, duplicated into the payload for downstream correlation.
    pub request_id: RecordId,
    /// Name of the platform event that produced the request.
    pub event: String,
    /// Text the worker should act on.
    pub instruction: String,
    /// Author display name.
    pub sender: String,
    /// Display names of the source channel's members.
    pub group_members: Vec<String>,
    /// `discord:<channelId>`, grouping requests by logical account.
    pub ledger_id: String,
    pub channel_id: String,
    pub message_id: String,
}

impl TaskRequest {
    /// Build a request for an inbound message, minting a wall-clock record
    /// id. `instruction` overrides the message body when given.
    pub fn from_message(
        event: &str,
        message: &InboundMessage,
        instruction: Option<&str>,
    ) -> Self {
        Self {
            request_id: RecordId::from_wall_clock(),
            event: event.to_string(),
            instruction: instruction.unwrap_or(&message.content).to_string(),
            sender: message.sender.clone(),
            group_members: message.channel.members.clone(),
            ledger_id: format!("{LEDGER_NAMESPACE}:{}", message.channel_id),
            channel_id: message.channel_id.clone(),
            message_id: message.message_id.clone(),
        }
    }

    /// Wire fields, all string-typed; the member list is JSON-encoded.
    pub fn to_fields(&self) -> Vec<(String, String)> {
        let group_members =
            serde_json::to_string(&self.group_members).unwrap_or_else(|_| "[]".into());
        [
            ("requestId", self.request_id.to_string()),
            ("event", self.event.clone()),
            ("instruction", self.instruction.clone()),
            ("sender", self.sender.clone()),
            ("groupMembers", group_members),
            ("ledgerId", self.ledger_id.clone()),
            ("channelId", self.channel_id.clone()),
            ("messageId", self.message_id.clone()),
        ]
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
    }
}

/// A worker's completed output, correlated back to its request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskResult {
    /// The result record's own id, needed for cleanup.
    pub id: RecordId,
    /// Reply text; empty means nothing to deliver (cleanup still runs).
    pub text: String,
    pub channel_id: String,
    pub message_id: String,
    /// Id of the request record this result answers.
    pub request_id: RecordId,
}

impl TaskResult {
    /// Parse a stream record. `None` unless `channelId`, `messageId` and
    /// `requestId` are all present and non-empty; such records are not
    /// actionable and stay in the stream.
    pub fn from_record(record: &StreamRecord) -> Option<Self> {
        let channel_id = non_empty(record.field("channelId"))?;
        let message_id = non_empty(record.field("messageId"))?;
        let request_id = non_empty(record.field("requestId"))?;
        Some(Self {
            id: record.id.clone(),
            text: record.field("result").unwrap_or_default().to_string(),
            channel_id,
            message_id,
            request_id: RecordId::new(request_id),
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use courier_streams::{RecordId, StreamRecord};

    use {
        super::*,
        crate::chat::{ChannelContext, ChannelKind},
    };

    fn message() -> InboundMessage {
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
                members: vec!["alice".into(), "bob".into()],
            },
        }
    }

    fn record(pairs: &[(&str, &str)]) -> StreamRecord {
        StreamRecord {
            id: RecordId::new("9-0"),
            fields: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn request_carries_exact_wire_field_names() {
        let request = TaskRequest::from_message("messageCreate", &message(), None);
        let fields = request.to_fields();
        let names: Vec<&str> = fields.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(
            names,
            [
                "requestId",
                "event",
                "instruction",
                "sender",
                "groupMembers",
                "ledgerId",
                "channelId",
                "messageId"
            ]
        );
    }

    #[test]
    fn request_id_is_duplicated_into_payload() {
        let request = TaskRequest::from_message("messageCreate", &message(), None);
        let fields = request.to_fields();
        let payload_id = fields
            .iter()
            .find(|(name, _)| name == "requestId")
            .map(|(_, value)| value.clone())
            .unwrap();
        assert_eq!(payload_id, request.request_id.to_string());
        assert!(payload_id.ends_with("-0"));
    }

    #[test]
    fn instruction_defaults_to_message_body() {
        let request = TaskRequest::from_message("messageCreate", &message(), None);
        assert_eq!(request.instruction, "log $12 lunch");
        assert_eq!(request.ledger_id, "discord:c1");
        assert_eq!(request.channel_id, "c1");
        assert_eq!(request.message_id, "m1");
    }

    #[test]
    fn instruction_override_wins() {
        let request =
            TaskRequest::from_message("messageDelete", &message(), Some("cancel that"));
        assert_eq!(request.instruction, "cancel that");
        assert_eq!(request.event, "messageDelete");
    }

    #[test]
    fn group_members_are_json_encoded() {
        let request = TaskRequest::from_message("messageCreate", &message(), None);
        let fields = request.to_fields();
        let members = fields
            .iter()
            .find(|(name, _)| name == "groupMembers")
            .map(|(_, value)| value.clone())
            .unwrap();
        assert_eq!(members, r#"["alice","bob"]"#);
    }

    #[test]
    fn result_parses_when_complete() {
        let result = TaskResult::from_record(&record(&[
            ("result", "done"),
            ("channelId", "c1"),
            ("messageId", "m1"),
            ("requestId", "1-0"),
        ]))
        .unwrap();
        assert_eq!(result.text, "done");
        assert_eq!(result.channel_id, "c1");
        assert_eq!(result.request_id, RecordId::new("1-0"));
        assert_eq!(result.id, RecordId::new("9-0"));
    }

    #[test]
    fn result_text_may_be_empty() {
        let result = TaskResult::from_record(&record(&[
            ("result", ""),
            ("channelId", "c1"),
            ("messageId", "m1"),
            ("requestId", "1-0"),
        ]))
        .unwrap();
        assert!(result.text.is_empty());
    }

    #[test]
    fn result_requires_correlation_fields() {
        for missing in ["channelId", "messageId", "requestId"] {
            let pairs: Vec<(&str, &str)> = [
                ("result", "done"),
                ("channelId", "c1"),
                ("messageId", "m1"),
                ("requestId", "1-0"),
            ]
            .into_iter()
            .filter(|(name, _)| *name != missing)
            .collect();
            assert!(TaskResult::from_record(&record(&pairs)).is_none());
        }

        // Present but empty is as bad as missing.
        assert!(
            TaskResult::from_record(&record(&[
                ("result", "done"),
                ("channelId", ""),
                ("messageId", "m1"),
                ("requestId", "1-0"),
            ]))
            .is_none()
        );
    }
}
