//! Chat message decoding from an embedded data blob
//!
//! Walks `continuationContents.liveChatContinuation.actions[]
//! .replayChatItemAction.actions[].addChatItemAction.item` and classifies
//! each item by renderer. Absent containers mean "nothing here" and are
//! handled with presence checks; only a chat item without its timestamp is
//! treated as a decode failure.

use serde_json::Value;
use tracing::{debug, trace};

use crate::domain::{ChatMessage, MessageKind};
use crate::infrastructure::replay_error::{ReplayError, ReplayResult};

const PAID_RENDERER: &str = "liveChatPaidMessageRenderer";
const TEXT_RENDERER: &str = "liveChatTextMessageRenderer";

/// Stateless decoder turning one blob into an ordered message batch
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageDecoder;

impl MessageDecoder {
    pub fn new() -> Self {
        Self
    }

    /// Decode every renderable chat item, preserving upstream order
    pub fn decode(&self, blob: &Value) -> ReplayResult<Vec<ChatMessage>> {
        let Some(contents) = blob.get("continuationContents") else {
            debug!("Blob has no continuationContents, nothing to decode");
            return Ok(Vec::new());
        };

        let actions = contents
            .get("liveChatContinuation")
            .and_then(|c| c.get("actions"))
            .and_then(Value::as_array)
            .map_or(&[][..], Vec::as_slice);

        let mut messages = Vec::new();
        for sub_action in actions.iter().flat_map(Self::replay_sub_actions) {
            let Some(add) = sub_action.get("addChatItemAction") else {
                continue;
            };
            let item = add
                .get("item")
                .ok_or_else(|| ReplayError::missing_field("item", Some("addChatItemAction")))?;

            if let Some(message) = Self::decode_item(item)? {
                messages.push(message);
            }
        }

        debug!(actions = actions.len(), messages = messages.len(), "Decoded replay page");
        Ok(messages)
    }

    /// Sub-actions nested in one replay action wrapper
    fn replay_sub_actions(wrapper: &Value) -> impl Iterator<Item = &Value> {
        wrapper
            .get("replayChatItemAction")
            .and_then(|r| r.get("actions"))
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
    }

    fn decode_item(item: &Value) -> ReplayResult<Option<ChatMessage>> {
        let (renderer, kind) = if let Some(r) = item.get(PAID_RENDERER) {
            (r, MessageKind::PaidMessage)
        } else if let Some(r) = item.get(TEXT_RENDERER) {
            (r, MessageKind::TextMessage)
        } else {
            trace!("Skipping non-message chat item");
            return Ok(None);
        };

        let timestamp = renderer
            .get("timestampText")
            .and_then(|t| t.get("simpleText"))
            .and_then(Value::as_str)
            .ok_or_else(|| {
                let context = match kind {
                    MessageKind::PaidMessage => PAID_RENDERER,
                    MessageKind::TextMessage => TEXT_RENDERER,
                };
                ReplayError::missing_field("timestampText.simpleText", Some(context))
            })?;

        Ok(Some(ChatMessage::new(timestamp, message_text(renderer), kind)))
    }
}

/// Space-joined text runs of a renderer; runs without `text` (emoji) add nothing
fn message_text(renderer: &Value) -> String {
    renderer
        .get("message")
        .and_then(|m| m.get("runs"))
        .and_then(Value::as_array)
        .map(|runs| {
            runs.iter()
                .filter_map(|run| run.get("text").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn blob_with_items(items: Vec<Value>) -> Value {
        let sub_actions: Vec<Value> = items
            .into_iter()
            .map(|item| json!({ "addChatItemAction": { "item": item } }))
            .collect();
        json!({
            "continuationContents": {
                "liveChatContinuation": {
                    "actions": [
                        { "replayChatItemAction": { "actions": sub_actions } }
                    ]
                }
            }
        })
    }

    #[test]
    fn test_missing_continuation_contents_yields_nothing() {
        let messages = MessageDecoder::new().decode(&json!({ "responseContext": {} })).unwrap();
        assert!(messages.is_empty());
    }

    #[test]
    fn test_paid_message_joins_runs() {
        let blob = blob_with_items(vec![json!({
            PAID_RENDERER: {
                "message": { "runs": [{ "text": "Hi" }, { "text": "there" }] },
                "timestampText": { "simpleText": "1:23" }
            }
        })]);

        let messages = MessageDecoder::new().decode(&blob).unwrap();
        assert_eq!(messages, vec![ChatMessage::new("1:23", "Hi there", MessageKind::PaidMessage)]);
        assert!(messages[0].is_paid());
    }

    // The legacy downloader flagged text-renderer messages as paid too. That
    // looked like a copy-paste slip, so plain text is decoded as not paid.
    #[test]
    fn test_plain_text_message_is_not_paid() {
        let blob = blob_with_items(vec![json!({
            TEXT_RENDERER: {
                "message": { "runs": [{ "text": "hello" }] },
                "timestampText": { "simpleText": "0:05" }
            }
        })]);

        let messages = MessageDecoder::new().decode(&blob).unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].kind(), MessageKind::TextMessage);
        assert!(!messages[0].is_paid());
    }

    #[test]
    fn test_message_without_text_field_is_empty() {
        let blob = blob_with_items(vec![json!({
            TEXT_RENDERER: { "timestampText": { "simpleText": "0:07" } }
        })]);

        let messages = MessageDecoder::new().decode(&blob).unwrap();
        assert_eq!(messages[0].text(), "");
        assert!(messages[0].is_blank());
    }

    #[test]
    fn test_emoji_runs_contribute_nothing() {
        let blob = blob_with_items(vec![json!({
            TEXT_RENDERER: {
                "message": { "runs": [
                    { "text": "gg" },
                    { "emoji": { "emojiId": "UC/wave" } },
                    { "text": "wp" }
                ] },
                "timestampText": { "simpleText": "2:00" }
            }
        })]);

        let messages = MessageDecoder::new().decode(&blob).unwrap();
        assert_eq!(messages[0].text(), "gg wp");
    }

    #[test]
    fn test_other_renderers_are_skipped() {
        let blob = blob_with_items(vec![
            json!({ "liveChatMembershipItemRenderer": { "timestampText": { "simpleText": "0:01" } } }),
            json!({ TEXT_RENDERER: {
                "message": { "runs": [{ "text": "kept" }] },
                "timestampText": { "simpleText": "0:02" }
            } }),
        ]);

        let messages = MessageDecoder::new().decode(&blob).unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text(), "kept");
    }

    #[test]
    fn test_missing_timestamp_is_decode_error() {
        let blob = blob_with_items(vec![json!({
            PAID_RENDERER: { "message": { "runs": [{ "text": "no time" }] } }
        })]);

        let err = MessageDecoder::new().decode(&blob).unwrap_err();
        assert_eq!(
            err,
            ReplayError::missing_field("timestampText.simpleText", Some(PAID_RENDERER))
        );
    }

    #[test]
    fn test_order_follows_wrapper_then_sub_action() {
        let item = |ts: &str, text: &str| {
            json!({ "addChatItemAction": { "item": { TEXT_RENDERER: {
                "message": { "runs": [{ "text": text }] },
                "timestampText": { "simpleText": ts }
            } } } })
        };
        let blob = json!({
            "continuationContents": { "liveChatContinuation": { "actions": [
                { "replayChatItemAction": { "actions": [item("0:01", "a"), item("0:02", "b")] } },
                { "replayChatItemAction": { "actions": [
                    { "addLiveChatTickerItemAction": {} },
                    item("0:03", "c")
                ] } }
            ] } }
        });

        let texts: Vec<String> = MessageDecoder::new()
            .decode(&blob)
            .unwrap()
            .iter()
            .map(|m| m.text().to_string())
            .collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_wrappers_without_replay_actions_are_ignored() {
        let blob = json!({
            "continuationContents": { "liveChatContinuation": { "actions": [
                { "somethingElse": {} }
            ] } }
        });
        assert!(MessageDecoder::new().decode(&blob).unwrap().is_empty());
    }
}
