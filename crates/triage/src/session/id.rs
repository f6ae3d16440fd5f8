//! Identifier generation.

use chrono::Utc;
use rand::Rng;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Current time as milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Generate a session ID of the form `<millis>-<9 base36 chars>`.
pub fn generate_session_id() -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..9)
        .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
        .collect();
    format!("{}-{}", now_millis(), suffix)
}

/// Generate a message ID such as `user-1718000000000`.
pub fn generate_message_id(prefix: &str) -> String {
    format!("{}-{}", prefix, now_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_format() {
        let id = generate_session_id();
        let (millis, suffix) = id.split_once('-').unwrap();

        assert!(millis.parse::<i64>().unwrap() > 0);
        assert_eq!(suffix.len(), 9);
        assert!(suffix.bytes().all(|b| BASE36.contains(&b)));
    }

    #[test]
    fn test_session_ids_differ() {
        assert_ne!(generate_session_id(), generate_session_id());
    }

    #[test]
    fn test_message_id_prefix() {
        assert!(generate_message_id("ai").starts_with("ai-"));
    }
}
