//! Session key construction

use session_shared::constants::SESSION_KEY_PREFIX;

/// The one place a session id is turned into a store key.
pub fn session_key(id: &str) -> String {
    format!("{}{}", SESSION_KEY_PREFIX, id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_key() {
        assert_eq!(session_key("node0abc"), "jetty-session-node0abc");
    }

    #[test]
    fn test_distinct_ids_never_collide() {
        assert_ne!(session_key("a1"), session_key("a11"));
        assert_ne!(session_key("x"), session_key("X"));
    }
}
