//! Secret generation, caching and masking
//!
//! Generated values are cached in the per-stage `DeploymentState` and
//! never rotated implicitly; an operator clears state to force a new
//! value. Resolved secrets are never logged.

use gkm_state::DeploymentState;
use rand::RngCore;
use rand::rngs::OsRng;

/// Generate a 64-character lowercase hex secret from the OS CSPRNG
pub fn generate_secret() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Return the cached secret for (app, name), generating it on first use
///
/// Idempotent across repeated calls and across process restarts as long
/// as the state record is persisted.
pub fn get_or_generate_secret(state: &mut DeploymentState, app: &str, name: &str) -> String {
    if let Some(existing) = state.get_generated_secret(app, name) {
        return existing.to_string();
    }

    let value = generate_secret();
    state.set_generated_secret(app, name, value.clone());
    tracing::info!(app = %app, secret = %name, "Generated new secret");
    value
}

/// Mask a secret for operator-facing display
///
/// Values of 8 characters or fewer become exactly eight asterisks so the
/// true length is not revealed. Longer values keep the first 4 and last 2
/// characters and preserve total length.
pub fn mask_password(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 8 {
        return "********".to_string();
    }

    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}{}{}", head, "*".repeat(chars.len() - 6), tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_secret_shape() {
        let secret = generate_secret();
        assert_eq!(secret.len(), 64);
        assert!(secret.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(secret, secret.to_lowercase());
    }

    #[test]
    fn test_generate_secret_no_collision() {
        assert_ne!(generate_secret(), generate_secret());
    }

    #[test]
    fn test_get_or_generate_is_idempotent() {
        let mut state = DeploymentState::new("local", "production");

        let first = get_or_generate_secret(&mut state, "auth", "BETTER_AUTH_SECRET");
        let second = get_or_generate_secret(&mut state, "auth", "BETTER_AUTH_SECRET");
        assert_eq!(first, second);
        assert_eq!(first.len(), 64);
    }

    #[test]
    fn test_get_or_generate_distinct_per_key() {
        let mut state = DeploymentState::new("local", "production");

        let auth = get_or_generate_secret(&mut state, "auth", "BETTER_AUTH_SECRET");
        let other_app = get_or_generate_secret(&mut state, "api", "BETTER_AUTH_SECRET");
        let other_name = get_or_generate_secret(&mut state, "auth", "WEBHOOK_SECRET");

        assert_ne!(auth, other_app);
        assert_ne!(auth, other_name);
    }

    #[test]
    fn test_mask_password_short() {
        assert_eq!(mask_password("short"), "********");
        assert_eq!(mask_password(""), "********");
        assert_eq!(mask_password("12345678"), "********");
    }

    #[test]
    fn test_mask_password_long() {
        assert_eq!(mask_password("abcdefghijklmnop"), "abcd**********op");
        assert_eq!(mask_password("123456789"), "1234***89");
    }

    #[test]
    fn test_mask_password_preserves_length() {
        let value = "a-fairly-long-password-value";
        assert_eq!(mask_password(value).chars().count(), value.chars().count());
    }
}
