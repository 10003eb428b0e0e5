/// Chirp content rules
///
/// A chirp body is at most [`MAX_CHIRP_LENGTH`] characters. Profane words are
/// masked before storage; matching is case-insensitive on whole
/// space-separated words, so `Kerfuffle!` (with punctuation) is kept as-is.
///
/// # Example
///
/// ```
/// use chirpy_shared::moderation::{clean_body, validate_chirp};
///
/// assert!(validate_chirp("hello world").is_ok());
/// assert_eq!(clean_body("what a Kerfuffle today"), "what a **** today");
/// ```

/// Maximum body length in characters
pub const MAX_CHIRP_LENGTH: usize = 140;

/// Replacement for filtered words
pub const MASK: &str = "****";

const PROFANE_WORDS: [&str; 3] = ["kerfuffle", "sharbert", "fornax"];

/// Error type for chirp validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ModerationError {
    #[error("Chirp is too long ({length} characters, max 140)")]
    TooLong { length: usize },
}

/// Checks the length limit
pub fn validate_chirp(body: &str) -> Result<(), ModerationError> {
    let length = body.chars().count();
    if length > MAX_CHIRP_LENGTH {
        return Err(ModerationError::TooLong { length });
    }

    Ok(())
}

/// Masks profane words, leaving all other text and spacing untouched
pub fn clean_body(body: &str) -> String {
    body.split(' ')
        .map(|word| {
            let lowered = word.to_lowercase();
            if PROFANE_WORDS.contains(&lowered.as_str()) {
                MASK
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
