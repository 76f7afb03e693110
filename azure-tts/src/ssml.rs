//! Speech markup rendering.

use crate::properties::{Gender, Locale};

/// Render the SSML body for a synthesis request.
///
/// The text is inserted as-is; markup characters are not escaped, so callers
/// may embed their own SSML elements.
///
/// # Example
///
/// ```
/// use azure_tts::properties::{Gender, Locale};
/// use azure_tts::ssml::render;
///
/// let body = render("Hello", "en-US-ZiraRUS", Locale::EnUs, Gender::Female);
/// assert!(body.starts_with("<speak version='1.0' xml:lang='en-US'>"));
/// assert!(body.contains("name='en-US-ZiraRUS'>Hello</voice>"));
/// ```
pub fn render(text: &str, voice: &str, locale: Locale, gender: Gender) -> String {
    format!(
        "<speak version='1.0' xml:lang='{locale}'><voice xml:lang='{locale}' xml:gender='{gender}' name='{voice}'>{text}</voice></speak>"
    )
}
