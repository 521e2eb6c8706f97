//! Descriptive prompt sent to the generation service.

/// Build the cinematic commercial prompt for a product subject.
pub fn build_prompt(subject: &str) -> String {
    format!(
        "A luxury cinematic vertical product commercial for \"{}\". \
         The scene is a cozy, high-end Christmas boutique with soft warm lighting, \
         a decorated tree with golden ornaments in the background, and gentle snow \
         falling outside the window. High quality, festive atmosphere, professional \
         cinematography.",
        subject.trim()
    )
}
