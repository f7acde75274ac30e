//! Static files served under `/static`, compiled into the binary.

/// Editor widget setup and the submit handler that copies the editable
/// widget's text into the hidden form field.
pub const EDITOR_JS: &str = include_str!("../assets/editor.js");

pub const STYLE_CSS: &str = include_str!("../assets/style.css");
