/// Rendering collaborator for one clickable toggle control.
///
/// The controller owns the toggle state; a view only renders content and
/// accepts or refuses input.
pub trait ToggleView: Send {
    /// Returns the currently rendered content.
    fn content(&self) -> String;

    /// Replaces the rendered content.
    fn set_content(&mut self, content: &str);

    /// Returns whether the control accepts input.
    fn is_enabled(&self) -> bool;

    /// Enables or disables input on the control.
    fn set_enabled(&mut self, enabled: bool);
}
