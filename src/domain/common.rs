//! Shared traits for income domain entities.

/// Exposes the stable identifier an entity is stored under.
pub trait Identifiable {
    fn id(&self) -> &str;
}

/// Label shown for an entity in reports.
pub trait Displayable {
    fn display_label(&self) -> String;
}
