//! Location of the user's templates directory.

use std::path::PathBuf;

/// Resolves the templates directory on every lookup.
#[derive(Debug, Clone, Default)]
pub struct TemplateLocator {
    override_dir: Option<PathBuf>,
}

impl TemplateLocator {
    /// Locator that prefers `override_dir` over the XDG user directory.
    #[must_use]
    pub const fn new(override_dir: Option<PathBuf>) -> Self {
        Self { override_dir }
    }

    /// Current templates directory.
    ///
    /// Without an override, `user-dirs.dirs` is read again on each call so edits made while the
    /// dispatcher runs are picked up.
    #[must_use]
    pub fn locate(&self) -> Option<PathBuf> {
        self.override_dir.clone().or_else(dirs::template_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_wins_over_the_user_directory() {
        let locator = TemplateLocator::new(Some(PathBuf::from("/srv/templates")));
        assert_eq!(locator.locate(), Some(PathBuf::from("/srv/templates")));
    }

    #[test]
    fn default_locator_defers_to_xdg() {
        assert_eq!(TemplateLocator::default().locate(), dirs::template_dir());
    }
}
