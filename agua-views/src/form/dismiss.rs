//! Outside-click dismissal of open dropdowns.

/// Where a click landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickTarget {
    /// Inside the named field's input or dropdown.
    Field(String),
    /// Anywhere else.
    Outside,
}

/// Fields whose dropdowns close on outside clicks, behind one listener.
///
/// Fields register a handle as they are declared. The listener is attached
/// once on mount and detached on unmount; clicks while detached are ignored.
#[derive(Debug, Clone, Default)]
pub struct DismissRegistry {
    handles: Vec<String>,
    attached: bool,
}

impl DismissRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `field`. Registering twice is a no-op.
    pub fn register(&mut self, field: impl Into<String>) {
        let field = field.into();
        if !self.handles.contains(&field) {
            self.handles.push(field);
        }
    }

    /// Drops every handle, keeping the listener state.
    pub fn clear(&mut self) {
        self.handles.clear();
    }

    /// Attaches the listener. Returns `false` if it was already attached.
    pub fn attach(&mut self) -> bool {
        if self.attached {
            return false;
        }
        self.attached = true;
        log::debug!("Attached dismiss listener for {} field(s)", self.handles.len());
        true
    }

    pub fn detach(&mut self) {
        self.attached = false;
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn handles(&self) -> &[String] {
        &self.handles
    }

    /// Fields that should close for a click on `target`.
    pub fn dismissed(&self, target: &ClickTarget) -> Vec<String> {
        if !self.attached {
            return Vec::new();
        }
        self.handles
            .iter()
            .filter(|name| !matches!(target, ClickTarget::Field(hit) if hit == *name))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_dismisses_other_fields() {
        let mut registry = DismissRegistry::new();
        registry.register("cobrador");
        registry.register("colonia");
        registry.register("cobrador");
        assert!(registry.attach());
        assert!(!registry.attach());

        assert_eq!(
            registry.dismissed(&ClickTarget::Field("cobrador".into())),
            vec!["colonia".to_string()]
        );
        assert_eq!(registry.dismissed(&ClickTarget::Outside).len(), 2);
    }

    #[test]
    fn test_detached_ignores_clicks() {
        let mut registry = DismissRegistry::new();
        registry.register("cobrador");
        assert!(registry.dismissed(&ClickTarget::Outside).is_empty());

        registry.attach();
        registry.detach();
        assert!(registry.dismissed(&ClickTarget::Outside).is_empty());
    }
}
