use std::collections::BTreeMap;

use ss_core::Diagnostic;

const NO_DIAGNOSTICS: &[Diagnostic] = &[];

/// Holds the current diagnostic list per path. Publishing replaces the
/// previous list wholesale, never appends.
#[derive(Debug, Default)]
pub struct DiagnosticsReporter {
    by_path: BTreeMap<String, Vec<Diagnostic>>,
}

impl DiagnosticsReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&mut self, path: &str, diagnostics: Vec<Diagnostic>) {
        self.by_path.insert(path.to_string(), diagnostics);
    }

    pub fn get(&self, path: &str) -> &[Diagnostic] {
        self.by_path
            .get(path)
            .map(Vec::as_slice)
            .unwrap_or(NO_DIAGNOSTICS)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.by_path.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod reporter_tests {
    use super::*;

    #[test]
    fn unknown_path_yields_empty_list() {
        let reporter = DiagnosticsReporter::new();
        assert!(reporter.get("missing.scene").is_empty());
    }

    #[test]
    fn publish_replaces_previous_list_wholesale() {
        let mut reporter = DiagnosticsReporter::new();
        reporter.publish(
            "a.scene",
            vec![Diagnostic::error(1, 0, "first"), Diagnostic::warning(2, 0, "second")],
        );
        assert_eq!(reporter.get("a.scene").len(), 2);

        reporter.publish("a.scene", vec![Diagnostic::error(3, 0, "third")]);
        let current = reporter.get("a.scene");
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].message, "third");

        reporter.publish("a.scene", Vec::new());
        assert!(reporter.get("a.scene").is_empty());
    }
}
