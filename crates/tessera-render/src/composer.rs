//! Assembles an ordered selection of components into a render context.

use tessera_components::RenderContext;

/// Reserved variable holding the assembled selection.
pub const ASSEMBLED_KEY: &str = "assembledComponents";

/// Separator appended after every assembled component.
const SEPARATOR: &str = "\n\n";

/// Concatenate the selected components into a copy of `all`.
///
/// Each known identifier contributes its content followed by two newlines,
/// in selection order. Duplicates appear once per occurrence. Unknown
/// identifiers are skipped. The result is bound under [`ASSEMBLED_KEY`];
/// `all` is left untouched.
pub fn compose<S: AsRef<str>>(selection: &[S], all: &RenderContext) -> RenderContext {
    let mut assembled = String::new();

    for id in selection {
        let id = id.as_ref();
        match all.get(id) {
            Some(content) => {
                assembled.push_str(content);
                assembled.push_str(SEPARATOR);
            }
            None => tracing::debug!("Skipping unknown component `{}`", id),
        }
    }

    let mut ctx = all.clone();
    ctx.insert(ASSEMBLED_KEY, assembled);
    ctx
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn components() -> RenderContext {
        let mut ctx = RenderContext::new();
        ctx.insert("hero", "<h1>Hero</h1>");
        ctx.insert("dayBanner", "<div>Day</div>");
        ctx.insert("styles", "body {}");
        ctx
    }

    #[test]
    fn concatenates_in_selection_order() {
        let ctx = compose(&["dayBanner", "hero"], &components());

        assert_eq!(
            ctx.get(ASSEMBLED_KEY),
            Some("<div>Day</div>\n\n<h1>Hero</h1>\n\n")
        );
    }

    #[test]
    fn keeps_duplicates() {
        let ctx = compose(&["hero", "hero"], &components());

        assert_eq!(
            ctx.get(ASSEMBLED_KEY),
            Some("<h1>Hero</h1>\n\n<h1>Hero</h1>\n\n")
        );
    }

    #[test]
    fn skips_unknown_identifiers() {
        let ctx = compose(&["hero", "ghost"], &components());

        assert_eq!(ctx.get(ASSEMBLED_KEY), Some("<h1>Hero</h1>\n\n"));
        assert!(!ctx.contains("ghost"));
    }

    #[test]
    fn empty_selection_binds_empty_string() {
        let ctx = compose::<&str>(&[], &components());

        assert_eq!(ctx.get(ASSEMBLED_KEY), Some(""));
    }

    #[test]
    fn leaves_source_untouched_and_keeps_individual_components() {
        let all = components();
        let ctx = compose(&["hero"], &all);

        assert!(!all.contains(ASSEMBLED_KEY));
        assert_eq!(all.len(), 3);
        assert_eq!(ctx.get("dayBanner"), Some("<div>Day</div>"));
        assert_eq!(ctx.len(), 4);
    }

    #[test]
    fn is_idempotent() {
        let all = components();
        let selection = vec!["hero".to_string(), "dayBanner".to_string()];

        let first = compose(&selection, &all);
        let second = compose(&selection, &all);

        assert_eq!(first, second);
    }
}
