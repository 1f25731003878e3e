//! The privacy page shown on GET.

use serde::Serialize;

use public_tables_core::{privacy_path, TableKind, TableRef, ToggleAction};

/// Current privacy state of one table, with the one transition available.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrivacyPage {
    pub table: TableRef,
    pub kind: TableKind,
    pub is_public: bool,
}

impl PrivacyPage {
    /// "public" or "private".
    pub fn state(&self) -> &'static str {
        if self.is_public {
            "public"
        } else {
            "private"
        }
    }

    /// The only legal next transition.
    pub fn next_action(&self) -> ToggleAction {
        ToggleAction::next_from(self.is_public)
    }

    /// Label of the submit button.
    pub fn button_label(&self) -> &'static str {
        match self.next_action() {
            ToggleAction::MakePublic => "Make public",
            ToggleAction::MakePrivate => "Make private",
        }
    }

    /// Where the form posts to.
    pub fn form_action(&self) -> String {
        privacy_path(&self.table.database, &self.table.table)
    }

    /// Minimal HTML body: current state and a one-button form.
    pub fn render_html(&self) -> String {
        format!(
            concat!(
                "<h1>{title} privacy: {database}/{table}</h1>\n",
                "<p>{title} is currently <strong>{state}</strong></p>\n",
                "<form action=\"{form_action}\" method=\"post\">\n",
                "<input type=\"hidden\" name=\"action\" value=\"{action}\">\n",
                "<input type=\"submit\" value=\"{label}\">\n",
                "</form>\n",
            ),
            title = self.kind.title(),
            database = escape_html(&self.table.database),
            table = escape_html(&self.table.table),
            state = self.state(),
            form_action = escape_html(&self.form_action()),
            action = self.next_action(),
            label = self.button_label(),
        )
    }
}

pub(crate) fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(kind: TableKind, is_public: bool) -> PrivacyPage {
        PrivacyPage {
            table: TableRef::new("data", "t1"),
            kind,
            is_public,
        }
    }

    #[test]
    fn test_private_table_offers_make_public() {
        let html = page(TableKind::Table, false).render_html();
        assert!(html.contains("Table is currently <strong>private</strong>"));
        assert!(html.contains(r#"<input type="hidden" name="action" value="make-public">"#));
        assert!(html.contains(r#"<input type="submit" value="Make public">"#));
        assert!(html.contains(r#"action="/-/public-table/data/t1""#));
    }

    #[test]
    fn test_public_view_offers_make_private() {
        let html = page(TableKind::View, true).render_html();
        assert!(html.contains("View is currently <strong>public</strong>"));
        assert!(html.contains(r#"<input type="hidden" name="action" value="make-private">"#));
        assert!(html.contains(r#"<input type="submit" value="Make private">"#));
    }

    #[test]
    fn test_names_escaped() {
        let page = PrivacyPage {
            table: TableRef::new("data", "<b>"),
            kind: TableKind::Table,
            is_public: false,
        };
        let html = page.render_html();
        assert!(html.contains("data/&lt;b&gt;"));
        assert!(!html.contains("<b>"));
    }
}
