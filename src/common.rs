use handlebars::{handlebars_helper, Handlebars};
use serde_json::Value;

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Write `content` to `path`, creating missing parent directories.
pub fn write_string_to_file(path: impl AsRef<Path>, content: &str) -> std::io::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

/// Quote a label for DOT and Mermaid output.
pub fn escape_label(label: &str) -> String {
    label
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', " ")
}

pub fn get_handlebars() -> Handlebars<'static> {
    let mut handlebars = Handlebars::new();

    handlebars_helper!(exists: |v: Value| !v.is_null());
    handlebars.register_helper("exists", Box::new(exists));

    handlebars_helper!(stringeq: |s1: String, s2: String| s1.eq(&s2));
    handlebars.register_helper("stringeq", Box::new(stringeq));

    handlebars_helper!(escape: |s: String| escape_label(&s));
    handlebars.register_helper("escape", Box::new(escape));

    handlebars
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn write_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out.txt");
        write_string_to_file(&path, "hello").unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "hello");
    }

    #[test]
    fn labels_are_escaped() {
        assert_eq!(escape_label(r#"Say "hi""#), r#"Say \"hi\""#);
        assert_eq!(escape_label("two\nlines"), "two lines");
    }

    #[test]
    fn handlebars_helper_escape_can_render() {
        let handlebars = get_handlebars();
        let res = handlebars
            .render_template(r#"label="{{{escape text}}}""#, &json!({"text": "a \"b\""}))
            .expect("This to render");
        assert_eq!(res, r#"label="a \"b\"""#);
    }

    #[test]
    fn handlebars_helper_stringeq_compares_node_types() {
        let handlebars = get_handlebars();
        let res = handlebars
            .render_template(
                r#"{{#each nodes as |node|}}
{{#if (stringeq node.node_type "Choice")}}
{{node.id}}
{{/if}}
{{/each}}"#,
                &json!({"nodes": [
                    {"id": "node_0", "node_type": "Start"},
                    {"id": "node_1", "node_type": "Choice"},
                ]}),
            )
            .expect("This to render");
        assert_eq!(res, "node_1\n");
    }

    #[test]
    fn handlebars_helper_exists_skips_missing_labels() {
        let handlebars = get_handlebars();
        let res = handlebars
            .render_template(
                r#"{{#each edges as |edge|}}
{{#if (exists edge.label)}}
{{edge.label}}
{{else}}
-
{{/if}}
{{/each}}"#,
                &json!({"edges": [{"label": "Yes"}, {"label": null}]}),
            )
            .expect("This to render");
        assert_eq!(res, "Yes\n-\n");
    }
}
