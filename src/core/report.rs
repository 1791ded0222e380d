//! Textual status report
//!
//! ~~~text
//! ```
//! Power
//!    Main         ✅
//!    Generator    ❌
//! Switch
//!    ATS1         Network
//!    Battery      25.2V (~50.00%)
//! Triggered by: ['Main']
//! Failed to create statuses:
//!    Inverter
//! ```
//! ~~~
//!
//! The fence, the three-space indent and the name column width are relied on
//! by the chat clients that display the report; keep them stable.

use super::Registry;
use switchwatch_core::{StatusSource, NAME_COLUMN_WIDTH, REPORT_FENCE};

const INDENT: &str = "   ";

/// Render the registry as a fenced status block.
///
/// A pure function of the registry state: rendering twice without sampling
/// in between gives identical output. `triggered_by` adds a trailing line
/// when non-empty.
pub fn render(registry: &Registry, triggered_by: &[String]) -> String {
    let mut lines = vec![REPORT_FENCE.to_string()];

    for group in registry.groups() {
        lines.push(group.label().to_string());
        for member in group.members() {
            for line in member.render_lines() {
                lines.push(format!(
                    "{INDENT}{:<width$}{INDENT}{}",
                    line.name,
                    line.value,
                    width = NAME_COLUMN_WIDTH
                ));
            }
        }
    }

    if !triggered_by.is_empty() {
        lines.push(format!("Triggered by: {}", format_name_list(triggered_by)));
    }

    if !registry.failed().is_empty() {
        lines.push("Failed to create statuses:".to_string());
        for failed in registry.failed() {
            lines.push(format!("{INDENT}{}", failed.display_name()));
        }
    }

    lines.push(REPORT_FENCE.to_string());
    lines.join("\n")
}

/// `['a', 'b']`, the list format existing consumers parse
fn format_name_list(names: &[String]) -> String {
    let quoted: Vec<String> = names.iter().map(|name| quote_name(name)).collect();
    format!("[{}]", quoted.join(", "))
}

/// Single quotes unless the name holds a `'` and no `"`, which then gets
/// double quotes. Backslashes and the chosen quote are escaped.
fn quote_name(name: &str) -> String {
    let quote = if name.contains('\'') && !name.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut out = String::with_capacity(name.len() + 2);
    out.push(quote);
    for c in name.chars() {
        if c == '\\' || c == quote {
            out.push('\\');
        }
        out.push(c);
    }
    out.push(quote);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use switchwatch_core::{MockDigitalInput, SharedDigitalInput};

    fn registry(mock: &Arc<MockDigitalInput>) -> Registry {
        let shared: SharedDigitalInput = mock.clone();
        Registry::from_values(
            &[
                json!({"type": "gpio", "group": "Power", "name": "Main", "gpio_port": 1, "gpio_hight_mode": true}),
                json!({"type": "gpio", "group": "Power", "name": "Generator", "gpio_port": 2, "gpio_hight_mode": true}),
                json!({
                    "type": "ats", "group": "Switch", "name": "ATS1",
                    "status1": {"name": "Network", "gpio_port": 5, "gpio_hight_mode": true},
                    "status2": {"name": "Generator", "gpio_port": 6, "gpio_hight_mode": true}
                }),
                json!({"type": "json", "name": "Inverter", "group": "Switch"}),
            ],
            &shared,
        )
    }

    #[test]
    fn test_render_layout() {
        let mock = Arc::new(MockDigitalInput::new());
        let mut registry = registry(&mock);
        mock.set_level(1, true);
        mock.set_level(5, true);
        registry.sample_all();

        let expected = [
            "```",
            "Power",
            "   Main         ✅",
            "   Generator    ❌",
            "Switch",
            "   ATS1         Network",
            "Triggered by: ['Main', 'ATS1']",
            "Failed to create statuses:",
            "   Inverter",
            "```",
        ]
        .join("\n");

        let triggered = vec!["Main".to_string(), "ATS1".to_string()];
        assert_eq!(render(&registry, &triggered), expected);
    }

    #[test]
    fn test_render_without_trigger_or_failures() {
        let registry = Registry::default();
        assert_eq!(render(&registry, &[]), "```\n```");
    }

    #[test]
    fn test_render_is_stable() {
        let mock = Arc::new(MockDigitalInput::new());
        let registry = registry(&mock);
        let first = render(&registry, &[]);
        let second = render(&registry, &[]);
        assert_eq!(first, second);
        assert!(!first.contains("Triggered by"));
    }

    #[test]
    fn test_long_names_are_not_truncated() {
        assert_eq!(
            format!("{:<width$}|", "Transformer", width = NAME_COLUMN_WIDTH),
            "Transformer|"
        );
        assert_eq!(
            format_name_list(&["a".to_string(), "b".to_string()]),
            "['a', 'b']"
        );
    }

    #[test]
    fn test_name_list_quoting() {
        let names = [
            "Men's".to_string(),
            r#"Say "hi""#.to_string(),
            r#"It's "x""#.to_string(),
            r"C:\bus".to_string(),
        ];
        assert_eq!(
            format_name_list(&names),
            r#"["Men's", 'Say "hi"', 'It\'s "x"', 'C:\\bus']"#
        );
    }
}
