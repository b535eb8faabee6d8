//! The `dot` module contains the conversion from a lexer model to a graphviz dot format.

use std::io::Write;

use dot_writer::{Attributes, DotWriter, RankDirection};

use crate::LexerModel;

/// Render the state graph of the lexer model to a graphviz dot format.
///
/// Each lexer state becomes a node labeled with its name and number of rules. Each state change
/// of a rule becomes an edge labeled with the rule's regex.
pub fn render_to<W: Write>(model: &LexerModel, label: &str, output: &mut W) {
    let mut writer = DotWriter::from(output);
    writer.set_pretty_print(true);
    let mut digraph = writer.digraph();
    digraph
        .set_label(label)
        .set_rank_direction(RankDirection::LeftRight);
    // The nodes are created in the order of the states, so node_<n> is the state with id n
    for (index, state) in model.states().iter().enumerate() {
        let mut node = digraph.node_auto();
        node.set_label(&format!(
            "{}\n{} rules",
            state.name().escape_default(),
            state.rules().len()
        ));
        if index == model.start_state_id().as_usize() {
            node.set_shape(dot_writer::Shape::Circle)
                .set_color(dot_writer::Color::Blue)
                .set_pen_width(3.0);
        }
    }
    for (index, state) in model.states().iter().enumerate() {
        for rule in state.rules() {
            for target in rule.target_states() {
                // Targets were resolved when the model was built
                if let Some(target_id) = model.state_id(target) {
                    digraph
                        .edge(
                            format!("node_{}", index),
                            format!("node_{}", target_id.as_usize()),
                        )
                        .attributes()
                        .set_label(&rule.regex().escape_default().to_string());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compile_lexer_model, LexerSpecification, RuleDescription};
    use regex::Regex;

    #[test]
    fn test_render_to() {
        let model = compile_lexer_model(&LexerSpecification {
            regular_definitions: Vec::new(),
            state_names: vec!["S_pocetno".to_string(), "S_komentar".to_string()],
            token_names: Vec::new(),
            rules: vec![
                RuleDescription::new("S_pocetno", "#\\|", "-")
                    .with_extra_lines(["UDJI_U_STANJE S_komentar"]),
                RuleDescription::new("S_komentar", "\\|#", "-")
                    .with_extra_lines(["UDJI_U_STANJE S_pocetno"]),
                RuleDescription::new("S_komentar", "\\n", "-").with_extra_lines(["NOVI_REDAK"]),
            ],
        })
        .unwrap();

        let mut buffer = Vec::new();
        render_to(&model, "comments", &mut buffer);
        let rendered = String::from_utf8(buffer).unwrap();

        // We replace all newlines with '\n' to make the comparison platform independent
        let rx_newline: Regex = Regex::new(r"\r?\n|\r").unwrap();
        let rendered = rx_newline.replace_all(&rendered, "\n");
        assert!(rendered.starts_with("digraph {"));
        assert!(rendered.contains("comments"));
        assert!(rendered.contains("S_pocetno"));
        assert!(rendered.contains("S_komentar"));
        assert_eq!(rendered.matches("->").count(), 2);
        assert!(rendered.contains("node_0 -> node_1"));
        assert!(rendered.contains("node_1 -> node_0"));
    }
}
