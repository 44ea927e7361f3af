/// Prompt templates for common documentation questions.
///
/// A small static registry: [`all`] advertises the prompts, [`get`] renders
/// one with its arguments substituted.
use rmcp::model::{GetPromptResult, Prompt, PromptArgument, PromptMessage, PromptMessageRole};
use serde_json::Value;

pub const INSTALLATION_HELP: &str = "installation_help";
pub const TROUBLESHOOTING_HELP: &str = "troubleshooting_help";
pub const COMPONENT_CONFIG_HELP: &str = "component_config_help";

/// Every prompt this server advertises.
pub fn all() -> Vec<Prompt> {
    vec![
        Prompt::new(
            INSTALLATION_HELP,
            Some("Get help with Invictus installation"),
            Some(vec![arg(
                "component",
                "Component: 'dashboard' or 'framework'",
                false,
            )]),
        ),
        Prompt::new(
            TROUBLESHOOTING_HELP,
            Some("Get help troubleshooting Invictus issues"),
            Some(vec![
                arg("component", "Component having issues", true),
                arg("problem", "Problem description", true),
            ]),
        ),
        Prompt::new(
            COMPONENT_CONFIG_HELP,
            Some("Get help configuring an Invictus component"),
            Some(vec![arg("component", "Component name", true)]),
        ),
    ]
}

fn arg(name: &str, description: &str, required: bool) -> PromptArgument {
    PromptArgument {
        name: name.to_string(),
        title: None,
        description: Some(description.to_string()),
        required: Some(required),
    }
}

/// Render a prompt by name. Returns `None` for unknown names.
pub fn get(
    name: &str,
    arguments: Option<&serde_json::Map<String, Value>>,
) -> Option<GetPromptResult> {
    let str_arg = |key: &str, default: &str| -> String {
        arguments
            .and_then(|m| m.get(key))
            .and_then(Value::as_str)
            .unwrap_or(default)
            .to_string()
    };

    let text = match name {
        INSTALLATION_HELP => {
            let component = str_arg("component", "framework");
            format!(
                "I need help installing Invictus {component}. \
                 Guide me through prerequisites, build pipeline, and release pipeline with examples."
            )
        }
        TROUBLESHOOTING_HELP => {
            let component = str_arg("component", "component");
            let problem = str_arg("problem", "an unspecified problem");
            format!(
                "Issue with Invictus {component}: {problem}. \
                 Help diagnose and resolve. Check docs for solutions and best practices."
            )
        }
        COMPONENT_CONFIG_HELP => {
            let component = str_arg("component", "the component");
            format!(
                "Show me how to configure {component} in Invictus. \
                 Include parameters, examples, and best practices."
            )
        }
        _ => return None,
    };

    Some(GetPromptResult {
        description: None,
        messages: vec![PromptMessage::new_text(PromptMessageRole::User, text)],
    })
}
