//! Help text generation from configured keybinds

use crate::keybinds::actions::TabAction;
use crate::keybinds::config::KeybindConfig;
use crate::keybinds::dispatch::KeyDispatcher;

/// Generate the keybind reference shown by `tablib keys`
#[must_use]
pub fn generate_help_text(config: &KeybindConfig, dispatcher: &KeyDispatcher) -> String {
    let mut output = String::new();

    output.push_str("KEYBINDS:\n");
    for action in TabAction::ALL {
        let keys = if config.is_disabled(action.id()) {
            "(disabled)".to_string()
        } else {
            let bound: Vec<String> = dispatcher
                .keys_for(action)
                .iter()
                .map(ToString::to_string)
                .collect();
            if bound.is_empty() {
                "-".to_string()
            } else {
                bound.join(", ")
            }
        };
        output.push_str(&format!("  {:<16}{}\n", keys, action.description()));
    }
    output.push('\n');

    output.push_str("MOUSE:\n");
    output.push_str("  Click           Toggle this tab\n");
    output.push_str("  Ctrl/Cmd+Click  Switch to the tab\n");
    output.push_str("  Shift+Click     Select a range of visible tabs\n");

    output
}
