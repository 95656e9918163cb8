use crate::{COMMANDS, CommandMeta};

pub const META: CommandMeta = CommandMeta {
    name: "usage",
    desc: "Show usage syntax for a specific command.",
    category: "utility",
    usage: "finquest usage <command>",
};

pub fn usage(command: Option<&str>) -> String {
    let Some(raw_name) = command else {
        return format!("Usage: {}", META.usage);
    };

    let lookup = raw_name.trim().to_ascii_lowercase();
    match COMMANDS.iter().find(|command| command.name == lookup) {
        Some(command) => format!("Usage: {}", command.usage),
        None => format!("Unknown command: {lookup}"),
    }
}

#[cfg(test)]
mod tests {
    use super::usage;

    #[test]
    fn looks_up_commands() {
        assert_eq!(usage(Some(" XP ")), "Usage: finquest xp add <amount>");
        assert_eq!(usage(Some("ban")), "Unknown command: ban");
        assert_eq!(usage(None), "Usage: finquest usage <command>");
    }
}
