use finquest_utils::formatting::humanize_key;

use crate::CommandMeta;

pub fn unknown_category_message(wanted_category: &str, valid_categories: &[&str]) -> String {
    let valid = valid_categories
        .iter()
        .map(|category| humanize_key(category))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Unknown category: {}\nValid categories: {valid}",
        humanize_key(wanted_category)
    )
}

pub fn page_out_of_range_message(requested_page: usize, total_pages: usize) -> String {
    format!("Page {requested_page} does not exist. Available pages: 1-{total_pages}.")
}

/// Commands grouped under a heading per category. Expects input sorted by category.
pub fn grouped_help(commands: &[&CommandMeta]) -> String {
    let mut out = String::new();
    let mut current_category: Option<&str> = None;

    for command in commands {
        if current_category != Some(command.category) {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&format!("{}\n", humanize_key(command.category)));
            current_category = Some(command.category);
        }

        out.push_str(&format!("  {:<14}{}\n", command.name, command.desc));
    }

    if out.is_empty() {
        out.push_str("No commands available.");
    }

    out.trim_end().to_owned()
}

#[cfg(test)]
mod tests {
    use super::{grouped_help, page_out_of_range_message, unknown_category_message};
    use crate::CommandMeta;

    const A: CommandMeta = CommandMeta {
        name: "debts",
        desc: "Track debts.",
        category: "ledger",
        usage: "finquest debts",
    };
    const B: CommandMeta = CommandMeta {
        name: "xp",
        desc: "Add XP.",
        category: "progression",
        usage: "finquest xp add <amount>",
    };

    #[test]
    fn groups_by_category() {
        let rendered = grouped_help(&[&A, &B]);
        assert_eq!(
            rendered,
            "Ledger\n  debts         Track debts.\n\nProgression\n  xp            Add XP."
        );
        assert_eq!(grouped_help(&[]), "No commands available.");
    }

    #[test]
    fn explains_bad_queries() {
        assert_eq!(
            unknown_category_message("games", &["ledger", "progression"]),
            "Unknown category: Games\nValid categories: Ledger, Progression"
        );
        assert_eq!(
            page_out_of_range_message(4, 2),
            "Page 4 does not exist. Available pages: 1-2."
        );
    }
}
