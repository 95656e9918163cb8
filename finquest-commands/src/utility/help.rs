use finquest_core::Error;
use finquest_utils::pagination::{page_window, total_pages};

use crate::utility::render::{grouped_help, page_out_of_range_message, unknown_category_message};
use crate::{COMMANDS, CommandMeta};

pub const META: CommandMeta = CommandMeta {
    name: "help",
    desc: "Lists out all available commands.",
    category: "utility",
    usage: "finquest help [page|category]",
};

const HELP_COMMANDS_PER_PAGE: usize = 20;

pub fn help(query: Option<&str>) -> Result<String, Error> {
    let parsed_page = query.and_then(|raw| raw.parse::<usize>().ok().filter(|page| *page >= 1));
    let category = match (query, parsed_page) {
        (Some(raw), None) => Some(raw.trim().to_ascii_lowercase()),
        _ => None,
    };

    let mut categories: Vec<&str> = COMMANDS.iter().map(|c| c.category).collect();
    categories.sort_unstable();
    categories.dedup();

    if let Some(wanted_category) = category.as_deref()
        && !categories.contains(&wanted_category)
    {
        return Ok(unknown_category_message(wanted_category, &categories));
    }

    let commands = sorted_commands(category.as_deref());
    let requested_page = parsed_page.unwrap_or(1);
    let total = total_pages(commands.len(), HELP_COMMANDS_PER_PAGE);
    if requested_page > total {
        return Ok(page_out_of_range_message(requested_page, total));
    }

    let (start, end) = page_window(commands.len(), HELP_COMMANDS_PER_PAGE, requested_page);
    Ok(format!(
        "Available Commands\n\n{}\n\nPage {requested_page}/{total}",
        grouped_help(&commands[start..end])
    ))
}

fn sorted_commands(category: Option<&str>) -> Vec<&'static CommandMeta> {
    let mut filtered: Vec<&'static CommandMeta> = COMMANDS
        .iter()
        .filter(|cmd| match category {
            Some(wanted) => cmd.category == wanted,
            None => true,
        })
        .collect();

    filtered.sort_unstable_by(|left, right| {
        left.category
            .cmp(right.category)
            .then_with(|| left.name.cmp(right.name))
    });

    filtered
}
