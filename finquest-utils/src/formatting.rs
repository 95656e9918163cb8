use finquest_progression::LevelProgress;

/// Format integer cents as Brazilian reais (e.g. 123456 -> "R$ 1.234,56").
pub fn format_brl(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}R$ {},{:02}", group_thousands(abs / 100), abs % 100)
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// Render an XP bar like `[####......] 500/1250 XP`.
pub fn format_xp_bar(progress: &LevelProgress, width: usize) -> String {
    let width = width.max(1);
    let filled = ((progress.percent() / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);

    format!(
        "[{}{}] {}/{} XP",
        "#".repeat(filled),
        ".".repeat(width - filled),
        progress.xp,
        progress.next_level_xp.floor() as u64
    )
}

pub fn format_level_badge(level: u32) -> String {
    format!("Nível {level}")
}

pub fn format_percent(value: f64) -> String {
    format!("{:.0}%", value.clamp(0.0, 100.0))
}

/// Convert internal snake_case keys to user-facing names ("credit_card" -> "Credit Card").
pub fn humanize_key(key: &str) -> String {
    let normalized = key.trim();
    if normalized.is_empty() {
        return "Unknown".to_owned();
    }

    normalized
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => format!(
                    "{}{}",
                    first.to_uppercase(),
                    chars.as_str().to_ascii_lowercase()
                ),
                None => String::new(),
            }
        })
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
